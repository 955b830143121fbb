//! `correlativo-recon`: invoice numbering reconciliation engine.
//!
//! Pure engine crate: receives two pre-loaded reports, returns every record
//! annotated with its sequence-break and duplicate status. No CLI or file IO.

pub mod annotate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod sequence;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{load_csv_batch, run};
pub use error::ReconError;
pub use model::{
    AnnotatedRecord, BatchOrigin, DuplicateStatus, RawBatch, ReconInput, ReconResult,
    ReconSummary, SequenceStatus, NO_PREVIOUS_INVOICE,
};
