//! Validation of ROM files against reference catalogs.
//!
//! [`Validator`] drives a batch: each file is hashed, its candidate
//! platforms are ordered, and their catalogs are loaded and searched until
//! one matches. Reports over the results live in [`report`].

pub mod error;
pub mod file;
pub mod progress;
pub mod report;
pub mod settings;
pub mod validate;

pub use error::{FileError, ValidateError};
pub use file::{DiskFile, FileHandle, MemoryFile, expand_paths};
pub use progress::{ValidationProgress, ValidationStage};
pub use report::{BatchSummary, summary_report, unknown_files_export};
pub use settings::{Settings, settings_path};
pub use validate::{
    CancelToken, ForcedCatalog, ValidateOptions, ValidationOutcome, ValidationStatus, Validator,
    candidate_platforms,
};

pub use romcheck_core::{Platform, Region};
