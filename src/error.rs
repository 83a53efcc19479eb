//! Error types.
//!
//! Validation failures carry the exact message shown to the user; the
//! dashboard puts it in the error banner and the CLI prints it to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Result type alias for top-level operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures while reading or validating the datasets.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {document} from {path}: {source}")]
    Read {
        document: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid processor record '{id}': {reason}")]
    InvalidProcessor { id: String, reason: String },

    #[error("Duplicate processor id '{0}'")]
    DuplicateProcessor(String),

    #[error("Invalid workload type '{id}': {reason}")]
    InvalidWorkload { id: String, reason: String },

    #[error("Invalid conversion factor {name}: {value}")]
    InvalidConversionFactor { name: &'static str, value: f64 },
}

/// Comparison selection and lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select a comparison tab.")]
    NoMode,

    #[error("Please select a workload type.")]
    NoWorkload,

    #[error("Invalid workload type.")]
    UnknownWorkload,

    #[error("Please select a POWER processor.")]
    NoPowerProcessor,

    #[error("Please select an Intel processor.")]
    NoIntelProcessor,

    #[error("Please select a Mainframe processor.")]
    NoMainframeProcessor,

    #[error("Please select at least two processors to compare.")]
    NotEnoughProcessors,

    #[error("Please select a source processor.")]
    NoSourceProcessor,

    #[error("Please select a target processor.")]
    NoTargetProcessor,

    #[error("Failed to retrieve processor information. Please try again.")]
    UnknownProcessor,

    #[error("Target processor has no usable performance rating.")]
    ZeroPerformance,
}

/// Migration sizing validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("Please enter a valid MIPS capacity (must be a positive number).")]
    InvalidMips,

    #[error("Please enter a valid utilization percentage (between 1 and 100).")]
    InvalidUtilization,

    #[error("Please select a workload type.")]
    NoWorkload,

    #[error("Please select a target platform.")]
    NoTargetPlatform,

    #[error("Custom workload mix must add up to 100%.")]
    MixNotHundred { total: u64 },

    #[error("Invalid workload type.")]
    UnknownWorkload,
}

/// Failures reading or writing the preference file.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preferences file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error(transparent)]
    Prefs(#[from] PrefsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AppError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Selection(_) | Self::Sizing(_) => ExitCode::from(2),
            Self::Data(_) => ExitCode::from(3),
            Self::Prefs(_) => ExitCode::from(4),
            Self::Io(_) | Self::Encode(_) => ExitCode::from(5),
        }
    }

    /// Whether this is a user input problem rather than an environment failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Selection(_) | Self::Sizing(_))
    }
}
