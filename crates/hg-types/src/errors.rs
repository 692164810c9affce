use thiserror::Error;

/// Main error type for the HPO Glue system
#[derive(Error, Debug)]
pub enum HgError {
    #[error("Benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),

    #[error("Problem error: {0}")]
    Problem(#[from] ProblemError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Which group of declared keys a table column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Config,
    Result,
    Fidelity,
    Id,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Config => "Config",
            Self::Result => "Result",
            Self::Fidelity => "Fidelity",
            Self::Id => "Id",
        };
        f.write_str(s)
    }
}

/// Benchmark construction and query errors
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error(
        "{kind} key '{key}' not in columns {columns:?}; the benchmark description for '{benchmark}' is most likely misspecified"
    )]
    MissingColumn {
        kind: ColumnKind,
        key: String,
        benchmark: String,
        columns: Vec<String>,
    },

    #[error("Can't have `id` in the columns of '{benchmark}' if it's not the id key '{id_key}'")]
    ReservedIdColumn { benchmark: String, id_key: String },

    #[error("Duplicate row for config '{config_id}' at fidelity {fidelity:?} in '{benchmark}'")]
    DuplicateRow {
        benchmark: String,
        config_id: String,
        fidelity: Vec<String>,
    },

    #[error("Result column '{column}' of '{benchmark}' holds a non-numeric value: {value}")]
    NonNumeric {
        benchmark: String,
        column: String,
        value: String,
    },

    #[error("Config '{config_id}' not found in '{benchmark}'")]
    UnknownConfig { benchmark: String, config_id: String },

    #[error("No row in '{benchmark}' for config '{config_id}' with fidelity {fidelity}")]
    NoMatchingRow {
        benchmark: String,
        config_id: String,
        fidelity: String,
    },

    #[error("Unknown fidelity '{fidelity}' for '{benchmark}'")]
    UnknownFidelity { benchmark: String, fidelity: String },

    #[error("Unsupported fidelity specifier for '{benchmark}': {message}")]
    FidelityShape { benchmark: String, message: String },

    #[error("No fidelities to query for '{benchmark}'")]
    NoFidelities { benchmark: String },

    #[error("Trajectory not implemented for '{benchmark}': {reason}")]
    TrajectoryNotImplemented { benchmark: String, reason: String },

    #[error("Surrogate model of '{benchmark}' is not a {expected}")]
    ModelTypeMismatch { benchmark: String, expected: String },
}

/// Problem construction and generation errors
#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("Optimizer '{optimizer}' does not support {what} '{requested}' required by '{benchmark}'")]
    Unsupported {
        optimizer: String,
        benchmark: String,
        what: String,
        requested: String,
    },

    #[error("Benchmark '{benchmark}' has {available} {what}, but {requested} were requested")]
    NotEnough {
        benchmark: String,
        what: String,
        requested: usize,
        available: usize,
    },

    #[error("Duplicate registration: '{name}'")]
    DuplicateName { name: String },

    #[error("Not found in registry: '{name}'")]
    NotFound { name: String },

    #[error("Invalid budget: {message}")]
    InvalidBudget { message: String },

    #[error("Config space required by optimizer '{optimizer}' is missing for '{benchmark}'")]
    MissingConfigSpace { optimizer: String, benchmark: String },
}

/// Result type alias for HPO Glue operations
pub type HgResult<T> = Result<T, HgError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::HgError::Validation(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::HgError::Internal(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::HgError::Config(format!($($arg)*))
    };
}
