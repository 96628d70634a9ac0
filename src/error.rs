//! Error types.
//!
//! Two layers:
//!
//! - [`KineticsError`]: typed failures raised by the computational core
//!   (parsing, window lookup, estimation, simulation, configuration)
//! - [`AppError`]: what the binary prints, carrying the process exit code
//!
//! Every `KineticsError` converts into an `AppError` so request handlers can
//! use `?` all the way up to `main`.

use thiserror::Error;

pub type CoreResult<T> = Result<T, KineticsError>;

#[derive(Error, Debug)]
pub enum KineticsError {
    #[error("Cannot parse '{token}' (value #{position}) as a number.")]
    Parse { token: String, position: usize },

    #[error("Series lengths differ: time={time}, biomass={biomass}, substrate={substrate}, oxygen={oxygen}.")]
    ShapeMismatch {
        time: usize,
        biomass: usize,
        substrate: usize,
        oxygen: usize,
    },

    #[error("Time series is empty.")]
    EmptySeries,

    #[error("Time must be strictly increasing (t[{index}]={value} does not exceed the previous sample).")]
    NonIncreasingTime { index: usize, value: f64 },

    #[error("Invalid phase window: start ({start} h) must be strictly less than end ({end} h).")]
    InvalidWindow { start: f64, end: f64 },

    #[error("Phase window bound {value} h is not one of the sampled times.")]
    WindowBoundNotFound { value: f64 },

    #[error("Cannot take ln of biomass[{index}]={value}; the exponential window needs strictly positive biomass.")]
    Domain { index: usize, value: f64 },

    #[error("Insufficient data: {what} needs at least {needed} samples, got {got}.")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("Division by zero while computing {what}.")]
    DivisionByZero { what: &'static str },

    #[error("Division by zero in {what} at t={t:.4} h.")]
    Singularity { what: &'static str, t: f64 },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{name}={value} is outside the allowed range [{min}, {max}] {unit}.")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
        unit: &'static str,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("ODE solver failed: {0}")]
    SolverFailure(String),

    #[error("No input data: pass --csv, all four series (--time/--biomass/--substrate/--oxygen), or --demo.")]
    NoInput,

    #[error("Missing required CSV column: `{0}`")]
    MissingColumn(&'static str),

    #[error("Invalid value '{raw}' in column `{column}` on line {line}.")]
    CsvCell {
        line: usize,
        column: &'static str,
        raw: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl KineticsError {
    /// Exit code used when this error reaches the binary.
    ///
    /// - 2: bad input, configuration or I/O
    /// - 3: not enough data / unusable phase window
    /// - 4: numerical failure
    pub fn exit_code(&self) -> u8 {
        match self {
            KineticsError::Parse { .. }
            | KineticsError::ShapeMismatch { .. }
            | KineticsError::EmptySeries
            | KineticsError::NonIncreasingTime { .. }
            | KineticsError::ParameterOutOfRange { .. }
            | KineticsError::InvalidParameter { .. }
            | KineticsError::NoInput
            | KineticsError::MissingColumn(_)
            | KineticsError::CsvCell { .. }
            | KineticsError::Csv(_)
            | KineticsError::Json(_)
            | KineticsError::Io { .. } => 2,
            KineticsError::InvalidWindow { .. }
            | KineticsError::WindowBoundNotFound { .. }
            | KineticsError::InsufficientData { .. } => 3,
            KineticsError::Domain { .. }
            | KineticsError::DivisionByZero { .. }
            | KineticsError::Singularity { .. }
            | KineticsError::NonFinite { .. }
            | KineticsError::SolverFailure(_) => 4,
        }
    }
}

pub fn ensure_finite(value: f64, what: &'static str) -> CoreResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KineticsError::NonFinite { what, value })
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<KineticsError> for AppError {
    fn from(err: KineticsError) -> Self {
        AppError::new(err.exit_code(), format!("Error: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
