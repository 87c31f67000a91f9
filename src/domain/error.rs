use std::io;
use thiserror::Error;

/// TermCon unified error type
#[derive(Error, Debug)]
pub enum TermConError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid port value: \"{value}\"")]
    InvalidPort { value: String },

    #[error("Invalid baud rate: \"{value}\"")]
    InvalidBaud { value: String },

    #[error("Invalid quit key \"{spec}\": {reason}")]
    InvalidEscapeKey { spec: String, reason: String },

    #[error("lookup {host}: {message}")]
    Resolve { host: String, message: String },

    #[error("{operation} {target}: {source}")]
    Setup {
        operation: &'static str,
        target: String,
        #[source]
        source: io::Error,
    },

    /// The device opened fine but is not a terminal; callers retry it as a plain file.
    #[error("{path} is not a terminal device")]
    NotATerminal { path: String },

    #[error("Serial line error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("\"{label}\" EOF")]
    Eof { label: String },

    #[error("\"{label}\" read error: {source}")]
    Read {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("\"{label}\" write error: {source}")]
    Write {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("\"{label}\" write error: short write ({written} of {expected} bytes)")]
    ShortWrite {
        label: String,
        expected: usize,
        written: usize,
    },

    #[error("Interrupted by {signal}")]
    Interrupted { signal: String },
}

impl TermConError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Builds a mapper for setup failures, e.g. `.map_err(TermConError::setup("bind", path))`.
    pub fn setup(operation: &'static str, target: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let target = target.into();
        move |source| Self::Setup {
            operation,
            target,
            source,
        }
    }
}

pub type TermConResult<T> = Result<T, TermConError>;
