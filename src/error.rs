use std::fmt;

#[derive(Debug)]
pub enum Error {
    Network(reqwest::Error),
    Timeout,
    Protocol(String),
    NotUpdated,
    InvalidValue { key: String, value: String },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(e) => write!(f, "network error: {e}"),
            Error::Timeout => write!(f, "request to controller timed out"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::NotUpdated => write!(f, "device unique id unknown, call update() first"),
            Error::InvalidValue { key, value } => {
                write!(f, "parameter {key:?} has non-numeric value {value:?}")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Network(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(e)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
