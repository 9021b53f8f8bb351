extern crate reqwest;
extern crate serde_json;
extern crate std;

pub type NextBusResult<T> = std::result::Result<T, NextBusError>;

#[derive(Debug)]
pub enum NextBusError {
    HttpError(reqwest::Error),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    InvalidIdentifier(String),
}

impl std::fmt::Display for NextBusError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            NextBusError::HttpError(ref err) => {
                return write!(f, "HTTP Error: {}", err);
            },
            NextBusError::IoError(ref err) => {
                return write!(f, "IO Error: {}", err);
            },
            NextBusError::JsonError(ref err) => {
                return write!(f, "JSON Error: {}", err);
            },
            NextBusError::InvalidIdentifier(ref name) => {
                return write!(f, "Invalid identifier: {} must not be empty", name);
            },
        }
    }
}

impl std::error::Error for NextBusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            NextBusError::HttpError(ref err) => Some(err),
            NextBusError::IoError(ref err) => Some(err),
            NextBusError::JsonError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NextBusError {
    fn from(err: reqwest::Error) -> NextBusError {
        return NextBusError::HttpError(err);
    }
}

impl From<std::io::Error> for NextBusError {
    fn from(err: std::io::Error) -> NextBusError {
        return NextBusError::IoError(err);
    }
}

impl From<serde_json::Error> for NextBusError {
    fn from(err: serde_json::Error) -> NextBusError {
        return NextBusError::JsonError(err);
    }
}
