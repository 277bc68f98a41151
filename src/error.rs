use std::{
    error,
    fmt::{self, Display},
    io,
};

use crate::config::Key;

#[derive(Debug)]
pub enum Error {
    Background(String, Option<Box<(dyn error::Error + 'static)>>),
    Configuration(Key, String),
    Exhausted(usize),
    Extraction(ExtractionFailure, String),
    Io(io::Error),
    Network(reqwest::Error),
    Status(u16, String),
    Unsupported(UnsupportedError, String),
    Url(url::ParseError),
    Xml(roxmltree::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExtractionFailure {
    IndexLinks,
    ImageUrl,
    DownloadLink,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UnsupportedError {
    Extension,
    Origin,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Background(message, _) => write!(f, "Unable to set background: {}", message),
            Error::Configuration(key, message) => {
                write!(f, "Invalid {}: {}", key.identifier(), message)
            }
            Error::Exhausted(attempts) => {
                write!(f, "No wallpaper could be obtained after {} attempts", attempts)
            }
            Error::Extraction(kind, url) => match kind {
                ExtractionFailure::IndexLinks => {
                    write!(f, "Unable to extract gallery index at {}", url)
                }
                ExtractionFailure::ImageUrl => write!(f, "Unable to extract image url at {}", url),
                ExtractionFailure::DownloadLink => {
                    write!(f, "Unable to extract download link at {}", url)
                }
            },

            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Network(e) => write!(f, "Network error: {}", e),
            Error::Status(status, url) => write!(f, "Unexpected status {} at {}", status, url),
            Error::Unsupported(UnsupportedError::Extension, url) => {
                write!(f, "Unsupported file type: {}", url)
            }
            Error::Unsupported(UnsupportedError::Origin, name) => {
                write!(f, "Unsupported origin: {}", name)
            }
            Error::Url(e) => write!(f, "Bad url: {}", e),
            Error::Xml(e) => write!(f, "Bad manifest: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Background(_, e) => e.as_deref(),
            Error::Configuration(..) => None,
            Error::Exhausted(_) => None,
            Error::Extraction(..) => None,
            Error::Io(e) => Some(e),
            Error::Network(e) => Some(e),
            Error::Status(..) => None,
            Error::Unsupported(..) => None,
            Error::Url(e) => Some(e),
            Error::Xml(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(e: tempfile::PersistError) -> Self {
        Error::Io(e.error)
    }
}
