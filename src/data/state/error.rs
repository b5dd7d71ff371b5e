use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Debug)]
pub enum RefreshError {
    IO(Box<dyn std::fmt::Debug + Send>),
    InvalidData(Box<dyn std::fmt::Debug + Send>),
    FileNotFound(PathBuf)
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let msg = match self {
            RefreshError::IO(inner) => {
                format!("IO: {:?}", inner)
            },
            RefreshError::InvalidData(inner) => {
                format!("Invalid suburb data: {:?}", inner)
            },
            RefreshError::FileNotFound(path) => {
                format!("Could not find data file {}", path.display())
            }
        };
        write!(f, "Refresh error: {}", msg)
    }
}

impl std::error::Error for RefreshError {}

impl From<std::io::Error> for RefreshError {
    fn from(error: std::io::Error) -> Self {
        RefreshError::IO(Box::new(error))
    }
}

impl From<csv::Error> for RefreshError {
    fn from(error: csv::Error) -> Self {
        match error.into_kind() {
            csv::ErrorKind::Io(io) => RefreshError::from(io),
            kind => RefreshError::InvalidData(Box::new(kind)),
        }
    }
}
