use thiserror::Error;

use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    AlbumExtraction,
    ImageDownload,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Listing => "listing",
            Stage::AlbumExtraction => "album extraction",
            Stage::ImageDownload => "image download",
        };
        write!(f, "{}", name)
    }
}

/// Coarse category of a failure, for rendering a message to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    Fetch,
    Parse,
    Index,
    Io,
    Config,
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Client(#[from] yupoo_client::Error),
    #[error(transparent)]
    Download(#[from] yupoo_download::Error),
    #[error(transparent)]
    Parsing(#[from] yupoo_util::ParsingError),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(#[source] yupoo_util::ParsingError),
    #[error("Download folder does not exist: {0}")]
    InvalidFolder(String),
    #[error("Cannot parse config: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Client Error: {0}")]
    ClientError(#[from] yupoo_client::Error),
    #[error("Listing failed: {source}")]
    Listing {
        #[source]
        source: StageError,
    },
    #[error("Album {index} failed at {stage}: {source}")]
    Album {
        index: usize,
        stage: Stage,
        #[source]
        source: StageError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::InvalidFolder(_) | Error::IOError(_) => ErrorKind::Io,
            Error::ConfigError(_) => ErrorKind::Config,
            Error::ClientError(e) => client_error_kind(e),
            Error::Listing { source } | Error::Album { source, .. } => source.kind(),
        }
    }

    /// Stage and album index of a failed run, if it failed inside the pipeline.
    pub fn context(&self) -> Option<(Stage, Option<usize>)> {
        match self {
            Error::Listing { .. } => Some((Stage::Listing, None)),
            Error::Album { index, stage, .. } => Some((*stage, Some(*index))),
            _ => None,
        }
    }
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::Client(e) => client_error_kind(e),
            StageError::Download(e) => match e {
                yupoo_download::Error::IndexOutOfRange { .. } => ErrorKind::Index,
                yupoo_download::Error::InvalidManifest(_) | yupoo_download::Error::CsvError(_) => ErrorKind::Parse,
                yupoo_download::Error::IOError(_) => ErrorKind::Io,
                yupoo_download::Error::ClientError(e) => client_error_kind(e),
            },
            StageError::Parsing(_) => ErrorKind::InvalidUrl,
            StageError::IO(_) => ErrorKind::Io,
        }
    }
}

fn client_error_kind(e: &yupoo_client::Error) -> ErrorKind {
    use yupoo_client::Error::*;
    match e {
        InvalidHTML(_) => ErrorKind::Parse,
        NetworkError(_) | IncompleteDownload(_) => ErrorKind::Fetch,
    }
}
