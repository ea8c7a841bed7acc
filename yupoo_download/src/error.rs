use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Album index {index} is out of range, the listing has {len} albums")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Client Error: {0}")]
    ClientError(#[from] yupoo_client::Error),
}
