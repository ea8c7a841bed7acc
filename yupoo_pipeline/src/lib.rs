mod config;
mod control;
mod error;
mod pipeline;
mod retry;
pub mod stage;

pub use config::Config;
pub use control::PipelineControl;
pub use error::{Error, ErrorKind, Result, Stage, StageError};
pub use pipeline::*;
pub use retry::RetryPolicy;

pub use yupoo_download::{AlbumDownloadReport, NamingScheme};
