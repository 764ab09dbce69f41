//! Error types for the QMX codec

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("output buffer too small: need {needed} bytes, have {capacity}")]
    OutputTooSmall { needed: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
