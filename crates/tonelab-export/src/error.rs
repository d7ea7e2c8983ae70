use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("frame sequence error: {0}")]
    FrameSequence(String),

    #[error("muxer unavailable: {0}")]
    MuxerUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
