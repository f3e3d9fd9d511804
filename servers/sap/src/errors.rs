use thiserror::Error;

#[derive(Debug, Error)]
pub enum SapServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sap error: {0}")]
    SapError(#[from] sap_formats::errors::SapError),
    #[error("sdp error: {0}")]
    SdpError(#[from] sdp_formats::errors::SdpError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type SapServerResult<T> = Result<T, SapServerError>;
