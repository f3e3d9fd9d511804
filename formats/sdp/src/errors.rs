use std::{fmt, io, num::ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdpError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("fmt error: {0}")]
    FmtError(#[from] fmt::Error),
    #[error("document incomplete: {0}")]
    Incomplete(String),
    #[error("not supported: {0}")]
    NotSupported(String),
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid attribute line: {0}")]
    InvalidAttributeLine(String),
    #[error("parse string to integer failed: {0}")]
    ParseToIntegerFailed(#[from] ParseIntError),
    #[error("parse url failed: {0}")]
    ParseUrlFailed(#[from] url::ParseError),
    #[error("syntax error: {0}")]
    SyntaxError(String),
}

pub type SdpResult<T> = Result<T, SdpError>;
