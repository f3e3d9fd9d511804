use std::{fmt, io, num::ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RtspMessageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("fmt error: {0}")]
    FmtError(#[from] fmt::Error),
    #[error("invalid message format: {0}")]
    InvalidMessageFormat(String),
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("unknown protocol version: {0}")]
    UnknownVersion(String),
    #[error("unknown status code: {0}")]
    UnknownStatus(u16),
    #[error("request line of {0} bytes exceeds the limit")]
    FirstLineTooLong(usize),
    #[error("uri of {0} bytes exceeds the limit")]
    UriTooLong(usize),
    #[error("header section of {0} bytes exceeds the receive buffer")]
    HeaderSectionTooLong(usize),
    #[error("missing content length for non-empty body")]
    MissingContentLength,
    #[error("parse integer failed: {0}")]
    ParseToIntegerFailed(#[from] ParseIntError),
    #[error("parse url failed: {0}")]
    ParseUrlFailed(#[from] url::ParseError),
}

pub type RtspMessageResult<T> = Result<T, RtspMessageError>;
