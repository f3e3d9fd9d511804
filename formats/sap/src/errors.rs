use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SapError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("packet too short: {0} bytes")]
    PacketTooShort(usize),
    #[error("unsupported sap version: {0}")]
    UnsupportedVersion(u8),
    #[error("reserved status bit is set")]
    ReservedBitSet,
    #[error("payload type string is not terminated")]
    UnterminatedPayloadType,
    #[error("payload type is not valid utf-8")]
    PayloadTypeNotUtf8,
    #[error("sdp error: {0}")]
    SdpError(#[from] sdp_formats::errors::SdpError),
    #[error("invalid packet: {0}")]
    InvalidPacket(String),
}

pub type SapResult<T> = Result<T, SapError>;
