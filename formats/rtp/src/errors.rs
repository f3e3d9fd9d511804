use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RtpError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported rtp version: {0}")]
    UnsupportedVersion(u8),
    #[error("packet too short: {0} bytes")]
    PacketTooShort(usize),
    #[error("payload of {payload_len} bytes is not a whole number of {frame_size}-byte frames")]
    PayloadNotFrameAligned {
        payload_len: usize,
        frame_size: usize,
    },
    #[error("channel {channel} out of range, buffer has {nchannels} channels")]
    ChannelOutOfRange { channel: usize, nchannels: usize },
    #[error("source holds {got} bytes, {needed} required")]
    SourceTooShort { got: usize, needed: usize },
    #[error("invalid buffer geometry: {0}")]
    InvalidBufferGeometry(String),
}

pub type RtpResult<T> = Result<T, RtpError>;
