//! SAP wire format.
//!
//! ```text
//! byte 0: VVVA RTEC  (3-bit version, address type, reserved, message type,
//!                     encrypted, compressed)
//! byte 1: auth length in 4-byte words
//! bytes 2..4: 16-bit message hash, network byte order
//! bytes 4..8 or 4..20: originating source IPv4/IPv6 address
//! then auth data, then an optional nul-terminated MIME type, then payload
//! ```

pub mod reader;
pub mod writer;

use tokio_util::bytes::Bytes;
use utils::net::NetworkAddress;

use crate::errors::{SapError, SapResult};

pub const SAP_VERSION: u8 = 1;

pub(crate) const STATUS_VERSION_SHIFT: u8 = 5;
pub(crate) const STATUS_ADDRTYPE_MASK: u8 = 0b0001_0000;
pub(crate) const STATUS_RESERVED_MASK: u8 = 0b0000_1000;
pub(crate) const STATUS_MSGTYPE_MASK: u8 = 0b0000_0100;
pub(crate) const STATUS_ENCRYPTED_MASK: u8 = 0b0000_0010;
pub(crate) const STATUS_COMPRESSED_MASK: u8 = 0b0000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SapMessageType {
    Announce,
    Delete,
}

/// A parsed announcement datagram. `body` is everything past the auth data:
/// the optional MIME type prefix plus payload, still compressed if the
/// compressed flag is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SapPacket {
    pub message_type: SapMessageType,
    pub compressed: bool,
    pub encrypted: bool,
    pub hash: u16,
    pub origin: NetworkAddress,
    pub auth: Bytes,
    pub body: Bytes,
}

/// Splits a decompressed body into its payload type and payload.
///
/// SAPv1 compatibility: a body starting with `v=0` (or `o=` for deletions)
/// carries no type string; an explicit `application/sdp` is normalized to
/// `None`.
pub fn split_body(
    message_type: SapMessageType,
    body: &[u8],
) -> SapResult<(Option<String>, Bytes)> {
    if body.starts_with(b"v=0")
        || (message_type == SapMessageType::Delete && body.starts_with(b"o="))
    {
        return Ok((None, Bytes::copy_from_slice(body)));
    }
    let Some(nul) = body.iter().position(|b| *b == 0) else {
        return Err(SapError::UnterminatedPayloadType);
    };
    let payload_type =
        std::str::from_utf8(&body[..nul]).map_err(|_| SapError::PayloadTypeNotUtf8)?;
    let payload = Bytes::copy_from_slice(&body[nul + 1..]);
    if payload_type == sdp_formats::SDP_MIMETYPE {
        Ok((None, payload))
    } else {
        Ok((Some(payload_type.to_owned()), payload))
    }
}
