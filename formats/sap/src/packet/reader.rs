use tokio_util::bytes::Bytes;
use utils::net::NetworkAddress;

use crate::errors::{SapError, SapResult};

use super::{
    SAP_VERSION, STATUS_ADDRTYPE_MASK, STATUS_COMPRESSED_MASK, STATUS_ENCRYPTED_MASK,
    STATUS_MSGTYPE_MASK, STATUS_RESERVED_MASK, STATUS_VERSION_SHIFT, SapMessageType, SapPacket,
};

impl SapPacket {
    /// Parses one datagram. Policy decisions (zero hash, encryption,
    /// decompression) are left to the caller; only structure is checked.
    pub fn parse(msg: &[u8]) -> SapResult<Self> {
        if msg.len() < 4 {
            return Err(SapError::PacketTooShort(msg.len()));
        }
        let status = msg[0];
        let version = status >> STATUS_VERSION_SHIFT;
        if version != SAP_VERSION {
            return Err(SapError::UnsupportedVersion(version));
        }
        if status & STATUS_RESERVED_MASK != 0 {
            return Err(SapError::ReservedBitSet);
        }
        let message_type = if status & STATUS_MSGTYPE_MASK == 0 {
            SapMessageType::Announce
        } else {
            SapMessageType::Delete
        };
        let encrypted = status & STATUS_ENCRYPTED_MASK != 0;
        let compressed = status & STATUS_COMPRESSED_MASK != 0;

        let auth_len = 4 * msg[1] as usize;
        let hash = u16::from_be_bytes([msg[2], msg[3]]);

        let ip_len = if status & STATUS_ADDRTYPE_MASK == 0 { 4 } else { 16 };
        let body_start = 4 + ip_len + auth_len;
        // require some payload behind the header and auth data
        if msg.len() < body_start + 3 {
            return Err(SapError::PacketTooShort(msg.len()));
        }

        let origin = if ip_len == 4 {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&msg[4..8]);
            NetworkAddress::new_v4(octets, 0)
        } else {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&msg[4..20]);
            NetworkAddress::new_v6(octets, 0)
        };

        Ok(Self {
            message_type,
            compressed,
            encrypted,
            hash,
            origin,
            auth: Bytes::copy_from_slice(&msg[4 + ip_len..body_start]),
            body: Bytes::copy_from_slice(&msg[body_start..]),
        })
    }
}
