use byteorder::{BigEndian, WriteBytesExt};
use tokio_util::bytes::Bytes;
use utils::net::{IpVersion, NetworkAddress};

use crate::errors::{SapError, SapResult};

use super::{
    SAP_VERSION, STATUS_ADDRTYPE_MASK, STATUS_MSGTYPE_MASK, STATUS_VERSION_SHIFT, SapMessageType,
    SapPacket,
};

impl SapPacket {
    /// Builds an uncompressed, unauthenticated datagram. A payload type of
    /// `None` writes no type prefix (SAPv1 form); announcements produced by
    /// this crate always carry the explicit `application/sdp` type.
    pub fn build(
        message_type: SapMessageType,
        hash: u16,
        origin: &NetworkAddress,
        payload_type: Option<&str>,
        payload: &[u8],
    ) -> SapResult<Bytes> {
        let type_len = payload_type.map(|t| t.len() + 1).unwrap_or(0);
        let ip_len = origin.octets().len();
        let total = 4 + ip_len + type_len + payload.len();
        if total > u16::MAX as usize {
            return Err(SapError::InvalidPacket(format!(
                "message of {} bytes exceeds the 16-bit wire limit",
                total
            )));
        }

        let mut status = SAP_VERSION << STATUS_VERSION_SHIFT;
        if origin.version() == IpVersion::V6 {
            status |= STATUS_ADDRTYPE_MASK;
        }
        if message_type == SapMessageType::Delete {
            status |= STATUS_MSGTYPE_MASK;
        }

        let mut msg = Vec::with_capacity(total);
        msg.push(status);
        msg.push(0); // no auth data
        msg.write_u16::<BigEndian>(hash)?;
        msg.extend_from_slice(origin.octets());
        if let Some(payload_type) = payload_type {
            msg.extend_from_slice(payload_type.as_bytes());
            msg.push(0);
        }
        msg.extend_from_slice(payload);
        Ok(Bytes::from(msg))
    }
}
