use std::io::Cursor;

use tokio_util::bytes::{Buf, Bytes};
use utils::traits::reader::{TryReadFrom, TryReadRemainingFrom};

use crate::{
    RTP_VERSION,
    errors::RtpError,
    header::RtpHeader,
};

use super::AudioPacket;

impl<R: AsRef<[u8]>> TryReadRemainingFrom<RtpHeader, R> for AudioPacket {
    type Error = RtpError;
    fn try_read_remaining_from(
        header: RtpHeader,
        reader: &mut Cursor<R>,
    ) -> Result<Option<Self>, Self::Error> {
        let payload = Bytes::copy_from_slice(reader.chunk());
        reader.advance(payload.len());
        Ok(Some(Self { header, payload }))
    }
}

impl<R: AsRef<[u8]>> TryReadFrom<R> for AudioPacket {
    type Error = RtpError;
    fn try_read_from(reader: &mut Cursor<R>) -> Result<Option<Self>, Self::Error> {
        let Some(header) = RtpHeader::try_read_from(reader)? else {
            return Ok(None);
        };
        if header.version != RTP_VERSION {
            return Err(RtpError::UnsupportedVersion(header.version));
        }
        Self::try_read_remaining_from(header, reader)
    }
}
