pub mod reader;
#[cfg(test)]
mod test;
pub mod writer;

use tokio_util::bytes::{Bytes, BytesMut};
use utils::traits::writer::WriteTo;

use crate::{
    errors::{RtpError, RtpResult},
    header::RtpHeader,
};

/// An RTP packet carrying interleaved linear PCM frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPacket {
    pub header: RtpHeader,
    pub payload: Bytes,
}

impl AudioPacket {
    pub fn new(header: RtpHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    pub fn wire_len(&self) -> usize {
        self.header.wire_len() + self.payload.len()
    }

    /// Number of whole audio frames in the payload.
    pub fn frames(&self, nchannels: usize, sample_size: usize) -> RtpResult<usize> {
        frames_in_payload(self.payload.len(), nchannels, sample_size)
    }
}

/// Packs sample bytes behind a CSRC-free header and returns the whole
/// packet, header included.
pub fn pack(
    payload_type: u8,
    sequence_number: u16,
    timestamp: u32,
    ssrc: u32,
    samples: &[u8],
) -> RtpResult<Bytes> {
    let header = RtpHeader::new(payload_type, sequence_number, timestamp, ssrc);
    let mut packet = Vec::with_capacity(header.wire_len() + samples.len());
    header.write_to(&mut packet)?;
    packet.extend_from_slice(samples);
    Ok(BytesMut::from(&packet[..]).freeze())
}

fn frames_in_payload(
    payload_len: usize,
    nchannels: usize,
    sample_size: usize,
) -> RtpResult<usize> {
    let frame_size = nchannels * sample_size;
    if frame_size == 0 {
        return Err(RtpError::InvalidBufferGeometry(
            "frame size must not be zero".to_owned(),
        ));
    }
    if payload_len % frame_size != 0 {
        return Err(RtpError::PayloadNotFrameAligned {
            payload_len,
            frame_size,
        });
    }
    Ok(payload_len / frame_size)
}

/// Frame count of a raw packet of `packet_len` bytes whose first byte is
/// `status`; only the CSRC count is taken from the header.
pub fn frames_in_packet(
    packet_len: usize,
    status: u8,
    nchannels: usize,
    sample_size: usize,
) -> RtpResult<usize> {
    let offset = RtpHeader::payload_offset(status);
    if packet_len < offset {
        return Err(RtpError::PacketTooShort(packet_len));
    }
    frames_in_payload(packet_len - offset, nchannels, sample_size)
}
