//! Channel-interleaved sample ring buffer with per-channel write cursors.
//!
//! Storage is one contiguous region of `nchannels * sample_size * capacity`
//! bytes holding whole frames. Each channel has its own write and read
//! cursor; cursors hold frame indices in `[0, capacity)` and advance modulo
//! capacity. One producer and one consumer per channel; the buffer itself
//! performs no synchronization, memory ordering is the embedder's contract.

use crate::errors::{RtpError, RtpResult};

#[derive(Debug)]
pub struct AudioRingBuffer {
    nchannels: usize,
    sample_size: usize,
    capacity: usize,
    in_cursors: Vec<u32>,
    out_cursors: Vec<u32>,
    in_min: u32,
    in_max: u32,
    data: Vec<u8>,
}

impl AudioRingBuffer {
    pub fn new(nchannels: usize, sample_size: usize, capacity: usize) -> RtpResult<Self> {
        if nchannels == 0 || sample_size == 0 || capacity == 0 {
            return Err(RtpError::InvalidBufferGeometry(format!(
                "{} channels, {} byte samples, {} frames",
                nchannels, sample_size, capacity
            )));
        }
        if capacity > u32::MAX as usize {
            return Err(RtpError::InvalidBufferGeometry(format!(
                "capacity {} does not fit 32-bit cursors",
                capacity
            )));
        }
        Ok(Self {
            nchannels,
            sample_size,
            capacity,
            in_cursors: vec![0; nchannels],
            out_cursors: vec![0; nchannels],
            in_min: 0,
            in_max: 0,
            data: vec![0; nchannels * sample_size * capacity],
        })
    }

    pub fn nchannels(&self) -> usize {
        self.nchannels
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Capacity in frames.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn frame_size(&self) -> usize {
        self.nchannels * self.sample_size
    }

    pub fn write_cursor(&self, channel: usize) -> u32 {
        self.in_cursors[channel]
    }

    pub fn read_cursor(&self, channel: usize) -> u32 {
        self.out_cursors[channel]
    }

    pub fn write_cursor_min(&self) -> u32 {
        self.in_min
    }

    pub fn write_cursor_max(&self) -> u32 {
        self.in_max
    }

    /// Frames readable on `channel`.
    pub fn available(&self, channel: usize) -> usize {
        let w = self.in_cursors[channel] as usize;
        let r = self.out_cursors[channel] as usize;
        (w + self.capacity - r) % self.capacity
    }

    /// One channel's sample bytes inside the given frame slot.
    pub fn channel_sample(&self, frame: u32, channel: usize) -> &[u8] {
        let offset = self.slot(frame, channel);
        &self.data[offset..offset + self.sample_size]
    }

    pub fn advance_read_cursor(&mut self, channel: usize, nframes: usize) {
        let cursor = &mut self.out_cursors[channel];
        *cursor = ((*cursor as usize + nframes) % self.capacity) as u32;
    }

    fn slot(&self, frame: u32, channel: usize) -> usize {
        (frame as usize % self.capacity) * self.frame_size() + channel * self.sample_size
    }

    fn check_channel(&self, channel: usize) -> RtpResult<()> {
        if channel >= self.nchannels {
            return Err(RtpError::ChannelOutOfRange {
                channel,
                nchannels: self.nchannels,
            });
        }
        Ok(())
    }

    fn refresh_cursor_cache(&mut self) {
        self.in_min = self.in_cursors.iter().copied().min().unwrap_or(0);
        self.in_max = self.in_cursors.iter().copied().max().unwrap_or(0);
    }

    /// Inserts `nframes` fully interleaved frames from `src`.
    ///
    /// With all write cursors aligned at `W` the frames land in
    /// `[W, W + nframes)` and every cursor advances together. With diverging
    /// cursors the block is placed at the maximum cursor; each lagging
    /// channel's lane between its own cursor and the block start is zeroed
    /// so it reads as silence, and a common cursor is adopted.
    pub fn insert_frames(&mut self, src: &[u8], nframes: usize) -> RtpResult<()> {
        let frame_size = self.frame_size();
        let needed = nframes * frame_size;
        if src.len() < needed {
            return Err(RtpError::SourceTooShort {
                got: src.len(),
                needed,
            });
        }
        if nframes > self.capacity {
            return Err(RtpError::InvalidBufferGeometry(format!(
                "{} frames into a {}-frame buffer",
                nframes, self.capacity
            )));
        }

        let start = if self.in_min == self.in_max {
            self.in_cursors[0]
        } else {
            let max = self.in_max;
            tracing::warn!(
                "write cursors diverged (min {}, max {}), zero filling lagging channels",
                self.in_min,
                max
            );
            for channel in 0..self.nchannels {
                let mut cursor = self.in_cursors[channel];
                while cursor != max {
                    let offset = self.slot(cursor, channel);
                    self.data[offset..offset + self.sample_size].fill(0);
                    cursor = ((cursor as usize + 1) % self.capacity) as u32;
                }
            }
            max
        };

        for i in 0..nframes {
            let frame = ((start as usize + i) % self.capacity) as u32;
            let offset = self.slot(frame, 0);
            self.data[offset..offset + frame_size]
                .copy_from_slice(&src[i * frame_size..(i + 1) * frame_size]);
        }

        let next = ((start as usize + nframes) % self.capacity) as u32;
        self.in_cursors.fill(next);
        self.in_min = next;
        self.in_max = next;
        Ok(())
    }

    /// Inserts `nframes` samples for a single channel, reading the source
    /// with the given stride: `sample_size` for a de-interleaved source, or
    /// `sample_size * k` to pick one channel out of a k-channel interleaved
    /// source. Only this channel's write cursor advances.
    pub fn insert_channel(
        &mut self,
        channel: usize,
        src: &[u8],
        stride: usize,
        nframes: usize,
    ) -> RtpResult<()> {
        self.check_channel(channel)?;
        if stride < self.sample_size {
            return Err(RtpError::InvalidBufferGeometry(format!(
                "stride {} smaller than sample size {}",
                stride, self.sample_size
            )));
        }
        if nframes == 0 {
            return Ok(());
        }
        let needed = (nframes - 1) * stride + self.sample_size;
        if src.len() < needed {
            return Err(RtpError::SourceTooShort {
                got: src.len(),
                needed,
            });
        }
        if nframes > self.capacity {
            return Err(RtpError::InvalidBufferGeometry(format!(
                "{} frames into a {}-frame buffer",
                nframes, self.capacity
            )));
        }

        let start = self.in_cursors[channel];
        for i in 0..nframes {
            let frame = ((start as usize + i) % self.capacity) as u32;
            let offset = self.slot(frame, channel);
            self.data[offset..offset + self.sample_size]
                .copy_from_slice(&src[i * stride..i * stride + self.sample_size]);
        }
        self.in_cursors[channel] = ((start as usize + nframes) % self.capacity) as u32;
        self.refresh_cursor_cache();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn filled_buffer() -> AudioRingBuffer {
        // 2 channels, 2-byte samples, 8 frames
        let mut buf = AudioRingBuffer::new(2, 2, 8).unwrap();
        let frames: Vec<u8> = (0u8..32).collect();
        buf.insert_frames(&frames, 8).unwrap();
        buf
    }

    #[test]
    fn test_insert_frames_aligned() {
        let mut buf = AudioRingBuffer::new(2, 2, 8).unwrap();
        let frames: Vec<u8> = (0u8..12).collect();
        buf.insert_frames(&frames, 3).unwrap();
        assert_eq!(buf.write_cursor(0), 3);
        assert_eq!(buf.write_cursor(1), 3);
        assert_eq!(buf.channel_sample(0, 0), &[0, 1]);
        assert_eq!(buf.channel_sample(0, 1), &[2, 3]);
        assert_eq!(buf.channel_sample(2, 1), &[10, 11]);
        assert_eq!(buf.available(0), 3);
    }

    #[test]
    fn test_insert_frames_wraps() {
        let mut buf = filled_buffer();
        // cursors wrapped back to 0; three more frames overwrite slots 0..3
        let frames = [0xaa_u8; 12];
        buf.insert_frames(&frames, 3).unwrap();
        assert_eq!(buf.write_cursor(0), 3);
        assert_eq!(buf.channel_sample(2, 1), &[0xaa, 0xaa]);
        // slot 3 still holds the first fill
        assert_eq!(buf.channel_sample(3, 0), &[12, 13]);
    }

    #[test]
    fn test_insert_channel_touches_exactly_n_slots() {
        let mut buf = filled_buffer();
        let before = buf.data.clone();

        let src = [0xee_u8; 6];
        buf.insert_channel(1, &src, 2, 3).unwrap();

        let mut changed = Vec::new();
        for (i, (old, new)) in before.iter().zip(buf.data.iter()).enumerate() {
            if old != new {
                changed.push(i);
            }
        }
        // exactly 3 samples of channel 1 differ, nothing else
        assert_eq!(changed.len(), 6);
        for index in changed {
            let within_frame = index % buf.frame_size();
            assert!(within_frame >= 2, "byte {} outside channel 1 lane", index);
        }
        assert_eq!(buf.write_cursor(1), 3);
        assert_eq!(buf.write_cursor(0), 0);
        assert_eq!(buf.write_cursor_min(), 0);
        assert_eq!(buf.write_cursor_max(), 3);
    }

    #[test]
    fn test_insert_channel_strided_source() {
        let mut buf = AudioRingBuffer::new(2, 2, 4).unwrap();
        // pick channel 1 out of an interleaved 2-channel source
        let interleaved: Vec<u8> = (0u8..16).collect();
        buf.insert_channel(1, &interleaved[2..], 4, 4).unwrap();
        assert_eq!(buf.channel_sample(0, 1), &[2, 3]);
        assert_eq!(buf.channel_sample(3, 1), &[14, 15]);
        // channel 0 lane untouched
        assert_eq!(buf.channel_sample(0, 0), &[0, 0]);
    }

    #[test]
    fn test_insert_frames_with_diverged_cursors() {
        let mut buf = AudioRingBuffer::new(2, 2, 8).unwrap();
        let frames = [0x11_u8; 8];
        buf.insert_frames(&frames, 2).unwrap();

        // push channel 0 two frames ahead
        let src = [0x22_u8; 4];
        buf.insert_channel(0, &src, 2, 2).unwrap();
        assert_eq!(buf.write_cursor(0), 4);
        assert_eq!(buf.write_cursor(1), 2);

        // new block lands at the max cursor, channel 1's gap reads as silence
        let block = [0x33_u8; 4];
        buf.insert_frames(&block, 1).unwrap();
        assert_eq!(buf.write_cursor(0), 5);
        assert_eq!(buf.write_cursor(1), 5);
        assert_eq!(buf.channel_sample(2, 1), &[0, 0]);
        assert_eq!(buf.channel_sample(3, 1), &[0, 0]);
        assert_eq!(buf.channel_sample(4, 0), &[0x33, 0x33]);
        assert_eq!(buf.channel_sample(4, 1), &[0x33, 0x33]);
        // channel 0's own samples in the gap are left alone
        assert_eq!(buf.channel_sample(2, 0), &[0x22, 0x22]);
    }

    #[test]
    fn test_geometry_errors() {
        assert!(AudioRingBuffer::new(0, 2, 8).is_err());
        assert!(AudioRingBuffer::new(2, 0, 8).is_err());
        assert!(AudioRingBuffer::new(2, 2, 0).is_err());

        let mut buf = AudioRingBuffer::new(2, 2, 4).unwrap();
        assert!(matches!(
            buf.insert_frames(&[0u8; 4], 4),
            Err(RtpError::SourceTooShort { .. })
        ));
        assert!(matches!(
            buf.insert_channel(2, &[0u8; 4], 2, 2),
            Err(RtpError::ChannelOutOfRange { .. })
        ));
        assert!(matches!(
            buf.insert_channel(0, &[0u8; 4], 1, 2),
            Err(RtpError::InvalidBufferGeometry(..))
        ));
    }
}
