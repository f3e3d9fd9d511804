use std::{fmt, str::FromStr};

use crate::errors::SdpError;

pub const DYNAMIC_PAYLOAD_TYPE_START: u8 = 96;
pub const MAX_PAYLOAD_TYPE: u8 = 127;

/// Linear PCM sample encodings of the audio profile, plus the AM824
/// transparent frame carried by RAVENNA devices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    L8,
    L16,
    #[default]
    L24,
    L32,
    Am824,
}

impl AudioEncoding {
    /// Size of one sample of one channel, in bytes.
    pub fn sample_size(&self) -> usize {
        match self {
            Self::L8 => 1,
            Self::L16 => 2,
            Self::L24 => 3,
            Self::L32 | Self::Am824 => 4,
        }
    }
}

impl FromStr for AudioEncoding {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L8" => Ok(Self::L8),
            "L16" => Ok(Self::L16),
            "L24" => Ok(Self::L24),
            "L32" => Ok(Self::L32),
            "AM824" => Ok(Self::Am824),
            _ => Err(SdpError::NotSupported(format!(
                "unknown audio encoding: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L8 => f.write_str("L8"),
            Self::L16 => f.write_str("L16"),
            Self::L24 => f.write_str("L24"),
            Self::L32 => f.write_str("L32"),
            Self::Am824 => f.write_str("AM824"),
        }
    }
}

/// Value part of `a=rtpmap:<pt> <encoding>/<rate>[/<channels>]`; the channel
/// count is omitted on the wire iff it is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpMap {
    pub payload_type: u8,
    pub encoding: AudioEncoding,
    pub sample_rate: u32,
    pub channels: u16,
}

impl FromStr for RtpMap {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once(' ')
            .ok_or_else(|| SdpError::InvalidAttributeLine(format!("invalid rtpmap: {}", s)))?;
        let payload_type: u32 = first.parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!(
                "parse rtpmap payload type failed: {}, {}",
                first, err
            ))
        })?;
        if payload_type > MAX_PAYLOAD_TYPE as u32 {
            return Err(SdpError::NotSupported(format!(
                "payload type out of range: {}",
                payload_type
            )));
        }
        let fields: Vec<_> = second.split('/').collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(SdpError::InvalidAttributeLine(format!(
                "rtpmap line is invalid: {}",
                second
            )));
        }

        let encoding: AudioEncoding = fields[0].parse()?;
        let sample_rate: u32 = fields[1].parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!(
                "parse rtpmap sample rate failed: {}, {}",
                fields[1], err
            ))
        })?;
        let channels: u16 = if fields.len() == 3 {
            fields[2].parse().map_err(|err| {
                SdpError::InvalidAttributeLine(format!(
                    "parse rtpmap channel count failed: {}, {}",
                    fields[2], err
                ))
            })?
        } else {
            1
        };

        Ok(Self {
            payload_type: payload_type as u8,
            encoding,
            sample_rate,
            channels,
        })
    }
}

impl fmt::Display for RtpMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.payload_type, self.encoding, self.sample_rate
        )?;
        if self.channels != 1 {
            write!(f, "/{}", self.channels)?;
        }
        Ok(())
    }
}
