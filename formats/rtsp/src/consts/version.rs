use std::{fmt, str::FromStr};

use crate::errors::RtspMessageError;

/// Trailer token of the request line; tells RTSP and HTTP requests apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    Rtsp { minor: u8 },
    Http { minor: u8 },
}

impl ProtocolVersion {
    pub const RTSP_1_0: Self = Self::Rtsp { minor: 0 };

    pub fn is_rtsp(&self) -> bool {
        matches!(self, Self::Rtsp { .. })
    }
}

impl FromStr for ProtocolVersion {
    type Err = RtspMessageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (proto, version) = s
            .split_once('/')
            .ok_or_else(|| RtspMessageError::UnknownVersion(s.to_owned()))?;
        let minor = match version {
            "1.0" => 0,
            "1.1" => 1,
            "1.2" => 2,
            _ => return Err(RtspMessageError::UnknownVersion(s.to_owned())),
        };
        match proto {
            "RTSP" => Ok(Self::Rtsp { minor }),
            "HTTP" if minor < 2 => Ok(Self::Http { minor }),
            _ => Err(RtspMessageError::UnknownVersion(s.to_owned())),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rtsp { minor } => write!(f, "RTSP/1.{}", minor),
            Self::Http { minor } => write!(f, "HTTP/1.{}", minor),
        }
    }
}
