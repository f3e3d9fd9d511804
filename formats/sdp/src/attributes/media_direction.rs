use std::{fmt, str::FromStr};

use crate::errors::SdpError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MediaDirection {
    #[default]
    SendRecv,
    RecvOnly,
    SendOnly,
    Inactive,
}

impl FromStr for MediaDirection {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sendrecv" => Ok(Self::SendRecv),
            "recvonly" => Ok(Self::RecvOnly),
            "sendonly" => Ok(Self::SendOnly),
            "inactive" => Ok(Self::Inactive),
            _ => Err(SdpError::InvalidAttributeLine(format!(
                "unknown media direction: {}",
                s,
            ))),
        }
    }
}

impl fmt::Display for MediaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendRecv => f.write_str("sendrecv"),
            Self::RecvOnly => f.write_str("recvonly"),
            Self::SendOnly => f.write_str("sendonly"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}
