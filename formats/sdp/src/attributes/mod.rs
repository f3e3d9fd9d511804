pub mod media_direction;
pub mod ptime;
pub mod refclk;
pub mod rtpmap;

use std::{fmt, str::FromStr};

use crate::errors::SdpError;

/// `a=mediaclk:direct=<offset>` — media clock offset against the reference
/// clock, in media clock units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaClock {
    pub offset: u32,
}

impl FromStr for MediaClock {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.strip_prefix("direct=").ok_or_else(|| {
            SdpError::InvalidAttributeLine(format!("unknown mediaclk form: {}", s))
        })?;
        let offset: u32 = value.parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!(
                "parse mediaclk offset failed: {}, {}",
                value, err
            ))
        })?;
        Ok(Self { offset })
    }
}

impl fmt::Display for MediaClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "direct={}", self.offset)
    }
}

/// One `a=pcap:<index> ptime:<value>` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtimeCapability {
    pub index: u8,
    pub ptime_us: u16,
}

impl FromStr for PtimeCapability {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, value) = s.split_once(' ').ok_or_else(|| {
            SdpError::InvalidAttributeLine(format!("invalid pcap attribute: {}", s))
        })?;
        let index: u8 = index.parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!("parse pcap index failed: {}, {}", index, err))
        })?;
        let value = value.strip_prefix("ptime:").ok_or_else(|| {
            SdpError::InvalidAttributeLine(format!("invalid pcap capability: {}", s))
        })?;
        Ok(Self {
            index,
            ptime_us: ptime::parse_ptime_us(value)?,
        })
    }
}

impl fmt::Display for PtimeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ptime:{}",
            self.index,
            ptime::PtimeText(self.ptime_us)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityProposal {
    /// `a=pcfg:` — offered configuration
    Proposed,
    /// `a=acfg:` — configuration in use
    Active,
}

/// `a=pcfg:<index> a=<cap>` / `a=acfg:<index> a=<cap>` — pointer into the
/// ptime capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityConfig {
    pub proposal: CapabilityProposal,
    pub index: u8,
    pub cap: u8,
}

impl CapabilityConfig {
    pub fn attribute_name(&self) -> &'static str {
        match self.proposal {
            CapabilityProposal::Proposed => "pcfg",
            CapabilityProposal::Active => "acfg",
        }
    }

    pub fn parse(proposal: CapabilityProposal, s: &str) -> Result<Self, SdpError> {
        let (index, value) = s.split_once(' ').ok_or_else(|| {
            SdpError::InvalidAttributeLine(format!("invalid capability config: {}", s))
        })?;
        let index: u8 = index.parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!(
                "parse capability config index failed: {}, {}",
                index, err
            ))
        })?;
        let cap = value.strip_prefix("a=").ok_or_else(|| {
            SdpError::InvalidAttributeLine(format!("invalid capability config value: {}", s))
        })?;
        let cap: u8 = cap.parse().map_err(|err| {
            SdpError::InvalidAttributeLine(format!(
                "parse capability config cap failed: {}, {}",
                cap, err
            ))
        })?;
        Ok(Self {
            proposal,
            index,
            cap,
        })
    }
}

impl fmt::Display for CapabilityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} a={}", self.attribute_name(), self.index, self.cap)
    }
}
