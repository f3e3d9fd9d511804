use std::{fmt, str::FromStr};

use crate::errors::SdpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtpKind {
    Ieee1588_2002,
    Ieee1588_2008,
    Ieee1588_2019,
    Ieee8021As2011,
}

impl PtpKind {
    /// Whether the wire form may carry a PTP domain suffix.
    pub fn has_domain(&self) -> bool {
        matches!(self, Self::Ieee1588_2008 | Self::Ieee1588_2019)
    }
}

impl FromStr for PtpKind {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IEEE1588-2002" => Ok(Self::Ieee1588_2002),
            "IEEE1588-2008" => Ok(Self::Ieee1588_2008),
            "IEEE1588-2019" => Ok(Self::Ieee1588_2019),
            "IEEE802.1AS-2011" => Ok(Self::Ieee8021As2011),
            _ => Err(SdpError::NotSupported(format!("unknown ptp type: {}", s))),
        }
    }
}

impl fmt::Display for PtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ieee1588_2002 => f.write_str("IEEE1588-2002"),
            Self::Ieee1588_2008 => f.write_str("IEEE1588-2008"),
            Self::Ieee1588_2019 => f.write_str("IEEE1588-2019"),
            Self::Ieee8021As2011 => f.write_str("IEEE802.1AS-2011"),
        }
    }
}

fn write_hex_octets(f: &mut fmt::Formatter<'_>, octets: &[u8]) -> fmt::Result {
    for (i, octet) in octets.iter().enumerate() {
        if i > 0 {
            f.write_str("-")?;
        }
        write!(f, "{:02X}", octet)?;
    }
    Ok(())
}

fn parse_hex_octets(text: &str, dst: &mut [u8]) -> Result<(), SdpError> {
    let mut count = 0;
    for (i, part) in text.split('-').enumerate() {
        if i >= dst.len() || part.len() != 2 {
            return Err(SdpError::SyntaxError(format!(
                "invalid hex octet string: {}",
                text
            )));
        }
        dst[i] = u8::from_str_radix(part, 16).map_err(|err| {
            SdpError::SyntaxError(format!("invalid hex octet: {}, {}", part, err))
        })?;
        count = i + 1;
    }
    if count != dst.len() {
        return Err(SdpError::SyntaxError(format!(
            "invalid hex octet string length: {}",
            text
        )));
    }
    Ok(())
}

/// Value part of `a=ts-refclk:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefClockSource {
    Ptp {
        kind: PtpKind,
        /// EUI-64 grandmaster identity
        gmid: [u8; 8],
        /// PTP domain, only valid for IEEE1588-2008/2019
        domain: Option<u8>,
    },
    PtpTraceable,
    LocalMac([u8; 6]),
}

impl FromStr for RefClockSource {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix("ptp=") {
            if value == "traceable" {
                return Ok(Self::PtpTraceable);
            }
            let mut parts = value.splitn(3, ':');
            let kind: PtpKind = parts
                .next()
                .ok_or_else(|| SdpError::SyntaxError(format!("empty ts-refclk: {}", s)))?
                .parse()?;
            let gmid_part = parts.next().ok_or_else(|| {
                SdpError::SyntaxError(format!("ts-refclk missing grandmaster id: {}", s))
            })?;
            let mut gmid = [0u8; 8];
            parse_hex_octets(gmid_part, &mut gmid)?;
            let domain = match parts.next() {
                None => None,
                Some(domain_part) => {
                    if !kind.has_domain() {
                        return Err(SdpError::SyntaxError(format!(
                            "ptp domain not allowed for {}: {}",
                            kind, s
                        )));
                    }
                    Some(domain_part.parse::<u8>().map_err(|err| {
                        SdpError::SyntaxError(format!(
                            "invalid ptp domain: {}, {}",
                            domain_part, err
                        ))
                    })?)
                }
            };
            Ok(Self::Ptp { kind, gmid, domain })
        } else if let Some(value) = s.strip_prefix("localmac=") {
            let mut mac = [0u8; 6];
            parse_hex_octets(value, &mut mac)?;
            Ok(Self::LocalMac(mac))
        } else {
            Err(SdpError::NotSupported(format!(
                "unknown ts-refclk form: {}",
                s
            )))
        }
    }
}

impl fmt::Display for RefClockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ptp { kind, gmid, domain } => {
                write!(f, "ptp={}:", kind)?;
                write_hex_octets(f, gmid)?;
                if let Some(domain) = domain
                    && kind.has_domain()
                {
                    write!(f, ":{}", domain)?;
                }
                Ok(())
            }
            Self::PtpTraceable => f.write_str("ptp=traceable"),
            Self::LocalMac(mac) => {
                f.write_str("localmac=")?;
                write_hex_octets(f, mac)
            }
        }
    }
}
