//! IPv4/IPv6 address-with-port model used across the announcement and
//! description services.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid address literal: {0}")]
    InvalidAddress(String),
    #[error("invalid port: {0}")]
    InvalidPort(String),
}

pub type NetResult<T> = Result<T, NetError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpBytes {
    V4([u8; 4]),
    V6([u8; 16]),
}

impl IpBytes {
    pub fn version(&self) -> IpVersion {
        match self {
            Self::V4(_) => IpVersion::V4,
            Self::V6(_) => IpVersion::V6,
        }
    }

    pub fn octets(&self) -> &[u8] {
        match self {
            Self::V4(bytes) => bytes,
            Self::V6(bytes) => bytes,
        }
    }

    pub fn is_multicast(&self) -> bool {
        match self {
            Self::V4(bytes) => bytes[0] & 0xf0 == 0xe0,
            Self::V6(bytes) => bytes[0] == 0xff,
        }
    }
}

/// Network address with an optional port, port 0 meaning "unset".
///
/// `PartialEq` (and `Hash`) cover version and address bytes only; use
/// [`NetworkAddress::eq_with_port`] when the port matters.
#[derive(Debug, Clone, Copy, Eq)]
pub struct NetworkAddress {
    pub ip: IpBytes,
    pub port: u16,
}

impl PartialEq for NetworkAddress {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip
    }
}

impl std::hash::Hash for NetworkAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
    }
}

impl NetworkAddress {
    pub fn new_v4(octets: [u8; 4], port: u16) -> Self {
        Self {
            ip: IpBytes::V4(octets),
            port,
        }
    }

    pub fn new_v6(octets: [u8; 16], port: u16) -> Self {
        Self {
            ip: IpBytes::V6(octets),
            port,
        }
    }

    pub fn version(&self) -> IpVersion {
        self.ip.version()
    }

    pub fn octets(&self) -> &[u8] {
        self.ip.octets()
    }

    /// Copies the raw address bytes into `dst`, returning the copied size.
    pub fn copy_octets_into(&self, dst: &mut [u8]) -> usize {
        let octets = self.octets();
        dst[..octets.len()].copy_from_slice(octets);
        octets.len()
    }

    pub fn is_multicast(&self) -> bool {
        self.ip.is_multicast()
    }

    pub fn eq_with_port(&self, other: &Self) -> bool {
        self.ip == other.ip && self.port == other.port
    }

    pub fn ip_addr(&self) -> IpAddr {
        match self.ip {
            IpBytes::V4(bytes) => IpAddr::V4(Ipv4Addr::from(bytes)),
            IpBytes::V6(bytes) => IpAddr::V6(Ipv6Addr::from(bytes)),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip_addr(), self.port)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl From<SocketAddr> for NetworkAddress {
    fn from(value: SocketAddr) -> Self {
        match value.ip() {
            IpAddr::V4(ip) => Self::new_v4(ip.octets(), value.port()),
            IpAddr::V6(ip) => Self::new_v6(ip.octets(), value.port()),
        }
    }
}

impl From<IpAddr> for NetworkAddress {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(ip) => Self::new_v4(ip.octets(), 0),
            IpAddr::V6(ip) => Self::new_v6(ip.octets(), 0),
        }
    }
}

fn parse_port(text: &str) -> NetResult<u16> {
    // u16::from_str tolerates a leading '+', the wire syntax does not
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NetError::InvalidPort(text.to_owned()));
    }
    match text.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Ok(port as u16),
        _ => Err(NetError::InvalidPort(text.to_owned())),
    }
}

impl FromStr for NetworkAddress {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix('[') {
            // bracketed IPv6, optionally followed by :port
            let (addr_part, tail) = rest
                .split_once(']')
                .ok_or_else(|| NetError::InvalidAddress(s.to_owned()))?;
            let ip: Ipv6Addr = addr_part
                .parse()
                .map_err(|_| NetError::InvalidAddress(s.to_owned()))?;
            let port = if tail.is_empty() {
                0
            } else {
                let port_part = tail
                    .strip_prefix(':')
                    .ok_or_else(|| NetError::InvalidAddress(s.to_owned()))?;
                parse_port(port_part)?
            };
            Ok(Self::new_v6(ip.octets(), port))
        } else if s.bytes().filter(|b| *b == b':').count() > 1 {
            // bare IPv6; a port would require brackets
            let ip: Ipv6Addr = s
                .parse()
                .map_err(|_| NetError::InvalidAddress(s.to_owned()))?;
            Ok(Self::new_v6(ip.octets(), 0))
        } else if let Some((host, port_part)) = s.split_once(':') {
            let ip: Ipv4Addr = host
                .parse()
                .map_err(|_| NetError::InvalidAddress(s.to_owned()))?;
            Ok(Self::new_v4(ip.octets(), parse_port(port_part)?))
        } else {
            let ip: Ipv4Addr = s
                .parse()
                .map_err(|_| NetError::InvalidAddress(s.to_owned()))?;
            Ok(Self::new_v4(ip.octets(), 0))
        }
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            IpBytes::V4(bytes) => {
                write!(f, "{}", Ipv4Addr::from(bytes))?;
                if self.port > 0 {
                    write!(f, ":{}", self.port)?;
                }
            }
            IpBytes::V6(bytes) => {
                if self.port > 0 {
                    write!(f, "[{}]:{}", Ipv6Addr::from(bytes), self.port)?;
                } else {
                    write!(f, "{}", Ipv6Addr::from(bytes))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_v4_with_port() {
        let addr: NetworkAddress = "192.168.2.138:9090".parse().unwrap();
        assert_eq!(addr.version(), IpVersion::V4);
        assert_eq!(addr.octets(), &[192, 168, 2, 138]);
        assert_eq!(addr.port, 9090);
    }

    #[test]
    fn test_parse_v6_bracketed_with_port() {
        let addr: NetworkAddress = "[FF02:0:0:0:0:0:2:7FFE]:9875".parse().unwrap();
        assert_eq!(addr.version(), IpVersion::V6);
        assert_eq!(
            addr.octets(),
            &[0xff, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0x7f, 0xfe]
        );
        assert_eq!(addr.port, 9875);
    }

    #[test]
    fn test_parse_v6_elision() {
        let addr: NetworkAddress = "FF02::2:7FFE".parse().unwrap();
        assert_eq!(
            addr.octets(),
            &[0xff, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0x7f, 0xfe]
        );
        assert_eq!(addr.port, 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in [
            "",
            " 10.0.0.1",
            "10.0.0.1 ",
            "10.0.0.256",
            "10.0.0",
            "10.0.0.1.2",
            "10.0.0.1:",
            "10.0.0.1:0",
            "10.0.0.1:65536",
            "10.0.0.1:+80",
            "FF02::2::7FFE",
            "FF02::2:7FFE:9875 ",
            // v6 with port must be bracketed
            "FF02::2:7FFE]:9875",
            "[FF02::2:7FFE:9875",
            "[FF02::2:7FFE]9875",
        ] {
            assert!(input.parse::<NetworkAddress>().is_err(), "{}", input);
        }
    }

    #[test]
    fn test_format_parse_round_trip() {
        for input in [
            "192.168.2.138:9090",
            "10.0.0.1",
            "224.2.127.254:9875",
            "[ff02::2:7ffe]:9875",
            "ff05::2:7ffe",
        ] {
            let addr: NetworkAddress = input.parse().unwrap();
            let text = addr.to_string();
            let reparsed: NetworkAddress = text.parse().unwrap();
            assert!(addr.eq_with_port(&reparsed), "{} -> {}", input, text);
        }
    }

    #[test]
    fn test_multicast_classification() {
        assert!("224.2.127.254".parse::<NetworkAddress>().unwrap().is_multicast());
        assert!("239.255.255.255".parse::<NetworkAddress>().unwrap().is_multicast());
        assert!(!"223.255.255.255".parse::<NetworkAddress>().unwrap().is_multicast());
        assert!(!"240.0.0.1".parse::<NetworkAddress>().unwrap().is_multicast());
        assert!("FF02::2:7FFE".parse::<NetworkAddress>().unwrap().is_multicast());
        assert!(!"FE80::1".parse::<NetworkAddress>().unwrap().is_multicast());
    }

    #[test]
    fn test_equality_ignores_port() {
        let a: NetworkAddress = "10.0.0.1:5000".parse().unwrap();
        let b: NetworkAddress = "10.0.0.1:6000".parse().unwrap();
        assert_eq!(a, b);
        assert!(!a.eq_with_port(&b));
    }
}
