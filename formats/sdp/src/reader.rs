use crate::{
    attributes::{
        CapabilityConfig, CapabilityProposal, MediaClock, media_direction::MediaDirection,
        ptime::parse_ptime_us,
    },
    errors::{SdpError, SdpResult},
    limits,
    session::{Connection, Encoding, IpFamily, Level, RefClock, SessionDescription, Stream},
};
use url::Url;

/// Callback invoked for every recognized-but-unmodeled or foreign line,
/// together with the context it appeared in.
pub type UnhandledLineHandler<'a> = Box<dyn FnMut(&str, Level) + 'a>;

/// Line-oriented reader for AES67 session descriptions.
///
/// Accepts CRLF or bare LF terminated lines. The mandatory `v=`/`o=`/`s=`
/// prologue is enforced; after that, recognized lines are consumed in any
/// order while unrecognized ones are handed to the unhandled-line callback
/// and parsing continues. `m=` block order and the encoding-to-stream
/// binding are preserved.
#[derive(Default)]
pub struct SessionReader<'a> {
    doc: SessionDescription,
    ctx: Level,
    unhandled: Option<UnhandledLineHandler<'a>>,
}

fn bounded(value: &str, max: usize, what: &str) -> SdpResult<String> {
    if value.len() > max {
        return Err(SdpError::CapacityExceeded(format!(
            "{} longer than {} bytes",
            what, max
        )));
    }
    Ok(value.to_owned())
}

fn check_table<T>(table: &[T], max: usize, what: &str) -> SdpResult<()> {
    if table.len() >= max {
        return Err(SdpError::CapacityExceeded(format!("{} table full", what)));
    }
    Ok(())
}

impl<'a> SessionReader<'a> {
    pub fn new() -> Self {
        Self {
            doc: Default::default(),
            ctx: Level::Session,
            unhandled: None,
        }
    }

    pub fn on_unhandled_line(mut self, handler: UnhandledLineHandler<'a>) -> Self {
        self.unhandled = Some(handler);
        self
    }

    pub fn read_from(mut self, text: &str) -> SdpResult<SessionDescription> {
        if text.is_empty() {
            return Err(SdpError::Incomplete("payload is empty".to_owned()));
        }
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 3 {
            return Err(SdpError::Incomplete(format!(
                "document ends after {} lines",
                lines.len()
            )));
        }

        self.read_version_line(lines[0])?;
        self.read_origin_line(lines[1])?;
        self.read_name_line(lines[2])?;

        for line in &lines[3..] {
            self.read_line(line)?;
        }
        Ok(self.doc)
    }

    fn dispatch_unhandled(&mut self, line: &str) {
        let ctx = self.ctx;
        if let Some(handler) = self.unhandled.as_mut() {
            handler(line, ctx);
        } else {
            tracing::debug!("skipping unhandled sdp line in {:?} context: {}", ctx, line);
        }
    }

    fn split(line: &str) -> SdpResult<(u8, &str)> {
        let bytes = line.as_bytes();
        if bytes.len() < 2 || bytes[1] != b'=' {
            return Err(SdpError::SyntaxError(format!("invalid line: {}", line)));
        }
        Ok((bytes[0], &line[2..]))
    }

    fn read_version_line(&mut self, line: &str) -> SdpResult<()> {
        let (key, value) = Self::split(line)?;
        if key != b'v' {
            return Err(SdpError::SyntaxError(format!(
                "expected version line, got: {}",
                line
            )));
        }
        if value != "0" {
            return Err(SdpError::NotSupported(format!(
                "unsupported sdp version: {}",
                value
            )));
        }
        Ok(())
    }

    fn read_origin_line(&mut self, line: &str) -> SdpResult<()> {
        let (key, value) = Self::split(line)?;
        if key != b'o' {
            return Err(SdpError::SyntaxError(format!(
                "expected origin line, got: {}",
                line
            )));
        }
        let fields: Vec<&str> = value.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(SdpError::SyntaxError(format!(
                "invalid origin line, fields count is not 6: {}",
                line
            )));
        }
        if fields[3] != "IN" {
            return Err(SdpError::SyntaxError(format!(
                "unknown origin network type: {}",
                fields[3]
            )));
        }
        self.doc.originator.username = if fields[0] == "-" {
            String::new()
        } else {
            bounded(fields[0], limits::MAX_USERNAME, "origin username")?
        };
        self.doc.originator.session_id =
            bounded(fields[1], limits::MAX_SESSION_ID, "origin session id")?;
        self.doc.originator.session_version = bounded(
            fields[2],
            limits::MAX_SESSION_VERSION,
            "origin session version",
        )?;
        self.doc.originator.family = fields[4].parse()?;
        self.doc.originator.address = bounded(fields[5], limits::MAX_ADDRESS, "origin address")?;
        Ok(())
    }

    fn read_name_line(&mut self, line: &str) -> SdpResult<()> {
        let (key, value) = Self::split(line)?;
        if key != b's' {
            return Err(SdpError::SyntaxError(format!(
                "expected session name line, got: {}",
                line
            )));
        }
        self.doc.name = if value.trim().is_empty() {
            String::new()
        } else {
            bounded(value, limits::MAX_SESSION_NAME, "session name")?
        };
        Ok(())
    }

    fn read_line(&mut self, line: &str) -> SdpResult<()> {
        let (key, value) = Self::split(line)?;
        match key {
            b'i' => {
                let info = Some(bounded(value, limits::MAX_SESSION_INFO, "information")?);
                match self.ctx {
                    Level::Session => self.doc.info = info,
                    Level::Stream(i) => self.doc.streams[i].info = info,
                }
            }
            b'c' => self.read_connection(line, value)?,
            // timing is fixed at "t=0 0" for announced sessions
            b't' => {}
            b'u' => match self.ctx {
                Level::Session => self.doc.uri = Some(Url::parse(value)?),
                Level::Stream(_) => self.dispatch_unhandled(line),
            },
            b'e' => match self.ctx {
                Level::Session => {
                    self.doc.email = Some(bounded(value, limits::MAX_SESSION_INFO, "email")?)
                }
                Level::Stream(_) => self.dispatch_unhandled(line),
            },
            b'p' => match self.ctx {
                Level::Session => {
                    self.doc.phone = Some(bounded(value, limits::MAX_SESSION_INFO, "phone")?)
                }
                Level::Stream(_) => self.dispatch_unhandled(line),
            },
            b'a' => self.read_attribute(line, value)?,
            b'm' => self.read_media_line(value)?,
            b'v' | b'o' | b's' => {
                return Err(SdpError::SyntaxError(format!(
                    "unexpected repeated line: {}",
                    line
                )));
            }
            _ => self.dispatch_unhandled(line),
        }
        Ok(())
    }

    fn read_connection(&mut self, line: &str, value: &str) -> SdpResult<()> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(SdpError::SyntaxError(format!(
                "invalid connection line: {}",
                line
            )));
        }
        if fields[0] != "IN" {
            return Err(SdpError::SyntaxError(format!(
                "unknown connection network type: {}",
                fields[0]
            )));
        }
        let family: IpFamily = fields[1].parse()?;
        let address_fields: Vec<&str> = fields[2].split('/').collect();
        let mut connection = Connection {
            level: self.ctx,
            family,
            address: bounded(address_fields[0], limits::MAX_ADDRESS, "connection address")?,
            ttl: None,
            naddr: 0,
        };
        let parse_u8 = |text: &str, what: &str| {
            text.parse::<u8>().map_err(|err| {
                SdpError::SyntaxError(format!("invalid connection {}: {}, {}", what, text, err))
            })
        };
        match (family, address_fields.len()) {
            (_, 1) => {}
            (IpFamily::V4, 2) => connection.ttl = Some(parse_u8(address_fields[1], "ttl")?),
            (IpFamily::V4, 3) => {
                connection.ttl = Some(parse_u8(address_fields[1], "ttl")?);
                connection.naddr = parse_u8(address_fields[2], "address count")?;
            }
            (IpFamily::V6, 2) => connection.naddr = parse_u8(address_fields[1], "address count")?,
            _ => {
                return Err(SdpError::SyntaxError(format!(
                    "invalid connection address field: {}",
                    fields[2]
                )));
            }
        }
        check_table(&self.doc.connections, limits::MAX_CONNECTIONS, "connection")?;
        self.doc.connections.push(connection);
        Ok(())
    }

    fn read_media_line(&mut self, value: &str) -> SdpResult<()> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(SdpError::SyntaxError(format!(
                "invalid media line: m={}",
                value
            )));
        }
        if fields[0] != "audio" {
            return Err(SdpError::NotSupported(format!(
                "unsupported media type: {}",
                fields[0]
            )));
        }
        if fields[2] != "RTP/AVP" {
            return Err(SdpError::NotSupported(format!(
                "unsupported transport profile: {}",
                fields[2]
            )));
        }
        let (port, nports) = match fields[1].split_once('/') {
            None => (fields[1], None),
            Some((port, nports)) => (port, Some(nports)),
        };
        let port: u16 = port.parse().map_err(|err| {
            SdpError::SyntaxError(format!("invalid media port: {}, {}", fields[1], err))
        })?;
        let nports: Option<u16> = match nports {
            None => None,
            Some(text) => Some(text.parse().map_err(|err| {
                SdpError::SyntaxError(format!("invalid media port count: {}, {}", text, err))
            })?),
        };
        let mut payload_types = Vec::with_capacity(fields.len() - 3);
        for pt in &fields[3..] {
            let pt: u32 = pt.parse().map_err(|err| {
                SdpError::SyntaxError(format!("invalid payload type: {}, {}", pt, err))
            })?;
            if pt > 127 {
                return Err(SdpError::NotSupported(format!(
                    "payload type out of range: {}",
                    pt
                )));
            }
            payload_types.push(pt as u8);
        }
        check_table(&self.doc.streams, limits::MAX_STREAMS, "stream")?;
        self.doc.streams.push(Stream {
            port,
            nports,
            payload_types,
            ..Default::default()
        });
        self.ctx = Level::Stream(self.doc.streams.len() - 1);
        Ok(())
    }

    fn read_attribute(&mut self, line: &str, value: &str) -> SdpResult<()> {
        let (key, attr_value) = value.split_once(':').unwrap_or((value, ""));
        match (key, self.ctx) {
            ("recvonly", _) => self.set_mode(MediaDirection::RecvOnly),
            ("sendonly", _) => self.set_mode(MediaDirection::SendOnly),
            ("sendrecv", _) => self.set_mode(MediaDirection::SendRecv),
            ("inactive", _) => self.set_mode(MediaDirection::Inactive),
            ("tool", Level::Session) => {
                self.doc.tool = bounded(attr_value, limits::MAX_USERNAME, "tool")?;
            }
            ("charset", Level::Session) => {
                self.doc.charset = Some(bounded(attr_value, limits::MAX_USERNAME, "charset")?);
            }
            ("clock-domain" | "ptp-domain", Level::Session) => {
                let domain = attr_value.strip_prefix("PTPv2 ").ok_or_else(|| {
                    SdpError::SyntaxError(format!("invalid clock domain: {}", attr_value))
                })?;
                let domain: u8 = domain.parse().map_err(|err| {
                    SdpError::SyntaxError(format!("invalid clock domain: {}, {}", attr_value, err))
                })?;
                if domain > 127 {
                    return Err(SdpError::SyntaxError(format!(
                        "clock domain out of range: {}",
                        domain
                    )));
                }
                self.doc.ptp_domain = Some(domain);
            }
            ("rtpmap", Level::Stream(_)) => {
                check_table(&self.doc.encodings, limits::MAX_ENCODINGS, "encoding")?;
                self.doc.encodings.push(Encoding {
                    level: self.ctx,
                    rtpmap: attr_value.parse()?,
                });
            }
            ("ptime", Level::Stream(i)) => {
                self.doc.streams[i].ptime_us = Some(parse_ptime_us(attr_value)?);
            }
            ("maxptime", Level::Stream(i)) => {
                self.doc.streams[i].maxptime_us = Some(parse_ptime_us(attr_value)?);
            }
            ("pcap", Level::Stream(i)) => {
                check_table(
                    &self.doc.streams[i].ptime_caps,
                    limits::MAX_PTIME_CAPS,
                    "ptime capability",
                )?;
                let cap = attr_value.parse()?;
                self.doc.streams[i].ptime_caps.push(cap);
            }
            ("pcfg", Level::Stream(i)) => {
                self.doc.streams[i].cap_cfg = Some(CapabilityConfig::parse(
                    CapabilityProposal::Proposed,
                    attr_value,
                )?);
            }
            ("acfg", Level::Stream(i)) => {
                self.doc.streams[i].cap_cfg = Some(CapabilityConfig::parse(
                    CapabilityProposal::Active,
                    attr_value,
                )?);
            }
            ("ts-refclk", _) => {
                check_table(&self.doc.refclks, limits::MAX_REFCLKS, "reference clock")?;
                self.doc.refclks.push(RefClock {
                    level: self.ctx,
                    source: attr_value.parse()?,
                });
            }
            ("mediaclk", _) => {
                let mediaclk: MediaClock = attr_value.parse()?;
                match self.ctx {
                    Level::Session => self.doc.mediaclk = Some(mediaclk),
                    Level::Stream(i) => self.doc.streams[i].mediaclk = Some(mediaclk),
                }
            }
            ("sync-time", _) => {
                let sync_time: u32 = attr_value.parse().map_err(|err| {
                    SdpError::SyntaxError(format!("invalid sync-time: {}, {}", attr_value, err))
                })?;
                match self.ctx {
                    Level::Session => self.doc.sync_time = Some(sync_time),
                    Level::Stream(i) => self.doc.streams[i].sync_time = Some(sync_time),
                }
            }
            _ => self.dispatch_unhandled(line),
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: MediaDirection) {
        match self.ctx {
            Level::Session => self.doc.mode = Some(mode),
            Level::Stream(i) => self.doc.streams[i].mode = Some(mode),
        }
    }
}
