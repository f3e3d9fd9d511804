//! In-memory model of an AES67 audio session description and its canonical
//! text form.
//!
//! The document mirrors the SDP text structure: session-wide fields plus an
//! ordered list of streams. Encodings, reference clocks and connections live
//! in flat tables tagged with the level they apply to (session-wide or one
//! stream), which keeps the encoding-to-stream binding explicit.

use std::{cmp::Ordering, fmt, io, str::FromStr};

use itertools::Itertools;
use url::Url;
use utils::traits::reader::ReadFrom;

use crate::{
    CRLF, TOOL_NAME,
    attributes::{
        CapabilityConfig, MediaClock, PtimeCapability, media_direction::MediaDirection,
        ptime::PtimeText, refclk::RefClockSource, rtpmap::RtpMap,
    },
    errors::{SdpError, SdpResult},
    reader::SessionReader,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    #[default]
    V4,
    V6,
}

impl FromStr for IpFamily {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IP4" => Ok(Self::V4),
            "IP6" => Ok(Self::V6),
            _ => Err(SdpError::SyntaxError(format!(
                "unknown address family: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IP4"),
            Self::V6 => f.write_str("IP6"),
        }
    }
}

/// Where a tagged table entry applies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    #[default]
    Session,
    Stream(usize),
}

/// `o=` line. Session id and version are kept as the decimal strings that
/// appear on the wire; AES67 originators generate NTP-sized numbers that do
/// not fit comfortably in 32-bit hosts, and ordering only ever needs the
/// numeric-string comparison of [`Originator::cmp_version`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Originator {
    pub username: String,
    pub session_id: String,
    pub session_version: String,
    pub family: IpFamily,
    pub address: String,
}

impl Originator {
    /// Identity comparison, ignoring the session version.
    pub fn identity_eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.session_id == other.session_id
            && self.family == other.family
            && self.address == other.address
    }

    /// Orders two numeric-string session versions: shorter strings are older,
    /// equal-length strings compare bytewise.
    pub fn cmp_version(&self, other: &Self) -> Ordering {
        match self.session_version.len().cmp(&other.session_version.len()) {
            Ordering::Equal => self
                .session_version
                .as_bytes()
                .cmp(other.session_version.as_bytes()),
            ordering => ordering,
        }
    }
}

impl fmt::Display for Originator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "o={} {} {} IN {} {}{}",
            if self.username.is_empty() {
                "-"
            } else {
                &self.username
            },
            self.session_id,
            self.session_version,
            self.family,
            self.address,
            CRLF
        )
    }
}

/// `c=` line. For IPv4 the suffix is `/<ttl>[/<naddr>]`, for IPv6 `/<naddr>`;
/// naddr 0 means a single address and is not written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Connection {
    pub level: Level,
    pub family: IpFamily,
    pub address: String,
    pub ttl: Option<u8>,
    pub naddr: u8,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c=IN {} {}", self.family, self.address)?;
        if let Some(ttl) = self.ttl {
            write!(f, "/{}", ttl)?;
        }
        if self.naddr > 0 {
            write!(f, "/{}", self.naddr)?;
        }
        write!(f, "{}", CRLF)
    }
}

/// One row of the encoding table; `level` binds the row to its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub level: Level,
    pub rtpmap: RtpMap,
}

/// One row of the reference clock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefClock {
    pub level: Level,
    pub source: RefClockSource,
}

/// One `m=audio` block and its stream-level attributes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stream {
    pub port: u16,
    pub nports: Option<u16>,
    /// Payload type numbers as listed on the `m=` line, in order.
    pub payload_types: Vec<u8>,
    pub info: Option<String>,
    pub mode: Option<MediaDirection>,
    /// Packet time in microseconds.
    pub ptime_us: Option<u16>,
    pub maxptime_us: Option<u16>,
    pub ptime_caps: Vec<PtimeCapability>,
    pub cap_cfg: Option<CapabilityConfig>,
    pub mediaclk: Option<MediaClock>,
    pub sync_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionDescription {
    pub originator: Originator,
    /// `s=` value; an empty name is written as a single space.
    pub name: String,
    pub info: Option<String>,
    pub uri: Option<Url>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Written as `a=tool:`; defaults to [`TOOL_NAME`].
    pub tool: String,
    pub charset: Option<String>,
    pub mode: Option<MediaDirection>,
    /// 7-bit PTP domain carried as `a=clock-domain:PTPv2 <d>`.
    pub ptp_domain: Option<u8>,
    pub mediaclk: Option<MediaClock>,
    pub sync_time: Option<u32>,
    pub connections: Vec<Connection>,
    pub streams: Vec<Stream>,
    pub encodings: Vec<Encoding>,
    pub refclks: Vec<RefClock>,
}

impl Default for SessionDescription {
    fn default() -> Self {
        Self {
            originator: Default::default(),
            name: String::new(),
            info: None,
            uri: None,
            email: None,
            phone: None,
            tool: TOOL_NAME.to_owned(),
            charset: None,
            mode: None,
            ptp_domain: None,
            mediaclk: None,
            sync_time: None,
            connections: Vec::new(),
            streams: Vec::new(),
            encodings: Vec::new(),
            refclks: Vec::new(),
        }
    }
}

impl SessionDescription {
    pub fn reader() -> SessionReader<'static> {
        SessionReader::new()
    }

    pub fn connections_at(&self, level: Level) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.level == level)
    }

    pub fn encodings_for_stream(&self, stream: usize) -> impl Iterator<Item = &Encoding> {
        self.encodings
            .iter()
            .filter(move |e| e.level == Level::Stream(stream))
    }

    pub fn refclks_at(&self, level: Level) -> impl Iterator<Item = &RefClock> {
        self.refclks.iter().filter(move |r| r.level == level)
    }

    /// Number of encoding-table rows bound to the given stream.
    pub fn stream_encoding_count(&self, stream: usize) -> usize {
        self.encodings_for_stream(stream).count()
    }

    /// The effective connection for a stream: its own first `c=`, else the
    /// session-level one.
    pub fn effective_connection(&self, stream: usize) -> Option<&Connection> {
        self.connections_at(Level::Stream(stream))
            .next()
            .or_else(|| self.connections_at(Level::Session).next())
    }

    /// A stream describes usable AES67 audio iff it has at least one encoding
    /// with a positive sample rate and channel count, and a positive ptime.
    pub fn is_valid_aes67_audio(&self, stream: usize) -> bool {
        let Some(stream_desc) = self.streams.get(stream) else {
            return false;
        };
        if stream_desc.ptime_us.unwrap_or(0) == 0 {
            return false;
        }
        self.encodings_for_stream(stream)
            .any(|e| e.rtpmap.sample_rate > 0 && e.rtpmap.channels > 0)
    }

    /// Structural checks over the tagged tables: every tag references an
    /// existing stream and every payload type listed on an `m=` line is
    /// backed by an encoding row.
    pub fn validate(&self) -> SdpResult<()> {
        let in_range = |level: &Level| match level {
            Level::Session => true,
            Level::Stream(i) => *i < self.streams.len(),
        };
        if let Some(bad) = self
            .connections
            .iter()
            .map(|c| &c.level)
            .chain(self.encodings.iter().map(|e| &e.level))
            .chain(self.refclks.iter().map(|r| &r.level))
            .find(|level| !in_range(level))
        {
            return Err(SdpError::InvalidPayload(format!(
                "table entry references missing stream: {:?}",
                bad
            )));
        }
        for (i, stream) in self.streams.iter().enumerate() {
            if let Some(duplicate) = stream.payload_types.iter().duplicates().next() {
                return Err(SdpError::InvalidPayload(format!(
                    "stream {} lists payload type {} twice",
                    i, duplicate
                )));
            }
            for pt in &stream.payload_types {
                if !self
                    .encodings_for_stream(i)
                    .any(|e| e.rtpmap.payload_type == *pt)
                {
                    return Err(SdpError::InvalidPayload(format!(
                        "stream {} lists payload type {} without an encoding",
                        i, pt
                    )));
                }
            }
        }
        Ok(())
    }

    /// Renders into a caller-supplied buffer; refuses to truncate.
    pub fn write_bounded(&self, buf: &mut [u8]) -> SdpResult<usize> {
        let text = self.to_string();
        let bytes = text.as_bytes();
        if bytes.len() > buf.len() {
            return Err(SdpError::CapacityExceeded(format!(
                "document needs {} bytes, buffer holds {}",
                bytes.len(),
                buf.len()
            )));
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    /// The `o=` line alone, the payload of a session deletion announcement.
    pub fn origin_line(&self) -> String {
        self.originator.to_string()
    }
}

impl<R: io::BufRead> ReadFrom<R> for SessionDescription {
    type Error = SdpError;
    fn read_from(mut reader: R) -> Result<Self, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::reader().read_from(&text)
    }
}

impl FromStr for SessionDescription {
    type Err = SdpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::reader().read_from(s)
    }
}

fn write_level_attributes(
    f: &mut fmt::Formatter<'_>,
    doc: &SessionDescription,
    level: Level,
    mediaclk: Option<&MediaClock>,
    sync_time: Option<u32>,
) -> fmt::Result {
    for refclk in doc.refclks_at(level) {
        write!(f, "a=ts-refclk:{}{}", refclk.source, CRLF)?;
    }
    if let Some(mediaclk) = mediaclk {
        write!(f, "a=mediaclk:{}{}", mediaclk, CRLF)?;
    }
    if let Some(sync_time) = sync_time {
        write!(f, "a=sync-time:{}{}", sync_time, CRLF)?;
    }
    Ok(())
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v=0{}", CRLF)?;
        write!(f, "{}", self.originator)?;
        if self.name.is_empty() {
            write!(f, "s= {}", CRLF)?;
        } else {
            write!(f, "s={}{}", self.name, CRLF)?;
        }
        if let Some(info) = &self.info {
            write!(f, "i={}{}", info, CRLF)?;
        }
        self.connections_at(Level::Session)
            .try_for_each(|c| write!(f, "{}", c))?;
        write!(f, "t=0 0{}", CRLF)?;
        if !self.tool.is_empty() {
            write!(f, "a=tool:{}{}", self.tool, CRLF)?;
        }
        if let Some(charset) = &self.charset {
            write!(f, "a=charset:{}{}", charset, CRLF)?;
        }
        if let Some(uri) = &self.uri {
            write!(f, "u={}{}", uri, CRLF)?;
        }
        if let Some(email) = &self.email {
            write!(f, "e={}{}", email, CRLF)?;
        }
        if let Some(phone) = &self.phone {
            write!(f, "p={}{}", phone, CRLF)?;
        }
        if let Some(mode) = &self.mode {
            write!(f, "a={}{}", mode, CRLF)?;
        }
        if let Some(domain) = self.ptp_domain {
            write!(f, "a=clock-domain:PTPv2 {}{}", domain, CRLF)?;
        }
        write_level_attributes(
            f,
            self,
            Level::Session,
            self.mediaclk.as_ref(),
            self.sync_time,
        )?;

        for (i, stream) in self.streams.iter().enumerate() {
            write!(f, "m=audio {}", stream.port)?;
            if let Some(nports) = stream.nports {
                write!(f, "/{}", nports)?;
            }
            write!(f, " RTP/AVP")?;
            stream
                .payload_types
                .iter()
                .try_for_each(|pt| write!(f, " {}", pt))?;
            write!(f, "{}", CRLF)?;

            if let Some(info) = &stream.info {
                write!(f, "i={}{}", info, CRLF)?;
            }
            if let Some(mode) = &stream.mode {
                write!(f, "a={}{}", mode, CRLF)?;
            }
            for encoding in self.encodings_for_stream(i) {
                write!(f, "a=rtpmap:{}{}", encoding.rtpmap, CRLF)?;
            }
            if let Some(ptime) = stream.ptime_us {
                write!(f, "a=ptime:{}{}", PtimeText(ptime), CRLF)?;
            }
            for cap in &stream.ptime_caps {
                write!(f, "a=pcap:{}{}", cap, CRLF)?;
            }
            if let Some(maxptime) = stream.maxptime_us {
                write!(f, "a=maxptime:{}{}", PtimeText(maxptime), CRLF)?;
            }
            if let Some(cfg) = &stream.cap_cfg {
                write!(f, "a={}{}", cfg, CRLF)?;
            }
            self.connections_at(Level::Stream(i))
                .try_for_each(|c| write!(f, "{}", c))?;
            write_level_attributes(
                f,
                self,
                Level::Stream(i),
                stream.mediaclk.as_ref(),
                stream.sync_time,
            )?;
        }
        Ok(())
    }
}
