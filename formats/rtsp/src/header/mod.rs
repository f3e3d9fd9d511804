pub mod header_names;

use std::fmt;

use crate::consts::common::CRLF_STR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtspHeader {
    Accept,
    CSeq,
    ContentLength,
    ContentType,
    Public,
    Server,
}

impl RtspHeader {
    /// Case-insensitive match of a wire header name; `None` for headers the
    /// description service does not interpret.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case(header_names::ACCEPT) {
            Some(Self::Accept)
        } else if name.eq_ignore_ascii_case(header_names::C_SEQ) {
            Some(Self::CSeq)
        } else if name.eq_ignore_ascii_case(header_names::CONTENT_LENGTH) {
            Some(Self::ContentLength)
        } else if name.eq_ignore_ascii_case(header_names::CONTENT_TYPE) {
            Some(Self::ContentType)
        } else if name.eq_ignore_ascii_case(header_names::PUBLIC) {
            Some(Self::Public)
        } else if name.eq_ignore_ascii_case(header_names::SERVER) {
            Some(Self::Server)
        } else {
            None
        }
    }
}

impl From<&RtspHeader> for &'static str {
    fn from(value: &RtspHeader) -> Self {
        match value {
            RtspHeader::Accept => header_names::ACCEPT,
            RtspHeader::CSeq => header_names::C_SEQ,
            RtspHeader::ContentLength => header_names::CONTENT_LENGTH,
            RtspHeader::ContentType => header_names::CONTENT_TYPE,
            RtspHeader::Public => header_names::PUBLIC,
            RtspHeader::Server => header_names::SERVER,
        }
    }
}

impl fmt::Display for RtspHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str: &str = self.into();
        f.write_str(str)
    }
}

/// Interpreted headers of one message, in insertion order. Headers the
/// service does not model are dropped by the readers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RtspHeaders {
    entries: Vec<(RtspHeader, String)>,
}

impl RtspHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: RtspHeader, value: impl Into<String>) {
        self.entries.push((header, value.into()));
    }

    pub fn get(&self, header: RtspHeader) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, header: RtspHeader) -> bool {
        self.get(header).is_some()
    }

    pub fn cseq(&self) -> Option<u32> {
        self.get(RtspHeader::CSeq)?.trim().parse().ok()
    }

    pub fn content_length(&self) -> Option<usize> {
        self.get(RtspHeader::ContentLength)?.trim().parse().ok()
    }
}

impl fmt::Display for RtspHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entries
            .iter()
            .try_for_each(|(name, value)| write!(f, "{}: {}{}", name, value, CRLF_STR))
    }
}
