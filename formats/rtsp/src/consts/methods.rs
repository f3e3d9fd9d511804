use std::{fmt, str::FromStr};

use crate::errors::RtspMessageError;

pub mod method_names {
    pub const OPTIONS: &str = "OPTIONS";
    pub const DESCRIBE: &str = "DESCRIBE";
    pub const GET: &str = "GET";
    pub const POST: &str = "POST";
    pub const PUT: &str = "PUT";
    pub const DELETE: &str = "DELETE";
}

/// Methods the description service understands. `Options` is legal for both
/// protocols, `Describe` is RTSP only, the rest arrive over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Options,
    Describe,
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn valid_for_rtsp(&self) -> bool {
        matches!(self, Self::Options | Self::Describe)
    }

    pub fn valid_for_http(&self) -> bool {
        !matches!(self, Self::Describe)
    }
}

impl From<&RequestMethod> for &'static str {
    fn from(value: &RequestMethod) -> Self {
        match value {
            RequestMethod::Options => method_names::OPTIONS,
            RequestMethod::Describe => method_names::DESCRIBE,
            RequestMethod::Get => method_names::GET,
            RequestMethod::Post => method_names::POST,
            RequestMethod::Put => method_names::PUT,
            RequestMethod::Delete => method_names::DELETE,
        }
    }
}

impl FromStr for RequestMethod {
    type Err = RtspMessageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            method_names::OPTIONS => Ok(Self::Options),
            method_names::DESCRIBE => Ok(Self::Describe),
            method_names::GET => Ok(Self::Get),
            method_names::POST => Ok(Self::Post),
            method_names::PUT => Ok(Self::Put),
            method_names::DELETE => Ok(Self::Delete),
            _ => Err(RtspMessageError::UnknownMethod(s.to_owned())),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str: &str = self.into();
        f.write_str(str)
    }
}
