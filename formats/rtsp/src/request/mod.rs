pub mod builder;
pub mod reader;
#[cfg(test)]
mod test;

use std::fmt;

use crate::{
    consts::{common::CRLF_STR, methods::RequestMethod, version::ProtocolVersion},
    header::RtspHeaders,
};

use builder::RtspRequestBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtspRequest {
    pub(crate) method: RequestMethod,
    pub(crate) uri: String,
    pub(crate) version: ProtocolVersion,
    pub(crate) headers: RtspHeaders,
    pub(crate) body: Option<String>,
}

impl RtspRequest {
    pub fn builder() -> RtspRequestBuilder {
        RtspRequestBuilder::new()
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The resource path: an absolute `rtsp://host[:port]/...` URI is
    /// reduced to the part after the authority.
    pub fn path(&self) -> &str {
        let Some(rest) = self.uri.strip_prefix("rtsp://") else {
            return &self.uri;
        };
        match rest.find('/') {
            Some(index) => &rest[index..],
            None => "/",
        }
    }

    pub fn version(&self) -> &ProtocolVersion {
        &self.version
    }

    pub fn headers(&self) -> &RtspHeaders {
        &self.headers
    }

    pub fn body(&self) -> Option<&String> {
        self.body.as_ref()
    }
}

impl fmt::Display for RtspRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{}",
            self.method, self.uri, self.version, CRLF_STR
        )?;
        write!(f, "{}{}", self.headers, CRLF_STR)?;
        if let Some(body) = &self.body {
            f.write_str(body)?;
        }
        Ok(())
    }
}
