pub mod builder;
pub mod reader;
#[cfg(test)]
mod test;

use std::fmt;

use sdp_formats::session::SessionDescription;

use crate::{
    consts::{common::CRLF_STR, status::RtspStatus, version::ProtocolVersion},
    header::{RtspHeader, RtspHeaders},
};

use builder::RtspResponseBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtspResponse {
    pub(crate) version: ProtocolVersion,
    pub(crate) status: RtspStatus,
    pub(crate) headers: RtspHeaders,
    pub(crate) body: Option<String>,
}

impl RtspResponse {
    pub fn builder() -> RtspResponseBuilder {
        RtspResponseBuilder::new()
    }

    pub fn status(&self) -> RtspStatus {
        self.status
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

    /// `200 OK` carrying a session description.
    pub fn describe_ok(version: ProtocolVersion, cseq: u32, sdp: &SessionDescription) -> Self {
        let body = sdp.to_string();
        Self::builder()
            .version(version)
            .status(RtspStatus::Ok)
            .header(RtspHeader::CSeq, cseq.to_string())
            .header(RtspHeader::ContentType, sdp_formats::SDP_MIMETYPE)
            .header(RtspHeader::ContentLength, body.len().to_string())
            .body(body)
            .build()
    }

    /// `200 OK` for OPTIONS, advertising the one method worth asking for.
    pub fn options_ok(version: ProtocolVersion, cseq: u32) -> Self {
        Self::builder()
            .version(version)
            .status(RtspStatus::Ok)
            .header(RtspHeader::CSeq, cseq.to_string())
            .header(RtspHeader::Public, "DESCRIBE")
            .build()
    }

    pub fn error(version: ProtocolVersion, status: RtspStatus, cseq: u32) -> Self {
        Self::builder()
            .version(version)
            .status(status)
            .header(RtspHeader::CSeq, cseq.to_string())
            .build()
    }
}

impl fmt::Display for RtspResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.version, self.status, CRLF_STR)?;
        write!(f, "{}{}", self.headers, CRLF_STR)?;
        if let Some(body) = &self.body {
            f.write_str(body)?;
        }
        Ok(())
    }
}
