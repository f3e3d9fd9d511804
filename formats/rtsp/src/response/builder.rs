use crate::{
    consts::{status::RtspStatus, version::ProtocolVersion},
    header::{RtspHeader, RtspHeaders},
};

use super::RtspResponse;

#[derive(Debug)]
pub struct RtspResponseBuilder {
    version: ProtocolVersion,
    status: RtspStatus,
    headers: RtspHeaders,
    body: Option<String>,
}

impl RtspResponseBuilder {
    pub fn new() -> Self {
        Self {
            version: ProtocolVersion::RTSP_1_0,
            status: RtspStatus::Ok,
            headers: RtspHeaders::new(),
            body: None,
        }
    }

    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn status(mut self, status: RtspStatus) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, header: RtspHeader, value: impl Into<String>) -> Self {
        self.headers.push(header, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(self) -> RtspResponse {
        RtspResponse {
            version: self.version,
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RtspResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
