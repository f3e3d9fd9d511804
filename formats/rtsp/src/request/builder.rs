use url::Url;

use crate::{
    consts::{methods::RequestMethod, version::ProtocolVersion},
    header::{RtspHeader, RtspHeaders},
};

use super::RtspRequest;

#[derive(Debug)]
pub struct RtspRequestBuilder {
    method: RequestMethod,
    uri: String,
    version: ProtocolVersion,
    headers: RtspHeaders,
    body: Option<String>,
}

impl RtspRequestBuilder {
    pub fn new() -> Self {
        Self {
            method: RequestMethod::Options,
            uri: "*".to_owned(),
            version: ProtocolVersion::RTSP_1_0,
            headers: RtspHeaders::new(),
            body: None,
        }
    }

    pub fn method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
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

    pub fn build(self) -> RtspRequest {
        RtspRequest {
            method: self.method,
            uri: self.uri,
            version: self.version,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RtspRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RtspRequest {
    /// The fixed description request sent by the describe client.
    pub fn describe(url: &Url) -> Self {
        Self::builder()
            .method(RequestMethod::Describe)
            .uri(url.as_str())
            .header(RtspHeader::CSeq, "1")
            .header(RtspHeader::Accept, sdp_formats::SDP_MIMETYPE)
            .build()
    }
}
