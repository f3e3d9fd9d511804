use std::{io, io::Cursor, net::SocketAddr};

use rtsp_formats::{
    consts::{common::{RTSP_DEFAULT_PORT, RX_BUFFER_SIZE}, status::RtspStatus},
    request::RtspRequest,
    response::RtspResponse,
};
use tokio::{io::AsyncWriteExt, net::TcpStream};
use tokio_util::bytes::{Bytes, BytesMut};
use url::Url;
use utils::traits::reader::TryReadFrom;

use crate::errors::{RtspServerError, RtspServerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeState {
    Idle,
    Querying,
    AwaitingResponse,
    Done,
}

/// Pulls one session description over unicast RTSP.
///
/// `start` connects and writes the DESCRIBE request; `process` consumes
/// whatever bytes are available without blocking and is re-entered until the
/// state reaches `Done`. Truncated, oversized or malformed responses finish
/// with empty content.
pub struct DescribeClient {
    state: DescribeState,
    stream: Option<TcpStream>,
    buffer: BytesMut,
    status: Option<RtspStatus>,
    content: Option<Bytes>,
}

impl DescribeClient {
    pub fn new() -> Self {
        Self {
            state: DescribeState::Idle,
            stream: None,
            buffer: BytesMut::new(),
            status: None,
            content: None,
        }
    }

    pub fn state(&self) -> DescribeState {
        self.state
    }

    pub fn status(&self) -> Option<RtspStatus> {
        self.status
    }

    /// The received description, when the exchange produced one.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub async fn start(&mut self, address: SocketAddr, url: &Url) -> RtspServerResult<()> {
        if matches!(
            self.state,
            DescribeState::Querying | DescribeState::AwaitingResponse
        ) {
            return Err(RtspServerError::InvalidRequest(
                "a describe exchange is already in flight".to_owned(),
            ));
        }
        self.state = DescribeState::Querying;
        self.buffer.clear();
        self.status = None;
        self.content = None;

        let mut stream = match TcpStream::connect(address).await {
            Ok(stream) => stream,
            Err(err) => {
                self.state = DescribeState::Done;
                return Err(err.into());
            }
        };
        let request = RtspRequest::describe(url);
        if let Err(err) = stream.write_all(request.to_string().as_bytes()).await {
            self.state = DescribeState::Done;
            return Err(err.into());
        }
        self.stream = Some(stream);
        self.state = DescribeState::AwaitingResponse;
        Ok(())
    }

    /// Abandons an in-flight exchange and discards the partial buffer.
    pub fn stop(&mut self) {
        self.stream = None;
        self.buffer.clear();
        self.state = DescribeState::Idle;
    }

    /// One non-blocking pass over the socket.
    pub fn process(&mut self) -> RtspServerResult<()> {
        if self.state != DescribeState::AwaitingResponse {
            return Ok(());
        }

        let mut chunk = [0u8; 2048];
        loop {
            let read = match self.stream.as_ref() {
                Some(stream) => stream.try_read(&mut chunk),
                None => {
                    self.finish(None);
                    return Ok(());
                }
            };
            match read {
                Ok(0) => {
                    // closed before the full response arrived
                    self.finish(None);
                    return Ok(());
                }
                Ok(read) => {
                    self.buffer.extend_from_slice(&chunk[..read]);
                    if self.buffer.len() > RX_BUFFER_SIZE {
                        tracing::debug!("describe response exceeds the receive buffer");
                        self.finish(None);
                        return Ok(());
                    }
                    if self.try_parse() {
                        return Ok(());
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => {
                    self.finish(None);
                    return Err(err.into());
                }
            }
        }
    }

    /// Waits until the socket has data for the next `process` call.
    pub async fn readable(&self) -> RtspServerResult<()> {
        match self.stream.as_ref() {
            Some(stream) => Ok(stream.readable().await?),
            None => Ok(()),
        }
    }

    fn try_parse(&mut self) -> bool {
        let mut cursor = Cursor::new(&self.buffer[..]);
        match RtspResponse::try_read_from(&mut cursor) {
            Ok(None) => false,
            Ok(Some(response)) => {
                self.status = Some(response.status());
                let content = match (response.status(), response.body()) {
                    (RtspStatus::Ok, Some(body)) if !body.is_empty() => {
                        Some(Bytes::copy_from_slice(body.as_bytes()))
                    }
                    _ => None,
                };
                self.finish(content);
                true
            }
            Err(err) => {
                tracing::debug!("describe response unusable: {}", err);
                self.finish(None);
                true
            }
        }
    }

    fn finish(&mut self, content: Option<Bytes>) {
        self.content = content;
        self.stream = None;
        self.state = DescribeState::Done;
    }
}

impl Default for DescribeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking-style convenience: runs a full describe exchange against
/// `address` and returns the description.
pub async fn describe(address: SocketAddr, url: &Url) -> RtspServerResult<Bytes> {
    let mut client = DescribeClient::new();
    client.start(address, url).await?;
    while client.state() == DescribeState::AwaitingResponse {
        client.readable().await?;
        client.process()?;
    }
    let status = client.status();
    match client.content {
        Some(content) => Ok(content),
        None => Err(RtspServerError::DescribeFailed(format!(
            "no description received from {} (status {:?})",
            address, status
        ))),
    }
}

/// Resolves an `rtsp://host[:port]/path` URL and describes it.
pub async fn describe_url(url: &str) -> RtspServerResult<Bytes> {
    let url: Url = url.parse()?;
    let host = url
        .host_str()
        .ok_or_else(|| RtspServerError::InvalidRequest(format!("url without host: {}", url)))?;
    let port = url.port().unwrap_or(RTSP_DEFAULT_PORT);
    let mut addresses = tokio::net::lookup_host((host, port)).await?;
    let Some(address) = addresses.next() else {
        return Err(RtspServerError::DescribeFailed(format!(
            "host {} does not resolve",
            host
        )));
    };
    describe(address, &url).await
}
