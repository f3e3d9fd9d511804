use std::{io::Cursor, sync::Arc};

use rtsp_formats::{
    consts::{
        common::RX_BUFFER_SIZE, methods::RequestMethod, status::RtspStatus,
        version::ProtocolVersion,
    },
    request::RtspRequest,
    response::RtspResponse,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::{Mutex, RwLock},
};
use tokio_util::bytes::{Buf, BytesMut};
use utils::traits::reader::TryReadFrom;

use crate::{
    config::RtspServerConfig, errors::RtspServerResult, resource::ResourceDirectory,
};

/// Reply produced by an [`HttpHandler`]; `None` from the handler closes the
/// connection without a response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub reason: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

pub trait HttpHandler: Send {
    fn handle(
        &mut self,
        method: RequestMethod,
        path: &str,
        body: Option<&str>,
    ) -> Option<HttpResponse>;
}

/// Unicast description service: one listener, one connection served at a
/// time, one request per connection. DESCRIBE answers from the resource
/// directory; OPTIONS advertises it; HTTP is delegated to the registered
/// handler when enabled.
pub struct RtspDescribeServer {
    config: RtspServerConfig,
    listener: TcpListener,
    resources: Arc<RwLock<ResourceDirectory>>,
    http_handler: Option<Mutex<Box<dyn HttpHandler>>>,
}

impl RtspDescribeServer {
    pub async fn start(config: RtspServerConfig) -> RtspServerResult<Self> {
        let listener = TcpListener::bind((config.address, config.port)).await?;
        tracing::info!("describe server is listening on {}", listener.local_addr()?);
        Ok(Self {
            config,
            listener,
            resources: Arc::new(RwLock::new(ResourceDirectory::new())),
            http_handler: None,
        })
    }

    pub fn with_http_handler(mut self, handler: Box<dyn HttpHandler>) -> Self {
        self.http_handler = Some(Mutex::new(handler));
        self
    }

    /// Shared handle for registering resources while the server runs.
    pub fn resources(&self) -> Arc<RwLock<ResourceDirectory>> {
        self.resources.clone()
    }

    pub fn local_addr(&self) -> RtspServerResult<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(&self) -> RtspServerResult<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            tracing::info!("got new describe connection, peer addr: {}", addr);
            match self.serve_connection(stream).await {
                Ok(()) => tracing::debug!("describe connection closed, peer addr: {}", addr),
                Err(err) => tracing::error!("describe connection failed: {}", err),
            }
        }
    }

    async fn serve_connection(&self, mut stream: TcpStream) -> RtspServerResult<()> {
        let mut buffer = BytesMut::with_capacity(RX_BUFFER_SIZE);
        loop {
            let parsed = {
                let mut cursor = Cursor::new(&buffer[..]);
                match RtspRequest::try_read_from(&mut cursor) {
                    Ok(Some(request)) => Some((request, cursor.position() as usize)),
                    Ok(None) => None,
                    Err(err) => {
                        // ceiling overflow or garbage: close without response
                        tracing::debug!("closing connection on unusable request: {}", err);
                        return Ok(());
                    }
                }
            };

            if let Some((request, consumed)) = parsed {
                buffer.advance(consumed);
                tracing::debug!("handling {} {}", request.method(), request.uri());
                return match self.respond(&request).await? {
                    Some(wire) => {
                        stream.write_all(&wire).await?;
                        stream.shutdown().await.ok();
                        Ok(())
                    }
                    None => Ok(()),
                };
            }

            let read = stream.read_buf(&mut buffer).await?;
            if read == 0 {
                // peer went away mid-request
                return Ok(());
            }
        }
    }

    async fn respond(&self, request: &RtspRequest) -> RtspServerResult<Option<Vec<u8>>> {
        let version = *request.version();
        if version.is_rtsp() {
            let Some(cseq) = request.headers().cseq() else {
                tracing::debug!("rtsp request without CSeq, closing");
                return Ok(None);
            };
            let response = if !request.method().valid_for_rtsp() {
                RtspResponse::error(version, RtspStatus::NotImplemented, cseq)
            } else {
                match request.method() {
                    RequestMethod::Options => RtspResponse::options_ok(version, cseq),
                    RequestMethod::Describe => {
                        let resources = self.resources.read().await;
                        match resources.get(request.path()) {
                            Some(sdp) => RtspResponse::describe_ok(version, cseq, sdp),
                            None => RtspResponse::error(version, RtspStatus::NotFound, cseq),
                        }
                    }
                    _ => RtspResponse::error(version, RtspStatus::NotImplemented, cseq),
                }
            };
            return Ok(Some(response.to_string().into_bytes()));
        }

        // http side
        if !self.config.http_enabled || !request.method().valid_for_http() {
            return Ok(None);
        }
        let Some(handler) = self.http_handler.as_ref() else {
            return Ok(None);
        };
        let reply = handler.lock().await.handle(
            request.method(),
            request.path(),
            request.body().map(String::as_str),
        );
        let Some(reply) = reply else {
            return Ok(None);
        };
        let ProtocolVersion::Http { minor } = version else {
            return Ok(None);
        };
        let mut wire = format!(
            "HTTP/1.{} {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
            minor,
            reply.status_code,
            reply.reason,
            reply.content_type,
            reply.body.len()
        )
        .into_bytes();
        wire.extend_from_slice(&reply.body);
        Ok(Some(wire))
    }
}
