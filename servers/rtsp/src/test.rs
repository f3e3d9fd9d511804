mod tests {
    use std::net::SocketAddr;

    use sdp_formats::{
        attributes::{
            media_direction::MediaDirection,
            rtpmap::{AudioEncoding, RtpMap},
        },
        builder::{SessionBuilder, StreamBuilder},
        session::{IpFamily, SessionDescription},
    };
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        sync::RwLock,
    };
    use url::Url;

    use crate::{
        client::{DescribeClient, DescribeState, describe},
        config::RtspServerConfig,
        resource::ResourceDirectory,
        server::{HttpHandler, HttpResponse, RtspDescribeServer},
    };
    use rtsp_formats::consts::{methods::RequestMethod, status::RtspStatus};

    fn test_sdp() -> SessionDescription {
        SessionBuilder::new()
            .originator("joe", "100", "1", IpFamily::V4, "10.0.0.9")
            .name("deck")
            .connection(IpFamily::V4, "239.1.2.3", Some(64), 0)
            .stream(
                StreamBuilder::new()
                    .port(5004)
                    .mode(MediaDirection::RecvOnly)
                    .encoding(RtpMap {
                        payload_type: 96,
                        encoding: AudioEncoding::L24,
                        sample_rate: 48000,
                        channels: 2,
                    })
                    .ptime_us(1000),
            )
            .build()
    }

    async fn spawn_server(
        http_handler: Option<Box<dyn HttpHandler>>,
    ) -> (
        SocketAddr,
        std::sync::Arc<RwLock<ResourceDirectory>>,
    ) {
        let config = RtspServerConfig {
            address: "127.0.0.1".parse().unwrap(),
            port: 0,
            http_enabled: http_handler.is_some(),
        };
        let mut server = RtspDescribeServer::start(config).await.unwrap();
        if let Some(handler) = http_handler {
            server = server.with_http_handler(handler);
        }
        let address = server.local_addr().unwrap();
        let resources = server.resources();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        (address, resources)
    }

    async fn raw_exchange(address: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(address).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    #[tokio::test]
    async fn test_describe_round_trip() {
        let (address, resources) = spawn_server(None).await;
        let sdp = test_sdp();
        resources.write().await.add("/by-name/deck", sdp.clone());

        let url = Url::parse(&format!("rtsp://{}/by-name/deck", address)).unwrap();
        let content = describe(address, &url).await.unwrap();
        assert_eq!(content, sdp.to_string().as_bytes());

        let reparsed: SessionDescription =
            std::str::from_utf8(&content).unwrap().parse().unwrap();
        assert_eq!(reparsed, sdp);
    }

    #[tokio::test]
    async fn test_describe_unknown_resource() {
        let (address, _resources) = spawn_server(None).await;
        let url = Url::parse(&format!("rtsp://{}/by-name/nope", address)).unwrap();

        let mut client = DescribeClient::new();
        client.start(address, &url).await.unwrap();
        while client.state() == DescribeState::AwaitingResponse {
            client.readable().await.unwrap();
            client.process().unwrap();
        }
        assert_eq!(client.status(), Some(RtspStatus::NotFound));
        assert!(client.content().is_none());
    }

    #[tokio::test]
    async fn test_options_advertises_describe() {
        let (address, _resources) = spawn_server(None).await;
        let response = raw_exchange(address, "OPTIONS * RTSP/1.0\r\nCSeq: 7\r\n\r\n").await;
        assert!(response.starts_with("RTSP/1.0 200 OK\r\n"), "{}", response);
        assert!(response.contains("CSeq: 7\r\n"));
        assert!(response.contains("Public: DESCRIBE\r\n"));
    }

    #[tokio::test]
    async fn test_http_method_over_rtsp_is_not_implemented() {
        let (address, _resources) = spawn_server(None).await;
        let response = raw_exchange(address, "GET /x RTSP/1.0\r\nCSeq: 2\r\n\r\n").await;
        assert!(response.starts_with("RTSP/1.0 501 NOT IMPLEMENTED\r\n"), "{}", response);
    }

    #[tokio::test]
    async fn test_http_disabled_closes_without_response() {
        let (address, _resources) = spawn_server(None).await;
        let response = raw_exchange(address, "GET /index HTTP/1.0\r\n\r\n").await;
        assert!(response.is_empty());
    }

    struct EchoHandler;

    impl HttpHandler for EchoHandler {
        fn handle(
            &mut self,
            method: RequestMethod,
            path: &str,
            _body: Option<&str>,
        ) -> Option<HttpResponse> {
            Some(HttpResponse {
                status_code: 200,
                reason: "OK".to_owned(),
                content_type: "text/plain".to_owned(),
                body: format!("{} {}", method, path).into_bytes(),
            })
        }
    }

    #[tokio::test]
    async fn test_http_handler_delegation() {
        let (address, _resources) = spawn_server(Some(Box::new(EchoHandler))).await;
        let response = raw_exchange(address, "GET /index HTTP/1.0\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"), "{}", response);
        assert!(response.contains("Content-Type: text/plain\r\n"));
        assert!(response.ends_with("\r\n\r\nGET /index"), "{}", response);
    }

    #[tokio::test]
    async fn test_client_truncated_response_yields_no_content() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut scratch = [0u8; 1024];
            let _ = stream.read(&mut scratch).await;
            stream
                .write_all(b"RTSP/1.0 200 OK\r\nCSeq: 1\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
            // connection dropped before the declared body arrives
        });

        let url = Url::parse("rtsp://example/by-name/x").unwrap();
        let mut client = DescribeClient::new();
        client.start(address, &url).await.unwrap();
        while client.state() == DescribeState::AwaitingResponse {
            client.readable().await.unwrap();
            client.process().unwrap();
        }
        assert!(client.content().is_none());
    }

    #[tokio::test]
    async fn test_client_stop_discards_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            futures::future::pending::<()>().await;
        });

        let url = Url::parse("rtsp://example/by-name/x").unwrap();
        let mut client = DescribeClient::new();
        client.start(address, &url).await.unwrap();
        assert_eq!(client.state(), DescribeState::AwaitingResponse);
        client.stop();
        assert_eq!(client.state(), DescribeState::Idle);
        assert!(client.content().is_none());
    }
}
