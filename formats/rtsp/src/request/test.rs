mod tests {
    use std::io::Cursor;

    use url::Url;
    use utils::traits::reader::TryReadFrom;

    use crate::{
        consts::{methods::RequestMethod, version::ProtocolVersion},
        errors::RtspMessageError,
        header::RtspHeader,
        request::RtspRequest,
    };

    const DESCRIBE_REQUEST: &str = "DESCRIBE rtsp://10.0.0.1:554/by-name/deck RTSP/1.0\r\n\
        CSeq: 1\r\n\
        Accept: application/sdp\r\n\
        \r\n";

    fn parse(input: &str) -> Result<Option<RtspRequest>, RtspMessageError> {
        let mut cursor = Cursor::new(input.as_bytes());
        RtspRequest::try_read_from(&mut cursor)
    }

    #[test]
    fn test_parse_describe_request() {
        let request = parse(DESCRIBE_REQUEST).unwrap().unwrap();
        assert_eq!(request.method(), RequestMethod::Describe);
        assert_eq!(request.uri(), "rtsp://10.0.0.1:554/by-name/deck");
        assert_eq!(request.path(), "/by-name/deck");
        assert_eq!(request.version(), &ProtocolVersion::RTSP_1_0);
        assert_eq!(request.headers().cseq(), Some(1));
        assert_eq!(
            request.headers().get(RtspHeader::Accept),
            Some("application/sdp")
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn test_describe_builder_matches_wire_form() {
        let url = Url::parse("rtsp://10.0.0.1:554/by-name/deck").unwrap();
        let request = RtspRequest::describe(&url);
        assert_eq!(request.to_string(), DESCRIBE_REQUEST);
    }

    #[test]
    fn test_parse_is_resumable() {
        // feed the request one chunk at a time
        for cut in [0, 9, 30, DESCRIBE_REQUEST.len() - 1] {
            assert!(
                parse(&DESCRIBE_REQUEST[..cut]).unwrap().is_none(),
                "cut at {}",
                cut
            );
        }
        let mut cursor = Cursor::new(DESCRIBE_REQUEST.as_bytes());
        assert!(RtspRequest::try_read_from(&mut cursor).unwrap().is_some());
        assert_eq!(cursor.position() as usize, DESCRIBE_REQUEST.len());
    }

    #[test]
    fn test_parse_http_request_with_body() {
        let input = "POST /control HTTP/1.1\r\n\
            CSeq: 3\r\n\
            Content-Length: 5\r\n\
            \r\n\
            hello";
        let request = parse(input).unwrap().unwrap();
        assert_eq!(request.method(), RequestMethod::Post);
        assert_eq!(request.version(), &ProtocolVersion::Http { minor: 1 });
        assert!(request.method().valid_for_http());
        assert!(!request.method().valid_for_rtsp());
        assert_eq!(request.body().map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_parse_lf_only_lines() {
        let input = "OPTIONS * RTSP/1.0\nCSeq: 2\n\n";
        let request = parse(input).unwrap().unwrap();
        assert_eq!(request.method(), RequestMethod::Options);
        assert_eq!(request.headers().cseq(), Some(2));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse("TEARDOWN rtsp://host/x RTSP/1.0\r\n\r\n"),
            Err(RtspMessageError::UnknownMethod(_))
        ));
        assert!(matches!(
            parse("DESCRIBE rtsp://host/x RTSP/2.0\r\n\r\n"),
            Err(RtspMessageError::UnknownVersion(_))
        ));
        assert!(matches!(
            parse("DESCRIBE rtsp://host/x\r\n\r\n"),
            Err(RtspMessageError::InvalidMessageFormat(_))
        ));

        let long_line = format!("DESCRIBE rtsp://host/{} RTSP/1.0\r\n\r\n", "x".repeat(300));
        assert!(matches!(
            parse(&long_line),
            Err(RtspMessageError::FirstLineTooLong(_))
        ));

        // no line terminator and already past the ceiling
        let unterminated = "DESCRIBE ".repeat(40);
        assert!(matches!(
            parse(&unterminated),
            Err(RtspMessageError::FirstLineTooLong(_))
        ));

        let huge_head = format!(
            "DESCRIBE rtsp://host/x RTSP/1.0\r\n{}\r\n",
            "X-Filler: yes\r\n".repeat(120)
        );
        assert!(matches!(
            parse(&huge_head),
            Err(RtspMessageError::HeaderSectionTooLong(_))
        ));
    }

    #[test]
    fn test_path_of_relative_uri() {
        let request = parse("GET /index.html HTTP/1.0\r\n\r\n").unwrap().unwrap();
        assert_eq!(request.path(), "/index.html");

        let request = parse("DESCRIBE rtsp://justhost RTSP/1.0\r\n\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(request.path(), "/");
    }
}
