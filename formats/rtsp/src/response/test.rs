mod tests {
    use std::io::Cursor;

    use utils::traits::reader::TryReadFrom;

    use crate::{
        consts::{status::RtspStatus, version::ProtocolVersion},
        errors::RtspMessageError,
        header::RtspHeader,
        response::RtspResponse,
    };
    use sdp_formats::{builder::SessionBuilder, session::IpFamily};

    fn parse(input: &str) -> Result<Option<RtspResponse>, RtspMessageError> {
        let mut cursor = Cursor::new(input.as_bytes());
        RtspResponse::try_read_from(&mut cursor)
    }

    #[test]
    fn test_describe_ok_wire_form() {
        let sdp = SessionBuilder::new()
            .originator("joe", "1", "1", IpFamily::V4, "10.0.0.1")
            .name("deck")
            .build();
        let body = sdp.to_string();
        let response = RtspResponse::describe_ok(ProtocolVersion::RTSP_1_0, 1, &sdp);
        assert_eq!(
            response.to_string(),
            format!(
                "RTSP/1.0 200 OK\r\n\
                 CSeq: 1\r\n\
                 Content-Type: application/sdp\r\n\
                 Content-Length: {}\r\n\
                 \r\n\
                 {}",
                body.len(),
                body
            )
        );
    }

    #[test]
    fn test_options_and_error_forms() {
        assert_eq!(
            RtspResponse::options_ok(ProtocolVersion::RTSP_1_0, 2).to_string(),
            "RTSP/1.0 200 OK\r\nCSeq: 2\r\nPublic: DESCRIBE\r\n\r\n"
        );
        assert_eq!(
            RtspResponse::error(ProtocolVersion::RTSP_1_0, RtspStatus::NotFound, 3).to_string(),
            "RTSP/1.0 404 NOT FOUND\r\nCSeq: 3\r\n\r\n"
        );
        assert_eq!(
            RtspResponse::error(ProtocolVersion::Rtsp { minor: 1 }, RtspStatus::NotImplemented, 4)
                .to_string(),
            "RTSP/1.1 501 NOT IMPLEMENTED\r\nCSeq: 4\r\n\r\n"
        );
    }

    #[test]
    fn test_parse_response_with_body() {
        let input = "RTSP/1.0 200 OK\r\n\
            CSeq: 1\r\n\
            Content-Type: application/sdp\r\n\
            Content-Length: 11\r\n\
            \r\n\
            v=0\r\no=- 1";
        let response = parse(input).unwrap().unwrap();
        assert_eq!(response.status(), RtspStatus::Ok);
        assert_eq!(response.headers().cseq(), Some(1));
        assert_eq!(
            response.headers().get(RtspHeader::ContentType),
            Some("application/sdp")
        );
        assert_eq!(response.body().map(String::as_str), Some("v=0\r\no=- 1"));
    }

    #[test]
    fn test_parse_waits_for_body() {
        let input = "RTSP/1.0 200 OK\r\nCSeq: 1\r\nContent-Length: 100\r\n\r\nshort";
        assert!(parse(input).unwrap().is_none());
    }

    #[test]
    fn test_parse_without_content_length() {
        let response = parse("RTSP/1.0 404 NOT FOUND\r\nCSeq: 9\r\n\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(response.status(), RtspStatus::NotFound);
        assert!(response.body().is_none());
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse("ICY 200 OK\r\n\r\n"),
            Err(RtspMessageError::UnknownVersion(_))
        ));
        assert!(matches!(
            parse("RTSP/1.0 999 WAT\r\n\r\n"),
            Err(RtspMessageError::UnknownStatus(999))
        ));
        assert!(matches!(
            parse("RTSP/1.0\r\n\r\n"),
            Err(RtspMessageError::InvalidMessageFormat(_))
        ));
    }
}
