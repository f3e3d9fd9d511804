mod tests {
    use std::cmp::Ordering;

    use crate::{
        attributes::{
            CapabilityConfig, CapabilityProposal, media_direction::MediaDirection,
            refclk::{PtpKind, RefClockSource},
            rtpmap::{AudioEncoding, RtpMap},
        },
        builder::{SessionBuilder, StreamBuilder},
        errors::SdpError,
        reader::SessionReader,
        session::{IpFamily, Level, Originator, SessionDescription},
    };

    fn rtpmap(payload_type: u8, encoding: AudioEncoding, sample_rate: u32, channels: u16) -> RtpMap {
        RtpMap {
            payload_type,
            encoding,
            sample_rate,
            channels,
        }
    }

    #[test]
    fn test_minimal_serialize() {
        let doc = SessionBuilder::new()
            .originator(
                "joe",
                "1234567890",
                "9876543210",
                IpFamily::V4,
                "random.host.name",
            )
            .build();
        assert_eq!(
            doc.to_string(),
            "v=0\r\n\
             o=joe 1234567890 9876543210 IN IP4 random.host.name\r\n\
             s= \r\n\
             t=0 0\r\n\
             a=tool:caes67\r\n"
        );
    }

    #[test]
    fn test_empty_username_written_as_dash() {
        let doc = SessionBuilder::new()
            .originator("", "123", "456", IpFamily::V4, "10.0.0.1")
            .build();
        assert!(doc.to_string().starts_with("v=0\r\no=- 123 456 IN IP4 10.0.0.1\r\n"));
    }

    const TWO_STREAM_SDP: &str = "v=0\r\n\
        o=joe 1234567890 9876543210 IN IP4 random.host.name\r\n\
        s=1337 $3$$10N\r\n\
        i=my session info\r\n\
        c=IN IP4 224.0.0.1/33\r\n\
        t=0 0\r\n\
        a=tool:caes67\r\n\
        a=clock-domain:PTPv2 2\r\n\
        a=ts-refclk:ptp=IEEE802.1AS-2011:08-07-06-05-04-03-02-01\r\n\
        m=audio 5000/2 RTP/AVP 96 97 98\r\n\
        i=stream level info\r\n\
        a=inactive\r\n\
        a=rtpmap:96 L16/48000/2\r\n\
        a=rtpmap:97 L24/48000/2\r\n\
        a=rtpmap:98 L24/96000/2\r\n\
        a=ptime:1\r\n\
        a=pcap:1 ptime:0.33\r\n\
        a=pcap:2 ptime:1\r\n\
        a=maxptime:1\r\n\
        a=pcfg:1 a=1\r\n\
        a=ts-refclk:ptp=IEEE1588-2008:01-02-03-04-05-06-07-08:1\r\n\
        a=mediaclk:direct=12345\r\n\
        a=sync-time:7890\r\n\
        m=audio 5002 RTP/AVP 96\r\n\
        a=recvonly\r\n\
        a=rtpmap:96 L24/192000\r\n\
        a=ptime:4\r\n\
        a=acfg:3 a=12\r\n\
        c=IN IP6 some.host.name\r\n\
        a=mediaclk:direct=98765\r\n";

    fn two_stream_doc() -> SessionDescription {
        SessionBuilder::new()
            .originator(
                "joe",
                "1234567890",
                "9876543210",
                IpFamily::V4,
                "random.host.name",
            )
            .name("1337 $3$$10N")
            .info("my session info")
            .connection(IpFamily::V4, "224.0.0.1", Some(33), 0)
            .ptp_domain(2)
            .refclk(RefClockSource::Ptp {
                kind: PtpKind::Ieee8021As2011,
                gmid: [8, 7, 6, 5, 4, 3, 2, 1],
                domain: None,
            })
            .stream(
                StreamBuilder::new()
                    .port(5000)
                    .nports(2)
                    .info("stream level info")
                    .mode(MediaDirection::Inactive)
                    .encoding(rtpmap(96, AudioEncoding::L16, 48000, 2))
                    .encoding(rtpmap(97, AudioEncoding::L24, 48000, 2))
                    .encoding(rtpmap(98, AudioEncoding::L24, 96000, 2))
                    .ptime_us(1000)
                    .ptime_cap(1, 330)
                    .ptime_cap(2, 1000)
                    .maxptime_us(1000)
                    .cap_cfg(CapabilityConfig {
                        proposal: CapabilityProposal::Proposed,
                        index: 1,
                        cap: 1,
                    })
                    .refclk(RefClockSource::Ptp {
                        kind: PtpKind::Ieee1588_2008,
                        gmid: [1, 2, 3, 4, 5, 6, 7, 8],
                        domain: Some(1),
                    })
                    .mediaclk_offset(12345)
                    .sync_time(7890),
            )
            .stream(
                StreamBuilder::new()
                    .port(5002)
                    .mode(MediaDirection::RecvOnly)
                    .encoding(rtpmap(96, AudioEncoding::L24, 192000, 1))
                    .ptime_us(4000)
                    .cap_cfg(CapabilityConfig {
                        proposal: CapabilityProposal::Active,
                        index: 3,
                        cap: 12,
                    })
                    .connection(IpFamily::V6, "some.host.name", None, 0)
                    .mediaclk_offset(98765),
            )
            .build()
    }

    #[test]
    fn test_two_stream_serialize() {
        assert_eq!(two_stream_doc().to_string(), TWO_STREAM_SDP);
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let doc = two_stream_doc();
        doc.validate().unwrap();
        let reparsed: SessionDescription = doc.to_string().parse().unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_parse_lf_only() {
        let doc: SessionDescription = TWO_STREAM_SDP.replace("\r\n", "\n").parse().unwrap();
        assert_eq!(doc, two_stream_doc());
    }

    #[test]
    fn test_parse_single_stream() {
        let input = "v=0\n\
            o=- 123 45678 IN IP4 ipaddr1\n\
            s= \n\
            c=IN IP4 ipaddr2/44/36\n\
            t=0 0\n\
            a=ptp-domain:PTPv2 13\n\
            a=inactive\n\
            m=audio 5000 RTP/AVP 96 97\n\
            a=recvonly\n\
            a=rtpmap:96 L16/48000/2\n\
            a=rtpmap:97 L32/96000\n\
            a=ptime:1.33\n\
            a=mediaclk:direct=963214424\n";
        let doc: SessionDescription = input.parse().unwrap();

        assert_eq!(doc.originator.username, "");
        assert_eq!(doc.originator.session_id, "123");
        assert_eq!(doc.originator.session_version, "45678");
        assert_eq!(doc.name, "");

        assert_eq!(doc.connections.len(), 1);
        let connection = &doc.connections[0];
        assert_eq!(connection.level, Level::Session);
        assert_eq!(connection.family, IpFamily::V4);
        assert_eq!(connection.address, "ipaddr2");
        assert_eq!(connection.ttl, Some(44));
        assert_eq!(connection.naddr, 36);

        assert_eq!(doc.ptp_domain, Some(13));
        assert_eq!(doc.mode, Some(MediaDirection::Inactive));

        assert_eq!(doc.streams.len(), 1);
        let stream = &doc.streams[0];
        assert_eq!(stream.port, 5000);
        assert_eq!(stream.nports, None);
        assert_eq!(stream.payload_types, vec![96, 97]);
        assert_eq!(stream.mode, Some(MediaDirection::RecvOnly));
        assert_eq!(stream.ptime_us, Some(1330));
        assert_eq!(stream.mediaclk.map(|m| m.offset), Some(963214424));

        let encodings: Vec<_> = doc.encodings_for_stream(0).collect();
        assert_eq!(encodings.len(), 2);
        assert_eq!(
            encodings[0].rtpmap,
            rtpmap(96, AudioEncoding::L16, 48000, 2)
        );
        assert_eq!(
            encodings[1].rtpmap,
            rtpmap(97, AudioEncoding::L32, 96000, 1)
        );
        assert_eq!(doc.stream_encoding_count(0), 2);
        assert!(doc.is_valid_aes67_audio(0));
        doc.validate().unwrap();
    }

    #[test]
    fn test_unhandled_lines_reach_callback() {
        let input = "v=0\r\n\
            o=- 1 1 IN IP4 host\r\n\
            s=x\r\n\
            b=AS:128\r\n\
            t=0 0\r\n\
            a=candidate:something\r\n\
            m=audio 5000 RTP/AVP 96\r\n\
            a=rtpmap:96 L24/48000\r\n\
            a=fmtp:96 whatever\r\n";
        let mut seen = Vec::new();
        let doc = SessionReader::new()
            .on_unhandled_line(Box::new(|line, level| {
                seen.push((line.to_owned(), level));
            }))
            .read_from(input)
            .unwrap();
        assert_eq!(doc.streams.len(), 1);
        assert_eq!(
            seen,
            vec![
                ("b=AS:128".to_owned(), Level::Session),
                ("a=candidate:something".to_owned(), Level::Session),
                ("a=fmtp:96 whatever".to_owned(), Level::Stream(0)),
            ]
        );
    }

    #[test]
    fn test_parse_failures() {
        // wrong version
        assert!(matches!(
            "v=1\r\no=- 1 1 IN IP4 h\r\ns=x\r\n".parse::<SessionDescription>(),
            Err(SdpError::NotSupported(_))
        ));
        // premature end of document
        assert!(matches!(
            "v=0\r\no=- 1 1 IN IP4 h\r\n".parse::<SessionDescription>(),
            Err(SdpError::Incomplete(_))
        ));
        // unknown transport profile
        assert!(matches!(
            "v=0\r\no=- 1 1 IN IP4 h\r\ns=x\r\nm=audio 5000 RTP/SAVP 96\r\n"
                .parse::<SessionDescription>(),
            Err(SdpError::NotSupported(_))
        ));
        // only audio streams are modeled
        assert!(matches!(
            "v=0\r\no=- 1 1 IN IP4 h\r\ns=x\r\nm=video 5000 RTP/AVP 96\r\n"
                .parse::<SessionDescription>(),
            Err(SdpError::NotSupported(_))
        ));
        // payload type out of range
        assert!(matches!(
            "v=0\r\no=- 1 1 IN IP4 h\r\ns=x\r\nm=audio 5000 RTP/AVP 96\r\na=rtpmap:128 L16/48000\r\n"
                .parse::<SessionDescription>(),
            Err(SdpError::NotSupported(_))
        ));
        // bounded string overflow
        let long_name = format!("v=0\r\no=- 1 1 IN IP4 h\r\ns={}\r\n", "x".repeat(300));
        assert!(matches!(
            long_name.parse::<SessionDescription>(),
            Err(SdpError::CapacityExceeded(_))
        ));
        // malformed origin
        assert!(matches!(
            "v=0\r\no=- 1 1 IN IP4\r\ns=x\r\n".parse::<SessionDescription>(),
            Err(SdpError::SyntaxError(_))
        ));
    }

    #[test]
    fn test_version_comparison() {
        let mk = |version: &str| Originator {
            username: "joe".to_owned(),
            session_id: "1".to_owned(),
            session_version: version.to_owned(),
            family: IpFamily::V4,
            address: "host".to_owned(),
        };
        assert_eq!(mk("2").cmp_version(&mk("2")), Ordering::Equal);
        assert_eq!(mk("2").cmp_version(&mk("3")), Ordering::Less);
        // a longer numeric string is strictly newer
        assert_eq!(mk("9").cmp_version(&mk("10")), Ordering::Less);
        assert_eq!(mk("10").cmp_version(&mk("9")), Ordering::Greater);
        // antisymmetry
        assert_eq!(
            mk("1234").cmp_version(&mk("1243")),
            mk("1243").cmp_version(&mk("1234")).reverse()
        );
        // identity ignores version
        assert!(mk("1").identity_eq(&mk("99999")));
    }

    #[test]
    fn test_write_bounded() {
        let doc = two_stream_doc();
        let text = doc.to_string();

        let mut exact = vec![0u8; text.len()];
        assert_eq!(doc.write_bounded(&mut exact).unwrap(), text.len());
        assert_eq!(&exact, text.as_bytes());

        let mut small = vec![0u8; text.len() - 1];
        assert!(matches!(
            doc.write_bounded(&mut small),
            Err(SdpError::CapacityExceeded(_))
        ));
    }

    #[test]
    fn test_validate_catches_duplicate_payload_type() {
        let mut doc = two_stream_doc();
        doc.streams[0].payload_types.push(96);
        assert!(matches!(
            doc.validate(),
            Err(SdpError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_invalid_audio_streams() {
        let doc = SessionBuilder::new()
            .originator("-", "1", "1", IpFamily::V4, "h")
            .stream(StreamBuilder::new().port(5000).ptime_us(1000))
            .build();
        // a stream without encodings carries no usable audio
        assert!(!doc.is_valid_aes67_audio(0));
        assert!(!doc.is_valid_aes67_audio(7));

        let doc = SessionBuilder::new()
            .originator("-", "1", "1", IpFamily::V4, "h")
            .stream(
                StreamBuilder::new()
                    .port(5000)
                    .encoding(rtpmap(96, AudioEncoding::L24, 48000, 2)),
            )
            .build();
        // no ptime either
        assert!(!doc.is_valid_aes67_audio(0));
    }

    #[test]
    fn test_origin_line_for_deletion() {
        let doc = two_stream_doc();
        assert_eq!(
            doc.origin_line(),
            "o=joe 1234567890 9876543210 IN IP4 random.host.name\r\n"
        );
    }
}
