mod tests {
    use std::io::Cursor;

    use tokio_util::bytes::Bytes;
    use utils::traits::{reader::TryReadFrom, writer::WriteTo};

    use crate::{
        errors::RtpError,
        header::RtpHeader,
        packet::{AudioPacket, frames_in_packet, pack},
    };

    #[test]
    fn test_pack_layout() {
        let samples = [0xab_u8; 12];
        let packet = pack(96, 0x0102, 0x03040506, 0x0708090a, &samples).unwrap();
        assert_eq!(packet.len(), 24);
        assert_eq!(packet[0], 0x80); // version 2, no padding/extension/csrc
        assert_eq!(packet[1], 96); // no marker
        assert_eq!(&packet[2..4], &[0x01, 0x02]);
        assert_eq!(&packet[4..8], &[0x03, 0x04, 0x05, 0x06]);
        assert_eq!(&packet[8..12], &[0x07, 0x08, 0x09, 0x0a]);
        assert_eq!(&packet[12..], &samples);
    }

    #[test]
    fn test_frames_in_packet() {
        // 2 channels of 3-byte samples: (156 - 12) / 6
        assert_eq!(frames_in_packet(156, 0x80, 2, 3).unwrap(), 24);
        // one CSRC entry shrinks the payload by 4 bytes
        assert_eq!(frames_in_packet(160, 0x81, 2, 3).unwrap(), 24);
        // 160 - 12 = 148 is not divisible by 6
        assert!(matches!(
            frames_in_packet(160, 0x80, 2, 3),
            Err(RtpError::PayloadNotFrameAligned { .. })
        ));
        assert!(matches!(
            frames_in_packet(8, 0x80, 2, 3),
            Err(RtpError::PacketTooShort(8))
        ));
    }

    #[test]
    fn test_header_wire_round_trip() {
        let mut header = RtpHeader::new(127, 0xfffe, 0xdeadbeef, 0x12345678);
        header.marker = true;
        header.csrc_list = vec![1, 2, 3];

        let mut wire = Vec::new();
        header.write_to(&mut wire).unwrap();
        assert_eq!(wire.len(), header.wire_len());
        assert_eq!(wire[0] & 0b1111, 3);

        let mut cursor = Cursor::new(&wire[..]);
        let reparsed = RtpHeader::try_read_from(&mut cursor).unwrap().unwrap();
        assert_eq!(reparsed, header);
    }

    #[test]
    fn test_incomplete_header_returns_none() {
        let mut cursor = Cursor::new(&[0x80_u8, 96, 0, 1, 0, 0][..]);
        assert!(RtpHeader::try_read_from(&mut cursor).unwrap().is_none());

        // csrc count announced but bytes missing
        let mut short = vec![0x82_u8, 96];
        short.extend_from_slice(&[0; 10]);
        let mut cursor = Cursor::new(&short[..]);
        assert!(RtpHeader::try_read_from(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_packet_read_rejects_wrong_version() {
        let mut wire = vec![0x40_u8, 96];
        wire.extend_from_slice(&[0; 10]);
        let mut cursor = Cursor::new(&wire[..]);
        assert!(matches!(
            AudioPacket::try_read_from(&mut cursor),
            Err(RtpError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn test_packet_round_trip() {
        let samples: Vec<u8> = (0u8..48).collect();
        let wire = pack(97, 7, 1234, 99, &samples).unwrap();

        let mut cursor = Cursor::new(wire.as_ref());
        let packet = AudioPacket::try_read_from(&mut cursor).unwrap().unwrap();
        assert_eq!(packet.header.payload_type, 97);
        assert_eq!(packet.header.sequence_number, 7);
        assert_eq!(packet.header.timestamp, 1234);
        assert_eq!(packet.header.ssrc, 99);
        assert_eq!(packet.payload, Bytes::from(samples));
        assert_eq!(packet.frames(2, 3).unwrap(), 8);
        assert_eq!(packet.wire_len(), wire.len());

        let mut rewritten = Vec::new();
        packet.write_to(&mut rewritten).unwrap();
        assert_eq!(rewritten, wire);
    }
}
