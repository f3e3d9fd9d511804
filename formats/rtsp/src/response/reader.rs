use std::io::Cursor;

use tokio_util::bytes::Buf;
use utils::traits::reader::TryReadFrom;

use crate::{
    consts::common::{MAX_FIRST_LINE_LEN, RX_BUFFER_SIZE},
    errors::RtspMessageError,
    util::{find_head_end, parse_headers},
};

use super::RtspResponse;

impl<R: AsRef<[u8]>> TryReadFrom<R> for RtspResponse {
    type Error = RtspMessageError;

    /// Resumable response parse, mirroring the request reader: `Ok(None)`
    /// until the status line, the header section and the declared body have
    /// all arrived.
    fn try_read_from(reader: &mut Cursor<R>) -> Result<Option<Self>, Self::Error> {
        let start = reader.position() as usize;
        let data = &reader.get_ref().as_ref()[start..];
        if data.is_empty() {
            return Ok(None);
        }

        match data.iter().position(|b| *b == b'\n').map(|i| i + 1) {
            None if data.len() > MAX_FIRST_LINE_LEN => {
                return Err(RtspMessageError::FirstLineTooLong(data.len()));
            }
            None => return Ok(None),
            Some(len) if len > MAX_FIRST_LINE_LEN => {
                return Err(RtspMessageError::FirstLineTooLong(len));
            }
            Some(_) => {}
        }

        let Some(head_end) = find_head_end(data) else {
            if data.len() > RX_BUFFER_SIZE {
                return Err(RtspMessageError::HeaderSectionTooLong(data.len()));
            }
            return Ok(None);
        };

        let head = std::str::from_utf8(&data[..head_end]).map_err(|_| {
            RtspMessageError::InvalidMessageFormat("response head is not utf-8".to_owned())
        })?;
        let mut lines = head.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
        let status_line = lines.next().unwrap_or_default();
        // "RTSP/1.x <code> [reason]" with the reason phrase free-form
        let mut parts = status_line.splitn(3, ' ');
        let version = parts
            .next()
            .ok_or_else(|| {
                RtspMessageError::InvalidMessageFormat(format!(
                    "invalid status line: {}",
                    status_line
                ))
            })?
            .parse()?;
        let code: u16 = parts
            .next()
            .ok_or_else(|| {
                RtspMessageError::InvalidMessageFormat(format!(
                    "status line without code: {}",
                    status_line
                ))
            })?
            .parse()?;
        let status = code.try_into()?;
        let headers = parse_headers(lines);

        let body_len = headers.content_length().unwrap_or(0);
        let body = if body_len == 0 {
            None
        } else {
            if data.len() < head_end + body_len {
                return Ok(None);
            }
            Some(String::from_utf8_lossy(&data[head_end..head_end + body_len]).into_owned())
        };
        reader.advance(head_end + body_len);

        Ok(Some(Self {
            version,
            status,
            headers,
            body,
        }))
    }
}
