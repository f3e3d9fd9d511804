use std::io::Cursor;

use tokio_util::bytes::Buf;
use utils::traits::reader::TryReadFrom;

use crate::{
    consts::common::{MAX_FIRST_LINE_LEN, MAX_URI_LEN, RX_BUFFER_SIZE},
    errors::RtspMessageError,
    util::{find_head_end, parse_headers},
};

use super::RtspRequest;

impl<R: AsRef<[u8]>> TryReadFrom<R> for RtspRequest {
    type Error = RtspMessageError;

    /// Resumable request parse. `Ok(None)` leaves the cursor untouched so the
    /// caller can retry once more bytes arrived; the hard ceilings on the
    /// request line and header section are enforced even on partial input.
    fn try_read_from(reader: &mut Cursor<R>) -> Result<Option<Self>, Self::Error> {
        let start = reader.position() as usize;
        let data = &reader.get_ref().as_ref()[start..];
        if data.is_empty() {
            return Ok(None);
        }

        let first_line_len = data.iter().position(|b| *b == b'\n').map(|i| i + 1);
        match first_line_len {
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
        if head_end > RX_BUFFER_SIZE {
            return Err(RtspMessageError::HeaderSectionTooLong(head_end));
        }

        let head = std::str::from_utf8(&data[..head_end]).map_err(|_| {
            RtspMessageError::InvalidMessageFormat("request head is not utf-8".to_owned())
        })?;
        let mut lines = head.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
        let first_line = lines.next().unwrap_or_default();
        let parts: Vec<&str> = first_line.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(RtspMessageError::InvalidMessageFormat(format!(
                "invalid request line: {}",
                first_line
            )));
        }
        let method = parts[0].parse()?;
        if parts[1].len() > MAX_URI_LEN {
            return Err(RtspMessageError::UriTooLong(parts[1].len()));
        }
        let uri = parts[1].to_owned();
        let version = parts[2].parse()?;
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
            method,
            uri,
            version,
            headers,
            body,
        }))
    }
}
