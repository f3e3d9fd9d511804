use crate::{
    consts::common::LF,
    header::{RtspHeader, RtspHeaders},
};

/// Index just past the blank line terminating the header section, or `None`
/// while it has not arrived yet. Lines may end in CR-LF or bare LF.
pub(crate) fn find_head_end(data: &[u8]) -> Option<usize> {
    let mut index = 0;
    while index < data.len() {
        let rel = data[index..].iter().position(|b| *b == LF)?;
        let line = &data[index..index + rel];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Some(index + rel + 1);
        }
        index += rel + 1;
    }
    None
}

/// Parses `Name: value` lines, keeping the headers the service models and
/// skipping everything else.
pub(crate) fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> RtspHeaders {
    let mut headers = RtspHeaders::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if let Some(header) = RtspHeader::from_name(name.trim()) {
            headers.push(header, value.trim());
        }
    }
    headers
}
