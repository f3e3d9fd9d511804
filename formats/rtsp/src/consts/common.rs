pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
pub const CRLF_STR: &str = "\r\n";
pub const SPACE_STR: &str = " ";

/// Ceiling on the request/status line.
pub const MAX_FIRST_LINE_LEN: usize = 256;

/// Ceiling on the request URI.
pub const MAX_URI_LEN: usize = 256;

/// Receive buffer size; the full header section must fit into it.
pub const RX_BUFFER_SIZE: usize = 1500;

/// Default RTSP port when none is configured.
pub const RTSP_DEFAULT_PORT: u16 = 554;

pub const RTSP_SCHEME: &str = "rtsp";
