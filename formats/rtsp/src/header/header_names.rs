pub const ACCEPT: &str = "Accept";
pub const C_SEQ: &str = "CSeq";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const PUBLIC: &str = "Public";
pub const SERVER: &str = "Server";
