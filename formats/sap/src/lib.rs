pub mod engine;
pub mod errors;
pub mod packet;
pub mod session;

/// UDP port announcements MUST use.
pub const SAP_PORT: u16 = 9875;

/// Recommended IP TTL for announcements.
pub const SAP_TTL: u32 = 255;

/// Announcement bandwidth budget in bits per second.
pub const SAP_BANDWIDTH_BPS: u32 = 4000;

/// Floor for the announcement interval.
pub const SAP_MIN_INTERVAL_SEC: u32 = 300;

/// Floor for the session timeout window.
pub const SAP_MIN_TIMEOUT_SEC: u32 = 3600;
