use std::fmt;

use crate::errors::RtspMessageError;

pub mod status_description {
    pub const OK: &str = "OK";
    pub const NOT_FOUND: &str = "NOT FOUND";
    pub const NOT_IMPLEMENTED: &str = "NOT IMPLEMENTED";
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtspStatus {
    Ok = 200,
    NotFound = 404,
    NotImplemented = 501,
}

impl RtspStatus {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ok => status_description::OK,
            Self::NotFound => status_description::NOT_FOUND,
            Self::NotImplemented => status_description::NOT_IMPLEMENTED,
        }
    }
}

impl From<RtspStatus> for u16 {
    fn from(value: RtspStatus) -> Self {
        value as u16
    }
}

impl TryFrom<u16> for RtspStatus {
    type Error = RtspMessageError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            200 => Ok(Self::Ok),
            404 => Ok(Self::NotFound),
            501 => Ok(Self::NotImplemented),
            _ => Err(RtspMessageError::UnknownStatus(value)),
        }
    }
}

impl fmt::Display for RtspStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", *self as u16, self.description())
    }
}
