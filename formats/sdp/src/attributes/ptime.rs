//! Packet time values are carried in microseconds but written as decimal
//! milliseconds (`a=ptime:1.33` == 1330 us), trailing zeros trimmed.

use std::fmt;

use crate::errors::{SdpError, SdpResult};

/// Display adapter for a microsecond ptime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtimeText(pub u16);

impl fmt::Display for PtimeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0 / 1000;
        let frac = self.0 % 1000;
        if frac == 0 {
            return write!(f, "{}", ms);
        }
        let mut digits = format!("{:03}", frac);
        while digits.ends_with('0') {
            digits.pop();
        }
        write!(f, "{}.{}", ms, digits)
    }
}

pub fn parse_ptime_us(text: &str) -> SdpResult<u16> {
    let (ms, frac) = match text.split_once('.') {
        None => (text, ""),
        Some((ms, frac)) => (ms, frac),
    };
    if ms.is_empty() || !ms.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SdpError::InvalidAttributeLine(format!(
            "invalid ptime value: {}",
            text
        )));
    }
    if frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SdpError::InvalidAttributeLine(format!(
            "invalid ptime fraction: {}",
            text
        )));
    }
    let ms: u32 = ms.parse()?;
    let mut frac_us: u32 = 0;
    if !frac.is_empty() {
        frac_us = frac.parse::<u32>()? * 10u32.pow(3 - frac.len() as u32);
    }
    let total = ms * 1000 + frac_us;
    u16::try_from(total).map_err(|_| {
        SdpError::CapacityExceeded(format!("ptime out of range: {} us", total))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ptime_text_forms() {
        assert_eq!(PtimeText(1000).to_string(), "1");
        assert_eq!(PtimeText(4000).to_string(), "4");
        assert_eq!(PtimeText(1330).to_string(), "1.33");
        assert_eq!(PtimeText(330).to_string(), "0.33");
        assert_eq!(PtimeText(250).to_string(), "0.25");
        assert_eq!(PtimeText(1090).to_string(), "1.09");
        assert_eq!(PtimeText(125).to_string(), "0.125");
    }

    #[test]
    fn test_parse_ptime() {
        assert_eq!(parse_ptime_us("1").unwrap(), 1000);
        assert_eq!(parse_ptime_us("1.33").unwrap(), 1330);
        assert_eq!(parse_ptime_us("0.33").unwrap(), 330);
        assert_eq!(parse_ptime_us("0.125").unwrap(), 125);
        assert_eq!(parse_ptime_us("4.0").unwrap(), 4000);
        assert!(parse_ptime_us("").is_err());
        assert!(parse_ptime_us("1.3333").is_err());
        assert!(parse_ptime_us("-1").is_err());
        assert!(parse_ptime_us("1o").is_err());
        // 16-bit microseconds only
        assert!(parse_ptime_us("66").is_err());
    }
}
