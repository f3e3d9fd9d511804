//! Packet time / sample count conversions.
//!
//! Two streams match iff their per-packet sample counts (and sample rates)
//! match; the textual ptime is an approximation and must not be compared
//! directly.

use num::ToPrimitive;

use crate::header::RtpHeader;

/// Samples per packet for a packet time in microseconds, rounded to the
/// nearest sample.
pub fn ptime_to_samples(ptime_us: u32, sample_rate: u32) -> u32 {
    let t = ptime_us as u64 * sample_rate as u64;
    let round = u64::from(t % 1_000_000 >= 500_000);
    (t / 1_000_000 + round) as u32
}

/// Truncating inverse of [`ptime_to_samples`].
pub fn samples_to_ptime(nsamples: u32, sample_rate: u32) -> u32 {
    if sample_rate == 0 {
        return 0;
    }
    (1_000_000u64 * nsamples as u64 / sample_rate as u64)
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Recovers the packet time from two observed packet headers of the same
/// stream. Requires a strictly increasing sequence number so `before` is
/// known to precede `after`; the media clock may wrap in between.
pub fn ptime_from_packet_pair(
    before: &RtpHeader,
    after: &RtpHeader,
    sample_rate: u32,
) -> Option<u32> {
    if sample_rate == 0 || before.sequence_number >= after.sequence_number {
        return None;
    }
    let seqdiff = (after.sequence_number - before.sequence_number) as u64;
    let tdiff = after.timestamp.wrapping_sub(before.timestamp) as u64;
    (1_000_000u64 * tdiff / seqdiff / sample_rate as u64).to_u32()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ptime_to_samples() {
        assert_eq!(ptime_to_samples(1000, 48000), 48);
        assert_eq!(ptime_to_samples(1000, 96000), 96);
        assert_eq!(ptime_to_samples(4000, 48000), 192);
        // 0.33 ms at 48 kHz is 15.84 samples, rounded up
        assert_eq!(ptime_to_samples(330, 48000), 16);
        // 0.13 ms at 44.1 kHz is 5.733 samples
        assert_eq!(ptime_to_samples(130, 44100), 6);
        assert_eq!(ptime_to_samples(250, 96000), 24);
        assert_eq!(ptime_to_samples(1000, 0), 0);
    }

    #[test]
    fn test_samples_to_ptime() {
        assert_eq!(samples_to_ptime(48, 48000), 1000);
        assert_eq!(samples_to_ptime(192, 48000), 4000);
        // truncating: 16 samples at 48 kHz are 333.33 us
        assert_eq!(samples_to_ptime(16, 48000), 333);
        assert_eq!(samples_to_ptime(48, 0), 0);
    }

    #[test]
    fn test_ptime_from_packet_pair() {
        let mut before = RtpHeader::new(96, 10, 1000, 1);
        let mut after = RtpHeader::new(96, 12, 1096, 1);
        assert_eq!(ptime_from_packet_pair(&before, &after, 48000), Some(1000));

        // media clock wrap between the two packets
        before.timestamp = u32::MAX - 47;
        after.timestamp = 48;
        after.sequence_number = 11;
        assert_eq!(ptime_from_packet_pair(&before, &after, 48000), Some(2000));

        // sequence order not established
        before.sequence_number = 12;
        assert_eq!(ptime_from_packet_pair(&before, &after, 48000), None);
    }
}
