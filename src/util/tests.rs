#![allow(clippy::unwrap_used, reason = "allow in test files")]

use super::format_timecode;

#[test]
fn timecode_zero() {
    assert_eq!(format_timecode(0.0), "00:00:00.000");
}

#[test]
fn timecode_rounds_to_milliseconds() {
    assert_eq!(format_timecode(50.0 / 24.0), "00:00:02.083");
    assert_eq!(format_timecode(0.0004), "00:00:00.000");
    assert_eq!(format_timecode(0.0006), "00:00:00.001");
}

#[test]
fn timecode_carries_into_hours() {
    assert_eq!(format_timecode(3599.999), "00:59:59.999");
    assert_eq!(format_timecode(3600.0), "01:00:00.000");
    assert_eq!(format_timecode(7325.5), "02:02:05.500");
}
