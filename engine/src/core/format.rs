//! Formatting helpers for presenting metrics.

pub fn format_ms(value: f64) -> String {
    format!("{value:.0} ms")
}

/// Accuracy values are already percentages with one decimal.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Signed millisecond difference, e.g. `+150 ms` / `-42 ms`.
pub fn format_signed_ms(value: f64) -> String {
    let rounded = value.round();
    if rounded > 0.0 {
        format!("+{rounded:.0} ms")
    } else if rounded < 0.0 {
        format!("{rounded:.0} ms")
    } else {
        "0 ms".to_string()
    }
}

/// `mm:ss` for total run durations.
pub fn format_clock(total_ms: u64) -> String {
    let secs = (total_ms as f64 / 1000.0).round() as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Seconds with six decimals and a comma separator (`0,512000`).
pub fn format_seconds_comma(rt_ms: u64) -> String {
    format!("{:.6}", rt_ms as f64 / 1000.0).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_rounds_to_nearest_second() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61_499), "01:01");
        assert_eq!(format_clock(61_500), "01:02");
    }

    #[test]
    fn seconds_use_comma_separator() {
        assert_eq!(format_seconds_comma(512), "0,512000");
        assert_eq!(format_seconds_comma(1_250), "1,250000");
    }

    #[test]
    fn signed_ms_keeps_direction() {
        assert_eq!(format_signed_ms(150.0), "+150 ms");
        assert_eq!(format_signed_ms(-42.4), "-42 ms");
        assert_eq!(format_signed_ms(0.2), "0 ms");
        assert_eq!(format_signed_ms(-0.2), "0 ms");
    }
}
