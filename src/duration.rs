//! Parsing and formatting of human-readable durations.
//!
//! Accepted input is a sequence of `<number><unit>` segments, e.g. `30s`,
//! `500ms`, `1m30s` or `1.5h`. A bare `0` is also accepted.

use std::time::Duration;

use crate::error::{Error, Result};

/// Parse a duration string into a Duration
///
/// Units: ms, s, m, h, d, w (and their long spellings).
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim().to_lowercase();
    let invalid = |message: String| Error::InvalidDuration {
        input: input.to_string(),
        message,
    };

    if text.is_empty() {
        return Err(invalid("duration string cannot be empty".to_string()));
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_ms = 0f64;
    let mut rest = text.as_str();

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(invalid("expected a number before each unit".to_string()));
        }
        let number_str = &rest[..number_end];
        let number: f64 = number_str
            .parse()
            .map_err(|_| invalid(format!("invalid number '{}'", number_str)))?;

        rest = &rest[number_end..];
        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let scale_ms = match unit {
            "ms" | "msec" | "millisecond" | "milliseconds" => 1.0,
            "s" | "sec" | "second" | "seconds" => 1_000.0,
            "m" | "min" | "minute" | "minutes" => 60_000.0,
            "h" | "hr" | "hour" | "hours" => 3_600_000.0,
            "d" | "day" | "days" => 86_400_000.0,
            "w" | "week" | "weeks" => 604_800_000.0,
            "" => return Err(invalid(format!("missing unit after '{}'", number_str))),
            other => {
                return Err(invalid(format!(
                    "unknown unit '{}'. Valid units: ms, s, m, h, d, w",
                    other
                )))
            }
        };
        total_ms += number * scale_ms;
    }

    Ok(Duration::from_micros((total_ms * 1_000.0).round() as u64))
}

/// Render a duration compactly: `250ms`, `1.5s`, `2m3s`, `1h0m0s`.
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        return format!("{}µs", micros);
    }
    if micros < 1_000_000 {
        return format!("{}ms", decimal(micros, 1_000));
    }

    let millis = duration.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = decimal(millis % 60_000, 1_000);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `value / unit` with up to three decimals, trailing zeros removed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = (value % unit) * 1_000 / unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let text = format!("{}.{:03}", whole, fraction);
    text.trim_end_matches('0').to_string()
}
