use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagMode {
    On,
    Off,
    Rollout,
}

impl FlagMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FlagMode::On => "on",
            FlagMode::Off => "off",
            FlagMode::Rollout => "rollout",
        }
    }
}

/// Parses a raw `FEATURE_*` value. Unknown, empty and missing values are `Off`.
pub fn parse_flag_mode(raw: Option<&str>) -> FlagMode {
    let Some(raw) = raw else {
        return FlagMode::Off;
    };

    match raw.trim().to_lowercase().as_str() {
        "on" | "true" => FlagMode::On,
        "rollout" => FlagMode::Rollout,
        _ => FlagMode::Off,
    }
}

/// Parses a raw `ROLLOUT_*_PERCENT` value.
///
/// Leading whitespace and an optional sign are accepted and the leading run
/// of digits is used, so `"25%"` reads as 25. No digits at all reads as 0.
/// The result is not clamped; bucketing treats anything outside 1..=99 as
/// all-or-nothing.
pub fn parse_rollout_percent(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 0;
    }

    // Saturate instead of failing on absurdly long inputs.
    let value = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    if negative { -value } else { value }
}
