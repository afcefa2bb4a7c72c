use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::{SplitError, TimestampErrorKind};

// @module: Clip timestamp parsing and normalization

// Field patterns accept one or two ASCII digits with the usual clock ranges;
// fractional seconds take one to six digits.
const HOURS: &str = r"(2[0-3]|[01][0-9]|[0-9])";
const MINUTES: &str = r"([0-5][0-9]|[0-9])";
const SECONDS: &str = r"([0-5][0-9]|[0-9])";
const FRACTION: &str = r"([0-9]{1,6})";

// @const: MM:SS
static MIN_SEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{MINUTES}:{SECONDS}$")).expect("valid MM:SS pattern")
});

// @const: MM:SS.f
static MIN_SEC_FRAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{MINUTES}:{SECONDS}\.{FRACTION}$")).expect("valid MM:SS.f pattern")
});

// @const: HH:MM:SS
static HOUR_MIN_SEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{HOURS}:{MINUTES}:{SECONDS}$")).expect("valid HH:MM:SS pattern")
});

// @const: HH:MM:SS.f
static HOUR_MIN_SEC_FRAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{HOURS}:{MINUTES}:{SECONDS}\.{FRACTION}$"))
        .expect("valid HH:MM:SS.f pattern")
});

/// A clip boundary as written in the clip list: `[HH:]MM:SS[.ffffff]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub micros: u32,
}

impl Timestamp {
    /// Parse a timestamp strictly.
    ///
    /// The shape is detected first (zero or one `.`, two or three `:` fields),
    /// then the whole string must match the pattern for that shape. Anything
    /// else is a `SplitError::TimestampFormat`.
    pub fn parse(input: &str) -> Result<Self, SplitError> {
        let has_fraction = match input.split('.').count() {
            1 => false,
            2 => true,
            _ => return Err(SplitError::timestamp(input, TimestampErrorKind::Decimal)),
        };

        let has_hours = match input.split(':').count() {
            2 => false,
            3 => true,
            _ => return Err(SplitError::timestamp(input, TimestampErrorKind::Colon)),
        };

        let pattern: &Regex = match (has_hours, has_fraction) {
            (false, false) => &*MIN_SEC,
            (false, true) => &*MIN_SEC_FRAC,
            (true, false) => &*HOUR_MIN_SEC,
            (true, true) => &*HOUR_MIN_SEC_FRAC,
        };

        let caps = pattern
            .captures(input)
            .ok_or_else(|| SplitError::timestamp(input, TimestampErrorKind::Pattern))?;

        let pattern_error = || SplitError::timestamp(input, TimestampErrorKind::Pattern);
        let field = |idx: usize| -> Result<u32, SplitError> {
            caps.get(idx)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(pattern_error)
        };

        let offset = usize::from(has_hours);
        let hours = if has_hours { field(1)? } else { 0 };
        let minutes = field(1 + offset)?;
        let seconds = field(2 + offset)?;
        let micros = if has_fraction {
            caps.get(3 + offset)
                .and_then(|m| fraction_to_micros(m.as_str()))
                .ok_or_else(pattern_error)?
        } else {
            0
        };

        Ok(Timestamp { hours, minutes, seconds, micros })
    }

    /// Total elapsed seconds
    pub fn as_seconds(&self) -> f64 {
        // Rendered script text depends on this summation order.
        (f64::from(self.micros) / 1_000_000.0)
            + f64::from(self.seconds)
            + f64::from(self.minutes * 60)
            + f64::from(self.hours * 3600)
    }
}

impl FromStr for Timestamp {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:06}",
            self.hours, self.minutes, self.seconds, self.micros
        )
    }
}

// "5" is half a second, "05" five hundredths: pad on the right to six digits.
fn fraction_to_micros(digits: &str) -> Option<u32> {
    format!("{:0<6}", digits).parse().ok()
}

/// Normalize a timestamp string to elapsed seconds
pub fn normalize(input: &str) -> Result<f64, SplitError> {
    Timestamp::parse(input).map(|ts| ts.as_seconds())
}

/// Render seconds the way the command script expects them.
///
/// Values are rounded to 12 significant digits, so `0:01.14` renders as
/// `1.14` and not as the nearest binary value. Whole values keep a trailing
/// `.0` (`5.0`). Magnitudes below `1e-4` or from `1e12` up use exponent
/// notation (`1e-06`).
pub fn format_seconds(seconds: f64) -> String {
    const SIGNIFICANT: i32 = 12;

    if !seconds.is_finite() {
        return seconds.to_string();
    }

    // Rounding first decides the exponent, e.g. 9.9999999999999 becomes 1e1.
    let scientific = format!("{:.*e}", (SIGNIFICANT - 1) as usize, seconds);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..SIGNIFICANT).contains(&exponent) {
        let precision = (SIGNIFICANT - 1 - exponent) as usize;
        let fixed = format!("{:.*}", precision, seconds);
        let trimmed = trim_fraction(&fixed);
        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{}.0", trimmed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

// "1.140000" -> "1.14", "5.000" -> "5"
fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
