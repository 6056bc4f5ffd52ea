use crate::config::{CENTS_PER_UNIT, WEIGHT_BASE};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for trimming formatted numbers
static TRAILING_TENTH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.0$").unwrap());
static TRAILING_CENTS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.0+$").unwrap());

/// One decimal place taken from the exact binary value, an exact tie
/// going to the larger neighbour.
fn to_tenths(value: f64) -> String {
    // exact ties at one decimal are the odd multiples of 0.25
    let quarters = value * 4.0;
    let is_tie = quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0;
    let rounded = if is_tie {
        format!("{:.1}", (value * 10.0).ceil() / 10.0)
    } else {
        format!("{:.1}", value)
    };
    match rounded.as_str() {
        "-0.0" => "0.0".to_string(),
        _ => rounded,
    }
}

/// Scale a garment weight in `[0, 1]` to the `0..=10` display range.
///
/// # Examples
/// ```
/// use pipeline_visualizer::utils::format_weight;
/// assert_eq!(format_weight(0.30), "3");
/// assert_eq!(format_weight(0.35), "3.5");
/// assert_eq!(format_weight(0.357), "3.6");
/// ```
pub fn format_weight(weight: f64) -> String {
    let scaled = to_tenths(weight * WEIGHT_BASE);
    TRAILING_TENTH_REGEX.replace(&scaled, "").into_owned()
}

/// Format a price in cents as currency units, dropping an all-zero
/// fractional part (`1250` → `"12.50"`, `1200` → `"12"`).
pub fn format_price(cents: u64) -> String {
    let units = format!("{:.2}", cents as f64 / CENTS_PER_UNIT);
    TRAILING_CENTS_REGEX.replace(&units, "").into_owned()
}

/// Format an explanation value for the detail table.
pub fn format_reason_value(value: f64) -> String {
    format!("{:.2}", value + 0.0)
}

/// Whole milliseconds from a duration in seconds.
pub fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

/// Milliseconds from a decimal string of seconds, `None` if it is not a number.
pub fn parse_seconds_to_ms(input: &str) -> Option<i64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite())
        .map(seconds_to_ms)
}

/// Current wall-clock time in milliseconds.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}
