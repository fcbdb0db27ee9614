//! Display formatting for numbers that may be missing.
//!
//! Nothing here fails: every function returns a string that can be rendered as is.
//! Missing values, non-finite floats and non-numeric JSON all take the fallback.

use serde_json::Value;

use crate::models::OrderedRatios;

/// Placeholder shown for absent or unusable values
pub const FALLBACK: &str = "N/A";

/// A value that may or may not hold a finite number
pub trait FiniteValue {
    fn finite(&self) -> Option<f64>;
}

impl FiniteValue for f64 {
    fn finite(&self) -> Option<f64> {
        Some(*self).filter(|n| n.is_finite())
    }
}

impl FiniteValue for f32 {
    fn finite(&self) -> Option<f64> {
        f64::from(*self).finite()
    }
}

impl FiniteValue for u64 {
    fn finite(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl FiniteValue for i64 {
    fn finite(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl FiniteValue for u32 {
    fn finite(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl FiniteValue for Value {
    fn finite(&self) -> Option<f64> {
        self.as_f64().filter(|n| n.is_finite())
    }
}

impl<T: FiniteValue> FiniteValue for Option<T> {
    fn finite(&self) -> Option<f64> {
        self.as_ref().and_then(FiniteValue::finite)
    }
}

impl<T: FiniteValue + ?Sized> FiniteValue for &T {
    fn finite(&self) -> Option<f64> {
        (**self).finite()
    }
}

/// Every finite `f64` has an exact decimal expansion within this many fractional digits
const EXACT_FRACTION_DIGITS: usize = 1074;

/// `value` with exactly `places` decimals, or `fallback`
///
/// Rounds on the exact binary value, with halves going away from zero: `4.25` gives
/// `"4.3"` at one place, while `1.005` (stored just below the half) gives `"1.00"`.
pub fn safe_fixed(value: impl FiniteValue, places: usize, fallback: &str) -> String {
    match value.finite() {
        Some(n) => round_half_away_from_zero(n, places),
        None => fallback.to_string(),
    }
}

fn round_half_away_from_zero(n: f64, places: usize) -> String {
    let precision = EXACT_FRACTION_DIGITS.max(places + 1);
    let exact = format!("{:.*}", precision, n.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().take(places))
        .collect();
    if fraction.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if n < 0.0 {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| char::from(*d)));
    if places > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|d| char::from(*d)));
    }
    out
}

/// `ratio * 100` with exactly `places` decimals, or `fallback`; no `%` sign
pub fn safe_percent(ratio: impl FiniteValue, places: usize, fallback: &str) -> String {
    safe_fixed(ratio.finite().map(|r| r * 100.0), places, fallback)
}

/// Like [`safe_percent`] with a trailing `%`; the fallback is returned bare
pub fn percent_label(ratio: impl FiniteValue, places: usize, fallback: &str) -> String {
    match ratio.finite().map(|r| r * 100.0).finite() {
        Some(percent) => format!("{}%", safe_fixed(percent, places, fallback)),
        None => fallback.to_string(),
    }
}

/// `"label (pp.p%)"` per entry in document order
///
/// An empty distribution yields the single entry [`FALLBACK`] so the list is never
/// rendered as nothing. An entry whose ratio is unusable reads `"label (N/A)"`.
pub fn format_occupation_list(occupations: &OrderedRatios) -> Vec<String> {
    if occupations.is_empty() {
        return vec![FALLBACK.to_string()];
    }
    occupations
        .iter()
        .map(|(label, ratio)| format!("{} ({})", label, percent_label(ratio, 1, FALLBACK)))
        .collect()
}

/// One-based rank badge for a zero-based position
pub fn rank_label(index: usize) -> String {
    format!("#{}", index + 1)
}
