//! Exact fixed-point decimal values.
//!
//! Money-like cells decode to [`Decimal`], an integer mantissa paired with a
//! base-10 scale. Parsing keeps the input digits exactly as written; no
//! binary floating point is involved at any step.
//!
//! # Example
//!
//! ```
//! use rowbind_model::Decimal;
//!
//! let cost: Decimal = "50000.03".parse()?;
//! assert_eq!(cost, Decimal::new(5000003, 2));
//! assert_eq!(cost.to_string(), "50000.03");
//! # Ok::<(), rowbind_model::ParseDecimalError>(())
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::ConfigError;

/// An exact decimal: `digits * 10^(-scale)`.
///
/// Comparison and equality are value-based, so `1.5` equals `1.50` even
/// though the two carry different scales. Display keeps the stored scale,
/// which preserves trailing zeros the way they were parsed.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    digits: i128,
    scale: u32,
}

/// Text that does not parse as a plain decimal literal, or whose digits do
/// not fit the mantissa range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid decimal literal {text:?}")]
pub struct ParseDecimalError {
    pub text: String,
}

impl Decimal {
    /// Creates a decimal from its integer mantissa and base-10 scale.
    /// `Decimal::new(5000003, 2)` is `50000.03`.
    pub const fn new(digits: i128, scale: u32) -> Self {
        Self { digits, scale }
    }

    /// Integer mantissa.
    pub const fn digits(&self) -> i128 {
        self.digits
    }

    /// Base-10 scale: how many mantissa digits sit right of the point.
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Converts a float that has an exact decimal expansion in range.
    ///
    /// A binary float is `mantissa * 2^exponent`; for a negative exponent
    /// the exact decimal expansion is `mantissa * 5^k` at scale `k`, which
    /// quickly outgrows the mantissa range for floats that were never
    /// decimal to begin with. `1.5` and `5.0` convert; `0.1` does not,
    /// because its exact expansion reflects the binary rounding error
    /// rather than the literal the programmer wrote.
    pub fn try_from_f64(value: f64) -> Result<Self, ConfigError> {
        let inexact = || ConfigError::InexactDecimal { value };
        if !value.is_finite() {
            return Err(inexact());
        }
        if value == 0.0 {
            return Ok(Self::new(0, 0));
        }

        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mut mantissa, mut exponent) = if biased == 0 {
            (fraction, -1074_i32)
        } else {
            (fraction | (1u64 << 52), biased - 1075)
        };
        while mantissa & 1 == 0 {
            mantissa >>= 1;
            exponent += 1;
        }

        let mut digits = i128::from(mantissa);
        let mut scale = 0;
        if exponent >= 0 {
            for _ in 0..exponent {
                digits = digits.checked_mul(2).ok_or_else(inexact)?;
            }
        } else {
            // mantissa * 2^-k == mantissa * 5^k at scale k
            scale = exponent.unsigned_abs();
            for _ in 0..scale {
                digits = digits.checked_mul(5).ok_or_else(inexact)?;
            }
        }
        if negative {
            digits = -digits;
        }
        Ok(Self::new(digits, scale))
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses an optional sign, digits, and at most one point. Surrounding
    /// whitespace is tolerated; exponents are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError { text: s.to_owned() };
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let mut digits = 0_i128;
        for ch in int_part.chars().chain(frac_part.chars()) {
            let digit = ch.to_digit(10).ok_or_else(invalid)?;
            digits = digits
                .checked_mul(10)
                .and_then(|d| d.checked_add(i128::from(digit)))
                .ok_or_else(invalid)?;
        }
        if negative {
            digits = -digits;
        }
        Ok(Self::new(digits, frac_part.len() as u32))
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::new(i128::from(n), 0)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_from_f64(value)
    }
}

fn rescale(digits: i128, by: u32) -> Option<i128> {
    let mut scaled = digits;
    for _ in 0..by {
        scaled = scaled.checked_mul(10)?;
    }
    Some(scaled)
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => self.digits.cmp(&other.digits),
            // compare on the wider scale; if rescaling overflows i128 the
            // rescaled side has the larger magnitude and its sign decides
            Ordering::Less => match rescale(self.digits, other.scale - self.scale) {
                Some(lhs) => lhs.cmp(&other.digits),
                None => {
                    if self.digits < 0 {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
            },
            Ordering::Greater => match rescale(other.digits, self.scale - other.scale) {
                Some(rhs) => self.digits.cmp(&rhs),
                None => {
                    if other.digits < 0 {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }
            },
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.digits);
        }
        let sign = if self.digits < 0 { "-" } else { "" };
        let digits = self.digits.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if digits.len() <= scale {
            write!(f, "{sign}0.{digits:0>scale$}")
        } else {
            let split = digits.len() - scale;
            write!(f, "{sign}{}.{}", &digits[..split], &digits[split..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn parses_integers_and_fractions() {
        assert_eq!(dec("5"), Decimal::new(5, 0));
        assert_eq!(dec("50000.03"), Decimal::new(5000003, 2));
        assert_eq!(dec("202000.44"), Decimal::new(20200044, 2));
        assert_eq!(dec(" 12.5 "), Decimal::new(125, 1));
    }

    #[test]
    fn parses_signs_and_bare_fractions() {
        assert_eq!(dec("-.5"), Decimal::new(-5, 1));
        assert_eq!(dec("+3.10"), Decimal::new(310, 2));
        assert_eq!(dec("-0.5"), Decimal::new(-5, 1));
        assert_eq!(dec("5."), Decimal::new(5, 0));
    }

    #[test]
    fn rejects_malformed_literals() {
        for text in ["", ".", "-", "abc", "1.2.3", "--5", "1e3", "5 0"] {
            assert!(text.parse::<Decimal>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn equality_is_value_based() {
        assert_eq!(dec("1.5"), dec("1.50"));
        assert_eq!(dec("0"), dec("0.000"));
        assert_ne!(dec("1.5"), dec("1.51"));
    }

    #[test]
    fn orders_across_scales() {
        assert!(dec("1.5") < dec("1.51"));
        assert!(dec("-2") < dec("0.1"));
        assert!(dec("10") > dec("9.999"));
    }

    #[test]
    fn ordering_survives_rescale_overflow() {
        let huge_scale = Decimal::new(1, 39);
        assert!(Decimal::new(2, 0) > huge_scale);
        assert!(Decimal::new(-2, 0) < Decimal::new(-1, 39));
        assert!(huge_scale > Decimal::new(-2, 0));
    }

    #[test]
    fn display_pads_small_magnitudes() {
        assert_eq!(Decimal::new(3, 3).to_string(), "0.003");
        assert_eq!(Decimal::new(-1, 2).to_string(), "-0.01");
        assert_eq!(Decimal::new(0, 2).to_string(), "0.00");
        assert_eq!(Decimal::new(310, 2).to_string(), "3.10");
    }

    #[test]
    fn exact_floats_convert() {
        assert_eq!(Decimal::try_from_f64(1.5).expect("exact"), dec("1.5"));
        assert_eq!(Decimal::try_from_f64(5.0).expect("exact"), dec("5"));
        assert_eq!(Decimal::try_from_f64(0.25).expect("exact"), dec("0.25"));
        assert_eq!(Decimal::try_from_f64(-2.75).expect("exact"), dec("-2.75"));
        assert_eq!(Decimal::try_from_f64(0.0).expect("exact"), dec("0"));
    }

    #[test]
    fn lossy_floats_are_rejected() {
        for value in [0.1, 1.1, 1.0 / 3.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    Decimal::try_from_f64(value),
                    Err(ConfigError::InexactDecimal { .. })
                ),
                "accepted {value}"
            );
        }
    }
}
