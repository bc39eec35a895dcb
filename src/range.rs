//! Range and length predicates.
//!
//! YANG `range` and `length` restrictions are unions of inclusive intervals.
//! Bounds may be signed or unsigned 64-bit integers, scaled decimals, or the
//! symbolic `min` / `max` sentinels. [`Number`] holds every one of those
//! without precision loss, so boundary values such as `u64::MAX` or
//! `i64::MIN` compare exactly.

use std::cmp::Ordering;
use std::fmt::{self, Display};

/// Largest fraction-digit count permitted by RFC 6020 decimal64.
pub const MAX_FRACTION_DIGITS: u8 = 18;

/// A range bound or a value being tested against a range.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// The `min` sentinel; below every finite number.
    MinInf,
    /// The `max` sentinel; above every finite number.
    MaxInf,
    /// `value / 10^fraction_digits`.
    Finite { value: i128, fraction_digits: u8 },
}

impl Number {
    /// A signed integer.
    pub fn from_i64(value: i64) -> Self {
        Number::Finite {
            value: value as i128,
            fraction_digits: 0,
        }
    }

    /// An unsigned integer.
    pub fn from_u64(value: u64) -> Self {
        Number::Finite {
            value: value as i128,
            fraction_digits: 0,
        }
    }

    /// A decimal already scaled by `10^fraction_digits`.
    pub fn from_scaled(value: i64, fraction_digits: u8) -> Self {
        Number::Finite {
            value: value as i128,
            fraction_digits: fraction_digits.min(MAX_FRACTION_DIGITS),
        }
    }

    /// A decimal carried as a float, rounded to `fraction_digits` places.
    ///
    /// Returns `None` for NaN, infinities, or values whose scaled form does
    /// not fit in a decimal64.
    pub fn from_decimal(value: f64, fraction_digits: u8) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let fraction_digits = fraction_digits.min(MAX_FRACTION_DIGITS);
        let scaled = (value * 10f64.powi(fraction_digits as i32)).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Number::Finite {
            value: scaled as i128,
            fraction_digits,
        })
    }

    /// The `min` sentinel.
    pub fn min_inf() -> Self {
        Number::MinInf
    }

    /// The `max` sentinel.
    pub fn max_inf() -> Self {
        Number::MaxInf
    }

    /// Returns true for the `min` / `max` sentinels.
    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Number::Finite { .. })
    }

    fn rescaled(value: i128, from: u8, to: u8) -> i128 {
        value.saturating_mul(10i128.pow((to - from) as u32))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::MinInf, Number::MinInf) | (Number::MaxInf, Number::MaxInf) => Ordering::Equal,
            (Number::MinInf, _) | (_, Number::MaxInf) => Ordering::Less,
            (Number::MaxInf, _) | (_, Number::MinInf) => Ordering::Greater,
            (
                Number::Finite {
                    value: a,
                    fraction_digits: fa,
                },
                Number::Finite {
                    value: b,
                    fraction_digits: fb,
                },
            ) => {
                let scale = (*fa).max(*fb);
                Number::rescaled(*a, *fa, scale).cmp(&Number::rescaled(*b, *fb, scale))
            }
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::MinInf => write!(f, "min"),
            Number::MaxInf => write!(f, "max"),
            Number::Finite {
                value,
                fraction_digits: 0,
            } => write!(f, "{}", value),
            Number::Finite {
                value,
                fraction_digits,
            } => {
                let divisor = 10i128.pow(*fraction_digits as u32);
                let sign = if *value < 0 { "-" } else { "" };
                let abs = value.unsigned_abs();
                write!(
                    f,
                    "{}{}.{:0width$}",
                    sign,
                    abs / divisor as u128,
                    abs % divisor as u128,
                    width = *fraction_digits as usize
                )
            }
        }
    }
}

/// A single inclusive interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YangRange {
    pub min: Number,
    pub max: Number,
}

impl YangRange {
    /// Creates an interval from two bounds.
    pub fn new(min: Number, max: Number) -> Self {
        Self { min, max }
    }

    /// A signed integer interval.
    pub fn int(min: i64, max: i64) -> Self {
        Self::new(Number::from_i64(min), Number::from_i64(max))
    }

    /// An unsigned integer interval.
    pub fn uint(min: u64, max: u64) -> Self {
        Self::new(Number::from_u64(min), Number::from_u64(max))
    }

    /// A length interval; `None` as the upper bound means `max`.
    pub fn length(min: u64, max: Option<u64>) -> Self {
        Self::new(
            Number::from_u64(min),
            max.map(Number::from_u64).unwrap_or(Number::MaxInf),
        )
    }

    /// Returns true if `max < min`.
    pub fn is_inverted(&self) -> bool {
        self.max < self.min
    }
}

impl Display for YangRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// Returns true if `value` lies within `range`, inclusive on both ends.
pub fn in_range(range: &YangRange, value: Number) -> bool {
    range.min <= value && value <= range.max
}

/// Returns true if `ranges` is empty or `value` lies within any interval.
pub fn in_ranges(ranges: &[YangRange], value: Number) -> bool {
    ranges.is_empty() || ranges.iter().any(|r| in_range(r, value))
}

/// Renders a union of intervals the way YANG spells it (`1..5 | 10`).
pub fn ranges_to_string(ranges: &[YangRange]) -> String {
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}
