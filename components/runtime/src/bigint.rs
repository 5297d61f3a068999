//! Arbitrary-precision integer cells.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

/// A heap-allocated arbitrary-precision signed integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsBigInt {
    value: BigInt,
}

impl JsBigInt {
    /// Creates a bigint cell.
    pub fn new(value: BigInt) -> Self {
        JsBigInt { value }
    }

    /// Creates a bigint cell from an `i64`.
    pub fn from_i64(value: i64) -> Self {
        JsBigInt {
            value: BigInt::from(value),
        }
    }

    /// The contained integer.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// True for zero, the only falsy bigint.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// The decimal digits, without the `n` suffix.
    pub fn to_digits(&self) -> String {
        self.value.to_string()
    }

    /// Parses the digits of a bigint per `StringToBigInt`: optional
    /// whitespace, optional sign, then decimal, hex, octal or binary
    /// digits. Returns `None` for anything else (including a trailing
    /// `n`, which belongs to literal syntax, not string conversion).
    pub fn parse(text: &str) -> Option<BigInt> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(BigInt::zero());
        }
        let (sign, digits) = match trimmed.as_bytes()[0] {
            b'+' => (Sign::Plus, &trimmed[1..]),
            b'-' => (Sign::Minus, &trimmed[1..]),
            _ => (Sign::Plus, trimmed),
        };
        let (radix, digits) = if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            (16, rest)
        } else if let Some(rest) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
            (8, rest)
        } else if let Some(rest) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
            (2, rest)
        } else {
            (10, digits)
        };
        if digits.is_empty() {
            return None;
        }
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
        Some(if sign == Sign::Minus { -magnitude } else { magnitude })
    }

    /// `BigInt.asIntN(bits, value)`: reduces modulo 2^bits into the
    /// signed range [-2^(bits-1), 2^(bits-1)).
    pub fn as_int_n(bits: u64, value: &BigInt) -> BigInt {
        if bits == 0 {
            return BigInt::zero();
        }
        let modulus = BigInt::one() << bits;
        let mut reduced = value.mod_floor_positive(&modulus);
        let half = BigInt::one() << (bits - 1);
        if reduced >= half {
            reduced -= modulus;
        }
        reduced
    }

    /// `BigInt.asUintN(bits, value)`: reduces modulo 2^bits into the
    /// unsigned range [0, 2^bits).
    pub fn as_uint_n(bits: u64, value: &BigInt) -> BigInt {
        if bits == 0 {
            return BigInt::zero();
        }
        let modulus = BigInt::one() << bits;
        value.mod_floor_positive(&modulus)
    }

    /// Approximates the bigint as an `f64`, for display-side comparisons.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }
}

/// Non-negative remainder, the `mod_floor` that `asIntN`/`asUintN` need.
trait ModFloorPositive {
    fn mod_floor_positive(&self, modulus: &BigInt) -> BigInt;
}

impl ModFloorPositive for BigInt {
    fn mod_floor_positive(&self, modulus: &BigInt) -> BigInt {
        let remainder = self % modulus;
        if remainder.is_negative() {
            remainder + modulus
        } else {
            remainder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(JsBigInt::parse("123"), Some(BigInt::from(123)));
        assert_eq!(JsBigInt::parse("  -42  "), Some(BigInt::from(-42)));
        assert_eq!(JsBigInt::parse(""), Some(BigInt::zero()));
        assert_eq!(JsBigInt::parse("12.5"), None);
        assert_eq!(JsBigInt::parse("12n"), None);
    }

    #[test]
    fn test_parse_radixes() {
        assert_eq!(JsBigInt::parse("0x10"), Some(BigInt::from(16)));
        assert_eq!(JsBigInt::parse("0b101"), Some(BigInt::from(5)));
        assert_eq!(JsBigInt::parse("0o17"), Some(BigInt::from(15)));
    }

    #[test]
    fn test_as_int_n() {
        assert_eq!(JsBigInt::as_int_n(8, &BigInt::from(255)), BigInt::from(-1));
        assert_eq!(JsBigInt::as_int_n(8, &BigInt::from(127)), BigInt::from(127));
        assert_eq!(JsBigInt::as_int_n(8, &BigInt::from(128)), BigInt::from(-128));
        assert_eq!(JsBigInt::as_int_n(0, &BigInt::from(9)), BigInt::zero());
        assert_eq!(
            JsBigInt::as_int_n(32, &BigInt::from(4294967296i64 + 7)),
            BigInt::from(7)
        );
    }

    #[test]
    fn test_as_uint_n() {
        assert_eq!(JsBigInt::as_uint_n(8, &BigInt::from(256)), BigInt::zero());
        assert_eq!(JsBigInt::as_uint_n(8, &BigInt::from(-1)), BigInt::from(255));
        assert_eq!(JsBigInt::as_uint_n(8, &BigInt::from(255)), BigInt::from(255));
    }

    #[test]
    fn test_display_digits() {
        assert_eq!(JsBigInt::from_i64(-5).to_digits(), "-5");
    }
}
