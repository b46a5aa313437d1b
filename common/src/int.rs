//! A 256-bit signed integer stored in two's complement, the value type of
//! decoded `intN` data.

use ethabi::Token;
use std::cmp::Ordering;
use std::fmt;
use web3::types::U256;

fn twos_complement(u: U256) -> U256 {
    let (twos_complement, _) = (!u).overflowing_add(U256::one());
    twos_complement
}

/// A 256-bit signed integer.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct I256(U256);

impl I256 {
    /// Reinterpret a 256-bit word as a signed integer. Words greater than or
    /// equal to `1 << 255` are negative.
    pub fn from_raw(raw: U256) -> Self {
        I256(raw)
    }

    /// Interpret the low `bits` bits of `raw` as an `intN` value and sign
    /// extend it to 256 bits. Higher bits of `raw` are ignored.
    ///
    /// ```
    /// # use cheb3_common::int::I256;
    /// assert_eq!(I256::sign_extend(0xff.into(), 8), I256::from(-1));
    /// assert_eq!(I256::sign_extend(0x7f.into(), 8), I256::from(127));
    /// ```
    pub fn sign_extend(raw: U256, bits: usize) -> Self {
        if bits == 0 || bits >= 256 {
            return I256(raw);
        }
        let mask = (U256::one() << bits) - 1;
        let low = raw & mask;
        if low.bit(bits - 1) {
            I256(low | !mask)
        } else {
            I256(low)
        }
    }

    /// The two's complement word of the value.
    pub fn into_raw(self) -> U256 {
        self.0
    }

    /// Whether the value is less than zero.
    pub fn is_negative(self) -> bool {
        self.0.bit(255)
    }

    /// The absolute value. `I256::MIN` maps to `1 << 255`.
    pub fn unsigned_abs(self) -> U256 {
        if self.is_negative() {
            twos_complement(self.0)
        } else {
            self.0
        }
    }

    /// Whether the value is representable as an `intN` of `bits` bits.
    pub fn fits_bits(self, bits: usize) -> bool {
        I256::sign_extend(self.0, bits) == self
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        let abs = U256::from(value.unsigned_abs());
        if value < 0 {
            I256(twos_complement(abs))
        } else {
            I256(abs)
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for I256 {
                fn from(value: $t) -> Self {
                    I256::from(i128::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);

impl From<I256> for Token {
    fn from(value: I256) -> Self {
        Token::Int(value.into_raw())
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.unsigned_abs())
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(I256::from(-1).into_raw(), U256::MAX);
        assert_eq!(I256::from(5i8).into_raw(), U256::from(5));
        assert_eq!(I256::from(i128::MIN).unsigned_abs(), U256::one() << 127);
        assert_eq!(Token::from(I256::from(-2)), Token::Int(U256::MAX - 1));
    }

    #[test]
    fn display() {
        assert_eq!(I256::from(-1).to_string(), "-1");
        assert_eq!(I256::from(0).to_string(), "0");
        assert_eq!(I256::from(42).to_string(), "42");
        assert_eq!(
            I256::from_raw(U256::one() << 255).to_string(),
            "-57896044618658097711785492504343953926634992332820282019728792003956564819968",
        );
    }

    #[test]
    fn ordering() {
        assert!(I256::from(-1) < I256::from(0));
        assert!(I256::from(-2) < I256::from(-1));
        assert!(I256::from(3) > I256::from(2));
    }

    #[test]
    fn sign_extension() {
        assert_eq!(I256::sign_extend(0x80.into(), 8), I256::from(-128));
        assert_eq!(I256::sign_extend(0x1ff.into(), 8), I256::from(-1));
        assert_eq!(I256::sign_extend(0xff.into(), 16), I256::from(255));
        assert_eq!(I256::sign_extend(U256::MAX, 256), I256::from(-1));
    }

    #[test]
    fn width_checks() {
        assert!(I256::from(127).fits_bits(8));
        assert!(I256::from(-128).fits_bits(8));
        assert!(!I256::from(128).fits_bits(8));
        assert!(!I256::from(-129).fits_bits(8));
        assert!(I256::from(-129).fits_bits(16));
        assert!(I256::from_raw(U256::MAX - 5).fits_bits(256));
    }
}
