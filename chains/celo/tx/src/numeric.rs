//! Normalization of numeric inputs into minimal big-endian byte strings.
use crate::error::FormatError;
use rosetta_celo_types::{ext::const_hex, Bytes, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A numeric transaction field as supplied by the caller: a machine integer, a big integer or
/// a decimal / `0x` hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Numeric {
    Int(i128),
    Big(U256),
    Text(String),
}

impl Numeric {
    /// Resolves the value as an unsigned integer.
    ///
    /// `"0x"` resolves to zero. A negative value fails with [`FormatError::Negative`].
    ///
    /// # Errors
    /// Returns `Err` if the value is negative, overflows 256 bits or isn't a number at all.
    pub fn to_u256(&self) -> Result<U256, FormatError> {
        match self {
            Self::Int(value) if *value < 0 => Err(FormatError::Negative(value.to_string())),
            Self::Int(value) => Ok(U256::from(value.unsigned_abs())),
            Self::Big(value) => Ok(*value),
            Self::Text(text) => parse_text(text.trim()),
        }
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(self.to_u256(), Err(FormatError::Negative(_)))
    }
}

fn parse_text(text: &str) -> Result<U256, FormatError> {
    if let Some(magnitude) = text.strip_prefix('-') {
        return match parse_unsigned(magnitude)? {
            value if value.is_zero() => Ok(value),
            _ => Err(FormatError::Negative(text.to_string())),
        };
    }
    parse_unsigned(text)
}

fn parse_unsigned(text: &str) -> Result<U256, FormatError> {
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if digits.is_empty() {
            return Ok(U256::zero());
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FormatError::InvalidNumber(text.to_string()));
        }
        if digits.trim_start_matches('0').len() > 64 {
            return Err(FormatError::Overflow(text.to_string()));
        }
        return U256::from_str_radix(digits, 16)
            .map_err(|_| FormatError::InvalidNumber(text.to_string()));
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidNumber(text.to_string()));
    }
    U256::from_dec_str(text).map_err(|_| FormatError::Overflow(text.to_string()))
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Numeric {
                fn from(value: $ty) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl From<u128> for Numeric {
    fn from(value: u128) -> Self {
        i128::try_from(value).map_or_else(|_| Self::Big(U256::from(value)), Self::Int)
    }
}

impl From<U256> for Numeric {
    fn from(value: U256) -> Self {
        Self::Big(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Numeric {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Big(value) => write!(f, "{value:#x}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumericVisitor;

        impl<'de> de::Visitor<'de> for NumericVisitor {
            type Value = Numeric;

            fn expecting(&self, f: &mut Formatter) -> FmtResult {
                f.write_str("an integer, a decimal string or a 0x prefixed hex string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }

            fn visit_i128<E: de::Error>(self, value: i128) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }

            fn visit_u128<E: de::Error>(self, value: u128) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Numeric, E> {
                Ok(Numeric::from(value))
            }
        }

        deserializer.deserialize_any(NumericVisitor)
    }
}

/// Minimal big-endian bytes of `value`; zero is the empty string.
#[must_use]
pub fn uint_to_bytes(value: U256) -> Bytes {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    Bytes::trim_leading_zeros(&buf)
}

/// Normalizes an optional numeric field; absent, `"0x"` and zero all become `0x`.
///
/// # Errors
/// Returns `Err` if the value can't be read as a non-negative integer.
pub fn normalize_numeric(value: Option<&Numeric>) -> Result<Bytes, FormatError> {
    match value {
        Some(value) => value.to_u256().map(uint_to_bytes),
        None => Ok(Bytes::new()),
    }
}

/// Same as [`normalize_numeric`], rendered as an even length `0x` hex string.
///
/// # Errors
/// Returns `Err` if the value can't be read as a non-negative integer.
pub fn numeric_to_hex(value: Option<&Numeric>) -> Result<String, FormatError> {
    normalize_numeric(value).map(|bytes| bytes.to_string())
}

/// Reads a canonical RLP integer of at most 8 bytes, rejecting leading zeros.
#[must_use]
pub fn bytes_to_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > 8 || bytes.first() == Some(&0) {
        return None;
    }
    Some(bytes.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Strips every leading `0` nibble of a `0x` hex string.
#[must_use]
pub fn trim_leading_zero(hex: &str) -> String {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    format!("0x{}", digits.trim_start_matches('0'))
}

/// Pads a `0x` hex string with a single zero nibble when it has an odd number of digits.
#[must_use]
pub fn make_even(hex: &str) -> String {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() % 2 == 1 {
        format!("0x0{digits}")
    } else {
        format!("0x{digits}")
    }
}

/// Decodes a `0x` hex string produced by [`make_even`].
///
/// # Errors
/// Returns `Err` if the string isn't valid even length hex.
pub fn hex_to_bytes(hex: &str) -> Result<Bytes, FormatError> {
    Ok(const_hex::decode(hex)?.into())
}
