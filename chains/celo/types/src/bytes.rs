use alloc::{string::String, vec::Vec};
use core::{
    borrow::Borrow,
    fmt::{Debug, Display, Formatter, LowerHex, Result as FmtResult},
    ops::Deref,
    str::FromStr,
};

/// Wrapper type around [`bytes::Bytes`] to support "0x" prefixed hex strings.
///
/// An empty `Bytes` is the canonical "0x" marker used for absent or zero fields.
#[derive(Clone, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bytes(
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "serialize_bytes", deserialize_with = "deserialize_bytes")
    )]
    pub bytes::Bytes,
);

impl const_hex::FromHex for Bytes {
    type Error = const_hex::FromHexError;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        const_hex::decode(hex).map(Into::into)
    }
}

impl FromIterator<u8> for Bytes {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        iter.into_iter().collect::<bytes::Bytes>().into()
    }
}

impl<'a> FromIterator<&'a u8> for Bytes {
    fn from_iter<T: IntoIterator<Item = &'a u8>>(iter: T) -> Self {
        iter.into_iter().copied().collect::<bytes::Bytes>().into()
    }
}

impl Bytes {
    /// Creates a new empty `Bytes`.
    ///
    /// ```
    /// use rosetta_celo_types::Bytes;
    ///
    /// let b = Bytes::new();
    /// assert_eq!(&b[..], b"");
    /// assert_eq!(b.to_string(), "0x");
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(bytes::Bytes::new())
    }

    /// Creates a new `Bytes` from a static slice.
    #[inline]
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(bytes::Bytes::from_static(bytes))
    }

    /// Copies `data` into a new `Bytes`.
    #[must_use]
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self(bytes::Bytes::copy_from_slice(data))
    }

    /// Returns a copy of `data` without its leading zero bytes.
    #[must_use]
    pub fn trim_leading_zeros(data: &[u8]) -> Self {
        let start = data.iter().position(|b| *b != 0).unwrap_or(data.len());
        Self::copy_from_slice(&data[start..])
    }

    fn hex_encode(&self) -> String {
        const_hex::encode(self.0.as_ref())
    }
}

impl Debug for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Bytes(0x{})", self.hex_encode())
    }
}

impl Display for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", self.hex_encode())
    }
}

impl LowerHex for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", self.hex_encode())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_ref()
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Borrow<[u8]> for Bytes {
    fn borrow(&self) -> &[u8] {
        self.as_ref()
    }
}

impl From<bytes::Bytes> for Bytes {
    fn from(src: bytes::Bytes) -> Self {
        Self(src)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(src: Vec<u8>) -> Self {
        Self(src.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(src: &[u8]) -> Self {
        Self::copy_from_slice(src)
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(src: [u8; N]) -> Self {
        Self(bytes::Bytes::copy_from_slice(src.as_slice()))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Bytes {
    fn from(src: &'a [u8; N]) -> Self {
        Self(bytes::Bytes::copy_from_slice(src))
    }
}

impl PartialEq<[u8]> for Bytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_ref() == other
    }
}

impl PartialEq<Vec<u8>> for Bytes {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_ref() == &other[..]
    }
}

impl rlp::Encodable for Bytes {
    fn rlp_append(&self, s: &mut rlp::RlpStream) {
        s.encoder().encode_value(self.as_ref());
    }
}

impl rlp::Decodable for Bytes {
    fn decode(rlp: &rlp::Rlp) -> Result<Self, rlp::DecoderError> {
        rlp.decoder().decode_value(|bytes| Ok(Self::copy_from_slice(bytes)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error), error("Failed to parse bytes: {0}"))]
pub struct ParseBytesError(const_hex::FromHexError);

impl FromStr for Bytes {
    type Err = ParseBytesError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        const_hex::FromHex::from_hex(value).map_err(ParseBytesError)
    }
}

/// Serialize bytes as "0x" prefixed hex string
///
/// # Errors
/// never fails
#[cfg(feature = "serde")]
pub fn serialize_bytes<S, T>(d: T, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<[u8]>,
{
    const_hex::serialize::<S, T>(d, s)
}

/// Deserialize bytes as "0x" prefixed hex string
///
/// # Errors
/// Returns `Err` if the string is not valid hex
#[cfg(feature = "serde")]
pub fn deserialize_bytes<'de, D>(d: D) -> Result<bytes::Bytes, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <String as serde::Deserialize>::deserialize(d)?;
    const_hex::decode(value).map(Into::into).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::Bytes;
    use hex_literal::hex;

    #[test]
    fn parse_and_display() {
        let bytes = "0xABcdef".parse::<Bytes>().unwrap();
        assert_eq!(bytes, hex!("abcdef").to_vec());
        assert_eq!(bytes.to_string(), "0xabcdef");
        assert_eq!("0x".parse::<Bytes>().unwrap(), Bytes::new());
        assert!("0xabc".parse::<Bytes>().is_err());
    }

    #[test]
    fn trim_leading_zeros_works() {
        assert_eq!(Bytes::trim_leading_zeros(&hex!("0000ab00")), hex!("ab00").to_vec());
        assert_eq!(Bytes::trim_leading_zeros(&[0u8; 4]), Bytes::new());
        assert_eq!(Bytes::trim_leading_zeros(&[]), Bytes::new());
    }

    #[test]
    fn rlp_codec_works() {
        let bytes = Bytes::from(hex!("abcdef"));
        let encoded = rlp::encode(&bytes);
        assert_eq!(&encoded[..], &hex!("83abcdef")[..]);
        assert_eq!(rlp::decode::<Bytes>(&encoded).unwrap(), bytes);

        // single bytes below 0x80 encode as themselves
        assert_eq!(&rlp::encode(&Bytes::from([0x7f]))[..], &[0x7f][..]);
        assert_eq!(&rlp::encode(&Bytes::new())[..], &[0x80][..]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_works() {
        let bytes = Bytes::from(hex!("abcdef"));
        let json = serde_json::to_value(&bytes).unwrap();
        assert_eq!(json, serde_json::json!("0xabcdef"));
        assert_eq!(serde_json::from_value::<Bytes>(json).unwrap(), bytes);
        assert_eq!(serde_json::to_value(Bytes::new()).unwrap(), serde_json::json!("0x"));
    }
}
