use crate::Bytes;
use alloc::vec::Vec;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// A node of an RLP tree: either a byte string or a list of nodes.
///
/// Transaction payloads are handled as ordered lists of these items so each wire format only
/// has to pick its field order.
///
/// ```
/// use rosetta_celo_types::{Bytes, RlpItem};
/// let item = RlpItem::List(vec![RlpItem::Bytes(Bytes::from_static(b"cat")), RlpItem::empty()]);
/// let out = rlp::encode(&item);
/// assert_eq!(&out[..], &[0xc5, 0x83, b'c', b'a', b't', 0x80][..]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RlpItem {
    Bytes(Bytes),
    List(Vec<RlpItem>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum RlpItemError {
    #[cfg_attr(feature = "std", error("expected an rlp byte string, found a list"))]
    ExpectedBytes,
    #[cfg_attr(feature = "std", error("expected an rlp list, found a byte string"))]
    ExpectedList,
    #[cfg_attr(feature = "std", error("unexpected rlp item length"))]
    UnexpectedLength,
}

impl RlpItem {
    /// The empty byte string, encoded as `0x80`.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// # Errors
    /// Returns `Err` if the item is a list.
    pub fn as_bytes(&self) -> Result<&Bytes, RlpItemError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::List(_) => Err(RlpItemError::ExpectedBytes),
        }
    }

    /// # Errors
    /// Returns `Err` if the item is a byte string.
    pub fn as_list(&self) -> Result<&[Self], RlpItemError> {
        match self {
            Self::List(items) => Ok(items.as_slice()),
            Self::Bytes(_) => Err(RlpItemError::ExpectedList),
        }
    }

    /// Decodes a complete RLP encoded buffer, rejecting trailing bytes.
    ///
    /// # Errors
    /// Returns `Err` if the buffer is not exactly one well-formed RLP item.
    pub fn decode_exact(data: &[u8]) -> Result<Self, DecoderError> {
        let rlp = Rlp::new(data);
        let info = rlp.payload_info()?;
        if info.total() != data.len() {
            return Err(DecoderError::RlpInconsistentLengthAndData);
        }
        Self::decode(&rlp)
    }
}

impl From<Bytes> for RlpItem {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<Self>> for RlpItem {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl Encodable for RlpItem {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            Self::Bytes(bytes) => bytes.rlp_append(s),
            Self::List(items) => {
                s.begin_list(items.len());
                for item in items {
                    s.append(item);
                }
            },
        }
    }
}

impl Decodable for RlpItem {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if !rlp.is_list() {
            return Bytes::decode(rlp).map(Self::Bytes);
        }
        // `Rlp::iter` stops at the first malformed item, so make sure the whole payload was used.
        let payload = rlp.payload_info()?;
        let mut consumed = 0;
        let mut items = Vec::new();
        for item in rlp.iter() {
            consumed += item.as_raw().len();
            items.push(Self::decode(&item)?);
        }
        if consumed != payload.value_len {
            return Err(DecoderError::RlpInconsistentLengthAndData);
        }
        Ok(Self::List(items))
    }
}

/// Encodes `items` as an RLP list.
#[must_use]
pub fn encode_list(items: &[RlpItem]) -> Bytes {
    let mut stream = RlpStream::new_list(items.len());
    for item in items {
        stream.append(item);
    }
    stream.out().freeze().into()
}

#[cfg(test)]
mod tests {
    use super::{encode_list, RlpItem};
    use crate::Bytes;
    use hex_literal::hex;

    #[test]
    fn encode_list_works() {
        let items = [
            RlpItem::Bytes(Bytes::from([0x01])),
            RlpItem::empty(),
            RlpItem::Bytes(Bytes::from(hex!("abcdef"))),
            RlpItem::List(vec![]),
        ];
        assert_eq!(encode_list(&items), hex!("c7018083abcdefc0").to_vec());
    }

    #[test]
    fn list_header_counts_each_item_once() {
        let item = RlpItem::List(vec![
            RlpItem::Bytes(Bytes::from([0x01])),
            RlpItem::List(vec![RlpItem::Bytes(Bytes::from(hex!("abcdef"))), RlpItem::empty()]),
            RlpItem::Bytes(Bytes::from(hex!("ff"))),
        ]);
        let encoded = rlp::encode(&item);
        assert_eq!(&encoded[..], &hex!("c901c583abcdef8081ff")[..]);
        assert_eq!(RlpItem::decode_exact(&encoded).unwrap(), item);

        let flat = encode_list(&[RlpItem::empty(), RlpItem::empty(), RlpItem::empty()]);
        assert_eq!(flat, hex!("c3808080").to_vec());
    }

    #[test]
    fn long_string_uses_length_of_length() {
        let item = RlpItem::Bytes(Bytes::from([0xaa; 56]));
        let encoded = rlp::encode(&item);
        assert_eq!(&encoded[..2], &[0xb8, 56][..]);
        assert_eq!(RlpItem::decode_exact(&encoded).unwrap(), item);
    }

    #[test]
    fn decode_exact_rejects_trailing_bytes() {
        assert!(RlpItem::decode_exact(&hex!("c18000")).is_err());
        assert!(RlpItem::decode_exact(&hex!("c3")).is_err());
        // inner item overruns the list payload
        assert!(RlpItem::decode_exact(&hex!("c28300")).is_err());
        assert_eq!(
            RlpItem::decode_exact(&hex!("c20180")).unwrap(),
            RlpItem::List(vec![RlpItem::Bytes(Bytes::from([0x01])), RlpItem::empty()])
        );
    }

    #[test]
    fn accessors_check_shape() {
        assert!(RlpItem::empty().as_list().is_err());
        assert!(RlpItem::List(vec![]).as_bytes().is_err());
        assert!(RlpItem::List(vec![]).is_list());
    }
}
