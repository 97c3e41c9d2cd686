use crate::{format::FormatTag, numeric::uint_to_bytes};
use rosetta_celo_types::{Bytes, Signature, U256};
use serde::{Deserialize, Serialize};

/// `(v, r, s)` in the minimal form stored inside a signed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSignature {
    pub v: Bytes,
    pub r: Bytes,
    pub s: Bytes,
}

/// Converts a signature into its RLP body encoding.
///
/// Typed formats carry the y-parity as `v` (`27` and `0` map to `0`, `28` and `1` to `1`),
/// legacy transactions keep `v` as is. Every value is trimmed of its leading zero bytes, zero
/// being the empty string.
#[must_use]
pub fn format_signature(signature: &Signature, tx_type: FormatTag) -> FormattedSignature {
    let v = match tx_type {
        FormatTag::Legacy => signature.v.as_u64(),
        FormatTag::Eip1559 | FormatTag::Cip42 => signature.v.y_parity(),
    };
    FormattedSignature {
        v: uint_to_bytes(U256::from(v)),
        r: uint_to_bytes(signature.r),
        s: uint_to_bytes(signature.s),
    }
}

/// Left pads a canonical `r` or `s` back to 32 bytes, `None` if it is longer than that.
#[must_use]
pub fn pad_to_32(bytes: &[u8]) -> Option<[u8; 32]> {
    let offset = 32usize.checked_sub(bytes.len())?;
    let mut padded = [0u8; 32];
    padded[offset..].copy_from_slice(bytes);
    Some(padded)
}
