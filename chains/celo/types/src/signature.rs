use crate::U256;

/// An ECDSA signature
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Signature {
    /// The ECDSA recovery id, this value encodes the parity of the y-coordinate of the secp256k1
    /// signature. May also encode the chain_id for legacy EIP-155 transactions.
    pub v: RecoveryId,
    /// The ECDSA signature r
    pub r: U256,
    /// The ECDSA signature s
    pub s: U256,
}

impl Signature {
    /// Writes the signature in `r || s || y_parity` form.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_raw_signature(&self, output: &mut [u8; 65]) {
        self.r.to_big_endian(&mut output[0..32]);
        self.s.to_big_endian(&mut output[32..64]);
        output[64] = self.v.y_parity() as u8;
    }
}

/// The ECDSA recovery id, encodes the parity of the y-coordinate and for EIP-155 compatible
/// transactions also encodes the chain id
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct RecoveryId(u64);

impl RecoveryId {
    #[must_use]
    pub fn new(v: u64) -> Self {
        debug_assert!(v >= 35 || matches!(v, 0 | 1 | 27 | 28));
        Self(v)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the parity (0 for even, 1 for odd) of the y-value of a secp256k1 signature.
    #[must_use]
    pub const fn y_parity(self) -> u64 {
        let v = self.as_u64();

        // if v is greather or equal to 35, it is an EIP-155 signature
        // [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
        if v >= 35 {
            return (v - 35) & 1;
        }

        // 27 or 28, it is a legacy signature
        if v == 27 || v == 28 {
            return v - 27;
        }

        // otherwise, simply return the parity of the least significant bit
        v & 1
    }

    #[must_use]
    pub const fn chain_id(self) -> Option<u64> {
        let v = self.as_u64();
        if v >= 35 {
            Some((v - 35) >> 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_eip155(self) -> bool {
        self.chain_id().is_some()
    }

    /// Applies [EIP155](https://github.com/ethereum/EIPs/blob/master/EIPS/eip-155.md)
    #[must_use]
    pub fn as_eip155<I: Into<u64>>(self, chain_id: I) -> u64 {
        let chain_id = chain_id.into();
        self.y_parity() + 35 + (chain_id * 2)
    }

    /// Returns a legacy signature, with `v` encoded as 27 or 28.
    #[must_use]
    pub const fn as_legacy(self) -> u64 {
        self.y_parity() + 27
    }
}

impl From<RecoveryId> for u64 {
    fn from(v: RecoveryId) -> Self {
        v.as_u64()
    }
}

impl From<u64> for RecoveryId {
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::{RecoveryId, Signature};
    use hex_literal::hex;

    #[test]
    fn recovery_id_works() {
        let eip155 = RecoveryId::new(88792);
        assert_eq!(eip155.chain_id(), Some(44378));
        assert_eq!(eip155.y_parity(), 1);
        assert_eq!(RecoveryId::new(1).as_eip155(44378u64), 88792);

        let legacy = RecoveryId::new(27);
        assert_eq!(legacy.chain_id(), None);
        assert_eq!(legacy.y_parity(), 0);
        assert_eq!(RecoveryId::new(1).as_legacy(), 28);
        assert!(!RecoveryId::new(0).is_eip155());
    }

    #[test]
    fn raw_signature_works() {
        let signature = Signature {
            v: RecoveryId::new(0x26),
            r: hex!("a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6").into(),
            s: hex!("4b88362cca36cc9742366ca474fd777328cb6ee012ceee2da9aa147761e17cbf").into(),
        };
        let mut raw = [0u8; 65];
        signature.to_raw_signature(&mut raw);
        assert_eq!(
            raw[..32],
            hex!("a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6")
        );
        assert_eq!(raw[64], 1);
    }
}
