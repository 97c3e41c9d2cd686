use crate::{Address, RecoveryId, Signature, H256, U256};

/// Keccak-256 hashing and secp256k1 ECDSA signature recovery.
pub trait Crypto {
    type Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]);

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        let mut hash = [0u8; 32];
        Self::keccak256_to(data, &mut hash);
        hash.into()
    }

    /// Verify and recover a `SECP256k1` ECDSA signature.
    ///
    /// - `signature` is signature passed in RSV format.
    /// - `message_hash` is the keccak256 hash of the message.
    ///
    /// # Errors
    /// Returns `Err` if the signature is bad, otherwise the recovered address.
    fn secp256k1_ecdsa_recover(
        signature: &Signature,
        message_hash: H256,
    ) -> Result<Address, Self::Error>;
}

/// Something able to produce recoverable signatures, typically a wallet or a remote key store.
pub trait Signer {
    type Error;

    /// Sign an arbitrary message, hashing it with keccak256 first.
    ///
    /// # Errors
    /// Returns `Err` if the message can't be signed.
    fn sign<I: AsRef<[u8]>>(
        &self,
        message: I,
        chain_id: Option<u64>,
    ) -> Result<Signature, Self::Error>;

    /// Sign the given message digest. When `chain_id` is `Some` the returned `v` is EIP-155
    /// encoded, otherwise it is the bare y-parity.
    ///
    /// # Errors
    /// Returns `Err` if the message can't be signed.
    fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Self::Error>;
}

pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    type Error = libsecp256k1::Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]) {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize_into(output.into());
    }

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        use sha3::Digest;
        let hash: [u8; 32] = sha3::Keccak256::digest(data).into();
        hash.into()
    }

    fn secp256k1_ecdsa_recover(
        signature: &Signature,
        message_hash: H256,
    ) -> Result<Address, Self::Error> {
        let mut sig = [0u8; 65];
        signature.to_raw_signature(&mut sig);
        let rid = libsecp256k1::RecoveryId::parse(sig[64])?;
        let sig = libsecp256k1::Signature::parse_overflowing_slice(&sig[0..64])?;
        let msg = libsecp256k1::Message::parse(message_hash.as_fixed_bytes());
        let pubkey = libsecp256k1::recover(&msg, &sig, &rid)?;
        // uncompress the key
        let uncompressed = pubkey.serialize();
        let hash = Self::keccak256(&uncompressed[1..]);
        Ok(Address::from(hash))
    }
}

/// A local secp256k1 key, mostly useful for tests and offline signing.
pub struct Keypair {
    keypair: secp256k1::Keypair,
}

impl Keypair {
    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is greater than secp256k1 curve order.
    pub fn from_bytes<I: AsRef<[u8]>>(bytes: I) -> Result<Self, secp256k1::Error> {
        Self::from_slice(bytes.as_ref())
    }

    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is greater than secp256k1 curve order.
    pub fn from_slice(slice: &[u8]) -> Result<Self, secp256k1::Error> {
        let secret = secp256k1::SecretKey::from_slice(slice)?;
        #[cfg(feature = "std")]
        let keypair = secret.keypair(secp256k1::SECP256K1);
        #[cfg(not(feature = "std"))]
        let keypair = secret.keypair(&secp256k1::Secp256k1::new());
        Ok(Self { keypair })
    }

    #[must_use]
    pub fn pubkey(&self) -> [u8; 33] {
        self.keypair.public_key().serialize()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        // uncompress the key
        let uncompressed = self.keypair.public_key().serialize_uncompressed();
        let hash = DefaultCrypto::keccak256(&uncompressed[1..]);
        Address::from(hash)
    }
}

impl Signer for Keypair {
    type Error = secp256k1::Error;

    fn sign<I: AsRef<[u8]>>(
        &self,
        msg: I,
        chain_id: Option<u64>,
    ) -> Result<Signature, Self::Error> {
        self.sign_prehash(DefaultCrypto::keccak256(msg.as_ref()), chain_id)
    }

    fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Self::Error> {
        use secp256k1::Message;

        #[cfg(feature = "std")]
        let context = secp256k1::SECP256K1;
        #[cfg(not(feature = "std"))]
        let context = &secp256k1::Secp256k1::signing_only();

        let msg = Message::from_digest(prehash.0);
        // The recovery id is either 0, 1, 2 or 3: the first bit is the parity of y, the second
        // tells whether r overflowed the curve order.
        let sig = context.sign_ecdsa_recoverable(&msg, &self.keypair.secret_key());
        let (recovery_id, _) = sig.serialize_compact();
        let mut sig = sig.to_standard();
        sig.normalize_s();
        let compact = sig.serialize_compact();
        let r = U256::from_big_endian(&compact[..32]);
        let s = U256::from_big_endian(&compact[32..]);
        let v = u8::try_from(recovery_id.to_i32())
            .map_err(|_| secp256k1::Error::InvalidRecoveryId)
            .map(u64::from)?
            & 1;

        // All transaction signatures whose s-value is greater than secp256k1n/2 are invalid.
        // - https://github.com/ethereum/EIPs/blob/master/EIPS/eip-2.md
        let secp256k1_half_n = U256::from_big_endian(&secp256k1::constants::CURVE_ORDER) >> 1;
        if s >= secp256k1_half_n {
            return Err(secp256k1::Error::IncorrectSignature);
        }
        let v = chain_id.map_or(v, |chain_id| RecoveryId::new(v).as_eip155(chain_id));
        Ok(Signature { v: RecoveryId::new(v), r, s })
    }
}

#[cfg(test)]
mod tests {
    use super::{Crypto, DefaultCrypto, Keypair, Signer};
    use crate::{Address, Signature, H256};
    use hex_literal::hex;

    #[test]
    fn keccak256_works() {
        assert_eq!(
            DefaultCrypto::keccak256(b""),
            H256(hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"))
        );
        let mut output = [0u8; 32];
        DefaultCrypto::keccak256_to(b"", &mut output);
        assert_eq!(H256(output), DefaultCrypto::keccak256(b""));
    }

    #[test]
    fn ecdsa_recover_works() {
        let test_cases: [(Signature, H256, Address); 4] = [
            (
                Signature {
                    v: 0x00.into(),
                    r: hex!("74ce2198225fb75ba25ff998f912ebc7ba8351056b3398a73eb2680cd8a0729a")
                        .into(),
                    s: hex!("426cff41ea4656f1517ebf685bc2841e9156eb5e9119833f822aef5d9ca36491")
                        .into(),
                },
                hex!("2104564ddf4958472ccfa07c340edd45558294f4591a343f91554278eee74689").into(),
                hex!("677de87be1ecc2ba2f4003af7efcdcb406ff4d43").into(),
            ),
            (
                Signature {
                    v: 0x01.into(),
                    r: hex!("7818d886a8ca01a6d80a240d3704090a525bb3440699defde67463d5e7094c2e")
                        .into(),
                    s: hex!("05c537ecebbe16f3203a62ed27d251aecb15e636e816686af7d96fccd1efe628")
                        .into(),
                },
                hex!("9478c96651709feb4e3fea375f921faea701cfb66b5e43bdebde586d1aeb7047").into(),
                hex!("F531c7A28a3492390D4C47dBa6775FA76349DcFF").into(),
            ),
            (
                Signature {
                    v: 0x1b.into(),
                    r: hex!("c58f3fd84bc6cd1633e0b8cba40cd2f6d8c0e4bd25a6c834baca0249666366aa")
                        .into(),
                    s: hex!("7ac31746b8f4542847fd695c93cd90fc0dffee1e0445848d27657d60f0279e31")
                        .into(),
                },
                hex!("f5f18567b0a8dbd2f9c12eecc22545e2150f0683ccb2db2a0b37739dd9cb24e5").into(),
                hex!("2a65aca4d5fc5b5c859090a6c34d164135398226").into(),
            ),
            (
                Signature {
                    v: 0x1c.into(),
                    r: hex!("c8fc04e29b0859a7f265b67af7d4c5c6bc9e3d5a8de4950f89fa71a12a3cf8ae")
                        .into(),
                    s: hex!("7dd15a10f9f2c8d1519a6044d880d04756798fc23923ff94f4823df8dc5b987a")
                        .into(),
                },
                hex!("341467bdde941ac08fc0ced98fbbb0db1d9d393909fda333288843b49525faf0").into(),
                hex!("32be343b94f860124dc4fee278fdcbd38c102d88").into(),
            ),
        ];

        for (signature, msg_hash, expected_addr) in test_cases {
            let actual_addr = DefaultCrypto::secp256k1_ecdsa_recover(&signature, msg_hash).unwrap();
            assert_eq!(expected_addr, actual_addr);
        }
    }

    #[test]
    fn keypair_address_works() {
        let keypair = Keypair::from_bytes(hex!(
            "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
        ))
        .unwrap();
        let expected = Address::from(hex!("1be31a94361a391bbafb2a4ccd704f57dc04d4bb"));
        assert_eq!(keypair.address(), expected);
        assert!(Keypair::from_bytes([0u8; 32]).is_err());
    }

    #[test]
    fn sign_ecdsa_works() {
        let secret_key = hex!("fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19");
        let msg = hex!("e9808501ec5b05eb8301f6d194645d7d9f679a3b8aa4e7eedad709db14f6d3f44182dead808205398080");
        let expected = Signature {
            r: hex!("e138cf75eb34e837cf7cec412a89f48792e49f5a9c8693df722c7705584d813f").into(),
            s: hex!("2a1ff44833e17fd7439b2aff374c6fbe9fb1d4353c84188f6467891dfce409c5").into(),
            v: 0xa96.into(),
        };
        let keypair = Keypair::from_bytes(secret_key).unwrap();
        let prehash = DefaultCrypto::keccak256(msg);
        let signature = keypair.sign(msg, Some(1337)).unwrap();
        assert_eq!(signature, expected);
        assert_eq!(signature, keypair.sign_prehash(prehash, Some(1337)).unwrap());

        // without a chain id `v` is the bare y-parity
        let unprotected = keypair.sign_prehash(prehash, None).unwrap();
        assert_eq!(unprotected.v.as_u64(), expected.v.y_parity());
        assert_eq!(
            DefaultCrypto::secp256k1_ecdsa_recover(&signature, prehash).unwrap(),
            Address::from(hex!("96216849c49358b10257cb55b28ea603c874b05e"))
        );
    }
}
