use crate::error::{DecodeError, Error, RecoveryError};
use rosetta_celo_types::{
    crypto::{Crypto, DefaultCrypto},
    Address, RecoveryId, Signature, H256, U256,
};

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hashes `data` as an [EIP-191](https://eips.ethereum.org/EIPS/eip-191) personal message.
#[must_use]
pub fn hash_personal_message(data: impl AsRef<[u8]>) -> H256 {
    let data = data.as_ref();
    let mut message = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 20 + data.len());
    message.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    message.extend_from_slice(data.len().to_string().as_bytes());
    message.extend_from_slice(data);
    DefaultCrypto::keccak256(message)
}

/// Parses a 65 bytes `r || s || v` signature, `v` being either 0, 1, 27 or 28.
///
/// # Errors
/// Returns `Err` if the length or `v` is invalid.
pub fn decode_sig(signature: &[u8]) -> Result<Signature, DecodeError> {
    let signature: &[u8; 65] =
        signature.try_into().map_err(|_| DecodeError::InvalidField("signature"))?;
    let v = u64::from(signature[64]);
    if !matches!(v, 0 | 1 | 27 | 28) {
        return Err(DecodeError::InvalidRecoveryId(v));
    }
    Ok(Signature {
        v: RecoveryId::new(v),
        r: U256::from_big_endian(&signature[..32]),
        s: U256::from_big_endian(&signature[32..64]),
    })
}

/// Recovers the address that signed the personal message `data`.
///
/// # Errors
/// Returns `Err` if the signature can't be parsed or recovered.
pub fn recover_message_signer(data: impl AsRef<[u8]>, signature: &[u8]) -> Result<Address, Error> {
    let signature = decode_sig(signature)?;
    let signer = DefaultCrypto::secp256k1_ecdsa_recover(&signature, hash_personal_message(data))
        .map_err(RecoveryError::from)?;
    Ok(signer)
}

/// Whether `signature` over `message_hash` was produced by `expected`.
#[must_use]
pub fn verify_signature(message_hash: H256, signature: &[u8], expected: Address) -> bool {
    let Ok(signature) = decode_sig(signature) else {
        return false;
    };
    DefaultCrypto::secp256k1_ecdsa_recover(&signature, message_hash)
        .is_ok_and(|signer| signer == expected)
}
