use crate::{
    config::CodecConfig,
    encode::{with_marker, NormalizedTransaction},
    error::{DecodeError, Error, RecoveryError},
    format::FormatTag,
    numeric::{bytes_to_u64, uint_to_bytes},
    signature::pad_to_32,
};
use rosetta_celo_types::{
    crypto::{Crypto, DefaultCrypto},
    rlp_utils::encode_list,
    Address, Bytes, RecoveryId, RlpItem, Signature, TxHash, H256, U256,
};
use serde::{Deserialize, Serialize};

/// How the `v` of a legacy transaction binds it to a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayProtection {
    /// `v = recovery_id + chain_id * 2 + 35`
    Eip155 { chain_id: u64 },
    /// `v` is 27 or 28, valid on every chain.
    Unprotected,
}

/// Infers the replay protection of a legacy transaction from its `v`.
///
/// # Errors
/// Returns [`DecodeError::InvalidRecoveryId`] for `v` values no signer produces.
pub fn infer_replay_protection(v: u64) -> Result<ReplayProtection, DecodeError> {
    match v {
        27 | 28 => Ok(ReplayProtection::Unprotected),
        v if v >= 35 => Ok(ReplayProtection::Eip155 { chain_id: (v - 35) >> 1 }),
        v => Err(DecodeError::InvalidRecoveryId(v)),
    }
}

/// `v` as found in the transaction, `r` and `s` padded back to 32 bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    pub v: Bytes,
    pub r: H256,
    pub s: H256,
}

/// A signed transaction parsed back from its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransaction {
    #[serde(rename = "type")]
    pub tx_type: FormatTag,
    pub transaction: NormalizedTransaction,
    /// For typed formats `v` is the y-parity.
    pub signature: Signature,
    pub hash: TxHash,
}

pub(crate) fn strip_marker(raw: &[u8], tx_type: FormatTag) -> &[u8] {
    if tx_type.is_typed() {
        raw.get(1..).unwrap_or_default()
    } else {
        raw
    }
}

/// Decodes the top level list of a transaction payload; an empty payload has no items.
pub(crate) fn decode_fields(payload: &[u8]) -> Result<Vec<RlpItem>, DecodeError> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    match RlpItem::decode_exact(payload)? {
        RlpItem::List(items) => Ok(items),
        RlpItem::Bytes(_) => {
            Err(DecodeError::MalformedRlp(rlp::DecoderError::RlpExpectedToBeList))
        },
    }
}

/// Decodes a signed transaction, checking that it has exactly the fields of its format.
fn decode_signed(raw: &[u8]) -> Result<(FormatTag, Vec<RlpItem>), DecodeError> {
    let tx_type = FormatTag::from_raw(raw);
    let items = decode_fields(strip_marker(raw, tx_type))?;
    let expected = tx_type.signed_field_count();
    tracing::trace!(%tx_type, fields = items.len(), "decoded raw transaction");
    if items.len() != expected {
        return Err(DecodeError::UnexpectedFieldCount { tx_type, expected, actual: items.len() });
    }
    Ok((tx_type, items))
}

/// The signature is always the last three items, in order `v, r, s`.
fn split_signature(items: &[RlpItem]) -> Result<(&[RlpItem], RawSignature), DecodeError> {
    let [payload @ .., v, r, s] = items else {
        return Err(DecodeError::InvalidField("signature"));
    };
    let v = v.as_bytes().map_err(|_| DecodeError::InvalidField("v"))?.clone();
    // a canonical signature may have lost its leading zero bytes
    let r = r
        .as_bytes()
        .ok()
        .and_then(|r| pad_to_32(r.as_ref()))
        .ok_or(DecodeError::InvalidField("r"))?;
    let s = s
        .as_bytes()
        .ok()
        .and_then(|s| pad_to_32(s.as_ref()))
        .ok_or(DecodeError::InvalidField("s"))?;
    Ok((payload, RawSignature { v, r: H256(r), s: H256(s) }))
}

/// Returns the `(v, r, s)` of a signed raw transaction.
///
/// # Errors
/// Returns `Err` if `raw` isn't a signed transaction of a known format.
pub fn extract_signature(raw: &[u8]) -> Result<RawSignature, DecodeError> {
    let (_, items) = decode_signed(raw)?;
    split_signature(&items).map(|(_, signature)| signature)
}

/// Parses raw transactions and recovers their signer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDecoder {
    config: CodecConfig,
}

impl TransactionDecoder {
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes `raw` and recovers the address that signed it.
    ///
    /// # Errors
    /// Returns `Err` if `raw` is malformed, has the wrong number of fields, carries an invalid
    /// `v`, is rejected by the configuration or its signature can't be recovered.
    pub fn recover_transaction(&self, raw: &[u8]) -> Result<(DecodedTransaction, Address), Error> {
        if raw.is_empty() {
            return Err(DecodeError::EmptyTransaction.into());
        }
        let (tx_type, items) = decode_signed(raw)?;
        let (payload, raw_signature) = split_signature(&items)?;
        let v = bytes_to_u64(&raw_signature.v).ok_or(DecodeError::InvalidField("v"))?;

        let (chain_id, v, message) = match tx_type {
            FormatTag::Legacy => match infer_replay_protection(v)? {
                ReplayProtection::Eip155 { chain_id } => {
                    let mut signing_items = payload.to_vec();
                    signing_items.extend([
                        RlpItem::Bytes(uint_to_bytes(U256::from(chain_id))),
                        RlpItem::empty(),
                        RlpItem::empty(),
                    ]);
                    (chain_id, v, encode_list(&signing_items))
                },
                ReplayProtection::Unprotected if self.config.allow_unprotected_legacy => {
                    (0, v, encode_list(payload))
                },
                ReplayProtection::Unprotected => return Err(DecodeError::UnprotectedLegacy.into()),
            },
            FormatTag::Eip1559 | FormatTag::Cip42 => {
                if !matches!(v, 0 | 1 | 27 | 28) {
                    return Err(DecodeError::InvalidRecoveryId(v).into());
                }
                let chain_id = payload
                    .first()
                    .and_then(|item| item.as_bytes().ok())
                    .and_then(|bytes| bytes_to_u64(bytes.as_ref()))
                    .ok_or(DecodeError::InvalidField("chainId"))?;
                let y_parity = RecoveryId::new(v).y_parity();
                (chain_id, y_parity, with_marker(tx_type, &encode_list(payload)))
            },
        };

        let transaction = NormalizedTransaction::from_items(tx_type, payload, chain_id)?;
        if let Some(expected) = self.config.expected_chain_id {
            if expected != chain_id {
                return Err(DecodeError::ChainIdMismatch { expected, actual: chain_id }.into());
            }
        }

        let signature = Signature {
            v: RecoveryId::new(v),
            r: U256::from_big_endian(raw_signature.r.as_bytes()),
            s: U256::from_big_endian(raw_signature.s.as_bytes()),
        };
        let signer = DefaultCrypto::secp256k1_ecdsa_recover(
            &signature,
            DefaultCrypto::keccak256(&message),
        )
        .map_err(RecoveryError::from)?;
        tracing::debug!(%tx_type, chain_id, ?signer, "recovered transaction signer");

        let decoded = DecodedTransaction {
            tx_type,
            transaction,
            signature,
            hash: DefaultCrypto::keccak256(raw),
        };
        Ok((decoded, signer))
    }

    /// Recovers only the signer of `raw`.
    ///
    /// # Errors
    /// Same as [`TransactionDecoder::recover_transaction`].
    pub fn get_signer_from_raw(&self, raw: &[u8]) -> Result<Address, Error> {
        self.recover_transaction(raw).map(|(_, signer)| signer)
    }
}

/// [`TransactionDecoder::recover_transaction`] with the default configuration.
///
/// # Errors
/// See [`TransactionDecoder::recover_transaction`].
pub fn recover_transaction(raw: &[u8]) -> Result<(DecodedTransaction, Address), Error> {
    TransactionDecoder::default().recover_transaction(raw)
}

/// [`TransactionDecoder::get_signer_from_raw`] with the default configuration.
///
/// # Errors
/// See [`TransactionDecoder::recover_transaction`].
pub fn get_signer_from_raw(raw: &[u8]) -> Result<Address, Error> {
    TransactionDecoder::default().get_signer_from_raw(raw)
}
