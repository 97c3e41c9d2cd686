use crate::{
    decode::{decode_fields, strip_marker},
    error::{DecodeError, Error, FormatError, ValidationError},
    format::{Field, FormatTag},
    numeric::{bytes_to_u64, uint_to_bytes, Numeric},
    request::TransactionRequest,
    signature::{format_signature, FormattedSignature},
    validate::{check_non_negative, validate},
};
use rosetta_celo_types::{
    crypto::{Crypto, DefaultCrypto, Signer},
    rlp_utils::encode_list,
    AccessList, Address, Bytes, RlpItem, Signature, TxHash, H256, U256,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A transaction with every field in its wire representation.
///
/// Numbers are minimal big-endian bytes and absent values are empty. Fields that the
/// transaction format doesn't carry are always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub chain_id: u64,
    pub nonce: Bytes,
    pub gas: Bytes,
    pub gas_price: Bytes,
    pub max_fee_per_gas: Bytes,
    pub max_priority_fee_per_gas: Bytes,
    pub to: Bytes,
    pub value: Bytes,
    pub data: Bytes,
    pub fee_currency: Bytes,
    pub gateway_fee_recipient: Bytes,
    pub gateway_fee: Bytes,
    pub access_list: AccessList,
}

impl NormalizedTransaction {
    /// Normalizes an already validated request for the given format.
    ///
    /// # Errors
    /// Returns `Err` if a numeric field can't be read or the chain id doesn't fit in 64 bits.
    pub fn from_request(
        tx: &TransactionRequest,
        tx_type: FormatTag,
    ) -> Result<Self, ValidationError> {
        let numeric = |field: &'static str, value: &Option<Numeric>| {
            value.as_ref().map_or_else(
                || Ok(Bytes::new()),
                |value| check_non_negative(field, value).map(uint_to_bytes),
            )
        };
        let address = |value: Option<Address>| value.map(|address| Bytes::from(address.0));

        let chain_id = match &tx.chain_id {
            Some(chain_id) => check_non_negative("chainId", chain_id)?,
            None => U256::zero(),
        };
        if chain_id > U256::from(u64::MAX) {
            return Err(ValidationError::InvalidField {
                field: "chainId",
                source: FormatError::Overflow(chain_id.to_string()),
            });
        }

        let mut normalized = Self {
            chain_id: chain_id.low_u64(),
            nonce: numeric("nonce", &tx.nonce)?,
            gas: numeric("gas", &tx.gas)?,
            gas_price: numeric("gasPrice", &tx.gas_price)?,
            max_fee_per_gas: numeric("maxFeePerGas", &tx.max_fee_per_gas)?,
            max_priority_fee_per_gas: numeric(
                "maxPriorityFeePerGas",
                &tx.max_priority_fee_per_gas,
            )?,
            to: address(tx.to).unwrap_or_default(),
            value: numeric("value", &tx.value)?,
            data: tx.data.clone().unwrap_or_default(),
            fee_currency: address(tx.fee_currency).unwrap_or_default(),
            gateway_fee_recipient: address(tx.gateway_fee_recipient).unwrap_or_default(),
            gateway_fee: numeric("gatewayFee", &tx.gateway_fee)?,
            access_list: tx.access_list.clone().unwrap_or_default(),
        };

        match tx_type {
            FormatTag::Legacy => {
                normalized.max_fee_per_gas = Bytes::new();
                normalized.max_priority_fee_per_gas = Bytes::new();
                normalized.access_list = AccessList::default();
            },
            FormatTag::Eip1559 => {
                normalized.gas_price = Bytes::new();
                normalized.fee_currency = Bytes::new();
                normalized.gateway_fee_recipient = Bytes::new();
                normalized.gateway_fee = Bytes::new();
            },
            FormatTag::Cip42 => {
                normalized.gas_price = Bytes::new();
            },
        }
        Ok(normalized)
    }

    /// Rebuilds a transaction from the payload items of a decoded transaction.
    ///
    /// # Errors
    /// Returns `Err` if the item count or the shape of any item is wrong.
    pub fn from_items(
        tx_type: FormatTag,
        items: &[RlpItem],
        chain_id: u64,
    ) -> Result<Self, DecodeError> {
        let fields = tx_type.fields();
        if items.len() != fields.len() {
            return Err(DecodeError::UnexpectedFieldCount {
                tx_type,
                expected: fields.len(),
                actual: items.len(),
            });
        }
        let mut normalized = Self { chain_id, ..Self::default() };
        for (field, item) in fields.iter().zip(items) {
            normalized.set_item(*field, item)?;
        }
        Ok(normalized)
    }

    /// The RLP item of a single field.
    #[must_use]
    pub fn item(&self, field: Field) -> RlpItem {
        let bytes = match field {
            Field::ChainId => uint_to_bytes(U256::from(self.chain_id)),
            Field::Nonce => self.nonce.clone(),
            Field::GasPrice => self.gas_price.clone(),
            Field::MaxPriorityFeePerGas => self.max_priority_fee_per_gas.clone(),
            Field::MaxFeePerGas => self.max_fee_per_gas.clone(),
            Field::Gas => self.gas.clone(),
            Field::FeeCurrency => self.fee_currency.clone(),
            Field::GatewayFeeRecipient => self.gateway_fee_recipient.clone(),
            Field::GatewayFee => self.gateway_fee.clone(),
            Field::To => self.to.clone(),
            Field::Value => self.value.clone(),
            Field::Data => self.data.clone(),
            Field::AccessList => return self.access_list.to_rlp_item(),
        };
        RlpItem::Bytes(bytes)
    }

    fn set_item(&mut self, field: Field, item: &RlpItem) -> Result<(), DecodeError> {
        let invalid = || DecodeError::InvalidField(field.name());
        if field == Field::AccessList {
            self.access_list = AccessList::from_rlp_item(item).map_err(|_| invalid())?;
            return Ok(());
        }
        let bytes = item.as_bytes().map_err(|_| invalid())?.clone();
        let slot = match field {
            Field::ChainId => {
                self.chain_id = bytes_to_u64(&bytes).ok_or_else(invalid)?;
                return Ok(());
            },
            Field::FeeCurrency | Field::GatewayFeeRecipient | Field::To
                if !bytes.is_empty() && bytes.len() != 20 =>
            {
                return Err(invalid());
            },
            // integers are minimal big-endian, zero being the empty string
            Field::Nonce |
            Field::GasPrice |
            Field::MaxPriorityFeePerGas |
            Field::MaxFeePerGas |
            Field::Gas |
            Field::GatewayFee |
            Field::Value
                if bytes.first() == Some(&0) =>
            {
                return Err(invalid());
            },
            Field::Nonce => &mut self.nonce,
            Field::GasPrice => &mut self.gas_price,
            Field::MaxPriorityFeePerGas => &mut self.max_priority_fee_per_gas,
            Field::MaxFeePerGas => &mut self.max_fee_per_gas,
            Field::Gas => &mut self.gas,
            Field::FeeCurrency => &mut self.fee_currency,
            Field::GatewayFeeRecipient => &mut self.gateway_fee_recipient,
            Field::GatewayFee => &mut self.gateway_fee,
            Field::To => &mut self.to,
            Field::Value => &mut self.value,
            Field::Data => &mut self.data,
            Field::AccessList => return Err(invalid()),
        };
        *slot = bytes;
        Ok(())
    }

    /// The list that gets hashed and signed, in wire order.
    #[must_use]
    pub fn unsigned_items(&self, tx_type: FormatTag) -> Vec<RlpItem> {
        let mut items: Vec<RlpItem> =
            tx_type.fields().iter().map(|field| self.item(*field)).collect();
        if tx_type == FormatTag::Legacy {
            // EIP-155 replay protection placeholders, replaced by `v, r, s` once signed
            items.push(self.item(Field::ChainId));
            items.push(RlpItem::empty());
            items.push(RlpItem::empty());
        }
        items
    }
}

/// An unsigned transaction ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RlpEncodedTx {
    pub transaction: NormalizedTransaction,
    /// RLP of the unsigned list, type marker included.
    pub rlp_encode: Bytes,
    #[serde(rename = "type")]
    pub tx_type: FormatTag,
}

impl RlpEncodedTx {
    /// The hash a signer has to sign.
    #[must_use]
    pub fn signing_hash(&self) -> H256 {
        DefaultCrypto::keccak256(&self.rlp_encode)
    }
}

/// The human readable view of a signed transaction, shaped by its format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    pub nonce: Bytes,
    pub gas: Bytes,
    pub to: Bytes,
    pub value: Bytes,
    pub input: Bytes,
    pub v: Bytes,
    pub r: Bytes,
    pub s: Bytes,
    pub hash: TxHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_fee_recipient: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_fee: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Bytes>,
}

impl TransactionFields {
    fn new(
        tx: &NormalizedTransaction,
        tx_type: FormatTag,
        signature: FormattedSignature,
        hash: TxHash,
    ) -> Self {
        let fee_market = matches!(tx_type, FormatTag::Eip1559 | FormatTag::Cip42);
        let celo = matches!(tx_type, FormatTag::Cip42 | FormatTag::Legacy);
        Self {
            nonce: tx.nonce.clone(),
            gas: tx.gas.clone(),
            to: tx.to.clone(),
            value: tx.value.clone(),
            input: tx.data.clone(),
            v: signature.v,
            r: signature.r,
            s: signature.s,
            hash,
            max_fee_per_gas: fee_market.then(|| tx.max_fee_per_gas.clone()),
            max_priority_fee_per_gas: fee_market.then(|| tx.max_priority_fee_per_gas.clone()),
            access_list: fee_market.then(|| tx.access_list.clone()),
            fee_currency: celo.then(|| tx.fee_currency.clone()),
            gateway_fee_recipient: celo.then(|| tx.gateway_fee_recipient.clone()),
            gateway_fee: celo.then(|| tx.gateway_fee.clone()),
            gas_price: (tx_type == FormatTag::Legacy).then(|| tx.gas_price.clone()),
        }
    }
}

/// A signed transaction ready to be broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(rename = "type")]
    pub tx_type: FormatTag,
    pub raw: Bytes,
    pub hash: TxHash,
    pub tx: TransactionFields,
}

pub(crate) fn with_marker(tx_type: FormatTag, payload: &[u8]) -> Bytes {
    match tx_type.marker() {
        Some(marker) => std::iter::once(marker).chain(payload.iter().copied()).collect(),
        None => Bytes::copy_from_slice(payload),
    }
}

/// Validates, normalizes and encodes the unsigned transaction.
///
/// # Errors
/// Returns `Err` if the request doesn't pass [`validate`].
pub fn rlp_encoded_tx(tx: &TransactionRequest) -> Result<RlpEncodedTx, Error> {
    validate(tx)?;
    let tx_type = FormatTag::classify(tx);
    let transaction = NormalizedTransaction::from_request(tx, tx_type)?;
    let rlp_encode = with_marker(tx_type, &encode_list(&transaction.unsigned_items(tx_type)));
    tracing::debug!(%tx_type, len = rlp_encode.len(), "encoded unsigned transaction");
    Ok(RlpEncodedTx { transaction, rlp_encode, tx_type })
}

/// Appends `signature` to an unsigned transaction.
///
/// # Errors
/// Returns `Err` if `rlp_encoded.rlp_encode` isn't a well formed unsigned transaction.
pub fn encode_transaction(
    rlp_encoded: &RlpEncodedTx,
    signature: &Signature,
) -> Result<SignedTransaction, Error> {
    let tx_type = rlp_encoded.tx_type;
    let formatted = format_signature(signature, tx_type);
    let mut items = decode_fields(strip_marker(&rlp_encoded.rlp_encode, tx_type))?;
    if items.len() != tx_type.unsigned_field_count() {
        return Err(DecodeError::UnexpectedFieldCount {
            tx_type,
            expected: tx_type.unsigned_field_count(),
            actual: items.len(),
        }
        .into());
    }
    // legacy placeholders are replaced, typed formats get the signature appended
    items.truncate(tx_type.fields().len());
    items.extend([
        RlpItem::Bytes(formatted.v.clone()),
        RlpItem::Bytes(formatted.r.clone()),
        RlpItem::Bytes(formatted.s.clone()),
    ]);

    let raw = with_marker(tx_type, &encode_list(&items));
    let hash = DefaultCrypto::keccak256(&raw);
    tracing::debug!(%tx_type, %hash, "encoded signed transaction");
    let tx = TransactionFields::new(&rlp_encoded.transaction, tx_type, formatted, hash);
    Ok(SignedTransaction { tx_type, raw, hash, tx })
}

/// Encodes `tx`, has `signer` sign it and returns the signed transaction.
///
/// Legacy transactions are signed with EIP-155 replay protection, typed ones with the bare
/// y-parity.
///
/// # Errors
/// Returns `Err` if the request is invalid or the signer fails.
pub fn sign_transaction<S>(tx: &TransactionRequest, signer: &S) -> Result<SignedTransaction, Error>
where
    S: Signer,
    S::Error: Display,
{
    let rlp_encoded = rlp_encoded_tx(tx)?;
    let chain_id = match rlp_encoded.tx_type {
        FormatTag::Legacy => Some(rlp_encoded.transaction.chain_id),
        FormatTag::Eip1559 | FormatTag::Cip42 => None,
    };
    let signature = signer
        .sign_prehash(rlp_encoded.signing_hash(), chain_id)
        .map_err(|error| Error::Signer(error.to_string()))?;
    encode_transaction(&rlp_encoded, &signature)
}
