use crate::numeric::Numeric;
use rosetta_celo_types::{AccessList, Address, Bytes};
use serde::{Deserialize, Serialize};

/// A transaction as described by the caller, every field optional.
///
/// ```
/// use rosetta_tx_celo::{FormatTag, TransactionRequest};
///
/// let tx: TransactionRequest = serde_json::from_value(serde_json::json!({
///     "chainId": 44787,
///     "nonce": 0,
///     "gas": "21000",
///     "maxFeePerGas": "0x5d21dba00",
///     "maxPriorityFeePerGas": 1,
/// }))
/// .unwrap();
/// assert_eq!(FormatTag::classify(&tx), FormatTag::Eip1559);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Informational only, never encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,

    /// Recipient, `None` for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Numeric>,

    /// Gas limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,

    /// ERC-20 token the fees are paid with, native currency when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_fee_recipient: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_fee: Option<Numeric>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
}
