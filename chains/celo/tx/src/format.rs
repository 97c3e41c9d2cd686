use crate::request::TransactionRequest;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The wire formats understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatTag {
    /// Untyped celo transaction, replay protected with EIP-155.
    #[serde(rename = "celo-legacy")]
    Legacy,
    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) typed transaction (`0x02`).
    #[serde(rename = "eip1559")]
    Eip1559,
    /// [CIP-42](https://github.com/celo-org/celo-proposals/blob/master/CIPs/cip-0042.md)
    /// typed transaction (`0x7c`), EIP-1559 plus the fee currency and gateway fee fields.
    #[serde(rename = "cip42")]
    Cip42,
}

/// A field of the transaction payload, in the order it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ChainId,
    Nonce,
    GasPrice,
    MaxPriorityFeePerGas,
    MaxFeePerGas,
    Gas,
    FeeCurrency,
    GatewayFeeRecipient,
    GatewayFee,
    To,
    Value,
    Data,
    AccessList,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ChainId => "chainId",
            Self::Nonce => "nonce",
            Self::GasPrice => "gasPrice",
            Self::MaxPriorityFeePerGas => "maxPriorityFeePerGas",
            Self::MaxFeePerGas => "maxFeePerGas",
            Self::Gas => "gas",
            Self::FeeCurrency => "feeCurrency",
            Self::GatewayFeeRecipient => "gatewayFeeRecipient",
            Self::GatewayFee => "gatewayFee",
            Self::To => "to",
            Self::Value => "value",
            Self::Data => "data",
            Self::AccessList => "accessList",
        }
    }
}

// Matches the field order of celo-blockchain's `txdata`.
const LEGACY_FIELDS: [Field; 9] = [
    Field::Nonce,
    Field::GasPrice,
    Field::Gas,
    Field::FeeCurrency,
    Field::GatewayFeeRecipient,
    Field::GatewayFee,
    Field::To,
    Field::Value,
    Field::Data,
];

const EIP1559_FIELDS: [Field; 9] = [
    Field::ChainId,
    Field::Nonce,
    Field::MaxPriorityFeePerGas,
    Field::MaxFeePerGas,
    Field::Gas,
    Field::To,
    Field::Value,
    Field::Data,
    Field::AccessList,
];

const CIP42_FIELDS: [Field; 12] = [
    Field::ChainId,
    Field::Nonce,
    Field::MaxPriorityFeePerGas,
    Field::MaxFeePerGas,
    Field::Gas,
    Field::FeeCurrency,
    Field::GatewayFeeRecipient,
    Field::GatewayFee,
    Field::To,
    Field::Value,
    Field::Data,
    Field::AccessList,
];

impl FormatTag {
    pub const EIP1559_MARKER: u8 = 0x02;
    pub const CIP42_MARKER: u8 = 0x7c;

    /// Picks the format from the populated fields: both typed fee fields select a typed format,
    /// which is CIP-42 when a fee currency is set.
    #[must_use]
    pub const fn classify(tx: &TransactionRequest) -> Self {
        let typed = tx.max_fee_per_gas.is_some() && tx.max_priority_fee_per_gas.is_some();
        match (typed, tx.fee_currency.is_some()) {
            (true, true) => Self::Cip42,
            (true, false) => Self::Eip1559,
            (false, _) => Self::Legacy,
        }
    }

    /// Detects the format of a raw transaction from its first byte.
    #[must_use]
    pub fn from_raw(raw: &[u8]) -> Self {
        match raw.first() {
            Some(&Self::EIP1559_MARKER) => Self::Eip1559,
            Some(&Self::CIP42_MARKER) => Self::Cip42,
            _ => Self::Legacy,
        }
    }

    /// The type byte prepended to typed transactions.
    #[must_use]
    pub const fn marker(self) -> Option<u8> {
        match self {
            Self::Legacy => None,
            Self::Eip1559 => Some(Self::EIP1559_MARKER),
            Self::Cip42 => Some(Self::CIP42_MARKER),
        }
    }

    #[must_use]
    pub const fn is_typed(self) -> bool {
        self.marker().is_some()
    }

    /// Payload fields in wire order, excluding the signature and the legacy replay protection
    /// placeholders.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::Legacy => &LEGACY_FIELDS,
            Self::Eip1559 => &EIP1559_FIELDS,
            Self::Cip42 => &CIP42_FIELDS,
        }
    }

    /// Items in the list that gets signed. Legacy reserves `chainId, 0x, 0x` at the end.
    #[must_use]
    pub const fn unsigned_field_count(self) -> usize {
        match self {
            Self::Legacy => self.fields().len() + 3,
            Self::Eip1559 | Self::Cip42 => self.fields().len(),
        }
    }

    /// Items in the list of a signed transaction.
    #[must_use]
    pub const fn signed_field_count(self) -> usize {
        self.fields().len() + 3
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "celo-legacy",
            Self::Eip1559 => "eip1559",
            Self::Cip42 => "cip42",
        }
    }
}

impl Display for FormatTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
