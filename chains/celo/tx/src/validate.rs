use crate::{
    error::{FormatError, ValidationError},
    numeric::Numeric,
    request::TransactionRequest,
};
use rosetta_celo_types::U256;

/// Checks that `tx` can be serialized, before any byte is produced.
///
/// # Errors
/// Returns the first violated rule: missing gas, missing or conflicting fee fields, missing
/// nonce / chain id, or a negative value.
pub fn validate(tx: &TransactionRequest) -> Result<(), ValidationError> {
    let gas = tx.gas.as_ref().ok_or(ValidationError::MissingField("gas"))?;

    // at least gasPrice or maxFeePerGas and maxPriorityFeePerGas must be set
    if tx.gas_price.is_none() &&
        (tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none())
    {
        return Err(ValidationError::MissingFeeFields);
    }

    // gasPrice and the typed fee fields are mutually exclusive
    if tx.gas_price.is_some() &&
        (tx.max_fee_per_gas.is_some() || tx.max_priority_fee_per_gas.is_some())
    {
        return Err(ValidationError::ConflictingFeeFields);
    }

    let nonce = tx.nonce.as_ref().ok_or(ValidationError::MissingField("nonce"))?;
    let chain_id = tx.chain_id.as_ref().ok_or(ValidationError::MissingField("chainId"))?;
    for (field, value) in [("gas", gas), ("nonce", nonce), ("chainId", chain_id)] {
        check_non_negative(field, value)?;
    }

    is_price_too_low(tx)?;
    Ok(())
}

/// Checks every present fee price.
///
/// Always `Ok(false)`: the codec has no minimum price, only negative prices are rejected.
///
/// # Errors
/// Returns [`ValidationError::NegativeField`] naming the first negative price.
pub fn is_price_too_low(tx: &TransactionRequest) -> Result<bool, ValidationError> {
    let prices = [
        ("gasPrice", &tx.gas_price),
        ("maxFeePerGas", &tx.max_fee_per_gas),
        ("maxPriorityFeePerGas", &tx.max_priority_fee_per_gas),
    ];
    for (field, price) in prices {
        if let Some(price) = price {
            check_non_negative(field, price)?;
        }
    }
    Ok(false)
}

pub(crate) fn check_non_negative(
    field: &'static str,
    value: &Numeric,
) -> Result<U256, ValidationError> {
    value.to_u256().map_err(|error| match error {
        FormatError::Negative(_) => ValidationError::NegativeField(field),
        source => ValidationError::InvalidField { field, source },
    })
}
