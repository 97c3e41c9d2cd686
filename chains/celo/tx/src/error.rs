use crate::format::FormatTag;
use rosetta_celo_types::ext::{const_hex, libsecp256k1};

/// A numeric input that can't be turned into an unsigned 256-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("negative number: {0}")]
    Negative(String),
    #[error("number doesn't fit in 256 bits: {0}")]
    Overflow(String),
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] const_hex::FromHexError),
}

/// Structural problems found before anything is encoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("\"{0}\" is missing")]
    MissingField(&'static str),
    #[error("when \"maxFeePerGas\" or \"maxPriorityFeePerGas\" are set, \"gasPrice\" must not be set")]
    ConflictingFeeFields,
    #[error("\"gasPrice\" or \"maxFeePerGas\" and \"maxPriorityFeePerGas\" are missing")]
    MissingFeeFields,
    #[error("\"{0}\" is less than 0")]
    NegativeField(&'static str),
    #[error("invalid \"{field}\": {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: FormatError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("provided transaction has {actual} elements but {tx_type} txs with a signature have {expected}")]
    UnexpectedFieldCount { tx_type: FormatTag, expected: usize, actual: usize },
    #[error("malformed rlp: {0}")]
    MalformedRlp(#[from] rlp::DecoderError),
    #[error("invalid \"{0}\" field")]
    InvalidField(&'static str),
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u64),
    #[error("legacy transaction without replay protection")]
    UnprotectedLegacy,
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
    #[error("empty transaction")]
    EmptyTransaction,
}

/// Error returned by the secp256k1 backend, surfaced unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("signature recovery failed: {0:?}")]
pub struct RecoveryError(pub libsecp256k1::Error);

impl From<libsecp256k1::Error> for RecoveryError {
    fn from(error: libsecp256k1::Error) -> Self {
        Self(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    #[error("signer failed: {0}")]
    Signer(String),
}

impl From<rlp::DecoderError> for Error {
    fn from(error: rlp::DecoderError) -> Self {
        Self::Decode(DecodeError::MalformedRlp(error))
    }
}
