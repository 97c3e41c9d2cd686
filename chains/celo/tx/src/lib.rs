//! Encoding, signing and signer recovery of celo transactions.
//!
//! Three wire formats are supported: the celo legacy transaction (with the fee currency and
//! gateway fee fields, replay protected with EIP-155), EIP-1559 (`0x02`) and CIP-42 (`0x7c`).
mod config;
mod decode;
mod encode;
mod error;
mod format;
mod message;
mod numeric;
mod request;
mod signature;
mod validate;

pub use config::CodecConfig;
pub use decode::{
    extract_signature, get_signer_from_raw, infer_replay_protection, recover_transaction,
    DecodedTransaction, RawSignature, ReplayProtection, TransactionDecoder,
};
pub use encode::{
    encode_transaction, rlp_encoded_tx, sign_transaction, NormalizedTransaction, RlpEncodedTx,
    SignedTransaction, TransactionFields,
};
pub use error::{DecodeError, Error, FormatError, RecoveryError, ValidationError};
pub use format::{Field, FormatTag};
pub use message::{decode_sig, hash_personal_message, recover_message_signer, verify_signature};
pub use numeric::{
    bytes_to_u64, hex_to_bytes, make_even, normalize_numeric, numeric_to_hex, trim_leading_zero,
    uint_to_bytes, Numeric,
};
pub use request::TransactionRequest;
pub use signature::{format_signature, pad_to_32, FormattedSignature};
pub use validate::{is_price_too_low, validate};

pub mod ext {
    pub use rosetta_celo_types as types;
}
