#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bytes;
pub mod access_list;
pub mod crypto;
pub mod rlp_utils;
pub mod signature;

pub use access_list::{AccessList, AccessListItem};
pub use bytes::{Bytes, ParseBytesError};
pub use primitive_types::{H160, H256, U256};
pub use rlp_utils::RlpItem;
pub use signature::{RecoveryId, Signature};

/// A 20-byte account address.
pub type Address = H160;

pub type TxHash = H256;

/// Re-exports for downstream crates to not require any additional
/// dependencies to be explicitly added on the client side.
pub mod ext {
    pub use bytes;
    pub use const_hex;
    pub use libsecp256k1;
    pub use primitive_types;
    pub use rlp;
    pub use secp256k1;
    #[cfg(feature = "serde")]
    pub use serde;
    pub use sha3;
}
