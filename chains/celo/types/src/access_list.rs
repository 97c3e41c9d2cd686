use crate::{
    rlp_utils::{RlpItem, RlpItemError},
    Address, Bytes, H256,
};
use alloc::{vec, vec::Vec};

/// EIP-2930 access list, carried by the typed transaction formats.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nested RLP representation: `[[address, [storage_key, ...]], ...]`.
    #[must_use]
    pub fn to_rlp_item(&self) -> RlpItem {
        RlpItem::List(
            self.0
                .iter()
                .map(|item| {
                    RlpItem::List(vec![
                        RlpItem::Bytes(Bytes::from(item.address.0)),
                        RlpItem::List(
                            item.storage_keys
                                .iter()
                                .map(|key| RlpItem::Bytes(Bytes::from(key.0)))
                                .collect(),
                        ),
                    ])
                })
                .collect(),
        )
    }

    /// Parses the nested RLP representation produced by [`AccessList::to_rlp_item`].
    ///
    /// # Errors
    /// Returns `Err` if the item shape or any address / storage key length is wrong.
    pub fn from_rlp_item(item: &RlpItem) -> Result<Self, RlpItemError> {
        item.as_list()?
            .iter()
            .map(|entry| {
                let [address, storage_keys] = entry.as_list()? else {
                    return Err(RlpItemError::UnexpectedLength);
                };
                let address = address.as_bytes()?;
                if address.len() != 20 {
                    return Err(RlpItemError::UnexpectedLength);
                }
                let storage_keys = storage_keys
                    .as_list()?
                    .iter()
                    .map(|key| {
                        let key = key.as_bytes()?;
                        if key.len() == 32 {
                            Ok(H256::from_slice(key))
                        } else {
                            Err(RlpItemError::UnexpectedLength)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AccessListItem { address: Address::from_slice(address), storage_keys })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(src: Vec<AccessListItem>) -> Self {
        Self(src)
    }
}

/// Access list item
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AccessListItem {
    /// Accessed address
    pub address: Address,
    /// Accessed storage keys
    pub storage_keys: Vec<H256>,
}

#[cfg(test)]
mod tests {
    use super::{AccessList, AccessListItem, Address, H256};
    use crate::rlp_utils::RlpItem;
    use hex_literal::hex;

    fn access_list() -> AccessList {
        AccessList(vec![AccessListItem {
            address: Address::zero(),
            storage_keys: vec![
                H256::from(hex!(
                    "0000000000000000000000000000000000000000000000000000000000000001"
                )),
                H256::from(hex!(
                    "60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe"
                )),
            ],
        }])
    }

    #[test]
    fn rlp_item_works() {
        let access_list = access_list();
        let encoded = rlp::encode(&access_list.to_rlp_item());
        assert_eq!(
            &encoded[..],
            &hex!("f85bf859940000000000000000000000000000000000000000f842a00000000000000000000000000000000000000000000000000000000000000001a060fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe")[..]
        );
        let item = rlp::decode::<RlpItem>(&encoded).unwrap();
        assert_eq!(AccessList::from_rlp_item(&item).unwrap(), access_list);

        // empty access list is an empty rlp list
        assert_eq!(&rlp::encode(&AccessList::default().to_rlp_item())[..], &[0xc0][..]);
    }

    #[test]
    fn rejects_malformed_items() {
        let item = RlpItem::List(vec![RlpItem::List(vec![RlpItem::Bytes(vec![1u8, 2].into())])]);
        assert!(AccessList::from_rlp_item(&item).is_err());
        assert!(AccessList::from_rlp_item(&RlpItem::Bytes(vec![1u8].into())).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_encode_works() {
        let access_list = access_list();
        let actual = serde_json::to_value(access_list.clone()).unwrap();
        let expected = serde_json::json!([
            {
                "address": "0x0000000000000000000000000000000000000000",
                "storageKeys": [
                    "0x0000000000000000000000000000000000000000000000000000000000000001",
                    "0x60fdd29ff912ce880cd3edaf9f932dc61d3dae823ea77e0323f94adb9f6a72fe",
                ],
            },
        ]);
        assert_eq!(expected, actual);

        let json_str = serde_json::to_string(&access_list).unwrap();
        let decoded = serde_json::from_str::<AccessList>(&json_str).unwrap();
        assert_eq!(access_list, decoded);
    }
}
