use serde::{Deserialize, Serialize};

/// Decoder settings.
///
/// ```
/// use rosetta_tx_celo::CodecConfig;
///
/// let config = CodecConfig::from_json(r#"{ "expectedChainId": 42220 }"#).unwrap();
/// assert!(config.allow_unprotected_legacy);
/// assert_eq!(config.expected_chain_id, Some(42220));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecConfig {
    /// Accept legacy transactions signed without a chain id (`v` = 27 or 28).
    pub allow_unprotected_legacy: bool,

    /// Reject transactions signed for any other chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_chain_id: Option<u64>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { allow_unprotected_legacy: true, expected_chain_id: None }
    }
}

impl CodecConfig {
    /// # Errors
    /// Returns `Err` if `json` is not a valid configuration object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::CodecConfig;

    #[test]
    fn missing_keys_use_defaults() {
        assert_eq!(CodecConfig::from_json("{}").unwrap(), CodecConfig::default());
        let config = CodecConfig::from_json(r#"{ "allowUnprotectedLegacy": false }"#).unwrap();
        assert!(!config.allow_unprotected_legacy);
        assert_eq!(config.expected_chain_id, None);
    }

    #[test]
    fn serializes_camel_case() {
        let config =
            CodecConfig { allow_unprotected_legacy: false, expected_chain_id: Some(44787) };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({ "allowUnprotectedLegacy": false, "expectedChainId": 44787 })
        );
        let json = serde_json::to_value(CodecConfig::default()).unwrap();
        assert!(json.get("expectedChainId").is_none());
    }

    #[test]
    fn rejects_bad_types() {
        assert!(CodecConfig::from_json(r#"{ "expectedChainId": "celo" }"#).is_err());
        assert!(CodecConfig::from_json("true").is_err());
    }
}
