// https://github.com/yzernik/squeaknode

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use squeak_ref::{AddressRef, SqueakRef};

/// One squeak as the node hands it to the view layer.
///
/// `content` is `None` while the squeak is still locked (the node has not
/// yet bought the decryption key). `author` is `None` when no profile is
/// known for the author address.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SqueakDisplay {
    #[serde(alias = "squeakHash")]
    pub hash: SqueakRef,
    #[serde(alias = "replyTo")]
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub reply_to: Option<SqueakRef>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub author: Option<Profile>,
    #[serde(alias = "contentStr")]
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub content: Option<String>,
    #[serde(alias = "blockHeight")]
    pub block_height: i64,
    #[serde(alias = "blockTime")]
    pub block_time: i64,
}

impl SqueakDisplay {
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    pub fn is_unlocked(&self) -> bool {
        self.content.is_some()
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(alias = "profileName")]
    pub name: String,
    pub address: AddressRef,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub image: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub following: bool,
}

/// Which chain the backing node follows. Carried through to the view
/// untouched, for address and explorer links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Simnet,
    Regtest,
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_entry() {
        let json = r#"{
            "squeakHash": "dd8e0e1a9fa95dd8ca19e65a0899c3bbb1ef8a9d86c4a291382de5be13d9cd3f",
            "replyTo": "00000000e767d7f2f2cb5f81b8659ee1bba3562687a2b1478498e94f54eaba59",
            "author": {
                "profileName": "alice",
                "address": "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
                "following": true
            },
            "contentStr": "hello world",
            "blockHeight": 700001,
            "blockTime": 1629000000
        }"#;
        let squeak: SqueakDisplay = serde_json::from_str(json).unwrap();

        assert_eq!(
            squeak.hash.to_string(),
            "dd8e0e1a9fa95dd8ca19e65a0899c3bbb1ef8a9d86c4a291382de5be13d9cd3f"
        );
        assert!(squeak.is_reply());
        assert!(squeak.is_unlocked());
        assert_eq!(squeak.content.as_deref(), Some("hello world"));

        let author = squeak.author.unwrap();
        assert_eq!(author.name, "alice");
        assert!(author.following);
        assert_eq!(author.image, None);
    }

    #[test]
    fn test_parse_locked_squeak() {
        // no contentStr and no author profile yet
        let json = r#"{
            "squeakHash": "dd8e0e1a9fa95dd8ca19e65a0899c3bbb1ef8a9d86c4a291382de5be13d9cd3f",
            "blockHeight": 700001,
            "blockTime": 1629000000
        }"#;
        let squeak: SqueakDisplay = serde_json::from_str(json).unwrap();

        assert!(!squeak.is_reply());
        assert!(!squeak.is_unlocked());
        assert_eq!(squeak.author, None);
    }

    #[test]
    fn test_parse_tolerates_misformatted_optionals() {
        let json = r#"{
            "squeakHash": "dd8e0e1a9fa95dd8ca19e65a0899c3bbb1ef8a9d86c4a291382de5be13d9cd3f",
            "replyTo": "not-a-hash",
            "author": 42,
            "blockHeight": 700001,
            "blockTime": 1629000000
        }"#;
        let squeak: SqueakDisplay = serde_json::from_str(json).unwrap();

        assert_eq!(squeak.reply_to, None);
        assert_eq!(squeak.author, None);
    }

    #[test]
    fn test_parse_rejects_bad_hash() {
        let json = r#"{
            "squeakHash": "not-a-hash",
            "blockHeight": 700001,
            "blockTime": 1629000000
        }"#;
        let result: Result<SqueakDisplay, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_network_round_trip() {
        let network: Network = serde_json::from_str(r#""testnet""#).unwrap();
        assert_eq!(network, Network::Testnet);
        assert_eq!(serde_json::to_string(&network).unwrap(), r#""testnet""#);
        assert_eq!(Network::default(), Network::Mainnet);
    }
}
