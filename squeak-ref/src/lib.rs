// https://github.com/yzernik/squeak

use hex::FromHexError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
    #[error("Failed to decode hex: {0}")]
    DecodeError(#[from] FromHexError),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqueakRef(Vec<u8>);

impl SqueakRef {
    // Canonical form is 64 lowercase hex chars (sha256 of the squeak)
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Squeak",
                input: string,
            })
        } else {
            Ok(Self(hex::decode(string)?))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = canonical_hex(32);
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn to_page_url(&self) -> String {
        format!("/squeak/{}", self.string_data())
    }

    fn string_data(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for SqueakRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string_data())
    }
}

impl TryFrom<String> for SqueakRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SqueakRef::from_string(value)
    }
}

impl From<SqueakRef> for String {
    fn from(value: SqueakRef) -> String {
        value.string_data()
    }
}

impl From<&SqueakRef> for String {
    fn from(value: &SqueakRef) -> String {
        value.string_data()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressRef(String);

impl AddressRef {
    // Base58 author address derived from the signing pubkey
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Address",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new("^[1-9A-HJ-NP-Za-km-z]{26,35}$").unwrap();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn to_page_url(&self) -> String {
        format!("/profile/{}", self.0)
    }
}

impl fmt::Display for AddressRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AddressRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AddressRef::from_string(value)
    }
}

impl From<AddressRef> for String {
    fn from(value: AddressRef) -> String {
        value.0
    }
}

impl From<&AddressRef> for String {
    fn from(value: &AddressRef) -> String {
        value.0.clone()
    }
}

fn canonical_hex(length: u32) -> Regex {
    let mut re = String::new();
    re.push_str("^[0-9a-f]{");
    re.push_str(&(length * 2).to_string());
    re.push_str("}$");
    Regex::new(&re).unwrap()
}
