//! # Backend Contracts
//!
//! The processing backend has been deployed under two incompatible contracts.
//! Both take the same request, a `multipart/form-data` body with a single file
//! part named [`IMAGE_FIELD`], and differ in path and response body:
//!
//! | Contract | Path | Response |
//! |---|---|---|
//! | [`Contract::Binary`] | `/api/image/process` | raw image bytes |
//! | [`Contract::Base64Json`] | `/process-image` | `{"processedImage": "<base64 PNG>"}` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

/// Path served by the binary contract.
pub const BINARY_PATH: &str = "/api/image/process";

/// Path served by the base64/JSON contract.
pub const BASE64_JSON_PATH: &str = "/process-image";

/// Prefix of the data URI built from a base64/JSON response.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Which response contract the backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Contract {
    /// Contract A: the body is the processed image itself.
    #[default]
    Binary,
    /// Contract B: the body is JSON with a base64-encoded PNG.
    Base64Json,
}

impl Contract {
    /// Fixed endpoint path for this contract.
    pub fn path(self) -> &'static str {
        match self {
            Contract::Binary => BINARY_PATH,
            Contract::Base64Json => BASE64_JSON_PATH,
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Binary => write!(f, "binary"),
            Contract::Base64Json => write!(f, "base64-json"),
        }
    }
}

impl FromStr for Contract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Contract::Binary),
            "base64-json" => Ok(Contract::Base64Json),
            other => Err(format!(
                "unknown contract '{}' (expected 'binary' or 'base64-json')",
                other
            )),
        }
    }
}

/// Response body of the base64/JSON contract.
///
/// No envelope: the object carries this one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedImagePayload {
    /// Base64-encoded PNG
    #[serde(rename = "processedImage")]
    pub processed_image: String,
}
