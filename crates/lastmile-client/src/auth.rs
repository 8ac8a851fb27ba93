//! API key handling.
//!
//! Keys are issued at <https://lastmileai.dev/tokens> and sent as
//! `Authorization: Bearer <key>` on every call except the health check.

use std::fmt;

use reqwest::header::HeaderValue;

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "LASTMILEAI_API_KEY";

/// Bearer credential for the LastMile API.
///
/// `Debug` output never contains the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> ClientResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ClientError::Config {
                message: "API key is empty".into(),
            });
        }
        Ok(Self(key))
    }

    /// `Authorization` header value for this key.
    pub(crate) fn bearer_header(&self) -> ClientResult<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.0)).map_err(|_| {
                ClientError::Config {
                    message: "API key contains characters not allowed in a header".into(),
                }
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}
