//! Precomputed authentication headers
//!
//! The engine does not run auth flows; it attaches a precomputed header set
//! to every request and passes it through unchanged. This module builds
//! those header sets for the common schemes.

use crate::types::StringMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Credentials rendered into request headers
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Account login
        username: String,
        /// Account password
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl Credentials {
    /// Create basic credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create bearer credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Headers to attach to every outgoing request
    pub fn headers(&self) -> StringMap {
        let mut headers = StringMap::new();
        match self {
            Self::None => {}
            Self::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
            Self::Bearer { token } => {
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }
        }
        headers
    }
}
