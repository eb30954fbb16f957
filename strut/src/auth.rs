//! Authentication headers.
//!
//! Credentials are turned into an `Authorization` header once, when options
//! are resolved, and then travel with every other configured header.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Header that carries credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Credentials applied to the document download and to every generated call.
///
/// When deserialized from an options document shaped like
/// `{ "token": ..., "basic": { "username": ..., "password": ... } }`,
/// `basic` wins if both are present.
///
/// ## Examples
///
/// ```
/// use strut::Auth;
///
/// let token = Auth::Token("secret-token".to_string());
/// assert_eq!(token.header_value(), "secret-token");
///
/// let basic = Auth::basic("user", "pass");
/// assert_eq!(basic.header_value(), "Basic dXNlcjpwYXNz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthOptions", into = "AuthOptions")]
pub enum Auth {
    /// Sent verbatim as the `Authorization` header.
    Token(String),
    /// HTTP basic authentication.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
}

impl Auth {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Self::Token(token) => token.clone(),
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }
}

/// Merges `headers` with the header produced by `auth`.
///
/// Credentials override an `Authorization` entry already in `headers`.
pub fn build_headers(
    headers: &BTreeMap<String, String>,
    auth: Option<&Auth>,
) -> BTreeMap<String, String> {
    let mut merged = headers.clone();
    if let Some(auth) = auth {
        merged.insert(AUTHORIZATION.to_string(), auth.header_value());
    }
    merged
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BasicCredentials {
    username: String,
    password: String,
}

/// Wire shape of [`Auth`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AuthOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic: Option<BasicCredentials>,
}

impl TryFrom<AuthOptions> for Auth {
    type Error = String;

    fn try_from(options: AuthOptions) -> Result<Self, Self::Error> {
        match (options.basic, options.token) {
            (Some(BasicCredentials { username, password }), _) => {
                Ok(Self::Basic { username, password })
            }
            (None, Some(token)) => Ok(Self::Token(token)),
            (None, None) => Err("auth requires either `token` or `basic`".to_string()),
        }
    }
}

impl From<Auth> for AuthOptions {
    fn from(auth: Auth) -> Self {
        match auth {
            Auth::Token(token) => Self {
                token: Some(token),
                basic: None,
            },
            Auth::Basic { username, password } => Self {
                token: None,
                basic: Some(BasicCredentials { username, password }),
            },
        }
    }
}
