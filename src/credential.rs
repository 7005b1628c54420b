use reqwest::blocking::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use url::Url;

use crate::error::Result;
use crate::oauth::OAuth1;

/// Credential is the opaque authentication handle attached to every outgoing
/// request. One credential is shared by all proxies and wrappers derived from
/// the same root, so link navigation keeps the caller's identity.
#[derive(Debug, Clone, Default)]
pub enum Credential {
    /// No authentication
    #[default]
    Anonymous,
    /// HTTP Basic authentication pair
    Basic { username: String, password: String },
    /// OAuth 1.0a signer (consumer key/secret plus an access token pair)
    OAuth1(OAuth1),
}

impl Credential {
    /// Create a basic-auth credential
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create an OAuth 1.0a credential from a configured signer
    pub fn oauth1(signer: OAuth1) -> Self {
        Credential::OAuth1(signer)
    }

    /// Check whether requests will go out unauthenticated
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credential::Anonymous)
    }

    /// Attach this credential to a request about to be sent. The URL must
    /// already carry its final query string, since OAuth signs over it.
    pub(crate) fn apply(&self, request: RequestBuilder, method: &str, url: &Url) -> Result<RequestBuilder> {
        match self {
            Credential::Anonymous => Ok(request),
            Credential::Basic { username, password } => {
                Ok(request.basic_auth(username, Some(password)))
            }
            Credential::OAuth1(signer) => {
                let header = signer.authorization(method, url, &[])?;
                Ok(request.header(AUTHORIZATION, header))
            }
        }
    }
}
