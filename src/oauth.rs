use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use url::{form_urlencoded, Position, Url};
use uuid::Uuid;

use crate::client::{create_http_client, create_no_redirect_client};
use crate::credential::Credential;
use crate::error::{ClientError, Result};
use crate::resource::{Headers, Resource};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn oauth_escape(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// OAuth 1.0a request signer using the HMAC-SHA1 signature method.
///
/// Holds the application (consumer) key/secret and, once the three-legged
/// handshake has completed, the resource-owner token pair. Signing covers the
/// HTTP method, the base URL and the full query parameter list.
#[derive(Clone)]
pub struct OAuth1 {
    /// Application key identifying the consumer
    pub consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: Option<String>,
}

// Implement Debug manually to avoid exposing the secrets
impl std::fmt::Debug for OAuth1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

impl OAuth1 {
    /// Create a signer holding only the consumer pair (handshake stage)
    pub fn consumer(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        OAuth1 {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
        }
    }

    /// Attach the resource-owner token pair obtained from the handshake
    pub fn with_tokens(mut self, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Build the `Authorization` header for a request about to be sent.
    ///
    /// `extra` carries handshake-only protocol parameters such as
    /// `oauth_callback` or `oauth_verifier`.
    pub fn authorization(&self, method: &str, url: &Url, extra: &[(&str, &str)]) -> Result<String> {
        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        self.authorization_at(method, url, extra, &nonce, timestamp)
    }

    fn authorization_at(
        &self,
        method: &str,
        url: &Url,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String> {
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some(ref token) = self.token {
            oauth_params.push(("oauth_token".to_string(), token.clone()));
        }
        for (key, value) in extra {
            oauth_params.push((key.to_string(), value.to_string()));
        }

        let signature = self.sign(method, url, &oauth_params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, oauth_escape(value)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    /// Compute the HMAC-SHA1 signature over the RFC 5849 base string:
    /// method, base URL and the normalized (encoded, byte-sorted) union of
    /// query and protocol parameters.
    fn sign(&self, method: &str, url: &Url, oauth_params: &[(String, String)]) -> Result<String> {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (oauth_escape(&key), oauth_escape(&value)))
            .collect();
        pairs.extend(
            oauth_params
                .iter()
                .map(|(key, value)| (oauth_escape(key), oauth_escape(value))),
        );
        pairs.sort();

        let normalized = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        let base_url = &url[..Position::AfterPath];
        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            oauth_escape(base_url),
            oauth_escape(&normalized)
        );

        let key = format!(
            "{}&{}",
            oauth_escape(&self.consumer_secret),
            oauth_escape(self.token_secret.as_deref().unwrap_or(""))
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|_| ClientError::Other("invalid HMAC key".to_string()))?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Perform the three-legged OAuth 1.0a handshake against a service exposing
/// the conventional `/oauth/request_token`, `/oauth/authorize` and
/// `/oauth/access_token` endpoints, and return the long-lived access token
/// pair for use with [`OAuth1::with_tokens`].
pub fn get_access_token(
    api_url: &str,
    identity: &str,
    credential: &str,
    app_key: &str,
    app_secret: &str,
) -> Result<(String, String)> {
    let client = create_http_client();

    // Leg 1: temporary request token, out-of-band callback.
    let signer = OAuth1::consumer(app_key, app_secret);
    let request_token_url = Url::parse(&format!("{}/oauth/request_token", api_url))?;
    let header = signer.authorization("POST", &request_token_url, &[("oauth_callback", "oob")])?;
    let response = client
        .post(request_token_url.as_str())
        .header(reqwest::header::AUTHORIZATION, header)
        .send()?;
    if !response.status().is_success() {
        return Err(ClientError::Handshake(format!(
            "request token endpoint returned {}",
            response.status()
        )));
    }
    let (token, token_secret) = parse_token_response(&response.text()?)?;

    // Leg 2: resource-owner authorization. The verifier comes back in the
    // redirect Location, so redirects must not be followed here.
    let authorize_url = format!("{}/oauth/authorize?oauth_token={}", api_url, token);
    let response = create_no_redirect_client()
        .get(&authorize_url)
        .basic_auth(identity, Some(credential))
        .send()?;
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ClientError::Handshake("authorize response carried no Location header".to_string())
        })?;
    let verifier = extract_verifier(location)?;

    // Leg 3: exchange for the long-lived access token pair.
    let signer = OAuth1::consumer(app_key, app_secret).with_tokens(token, token_secret);
    let access_token_url = Url::parse(&format!("{}/oauth/access_token", api_url))?;
    let header = signer.authorization(
        "POST",
        &access_token_url,
        &[("oauth_verifier", verifier.as_str())],
    )?;
    let response = client
        .post(access_token_url.as_str())
        .header(reqwest::header::AUTHORIZATION, header)
        .send()?;
    if !response.status().is_success() {
        return Err(ClientError::Handshake(format!(
            "access token endpoint returned {}",
            response.status()
        )));
    }
    parse_token_response(&response.text()?)
}

/// Register a new application through the service's own hypermedia API and
/// return its key/secret pair, ready to feed into [`get_access_token`].
///
/// Fetches the `login` resource, follows its `applications` link and posts
/// the new application's name.
pub fn register_app(
    api_url: &str,
    identity: &str,
    credential: &str,
    app_name: &str,
) -> Result<(String, String)> {
    let api = Resource::new(api_url, Credential::basic(identity, credential));
    let (_, user) = api.child("login").get(None, None, None)?;
    let user = user.ok_or_else(|| {
        ClientError::Handshake("login resource returned an empty body".to_string())
    })?;

    let applications = user.follow("applications")?;
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    let body = serde_json::json!({ "name": app_name }).to_string();
    let (_, app) = applications.post(None, None, Some(&headers), Some(&body))?;
    let app = app.ok_or_else(|| {
        ClientError::Handshake("application registration returned an empty body".to_string())
    })?;

    let app_key = app.get_str("apiKey")?.to_string();
    let app_secret = app.get_str("apiSecret")?.to_string();
    Ok((app_key, app_secret))
}

/// Parse the form-encoded body of a token endpoint response.
fn parse_token_response(body: &str) -> Result<(String, String)> {
    let mut token = None;
    let mut token_secret = None;
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        match &*key {
            "oauth_token" => token = Some(value.into_owned()),
            "oauth_token_secret" => token_secret = Some(value.into_owned()),
            _ => {}
        }
    }
    match (token, token_secret) {
        (Some(token), Some(token_secret)) => Ok((token, token_secret)),
        _ => Err(ClientError::Handshake(
            "token response is missing oauth_token or oauth_token_secret".to_string(),
        )),
    }
}

/// Pull `oauth_verifier` out of the authorize redirect Location.
fn extract_verifier(location: &str) -> Result<String> {
    let url = Url::parse(location)?;
    url.query_pairs()
        .find(|(key, _)| key == "oauth_verifier")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            ClientError::Handshake(format!("no oauth_verifier in redirect to {}", location))
        })
}
