//! # hypernav - hypermedia REST API navigation client
//!
//! A generic client for hypermedia-driven REST APIs. Instead of hard-coding
//! endpoint paths and response shapes, resource URLs are built by chaining
//! path segments on a [`Resource`] proxy, HTTP verbs execute against the
//! accumulated path, and JSON bodies come back as [`Dto`] wrappers that
//! expose fields, collection items and `links` navigation through one
//! interface. Following a link yields a new [`Resource`], so the server's
//! own hypermedia drives the whole traversal.
//!
//! ## Features
//!
//! - Dynamic URL building: memoized named children plus ad-hoc segment joins
//! - GET/POST/PUT/DELETE with per-call id, query params, headers and body
//! - Response wrappers with field access, collection protocol and link
//!   navigation, all carrying the originating credential
//! - HTTP Basic and OAuth 1.0a (HMAC-SHA1) authentication
//! - Three-legged token issuance and application self-registration helpers
//!
//! ## Basic usage
//!
//! ```no_run
//! use hypernav::{Credential, Resource};
//!
//! fn main() -> hypernav::Result<()> {
//!     let api = Resource::new(
//!         "https://cloud.example.com/api",
//!         Credential::basic("admin", "secret"),
//!     );
//!
//!     // GET https://cloud.example.com/api/admin/datacenters
//!     let (status, body) = api.child("admin").child("datacenters").get(None, None, None)?;
//!     assert_eq!(status, 200);
//!     let datacenters = body.expect("datacenter list");
//!
//!     for datacenter in datacenters.iter()? {
//!         println!("{}", datacenter.get_str("name")?);
//!         // Navigate by the server-supplied link, not a hard-coded path.
//!         let (_, _racks) = datacenter.follow("racks")?.get(None, None, None)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## OAuth 1.0a
//!
//! ```no_run
//! use hypernav::{oauth, Credential, OAuth1, Resource};
//!
//! let api_url = "https://cloud.example.com/api";
//! let (key, secret) = oauth::register_app(api_url, "admin", "secret", "my-app")?;
//! let (token, token_secret) = oauth::get_access_token(api_url, "admin", "secret", &key, &secret)?;
//!
//! let signer = OAuth1::consumer(key, secret).with_tokens(token, token_secret);
//! let api = Resource::new(api_url, Credential::oauth1(signer));
//! # Ok::<(), hypernav::ClientError>(())
//! ```

pub mod client;
pub mod credential;
pub mod dto;
pub mod error;
pub mod oauth;
pub mod resource;

// Re-export main types for convenience
pub use credential::Credential;
pub use dto::{Body, Dto, Items, Link};
pub use error::{ClientError, Result};
pub use oauth::OAuth1;
pub use resource::{Headers, Params, Resource};

// Re-export serde_json for convenience
pub use serde_json::json;
