use reqwest::blocking::{Client, ClientBuilder};
use reqwest::redirect::Policy;
use std::time::Duration;

/// Create the default HTTP client for API requests
/// with settings for connection pooling and timeouts
pub fn create_http_client() -> Client {
    ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(Duration::from_secs(300)) // 5 minutes
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Create an HTTP client that does not follow redirects.
/// The OAuth authorize step needs to read the redirect Location itself.
pub fn create_no_redirect_client() -> Client {
    ClientBuilder::new()
        .redirect(Policy::none())
        .timeout(Duration::from_secs(300))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}
