use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;
use url::Url;

use crate::client::create_http_client;
use crate::credential::Credential;
use crate::dto::Dto;
use crate::error::Result;

/// Query parameters for a single request
pub type Params = HashMap<String, String>;
/// Request headers
pub type Headers = HashMap<String, String>;

/// A not-yet-executed REST resource path.
///
/// A `Resource` accumulates URL segments through [`child`](Resource::child)
/// and [`join`](Resource::join) and executes HTTP verbs against the
/// accumulated path. All proxies derived from one root share the credential
/// and the underlying HTTP connection pool. The handle itself is a cheap
/// clone; cloning never copies the target state.
#[derive(Debug, Clone)]
pub struct Resource {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    url: String,
    credential: Credential,
    /// Headers to attach whenever a request targets a specific URL.
    /// Link-following registers the link's declared type here.
    default_headers: HashMap<String, Headers>,
    client: Client,
    debug: bool,
    /// Memoized named children, so repeated access yields the same instance.
    children: RefCell<HashMap<String, Resource>>,
}

impl Resource {
    /// Create a root resource proxy for the given URL
    pub fn new(url: impl Into<String>, credential: Credential) -> Self {
        Self::build(
            url.into(),
            credential,
            HashMap::new(),
            create_http_client(),
            false,
        )
    }

    /// Create a resource proxy with default headers registered against its
    /// own URL. This is how link-following pins the link's declared content
    /// type as an `Accept` header.
    pub fn with_headers(url: impl Into<String>, credential: Credential, headers: Headers) -> Self {
        let url = url.into();
        let mut default_headers = HashMap::new();
        default_headers.insert(url.clone(), headers);
        Self::build(url, credential, default_headers, create_http_client(), false)
    }

    fn build(
        url: String,
        credential: Credential,
        default_headers: HashMap<String, Headers>,
        client: Client,
        debug: bool,
    ) -> Self {
        Resource {
            inner: Rc::new(Inner {
                url,
                credential,
                default_headers,
                client,
                debug,
                children: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Enable request logging to stderr
    pub fn with_debug(self, debug: bool) -> Self {
        Self::build(
            self.inner.url.clone(),
            self.inner.credential.clone(),
            self.inner.default_headers.clone(),
            self.inner.client.clone(),
            debug,
        )
    }

    /// The URL this proxy targets
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Headers registered for specific target URLs
    pub fn default_headers(&self) -> &HashMap<String, Headers> {
        &self.inner.default_headers
    }

    /// Extend the path by one named segment.
    ///
    /// Children are memoized per instance: repeated access to the same name
    /// returns the identical proxy, not merely an equal one. The child
    /// inherits credential, client and debug flag but no default headers.
    pub fn child(&self, name: &str) -> Resource {
        let mut children = self.inner.children.borrow_mut();
        children
            .entry(name.to_string())
            .or_insert_with(|| self.derive(join_url(&self.inner.url, name)))
            .clone()
    }

    /// Extend the path by zero or more segments, stringified and joined in
    /// order. Unlike [`child`](Resource::child) the result is a fresh proxy
    /// every time; zero segments yields a URL-equal but distinct proxy.
    pub fn join(&self, segments: &[&dyn Display]) -> Resource {
        let mut url = self.inner.url.clone();
        for segment in segments {
            url = join_url(&url, &segment.to_string());
        }
        self.derive(url)
    }

    fn derive(&self, url: String) -> Resource {
        Self::build(
            url,
            self.inner.credential.clone(),
            HashMap::new(),
            self.inner.client.clone(),
            self.inner.debug,
        )
    }

    /// Check whether two handles point at the same proxy instance, as
    /// opposed to mere URL equality
    pub fn same_instance(&self, other: &Resource) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute a GET against the accumulated path
    ///
    /// # Arguments
    /// * `id` - extra path segment for the single outgoing request, applied
    ///   only when present and non-empty; never mutates the proxy's URL
    /// * `params` - query string key/value pairs
    /// * `headers` - request-scoped headers, merged over the defaults
    ///   registered for the target URL (request-scoped wins on collision)
    pub fn get(
        &self,
        id: Option<&str>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<(u16, Option<Dto>)> {
        self.request(Method::GET, self.target(id), params, headers, None)
    }

    /// Execute a DELETE against the accumulated path
    pub fn delete(
        &self,
        id: Option<&str>,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<(u16, Option<Dto>)> {
        self.request(Method::DELETE, self.target(id), params, headers, None)
    }

    /// Execute a POST against the accumulated path; `data` is the raw
    /// request body, typically pre-serialized JSON
    pub fn post(
        &self,
        id: Option<&str>,
        params: Option<&Params>,
        headers: Option<&Headers>,
        data: Option<&str>,
    ) -> Result<(u16, Option<Dto>)> {
        self.request(Method::POST, self.target(id), params, headers, data)
    }

    /// Execute a PUT against the accumulated path
    pub fn put(
        &self,
        id: Option<&str>,
        params: Option<&Params>,
        headers: Option<&Headers>,
        data: Option<&str>,
    ) -> Result<(u16, Option<Dto>)> {
        self.request(Method::PUT, self.target(id), params, headers, data)
    }

    fn target(&self, id: Option<&str>) -> String {
        match id {
            Some(id) if !id.is_empty() => join_url(&self.inner.url, id),
            _ => self.inner.url.clone(),
        }
    }

    fn request(
        &self,
        method: Method,
        target: String,
        params: Option<&Params>,
        headers: Option<&Headers>,
        data: Option<&str>,
    ) -> Result<(u16, Option<Dto>)> {
        let mut url = Url::parse(&target)?;
        if let Some(params) = params.filter(|params| !params.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        let merged = merge_headers(self.inner.default_headers.get(&target), headers);

        let mut request = self.inner.client.request(method.clone(), url.clone());
        for (key, value) in &merged {
            request = request.header(key.as_str(), value.as_str());
        }
        request = self.inner.credential.apply(request, method.as_str(), &url)?;
        if let Some(data) = data {
            request = request.body(data.to_string());
        }

        let start = std::time::Instant::now();
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        if self.inner.debug {
            eprintln!(
                "[hypernav] {} {} => {} ({:?})",
                method,
                url,
                status,
                start.elapsed()
            );
        }

        // An empty body is a valid outcome, distinct from a JSON `{}` body.
        // A non-empty body that fails to decode propagates as a fatal error.
        if body.is_empty() {
            return Ok((status, None));
        }
        let value: Value = serde_json::from_str(&body)?;
        Ok((status, Some(Dto::new(value, self.inner.credential.clone()))))
    }
}

fn join_url(base: &str, segment: &str) -> String {
    format!("{}/{}", base, segment)
}

/// Merge default headers registered for a target URL with request-scoped
/// headers. Union semantics: the request-scoped side wins on key collision,
/// and an empty map merges like any other.
pub(crate) fn merge_headers(parent: Option<&Headers>, call: Option<&Headers>) -> Headers {
    let mut merged = parent.cloned().unwrap_or_default();
    if let Some(call) = call {
        for (key, value) in call {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
