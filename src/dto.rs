use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::credential::Credential;
use crate::error::{ClientError, Result};
use crate::resource::{Headers, Resource};

/// A hypermedia link descriptor as served inside response bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Symbolic relation name ("self", "applications", ...)
    pub rel: String,
    /// Target URL
    pub href: String,
    /// Declared MIME type of the target resource
    #[serde(rename = "type", default)]
    pub media_type: String,
}

/// Decoded JSON body, shaped once at parse time.
///
/// The shape decides which protocols a [`Dto`] supports: only the
/// `Collection` variant carries length, iteration and indexed access.
#[derive(Debug, Clone)]
pub enum Body {
    /// JSON object carrying a `collection` array; `fields` holds the
    /// remaining envelope keys (`links`, totals, ...)
    Collection {
        items: Vec<Value>,
        fields: Map<String, Value>,
    },
    /// Any other JSON object
    Object(Map<String, Value>),
    /// A primitive or bare-array body
    Scalar(Value),
}

impl Body {
    fn from_value(value: Value) -> Body {
        match value {
            Value::Object(mut map) => match map.remove("collection") {
                Some(Value::Array(items)) => Body::Collection { items, fields: map },
                Some(other) => {
                    // A non-array `collection` key is an ordinary field.
                    map.insert("collection".to_string(), other);
                    Body::Object(map)
                }
                None => Body::Object(map),
            },
            other => Body::Scalar(other),
        }
    }

    /// Field lookup on the underlying JSON, bypassing instance overrides
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Body::Collection { fields, .. } => fields.get(key),
            Body::Object(map) => map.get(key),
            Body::Scalar(_) => None,
        }
    }

    fn items(&self) -> Option<&[Value]> {
        match self {
            Body::Collection { items, .. } => Some(items),
            _ => None,
        }
    }
}

/// Dynamic wrapper over a decoded JSON response body.
///
/// Exposes JSON fields, collection semantics and hypermedia link traversal
/// through one interface. Field reads go through a two-tier lookup: instance
/// overrides installed with [`set`](Dto::set) shadow the body without ever
/// mutating it. Following a link yields a new [`Resource`] carrying this
/// wrapper's credential.
#[derive(Debug, Clone)]
pub struct Dto {
    body: Body,
    credential: Credential,
    overrides: HashMap<String, Value>,
}

impl Dto {
    /// Wrap a decoded JSON value, carrying the credential of the request
    /// that produced it
    pub fn new(value: Value, credential: Credential) -> Self {
        Dto {
            body: Body::from_value(value),
            credential,
            overrides: HashMap::new(),
        }
    }

    /// The parsed body, bypassing instance overrides
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Read a field: instance overrides first, then the body's own keys
    pub fn get(&self, key: &str) -> Result<&Value> {
        if let Some(value) = self.overrides.get(key) {
            return Ok(value);
        }
        self.body
            .field(key)
            .ok_or_else(|| ClientError::MissingField(key.to_string()))
    }

    /// Read a string-valued field
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| ClientError::Other(format!("field {} is not a string", key)))
    }

    /// Install an instance-local override for a field. The parsed body is
    /// left untouched and stays observable through [`body`](Dto::body).
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.overrides.insert(key.into(), value);
    }

    /// Number of collection items
    pub fn len(&self) -> Result<usize> {
        self.body
            .items()
            .map(<[Value]>::len)
            .ok_or(ClientError::NoLength)
    }

    /// Whether the collection has no items
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Iterate the collection items as wrappers sharing this credential.
    /// Restartable: every call starts from the first item.
    pub fn iter(&self) -> Result<Items<'_>> {
        let items = self.body.items().ok_or(ClientError::NotIterable)?;
        Ok(Items {
            inner: items.iter(),
            credential: &self.credential,
        })
    }

    /// Indexed access to a collection item
    pub fn item(&self, index: usize) -> Result<Dto> {
        let items = self.body.items().ok_or(ClientError::NotIndexable)?;
        let value = items.get(index).ok_or(ClientError::IndexOutOfBounds {
            index,
            len: items.len(),
        })?;
        Ok(Dto::new(value.clone(), self.credential.clone()))
    }

    /// Typed view of the body's `links` array; empty when the body has none
    pub fn links(&self) -> Result<Vec<Link>> {
        match self.body.field("links") {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Follow the first link whose `rel` matches, in array order.
    ///
    /// The resulting proxy targets the link's `href`, carries this wrapper's
    /// credential, and pins `Accept` to the link's declared type for that
    /// URL.
    pub fn follow(&self, rel: &str) -> Result<Resource> {
        let links = self.body.field("links").and_then(Value::as_array);
        let matched = links
            .into_iter()
            .flatten()
            .find(|link| link.get("rel").and_then(Value::as_str) == Some(rel));
        let link: Link = match matched {
            Some(value) => serde_json::from_value(value.clone())?,
            None => return Err(ClientError::LinkNotFound(rel.to_string())),
        };

        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), link.media_type);
        Ok(Resource::with_headers(
            link.href,
            self.credential.clone(),
            headers,
        ))
    }
}

/// Lazy iterator over collection items, yielding one wrapper per element
pub struct Items<'a> {
    inner: std::slice::Iter<'a, Value>,
    credential: &'a Credential,
}

impl Iterator for Items<'_> {
    type Item = Dto;

    fn next(&mut self) -> Option<Dto> {
        self.inner
            .next()
            .map(|value| Dto::new(value.clone(), self.credential.clone()))
    }
}
