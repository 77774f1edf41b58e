//! Header policy definition.
//!
//! A [`HeaderPolicy`] is built once per middleware installation and shared
//! read-only behind an `Arc` by every request that flows through it.

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{PolicyConfig, StaticValue};

/// Transform applied to the full header set as the last patch step.
///
/// The returned map replaces the response headers wholesale.
#[derive(Clone)]
pub struct HeaderCallback(Arc<dyn Fn(HeaderMap) -> HeaderMap + Send + Sync>);

impl HeaderCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(HeaderMap) -> HeaderMap + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, headers: HeaderMap) -> HeaderMap {
        (self.0)(headers)
    }
}

impl fmt::Debug for HeaderCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HeaderCallback(..)")
    }
}

/// Static override entry. `None` values are skipped when patching.
pub type StaticHeader = (HeaderName, Option<Vec<HeaderValue>>);

/// Declarative response header policy.
///
/// Every field is optional. An absent field disables its stage, which is not
/// the same as an empty one: `allow: Some(vec![])` strips every header.
#[derive(Debug, Clone, Default)]
pub struct HeaderPolicy {
    /// Header names to keep; everything else is removed.
    pub allow: Option<Vec<String>>,

    /// Header names to remove, applied after `allow`.
    pub remove: Option<Vec<String>>,

    /// Headers to set after filtering, overwriting existing values.
    pub static_headers: Option<Vec<StaticHeader>>,

    /// Transform run last over the full header set.
    pub callback: Option<HeaderCallback>,
}

impl HeaderPolicy {
    /// Create an empty policy. Patching with it leaves headers unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.allow = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn remove<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.remove = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Add a single-valued static override. A `None` value is kept in the
    /// policy but skipped when patching.
    pub fn static_header(self, name: HeaderName, value: Option<HeaderValue>) -> Self {
        self.static_values(name, value.map(|v| vec![v]))
    }

    /// Add a static override carrying several values for one header. An
    /// empty list is skipped like `None`.
    pub fn static_values(mut self, name: HeaderName, values: Option<Vec<HeaderValue>>) -> Self {
        self.static_headers
            .get_or_insert_with(Vec::new)
            .push((name, values));
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(HeaderMap) -> HeaderMap + Send + Sync + 'static,
    {
        self.callback = Some(HeaderCallback::new(f));
        self
    }

    /// True when no stage is enabled.
    pub fn is_noop(&self) -> bool {
        self.allow.is_none()
            && self.remove.is_none()
            && self.static_headers.is_none()
            && self.callback.is_none()
    }
}

/// Errors building a [`HeaderPolicy`] from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid header name: {0:?}")]
    InvalidName(String),

    #[error("invalid value for header {name:?}: {value:?}")]
    InvalidValue { name: String, value: String },

    #[error("static header {0:?} has no values")]
    EmptyValues(String),
}

impl TryFrom<&PolicyConfig> for HeaderPolicy {
    type Error = PolicyError;

    fn try_from(config: &PolicyConfig) -> Result<Self, Self::Error> {
        let static_headers = match &config.static_headers {
            Some(entries) => {
                let mut parsed = Vec::with_capacity(entries.len());
                for (name, value) in entries {
                    let header = HeaderName::from_bytes(name.as_bytes())
                        .map_err(|_| PolicyError::InvalidName(name.clone()))?;
                    let values = match value {
                        Some(value) => Some(parse_values(name, value)?),
                        None => None,
                    };
                    parsed.push((header, values));
                }
                Some(parsed)
            }
            None => None,
        };

        Ok(Self {
            allow: config.allow.clone(),
            remove: config.remove.clone(),
            static_headers,
            callback: None,
        })
    }
}

fn parse_values(name: &str, value: &StaticValue) -> Result<Vec<HeaderValue>, PolicyError> {
    if value.iter().next().is_none() {
        return Err(PolicyError::EmptyValues(name.to_string()));
    }
    value
        .iter()
        .map(|v| {
            HeaderValue::from_str(v).map_err(|_| PolicyError::InvalidValue {
                name: name.to_string(),
                value: v.to_string(),
            })
        })
        .collect()
}
