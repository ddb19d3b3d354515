//! Module: config
//! Responsibility: load and validate a crawl definition (endpoint, login, keyspace, buffer, query tree).
//! Does not own: writing definitions back out.
//! Boundary: produces the `ConnectionConfig` and `CrawlOptions` the crawl entry points take.

#[cfg(test)]
mod tests;

use crate::{
    crawl::{CrawlOptions, DEFAULT_FETCH_SIZE},
    error::CrawlError,
    model::QueryNode,
    source::{ConnectionConfig, Credentials},
};
use serde::Deserialize;
use std::num::NonZeroUsize;

///
/// CrawlConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// `host:port` of the store.
    #[serde(default, alias = "url")]
    pub endpoint: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default, alias = "keySpace")]
    pub keyspace: Option<String>,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Query tree; the JSON `cqlQuery` string form is also accepted.
    #[serde(default, alias = "cqlQuery", deserialize_with = "deserialize_query")]
    pub query: Option<QueryNode>,
}

const fn default_buffer_size() -> usize {
    DEFAULT_FETCH_SIZE.get()
}

impl CrawlConfig {
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| CrawlError::config(format!("invalid crawl config: {err}")))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.endpoint.trim().is_empty() {
            return Err(CrawlError::config("the host:port is missing"));
        }
        if self.buffer_size == 0 {
            return Err(CrawlError::config("buffer size must be positive"));
        }

        Ok(())
    }

    /// Connection parameters; a blank keyspace means the session default,
    /// and credentials are passed only when a user is set.
    #[must_use]
    pub fn connection(&self) -> ConnectionConfig {
        let mut conn = ConnectionConfig::new(self.endpoint.trim());

        if let Some(user) = non_blank(self.user.as_deref()) {
            conn = conn.credentials(Credentials::new(
                user,
                self.password.clone().unwrap_or_default(),
            ));
        }
        if let Some(keyspace) = non_blank(self.keyspace.as_deref()) {
            conn = conn.keyspace(keyspace);
        }

        conn
    }

    pub fn options(&self) -> Result<CrawlOptions, CrawlError> {
        let fetch_size = NonZeroUsize::new(self.buffer_size)
            .ok_or_else(|| CrawlError::config("buffer size must be positive"))?;

        let options = CrawlOptions::new(fetch_size);

        Ok(match self.max_depth {
            Some(depth) => options.max_depth(depth),
            None => options,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// The tree is accepted inline or as an embedded JSON string; blank strings mean none.
fn deserialize_query<'de, D>(deserializer: D) -> Result<Option<QueryNode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Tree(QueryNode),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Tree(node)) => Ok(Some(node)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => QueryNode::from_json(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
