//! Module: source
//! Responsibility: capability boundary over the networked row store (open, execute, stream).
//! Does not own: traversal order, fan-out, or early-stop policy.
//! Boundary: the executor reaches the store only through these traits.

mod error;
pub mod memory;

pub use error::SourceError;

use crate::{
    row::{Columns, Row},
    value::Value,
};
use serde::Deserialize;
use std::{fmt, num::NonZeroUsize};

///
/// Credentials
///
/// Passed through to the source untouched. The password never appears in
/// `Debug` output.
///

#[derive(Clone, Deserialize, Eq, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

///
/// ConnectionConfig
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub credentials: Option<Credentials>,
    pub keyspace: Option<String>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            keyspace: None,
        }
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }
}

///
/// QuerySource
///
/// Opens sessions against the store. A session is released when dropped.
///

pub trait QuerySource {
    type Session: Session;

    fn open(&self, config: &ConnectionConfig) -> Result<Self::Session, SourceError>;
}

///
/// Session
///
/// Executes statements. `Ok(None)` means the statement produced no readable
/// result (e.g. a write), which is not an error.
///
/// One session serves a whole crawl; every execution gets its own result
/// handle borrowing the session, so nested executions hold independent
/// cursors over the same session.
///

pub trait Session {
    type Results<'s>: ResultHandle
    where
        Self: 's;

    fn execute(
        &self,
        query: &str,
        fetch_size: NonZeroUsize,
        bound: Option<&Value>,
    ) -> Result<Option<Self::Results<'_>>, SourceError>;
}

///
/// ResultHandle
///
/// Lazy, finite, non-restartable row stream for one execution.
/// Dropping the handle closes it and releases any source-side cursor.
///

pub trait ResultHandle {
    fn columns(&self) -> &Columns;

    /// Next row in delivery order; `Ok(None)` once the stream is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, SourceError>;
}
