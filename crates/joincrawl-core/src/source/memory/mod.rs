//! In-process query source.
//!
//! Statements are registered by exact query text. Results stream in pages of
//! at most `fetch_size` rows, and every session, handle, and page load is
//! counted in [`SourceStats`] so callers can assert on release and fetch
//! behavior.

mod fixture;


pub use fixture::{FixtureStatement, MemoryFixture};

use crate::{
    row::{ColumnDef, Columns, Row},
    source::{ConnectionConfig, Credentials, QuerySource, ResultHandle, Session, SourceError},
    value::Value,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroUsize,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// MemoryTable
///
/// Column metadata plus positional rows. With a bind column set, a bound
/// execution only sees rows whose bind column equals the bound value.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    columns: Columns,
    rows: Vec<Vec<Value>>,
    bind: Option<String>,
}

impl MemoryTable {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows: Vec::new(),
            bind: None,
        }
    }

    #[must_use]
    pub fn row<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn bind_on(mut self, column: impl Into<String>) -> Self {
        self.bind = Some(column.into());
        self
    }

    #[must_use]
    pub const fn columns(&self) -> &Columns {
        &self.columns
    }

    // Materialize the rows visible to one execution.
    fn select(&self, query: &str, bound: Option<&Value>) -> Result<Vec<Row>, SourceError> {
        let filter = match (bound, &self.bind) {
            (None, _) => None,
            (Some(value), Some(column)) => {
                let pos = self.columns.position(column).ok_or_else(|| {
                    SourceError::query(query, format!("unknown bind column '{column}'"))
                })?;
                Some((pos, value))
            }
            (Some(_), None) => {
                return Err(SourceError::query(
                    query,
                    "statement takes no bound parameter",
                ));
            }
        };

        Ok(self
            .rows
            .iter()
            .filter(|values| filter.is_none_or(|(pos, value)| values.get(pos) == Some(value)))
            .map(|values| Row::from_columns(&self.columns, values.iter().cloned()))
            .collect())
    }
}

///
/// MemoryStatement
///

#[derive(Clone, Debug)]
pub enum MemoryStatement {
    Rows(MemoryTable),
    /// Executes successfully but yields no result handle.
    NoResult,
    /// Rejected by the source with this message.
    Fail(String),
}

///
/// EndpointPolicy
///

#[derive(Clone, Debug)]
enum EndpointPolicy {
    Any,
    Only(BTreeSet<String>),
    Unreachable,
}

///
/// SourceStats
///
/// Shared counters for one source and every session it opened.
///

#[derive(Debug, Default)]
pub struct SourceStats {
    sessions_opened: AtomicU64,
    sessions_closed: AtomicU64,
    executions: AtomicU64,
    handles_opened: AtomicU64,
    handles_closed: AtomicU64,
    fetches: AtomicU64,
    rows_delivered: AtomicU64,
    fetch_sizes: Mutex<Vec<usize>>,
    bound: Mutex<Vec<(String, Option<Value>)>>,
}

impl SourceStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn record_execution(&self, query: &str, fetch_size: NonZeroUsize, bound: Option<&Value>) {
        Self::bump(&self.executions);
        self.fetch_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fetch_size.get());
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((query.to_string(), bound.cloned()));
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sessions_opened: self.sessions_opened.load(Ordering::SeqCst),
            sessions_closed: self.sessions_closed.load(Ordering::SeqCst),
            executions: self.executions.load(Ordering::SeqCst),
            handles_opened: self.handles_opened.load(Ordering::SeqCst),
            handles_closed: self.handles_closed.load(Ordering::SeqCst),
            fetches: self.fetches.load(Ordering::SeqCst),
            rows_delivered: self.rows_delivered.load(Ordering::SeqCst),
        }
    }

    /// Fetch sizes requested, one entry per execution.
    #[must_use]
    pub fn fetch_sizes(&self) -> Vec<usize> {
        self.fetch_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(query, bound value)` per execution, in execution order.
    #[must_use]
    pub fn executions(&self) -> Vec<(String, Option<Value>)> {
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

///
/// StatsSnapshot
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatsSnapshot {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub executions: u64,
    pub handles_opened: u64,
    pub handles_closed: u64,
    pub fetches: u64,
    pub rows_delivered: u64,
}

///
/// MemorySource
///

#[derive(Clone, Debug)]
pub struct MemorySource {
    statements: Arc<BTreeMap<String, MemoryStatement>>,
    endpoints: EndpointPolicy,
    login: Option<Credentials>,
    keyspaces: BTreeSet<String>,
    stats: Arc<SourceStats>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// A source that accepts any endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            statements: Arc::new(BTreeMap::new()),
            endpoints: EndpointPolicy::Any,
            login: None,
            keyspaces: BTreeSet::new(),
            stats: Arc::new(SourceStats::default()),
        }
    }

    /// A source that refuses every connection.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            endpoints: EndpointPolicy::Unreachable,
            ..Self::new()
        }
    }

    /// Restrict connections to the listed endpoints (cumulative).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        match &mut self.endpoints {
            EndpointPolicy::Only(set) => {
                set.insert(endpoint);
            }
            policy => *policy = EndpointPolicy::Only(BTreeSet::from([endpoint])),
        }
        self
    }

    /// Require this login; sessions opened without it, or with another one,
    /// fail to connect.
    #[must_use]
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.login = Some(Credentials::new(user, password));
        self
    }

    /// Restrict sessions to the listed keyspaces (cumulative). A connection
    /// that names no keyspace is always accepted.
    #[must_use]
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspaces.insert(keyspace.into());
        self
    }

    #[must_use]
    pub fn statement(mut self, query: impl Into<String>, statement: MemoryStatement) -> Self {
        Arc::make_mut(&mut self.statements).insert(query.into(), statement);
        self
    }

    #[must_use]
    pub fn table(self, query: impl Into<String>, table: MemoryTable) -> Self {
        self.statement(query, MemoryStatement::Rows(table))
    }

    #[must_use]
    pub fn stats(&self) -> &SourceStats {
        &self.stats
    }
}

impl QuerySource for MemorySource {
    type Session = MemorySession;

    fn open(&self, config: &ConnectionConfig) -> Result<MemorySession, SourceError> {
        let reachable = match &self.endpoints {
            EndpointPolicy::Any => true,
            EndpointPolicy::Only(set) => set.contains(&config.endpoint),
            EndpointPolicy::Unreachable => false,
        };
        if !reachable {
            return Err(SourceError::connection(
                &config.endpoint,
                "endpoint unreachable",
            ));
        }

        if let Some(login) = &self.login
            && config.credentials.as_ref() != Some(login)
        {
            return Err(SourceError::connection(
                &config.endpoint,
                "authentication failed",
            ));
        }

        if let Some(keyspace) = &config.keyspace
            && !self.keyspaces.is_empty()
            && !self.keyspaces.contains(keyspace)
        {
            return Err(SourceError::connection(
                &config.endpoint,
                format!("unknown keyspace '{keyspace}'"),
            ));
        }

        SourceStats::bump(&self.stats.sessions_opened);

        Ok(MemorySession {
            statements: Arc::clone(&self.statements),
            stats: Arc::clone(&self.stats),
        })
    }
}

///
/// MemorySession
///

#[derive(Debug)]
pub struct MemorySession {
    statements: Arc<BTreeMap<String, MemoryStatement>>,
    stats: Arc<SourceStats>,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        SourceStats::bump(&self.stats.sessions_closed);
    }
}

impl Session for MemorySession {
    type Results<'s> = MemoryResults<'s>;

    fn execute(
        &self,
        query: &str,
        fetch_size: NonZeroUsize,
        bound: Option<&Value>,
    ) -> Result<Option<MemoryResults<'_>>, SourceError> {
        self.stats.record_execution(query, fetch_size, bound);

        let statement = self
            .statements
            .get(query)
            .ok_or_else(|| SourceError::query(query, "unknown statement"))?;

        match statement {
            MemoryStatement::NoResult => Ok(None),
            MemoryStatement::Fail(message) => Err(SourceError::query(query, message.clone())),
            MemoryStatement::Rows(table) => {
                let rows = table.select(query, bound)?;
                let mut results = MemoryResults {
                    stats: &self.stats,
                    query: query.to_string(),
                    columns: table.columns.clone(),
                    pending: rows.into_iter(),
                    page: Vec::new().into_iter(),
                    fetch_size,
                    closed: false,
                };
                SourceStats::bump(&self.stats.handles_opened);

                // Drivers load the first page as part of execution.
                results.fetch_page();

                Ok(Some(results))
            }
        }
    }
}

///
/// MemoryResults
///

#[derive(Debug)]
pub struct MemoryResults<'s> {
    stats: &'s SourceStats,
    query: String,
    columns: Columns,
    pending: std::vec::IntoIter<Row>,
    page: std::vec::IntoIter<Row>,
    fetch_size: NonZeroUsize,
    closed: bool,
}

impl MemoryResults<'_> {
    /// Release the handle. Later reads fail with `UseAfterClose`.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            SourceStats::bump(&self.stats.handles_closed);
        }
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn fetch_page(&mut self) {
        let page: Vec<Row> = self.pending.by_ref().take(self.fetch_size.get()).collect();
        SourceStats::bump(&self.stats.fetches);
        self.page = page.into_iter();
    }
}

impl ResultHandle for MemoryResults<'_> {
    fn columns(&self) -> &Columns {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>, SourceError> {
        if self.closed {
            return Err(SourceError::UseAfterClose {
                query: self.query.clone(),
            });
        }

        if self.page.as_slice().is_empty() {
            if self.pending.as_slice().is_empty() {
                return Ok(None);
            }
            self.fetch_page();
        }

        let row = self.page.next();
        if row.is_some() {
            SourceStats::bump(&self.stats.rows_delivered);
        }

        Ok(row)
    }
}

impl Drop for MemoryResults<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
