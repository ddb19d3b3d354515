//! Module: crawl
//! Responsibility: execute a query tree against a source and drive per-row fan-out.
//! Does not own: query text semantics, parameter binding, or row typing (the source does).
//! Boundary: one crawl = one session; every execution owns one result handle.

mod context;
mod control;
mod executor;
mod probe;
pub mod trace;


pub use context::{CrawlOptions, CrawlStats, DEFAULT_FETCH_SIZE, ExecutionContext};
pub use control::{ColumnsObserver, RowControl, RowHandler};
pub use executor::TreeExecutor;
pub use probe::probe;
pub use trace::{CrawlTraceEvent, CrawlTraceSink};

use crate::{
    error::CrawlError,
    model::QueryNode,
    source::{ConnectionConfig, QuerySource},
};
use tracing::info;

///
/// Crawler
///
/// Crawl entry point bound to a source and connection, with optional
/// policy (options, trace sink).
///

pub struct Crawler<'a, Q: QuerySource> {
    source: &'a Q,
    connection: &'a ConnectionConfig,
    options: CrawlOptions,
    trace: Option<&'a dyn CrawlTraceSink>,
}

impl<'a, Q: QuerySource> Crawler<'a, Q> {
    #[must_use]
    pub fn new(source: &'a Q, connection: &'a ConnectionConfig) -> Self {
        Self {
            source,
            connection,
            options: CrawlOptions::default(),
            trace: None,
        }
    }

    #[must_use]
    pub const fn options(mut self, options: CrawlOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn trace_sink(mut self, sink: &'a dyn CrawlTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Open a session, walk `root`, and release the session.
    pub fn run(
        &self,
        root: &QueryNode,
        handler: &mut dyn RowHandler,
        observer: Option<&mut dyn ColumnsObserver>,
    ) -> Result<CrawlStats, CrawlError> {
        let session = self.source.open(self.connection)?;

        let mut ctx = ExecutionContext::new(self.options, handler);
        if let Some(observer) = observer {
            ctx = ctx.with_observer(observer);
        }

        let mut executor = TreeExecutor::new(&session, ctx);
        if let Some(sink) = self.trace {
            executor = executor.trace_sink(sink);
        }

        let stats = executor.run(root)?;
        info!(
            endpoint = %self.connection.endpoint,
            queries = stats.queries,
            rows = stats.rows,
            early_stops = stats.early_stops,
            "crawl complete"
        );

        Ok(stats)
    }
}

/// Crawl `root` with default policy; see [`Crawler`].
pub fn crawl<Q: QuerySource>(
    source: &Q,
    connection: &ConnectionConfig,
    root: &QueryNode,
    options: CrawlOptions,
    handler: &mut dyn RowHandler,
    observer: Option<&mut dyn ColumnsObserver>,
) -> Result<CrawlStats, CrawlError> {
    Crawler::new(source, connection)
        .options(options)
        .run(root, handler, observer)
}
