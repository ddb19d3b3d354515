use crate::crawl::{ColumnsObserver, RowHandler};
use std::num::NonZeroUsize;

///
/// CONSTANTS
///

/// Rows requested per page when the caller does not choose.
pub const DEFAULT_FETCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

///
/// CrawlOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CrawlOptions {
    /// Page size requested from the source for every query execution.
    /// Advisory to the source only; it never changes which rows are seen.
    pub fetch_size: NonZeroUsize,

    /// Deepest tree level allowed to execute (root is 0). `None` is unbounded.
    pub max_depth: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            fetch_size: DEFAULT_FETCH_SIZE,
            max_depth: None,
        }
    }
}

impl CrawlOptions {
    #[must_use]
    pub const fn new(fetch_size: NonZeroUsize) -> Self {
        Self {
            fetch_size,
            max_depth: None,
        }
    }

    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

///
/// ExecutionContext
///
/// Per-invocation callbacks and options, shared read-only by every
/// recursive execution of one crawl.
///

pub struct ExecutionContext<'a> {
    pub(crate) options: CrawlOptions,
    pub(crate) handler: &'a mut dyn RowHandler,
    pub(crate) observer: Option<&'a mut dyn ColumnsObserver>,
}

impl<'a> ExecutionContext<'a> {
    #[must_use]
    pub fn new(options: CrawlOptions, handler: &'a mut dyn RowHandler) -> Self {
        Self {
            options,
            handler,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'a mut dyn ColumnsObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub const fn options(&self) -> CrawlOptions {
        self.options
    }
}

///
/// CrawlStats
///
/// Counters for a completed crawl. Failed crawls report only the error.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CrawlStats {
    /// Query executions issued, including ones that produced no result.
    pub queries: u64,
    /// Rows handed to the row handler across the whole tree.
    pub rows: u64,
    /// Executions whose handler asked to stop before the stream ended.
    pub early_stops: u64,
    /// Deepest level that executed a query (root is 0).
    pub deepest: usize,
}
