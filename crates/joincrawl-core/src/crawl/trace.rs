//! Crawl tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect execution semantics.

use crate::{
    error::{CrawlError, ErrorClass},
    model::NodePath,
};

///
/// CrawlTraceSink
///

pub trait CrawlTraceSink: Send + Sync {
    fn on_event(&self, event: CrawlTraceEvent);
}

///
/// CrawlTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CrawlTraceEvent {
    Start {
        path: NodePath,
        depth: usize,
        bound: bool,
    },
    Columns {
        path: NodePath,
        count: usize,
    },
    NoResult {
        path: NodePath,
        depth: usize,
    },
    Finish {
        path: NodePath,
        depth: usize,
        rows: u64,
        stopped_early: bool,
    },
    Error {
        path: NodePath,
        depth: usize,
        class: ErrorClass,
    },
}

///
/// TraceScope
///
/// Brackets one query execution. Emits `Start` on creation; the terminal
/// event (`Finish`, `NoResult`, or `Error`) is emitted by the consuming
/// method that ends the scope, so each scope emits at most one. Dropping a
/// scope without consuming it emits nothing.
///

#[must_use = "end the scope with finish, no_result, or error"]
pub(crate) struct TraceScope<'a> {
    sink: Option<&'a dyn CrawlTraceSink>,
    path: NodePath,
    depth: usize,
}

impl<'a> TraceScope<'a> {
    pub(crate) fn new(
        sink: Option<&'a dyn CrawlTraceSink>,
        path: &NodePath,
        depth: usize,
        bound: bool,
    ) -> Self {
        if let Some(sink) = sink {
            sink.on_event(CrawlTraceEvent::Start {
                path: path.clone(),
                depth,
                bound,
            });
        }

        Self {
            sink,
            path: path.clone(),
            depth,
        }
    }

    pub(crate) fn columns(&self, count: usize) {
        if let Some(sink) = self.sink {
            sink.on_event(CrawlTraceEvent::Columns {
                path: self.path.clone(),
                count,
            });
        }
    }

    pub(crate) fn no_result(self) {
        if let Some(sink) = self.sink {
            sink.on_event(CrawlTraceEvent::NoResult {
                path: self.path,
                depth: self.depth,
            });
        }
    }

    pub(crate) fn finish(self, rows: u64, stopped_early: bool) {
        if let Some(sink) = self.sink {
            sink.on_event(CrawlTraceEvent::Finish {
                path: self.path,
                depth: self.depth,
                rows,
                stopped_early,
            });
        }
    }

    pub(crate) fn error(self, err: &CrawlError) {
        if let Some(sink) = self.sink {
            sink.on_event(CrawlTraceEvent::Error {
                path: self.path,
                depth: self.depth,
                class: err.class,
            });
        }
    }
}
