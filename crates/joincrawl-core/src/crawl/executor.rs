use crate::{
    crawl::{
        CrawlStats, ExecutionContext, RowControl,
        trace::{CrawlTraceSink, TraceScope},
    },
    error::{CrawlError, ErrorClass, QueryLocation},
    model::{NodePath, QueryNode},
    source::{ResultHandle, Session},
    value::Value,
};
use tracing::{debug, trace};

///
/// TreeExecutor
///
/// Depth-first, left-to-right walk of a query tree over one session.
///
/// For each row of a query execution the handler runs first, then every
/// joined child runs to completion (bound to the row's join value), and only
/// then is the handler's verdict applied. A `Stop` therefore still fans out
/// the row that asked to stop.
///

pub struct TreeExecutor<'a, S: Session> {
    session: &'a S,
    ctx: ExecutionContext<'a>,
    trace: Option<&'a dyn CrawlTraceSink>,
    stats: CrawlStats,
}

impl<'a, S: Session> TreeExecutor<'a, S> {
    #[must_use]
    pub const fn new(session: &'a S, ctx: ExecutionContext<'a>) -> Self {
        Self {
            session,
            ctx,
            trace: None,
            stats: CrawlStats {
                queries: 0,
                rows: 0,
                early_stops: 0,
                deepest: 0,
            },
        }
    }

    #[must_use]
    pub const fn trace_sink(mut self, sink: &'a dyn CrawlTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Execute `root` unbound and return the counters for the whole walk.
    pub fn run(mut self, root: &QueryNode) -> Result<CrawlStats, CrawlError> {
        self.execute(root, None)?;

        Ok(self.stats)
    }

    /// Execute `node`, optionally bound to a parent row's join value, and
    /// recurse into its joined children.
    pub fn execute(&mut self, node: &QueryNode, bound: Option<&Value>) -> Result<(), CrawlError> {
        self.execute_at(node, bound, &NodePath::root())
    }

    #[must_use]
    pub const fn stats(&self) -> CrawlStats {
        self.stats
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    fn execute_at(
        &mut self,
        node: &QueryNode,
        bound: Option<&Value>,
        path: &NodePath,
    ) -> Result<(), CrawlError> {
        let depth = path.depth();
        let location = || QueryLocation {
            path: path.clone(),
            depth,
            bound: bound.cloned(),
        };

        if let Some(max) = self.ctx.options.max_depth
            && depth > max
        {
            return Err(CrawlError::new(
                ErrorClass::DepthExceeded,
                format!("query tree deeper than the configured limit of {max}"),
            )
            .with_location(location()));
        }

        let Some(query) = node.query() else {
            debug!(path = %path, "node has no query; skipping");
            return Ok(());
        };

        // Blank join values run the child unparameterized.
        let param = bound.filter(|v| !v.is_blank());
        let scope = TraceScope::new(self.trace, path, depth, param.is_some());

        self.stats.queries += 1;
        self.stats.deepest = self.stats.deepest.max(depth);

        match self.stream(node, query, param, path, &scope) {
            Ok(Some(outcome)) => {
                trace!(
                    path = %path,
                    rows = outcome.rows,
                    stopped_early = outcome.stopped_early,
                    "query finished"
                );
                scope.finish(outcome.rows, outcome.stopped_early);
                Ok(())
            }
            Ok(None) => {
                debug!(path = %path, "query produced no result");
                scope.no_result();
                Ok(())
            }
            Err(err) => {
                let err = if err.location.is_none() {
                    err.with_location(location())
                } else {
                    err
                };
                scope.error(&err);
                Err(err)
            }
        }
    }

    // Run one query and fan out per row. The result handle is dropped, and
    // so released, on every return path before control goes back up.
    fn stream(
        &mut self,
        node: &QueryNode,
        query: &str,
        param: Option<&Value>,
        path: &NodePath,
        scope: &TraceScope<'_>,
    ) -> Result<Option<StreamOutcome>, CrawlError> {
        let session = self.session;
        debug!(path = %path, query, bound = param.is_some(), "executing query");

        let Some(mut results) = session
            .execute(query, self.ctx.options.fetch_size, param)
            .map_err(|err| CrawlError::from_source(err, None))?
        else {
            return Ok(None);
        };

        if let Some(observer) = self.ctx.observer.as_deref_mut() {
            observer.on_columns(results.columns());
        }
        scope.columns(results.columns().len());

        let mut outcome = StreamOutcome::default();
        while let Some(row) = results
            .next_row()
            .map_err(|err| CrawlError::from_source(err, None))?
        {
            outcome.rows += 1;
            self.stats.rows += 1;

            let control = self.ctx.handler.on_row(&row);

            for (column, children) in node.join() {
                let value = row.get(column);
                for (index, child) in children.iter().enumerate() {
                    self.execute_at(child, value, &path.child(column, index))?;
                }
            }

            if control == RowControl::Stop {
                outcome.stopped_early = true;
                self.stats.early_stops += 1;
                break;
            }
        }

        Ok(Some(outcome))
    }
}

///
/// StreamOutcome
///

#[derive(Clone, Copy, Debug, Default)]
struct StreamOutcome {
    rows: u64,
    stopped_early: bool,
}

impl<S: Session> std::fmt::Debug for TreeExecutor<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeExecutor")
            .field("options", &self.ctx.options)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
