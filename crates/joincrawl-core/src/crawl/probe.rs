use crate::{
    crawl::{CrawlOptions, ExecutionContext, TreeExecutor},
    error::CrawlError,
    model::QueryNode,
    row::{Columns, Row},
    source::{ConnectionConfig, QuerySource},
};
use std::{fmt::Write as _, num::NonZeroUsize};

/// Connectivity and column-discovery check for a crawl setup.
///
/// Opens a session and, when `root` carries a query, executes it with a
/// handler that stops after the first row. Every executed query's columns are
/// listed as `name -> type`, one per line. Joined children of that first row
/// still run, so their columns are listed too.
pub fn probe<Q: QuerySource>(
    source: &Q,
    connection: &ConnectionConfig,
    root: Option<&QueryNode>,
    fetch_size: NonZeroUsize,
) -> Result<String, CrawlError> {
    let session = source.open(connection)?;

    let mut summary = String::from("Connection established.");

    let Some(root) = root.filter(|node| node.query().is_some_and(|q| !q.trim().is_empty())) else {
        return Ok(summary);
    };
    summary.push('\n');

    let mut handler = |_: &Row| false;
    let mut observer = |columns: &Columns| {
        for col in columns.iter() {
            let _ = writeln!(summary, "{} -> {}", col.name, col.type_name);
        }
    };

    let ctx = ExecutionContext::new(CrawlOptions::new(fetch_size), &mut handler)
        .with_observer(&mut observer);
    TreeExecutor::new(&session, ctx).run(root)?;

    Ok(summary)
}
