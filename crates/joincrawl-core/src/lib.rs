//! Core runtime for joincrawl: query trees, the query-source boundary, the
//! tree executor, and the probe diagnostic built on top of it.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod crawl;
pub mod error;
pub mod model;
pub mod row;
pub mod source;
pub mod value;

///
/// Prelude
///
/// Vocabulary needed to describe a tree and run it.
///

pub mod prelude {
    pub use crate::{
        crawl::{CrawlOptions, CrawlStats, Crawler, RowControl, crawl, probe},
        error::{CrawlError, ErrorClass},
        model::QueryNode,
        row::{ColumnDef, Columns, Row},
        source::{ConnectionConfig, Credentials, QuerySource},
        value::Value,
    };
}
