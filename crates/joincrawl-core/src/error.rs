use crate::{model::NodePath, source::SourceError, value::Value};
use std::fmt;
use thiserror::Error as ThisError;

///
/// CrawlError
///
/// Terminal failure of a crawl invocation.
/// Carries the class, the query location that failed (when one was executing),
/// and the source-level cause if the source reported it.
///

#[derive(Debug, ThisError)]
#[error("{class}{}: {message}", location_suffix(.location.as_ref()))]
pub struct CrawlError {
    pub class: ErrorClass,
    pub location: Option<QueryLocation>,
    pub message: String,
    pub source: Option<SourceError>,
}

impl CrawlError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            location: None,
            message: message.into(),
            source: None,
        }
    }

    /// Classify a source failure and attach where it happened.
    pub fn from_source(err: SourceError, location: Option<QueryLocation>) -> Self {
        let class = match err {
            SourceError::Connection { .. } => ErrorClass::Connection,
            SourceError::Query { .. } => ErrorClass::Query,
            SourceError::UseAfterClose { .. } => ErrorClass::InvariantViolation,
        };

        Self {
            class,
            location,
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Config, message)
    }

    #[must_use]
    pub fn with_location(mut self, location: QueryLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self.class, ErrorClass::Connection)
    }

    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self.class, ErrorClass::Query)
    }
}

impl From<SourceError> for CrawlError {
    fn from(err: SourceError) -> Self {
        Self::from_source(err, None)
    }
}

fn location_suffix(location: Option<&QueryLocation>) -> String {
    location.map_or_else(String::new, |loc| format!(" at {loc}"))
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Connection,
    Query,
    InvariantViolation,
    DepthExceeded,
    Config,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connection => "connection",
            Self::Query => "query",
            Self::InvariantViolation => "invariant_violation",
            Self::DepthExceeded => "depth_exceeded",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// QueryLocation
///
/// Which query execution in the tree an error came from.
///

#[derive(Clone, Debug, PartialEq)]
pub struct QueryLocation {
    pub path: NodePath,
    pub depth: usize,
    pub bound: Option<Value>,
}

impl fmt::Display for QueryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {}", self.path, self.depth)?;
        if let Some(bound) = &self.bound {
            write!(f, ", bound {bound}")?;
        }
        f.write_str(")")
    }
}
