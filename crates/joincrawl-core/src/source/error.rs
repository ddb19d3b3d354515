use thiserror::Error as ThisError;

///
/// SourceError
///
/// Failures reported by a query source implementation.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SourceError {
    #[error("cannot connect to '{endpoint}': {message}")]
    Connection { endpoint: String, message: String },

    #[error("query rejected ({query}): {message}")]
    Query { query: String, message: String },

    #[error("result stream used after close ({query})")]
    UseAfterClose { query: String },
}

impl SourceError {
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            message: message.into(),
        }
    }
}
