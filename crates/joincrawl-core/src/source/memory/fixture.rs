use crate::{
    error::CrawlError,
    row::ColumnDef,
    source::{
        Credentials,
        memory::{MemorySource, MemoryStatement, MemoryTable},
    },
    value::Value,
};
use indexmap::IndexMap;
use serde::Deserialize;

///
/// MemoryFixture
///
/// JSON description of a [`MemorySource`]:
///
/// ```text
/// {
///   "endpoints": ["localhost:9042"],
///   "credentials": { "user": "crawler", "password": "secret" },
///   "keyspaces": ["shop"],
///   "statements": {
///     "SELECT id FROM customers": { "columns": [{"name": "id", "type": "int"}], "rows": [[1]] },
///     "SELECT * FROM orders WHERE customer_id = ?": { "columns": [...], "rows": [...], "bind": "customer_id" },
///     "INSERT INTO audit ...": { "no_result": true },
///     "SELECT broken": { "fail": "syntax error" }
///   }
/// }
/// ```
///
/// An empty `endpoints` list accepts any endpoint, an empty `keyspaces`
/// list any keyspace; without `credentials` any login is accepted.
///

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MemoryFixture {
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub keyspaces: Vec<String>,
    #[serde(default)]
    pub statements: IndexMap<String, FixtureStatement>,
}

///
/// FixtureStatement
///

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FixtureStatement {
    Rows {
        columns: Vec<ColumnDef>,
        #[serde(default)]
        rows: Vec<Vec<Value>>,
        #[serde(default)]
        bind: Option<String>,
    },
    NoResult {
        no_result: bool,
    },
    Fail {
        fail: String,
    },
}

impl MemoryFixture {
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        serde_json::from_str(json)
            .map_err(|err| CrawlError::config(format!("invalid fixture: {err}")))
    }

    pub fn into_source(self) -> Result<MemorySource, CrawlError> {
        let mut source = self
            .endpoints
            .into_iter()
            .fold(MemorySource::new(), MemorySource::with_endpoint);
        source = self
            .keyspaces
            .into_iter()
            .fold(source, MemorySource::with_keyspace);
        if let Some(login) = self.credentials {
            source = source.with_credentials(login.user, login.password);
        }

        for (query, statement) in self.statements {
            let statement = match statement {
                FixtureStatement::Rows {
                    columns,
                    rows,
                    bind,
                } => {
                    if let Some(row) = rows.iter().find(|r| r.len() > columns.len()) {
                        return Err(CrawlError::config(format!(
                            "fixture row has {} values but '{query}' declares {} columns",
                            row.len(),
                            columns.len()
                        )));
                    }
                    let mut table = rows
                        .into_iter()
                        .fold(MemoryTable::new(columns), MemoryTable::row);
                    if let Some(column) = bind {
                        table = table.bind_on(column);
                    }
                    MemoryStatement::Rows(table)
                }
                FixtureStatement::NoResult { no_result: true } => MemoryStatement::NoResult,
                FixtureStatement::NoResult { no_result: false } => {
                    return Err(CrawlError::config(format!(
                        "statement '{query}' sets no_result to false without columns"
                    )));
                }
                FixtureStatement::Fail { fail } => MemoryStatement::Fail(fail),
            };
            source = source.statement(query, statement);
        }

        Ok(source)
    }
}
