use crate::error::{CrawlError, ErrorClass};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

///
/// QueryNode
///
/// One query in a crawl tree plus the child queries joined on its columns.
///
/// `join` maps a column name to the ordered list of child queries that
/// execute once per produced row, each bound to that row's value for the
/// column. Column order is authored order.
///
/// Trees are owned, so a node cannot contain itself, but nothing bounds how
/// deep the executor recurses through data-driven joins unless its depth
/// guard is set.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct QueryNode {
    #[serde(
        rename = "cql",
        alias = "query",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    query: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_join",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    join: IndexMap<String, Vec<QueryNode>>,
}

impl QueryNode {
    /// Build a node; absent `join` is treated as no children.
    #[must_use]
    pub fn new(query: Option<String>, join: Option<IndexMap<String, Vec<Self>>>) -> Self {
        Self {
            query,
            join: join.unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn leaf(query: impl Into<String>) -> Self {
        Self::new(Some(query.into()), None)
    }

    /// A node with no query of its own.
    #[must_use]
    pub fn group() -> Self {
        Self::default()
    }

    /// Append `child` to the list joined on `column`.
    #[must_use]
    pub fn with_child(mut self, column: impl Into<String>, child: Self) -> Self {
        self.join.entry(column.into()).or_default().push(child);
        self
    }

    /// Parse the JSON form: `{"cql": "...", "join": {"column": [ ... ]}}`.
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        serde_json::from_str(json).map_err(|err| {
            CrawlError::new(ErrorClass::Config, format!("invalid query tree: {err}"))
        })
    }

    pub fn to_json(&self) -> Result<String, CrawlError> {
        serde_json::to_string(self).map_err(|err| {
            CrawlError::new(ErrorClass::Config, format!("query tree encode failed: {err}"))
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub const fn join(&self) -> &IndexMap<String, Vec<Self>> {
        &self.join
    }

    /// Children joined on `column`, empty when the column is not joined.
    #[must_use]
    pub fn children(&self, column: &str) -> &[Self] {
        self.join.get(column).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.join.values().all(Vec::is_empty)
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .join
            .values()
            .flatten()
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .join
            .values()
            .flatten()
            .map(Self::node_count)
            .sum::<usize>()
    }
}

// `"join": null` and `"col": null` both mean "no children".
fn deserialize_join<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<QueryNode>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<Vec<QueryNode>>>> =
        Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(column, children)| (column, children.unwrap_or_default()))
        .collect())
}
