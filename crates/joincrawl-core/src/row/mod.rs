
use crate::value::Value;
use derive_more::Deref;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

///
/// ColumnDef
///
/// One column of result metadata as reported by the source.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

///
/// Columns
///
/// Ordered result metadata for one query execution.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, PartialEq, Serialize)]
pub struct Columns(Vec<ColumnDef>);

impl Columns {
    #[must_use]
    pub const fn new(columns: Vec<ColumnDef>) -> Self {
        Self(columns)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.name.as_str()).collect()
    }
}

impl FromIterator<ColumnDef> for Columns {
    fn from_iter<I: IntoIterator<Item = ColumnDef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///
/// Row
///
/// Ordered column-name to value mapping produced by a result stream.
/// Lookups are by name; the executor only reads the join columns.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    #[must_use]
    pub const fn new(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    /// Build a row by zipping column metadata with positional values.
    /// Extra values beyond the column list are dropped; missing ones read as absent.
    #[must_use]
    pub fn from_columns(columns: &Columns, values: impl IntoIterator<Item = Value>) -> Self {
        columns
            .iter()
            .zip(values)
            .map(|(col, value)| (col.name.clone(), value))
            .collect()
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
