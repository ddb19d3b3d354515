use derive_more::Deref;
use std::fmt;

///
/// PathSegment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathSegment {
    pub column: String,
    pub index: usize,
}

///
/// NodePath
///
/// Location of a node inside a query tree, rooted at `$`.
/// Rendered as `$.join.<column>[<index>]` per level.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn child(&self, column: &str, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment {
            column: column.to_string(),
            index,
        });

        Self(segments)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.0 {
            write!(f, ".join.{}[{}]", seg.column, seg.index)?;
        }

        Ok(())
    }
}
