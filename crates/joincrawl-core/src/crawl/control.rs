use crate::row::{Columns, Row};

///
/// RowControl
///
/// Per-row verdict from a row handler. `Stop` ends delivery for the query
/// execution that produced the row only; sibling and ancestor executions
/// keep going.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowControl {
    Continue,
    Stop,
}

impl RowControl {
    #[must_use]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl From<bool> for RowControl {
    fn from(keep_going: bool) -> Self {
        if keep_going { Self::Continue } else { Self::Stop }
    }
}

///
/// RowHandler
///
/// Receives every row of every query execution in the tree.
/// Any `FnMut(&Row) -> bool` (or `-> RowControl`) is a handler.
///

pub trait RowHandler {
    fn on_row(&mut self, row: &Row) -> RowControl;
}

impl<F, R> RowHandler for F
where
    F: FnMut(&Row) -> R,
    R: Into<RowControl>,
{
    fn on_row(&mut self, row: &Row) -> RowControl {
        self(row).into()
    }
}

///
/// ColumnsObserver
///
/// Called once per query execution with its column metadata, before the
/// first row is read.
///

pub trait ColumnsObserver {
    fn on_columns(&mut self, columns: &Columns);
}

impl<F> ColumnsObserver for F
where
    F: FnMut(&Columns),
{
    fn on_columns(&mut self, columns: &Columns) {
        self(columns);
    }
}
