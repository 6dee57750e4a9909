//! Named column layouts for the positional report tables.
//!
//! The report has no header semantics we can rely on, so every field is
//! addressed by index. Each layout is a list of `(field, index)` pairs that
//! is checked against a row's cell count once, before any field is read.

/// A row did not have the shape its layout requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRow {
    #[error("{layout} row has {found} cells, need at least {needed}")]
    TooFewCells {
        layout: &'static str,
        needed: usize,
        found: usize,
    },
    #[error("{layout} row is missing its {marker} marker")]
    MissingMarker {
        layout: &'static str,
        marker: &'static str,
    },
}

/// Fixed mapping of fields to cell positions.
#[derive(Debug)]
pub struct ColumnSchema<F: 'static> {
    name: &'static str,
    columns: &'static [(F, usize)],
}

impl<F: Copy + PartialEq> ColumnSchema<F> {
    pub const fn new(name: &'static str, columns: &'static [(F, usize)]) -> Self {
        Self { name, columns }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Minimum number of cells a row needs for every field to resolve.
    pub fn width(&self) -> usize {
        self.columns
            .iter()
            .map(|&(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Validate `cells` against the layout.
    pub fn bind<'r, S: AsRef<str>>(&'r self, cells: &'r [S]) -> Result<BoundRow<'r, F, S>, MalformedRow> {
        let needed = self.width();
        if cells.len() < needed {
            return Err(MalformedRow::TooFewCells {
                layout: self.name,
                needed,
                found: cells.len(),
            });
        }
        Ok(BoundRow {
            schema: self,
            cells,
        })
    }
}

/// A row whose cell count has been checked against its layout.
pub struct BoundRow<'r, F: 'static, S> {
    schema: &'r ColumnSchema<F>,
    cells: &'r [S],
}

impl<'r, F: Copy + PartialEq, S: AsRef<str>> BoundRow<'r, F, S> {
    /// Text of `field`. Fields absent from the layout read as empty.
    pub fn get(&self, field: F) -> &'r str {
        self.schema
            .columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|&(_, index)| self.cells.get(index))
            .map_or("", |cell| cell.as_ref())
    }

    pub fn owned(&self, field: F) -> String {
        self.get(field).to_string()
    }
}
