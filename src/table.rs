//! In-memory tabular data.
//!
//! A [`Table`] is what the loaders produce and what the normalizer and the raw
//! snapshot writer operate on: named columns and rows of optional string cells.
//! Typed records are extracted from it through a [`FieldMap`](crate::schema::FieldMap).

use itertools::Itertools;

/// One row of a table. `None` marks a missing value.
pub type Row = Vec<Option<String>>;

/// Column-named rows of optional string cells.
///
/// Row positions form the index of the table; it is always dense and 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding missing trailing cells with `None`.
    ///
    /// Cells beyond the column count are dropped.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in index order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, ignoring ASCII case.
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value of the cell at `row` in column `column`, if both exist and the cell is present.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Iterates over `(index, row)` pairs.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate()
    }

    /// Rewrites every present cell of `column` with `f`.
    ///
    /// Returns `Ok(false)` without touching the table if the column does not exist.
    /// Missing cells are passed to `f` as `None` so it can decide whether that is an error.
    pub fn try_map_column<E>(
        &mut self,
        column: &str,
        mut f: impl FnMut(usize, Option<&str>) -> Result<Option<String>, E>,
    ) -> Result<bool, E> {
        let Some(col) = self.column_index(column) else {
            return Ok(false);
        };
        for (index, row) in self.rows.iter_mut().enumerate() {
            let updated = f(index, row[col].as_deref())?;
            row[col] = updated;
        }
        Ok(true)
    }

    /// Concatenates tables top to bottom.
    ///
    /// The result has the union of all columns in first-appearance order; cells
    /// for columns a source table lacks are `None`.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let tables: Vec<Table> = tables.into_iter().collect();
        let columns: Vec<String> = tables
            .iter()
            .flat_map(|t| t.columns.iter().cloned())
            .unique()
            .collect();

        let mut merged = Table {
            columns,
            rows: Vec::with_capacity(tables.iter().map(Table::len).sum()),
        };

        for table in tables {
            let positions: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|c| merged.column_index(c))
                .collect();
            for row in table.rows {
                let mut out = vec![None; merged.columns.len()];
                for (value, &pos) in row.into_iter().zip(&positions) {
                    out[pos] = value;
                }
                merged.rows.push(out);
            }
        }

        merged
    }

    /// Removes rows that are exact duplicates of an earlier row.
    ///
    /// The first occurrence is kept and the index stays dense.
    /// Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        self.rows = std::mem::take(&mut self.rows).into_iter().unique().collect();
        before - self.rows.len()
    }
}
