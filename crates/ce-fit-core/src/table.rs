//! Labelled in-memory table of numeric and text columns.
//!
//! A [`Table`] is built once (usually by a file loader) and then read by
//! every analysis. Numeric cells are `Option<f64>` so missing spreadsheet
//! cells survive until an analysis decides how to drop them.

use crate::error::{AnalysisError, Result};
use crate::helpers::non_null;

/// Cell storage of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Fully populated numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into_iter().map(Some).collect()))
    }

    /// Numeric column with missing cells.
    pub fn nullable(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Numeric cells, or `None` for a text column.
    pub fn numeric_values(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Numeric cells, failing with [`AnalysisError::NonNumericColumn`] for text.
    pub fn require_numeric(&self) -> Result<&[Option<f64>]> {
        self.numeric_values()
            .ok_or_else(|| AnalysisError::NonNumericColumn(self.name.clone()))
    }

    /// Non-null numeric values, empty for a text column.
    pub fn values(&self) -> Vec<f64> {
        self.numeric_values().map(non_null).unwrap_or_default()
    }

    /// Render the cell in row `row` as a label.
    pub fn cell_label(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
        }
    }
}

/// Ordered set of equally long columns with optional row labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_labels: Option<Vec<String>>,
    nrows: usize,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let nrows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != nrows) {
            return Err(AnalysisError::RaggedTable {
                column: bad.name().to_string(),
                expected: nrows,
                found: bad.len(),
            });
        }
        Ok(Self {
            columns,
            row_labels: None,
            nrows,
        })
    }

    /// Attach one label per row.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.nrows {
            return Err(AnalysisError::RaggedTable {
                column: "<row labels>".to_string(),
                expected: self.nrows,
                found: labels.len(),
            });
        }
        self.row_labels = Some(labels);
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.nrows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_labels(&self) -> Option<&[String]> {
        self.row_labels.as_deref()
    }

    /// Numeric columns only, in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Remove and return the first column.
    pub fn split_first_column(mut self) -> (Self, Option<Column>) {
        if self.columns.is_empty() {
            return (self, None);
        }
        let first = self.columns.remove(0);
        (self, Some(first))
    }

    /// Remove and return the last column.
    pub fn split_last_column(mut self) -> (Self, Option<Column>) {
        let last = self.columns.pop();
        (self, last)
    }
}
