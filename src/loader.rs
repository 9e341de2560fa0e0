//! Reading design tables from CSV files and spreadsheet workbooks.
//!
//! The first row is the header. A column is numeric when every non-empty
//! cell in it is a number; any other column is kept as text so analyses can
//! skip or reject it explicitly.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Reader};
use ce_fit_core::{Column, ColumnData, Table};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::config::LoadOptions;
use crate::error::LoadError;

type Result<T> = core::result::Result<T, LoadError>;

/// Extensions read through the workbook reader.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

static EMPTY_CELL: RawCell = RawCell::Empty;

/// One cell before column typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Classify a text field: a float literal is a number, anything else is text.
    ///
    /// Blank fields and literals that are not finite (`NaN`, `inf`, or an
    /// overflowing `1e400`) are empty.
    pub fn parse(field: &str) -> Self {
        let field = field.trim();
        if field.is_empty() {
            return RawCell::Empty;
        }
        match field.parse::<f64>() {
            Ok(v) => RawCell::number(v),
            Err(_) => RawCell::Text(field.to_string()),
        }
    }

    fn number(value: f64) -> Self {
        if value.is_finite() {
            RawCell::Number(value)
        } else {
            RawCell::Empty
        }
    }

    fn from_workbook(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::number(*f),
            Data::String(s) => RawCell::parse(s),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            other => other
                .as_f64()
                .map(RawCell::number)
                .unwrap_or_else(|| RawCell::Text(other.to_string())),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

/// Header names plus data rows, as read from a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

/// Loads a file into a [`Table`] according to [`LoadOptions`].
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    options: LoadOptions,
}

impl TableLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load and trim a table.
    ///
    /// # Errors
    /// * [`LoadError::UnsupportedFormat`] for an unknown extension
    /// * [`LoadError::Empty`] when no header, no data row or no column after trimming remains
    /// * read and decode failures of the underlying file
    pub fn load(&self, path: &Path) -> Result<Table> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let sheet = if extension == "csv" {
            read_csv(path)?
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            read_workbook(path, self.options.sheet.as_deref())?
        } else {
            return Err(LoadError::UnsupportedFormat(extension));
        };

        let table = build_table(sheet, path)?;
        let table = self.trim(table, path)?;
        info!(
            path = %path.display(),
            rows = table.nrows(),
            columns = table.ncols(),
            "loaded table"
        );
        Ok(table)
    }

    fn trim(&self, table: Table, path: &Path) -> Result<Table> {
        let mut table = table;
        if self.options.drop_first_column {
            let (rest, first) = table.split_first_column();
            table = rest;
            if let Some(ids) = first {
                debug!(column = ids.name(), "using first column as row labels");
                let labels = (0..table.nrows())
                    .map(|i| ids.cell_label(i).unwrap_or_else(|| i.to_string()))
                    .collect();
                table = table.with_row_labels(labels)?;
            }
        }
        if self.options.drop_last_column {
            let (rest, last) = table.split_last_column();
            if let Some(c) = last {
                debug!(column = c.name(), "dropping last column");
            }
            table = rest;
        }
        if table.ncols() == 0 {
            return Err(LoadError::Empty(path.to_path_buf()));
        }
        Ok(table)
    }
}

fn read_csv(path: &Path) -> Result<RawSheet> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let header = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(RawCell::parse).collect());
    }
    Ok(RawSheet { header, rows })
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawSheet> {
    let workbook_err = |message: String| LoadError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;

    let names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) if names.iter().any(|n| n == wanted) => wanted.to_string(),
        Some(wanted) => {
            return Err(LoadError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
            })
        }
        None => names
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Empty(path.to_path_buf()))?,
    };
    debug!(sheet = %name, "reading worksheet");

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_err(e.to_string()))?;
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string()).collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|cells| cells.iter().map(RawCell::from_workbook).collect())
        .collect();
    Ok(RawSheet { header, rows })
}

/// Blank names become `Unnamed: <i>`; repeats get `.1`, `.2`, ... suffixes.
fn normalise_header(raw: &[String], width: usize) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(width);
    let mut names = Vec::with_capacity(width);
    for i in 0..width {
        let base = match raw.get(i).map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("Unnamed: {i}"),
        };
        let mut name = base.clone();
        let mut k = 1;
        while used.contains(&name) {
            name = format!("{base}.{k}");
            k += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

/// Type each column of `sheet` and assemble a [`Table`].
pub fn build_table(sheet: RawSheet, path: &Path) -> Result<Table> {
    let rows: Vec<Vec<RawCell>> = sheet
        .rows
        .into_iter()
        .filter(|row| !row.iter().all(RawCell::is_empty))
        .collect();
    let width = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(sheet.header.len()))
        .max()
        .unwrap_or(0);
    if width == 0 || rows.is_empty() {
        return Err(LoadError::Empty(PathBuf::from(path)));
    }

    let names = normalise_header(&sheet.header, width);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            let cells: Vec<&RawCell> = rows
                .iter()
                .map(|row| row.get(j).unwrap_or(&EMPTY_CELL))
                .collect();
            Column::new(name, type_column(&cells))
        })
        .collect();
    Ok(Table::new(columns)?)
}

fn type_column(cells: &[&RawCell]) -> ColumnData {
    let numeric = cells.iter().all(|c| !matches!(c, RawCell::Text(_)));
    if numeric {
        ColumnData::Numeric(
            cells
                .iter()
                .map(|c| match c {
                    RawCell::Number(v) => Some(*v),
                    _ => None,
                })
                .collect(),
        )
    } else {
        ColumnData::Text(
            cells
                .iter()
                .map(|c| match c {
                    RawCell::Empty => None,
                    RawCell::Number(v) => Some(v.to_string()),
                    RawCell::Text(s) => Some(s.clone()),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_raw_cell_parse() {
        assert_eq!(RawCell::parse(" 1.5 "), RawCell::Number(1.5));
        assert_eq!(RawCell::parse("-2e-3"), RawCell::Number(-0.002));
        assert_eq!(RawCell::parse(""), RawCell::Empty);
        assert_eq!(RawCell::parse("NaN"), RawCell::Empty);
        assert_eq!(RawCell::parse("inf"), RawCell::Empty);
        assert_eq!(RawCell::parse("-Infinity"), RawCell::Empty);
        assert_eq!(RawCell::parse("1e400"), RawCell::Empty);
        assert_eq!(RawCell::parse("1e308"), RawCell::Number(1e308));
        assert_eq!(RawCell::parse("conf_1"), RawCell::Text("conf_1".into()));
    }

    #[test]
    fn test_load_csv_drops_first_column_into_labels() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "ce.csv",
            "config,pair_1,pair_2,E\nA,0.1,0.2,-1.0\nB,0.3,,-1.2\nC,0.5,0.6,-1.4\n",
        );
        let table = TableLoader::default().load(&path).unwrap();
        assert_eq!(table.column_names(), vec!["pair_1", "pair_2", "E"]);
        assert_eq!(table.nrows(), 3);
        assert_eq!(
            table.row_labels().unwrap(),
            &["A".to_string(), "B".to_string(), "C".to_string()]
        );
        assert_eq!(
            table.column(1).unwrap().numeric_values().unwrap(),
            &[Some(0.2), None, Some(0.6)]
        );
    }

    #[test]
    fn test_keep_and_drop_last() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", "a,b,c\n1,2,3\n4,5,6\n");
        let loader = TableLoader::new(LoadOptions {
            drop_first_column: false,
            drop_last_column: true,
            sheet: None,
        });
        let table = loader.load(&path).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert!(table.row_labels().is_none());
    }

    #[test]
    fn test_text_column_detection() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", "id,x,tag\n1,1.0,low\n2,2.0,3\n3,,high\n");
        let table = TableLoader::new(LoadOptions {
            drop_first_column: false,
            ..Default::default()
        })
        .load(&path)
        .unwrap();
        assert!(table.column(0).unwrap().is_numeric());
        assert!(table.column(1).unwrap().is_numeric());
        let tag = table.column(2).unwrap();
        assert!(!tag.is_numeric());
        assert_eq!(tag.cell_label(1).as_deref(), Some("3"));
    }

    #[test]
    fn test_non_finite_cells_load_as_null() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "overflow.csv", "id,x1,E
a,1e400,2
b,0.5,inf
c,0.7,3
");
        let table = TableLoader::default().load(&path).unwrap();
        assert_eq!(
            table.column(0).unwrap().numeric_values().unwrap(),
            &[None, Some(0.5), Some(0.7)]
        );
        assert_eq!(
            table.column(1).unwrap().numeric_values().unwrap(),
            &[Some(2.0), None, Some(3.0)]
        );
    }

    #[test]
    fn test_header_normalisation() {
        let names = normalise_header(&["x".into(), "".into(), "x".into(), "x".into()], 5);
        assert_eq!(names, vec!["x", "Unnamed: 1", "x.1", "x.2", "Unnamed: 4"]);
    }

    #[test]
    fn test_blank_rows_skipped_and_short_rows_padded() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", "id,a,b\n1,1,2\n,,\n2,3\n");
        let table = TableLoader::default().load(&path).unwrap();
        assert_eq!(table.nrows(), 2);
        assert_eq!(
            table.column(1).unwrap().numeric_values().unwrap(),
            &[Some(2.0), None]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let dir = TempDir::new().unwrap();
        let header_only = write_csv(&dir, "h.csv", "id,a,b\n");
        assert!(matches!(
            TableLoader::default().load(&header_only),
            Err(LoadError::Empty(_))
        ));

        let single = write_csv(&dir, "s.csv", "id\n1\n2\n");
        assert!(matches!(
            TableLoader::default().load(&single),
            Err(LoadError::Empty(_))
        ));
    }

    #[test]
    fn test_unsupported_and_missing() {
        let txt = Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            TableLoader::default().load(txt.path()),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"
        ));

        let missing = Path::new("/definitely/not/here.csv");
        assert!(matches!(
            TableLoader::default().load(missing),
            Err(LoadError::Csv { .. })
        ));
    }

    #[test]
    fn test_workbook_cells() {
        assert_eq!(RawCell::from_workbook(&Data::Int(3)), RawCell::Number(3.0));
        assert_eq!(RawCell::from_workbook(&Data::Float(0.25)), RawCell::Number(0.25));
        assert_eq!(
            RawCell::from_workbook(&Data::String("4.5".into())),
            RawCell::Number(4.5)
        );
        assert_eq!(RawCell::from_workbook(&Data::Empty), RawCell::Empty);
        assert_eq!(
            RawCell::from_workbook(&Data::Float(f64::INFINITY)),
            RawCell::Empty
        );
        assert_eq!(
            RawCell::from_workbook(&Data::Bool(true)),
            RawCell::Text("true".into())
        );
    }
}
