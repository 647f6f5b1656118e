//! In-memory table built from a CSV payload.
//!
//! Parsing is deliberately naive: lines split on newline, cells split on
//! comma, no quoted-field grammar. Rows shorter than the header (the empty
//! trailing line a final newline produces, for instance) come out ragged,
//! with the unsupplied cells marked `Missing`. Cells that parse as numbers
//! are coerced at load time, and each column's type is inferred once, right
//! after parse.

/// One cell of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// The row ended before this column.
    Missing,
}

impl Value {
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Text(raw.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

/// Inferred at load over a column's supplied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
    Mixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub inferred: ColumnType,
}

/// One data row; cells align positionally with the dataset's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Value>,
}

impl Record {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn get(&self, column_index: usize) -> Option<&Value> {
        self.cells.get(column_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    records: Vec<Record>,
}

impl Dataset {
    /// Parse a CSV payload. Line 0 is the header; every following line
    /// becomes a record, ragged or not. Cells beyond the header width are
    /// dropped. Carriage returns are stripped so CRLF payloads behave.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let mut lines = text.split('\n').map(|line| line.trim_end_matches('\r'));

        let header = lines.next().unwrap_or("");
        let mut columns: Vec<Column> = header
            .split(',')
            .map(|name| Column {
                name: name.to_string(),
                inferred: ColumnType::Text,
            })
            .collect();

        let mut records = Vec::new();
        for line in lines {
            let raw_cells: Vec<&str> = line.split(',').collect();
            let cells = (0..columns.len())
                .map(|i| match raw_cells.get(i) {
                    Some(raw) => Value::from_raw(raw),
                    None => Value::Missing,
                })
                .collect();
            records.push(Record { cells });
        }

        for (index, column) in columns.iter_mut().enumerate() {
            column.inferred = infer_column_type(&records, index);
        }

        let dataset = Self {
            name: name.into(),
            columns,
            records,
        };
        tracing::debug!(
            name = %dataset.name,
            columns = dataset.columns.len(),
            rows = dataset.records.len(),
            "parsed dataset"
        );
        dataset
    }

    /// Same name and schema, different rows. Used by the filter engine; the
    /// schema stays as loaded, it is not re-inferred from the subset.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.records.get(row)?.get(index)
    }

    /// First two discovered columns, the default axis selections. None when
    /// fewer than two columns exist (the chart is skipped in that case).
    pub fn default_axes(&self) -> Option<(&str, &str)> {
        match self.columns.as_slice() {
            [x, y, ..] => Some((x.name.as_str(), y.name.as_str())),
            _ => None,
        }
    }
}

fn infer_column_type(records: &[Record], index: usize) -> ColumnType {
    let mut numeric = 0usize;
    let mut text = 0usize;
    for record in records {
        match record.get(index) {
            Some(Value::Number(_)) => numeric += 1,
            // Blank cells carry no type evidence.
            Some(Value::Text(s)) if !s.trim().is_empty() => text += 1,
            _ => {}
        }
    }
    match (numeric, text) {
        (0, 0) => ColumnType::Text,
        (_, 0) => ColumnType::Numeric,
        (0, _) => ColumnType::Text,
        _ => ColumnType::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coerces_numeric_cells() {
        let dataset = Dataset::parse("sample", "a,b,c\n1,2,3");

        let names: Vec<&str> = dataset.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(
            dataset.records()[0].cells(),
            &[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
        );
        assert!(dataset
            .columns()
            .iter()
            .all(|c| c.inferred == ColumnType::Numeric));
    }

    #[test]
    fn test_trailing_newline_yields_ragged_record() {
        let dataset = Dataset::parse("sample", "a,b\n1,2\n");

        assert_eq!(dataset.row_count(), 2);
        let last = &dataset.records()[1];
        assert_eq!(last.cells(), &[Value::Text(String::new()), Value::Missing]);
    }

    #[test]
    fn test_mixed_column_keeps_per_cell_types() {
        let dataset = Dataset::parse("people", "name,age\nalice,31\nbob,unknown");

        assert_eq!(dataset.columns()[0].inferred, ColumnType::Text);
        assert_eq!(dataset.columns()[1].inferred, ColumnType::Mixed);
        assert_eq!(dataset.value(0, "age"), Some(&Value::Number(31.0)));
        assert_eq!(
            dataset.value(1, "age"),
            Some(&Value::Text("unknown".to_string()))
        );
    }

    #[test]
    fn test_cells_beyond_header_width_are_dropped() {
        let dataset = Dataset::parse("sample", "a,b\n1,2,3");
        assert_eq!(dataset.records()[0].cells().len(), 2);
    }

    #[test]
    fn test_quoted_fields_are_not_unescaped() {
        // The naive grammar splits inside quotes; this documents the
        // carried-over fragility rather than fixing it.
        let dataset = Dataset::parse("sample", "a,b\n\"x,y\",2");
        assert_eq!(
            dataset.records()[0].cells(),
            &[
                Value::Text("\"x".to_string()),
                Value::Text("y\"".to_string())
            ]
        );
    }

    #[test]
    fn test_crlf_lines_parse_cleanly() {
        let dataset = Dataset::parse("sample", "a,b\r\n1,2");
        let names: Vec<&str> = dataset.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            dataset.records()[0].cells(),
            &[Value::Number(1.0), Value::Number(2.0)]
        );
    }

    #[test]
    fn test_default_axes_need_two_columns() {
        let two = Dataset::parse("two", "x,y\n1,2");
        assert_eq!(two.default_axes(), Some(("x", "y")));

        let one = Dataset::parse("one", "only\n1");
        assert_eq!(one.default_axes(), None);
    }

    #[test]
    fn test_scientific_notation_and_non_finite_text() {
        let dataset = Dataset::parse("sample", "v\n1e3\nnan\n-2.5");
        assert_eq!(dataset.value(0, "v"), Some(&Value::Number(1000.0)));
        assert_eq!(dataset.value(1, "v"), Some(&Value::Text("nan".to_string())));
        assert_eq!(dataset.value(2, "v"), Some(&Value::Number(-2.5)));
    }
}
