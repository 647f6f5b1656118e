//! Chart data adapter: picks the two axis columns out of a (filtered)
//! dataset, in record order, and leaves everything else to the renderer.

use crate::dataset::{Dataset, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Scatter => "Scatter",
        }
    }
}

/// Presentation settings for the chart view. `color` is `#rrggbb`; `opacity`
/// runs 0..=100.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x_column: String,
    pub y_column: String,
    pub color: String,
    pub opacity: u8,
    pub show_grid: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            x_column: String::new(),
            y_column: String::new(),
            color: "#8884d8".to_string(),
            opacity: 100,
            show_grid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: Value,
    pub y: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Pass-through projection of the two named columns. No aggregation,
/// bucketing, or sorting: record order is x-order. Unknown columns (or an
/// empty dataset) produce an empty series, which renders as nothing.
pub fn project(dataset: &Dataset, x_column: &str, y_column: &str) -> ChartSeries {
    let (xi, yi) = match (dataset.column_index(x_column), dataset.column_index(y_column)) {
        (Some(xi), Some(yi)) => (xi, yi),
        _ => return ChartSeries::default(),
    };

    let points = dataset
        .records()
        .iter()
        .map(|record| ChartPoint {
            x: record.get(xi).cloned().unwrap_or(Value::Missing),
            y: record.get(yi).cloned().unwrap_or(Value::Missing),
        })
        .collect();

    ChartSeries {
        x_label: x_column.to_string(),
        y_label: y_column.to_string(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings() -> Dataset {
        Dataset::parse(
            "readings",
            "day,value,note\nmon,3,low\ntue,9,high\nwed,5,mid",
        )
    }

    #[test]
    fn test_project_selects_columns_in_record_order() {
        let series = project(&readings(), "day", "value");

        assert_eq!(series.x_label, "day");
        assert_eq!(series.y_label, "value");
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].x, Value::Text("mon".to_string()));
        assert_eq!(series.points[0].y, Value::Number(3.0));
        assert_eq!(series.points[2].y, Value::Number(5.0));
    }

    #[test]
    fn test_project_does_not_sort_or_aggregate() {
        let dataset = Dataset::parse("d", "x,y\n5,1\n1,2\n5,3");
        let series = project(&dataset, "x", "y");

        let xs: Vec<Option<f64>> = series.points.iter().map(|p| p.x.as_number()).collect();
        assert_eq!(xs, vec![Some(5.0), Some(1.0), Some(5.0)]);
    }

    #[test]
    fn test_unknown_axis_yields_empty_series() {
        let series = project(&readings(), "day", "nope");
        assert!(series.is_empty());
    }

    #[test]
    fn test_chart_kind_names() {
        let names: Vec<&str> = ChartKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["Line", "Bar", "Scatter"]);
    }
}
