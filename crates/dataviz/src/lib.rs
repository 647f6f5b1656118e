pub mod chart;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod source;

pub use chart::{project, ChartConfig, ChartKind, ChartPoint, ChartSeries};
pub use dataset::{Column, ColumnType, Dataset, Record, Value};
pub use export::{filtered_export_name, to_csv};
pub use filter::{apply_filters, Filter};
pub use source::{fetch_text, load_dataset, registry_path, DATASET_REGISTRY};
