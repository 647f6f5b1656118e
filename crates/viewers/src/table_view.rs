use dataviz::Dataset;

/// Striped grid over a dataset. Read-only: filtering happens upstream, this
/// just draws whatever rows it is handed.
pub fn table_ui(ui: &mut egui::Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    if columns.is_empty() {
        ui.weak("No columns.");
        return;
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("dataset_table")
                .num_columns(columns.len())
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for column in columns {
                        ui.strong(&column.name);
                    }
                    ui.end_row();

                    let max_display = 1000;
                    for record in dataset.records().iter().take(max_display) {
                        for i in 0..columns.len() {
                            let cell = record
                                .get(i)
                                .map(|v| v.to_string())
                                .unwrap_or_default();
                            ui.label(truncate_cell(&cell));
                        }
                        ui.end_row();
                    }

                    if dataset.row_count() > max_display {
                        ui.label(format!(
                            "... and {} more rows",
                            dataset.row_count() - max_display
                        ));
                        ui.end_row();
                    }
                });
        });
}

fn truncate_cell(cell: &str) -> String {
    if cell.chars().count() > 50 {
        let head: String = cell.chars().take(47).collect();
        format!("{}...", head)
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(80);
        let shown = truncate_cell(&long);
        assert_eq!(shown.chars().count(), 50);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn short_cells_pass_through() {
        assert_eq!(truncate_cell("hello"), "hello");
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let long = "é".repeat(60);
        let shown = truncate_cell(&long);
        assert!(shown.starts_with("ééé"));
        assert!(shown.ends_with("..."));
    }
}
