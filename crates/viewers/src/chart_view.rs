use dataviz::{ChartConfig, ChartKind, ChartSeries};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};

const FALLBACK_COLOR: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);

/// Painter-based chart. Points are drawn in series order at evenly spaced
/// x slots; rows whose y cell is not numeric are skipped.
pub fn chart_ui(ui: &mut egui::Ui, series: &ChartSeries, config: &ChartConfig) {
    let desired = egui::vec2(ui.available_width(), 280.0);
    let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

    let numeric: Vec<(usize, f64)> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.y.as_number().map(|y| (i, y)))
        .collect();

    if numeric.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No plottable data",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (_, y) in &numeric {
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }
    let span = if max_y > min_y { max_y - min_y } else { 1.0 };

    // Margins leave room for the y scale on the left and x labels below.
    let plot = Rect::from_min_max(
        egui::pos2(rect.left() + 56.0, rect.top() + 16.0),
        egui::pos2(rect.right() - 16.0, rect.bottom() - 28.0),
    );

    let grid_color = ui.visuals().widgets.noninteractive.bg_stroke.color;
    let text_color = ui.visuals().weak_text_color();

    if config.show_grid {
        for step in 0..=4 {
            let y = plot.top() + plot.height() * step as f32 / 4.0;
            painter.line_segment(
                [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
                Stroke::new(1.0, grid_color),
            );
        }
    }

    // Scale labels at the top and bottom of the y range.
    painter.text(
        egui::pos2(plot.left() - 6.0, plot.top()),
        Align2::RIGHT_CENTER,
        format_scale(max_y),
        FontId::monospace(10.0),
        text_color,
    );
    painter.text(
        egui::pos2(plot.left() - 6.0, plot.bottom()),
        Align2::RIGHT_CENTER,
        format_scale(min_y),
        FontId::monospace(10.0),
        text_color,
    );

    let slots = series.points.len().max(1);
    let slot_width = plot.width() / slots as f32;
    let pos_for = |index: usize, y: f64| -> Pos2 {
        let x = plot.left() + (index as f32 + 0.5) * slot_width;
        let t = ((y - min_y) / span) as f32;
        egui::pos2(x, plot.bottom() - t * plot.height())
    };

    let color = apply_opacity(
        parse_hex_color(&config.color).unwrap_or(FALLBACK_COLOR),
        config.opacity,
    );

    match config.kind {
        ChartKind::Line => {
            let positions: Vec<Pos2> =
                numeric.iter().map(|&(i, y)| pos_for(i, y)).collect();
            for pair in positions.windows(2) {
                painter.line_segment([pair[0], pair[1]], Stroke::new(2.0, color));
            }
            for pos in &positions {
                painter.circle_filled(*pos, 2.5, color);
            }
        }
        ChartKind::Bar => {
            let bar_width = (slot_width * 0.6).max(1.0);
            for &(i, y) in &numeric {
                let top = pos_for(i, y);
                let bar = Rect::from_min_max(
                    egui::pos2(top.x - bar_width / 2.0, top.y),
                    egui::pos2(top.x + bar_width / 2.0, plot.bottom()),
                );
                painter.rect_filled(bar, 2.0, color);
            }
        }
        ChartKind::Scatter => {
            for &(i, y) in &numeric {
                painter.circle_filled(pos_for(i, y), 3.5, color);
            }
        }
    }

    // First and last x values below the plot, axis names in the corners.
    if let Some(point) = series.points.first() {
        painter.text(
            egui::pos2(plot.left(), rect.bottom() - 6.0),
            Align2::LEFT_BOTTOM,
            point.x.to_string(),
            FontId::monospace(10.0),
            text_color,
        );
    }
    if series.points.len() > 1 {
        if let Some(point) = series.points.last() {
            painter.text(
                egui::pos2(plot.right(), rect.bottom() - 6.0),
                Align2::RIGHT_BOTTOM,
                point.x.to_string(),
                FontId::monospace(10.0),
                text_color,
            );
        }
    }
    painter.text(
        egui::pos2(plot.center().x, rect.bottom() - 6.0),
        Align2::CENTER_BOTTOM,
        format!("{} / {}", series.x_label, series.y_label),
        FontId::proportional(11.0),
        text_color,
    );
}

/// Parses "#rrggbb" (leading '#' optional). Anything else yields None and the
/// caller falls back to the default series color.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

fn apply_opacity(color: Color32, opacity: u8) -> Color32 {
    let alpha = (opacity.min(100) as f32 / 100.0 * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn format_scale(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(
            parse_hex_color("#8884d8"),
            Some(Color32::from_rgb(0x88, 0x84, 0xd8))
        );
        assert_eq!(
            parse_hex_color("ff0000"),
            Some(Color32::from_rgb(255, 0, 0))
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn opacity_maps_to_alpha() {
        let c = apply_opacity(Color32::from_rgb(10, 20, 30), 100);
        assert_eq!(c.a(), 255);
        let c = apply_opacity(Color32::from_rgb(10, 20, 30), 0);
        assert_eq!(c.a(), 0);
        // Values above 100 clamp rather than wrap.
        let c = apply_opacity(Color32::from_rgb(10, 20, 30), 200);
        assert_eq!(c.a(), 255);
    }
}
