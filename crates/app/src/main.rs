use eframe::egui;
use parking_lot::Mutex;
use shared::conversation::{Message, Role};
use std::sync::Arc;

mod state;
mod types;
mod utils;

pub use types::*;

use crate::utils::{chat_export_filename, save_settings};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Sabot",
        options,
        Box::new(|_cc| {
            Box::new(SabotApp {
                state: Arc::new(Mutex::new(AppState::default())),
            })
        }),
    )
}

struct SabotApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for SabotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();

        // Poll background work (non-blocking)
        s.poll_answer();
        s.poll_code_result();
        s.poll_dataset_result();

        // Keep polling while anything is in flight
        if s.answer_rx.is_some() || s.code_rx.is_some() || s.dataset_rx.is_some() {
            ctx.request_repaint();
        }

        // First frame: bring in the default dataset
        if !s.dataset_load_started {
            let name = s.selected_dataset.clone();
            s.start_dataset_load(&name);
        }

        // Keyboard shortcuts
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Slash)) {
            s.active_tab = Tab::Chat;
            s.focus_chat_input = true;
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::K)) {
            s.show_help_window = !s.show_help_window;
        }
        if ctx.input_mut(|i| {
            i.consume_key(
                egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
                egui::Key::D,
            )
        }) {
            s.show_debug_window = !s.show_debug_window;
        }

        // Theme
        let mut style = (*ctx.style()).clone();
        style.visuals = if s.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        style.visuals.window_rounding = egui::Rounding::same(12.0);
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        if s.settings.dark_mode {
            style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 35);
        } else {
            style.visuals.panel_fill = egui::Color32::from_rgb(250, 250, 252);
        }
        ctx.set_style(style);

        let dark = s.settings.dark_mode;

        // Top header with tab buttons
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(if dark {
                egui::Color32::from_rgb(35, 35, 42)
            } else {
                egui::Color32::from_rgb(245, 247, 250)
            }))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.add_space(16.0);
                    ui.heading(egui::RichText::new("Sabot").size(24.0).color(if dark {
                        egui::Color32::from_rgb(220, 220, 230)
                    } else {
                        egui::Color32::from_rgb(60, 60, 80)
                    }));

                    ui.add_space(32.0);

                    let chat_busy = s.chat_busy;
                    let code_busy = s.code_busy;
                    let data_busy = s.data_busy;

                    egui::Frame::none()
                        .fill(if dark {
                            egui::Color32::from_rgb(30, 30, 36)
                        } else {
                            egui::Color32::from_rgb(235, 238, 243)
                        })
                        .rounding(egui::Rounding::same(10.0))
                        .stroke(egui::Stroke::new(
                            1.0,
                            if dark {
                                egui::Color32::from_rgb(50, 50, 58)
                            } else {
                                egui::Color32::from_rgb(210, 215, 225)
                            },
                        ))
                        .inner_margin(egui::Margin::symmetric(6.0, 4.0))
                        .show(ui, |ui| {
                            ui.spacing_mut().item_spacing.x = 2.0;
                            tab_button(ui, Tab::Chat, &mut s.active_tab, chat_busy);
                            tab_button(ui, Tab::Code, &mut s.active_tab, code_busy);
                            tab_button(ui, Tab::Data, &mut s.active_tab, data_busy);
                        });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(16.0);

                        let dark_icon = if s.settings.dark_mode { "☀" } else { "🌙" };
                        if ui
                            .add(
                                egui::Button::new(egui::RichText::new(dark_icon).size(18.0))
                                    .frame(false),
                            )
                            .on_hover_text(if s.settings.dark_mode {
                                "Switch to light mode"
                            } else {
                                "Switch to dark mode"
                            })
                            .clicked()
                        {
                            s.settings.dark_mode = !s.settings.dark_mode;
                            save_settings(&s.settings);
                        }

                        ui.add_space(12.0);

                        if ui
                            .add(
                                egui::Button::new(
                                    egui::RichText::new("Settings")
                                        .size(12.0)
                                        .color(egui::Color32::WHITE),
                                )
                                .fill(egui::Color32::from_rgb(90, 90, 140))
                                .rounding(egui::Rounding::same(4.0)),
                            )
                            .on_hover_text("Model, key, and chart defaults")
                            .clicked()
                        {
                            s.show_settings_dialog = true;
                        }

                        ui.add_space(12.0);

                        if ui
                            .small_button("?")
                            .on_hover_text("Keyboard shortcuts (Cmd+K)")
                            .clicked()
                        {
                            s.show_help_window = !s.show_help_window;
                        }

                        // Model indicator
                        let model_name = s.settings.model.gemini_model.clone();
                        ui.label(
                            egui::RichText::new(format!("⚡ {}", model_name))
                                .size(11.0)
                                .color(if dark {
                                    egui::Color32::from_rgb(140, 180, 140)
                                } else {
                                    egui::Color32::from_rgb(80, 130, 80)
                                }),
                        );
                    });
                });
                ui.add_space(12.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| match s.active_tab {
            Tab::Chat => render_chat_panel(&mut s, ui, ctx, dark),
            Tab::Code => render_code_panel(&mut s, ui, dark),
            Tab::Data => render_data_panel(&mut s, ui, dark),
        });

        render_settings_window(&mut s, ctx, dark);
        render_debug_window(&mut s, ctx);
        render_help_window(&mut s, ctx);
    }
}

fn tab_button(ui: &mut egui::Ui, tab: Tab, current: &mut Tab, is_processing: bool) {
    let is_selected = *current == tab;

    let label_text = if is_processing && !is_selected {
        format!("{} ●", tab.label())
    } else {
        tab.label().to_string()
    };

    let text_color = if is_selected {
        egui::Color32::WHITE
    } else if is_processing {
        let time = ui.ctx().input(|i| i.time);
        let pulse = ((time * 4.0).sin() + 1.0) / 2.0;
        let alpha = (128.0 + pulse * 127.0) as u8;
        egui::Color32::from_rgba_unmultiplied(100, 200, 255, alpha)
    } else {
        egui::Color32::from_rgb(70, 70, 90)
    };

    let btn = egui::Button::new(egui::RichText::new(label_text).size(14.0).color(text_color))
        .fill(if is_selected {
            egui::Color32::from_rgb(70, 130, 180)
        } else {
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 0)
        })
        .rounding(egui::Rounding::same(9.0));

    if ui.add_sized([90.0, 32.0], btn).clicked() {
        *current = tab;
    }
}

fn render_chat_panel(s: &mut AppState, ui: &mut egui::Ui, ctx: &egui::Context, dark: bool) {
    // Toolbar
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("{} messages", s.conversation.len()))
                .size(12.0)
                .weak(),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button("Clear")
                .on_hover_text("Remove all messages")
                .clicked()
            {
                s.clear_conversation();
            }
            let can_export = !s.conversation.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export").small())
                .on_hover_text("Save the conversation as JSON")
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(chat_export_filename(chrono::Utc::now()))
                    .save_file()
                {
                    s.export_conversation(&path);
                }
            }
        });
    });
    ui.separator();

    let input_area_height = 110.0;
    let chat_height = (ui.available_height() - input_area_height).max(120.0);

    let messages: Vec<Message> = s.conversation.messages().to_vec();
    let is_busy = s.chat_busy;
    let mut delete_pair: Option<usize> = None;

    egui::ScrollArea::vertical()
        .max_height(chat_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if messages.is_empty() && !is_busy {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Ask anything to get started.")
                            .size(15.0)
                            .weak(),
                    );
                });
            }

            let mut user_index = 0usize;
            for msg in &messages {
                ui.add_space(6.0);
                match msg.role {
                    Role::User => {
                        if render_user_message(ui, msg, !is_busy) {
                            delete_pair = Some(user_index);
                        }
                        user_index += 1;
                    }
                    Role::Assistant => render_assistant_message(ui, msg, dark),
                }
                ui.add_space(6.0);
            }

            if is_busy {
                ui.add_space(6.0);
                egui::Frame::none()
                    .fill(if dark {
                        egui::Color32::from_rgb(50, 50, 58)
                    } else {
                        egui::Color32::from_rgb(230, 230, 235)
                    })
                    .rounding(egui::Rounding::same(12.0))
                    .inner_margin(egui::Margin::same(12.0))
                    .show(ui, |ui| {
                        let time = ui.input(|i| i.time);
                        let dots = match ((time * 2.0) as i32) % 4 {
                            0 => "   ",
                            1 => ".  ",
                            2 => ".. ",
                            _ => "...",
                        };
                        ui.label(
                            egui::RichText::new(format!("Thinking{}", dots))
                                .color(if dark {
                                    egui::Color32::from_rgb(160, 160, 180)
                                } else {
                                    egui::Color32::from_rgb(60, 60, 70)
                                })
                                .italics(),
                        );
                    });
                ctx.request_repaint();
            }
        });

    if let Some(pair) = delete_pair {
        s.conversation.delete_exchange(pair);
    }

    ui.add_space(8.0);

    // Attachment chip
    let chip = s
        .attachment
        .as_ref()
        .map(|a| format!("Attached: {} ({} KB)", a.name, a.size / 1024));
    if let Some(text) = chip {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(text).size(12.0).weak());
            if ui.small_button("Remove").clicked() {
                s.attachment = None;
            }
        });
    }

    // Input area
    ui.horizontal(|ui| {
        let is_busy = s.chat_busy;

        if ui
            .add_sized([70.0, 40.0], egui::Button::new("Attach"))
            .on_hover_text("Attach a file (5 MB max)")
            .clicked()
        {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Supported files", assistant::ACCEPTED_EXTENSIONS)
                .pick_file()
            {
                s.attach_file(&path);
            }
        }

        let response = ui.add_sized(
            [ui.available_width() - 80.0, 40.0],
            egui::TextEdit::singleline(&mut s.input_text)
                .hint_text("Type your message...")
                .font(egui::FontId::new(15.0, egui::FontFamily::Proportional)),
        );

        if s.focus_chat_input {
            response.request_focus();
            s.focus_chat_input = false;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            s.send_chat_message();
        }

        let btn = if is_busy {
            egui::Button::new("Stop").fill(egui::Color32::from_rgb(180, 80, 80))
        } else {
            egui::Button::new("Send").fill(egui::Color32::from_rgb(70, 130, 180))
        };
        if ui.add_sized([70.0, 40.0], btn).clicked() {
            if is_busy {
                s.cancel_answer();
            } else {
                s.send_chat_message();
            }
        }
    });

    status_line(ui, &s.chat_status, s.chat_status_is_error);
}

/// Returns true when the delete button for this exchange was clicked.
fn render_user_message(ui: &mut egui::Ui, msg: &Message, allow_delete: bool) -> bool {
    let mut delete_clicked = false;
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
        ui.add_space(8.0);
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(70, 130, 180))
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::same(12.0))
            .show(ui, |ui| {
                ui.set_max_width(500.0);
                ui.label(
                    egui::RichText::new(&msg.content)
                        .color(egui::Color32::WHITE)
                        .size(15.0),
                );
            });
        if allow_delete
            && ui
                .small_button("✕")
                .on_hover_text("Delete this exchange")
                .clicked()
        {
            delete_clicked = true;
        }
    });
    delete_clicked
}

fn render_assistant_message(ui: &mut egui::Ui, msg: &Message, dark: bool) {
    egui::Frame::none()
        .fill(if dark {
            egui::Color32::from_rgb(50, 50, 58)
        } else {
            egui::Color32::from_rgb(245, 245, 248)
        })
        .rounding(egui::Rounding::same(12.0))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_max_width(600.0);
            let text_color = if dark {
                egui::Color32::from_rgb(220, 220, 230)
            } else {
                egui::Color32::from_rgb(40, 40, 50)
            };
            ui.label(
                egui::RichText::new(&msg.content)
                    .color(text_color)
                    .size(15.0),
            );

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .small_button("Copy")
                    .on_hover_text("Copy to clipboard")
                    .clicked()
                {
                    ui.output_mut(|o| o.copied_text = msg.content.clone());
                }
            });
        });
}

fn render_code_panel(s: &mut AppState, ui: &mut egui::Ui, dark: bool) {
    ui.horizontal(|ui| {
        ui.label("Language:");
        egui::ComboBox::from_id_source("code_language")
            .selected_text(s.code_language.clone())
            .show_ui(ui, |ui| {
                for language in assistant::LANGUAGES {
                    ui.selectable_value(
                        &mut s.code_language,
                        language.to_string(),
                        *language,
                    );
                }
            });
    });

    ui.add_space(4.0);
    ui.add(
        egui::TextEdit::multiline(&mut s.code_description)
            .hint_text("Describe the code you want...")
            .desired_rows(4)
            .desired_width(ui.available_width()),
    );

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let can_generate = !s.code_busy && !s.code_description.trim().is_empty();
        if ui
            .add_enabled(can_generate, egui::Button::new("Generate"))
            .clicked()
        {
            s.start_code_generation();
        }
        if s.code_busy {
            ui.spinner();
            ui.label(egui::RichText::new("Generating...").weak().italics());
        }
    });

    if let Some(outcome) = &s.code_output {
        ui.add_space(8.0);
        let code = outcome.code.clone();
        let error = outcome.error.clone();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Result").strong());
            if ui.small_button("Copy").clicked() {
                ui.output_mut(|o| o.copied_text = code.clone());
            }
        });

        egui::Frame::none()
            .fill(if dark {
                egui::Color32::from_rgb(24, 24, 28)
            } else {
                egui::Color32::from_rgb(245, 245, 248)
            })
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .max_height(ui.available_height() - 40.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&code).monospace().size(13.0));
                    });
            });

        if let Some(error) = error {
            ui.label(
                egui::RichText::new(error)
                    .size(11.0)
                    .color(egui::Color32::from_rgb(200, 100, 100)),
            );
        }
    }
}

fn render_data_panel(s: &mut AppState, ui: &mut egui::Ui, dark: bool) {
    // Dataset picker
    ui.horizontal(|ui| {
        ui.label("Dataset:");
        let mut pick: Option<String> = None;
        egui::ComboBox::from_id_source("dataset_picker")
            .selected_text(s.selected_dataset.clone())
            .show_ui(ui, |ui| {
                for (name, _) in dataviz::DATASET_REGISTRY {
                    if ui
                        .selectable_label(s.selected_dataset == *name, *name)
                        .clicked()
                    {
                        pick = Some(name.to_string());
                    }
                }
            });
        if let Some(name) = pick {
            s.start_dataset_load(&name);
        }
        if ui.small_button("Reload").clicked() {
            let name = s.selected_dataset.clone();
            s.start_dataset_load(&name);
        }
        if s.data_busy {
            ui.spinner();
        }
        status_line_inline(ui, &s.data_status, s.data_status_is_error);
    });

    let Some(dataset) = &s.dataset else {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("No dataset loaded.").weak());
        });
        return;
    };
    let column_names: Vec<String> = dataset.columns().iter().map(|c| c.name.clone()).collect();
    let dataset_name = dataset.name().to_string();

    ui.separator();

    // Filter editor: every row must match all of these.
    let mut filters_changed = false;
    let mut remove_filter: Option<usize> = None;
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("Filters").strong());
        if ui.small_button("+ Add filter").clicked() {
            s.filters.push(dataviz::Filter {
                column: column_names.first().cloned().unwrap_or_default(),
                value: String::new(),
            });
            filters_changed = true;
        }
    });
    for (i, filter) in s.filters.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_source(("filter_column", i))
                .selected_text(filter.column.clone())
                .width(140.0)
                .show_ui(ui, |ui| {
                    for name in &column_names {
                        if ui
                            .selectable_value(&mut filter.column, name.clone(), name)
                            .changed()
                        {
                            filters_changed = true;
                        }
                    }
                });
            ui.label("contains");
            if ui
                .add(
                    egui::TextEdit::singleline(&mut filter.value)
                        .hint_text("value")
                        .desired_width(160.0),
                )
                .changed()
            {
                filters_changed = true;
            }
            if ui.small_button("✕").clicked() {
                remove_filter = Some(i);
            }
        });
    }
    if let Some(i) = remove_filter {
        s.filters.remove(i);
        filters_changed = true;
    }
    if filters_changed {
        s.refresh_filtered();
    }

    ui.separator();

    // Chart controls
    ui.horizontal_wrapped(|ui| {
        egui::ComboBox::from_id_source("chart_kind")
            .selected_text(s.chart.kind.name())
            .show_ui(ui, |ui| {
                for kind in dataviz::ChartKind::ALL {
                    ui.selectable_value(&mut s.chart.kind, kind, kind.name());
                }
            });
        ui.label("X:");
        egui::ComboBox::from_id_source("chart_x")
            .selected_text(s.chart.x_column.clone())
            .width(120.0)
            .show_ui(ui, |ui| {
                for name in &column_names {
                    ui.selectable_value(&mut s.chart.x_column, name.clone(), name);
                }
            });
        ui.label("Y:");
        egui::ComboBox::from_id_source("chart_y")
            .selected_text(s.chart.y_column.clone())
            .width(120.0)
            .show_ui(ui, |ui| {
                for name in &column_names {
                    ui.selectable_value(&mut s.chart.y_column, name.clone(), name);
                }
            });
        ui.label("Color:");
        ui.add(egui::TextEdit::singleline(&mut s.chart.color).desired_width(70.0));
        ui.add(egui::Slider::new(&mut s.chart.opacity, 0..=100).text("Opacity"));
        ui.checkbox(&mut s.chart.show_grid, "Grid");
        if ui
            .small_button("Save as default")
            .on_hover_text("Use these chart settings for future sessions")
            .clicked()
        {
            s.settings.chart.color = s.chart.color.clone();
            s.settings.chart.opacity = s.chart.opacity;
            s.settings.chart.show_grid = s.chart.show_grid;
            save_settings(&s.settings);
            s.settings_status = Some("Saved chart defaults".to_string());
            s.settings_status_is_error = false;
        }
    });

    // Chart over the filtered rows
    if let Some(filtered) = &s.filtered {
        if !s.chart.x_column.is_empty() && !s.chart.y_column.is_empty() {
            let series = dataviz::project(filtered, &s.chart.x_column, &s.chart.y_column);
            viewers::chart_ui(ui, &series, &s.chart);
        }

        ui.add_space(4.0);
        let filtered_rows = filtered.row_count();
        let total_rows = s.dataset.as_ref().map(|d| d.row_count()).unwrap_or(0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{} / {} rows", filtered_rows, total_rows))
                .size(12.0)
                .weak(),
            );
            let _ = dark;
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button("Download CSV")
                    .on_hover_text("Save the filtered rows")
                    .clicked()
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_file_name(dataviz::filtered_export_name(&dataset_name))
                        .save_file()
                    {
                        s.export_filtered_csv(&path);
                    }
                }
            });
        });
    }

    if let Some(filtered) = &s.filtered {
        viewers::table_ui(ui, filtered);
    }
}

fn render_settings_window(s: &mut AppState, ctx: &egui::Context, dark: bool) {
    if !s.show_settings_dialog {
        return;
    }
    let mut open = true;
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        open = false;
    }
    let mut wants_close = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .open(&mut open)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            ui.set_min_width(420.0);

            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Settings").color(if dark {
                    egui::Color32::from_rgb(220, 220, 230)
                } else {
                    egui::Color32::from_rgb(40, 40, 50)
                }));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Done").clicked() {
                        wants_close = true;
                    }
                });
            });

            if let Some(status) = &s.settings_status {
                let color = if s.settings_status_is_error {
                    egui::Color32::from_rgb(200, 100, 100)
                } else {
                    egui::Color32::from_rgb(100, 180, 100)
                };
                ui.label(egui::RichText::new(status).size(12.0).color(color));
            }

            ui.separator();

            // Gemini access
            ui.label(egui::RichText::new("Gemini API key").strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut s.gemini_api_key_input)
                        .password(true)
                        .hint_text("paste key"),
                );
                if !s.gemini_api_key_input.is_empty() && ui.button("Save").clicked() {
                    s.settings.model.gemini_auth.api_key = Some(s.gemini_api_key_input.clone());
                    save_settings(&s.settings);
                    s.gemini_api_key_input.clear();
                    s.rebuild_generators();
                    s.settings_status = Some("Gemini API key saved".to_string());
                    s.settings_status_is_error = false;
                }
            });
            if s.settings.model.gemini_auth.api_key.is_some() {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Key saved").size(11.0).weak());
                    if ui.small_button("Remove key").clicked() {
                        s.settings.model.gemini_auth.api_key = None;
                        save_settings(&s.settings);
                        s.rebuild_generators();
                        s.settings_status = Some("Gemini API key removed".to_string());
                        s.settings_status_is_error = false;
                    }
                });
            }

            ui.horizontal(|ui| {
                ui.label("Model:");
                let response = ui.text_edit_singleline(&mut s.settings.model.gemini_model);
                if response.lost_focus() {
                    save_settings(&s.settings);
                    s.rebuild_generators();
                }
            });

            ui.add_space(8.0);
            ui.separator();

            // Generation controls
            ui.label(egui::RichText::new("Generation").strong());
            if ui
                .add(
                    egui::Slider::new(&mut s.settings.model.temperature, 0.0..=1.0)
                        .text("Temperature"),
                )
                .changed()
            {
                save_settings(&s.settings);
            }
            if ui
                .add(
                    egui::Slider::new(&mut s.settings.model.max_output_tokens, 100..=2000)
                        .text("Max output tokens"),
                )
                .changed()
            {
                save_settings(&s.settings);
            }
        });

    if !open || wants_close {
        s.show_settings_dialog = false;
        s.settings_status = None;
    }
}

fn render_debug_window(s: &mut AppState, ctx: &egui::Context) {
    if !s.show_debug_window {
        return;
    }
    let mut open = true;
    let snapshot = s.debug_snapshot();

    egui::Window::new("Debug")
        .open(&mut open)
        .default_width(480.0)
        .show(ctx, |ui| {
            if ui.small_button("Copy").clicked() {
                ui.output_mut(|o| o.copied_text = snapshot.clone());
            }
            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&snapshot).monospace().size(11.0));
                });
        });

    if !open {
        s.show_debug_window = false;
    }
}

fn render_help_window(s: &mut AppState, ctx: &egui::Context) {
    if !s.show_help_window {
        return;
    }
    let mut open = true;

    egui::Window::new("Shortcuts")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                ui.label(egui::RichText::new("Cmd+/").monospace());
                ui.label("Focus the message input");
                ui.end_row();
                ui.label(egui::RichText::new("Cmd+K").monospace());
                ui.label("Toggle this window");
                ui.end_row();
                ui.label(egui::RichText::new("Cmd+Shift+D").monospace());
                ui.label("Toggle the debug window");
                ui.end_row();
                ui.label(egui::RichText::new("Enter").monospace());
                ui.label("Send the current message");
                ui.end_row();
            });
        });

    if !open {
        s.show_help_window = false;
    }
}

fn status_line(ui: &mut egui::Ui, status: &Option<String>, is_error: bool) {
    if let Some(status) = status {
        let color = if is_error {
            egui::Color32::from_rgb(200, 100, 100)
        } else {
            egui::Color32::from_rgb(100, 180, 100)
        };
        ui.label(egui::RichText::new(status).size(12.0).color(color));
    }
}

fn status_line_inline(ui: &mut egui::Ui, status: &Option<String>, is_error: bool) {
    status_line(ui, status, is_error);
}
