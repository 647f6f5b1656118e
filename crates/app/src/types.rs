//! Core types for the Sabot app
//!
//! Tab/result definitions plus the main AppState with its submit, poll, and
//! cancel actions.

use assistant::{Attachment, ChatPipeline, CodeGenerator, CodeOutcome, CODE_ERROR_FALLBACK};
use dataviz::{apply_filters, ChartConfig, Dataset, Filter};
use providers::{GeminiClient, GenerationOptions, TextGenerator};
use shared::conversation::{ConversationLog, MessageId};
use shared::settings::AppSettings;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use futures::future::AbortHandle;

use crate::state::{run_answer_generation, run_code_generation, run_dataset_load};
use crate::utils::load_settings_or_default;

/// Result from background answer generation
#[derive(Debug)]
pub struct AnswerResult {
    pub in_reply_to: MessageId,
    pub response: String,
    pub error: Option<String>,
    /// The request was aborted; nothing gets recorded.
    pub cancelled: bool,
}

/// Result from background dataset loading
#[derive(Debug)]
pub struct DatasetResult {
    pub name: String,
    pub result: Result<Dataset, String>,
}

/// Active tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Code,
    Data,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Code => "Code",
            Tab::Data => "Data",
        }
    }
}

/// Main application state
pub struct AppState {
    pub settings: AppSettings,
    pub active_tab: Tab,

    // Chat tab
    pub conversation: ConversationLog,
    pub input_text: String,
    pub attachment: Option<Attachment>,
    pub chat_busy: bool,
    pub answer_rx: Option<Receiver<AnswerResult>>,
    /// Abort handle for the in-flight request
    pub answer_abort: Option<AbortHandle>,
    pub chat_status: Option<String>,
    pub chat_status_is_error: bool,
    /// Set by the Cmd+/ shortcut; consumed on the next frame.
    pub focus_chat_input: bool,

    // Code tab
    pub code_language: String,
    pub code_description: String,
    pub code_output: Option<CodeOutcome>,
    pub code_busy: bool,
    pub code_rx: Option<Receiver<CodeOutcome>>,

    // Data tab
    pub selected_dataset: String,
    pub dataset: Option<Dataset>,
    /// Rows after the current filters; recomputed on any filter edit.
    pub filtered: Option<Dataset>,
    pub filters: Vec<Filter>,
    pub chart: ChartConfig,
    pub data_busy: bool,
    pub dataset_rx: Option<Receiver<DatasetResult>>,
    pub data_status: Option<String>,
    pub data_status_is_error: bool,
    pub dataset_load_started: bool,

    // Generation clients, rebuilt when model settings change. None until a
    // Gemini key is configured (settings or GEMINI_API_KEY).
    pub chat_pipeline: Option<Arc<ChatPipeline>>,
    pub code_generator: Option<Arc<CodeGenerator>>,

    // Dialogs
    pub show_settings_dialog: bool,
    pub show_debug_window: bool,
    pub show_help_window: bool,
    pub gemini_api_key_input: String,
    pub settings_status: Option<String>,
    pub settings_status_is_error: bool,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = load_settings_or_default();
        let chart = ChartConfig {
            color: settings.chart.color.clone(),
            opacity: settings.chart.opacity,
            show_grid: settings.chart.show_grid,
            ..ChartConfig::default()
        };
        let mut state = Self {
            settings,
            active_tab: Tab::Chat,
            conversation: ConversationLog::new(),
            input_text: String::new(),
            attachment: None,
            chat_busy: false,
            answer_rx: None,
            answer_abort: None,
            chat_status: None,
            chat_status_is_error: false,
            focus_chat_input: false,
            code_language: assistant::LANGUAGES[0].to_string(),
            code_description: String::new(),
            code_output: None,
            code_busy: false,
            code_rx: None,
            selected_dataset: dataviz::DATASET_REGISTRY[0].0.to_string(),
            dataset: None,
            filtered: None,
            filters: Vec::new(),
            chart,
            data_busy: false,
            dataset_rx: None,
            data_status: None,
            data_status_is_error: false,
            dataset_load_started: false,
            chat_pipeline: None,
            code_generator: None,
            show_settings_dialog: false,
            show_debug_window: false,
            show_help_window: false,
            gemini_api_key_input: String::new(),
            settings_status: None,
            settings_status_is_error: false,
        };
        state.rebuild_generators();
        state
    }
}

impl AppState {
    /// Recreate the Gemini-backed pipelines from current model settings.
    pub fn rebuild_generators(&mut self) {
        match GeminiClient::from_auth(
            &self.settings.model.gemini_model,
            &self.settings.model.gemini_auth,
        ) {
            Ok(client) => {
                let generator: Arc<dyn TextGenerator> = Arc::new(client);
                self.chat_pipeline = Some(Arc::new(ChatPipeline::new(generator.clone())));
                self.code_generator = Some(Arc::new(CodeGenerator::new(generator)));
            }
            Err(e) => {
                tracing::warn!("no text generator available: {:#}", e);
                self.chat_pipeline = None;
                self.code_generator = None;
            }
        }
    }

    /// Validate and encode a picked file, then mark it in the input line.
    pub fn attach_file(&mut self, path: &Path) {
        match Attachment::load(path) {
            Ok(attachment) => {
                self.input_text
                    .push_str(&format!(" [File: {}]", attachment.name));
                self.attachment = Some(attachment);
                self.chat_status = None;
            }
            Err(e) => {
                self.chat_status = Some(e.to_string());
                self.chat_status_is_error = true;
            }
        }
    }

    pub fn send_chat_message(&mut self) {
        if self.chat_busy {
            return;
        }
        if self.input_text.trim().is_empty() && self.attachment.is_none() {
            return;
        }
        let Some(pipeline) = self.chat_pipeline.clone() else {
            self.chat_status = Some("Add your Gemini API key in Settings first.".to_string());
            self.chat_status_is_error = true;
            self.show_settings_dialog = true;
            return;
        };

        // The user turn lands in the log before any network traffic.
        let prompt = std::mem::take(&mut self.input_text);
        let attachment = self.attachment.take();
        let (user_id, content) =
            pipeline.prepare(&mut self.conversation, &prompt, attachment.as_ref());
        self.chat_status = None;
        self.chat_busy = true;

        let options = GenerationOptions::from(&self.settings.model);
        let (tx, rx) = channel::<AnswerResult>();
        self.answer_rx = Some(rx);
        let (abort_handle, abort_reg) = futures::future::AbortHandle::new_pair();
        self.answer_abort = Some(abort_handle);

        std::thread::spawn(move || {
            let tx_panic = tx.clone();
            let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run_answer_generation(pipeline, content, options, user_id, tx, abort_reg);
            }));
            if res.is_err() {
                let _ = tx_panic.send(AnswerResult {
                    in_reply_to: user_id,
                    response: String::new(),
                    error: Some("generation thread panicked".to_string()),
                    cancelled: false,
                });
            }
        });
    }

    pub fn cancel_answer(&mut self) {
        if let Some(handle) = self.answer_abort.take() {
            handle.abort();
        }
        self.chat_status = Some("Stopping...".to_string());
        self.chat_status_is_error = false;
    }

    /// Non-blocking check for a finished chat request.
    pub fn poll_answer(&mut self) {
        if let Some(rx) = &self.answer_rx {
            if let Ok(result) = rx.try_recv() {
                self.answer_rx = None;
                self.answer_abort = None;
                self.chat_busy = false;

                if result.cancelled {
                    // The user turn stays; no reply is recorded for it.
                    self.chat_status = Some("Stopped.".to_string());
                    self.chat_status_is_error = false;
                    return;
                }

                let outcome = match result.error {
                    None => Ok(result.response),
                    Some(e) => Err(anyhow::anyhow!(e)),
                };
                let (_, error) =
                    ChatPipeline::record_reply(&mut self.conversation, result.in_reply_to, outcome);
                if let Some(error) = error {
                    self.chat_status = Some(error);
                    self.chat_status_is_error = true;
                } else {
                    self.chat_status = None;
                }
            }
        }
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.chat_status = None;
    }

    pub fn export_conversation(&mut self, path: &Path) {
        let json = match self.conversation.export_snapshot() {
            Ok(json) => json,
            Err(e) => {
                self.chat_status = Some(format!("Export failed: {}", e));
                self.chat_status_is_error = true;
                return;
            }
        };
        match std::fs::write(path, json) {
            Ok(()) => {
                self.chat_status = Some(format!("Saved {}", path.display()));
                self.chat_status_is_error = false;
            }
            Err(e) => {
                self.chat_status = Some(format!("Export failed: {}", e));
                self.chat_status_is_error = true;
            }
        }
    }

    pub fn start_code_generation(&mut self) {
        if self.code_busy || self.code_description.trim().is_empty() {
            return;
        }
        let Some(generator) = self.code_generator.clone() else {
            self.settings_status = Some("Add your Gemini API key first.".to_string());
            self.settings_status_is_error = true;
            self.show_settings_dialog = true;
            return;
        };
        let description = self.code_description.clone();
        let language = self.code_language.clone();
        let (tx, rx) = channel::<CodeOutcome>();
        self.code_rx = Some(rx);
        self.code_busy = true;

        std::thread::spawn(move || {
            let tx_panic = tx.clone();
            let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run_code_generation(generator, description, language, tx);
            }));
            if res.is_err() {
                let _ = tx_panic.send(CodeOutcome {
                    code: CODE_ERROR_FALLBACK.to_string(),
                    error: Some("generation thread panicked".to_string()),
                });
            }
        });
    }

    pub fn poll_code_result(&mut self) {
        if let Some(rx) = &self.code_rx {
            if let Ok(outcome) = rx.try_recv() {
                self.code_rx = None;
                self.code_busy = false;
                self.code_output = Some(outcome);
            }
        }
    }

    pub fn start_dataset_load(&mut self, name: &str) {
        if self.data_busy {
            return;
        }
        self.dataset_load_started = true;
        let Some(source) = dataviz::registry_path(name) else {
            self.data_status = Some(format!("Unknown dataset: {}", name));
            self.data_status_is_error = true;
            return;
        };
        self.selected_dataset = name.to_string();
        self.data_busy = true;
        self.data_status = Some("Loading...".to_string());
        self.data_status_is_error = false;

        let (tx, rx) = channel::<DatasetResult>();
        self.dataset_rx = Some(rx);
        let name = name.to_string();
        let source = source.to_string();

        std::thread::spawn(move || {
            let tx_panic = tx.clone();
            let name_panic = name.clone();
            let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run_dataset_load(name, source, tx);
            }));
            if res.is_err() {
                let _ = tx_panic.send(DatasetResult {
                    name: name_panic,
                    result: Err("load thread panicked".to_string()),
                });
            }
        });
    }

    pub fn poll_dataset_result(&mut self) {
        if let Some(rx) = &self.dataset_rx {
            if let Ok(result) = rx.try_recv() {
                self.dataset_rx = None;
                self.data_busy = false;
                match result.result {
                    Ok(dataset) => {
                        if let Some((x, y)) = dataset.default_axes() {
                            self.chart.x_column = x.to_string();
                            self.chart.y_column = y.to_string();
                        } else {
                            self.chart.x_column.clear();
                            self.chart.y_column.clear();
                        }
                        self.filters.clear();
                        self.dataset = Some(dataset);
                        self.refresh_filtered();
                        self.data_status = Some(format!(
                            "{} data has been loaded successfully.",
                            result.name
                        ));
                        self.data_status_is_error = false;
                    }
                    Err(e) => {
                        tracing::warn!("dataset load failed: {}", e);
                        self.dataset = None;
                        self.filtered = None;
                        self.data_status = Some("Failed to load data.".to_string());
                        self.data_status_is_error = true;
                    }
                }
            }
        }
    }

    /// Reapply the filter list to the loaded dataset.
    pub fn refresh_filtered(&mut self) {
        self.filtered = self
            .dataset
            .as_ref()
            .map(|dataset| apply_filters(dataset, &self.filters));
    }

    pub fn export_filtered_csv(&mut self, path: &Path) {
        let Some(filtered) = &self.filtered else {
            return;
        };
        let text = match dataviz::to_csv(filtered) {
            Ok(text) => text,
            Err(e) => {
                self.data_status = Some(format!("Export failed: {}", e));
                self.data_status_is_error = true;
                return;
            }
        };
        match std::fs::write(path, text) {
            Ok(()) => {
                self.data_status = Some(format!("Saved {}", path.display()));
                self.data_status_is_error = false;
            }
            Err(e) => {
                self.data_status = Some(format!("Export failed: {}", e));
                self.data_status_is_error = true;
            }
        }
    }

    /// JSON view of the conversation plus the options the next request will
    /// carry, for the debug window.
    pub fn debug_snapshot(&self) -> String {
        let options = GenerationOptions::from(&self.settings.model);
        let conversation = self
            .conversation
            .export_snapshot()
            .unwrap_or_else(|e| format!("<export failed: {}>", e));
        format!(
            "model: {}\noptions: {:?}\nmessages: {}\n\n{}",
            self.settings.model.gemini_model,
            options,
            self.conversation.len(),
            conversation
        )
    }
}
