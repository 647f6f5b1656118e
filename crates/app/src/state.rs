//! Background work for the Sabot app
//!
//! Each runner owns a tokio runtime on its worker thread and reports back
//! over an mpsc channel that the UI polls every frame.

use assistant::{ChatPipeline, CodeGenerator, CodeOutcome, CODE_ERROR_FALLBACK};
use providers::GenerationOptions;
use shared::conversation::MessageId;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use futures::future::{AbortRegistration, Abortable};

use crate::types::{AnswerResult, DatasetResult};

/// Run one chat generation call. The future is wrapped in an Abortable so the
/// Stop button can cancel it mid-flight.
pub fn run_answer_generation(
    pipeline: Arc<ChatPipeline>,
    content: String,
    options: GenerationOptions,
    in_reply_to: MessageId,
    tx: Sender<AnswerResult>,
    abort_reg: AbortRegistration,
) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(AnswerResult {
                in_reply_to,
                response: String::new(),
                error: Some(format!("Failed to start async runtime: {}", e)),
                cancelled: false,
            });
            return;
        }
    };

    let result = rt.block_on(Abortable::new(
        pipeline.request_reply(&content, &options),
        abort_reg,
    ));

    let answer = match result {
        Ok(Ok(response)) => AnswerResult {
            in_reply_to,
            response,
            error: None,
            cancelled: false,
        },
        Ok(Err(e)) => AnswerResult {
            in_reply_to,
            response: String::new(),
            error: Some(e.to_string()),
            cancelled: false,
        },
        Err(_aborted) => AnswerResult {
            in_reply_to,
            response: String::new(),
            error: None,
            cancelled: true,
        },
    };
    let _ = tx.send(answer);
}

pub fn run_code_generation(
    generator: Arc<CodeGenerator>,
    description: String,
    language: String,
    tx: Sender<CodeOutcome>,
) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(CodeOutcome {
                code: CODE_ERROR_FALLBACK.to_string(),
                error: Some(format!("Failed to start async runtime: {}", e)),
            });
            return;
        }
    };

    // Failures are already folded into the outcome's sentinel text.
    let outcome = rt.block_on(generator.generate(&description, &language));
    let _ = tx.send(outcome);
}

pub fn run_dataset_load(name: String, source: String, tx: Sender<DatasetResult>) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = tx.send(DatasetResult {
                name,
                result: Err(format!("Failed to start async runtime: {}", e)),
            });
            return;
        }
    };

    let result = rt
        .block_on(dataviz::load_dataset(&name, &source))
        .map_err(|e| e.to_string());
    let _ = tx.send(DatasetResult { name, result });
}
