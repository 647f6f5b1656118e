//! The chat request pipeline: append the user's turn, make one generation
//! call, record the reply. Failures are absorbed here; the log always gains
//! a well-formed assistant turn.

use providers::{GenerationOptions, TextGenerator};
use shared::conversation::{ConversationLog, MessageId};
use std::sync::Arc;

use crate::attachments::Attachment;

/// Appended as the assistant turn when the generation call fails.
pub const ANSWER_ERROR_FALLBACK: &str = "An error occurred while generating the answer.";

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub user_id: MessageId,
    pub reply_id: MessageId,
    /// Raw error text when the fallback was substituted; the shell shows it
    /// as a transient notice.
    pub error: Option<String>,
}

pub struct ChatPipeline {
    generator: Arc<dyn TextGenerator>,
}

impl ChatPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Append the outgoing user message before any network traffic so it
    /// renders immediately. Returns the new id and the content that will be
    /// sent (the prompt plus its file annotation).
    pub fn prepare(
        &self,
        log: &mut ConversationLog,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> (MessageId, String) {
        let content = match attachment {
            Some(file) => file.annotate(prompt),
            None => prompt.to_string(),
        };
        let id = log.append_user(content.clone());
        (id, content)
    }

    /// The single external call. Exactly one attempt; the caller may wrap
    /// this future in an Abortable to make it cancellable.
    pub async fn request_reply(
        &self,
        content: &str,
        options: &GenerationOptions,
    ) -> anyhow::Result<String> {
        self.generator.generate(content, options).await
    }

    /// Append the assistant turn for `result`. On failure the fixed fallback
    /// text goes into the log and the error stops here.
    pub fn record_reply(
        log: &mut ConversationLog,
        in_reply_to: MessageId,
        result: anyhow::Result<String>,
    ) -> (MessageId, Option<String>) {
        match result {
            Ok(text) => (log.append_assistant(text, Some(in_reply_to)), None),
            Err(e) => {
                tracing::warn!("generation failed: {:#}", e);
                let id = log.append_assistant(ANSWER_ERROR_FALLBACK, Some(in_reply_to));
                (id, Some(e.to_string()))
            }
        }
    }

    /// prepare + request + record in one call, for callers that do not need
    /// the threaded split.
    pub async fn submit(
        &self,
        log: &mut ConversationLog,
        prompt: &str,
        attachment: Option<&Attachment>,
        options: &GenerationOptions,
    ) -> SubmitOutcome {
        let (user_id, content) = self.prepare(log, prompt, attachment);
        let result = self.request_reply(&content, options).await;
        let (reply_id, error) = Self::record_reply(log, user_id, result);
        SubmitOutcome {
            user_id,
            reply_id,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::conversation::Role;
    use std::sync::Mutex;

    /// Records every call; answers with the canned reply or an error.
    struct MockGenerator {
        reply: Option<String>,
        calls: Mutex<Vec<(String, GenerationOptions)>>,
    }

    impl MockGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(
            &self,
            prompt: &str,
            options: &GenerationOptions,
        ) -> anyhow::Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), options.clone()));
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(anyhow::anyhow!("backend unavailable")),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_appends_user_then_assistant() {
        let mock = Arc::new(MockGenerator::replying("Hi there"));
        let pipeline = ChatPipeline::new(mock.clone());
        let mut log = ConversationLog::new();
        let options = GenerationOptions {
            temperature: Some(0.7),
            max_output_tokens: Some(1000),
        };

        let outcome = pipeline.submit(&mut log, "Hello", None, &options).await;

        assert!(outcome.error.is_none());
        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(messages[1].in_reply_to, Some(outcome.user_id));

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Hello");
        assert_eq!(calls[0].1, options);
    }

    #[tokio::test]
    async fn test_failure_substitutes_exactly_one_fallback_turn() {
        let mock = Arc::new(MockGenerator::failing());
        let pipeline = ChatPipeline::new(mock);
        let mut log = ConversationLog::new();

        let outcome = pipeline
            .submit(&mut log, "Hello", None, &GenerationOptions::default())
            .await;

        assert!(outcome.error.is_some());
        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].content, ANSWER_ERROR_FALLBACK);
        assert_eq!(messages[1].in_reply_to, Some(outcome.user_id));
    }

    #[tokio::test]
    async fn test_attachment_annotates_content_but_payload_stays_local() {
        let mock = Arc::new(MockGenerator::replying("noted"));
        let pipeline = ChatPipeline::new(mock.clone());
        let mut log = ConversationLog::new();
        let attachment = Attachment::from_bytes("notes.txt", b"secret body").unwrap();

        pipeline
            .submit(
                &mut log,
                "Summarize",
                Some(&attachment),
                &GenerationOptions::default(),
            )
            .await;

        assert_eq!(log.messages()[0].content, "Summarize (File: notes.txt)");
        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0].0, "Summarize (File: notes.txt)");
        assert!(!calls[0].0.contains(&attachment.encoded));
    }

    #[test]
    fn test_prepare_appends_user_before_any_request() {
        let pipeline = ChatPipeline::new(Arc::new(MockGenerator::failing()));
        let mut log = ConversationLog::new();

        let (id, content) = pipeline.prepare(&mut log, "Hello", None);

        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].id, id);
        assert_eq!(content, "Hello");
    }
}
