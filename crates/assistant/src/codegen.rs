//! Code-generation variant of the chat pipeline: wraps the description in a
//! synthesis prompt and pulls the first fenced block out of the reply.

use providers::{GenerationOptions, TextGenerator};
use regex::Regex;
use std::sync::Arc;

/// Shown in place of generated code when the generation call fails.
pub const CODE_ERROR_FALLBACK: &str = "An error occurred while generating the code.";

/// Language choices offered by the code tab.
pub const LANGUAGES: &[&str] = &["javascript", "python", "java", "typescript", "csharp"];

#[derive(Debug, Clone)]
pub struct CodeOutcome {
    pub code: String,
    /// Raw error text when the call failed.
    pub error: Option<String>,
}

pub struct CodeGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl CodeGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn build_prompt(language: &str, description: &str) -> String {
        format!(
            "Generate {} code for the following description: {}",
            language, description
        )
    }

    /// One attempt with default options; failures collapse into the fixed
    /// sentinel and never propagate.
    pub async fn generate(&self, description: &str, language: &str) -> CodeOutcome {
        let prompt = Self::build_prompt(language, description);
        match self
            .generator
            .generate(&prompt, &GenerationOptions::default())
            .await
        {
            Ok(raw) => CodeOutcome {
                code: extract_code(&raw),
                error: None,
            },
            Err(e) => {
                tracing::warn!("code generation failed: {:#}", e);
                CodeOutcome {
                    code: CODE_ERROR_FALLBACK.to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Return the inner text of the first triple-backtick fenced region, with
/// the optional language tag line dropped and surrounding whitespace
/// trimmed. Text without a complete fence passes through unchanged.
pub fn extract_code(raw: &str) -> String {
    let fence = Regex::new(r"(?s)```.*?\n(.*?)```").unwrap();
    match fence.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingGenerator {
        reply: Option<String>,
        last_prompt: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> anyhow::Result<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(anyhow::anyhow!("backend unavailable")),
            }
        }
    }

    #[test]
    fn test_extract_code_returns_fenced_inner_text() {
        let raw = "intro ```js\nconsole.log(1)\n``` outro";
        assert_eq!(extract_code(raw), "console.log(1)");
    }

    #[test]
    fn test_extract_code_without_language_tag() {
        let raw = "```\nfn main() {}\n```";
        assert_eq!(extract_code(raw), "fn main() {}");
    }

    #[test]
    fn test_extract_code_takes_first_of_several_fences() {
        let raw = "```py\nfirst\n```\ntext\n```js\nsecond\n```";
        assert_eq!(extract_code(raw), "first");
    }

    #[test]
    fn test_extract_code_passes_unfenced_text_through() {
        let raw = "no code here, just prose";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn test_extract_code_ignores_unterminated_fence() {
        let raw = "```js\nconsole.log(1)";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn test_build_prompt_embeds_language_and_description() {
        assert_eq!(
            CodeGenerator::build_prompt("python", "a fizzbuzz function"),
            "Generate python code for the following description: a fizzbuzz function"
        );
    }

    #[tokio::test]
    async fn test_generate_extracts_code_from_reply() {
        let generator = Arc::new(RecordingGenerator {
            reply: Some("Sure!\n```python\nprint(1)\n```".to_string()),
            last_prompt: Mutex::new(None),
        });
        let codegen = CodeGenerator::new(generator.clone());

        let outcome = codegen.generate("print one", "python").await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.code, "print(1)");
        assert_eq!(
            generator.last_prompt.lock().unwrap().as_deref(),
            Some("Generate python code for the following description: print one")
        );
    }

    #[tokio::test]
    async fn test_generate_failure_returns_sentinel() {
        let codegen = CodeGenerator::new(Arc::new(RecordingGenerator {
            reply: None,
            last_prompt: Mutex::new(None),
        }));

        let outcome = codegen.generate("anything", "java").await;

        assert_eq!(outcome.code, CODE_ERROR_FALLBACK);
        assert!(outcome.error.is_some());
    }
}
