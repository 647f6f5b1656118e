pub mod gemini;
pub mod generator;

pub use gemini::GeminiClient;
pub use generator::{GenerationOptions, TextGenerator};
