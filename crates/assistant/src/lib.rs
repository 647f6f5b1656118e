pub mod attachments;
pub mod codegen;
pub mod pipeline;

pub use attachments::{Attachment, AttachmentError, ACCEPTED_EXTENSIONS, MAX_ATTACHMENT_BYTES};
pub use codegen::{extract_code, CodeGenerator, CodeOutcome, CODE_ERROR_FALLBACK, LANGUAGES};
pub use pipeline::{ChatPipeline, SubmitOutcome, ANSWER_ERROR_FALLBACK};
