pub mod config;
pub mod gemini;
pub mod labeler;
pub mod prompt;

pub use config::GeminiConfig;
pub use gemini::{classify_response, GeminiClient, GenerativeBackend, RawResponse, ResponseOutcome, TransportError};
pub use labeler::{LabelStats, Labeler, LabelerSettings};
