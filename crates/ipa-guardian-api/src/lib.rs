// Wire-level client for the structured-content generation service
pub mod gemini;
pub mod schema;

pub use gemini::{GeminiClient, GeminiError, GenerateContentResponse, DEFAULT_MODEL, GEMINI_API_BASE};
pub use schema::{Schema, SchemaType};
