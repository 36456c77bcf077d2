// Provider implementations for the generation service
pub mod gemini;

pub use gemini::GeminiProvider;
