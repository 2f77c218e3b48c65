// Adapters layer: concrete implementations for external systems (storage, Gemini HTTP).

pub mod gemini;
pub mod storage;
