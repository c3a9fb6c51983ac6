// Adapters layer: concrete implementations for external systems (http backend, csv export).

pub mod export;
pub mod http;
