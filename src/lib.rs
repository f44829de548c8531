pub mod domain;
pub mod models;
pub mod processing;
pub mod repository;
pub mod server;

/// Cosine similarity a semantic match must exceed.
pub const SIMILARITY_THRESHOLD: f32 = 0.55;

/// Fuzzy ratio that lets a low-similarity semantic match through.
pub const FUZZ_THRESHOLD: f64 = 70.0;

/// Minimum token-set ratio for a fuzzy match (inclusive).
pub const TOKEN_SET_THRESHOLD: f64 = 60.0;
