//! reply_core - Core types for the smart reply pipeline
//!
//! This crate provides the foundational types shared by the LLM and engine crates:
//! - `language` - Target language of a generation request
//! - `request` - GenerationRequest and suggestion count resolution
//! - `preset` - Instruction presets and their normalization from stored records
//! - `config` - Settings, the `ConfigStore` read port and its adapters
//! - `paths` - Location of the on-disk configuration

pub mod config;
pub mod language;
pub mod paths;
pub mod preset;
pub mod request;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigStore, JsonFileConfigStore, MemoryConfigStore, Settings, SETTINGS_KEYS,
};
pub use language::Language;
pub use preset::{presets_from_record, InstructionPreset};
pub use request::{
    count_from_value, resolve_suggestion_count, GenerationRequest, DEFAULT_SUGGESTION_COUNT,
    MAX_SUGGESTIONS, MIN_SUGGESTIONS,
};
