//! cyberbot_core - intent classification for the cybersecurity assistant
//!
//! Turns a line of free text into an intent, a confidence and any task or
//! reminder details it carries. Rule-based, deterministic, no I/O at
//! classification time.
//!
//! Modules:
//! - normalizer: Input cleanup (case, punctuation, whitespace)
//! - catalog: Pattern rules, task/time keyword tables, YAML/JSON loading
//! - scorer: Weighted rule scoring, contextual bonuses, tie-breaking
//! - extractor: Task titles, task references, reminder times
//! - engine: The classification pipeline and shared default engine
//! - intent: Intent kinds and the classification result
//! - reminder: Reminder labels and due-time calculation
//! - error: Catalog construction errors

pub mod catalog;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod intent;
pub mod normalizer;
pub mod reminder;
pub mod scorer;

// Re-export key types for convenience
pub use catalog::{Catalog, CatalogConfig, PatternSpec, TaskDescription, TaskKeyword, TimeKeyword};

pub use engine::{default_engine, EngineOptions, IntentEngine};

pub use error::{CatalogError, Result};

pub use extractor::{Extraction, ParameterExtractor, TimeOverridePolicy};

pub use intent::{IntentKind, IntentResult, PARAM_ORIGINAL_INPUT, PARAM_REMINDER_TIME, PARAM_TASK_REFERENCE};

pub use normalizer::normalize;

pub use reminder::{DelayUnit, ParseReminderError, ReminderDelay};

pub use scorer::{IntentScorer, ScoreBreakdown, Scored};
