//! Intent Engine
//!
//! Entry point tying the pipeline together:
//! normalize → score → extract → assemble an [`IntentResult`].
//!
//! Everything expensive (catalog compilation, template regexes) happens in
//! the constructor. `classify` only reads, so one engine can be shared
//! across threads.

use lazy_static::lazy_static;
use std::path::Path;

use crate::catalog::{Catalog, CatalogConfig};
use crate::error::Result;
use crate::extractor::{Extraction, ParameterExtractor, TimeOverridePolicy};
use crate::intent::IntentResult;
use crate::normalizer::normalize;
use crate::scorer::{IntentScorer, ScoreBreakdown, Scored};

/// Tunables fixed at construction time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub time_policy: TimeOverridePolicy,
}

/// Classifies free text into an intent plus extracted parameters
pub struct IntentEngine {
    catalog: Catalog,
    extractor: ParameterExtractor,
    options: EngineOptions,
}

impl IntentEngine {
    pub fn new(catalog: Catalog) -> Result<Self> {
        Self::with_options(catalog, EngineOptions::default())
    }

    pub fn with_options(catalog: Catalog, options: EngineOptions) -> Result<Self> {
        let extractor = ParameterExtractor::new(options.time_policy)?;
        Ok(Self {
            catalog,
            extractor,
            options,
        })
    }

    /// Engine over the built-in cybersecurity catalog
    pub fn builtin() -> Result<Self> {
        Self::new(Catalog::builtin()?)
    }

    pub fn from_config(config: CatalogConfig, options: EngineOptions) -> Result<Self> {
        Self::with_options(Catalog::from_config(config)?, options)
    }

    /// Engine over a YAML or JSON catalog file
    pub fn load<P: AsRef<Path>>(path: P, options: EngineOptions) -> Result<Self> {
        Self::with_options(Catalog::load(path)?, options)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Classify one line of text. Never fails: input without evidence
    /// comes back as `General` with confidence 0.
    pub fn classify(&self, text: &str) -> IntentResult {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return IntentResult::general();
        }

        let scored = IntentScorer::new(&self.catalog).score(&normalized);
        let extraction = self.extractor.extract(&self.catalog, &normalized, scored.kind);

        log::debug!(
            "classified '{}' as {} ({:.2})",
            normalized,
            scored.kind,
            scored.confidence
        );

        assemble(scored, extraction)
    }

    /// Per-intent totals for the normalized text, bonuses included
    pub fn explain(&self, text: &str) -> ScoreBreakdown {
        IntentScorer::new(&self.catalog).breakdown(&normalize(text))
    }
}

fn assemble(scored: Scored, extraction: Extraction) -> IntentResult {
    IntentResult {
        kind: scored.kind,
        confidence: scored.confidence,
        task_title: extraction.task_title,
        task_description: extraction.task_description,
        reminder_time: extraction.reminder_time,
        parameters: extraction.parameters,
    }
}

lazy_static! {
    static ref DEFAULT_ENGINE: IntentEngine =
        IntentEngine::builtin().expect("built-in catalog must compile");
}

/// Shared engine over the built-in catalog, compiled on first use
pub fn default_engine() -> &'static IntentEngine {
    &DEFAULT_ENGINE
}
