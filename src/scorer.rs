//! Intent Scorer
//!
//! Runs every catalog rule over normalized text, adds contextual bonuses
//! and picks the winning intent. Ties go to the intent declared first in
//! [`IntentKind`].

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::intent::IntentKind;

/// Score that maps to confidence 1.0
pub const CONFIDENCE_SCALE: f64 = 5.0;

const QUESTION_WORDS: &[&str] = &["what", "how", "why"];
const GREETINGS: &[&str] = &["hello", "hi", "hey"];

/// Per-intent totals, indexed by [`IntentKind::rank`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    totals: [f64; IntentKind::COUNT],
}

impl ScoreBreakdown {
    pub fn get(&self, kind: IntentKind) -> f64 {
        self.totals[kind.rank()]
    }

    fn add(&mut self, kind: IntentKind, amount: f64) {
        self.totals[kind.rank()] += amount;
    }

    /// Totals in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (IntentKind, f64)> + '_ {
        IntentKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Highest total; the earliest declared intent wins ties
    pub fn best(&self) -> (IntentKind, f64) {
        let mut best = (IntentKind::ALL[0], self.totals[0]);
        for (kind, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (kind, score);
            }
        }
        best
    }
}

/// Winning intent with its confidence
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    pub kind: IntentKind,
    pub confidence: f64,
    /// Raw total behind the confidence
    pub score: f64,
}

/// Scores text against a compiled catalog
pub struct IntentScorer<'c> {
    catalog: &'c Catalog,
}

impl<'c> IntentScorer<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Raw rule scores plus contextual bonuses, for every intent
    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let mut scores = ScoreBreakdown::default();

        for rule in self.catalog.rules() {
            let score = rule.score(text);
            if score > 0.0 {
                log::trace!("rule '{}' -> {} +{:.2}", rule.pattern(), rule.intent, score);
                scores.add(rule.intent, score);
            }
        }

        self.apply_contextual_bonuses(text, &mut scores);
        scores
    }

    /// Pick the winning intent. A best total of zero means `General`
    /// with confidence 0.
    pub fn score(&self, text: &str) -> Scored {
        let (kind, score) = self.breakdown(text).best();

        if score <= 0.0 {
            return Scored {
                kind: IntentKind::General,
                confidence: 0.0,
                score: 0.0,
            };
        }

        Scored {
            kind,
            confidence: (score / CONFIDENCE_SCALE).min(1.0),
            score,
        }
    }

    fn apply_contextual_bonuses(&self, text: &str, scores: &mut ScoreBreakdown) {
        // Security topics usually mean the user wants a task
        if self.catalog.contains_task_keyword(text) {
            scores.add(IntentKind::AddTask, 0.5);
            scores.add(IntentKind::SetReminder, 0.3);
        }

        if self.catalog.contains_time_keyword(text) {
            scores.add(IntentKind::AddTask, 0.5);
            scores.add(IntentKind::SetReminder, 0.7);
        }

        if contains_any(text, QUESTION_WORDS) {
            scores.add(IntentKind::SecurityAdvice, 0.5);
            scores.add(IntentKind::Help, 0.3);
        }

        if contains_any(text, GREETINGS) {
            scores.add(IntentKind::General, 1.0);
        }
    }
}

/// Substring test, not word-based: "this" counts as containing "hi"
fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogConfig, PatternSpec};

    fn builtin() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn tiny_catalog(patterns: Vec<(&str, IntentKind, f64)>) -> Catalog {
        Catalog::from_config(CatalogConfig {
            patterns: patterns
                .into_iter()
                .map(|(pattern, intent, weight)| PatternSpec {
                    pattern: pattern.into(),
                    intent,
                    weight,
                    regex: false,
                })
                .collect(),
            task_keywords: vec![],
            task_descriptions: vec![],
            time_keywords: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_start_quiz() {
        let catalog = builtin();
        let scored = IntentScorer::new(&catalog).score("start quiz");
        assert_eq!(scored.kind, IntentKind::StartQuiz);
        // "start quiz" exact (2.0 * 1.5) plus "quiz" on word boundaries (1.5 * 1.2)
        assert!((scored.score - 4.8).abs() < 1e-9);
        assert!((scored.confidence - 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_no_evidence_is_general_zero() {
        let catalog = builtin();
        let scored = IntentScorer::new(&catalog).score("zzz qqq");
        assert_eq!(scored.kind, IntentKind::General);
        assert_eq!(scored.confidence, 0.0);
    }

    #[test]
    fn test_greeting_bonus() {
        let catalog = builtin();
        let scorer = IntentScorer::new(&catalog);
        let breakdown = scorer.breakdown("hello");
        assert_eq!(breakdown.get(IntentKind::General), 1.0);

        let scored = scorer.score("hello");
        assert_eq!(scored.kind, IntentKind::General);
        assert!((scored.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_question_words_bonus() {
        let catalog = builtin();
        let breakdown = IntentScorer::new(&catalog).breakdown("why");
        assert_eq!(breakdown.get(IntentKind::SecurityAdvice), 0.5);
        assert_eq!(breakdown.get(IntentKind::Help), 0.3);
    }

    #[test]
    fn test_keyword_bonuses_stack() {
        let catalog = builtin();
        // "vpn" is a task keyword, "tomorrow" a time keyword; no rule matches
        let breakdown = IntentScorer::new(&catalog).breakdown("vpn tomorrow");
        assert!((breakdown.get(IntentKind::AddTask) - 1.0).abs() < 1e-9);
        assert!((breakdown.get(IntentKind::SetReminder) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_resolves_to_declaration_order() {
        let forward = tiny_catalog(vec![
            ("alpha", IntentKind::Help, 1.0),
            ("beta", IntentKind::ShowTasks, 1.0),
        ]);
        let reversed = tiny_catalog(vec![
            ("beta", IntentKind::ShowTasks, 1.0),
            ("alpha", IntentKind::Help, 1.0),
        ]);

        for catalog in [&forward, &reversed] {
            let scored = IntentScorer::new(catalog).score("alpha beta");
            assert_eq!(scored.kind, IntentKind::ShowTasks);
        }
    }

    #[test]
    fn test_confidence_is_clipped() {
        let catalog = tiny_catalog(vec![("panic", IntentKind::SecurityAdvice, 10.0)]);
        let scored = IntentScorer::new(&catalog).score("panic");
        assert_eq!(scored.kind, IntentKind::SecurityAdvice);
        assert_eq!(scored.confidence, 1.0);
    }

    #[test]
    fn test_breakdown_iterates_in_declaration_order() {
        let catalog = builtin();
        let kinds: Vec<IntentKind> = IntentScorer::new(&catalog)
            .breakdown("help")
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(kinds, IntentKind::ALL.to_vec());
    }
}
