//! Intent kinds and the classification result handed back to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::reminder::ReminderDelay;

/// Parameter key holding the normalized input (task intents only)
pub const PARAM_ORIGINAL_INPUT: &str = "original_input";
/// Parameter key holding the captured task reference (complete/delete)
pub const PARAM_TASK_REFERENCE: &str = "task_reference";
/// Parameter key holding the canonical reminder label
pub const PARAM_REMINDER_TIME: &str = "reminder_time";

/// What the user most likely wants.
///
/// Declaration order is part of the contract: when two intents score the
/// same, the one listed first wins. [`IntentKind::ALL`] and
/// [`IntentKind::rank`] expose that order explicitly.
///
/// Serialized as snake_case; catalogs may also spell intents in kebab-case
/// or PascalCase (see the `FromStr` impl).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum IntentKind {
    AddTask,
    StartQuiz,
    ShowActivity,
    ShowTasks,
    SecurityAdvice,
    General,
    CompleteTask,
    DeleteTask,
    SetReminder,
    Help,
}

impl IntentKind {
    pub const COUNT: usize = 10;

    /// Every intent, in tie-break order
    pub const ALL: [IntentKind; Self::COUNT] = [
        IntentKind::AddTask,
        IntentKind::StartQuiz,
        IntentKind::ShowActivity,
        IntentKind::ShowTasks,
        IntentKind::SecurityAdvice,
        IntentKind::General,
        IntentKind::CompleteTask,
        IntentKind::DeleteTask,
        IntentKind::SetReminder,
        IntentKind::Help,
    ];

    /// Position in the tie-break order (0 wins over 1)
    pub fn rank(self) -> usize {
        match self {
            IntentKind::AddTask => 0,
            IntentKind::StartQuiz => 1,
            IntentKind::ShowActivity => 2,
            IntentKind::ShowTasks => 3,
            IntentKind::SecurityAdvice => 4,
            IntentKind::General => 5,
            IntentKind::CompleteTask => 6,
            IntentKind::DeleteTask => 7,
            IntentKind::SetReminder => 8,
            IntentKind::Help => 9,
        }
    }

    /// Stable snake_case name, as used in catalogs and CLI output
    pub fn as_str(self) -> &'static str {
        match self {
            IntentKind::AddTask => "add_task",
            IntentKind::StartQuiz => "start_quiz",
            IntentKind::ShowActivity => "show_activity",
            IntentKind::ShowTasks => "show_tasks",
            IntentKind::SecurityAdvice => "security_advice",
            IntentKind::General => "general",
            IntentKind::CompleteTask => "complete_task",
            IntentKind::DeleteTask => "delete_task",
            IntentKind::SetReminder => "set_reminder",
            IntentKind::Help => "help",
        }
    }

    /// Human-readable description shown by front-ends
    pub fn description(self) -> &'static str {
        match self {
            IntentKind::AddTask => "Add a new cybersecurity task",
            IntentKind::StartQuiz => "Start the cybersecurity quiz",
            IntentKind::ShowActivity => "Display activity log",
            IntentKind::ShowTasks => "Show current tasks",
            IntentKind::SecurityAdvice => "Provide security advice",
            IntentKind::General => "General conversation",
            IntentKind::CompleteTask => "Mark a task as completed",
            IntentKind::DeleteTask => "Delete a task",
            IntentKind::SetReminder => "Set a reminder",
            IntentKind::Help => "Show help information",
        }
    }

    /// Intents that carry a task title/description
    pub fn creates_task(self) -> bool {
        matches!(self, IntentKind::AddTask | IntentKind::SetReminder)
    }

    /// Intents that refer to an existing task
    pub fn targets_task(self) -> bool {
        matches!(self, IntentKind::CompleteTask | IntentKind::DeleteTask)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentKind {
    type Err = CatalogError;

    /// Accepts `add_task`, `add-task` and `AddTask` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        IntentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().replace('_', "") == wanted)
            .ok_or_else(|| CatalogError::UnknownIntent(s.to_string()))
    }
}

impl TryFrom<String> for IntentKind {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Outcome of classifying one line of text.
///
/// Optional fields stay `None` when nothing was extracted, so "not found"
/// and "found but empty" remain distinguishable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub kind: IntentKind,
    /// Confidence in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

impl IntentResult {
    /// The no-evidence result: `General` with zero confidence
    pub fn general() -> Self {
        Self {
            kind: IntentKind::General,
            confidence: 0.0,
            task_title: None,
            task_description: None,
            reminder_time: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn task_reference(&self) -> Option<&str> {
        self.param(PARAM_TASK_REFERENCE)
    }

    /// Parsed form of `reminder_time`, if it holds a canonical label
    pub fn reminder_delay(&self) -> Option<ReminderDelay> {
        self.reminder_time.as_deref().and_then(|label| label.parse().ok())
    }
}

impl Default for IntentResult {
    fn default() -> Self {
        Self::general()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_declaration_order() {
        for (i, kind) in IntentKind::ALL.iter().enumerate() {
            assert_eq!(kind.rank(), i, "{kind} out of order");
        }
    }

    #[test]
    fn test_ord_agrees_with_rank() {
        let mut shuffled = vec![IntentKind::Help, IntentKind::General, IntentKind::AddTask];
        shuffled.sort();
        assert_eq!(shuffled, vec![IntentKind::AddTask, IntentKind::General, IntentKind::Help]);
    }

    #[test]
    fn test_from_str_spellings() {
        assert_eq!("add_task".parse::<IntentKind>().unwrap(), IntentKind::AddTask);
        assert_eq!("SetReminder".parse::<IntentKind>().unwrap(), IntentKind::SetReminder);
        assert_eq!("security-advice".parse::<IntentKind>().unwrap(), IntentKind::SecurityAdvice);
        assert!("launch_rocket".parse::<IntentKind>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in IntentKind::ALL {
            assert_eq!(kind.to_string().parse::<IntentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_deserialize_accepts_any_spelling() {
        let kinds: Vec<IntentKind> =
            serde_json::from_str(r#"["add_task", "security-advice", "ShowTasks"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![IntentKind::AddTask, IntentKind::SecurityAdvice, IntentKind::ShowTasks]
        );

        let err = serde_json::from_str::<IntentKind>(r#""launch_rocket""#).unwrap_err();
        assert!(err.to_string().contains("unknown intent: launch_rocket"), "{}", err);
    }

    #[test]
    fn test_general_result_is_empty() {
        let result = IntentResult::general();
        assert_eq!(result.kind, IntentKind::General);
        assert_eq!(result.confidence, 0.0);
        assert!(result.task_title.is_none());
        assert!(result.parameters.is_empty());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_value(IntentResult::general()).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "general", "confidence": 0.0}));
    }
}
