// cyberbot_core/tests/classify_tests.rs
// End-to-end classification scenarios through the public API

use cyberbot_core::{
    default_engine, CatalogConfig, CatalogError, DelayUnit, EngineOptions, IntentEngine, IntentKind,
    PatternSpec, ReminderDelay, TaskKeyword, TimeOverridePolicy,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn start_quiz_is_recognised() {
    let result = default_engine().classify("start quiz");
    assert_eq!(result.kind, IntentKind::StartQuiz);
    assert!(close(result.confidence, 0.96));
    assert!(result.parameters.is_empty());
}

#[test]
fn reminder_for_known_security_task() {
    let result = default_engine().classify("remind me to enable 2fa tomorrow");
    assert!(matches!(result.kind, IntentKind::SetReminder | IntentKind::AddTask));
    assert_eq!(result.task_title.as_deref(), Some("Enable Two-Factor Authentication"));
    assert_eq!(result.reminder_time.as_deref(), Some("In 1 day"));
    assert_eq!(result.reminder_delay(), Some(ReminderDelay::new(1, DelayUnit::Day)));
}

#[test]
fn greeting_is_general_conversation() {
    let result = default_engine().classify("Hello!");
    assert_eq!(result.kind, IntentKind::General);
    assert!(close(result.confidence, 0.2));
}

#[test]
fn delete_task_carries_reference() {
    let result = default_engine().classify("delete task cleanup old files");
    assert_eq!(result.kind, IntentKind::DeleteTask);
    assert!(close(result.confidence, 0.76));
    assert_eq!(result.task_reference(), Some("cleanup old files"));
    assert!(result.task_title.is_none());
}

#[test]
fn complete_task_carries_reference() {
    let result = default_engine().classify("Complete task \"update antivirus\"");
    assert_eq!(result.kind, IntentKind::CompleteTask);
    // quotes are stripped by normalization before the templates run
    assert_eq!(result.task_reference(), Some("update antivirus"));
}

#[test]
fn more_specific_keyword_wins() {
    let result = default_engine().classify("add task change password and enable two-factor");
    assert_eq!(result.kind, IntentKind::AddTask);
    assert_eq!(result.task_title.as_deref(), Some("Enable Two-Factor Authentication"));
    assert_eq!(
        result.task_description.as_deref(),
        Some("Set up 2FA on your important accounts to add an extra layer of security protection.")
    );
}

#[test]
fn custom_task_title_is_title_cased() {
    let result = default_engine().classify("Add task water the plants in 3 days");
    assert_eq!(result.kind, IntentKind::AddTask);
    assert_eq!(result.task_title.as_deref(), Some("Water The Plants"));
    assert_eq!(result.task_description.as_deref(), Some("Complete: Water The Plants"));
    assert_eq!(result.reminder_time.as_deref(), Some("In 3 days"));
}

#[test]
fn help_and_advice_questions() {
    let help = default_engine().classify("What can you do?");
    assert_eq!(help.kind, IntentKind::Help);

    let advice = default_engine().classify("Any security tips for me?");
    assert_eq!(advice.kind, IntentKind::SecurityAdvice);
}

#[test]
fn show_lists() {
    assert_eq!(default_engine().classify("show activity log").kind, IntentKind::ShowActivity);
    assert_eq!(default_engine().classify("list tasks").kind, IntentKind::ShowTasks);
}

#[test]
fn empty_input_is_general_with_zero_confidence() {
    for text in ["", "    ", "!!!"] {
        let result = default_engine().classify(text);
        assert_eq!(result.kind, IntentKind::General);
        assert_eq!(result.confidence, 0.0);
        assert!(result.parameters.is_empty());
    }
}

#[test]
fn unrecognised_input_is_general_with_zero_confidence() {
    let result = default_engine().classify("purple elephants");
    assert_eq!(result.kind, IntentKind::General);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn numeric_time_overrides_keyword_by_default() {
    let text = "remind me in 2 weeks";
    let result = default_engine().classify(text);
    assert_eq!(result.reminder_time.as_deref(), Some("In 2 weeks"));
    // the keyword label stays in the parameters
    assert_eq!(result.param("reminder_time"), Some("In 7 days"));

    let keyword_first = IntentEngine::from_config(
        CatalogConfig::builtin(),
        EngineOptions {
            time_policy: TimeOverridePolicy::KeywordFirst,
        },
    )
    .unwrap();
    let result = keyword_first.classify(text);
    assert_eq!(result.reminder_time.as_deref(), Some("In 7 days"));
    assert_eq!(result.param("reminder_time"), Some("In 7 days"));
}

#[test]
fn ties_go_to_the_earlier_intent() {
    let config = CatalogConfig {
        patterns: vec![
            PatternSpec {
                pattern: "beta".into(),
                intent: IntentKind::Help,
                weight: 1.0,
                regex: false,
            },
            PatternSpec {
                pattern: "alpha".into(),
                intent: IntentKind::StartQuiz,
                weight: 1.0,
                regex: false,
            },
        ],
        task_keywords: vec![],
        task_descriptions: vec![],
        time_keywords: vec![],
    };
    let engine = IntentEngine::from_config(config, EngineOptions::default()).unwrap();
    assert_eq!(engine.classify("alpha beta").kind, IntentKind::StartQuiz);
}

#[test]
fn custom_catalog_drives_extraction() {
    let config = CatalogConfig {
        patterns: vec![PatternSpec {
            pattern: r"harden\s+router".into(),
            intent: IntentKind::AddTask,
            weight: 3.0,
            regex: true,
        }],
        task_keywords: vec![TaskKeyword {
            phrase: "Router".into(),
            title: "Harden Home Router".into(),
        }],
        task_descriptions: vec![],
        time_keywords: vec![],
    };
    let engine = IntentEngine::from_config(config, EngineOptions::default()).unwrap();
    let result = engine.classify("Harden router this weekend");
    assert_eq!(result.kind, IntentKind::AddTask);
    assert_eq!(result.task_title.as_deref(), Some("Harden Home Router"));
    assert_eq!(
        result.task_description.as_deref(),
        Some("Complete the cybersecurity task: Harden Home Router")
    );
}

#[test]
fn invalid_catalog_is_rejected_up_front() {
    let mut config = CatalogConfig::builtin();
    config.patterns[0].weight = f64::NAN;
    assert!(matches!(
        IntentEngine::from_config(config, EngineOptions::default()),
        Err(CatalogError::InvalidWeight { .. })
    ));
}

#[test]
fn synced_policy_keeps_parameter_in_step() {
    let synced = IntentEngine::from_config(
        CatalogConfig::builtin(),
        EngineOptions {
            time_policy: TimeOverridePolicy::RegexOverwritesSynced,
        },
    )
    .unwrap();

    let result = synced.classify("remind me in 2 weeks");
    assert_eq!(result.reminder_time.as_deref(), Some("In 2 weeks"));
    assert_eq!(result.param("reminder_time"), Some("In 2 weeks"));

    let plain = default_engine().classify("remind me in 5 hours");
    assert_eq!(plain.reminder_time.as_deref(), Some("In 5 hours"));
    assert_eq!(plain.param("reminder_time"), None);
}
