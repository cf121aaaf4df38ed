//! Parameter Extractor
//!
//! Pulls task titles, task references and reminder times out of normalized
//! text once the intent is known. Dictionary lookups come first, then
//! ordered regex templates; the first template that captures wins.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{compile_insensitive, Catalog};
use crate::error::Result;
use crate::intent::{IntentKind, PARAM_ORIGINAL_INPUT, PARAM_REMINDER_TIME, PARAM_TASK_REFERENCE};
use crate::reminder::{DelayUnit, ReminderDelay};

/// Words that end a custom task title ("... in 3 days", "... by friday")
const TITLE_STOP: &str = r"(?:\s+(?:in|tomorrow|next|for|by)|\s*$)";

/// Phrases that introduce a custom task title, highest priority first
const TITLE_TRIGGERS: &[&str] = &[
    "add task (?:to )?",
    "create task (?:to )?",
    "remind me to ",
    "set (?:a )?reminder (?:to )?",
    "new task (?:to )?",
    "task (?:to )?",
];

const REFERENCE_TEMPLATES: &[&str] = &[
    r#"(?:complete|finish|done with|delete|remove) (?:task )?['"]?(.+?)['"]?$"#,
    r"(?:complete|finish|done with|delete|remove) (.+?)(?:\s+task)?$",
];

const TRAILING_FILLER: &[&str] = &[r"\s+reminder\s*$", r"\s+today\s*$", r"\s+now\s*$"];

const TIME_TEMPLATES: &[(&str, DelayUnit)] = &[
    (r"in (\d+) days?", DelayUnit::Day),
    (r"in (\d+) weeks?", DelayUnit::Week),
    (r"in (\d+) hours?", DelayUnit::Hour),
    (r"(\d+) days? from now", DelayUnit::Day),
    (r"(\d+) weeks? from now", DelayUnit::Week),
];

/// Custom titles this short are ignored and the next template is tried
const MIN_TITLE_CHARS: usize = 3;

/// What happens when both a time keyword and a numeric expression match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeOverridePolicy {
    /// The numeric expression wins `reminder_time` ("remind me in 2 weeks"
    /// gives "In 2 weeks" even though "week" matched first). The
    /// `reminder_time` parameter only ever holds the keyword label.
    #[default]
    RegexOverwrites,
    /// Like `RegexOverwrites`, but the `reminder_time` parameter follows
    /// the numeric label too
    RegexOverwritesSynced,
    /// A keyword match is final; numeric expressions only fill a gap
    KeywordFirst,
}

impl fmt::Display for TimeOverridePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOverridePolicy::RegexOverwrites => f.write_str("regex-overwrites"),
            TimeOverridePolicy::RegexOverwritesSynced => f.write_str("regex-overwrites-synced"),
            TimeOverridePolicy::KeywordFirst => f.write_str("keyword-first"),
        }
    }
}

impl FromStr for TimeOverridePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "regex-overwrites" => Ok(TimeOverridePolicy::RegexOverwrites),
            "regex-overwrites-synced" => Ok(TimeOverridePolicy::RegexOverwritesSynced),
            "keyword-first" => Ok(TimeOverridePolicy::KeywordFirst),
            other => Err(format!("unknown time policy: {}", other)),
        }
    }
}

/// Fields pulled out of one line of text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub task_title: Option<String>,
    pub task_description: Option<String>,
    pub reminder_time: Option<String>,
    pub parameters: BTreeMap<String, String>,
}

struct TimeTemplate {
    regex: Regex,
    unit: DelayUnit,
}

/// Compiled extraction templates
pub struct ParameterExtractor {
    title_templates: Vec<Regex>,
    reference_templates: Vec<Regex>,
    trailing_filler: Vec<Regex>,
    time_templates: Vec<TimeTemplate>,
    policy: TimeOverridePolicy,
}

impl ParameterExtractor {
    pub fn new(policy: TimeOverridePolicy) -> Result<Self> {
        let title_templates = TITLE_TRIGGERS
            .iter()
            .map(|trigger| compile_insensitive(&format!("{}(.+?){}", trigger, TITLE_STOP)))
            .collect::<Result<Vec<_>>>()?;

        let reference_templates = REFERENCE_TEMPLATES
            .iter()
            .map(|p| compile_insensitive(p))
            .collect::<Result<Vec<_>>>()?;

        let trailing_filler = TRAILING_FILLER
            .iter()
            .map(|p| compile_insensitive(p))
            .collect::<Result<Vec<_>>>()?;

        let time_templates = TIME_TEMPLATES
            .iter()
            .map(|&(p, unit)| Ok(TimeTemplate { regex: compile_insensitive(p)?, unit }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title_templates,
            reference_templates,
            trailing_filler,
            time_templates,
            policy,
        })
    }

    /// Extract everything relevant to `kind` from normalized text.
    /// Time information is looked for regardless of the intent.
    pub fn extract(&self, catalog: &Catalog, text: &str, kind: IntentKind) -> Extraction {
        let mut out = Extraction::default();

        if kind.creates_task() {
            self.extract_task(catalog, text, &mut out);
        } else if kind.targets_task() {
            if let Some(reference) = self.task_reference(text) {
                out.parameters.insert(PARAM_TASK_REFERENCE.into(), reference);
            }
        }

        self.extract_time(catalog, text, &mut out);
        out
    }

    fn extract_task(&self, catalog: &Catalog, text: &str, out: &mut Extraction) {
        if let Some(task) = catalog.predefined_task(text) {
            out.task_title = Some(task.title.clone());
            out.task_description = Some(catalog.describe_task(&task.title));
        } else if let Some(raw) = self.custom_title(text) {
            let title = title_case(&raw);
            out.task_description = Some(format!("Complete: {}", title));
            out.task_title = Some(title);
        }

        out.parameters.insert(PARAM_ORIGINAL_INPUT.into(), text.to_string());
    }

    /// First template capture that is long enough, with filler stripped
    pub fn custom_title(&self, text: &str) -> Option<String> {
        self.title_templates.iter().find_map(|re| {
            let captured = re.captures(text)?.get(1)?.as_str().trim();
            if captured.chars().count() < MIN_TITLE_CHARS {
                return None;
            }
            Some(self.strip_filler(captured))
        })
    }

    fn strip_filler(&self, title: &str) -> String {
        let mut title = title.trim().to_string();
        for re in &self.trailing_filler {
            title = re.replace(&title, "").trim().to_string();
        }
        title
    }

    /// Which task a complete/delete request points at
    pub fn task_reference(&self, text: &str) -> Option<String> {
        self.reference_templates.iter().find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
    }

    fn extract_time(&self, catalog: &Catalog, text: &str, out: &mut Extraction) {
        if let Some(keyword) = catalog.first_time_keyword(text) {
            out.parameters.insert(PARAM_REMINDER_TIME.into(), keyword.label.clone());
            out.reminder_time = Some(keyword.label.clone());
            if self.policy == TimeOverridePolicy::KeywordFirst {
                return;
            }
        }

        if let Some(delay) = self.numeric_delay(text) {
            let label = delay.label();
            if let Some(previous) = out.reminder_time.as_deref() {
                if previous != label {
                    log::debug!("numeric time '{}' replaces keyword time '{}'", label, previous);
                }
            }
            if self.policy == TimeOverridePolicy::RegexOverwritesSynced {
                out.parameters.insert(PARAM_REMINDER_TIME.into(), label.clone());
            }
            out.reminder_time = Some(label);
        }
    }

    /// First numeric time expression ("in 3 days", "2 weeks from now")
    pub fn numeric_delay(&self, text: &str) -> Option<ReminderDelay> {
        self.time_templates.iter().find_map(|template| {
            let amount = template.regex.captures(text)?.get(1)?.as_str().parse().ok()?;
            Some(ReminderDelay::new(amount, template.unit))
        })
    }
}

/// Upper-case the first letter of every word, lower-case the rest
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
