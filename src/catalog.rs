//! Pattern Catalog for cyberbot_core
//!
//! The static tables the classifier votes with: weighted pattern rules,
//! cybersecurity task keywords (with canonical titles and descriptions)
//! and natural-language time keywords. A [`CatalogConfig`] is the plain,
//! serializable form (YAML or JSON); [`Catalog`] is the compiled, read-only
//! form the engine holds. All regexes are compiled here, once.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::intent::IntentKind;

/// Multiplier when the whole text equals a literal phrase
pub const EXACT_MATCH_BONUS: f64 = 1.5;
/// Multiplier when a literal phrase sits on word boundaries
pub const WORD_BOUNDARY_BONUS: f64 = 1.2;

/// Serializable pattern rule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Literal phrase or regex source
    pub pattern: String,
    /// Intent this rule votes for
    pub intent: IntentKind,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Treat `pattern` as a regex instead of a literal phrase
    #[serde(default)]
    pub regex: bool,
}

fn default_weight() -> f64 {
    1.0
}

/// Trigger phrase mapped to a canonical task title
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskKeyword {
    pub phrase: String,
    pub title: String,
}

/// Canonical task title mapped to its longer description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskDescription {
    pub title: String,
    pub description: String,
}

/// Time phrase mapped to a canonical duration label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeKeyword {
    pub phrase: String,
    pub label: String,
}

/// Everything needed to build a [`Catalog`]. Table order is significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
    #[serde(default)]
    pub task_keywords: Vec<TaskKeyword>,
    #[serde(default)]
    pub task_descriptions: Vec<TaskDescription>,
    #[serde(default)]
    pub time_keywords: Vec<TimeKeyword>,
}

impl CatalogConfig {
    /// Parse a catalog from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a catalog from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalog file; `.json` files are read as JSON, anything else as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The compiled-in cybersecurity assistant catalog
    pub fn builtin() -> Self {
        use IntentKind::*;

        let patterns: &[(&str, IntentKind, f64, bool)] = &[
            // Add task
            (r"add\s+(task|reminder)", AddTask, 2.0, true),
            (r"create\s+(task|reminder)", AddTask, 2.0, true),
            (r"set\s+(task|reminder)", AddTask, 2.0, true),
            ("remind me", AddTask, 1.5, false),
            ("new task", AddTask, 1.8, false),
            ("add", AddTask, 1.0, false),
            ("create", AddTask, 1.0, false),
            // Quiz
            ("start quiz", StartQuiz, 2.0, false),
            ("begin quiz", StartQuiz, 2.0, false),
            ("take quiz", StartQuiz, 2.0, false),
            ("quiz", StartQuiz, 1.5, false),
            ("test", StartQuiz, 1.2, false),
            ("game", StartQuiz, 1.0, false),
            ("play", StartQuiz, 1.0, false),
            ("challenge", StartQuiz, 1.0, false),
            // Activity log
            ("show activity", ShowActivity, 2.0, false),
            ("activity log", ShowActivity, 2.0, false),
            ("what have you done", ShowActivity, 2.0, false),
            ("recent actions", ShowActivity, 1.8, false),
            ("history", ShowActivity, 1.5, false),
            ("log", ShowActivity, 1.2, false),
            ("activity", ShowActivity, 1.0, false),
            // Task list
            ("show tasks", ShowTasks, 2.0, false),
            ("view tasks", ShowTasks, 2.0, false),
            ("list tasks", ShowTasks, 2.0, false),
            ("my tasks", ShowTasks, 1.8, false),
            ("tasks", ShowTasks, 1.2, false),
            // Complete task
            (r"complete\s+task", CompleteTask, 2.0, true),
            (r"finish\s+task", CompleteTask, 2.0, true),
            (r"done\s+with", CompleteTask, 1.8, true),
            ("mark complete", CompleteTask, 1.8, false),
            ("completed", CompleteTask, 1.5, false),
            ("finished", CompleteTask, 1.5, false),
            ("done", CompleteTask, 1.0, false),
            // Delete task
            (r"delete\s+task", DeleteTask, 2.0, true),
            (r"remove\s+task", DeleteTask, 2.0, true),
            ("delete", DeleteTask, 1.5, false),
            ("remove", DeleteTask, 1.5, false),
            ("cancel", DeleteTask, 1.2, false),
            // Reminders
            (r"set\s+reminder", SetReminder, 2.0, true),
            (r"add\s+reminder", SetReminder, 2.0, true),
            ("remind me", SetReminder, 1.8, false),
            ("reminder", SetReminder, 1.5, false),
            // Security advice
            ("security advice", SecurityAdvice, 2.0, false),
            ("security tip", SecurityAdvice, 2.0, false),
            ("cybersecurity", SecurityAdvice, 1.8, false),
            ("what should i do", SecurityAdvice, 1.8, false),
            ("how to", SecurityAdvice, 1.5, false),
            ("security", SecurityAdvice, 1.2, false),
            ("protect", SecurityAdvice, 1.2, false),
            ("safe", SecurityAdvice, 1.0, false),
            // Help
            ("help", Help, 2.0, false),
            ("what can you do", Help, 2.0, false),
            ("commands", Help, 1.8, false),
            ("how to use", Help, 1.8, false),
            ("guide", Help, 1.5, false),
            ("instructions", Help, 1.5, false),
        ];

        let task_keywords: &[(&str, &str)] = &[
            ("2fa", "Enable Two-Factor Authentication"),
            ("two factor", "Enable Two-Factor Authentication"),
            ("two-factor", "Enable Two-Factor Authentication"),
            ("mfa", "Enable Multi-Factor Authentication"),
            ("password", "Update Password"),
            ("passwords", "Update Passwords"),
            ("privacy", "Review Privacy Settings"),
            ("privacy settings", "Review Privacy Settings"),
            ("vpn", "Set up VPN"),
            ("backup", "Create Data Backup"),
            ("backups", "Create Data Backups"),
            ("antivirus", "Update Antivirus Software"),
            ("firewall", "Configure Firewall"),
            ("phishing", "Learn About Phishing Protection"),
            ("social engineering", "Study Social Engineering Attacks"),
            ("malware", "Scan for Malware"),
            ("virus", "Scan for Viruses"),
            ("update", "Install Security Updates"),
            ("updates", "Install Security Updates"),
            ("wifi", "Secure WiFi Connection"),
            ("wi-fi", "Secure WiFi Connection"),
            ("email", "Configure Email Security"),
            ("browser", "Update Browser Security"),
            ("cookies", "Manage Browser Cookies"),
            ("encryption", "Enable Data Encryption"),
            ("ssl", "Verify SSL Certificates"),
            ("https", "Use HTTPS Connections"),
            ("patches", "Install Security Patches"),
        ];

        let task_descriptions: &[(&str, &str)] = &[
            ("Enable Two-Factor Authentication", "Set up 2FA on your important accounts to add an extra layer of security protection."),
            ("Enable Multi-Factor Authentication", "Configure MFA to enhance account security with multiple verification methods."),
            ("Update Password", "Change your password to a strong, unique combination using best security practices."),
            ("Update Passwords", "Review and update all your passwords to ensure they meet security standards."),
            ("Review Privacy Settings", "Check and update privacy settings on your accounts, social media, and applications."),
            ("Set up VPN", "Install and configure a VPN service for secure and private internet browsing."),
            ("Create Data Backup", "Back up your important files and data to protect against loss or ransomware."),
            ("Create Data Backups", "Establish a regular backup routine for all critical data and files."),
            ("Update Antivirus Software", "Ensure your antivirus software is current with the latest virus definitions."),
            ("Configure Firewall", "Set up and configure firewall settings to protect your network from threats."),
            ("Learn About Phishing Protection", "Study how to identify and avoid phishing attacks and social engineering."),
            ("Study Social Engineering Attacks", "Learn about social engineering tactics and develop defenses against them."),
            ("Scan for Malware", "Run a comprehensive system scan to detect and remove malicious software."),
            ("Scan for Viruses", "Perform a full antivirus scan to identify and eliminate virus threats."),
            ("Install Security Updates", "Install the latest security patches for your operating system and software."),
            ("Secure WiFi Connection", "Review and improve your WiFi security settings and encryption protocols."),
            ("Configure Email Security", "Set up email security features including spam filtering and encryption."),
            ("Update Browser Security", "Review and update your web browser's security and privacy settings."),
            ("Manage Browser Cookies", "Review and manage browser cookies to protect your online privacy."),
            ("Enable Data Encryption", "Set up encryption for sensitive files and communications."),
            ("Verify SSL Certificates", "Check and verify SSL certificates for secure website connections."),
            ("Use HTTPS Connections", "Ensure you're using secure HTTPS connections for sensitive activities."),
            ("Install Security Patches", "Apply the latest security patches to protect against vulnerabilities."),
        ];

        let time_keywords: &[(&str, &str)] = &[
            ("tomorrow", "In 1 day"),
            ("1 day", "In 1 day"),
            ("one day", "In 1 day"),
            ("next day", "In 1 day"),
            ("3 days", "In 3 days"),
            ("three days", "In 3 days"),
            ("7 days", "In 7 days"),
            ("week", "In 7 days"),
            ("one week", "In 7 days"),
            ("next week", "In 7 days"),
            ("2 weeks", "In 2 weeks"),
            ("two weeks", "In 2 weeks"),
            ("14 days", "In 2 weeks"),
            ("fortnight", "In 2 weeks"),
            ("month", "In 30 days"),
            ("1 month", "In 30 days"),
            ("30 days", "In 30 days"),
        ];

        Self {
            patterns: patterns
                .iter()
                .map(|&(pattern, intent, weight, regex)| PatternSpec {
                    pattern: pattern.into(),
                    intent,
                    weight,
                    regex,
                })
                .collect(),
            task_keywords: task_keywords
                .iter()
                .map(|&(phrase, title)| TaskKeyword {
                    phrase: phrase.into(),
                    title: title.into(),
                })
                .collect(),
            task_descriptions: task_descriptions
                .iter()
                .map(|&(title, description)| TaskDescription {
                    title: title.into(),
                    description: description.into(),
                })
                .collect(),
            time_keywords: time_keywords
                .iter()
                .map(|&(phrase, label)| TimeKeyword {
                    phrase: phrase.into(),
                    label: label.into(),
                })
                .collect(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// How a rule recognises its evidence
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Plain substring, with a precompiled word-boundary probe for the bonus
    Literal { phrase: String, bounded: Regex },
    /// Case-insensitive regex, matched anywhere
    Regex { regex: Regex },
}

/// One compiled scoring unit
#[derive(Clone, Debug)]
pub struct PatternRule {
    pub matcher: Matcher,
    pub intent: IntentKind,
    pub weight: f64,
}

impl PatternRule {
    /// Compile a rule, rejecting bad regexes and weights
    pub fn compile(spec: &PatternSpec) -> Result<Self> {
        if !spec.weight.is_finite() || spec.weight < 0.0 {
            return Err(CatalogError::InvalidWeight {
                pattern: spec.pattern.clone(),
                weight: spec.weight,
            });
        }

        let matcher = if spec.regex {
            Matcher::Regex {
                regex: compile_insensitive(&spec.pattern)?,
            }
        } else {
            let phrase = spec.pattern.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(CatalogError::EmptyPhrase("pattern"));
            }
            let bounded = compile_insensitive(&format!(r"\b{}\b", regex::escape(&phrase)))?;
            Matcher::Literal { phrase, bounded }
        };

        Ok(Self {
            matcher,
            intent: spec.intent,
            weight: spec.weight,
        })
    }

    /// Score contributed by this rule for already-normalized text
    pub fn score(&self, text: &str) -> f64 {
        match &self.matcher {
            Matcher::Regex { regex } => {
                if regex.is_match(text) {
                    self.weight
                } else {
                    0.0
                }
            }
            Matcher::Literal { phrase, bounded } => {
                if !text.contains(phrase.as_str()) {
                    0.0
                } else if text == phrase {
                    self.weight * EXACT_MATCH_BONUS
                } else if bounded.is_match(text) {
                    self.weight * WORD_BOUNDARY_BONUS
                } else {
                    self.weight
                }
            }
        }
    }

    /// Source text of the rule (phrase or regex)
    pub fn pattern(&self) -> &str {
        match &self.matcher {
            Matcher::Literal { phrase, .. } => phrase,
            Matcher::Regex { regex } => regex.as_str(),
        }
    }
}

pub(crate) fn compile_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CatalogError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}

/// Compiled, immutable catalog shared by every classification
#[derive(Clone, Debug)]
pub struct Catalog {
    source: CatalogConfig,
    rules: Vec<PatternRule>,
    task_keywords: Vec<TaskKeyword>,
    /// Indices into `task_keywords`, longest phrase first (stable)
    by_specificity: Vec<usize>,
    task_descriptions: HashMap<String, String>,
    time_keywords: Vec<TimeKeyword>,
}

impl Catalog {
    /// Compile a catalog, failing on the first invalid entry
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let rules = config
            .patterns
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;

        let task_keywords = config
            .task_keywords
            .iter()
            .map(|k| -> Result<TaskKeyword> {
                Ok(TaskKeyword {
                    phrase: clean_phrase(&k.phrase, "task keyword")?,
                    title: k.title.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let time_keywords = config
            .time_keywords
            .iter()
            .map(|k| -> Result<TimeKeyword> {
                Ok(TimeKeyword {
                    phrase: clean_phrase(&k.phrase, "time keyword")?,
                    label: k.label.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut by_specificity: Vec<usize> = (0..task_keywords.len()).collect();
        by_specificity.sort_by(|&a, &b| {
            task_keywords[b]
                .phrase
                .chars()
                .count()
                .cmp(&task_keywords[a].phrase.chars().count())
        });

        let task_descriptions = config
            .task_descriptions
            .iter()
            .map(|d| (d.title.clone(), d.description.clone()))
            .collect();

        log::debug!(
            "compiled catalog: {} rules, {} task keywords, {} time keywords",
            rules.len(),
            task_keywords.len(),
            time_keywords.len()
        );

        Ok(Self {
            source: config,
            rules,
            task_keywords,
            by_specificity,
            task_descriptions,
            time_keywords,
        })
    }

    /// Compile the built-in catalog
    pub fn builtin() -> Result<Self> {
        Self::from_config(CatalogConfig::builtin())
    }

    /// Load and compile a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(CatalogConfig::load(path)?)
    }

    /// The configuration this catalog was compiled from
    pub fn config(&self) -> &CatalogConfig {
        &self.source
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn time_keywords(&self) -> &[TimeKeyword] {
        &self.time_keywords
    }

    /// Most specific (longest) task keyword contained in the text
    pub fn predefined_task(&self, text: &str) -> Option<&TaskKeyword> {
        self.by_specificity
            .iter()
            .map(|&i| &self.task_keywords[i])
            .find(|k| text.contains(k.phrase.as_str()))
    }

    /// First time keyword, in declaration order, contained in the text
    pub fn first_time_keyword(&self, text: &str) -> Option<&TimeKeyword> {
        self.time_keywords
            .iter()
            .find(|k| text.contains(k.phrase.as_str()))
    }

    pub fn contains_task_keyword(&self, text: &str) -> bool {
        self.task_keywords
            .iter()
            .any(|k| text.contains(k.phrase.as_str()))
    }

    pub fn contains_time_keyword(&self, text: &str) -> bool {
        self.first_time_keyword(text).is_some()
    }

    /// Canonical description for a task title
    pub fn describe_task(&self, title: &str) -> String {
        self.task_descriptions
            .get(title)
            .cloned()
            .unwrap_or_else(|| format!("Complete the cybersecurity task: {}", title))
    }
}

fn clean_phrase(phrase: &str, table: &'static str) -> Result<String> {
    let cleaned = phrase.trim().to_lowercase();
    if cleaned.is_empty() {
        return Err(CatalogError::EmptyPhrase(table));
    }
    Ok(cleaned)
}
