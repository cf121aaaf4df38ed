//! Canonical reminder labels ("In 3 days", "In 2 weeks") and their
//! conversion to concrete due times.

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a reminder delay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Hour,
    Day,
    Week,
}

impl DelayUnit {
    fn singular(self) -> &'static str {
        match self {
            DelayUnit::Hour => "hour",
            DelayUnit::Day => "day",
            DelayUnit::Week => "week",
        }
    }
}

/// A relative reminder such as "In 2 weeks"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDelay {
    pub amount: u32,
    pub unit: DelayUnit,
}

impl ReminderDelay {
    pub fn new(amount: u32, unit: DelayUnit) -> Self {
        Self { amount, unit }
    }

    /// Canonical label; the unit is pluralized only when `amount > 1`
    pub fn label(&self) -> String {
        let plural = if self.amount > 1 { "s" } else { "" };
        format!("In {} {}{}", self.amount, self.unit.singular(), plural)
    }

    /// `None` if the delay does not fit in a `Duration`
    pub fn duration(&self) -> Option<Duration> {
        let amount = i64::from(self.amount);
        match self.unit {
            DelayUnit::Hour => Duration::try_hours(amount),
            DelayUnit::Day => Duration::try_days(amount),
            DelayUnit::Week => Duration::try_weeks(amount),
        }
    }

    /// When the reminder falls due, counting from `now`
    pub fn due_from<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.duration().and_then(|d| now.checked_add_signed(d))
    }
}

impl fmt::Display for ReminderDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Error for labels that are not of the form `In <n> <unit>`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a reminder label: {0}")]
pub struct ParseReminderError(String);

impl FromStr for ReminderDelay {
    type Err = ParseReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseReminderError(s.to_string());
        let lower = s.trim().to_lowercase();
        let mut words = lower.split_whitespace();

        if words.next() != Some("in") {
            return Err(err());
        }
        let amount: u32 = words.next().and_then(|n| n.parse().ok()).ok_or_else(err)?;
        let unit = match words.next() {
            Some("hour") | Some("hours") => DelayUnit::Hour,
            Some("day") | Some("days") => DelayUnit::Day,
            Some("week") | Some("weeks") => DelayUnit::Week,
            _ => return Err(err()),
        };
        if words.next().is_some() {
            return Err(err());
        }

        Ok(Self { amount, unit })
    }
}
