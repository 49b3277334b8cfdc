// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use munch_core::Entry;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// One meal as shown to the user
#[derive(Debug, Serialize)]
pub struct MealCard {
    address: String,
    time: Option<String>,
    submitted_at: u64,
    what: String,
    #[serde(rename = "where")]
    place: String,
    why: String,
}

impl From<&Entry> for MealCard {
    fn from(entry: &Entry) -> Self {
        Self {
            address: entry.submitter.to_string(),
            time: entry.submitted_at_utc().map(|t| t.to_rfc3339()),
            submitted_at: entry.submitted_at,
            what: entry.what.clone(),
            place: entry.place.clone(),
            why: entry.why.clone(),
        }
    }
}

impl fmt::Display for MealCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Address: {}", self.address)?;
        match &self.time {
            Some(time) => writeln!(f, "Time:    {}", time)?,
            None => writeln!(f, "Time:    {} (unix)", self.submitted_at)?,
        }
        writeln!(f, "What:    {}", self.what)?;
        writeln!(f, "Where:   {}", self.place)?;
        write!(f, "Why:     {}", self.why)
    }
}

/// Print a single item
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}\n", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No meals yet");
            }
            for item in items {
                println!("{}\n", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

pub fn cards(entries: &[Entry]) -> Vec<MealCard> {
    entries.iter().map(MealCard::from).collect()
}
