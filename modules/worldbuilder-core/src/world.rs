//! The generated world value.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::SchemaValidationError;
use crate::schema::WorldSchema;

/// A fictional planet and everything known about it.
///
/// Fields are private and there are no setters: a `World` is built once by
/// [`WorldSchema::validate`] and never changes afterwards. Deserializing goes
/// through the same validation, so every `World` in memory satisfies the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct World {
    pub(crate) planet: String,
    pub(crate) population: u64,
    pub(crate) characteristics: Vec<String>,
    pub(crate) religions: Vec<String>,
    pub(crate) scandals: Vec<String>,
    pub(crate) wars: Vec<String>,
    pub(crate) drugs: Vec<String>,
    pub(crate) climate: String,
    pub(crate) cities: Vec<String>,
    pub(crate) languages: Vec<String>,
    pub(crate) history: String,
    pub(crate) technology: String,
    pub(crate) economy: String,
    pub(crate) timeline: String,
    pub(crate) power_structure: String,
}

impl World {
    pub fn planet(&self) -> &str {
        &self.planet
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn characteristics(&self) -> &[String] {
        &self.characteristics
    }

    pub fn religions(&self) -> &[String] {
        &self.religions
    }

    pub fn scandals(&self) -> &[String] {
        &self.scandals
    }

    pub fn wars(&self) -> &[String] {
        &self.wars
    }

    pub fn drugs(&self) -> &[String] {
        &self.drugs
    }

    pub fn climate(&self) -> &str {
        &self.climate
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn technology(&self) -> &str {
        &self.technology
    }

    pub fn economy(&self) -> &str {
        &self.economy
    }

    pub fn timeline(&self) -> &str {
        &self.timeline
    }

    pub fn power_structure(&self) -> &str {
        &self.power_structure
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_pretty_json(&self) -> String {
        let mut buf = Vec::new();
        {
            let mut ser =
                serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            if self.serialize(&mut ser).is_err() {
                return String::new();
            }
        }
        String::from_utf8(buf).unwrap_or_default()
    }

    /// The world wrapped in `<world>` tags, for embedding in a system prompt.
    pub fn to_context(&self) -> String {
        format!("<world>\n{}\n</world>", self.to_pretty_json())
    }
}

impl TryFrom<serde_json::Value> for World {
    type Error = SchemaValidationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        WorldSchema::validate(&value)
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
            if items.is_empty() {
                return writeln!(f, "{label}: none");
            }
            writeln!(f, "{label}:")?;
            for item in items {
                writeln!(f, "  - {item}")?;
            }
            Ok(())
        }

        writeln!(f, "Planet: {}", self.planet)?;
        writeln!(f, "Population: {}", self.population)?;
        writeln!(f, "Climate: {}", self.climate)?;
        list(f, "Characteristics", &self.characteristics)?;
        list(f, "Cities", &self.cities)?;
        list(f, "Languages", &self.languages)?;
        list(f, "Religions", &self.religions)?;
        list(f, "Scandals", &self.scandals)?;
        list(f, "Wars", &self.wars)?;
        list(f, "Drugs", &self.drugs)?;
        writeln!(f, "History: {}", self.history)?;
        writeln!(f, "Technology: {}", self.technology)?;
        writeln!(f, "Economy: {}", self.economy)?;
        writeln!(f, "Timeline: {}", self.timeline)?;
        write!(f, "Power structure: {}", self.power_structure)
    }
}
