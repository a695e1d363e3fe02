//! The world schema: one table of field descriptors drives both the JSON schema
//! sent to the backend and the validation of whatever comes back.

use std::collections::HashMap;

use ai_client::{extract_json_object, strip_code_blocks};
use schemars::schema::{
    ArrayValidation, InstanceType, Metadata, NumberValidation, ObjectValidation, Schema,
    SchemaObject, SingleOrVec,
};
use serde_json::{Map, Value};

use crate::error::{GenerationError, SchemaValidationError};
use crate::world::World;

/// Shape of a single world field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-blank string
    Text,
    /// Non-negative integer
    Count,
    /// Ordered list of non-blank strings
    TextList,
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Count => "non-negative integer",
            FieldKind::TextList => "array of strings",
        }
    }
}

/// One row of the world schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Lists only: at least one entry required.
    pub non_empty: bool,
    /// Values rejected case-insensitively.
    pub forbidden: &'static [&'static str],
    /// Generation hint passed to the model as the field description.
    pub hint: &'static str,
}

/// Planet names the builder keeps reaching for.
pub const GENERIC_PLANET_NAMES: &[&str] = &["Earth", "Futura", "Terra", "Gaia", "Mars", "Planet X"];

pub const WORLD_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "planet",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: GENERIC_PLANET_NAMES,
        hint: "This is the planet our world is based on. Examples: Exa, Heras, Titan, Coruscant etc. Be as creative as possible. Do not use simple names like Futura, Earth, etc.",
    },
    FieldDescriptor {
        name: "population",
        kind: FieldKind::Count,
        non_empty: false,
        forbidden: &[],
        hint: "This is the population of the world.",
    },
    FieldDescriptor {
        name: "characteristics",
        kind: FieldKind::TextList,
        non_empty: true,
        forbidden: &[],
        hint: "These are the characteristics of the world. Examples: Magical, Advanced, Peaceful, Wartorn, Abundant, etc. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "religions",
        kind: FieldKind::TextList,
        non_empty: false,
        forbidden: &[],
        hint: "These are the religions followed by the people in the world. Examples: Sun Worship, Airbenders, etc.",
    },
    FieldDescriptor {
        name: "scandals",
        kind: FieldKind::TextList,
        non_empty: false,
        forbidden: &[],
        hint: "These are the current scandals in the world. Think bollywood drama. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "wars",
        kind: FieldKind::TextList,
        non_empty: false,
        forbidden: &[],
        hint: "These are the old wars in the world. Think of how the world was shaped by these wars. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "drugs",
        kind: FieldKind::TextList,
        non_empty: false,
        forbidden: &[],
        hint: "These are the drugs the people in the world use. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "climate",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the climate of the world. Examples: Tropical, Desert, Arctic, etc.",
    },
    FieldDescriptor {
        name: "cities",
        kind: FieldKind::TextList,
        non_empty: true,
        forbidden: &[],
        hint: "These are the names of the cities in the world. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "languages",
        kind: FieldKind::TextList,
        non_empty: true,
        forbidden: &[],
        hint: "These are the languages spoken in the world. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "history",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the history of the world. Be as creative as possible. Use events, wars, etc. to make it interesting. Make it at least 100000 years old. Provide a detailed history.",
    },
    FieldDescriptor {
        name: "technology",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the technology used in the world. Provide details. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "economy",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the economy of the world. Provide details. Be as creative as possible.",
    },
    FieldDescriptor {
        name: "timeline",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the timeline of the world.",
    },
    FieldDescriptor {
        name: "power_structure",
        kind: FieldKind::Text,
        non_empty: true,
        forbidden: &[],
        hint: "This is the power structure of the world.",
    },
];

/// Entry point for the world schema.
pub struct WorldSchema;

impl WorldSchema {
    pub fn fields() -> &'static [FieldDescriptor] {
        WORLD_FIELDS
    }

    pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
        WORLD_FIELDS.iter().find(|f| f.name == name)
    }

    /// JSON schema for a world, built from [`WORLD_FIELDS`].
    pub fn json_schema() -> Value {
        let mut object = ObjectValidation::default();
        for field in WORLD_FIELDS {
            object
                .properties
                .insert(field.name.to_string(), property_schema(field));
            object.required.insert(field.name.to_string());
        }

        let root = SchemaObject {
            metadata: Some(Box::new(Metadata {
                title: Some("World".to_string()),
                ..Default::default()
            })),
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(object)),
            ..Default::default()
        };

        serde_json::to_value(root).unwrap_or_default()
    }

    /// Check a candidate field by field, in schema order.
    pub fn validate(candidate: &Value) -> Result<World, SchemaValidationError> {
        let object = candidate
            .as_object()
            .ok_or(SchemaValidationError::NotAnObject {
                found: json_type(candidate),
            })?;

        let mut values = HashMap::with_capacity(WORLD_FIELDS.len());
        for field in WORLD_FIELDS {
            values.insert(field.name, check_field(object, field)?);
        }

        let mut fields = CheckedFields(values);
        Ok(World {
            planet: fields.text("planet"),
            population: fields.count("population"),
            characteristics: fields.list("characteristics"),
            religions: fields.list("religions"),
            scandals: fields.list("scandals"),
            wars: fields.list("wars"),
            drugs: fields.list("drugs"),
            climate: fields.text("climate"),
            cities: fields.list("cities"),
            languages: fields.list("languages"),
            history: fields.text("history"),
            technology: fields.text("technology"),
            economy: fields.text("economy"),
            timeline: fields.text("timeline"),
            power_structure: fields.text("power_structure"),
        })
    }

    /// Parse raw backend output (possibly fenced or wrapped in prose) and validate it.
    pub fn parse(raw: &str) -> Result<World, GenerationError> {
        let stripped = strip_code_blocks(raw);
        if stripped.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let value: Value = match serde_json::from_str(stripped) {
            Ok(value) => value,
            Err(err) => match extract_json_object(stripped) {
                Some(inner) => serde_json::from_str(inner)?,
                None => return Err(err.into()),
            },
        };

        Ok(Self::validate(&value)?)
    }
}

fn property_schema(field: &FieldDescriptor) -> Schema {
    let mut schema = SchemaObject {
        metadata: Some(Box::new(Metadata {
            description: Some(field.hint.to_string()),
            ..Default::default()
        })),
        ..Default::default()
    };

    match field.kind {
        FieldKind::Text => {
            schema.instance_type = Some(InstanceType::String.into());
        }
        FieldKind::Count => {
            schema.instance_type = Some(InstanceType::Integer.into());
            schema.number = Some(Box::new(NumberValidation {
                minimum: Some(0.0),
                ..Default::default()
            }));
        }
        FieldKind::TextList => {
            let item = SchemaObject {
                instance_type: Some(InstanceType::String.into()),
                ..Default::default()
            };
            schema.instance_type = Some(InstanceType::Array.into());
            schema.array = Some(Box::new(ArrayValidation {
                items: Some(SingleOrVec::Single(Box::new(item.into()))),
                min_items: field.non_empty.then_some(1),
                ..Default::default()
            }));
        }
    }

    Schema::Object(schema)
}

enum FieldValue {
    Text(String),
    Count(u64),
    List(Vec<String>),
}

struct CheckedFields(HashMap<&'static str, FieldValue>);

// Every name asked for here was inserted by `validate` from WORLD_FIELDS.
impl CheckedFields {
    fn text(&mut self, name: &str) -> String {
        match self.0.remove(name) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    fn count(&mut self, name: &str) -> u64 {
        match self.0.remove(name) {
            Some(FieldValue::Count(n)) => n,
            _ => 0,
        }
    }

    fn list(&mut self, name: &str) -> Vec<String> {
        match self.0.remove(name) {
            Some(FieldValue::List(items)) => items,
            _ => Vec::new(),
        }
    }
}

fn check_field(
    object: &Map<String, Value>,
    field: &FieldDescriptor,
) -> Result<FieldValue, SchemaValidationError> {
    let value = match object.get(field.name) {
        None | Some(Value::Null) => {
            return Err(SchemaValidationError::Missing { field: field.name })
        }
        Some(value) => value,
    };

    let wrong_type = || SchemaValidationError::WrongType {
        field: field.name,
        expected: field.kind.expected(),
        found: json_type(value),
    };

    match field.kind {
        FieldKind::Text => {
            let text = value.as_str().ok_or_else(wrong_type)?.trim();
            if text.is_empty() {
                return Err(SchemaValidationError::Empty { field: field.name });
            }
            if let Some(banned) = field
                .forbidden
                .iter()
                .find(|banned| banned.eq_ignore_ascii_case(text))
            {
                return Err(SchemaValidationError::Invalid {
                    field: field.name,
                    reason: format!("`{banned}` is too generic"),
                });
            }
            Ok(FieldValue::Text(text.to_string()))
        }
        FieldKind::Count => check_count(value, field).map(FieldValue::Count),
        FieldKind::TextList => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            if field.non_empty && items.is_empty() {
                return Err(SchemaValidationError::Empty { field: field.name });
            }
            items
                .iter()
                .enumerate()
                .map(|(i, item)| match item.as_str().map(str::trim) {
                    Some(s) if !s.is_empty() => Ok(s.to_string()),
                    _ => Err(SchemaValidationError::Invalid {
                        field: field.name,
                        reason: format!("item {i} must be a non-empty string"),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List)
        }
    }
}

/// Integers, integral floats and digit strings are accepted; negatives are not.
fn check_count(value: &Value, field: &FieldDescriptor) -> Result<u64, SchemaValidationError> {
    let negative = || SchemaValidationError::Invalid {
        field: field.name,
        reason: "must not be negative".to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            if n.as_i64().is_some() {
                return Err(negative());
            }
            match n.as_f64() {
                Some(f) if f < 0.0 => Err(negative()),
                Some(f) if f.is_finite() && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Ok(f as u64)
                }
                _ => Err(SchemaValidationError::Invalid {
                    field: field.name,
                    reason: format!("{n} is not a whole number"),
                }),
            }
        }
        Value::String(s) => {
            let digits: String = s.trim().chars().filter(|c| !matches!(c, ',' | '_')).collect();
            if digits.starts_with('-') && digits[1..].parse::<u64>().is_ok() {
                return Err(negative());
            }
            digits
                .parse::<u64>()
                .map_err(|_| SchemaValidationError::WrongType {
                    field: field.name,
                    expected: field.kind.expected(),
                    found: "string",
                })
        }
        other => Err(SchemaValidationError::WrongType {
            field: field.name,
            expected: field.kind.expected(),
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
