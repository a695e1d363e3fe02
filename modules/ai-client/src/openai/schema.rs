use serde_json::Value;

/// Rewrite a JSON schema into the shape OpenAI strict mode accepts.
///
/// OpenAI requires:
/// 1. `additionalProperties: false` on all object schemas
/// 2. ALL properties listed in `required`, even nullable ones
/// 3. Fully inlined schemas (no `$ref` references)
pub fn strict_schema(schema: &Value) -> Value {
    let mut value = schema.clone();

    fix_object_schemas(&mut value);
    inline_refs(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$defs");
        map.remove("$schema");
    }

    value
}

fn fix_object_schemas(value: &mut Value) {
    if let Value::Object(map) = value {
        if map.get("type") == Some(&Value::String("object".to_string())) {
            map.insert("additionalProperties".to_string(), Value::Bool(false));

            if let Some(Value::Object(props)) = map.get("properties") {
                let all_keys: Vec<Value> = props.keys().map(|k| Value::String(k.clone())).collect();
                map.insert("required".to_string(), Value::Array(all_keys));
            }
        }

        for (_, v) in map.iter_mut() {
            fix_object_schemas(v);
        }
    } else if let Value::Array(arr) = value {
        for item in arr.iter_mut() {
            fix_object_schemas(item);
        }
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").or_else(|| map.get("$defs")).cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                let type_name = ref_path
                    .strip_prefix("#/definitions/")
                    .or_else(|| ref_path.strip_prefix("#/$defs/"));
                if let Some(def) = type_name.and_then(|name| definitions.get(name)) {
                    *value = def.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [only] = all_of.as_slice() {
                    *value = only.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn city_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "ruler": { "$ref": "#/definitions/Ruler" },
                "founder": { "allOf": [{ "$ref": "#/definitions/Ruler" }] }
            },
            "required": ["name"],
            "definitions": {
                "Ruler": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "dynasty": { "type": ["string", "null"] }
                    }
                }
            }
        })
    }

    #[test]
    fn test_additional_properties_false() {
        let schema = strict_schema(&city_schema());
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn test_all_properties_required() {
        let schema = strict_schema(&city_schema());
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert!(required.contains(&"name"));
        assert!(required.contains(&"ruler"));
        assert!(required.contains(&"founder"));
    }

    #[test]
    fn test_nested_refs_inlined() {
        let schema = strict_schema(&city_schema());
        let obj = schema.as_object().unwrap();

        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        for key in ["ruler", "founder"] {
            let nested = &schema["properties"][key];
            assert!(nested.get("$ref").is_none(), "{key} still has a $ref");
            assert_eq!(nested["type"], json!("object"));
            assert_eq!(nested["additionalProperties"], json!(false));
            let required = nested["required"].as_array().unwrap();
            assert_eq!(required.len(), 2);
            assert!(required.contains(&json!("dynasty")));
        }
    }

    #[test]
    fn test_input_is_untouched() {
        let original = city_schema();
        let _ = strict_schema(&original);
        assert!(original.get("definitions").is_some());
    }
}
