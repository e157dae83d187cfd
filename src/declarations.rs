use std::io;
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

pub fn test_category(id: &str) -> &str {
    id.rsplit_once('_').map_or(id, |(category, _)| category)
}

pub trait DeclarationNormalizer {
    fn normalize(&self, functions: Vec<Value>, category: &str) -> Vec<Value>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassthroughNormalizer;

impl DeclarationNormalizer for PassthroughNormalizer {
    fn normalize(&self, functions: Vec<Value>, _category: &str) -> Vec<Value> {
        functions
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageHintNormalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Python,
    Java,
    JavaScript,
}

impl Language {
    fn from_category(category: &str) -> Self {
        if category.split('_').any(|part| part == "javascript") {
            Self::JavaScript
        } else if category.split('_').any(|part| part == "java") {
            Self::Java
        } else {
            Self::Python
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Self::Python => " Note that the provided function is in Python 3 syntax.",
            Self::Java => " Note that the provided function is in Java 8 SDK syntax.",
            Self::JavaScript => " Note that the provided function is in JavaScript syntax.",
        }
    }

    fn is_list_type(self, type_name: &str) -> bool {
        match self {
            Self::Python => false,
            Self::Java => matches!(type_name, "ArrayList" | "Array"),
            Self::JavaScript => type_name == "array",
        }
    }
}

impl DeclarationNormalizer for LanguageHintNormalizer {
    fn normalize(&self, mut functions: Vec<Value>, category: &str) -> Vec<Value> {
        let language = Language::from_category(category);

        for function in &mut functions {
            let Some(declaration) = function.as_object_mut() else {
                continue;
            };
            if let Some(Value::String(description)) = declaration.get_mut("description") {
                description.push_str(language.hint());
            }
            if language == Language::Python {
                continue;
            }

            let Some(properties) = declaration
                .get_mut("parameters")
                .and_then(|parameters| parameters.get_mut("properties"))
                .and_then(Value::as_object_mut)
            else {
                continue;
            };
            for property in properties.values_mut() {
                if let Some(property) = property.as_object_mut() {
                    stringify_property(property, language);
                }
            }
        }

        functions
    }
}

fn stringify_property(property: &mut Map<String, Value>, language: Language) {
    let type_name = property
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("any")
        .to_string();
    let name = language.display_name();

    let mut note = if type_name == "any" {
        format!(" This parameter can be of any type of {name} object in string representation.")
    } else {
        format!(" This is {name} {type_name} type parameter in string representation.")
    };

    if language.is_list_type(&type_name)
        && let Some(items) = property.remove("items")
    {
        let item_type = items.get("type").and_then(Value::as_str).unwrap_or("any");
        note.push_str(&format!(
            " The list elements are of type {item_type}; they are not in string representation."
        ));
    }

    if language == Language::JavaScript
        && type_name == "dict"
        && let Some(schema) = property.remove("properties")
    {
        note.push_str(&format!(
            " The dictionary entries have the following schema; they are not in string representation. {}",
            to_spaced_json(&schema)
        ));
    }

    match property.get_mut("description") {
        Some(Value::String(description)) => description.push_str(&note),
        _ => {
            property.insert(
                "description".to_string(),
                Value::String(note.trim_start().to_string()),
            );
        }
    }
    property.insert("type".to_string(), Value::String("string".to_string()));
}

// Matches Python's json.dumps: spaced separators, ASCII-only output.
fn to_spaced_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
                continue;
            }
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeclarationNormalizerKind {
    #[default]
    LanguageHints,
    Passthrough,
}

impl DeclarationNormalizer for DeclarationNormalizerKind {
    fn normalize(&self, functions: Vec<Value>, category: &str) -> Vec<Value> {
        match self {
            Self::LanguageHints => LanguageHintNormalizer.normalize(functions, category),
            Self::Passthrough => PassthroughNormalizer.normalize(functions, category),
        }
    }
}

impl FromStr for DeclarationNormalizerKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "language_hints" => Ok(Self::LanguageHints),
            "passthrough" => Ok(Self::Passthrough),
            _ => Err(format!("unknown declaration normalization '{value}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{
        DeclarationNormalizer, LanguageHintNormalizer, PassthroughNormalizer, test_category,
        to_spaced_json,
    };

    fn weather() -> Value {
        json!({
            "name": "get_weather",
            "description": "Get the weather.",
            "parameters": {
                "type": "dict",
                "properties": {
                    "city": {"type": "string", "description": "City name."}
                },
                "required": ["city"]
            }
        })
    }

    #[test]
    fn category_drops_trailing_segment() {
        assert_eq!(test_category("simple_12"), "simple");
        assert_eq!(test_category("live_multiple_3-1-0"), "live_multiple");
        assert_eq!(test_category("java_7"), "java");
        assert_eq!(test_category("noindex"), "noindex");
    }

    #[test]
    fn python_declarations_only_get_a_hint() {
        let out = LanguageHintNormalizer.normalize(vec![weather()], "simple");
        let mut expected = weather();
        expected["description"] =
            json!("Get the weather. Note that the provided function is in Python 3 syntax.");
        assert_eq!(out, vec![expected]);
    }

    #[test]
    fn java_parameters_become_strings() {
        let function = json!({
            "name": "Sorter.sort",
            "description": "Sorts values.",
            "parameters": {
                "type": "dict",
                "properties": {
                    "values": {"type": "ArrayList", "description": "Values.", "items": {"type": "integer"}},
                    "target": {"type": "any", "description": "Anything."}
                }
            }
        });
        let out = LanguageHintNormalizer.normalize(vec![function], "java");
        let declaration = &out[0];

        assert_eq!(
            declaration["description"],
            json!("Sorts values. Note that the provided function is in Java 8 SDK syntax.")
        );
        let values = &declaration["parameters"]["properties"]["values"];
        assert_eq!(values["type"], json!("string"));
        assert!(values.get("items").is_none());
        assert_eq!(
            values["description"],
            json!("Values. This is Java ArrayList type parameter in string representation. The list elements are of type integer; they are not in string representation.")
        );
        let target = &declaration["parameters"]["properties"]["target"];
        assert_eq!(
            target["description"],
            json!("Anything. This parameter can be of any type of Java object in string representation.")
        );
    }

    #[test]
    fn javascript_dict_schema_moves_into_description() {
        let function = json!({
            "name": "configure",
            "description": "Configures.",
            "parameters": {
                "type": "dict",
                "properties": {
                    "options": {
                        "type": "dict",
                        "description": "Options.",
                        "properties": {"depth": {"type": "integer"}}
                    }
                }
            }
        });
        let out = LanguageHintNormalizer.normalize(vec![function], "simple_javascript");
        let options = &out[0]["parameters"]["properties"]["options"];

        assert_eq!(options["type"], json!("string"));
        assert!(options.get("properties").is_none());
        assert_eq!(
            options["description"],
            json!("Options. This is JavaScript dict type parameter in string representation. The dictionary entries have the following schema; they are not in string representation. {\"depth\": {\"type\": \"integer\"}}")
        );
    }

    #[test]
    fn malformed_declarations_pass_through() {
        let functions = vec![json!("not an object"), json!({"name": "bare"})];
        let out = LanguageHintNormalizer.normalize(functions.clone(), "java");
        assert_eq!(out, functions);
    }

    #[test]
    fn passthrough_changes_nothing() {
        assert_eq!(
            PassthroughNormalizer.normalize(vec![weather()], "java"),
            vec![weather()]
        );
    }

    #[test]
    fn spaced_json_separators() {
        assert_eq!(to_spaced_json(&json!({"a": [1, 2], "b": {}})), r#"{"a": [1, 2], "b": {}}"#);
    }

    #[test]
    fn spaced_json_escapes_non_ascii() {
        assert_eq!(to_spaced_json(&json!({"k": "é"})), r#"{"k": "\u00e9"}"#);
        assert_eq!(
            to_spaced_json(&json!({"città": "a\"😀"})),
            r#"{"citt\u00e0": "a\"\ud83d\ude00"}"#
        );
    }
}
