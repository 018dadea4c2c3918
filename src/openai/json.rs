//! JSON recovery helpers
//!
//! Model output is asked to be bare JSON but routinely arrives wrapped in
//! markdown fences or prose. These helpers slice out the embedded object
//! and read fields leniently with documented defaults.

use serde_json::{Map, Value};

/// Slice the first-`{` to last-`}` span out of model output.
///
/// Returns `None` when no such span exists. The span is not validated
/// here; the caller's parse decides whether it is usable.
pub fn slice_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Read a string field, falling back to `default` when the key is missing
/// or not a string.
pub fn str_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Read an optional string field; missing and non-string both read as `None`.
pub fn opt_str_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read a list of strings, skipping non-string entries; missing reads as empty.
pub fn str_list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_object_out_of_markdown_fences() {
        let text = "```json\n{\"foodName\": \"Tomato\"}\n```";
        assert_eq!(slice_json_object(text), Some("{\"foodName\": \"Tomato\"}"));
    }

    #[test]
    fn test_slices_object_out_of_surrounding_prose() {
        let text = "Sure! Here is the result: {\"a\": 1} Hope that helps.";
        assert_eq!(slice_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_no_object_returns_none() {
        assert_eq!(slice_json_object("no json here"), None);
        assert_eq!(slice_json_object("} backwards {"), None);
    }

    #[test]
    fn test_lenient_field_readers() {
        let value: Value =
            serde_json::from_str(r#"{"name": "Soup", "count": 3, "tags": ["a", 1, "b"]}"#)
                .unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(str_field(object, "name", "Unknown"), "Soup");
        assert_eq!(str_field(object, "missing", "Unknown"), "Unknown");
        // Wrong type falls back too
        assert_eq!(str_field(object, "count", "0"), "0");

        assert_eq!(opt_str_field(object, "name").as_deref(), Some("Soup"));
        assert_eq!(opt_str_field(object, "missing"), None);

        assert_eq!(str_list_field(object, "tags"), vec!["a", "b"]);
        assert!(str_list_field(object, "missing").is_empty());
    }
}
