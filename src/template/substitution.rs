//! Variable substitution engine for templates

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::VariableBindings;

lazy_static! {
    /// `{{ name }}` on a single line; the name is trimmed before lookup.
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{(.*?)\}\}").unwrap();
}

/// Substitute `{{variable}}` placeholders in a JSON value.
///
/// Strings inside arrays and objects at any depth are rewritten; object keys,
/// numbers, booleans and null are left as they are. Placeholders without a
/// binding are kept verbatim.
pub fn substitute(value: &serde_json::Value, bindings: &VariableBindings) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(substitute_str(s, bindings)),
        serde_json::Value::Array(arr) => serde_json::Value::Array(
            arr.iter().map(|v| substitute(v, bindings)).collect(),
        ),
        serde_json::Value::Object(obj) => serde_json::Value::Object(
            obj.iter()
                .map(|(key, val)| (key.clone(), substitute(val, bindings)))
                .collect(),
        ),
        // Numbers, booleans, null are passed through as-is
        _ => value.clone(),
    }
}

/// Substitute placeholders in a single string. Replacement text is not re-scanned.
pub fn substitute_str(template: &str, bindings: &VariableBindings) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            match bindings.get(caps[1].trim()) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Distinct placeholder names used anywhere in a value, sorted.
pub fn placeholders(value: &serde_json::Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_placeholders(value, &mut names);
    names
}

fn collect_placeholders(value: &serde_json::Value, names: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::String(s) => {
            for caps in PLACEHOLDER.captures_iter(s) {
                let name = caps[1].trim();
                if !name.is_empty() {
                    names.insert(name.to_string());
                }
            }
        }
        serde_json::Value::Array(arr) => arr.iter().for_each(|v| collect_placeholders(v, names)),
        serde_json::Value::Object(obj) => obj.values().for_each(|v| collect_placeholders(v, names)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(pairs: &[(&str, &str)]) -> VariableBindings {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_substitute_simple() {
        let template = json!({"message": "Hello, {{name}}!"});
        let result = substitute(&template, &bindings(&[("name", "World")]));
        assert_eq!(result["message"], "Hello, World!");
    }

    #[test]
    fn test_substitute_trims_whitespace_in_name() {
        let result = substitute_str("Dear {{ first_name }},", &bindings(&[("first_name", "Ann")]));
        assert_eq!(result, "Dear Ann,");
    }

    #[test]
    fn test_unmatched_placeholder_is_preserved() {
        let template = json!({"msg": "hi {{x}}"});
        let result = substitute(&template, &VariableBindings::new());
        assert_eq!(result, json!({"msg": "hi {{x}}"}));

        // Original spacing survives too
        assert_eq!(
            substitute_str("see {{  later }}", &VariableBindings::new()),
            "see {{  later }}"
        );
    }

    #[test]
    fn test_substitute_multiple_and_repeated() {
        let template = json!({
            "title": "Order {{order_id}} shipped",
            "body": "Your order {{order_id}} is being delivered by {{carrier}}"
        });

        let result = substitute(
            &template,
            &bindings(&[("order_id", "ORD-123"), ("carrier", "FedEx")]),
        );
        assert_eq!(result["title"], "Order ORD-123 shipped");
        assert_eq!(
            result["body"],
            "Your order ORD-123 is being delivered by FedEx"
        );
    }

    #[test]
    fn test_substitute_nested_and_arrays() {
        let template = json!({
            "from": {"name": "{{user_name}}", "email": "{{user_email}}"},
            "items": ["{{a}}", ["{{b}}", 7], {"deep": {"deeper": "{{a}}-{{b}}"}}]
        });

        let result = substitute(&template, &bindings(&[("a", "1"), ("b", "2")]));
        assert_eq!(result["from"]["name"], "{{user_name}}");
        assert_eq!(result["items"][0], "1");
        assert_eq!(result["items"][1], json!(["2", 7]));
        assert_eq!(result["items"][2]["deep"]["deeper"], "1-2");
    }

    #[test]
    fn test_keys_and_scalars_untouched() {
        let template = json!({"{{key}}": 42, "flag": true, "none": null});
        let result = substitute(&template, &bindings(&[("key", "renamed")]));
        assert_eq!(result, template);
    }

    #[test]
    fn test_substituted_value_not_rescanned() {
        let result = substitute_str("{{a}}", &bindings(&[("a", "{{b}}"), ("b", "loop")]));
        assert_eq!(result, "{{b}}");
    }

    #[test]
    fn test_source_document_not_mutated() {
        let template = json!({"subject": "Hi {{name}}"});
        let before = template.clone();
        let _ = substitute(&template, &bindings(&[("name", "Bob")]));
        assert_eq!(template, before);
    }

    #[test]
    fn test_fully_bound_document_has_no_placeholders_left() {
        let template = json!({
            "subject": "Following up on {{event_name}}",
            "message": "Hi {{first_name}}, about {{ learning_point }} - {{availability}}",
            "variables": ["first_name", "event_name"]
        });

        let names = placeholders(&template);
        let all: VariableBindings = names.iter().map(|n| (n.as_str(), "x")).collect();
        let result = substitute(&template, &all);

        assert!(placeholders(&result).is_empty());
        assert!(!result.to_string().contains("{{"));
    }

    #[test]
    fn test_placeholders_are_distinct_and_sorted() {
        let template = json!({"a": "{{b}} {{a}} {{ b }}", "c": ["{{c}}"], "empty": "{{}}"});
        let names: Vec<_> = placeholders(&template).into_iter().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
