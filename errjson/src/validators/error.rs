use serde_json::Value;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use super::FieldFailure;

/// Flattens validator output into failures with namespaces rooted at `root`,
/// e.g. `Root.items[2].email`.
pub fn flatten_errors(root: &str, errors: &ValidationErrors) -> Vec<FieldFailure> {
    let mut failures = Vec::new();
    collect_failures(root, errors, &mut failures);
    failures
}

fn collect_failures(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldFailure>) {
    // Ensure error fields are sorted ascending
    let mut fields: Vec<(String, &ValidationErrorsKind)> = errors
        .errors()
        .iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    for (field, kind) in fields {
        let path = format!("{}.{}", prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(to_failure(&path, error));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_failures(&path, nested, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_failures(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

fn to_failure(namespace: &str, error: &ValidationError) -> FieldFailure {
    let (rule, param) = match error.code.as_ref() {
        "length" => length_rule(error),
        "range" => range_rule(error),
        code => (code.to_string(), None),
    };

    FieldFailure {
        namespace: namespace.to_string(),
        rule,
        param,
    }
}

// `length` covers min, max and exact length; pick the bound that failed.
fn length_rule(error: &ValidationError) -> (String, Option<String>) {
    if let Some(equal) = param(error, "equal") {
        return ("len".to_string(), Some(equal));
    }

    match (param(error, "min"), param(error, "max")) {
        (Some(min), Some(max)) => {
            let too_long = value_len(error)
                .zip(max.parse::<usize>().ok())
                .is_some_and(|(len, max)| len > max);
            if too_long {
                ("max".to_string(), Some(max))
            } else {
                ("min".to_string(), Some(min))
            }
        }
        (Some(min), None) => ("min".to_string(), Some(min)),
        (None, Some(max)) => ("max".to_string(), Some(max)),
        (None, None) => ("length".to_string(), None),
    }
}

fn range_rule(error: &ValidationError) -> (String, Option<String>) {
    let value = error.params.get("value").and_then(Value::as_f64);
    let below = |bound: &str| {
        let limit = error.params.get(bound).and_then(Value::as_f64);
        value.zip(limit).is_some_and(|(v, l)| v < l)
    };
    let above = |bound: &str| {
        let limit = error.params.get(bound).and_then(Value::as_f64);
        value.zip(limit).is_some_and(|(v, l)| v > l)
    };

    if below("min") {
        return ("gte".to_string(), param(error, "min"));
    }
    if above("max") {
        return ("lte".to_string(), param(error, "max"));
    }
    if let Some(min) = param(error, "exclusive_min") {
        if !above("exclusive_min") {
            return ("gt".to_string(), Some(min));
        }
    }
    if let Some(max) = param(error, "exclusive_max") {
        if !below("exclusive_max") {
            return ("lt".to_string(), Some(max));
        }
    }

    ("range".to_string(), None)
}

fn param(error: &ValidationError, key: &str) -> Option<String> {
    match error.params.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_len(error: &ValidationError) -> Option<usize> {
    match error.params.get("value")? {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(items) => Some(items.len()),
        _ => None,
    }
}
