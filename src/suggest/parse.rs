use anyhow::{bail, Context};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::dto::MealSuggestion;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```(?:json)?\s*(.*?)```").unwrap();
}

/// Pulls meal suggestions out of free-form model output. The completion is
/// untrusted: it may wrap JSON in prose or markdown fences, return a bare
/// array, a single object, or nothing usable at all. Entries that fail to
/// deserialize or carry negative/non-finite macros are dropped.
pub fn extract_suggestions(raw: &str) -> anyhow::Result<Vec<MealSuggestion>> {
    let fenced = CODE_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    let value = fenced
        .and_then(first_json_value)
        .or_else(|| first_json_value(raw))
        .context("no JSON value in completion")?;

    let entries: Vec<Value> = match value {
        Value::Object(ref map) if map.contains_key("suggestions") => map["suggestions"]
            .as_array()
            .cloned()
            .context("\"suggestions\" is not an array")?,
        Value::Array(entries) => entries,
        obj @ Value::Object(_) => vec![obj],
        other => bail!("unexpected JSON shape: {other}"),
    };

    let mut suggestions = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<MealSuggestion>(entry) {
            Ok(s) if s.is_well_formed() => suggestions.push(s),
            Ok(s) => debug!(name = %s.name, "dropping malformed suggestion"),
            Err(e) => debug!(error = %e, "dropping undeserializable suggestion"),
        }
    }

    if suggestions.is_empty() {
        bail!("completion contained no usable suggestions");
    }
    Ok(suggestions)
}

/// First balanced `{...}` or `[...]` in `text` that parses as JSON.
/// String literals and escapes are respected during the scan.
fn first_json_value(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        let b = bytes[start];
        if b != b'{' && b != b'[' {
            continue;
        }
        if let Some(end) = balanced_end(bytes, start) {
            if let Ok(v) = serde_json::from_slice::<Value>(&bytes[start..=end]) {
                return Some(v);
            }
        }
    }
    None
}

fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(name: &str, calories: f64) -> String {
        format!(
            r#"{{"name": "{name}", "calories": {calories}, "protein_g": 20, "carbs_g": 30, "fat_g": 10}}"#
        )
    }

    #[test]
    fn parses_suggestions_wrapper_object() {
        let raw = format!(r#"{{"suggestions": [{}, {}, {}]}}"#, one("a", 300.0), one("b", 310.0), one("c", 320.0));
        let got = extract_suggestions(&raw).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].name, "a");
    }

    #[test]
    fn parses_fenced_and_prose_wrapped_json() {
        let fenced = format!("Here you go!\n```json\n[{}]\n```\nEnjoy.", one("fenced", 250.0));
        assert_eq!(extract_suggestions(&fenced).unwrap()[0].name, "fenced");

        let prose = format!("Sure thing: {} — let me know!", one("prose", 260.0));
        assert_eq!(extract_suggestions(&prose).unwrap()[0].name, "prose");
    }

    #[test]
    fn parses_bare_array_and_single_object() {
        let arr = format!("[{}, {}]", one("x", 100.0), one("y", 110.0));
        assert_eq!(extract_suggestions(&arr).unwrap().len(), 2);

        let obj = one("solo", 120.0);
        assert_eq!(extract_suggestions(&obj).unwrap().len(), 1);
    }

    #[test]
    fn braces_inside_strings_do_not_break_the_scan() {
        let raw = r#"{"name": "bowl {spicy}", "description": "a } in text", "calories": 200, "protein_g": 15, "carbs_g": 20, "fat_g": 5}"#;
        let got = extract_suggestions(raw).unwrap();
        assert_eq!(got[0].name, "bowl {spicy}");
    }

    #[test]
    fn drops_negative_macros_and_missing_names() {
        let raw = format!(
            r#"[{}, {{"name": "bad", "calories": -100, "protein_g": 1, "carbs_g": 1, "fat_g": 1}}, {{"name": "", "calories": 100, "protein_g": 1, "carbs_g": 1, "fat_g": 1}}]"#,
            one("good", 200.0)
        );
        let got = extract_suggestions(&raw).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "good");
    }

    #[test]
    fn garbage_and_empty_arrays_are_errors() {
        assert!(extract_suggestions("I could not help with that.").is_err());
        assert!(extract_suggestions("").is_err());
        assert!(extract_suggestions("[]").is_err());
        assert!(extract_suggestions(r#"{"suggestions": "nope"}"#).is_err());
    }
}
