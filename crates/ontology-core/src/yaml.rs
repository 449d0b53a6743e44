//! Recursive YAML writer over `serde_json::Value`.
//!
//! Two spaces per level. Maps and lists nest as blocks, multi-line strings
//! become literal blocks, and strings a YAML reader could misread are
//! double-quoted. Empty collections render inline as `[]` / `{}`.

use serde_json::{Map, Value};

const INDENT: &str = "  ";

pub fn to_yaml(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) if !map.is_empty() => write_map(&mut out, map, 0),
        Value::Array(items) if !items.is_empty() => write_seq(&mut out, items, 0),
        Value::String(s) if is_block(s) => write_block(&mut out, "", s, 1),
        other => {
            out.push_str(&scalar(other));
            out.push('\n');
        }
    }
    out
}

fn write_map(out: &mut String, map: &Map<String, Value>, level: usize) {
    let pad = INDENT.repeat(level);
    for (key, value) in map {
        let key = quote(key);
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                out.push_str(&format!("{pad}{key}:\n"));
                write_map(out, inner, level + 1);
            }
            Value::Array(items) if !items.is_empty() => {
                out.push_str(&format!("{pad}{key}:\n"));
                write_seq(out, items, level + 1);
            }
            Value::String(s) if is_block(s) => {
                write_block(out, &format!("{pad}{key}: "), s, level + 1);
            }
            other => out.push_str(&format!("{pad}{key}: {}\n", scalar(other))),
        }
    }
}

fn write_seq(out: &mut String, items: &[Value], level: usize) {
    let pad = INDENT.repeat(level);
    for item in items {
        match item {
            Value::Object(inner) if !inner.is_empty() => {
                let mut nested = String::new();
                write_map(&mut nested, inner, level + 1);
                out.push_str(&dash_first_line(&nested, &pad, level + 1));
            }
            Value::Array(inner) if !inner.is_empty() => {
                let mut nested = String::new();
                write_seq(&mut nested, inner, level + 1);
                out.push_str(&dash_first_line(&nested, &pad, level + 1));
            }
            Value::String(s) if is_block(s) => {
                write_block(out, &format!("{pad}- "), s, level + 1);
            }
            other => out.push_str(&format!("{pad}- {}\n", scalar(other))),
        }
    }
}

/// Replace the indentation of the first line (written at `level`) with
/// `{pad}- `, which is the same width, so later lines stay aligned.
fn dash_first_line(nested: &str, pad: &str, level: usize) -> String {
    let width = INDENT.len() * level;
    format!("{pad}- {}", &nested[width.min(nested.len())..])
}

/// `prefix` is everything before the block indicator on the opening line.
fn write_block(out: &mut String, prefix: &str, s: &str, level: usize) {
    let body = s.trim_end_matches('\n');
    let trailing = s.len() - body.len();
    let indicator = match trailing {
        0 => "|-",
        1 => "|",
        _ => "|+",
    };
    out.push_str(prefix);
    out.push_str(indicator);
    out.push('\n');
    let pad = INDENT.repeat(level);
    for line in body.split('\n') {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
    for _ in 1..trailing {
        out.push('\n');
    }
}

/// Literal blocks take their indentation from the first non-empty line and
/// can't express carriage returns, so strings that would be misread stay
/// double-quoted.
fn is_block(s: &str) -> bool {
    if !s.contains('\n') || s.contains('\r') || s.trim().is_empty() {
        return false;
    }
    s.split('\n')
        .find(|line| !line.is_empty())
        .is_some_and(|line| !line.starts_with([' ', '\t']))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn quote(s: &str) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.contains([':', '#', '\'', '\n', '\r', '\t']) {
        return true;
    }
    if s.starts_with(['{', '[', '"', '-', '?', '&', '*', '!', '|', '>', '%', '@', '`', ',', ' '])
        || s.ends_with(' ')
    {
        return true;
    }
    is_ambiguous_plain(s)
}

/// Plain scalars a YAML reader would load as something other than a string.
fn is_ambiguous_plain(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~"
    ) || is_numeric(s)
}

/// Decimal, hex/octal/binary, `.inf`/`.nan`, and underscore-grouped forms.
fn is_numeric(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let unsigned = lower.trim_start_matches(['+', '-']);
    if matches!(unsigned, ".inf" | ".nan") {
        return true;
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = unsigned.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c == '_' || c.is_digit(radix));
        }
    }
    lower.parse::<f64>().is_ok() || lower.replace('_', "").parse::<f64>().is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_literally() {
        let yaml = to_yaml(&json!({ "a": 1, "b": true, "c": null, "d": 2.5, "e": "plain" }));
        assert_eq!(yaml, "a: 1\nb: true\nc: null\nd: 2.5\ne: plain\n");
    }

    #[test]
    fn colon_hash_and_quote_force_double_quotes() {
        let yaml = to_yaml(&json!({
            "x": "a: b",
            "y": "issue #4",
            "z": "it's",
            "w": "{braced}",
            "v": "[list]",
            "u": ""
        }));
        assert!(yaml.contains("x: \"a: b\"\n"));
        assert!(yaml.contains("y: \"issue #4\"\n"));
        assert!(yaml.contains("z: \"it's\"\n"));
        assert!(yaml.contains("w: \"{braced}\"\n"));
        assert!(yaml.contains("v: \"[list]\"\n"));
        assert!(yaml.contains("u: \"\"\n"));
    }

    #[test]
    fn embedded_quotes_and_backslashes_are_escaped() {
        let yaml = to_yaml(&json!({ "p": "C:\\dir \"x\"" }));
        assert_eq!(yaml, "p: \"C:\\\\dir \\\"x\\\"\"\n");
    }

    #[test]
    fn ambiguous_scalars_are_quoted() {
        let yaml = to_yaml(&json!({ "version": "1.0", "flag": "true", "tier": "2" }));
        assert_eq!(yaml, "version: \"1.0\"\nflag: \"true\"\ntier: \"2\"\n");
    }

    fn reload(value: &Value) -> Value {
        serde_yaml::from_str(&to_yaml(value)).unwrap()
    }

    #[test]
    fn number_like_strings_are_quoted() {
        for s in ["0x1F", "0o17", "0b101", ".inf", "-.Inf", ".NaN", "1_000", "1e3", "+2"] {
            let value = json!({ "k": s });
            assert_eq!(to_yaml(&value), format!("k: \"{s}\"\n"));
            assert_eq!(reload(&value), value, "{s}");
        }
        assert_eq!(to_yaml(&json!({ "k": "0xyz" })), "k: 0xyz\n");
    }

    #[test]
    fn extra_trailing_newlines_use_keep_chomping() {
        let value = json!({ "k": "a\n\n", "next": "b\nc\n\n\n" });
        assert_eq!(to_yaml(&value), "k: |+\n  a\n\nnext: |+\n  b\n  c\n\n\n");
        assert_eq!(reload(&value), value);
    }

    #[test]
    fn indented_first_line_is_quoted_not_block() {
        let value = json!({ "k": "\n  indented", "j": "  lead\nx", "w": "\n\n" });
        let yaml = to_yaml(&value);
        assert!(yaml.contains("k: \"\\n  indented\"\n"));
        assert_eq!(reload(&value), value);
    }

    #[test]
    fn block_literals_round_trip() {
        let value = json!({
            "a": "first\n\nsecond",
            "b": ["x\ny\n", { "c": "tail\n  indented later" }],
        });
        assert_eq!(reload(&value), value);
    }

    #[test]
    fn multi_line_string_becomes_block_literal() {
        let yaml = to_yaml(&json!({ "description": "first\n\nsecond" }));
        assert_eq!(yaml, "description: |-\n  first\n\n  second\n");

        let nested = to_yaml(&json!({ "op": { "description": "a\nb\n" } }));
        assert_eq!(nested, "op:\n  description: |\n    a\n    b\n");
    }

    #[test]
    fn sequences_and_nested_maps() {
        let yaml = to_yaml(&json!({
            "required": ["orderId", "note"],
            "servers": [{ "url": "https://x", "name": "prod" }],
            "empty": [],
            "none": {}
        }));
        assert_eq!(
            yaml,
            "required:\n  - orderId\n  - note\n\
             servers:\n  - url: \"https://x\"\n    name: prod\n\
             empty: []\n\
             none: {}\n"
        );
    }

    #[test]
    fn nested_sequences_share_dash_line() {
        let yaml = to_yaml(&json!([["a", "b"], "c"]));
        assert_eq!(yaml, "- - a\n  - b\n- c\n");
    }

    #[test]
    fn path_keys_stay_plain() {
        let yaml = to_yaml(&json!({ "/api/orders/{id}": { "post": {} } }));
        assert_eq!(yaml, "/api/orders/{id}:\n  post: {}\n");
    }

    #[test]
    fn ref_key_is_plain_and_value_quoted() {
        let yaml = to_yaml(&json!({ "$ref": "#/components/schemas/A" }));
        assert_eq!(yaml, "$ref: \"#/components/schemas/A\"\n");
    }
}
