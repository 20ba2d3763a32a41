//! Sectioned `key = value` text format.
//!
//! ```ini
//! [core]
//! debug = false
//! startuplogtimeout = 10
//! userextensions = ["%USERPROFILE%\\ext"]
//! ```

use std::collections::BTreeMap;

use serde_json::Value as Json;

use super::error::SyntaxError;
use super::section::Section;
use super::value::Value;

pub type Sections = BTreeMap<String, Section>;

/// Parse config text into sections.
pub fn parse_ini_str(content: &str) -> Result<Sections, SyntaxError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sections = Sections::new();
    let mut current: Option<String> = None;
    let mut pending: Option<(String, String)> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            flush(&mut sections, &current, &mut pending);
            continue;
        }
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let indented = raw_line.starts_with([' ', '\t']);
        if indented {
            if let Some((_, raw)) = pending.as_mut() {
                raw.push('\n');
                raw.push_str(line);
                continue;
            }
        }

        flush(&mut sections, &current, &mut pending);

        if let Some(header) = line.strip_prefix('[') {
            let name = parse_header(header, line_num)?;
            if sections.contains_key(&name) {
                return Err(SyntaxError::new(
                    line_num,
                    format!("duplicate section '{}'", name),
                ));
            }
            sections.insert(name.clone(), Section::new(name.clone()));
            current = Some(name);
            continue;
        }

        let Some(section_name) = current.as_ref() else {
            return Err(SyntaxError::new(
                line_num,
                "option found before any section header",
            ));
        };

        let (key, raw) = parse_option(line, line_num)?;

        let already_set = sections
            .get(section_name)
            .is_some_and(|section| section.has_option(&key));
        if already_set {
            return Err(SyntaxError::new(
                line_num,
                format!("duplicate option '{}' in section '{}'", key, section_name),
            ));
        }

        pending = Some((key, raw.to_string()));
    }

    flush(&mut sections, &current, &mut pending);
    Ok(sections)
}

/// Section name from the text after `[`. Quoted names may hold any text.
fn parse_header(body: &str, line_num: usize) -> Result<String, SyntaxError> {
    let body = body.trim_start();
    if body.starts_with('"') {
        let (name, rest) = split_quoted(body)
            .ok_or_else(|| SyntaxError::new(line_num, "invalid quoted section name"))?;
        if rest.trim() != "]" {
            return Err(SyntaxError::new(line_num, "unterminated section header"));
        }
        return Ok(name);
    }

    let name = body
        .strip_suffix(']')
        .ok_or_else(|| SyntaxError::new(line_num, "unterminated section header"))?
        .trim();
    if name.is_empty() {
        return Err(SyntaxError::new(line_num, "empty section name"));
    }
    Ok(name.to_string())
}

/// Option name and raw value text of a `key = value` line.
fn parse_option(line: &str, line_num: usize) -> Result<(String, &str), SyntaxError> {
    if line.starts_with('"') {
        let (key, rest) = split_quoted(line)
            .ok_or_else(|| SyntaxError::new(line_num, "invalid quoted option name"))?;
        let raw = rest
            .trim_start()
            .strip_prefix(['=', ':'])
            .ok_or_else(|| SyntaxError::new(line_num, "expected '=' after quoted option name"))?;
        return Ok((key, raw.trim()));
    }

    let delim = line.find(['=', ':']).ok_or_else(|| {
        SyntaxError::new(line_num, format!("expected 'key = value', got '{}'", line))
    })?;
    let key = line[..delim].trim();
    if key.is_empty() {
        return Err(SyntaxError::new(line_num, "empty option name"));
    }
    Ok((key.to_string(), line[delim + 1..].trim()))
}

/// Split a leading JSON string literal off `text`.
fn split_quoted(text: &str) -> Option<(String, &str)> {
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                let name = serde_json::from_str::<String>(&text[..=i]).ok()?;
                return Some((name, &text[i + 1..]));
            }
            _ => {}
        }
    }
    None
}

/// Names the plain grammar would misread are written as JSON strings.
fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || name.trim() != name
        || name.starts_with(['#', ';', '[', '"'])
        || name.contains(['=', ':', ']'])
        || name.chars().any(char::is_control)
}

fn push_name(out: &mut String, name: &str) {
    if needs_quoting(name) {
        out.push_str(&Json::String(name.to_string()).to_string());
    } else {
        out.push_str(name);
    }
}

fn flush(sections: &mut Sections, current: &Option<String>, pending: &mut Option<(String, String)>) {
    if let (Some(name), Some((key, raw))) = (current.as_ref(), pending.take()) {
        if let Some(section) = sections.get_mut(name) {
            section.set(key, Value::decode(&raw));
        }
    }
}

/// Serialize sections to config text.
pub fn to_ini(sections: &Sections) -> String {
    let mut out = String::new();
    for (i, section) in sections.values().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push('[');
        push_name(&mut out, section.name());
        out.push_str("]\n");
        for (key, value) in section.iter() {
            push_name(&mut out, key);
            out.push_str(" = ");
            out.push_str(&value.encode());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let text = r#"
# user settings
[core]
debug = True
startuplogtimeout = 10
userextensions = ["C:\\ext"]

[myTools.extension]
disabled: false
"#;

        let sections = parse_ini_str(text).unwrap();
        assert_eq!(sections.len(), 2);

        let core = &sections["core"];
        assert_eq!(core.get("debug"), Some(&Value::Bool(true)));
        assert_eq!(core.get("startuplogtimeout"), Some(&Value::Int(10)));
        assert_eq!(
            core.get("userextensions"),
            Some(&Value::List(vec![r"C:\ext".to_string()]))
        );
        assert_eq!(
            sections["myTools.extension"].get("disabled"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        assert!(parse_ini_str("").unwrap().is_empty());
        assert!(parse_ini_str("\n; nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_option_before_section_fails() {
        let err = parse_ini_str("debug = true\n[core]\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_unterminated_header_fails() {
        let err = parse_ini_str("[core]\ndebug = true\n[broken\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_missing_delimiter_fails() {
        let err = parse_ini_str("[core]\njust some words\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_duplicate_section_and_option_fail() {
        assert!(parse_ini_str("[core]\n[core]\n").is_err());
        let err = parse_ini_str("[core]\ndebug = true\ndebug = false\n").unwrap_err();
        assert!(err.message.contains("duplicate option"));
    }

    #[test]
    fn test_continuation_lines_join_value() {
        let text = "[core]\nuserextensions = [\n    \"a\",\n    \"b\"]\nverbose = true\n";
        let sections = parse_ini_str(text).unwrap();
        assert_eq!(
            sections["core"].get("userextensions"),
            Some(&Value::List(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(sections["core"].get("verbose"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_value_may_contain_delimiters() {
        let sections = parse_ini_str("[paths]\nroot = C:\\data=1\n").unwrap();
        assert_eq!(
            sections["paths"].get("root"),
            Some(&Value::Str(r"C:\data=1".to_string()))
        );
    }

    #[test]
    fn test_quoted_names_are_parsed() {
        let text = "[\"a]b\"]\n\"x = y\" = 1\n\"\" : true\n";
        let sections = parse_ini_str(text).unwrap();
        let section = &sections["a]b"];
        assert_eq!(section.get("x = y"), Some(&Value::Int(1)));
        assert_eq!(section.get(""), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_plain_names_stay_unquoted() {
        let mut sections = Sections::new();
        let mut section = Section::new("myTools.extension");
        section.set("disabled", true);
        sections.insert("myTools.extension".to_string(), section);

        assert_eq!(to_ini(&sections), "[myTools.extension]\ndisabled = true\n");
    }

    #[test]
    fn test_bad_quoted_names_fail() {
        assert!(parse_ini_str("[\"open]\n").is_err());
        let err = parse_ini_str("[core]\n\"key\" true\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_bom_is_ignored() {
        let sections = parse_ini_str("\u{feff}[core]\ndebug = false\n").unwrap();
        assert!(sections.contains_key("core"));
    }

    #[test]
    fn test_to_ini_then_parse_preserves_sections() {
        let mut sections = Sections::new();
        let mut core = Section::new("core");
        core.set("debug", false);
        core.set("userextensions", vec!["a", "b"]);
        sections.insert("core".to_string(), core);
        sections.insert("empty".to_string(), Section::new("empty"));

        let text = to_ini(&sections);
        assert!(text.starts_with("[core]\n"));
        assert!(text.contains("debug = false\n"));
        assert_eq!(parse_ini_str(&text).unwrap(), sections);
    }
}
