//! Environment variable expansion for user-supplied paths.
//!
//! Supports `$VAR`, `${VAR}`, `%VAR%` and a leading `~`. References to
//! undefined variables are kept as written; only malformed input fails.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("unterminated variable reference in '{0}'")]
    Unterminated(String),

    #[error("cannot expand '~': home directory unknown")]
    NoHomeDir,
}

/// Expand against the process environment.
pub fn expand_env_vars(input: &str) -> Result<String, ExpandError> {
    let home = dirs::home_dir();
    expand_with(input, |name| std::env::var(name).ok(), home.as_deref())
}

/// Expand using `lookup` for variables and `home` for `~`.
pub fn expand_with<F>(input: &str, lookup: F, home: Option<&Path>) -> Result<String, ExpandError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with(['/', '\\']) {
            let home = home.ok_or(ExpandError::NoHomeDir)?;
            out.push_str(&home.to_string_lossy());
            rest = after;
        }
    }

    while let Some(pos) = rest.find(['$', '%']) {
        out.push_str(&rest[..pos]);
        let marker = &rest[pos..];

        if let Some(braced) = marker.strip_prefix("${") {
            let end = braced
                .find('}')
                .ok_or_else(|| ExpandError::Unterminated(input.to_string()))?;
            push_var(&mut out, &lookup, &braced[..end], &marker[..end + 3]);
            rest = &braced[end + 1..];
        } else if let Some(bare) = marker.strip_prefix('$') {
            let len = var_name_len(bare);
            if len == 0 {
                out.push('$');
            } else {
                push_var(&mut out, &lookup, &bare[..len], &marker[..len + 1]);
            }
            rest = &bare[len..];
        } else {
            // '%'
            let after = &marker[1..];
            match after.find('%') {
                Some(end) if end > 0 && is_percent_name(&after[..end]) => {
                    push_var(&mut out, &lookup, &after[..end], &marker[..end + 2]);
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('%');
                    rest = after;
                }
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Push the value of `name`, or the reference as written when it is undefined.
fn push_var<F>(out: &mut String, lookup: &F, name: &str, reference: &str)
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => out.push_str(&value),
        None => out.push_str(reference),
    }
}

fn var_name_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_percent_name(name: &str) -> bool {
    !name.contains(['/', '\\', ' ', '\t'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "APPDATA" => Some(r"C:\Users\ana\AppData\Roaming".to_string()),
            "EXT_ROOT" => Some("/opt/ext".to_string()),
            "ProgramFiles(x86)" => Some(r"C:\Program Files (x86)".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expands_all_forms() {
        assert_eq!(
            expand_with(r"%APPDATA%\hearth", lookup, None).unwrap(),
            r"C:\Users\ana\AppData\Roaming\hearth"
        );
        assert_eq!(expand_with("$EXT_ROOT/a", lookup, None).unwrap(), "/opt/ext/a");
        assert_eq!(expand_with("${EXT_ROOT}b", lookup, None).unwrap(), "/opt/extb");
        assert_eq!(
            expand_with("%ProgramFiles(x86)%", lookup, None).unwrap(),
            r"C:\Program Files (x86)"
        );
    }

    #[test]
    fn test_tilde_uses_home() {
        let home = Path::new("/home/ana");
        assert_eq!(expand_with("~/ext", lookup, Some(home)).unwrap(), "/home/ana/ext");
        assert_eq!(expand_with("a~b", lookup, Some(home)).unwrap(), "a~b");
        assert_eq!(expand_with("~", lookup, None), Err(ExpandError::NoHomeDir));
    }

    #[test]
    fn test_undefined_variable_stays_literal() {
        assert_eq!(expand_with("$NOPE/x", lookup, None).unwrap(), "$NOPE/x");
        assert_eq!(expand_with("${NOPE}/x", lookup, None).unwrap(), "${NOPE}/x");
        assert_eq!(
            expand_with(r"D:\%build%\ext", lookup, None).unwrap(),
            r"D:\%build%\ext"
        );
        assert_eq!(
            expand_with("%NOPE%/$EXT_ROOT", lookup, None).unwrap(),
            "%NOPE%//opt/ext"
        );
    }

    #[test]
    fn test_unterminated_brace_is_error() {
        assert!(matches!(
            expand_with("${EXT_ROOT", lookup, None),
            Err(ExpandError::Unterminated(_))
        ));
    }

    #[test]
    fn test_lone_markers_are_literal() {
        assert_eq!(expand_with("100% sure", lookup, None).unwrap(), "100% sure");
        assert_eq!(expand_with("cost $5", lookup, None).unwrap(), "cost $5");
        assert_eq!(expand_with("plain/path", lookup, None).unwrap(), "plain/path");
    }
}
