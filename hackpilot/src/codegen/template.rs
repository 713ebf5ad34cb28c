//! `{{placeholder}}` substitution.
//!
//! Rendering is strict: a placeholder with no value, or an unclosed `{{`,
//! fails instead of leaking template syntax into generated files.

use std::collections::BTreeMap;

use crate::error::{AssistantError, Result};

pub type Vars = BTreeMap<&'static str, String>;

/// Fill every `{{key}}` in `template` from `vars`. `name` only labels errors.
pub fn render(name: &str, template: &str, vars: &Vars) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            AssistantError::TemplateNotFound(format!("unclosed placeholder in {name}"))
        })?;
        let key = after[..end].trim();
        let value = vars.get(key).ok_or_else(|| {
            AssistantError::TemplateNotFound(format!("unresolved placeholder `{key}` in {name}"))
        })?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// "user-profile" / "user_profile" -> "UserProfile".
pub fn pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Lowercase, hyphen-separated name safe for directories and package names.
pub fn slug(s: &str) -> String {
    let mut out = String::new();
    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> Vars {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn fills_placeholders() {
        let v = vars(&[("name", "EcoTrack"), ("port", "8000")]);
        let out = render("t", "app {{name}} on {{ port }}; {single}", &v).unwrap();
        assert_eq!(out, "app EcoTrack on 8000; {single}");
    }

    #[test]
    fn unknown_or_unclosed_placeholder_fails() {
        let v = vars(&[("name", "x")]);
        let err = render("main.py", "{{name}} {{missing}}", &v).unwrap_err();
        assert!(matches!(err, AssistantError::TemplateNotFound(_)));
        assert!(err.to_string().contains("`missing` in main.py"));
        assert!(render("t", "oops {{name", &v).is_err());
    }

    #[test]
    fn values_are_not_rescanned() {
        let v = vars(&[("a", "{{b}}")]);
        assert_eq!(render("t", "{{a}}", &v).unwrap(), "{{b}}");
    }

    #[test]
    fn naming_helpers() {
        assert_eq!(pascal_case("user-profile"), "UserProfile");
        assert_eq!(pascal_case("nft"), "Nft");
        assert_eq!(slug("  My Cool App!! "), "my-cool-app");
        assert_eq!(slug("***"), "");
    }
}
