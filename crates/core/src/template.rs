//! `{{key}}` placeholder substitution for message templates.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Variables supplied when rendering a template.
pub type TemplateVars = HashMap<String, String>;

/// Replace every `{{key}}` whose key is in `vars`. Unknown placeholders
/// are left untouched.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder keys still present in a rendered string.
pub fn unresolved_placeholders(rendered: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(rendered)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_keys() {
        let out = render(
            "Dear {{recipient_name}}, your status is {{ status }}.",
            &vars(&[("recipient_name", "Ada"), ("status", "Shortlisted")]),
        );
        assert_eq!(out, "Dear Ada, your status is Shortlisted.");
    }

    #[test]
    fn repeated_keys_are_all_replaced() {
        let out = render("{{a}}-{{a}}", &vars(&[("a", "x")]));
        assert_eq!(out, "x-x");
    }

    #[test]
    fn unknown_keys_are_kept_and_reported() {
        let out = render("Hello {{name}}, code {{code}}", &vars(&[("name", "Bo")]));
        assert_eq!(out, "Hello Bo, code {{code}}");
        assert_eq!(unresolved_placeholders(&out), vec!["code".to_string()]);
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = render("{{a}}", &vars(&[("a", "{{b}}"), ("b", "nope")]));
        assert_eq!(out, "{{b}}");
    }
}
