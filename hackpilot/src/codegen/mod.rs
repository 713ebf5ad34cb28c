//! Code generator: fills static project templates.
//!
//! Each [`AppType`] has a blueprint: base files every project gets, files
//! stamped out once per feature, and named slots (imports, routes,
//! dependency lines...) that features append snippets to. Only the
//! features a blueprint lists are supported; anything else is a
//! `TemplateNotFound` error.

mod blockchain;
mod ml;
mod mobile;
pub mod template;
mod web;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::design;
use crate::error::{AssistantError, Result};
use crate::models::GeneratedApp;
use template::Vars;

/// Supported application kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Web,
    Ml,
    Mobile,
    Blockchain,
}

impl AppType {
    pub const ALL: [AppType; 4] = [AppType::Web, AppType::Ml, AppType::Mobile, AppType::Blockchain];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Web => "web",
            AppType::Ml => "ml",
            AppType::Mobile => "mobile",
            AppType::Blockchain => "blockchain",
        }
    }

    /// Features this app type has templates for.
    pub fn supported_features(&self) -> Vec<&'static str> {
        blueprint(*self).features.iter().map(|f| f.name).collect()
    }
}

impl std::fmt::Display for AppType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppType {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(AssistantError::invalid("app type must not be empty")),
            "web" => Ok(AppType::Web),
            "ml" => Ok(AppType::Ml),
            "mobile" => Ok(AppType::Mobile),
            "blockchain" => Ok(AppType::Blockchain),
            other => Err(AssistantError::TemplateNotFound(format!(
                "no templates for app type `{other}` (available: web, ml, mobile, blockchain)"
            ))),
        }
    }
}

pub(crate) struct FileTemplate {
    pub path: &'static str,
    pub body: &'static str,
}

pub(crate) struct FeatureTemplate {
    pub name: &'static str,
    pub summary: &'static str,
    /// Files specific to this feature, on top of the blueprint's per-feature files.
    pub files: &'static [FileTemplate],
    /// `(slot, snippet)` pairs specific to this feature.
    pub snippets: &'static [(&'static str, &'static str)],
}

pub(crate) struct Blueprint {
    /// Slot names referenced by base templates; empty when no feature fills them.
    pub slots: &'static [&'static str],
    pub base: &'static [FileTemplate],
    /// Files stamped out for every selected feature.
    pub per_feature: &'static [FileTemplate],
    /// Snippets appended for every selected feature.
    pub per_feature_snippets: &'static [(&'static str, &'static str)],
    pub features: &'static [FeatureTemplate],
}

pub(crate) fn blueprint(app_type: AppType) -> &'static Blueprint {
    match app_type {
        AppType::Web => &web::BLUEPRINT,
        AppType::Ml => &ml::BLUEPRINT,
        AppType::Mobile => &mobile::BLUEPRINT,
        AppType::Blockchain => &blockchain::BLUEPRINT,
    }
}

/// Normalize a feature list: trim, lowercase, drop duplicates, keep order.
pub fn normalize_features(features: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for raw in features {
        let f = raw.trim().to_lowercase().replace(' ', "-");
        if f.is_empty() {
            return Err(AssistantError::invalid("feature names must not be empty"));
        }
        if !out.contains(&f) {
            out.push(f);
        }
    }
    Ok(out)
}

/// Produce the file map for an app. Deterministic: same inputs, same output.
pub fn generate(
    name: &str,
    app_type: AppType,
    features: &[String],
    style: &str,
) -> Result<GeneratedApp> {
    let slug = template::slug(name);
    if slug.is_empty() {
        return Err(AssistantError::invalid(
            "project name must contain at least one letter or digit",
        ));
    }
    check_plain("project name", name)?;
    check_plain("style", style)?;
    let features = normalize_features(features)?;
    let bp = blueprint(app_type);

    let selected: Vec<&FeatureTemplate> = features
        .iter()
        .map(|f| {
            bp.features.iter().find(|t| t.name == f).ok_or_else(|| {
                AssistantError::TemplateNotFound(format!(
                    "no `{f}` template for {app_type} apps (available: {})",
                    app_type.supported_features().join(", ")
                ))
            })
        })
        .collect::<Result<_>>()?;

    let design = design::create(app_type, &features, style);
    let mut vars = Vars::new();
    vars.insert("name", name.trim().to_string());
    vars.insert("slug", slug.clone());
    vars.insert("db_name", slug.replace('-', "_"));
    vars.insert("app_type", app_type.to_string());
    vars.insert("style", design.style.clone());
    vars.insert("stylesheet", design::stylesheet(&design));
    vars.insert("primary", design.palette.primary.clone());
    vars.insert("secondary", design.palette.secondary.clone());
    vars.insert("accent", design.palette.accent.clone());
    vars.insert("background", design.palette.background.clone());
    vars.insert("text", design.palette.text.clone());
    vars.insert("font", design.font_family.clone());
    vars.insert("features_markdown", features_markdown(&selected));

    let mut files = BTreeMap::new();
    let mut slots: BTreeMap<&'static str, Vec<String>> =
        bp.slots.iter().map(|s| (*s, Vec::new())).collect();

    for feature in &selected {
        let mut fvars = vars.clone();
        fvars.insert("feature", feature.name.replace('-', "_"));
        fvars.insert("Feature", template::pascal_case(feature.name));
        fvars.insert("summary", feature.summary.to_string());

        for file in bp.per_feature.iter().chain(feature.files) {
            let path = template::render(file.path, file.path, &fvars)?;
            let body = template::render(&path, file.body, &fvars)?;
            files.insert(path, body);
        }
        for (slot, snippet) in bp.per_feature_snippets.iter().chain(feature.snippets) {
            let rendered = template::render(slot, snippet, &fvars)?;
            let entry = slots.get_mut(slot).ok_or_else(|| {
                AssistantError::TemplateNotFound(format!("unknown slot `{slot}` for {app_type} apps"))
            })?;
            if !entry.contains(&rendered) {
                entry.push(rendered);
            }
        }
    }

    for (slot, snippets) in slots {
        vars.insert(slot, snippets.concat());
    }
    for file in bp.base {
        let path = template::render(file.path, file.path, &vars)?;
        let body = template::render(&path, file.body, &vars)?;
        files.insert(path, body);
    }

    tracing::info!(%app_type, name, files = files.len(), "Generated app");
    Ok(GeneratedApp {
        name: name.trim().to_string(),
        app_type,
        style: design.style,
        features,
        files,
    })
}

/// Punctuation allowed in text that lands inside generated string literals,
/// comments and markup.
const PLAIN_PUNCTUATION: &str = " -_.,!?+";

/// Reject text that would need escaping in any of the generated languages.
fn check_plain(what: &str, text: &str) -> Result<()> {
    match text
        .trim()
        .chars()
        .find(|c| !c.is_alphanumeric() && !PLAIN_PUNCTUATION.contains(*c))
    {
        Some(c) => Err(AssistantError::invalid(format!(
            "{what} may only contain letters, digits, spaces and `-_.,!?+`; found {c:?}"
        ))),
        None => Ok(()),
    }
}

fn features_markdown(selected: &[&FeatureTemplate]) -> String {
    if selected.is_empty() {
        return "- base skeleton only\n".to_string();
    }
    selected
        .iter()
        .map(|f| format!("- **{}**: {}\n", f.name, f.summary))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn names_needing_escapes_are_rejected() {
        for name in [r#"Say "Hi""#, "Bob's App", r"back\slash", "{{slug}}", "<App>", "two\nlines"] {
            let err = generate(name, AppType::Mobile, &[], "modern").unwrap_err();
            assert!(matches!(err, AssistantError::InvalidInput(_)), "{name}: {err}");
        }
        let err = generate("Demo", AppType::Web, &[], "dark */ body {").unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)));

        let app = generate("Café Rápido v2.0!", AppType::Mobile, &[], "calm").unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&app.files["app.json"]).unwrap();
        assert_eq!(manifest["expo"]["name"], "Café Rápido v2.0!");
    }

    #[test]
    fn every_supported_combination_renders() {
        for app_type in AppType::ALL {
            let all: Vec<String> = app_type
                .supported_features()
                .into_iter()
                .map(String::from)
                .collect();
            let app = generate("Demo Project", app_type, &all, "modern")
                .unwrap_or_else(|e| panic!("{app_type}: {e}"));
            assert!(app.files.contains_key("README.md"), "{app_type}");
            for (path, body) in &app.files {
                assert!(!path.contains("{{"), "{app_type}: {path}");
                assert!(!body.contains("{{"), "{app_type}: {path} leaks a placeholder");
            }
            // base skeleton alone works too
            generate("Demo Project", app_type, &[], "modern").unwrap();
        }
    }

    #[test]
    fn unsupported_feature_is_template_not_found() {
        let err = generate("x", AppType::Mobile, &feats(&["auth", "nft"]), "modern").unwrap_err();
        assert!(matches!(err, AssistantError::TemplateNotFound(_)));
        assert!(err.to_string().contains("`nft`"));
    }

    #[test]
    fn unknown_app_type() {
        assert!(matches!(
            "cli".parse::<AppType>(),
            Err(AssistantError::TemplateNotFound(_))
        ));
        assert!(matches!(
            " ".parse::<AppType>(),
            Err(AssistantError::InvalidInput(_))
        ));
        assert_eq!("  Blockchain ".parse::<AppType>().unwrap(), AppType::Blockchain);
    }

    #[test]
    fn features_are_normalized() {
        assert_eq!(
            normalize_features(&feats(&[" Auth", "dashboard", "AUTH"])).unwrap(),
            vec!["auth", "dashboard"]
        );
        assert!(normalize_features(&feats(&["auth", " "])).is_err());
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate("EcoTrack", AppType::Web, &feats(&["auth", "dashboard"]), "eco").unwrap();
        let b = generate("EcoTrack", AppType::Web, &feats(&["auth", "dashboard"]), "eco").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn web_features_wire_into_base_files() {
        let app = generate("EcoTrack", AppType::Web, &feats(&["auth", "dashboard"]), "eco").unwrap();
        let paths = app.paths();
        assert!(paths.contains(&"frontend/src/components/Auth.jsx"));
        assert!(paths.contains(&"backend/routes/dashboard.py"));

        let app_jsx = &app.files["frontend/src/App.jsx"];
        assert!(app_jsx.contains("import Auth from './components/Auth';"));
        assert!(app_jsx.contains(r#"<Route path="/dashboard" element={<Dashboard />} />"#));

        let main_py = &app.files["backend/main.py"];
        assert!(main_py.contains("from routes import auth\nfrom routes import dashboard\n"));
        assert!(main_py.contains("app.include_router(dashboard.router)"));

        assert!(app.files["backend/requirements.txt"].contains("passlib"));
        assert!(app.files["db/schema.sql"].contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(app.files["frontend/src/styles.css"].contains("#059669"));
        assert!(app.files["docker-compose.yml"].contains("POSTGRES_DB: ecotrack"));
    }

    #[test]
    fn shared_snippets_are_not_duplicated() {
        let app = generate("Lab", AppType::Ml, &feats(&["training", "dataset"]), "modern").unwrap();
        let reqs = &app.files["requirements.txt"];
        assert_eq!(reqs.matches("pandas").count(), 1);
    }

    #[test]
    fn blank_project_name_is_invalid() {
        let err = generate(" !! ", AppType::Web, &[], "modern").unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)));
    }
}
