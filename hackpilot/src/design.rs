//! Design assistant: picks a color scheme and layout for a generated app.
//!
//! Fully local and deterministic. The style keyword chooses the palette,
//! the app type and features choose the layout pattern.

use crate::codegen::AppType;
use crate::models::{DesignSystem, LayoutPattern, Palette};

const FONT_STACK: &str = "Inter, -apple-system, BlinkMacSystemFont, sans-serif";

struct Scheme {
    name: &'static str,
    keywords: &'static [&'static str],
    primary: &'static str,
    secondary: &'static str,
    accent: &'static str,
    background: &'static str,
    text: &'static str,
}

const SCHEMES: &[Scheme] = &[
    Scheme {
        name: "tech_blue",
        keywords: &["professional", "corporate", "tech", "minimal", "business", "finance"],
        primary: "#2563eb",
        secondary: "#64748b",
        accent: "#06b6d4",
        background: "#f8fafc",
        text: "#1e293b",
    },
    Scheme {
        name: "success_green",
        keywords: &["eco", "green", "nature", "health", "calm", "environment", "sustainability"],
        primary: "#059669",
        secondary: "#6b7280",
        accent: "#10b981",
        background: "#f0fdf4",
        text: "#065f46",
    },
    Scheme {
        name: "vibrant_purple",
        keywords: &["vibrant", "playful", "bold", "modern", "fun"],
        primary: "#7c3aed",
        secondary: "#a78bfa",
        accent: "#f59e0b",
        background: "#faf5ff",
        text: "#581c87",
    },
    Scheme {
        name: "midnight",
        keywords: &["dark", "night", "crypto", "neon", "gaming"],
        primary: "#38bdf8",
        secondary: "#334155",
        accent: "#f472b6",
        background: "#0f172a",
        text: "#e2e8f0",
    },
];

/// Scheme used when the style keyword matches nothing.
const DEFAULT_SCHEME: usize = 2;

/// Build the design system for an app.
pub fn create(app_type: AppType, features: &[String], style: &str) -> DesignSystem {
    let style = normalize_style(style);
    let scheme = select_scheme(&style);
    let pattern = select_pattern(app_type, features);
    let (structure, sections) = layout(pattern);

    DesignSystem {
        style,
        scheme: scheme.name.to_string(),
        pattern,
        palette: Palette {
            primary: scheme.primary.to_string(),
            secondary: scheme.secondary.to_string(),
            accent: scheme.accent.to_string(),
            background: scheme.background.to_string(),
            text: scheme.text.to_string(),
        },
        structure: structure.to_string(),
        sections: sections.iter().map(|s| s.to_string()).collect(),
        navigation: match pattern {
            LayoutPattern::MobileApp => "bottom tab navigation",
            _ => "top navigation bar",
        }
        .to_string(),
        font_family: FONT_STACK.to_string(),
    }
}

fn normalize_style(style: &str) -> String {
    let s = style.trim().to_lowercase();
    if s.is_empty() { "modern".to_string() } else { s }
}

/// Keywords match whole words only, so "economy" is not "eco".
fn select_scheme(style: &str) -> &'static Scheme {
    let words: Vec<&str> = style
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    SCHEMES
        .iter()
        .find(|s| s.keywords.iter().any(|k| words.contains(k)))
        .unwrap_or(&SCHEMES[DEFAULT_SCHEME])
}

fn select_pattern(app_type: AppType, features: &[String]) -> LayoutPattern {
    let has = |names: &[&str]| features.iter().any(|f| names.contains(&f.as_str()));
    if app_type == AppType::Mobile {
        LayoutPattern::MobileApp
    } else if has(&["dashboard", "analytics", "metrics"]) {
        LayoutPattern::Dashboard
    } else if has(&["landing", "marketing", "homepage"]) {
        LayoutPattern::LandingPage
    } else {
        LayoutPattern::Dashboard
    }
}

fn layout(pattern: LayoutPattern) -> (&'static str, &'static [&'static str]) {
    match pattern {
        LayoutPattern::Dashboard => (
            "sidebar + main content",
            &["navigation", "metrics cards", "charts", "data tables"],
        ),
        LayoutPattern::LandingPage => (
            "hero + features + call to action",
            &["hero section", "feature grid", "testimonials", "call to action"],
        ),
        LayoutPattern::MobileApp => (
            "tab navigation + screens",
            &["bottom navigation", "cards", "forms", "lists"],
        ),
    }
}

/// Render the design system as a base stylesheet.
pub fn stylesheet(design: &DesignSystem) -> String {
    let p = &design.palette;
    format!(
        r#"/* {style} theme ({scheme}), {pattern} layout */
:root {{
  --primary-color: {primary};
  --secondary-color: {secondary};
  --accent-color: {accent};
  --background-color: {background};
  --text-color: {text};
}}

body {{
  font-family: {font};
  background-color: var(--background-color);
  color: var(--text-color);
  margin: 0;
  padding: 0;
}}

.btn-primary {{
  background-color: var(--primary-color);
  color: white;
  padding: 12px 24px;
  border: none;
  border-radius: 6px;
  cursor: pointer;
}}

.btn-primary:hover {{
  background-color: var(--accent-color);
}}

.card {{
  background: white;
  border-radius: 8px;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
  padding: 24px;
  margin: 16px 0;
}}

.container {{
  max-width: 1200px;
  margin: 0 auto;
  padding: 0 16px;
}}

.grid {{
  display: grid;
  gap: 24px;
}}

@media (min-width: 768px) {{
  .grid-cols-2 {{ grid-template-columns: repeat(2, 1fr); }}
  .grid-cols-3 {{ grid-template-columns: repeat(3, 1fr); }}
}}
"#,
        style = design.style,
        scheme = design.scheme,
        pattern = design.pattern,
        primary = p.primary,
        secondary = p.secondary,
        accent = p.accent,
        background = p.background,
        text = p.text,
        font = design.font_family,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn style_keyword_selects_scheme() {
        assert_eq!(create(AppType::Web, &[], "Professional").scheme, "tech_blue");
        assert_eq!(create(AppType::Web, &[], "eco-friendly").scheme, "success_green");
        assert_eq!(create(AppType::Web, &[], "dark").scheme, "midnight");
        assert_eq!(create(AppType::Web, &[], "whimsical").scheme, "vibrant_purple");
        let d = create(AppType::Web, &[], "  ");
        assert_eq!(d.style, "modern");
        assert_eq!(d.scheme, "vibrant_purple");
    }

    #[test]
    fn keywords_inside_other_words_do_not_count() {
        assert_eq!(create(AppType::Web, &[], "economy").scheme, "vibrant_purple");
        assert_eq!(create(AppType::Web, &[], "unprofessional").scheme, "vibrant_purple");
        assert_eq!(create(AppType::Web, &[], "calm, health first").scheme, "success_green");
    }

    #[test]
    fn pattern_follows_app_type_then_features() {
        let mobile = create(AppType::Mobile, &features(&["dashboard"]), "modern");
        assert_eq!(mobile.pattern, LayoutPattern::MobileApp);
        assert_eq!(mobile.navigation, "bottom tab navigation");

        let dash = create(AppType::Web, &features(&["auth", "dashboard"]), "modern");
        assert_eq!(dash.pattern, LayoutPattern::Dashboard);
        assert_eq!(dash.navigation, "top navigation bar");

        let landing = create(AppType::Web, &features(&["landing"]), "modern");
        assert_eq!(landing.pattern, LayoutPattern::LandingPage);
    }

    #[test]
    fn stylesheet_uses_palette() {
        let d = create(AppType::Web, &[], "corporate");
        let css = stylesheet(&d);
        assert!(css.contains("--primary-color: #2563eb;"));
        assert!(css.contains("corporate theme (tech_blue)"));
        assert_eq!(css, stylesheet(&d));
    }
}
