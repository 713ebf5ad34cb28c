//! Records passed between the assistant's modules.
//!
//! All of them are created once and handed forward; none is mutated after
//! being returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::codegen::AppType;
use crate::deploy::Platform;

/// What the user is building, assembled from CLI flags at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub name: String,
    pub theme: String,
    /// Ordered constraints, e.g. "48 hours", "no paid APIs".
    pub constraints: Vec<String>,
    pub tech_stack: Vec<String>,
    pub description: Option<String>,
}

impl ProjectContext {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Default::default()
        }
    }

    /// Render the context as a prompt section.
    pub fn prompt_section(&self) -> String {
        let mut parts = vec![format!("Project name: {}", self.name)];
        if !self.theme.trim().is_empty() {
            parts.push(format!("Hackathon theme: {}", self.theme.trim()));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            parts.push(format!("Description: {}", desc.trim()));
        }
        if !self.constraints.is_empty() {
            parts.push(format!("Constraints: {}", self.constraints.join("; ")));
        }
        if !self.tech_stack.is_empty() {
            parts.push(format!("Tech stack: {}", self.tech_stack.join(", ")));
        }
        parts.join("\n")
    }
}

/// A project idea returned by the idea generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    pub description: String,
    /// Feasibility score in 0..=100, as estimated by the model.
    pub score: u8,
    /// MVP timeline estimate in hours.
    pub estimated_hours: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A generated project: relative file path -> file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedApp {
    pub name: String,
    pub app_type: AppType,
    pub style: String,
    pub features: Vec<String>,
    pub files: BTreeMap<String, String>,
}

impl GeneratedApp {
    pub fn paths(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Live,
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Live => write!(f, "live"),
        }
    }
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub platform: Platform,
    pub url: String,
    pub status: DeploymentStatus,
    pub deployed_at: DateTime<Utc>,
}

/// Result of an HTTP health probe against a deployed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub url: String,
    pub healthy: bool,
    pub status_code: Option<u16>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchDeck {
    pub project: String,
    pub audience: String,
    /// Slide outline the deck was built from.
    pub template: String,
    pub slides: Vec<Slide>,
}

/// What a research query is mostly about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchFocus {
    Market,
    Competition,
    Users,
    Comprehensive,
}

impl std::fmt::Display for ResearchFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResearchFocus::Market => "market",
            ResearchFocus::Competition => "competition",
            ResearchFocus::Users => "users",
            ResearchFocus::Comprehensive => "comprehensive",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    pub focus: ResearchFocus,
    pub domain: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

/// Layout pattern picked for an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPattern {
    Dashboard,
    LandingPage,
    MobileApp,
}

impl std::fmt::Display for LayoutPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LayoutPattern::Dashboard => "dashboard",
            LayoutPattern::LandingPage => "landing page",
            LayoutPattern::MobileApp => "mobile app",
        };
        f.write_str(s)
    }
}

/// Colors and layout chosen from a style keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSystem {
    pub style: String,
    pub scheme: String,
    pub pattern: LayoutPattern,
    pub palette: Palette,
    pub structure: String,
    pub sections: Vec<String>,
    pub navigation: String,
    pub font_family: String,
}

/// Kind of project a stack recommendation is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Web,
    AiMl,
    Mobile,
    Blockchain,
    Iot,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectKind::Web => "web",
            ProjectKind::AiMl => "AI/ML",
            ProjectKind::Mobile => "mobile",
            ProjectKind::Blockchain => "blockchain",
            ProjectKind::Iot => "IoT",
        };
        f.write_str(s)
    }
}

/// What the theme and idea ask of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRequirements {
    pub kind: ProjectKind,
    /// Problem domain, as classified for research.
    pub domain: String,
    pub high_complexity: bool,
    pub high_security: bool,
    pub real_time: bool,
    pub data_visualization: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackChoice {
    pub name: String,
    pub score: u32,
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub database: Vec<String>,
    pub deployment: Vec<String>,
    /// Further categories, e.g. "ml_frameworks" or "hardware".
    pub extras: BTreeMap<String, Vec<String>>,
    pub learning_curve: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackAlternative {
    pub name: String,
    pub score: u32,
    pub when_to_choose: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupStep {
    pub title: String,
    pub command: Option<String>,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// "monolith" or "microservices".
    pub pattern: String,
    pub layers: Vec<String>,
    pub components: BTreeMap<String, Vec<String>>,
    pub security: Vec<String>,
}

/// Output of the tech stack advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRecommendation {
    pub requirements: StackRequirements,
    pub primary: StackChoice,
    pub alternatives: Vec<StackAlternative>,
    pub setup: Vec<SetupStep>,
    pub setup_minutes: u32,
    pub deploy_to: String,
    pub deploy_requirements: Vec<String>,
    pub architecture: Architecture,
}

impl StackRecommendation {
    /// Leading pick of each category, for [`ProjectContext::tech_stack`].
    pub fn technologies(&self) -> Vec<String> {
        let p = &self.primary;
        let mut out: Vec<String> = Vec::new();
        for options in [&p.frontend, &p.backend, &p.database]
            .into_iter()
            .chain(p.extras.values())
        {
            if let Some(first) = options.first().filter(|t| !out.contains(t)) {
                out.push(first.clone());
            }
        }
        out
    }
}
