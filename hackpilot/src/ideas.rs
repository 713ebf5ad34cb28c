//! Idea generator.
//!
//! Turns a theme plus constraints into a prompt, asks the model for a JSON
//! array of ideas and maps whatever comes back into [`Idea`] records.
//! Scores are the model's own estimate; we only clamp them into range.

use serde::Deserialize;

use crate::error::{AssistantError, Result};
use crate::llm::{self, Completion};
use crate::models::Idea;

/// Upper bound on ideas per request.
pub const MAX_IDEAS: usize = 10;

const SYSTEM: &str = r#"You are a hackathon mentor who proposes project ideas a small team can build in a weekend.

Respond with ONLY a JSON array. Each element must be an object with:
- "title": short catchy name (string)
- "description": two or three sentences on the problem, the users and the solution (string)
- "feasibility_score": integer 0-100, how realistic it is to ship an MVP within the constraints
- "estimated_hours": integer, hours to a demoable MVP
- "features": array of 3-6 short feature names

Order the array from most to least feasible. No prose outside the JSON."#;

const REFINE_SYSTEM: &str = r#"You are a hackathon mentor refining a project idea based on feedback.

Respond with ONLY a JSON object with the keys "title", "description", "feasibility_score" (integer 0-100), "estimated_hours" (integer) and "features" (array of strings). No prose outside the JSON."#;

/// Problem domains and the theme keywords that point at them.
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("healthcare", &["health", "medical", "wellness", "ai", "mobile"]),
    ("education", &["education", "learn", "school", "social", "ai", "mobile"]),
    ("environment", &["environment", "green", "climate", "carbon", "sustainab"]),
    ("finance", &["finance", "money", "bank", "blockchain", "crypto", "ai"]),
    ("productivity", &["productivity", "work", "social", "ai", "mobile"]),
];

/// Generates and refines ideas through an LLM.
pub struct IdeaGenerator<'a> {
    llm: &'a dyn Completion,
}

impl<'a> IdeaGenerator<'a> {
    pub fn new(llm: &'a dyn Completion) -> Self {
        Self { llm }
    }

    /// Ask the model for up to `count` ideas for `theme`.
    pub async fn generate(
        &self,
        theme: &str,
        constraints: &[String],
        count: usize,
    ) -> Result<Vec<Idea>> {
        validate_count(count)?;
        let prompt = build_prompt(theme, constraints, count);
        tracing::info!(theme, count, "Generating ideas");

        let text = self.llm.complete(SYSTEM, &prompt).await?;
        let ideas = parse_ideas(&text, count)?;
        tracing::info!(returned = ideas.len(), "Ideas generated");
        Ok(ideas)
    }

    /// Rework one idea according to free-text feedback.
    pub async fn refine(&self, idea: &Idea, feedback: &str) -> Result<Idea> {
        if feedback.trim().is_empty() {
            return Err(AssistantError::invalid("feedback must not be empty"));
        }
        let current = serde_json::to_string_pretty(idea)
            .map_err(|e| AssistantError::invalid(format!("can't encode idea: {e}")))?;
        let prompt = format!("Current idea:\n{current}\n\nFeedback:\n{}", feedback.trim());
        let text = self.llm.complete(REFINE_SYSTEM, &prompt).await?;

        llm::json_values(&text, '{')
            .filter_map(|v| serde_json::from_value::<RawIdea>(v).ok())
            .find_map(RawIdea::into_idea)
            .ok_or_else(|| unparsable("no idea with a title and score in refinement response"))
    }
}

fn validate_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_IDEAS {
        return Err(AssistantError::invalid(format!(
            "count must be between 1 and {MAX_IDEAS}, got {count}"
        )));
    }
    Ok(())
}

fn unparsable(msg: &str) -> AssistantError {
    AssistantError::remote("llm", msg)
}

/// Domains worth steering the model towards for this theme. Falls back to
/// every domain when nothing matches.
pub fn relevant_domains(theme: &str) -> Vec<&'static str> {
    let theme = theme.to_lowercase();
    let matched: Vec<&'static str> = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| contains_word_prefix(&theme, w)))
        .map(|(domain, _)| *domain)
        .collect();
    if matched.is_empty() {
        DOMAIN_KEYWORDS.iter().map(|(d, _)| *d).collect()
    } else {
        matched
    }
}

/// True when some word of `text` starts with `prefix` ("ai" must not match
/// "chain", "learn" should match "learning").
pub(crate) fn contains_word_prefix(text: &str, prefix: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with(prefix))
}

pub fn build_prompt(theme: &str, constraints: &[String], count: usize) -> String {
    let theme = theme.trim();
    let mut prompt = if theme.is_empty() {
        format!("Generate {count} hackathon project ideas on any theme.\n")
    } else {
        format!("Generate {count} hackathon project ideas for the theme \"{theme}\".\n")
    };
    prompt.push_str(&format!(
        "Promising problem domains: {}.\n",
        relevant_domains(theme).join(", ")
    ));
    let constraints: Vec<&str> = constraints
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if !constraints.is_empty() {
        prompt.push_str("Constraints:\n");
        for c in constraints {
            prompt.push_str(&format!("- {c}\n"));
        }
    }
    prompt
}

/// Lenient shape of one idea as models tend to emit it.
#[derive(Debug, Deserialize)]
struct RawIdea {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "score", alias = "feasibility")]
    feasibility_score: Option<NumberLike>,
    #[serde(alias = "timeline_hours", alias = "hours")]
    estimated_hours: Option<NumberLike>,
    #[serde(default)]
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn value(&self) -> Option<f64> {
        let n = match self {
            NumberLike::Number(n) => Some(*n),
            NumberLike::Text(s) => s
                .trim()
                .trim_end_matches('%')
                .split_whitespace()
                .next()
                .and_then(|t| t.parse::<f64>().ok()),
        };
        n.filter(|n| n.is_finite())
    }
}

impl RawIdea {
    fn into_idea(self) -> Option<Idea> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        let score = self.feasibility_score.as_ref()?.value()?;
        let estimated_hours = self
            .estimated_hours
            .as_ref()
            .and_then(NumberLike::value)
            .filter(|h| *h >= 0.0)
            .map(|h| h.round() as u32);
        Some(Idea {
            title,
            description: self.description.trim().to_string(),
            score: score.round().clamp(0.0, 100.0) as u8,
            estimated_hours,
            features: self
                .features
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        })
    }
}

/// Parse model output into at most `count` ideas.
pub fn parse_ideas(text: &str, count: usize) -> Result<Vec<Idea>> {
    llm::json_values(text, '[')
        .map(|array| {
            let items = match array {
                serde_json::Value::Array(items) => items,
                _ => Vec::new(),
            };
            items
                .into_iter()
                .filter_map(|v| serde_json::from_value::<RawIdea>(v).ok())
                .filter_map(RawIdea::into_idea)
                .take(count)
                .collect::<Vec<Idea>>()
        })
        .find(|ideas| !ideas.is_empty())
        .ok_or_else(|| unparsable("response contained no usable ideas"))
}
