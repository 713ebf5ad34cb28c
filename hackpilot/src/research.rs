//! Research agent: market, competitor and user research through the LLM.

use crate::error::{AssistantError, Result};
use crate::llm::Completion;
use crate::models::{ResearchFocus, ResearchReport};

const SYSTEM: &str = "You are a startup analyst helping a hackathon team validate an idea. \
Be concrete and concise, use short markdown sections and bullet points, and say so \
when a figure is an estimate rather than inventing precise numbers.";

const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("healthcare", &["health", "medical", "patient", "doctor", "medicine", "wellness"]),
    ("education", &["education", "learning", "student", "teacher", "training", "skill"]),
    ("finance", &["finance", "money", "banking", "payment", "investment", "fintech"]),
    (
        "environment",
        &["environment", "green", "climate", "carbon", "sustainability", "renewable"],
    ),
];

pub struct ResearchAgent<'a> {
    llm: &'a dyn Completion,
}

impl<'a> ResearchAgent<'a> {
    pub fn new(llm: &'a dyn Completion) -> Self {
        Self { llm }
    }

    pub async fn research(&self, topic: &str) -> Result<ResearchReport> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AssistantError::invalid("research topic must not be empty"));
        }
        let focus = classify_focus(topic);
        let domain = classify_domain(topic);
        tracing::info!(topic, %focus, domain, "Researching");

        let body = self.llm.complete(SYSTEM, &build_prompt(topic, focus, domain)).await?;
        let body = body.trim();
        if body.is_empty() {
            return Err(AssistantError::remote("llm", "empty research response"));
        }
        Ok(ResearchReport {
            topic: topic.to_string(),
            focus,
            domain: domain.to_string(),
            body: body.to_string(),
        })
    }
}

pub fn classify_focus(topic: &str) -> ResearchFocus {
    let t = topic.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| t.contains(w));
    if any(&["market", "industry", "sector"]) {
        ResearchFocus::Market
    } else if any(&["competitor", "competition", "rival"]) {
        ResearchFocus::Competition
    } else if any(&["user", "customer", "audience"]) {
        ResearchFocus::Users
    } else {
        ResearchFocus::Comprehensive
    }
}

/// Market domain for a topic, `"general"` when no keyword matches.
pub fn classify_domain(topic: &str) -> &'static str {
    let t = topic.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| t.contains(w)))
        .map_or("general", |(domain, _)| *domain)
}

fn build_prompt(topic: &str, focus: ResearchFocus, domain: &str) -> String {
    let sections = match focus {
        ResearchFocus::Market => {
            "market size and growth, key trends, target segments, barriers to entry, regulation"
        }
        ResearchFocus::Competition => {
            "market leaders, emerging players, what each does poorly, gaps a new entrant could own"
        }
        ResearchFocus::Users => {
            "user personas, top pain points, adoption barriers, what keeps users engaged"
        }
        ResearchFocus::Comprehensive => {
            "market overview, competitors, target users and their pain points, \
             opportunities, recommendations for a hackathon MVP"
        }
    };
    format!(
        "Research topic: {topic}\nDomain: {domain}\nFocus: {focus}\n\nCover: {sections}.\n\
         Finish with three key insights the team should act on."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_from_keywords() {
        assert_eq!(classify_focus("EdTech market size"), ResearchFocus::Market);
        assert_eq!(classify_focus("Rivals of Duolingo"), ResearchFocus::Competition);
        assert_eq!(classify_focus("Who are our customers"), ResearchFocus::Users);
        assert_eq!(classify_focus("Carbon tracking apps"), ResearchFocus::Comprehensive);
    }

    #[test]
    fn domain_from_keywords() {
        assert_eq!(classify_domain("Patient intake"), "healthcare");
        assert_eq!(classify_domain("Climate dashboards"), "environment");
        assert_eq!(classify_domain("Space tourism"), "general");
    }

    #[test]
    fn prompt_names_focus_and_domain() {
        let p = build_prompt("fintech users", ResearchFocus::Users, "finance");
        assert!(p.contains("Domain: finance\nFocus: users"));
        assert!(p.contains("pain points"));
    }
}
