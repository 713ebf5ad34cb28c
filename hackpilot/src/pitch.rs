//! Pitch assistant.
//!
//! The slide outline is picked locally from the theme and audience; the
//! model writes the slide text.

use serde::Deserialize;

use crate::error::{AssistantError, Result};
use crate::llm::{self, Completion};
use crate::models::{PitchDeck, ProjectContext, Slide};

pub struct PitchTemplate {
    pub name: &'static str,
    /// `(slide title, what the slide should cover)` in presentation order.
    pub slides: &'static [(&'static str, &'static str)],
}

pub const CLASSIC_STARTUP: PitchTemplate = PitchTemplate {
    name: "classic_startup",
    slides: &[
        ("Problem", "What problem are you solving?"),
        ("Solution", "How does the solution address the problem?"),
        ("Market", "How big is the opportunity?"),
        ("Product Demo", "What the working prototype shows"),
        ("Business Model", "How will it make money?"),
        ("Competition", "Who else is solving this and why we win"),
        ("Traction", "Progress made so far"),
        ("Team", "Why this team"),
        ("Ask", "What is needed to succeed"),
    ],
};

pub const HACKATHON_FOCUSED: PitchTemplate = PitchTemplate {
    name: "hackathon_focused",
    slides: &[
        ("Hook", "Grab attention with a compelling story"),
        ("Problem", "A real problem with emotional impact"),
        ("Solution Demo", "Walkthrough of the working solution"),
        ("Technical Innovation", "What is technically impressive"),
        ("Impact", "Who benefits and how much"),
        ("Next Steps", "What we would build next"),
    ],
};

pub const SOCIAL_IMPACT: PitchTemplate = PitchTemplate {
    name: "social_impact",
    slides: &[
        ("The Challenge", "The social or environmental problem"),
        ("Our Solution", "How technology helps"),
        ("Live Demo", "Impact in action"),
        ("Real Impact", "Quantify the difference made"),
        ("Scalability", "How to reach more people"),
        ("Call to Action", "How the audience can help"),
    ],
};

const SYSTEM: &str = r#"You write hackathon pitch decks. Respond with ONLY a JSON array with one object per slide, in the order given, each with "title" (string) and "body" (two to four short bullet lines as one string). No prose outside the JSON."#;

/// Pick the slide outline for a project and audience.
pub fn select_template(context: &ProjectContext, audience: &str) -> &'static PitchTemplate {
    let theme = context.theme.to_lowercase();
    if ["social", "impact", "environment", "good"]
        .iter()
        .any(|w| theme.contains(w))
    {
        &SOCIAL_IMPACT
    } else if audience.trim().eq_ignore_ascii_case("investors") {
        &CLASSIC_STARTUP
    } else {
        &HACKATHON_FOCUSED
    }
}

pub struct PitchAssistant<'a> {
    llm: &'a dyn Completion,
}

impl<'a> PitchAssistant<'a> {
    pub fn new(llm: &'a dyn Completion) -> Self {
        Self { llm }
    }

    pub async fn create(&self, context: &ProjectContext, audience: &str) -> Result<PitchDeck> {
        if context.name.trim().is_empty() {
            return Err(AssistantError::invalid("project name must not be empty"));
        }
        let audience = match audience.trim() {
            "" => "judges",
            a => a,
        };
        let template = select_template(context, audience);
        tracing::info!(project = %context.name, audience, template = template.name, "Writing pitch");

        let text = self.llm.complete(SYSTEM, &build_prompt(context, audience, template)).await?;
        let slides = parse_slides(&text)?;
        Ok(PitchDeck {
            project: context.name.trim().to_string(),
            audience: audience.to_string(),
            template: template.name.to_string(),
            slides,
        })
    }
}

fn build_prompt(context: &ProjectContext, audience: &str, template: &PitchTemplate) -> String {
    let mut prompt = format!("{}\n\nAudience: {audience}\n\nSlides:\n", context.prompt_section());
    for (i, (title, hint)) in template.slides.iter().enumerate() {
        prompt.push_str(&format!("{}. {title}: {hint}\n", i + 1));
    }
    prompt
}

#[derive(Deserialize)]
struct RawSlide {
    #[serde(default)]
    title: String,
    #[serde(default, alias = "content")]
    body: Option<RawBody>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBody {
    Text(String),
    Lines(Vec<String>),
}

impl RawSlide {
    fn into_slide(self) -> Option<Slide> {
        let title = self.title.trim().to_string();
        let body = match self.body? {
            RawBody::Text(s) => s.trim().to_string(),
            RawBody::Lines(lines) => lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        };
        (!title.is_empty() && !body.is_empty()).then_some(Slide { title, body })
    }
}

/// Slides in model order; entries without a title or body are dropped.
pub fn parse_slides(text: &str) -> Result<Vec<Slide>> {
    llm::json_values(text, '[')
        .map(|array| {
            let items = match array {
                serde_json::Value::Array(items) => items,
                _ => Vec::new(),
            };
            items
                .into_iter()
                .filter_map(|v| serde_json::from_value::<RawSlide>(v).ok())
                .filter_map(RawSlide::into_slide)
                .collect::<Vec<Slide>>()
        })
        .find(|slides| !slides.is_empty())
        .ok_or_else(|| AssistantError::remote("llm", "pitch response contained no slides"))
}

/// Format a deck as markdown, one `##` section per slide.
pub fn render_markdown(deck: &PitchDeck) -> String {
    let mut out = format!(
        "# {}\n\n_Pitch for {} ({})_\n",
        deck.project, deck.audience, deck.template
    );
    for (i, slide) in deck.slides.iter().enumerate() {
        out.push_str(&format!("\n## {}. {}\n\n{}\n", i + 1, slide.title, slide.body));
    }
    out
}
