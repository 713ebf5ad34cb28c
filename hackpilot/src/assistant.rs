//! Orchestrator.
//!
//! Dispatches one [`Command`] to the module that handles it and records the
//! result in history. Modules stay stateless; this is the only place that
//! writes history, and only after an operation succeeded.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::codegen::{self, AppType};
use crate::config::Config;
use crate::deploy::{self, CommandRunner, Deployer, Platform, SystemRunner};
use crate::error::{AssistantError, Result};
use crate::history::{EntryKind, History};
use crate::ideas::IdeaGenerator;
use crate::llm::{Completion, LlmClient};
use crate::models::{
    DeploymentResult, GeneratedApp, Idea, PitchDeck, ProbeReport, ProjectContext, ResearchReport,
    StackRecommendation,
};
use crate::pitch::PitchAssistant;
use crate::research::ResearchAgent;
use crate::stack;

/// Project name used for history when none is given.
pub const DEFAULT_PROJECT: &str = "default";

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// One user request.
#[derive(Debug, Clone)]
pub enum Command {
    GenerateIdeas {
        theme: String,
        constraints: Vec<String>,
        count: usize,
    },
    RefineIdea {
        idea: Idea,
        feedback: String,
    },
    CreateApp {
        app_type: String,
        features: Vec<String>,
        style: String,
        /// Write the files under this directory when set.
        output: Option<PathBuf>,
    },
    Deploy {
        path: PathBuf,
        /// Falls back to `deploy.default_platform` from config.
        platform: Option<String>,
    },
    Research {
        topic: String,
    },
    CreatePitch {
        audience: String,
    },
    Probe {
        url: String,
    },
    RecommendStack {
        theme: String,
        /// Idea being built, when one has been chosen.
        idea: Option<Idea>,
    },
}

/// Result of a [`Command`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Outcome {
    Ideas(Vec<Idea>),
    RefinedIdea(Idea),
    App {
        app: GeneratedApp,
        written_to: Option<PathBuf>,
    },
    Deployment(DeploymentResult),
    Research(ResearchReport),
    Pitch(PitchDeck),
    Probe(ProbeReport),
    Stack(StackRecommendation),
}

/// Builds an [`LlmClient`] from config on first use, so input validation
/// runs before the credential check.
struct ConfiguredLlm<'a> {
    config: &'a Config,
}

#[async_trait]
impl Completion for ConfiguredLlm<'_> {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let client = LlmClient::from_config(self.config)?;
        tracing::debug!(model = client.model(), "LLM request");
        client.complete(system, prompt).await
    }
}

pub struct Assistant {
    config: Config,
    context: ProjectContext,
    history: Option<History>,
    llm: Option<Box<dyn Completion>>,
    runner: Box<dyn CommandRunner>,
}

impl Assistant {
    pub fn new(config: Config, context: ProjectContext) -> Self {
        Self {
            config,
            context,
            history: None,
            llm: None,
            runner: Box::new(SystemRunner),
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    /// Use this completion backend instead of the configured provider.
    pub fn with_llm(mut self, llm: Box<dyn Completion>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_runner(mut self, runner: Box<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// History key of the active project.
    pub fn project(&self) -> &str {
        match self.context.name.trim() {
            "" => DEFAULT_PROJECT,
            name => name,
        }
    }

    pub async fn run(&self, command: Command) -> Result<Outcome> {
        let configured = ConfiguredLlm {
            config: &self.config,
        };
        let llm: &dyn Completion = match &self.llm {
            Some(llm) => llm.as_ref(),
            None => &configured,
        };

        match command {
            Command::GenerateIdeas {
                theme,
                constraints,
                count,
            } => {
                let ideas = IdeaGenerator::new(llm)
                    .generate(&theme, &constraints, count)
                    .await?;
                for idea in &ideas {
                    self.record(EntryKind::Idea, &format!("{} ({})", idea.title, idea.score), idea)?;
                }
                Ok(Outcome::Ideas(ideas))
            }
            Command::RefineIdea { idea, feedback } => {
                let refined = IdeaGenerator::new(llm).refine(&idea, &feedback).await?;
                self.record(
                    EntryKind::Idea,
                    &format!("{} ({}, refined)", refined.title, refined.score),
                    &refined,
                )?;
                Ok(Outcome::RefinedIdea(refined))
            }
            Command::CreateApp {
                app_type,
                features,
                style,
                output,
            } => {
                let app_type: AppType = app_type.parse()?;
                if self.context.name.trim().is_empty() {
                    return Err(AssistantError::invalid("create-app needs a project name"));
                }
                let app = codegen::generate(&self.context.name, app_type, &features, &style)?;
                let written_to = match &output {
                    Some(dir) => Some(deploy::write_app(dir, &app).await?),
                    None => None,
                };
                self.record(
                    EntryKind::App,
                    &format!("{} app, {} files", app.app_type, app.files.len()),
                    &serde_json::json!({
                        "name": &app.name,
                        "app_type": app.app_type,
                        "style": &app.style,
                        "features": &app.features,
                        "files": app.paths(),
                        "written_to": &written_to,
                    }),
                )?;
                Ok(Outcome::App { app, written_to })
            }
            Command::Deploy { path, platform } => {
                let platform: Platform = platform
                    .or_else(|| self.config.deploy.default_platform.clone())
                    .ok_or_else(|| {
                        AssistantError::invalid(
                            "no platform given and no deploy.default_platform configured",
                        )
                    })?
                    .parse()?;
                let result = Deployer::new(&self.config, self.runner.as_ref())
                    .deploy(&path, platform)
                    .await?;
                self.record(
                    EntryKind::Deployment,
                    &format!("{}: {}", result.platform, result.url),
                    &result,
                )?;
                Ok(Outcome::Deployment(result))
            }
            Command::Research { topic } => {
                let report = ResearchAgent::new(llm).research(&topic).await?;
                self.record(
                    EntryKind::Research,
                    &format!("{} research: {}", report.focus, report.topic),
                    &report,
                )?;
                Ok(Outcome::Research(report))
            }
            Command::CreatePitch { audience } => {
                let context = self.pitch_context()?;
                let deck = PitchAssistant::new(llm).create(&context, &audience).await?;
                self.record(
                    EntryKind::Pitch,
                    &format!("{} deck for {}", deck.template, deck.audience),
                    &deck,
                )?;
                Ok(Outcome::Pitch(deck))
            }
            Command::Probe { url } => Ok(Outcome::Probe(deploy::probe(&url, PROBE_TIMEOUT).await?)),
            Command::RecommendStack { theme, idea } => {
                let theme = match theme.trim() {
                    "" => self.context.theme.as_str(),
                    t => t,
                };
                let rec = stack::recommend(theme, idea.as_ref());
                self.record(
                    EntryKind::Stack,
                    &format!("{} stack ({})", rec.primary.name, rec.primary.score),
                    &rec,
                )?;
                Ok(Outcome::Stack(rec))
            }
        }
    }

    /// Project context for a pitch. Without an explicit tech stack, the
    /// latest recommended stack for the project fills it in.
    fn pitch_context(&self) -> Result<ProjectContext> {
        let mut context = self.context.clone();
        if context.tech_stack.is_empty() {
            if let Some(history) = &self.history {
                if let Some(rec) = history
                    .payloads::<StackRecommendation>(self.project(), EntryKind::Stack)?
                    .into_iter()
                    .next()
                {
                    context.tech_stack = rec.technologies();
                }
            }
        }
        Ok(context)
    }

    /// Latest recorded idea of the active project with this title.
    pub fn find_idea(&self, title: &str) -> Result<Option<Idea>> {
        let Some(history) = &self.history else {
            return Ok(None);
        };
        let title = title.trim();
        Ok(history
            .payloads::<Idea>(self.project(), EntryKind::Idea)?
            .into_iter()
            .find(|idea| idea.title.eq_ignore_ascii_case(title)))
    }

    fn record<T: Serialize>(&self, kind: EntryKind, summary: &str, payload: &T) -> Result<()> {
        if let Some(history) = &self.history {
            history.record(self.project(), kind, summary, payload)?;
        }
        Ok(())
    }
}
