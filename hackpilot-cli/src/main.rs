//! hackpilot: hackathon assistant CLI.
//!
//!   hackpilot generate-ideas --theme "Climate Change" --count 3
//!   hackpilot recommend-stack --theme "Climate Change"
//!   hackpilot create-app --project EcoTrack --type web --features auth,dashboard --output .
//!   hackpilot deploy ./ecotrack --platform vercel
//!   hackpilot research "EdTech market"
//!   hackpilot create-pitch --project EcoTrack --audience investors
//!
//! Credentials come from ~/.config/hackpilot/config.toml or the usual
//! environment variables (ANTHROPIC_API_KEY, VERCEL_TOKEN, ...).

mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use hackpilot::history::{EntryKind, History};
use hackpilot::models::{Idea, ProjectContext};
use hackpilot::{Assistant, AssistantError, Command, Config, config};

#[derive(Parser)]
#[command(name = "hackpilot", version, about = "Hackathon assistant: ideas, scaffolding, deployment, pitches")]
struct Cli {
    /// Config file (default: ~/.config/hackpilot/config.toml)
    #[arg(long, global = true, env = "HACKPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// History database (default: ~/.local/share/hackpilot/history.db)
    #[arg(long, global = true, env = "HACKPILOT_HISTORY_DB")]
    history_db: Option<PathBuf>,

    /// Don't read or write history
    #[arg(long, global = true)]
    no_history: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Project name
    #[arg(long, short, global = true, env = "HACKPILOT_PROJECT")]
    project: Option<String>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Brainstorm project ideas for a theme
    GenerateIdeas {
        #[arg(long, default_value = "")]
        theme: String,
        /// Constraint the ideas must respect (repeatable)
        #[arg(long = "constraint")]
        constraints: Vec<String>,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Rework an idea according to feedback
    RefineIdea {
        /// Title of a previously generated idea
        title: String,
        #[arg(long)]
        feedback: String,
        /// Describe the idea here when it isn't in history
        #[arg(long)]
        description: Option<String>,
    },
    /// Scaffold an app from templates
    CreateApp {
        /// web, ml, mobile or blockchain
        #[arg(long = "type")]
        app_type: String,
        /// Comma-separated feature list
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
        #[arg(long, default_value = "modern")]
        style: String,
        /// Write the project under this directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Deploy a project directory
    Deploy {
        path: PathBuf,
        /// vercel, netlify, heroku, railway or miren
        #[arg(long)]
        platform: Option<String>,
    },
    /// Market, competitor and user research
    Research { topic: String },
    /// Write a pitch deck for the project
    CreatePitch {
        #[arg(long, default_value = "judges")]
        audience: String,
        #[arg(long, default_value = "")]
        theme: String,
        #[arg(long)]
        description: Option<String>,
        /// Technology used (repeatable)
        #[arg(long = "tech")]
        tech_stack: Vec<String>,
    },
    /// Check that a deployed URL answers
    Probe { url: String },
    /// Suggest a tech stack for the theme or a recorded idea
    RecommendStack {
        #[arg(long, default_value = "")]
        theme: String,
        /// Title of a previously generated idea
        #[arg(long)]
        idea: Option<String>,
    },
    /// List recorded results
    History {
        /// idea, app, deployment, research or pitch
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Include every project, not just --project
        #[arg(long)]
        all: bool,
    },
    /// Store a provider credential in the config file
    SetCredential {
        /// anthropic, openai, vercel, netlify, heroku or railway
        provider: String,
        value: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "hackpilot=warn",
        1 => "hackpilot=info",
        _ => "hackpilot=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let json_logs = std::env::var("HACKPILOT_LOG_JSON").unwrap_or_default() == "1";
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (kind, code) = e
                .downcast_ref::<AssistantError>()
                .map_or(("internal", 1), |ae| (ae.kind(), ae.exit_code()));
            tracing::warn!(kind, error = %e, "Command failed");
            if json {
                let body = serde_json::json!({ "error": { "kind": kind, "message": format!("{e:#}") } });
                println!("{body}");
            } else {
                println!("error: {e:#}");
            }
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut cfg = Config::load(&config_path)?;

    cfg.overlay_env(|var| std::env::var(var).ok());

    let mut context = ProjectContext::new(cli.project.as_deref().unwrap_or(""));
    if let Cmd::CreatePitch {
        theme,
        description,
        tech_stack,
        ..
    } = &cli.command
    {
        context.theme = theme.trim().to_string();
        context.description = description.clone();
        context.tech_stack = tech_stack.clone();
    }

    let mut assistant = Assistant::new(cfg, context);
    if !cli.no_history {
        let path = cli.history_db.clone().unwrap_or_else(config::default_history_path);
        assistant = assistant.with_history(History::open(&path)?);
    }

    let command = match cli.command {
        Cmd::GenerateIdeas {
            theme,
            constraints,
            count,
        } => Command::GenerateIdeas {
            theme,
            constraints,
            count,
        },
        Cmd::RefineIdea {
            title,
            feedback,
            description,
        } => {
            let idea = match assistant.find_idea(&title)? {
                Some(idea) => idea,
                None => adhoc_idea(&title, description)?,
            };
            Command::RefineIdea { idea, feedback }
        }
        Cmd::CreateApp {
            app_type,
            features,
            style,
            output,
        } => Command::CreateApp {
            app_type,
            features,
            style,
            output,
        },
        Cmd::Deploy { path, platform } => Command::Deploy { path, platform },
        Cmd::Research { topic } => Command::Research { topic },
        Cmd::CreatePitch { audience, .. } => Command::CreatePitch { audience },
        Cmd::Probe { url } => Command::Probe { url },
        Cmd::RecommendStack { theme, idea } => {
            let idea = match idea {
                Some(title) => Some(assistant.find_idea(&title)?.ok_or_else(|| {
                    AssistantError::invalid(format!("no idea titled `{}` in history", title.trim()))
                })?),
                None => None,
            };
            Command::RecommendStack { theme, idea }
        }
        Cmd::History { kind, limit, all } => {
            let Some(history) = assistant.history() else {
                return Err(AssistantError::invalid("history is disabled (--no-history)").into());
            };
            let kind = kind.as_deref().map(str::parse::<EntryKind>).transpose()?;
            let project = (!all).then(|| assistant.project());
            let entries = history.list(project, kind, limit)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", output::history(&entries));
            }
            return Ok(());
        }
        Cmd::SetCredential { provider, value } => {
            return set_credential(&config_path, &provider, &value);
        }
    };

    let outcome = assistant.run(command).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", output::text(&outcome));
    }
    Ok(())
}

/// Write a credential into the config file. Only the file's own contents
/// are saved, never the environment overlay.
fn set_credential(path: &Path, provider: &str, value: &str) -> Result<()> {
    let provider = provider.trim().to_lowercase();
    if provider.is_empty() || value.trim().is_empty() {
        return Err(AssistantError::invalid("provider and value must not be empty").into());
    }
    let mut cfg = Config::load(path)?;
    cfg.credentials.insert(provider.clone(), value.trim().to_string());
    cfg.save(path)?;
    println!("Saved `{provider}` credential to {}", path.display());
    Ok(())
}

/// Idea described on the command line, for refining something not in history.
fn adhoc_idea(title: &str, description: Option<String>) -> Result<Idea> {
    let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
        return Err(AssistantError::invalid(format!(
            "no idea titled `{}` in history; pass --description to describe it",
            title.trim()
        ))
        .into());
    };
    Ok(Idea {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        score: 50,
        estimated_hours: None,
        features: Vec::new(),
    })
}
