//! Deployment helper.
//!
//! Pushes a local project directory to a hosting platform by driving the
//! platform's own CLI, then pulls the public URL out of its output.
//! Nothing is retried. Platform config files this module adds are removed
//! again when the attempt fails.

pub mod runner;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::codegen::template;
use crate::config::Config;
use crate::error::{AssistantError, Result};
use crate::llm::excerpt;
use crate::models::{DeploymentResult, DeploymentStatus, GeneratedApp, ProbeReport};
pub use runner::{CommandOutput, CommandRunner, Invocation, RunError, SystemRunner};

/// Hosting platforms we know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Vercel,
    Netlify,
    Heroku,
    Railway,
    Miren,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Vercel,
        Platform::Netlify,
        Platform::Heroku,
        Platform::Railway,
        Platform::Miren,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Vercel => "vercel",
            Platform::Netlify => "netlify",
            Platform::Heroku => "heroku",
            Platform::Railway => "railway",
            Platform::Miren => "miren",
        }
    }

    /// Environment variable the platform CLI reads its token from. `None`
    /// for platforms that use the CLI's own login state.
    pub fn token_env(&self) -> Option<&'static str> {
        match self {
            Platform::Vercel => Some("VERCEL_TOKEN"),
            Platform::Netlify => Some("NETLIFY_AUTH_TOKEN"),
            Platform::Heroku => Some("HEROKU_API_KEY"),
            Platform::Railway => Some("RAILWAY_TOKEN"),
            Platform::Miren => None,
        }
    }

    /// Domain the platform's public URLs live under, if fixed.
    fn url_domain(&self) -> Option<&'static str> {
        match self {
            Platform::Vercel => Some("vercel.app"),
            Platform::Netlify => Some("netlify.app"),
            Platform::Heroku => Some("herokuapp.com"),
            Platform::Railway => Some("railway.app"),
            Platform::Miren => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(AssistantError::invalid("platform must not be empty"));
        }
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                AssistantError::invalid(format!(
                    "unsupported platform `{s}` (supported: vercel, netlify, heroku, railway, miren)"
                ))
            })
    }
}

const VERCEL_JSON: &str = r#"{
  "version": 2,
  "cleanUrls": true
}
"#;

const NETLIFY_TOML: &str = r#"[build]
  command = "npm run build"
  publish = "dist"

[[redirects]]
  from = "/*"
  to = "/index.html"
  status = 200
"#;

/// Platform config file to add when the project lacks one.
fn config_file(platform: Platform, project: &Path) -> Option<(&'static str, String)> {
    match platform {
        Platform::Vercel => Some(("vercel.json", VERCEL_JSON.to_string())),
        Platform::Netlify => {
            let mut toml = NETLIFY_TOML.to_string();
            if project.join("frontend/package.json").is_file() {
                toml = toml.replacen("[build]\n", "[build]\n  base = \"frontend\"\n", 1);
            }
            Some(("netlify.toml", toml))
        }
        Platform::Heroku | Platform::Miren => Some(("Procfile", procfile(project))),
        Platform::Railway => None,
    }
}

/// Start command for the Python backend layouts the code generator produces.
fn procfile(project: &Path) -> String {
    let target = if project.join("backend/main.py").is_file() {
        "main:app --app-dir backend"
    } else if project.join("app/main.py").is_file() {
        "app.main:app"
    } else {
        "main:app"
    };
    format!("web: uvicorn {target} --host 0.0.0.0 --port ${{PORT:-8000}}\n")
}

/// Drives platform CLIs through a [`CommandRunner`].
pub struct Deployer<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> Deployer<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Deploy `path` to `platform` and return the live URL.
    pub async fn deploy(&self, path: &Path, platform: Platform) -> Result<DeploymentResult> {
        if !path.is_dir() {
            return Err(AssistantError::invalid(format!(
                "project path {} does not exist or is not a directory",
                path.display()
            )));
        }
        let token = match platform.token_env() {
            Some(_) => Some(self.config.credential(platform.as_str())?),
            None => None,
        };

        let created = prepare(path, platform).await?;
        let git_dir = path.join(".git");
        let fresh_repo = platform == Platform::Heroku && !git_dir.exists();
        tracing::info!(%platform, path = %path.display(), "Deploying");

        match self.push(path, platform, token).await {
            Ok(url) => {
                tracing::info!(%platform, url, "Deployment live");
                Ok(DeploymentResult {
                    platform,
                    url,
                    status: DeploymentStatus::Live,
                    deployed_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::warn!(%platform, error = %e, "Deployment failed");
                for file in &created {
                    if let Err(rm) = tokio::fs::remove_file(file).await {
                        tracing::warn!(file = %file.display(), error = %rm, "Failed to remove config file");
                    }
                }
                if fresh_repo && git_dir.is_dir() {
                    if let Err(rm) = tokio::fs::remove_dir_all(&git_dir).await {
                        tracing::warn!(dir = %git_dir.display(), error = %rm, "Failed to remove git repository");
                    }
                }
                Err(e)
            }
        }
    }

    async fn push(&self, path: &Path, platform: Platform, token: Option<&str>) -> Result<String> {
        let timeout = self.config.deploy_timeout();
        let mut transcript = Vec::new();
        if platform == Platform::Heroku {
            self.link_heroku(path, token, timeout, &mut transcript).await?;
        }
        for step in steps(path, platform, timeout) {
            let output = self.run_step(platform, token, &step).await?;
            transcript.push(output.combined());
        }

        transcript
            .iter()
            .rev()
            .find_map(|out| extract_url(out, platform.url_domain()))
            .ok_or_else(|| {
                AssistantError::deployment(
                    platform.as_str(),
                    format!(
                        "no deployment URL in CLI output: {}",
                        excerpt(transcript.last().map_or("", String::as_str), 500)
                    ),
                )
            })
    }

    /// Make sure the project is a git repository with a `heroku` remote.
    /// An app left over from an earlier attempt is reattached instead of
    /// created again.
    async fn link_heroku(
        &self,
        path: &Path,
        token: Option<&str>,
        timeout: Duration,
        transcript: &mut Vec<String>,
    ) -> Result<()> {
        let cmd = |program: &str, args: &[&str]| Invocation::new(program, args, path, timeout);
        let platform = Platform::Heroku;
        if path.join(".git").exists() {
            let remote = self
                .check(platform, token, &cmd("git", &["remote", "get-url", "heroku"]))
                .await?;
            if remote {
                return Ok(());
            }
        } else {
            self.run_step(platform, token, &cmd("git", &["init", "-b", "main"]))
                .await?;
        }

        let app = heroku_app_name(path);
        let exists = self
            .check(platform, token, &cmd("heroku", &["apps:info", "-a", &app]))
            .await?;
        let link = if exists {
            cmd("heroku", &["git:remote", "-a", &app])
        } else {
            cmd("heroku", &["create", &app])
        };
        let output = self.run_step(platform, token, &link).await?;
        transcript.push(output.combined());
        Ok(())
    }

    /// Run one step; a non-zero exit is a deployment failure.
    async fn run_step(
        &self,
        platform: Platform,
        token: Option<&str>,
        step: &Invocation,
    ) -> Result<CommandOutput> {
        let output = self.exec(platform, token, step).await?;
        if !output.success() {
            let code = output
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(AssistantError::deployment(
                platform.as_str(),
                format!(
                    "`{}` exited with {code}: {}",
                    step.command_line(),
                    excerpt(&output.combined(), 500)
                ),
            ));
        }
        Ok(output)
    }

    /// Run a query step and report whether it exited cleanly.
    async fn check(&self, platform: Platform, token: Option<&str>, step: &Invocation) -> Result<bool> {
        let output = self.exec(platform, token, step).await?;
        tracing::debug!(command = %step.command_line(), ok = output.success(), "Checked");
        Ok(output.success())
    }

    async fn exec(
        &self,
        platform: Platform,
        token: Option<&str>,
        step: &Invocation,
    ) -> Result<CommandOutput> {
        let step = match (platform.token_env(), token) {
            (Some(var), Some(token)) => step.clone().env(var, token),
            _ => step.clone(),
        };
        self.runner
            .run(&step)
            .await
            .map_err(|e| AssistantError::deployment(platform.as_str(), e.to_string()))
    }
}

/// Write missing platform config files. Returns the ones created.
async fn prepare(path: &Path, platform: Platform) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    if let Some((name, content)) = config_file(platform, path) {
        let file = path.join(name);
        if !file.exists() {
            tokio::fs::write(&file, content).await?;
            tracing::debug!(file = %file.display(), "Added platform config");
            created.push(file);
        }
    }
    Ok(created)
}

/// App name used where the platform needs one: the sanitized directory name.
fn app_name(path: &Path) -> String {
    let dir = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let slug = template::slug(&dir);
    if slug.is_empty() { "hackathon-app".to_string() } else { slug }
}

/// Heroku app names are capped at 30 characters.
const HEROKU_NAME_MAX: usize = 30;

/// `hackathon-<slug>`, cut to Heroku's name limit.
fn heroku_app_name(path: &Path) -> String {
    let mut app = format!("hackathon-{}", app_name(path));
    if app.len() > HEROKU_NAME_MAX {
        app.truncate(HEROKU_NAME_MAX);
        while app.ends_with('-') {
            app.pop();
        }
    }
    app
}

/// CLI invocations for one deployment, in order. Heroku's repository and
/// remote setup happens first, in [`Deployer::push`].
fn steps(path: &Path, platform: Platform, timeout: Duration) -> Vec<Invocation> {
    let cmd = |program: &str, args: &[&str]| Invocation::new(program, args, path, timeout);
    match platform {
        Platform::Vercel => vec![cmd("vercel", &["deploy", "--prod", "--yes"])],
        Platform::Netlify => vec![cmd("netlify", &["deploy", "--build", "--prod"])],
        Platform::Heroku => vec![
            cmd("git", &["add", "-A"]),
            cmd("git", &["commit", "--allow-empty", "-m", "Deploy to Heroku"]),
            cmd("git", &["push", "heroku", "HEAD:main"]),
        ],
        Platform::Railway => vec![
            cmd("railway", &["up", "--detach"]),
            cmd("railway", &["domain"]),
        ],
        Platform::Miren => {
            let mut steps = Vec::new();
            if !path.join(".miren/app.toml").exists() {
                steps.push(cmd("miren", &["init", "-n", &app_name(path)]));
            }
            steps.push(cmd("miren", &["deploy"]));
            steps
        }
    }
}

/// First `https://` URL in `output`, restricted to `domain` when given.
pub fn extract_url(output: &str, domain: Option<&str>) -> Option<String> {
    output
        .split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '(' | ')'))
        .filter(|tok| tok.starts_with("https://"))
        .map(|tok| tok.trim_end_matches(['.', ',', ';']).trim_end_matches('/'))
        .find(|url| {
            let host = url["https://".len()..].split('/').next().unwrap_or("");
            !host.is_empty() && domain.is_none_or(|d| host == d || host.ends_with(&format!(".{d}")))
        })
        .map(str::to_string)
}

/// Write a generated app under `base/<slug>`; returns the project directory.
pub async fn write_app(base: &Path, app: &GeneratedApp) -> Result<PathBuf> {
    let slug = template::slug(&app.name);
    if slug.is_empty() {
        return Err(AssistantError::invalid(
            "project name must contain at least one letter or digit",
        ));
    }
    let root = base.join(slug);
    for (rel, content) in &app.files {
        let rel = Path::new(rel);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(AssistantError::invalid(format!(
                "refusing to write outside the project: {}",
                rel.display()
            )));
        }
        let full = root.join(rel);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, content).await?;
    }
    tracing::info!(path = %root.display(), files = app.files.len(), "Wrote project");
    Ok(root)
}

/// HTTP GET health check. Network failures are reported, not raised.
pub async fn probe(url: &str, timeout: Duration) -> Result<ProbeReport> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AssistantError::invalid(format!(
            "url must start with http:// or https://, got `{url}`"
        )));
    }
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AssistantError::remote("probe", e.to_string()))?;

    let started = Instant::now();
    let report = match client.get(url).send().await {
        Ok(resp) => {
            let status = resp.status();
            ProbeReport {
                url: url.to_string(),
                healthy: status.is_success(),
                status_code: Some(status.as_u16()),
                latency_ms: started.elapsed().as_millis() as u64,
                error: None,
            }
        }
        Err(e) => ProbeReport {
            url: url.to_string(),
            healthy: false,
            status_code: None,
            latency_ms: started.elapsed().as_millis() as u64,
            error: Some(e.to_string()),
        },
    };
    tracing::info!(url, healthy = report.healthy, latency_ms = report.latency_ms, "Probed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parsing() {
        assert_eq!(" Vercel ".parse::<Platform>().unwrap(), Platform::Vercel);
        assert!(matches!(
            "render".parse::<Platform>(),
            Err(AssistantError::InvalidInput(_))
        ));
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn url_extraction() {
        let vercel = "Inspect: https://vercel.com/team/x\nProduction: https://eco-track.vercel.app [2s]\n";
        assert_eq!(
            extract_url(vercel, Some("vercel.app")).as_deref(),
            Some("https://eco-track.vercel.app")
        );
        let miren = "Your app is available at:\n  https://eco.miren.dev/\n";
        assert_eq!(extract_url(miren, None).as_deref(), Some("https://eco.miren.dev"));
        // look-alike hosts don't count
        assert_eq!(extract_url("https://evilvercel.app", Some("vercel.app")), None);
        assert_eq!(extract_url("deployed!", None), None);
    }

    #[test]
    fn heroku_push_steps() {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<String> = steps(dir.path(), Platform::Heroku, Duration::from_secs(1))
            .iter()
            .map(Invocation::command_line)
            .collect();
        assert_eq!(
            lines,
            vec![
                "git add -A",
                "git commit --allow-empty -m Deploy to Heroku",
                "git push heroku HEAD:main",
            ]
        );
    }

    #[test]
    fn heroku_app_name_fits_limit() {
        assert_eq!(heroku_app_name(Path::new("/tmp/Eco Track")), "hackathon-eco-track");
        let long = heroku_app_name(Path::new("/tmp/carbon-footprint-tracker-for-students"));
        assert_eq!(long, "hackathon-carbon-footprint-tra");
        assert!(long.len() <= HEROKU_NAME_MAX);
        // no trailing dash after the cut
        let cut = heroku_app_name(Path::new("/tmp/abcdefghijklmnopqrs-tuv"));
        assert_eq!(cut, "hackathon-abcdefghijklmnopqrs");
    }

    #[test]
    fn procfile_follows_layout() {
        let dir = tempfile::tempdir().unwrap();
        assert!(procfile(dir.path()).starts_with("web: uvicorn main:app --host"));
        std::fs::create_dir_all(dir.path().join("backend")).unwrap();
        std::fs::write(dir.path().join("backend/main.py"), "").unwrap();
        assert!(procfile(dir.path()).contains("--app-dir backend"));
        assert!(procfile(dir.path()).ends_with("--port ${PORT:-8000}\n"));
    }

    #[tokio::test]
    async fn write_app_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = std::collections::BTreeMap::new();
        files.insert("../evil.txt".to_string(), "x".to_string());
        let app = GeneratedApp {
            name: "x".into(),
            app_type: crate::codegen::AppType::Web,
            style: "modern".into(),
            features: vec![],
            files,
        };
        let err = write_app(dir.path(), &app).await.unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn probe_rejects_non_http_urls() {
        let err = probe("ftp://x", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)));
    }
}
