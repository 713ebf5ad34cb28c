//! Deployment flows against a recording command runner.

mod common;

use common::{RecordingRunner, ScriptedLlm};
use hackpilot::deploy::{Deployer, Platform};
use hackpilot::history::History;
use hackpilot::models::{DeploymentStatus, ProjectContext};
use hackpilot::{Assistant, AssistantError, Command, Config, Outcome};

fn config_with(credentials: &[(&str, &str)]) -> Config {
    let mut cfg = Config::default();
    for (k, v) in credentials {
        cfg.credentials.insert(k.to_string(), v.to_string());
    }
    cfg
}

#[tokio::test]
async fn vercel_success() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_with(&[("vercel", "tok-123")]);
    let runner = RecordingRunner::default();
    runner.push_ok("Inspect: https://vercel.com/me/site\nProduction: https://site-abc.vercel.app [3s]\n");

    let result = Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Vercel)
        .await
        .unwrap();
    assert_eq!(result.url, "https://site-abc.vercel.app");
    assert_eq!(result.status, DeploymentStatus::Live);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command_line(), "vercel deploy --prod --yes");
    assert_eq!(calls[0].cwd, dir.path());
    assert!(calls[0].env.contains(&("VERCEL_TOKEN".to_string(), "tok-123".to_string())));
    // config files added on success stay
    assert!(dir.path().join("vercel.json").is_file());
}

#[tokio::test]
async fn missing_token_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::default();
    let runner = RecordingRunner::default();
    let err = Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Netlify)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Configuration(_)));
    assert!(runner.calls().is_empty());
    assert!(!dir.path().join("netlify.toml").exists());
}

#[tokio::test]
async fn rejected_push_is_deployment_failure_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Procfile"), "web: ./run.sh\n").unwrap();
    let cfg = config_with(&[("netlify", "tok")]);
    let runner = RecordingRunner::default();
    runner.push_failure(1, "Error: quota exceeded for this account");

    let err = Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Netlify)
        .await
        .unwrap_err();
    match &err {
        AssistantError::Deployment { platform, message } => {
            assert_eq!(platform, "netlify");
            assert!(message.contains("quota exceeded"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("netlify.toml").exists());
    // files that were already there are left alone
    assert!(dir.path().join("Procfile").is_file());
}

#[tokio::test]
async fn existing_config_file_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vercel.json"), "{\"custom\": true}").unwrap();
    let cfg = config_with(&[("vercel", "tok")]);
    let runner = RecordingRunner::default();
    runner.push_failure(1, "build failed");

    Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Vercel)
        .await
        .unwrap_err();
    let kept = std::fs::read_to_string(dir.path().join("vercel.json")).unwrap();
    assert_eq!(kept, "{\"custom\": true}");
}

#[tokio::test]
async fn output_without_url_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_with(&[("railway", "tok")]);
    let runner = RecordingRunner::default();
    runner.push_ok("Uploading...\nDone");
    runner.push_ok("No domains configured");

    let err = Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Railway)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Deployment { .. }));
    assert_eq!(runner.command_lines(), vec!["railway up --detach", "railway domain"]);
}

#[tokio::test]
async fn miren_needs_no_token_and_initializes_once() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("Demo App");
    std::fs::create_dir(&project).unwrap();
    let cfg = Config::default();
    let runner = RecordingRunner::default();
    runner.push_ok("initialized");
    runner.push_ok("Your app is available at:\n  https://demo-app.miren.dev\n");

    let result = Deployer::new(&cfg, &runner)
        .deploy(&project, Platform::Miren)
        .await
        .unwrap();
    assert_eq!(result.url, "https://demo-app.miren.dev");
    assert_eq!(runner.command_lines(), vec!["miren init -n demo-app", "miren deploy"]);
    assert!(runner.calls().iter().all(|c| c.env.is_empty()));
    assert!(project.join("Procfile").is_file());
}

#[tokio::test]
async fn failed_deploy_through_assistant_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::default();
    runner.push_failure(1, "Error: You have reached your deployment limit");
    let a = Assistant::new(config_with(&[("vercel", "tok")]), ProjectContext::new("p"))
        .with_history(History::in_memory().unwrap())
        .with_llm(Box::new(ScriptedLlm::default()))
        .with_runner(Box::new(runner.clone()));

    let err = a
        .run(Command::Deploy {
            path: dir.path().to_path_buf(),
            platform: Some("vercel".into()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Deployment { .. }));
    assert!(a.history().unwrap().list(None, None, 10).unwrap().is_empty());
    assert!(!dir.path().join("vercel.json").exists());
}

#[tokio::test]
async fn default_platform_comes_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_with(&[("heroku", "tok")]);
    cfg.deploy.default_platform = Some("heroku".into());
    let runner = RecordingRunner::default();
    runner.push_ok("");
    runner.push_failure(1, "Couldn't find that app.");
    for _ in 0..3 {
        runner.push_ok("");
    }
    runner.push_ok("remote: https://hackathon-x.herokuapp.com/ deployed to Heroku");

    let a = Assistant::new(cfg, ProjectContext::new("p"))
        .with_history(History::in_memory().unwrap())
        .with_runner(Box::new(runner.clone()));
    let Outcome::Deployment(result) = a
        .run(Command::Deploy {
            path: dir.path().to_path_buf(),
            platform: None,
        })
        .await
        .unwrap()
    else {
        panic!("expected deployment");
    };
    assert_eq!(result.platform, Platform::Heroku);
    assert_eq!(result.url, "https://hackathon-x.herokuapp.com");
    assert_eq!(runner.calls().len(), 6);
    assert_eq!(a.history().unwrap().list(Some("p"), None, 10).unwrap().len(), 1);
}

#[tokio::test]
async fn no_platform_anywhere_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let a = Assistant::new(Config::default(), ProjectContext::new("p"));
    let err = a
        .run(Command::Deploy {
            path: dir.path().to_path_buf(),
            platform: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::InvalidInput(_)));
}

fn heroku_script(runner: &RecordingRunner, app_exists: bool, push: Result<&str, &str>) {
    runner.push_ok("");
    if app_exists {
        runner.push_ok("=== hackathon-eco");
    } else {
        runner.push_failure(1, "Couldn't find that app.");
    }
    runner.push_ok("");
    runner.push_ok("");
    runner.push_ok("");
    match push {
        Ok(out) => runner.push_ok(out),
        Err(err) => runner.push_failure(1, err),
    }
}

#[tokio::test]
async fn heroku_redeploy_reuses_the_remote() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("eco");
    std::fs::create_dir(&project).unwrap();
    let cfg = config_with(&[("heroku", "tok")]);

    let first = RecordingRunner::default();
    heroku_script(&first, false, Ok("https://hackathon-eco.herokuapp.com/ deployed to Heroku"));
    Deployer::new(&cfg, &first)
        .deploy(&project, Platform::Heroku)
        .await
        .unwrap();
    assert_eq!(
        first.command_lines(),
        vec![
            "git init -b main",
            "heroku apps:info -a hackathon-eco",
            "heroku create hackathon-eco",
            "git add -A",
            "git commit --allow-empty -m Deploy to Heroku",
            "git push heroku HEAD:main",
        ]
    );
    assert!(project.join(".git").is_dir());

    let second = RecordingRunner::default();
    second.push_ok("https://git.heroku.com/hackathon-eco.git");
    second.push_ok("");
    second.push_ok("");
    second.push_ok("https://hackathon-eco.herokuapp.com/ deployed to Heroku");
    let result = Deployer::new(&cfg, &second)
        .deploy(&project, Platform::Heroku)
        .await
        .unwrap();
    assert_eq!(result.url, "https://hackathon-eco.herokuapp.com");
    assert_eq!(
        second.command_lines(),
        vec![
            "git remote get-url heroku",
            "git add -A",
            "git commit --allow-empty -m Deploy to Heroku",
            "git push heroku HEAD:main",
        ]
    );
    assert!(second.calls().iter().all(|c| c.env.contains(&("HEROKU_API_KEY".to_string(), "tok".to_string()))));
}

#[tokio::test]
async fn heroku_retry_after_failure_reattaches_app() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("eco");
    std::fs::create_dir(&project).unwrap();
    let cfg = config_with(&[("heroku", "tok")]);

    let first = RecordingRunner::default();
    heroku_script(&first, false, Err("! [remote rejected] main -> main (pre-receive hook declined)"));
    let err = Deployer::new(&cfg, &first)
        .deploy(&project, Platform::Heroku)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Deployment { .. }));
    // the repository and Procfile this attempt created are gone
    assert!(!project.join(".git").exists());
    assert!(!project.join("Procfile").exists());

    let retry = RecordingRunner::default();
    heroku_script(&retry, true, Ok("https://hackathon-eco.herokuapp.com/ deployed to Heroku"));
    Deployer::new(&cfg, &retry)
        .deploy(&project, Platform::Heroku)
        .await
        .unwrap();
    assert_eq!(
        &retry.command_lines()[..3],
        &["git init -b main", "heroku apps:info -a hackathon-eco", "heroku git:remote -a hackathon-eco"]
    );
}

#[tokio::test]
async fn heroku_keeps_an_existing_repository_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    let cfg = config_with(&[("heroku", "tok")]);
    let runner = RecordingRunner::default();
    runner.push_failure(2, "error: No such remote 'heroku'");
    runner.push_failure(1, "Couldn't find that app.");
    runner.push_failure(1, "Name is already taken");

    let err = Deployer::new(&cfg, &runner)
        .deploy(dir.path(), Platform::Heroku)
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Deployment { .. }));
    assert!(dir.path().join(".git").is_dir());
    assert_eq!(runner.command_lines()[0], "git remote get-url heroku");
}
