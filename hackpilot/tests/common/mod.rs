//! In-process doubles for the LLM and the deployment CLIs.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use hackpilot::deploy::{CommandOutput, CommandRunner, Invocation, RunError};
use hackpilot::llm::Completion;
use hackpilot::{AssistantError, Result};

/// Replays canned completions and remembers the prompts it was sent.
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn replying(replies: &[&str]) -> Self {
        let llm = Self::default();
        for r in replies {
            llm.push(Ok(r.to_string()));
        }
        llm
    }

    pub fn push(&self, reply: Result<String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedLlm {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AssistantError::remote("llm", "no scripted reply left")))
    }
}

/// Records invocations and answers with scripted outputs (success with
/// empty output once the script runs dry). `git init` creates `.git` in the
/// working directory like the real command.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    outputs: Arc<Mutex<VecDeque<CommandOutput>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl RecordingRunner {
    pub fn push_ok(&self, stdout: &str) {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        });
    }

    pub fn push_failure(&self, code: i32, stderr: &str) {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> std::result::Result<CommandOutput, RunError> {
        self.calls.lock().unwrap().push(invocation.clone());
        if invocation.program == "git" && invocation.args.first().map(String::as_str) == Some("init") {
            std::fs::create_dir_all(invocation.cwd.join(".git")).unwrap();
        }
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CommandOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }))
    }
}

pub fn ideas_json(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"title": "Idea {i}", "description": "Desc {i}.", "feasibility_score": {}, "estimated_hours": 24, "features": ["a", "b"]}}"#,
                90 - i * 5
            )
        })
        .collect();
    format!("```json\n[{}]\n```", items.join(",\n"))
}
