//! Text and JSON rendering of command results for the terminal.

use hackpilot::history::Entry;
use hackpilot::models::{Idea, ProbeReport, StackRecommendation};
use hackpilot::{Outcome, pitch};

/// Render an outcome as human-readable text.
pub fn text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ideas(ideas) => ideas
            .iter()
            .enumerate()
            .map(|(i, idea)| idea_block(i + 1, idea))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::RefinedIdea(idea) => idea_block(1, idea),
        Outcome::App { app, written_to } => {
            let mut out = format!(
                "Generated {} app `{}` ({} style), {} files:\n",
                app.app_type,
                app.name,
                app.style,
                app.files.len()
            );
            for path in app.paths() {
                out.push_str(&format!("  {path}\n"));
            }
            if let Some(dir) = written_to {
                out.push_str(&format!("Written to {}\n", dir.display()));
            }
            out
        }
        Outcome::Deployment(d) => format!(
            "Deployed to {}: {}\nstatus: {} ({})\n",
            d.platform,
            d.url,
            d.status,
            d.deployed_at.to_rfc3339()
        ),
        Outcome::Research(r) => format!(
            "# Research: {}\n_focus: {}, domain: {}_\n\n{}\n",
            r.topic, r.focus, r.domain, r.body
        ),
        Outcome::Pitch(deck) => pitch::render_markdown(deck),
        Outcome::Probe(p) => probe_line(p),
        Outcome::Stack(rec) => stack_block(rec),
    }
}

fn idea_block(n: usize, idea: &Idea) -> String {
    let hours = idea
        .estimated_hours
        .map(|h| format!(", ~{h}h"))
        .unwrap_or_default();
    let mut out = format!("{n}. {} (feasibility {}/100{hours})\n", idea.title, idea.score);
    if !idea.description.is_empty() {
        out.push_str(&format!("   {}\n", idea.description));
    }
    if !idea.features.is_empty() {
        out.push_str(&format!("   features: {}\n", idea.features.join(", ")));
    }
    out
}

fn probe_line(p: &ProbeReport) -> String {
    match (&p.status_code, &p.error) {
        (Some(code), _) => format!(
            "{} is {} (HTTP {code}, {} ms)\n",
            p.url,
            if p.healthy { "healthy" } else { "unhealthy" },
            p.latency_ms
        ),
        (None, Some(err)) => format!("{} is unreachable: {err}\n", p.url),
        (None, None) => format!("{} is unreachable\n", p.url),
    }
}

pub fn history(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No history yet.\n".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "#{:<4} {}  [{}] {:<10} {}\n",
                e.id, e.created_at, e.project, e.kind, e.summary
            )
        })
        .collect()
}

fn stack_block(rec: &StackRecommendation) -> String {
    let p = &rec.primary;
    let mut out = format!(
        "Recommended stack: {} (score {}, {} project)\n{}\n",
        p.name, p.score, rec.requirements.kind, p.rationale
    );
    for (label, options) in [
        ("frontend", &p.frontend),
        ("backend", &p.backend),
        ("database", &p.database),
        ("deploy", &p.deployment),
    ]
    .into_iter()
    .chain(p.extras.iter().map(|(k, v)| (k.as_str(), v)))
    {
        if !options.is_empty() {
            out.push_str(&format!("  {label}: {}\n", options.join(", ")));
        }
    }
    out.push_str(&format!("\nSetup (~{} min):\n", rec.setup_minutes));
    for (i, step) in rec.setup.iter().enumerate() {
        match &step.command {
            Some(cmd) => out.push_str(&format!("  {}. {} ({} min): {cmd}\n", i + 1, step.title, step.minutes)),
            None => out.push_str(&format!("  {}. {} ({} min)\n", i + 1, step.title, step.minutes)),
        }
    }
    out.push_str(&format!(
        "\nDeploy to {}; needs {}\nArchitecture: {}\n",
        rec.deploy_to,
        rec.deploy_requirements.join(", "),
        rec.architecture.pattern
    ));
    if !rec.alternatives.is_empty() {
        out.push_str("\nAlternatives:\n");
        for alt in &rec.alternatives {
            out.push_str(&format!("  {} ({}): {}\n", alt.name, alt.score, alt.when_to_choose));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_text() {
        let ideas = Outcome::Ideas(vec![Idea {
            title: "Carbon Coach".into(),
            description: "Tracks footprints.".into(),
            score: 82,
            estimated_hours: Some(20),
            features: vec!["logging".into(), "charts".into()],
        }]);
        assert_eq!(
            text(&ideas),
            "1. Carbon Coach (feasibility 82/100, ~20h)\n   Tracks footprints.\n   features: logging, charts\n"
        );
    }

    #[test]
    fn probe_text() {
        let p = ProbeReport {
            url: "https://x.vercel.app".into(),
            healthy: false,
            status_code: None,
            latency_ms: 3,
            error: Some("connection refused".into()),
        };
        assert_eq!(probe_line(&p), "https://x.vercel.app is unreachable: connection refused\n");
    }

    #[test]
    fn stack_text() {
        let rec = hackpilot::stack::recommend("Community events", None);
        let out = text(&Outcome::Stack(rec));
        assert!(out.starts_with("Recommended stack: web_fullstack (score 70, web project)\n"));
        assert!(out.contains("  frontend: react, vue\n"));
        assert!(out.contains("Setup (~45 min):\n"));
        assert!(out.contains("  rapid_prototype (60): "));
    }

    #[test]
    fn empty_history() {
        assert_eq!(history(&[]), "No history yet.\n");
    }
}
