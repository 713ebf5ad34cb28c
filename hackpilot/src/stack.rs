//! Tech stack advisor.
//!
//! Local and deterministic, like the design assistant: the theme and the
//! chosen idea are reduced to a few requirements, every known stack is
//! scored against them, and the best one comes back with a setup plan,
//! a deployment target and an outline architecture.

use std::collections::BTreeMap;

use crate::ideas::contains_word_prefix;
use crate::models::{
    Architecture, Idea, ProjectKind, SetupStep, StackAlternative, StackChoice,
    StackRecommendation, StackRequirements,
};
use crate::research::classify_domain;

/// Stacks scoring below the top one, reported as alternatives.
const ALTERNATIVES: usize = 2;

/// More features than this suggests splitting into services.
const MONOLITH_MAX_FEATURES: usize = 5;

struct Profile {
    name: &'static str,
    /// Points for each project kind this stack suits.
    fit: &'static [(ProjectKind, u32)],
    frontend: &'static [&'static str],
    backend: &'static [&'static str],
    database: &'static [&'static str],
    deployment: &'static [&'static str],
    extras: &'static [(&'static str, &'static [&'static str])],
    learning_curve: &'static str,
    websockets: bool,
    rationale: &'static str,
    when_to_choose: &'static str,
    /// (title, command, minutes)
    setup: &'static [(&'static str, Option<&'static str>, u32)],
}

impl Profile {
    fn setup_minutes(&self) -> u32 {
        self.setup.iter().map(|(_, _, m)| m).sum()
    }
}

const PROFILES: &[Profile] = &[
    Profile {
        name: "web_fullstack",
        fit: &[(ProjectKind::Web, 40)],
        frontend: &["react", "vue", "angular"],
        backend: &["fastapi", "node.js", "python"],
        database: &["postgresql", "sqlite", "mongodb"],
        deployment: &["vercel", "netlify", "heroku"],
        extras: &[],
        learning_curve: "medium",
        websockets: true,
        rationale: "Balances capability and ease of use for web applications",
        when_to_choose: "Choose for a complete web app with a real backend and database",
        setup: &[
            ("Set up the development environment", None, 10),
            ("Initialize the frontend", Some("npm create vite@latest frontend -- --template react"), 5),
            ("Set up the backend API", Some("pip install fastapi uvicorn"), 5),
            ("Configure the database", Some("pip install sqlalchemy psycopg2-binary"), 10),
            ("Deploy the application", None, 15),
        ],
    },
    Profile {
        name: "ai_ml",
        fit: &[(ProjectKind::AiMl, 45)],
        frontend: &["streamlit", "gradio", "react"],
        backend: &["fastapi", "python", "jupyter"],
        database: &["postgresql", "vector-db", "mongodb"],
        deployment: &["railway", "huggingface-spaces", "streamlit-cloud"],
        extras: &[("ml_frameworks", &["scikit-learn", "pytorch", "huggingface", "tensorflow"])],
        learning_curve: "high",
        websockets: false,
        rationale: "Built for machine learning demos with good tooling for visualizing results",
        when_to_choose: "Choose if the project leans on machine learning or data analysis",
        setup: &[
            ("Install the Python data stack", Some("pip install pandas numpy"), 5),
            ("Set up notebooks", Some("pip install jupyter"), 3),
            ("Install ML frameworks", Some("pip install scikit-learn torch"), 10),
            ("Serve the model", Some("pip install fastapi uvicorn"), 5),
            ("Deploy the model API", None, 10),
        ],
    },
    Profile {
        name: "mobile_first",
        fit: &[(ProjectKind::Mobile, 40)],
        frontend: &["react-native", "flutter", "ionic"],
        backend: &["node.js", "python", "firebase"],
        database: &["firebase", "supabase", "mongodb"],
        deployment: &["expo", "firebase", "app-store"],
        extras: &[],
        learning_curve: "medium-high",
        websockets: false,
        rationale: "Suited to mobile-focused apps with cross-platform support",
        when_to_choose: "Choose if the mobile experience is central to the solution",
        setup: &[
            ("Install the Expo CLI", Some("npm install -g expo-cli"), 5),
            ("Create the app", Some("npx create-expo-app app"), 5),
            ("Set up a backend", None, 20),
            ("Run on a device", Some("npx expo start"), 10),
            ("Publish a preview build", None, 20),
        ],
    },
    Profile {
        name: "blockchain",
        fit: &[(ProjectKind::Blockchain, 40)],
        frontend: &["react", "next.js", "web3-ui"],
        backend: &[],
        database: &[],
        deployment: &["vercel", "ipfs", "fleek"],
        extras: &[
            ("blockchain", &["ethereum", "polygon", "solana"]),
            ("smart_contracts", &["solidity", "rust"]),
            ("web3_tools", &["ethers.js", "metamask", "hardhat"]),
        ],
        learning_curve: "high",
        websockets: false,
        rationale: "Needed for crypto and decentralized application development",
        when_to_choose: "Choose for crypto, DeFi or other decentralized applications",
        setup: &[
            ("Install Hardhat", Some("npm install --save-dev hardhat"), 10),
            ("Write and compile contracts", Some("npx hardhat compile"), 30),
            ("Deploy to a testnet", Some("npx hardhat run scripts/deploy.js --network sepolia"), 20),
            ("Connect the frontend wallet", Some("npm install ethers"), 30),
        ],
    },
    Profile {
        name: "iot_hardware",
        fit: &[(ProjectKind::Iot, 40)],
        frontend: &["react", "dashboard"],
        backend: &["python", "node.js", "mqtt"],
        database: &["influxdb", "sqlite"],
        deployment: &["railway", "edge"],
        extras: &[
            ("hardware", &["raspberry-pi", "esp32", "arduino"]),
            ("cloud", &["aws-iot", "azure-iot", "firebase"]),
        ],
        learning_curve: "high",
        websockets: true,
        rationale: "Required for projects built around physical sensors and devices",
        when_to_choose: "Choose if you are building with physical sensors or devices",
        setup: &[
            ("Flash the board", None, 30),
            ("Wire up sensors", None, 45),
            ("Set up an MQTT broker", Some("pip install paho-mqtt"), 20),
            ("Build a dashboard", None, 45),
        ],
    },
    Profile {
        name: "rapid_prototype",
        fit: &[(ProjectKind::Web, 20), (ProjectKind::AiMl, 10)],
        frontend: &["react", "streamlit", "gradio"],
        backend: &["fastapi", "flask", "express"],
        database: &["sqlite", "json", "in-memory"],
        deployment: &["vercel", "railway", "streamlit-cloud"],
        extras: &[],
        learning_curve: "low",
        websockets: false,
        rationale: "Optimized for quick demos and MVPs with minimal setup",
        when_to_choose: "Choose if you need to demo quickly and can skip full features",
        setup: &[
            ("Install Node.js and Python", None, 5),
            ("Create the frontend", Some("npm create vite@latest app -- --template react"), 3),
            ("Set up the FastAPI backend", Some("pip install fastapi uvicorn"), 2),
            ("Deploy to Vercel", Some("vercel deploy"), 5),
        ],
    },
];

/// Recommend a stack for a theme and, when chosen, the idea being built.
pub fn recommend(theme: &str, idea: Option<&Idea>) -> StackRecommendation {
    let requirements = analyze(theme, idea);

    let mut ranked: Vec<(u32, &Profile)> =
        PROFILES.iter().map(|p| (score(p, &requirements), p)).collect();
    // stable, so ties keep table order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let (top_score, top) = ranked[0];
    let alternatives = ranked[1..=ALTERNATIVES]
        .iter()
        .map(|(score, p)| StackAlternative {
            name: p.name.to_string(),
            score: *score,
            when_to_choose: p.when_to_choose.to_string(),
        })
        .collect();

    let deploy_to = top.deployment.first().copied().unwrap_or("vercel");
    let features = idea.map(|i| i.features.as_slice()).unwrap_or_default();
    tracing::info!(stack = top.name, score = top_score, kind = %requirements.kind, "Recommended stack");

    StackRecommendation {
        primary: StackChoice {
            name: top.name.to_string(),
            score: top_score,
            frontend: top_two(top.frontend),
            backend: top_two(top.backend),
            database: top_two(top.database),
            deployment: top_two(top.deployment),
            extras: top
                .extras
                .iter()
                .map(|(k, v)| (k.to_string(), top_two(v)))
                .collect(),
            learning_curve: top.learning_curve.to_string(),
            rationale: rationale(top, &requirements),
        },
        alternatives,
        setup: top
            .setup
            .iter()
            .map(|(title, command, minutes)| SetupStep {
                title: title.to_string(),
                command: command.map(str::to_string),
                minutes: *minutes,
            })
            .collect(),
        setup_minutes: top.setup_minutes(),
        deploy_to: deploy_to.to_string(),
        deploy_requirements: deploy_requirements(deploy_to),
        architecture: architecture(&requirements, features),
        requirements,
    }
}

fn top_two(options: &[&str]) -> Vec<String> {
    options.iter().take(2).map(|s| s.to_string()).collect()
}

/// Reduce the theme and idea text to stack requirements.
pub fn analyze(theme: &str, idea: Option<&Idea>) -> StackRequirements {
    let mut text = theme.to_lowercase();
    if let Some(idea) = idea {
        text.push(' ');
        text.push_str(&idea.title.to_lowercase());
        text.push(' ');
        text.push_str(&idea.description.to_lowercase());
        for f in &idea.features {
            text.push(' ');
            text.push_str(&f.to_lowercase());
        }
    }
    let mentions = |words: &[&str]| words.iter().any(|w| contains_word_prefix(&text, w));

    let kind = if mentions(&["ai", "ml", "machine", "neural", "predict", "llm", "nlp", "chatbot"]) {
        ProjectKind::AiMl
    } else if mentions(&["blockchain", "crypto", "web3", "nft", "defi", "ethereum", "solana", "dao"]) {
        ProjectKind::Blockchain
    } else if mentions(&["iot", "sensor", "hardware", "arduino", "raspberry", "wearable"]) {
        ProjectKind::Iot
    } else if mentions(&["mobile", "ios", "android", "smartphone"]) {
        ProjectKind::Mobile
    } else {
        ProjectKind::Web
    };
    let domain = classify_domain(&text);

    StackRequirements {
        kind,
        domain: domain.to_string(),
        high_complexity: matches!(
            kind,
            ProjectKind::AiMl | ProjectKind::Blockchain | ProjectKind::Iot
        ),
        high_security: matches!(domain, "healthcare" | "finance"),
        real_time: text.contains("real-time")
            || mentions(&["realtime", "live", "chat", "multiplayer", "websocket"]),
        data_visualization: mentions(&["dashboard", "analytics", "chart", "visualiz", "metrics"]),
    }
}

fn score(p: &Profile, req: &StackRequirements) -> u32 {
    let mut score = p
        .fit
        .iter()
        .find(|(kind, _)| *kind == req.kind)
        .map_or(0, |(_, points)| *points);

    score += match p.setup_minutes() {
        0..=30 => 20,
        31..=60 => 15,
        _ => 5,
    };
    score += match p.learning_curve {
        "low" => 20,
        "medium" => 15,
        _ => 5,
    };

    if req.real_time && p.websockets {
        score += 10;
    }
    if req.data_visualization && p.name == "ai_ml" {
        score += 15;
    }
    if req.high_security && p.name == "web_fullstack" {
        score += 10;
    }
    score
}

fn rationale(p: &Profile, req: &StackRequirements) -> String {
    let mut out = format!("{}. Quick to stand up within a hackathon weekend.", p.rationale);
    if req.kind != ProjectKind::Web {
        out.push_str(&format!(" Tuned for {} projects.", req.kind));
    }
    if req.high_security {
        out.push_str(&format!(
            " Plan for authentication and data protection early: {} data is sensitive.",
            req.domain
        ));
    }
    out
}

fn deploy_requirements(platform: &str) -> Vec<String> {
    let items: &[&str] = match platform {
        "vercel" => &["Vercel account and VERCEL_TOKEN", "Build script in package.json"],
        "netlify" => &["Netlify account and NETLIFY_AUTH_TOKEN", "Redirect rules for client routing"],
        "heroku" => &["Heroku account and HEROKU_API_KEY", "Procfile", "requirements.txt"],
        "railway" => &["Railway account and RAILWAY_TOKEN", "Start command"],
        _ => &["Platform account", "Project configuration"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

/// Outline architecture for the project's features.
pub fn architecture(req: &StackRequirements, features: &[String]) -> Architecture {
    let has = |prefix: &str| {
        features
            .iter()
            .any(|f| contains_word_prefix(&f.to_lowercase(), prefix))
    };
    let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let mut components = BTreeMap::new();
    components.insert("frontend".to_string(), list(&["user_interface", "state_management", "routing"]));
    let mut backend = list(&["api_server", "business_logic", "data_access"]);
    if req.real_time || has("real") || has("chat") {
        backend.push("websocket_handler".to_string());
    }
    if req.kind == ProjectKind::AiMl {
        backend.push("ml_model_service".to_string());
        backend.push("prediction_engine".to_string());
    }
    components.insert("backend".to_string(), backend);
    components.insert("database".to_string(), list(&["primary_storage", "caching_layer"]));
    components.insert("external".to_string(), list(&["third_party_apis", "authentication_service"]));

    let mut security = list(&["Input validation", "HTTPS everywhere", "Authentication tokens"]);
    if has("auth") || has("login") {
        security.extend(list(&["Password hashing", "Session management", "Authorization middleware"]));
    }
    if req.high_security {
        security.extend(list(&["Encryption at rest", "Audit logging"]));
    }

    Architecture {
        pattern: if features.len() > MONOLITH_MAX_FEATURES {
            "microservices"
        } else {
            "monolith"
        }
        .to_string(),
        layers: list(&["presentation", "business", "data"]),
        components,
        security,
    }
}
