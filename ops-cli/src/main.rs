//! `careline` -- interactive console for the CareLine triage engine
//!
//! Reads turns from stdin, drives them through the workflow engine, and
//! prints the response with any triage tier. Runs against the bundled
//! demo directory; providers join the completion chain automatically
//! when their credentials are present in the environment.

use anyhow::Context;
use clap::Parser;
use completion_gateway::{CompletionGateway, GatewayConfig};
use patient_directory::InMemoryDirectory;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triage_engine::{RuleSet, TriageEngine};
use uuid::Uuid;
use workflow_engine::{PolicySet, TurnRequest, WorkflowEngine};

#[derive(Parser, Debug)]
#[command(name = "careline", version, about = "Interactive CareLine triage console")]
struct Cli {
    /// Append-only audit log destination (one JSON line per turn)
    #[arg(long, env = "CARELINE_AUDIT_LOG", default_value = "logs/turns.jsonl")]
    audit_log: PathBuf,

    /// Default patient context for turns that carry no id
    #[arg(long, env = "CARELINE_PATIENT_ID")]
    patient_id: Option<String>,

    /// Triage rule table override (JSON); compiled-in default otherwise
    #[arg(long, env = "CARELINE_TRIAGE_RULES")]
    triage_rules: Option<PathBuf>,

    /// Policy configuration override (JSON); compiled-in default otherwise
    #[arg(long, env = "CARELINE_POLICY")]
    policy: Option<PathBuf>,

    /// Skip completion providers entirely and run on rules alone
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let gateway = if cli.offline {
        None
    } else {
        let config = GatewayConfig::from_env().context("loading gateway configuration")?;
        let gateway = CompletionGateway::new(&config);
        let available = gateway.available_providers();
        if available.is_empty() {
            info!("No provider credentials found; running on rules alone");
            None
        } else {
            info!(providers = ?available, "Completion providers ready");
            Some(Arc::new(gateway))
        }
    };

    let rules = match &cli.triage_rules {
        Some(path) => RuleSet::from_file(path)
            .with_context(|| format!("loading triage rules from {}", path.display()))?,
        None => RuleSet::default(),
    };
    let policies = match &cli.policy {
        Some(path) => PolicySet::from_file(path)
            .with_context(|| format!("loading policy set from {}", path.display()))?,
        None => PolicySet::default(),
    };

    let audit = audit_engine::AuditEngine::open(&cli.audit_log)
        .with_context(|| format!("opening audit log at {}", cli.audit_log.display()))?;
    info!(path = %cli.audit_log.display(), "Audit log ready");

    let engine = WorkflowEngine::new(
        gateway,
        TriageEngine::new(rules),
        Arc::new(InMemoryDirectory::seed_demo()),
        Arc::new(audit),
        policies,
    );

    let session_id = format!("session_{}", Uuid::new_v4());
    let mut patient_id = cli.patient_id;

    println!("CareLine triage console");
    println!("Commands:");
    println!("  pid <8digit>   -> set default patient context");
    println!("  quit           -> exit");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("\nYou: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        if let Some(id) = input.strip_prefix("pid ") {
            let id = id.trim();
            if id.len() == 8 && id.chars().all(|c| c.is_ascii_digit()) {
                patient_id = Some(id.to_string());
                println!("[context] patient_id set to {id}");
            } else {
                println!("[context] patient id must be 8 digits");
            }
            continue;
        }

        let mut request = TurnRequest::new(input).with_session_id(session_id.clone());
        if let Some(id) = &patient_id {
            request = request.with_patient_id(id.clone());
        }
        let response = engine.process(request).await;

        match response.triage_tier {
            Some(tier) => println!("[{tier}] {}", response.response),
            None => println!("{}", response.response),
        }
    }

    Ok(())
}
