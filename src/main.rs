use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use formstate::FormConfig;
use formstate::FormState;
use formstate::report::{form_to_json, outcome_to_json};
use formstate::script::ScriptEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formstate", about = "Drive a form from a JSON-lines event script")]
struct Cli {
    /// Form description (.yaml, .yml or .json).
    #[arg(short, long)]
    config: PathBuf,

    /// Event script, one JSON event per line. Reads stdin when omitted.
    #[arg(short, long)]
    script: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = FormConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let form = FormState::from_config(&config, |values| {
        println!("{}", serde_json::json!({ "submitted": values }));
    })?;

    match cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            event_loop(&form, BufReader::new(file)).await
        }
        None => event_loop(&form, BufReader::new(tokio::io::stdin())).await,
    }
}

async fn event_loop(form: &FormState, reader: impl AsyncBufRead + Unpin) -> Result<()> {
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let Some(event) = ScriptEvent::parse_line(&line)
            .with_context(|| format!("line {line_no}: malformed event"))?
        else {
            continue;
        };

        let outcome = event
            .apply(form)
            .await
            .with_context(|| format!("line {line_no}"))?;

        let mut report = form_to_json(form);
        if let Some(outcome) = outcome {
            report["outcome"] = outcome_to_json(outcome);
        }
        println!("{report}");
    }

    Ok(())
}
