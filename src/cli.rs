//! Command-line surface for the ternion client

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use ternion_client::ConsensusClient;
use ternion_core::{ClientConfig, ConsensusResult, ProtocolHeader, TaskResult, Trit};
use ternion_interp::LocalInterpreter;

#[derive(Parser, Debug)]
#[command(name = "ternion", about = "Ternary task protocol client", version)]
pub struct Cli {
    /// Service base URL (overrides config and TERNION_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Config file (default: ~/.ternion/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a program locally, without the service
    Eval {
        /// Source file, or "-" for stdin
        file: String,
    },
    /// Execute a program on the service
    Run {
        /// Source file, or "-" for stdin
        file: String,
    },
    /// Compile a program on the service
    Compile {
        /// Source file, or "-" for stdin
        file: String,
    },
    /// Ask one model
    Ask {
        prompt: String,
        /// Model to ask (default: configured default_model)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Ask several sources and vote on the outcome
    Consensus {
        prompt: String,
        /// Source to ask; repeat for more (default: configured default_sources)
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },
    /// Decode a wire header
    Header { wire: String },
    /// Check that the service is reachable
    Ping,
}

impl Cli {
    /// Config file (explicit or discovered), then environment, then flags.
    pub fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = ClientConfig::from_file(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                config.apply_env();
                config
            }
            None => ClientConfig::discover(),
        };
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Program text from a file path, or stdin for "-".
pub fn read_source(arg: &str) -> anyhow::Result<String> {
    if arg == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("reading program from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(Path::new(arg)).with_context(|| format!("reading program {}", arg))
}

/// Non-zero only when the outcome is Failed.
pub fn exit_code(state: Trit) -> ExitCode {
    if state.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Eval { file } => {
            let source = read_source(file)?;
            let run = LocalInterpreter::new().eval_with_output(&source);
            if cli.json {
                let doc = serde_json::json!({ "result": run.result, "output": run.output });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                for line in &run.output {
                    println!("{}", line);
                }
                println!("{}", run.result);
            }
            Ok(exit_code(run.result.state()))
        }
        Commands::Header { wire } => {
            let header = ProtocolHeader::parse(wire);
            if cli.json {
                let doc = serde_json::json!({
                    "header": header,
                    "overall": header.overall_state(),
                    "slots": header.slots(),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{}", render_header(&header));
            }
            Ok(exit_code(header.overall_state()))
        }
        Commands::Run { file } => {
            let source = read_source(file)?;
            let result = connect(&cli)?.run(&source).await;
            print_result(&result, cli.json)
        }
        Commands::Compile { file } => {
            let source = read_source(file)?;
            let result = connect(&cli)?.compile(&source).await;
            print_result(&result, cli.json)
        }
        Commands::Ask { prompt, model } => {
            let result = connect(&cli)?.ask(prompt, model.as_deref()).await;
            print_result(&result, cli.json)
        }
        Commands::Consensus { prompt, sources } => {
            let outcome = connect(&cli)?
                .consensus_call(prompt, sources.as_slice())
                .await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", render_consensus(&outcome));
            }
            Ok(exit_code(outcome.consensus))
        }
        Commands::Ping => {
            let result = connect(&cli)?.ping().await;
            print_result(&result, cli.json)
        }
    }
}

fn connect(cli: &Cli) -> anyhow::Result<ConsensusClient> {
    let config = cli.resolve_config()?;
    tracing::debug!(url = %config.base_url(), timeout_secs = config.timeout_secs, "connecting");
    Ok(ConsensusClient::new(config)?)
}

fn print_result(result: &TaskResult, json: bool) -> anyhow::Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result);
    }
    Ok(exit_code(result.state()))
}

pub fn render_header(header: &ProtocolHeader) -> String {
    let overall = header.overall_state();
    format!("{} overall {}({})", header, overall, overall.label())
}

pub fn render_consensus(outcome: &ConsensusResult) -> String {
    let width = outcome
        .per_source
        .iter()
        .map(|s| s.source.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = outcome
        .per_source
        .iter()
        .map(|s| format!("{:<width$}  {}", s.source, s.result, width = width))
        .collect();
    lines.push(format!(
        "consensus {}({}) header {} [{}ms]",
        outcome.consensus,
        outcome.consensus.label(),
        outcome.header,
        outcome.elapsed_ms
    ));
    lines.join("\n")
}
