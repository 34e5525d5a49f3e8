//! Onboarding agent CLI
//!
//! Drives the relay from the command line: print the agent card, send an A2A
//! message, or run a chat completion. Input comes from an argument, a file, or stdin.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use onboard_rt::relay::a2a::message_request;
use onboard_rt::{
    A2aRequestHandler, AgentConfig, ChatCompletionsHandler, ChatResponse, WorkflowKind,
    build_agent,
};
use onboard_rt_observability::tracing_setup::init_tracing;
use serde_json::{Value, json};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "onboard-agent")]
#[command(about = "HR/IT onboarding agent: A2A tasks and chat completions", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workflow to serve (hr, new-hire, it, onboarding)
    #[arg(short, long, global = true)]
    agent: Option<WorkflowKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the agent card
    Card,

    /// Print the health document
    Health,

    /// Send an A2A message and print each JSON-RPC response on its own line
    Send(RequestArgs),

    /// Run a chat completion and print the JSON body or SSE frames
    Chat(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Stream the result
    #[arg(long)]
    stream: bool,

    /// Read the request from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Request text; stdin is read when neither this nor --input is given
    text: Option<String>,
}

impl RequestArgs {
    fn read(&self) -> anyhow::Result<String> {
        if let Some(path) = &self.input {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AgentConfig::load(cli.config.as_deref())?;
    if let Some(agent) = cli.agent {
        config.agent = agent;
    }
    info!(agent = %config.agent, url = %config.public_url(), "onboarding agent configured");
    let agent = build_agent(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Card => {
            writeln!(out, "{}", serde_json::to_string_pretty(&agent.card())?)?;
        }
        Commands::Health => {
            writeln!(out, "{}", agent.health())?;
        }
        Commands::Send(args) => {
            let request = a2a_request(&args.read()?, args.stream);
            for response in agent.handle_a2a(request).await? {
                writeln!(out, "{response}")?;
            }
        }
        Commands::Chat(args) => {
            let body = chat_request(&args.read()?, args.stream);
            match agent.complete(body).await? {
                ChatResponse::Json(body) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
                }
                ChatResponse::Stream(mut frames) => {
                    while let Some(frame) = frames.next().await {
                        out.write_all(frame.encode().as_bytes())?;
                        out.flush()?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Pass JSON-RPC requests through; wrap anything else as a user message.
fn a2a_request(input: &str, stream: bool) -> Value {
    match serde_json::from_str::<Value>(input.trim()) {
        Ok(value) if value.get("jsonrpc").is_some() => value,
        _ => message_request("cli-1", input.trim(), stream),
    }
}

/// Pass chat bodies through (forcing `stream`); wrap anything else as one user turn.
fn chat_request(input: &str, stream: bool) -> Value {
    match serde_json::from_str::<Value>(input.trim()) {
        Ok(Value::Object(mut body)) if body.contains_key("messages") => {
            if stream {
                body.insert("stream".to_string(), Value::Bool(true));
            }
            Value::Object(body)
        }
        _ => json!({
            "stream": stream,
            "messages": [{ "role": "user", "content": input.trim() }]
        }),
    }
}
