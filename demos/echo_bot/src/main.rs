//! Echo Bot Example
//!
//! A terminal bot built on the shared router.
//!
//! ```text
//! > ape: ping
//! #stdin: pong
//! > ape: echo hello   world
//! #stdin: hello world
//! > what's the weather in Tokyo?
//! #stdin: stdin: looks sunny in Tokyo
//! > ape: dance
//! #stdin: I don't know 'dance'. Try 'help'.
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot -- --name hal
//! ```

use std::path::PathBuf;

use anyhow::Result;
use ape::prelude::*;
use ape::runtime::ConfigLoader;
use ape::runtime::config::validate_config;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about = "A terminal echo bot")]
struct Args {
    /// Configuration file (defaults to ./ape.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(short, long)]
    profile: Option<String>,

    /// Name the bot answers to, overriding the configuration.
    #[arg(short, long)]
    name: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn say(event: &BoxedEvent, message: &str) {
    if let Err(e) = event.reply(message).await {
        error!(error = %e, "Failed to send reply");
    }
}

async fn ping(event: BoxedEvent, _args: Vec<String>) {
    say(&event, "pong").await;
}

async fn echo(event: BoxedEvent, args: Vec<String>) {
    if args.is_empty() {
        say(&event, "usage: echo <text>").await;
    } else {
        say(&event, &args.join(" ")).await;
    }
}

async fn help(event: BoxedEvent, _args: Vec<String>) {
    let commands = global::router().command_names().join(", ");
    say(&event, &format!("commands: {commands}")).await;
}

/// `args[0]` is the whole match, `args[1]` the city.
async fn weather(event: BoxedEvent, args: Vec<String>) {
    let city = args.get(1).map(String::as_str).unwrap_or_default();
    say(&event, &format!("{}: looks sunny in {city}", event.nick())).await;
}

async fn unknown(event: BoxedEvent, _args: Vec<String>) {
    let reply = format!("I don't know '{}'. Try 'help'.", event.command());
    say(&event, &reply).await;
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    let mut config = loader.load()?;
    if let Some(name) = args.name {
        config.bot.name = name;
        validate_config(&config)?;
    }

    global::add_command_fn("ping", ping);
    global::add_command_fn("echo", echo);
    global::add_command_fn("help", help);
    global::add_pattern_route_fn(Regex::new(r"(?i)weather in (\w+)")?, weather);
    global::set_default_fn(unknown);

    let runtime = ApeRuntime::with_router(&config, global::router());
    runtime.register_adapter::<TerminalAdapter>().await?;

    info!(
        bot = %runtime.identity().name,
        commands = runtime.router().command_count(),
        "Echo bot ready"
    );
    runtime.run().await?;

    Ok(())
}
