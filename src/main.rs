use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use floorkit::{init_logging, init_logging_json, ReplayScript};
use floorkit_settings::{default_config_path, load_or_default, EngineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "floorkit-replay",
    version,
    about = "Replay a scripted input session against the floor-plan canvas"
)]
struct Cli {
    /// JSON replay script.
    script: PathBuf,

    /// Engine config (TOML or JSON). Defaults to the per-user config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Include the final render layers in the output.
    #[arg(long)]
    layers: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        init_logging_json()?;
    } else {
        init_logging()?;
    }

    let config = match cli.config.or_else(|| default_config_path().ok()) {
        Some(path) => load_or_default(&path),
        None => EngineConfig::default(),
    };
    let script = ReplayScript::load(&cli.script)?;

    tracing::info!(
        "Replaying {} steps from {}",
        script.steps.len(),
        cli.script.display()
    );
    let outcome = script.run(config, cli.layers);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string(&outcome)
    }
    .context("serializing replay outcome")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
