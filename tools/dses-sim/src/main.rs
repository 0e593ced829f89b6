//! DSES-Sim: replay a script of chaincode invocations.
//!
//! Each invocation prints one JSON line to stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dses_registry::{InMemoryLedger, RegistryConfig};
use dses_sim::{run, Script};
use dses_telemetry::{init_telemetry, TelemetryConfig};

/// DSES-Sim: DSES registry simulator
#[derive(Parser, Debug)]
#[command(name = "dses-sim")]
#[command(about = "Replay scripted registry invocations against an in-memory ledger")]
struct Args {
    /// Script file with initial balances and invocations
    script: PathBuf,

    /// Pretty-print each outcome instead of one line per invocation
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _telemetry = init_telemetry(TelemetryConfig::from_env().with_service_name("dses-sim"))
        .context("failed to initialise logging")?;

    let script = Script::load(&args.script)?;
    let ledger = InMemoryLedger::with_config(RegistryConfig::from_env());

    for outcome in run(&ledger, &script).await? {
        let line = if args.pretty {
            serde_json::to_string_pretty(&outcome)?
        } else {
            serde_json::to_string(&outcome)?
        };
        println!("{line}");
    }

    Ok(())
}
