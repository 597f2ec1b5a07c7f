//! issuer-cli — offline driver for the issuance ledger.
//!
//! Looks up periods, quotes mint awards, replays mint schedules against a
//! fresh ledger and compares exported ledger snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use issuer_core::config::IssuerConfig;
use issuer_core::ledger::{quote, IssuanceLedger};
use issuer_core::period;
use issuer_core::types::{LedgerState, MintOutcome};
use issuer_core::upgrade::LedgerSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Token-issuance ledger command-line interface.
#[derive(Parser)]
#[command(name = "issuer-cli")]
#[command(version, about = "Compute and replay token issuance")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format override ("text" or "json").
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the period containing a timestamp.
    Period(PeriodArgs),
    /// Compute the award for one participant without a ledger.
    Quote(QuoteArgs),
    /// Initialize a ledger and replay a schedule of mints.
    Simulate(SimulateArgs),
    /// Compare two snapshot files field by field.
    Verify(VerifyArgs),
}

#[derive(Args)]
struct PeriodArgs {
    /// Unix timestamp in seconds (default: now).
    #[arg(long)]
    now: Option<u64>,
}

#[derive(Args)]
struct QuoteArgs {
    /// Maximum issuable supply.
    #[arg(long)]
    total_supply: u128,
    /// Supply issued as of the snapshot the mint reads.
    #[arg(long)]
    current_supply: u128,
    /// Participant's locked value.
    #[arg(long)]
    locked: u128,
    /// Sum of locked value across participants.
    #[arg(long)]
    total_locked: u128,
    /// Number of periods the value stays locked.
    #[arg(long)]
    periods: u64,
}

#[derive(Args)]
struct SimulateArgs {
    /// JSON schedule file.
    #[arg(short, long)]
    schedule: PathBuf,
    /// Write the final ledger snapshot here.
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Reference snapshot.
    #[arg(long)]
    left: PathBuf,
    /// Snapshot checked against the reference.
    #[arg(long)]
    right: PathBuf,
}

/// A replayable issuance schedule.
#[derive(Debug, Deserialize)]
struct Schedule {
    reserved_reward: u128,
    total_supply: u128,
    /// Initialization time in Unix seconds (default: now).
    #[serde(default)]
    now: Option<u64>,
    mints: Vec<MintRequest>,
}

#[derive(Debug, Deserialize)]
struct MintRequest {
    period: u64,
    locked_value: u128,
    total_locked_value: u128,
    all_locked_periods: u64,
}

#[derive(Debug, Serialize)]
struct MintReport {
    #[serde(flatten)]
    outcome: MintOutcome,
    state: LedgerState,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    initial: LedgerState,
    mints: Vec<MintReport>,
    total_minted: u128,
    reserved_reward: u128,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = IssuerConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(&config.log_level, &config.log_format);

    match cli.command {
        Commands::Period(args) => cmd_period(&config, args),
        Commands::Quote(args) => cmd_quote(&config, args),
        Commands::Simulate(args) => cmd_simulate(&config, args),
        Commands::Verify(args) => cmd_verify(args),
    }
}

fn cmd_period(config: &IssuerConfig, args: PeriodArgs) -> Result<()> {
    let params = config.parameters().context("invalid issuance parameters")?;
    let now = args.now.unwrap_or_else(period::now_secs);
    let current = period::current_period(now, params.seconds_per_period())?;
    println!("{current}");
    Ok(())
}

fn cmd_quote(config: &IssuerConfig, args: QuoteArgs) -> Result<()> {
    let params = config.parameters().context("invalid issuance parameters")?;
    if args.current_supply > args.total_supply {
        bail!(
            "current supply {} exceeds total supply {}",
            args.current_supply,
            args.total_supply
        );
    }
    let amount = quote(
        &params,
        args.total_supply,
        args.current_supply,
        args.locked,
        args.total_locked,
        args.periods,
    )
    .context("mint formula failed")?;
    println!("{amount}");
    Ok(())
}

fn cmd_simulate(config: &IssuerConfig, args: SimulateArgs) -> Result<()> {
    let params = config.parameters().context("invalid issuance parameters")?;
    let raw = fs::read_to_string(&args.schedule)
        .with_context(|| format!("failed to read schedule {}", args.schedule.display()))?;
    let schedule: Schedule = serde_json::from_str(&raw).context("invalid schedule JSON")?;

    let report = simulate(IssuanceLedger::new(params), &schedule, args.snapshot_out.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn simulate(
    mut ledger: IssuanceLedger,
    schedule: &Schedule,
    snapshot_out: Option<&Path>,
) -> Result<SimulationReport> {
    let now = schedule.now.unwrap_or_else(period::now_secs);
    ledger
        .initialize(schedule.reserved_reward, schedule.total_supply, now)
        .context("initialize failed")?;
    let initial = *ledger.state();

    let mut mints = Vec::with_capacity(schedule.mints.len());
    let mut total_minted: u128 = 0;
    for (index, req) in schedule.mints.iter().enumerate() {
        let outcome = ledger
            .mint_detailed(
                req.period,
                req.locked_value,
                req.total_locked_value,
                req.all_locked_periods,
            )
            .with_context(|| format!("mint {index} (period {}) failed", req.period))?;
        total_minted = total_minted
            .checked_add(outcome.amount)
            .context("total minted overflow")?;
        mints.push(MintReport {
            outcome,
            state: *ledger.state(),
        });
    }
    info!(count = mints.len(), total_minted = %total_minted, "simulation complete");

    if let Some(path) = snapshot_out {
        let bytes = ledger.export_state().to_bytes()?;
        fs::write(path, bytes)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(SimulationReport {
        initial,
        mints,
        total_minted,
        reserved_reward: ledger.reserved_reward(),
    })
}

fn read_snapshot(path: &Path) -> Result<LedgerSnapshot> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read snapshot {}", path.display()))?;
    LedgerSnapshot::from_bytes(&bytes)
        .with_context(|| format!("invalid snapshot {}", path.display()))
}

fn cmd_verify(args: VerifyArgs) -> Result<()> {
    let reference = read_snapshot(&args.left)?;
    let candidate = IssuanceLedger::from_snapshot(&read_snapshot(&args.right)?)?;
    match candidate.verify_state(&reference) {
        Ok(()) => {
            println!("snapshots match");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "snapshots differ");
            bail!(e)
        }
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Logs go to stderr so stdout stays
/// machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
