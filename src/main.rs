use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;

use commute_alert_lib::{config, engine, logging, presets, Context};

/// Evaluate a commute-alert context snapshot against the notification rules.
#[derive(Debug, Parser)]
#[command(name = "commute-alert", version)]
struct Cli {
    /// JSON context snapshot (weather, air quality, arrivals).
    #[arg(short, long, required_unless_present = "list_presets")]
    context: Option<PathBuf>,

    /// TOML rule file; replaces the configured rule file.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Directory holding config.toml.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Skip the built-in preset rules.
    #[arg(long)]
    no_presets: bool,

    /// Print only the highest-priority recommendation.
    #[arg(long)]
    top: bool,

    /// List the built-in presets and exit.
    #[arg(long)]
    list_presets: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load_or_default(&cli.config_dir)?;
    if cli.verbose {
        cfg.log_filter = "commute_alert_lib=debug".to_owned();
    }
    let _log_guard = logging::init(&cfg.log_filter, cfg.log_dir.as_deref())?;

    if cli.list_presets {
        println!("{}", serde_json::to_string_pretty(&presets::list_all())?);
        return Ok(());
    }

    if let Some(path) = cli.rules {
        cfg.rules_path = Some(path);
    }
    if cli.no_presets {
        cfg.include_presets = false;
    }
    let rules = config::resolve_rules(&cfg)?;

    let Some(context_path) = cli.context else {
        anyhow::bail!("--context is required");
    };
    let raw = std::fs::read_to_string(&context_path)
        .with_context(|| format!("reading {}", context_path.display()))?;
    let ctx: Context = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", context_path.display()))?;

    tracing::info!(
        "Evaluating alert {} for user {} against {} rules",
        ctx.alert_id, ctx.user_id, rules.len()
    );
    let ranked = engine::evaluate(&ctx, &rules);

    let out = if cli.top {
        serde_json::to_string_pretty(&engine::top_pick(&ranked))?
    } else {
        serde_json::to_string_pretty(&ranked)?
    };
    println!("{}", out);
    Ok(())
}
