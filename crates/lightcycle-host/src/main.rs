use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lightcycle_core::config::GameConfig;
use lightcycle_core::ports::Clock;
use lightcycle_duel::LightCycleDuel;
use lightcycle_host::clock::{FrameClock, Unpaced};
use lightcycle_host::renderer::{DEFAULT_COLUMNS, TextRenderer};
use lightcycle_host::script::InputScript;
use lightcycle_host::{HostError, MatchSummary, SessionOptions, run_match};

/// Run a two-player light-cycle duel in the terminal.
#[derive(Parser, Debug)]
#[command(name = "lightcycle", version)]
struct Cli {
    /// TOML config file. Without it $LIGHTCYCLE_CONFIG, then ./lightcycle.toml, are tried.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the configured frame rate.
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Run as fast as possible instead of pacing frames.
    #[arg(long)]
    unpaced: bool,

    /// Key presses to feed in, one `<tick> <key>...` per line.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write only every N-th frame.
    #[arg(long, default_value_t = 1)]
    render_every: usize,

    /// Width of the text arena in characters.
    #[arg(long, default_value_t = DEFAULT_COLUMNS, value_parser = clap::value_parser!(u16).range(1..=1024))]
    columns: u16,

    /// Print the match summary as JSON on stdout instead of drawing frames.
    #[arg(long)]
    json: bool,

    /// Also write the JSON summary to this file.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, HostError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::load(),
    };
    if let Some(frame_rate) = cli.frame_rate {
        config.frame_rate = frame_rate;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<MatchSummary, HostError> {
    let config = load_config(cli)?;
    let script = match &cli.script {
        Some(path) => InputScript::from_path(path)?,
        None => InputScript::default(),
    };

    let mut game = LightCycleDuel::from_config(&config)?;
    let out: Box<dyn Write> = if cli.json {
        Box::new(std::io::sink())
    } else {
        Box::new(std::io::stdout().lock())
    };
    let mut renderer =
        TextRenderer::new(out, game.board_size(), usize::from(cli.columns), cli.render_every)
            .with_background(config.background_color);
    let mut clock: Box<dyn Clock> = if cli.unpaced {
        Box::new(Unpaced)
    } else {
        Box::new(FrameClock::new())
    };
    let options = SessionOptions {
        max_ticks: cli.ticks,
        frame_rate: config.frame_rate,
        linger: if cli.unpaced {
            Duration::ZERO
        } else {
            Duration::from_millis(config.game_over_linger_ms)
        },
    };

    let summary = run_match(&mut game, &mut renderer, clock.as_mut(), &script, &options);

    if let Some(path) = &cli.summary {
        let json = serde_json::to_vec_pretty(&summary)?;
        std::fs::write(path, json).map_err(|source| HostError::Output {
            path: path.clone(),
            source,
        })?;
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let summary = match run(&cli) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "lightcycle failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        },
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to encode match summary: {e}");
                return ExitCode::FAILURE;
            },
        }
    } else {
        match &summary.winner {
            Some(winner) => println!("{winner} wins after {} ticks", summary.ticks),
            None if summary.aborted => println!("Match abandoned after {} ticks", summary.ticks),
            None => println!("No winner after {} ticks", summary.ticks),
        }
    }
    ExitCode::SUCCESS
}
