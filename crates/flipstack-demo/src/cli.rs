use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flipstack_core::FlipConfig;
use tracing::info;

use crate::error::Result;
use crate::logging::init_tracing;
use crate::output::{OutputFormat, write_records};
use crate::scenario::{SCENARIOS, Step, builtin};
use crate::settings::load_config;
use crate::sim::{SimOptions, simulate};
use crate::trace::read_trace;

#[derive(Debug, Parser)]
#[command(
    name = "flipstack-demo",
    about = "Drive a flippable card stack headlessly and print what a renderer would see",
    version
)]
pub struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a built-in gesture scenario.
    Simulate(SimulateArgs),

    /// Replay a JSONL pointer trace.
    Replay(ReplayArgs),

    /// Print the default config as TOML, or validate a config file.
    Config(ConfigArgs),

    /// Print built-in scenario names.
    #[command(name = "list-scenarios")]
    ListScenarios,
}

/// Options shared by every command that runs a simulation.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Number of cards in the stack.
    #[arg(long, default_value_t = 4)]
    pub cards: usize,

    /// Animation frame rate.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// TOML or JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print every command sent to the animation driver.
    #[arg(long)]
    pub commands: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            cards: 4,
            fps: 60.0,
            config: None,
            format: OutputFormat::Text,
            commands: false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Scenario name (see `list-scenarios`).
    #[arg(long, default_value = "flip-one")]
    pub scenario: String,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// JSONL file with one pointer sample per line.
    pub trace: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Validate this file instead of printing the defaults.
    #[arg(long)]
    pub check: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &mut out)
}

/// Run `command`, writing its output to `out`.
pub fn execute(command: Commands, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Simulate(args) => {
            let steps = builtin(&args.scenario, args.run.cards)?;
            info!(scenario = %args.scenario, steps = steps.len(), "simulating");
            run_steps(&args.run, &steps, out)
        }
        Commands::Replay(args) => {
            let steps: Vec<Step> = read_trace(&args.trace)?
                .into_iter()
                .map(Step::from)
                .collect();
            info!(trace = %args.trace.display(), steps = steps.len(), "replaying");
            run_steps(&args.run, &steps, out)
        }
        Commands::Config(args) => match args.check {
            Some(path) => {
                load_config(Some(path.as_path()))?;
                writeln!(out, "ok: {}", path.display())?;
                Ok(())
            }
            None => {
                write!(out, "{}", FlipConfig::default().to_toml_string()?)?;
                Ok(())
            }
        },
        Commands::ListScenarios => {
            for (name, description) in SCENARIOS {
                writeln!(out, "{name:<14} {description}")?;
            }
            Ok(())
        }
    }
}

fn run_steps(args: &RunArgs, steps: &[Step], out: &mut dyn Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let options = SimOptions {
        fps: args.fps,
        commands: args.commands,
    };
    let records = simulate(args.cards, config, options, steps)?;
    write_records(&records, args.format, out)
}
