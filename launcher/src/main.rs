//! Script launcher CLI.
//!
//! `launcher run tool.py args...` reads the first line of `tool.py`, picks the
//! interpreter it names, and exits with that interpreter's exit code.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use launcher::error::LaunchError;
use launcher::exit_codes;
use launcher::io::config::{LauncherConfig, config_path, load_config};
use launcher::io::platform::SystemPlatform;
use launcher::launch::{LaunchRequest, Launcher};
use launcher::logging;

#[derive(Debug, Parser)]
#[command(
    name = "launcher",
    version,
    about = "Run a script through the interpreter named in its first line"
)]
struct Cli {
    /// Config file. Defaults to `$LAUNCHER_CONFIG`, then `launcher.toml` next
    /// to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pipeline decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a script and exit with its exit code.
    Run(ScriptArgs),
    /// Print the launch plan as JSON without running anything.
    Resolve(ScriptArgs),
    /// List registered interpreters, best match first.
    Interpreters,
}

#[derive(Debug, Args)]
struct ScriptArgs {
    /// Script to launch.
    script: PathBuf,

    /// Arguments forwarded to the script unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

impl ScriptArgs {
    fn into_request(self) -> LaunchRequest {
        LaunchRequest {
            script: self.script,
            args: self.args,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(parse_exit_code(&err));
        }
    };
    logging::init(cli.verbose);
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("launcher: {:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let platform = SystemPlatform;
    let config = load_launcher_config(cli.config, &platform)?;
    let registry = config.registry().context("build interpreter registry")?;
    let launcher = Launcher::new(&config, &registry, &platform);

    match cli.command {
        Command::Run(script) => Ok(launcher.run(&script.into_request())?),
        Command::Resolve(script) => {
            let plan = launcher.plan(&script.into_request())?;
            let json = serde_json::to_string_pretty(&plan).context("serialize launch plan")?;
            println!("{json}");
            Ok(0)
        }
        Command::Interpreters => {
            for entry in registry.entries() {
                println!("{}\t{}", entry.tag, entry.path.display());
            }
            Ok(0)
        }
    }
}

fn load_launcher_config(
    explicit: Option<PathBuf>,
    platform: &SystemPlatform,
) -> Result<LauncherConfig> {
    if let Some(path) = &explicit
        && !path.exists()
    {
        bail!("config file {} does not exist", path.display());
    }
    match config_path(explicit.as_deref(), platform) {
        Some(path) => load_config(&path),
        None => Ok(LauncherConfig::default()),
    }
}

/// `--help` and `--version` succeed; any other parse failure is a usage error.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        exit_codes::INVALID
    } else {
        0
    }
}

/// Launch failures carry their own code; anything else is a usage/config error.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LaunchError>()
        .map_or(exit_codes::INVALID, LaunchError::exit_code)
}
