use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use entrance_router::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    about = "Loads an entrance remap table and drives it against a simulated host",
    version
)]
pub struct Args {
    /// Entrance remap config (five lines per rule)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print every loaded rule
    #[arg(long)]
    pub list: bool,

    /// Path to write the parsed table as JSON
    #[arg(long)]
    pub table_json: Option<PathBuf>,

    /// Level the simulated transition leaves from (requires --to)
    #[arg(long, value_name = "LEVEL")]
    pub from: Option<String>,

    /// Level the simulated transition requests (requires --from)
    #[arg(long, value_name = "LEVEL")]
    pub to: Option<String>,

    /// Print the routing decision as JSON (with --from/--to)
    #[arg(long)]
    pub json: bool,

    /// JSON replay script of host events to run through the router
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Level the simulated host starts in when replaying a script
    #[arg(long, value_name = "LEVEL", default_value = "GOMEZ_HOUSE")]
    pub start_level: String,

    /// Path to write the host event log as JSON (requires --script)
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Log routing decisions at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug)]
pub enum Command {
    List(ListArgs),
    Route(RouteArgs),
    Replay(ReplayArgs),
}

#[derive(Debug)]
pub struct ListArgs {
    pub config: PathBuf,
    pub table_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RouteArgs {
    pub config: PathBuf,
    pub from: String,
    pub to: String,
    pub json: bool,
}

#[derive(Debug)]
pub struct ReplayArgs {
    pub config: PathBuf,
    pub script: PathBuf,
    pub start_level: String,
    pub event_log_json: Option<PathBuf>,
}

pub fn parse() -> Result<Invocation> {
    let args = Args::parse();
    args.into_invocation()
}

impl Args {
    fn into_invocation(self) -> Result<Invocation> {
        if self.event_log_json.is_some() && self.script.is_none() {
            bail!("--event-log-json requires --script");
        }
        if self.json && self.from.is_none() && self.to.is_none() {
            bail!("--json requires --from and --to");
        }
        if self.script.is_some() && (self.from.is_some() || self.to.is_some()) {
            bail!("--script cannot be combined with --from/--to");
        }
        let simulating = self.script.is_some() || self.from.is_some() || self.to.is_some();
        if simulating && (self.list || self.table_json.is_some()) {
            bail!("--list/--table-json cannot be combined with --from/--to or --script");
        }

        let command = match (self.from, self.to, self.script) {
            (Some(from), Some(to), None) => Command::Route(RouteArgs {
                config: self.config,
                from,
                to,
                json: self.json,
            }),
            (Some(_), None, _) => bail!("--from requires --to"),
            (None, Some(_), _) => bail!("--to requires --from"),
            (None, None, Some(script)) => Command::Replay(ReplayArgs {
                config: self.config,
                script,
                start_level: self.start_level,
                event_log_json: self.event_log_json,
            }),
            _ => Command::List(ListArgs {
                config: self.config,
                table_json: self.table_json,
            }),
        };

        Ok(Invocation {
            verbose: self.verbose,
            command,
        })
    }
}
