use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use entrance_router::{
    ConfigLoader, EntranceRouter, EntranceTable, HostServices, LevelManager, RouteDecision,
};
use log::info;

mod cli;
mod replay;
mod sim;

use cli::{Command, ListArgs, ReplayArgs, RouteArgs};
use replay::{load_script, run_script, EventLog};
use sim::SimulatedHost;

fn main() -> Result<()> {
    let invocation = cli::parse()?;
    init_logging(invocation.verbose);

    match invocation.command {
        Command::List(args) => run_list(args),
        Command::Route(args) => run_route(args),
        Command::Replay(args) => run_replay(args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_table(path: &Path) -> Result<EntranceTable> {
    ConfigLoader::load_path(path)
        .with_context(|| format!("loading entrance table from {}", path.display()))
}

fn run_list(args: ListArgs) -> Result<()> {
    let table = load_table(&args.config)?;

    if let Some(path) = args.table_json.as_ref() {
        let json = table
            .to_json_string()
            .context("serializing entrance table to JSON")?;
        write_output(path, &json)?;
        println!("Saved entrance table JSON to {}", path.display());
    }

    println!(
        "Entrance table {} ({} rule(s))",
        args.config.display(),
        table.len()
    );
    for (idx, rule) in table.iter().enumerate() {
        println!(
            "  {:>3}. {} -> {} => {} @ volume {} facing {}",
            idx + 1,
            rule.from_level,
            rule.to_level_original,
            rule.to_level_remapped,
            rule.destination_volume_id,
            rule.destination_viewpoint
        );
    }
    Ok(())
}

fn run_route(args: RouteArgs) -> Result<()> {
    let table = load_table(&args.config)?;
    let host = SimulatedHost::new(&args.from);
    let router = EntranceRouter::new(table, HostServices::from_single(host.clone()));
    let decision = router.route_level_change(&args.from, &args.to);

    let active = router.attach(host.clone());
    host.change_level(&args.to);
    drop(active);

    if args.json {
        let json =
            serde_json::to_string_pretty(&decision).context("serializing route decision")?;
        println!("{json}");
    } else {
        println!("{}", describe_decision(&decision));
    }
    Ok(())
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let table = load_table(&args.config)?;
    let steps = load_script(&args.script)?;
    let host = SimulatedHost::new(&args.start_level);
    let router = EntranceRouter::new(table, HostServices::from_single(host.clone()));

    let active = router.attach(host.clone());
    info!("replaying {} step(s) from {}", steps.len(), args.script.display());
    run_script(&host, &steps);
    drop(active);

    let events = host.events();
    let final_level = host.name();
    println!(
        "Replayed {} step(s); final level {final_level}",
        steps.len()
    );

    if let Some(path) = args.event_log_json.as_ref() {
        let log = EventLog {
            start_level: &args.start_level,
            final_level,
            destination_volume: host.destination_volume(),
            spin_through_door: host.spin_through_door(),
            far_away: host.is_far_away(),
            events: &events,
        };
        let json = serde_json::to_string_pretty(&log).context("serializing host event log")?;
        write_output(path, &json)?;
        println!("Saved host event log to {}", path.display());
    }
    Ok(())
}

fn describe_decision(decision: &RouteDecision) -> String {
    match (decision.volume_override, decision.viewpoint_override) {
        (Some(volume), Some(viewpoint)) => format!(
            "{} (volume {volume}, viewpoint {viewpoint})",
            decision.actual_level
        ),
        (Some(volume), None) => format!(
            "{} (volume {volume}, viewpoint unchanged)",
            decision.actual_level
        ),
        _ => format!("{} (unchanged)", decision.actual_level),
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
