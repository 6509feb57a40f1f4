use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use entrance_router::{report_cube_bits, ActorType, PickupGroup, SecretQuery};
use serde::{Deserialize, Serialize};

use crate::sim::{HostEvent, SimulatedHost};

/// One host-side action in a replay script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    ChangeLevel {
        level: String,
    },
    EnterDoor,
    SecretCheck {
        #[serde(default)]
        condition: bool,
        #[serde(default)]
        art_object: u32,
    },
    ReportBits {
        #[serde(default)]
        pickups: Vec<ActorType>,
    },
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading replay script {}", path.display()))?;
    let steps = serde_json::from_str(&raw)
        .with_context(|| format!("parsing replay script {}", path.display()))?;
    Ok(steps)
}

pub fn run_script(host: &SimulatedHost, steps: &[ScriptStep]) {
    for step in steps {
        match step {
            ScriptStep::ChangeLevel { level } => host.change_level(level),
            ScriptStep::EnterDoor => host.enter_door(),
            ScriptStep::SecretCheck {
                condition,
                art_object,
            } => {
                host.secret_check(SecretQuery {
                    condition: *condition,
                    art_object: *art_object,
                    secret_trile: None,
                    top_trile: None,
                });
            }
            ScriptStep::ReportBits { pickups } => {
                host.set_pickups(pickups.iter().copied().map(PickupGroup::new).collect());
                let count = report_cube_bits(Some(host));
                host.record(HostEvent::BitsReported { count });
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLog<'a> {
    pub start_level: &'a str,
    pub final_level: String,
    pub destination_volume: Option<u32>,
    pub spin_through_door: bool,
    pub far_away: bool,
    pub events: &'a [HostEvent],
}
