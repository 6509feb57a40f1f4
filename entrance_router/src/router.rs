use std::cell::Cell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::config::{ConfigFormatError, ConfigLoader};
use crate::host::HostServices;
use crate::interceptor::{
    ChangeLevelFn, DoorEntryFn, InterceptionHost, SecretCheckFn, SecretQuery, TransitionHooks,
    TransitionInterceptor,
};
use crate::table::{EntranceTable, Viewpoint};

/// Levels whose camera must not be touched after a transition; the host
/// crashes when the viewpoint is altered there.
pub const CABIN_INTERIOR_PREFIX: &str = "CABIN_INTERIOR";

pub fn is_cabin_interior(level: &str) -> bool {
    level.starts_with(CABIN_INTERIOR_PREFIX)
}

/// Where a change-level request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    #[default]
    Idle,
    Evaluating,
    Forwarding,
}

/// Outcome of looking a transition up in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub actual_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_override: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewpoint_override: Option<Viewpoint>,
}

impl RouteDecision {
    pub fn passthrough(requested: &str) -> Self {
        Self {
            actual_level: requested.to_string(),
            volume_override: None,
            viewpoint_override: None,
        }
    }

    pub fn is_remapped(&self) -> bool {
        self.volume_override.is_some()
    }
}

/// Rewrites level transitions according to an [`EntranceTable`].
pub struct EntranceRouter {
    table: EntranceTable,
    services: HostServices,
    state: Cell<RouterState>,
}

impl EntranceRouter {
    pub fn new(table: EntranceTable, services: HostServices) -> Self {
        Self {
            table,
            services,
            state: Cell::new(RouterState::Idle),
        }
    }

    pub fn from_config_path(
        path: impl AsRef<Path>,
        services: HostServices,
    ) -> Result<Self, ConfigFormatError> {
        let table = ConfigLoader::load_path(path)?;
        Ok(Self::new(table, services))
    }

    pub fn table(&self) -> &EntranceTable {
        &self.table
    }

    pub fn state(&self) -> RouterState {
        self.state.get()
    }

    /// Pure lookup: what a transition from `previous` to `requested` becomes.
    pub fn route_level_change(&self, previous: &str, requested: &str) -> RouteDecision {
        match self.table.find(previous, requested) {
            Some(rule) => {
                let viewpoint_override = if is_cabin_interior(&rule.to_level_remapped) {
                    None
                } else {
                    Some(rule.destination_viewpoint)
                };
                RouteDecision {
                    actual_level: rule.to_level_remapped.clone(),
                    volume_override: Some(rule.destination_volume_id),
                    viewpoint_override,
                }
            }
            None => RouteDecision::passthrough(requested),
        }
    }

    /// Wraps the host's change-level routine. `orig` runs exactly once, with
    /// either the requested level or its remapped replacement.
    pub fn change_level<R>(&self, requested: &str, orig: impl FnOnce(&str) -> R) -> R {
        let _guard = StateGuard::enter(&self.state, RouterState::Evaluating);
        let previous = self.services.level.name();
        println!("From: {previous}, To: {requested}");

        let decision = self.route_level_change(&previous, requested);
        if decision.is_remapped() {
            debug!(
                "remapping {previous} -> {requested} to {}",
                decision.actual_level
            );
        }
        if let Some(volume_id) = decision.volume_override {
            self.services.level.set_destination_volume_id(volume_id);
        }

        self.state.set(RouterState::Forwarding);
        let result = orig(&decision.actual_level);

        if let Some(viewpoint) = decision.viewpoint_override {
            self.services.camera.alter_transition(viewpoint);
        }
        result
    }

    /// Clears far-away state before the host's door-entry routine reads it.
    pub fn on_door_entry_begin<R>(&self, orig: impl FnOnce() -> R) -> R {
        if is_cabin_interior(&self.services.level.name()) {
            self.services.player.set_spin_through_door(false);
        }
        self.services.level.set_destination_is_far_away(false);
        self.services.state.reset_faraway_settings();
        orig()
    }

    /// Secrets always count as revealed, whatever the host computed.
    pub fn on_secret_check(
        &self,
        query: SecretQuery,
        orig: impl FnOnce(SecretQuery) -> bool,
    ) -> bool {
        orig(SecretQuery {
            condition: true,
            ..query
        })
    }

    /// Installs the router's hooks on `host`. Dropping the returned handle
    /// removes them again.
    pub fn attach(self, host: Rc<dyn InterceptionHost>) -> ActiveRouter {
        let router = Rc::new(self);
        let interceptor = TransitionInterceptor::install(host, router.clone());
        ActiveRouter {
            interceptor,
            router,
        }
    }
}

impl TransitionHooks for EntranceRouter {
    fn before_change_level(&self, level_name: &str, orig: ChangeLevelFn<'_>) {
        self.change_level(level_name, orig)
    }

    fn before_door_entry(&self, orig: DoorEntryFn<'_>) {
        self.on_door_entry_begin(orig)
    }

    fn before_secret_check(&self, query: SecretQuery, orig: SecretCheckFn<'_>) -> bool {
        self.on_secret_check(query, orig)
    }
}

impl fmt::Debug for EntranceRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntranceRouter")
            .field("rules", &self.table.len())
            .field("state", &self.state.get())
            .finish()
    }
}

/// A router whose hooks are live on a host.
#[derive(Debug)]
pub struct ActiveRouter {
    // Declared first so hooks are detached before the router is released.
    interceptor: TransitionInterceptor,
    router: Rc<EntranceRouter>,
}

impl ActiveRouter {
    pub fn router(&self) -> &EntranceRouter {
        &self.router
    }

    pub fn interceptor(&self) -> &TransitionInterceptor {
        &self.interceptor
    }
}

struct StateGuard<'a> {
    state: &'a Cell<RouterState>,
}

impl<'a> StateGuard<'a> {
    fn enter(state: &'a Cell<RouterState>, next: RouterState) -> Self {
        state.set(next);
        Self { state }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.state.set(RouterState::Idle);
    }
}
