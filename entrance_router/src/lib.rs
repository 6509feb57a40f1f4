//! Entrance remapping for level transitions.
//!
//! A table of remap rules is loaded once from the line-oriented config. The
//! router then sits in front of the host's change-level, door-entry and
//! secret-check routines, substituting destinations where a rule matches
//! and always calling through to the real routine.

pub mod collectibles;
pub mod config;
pub mod host;
pub mod interceptor;
pub mod router;
pub mod table;

pub use collectibles::{report_cube_bits, ActorType, CollectibleInfo, PickupGroup};
pub use config::{ConfigFormatError, ConfigLoader, RecordField, DEFAULT_CONFIG_PATH};
pub use host::{CameraManager, GameStateManager, HostServices, LevelManager, PlayerManager};
pub use interceptor::{
    ChangeLevelFn, DoorEntryFn, HookPoint, InterceptionHost, SecretCheckFn, SecretQuery,
    TransitionHooks, TransitionInterceptor,
};
pub use router::{
    is_cabin_interior, ActiveRouter, EntranceRouter, RouteDecision, RouterState,
    CABIN_INTERIOR_PREFIX,
};
pub use table::{EntranceRule, EntranceTable, Viewpoint};
