use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use entrance_router::{
    CameraManager, GameStateManager, HookPoint, InterceptionHost, LevelManager, PickupGroup,
    PlayerManager, SecretQuery, TransitionHooks, Viewpoint,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    HookAttached { point: String },
    HookDetached { point: String },
    DestinationVolume { volume_id: u32 },
    LevelLoaded { level: String },
    Viewpoint { viewpoint: Viewpoint },
    SpinThroughDoor { enabled: bool },
    FarAway { far_away: bool },
    FarawayReset,
    DoorEntered { level: String },
    SecretChecked { condition: bool, revealed: bool },
    BitsReported { count: usize },
}

/// Stand-in for the game: owns the level-manager, player, state and camera
/// fields and runs hooked routines through whatever is attached.
#[derive(Default)]
pub struct SimulatedHost {
    level: RefCell<String>,
    destination_volume: Cell<Option<u32>>,
    far_away: Cell<bool>,
    spin_through_door: Cell<bool>,
    pickups: RefCell<Vec<PickupGroup>>,
    events: RefCell<Vec<HostEvent>>,
    hooks: RefCell<BTreeMap<HookPoint, Rc<dyn TransitionHooks>>>,
}

impl SimulatedHost {
    pub fn new(start_level: &str) -> Rc<Self> {
        let host = Self {
            spin_through_door: Cell::new(true),
            ..Self::default()
        };
        *host.level.borrow_mut() = start_level.to_string();
        Rc::new(host)
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn destination_volume(&self) -> Option<u32> {
        self.destination_volume.get()
    }

    pub fn spin_through_door(&self) -> bool {
        self.spin_through_door.get()
    }

    pub fn is_far_away(&self) -> bool {
        self.far_away.get()
    }

    #[cfg(test)]
    pub fn set_far_away(&self, far_away: bool) {
        self.far_away.set(far_away);
    }

    pub fn set_pickups(&self, pickups: Vec<PickupGroup>) {
        *self.pickups.borrow_mut() = pickups;
    }

    pub fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }

    fn hook(&self, point: HookPoint) -> Option<Rc<dyn TransitionHooks>> {
        self.hooks.borrow().get(&point).cloned()
    }

    pub fn change_level(&self, level: &str) {
        match self.hook(HookPoint::ChangeLevel) {
            Some(hooks) => {
                hooks.before_change_level(level, Box::new(|next: &str| self.load_level(next)))
            }
            None => self.load_level(level),
        }
    }

    pub fn enter_door(&self) {
        match self.hook(HookPoint::DoorEntryBegin) {
            Some(hooks) => hooks.before_door_entry(Box::new(|| self.begin_door_entry())),
            None => self.begin_door_entry(),
        }
    }

    pub fn secret_check(&self, query: SecretQuery) -> bool {
        match self.hook(HookPoint::SecretCheck) {
            Some(hooks) => hooks.before_secret_check(
                query,
                Box::new(|forwarded: SecretQuery| self.test_secret(forwarded)),
            ),
            None => self.test_secret(query),
        }
    }

    fn load_level(&self, level: &str) {
        *self.level.borrow_mut() = level.to_string();
        self.record(HostEvent::LevelLoaded {
            level: level.to_string(),
        });
    }

    fn begin_door_entry(&self) {
        let level = self.level.borrow().clone();
        self.record(HostEvent::DoorEntered { level });
    }

    fn test_secret(&self, query: SecretQuery) -> bool {
        let revealed = query.condition;
        self.record(HostEvent::SecretChecked {
            condition: query.condition,
            revealed,
        });
        revealed
    }
}

impl LevelManager for SimulatedHost {
    fn name(&self) -> String {
        self.level.borrow().clone()
    }

    fn set_destination_volume_id(&self, volume_id: u32) {
        self.destination_volume.set(Some(volume_id));
        self.record(HostEvent::DestinationVolume { volume_id });
    }

    fn set_destination_is_far_away(&self, far_away: bool) {
        self.far_away.set(far_away);
        self.record(HostEvent::FarAway { far_away });
    }

    fn pickup_groups(&self) -> Vec<PickupGroup> {
        self.pickups.borrow().clone()
    }
}

impl PlayerManager for SimulatedHost {
    fn set_spin_through_door(&self, enabled: bool) {
        self.spin_through_door.set(enabled);
        self.record(HostEvent::SpinThroughDoor { enabled });
    }
}

impl GameStateManager for SimulatedHost {
    fn reset_faraway_settings(&self) {
        self.record(HostEvent::FarawayReset);
    }
}

impl CameraManager for SimulatedHost {
    fn alter_transition(&self, viewpoint: Viewpoint) {
        self.record(HostEvent::Viewpoint { viewpoint });
    }
}

impl InterceptionHost for SimulatedHost {
    fn attach(&self, point: HookPoint, hooks: Rc<dyn TransitionHooks>) {
        self.hooks.borrow_mut().insert(point, hooks);
        self.record(HostEvent::HookAttached {
            point: point.label().to_string(),
        });
    }

    fn detach(&self, point: HookPoint) {
        if self.hooks.borrow_mut().remove(&point).is_some() {
            self.record(HostEvent::HookDetached {
                point: point.label().to_string(),
            });
        }
    }
}
