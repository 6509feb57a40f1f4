use std::fmt;
use std::rc::Rc;

use crate::collectibles::PickupGroup;
use crate::table::Viewpoint;

/// Level-manager fields the router reads and writes.
pub trait LevelManager {
    /// Identifier of the level currently loaded.
    fn name(&self) -> String;
    /// Spawn volume the next level load will place the player in.
    fn set_destination_volume_id(&self, volume_id: u32);
    fn set_destination_is_far_away(&self, far_away: bool);
    fn pickup_groups(&self) -> Vec<PickupGroup> {
        Vec::new()
    }
}

pub trait PlayerManager {
    fn set_spin_through_door(&self, enabled: bool);
}

pub trait GameStateManager {
    /// Clears the camera/state tweaks applied for far-away destinations.
    fn reset_faraway_settings(&self);
}

pub trait CameraManager {
    fn alter_transition(&self, viewpoint: Viewpoint);
}

/// Host services handed to the router at construction.
#[derive(Clone)]
pub struct HostServices {
    pub level: Rc<dyn LevelManager>,
    pub player: Rc<dyn PlayerManager>,
    pub state: Rc<dyn GameStateManager>,
    pub camera: Rc<dyn CameraManager>,
}

impl HostServices {
    pub fn new(
        level: Rc<dyn LevelManager>,
        player: Rc<dyn PlayerManager>,
        state: Rc<dyn GameStateManager>,
        camera: Rc<dyn CameraManager>,
    ) -> Self {
        Self {
            level,
            player,
            state,
            camera,
        }
    }

    /// Uses one object for every service, the usual shape of a host bridge.
    pub fn from_single<H>(host: Rc<H>) -> Self
    where
        H: LevelManager + PlayerManager + GameStateManager + CameraManager + 'static,
    {
        Self {
            level: host.clone(),
            player: host.clone(),
            state: host.clone(),
            camera: host,
        }
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostServices")
    }
}
