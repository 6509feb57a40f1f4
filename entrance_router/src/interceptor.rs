use std::fmt;
use std::rc::Rc;

use log::info;

/// Host routines the router wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookPoint {
    ChangeLevel,
    DoorEntryBegin,
    SecretCheck,
}

impl HookPoint {
    pub const ALL: [HookPoint; 3] = [
        HookPoint::ChangeLevel,
        HookPoint::DoorEntryBegin,
        HookPoint::SecretCheck,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HookPoint::ChangeLevel => "change_level",
            HookPoint::DoorEntryBegin => "door_entry_begin",
            HookPoint::SecretCheck => "secret_check",
        }
    }
}

/// Arguments of the host's secret-reveal test. The ids are opaque host handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretQuery {
    pub condition: bool,
    pub art_object: u32,
    pub secret_trile: Option<u32>,
    pub top_trile: Option<u32>,
}

/// The real host routine behind a hook. Boxed `FnOnce` so a hook can run it
/// at most once.
pub type ChangeLevelFn<'a> = Box<dyn FnOnce(&str) + 'a>;
pub type DoorEntryFn<'a> = Box<dyn FnOnce() + 'a>;
pub type SecretCheckFn<'a> = Box<dyn FnOnce(SecretQuery) -> bool + 'a>;

/// Callbacks run in place of the wrapped host routines. Each receives the
/// original routine and decides which arguments it runs with.
pub trait TransitionHooks {
    fn before_change_level(&self, level_name: &str, orig: ChangeLevelFn<'_>);
    fn before_door_entry(&self, orig: DoorEntryFn<'_>);
    fn before_secret_check(&self, query: SecretQuery, orig: SecretCheckFn<'_>) -> bool;
}

impl fmt::Debug for dyn TransitionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransitionHooks")
    }
}

/// Interception mechanism exposed by the host integration layer.
pub trait InterceptionHost {
    fn attach(&self, point: HookPoint, hooks: Rc<dyn TransitionHooks>);
    fn detach(&self, point: HookPoint);
}

/// Keeps the hooks installed for as long as it lives.
pub struct TransitionInterceptor {
    host: Rc<dyn InterceptionHost>,
    points: Vec<HookPoint>,
}

impl TransitionInterceptor {
    pub fn install(host: Rc<dyn InterceptionHost>, hooks: Rc<dyn TransitionHooks>) -> Self {
        let mut points = Vec::with_capacity(HookPoint::ALL.len());
        for point in HookPoint::ALL {
            host.attach(point, hooks.clone());
            info!("hooked {}", point.label());
            points.push(point);
        }
        Self { host, points }
    }

    pub fn points(&self) -> &[HookPoint] {
        &self.points
    }

    pub fn is_installed(&self) -> bool {
        !self.points.is_empty()
    }

    /// Detaches every hook now instead of at drop.
    pub fn uninstall(&mut self) {
        while let Some(point) = self.points.pop() {
            self.host.detach(point);
            info!("unhooked {}", point.label());
        }
    }
}

impl Drop for TransitionInterceptor {
    fn drop(&mut self) {
        self.uninstall();
    }
}

impl fmt::Debug for TransitionInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionInterceptor")
            .field("points", &self.points)
            .finish()
    }
}
