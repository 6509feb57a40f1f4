use std::fmt;

use serde::{Deserialize, Serialize};

/// Camera orientation applied after a remapped transition lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Viewpoint {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl Viewpoint {
    /// Parses a configured viewpoint name. Unknown names fall back to `Front`.
    pub fn from_config_str(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "BACK" => Viewpoint::Back,
            "FRONT" => Viewpoint::Front,
            "LEFT" => Viewpoint::Left,
            "RIGHT" => Viewpoint::Right,
            _ => Viewpoint::Front,
        }
    }

    pub fn as_config_str(self) -> &'static str {
        match self {
            Viewpoint::Front => "FRONT",
            Viewpoint::Back => "BACK",
            Viewpoint::Left => "LEFT",
            Viewpoint::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_config_str())
    }
}

/// One configured substitution for a level exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceRule {
    /// Level the player is leaving.
    pub from_level: String,
    /// Destination the unmodified game would load.
    pub to_level_original: String,
    /// Destination loaded instead.
    pub to_level_remapped: String,
    pub destination_volume_id: u32,
    pub destination_viewpoint: Viewpoint,
}

impl EntranceRule {
    pub fn new(
        from_level: impl Into<String>,
        to_level_original: impl Into<String>,
        to_level_remapped: impl Into<String>,
        destination_volume_id: u32,
        destination_viewpoint: Viewpoint,
    ) -> Self {
        Self {
            from_level: from_level.into(),
            to_level_original: to_level_original.into(),
            to_level_remapped: to_level_remapped.into(),
            destination_volume_id,
            destination_viewpoint,
        }
    }

    pub fn matches(&self, previous: &str, requested: &str) -> bool {
        self.from_level == previous && self.to_level_original == requested
    }
}

/// Renders the rule as the five-line record read by the config loader.
impl fmt::Display for EntranceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.from_level)?;
        writeln!(f, "{}", self.to_level_original)?;
        writeln!(f, "{}", self.to_level_remapped)?;
        writeln!(f, "{}", self.destination_volume_id)?;
        writeln!(f, "{}", self.destination_viewpoint)
    }
}

/// Ordered, read-only rule list. Order is configuration order and decides
/// which rule wins when several share the same entrance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntranceTable {
    rules: Vec<EntranceRule>,
}

impl EntranceTable {
    pub fn new(rules: Vec<EntranceRule>) -> Self {
        Self { rules }
    }

    /// First rule in load order for the `(previous, requested)` entrance.
    pub fn find(&self, previous: &str, requested: &str) -> Option<&EntranceRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(previous, requested))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &EntranceRule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[EntranceRule] {
        &self.rules
    }

    /// Writes the table back out in the line-oriented config format.
    pub fn to_config_string(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a EntranceTable {
    type Item = &'a EntranceRule;
    type IntoIter = std::slice::Iter<'a, EntranceRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
