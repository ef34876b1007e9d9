//! Named signals exchanged between behaviors on an entity

use std::fmt;

/// A signal delivered to every behavior attached to the target entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The host finished creating the entity's renderable object.
    Loaded,
    /// A proximity sensor's target moved inside its threshold.
    ProximityEnter,
    /// A proximity sensor's target moved back outside its threshold.
    ProximityLeave,
    /// Any other named signal.
    Custom(String),
}

impl Signal {
    /// Wire name of the signal.
    pub fn name(&self) -> &str {
        match self {
            Signal::Loaded => "loaded",
            Signal::ProximityEnter => "proximityenter",
            Signal::ProximityLeave => "proximityleave",
            Signal::Custom(name) => name,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
