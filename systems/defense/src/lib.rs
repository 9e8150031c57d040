#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits the standing defense and its reactive reinforcements.

use breach_planner_core::{Command, Location, UnitKind};
use serde::{Deserialize, Serialize};

/// Cells reserved for each kind of structure in the opening layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseLayout {
    /// Turret cells, built first.
    pub turrets: Vec<Location>,
    /// Wall cells shielding the turrets.
    pub walls: Vec<Location>,
    /// Factory cells, built once defenses are funded.
    pub factories: Vec<Location>,
}

impl Default for DefenseLayout {
    fn default() -> Self {
        Self {
            turrets: cells(&[(0, 13), (27, 13), (8, 11), (19, 11), (13, 11), (14, 11)]),
            walls: cells(&[(8, 12), (19, 12)]),
            factories: cells(&[(13, 2), (14, 2), (13, 3), (14, 3)]),
        }
    }
}

fn cells(coords: &[(i32, i32)]) -> Vec<Location> {
    coords.iter().map(|&(x, y)| Location::new(x, y)).collect()
}

/// Defense system that requests one structure per configured cell.
///
/// Requests for cells that are already built are rejected by the world, so
/// the system can re-emit the full layout every turn.
#[derive(Clone, Debug, Default)]
pub struct Defense {
    layout: DefenseLayout,
}

impl Defense {
    /// Creates a defense system for the provided layout.
    #[must_use]
    pub fn new(layout: DefenseLayout) -> Self {
        Self { layout }
    }

    /// Queues turrets, walls, wall upgrades, and a turret one row above
    /// every breach.
    pub fn handle(&self, breaches: &[Location], out: &mut Vec<Command>) {
        let reactive = breaches.iter().map(|breach| breach.offset(0, 1));
        let upgrades = self
            .layout
            .walls
            .iter()
            .map(|&location| Command::Upgrade { location });

        out.extend(
            self.layout
                .turrets
                .iter()
                .copied()
                .map(|location| single(UnitKind::Turret, location))
                .chain(
                    self.layout
                        .walls
                        .iter()
                        .map(|&location| single(UnitKind::Wall, location)),
                )
                .chain(upgrades)
                .chain(reactive.map(|location| single(UnitKind::Turret, location))),
        );
    }

    /// Queues the configured factories.
    pub fn factories(&self, out: &mut Vec<Command>) {
        out.extend(
            self.layout
                .factories
                .iter()
                .map(|&location| single(UnitKind::Factory, location)),
        );
    }
}

fn single(kind: UnitKind, location: Location) -> Command {
    Command::Deploy {
        kind,
        location,
        count: 1,
    }
}
