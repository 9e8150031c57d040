#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Breach Planner.
//!
//! The world owns the arena occupancy, the resource ledger, and the cached
//! navigation fields. Planning systems read it through the
//! [`Battlefield`] and [`Treasury`] traits and mutate it exclusively by
//! submitting [`Command`] values to [`apply`].

pub mod arena;
mod ledger;
mod navigation;

use std::collections::BTreeMap;

use breach_planner_core::{
    Battlefield, Command, Cost, DeploymentError, Edge, Event, Location, Player, Resource,
    StatTable, StatsError, Treasury, UnitKind, UnitSnapshot, UpgradeError, ARENA_SIZE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ledger::Ledger;
use navigation::NavigationField;

const RANGE_TOLERANCE: f32 = 0.51;
const EDGES: [Edge; 4] = [
    Edge::TopRight,
    Edge::TopLeft,
    Edge::BottomLeft,
    Edge::BottomRight,
];

/// Declarative starting state used to build a [`World`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Unit statistics in effect for the board.
    pub stats: StatTable,
    /// Balances held by the own player.
    pub resources: Ledger,
    /// Units already standing on the board.
    pub units: Vec<UnitPlacement>,
}

/// Single unit described by a [`Layout`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Player controlling the unit.
    pub owner: Player,
    /// Cell occupied by the unit.
    pub location: Location,
    /// Current health; defaults to the kind's full health.
    #[serde(default)]
    pub health: Option<f32>,
    /// Whether the structure already carries its upgrade.
    #[serde(default)]
    pub upgraded: bool,
}

impl UnitPlacement {
    /// Places a unit at full health.
    #[must_use]
    pub const fn new(kind: UnitKind, owner: Player, location: Location) -> Self {
        Self {
            kind,
            owner,
            location,
            health: None,
            upgraded: false,
        }
    }
}

/// Reasons a [`Layout`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The stat table cannot drive a simulation.
    #[error("invalid unit statistics: {0}")]
    InvalidStats(#[from] StatsError),
    /// A unit was placed outside the arena.
    #[error("{kind:?} at {location:?} lies outside the arena")]
    OutOfBounds {
        /// Kind of the misplaced unit.
        kind: UnitKind,
        /// Offending location.
        location: Location,
    },
    /// Two stationary units were placed on the same cell.
    #[error("more than one stationary unit at {location:?}")]
    Overlap {
        /// Offending location.
        location: Location,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Unit {
    kind: UnitKind,
    owner: Player,
    health: f32,
    upgraded: bool,
}

/// Represents the authoritative board state.
#[derive(Debug)]
pub struct World {
    stats: StatTable,
    ledger: Ledger,
    cells: BTreeMap<Location, Vec<Unit>>,
    navigation: [NavigationField; 4],
}

impl World {
    /// Creates an empty board with default statistics and starting balances.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            stats: StatTable::default(),
            ledger: Ledger::default(),
            cells: BTreeMap::new(),
            navigation: Default::default(),
        };
        world.rebuild_navigation();
        world
    }

    /// Builds a board from a declarative layout.
    pub fn from_layout(layout: &Layout) -> Result<Self, LayoutError> {
        layout.stats.validate()?;

        let mut world = Self {
            stats: layout.stats.clone(),
            ledger: layout.resources,
            cells: BTreeMap::new(),
            navigation: Default::default(),
        };

        for placement in &layout.units {
            let location = placement.location;
            if !arena::contains(location) {
                return Err(LayoutError::OutOfBounds {
                    kind: placement.kind,
                    location,
                });
            }
            if placement.kind.is_stationary() && world.is_blocked(location) {
                return Err(LayoutError::Overlap { location });
            }
            let stats = world.stats.get(placement.kind);
            let upgraded = placement.upgraded && stats.upgrade.is_some();
            let full_health = match stats.upgrade {
                Some(upgrade) if upgraded => upgrade.health,
                _ => stats.health,
            };
            let health = placement.health.unwrap_or(full_health);
            world.cells.entry(location).or_default().push(Unit {
                kind: placement.kind,
                owner: placement.owner,
                health,
                upgraded,
            });
        }

        world.rebuild_navigation();
        Ok(world)
    }

    fn rebuild_navigation(&mut self) {
        let exits: Vec<Vec<Location>> = EDGES
            .iter()
            .map(|&edge| arena::edge_locations(edge))
            .collect();
        let cells = &self.cells;
        let blocked = |location: Location| {
            !arena::contains(location) || stationary_at(cells, location).is_some()
        };
        for (field, exits) in self.navigation.iter_mut().zip(exits.iter()) {
            field.rebuild_with(ARENA_SIZE, ARENA_SIZE, exits, blocked);
        }
    }

    fn navigation_for(&self, edge: Edge) -> &NavigationField {
        let index = EDGES
            .iter()
            .position(|&candidate| candidate == edge)
            .unwrap_or_default();
        &self.navigation[index]
    }

    fn deploy(
        &mut self,
        kind: UnitKind,
        location: Location,
        count: u32,
    ) -> Result<u32, DeploymentError> {
        if !arena::contains(location) {
            return Err(DeploymentError::OutOfBounds);
        }

        let count = if kind.is_mobile() {
            if !arena::is_friendly_edge(location) {
                return Err(DeploymentError::InvalidDeployLocation);
            }
            count
        } else {
            if !arena::in_own_half(location) {
                return Err(DeploymentError::InvalidDeployLocation);
            }
            count.min(1)
        };

        if self.is_blocked(location) {
            return Err(DeploymentError::Blocked);
        }

        let placed = count.min(self.affordable(kind));
        if placed == 0 {
            return Err(DeploymentError::InsufficientResources);
        }

        let stats = *self.stats.get(kind);
        self.ledger.spend(stats.cost, placed);
        let occupants = self.cells.entry(location).or_default();
        for _ in 0..placed {
            occupants.push(Unit {
                kind,
                owner: Player::Own,
                health: stats.health,
                upgraded: false,
            });
        }

        if kind.is_stationary() {
            self.rebuild_navigation();
        }

        Ok(placed)
    }

    fn upgrade(&mut self, location: Location) -> Result<UnitKind, UpgradeError> {
        let unit = self
            .cells
            .get_mut(&location)
            .and_then(|units| {
                units
                    .iter_mut()
                    .find(|unit| unit.kind.is_stationary() && unit.owner == Player::Own)
            })
            .ok_or(UpgradeError::NoStructure)?;

        let stats = self.stats.get(unit.kind);
        let upgrade = stats.upgrade.ok_or(UpgradeError::NotUpgradable)?;
        if unit.upgraded {
            return Err(UpgradeError::AlreadyUpgraded);
        }
        if !self.ledger.covers(upgrade.cost) {
            return Err(UpgradeError::InsufficientResources);
        }

        self.ledger.spend(upgrade.cost, 1);
        unit.upgraded = true;
        unit.health += upgrade.health - stats.health;
        Ok(unit.kind)
    }

    fn snapshots(&self) -> impl Iterator<Item = UnitSnapshot> + '_ {
        self.cells.iter().flat_map(|(&location, units)| {
            units.iter().map(move |unit| UnitSnapshot {
                location,
                kind: unit.kind,
                owner: unit.owner,
                health: unit.health,
            })
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn stationary_at(cells: &BTreeMap<Location, Vec<Unit>>, location: Location) -> Option<&Unit> {
    cells
        .get(&location)
        .and_then(|units| units.iter().find(|unit| unit.kind.is_stationary()))
}

impl Battlefield for World {
    fn path_to_edge(&self, start: Location) -> Vec<Location> {
        if !arena::contains(start) || self.is_blocked(start) {
            return Vec::new();
        }
        self.navigation_for(arena::target_edge(start))
            .path_from(start)
    }

    fn attackers_of(&self, location: Location, target: Player) -> usize {
        self.snapshots()
            .filter(|unit| unit.owner != target && unit.kind.is_stationary())
            .filter(|unit| {
                let stats = self.stats.get(unit.kind);
                stats.attack_damage_stationary > 0.0
                    && unit.location.distance(location) <= stats.attack_range
            })
            .count()
    }

    fn units_in_range(&self, location: Location, radius: f32) -> Vec<UnitSnapshot> {
        self.snapshots()
            .filter(|unit| unit.location.distance(location) < radius + RANGE_TOLERANCE)
            .collect()
    }

    fn is_blocked(&self, location: Location) -> bool {
        stationary_at(&self.cells, location).is_some()
    }

    fn edge_locations(&self, edge: Edge) -> Vec<Location> {
        arena::edge_locations(edge)
    }

    fn stationary_units(&self) -> Vec<UnitSnapshot> {
        self.snapshots()
            .filter(|unit| unit.kind.is_stationary())
            .collect()
    }
}

impl Treasury for World {
    fn resource(&self, resource: Resource) -> f32 {
        self.ledger.get(resource)
    }

    fn cost_of(&self, kind: UnitKind) -> Cost {
        self.stats.get(kind).cost
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Deploy {
            kind,
            location,
            count,
        } => {
            if count == 0 {
                return;
            }
            match world.deploy(kind, location, count) {
                Ok(placed) => {
                    tracing::debug!(?kind, ?location, placed, "units deployed");
                    out_events.push(Event::UnitsDeployed {
                        kind,
                        location,
                        count: placed,
                    });
                }
                Err(reason) => {
                    tracing::debug!(?kind, ?location, %reason, "deployment rejected");
                    out_events.push(Event::DeploymentRejected {
                        kind,
                        location,
                        reason,
                    });
                }
            }
        }
        Command::Upgrade { location } => match world.upgrade(location) {
            Ok(kind) => {
                tracing::debug!(?kind, ?location, "structure upgraded");
                out_events.push(Event::UnitUpgraded { kind, location });
            }
            Err(reason) => {
                tracing::debug!(?location, %reason, "upgrade rejected");
                out_events.push(Event::UpgradeRejected { location, reason });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use breach_planner_core::{Location, Resource, StatTable, UnitSnapshot};

    use super::World;

    /// Unit statistics in effect for the board.
    #[must_use]
    pub fn stats(world: &World) -> &StatTable {
        &world.stats
    }

    /// Balance of the provided resource.
    #[must_use]
    pub fn resource(world: &World, resource: Resource) -> f32 {
        world.ledger.get(resource)
    }

    /// Every unit occupying the provided cell.
    #[must_use]
    pub fn units_at(world: &World, location: Location) -> Vec<UnitSnapshot> {
        world
            .snapshots()
            .filter(|unit| unit.location == location)
            .collect()
    }

    /// Total number of units on the board.
    #[must_use]
    pub fn unit_count(world: &World) -> usize {
        world.cells.values().map(Vec::len).sum()
    }
}
