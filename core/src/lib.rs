#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Breach Planner engine.
//!
//! This crate defines the vocabulary that connects the turn strategy, the
//! board collaborator, and the pure planning systems. Systems read the board
//! through the [`Battlefield`] and [`Treasury`] traits, respond with
//! [`Command`] batches, and the world executes those commands via its
//! `apply` entry point before broadcasting [`Event`] values describing what
//! actually happened.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along each axis of the diamond arena.
pub const ARENA_SIZE: i32 = 28;

/// Row index separating the bottom (own) half from the top (opponent) half.
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;

/// Location of a single arena cell expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    /// Creates a new arena location.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the location.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the location.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Euclidean distance between two locations measured in cells.
    #[must_use]
    pub fn distance(self, other: Location) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the location shifted by the provided column and row offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Players seated at the board, identified from the planner's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    /// The player this engine plays for; owns the bottom half of the arena.
    Own,
    /// The opposing player; owns the top half of the arena.
    Opponent,
}

impl Player {
    /// Returns the opposing seat.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Own => Self::Opponent,
            Self::Opponent => Self::Own,
        }
    }

    /// Numeric player index used by the game engine (0 for own, 1 for opponent).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Own => 0,
            Self::Opponent => 1,
        }
    }
}

/// Spendable currencies tracked by the resource ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Structure points (SP) that fund stationary units.
    Structure,
    /// Mobile points (MP) that fund mobile units.
    Mobile,
}

impl Resource {
    /// Both resource kinds in ledger order.
    pub const ALL: [Resource; 2] = [Resource::Structure, Resource::Mobile];
}

/// Price of a single unit expressed in both currencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cost {
    /// Structure points (SP) required.
    pub structure: f32,
    /// Mobile points (MP) required.
    pub mobile: f32,
}

impl Cost {
    /// Creates a new cost from SP and MP amounts.
    #[must_use]
    pub const fn new(structure: f32, mobile: f32) -> Self {
        Self { structure, mobile }
    }

    /// Amount of the provided resource required.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> f32 {
        match resource {
            Resource::Structure => self.structure,
            Resource::Mobile => self.mobile,
        }
    }
}

/// Kinds of units that can be placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Cheap stationary blocker.
    Wall,
    /// Stationary unit that generates resources.
    Factory,
    /// Stationary defender that fires at mobile units in range.
    Turret,
    /// Fast, fragile mobile unit.
    Scout,
    /// Slow, long-range mobile unit that excels against structures.
    Demolisher,
    /// Slow, durable mobile unit that hunts other mobile units.
    Interceptor,
}

impl UnitKind {
    /// Every unit kind in table order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Factory,
        UnitKind::Turret,
        UnitKind::Scout,
        UnitKind::Demolisher,
        UnitKind::Interceptor,
    ];

    /// Reports whether the unit stays where it is placed.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Factory | Self::Turret)
    }

    /// Reports whether the unit advances along a path once deployed.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        !self.is_stationary()
    }

    /// Two-letter shorthand used by the game engine.
    #[must_use]
    pub const fn shorthand(self) -> &'static str {
        match self {
            Self::Wall => "FF",
            Self::Factory => "EF",
            Self::Turret => "DF",
            Self::Scout => "PI",
            Self::Demolisher => "EI",
            Self::Interceptor => "SI",
        }
    }
}

/// Immutable statistics for a single unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Starting health of a single unit.
    pub health: f32,
    /// Damage dealt per frame while the unit advances along its path.
    pub attack_damage_moving: f32,
    /// Damage dealt per shot by the unit when it defends in place.
    pub attack_damage_stationary: f32,
    /// Radius, in cells, within which the unit can attack.
    pub attack_range: f32,
    /// Fraction of a cell advanced per frame; zero for stationary units.
    pub speed: f32,
    /// Price of a single unit.
    pub cost: Cost,
    /// One-time improvement available to placed structures, if any.
    #[serde(default)]
    pub upgrade: Option<UpgradeStats>,
}

/// One-time improvement bought for a structure already on the board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStats {
    /// Price of the upgrade.
    pub cost: Cost,
    /// Full health of the structure once upgraded.
    pub health: f32,
}

impl UnitStats {
    /// Number of whole frames the unit spends crossing one cell.
    ///
    /// Units without a positive speed never leave their cell and report zero.
    #[must_use]
    pub fn frames_per_cell(&self) -> u32 {
        if self.speed <= 0.0 {
            return 0;
        }
        (1.0 / self.speed).floor() as u32
    }
}

/// Lookup table mapping every [`UnitKind`] to its statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTable {
    /// Statistics for [`UnitKind::Wall`].
    pub wall: UnitStats,
    /// Statistics for [`UnitKind::Factory`].
    pub factory: UnitStats,
    /// Statistics for [`UnitKind::Turret`].
    pub turret: UnitStats,
    /// Statistics for [`UnitKind::Scout`].
    pub scout: UnitStats,
    /// Statistics for [`UnitKind::Demolisher`].
    pub demolisher: UnitStats,
    /// Statistics for [`UnitKind::Interceptor`].
    pub interceptor: UnitStats,
}

impl StatTable {
    /// Statistics registered for the provided unit kind.
    #[must_use]
    pub const fn get(&self, kind: UnitKind) -> &UnitStats {
        match kind {
            UnitKind::Wall => &self.wall,
            UnitKind::Factory => &self.factory,
            UnitKind::Turret => &self.turret,
            UnitKind::Scout => &self.scout,
            UnitKind::Demolisher => &self.demolisher,
            UnitKind::Interceptor => &self.interceptor,
        }
    }

    /// Mutable statistics for the provided unit kind.
    pub fn get_mut(&mut self, kind: UnitKind) -> &mut UnitStats {
        match kind {
            UnitKind::Wall => &mut self.wall,
            UnitKind::Factory => &mut self.factory,
            UnitKind::Turret => &mut self.turret,
            UnitKind::Scout => &mut self.scout,
            UnitKind::Demolisher => &mut self.demolisher,
            UnitKind::Interceptor => &mut self.interceptor,
        }
    }

    /// Per-shot damage of a turret, the reference static defender.
    #[must_use]
    pub const fn turret_damage(&self) -> f32 {
        self.turret.attack_damage_stationary
    }

    /// Verifies every entry describes a unit the simulator can reason about.
    pub fn validate(&self) -> Result<(), StatsError> {
        for kind in UnitKind::ALL {
            let stats = self.get(kind);
            if !(stats.health > 0.0) {
                return Err(StatsError::NonPositiveHealth { kind });
            }
            if stats.cost.structure < 0.0 || stats.cost.mobile < 0.0 {
                return Err(StatsError::NegativeCost { kind });
            }
            let price = if kind.is_mobile() {
                stats.cost.mobile
            } else {
                stats.cost.structure
            };
            if !(price > 0.0) {
                return Err(StatsError::FreeUnit { kind });
            }
            if let Some(upgrade) = stats.upgrade {
                if !(upgrade.health > 0.0) {
                    return Err(StatsError::NonPositiveHealth { kind });
                }
                if upgrade.cost.structure < 0.0 || upgrade.cost.mobile < 0.0 {
                    return Err(StatsError::NegativeCost { kind });
                }
            }
            if kind.is_mobile() && !(stats.speed > 0.0) {
                return Err(StatsError::ImmobileMobileUnit { kind });
            }
        }
        Ok(())
    }
}

impl Default for StatTable {
    fn default() -> Self {
        Self {
            wall: UnitStats {
                health: 60.0,
                attack_damage_moving: 0.0,
                attack_damage_stationary: 0.0,
                attack_range: 0.0,
                speed: 0.0,
                cost: Cost::new(1.0, 0.0),
                upgrade: Some(UpgradeStats {
                    cost: Cost::new(1.0, 0.0),
                    health: 120.0,
                }),
            },
            factory: UnitStats {
                health: 30.0,
                attack_damage_moving: 0.0,
                attack_damage_stationary: 0.0,
                attack_range: 0.0,
                speed: 0.0,
                cost: Cost::new(4.0, 0.0),
                upgrade: None,
            },
            turret: UnitStats {
                health: 75.0,
                attack_damage_moving: 0.0,
                attack_damage_stationary: 5.0,
                attack_range: 2.5,
                speed: 0.0,
                cost: Cost::new(2.0, 0.0),
                upgrade: None,
            },
            scout: UnitStats {
                health: 15.0,
                attack_damage_moving: 2.0,
                attack_damage_stationary: 0.0,
                attack_range: 3.5,
                speed: 1.0,
                cost: Cost::new(0.0, 1.0),
                upgrade: None,
            },
            demolisher: UnitStats {
                health: 5.0,
                attack_damage_moving: 8.0,
                attack_damage_stationary: 0.0,
                attack_range: 4.5,
                speed: 0.5,
                cost: Cost::new(0.0, 3.0),
                upgrade: None,
            },
            interceptor: UnitStats {
                health: 40.0,
                attack_damage_moving: 20.0,
                attack_damage_stationary: 0.0,
                attack_range: 4.5,
                speed: 0.25,
                cost: Cost::new(0.0, 1.0),
                upgrade: None,
            },
        }
    }
}

/// Reasons a [`StatTable`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A unit kind was configured with zero or negative health.
    #[error("{kind:?} must have positive health")]
    NonPositiveHealth {
        /// Offending unit kind.
        kind: UnitKind,
    },
    /// A unit kind was configured with a negative price.
    #[error("{kind:?} must not have a negative cost")]
    NegativeCost {
        /// Offending unit kind.
        kind: UnitKind,
    },
    /// A unit kind costs nothing in the resource that funds it.
    #[error("{kind:?} must cost a positive amount of the resource that funds it")]
    FreeUnit {
        /// Offending unit kind.
        kind: UnitKind,
    },
    /// A mobile unit kind was configured without a positive speed.
    #[error("{kind:?} is mobile and requires a positive speed")]
    ImmobileMobileUnit {
        /// Offending unit kind.
        kind: UnitKind,
    },
}

/// Tuning constants that weigh and gate attack decisions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPolicy {
    /// Weight applied to damage dealt to opposing units.
    pub weight_damage: f32,
    /// Weight applied to each attacker expected to survive and score.
    pub weight_score: f32,
    /// Minimum normalized gain per resource unit required to commit an attack.
    pub min_gain_per_resource: f32,
}

impl Default for AttackPolicy {
    fn default() -> Self {
        Self {
            weight_damage: 1.0,
            weight_score: 12.0,
            min_gain_per_resource: 10.0,
        }
    }
}

/// The four diagonal edges of the diamond arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Upper-right edge of the opponent half.
    TopRight,
    /// Upper-left edge of the opponent half.
    TopLeft,
    /// Lower-left edge of the own half.
    BottomLeft,
    /// Lower-right edge of the own half.
    BottomRight,
}

impl Edge {
    /// Edges from which the own player may deploy mobile units.
    pub const FRIENDLY: [Edge; 2] = [Edge::BottomLeft, Edge::BottomRight];
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Cell currently occupied by the unit.
    pub location: Location,
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Player controlling the unit.
    pub owner: Player,
    /// Current health of the unit.
    pub health: f32,
}

/// Record of a mobile unit reaching the edge it was heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breach {
    /// Edge cell where the breach happened.
    pub location: Location,
    /// Player whose unit scored.
    pub scored_by: Player,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests deployment of up to `count` units of `kind` at `location`.
    Deploy {
        /// Type of unit to deploy.
        kind: UnitKind,
        /// Cell receiving the units.
        location: Location,
        /// Maximum number of units to deploy.
        count: u32,
    },
    /// Requests the one-time upgrade of the own structure at `location`.
    Upgrade {
        /// Cell holding the structure.
        location: Location,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that units were placed on the board.
    UnitsDeployed {
        /// Type of unit placed.
        kind: UnitKind,
        /// Cell receiving the units.
        location: Location,
        /// Number of units actually placed.
        count: u32,
    },
    /// Reports that a deployment request was rejected.
    DeploymentRejected {
        /// Type of unit requested.
        kind: UnitKind,
        /// Cell provided in the request.
        location: Location,
        /// Specific reason the deployment failed.
        reason: DeploymentError,
    },
    /// Confirms that a structure was upgraded.
    UnitUpgraded {
        /// Type of the upgraded structure.
        kind: UnitKind,
        /// Cell holding the structure.
        location: Location,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Cell provided in the request.
        location: Location,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
}

/// Reasons a deployment request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum DeploymentError {
    /// The requested cell lies outside the arena.
    #[error("location lies outside the arena")]
    OutOfBounds,
    /// The cell is not a legal deployment cell for the unit kind.
    #[error("location is not a legal deployment cell for this unit")]
    InvalidDeployLocation,
    /// A stationary unit already occupies the cell.
    #[error("location is blocked by a stationary unit")]
    Blocked,
    /// The ledger cannot fund a single unit.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// Reasons an upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No structure owned by the own player stands on the cell.
    #[error("no own structure at location")]
    NoStructure,
    /// The structure's kind has no upgrade.
    #[error("structure cannot be upgraded")]
    NotUpgradable,
    /// The structure was upgraded before.
    #[error("structure is already upgraded")]
    AlreadyUpgraded,
    /// The ledger cannot fund the upgrade.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// Read-only queries the planning systems issue against the board.
pub trait Battlefield {
    /// Path a mobile unit deployed at `start` follows to the edge it targets.
    ///
    /// The path includes `start` and is empty when no route exists.
    fn path_to_edge(&self, start: Location) -> Vec<Location>;

    /// Number of defenders able to fire on a unit owned by `target` at `location`.
    fn attackers_of(&self, location: Location, target: Player) -> usize;

    /// Every unit, of any owner, within `radius` cells of `location`.
    fn units_in_range(&self, location: Location, radius: f32) -> Vec<UnitSnapshot>;

    /// Reports whether a stationary unit occupies `location`.
    fn is_blocked(&self, location: Location) -> bool;

    /// Cells composing the provided arena edge.
    fn edge_locations(&self, edge: Edge) -> Vec<Location>;

    /// Every stationary unit on the board in deterministic order.
    fn stationary_units(&self) -> Vec<UnitSnapshot>;
}

/// Read-only view of the own player's resource ledger.
pub trait Treasury {
    /// Amount of the provided resource currently available.
    fn resource(&self, resource: Resource) -> f32;

    /// Price of a single unit of the provided kind.
    fn cost_of(&self, kind: UnitKind) -> Cost;

    /// Number of units of `kind` the ledger can currently fund.
    fn affordable(&self, kind: UnitKind) -> u32 {
        let cost = self.cost_of(kind);
        let mut count = u32::MAX;
        for resource in Resource::ALL {
            let price = cost.get(resource);
            if price <= 0.0 {
                continue;
            }
            let fundable = (self.resource(resource) / price).floor();
            count = count.min(if fundable <= 0.0 { 0 } else { fundable as u32 });
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Cost, Location, Player, Resource, StatTable, StatsError, Treasury, UnitKind,
        UpgradeStats,
    };

    struct Purse {
        structure: f32,
        mobile: f32,
        stats: StatTable,
    }

    impl Treasury for Purse {
        fn resource(&self, resource: Resource) -> f32 {
            match resource {
                Resource::Structure => self.structure,
                Resource::Mobile => self.mobile,
            }
        }

        fn cost_of(&self, kind: UnitKind) -> Cost {
            self.stats.get(kind).cost
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = Location::new(1, 1);
        assert!((origin.distance(Location::new(4, 5)) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn frames_per_cell_floors_inverse_speed() {
        let stats = StatTable::default();
        assert_eq!(stats.get(UnitKind::Scout).frames_per_cell(), 1);
        assert_eq!(stats.get(UnitKind::Demolisher).frames_per_cell(), 2);
        assert_eq!(stats.get(UnitKind::Interceptor).frames_per_cell(), 4);
        assert_eq!(stats.get(UnitKind::Turret).frames_per_cell(), 0);
    }

    #[test]
    fn affordable_uses_the_scarcest_resource() {
        let purse = Purse {
            structure: 7.5,
            mobile: 5.0,
            stats: StatTable::default(),
        };
        assert_eq!(purse.affordable(UnitKind::Turret), 3);
        assert_eq!(purse.affordable(UnitKind::Demolisher), 1);
        assert_eq!(purse.affordable(UnitKind::Scout), 5);
    }

    #[test]
    fn affordable_is_zero_when_broke() {
        let purse = Purse {
            structure: 0.0,
            mobile: 0.5,
            stats: StatTable::default(),
        };
        assert_eq!(purse.affordable(UnitKind::Wall), 0);
        assert_eq!(purse.affordable(UnitKind::Interceptor), 0);
    }

    #[test]
    fn default_table_validates() {
        assert_eq!(StatTable::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_immobile_scouts() {
        let mut stats = StatTable::default();
        stats.get_mut(UnitKind::Scout).speed = 0.0;
        assert_eq!(
            stats.validate(),
            Err(StatsError::ImmobileMobileUnit {
                kind: UnitKind::Scout
            })
        );
    }

    #[test]
    fn validate_rejects_units_that_cost_nothing() {
        let mut stats = StatTable::default();
        stats.demolisher.cost = Cost::new(0.0, 0.0);
        assert_eq!(
            stats.validate(),
            Err(StatsError::FreeUnit {
                kind: UnitKind::Demolisher
            })
        );

        let mut stats = StatTable::default();
        stats.wall.cost = Cost::new(0.0, 1.0);
        assert_eq!(
            stats.validate(),
            Err(StatsError::FreeUnit {
                kind: UnitKind::Wall
            })
        );
    }

    #[test]
    fn validate_rejects_upgrades_without_health() {
        let mut stats = StatTable::default();
        stats.turret.upgrade = Some(UpgradeStats {
            cost: Cost::new(4.0, 0.0),
            health: 0.0,
        });
        assert_eq!(
            stats.validate(),
            Err(StatsError::NonPositiveHealth {
                kind: UnitKind::Turret
            })
        );
    }

    #[test]
    fn players_are_each_others_opponents() {
        assert_eq!(Player::Own.other(), Player::Opponent);
        assert_eq!(Player::Opponent.other().index(), 0);
    }

    #[test]
    fn stat_table_reads_partial_toml_overrides() {
        let parsed: StatTable = toml::from_str(
            r#"
            [scout]
            health = 20.0
            attack_damage_moving = 2.0
            attack_damage_stationary = 0.0
            attack_range = 3.5
            speed = 1.0
            cost = { mobile = 1.0 }
            "#,
        )
        .expect("parse stat table");
        assert_eq!(parsed.scout.health, 20.0);
        assert_eq!(parsed.scout.upgrade, None);
        assert_eq!(parsed.turret, StatTable::default().turret);
    }
}
