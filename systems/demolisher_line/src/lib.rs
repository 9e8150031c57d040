#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that walls off a firing line for long-range demolishers.
//!
//! A row of the cheapest structure keeps demolishers from walking into the
//! opposing base, so they stop at a distance where they can shell its front
//! rows.

use breach_planner_core::{Command, Location, Treasury, UnitKind};
use serde::{Deserialize, Serialize};

const LINE_CANDIDATES: [UnitKind; 3] = [UnitKind::Wall, UnitKind::Turret, UnitKind::Factory];

/// Geometry of the firing line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Row the structures are built on.
    pub row: i32,
    /// Column the line starts at; structures are requested from here leftward.
    pub first_column: i32,
    /// Last column covered by the line.
    pub last_column: i32,
    /// Cell the demolishers deploy from.
    pub launch: Location,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            row: 11,
            first_column: 27,
            last_column: 6,
            launch: Location::new(24, 10),
        }
    }
}

/// Demolisher line system.
#[derive(Clone, Copy, Debug, Default)]
pub struct DemolisherLine {
    config: LineConfig,
}

impl DemolisherLine {
    /// Creates a demolisher line system for the provided geometry.
    #[must_use]
    pub const fn new(config: LineConfig) -> Self {
        Self { config }
    }

    /// Queues the structure line followed by every affordable demolisher.
    pub fn handle<T>(&self, treasury: &T, out: &mut Vec<Command>)
    where
        T: Treasury + ?Sized,
    {
        let kind = cheapest_structure(treasury);
        let (row, from, to) = (
            self.config.row,
            self.config.first_column,
            self.config.last_column,
        );

        for column in (to.min(from)..=to.max(from)).rev() {
            out.push(Command::Deploy {
                kind,
                location: Location::new(column, row),
                count: 1,
            });
        }

        let demolishers = treasury.affordable(UnitKind::Demolisher);
        if demolishers > 0 {
            out.push(Command::Deploy {
                kind: UnitKind::Demolisher,
                location: self.config.launch,
                count: demolishers,
            });
        }
    }
}

/// Stationary kind with the lowest structure-point price.
///
/// Ties keep the earlier kind in wall, turret, factory order.
#[must_use]
pub fn cheapest_structure<T>(treasury: &T) -> UnitKind
where
    T: Treasury + ?Sized,
{
    let mut cheapest = LINE_CANDIDATES[0];
    let mut lowest = treasury.cost_of(cheapest).structure;
    for kind in &LINE_CANDIDATES[1..] {
        let price = treasury.cost_of(*kind).structure;
        if price < lowest {
            cheapest = *kind;
            lowest = price;
        }
    }
    cheapest
}
