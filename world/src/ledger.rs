//! Resource ledger owned by the world.

use breach_planner_core::{Cost, Resource};
use serde::{Deserialize, Serialize};

const STARTING_STRUCTURE_POINTS: f32 = 40.0;
const STARTING_MOBILE_POINTS: f32 = 5.0;

/// Spendable resources held by the own player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    /// Structure points (SP) available for stationary units.
    pub structure: f32,
    /// Mobile points (MP) available for mobile units.
    pub mobile: f32,
}

impl Ledger {
    /// Creates a ledger holding the provided balances.
    #[must_use]
    pub const fn new(structure: f32, mobile: f32) -> Self {
        Self { structure, mobile }
    }

    /// Balance of the provided resource.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> f32 {
        match resource {
            Resource::Structure => self.structure,
            Resource::Mobile => self.mobile,
        }
    }

    /// Reports whether both balances cover `cost` once.
    pub(crate) fn covers(&self, cost: Cost) -> bool {
        self.structure >= cost.structure && self.mobile >= cost.mobile
    }

    /// Deducts the price of `count` units from both balances.
    pub(crate) fn spend(&mut self, cost: Cost, count: u32) {
        let units = count as f32;
        self.structure = (self.structure - cost.structure * units).max(0.0);
        self.mobile = (self.mobile - cost.mobile * units).max(0.0);
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(STARTING_STRUCTURE_POINTS, STARTING_MOBILE_POINTS)
    }
}
