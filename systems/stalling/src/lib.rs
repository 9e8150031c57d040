#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded system that spends spare mobile points on scattered interceptors.

use breach_planner_core::{Battlefield, Command, Edge, Resource, Treasury, UnitKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stalling system that scatters single interceptors across friendly edges.
#[derive(Debug)]
pub struct Stalling {
    rng: ChaCha8Rng,
}

impl Stalling {
    /// Creates a stalling system whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Queues one interceptor per affordable unit at random unblocked edge cells.
    ///
    /// Several interceptors may share a cell.
    pub fn handle<B, T>(&mut self, board: &B, treasury: &T, out: &mut Vec<Command>)
    where
        B: Battlefield + ?Sized,
        T: Treasury + ?Sized,
    {
        let candidates: Vec<_> = Edge::FRIENDLY
            .iter()
            .flat_map(|&edge| board.edge_locations(edge))
            .filter(|&location| !board.is_blocked(location))
            .collect();
        if candidates.is_empty() {
            return;
        }

        let price = treasury.cost_of(UnitKind::Interceptor).mobile;
        if price <= 0.0 {
            return;
        }

        let mut budget = treasury.resource(Resource::Mobile);
        while budget >= price {
            let location = candidates[self.rng.gen_range(0..candidates.len())];
            out.push(Command::Deploy {
                kind: UnitKind::Interceptor,
                location,
                count: 1,
            });
            budget -= price;
        }
    }
}
