#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped combat estimate for a squad of mobile units.
//!
//! The simulator advances a squad onto the first cell of its route, lets it
//! trade fire with the defenders covering that cell for as many frames as the
//! unit needs to cross it, and condenses the outcome into a single weighted
//! gain. Only the first cell is evaluated; the policy weights were tuned
//! against that single-step estimate.

use breach_planner_core::{AttackPolicy, Battlefield, Location, Player, StatTable, UnitKind};

/// Result of simulating one squad at one deploy location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackOutcome {
    /// Damage the squad dealt to opposing units.
    pub damage_dealt: f32,
    /// Units still standing once the simulated frames elapse.
    pub remaining_units: u32,
    /// Weighted combination of damage dealt and survivors.
    pub gain: f32,
}

/// Sums the health of every unit not owned by `owner` within `range` of `location`.
///
/// This is the most damage a squad firing from `location` can land in a
/// single frame, however many shots it has.
#[must_use]
pub fn total_opposing_health_in_range<B>(
    board: &B,
    location: Location,
    range: f32,
    owner: Player,
) -> f32
where
    B: Battlefield + ?Sized,
{
    board
        .units_in_range(location, range)
        .iter()
        .filter(|unit| unit.owner != owner)
        .map(|unit| unit.health)
        .sum()
}

#[derive(Clone, Copy, Debug)]
struct Squad {
    remaining_units: f32,
    total_health: f32,
}

impl Squad {
    fn new(count: u32, unit_health: f32) -> Self {
        let remaining_units = count as f32;
        Self {
            remaining_units,
            total_health: unit_health * remaining_units,
        }
    }

    /// Recounts survivors as `floor(pool / health) + 1` while the pool is positive.
    fn absorb(&mut self, damage: f32, unit_health: f32) {
        self.total_health -= damage;
        self.remaining_units = if self.total_health <= 0.0 {
            0.0
        } else {
            (self.total_health / unit_health).floor() + 1.0
        };
    }
}

/// Estimates the payoff of sending a squad from a deploy location.
#[derive(Clone, Copy, Debug)]
pub struct CombatSimulator<'a> {
    stats: &'a StatTable,
    policy: AttackPolicy,
}

impl<'a> CombatSimulator<'a> {
    /// Creates a simulator bound to the turn's stat table and policy weights.
    #[must_use]
    pub const fn new(stats: &'a StatTable, policy: AttackPolicy) -> Self {
        Self { stats, policy }
    }

    /// Weighted gain of deploying `count` units of `kind` at `location`.
    ///
    /// Returns `None` when the location has no route to the edge.
    #[must_use]
    pub fn gain_of_attack<B>(
        &self,
        board: &B,
        count: u32,
        kind: UnitKind,
        location: Location,
    ) -> Option<f32>
    where
        B: Battlefield + ?Sized,
    {
        self.simulate(board, count, kind, location)
            .map(|outcome| outcome.gain)
    }

    /// Full outcome of deploying `count` units of `kind` at `location`.
    ///
    /// Returns `None` when the location has no route to the edge.
    #[must_use]
    pub fn simulate<B>(
        &self,
        board: &B,
        count: u32,
        kind: UnitKind,
        location: Location,
    ) -> Option<AttackOutcome>
    where
        B: Battlefield + ?Sized,
    {
        let path = board.path_to_edge(location);
        let &cell = path.first()?;

        let stats = self.stats.get(kind);
        let incoming = board.attackers_of(cell, Player::Own) as f32 * self.stats.turret_damage();
        let available =
            total_opposing_health_in_range(board, cell, stats.attack_range, Player::Own);

        let mut squad = Squad::new(count, stats.health);
        let mut damage_dealt = 0.0;

        for _ in 0..stats.frames_per_cell() {
            let volley = stats.attack_damage_moving * squad.remaining_units;
            damage_dealt += volley.min(available);
            squad.absorb(incoming, stats.health);
        }

        let gain = damage_dealt * self.policy.weight_damage
            + squad.remaining_units * self.policy.weight_score;

        Some(AttackOutcome {
            damage_dealt,
            remaining_units: squad.remaining_units as u32,
            gain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breach_planner_core::{Edge, UnitSnapshot};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Skirmish {
        paths: HashMap<Location, Vec<Location>>,
        attackers: HashMap<Location, usize>,
        units: Vec<UnitSnapshot>,
    }

    impl Skirmish {
        fn with_lane(start: Location) -> Self {
            let mut board = Self::default();
            let _ = board
                .paths
                .insert(start, vec![start, start.offset(0, 1), start.offset(0, 2)]);
            board
        }

        fn enemy(&mut self, kind: UnitKind, location: Location, health: f32) {
            self.units.push(UnitSnapshot {
                location,
                kind,
                owner: Player::Opponent,
                health,
            });
        }
    }

    impl Battlefield for Skirmish {
        fn path_to_edge(&self, start: Location) -> Vec<Location> {
            self.paths.get(&start).cloned().unwrap_or_default()
        }

        fn attackers_of(&self, location: Location, _: Player) -> usize {
            self.attackers.get(&location).copied().unwrap_or(0)
        }

        fn units_in_range(&self, location: Location, radius: f32) -> Vec<UnitSnapshot> {
            self.units
                .iter()
                .filter(|unit| unit.location.distance(location) <= radius)
                .copied()
                .collect()
        }

        fn is_blocked(&self, _: Location) -> bool {
            false
        }

        fn edge_locations(&self, _: Edge) -> Vec<Location> {
            Vec::new()
        }

        fn stationary_units(&self) -> Vec<UnitSnapshot> {
            Vec::new()
        }
    }

    #[test]
    fn opposing_health_skips_own_units_on_the_same_cell() {
        let mut board = Skirmish::default();
        let spot = Location::new(5, 5);
        board.enemy(UnitKind::Turret, spot, 40.0);
        board.units.push(UnitSnapshot {
            location: spot,
            kind: UnitKind::Wall,
            owner: Player::Own,
            health: 60.0,
        });

        assert_eq!(
            total_opposing_health_in_range(&board, spot, 1.0, Player::Own),
            40.0
        );
    }

    #[test]
    fn opposing_health_is_zero_with_nobody_around() {
        let board = Skirmish::default();
        assert_eq!(
            total_opposing_health_in_range(&board, Location::new(1, 1), 4.5, Player::Own),
            0.0
        );
    }

    #[test]
    fn uncontested_squad_counts_one_unit_over_its_size() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let board = Skirmish::with_lane(start);

        for kind in [UnitKind::Scout, UnitKind::Demolisher, UnitKind::Interceptor] {
            let outcome = simulator
                .simulate(&board, 4, kind, start)
                .expect("lane exists");
            assert_eq!(outcome.damage_dealt, 0.0, "{kind:?}");
            assert_eq!(outcome.remaining_units, 5, "{kind:?}");
            assert_eq!(outcome.gain, 60.0, "{kind:?}");
        }
    }

    #[test]
    fn empty_squad_stays_empty() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let board = Skirmish::with_lane(start);

        let outcome = simulator
            .simulate(&board, 0, UnitKind::Interceptor, start)
            .expect("lane exists");
        assert_eq!(outcome.remaining_units, 0);
        assert_eq!(outcome.gain, 0.0);
    }

    #[test]
    fn exact_multiple_pool_keeps_the_extra_unit() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let mut board = Skirmish::with_lane(start);
        let _ = board.attackers.insert(start, 3);

        let outcome = simulator
            .simulate(&board, 5, UnitKind::Scout, start)
            .expect("lane exists");

        // 75 - 15 leaves 60, four whole scouts plus one.
        assert_eq!(outcome.remaining_units, 5);
        assert_eq!(outcome.gain, 60.0);
    }

    #[test]
    fn missing_route_is_not_competitive() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let board = Skirmish::default();

        assert_eq!(
            simulator.gain_of_attack(&board, 5, UnitKind::Scout, Location::new(0, 13)),
            None
        );
    }

    #[test]
    fn survivors_track_the_shrinking_health_pool() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let mut board = Skirmish::with_lane(start);
        let _ = board.attackers.insert(start, 1);
        board.enemy(UnitKind::Wall, start.offset(0, 3), 100.0);

        let outcome = simulator
            .simulate(&board, 4, UnitKind::Demolisher, start)
            .expect("lane exists");

        // Frame one: 4 demolishers fire 32, pool 20 -> 15 counts 4.
        // Frame two: 4 demolishers fire 32, pool 15 -> 10 counts 3.
        assert_eq!(outcome.damage_dealt, 64.0);
        assert_eq!(outcome.remaining_units, 3);
        assert_eq!(outcome.gain, 64.0 + 3.0 * 12.0);
    }

    #[test]
    fn overwhelming_fire_never_leaves_negative_survivors() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let mut board = Skirmish::with_lane(start);
        let _ = board.attackers.insert(start, 10);

        let outcome = simulator
            .simulate(&board, 2, UnitKind::Interceptor, start)
            .expect("lane exists");

        assert_eq!(outcome.remaining_units, 0);
        assert_eq!(outcome.gain, 0.0);
    }

    #[test]
    fn damage_dealt_is_capped_by_available_targets() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let mut board = Skirmish::with_lane(start);
        board.enemy(UnitKind::Wall, start.offset(1, 1), 7.0);

        let outcome = simulator
            .simulate(&board, 5, UnitKind::Scout, start)
            .expect("lane exists");

        assert_eq!(outcome.damage_dealt, 7.0);
        assert_eq!(outcome.gain, 7.0 + 6.0 * 12.0);
    }

    #[test]
    fn only_the_first_cell_is_contested() {
        let stats = StatTable::default();
        let simulator = CombatSimulator::new(&stats, AttackPolicy::default());
        let start = Location::new(3, 10);
        let mut board = Skirmish::with_lane(start);
        let _ = board.attackers.insert(start.offset(0, 1), 6);
        let _ = board.attackers.insert(start.offset(0, 2), 6);

        let outcome = simulator
            .simulate(&board, 3, UnitKind::Scout, start)
            .expect("lane exists");

        assert_eq!(outcome.remaining_units, 4);
    }
}
