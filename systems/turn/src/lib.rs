#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrates the systems that make up one turn of play.
//!
//! Each turn rebuilds the standing defense, patches the cells the opponent
//! scored through, funds factories, and then spends the mobile budget on one
//! of three offensive plans: stalling in the opening turns, a demolisher line
//! against a crowded opposing front, or the simulated attack planner.
//! Every batch of commands is applied to the [`World`] before the next system
//! runs so later systems observe the earlier spending.

mod scouting;

use breach_planner_core::{
    AttackPolicy, Battlefield, Breach, Command, Edge, Event, Location, Player,
};
use breach_planner_system_attack_planner::{AttackDecision, AttackPlanner};
use breach_planner_system_defense::{Defense, DefenseLayout};
use breach_planner_system_demolisher_line::{DemolisherLine, LineConfig};
use breach_planner_system_stalling::Stalling;
use breach_planner_system_threat as threat;
use breach_planner_world::{self as world, query, World};
use serde::{Deserialize, Serialize};

pub use scouting::{count_units, UnitFilter};

/// Tunables for the whole turn strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Weights and threshold used by the attack planner.
    pub policy: AttackPolicy,
    /// Structures rebuilt every turn.
    pub defense: DefenseLayout,
    /// Shape of the demolisher line.
    pub line: LineConfig,
    /// Turns, counted from zero, spent stalling before attacking.
    pub stall_turns: u32,
    /// Opposing rows inspected when judging how crowded the front is.
    pub front_rows: Vec<i32>,
    /// Opposing structures on the front rows above which the line is built.
    pub front_density_trigger: usize,
    /// Seed for the stalling placements.
    pub seed: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            policy: AttackPolicy::default(),
            defense: DefenseLayout::default(),
            line: LineConfig::default(),
            stall_turns: 3,
            front_rows: vec![14, 15],
            front_density_trigger: 10,
            seed: 0,
        }
    }
}

/// Offensive plan chosen for a turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurnPlan {
    /// Interceptors scattered along the friendly edges.
    Stall,
    /// Structure line shielding a demolisher push.
    DemolisherLine,
    /// Outcome of the simulated attack planner.
    Attack(AttackDecision),
}

/// Everything a turn queued and what the world made of it.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    /// Zero-based turn number.
    pub turn: u32,
    /// Offensive plan that ran after the defense.
    pub plan: TurnPlan,
    /// Friendly edge cell whose route drew the least defender fire once the
    /// defense stood, if any edge cell was free.
    pub safest_spawn: Option<Location>,
    /// Commands in the order they were applied.
    pub commands: Vec<Command>,
    /// Events the world emitted while applying them.
    pub events: Vec<Event>,
}

impl TurnReport {
    /// Number of deployments and upgrades the world accepted.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::UnitsDeployed { .. } | Event::UnitUpgraded { .. }
                )
            })
            .count()
    }

    /// Number of commands the world refused.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.events.len() - self.accepted()
    }
}

/// Stateful driver that plays one turn at a time.
#[derive(Debug)]
pub struct TurnStrategy {
    stall_turns: u32,
    front: UnitFilter,
    front_density_trigger: usize,
    defense: Defense,
    stalling: Stalling,
    planner: AttackPlanner,
    line: DemolisherLine,
    scored_on: Vec<Location>,
}

impl TurnStrategy {
    /// Builds the strategy and seeds its random placements.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            stall_turns: config.stall_turns,
            front: UnitFilter::owned_by(Player::Opponent).on_rows(config.front_rows),
            front_density_trigger: config.front_density_trigger,
            defense: Defense::new(config.defense),
            stalling: Stalling::new(config.seed),
            planner: AttackPlanner::new(config.policy),
            line: DemolisherLine::new(config.line),
            scored_on: Vec::new(),
        }
    }

    /// Remembers a cell the opponent scored through.
    ///
    /// Breaches scored by the own player are ignored.
    pub fn record_breach(&mut self, breach: Breach) {
        if breach.scored_by != Player::Opponent {
            return;
        }
        tracing::debug!(location = ?breach.location, "breach recorded");
        self.scored_on.push(breach.location);
    }

    /// Cells the opponent has scored through so far, oldest first.
    #[must_use]
    pub fn scored_on(&self) -> &[Location] {
        &self.scored_on
    }

    /// Plays turn `turn` against `world`, applying every command it queues.
    pub fn play_turn(&mut self, world: &mut World, turn: u32) -> TurnReport {
        let mut commands = Vec::new();
        let mut events = Vec::new();
        let mut batch = Vec::new();

        self.defense.handle(&self.scored_on, &mut batch);
        commit(world, &mut batch, &mut commands, &mut events);

        self.defense.factories(&mut batch);
        commit(world, &mut batch, &mut commands, &mut events);

        let board: &World = world;
        let safest_spawn = safest_spawn(board);
        let front = count_units(board, &self.front);
        let plan = if turn < self.stall_turns {
            self.stalling.handle(board, board, &mut batch);
            TurnPlan::Stall
        } else if front > self.front_density_trigger {
            self.line.handle(board, &mut batch);
            TurnPlan::DemolisherLine
        } else {
            let stats = query::stats(board);
            TurnPlan::Attack(self.planner.handle(board, board, stats, &mut batch))
        };
        commit(world, &mut batch, &mut commands, &mut events);

        let report = TurnReport {
            turn,
            plan,
            safest_spawn,
            commands,
            events,
        };
        tracing::info!(
            turn,
            front,
            plan = ?report.plan,
            safest_spawn = ?report.safest_spawn,
            accepted = report.accepted(),
            rejected = report.rejected(),
            "turn played"
        );
        report
    }
}

fn safest_spawn(board: &World) -> Option<Location> {
    let candidates: Vec<_> = Edge::FRIENDLY
        .iter()
        .flat_map(|&edge| board.edge_locations(edge))
        .filter(|&location| !board.is_blocked(location))
        .collect();
    threat::safest_of(board, &candidates, query::stats(board).turret_damage()).ok()
}

fn commit(
    world: &mut World,
    batch: &mut Vec<Command>,
    commands: &mut Vec<Command>,
    events: &mut Vec<Event>,
) {
    for command in batch.drain(..) {
        world::apply(world, command.clone(), events);
        commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breach_planner_core::{Resource, UnitKind};
    use breach_planner_world::{Layout, Ledger, UnitPlacement};

    fn world_with(units: Vec<UnitPlacement>, resources: Ledger) -> World {
        World::from_layout(&Layout {
            units,
            resources,
            ..Layout::default()
        })
        .expect("valid layout")
    }

    fn crowded_front() -> Vec<UnitPlacement> {
        (0..11)
            .map(|i| {
                UnitPlacement::new(
                    UnitKind::Wall,
                    Player::Opponent,
                    Location::new(8 + i, 14 + i % 2),
                )
            })
            .collect()
    }

    #[test]
    fn opening_turns_stall() {
        let mut world = World::new();
        let mut strategy = TurnStrategy::new(StrategyConfig::default());

        let report = strategy.play_turn(&mut world, 0);

        assert_eq!(report.plan, TurnPlan::Stall);
        let interceptors = report
            .commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    Command::Deploy {
                        kind: UnitKind::Interceptor,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(interceptors, 5);
        assert_eq!(query::resource(&world, Resource::Mobile), 0.0);
        assert_eq!(report.safest_spawn, Some(Location::new(13, 0)));
    }

    #[test]
    fn defense_is_applied_before_the_offense() {
        let mut world = World::new();
        let mut strategy = TurnStrategy::new(StrategyConfig::default());

        let report = strategy.play_turn(&mut world, 0);

        assert_eq!(
            report.commands.first(),
            Some(&Command::Deploy {
                kind: UnitKind::Turret,
                location: Location::new(0, 13),
                count: 1,
            })
        );
        // Six turrets, two walls, two upgrades, then four factories:
        // 12 + 2 + 2 + 16 = 32 SP.
        assert_eq!(query::resource(&world, Resource::Structure), 8.0);
        // Fourteen defense commands and five stalling interceptors.
        assert_eq!(report.accepted(), 19);
        assert_eq!(report.rejected(), 0);
    }

    #[test]
    fn crowded_front_triggers_the_demolisher_line() {
        let mut world = world_with(crowded_front(), Ledger::new(40.0, 7.0));
        let mut strategy = TurnStrategy::new(StrategyConfig::default());

        let report = strategy.play_turn(&mut world, 3);

        assert_eq!(report.plan, TurnPlan::DemolisherLine);
        assert_eq!(
            report.commands.last(),
            Some(&Command::Deploy {
                kind: UnitKind::Demolisher,
                location: Location::new(24, 10),
                count: 2,
            })
        );
    }

    #[test]
    fn thin_front_runs_the_attack_planner() {
        let mut front = crowded_front();
        front.truncate(10);
        let mut world = world_with(front, Ledger::default());
        let mut strategy = TurnStrategy::new(StrategyConfig::default());

        let report = strategy.play_turn(&mut world, 3);

        assert!(matches!(report.plan, TurnPlan::Attack(_)));
    }

    #[test]
    fn only_opponent_breaches_are_remembered() {
        let mut strategy = TurnStrategy::new(StrategyConfig::default());
        strategy.record_breach(Breach {
            location: Location::new(3, 10),
            scored_by: Player::Opponent,
        });
        strategy.record_breach(Breach {
            location: Location::new(20, 20),
            scored_by: Player::Own,
        });

        assert_eq!(strategy.scored_on(), &[Location::new(3, 10)]);
    }

    #[test]
    fn breaches_are_reinforced_above_the_scoring_cell() {
        let mut world = World::new();
        let mut strategy = TurnStrategy::new(StrategyConfig::default());
        strategy.record_breach(Breach {
            location: Location::new(3, 10),
            scored_by: Player::Opponent,
        });

        let report = strategy.play_turn(&mut world, 0);

        assert!(report.commands.contains(&Command::Deploy {
            kind: UnitKind::Turret,
            location: Location::new(3, 11),
            count: 1,
        }));
        assert_eq!(
            query::units_at(&world, Location::new(3, 11))
                .first()
                .map(|unit| unit.kind),
            Some(UnitKind::Turret)
        );
    }

    #[test]
    fn config_fields_fall_back_to_defaults() {
        let config: StrategyConfig = toml::from_str(
            r#"
stall_turns = 1
seed = 99

[policy]
weight_score = 4.0
"#,
        )
        .expect("config parses");

        assert_eq!(config.stall_turns, 1);
        assert_eq!(config.seed, 99);
        assert_eq!(config.policy.weight_score, 4.0);
        assert_eq!(config.policy.weight_damage, 1.0);
        assert_eq!(config.front_rows, vec![14, 15]);
        assert_eq!(config.defense, DefenseLayout::default());
    }
}
