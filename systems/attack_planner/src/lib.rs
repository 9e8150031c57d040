#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks this turn's mobile attack, if any.
//!
//! Two strategies compete for the mobile-point budget: an all-in scout rush,
//! and a demolisher push escorted by interceptors that each spend half of
//! their affordable count. Every unblocked friendly edge cell is simulated
//! for each unit kind, the best cells are normalized by the mobile points the
//! strategy would spend, and the winner is committed only when it clears the
//! policy threshold.

mod ranking;

use breach_planner_core::{
    AttackPolicy, Battlefield, Command, Edge, Location, StatTable, Treasury, UnitKind,
};
use breach_planner_system_combat_sim::CombatSimulator;

pub use ranking::{Best, Candidate, TopTwo};

/// Attack committed for the turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackDecision {
    /// No strategy cleared the threshold; nothing is deployed.
    Hold,
    /// Every affordable scout deploys at one cell.
    ScoutRush {
        /// Deploy cell.
        location: Location,
        /// Scouts deployed.
        count: u32,
        /// Normalized gain per mobile point.
        score: f32,
    },
    /// Demolishers and interceptors deploy at two distinct cells.
    Combo {
        /// Demolisher deploy cell.
        demolisher: Location,
        /// Demolishers deployed.
        demolishers: u32,
        /// Interceptor deploy cell.
        interceptor: Location,
        /// Interceptors deployed.
        interceptors: u32,
        /// Normalized gain per mobile point.
        score: f32,
    },
}

/// Intermediate results of scoring every candidate cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackEvaluation {
    /// Scouts the ledger can fund.
    pub max_scouts: u32,
    /// Demolishers reserved for the combo.
    pub max_demolishers: u32,
    /// Interceptors reserved for the combo.
    pub max_interceptors: u32,
    /// Strictly best scout cell.
    pub scout: Best,
    /// Strictly best demolisher cell.
    pub demolisher: Best,
    /// Two best interceptor cells.
    pub interceptors: TopTwo,
}

impl AttackEvaluation {
    /// Interceptor cell the combo would use, avoiding the demolisher cell.
    #[must_use]
    pub fn combo_interceptor(&self) -> Option<Candidate> {
        let demolisher = self.demolisher.get()?;
        self.interceptors.best_avoiding(demolisher.location)
    }
}

/// Location and strategy optimizer for mobile attacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackPlanner {
    policy: AttackPolicy,
}

impl AttackPlanner {
    /// Creates a planner that weighs and gates attacks with `policy`.
    #[must_use]
    pub const fn new(policy: AttackPolicy) -> Self {
        Self { policy }
    }

    /// Chooses this turn's attack and queues its deployment commands.
    ///
    /// Zero-count deployments are never queued.
    pub fn handle<B, T>(
        &self,
        board: &B,
        treasury: &T,
        stats: &StatTable,
        out: &mut Vec<Command>,
    ) -> AttackDecision
    where
        B: Battlefield + ?Sized,
        T: Treasury + ?Sized,
    {
        let evaluation = self.evaluate(board, treasury, stats);
        let decision = self.decide(&evaluation, treasury);
        tracing::debug!(?decision, "attack decided");

        match decision {
            AttackDecision::Hold => {}
            AttackDecision::ScoutRush {
                location, count, ..
            } => push_deploy(out, UnitKind::Scout, location, count),
            AttackDecision::Combo {
                demolisher,
                demolishers,
                interceptor,
                interceptors,
                ..
            } => {
                push_deploy(out, UnitKind::Demolisher, demolisher, demolishers);
                push_deploy(out, UnitKind::Interceptor, interceptor, interceptors);
            }
        }

        decision
    }

    /// Simulates every unblocked friendly edge cell for each attacking kind.
    #[must_use]
    pub fn evaluate<B, T>(&self, board: &B, treasury: &T, stats: &StatTable) -> AttackEvaluation
    where
        B: Battlefield + ?Sized,
        T: Treasury + ?Sized,
    {
        let mut evaluation = AttackEvaluation {
            max_scouts: treasury.affordable(UnitKind::Scout),
            max_demolishers: treasury.affordable(UnitKind::Demolisher) / 2,
            max_interceptors: treasury.affordable(UnitKind::Interceptor) / 2,
            ..AttackEvaluation::default()
        };

        let simulator = CombatSimulator::new(stats, self.policy);

        for location in deploy_locations(board) {
            let scout =
                simulator.gain_of_attack(board, evaluation.max_scouts, UnitKind::Scout, location);
            let demolisher = simulator.gain_of_attack(
                board,
                evaluation.max_demolishers,
                UnitKind::Demolisher,
                location,
            );
            let interceptor = simulator.gain_of_attack(
                board,
                evaluation.max_interceptors,
                UnitKind::Interceptor,
                location,
            );
            tracing::trace!(?location, ?scout, ?demolisher, ?interceptor, "candidate scored");

            if let Some(gain) = scout {
                evaluation.scout.offer(Candidate::new(location, gain));
            }
            if let Some(gain) = demolisher {
                evaluation.demolisher.offer(Candidate::new(location, gain));
            }
            if let Some(gain) = interceptor {
                evaluation.interceptors.offer(Candidate::new(location, gain));
            }
        }

        evaluation
    }

    /// Normalized scout-rush score, or `None` when the rush is ineligible.
    #[must_use]
    pub fn scout_score<T>(&self, evaluation: &AttackEvaluation, treasury: &T) -> Option<f32>
    where
        T: Treasury + ?Sized,
    {
        let scout = evaluation.scout.get()?;
        let spent = treasury.cost_of(UnitKind::Scout).mobile * evaluation.max_scouts as f32;
        per_resource(scout.gain, spent)
    }

    /// Normalized combo score, or `None` when the combo is ineligible.
    #[must_use]
    pub fn combo_score<T>(&self, evaluation: &AttackEvaluation, treasury: &T) -> Option<f32>
    where
        T: Treasury + ?Sized,
    {
        let demolisher = evaluation.demolisher.get()?;
        let interceptor = evaluation.combo_interceptor()?;
        let spent = treasury.cost_of(UnitKind::Demolisher).mobile
            * evaluation.max_demolishers as f32
            + treasury.cost_of(UnitKind::Interceptor).mobile * evaluation.max_interceptors as f32;
        per_resource(demolisher.gain + interceptor.gain, spent)
    }

    fn decide<T>(&self, evaluation: &AttackEvaluation, treasury: &T) -> AttackDecision
    where
        T: Treasury + ?Sized,
    {
        let threshold = self.policy.min_gain_per_resource;
        let scout = self
            .scout_score(evaluation, treasury)
            .filter(|&score| score >= threshold);
        let combo = self
            .combo_score(evaluation, treasury)
            .filter(|&score| score >= threshold);
        tracing::debug!(?scout, ?combo, threshold, "strategy scores");

        let rush = |score| {
            evaluation
                .scout
                .get()
                .map_or(AttackDecision::Hold, |scout| AttackDecision::ScoutRush {
                    location: scout.location,
                    count: evaluation.max_scouts,
                    score,
                })
        };
        let push = |score| {
            match (evaluation.demolisher.get(), evaluation.combo_interceptor()) {
                (Some(demolisher), Some(interceptor)) => AttackDecision::Combo {
                    demolisher: demolisher.location,
                    demolishers: evaluation.max_demolishers,
                    interceptor: interceptor.location,
                    interceptors: evaluation.max_interceptors,
                    score,
                },
                _ => AttackDecision::Hold,
            }
        };

        match (scout, combo) {
            (Some(scout), Some(combo)) if scout >= combo => rush(scout),
            (_, Some(combo)) => push(combo),
            (Some(scout), None) => rush(scout),
            (None, None) => AttackDecision::Hold,
        }
    }
}

fn deploy_locations<B>(board: &B) -> Vec<Location>
where
    B: Battlefield + ?Sized,
{
    Edge::FRIENDLY
        .iter()
        .flat_map(|&edge| board.edge_locations(edge))
        .filter(|&location| !board.is_blocked(location))
        .collect()
}

fn per_resource(gain: f32, spent: f32) -> Option<f32> {
    if spent <= 0.0 {
        return None;
    }
    let score = gain / spent;
    score.is_finite().then_some(score)
}

fn push_deploy(out: &mut Vec<Command>, kind: UnitKind, location: Location, count: u32) {
    if count == 0 {
        return;
    }
    out.push(Command::Deploy {
        kind,
        location,
        count,
    });
}
