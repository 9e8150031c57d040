//! Fixed-size rankings of deploy candidates.

use breach_planner_core::Location;

/// Deploy location paired with the gain a strategy expects from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Deploy cell under evaluation.
    pub location: Location,
    /// Weighted gain the simulator predicted for the cell.
    pub gain: f32,
}

impl Candidate {
    /// Pairs a location with its gain.
    #[must_use]
    pub const fn new(location: Location, gain: f32) -> Self {
        Self { location, gain }
    }
}

/// Keeps the single strictly best candidate offered so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Best {
    slot: Option<Candidate>,
}

impl Best {
    /// Records `candidate` if it strictly beats the current holder.
    pub fn offer(&mut self, candidate: Candidate) {
        match self.slot {
            Some(current) if candidate.gain <= current.gain => {}
            _ => self.slot = Some(candidate),
        }
    }

    /// Current holder, if any candidate was offered.
    #[must_use]
    pub const fn get(&self) -> Option<Candidate> {
        self.slot
    }
}

/// Keeps the two strictly best candidates at distinct locations.
///
/// Ties never displace an earlier candidate, so iteration order decides
/// between equal gains.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TopTwo {
    slots: [Option<Candidate>; 2],
}

impl TopTwo {
    /// Offers a candidate for ranking.
    pub fn offer(&mut self, candidate: Candidate) {
        if let Some(rank) = self.rank_of(candidate.location) {
            let held = self.slots[rank].map_or(f32::NEG_INFINITY, |entry| entry.gain);
            if candidate.gain <= held {
                return;
            }
            self.slots[rank] = None;
            if rank == 0 {
                self.slots.swap(0, 1);
            }
        }

        if beats(candidate, self.slots[0]) {
            self.slots[1] = self.slots[0];
            self.slots[0] = Some(candidate);
        } else if beats(candidate, self.slots[1]) {
            self.slots[1] = Some(candidate);
        }
    }

    /// Highest-ranked candidate.
    #[must_use]
    pub const fn best(&self) -> Option<Candidate> {
        self.slots[0]
    }

    /// Second-highest candidate.
    #[must_use]
    pub const fn runner_up(&self) -> Option<Candidate> {
        self.slots[1]
    }

    /// Best candidate whose location differs from `taken`.
    ///
    /// Falls back to the runner-up only when the best candidate sits on the
    /// taken cell.
    #[must_use]
    pub fn best_avoiding(&self, taken: Location) -> Option<Candidate> {
        match self.best() {
            Some(best) if best.location == taken => self.runner_up(),
            best => best,
        }
    }

    fn rank_of(&self, location: Location) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.is_some_and(|entry| entry.location == location))
    }
}

fn beats(candidate: Candidate, holder: Option<Candidate>) -> bool {
    holder.map_or(true, |current| candidate.gain > current.gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, gain: f32) -> Candidate {
        Candidate::new(Location::new(x, 0), gain)
    }

    #[test]
    fn best_keeps_first_of_equal_gains() {
        let mut best = Best::default();
        best.offer(at(1, 5.0));
        best.offer(at(2, 5.0));
        best.offer(at(3, 4.0));
        assert_eq!(best.get(), Some(at(1, 5.0)));
    }

    #[test]
    fn top_two_orders_by_gain() {
        let mut ranking = TopTwo::default();
        ranking.offer(at(1, 3.0));
        ranking.offer(at(2, 9.0));
        ranking.offer(at(3, 5.0));
        ranking.offer(at(4, 1.0));

        assert_eq!(ranking.best(), Some(at(2, 9.0)));
        assert_eq!(ranking.runner_up(), Some(at(3, 5.0)));
    }

    #[test]
    fn top_two_ties_keep_earlier_candidates() {
        let mut ranking = TopTwo::default();
        ranking.offer(at(1, 7.0));
        ranking.offer(at(2, 7.0));
        ranking.offer(at(3, 7.0));

        assert_eq!(ranking.best(), Some(at(1, 7.0)));
        assert_eq!(ranking.runner_up(), Some(at(2, 7.0)));
    }

    #[test]
    fn top_two_never_holds_one_location_twice() {
        let mut ranking = TopTwo::default();
        ranking.offer(at(1, 4.0));
        ranking.offer(at(2, 6.0));
        ranking.offer(at(1, 8.0));

        assert_eq!(ranking.best(), Some(at(1, 8.0)));
        assert_eq!(ranking.runner_up(), Some(at(2, 6.0)));

        ranking.offer(at(2, 9.0));
        assert_eq!(ranking.best(), Some(at(2, 9.0)));
        assert_eq!(ranking.runner_up(), Some(at(1, 8.0)));
    }

    #[test]
    fn best_avoiding_falls_back_on_collision() {
        let mut ranking = TopTwo::default();
        ranking.offer(at(1, 9.0));
        ranking.offer(at(2, 4.0));

        assert_eq!(ranking.best_avoiding(Location::new(1, 0)), Some(at(2, 4.0)));
        assert_eq!(ranking.best_avoiding(Location::new(5, 0)), Some(at(1, 9.0)));
    }

    #[test]
    fn best_avoiding_single_colliding_entry_is_empty() {
        let mut ranking = TopTwo::default();
        ranking.offer(at(1, 9.0));
        assert_eq!(ranking.best_avoiding(Location::new(1, 0)), None);
    }
}
