//! Census of structures on the board.

use breach_planner_core::{Battlefield, Player, UnitKind, UnitSnapshot};

/// Selects stationary units by owner, kind, and position.
///
/// `None` fields match everything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitFilter {
    /// Owner the unit must belong to.
    pub owner: Player,
    /// Kind the unit must have.
    pub kind: Option<UnitKind>,
    /// Columns the unit must stand on.
    pub columns: Option<Vec<i32>>,
    /// Rows the unit must stand on.
    pub rows: Option<Vec<i32>>,
}

impl UnitFilter {
    /// Matches every structure owned by `owner`.
    #[must_use]
    pub const fn owned_by(owner: Player) -> Self {
        Self {
            owner,
            kind: None,
            columns: None,
            rows: None,
        }
    }

    /// Restricts the filter to the provided rows.
    #[must_use]
    pub fn on_rows(mut self, rows: Vec<i32>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Restricts the filter to a single unit kind.
    #[must_use]
    pub const fn of_kind(mut self, kind: UnitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn matches(&self, unit: &UnitSnapshot) -> bool {
        let location = unit.location;
        unit.owner == self.owner
            && self.kind.map_or(true, |kind| kind == unit.kind)
            && self
                .columns
                .as_ref()
                .map_or(true, |columns| columns.contains(&location.x()))
            && self
                .rows
                .as_ref()
                .map_or(true, |rows| rows.contains(&location.y()))
    }
}

/// Number of stationary units matching `filter`.
#[must_use]
pub fn count_units<B>(board: &B, filter: &UnitFilter) -> usize
where
    B: Battlefield + ?Sized,
{
    board
        .stationary_units()
        .iter()
        .filter(|unit| filter.matches(unit))
        .count()
}
