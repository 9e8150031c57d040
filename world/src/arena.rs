//! Diamond arena geometry.

use breach_planner_core::{Edge, Location, ARENA_SIZE, HALF_ARENA};

/// Reports whether the location lies inside the diamond arena.
#[must_use]
pub fn contains(location: Location) -> bool {
    let (x, y) = (location.x(), location.y());
    if !(0..ARENA_SIZE).contains(&y) {
        return false;
    }
    if y < HALF_ARENA {
        (HALF_ARENA - 1 - y..=HALF_ARENA + y).contains(&x)
    } else {
        (y - HALF_ARENA..=ARENA_SIZE + HALF_ARENA - 1 - y).contains(&x)
    }
}

/// Cells composing the provided edge, ordered from the arena's horizontal
/// center outward.
#[must_use]
pub fn edge_locations(edge: Edge) -> Vec<Location> {
    (0..HALF_ARENA)
        .map(|step| match edge {
            Edge::TopRight => Location::new(HALF_ARENA + step, ARENA_SIZE - 1 - step),
            Edge::TopLeft => Location::new(HALF_ARENA - 1 - step, ARENA_SIZE - 1 - step),
            Edge::BottomLeft => Location::new(HALF_ARENA - 1 - step, step),
            Edge::BottomRight => Location::new(HALF_ARENA + step, step),
        })
        .collect()
}

/// Edge a mobile unit starting at `start` walks toward.
#[must_use]
pub fn target_edge(start: Location) -> Edge {
    let left = start.x() < HALF_ARENA;
    if start.y() < HALF_ARENA {
        if left {
            Edge::TopRight
        } else {
            Edge::TopLeft
        }
    } else if left {
        Edge::BottomRight
    } else {
        Edge::BottomLeft
    }
}

/// Reports whether the location lies on one of the own player's deploy edges.
#[must_use]
pub fn is_friendly_edge(location: Location) -> bool {
    Edge::FRIENDLY
        .iter()
        .any(|&edge| edge_locations(edge).contains(&location))
}

/// Reports whether the location lies in the own player's half.
#[must_use]
pub fn in_own_half(location: Location) -> bool {
    contains(location) && location.y() < HALF_ARENA
}
