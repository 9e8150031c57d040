//! Static navigation field builder used by the world crate.

use std::collections::VecDeque;

use breach_planner_core::Location;

/// Dense step-distance grid seeded from a single arena edge.
///
/// The field stores the reverse breadth-first search results that drive path
/// extraction toward that edge. Distances default to `u16::MAX` for blocked or
/// unreachable cells so callers can distinguish them from traversable ones.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    width: i32,
    height: i32,
    distances: Vec<u16>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl NavigationField {
    /// Rebuilds the navigation distances using a reverse breadth-first search.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: i32,
        height: i32,
        exits: &[Location],
        mut is_blocked: F,
    ) where
        F: FnMut(Location) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;

        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let mut queue = VecDeque::new();

        for &exit in exits {
            if is_blocked(exit) {
                continue;
            }

            if let Some(index) = self.index(exit) {
                if self.distances[index] == 0 {
                    continue;
                }

                self.distances[index] = 0;
                queue.push_back(exit);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let current_distance = self.distances[current_index];

            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }

            let next_distance = current_distance + 1;

            for (neighbor, _) in neighbors(cell) {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: Location) -> Option<u16> {
        self.index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
    }

    /// Extracts the descending route from `start` to the seeded edge.
    ///
    /// Steps alternate axes whenever two equally short moves exist, starting
    /// with a vertical move. Unreachable starts produce an empty path.
    #[must_use]
    pub(crate) fn path_from(&self, start: Location) -> Vec<Location> {
        let Some(mut remaining) = self.distance(start) else {
            return Vec::new();
        };
        if remaining == u16::MAX {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(usize::from(remaining) + 1);
        path.push(start);

        let mut current = start;
        let mut last_axis = Axis::Horizontal;

        while remaining > 0 {
            let target = remaining - 1;
            let mut fallback = None;
            let mut chosen = None;

            for (neighbor, axis) in neighbors(current) {
                if self.distance(neighbor) != Some(target) {
                    continue;
                }
                if axis != last_axis {
                    chosen = Some((neighbor, axis));
                    break;
                }
                if fallback.is_none() {
                    fallback = Some((neighbor, axis));
                }
            }

            let Some((next, axis)) = chosen.or(fallback) else {
                break;
            };

            path.push(next);
            current = next;
            last_axis = axis;
            remaining = target;
        }

        path
    }

    fn index(&self, cell: Location) -> Option<usize> {
        if cell.x() < 0 || cell.y() < 0 || cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn neighbors(cell: Location) -> [(Location, Axis); 4] {
    [
        (cell.offset(0, 1), Axis::Vertical),
        (cell.offset(0, -1), Axis::Vertical),
        (cell.offset(1, 0), Axis::Horizontal),
        (cell.offset(-1, 0), Axis::Horizontal),
    ]
}
