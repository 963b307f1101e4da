use std::collections::HashSet;

use crate::grid::Grid;
use crate::trace::{Step, Trace};

/// Fixed exploration order: down, right, up, left. This decides which valid
/// path is found first when several exist, so reordering would change traces.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MazeStepKind {
    /// The search entered a cell.
    Visiting,
    /// The entered cell is the destination; the search ends here.
    Found,
    /// An in-bounds neighbor turned out to be a wall. Informational only.
    Blocked,
    /// A cell was exhausted and removed from the active path.
    Backtrack,
    /// Terminal step: blocked start, or the search space ran out.
    Failed,
}

/// One snapshot of the backtracking search: the cell the event concerns and
/// a copy of the active path stack at that instant.
pub struct MazeStep {
    pub kind: MazeStepKind,
    pub cell: (usize, usize),
    pub path: Box<[(usize, usize)]>,
    pub message: String,
}

impl Step for MazeStep {
    fn message(&self) -> &str {
        &self.message
    }

    fn is_terminal(&self) -> bool {
        matches!(self.kind, MazeStepKind::Found | MazeStepKind::Failed)
    }
}

/// Depth-first backtracking search from `start` to `end`, recording every
/// cell entry, wall bump, and retreat.
///
/// The visited set is path-local: membership is released on backtrack, so a
/// cell abandoned along one route can be re-entered later via another. This
/// is what distinguishes true backtracking from DFS with a global visited
/// set, and it is why failure is only known after full exhaustion.
pub fn maze_trace(grid: &Grid, start: (usize, usize), end: (usize, usize)) -> Trace<MazeStep> {
    // The one precondition generators self-check: a blocked start cell fails
    // immediately instead of searching.
    if !grid.is_open(start) {
        let step = MazeStep {
            kind: MazeStepKind::Failed,
            cell: start,
            path: Box::new([]),
            message: "Start position is blocked!".to_string(),
        };
        return Trace::new(vec![step]);
    }

    let mut tracer = MazeTracer {
        grid,
        end,
        on_path: HashSet::new(),
        path_stack: Vec::new(),
        steps: Vec::new(),
    };

    if !tracer.solve(start) {
        tracer.steps.push(MazeStep {
            kind: MazeStepKind::Failed,
            cell: start,
            path: Box::new([]),
            message: "No path found to destination.".to_string(),
        });
    }

    Trace::new(tracer.steps)
}

struct MazeTracer<'a> {
    grid: &'a Grid,
    end: (usize, usize),
    /// Cells on the active recursion stack; released on backtrack.
    on_path: HashSet<(usize, usize)>,
    path_stack: Vec<(usize, usize)>,
    steps: Vec<MazeStep>,
}

impl MazeTracer<'_> {
    fn solve(&mut self, cell: (usize, usize)) -> bool {
        let mut path_with_cell = self.path_stack.clone();
        path_with_cell.push(cell);

        self.steps.push(MazeStep {
            kind: MazeStepKind::Visiting,
            cell,
            path: path_with_cell.clone().into_boxed_slice(),
            message: format!("Moving to ({}, {}).", cell.0, cell.1),
        });

        if cell == self.end {
            self.steps.push(MazeStep {
                kind: MazeStepKind::Found,
                cell,
                path: path_with_cell.into_boxed_slice(),
                message: "Destination reached!".to_string(),
            });
            return true;
        }

        self.on_path.insert(cell);
        self.path_stack.push(cell);

        for (dr, dc) in DIRECTIONS {
            let neighbor = match (
                cell.0.checked_add_signed(dr),
                cell.1.checked_add_signed(dc),
            ) {
                (Some(r), Some(c)) => (r, c),
                _ => continue,
            };
            if !self.grid.is_in_bounds(neighbor) {
                continue;
            }
            if self.grid.is_open(neighbor) {
                if !self.on_path.contains(&neighbor) && self.solve(neighbor) {
                    // Success propagates straight out; the path stack stays
                    // as-is so the Found step shows the full route.
                    return true;
                }
            } else {
                self.steps.push(MazeStep {
                    kind: MazeStepKind::Blocked,
                    cell: neighbor,
                    path: self.path_stack.clone().into_boxed_slice(),
                    message: format!("Blocked at ({}, {}).", neighbor.0, neighbor.1),
                });
            }
        }

        // Exhausted every direction: retreat and release the cell
        self.on_path.remove(&cell);
        self.path_stack.pop();
        self.steps.push(MazeStep {
            kind: MazeStepKind::Backtrack,
            cell,
            path: self.path_stack.clone().into_boxed_slice(),
            message: format!("Backtracking from ({}, {}).", cell.0, cell.1),
        });

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Independent reachability check over open cells.
    fn flood_fill_reachable(grid: &Grid, start: (usize, usize), end: (usize, usize)) -> bool {
        if !grid.is_open(start) {
            return false;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(cell) = stack.pop() {
            if cell == end {
                return true;
            }
            for (dr, dc) in DIRECTIONS {
                let neighbor = match (
                    cell.0.checked_add_signed(dr),
                    cell.1.checked_add_signed(dc),
                ) {
                    (Some(r), Some(c)) => (r, c),
                    _ => continue,
                };
                if grid.is_in_bounds(neighbor)
                    && grid.is_open(neighbor)
                    && seen.insert(neighbor)
                {
                    stack.push(neighbor);
                }
            }
        }
        false
    }

    #[test]
    fn test_blocked_start_fails_immediately() {
        let mut grid = Grid::new(3, 3);
        grid.set((0, 0), Cell::Blocked);
        let trace = maze_trace(&grid, (0, 0), (2, 2));
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].kind, MazeStepKind::Failed);
    }

    #[test]
    fn test_direction_order_decides_the_path() {
        // Fully open 2x2: down is tried before right, so the route goes
        // through (1, 0) even though going right first would also work.
        let grid = Grid::new(2, 2);
        let trace = maze_trace(&grid, (0, 0), (1, 1));
        let found = trace.last();
        assert_eq!(found.kind, MazeStepKind::Found);
        assert_eq!(&*found.path, &[(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_dead_end_emits_blocked_then_backtrack() {
        // One row: open, wall, open. The end is unreachable.
        let mut grid = Grid::new(1, 3);
        grid.set((0, 1), Cell::Blocked);
        let trace = maze_trace(&grid, (0, 0), (0, 2));
        let kinds: Vec<MazeStepKind> = trace.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MazeStepKind::Visiting,
                MazeStepKind::Blocked,
                MazeStepKind::Backtrack,
                MazeStepKind::Failed,
            ]
        );
        // The backtrack step shows the shrunken (empty) path
        assert!(trace[2].path.is_empty());
    }

    #[test]
    fn test_found_path_is_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..30 {
            let rows = rng.random_range(2..8);
            let cols = rng.random_range(2..8);
            let mut grid = Grid::new(rows, cols);
            for r in 0..rows {
                for c in 0..cols {
                    if rng.random_range(0..4) == 0 {
                        grid.set((r, c), Cell::Blocked);
                    }
                }
            }
            let start = (0, 0);
            let end = (rows - 1, cols - 1);
            grid.set(start, Cell::Open);
            grid.set(end, Cell::Open);

            let trace = maze_trace(&grid, start, end);
            let last = trace.last();
            match last.kind {
                MazeStepKind::Found => {
                    let path = &last.path;
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&end));
                    // 4-connected, open, no repeats
                    let unique: HashSet<_> = path.iter().collect();
                    assert_eq!(unique.len(), path.len());
                    for cell in path.iter() {
                        assert!(grid.is_open(*cell));
                    }
                    for pair in path.windows(2) {
                        let dr = pair[0].0.abs_diff(pair[1].0);
                        let dc = pair[0].1.abs_diff(pair[1].1);
                        assert_eq!(dr + dc, 1, "path cells must be 4-connected");
                    }
                    assert!(flood_fill_reachable(&grid, start, end));
                }
                MazeStepKind::Failed => {
                    assert!(!flood_fill_reachable(&grid, start, end));
                }
                other => panic!("trace ended in non-terminal kind {other:?}"),
            }
        }
    }

    #[test]
    fn test_start_equals_end() {
        let grid = Grid::new(2, 2);
        let trace = maze_trace(&grid, (0, 0), (0, 0));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].kind, MazeStepKind::Visiting);
        assert_eq!(trace.last().kind, MazeStepKind::Found);
        assert_eq!(&*trace.last().path, &[(0, 0)]);
    }

    #[test]
    fn test_emitted_snapshots_are_not_aliases() {
        let grid = Grid::new(2, 2);
        let trace = maze_trace(&grid, (0, 0), (1, 1));
        // The first visiting snapshot shows only the start cell no matter
        // how far the search went afterwards.
        assert_eq!(&*trace[0].path, &[(0, 0)]);
    }
}
