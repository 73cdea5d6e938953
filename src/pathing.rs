use tracing::{debug, info, trace};

use crate::cells::{Coordinate, Direction, SOLVE_ORDER};
use crate::grid::Grid;
use crate::render_sink::RenderSink;

/// Cells from a start cell to a goal cell inclusive, each adjacent to the next through an open wall.
pub type Path = Vec<Coordinate>;

/// A cell on the search path and the index into `SOLVE_ORDER` of the next direction to try from it.
#[derive(Debug, Copy, Clone)]
struct Frame {
    coord: Coordinate,
    next_direction: usize,
}

/// Find a path from the maze entrance to its exit.
///
/// Returns None when the exit cannot be reached, which is a legitimate answer for a grid that
/// was never carved, not an error.
/// The search relies on the visited flags starting out clear, as they are after generation.
pub fn solve<S>(grid: &mut Grid, sink: &mut S) -> Option<Path>
    where S: RenderSink + ?Sized
{
    let (entrance, exit) = (grid.entrance(), grid.exit());
    debug!(%entrance, %exit, "solving maze");

    let path = depth_first_path(grid, entrance, exit, sink);
    match path {
        Some(ref p) => info!(path_length = p.len(), "maze solved"),
        None => info!("no path from entrance to exit"),
    }
    path
}

/// Depth first search with backtracking from `start` to `goal`.
///
/// Cells are entered only through open walls and never twice. From each cell the directions are
/// tried in `SOLVE_ORDER`; the first path to reach the goal wins, which is not necessarily the
/// shortest one in a maze with loops.
///
/// The sink sees a tick on entering each cell, a forward segment for each step into a cell, and
/// an undo segment for each step back out of a dead end, in the order the search makes them.
pub fn depth_first_path<S>(grid: &mut Grid,
                           start: Coordinate,
                           goal: Coordinate,
                           sink: &mut S)
                           -> Option<Path>
    where S: RenderSink + ?Sized
{
    if !grid.is_valid_coordinate(start) || !grid.is_valid_coordinate(goal) {
        return None;
    }

    if enter_cell(grid, start, goal, sink) {
        return Some(vec![start]);
    }

    let mut stack = vec![Frame { coord: start, next_direction: 0 }];
    let mut backtracks = 0usize;

    while let Some(frame) = stack.last_mut() {
        let current = frame.coord;

        if frame.next_direction == SOLVE_ORDER.len() {
            // Dead end, step back to the cell we came from
            let _ = stack.pop();
            if let Some(parent) = stack.last() {
                trace!(from = %parent.coord, to = %current, "backtrack");
                sink.draw_path_segment(parent.coord, current, true);
                backtracks += 1;
            }
            continue;
        }

        let dir = SOLVE_ORDER[frame.next_direction];
        frame.next_direction += 1;

        if let Some(next) = open_unvisited_neighbour(grid, current, dir) {
            sink.draw_path_segment(current, next, false);

            if enter_cell(grid, next, goal, sink) {
                let mut path: Path = stack.iter().map(|f| f.coord).collect();
                path.push(next);
                debug!(backtracks, "search reached goal");
                return Some(path);
            }

            stack.push(Frame { coord: next, next_direction: 0 });
        }
    }

    debug!(backtracks, "search exhausted");
    None
}

/// Tick, mark the cell visited and report whether it is the goal.
fn enter_cell<S>(grid: &mut Grid, coord: Coordinate, goal: Coordinate, sink: &mut S) -> bool
    where S: RenderSink + ?Sized
{
    sink.tick();
    grid.mark_visited(coord);
    coord == goal
}

fn open_unvisited_neighbour(grid: &Grid, coord: Coordinate, dir: Direction) -> Option<Coordinate> {
    if grid.walls_unchecked(coord).has_wall(dir) {
        return None;
    }
    grid.neighbour_at_direction(coord, dir)
        .filter(|neighbour| !grid.is_visited_unchecked(*neighbour))
}
