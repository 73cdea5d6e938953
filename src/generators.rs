use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, info};

use crate::cells::{Coordinate, CoordinateSmallVec, CARVE_ORDER};
use crate::grid::{Grid, GridError};
use crate::render_sink::RenderSink;

/// Randomized recursive backtracking maze generator.
///
/// The random source is seeded once on construction, so two generators built with the same seed
/// carve identical mazes into identically sized grids.
#[derive(Debug, Clone)]
pub struct Generator {
    rng: XorShiftRng,
    seed: u64,
}

impl Generator {
    /// A generator with a random seed drawn from the thread rng. See `seed` to recover it.
    pub fn new() -> Generator {
        Generator::from_seed(rand::thread_rng().gen())
    }

    pub fn from_seed(seed: u64) -> Generator {
        Generator {
            rng: XorShiftRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn with_seed(seed: Option<u64>) -> Generator {
        seed.map_or_else(Generator::new, Generator::from_seed)
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Carve a perfect maze into the grid then prepare it for solving: all visited flags are
    /// cleared and the entrance and exit are opened to the outside.
    pub fn generate<S>(&mut self, grid: &mut Grid, sink: &mut S) -> Result<(), GridError>
        where S: RenderSink + ?Sized
    {
        debug!(seed = self.seed, rows = grid.rows().0, columns = grid.columns().0, "carving maze");

        recursive_backtracker(grid, &mut self.rng, sink)?;
        grid.reset_visited();
        break_entrance_and_exit(grid, sink)?;

        info!(seed = self.seed, passages = grid.passages_count(), "maze carved");
        Ok(())
    }
}

impl Default for Generator {
    fn default() -> Generator {
        Generator::new()
    }
}

/// Carve passages with a randomized depth first walk from the entrance cell.
///
/// From the current cell one of its unvisited neighbours is chosen uniformly at random, the wall
/// between them is knocked down and the walk continues from the neighbour. When a cell has no
/// unvisited neighbours left it is finished: it is drawn and the walk backtracks to the cell it
/// came from. Once the walk backtracks out of the entrance every cell has been visited and the
/// passages form a spanning tree of the grid.
///
/// The walk keeps its own stack of cells rather than recursing, so the longest corridor is only
/// bounded by heap space. Draw notifications and random draws happen in exactly the order the
/// recursive formulation would make them.
pub fn recursive_backtracker<R, S>(grid: &mut Grid, rng: &mut R, sink: &mut S) -> Result<(), GridError>
    where R: Rng,
          S: RenderSink + ?Sized
{
    let start = grid.entrance();
    grid.mark_visited(start);
    let mut stack: Vec<Coordinate> = Vec::with_capacity(grid.size());
    stack.push(start);

    while let Some(&current) = stack.last() {

        let available = unvisited_neighbours(grid, current);

        if available.is_empty() {
            if let Some(walls) = grid.walls(current) {
                sink.draw_walls(current, walls);
            }
            sink.tick();
            let _ = stack.pop();
            continue;
        }

        let next = available[rng.gen_range(0..available.len())];
        grid.remove_wall_between(current, next)?;
        grid.mark_visited(next);
        stack.push(next);
    }

    Ok(())
}

/// Neighbours not visited yet, in carving order.
fn unvisited_neighbours(grid: &Grid, coord: Coordinate) -> CoordinateSmallVec {
    CARVE_ORDER.iter()
               .filter_map(|dir| grid.neighbour_at_direction(coord, *dir))
               .filter(|neighbour| !grid.is_visited_unchecked(*neighbour))
               .collect()
}

/// Open the outer top wall of the entrance and outer bottom wall of the exit, redrawing both.
fn break_entrance_and_exit<S>(grid: &mut Grid, sink: &mut S) -> Result<(), GridError>
    where S: RenderSink + ?Sized
{
    grid.open_entrance_and_exit()?;

    for coord in [grid.entrance(), grid.exit()].iter() {
        if let Some(walls) = grid.walls(*coord) {
            sink.draw_walls(*coord, walls);
        }
    }
    sink.tick();
    Ok(())
}

/// How many interior walls a fully carved maze has knocked down: one fewer than its cell count.
pub fn expected_passages(grid: &Grid) -> usize {
    grid.size() - 1
}
