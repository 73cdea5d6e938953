use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// A cell position within a grid, `row` counts down from the top and `col` across from the left.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Coordinate {
        Coordinate { row, col }
    }

    /// Creates a new `Coordinate` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable, which is only the case moving up from row 0
    /// or left from column 0. Whether the result lies inside a particular grid is the grid's business.
    pub fn offset(&self, dir: Direction) -> Option<Coordinate> {
        let (row, col) = (self.row, self.col);
        match dir {
            Direction::Up => row.checked_sub(1).map(|r| Coordinate::new(r, col)),
            Direction::Down => row.checked_add(1).map(|r| Coordinate::new(r, col)),
            Direction::Left => col.checked_sub(1).map(|c| Coordinate::new(row, c)),
            Direction::Right => col.checked_add(1).map(|c| Coordinate::new(row, c)),
        }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from(row_col_pair: (usize, usize)) -> Coordinate {
        Coordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Order the generator enumerates candidate neighbours in before picking one at random.
pub const CARVE_ORDER: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

/// Order the solver tries passages in. The first path found under this order is the one reported.
pub const SOLVE_ORDER: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The direction leading from `a` to `b` if they are orthogonally adjacent.
    pub fn between(a: Coordinate, b: Coordinate) -> Option<Direction> {
        CARVE_ORDER.iter()
                   .cloned()
                   .find(|dir| a.offset(*dir) == Some(b))
    }
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Coordinate>; 4]>;
pub type DirectionSmallVec = SmallVec<[Direction; 4]>;

/// Which of the four sides of a cell still have a standing wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Walls {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Walls {
    pub fn all() -> Walls {
        Walls { top: true, bottom: true, left: true, right: true }
    }

    pub fn none() -> Walls {
        Walls { top: false, bottom: false, left: false, right: false }
    }

    #[inline]
    pub fn has_wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_wall(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::Up => self.top = present,
            Direction::Down => self.bottom = present,
            Direction::Left => self.left = present,
            Direction::Right => self.right = present,
        }
    }

    pub fn open_sides(&self) -> DirectionSmallVec {
        CARVE_ORDER.iter()
                   .cloned()
                   .filter(|dir| !self.has_wall(*dir))
                   .collect()
    }
}

impl Default for Walls {
    fn default() -> Walls {
        Walls::all()
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct Cell {
    pub(crate) walls: Walls,
    pub(crate) visited: bool,
}

impl Cell {
    #[inline]
    pub fn walls(&self) -> Walls {
        self.walls
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offsets() {
        let c = Coordinate::new(3, 5);
        assert_eq!(c.offset(Direction::Up), Some(Coordinate::new(2, 5)));
        assert_eq!(c.offset(Direction::Down), Some(Coordinate::new(4, 5)));
        assert_eq!(c.offset(Direction::Left), Some(Coordinate::new(3, 4)));
        assert_eq!(c.offset(Direction::Right), Some(Coordinate::new(3, 6)));

        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(Direction::Up), None);
        assert_eq!(origin.offset(Direction::Left), None);
    }

    #[test]
    fn direction_between_adjacent_cells() {
        let gc = |r, c| Coordinate::new(r, c);
        assert_eq!(Direction::between(gc(1, 1), gc(2, 1)), Some(Direction::Down));
        assert_eq!(Direction::between(gc(1, 1), gc(0, 1)), Some(Direction::Up));
        assert_eq!(Direction::between(gc(1, 1), gc(1, 2)), Some(Direction::Right));
        assert_eq!(Direction::between(gc(1, 1), gc(1, 0)), Some(Direction::Left));
        assert_eq!(Direction::between(gc(1, 1), gc(1, 1)), None);
        assert_eq!(Direction::between(gc(1, 1), gc(2, 2)), None);
        assert_eq!(Direction::between(gc(0, 0), gc(0, 2)), None);
    }

    #[test]
    fn opposites_are_symmetric() {
        for dir in CARVE_ORDER.iter() {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
        }
    }

    #[test]
    fn walls_toggle_independently() {
        let mut w = Walls::all();
        assert!(w.open_sides().is_empty());

        w.set_wall(Direction::Right, false);
        assert!(!w.has_wall(Direction::Right));
        assert!(w.has_wall(Direction::Left));
        assert!(w.has_wall(Direction::Up));
        assert!(w.has_wall(Direction::Down));
        assert_eq!(&*w.open_sides(), &[Direction::Right]);

        w.set_wall(Direction::Up, false);
        assert_eq!(&*w.open_sides(), &[Direction::Up, Direction::Right]);
        assert_eq!(Walls::none().open_sides().len(), 4);
    }

    #[test]
    fn new_cell_is_walled_and_unvisited() {
        let cell = Cell::default();
        assert_eq!(cell.walls(), Walls::all());
        assert!(!cell.is_visited());
    }
}
