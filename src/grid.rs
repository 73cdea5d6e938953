use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use std::error::Error;
use std::fmt;

use crate::cells::{Cell, Coordinate, CoordinateOptionSmallVec, CoordinateSmallVec, Direction,
                   Walls, CARVE_ORDER};
use crate::grid_displays;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// A grid needs at least one row and one column, and a cell count that fits in memory.
    InvalidDimension { rows: usize, columns: usize },
    InvalidCoordinate(Coordinate),
    /// Walls can only be removed between orthogonally adjacent cells.
    NotAdjacent(Coordinate, Coordinate),
    /// The wall on that side of the cell faces another cell, not the outside of the maze.
    NotOnBoundary(Coordinate, Direction),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::InvalidDimension { rows, columns } => {
                write!(f, "invalid grid dimensions {} x {}", rows, columns)
            }
            GridError::InvalidCoordinate(coord) => write!(f, "coordinate {} is outside the grid", coord),
            GridError::NotAdjacent(a, b) => write!(f, "cells {} and {} are not adjacent", a, b),
            GridError::NotOnBoundary(coord, dir) => {
                write!(f, "the {:?} wall of cell {} is not on the maze boundary", dir, coord)
            }
        }
    }
}

impl Error for GridError {}


// Looking only right and down from each cell visits every interior wall exactly once.
const PASSAGE_SCAN: [Direction; 2] = [Direction::Right, Direction::Down];

/// Rectangular arrangement of maze cells stored in row major order.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    columns: usize,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, passages: {:?}",
               self.rows, self.columns, self.passages_count())
    }
}

impl Grid {
    /// Creates a grid with every wall of every cell standing and no cell visited.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid, GridError> {
        let (RowsCount(rows), ColumnsCount(columns)) = (rows, columns);

        let invalid = GridError::InvalidDimension { rows, columns };
        if rows == 0 || columns == 0 {
            return Err(invalid);
        }
        let cells_count = rows.checked_mul(columns).ok_or(invalid)?;

        Ok(Grid {
            cells: vec![Cell::default(); cells_count],
            rows,
            columns,
        })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.rows)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.columns)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Node and edge counts of the passage graph of a fully carved grid.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.size()), EdgesCount(self.size() - 1))
    }

    #[inline]
    pub fn entrance(&self) -> Coordinate {
        Coordinate::new(0, 0)
    }

    #[inline]
    pub fn exit(&self) -> Coordinate {
        Coordinate::new(self.rows - 1, self.columns - 1)
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.row < self.rows && coord.col < self.columns
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row * self.columns + coord.col)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    pub fn walls(&self, coord: Coordinate) -> Option<Walls> {
        self.cell(coord).map(Cell::walls)
    }

    pub fn is_visited(&self, coord: Coordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_visited)
    }

    pub fn set_visited(&mut self, coord: Coordinate, visited: bool) -> Result<(), GridError> {
        let index = self.checked_index(coord)?;
        self.cells[index].visited = visited;
        Ok(())
    }

    /// Mark every cell as unvisited so the flag can be reused by the next traversal.
    pub fn reset_visited(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
        }
    }

    pub fn neighbour_at_direction(&self, coord: Coordinate, direction: Direction) -> Option<Coordinate> {
        coord.offset(direction)
             .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Coordinate,
                                    dirs: &[Direction])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    /// Cells that are up, down, left or right of a particular cell, but not necessarily
    /// reachable through an open wall.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        if !self.is_valid_coordinate(coord) {
            return CoordinateSmallVec::new();
        }
        CARVE_ORDER.iter()
                   .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                   .collect()
    }

    /// Is there a neighbouring cell in `direction` with no wall standing between the two?
    pub fn is_passage(&self, coord: Coordinate, direction: Direction) -> bool {
        match (self.walls(coord), self.neighbour_at_direction(coord, direction)) {
            (Some(walls), Some(_)) => !walls.has_wall(direction),
            _ => false,
        }
    }

    /// Carve a passage between two adjacent cells, clearing the wall on both sides.
    pub fn remove_wall_between(&mut self, a: Coordinate, b: Coordinate) -> Result<(), GridError> {
        let a_index = self.checked_index(a)?;
        let b_index = self.checked_index(b)?;
        let dir = Direction::between(a, b).ok_or(GridError::NotAdjacent(a, b))?;

        self.cells[a_index].walls.set_wall(dir, false);
        self.cells[b_index].walls.set_wall(dir.opposite(), false);
        Ok(())
    }

    /// Remove a wall on the outside edge of the grid.
    pub fn remove_outer_wall(&mut self, coord: Coordinate, direction: Direction) -> Result<(), GridError> {
        let index = self.checked_index(coord)?;
        if self.neighbour_at_direction(coord, direction).is_some() {
            return Err(GridError::NotOnBoundary(coord, direction));
        }
        self.cells[index].walls.set_wall(direction, false);
        Ok(())
    }

    /// Break through the top of the entrance cell and the bottom of the exit cell.
    pub fn open_entrance_and_exit(&mut self) -> Result<(), GridError> {
        let (entrance, exit) = (self.entrance(), self.exit());
        self.remove_outer_wall(entrance, Direction::Up)?;
        self.remove_outer_wall(exit, Direction::Down)
    }

    /// Row major iteration over every cell coordinate.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> {
        (0..self.rows).cartesian_product(0..self.columns)
                      .map(Coordinate::from)
    }

    pub fn iter_row(&self) -> impl Iterator<Item = Vec<Coordinate>> {
        let columns = self.columns;
        (0..self.rows).map(move |row| (0..columns).map(|col| Coordinate::new(row, col)).collect())
    }

    /// Every open interior wall as the pair of cells it connects, each pair reported once.
    pub fn passages<'a>(&'a self) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        self.iter()
            .cartesian_product(PASSAGE_SCAN.iter().cloned())
            .filter(move |&(coord, dir)| self.is_passage(coord, dir))
            .filter_map(move |(coord, dir)| {
                self.neighbour_at_direction(coord, dir).map(|neighbour| (coord, neighbour))
            })
    }

    pub fn passages_count(&self) -> usize {
        self.passages().count()
    }

    /// The maze as an undirected graph: one node per cell in row major order, one edge per passage.
    pub fn passage_graph(&self) -> UnGraph<Coordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.passages() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    /// Index of a coordinate already known to lie inside the grid.
    #[inline]
    pub(crate) fn index_unchecked(&self, coord: Coordinate) -> usize {
        debug_assert!(self.is_valid_coordinate(coord), "coordinate outside grid {:?}", coord);
        coord.row * self.columns + coord.col
    }

    #[inline]
    pub(crate) fn mark_visited(&mut self, coord: Coordinate) {
        let index = self.index_unchecked(coord);
        self.cells[index].visited = true;
    }

    #[inline]
    pub(crate) fn walls_unchecked(&self, coord: Coordinate) -> Walls {
        self.cells[self.index_unchecked(coord)].walls
    }

    #[inline]
    pub(crate) fn is_visited_unchecked(&self, coord: Coordinate) -> bool {
        self.cells[self.index_unchecked(coord)].visited
    }

    fn checked_index(&self, coord: Coordinate) -> Result<usize, GridError> {
        self.grid_coordinate_to_index(coord)
            .ok_or(GridError::InvalidCoordinate(coord))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frame = grid_displays::render_text_frame(self.rows(),
                                                     self.columns(),
                                                     |coord| self.walls_unchecked(coord),
                                                     |_| grid_displays::EMPTY_BODY);
        write!(f, "{}", frame)
    }
}
