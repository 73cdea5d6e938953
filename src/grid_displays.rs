use crate::cells::{Coordinate, Walls};
use crate::units::{ColumnsCount, RowsCount};

/// Cell bodies are rendered 3 glyphs wide.
pub const EMPTY_BODY: &str = "   ";
pub const PATH_BODY: &str = " . ";
pub const BACKTRACKED_BODY: &str = " x ";

const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

/// How a cell has been reached by the solver so far.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PathMark {
    /// On the current search path.
    Forward,
    /// Entered and then abandoned as a dead end.
    Backtracked,
}

impl PathMark {
    pub fn body(self) -> &'static str {
        match self {
            PathMark::Forward => PATH_BODY,
            PathMark::Backtracked => BACKTRACKED_BODY,
        }
    }
}

/// Render a maze as box drawing text.
///
/// `walls` gives the wall state of each cell and `body` the 3 glyph content drawn inside it.
/// A wall segment shared by two cells is drawn if either cell reports it as standing, so a
/// partially drawn maze still renders sensibly.
/// Every lattice point where wall segments meet gets a corner glyph joining the segments
/// touching it.
pub fn render_text_frame<W, B>(rows: RowsCount, columns: ColumnsCount, walls: W, body: B) -> String
    where W: Fn(Coordinate) -> Walls,
          B: Fn(Coordinate) -> &'static str
{
    let (RowsCount(rows_count), ColumnsCount(columns_count)) = (rows, columns);

    // horizontal wall segment along the top of cell (r, c), r may be one past the last row
    let horizontal = |r: usize, c: usize| {
        (r < rows_count && walls(Coordinate::new(r, c)).top) ||
        (r > 0 && walls(Coordinate::new(r - 1, c)).bottom)
    };
    // vertical wall segment along the left of cell (r, c), c may be one past the last column
    let vertical = |r: usize, c: usize| {
        (c < columns_count && walls(Coordinate::new(r, c)).left) ||
        (c > 0 && walls(Coordinate::new(r, c - 1)).right)
    };

    let corner = |r: usize, c: usize| {
        let show_left_section = c > 0 && horizontal(r, c - 1);
        let show_right_section = c < columns_count && horizontal(r, c);
        let show_up_section = r > 0 && vertical(r - 1, c);
        let show_down_section = r < rows_count && vertical(r, c);

        match (show_left_section, show_right_section, show_up_section, show_down_section) {
            (true, true, true, true) => WALL_LRUD,
            (true, true, true, false) => WALL_LRU,
            (true, true, false, true) => WALL_LRD,
            (true, false, true, true) => WALL_LUD,
            (false, true, true, true) => WALL_RUD,
            (true, true, false, false) => WALL_LR,
            (false, false, true, true) => WALL_UD,
            (false, true, true, false) => WALL_RU,
            (true, false, false, true) => WALL_LD,
            (true, false, true, false) => WALL_LU,
            (false, true, false, true) => WALL_RD,
            (true, false, false, false) => WALL_L,
            (false, true, false, false) => WALL_R,
            (false, false, true, false) => WALL_U,
            (false, false, false, true) => WALL_D,
            _ => " ",
        }
    };

    // each cell is 4 glyphs wide on 2 lines, plus the closing glyph and newline
    let mut output = String::with_capacity((2 * rows_count + 1) * (4 * columns_count + 2) * 3);

    for r in 0..(rows_count + 1) {
        for c in 0..(columns_count + 1) {
            output.push_str(corner(r, c));
            if c < columns_count {
                output.push_str(if horizontal(r, c) { WALL_LR_3 } else { EMPTY_BODY });
            }
        }
        output.push('\n');

        if r == rows_count {
            break;
        }

        for c in 0..(columns_count + 1) {
            output.push_str(if vertical(r, c) { WALL_UD } else { " " });
            if c < columns_count {
                output.push_str(body(Coordinate::new(r, c)));
            }
        }
        output.push('\n');
    }

    output
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn closed_cell() {
        let frame = render_text_frame(RowsCount(1),
                                      ColumnsCount(1),
                                      |_| Walls::all(),
                                      |_| EMPTY_BODY);
        assert_eq!(frame, "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn closed_cells_share_walls() {
        let frame = render_text_frame(RowsCount(2),
                                      ColumnsCount(2),
                                      |_| Walls::all(),
                                      |_| EMPTY_BODY);
        assert_eq!(frame,
                   "┌───┬───┐\n\
                    │   │   │\n\
                    ├───┼───┤\n\
                    │   │   │\n\
                    └───┴───┘\n");
    }

    #[test]
    fn one_sided_walls_are_still_drawn() {
        // Only the left cell has been told its right wall is gone
        let frame = render_text_frame(RowsCount(1),
                                      ColumnsCount(2),
                                      |coord| {
                                          let mut w = Walls::all();
                                          if coord.col == 0 {
                                              w.right = false;
                                          }
                                          w
                                      },
                                      |_| EMPTY_BODY);
        assert_eq!(frame, "┌───┬───┐\n│   │   │\n└───┴───┘\n");
    }

    #[test]
    fn bodies_are_drawn_inside_cells() {
        let frame = render_text_frame(RowsCount(1),
                                      ColumnsCount(2),
                                      |_| Walls::all(),
                                      |coord| if coord.col == 0 {
                                          PathMark::Forward.body()
                                      } else {
                                          PathMark::Backtracked.body()
                                      });
        assert_eq!(frame, "┌───┬───┐\n│ . │ x │\n└───┴───┘\n");
    }
}
