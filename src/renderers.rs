use image::{ImageResult, Rgb, RgbImage};
use std::cmp;
use std::convert::TryFrom;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{trace, warn};

use crate::cells::{Coordinate, Walls};
use crate::grid_displays::{self, PathMark};
use crate::render_sink::RenderSink;
use crate::units::{ColumnsCount, Height, RowsCount, Width};
use crate::utils::{self, CoordinateMap};

/// Moves the terminal cursor home after clearing the screen.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub wall: Rgb<u8>,
    /// Colour a wall is painted over with once it has been knocked down.
    pub removed_wall: Rgb<u8>,
    pub forward_path: Rgb<u8>,
    pub undo_path: Rgb<u8>,
}

impl Default for Palette {
    fn default() -> Palette {
        let white = Rgb([0xff, 0xff, 0xff]);
        Palette {
            background: white,
            wall: Rgb([0, 0, 0]),
            removed_wall: white,
            forward_path: Rgb([0xff, 0, 0]),
            undo_path: Rgb([0x80, 0x80, 0x80]),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub(crate) cell_width: Width,
    pub(crate) cell_height: Height,
    pub(crate) margin: u32,
    pub(crate) line_width: u32,
    pub(crate) palette: Palette,
    pub(crate) delay: Duration,
    pub(crate) animate: bool,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            cell_width: Width(40),
            cell_height: Height(40),
            margin: 20,
            line_width: 2,
            palette: Palette::default(),
            delay: Duration::from_millis(0),
            animate: false,
        }
    }
}

impl RenderOptions {
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder { options: RenderOptions::default() }
    }

    /// Square cells with sides of `pixels` length.
    pub fn cell_side_pixels_length(mut self, pixels: u32) -> RenderOptionsBuilder {
        self.options.cell_width = Width(pixels);
        self.options.cell_height = Height(pixels);
        self
    }

    pub fn cell_size(mut self, width: Width, height: Height) -> RenderOptionsBuilder {
        self.options.cell_width = width;
        self.options.cell_height = height;
        self
    }

    /// Blank border in pixels between the image edge and the outer maze walls.
    pub fn margin(mut self, pixels: u32) -> RenderOptionsBuilder {
        self.options.margin = pixels;
        self
    }

    pub fn line_width(mut self, pixels: u32) -> RenderOptionsBuilder {
        self.options.line_width = cmp::max(pixels, 1);
        self
    }

    pub fn palette(mut self, palette: Palette) -> RenderOptionsBuilder {
        self.options.palette = palette;
        self
    }

    /// Pause after each animation tick.
    pub fn delay(mut self, delay: Duration) -> RenderOptionsBuilder {
        self.options.delay = delay;
        self
    }

    /// Show intermediate frames on every tick rather than only the final result.
    pub fn animate(mut self, animate: bool) -> RenderOptionsBuilder {
        self.options.animate = animate;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

impl Default for RenderOptionsBuilder {
    fn default() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }
}

/// Pixel bounds of a cell, inclusive of the wall lines on all four sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Maps grid cells onto image pixels: cells are laid out row major from the top left corner,
/// offset by a margin on every side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellGeometry {
    margin: u32,
    cell_width: Width,
    cell_height: Height,
}

impl CellGeometry {
    pub fn new(margin: u32, cell_width: Width, cell_height: Height) -> CellGeometry {
        CellGeometry {
            margin,
            cell_width,
            cell_height,
        }
    }

    pub fn from_options(options: &RenderOptions) -> CellGeometry {
        CellGeometry::new(options.margin, options.cell_width, options.cell_height)
    }

    /// Image dimensions that fit the whole grid and its margin, or None if they overflow a u32.
    pub fn image_size(&self, rows: RowsCount, columns: ColumnsCount) -> Option<(Width, Height)> {
        let extent = |count: usize, cell_pixels: u32| {
            let count = u64::try_from(count).ok()?;
            let pixels = count.checked_mul(u64::from(cell_pixels))?
                .checked_add(2 * u64::from(self.margin))?
                .checked_add(1)?;
            u32::try_from(pixels).ok()
        };
        let width = extent(columns.0, self.cell_width.0)?;
        let height = extent(rows.0, self.cell_height.0)?;
        Some((Width(width), Height(height)))
    }

    pub fn cell_rect(&self, coord: Coordinate) -> PixelRect {
        let (Width(w), Height(h)) = (self.cell_width, self.cell_height);
        let x1 = self.margin + coord.col as u32 * w;
        let y1 = self.margin + coord.row as u32 * h;
        PixelRect {
            x1,
            y1,
            x2: x1 + w,
            y2: y1 + h,
        }
    }

    pub fn centre(&self, coord: Coordinate) -> (u32, u32) {
        let rect = self.cell_rect(coord);
        ((rect.x1 + rect.x2) / 2, (rect.y1 + rect.y2) / 2)
    }
}

/// Renders the maze as box drawing text.
///
/// The renderer keeps its own copy of every wall configuration it is told about, so it shows
/// what has been drawn so far rather than the grid's current state. Cells on the search path are
/// marked with a dot and cells backtracked out of with a cross.
/// When animating, every tick clears the terminal and rewrites the whole frame.
pub struct TextRenderer<W: Write> {
    out: W,
    rows: RowsCount,
    columns: ColumnsCount,
    walls: Vec<Walls>,
    marks: CoordinateMap<PathMark>,
    animate: bool,
    delay: Duration,
    frames_written: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, rows: RowsCount, columns: ColumnsCount, options: &RenderOptions) -> TextRenderer<W> {
        let cells_count = rows.0 * columns.0;
        TextRenderer {
            out,
            rows,
            columns,
            walls: vec![Walls::all(); cells_count],
            marks: utils::coordinate_map(cells_count),
            animate: options.animate,
            delay: options.delay,
            frames_written: 0,
        }
    }

    /// The maze as drawn so far.
    pub fn frame(&self) -> String {
        let columns = self.columns.0;
        grid_displays::render_text_frame(self.rows,
                                         self.columns,
                                         |coord| self.walls[coord.row * columns + coord.col],
                                         |coord| self.marks.get(&coord).map_or(grid_displays::EMPTY_BODY, |m| m.body()))
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Write the final frame and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        let frame = self.frame();
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        if coord.row < self.rows.0 && coord.col < self.columns.0 {
            Some(coord.row * self.columns.0 + coord.col)
        } else {
            None
        }
    }

    fn write_frame(&mut self) -> io::Result<()> {
        let frame = self.frame();
        self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.frames_written += 1;
        Ok(())
    }
}

impl<W: Write> RenderSink for TextRenderer<W> {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        match self.index(coord) {
            Some(index) => self.walls[index] = walls,
            None => warn!(%coord, "ignoring walls drawn outside the grid"),
        }
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        if is_undo {
            let _ = self.marks.insert(to, PathMark::Backtracked);
        } else {
            let _ = self.marks.insert(from, PathMark::Forward);
            let _ = self.marks.insert(to, PathMark::Forward);
        }
    }

    fn tick(&mut self) {
        if !self.animate {
            return;
        }
        if let Err(e) = self.write_frame() {
            // Keep going without animation, the final frame is still written by `finish`
            warn!(error = %e, "failed to write animation frame, animation disabled");
            self.animate = false;
            return;
        }
        if self.delay > Duration::from_millis(0) {
            thread::sleep(self.delay);
        }
    }
}

/// Draws the maze with lines onto an RGB image buffer as events arrive.
///
/// Standing walls are drawn in the wall colour and knocked down walls are painted over, so
/// redrawing a cell always shows its latest state. Path segments join cell centres.
pub struct ImageRenderer {
    image: RgbImage,
    rows: RowsCount,
    columns: ColumnsCount,
    geometry: CellGeometry,
    palette: Palette,
    line_width: u32,
}

impl ImageRenderer {
    /// A blank canvas for a grid of the given size, or None if the image would be too large.
    pub fn new(rows: RowsCount, columns: ColumnsCount, options: &RenderOptions) -> Option<ImageRenderer> {
        let geometry = CellGeometry::from_options(options);
        let (Width(width), Height(height)) = geometry.image_size(rows, columns)?;
        trace!(width, height, "creating image canvas");

        Some(ImageRenderer {
            image: RgbImage::from_pixel(width, height, options.palette.background),
            rows,
            columns,
            geometry,
            palette: options.palette,
            line_width: options.line_width,
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.rows.0 && coord.col < self.columns.0
    }

    /// Write the image out, the format is picked from the path's extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.image.save(path)
    }

    /// Draw a horizontal or vertical line of `line_width` thickness, clipped to the image.
    fn draw_line(&mut self, (x1, y1): (u32, u32), (x2, y2): (u32, u32), colour: Rgb<u8>) {
        let before = (self.line_width - 1) / 2;
        let after = self.line_width / 2;

        let x_lo = cmp::min(x1, x2).saturating_sub(before);
        let y_lo = cmp::min(y1, y2).saturating_sub(before);
        let x_hi = cmp::min(cmp::max(x1, x2).saturating_add(after), self.image.width() - 1);
        let y_hi = cmp::min(cmp::max(y1, y2).saturating_add(after), self.image.height() - 1);

        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                self.image.put_pixel(x, y, colour);
            }
        }
    }
}

impl RenderSink for ImageRenderer {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        if !self.contains(coord) {
            warn!(%coord, "ignoring walls drawn outside the grid");
            return;
        }
        let PixelRect { x1, y1, x2, y2 } = self.geometry.cell_rect(coord);

        let sides = [(walls.top, (x1, y1), (x2, y1)),
                     (walls.bottom, (x1, y2), (x2, y2)),
                     (walls.left, (x1, y1), (x1, y2)),
                     (walls.right, (x2, y1), (x2, y2))];

        // Paint over removed walls first so they never cut into a standing wall's corner
        for &(_, from, to) in sides.iter().filter(|side| !side.0) {
            let colour = self.palette.removed_wall;
            self.draw_line(from, to, colour);
        }
        for &(_, from, to) in sides.iter().filter(|side| side.0) {
            let colour = self.palette.wall;
            self.draw_line(from, to, colour);
        }
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        let colour = if is_undo {
            self.palette.undo_path
        } else {
            self.palette.forward_path
        };
        if !self.contains(from) || !self.contains(to) {
            warn!(%from, %to, "ignoring path segment outside the grid");
            return;
        }
        let (start, end) = (self.geometry.centre(from), self.geometry.centre(to));
        self.draw_line(start, end, colour);
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::Generator;
    use crate::grid::Grid;
    use crate::pathing;
    use crate::render_sink::{self, Broadcast};

    fn gc(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn small_options() -> RenderOptions {
        RenderOptionsBuilder::new()
            .cell_side_pixels_length(10)
            .margin(5)
            .line_width(1)
            .build()
    }

    #[test]
    fn builder_defaults() {
        let options = RenderOptionsBuilder::new().build();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.cell_width, Width(40));
        assert_eq!(options.margin, 20);
        assert_eq!(options.delay(), Duration::from_millis(0));
        assert!(!options.animate);

        let options = RenderOptionsBuilder::new()
            .cell_size(Width(8), Height(12))
            .line_width(0)
            .delay(Duration::from_millis(5))
            .animate(true)
            .build();
        assert_eq!((options.cell_width, options.cell_height), (Width(8), Height(12)));
        assert_eq!(options.line_width, 1);
        assert_eq!(options.delay(), Duration::from_millis(5));
        assert!(options.animate);
    }

    #[test]
    fn geometry_maps_cells_to_pixels() {
        let geometry = CellGeometry::new(20, Width(40), Height(30));
        assert_eq!(geometry.cell_rect(gc(0, 0)), PixelRect { x1: 20, y1: 20, x2: 60, y2: 50 });
        assert_eq!(geometry.cell_rect(gc(2, 1)), PixelRect { x1: 60, y1: 80, x2: 100, y2: 110 });
        assert_eq!(geometry.centre(gc(2, 1)), (80, 95));
        assert_eq!(geometry.image_size(RowsCount(3), ColumnsCount(4)),
                   Some((Width(201), Height(131))));
    }

    #[test]
    fn oversized_images_are_refused() {
        let geometry = CellGeometry::new(0, Width(u32::max_value()), Height(1));
        assert_eq!(geometry.image_size(RowsCount(1), ColumnsCount(2)), None);

        let options = RenderOptionsBuilder::new().cell_side_pixels_length(1 << 20).build();
        assert!(ImageRenderer::new(RowsCount(1 << 13), ColumnsCount(1), &options).is_none());
    }

    #[test]
    fn image_walls_and_removed_walls() {
        let options = small_options();
        let mut renderer = ImageRenderer::new(RowsCount(1), ColumnsCount(2), &options).unwrap();
        let palette = options.palette;
        assert_eq!(renderer.image().dimensions(), (31, 21));

        renderer.draw_walls(gc(0, 0), Walls::all());
        renderer.draw_walls(gc(0, 1), Walls::all());
        // midpoint of the shared wall
        assert_eq!(*renderer.image().get_pixel(15, 10), palette.wall);
        // top wall of the second cell
        assert_eq!(*renderer.image().get_pixel(20, 5), palette.wall);
        // inside a cell
        assert_eq!(*renderer.image().get_pixel(10, 10), palette.background);

        let mut opened = Walls::all();
        opened.right = false;
        renderer.draw_walls(gc(0, 0), opened);
        assert_eq!(*renderer.image().get_pixel(15, 10), palette.removed_wall);
        // the corner where the standing top wall meets stays drawn
        assert_eq!(*renderer.image().get_pixel(15, 5), palette.wall);
    }

    #[test]
    fn image_path_segments() {
        let options = small_options();
        let mut renderer = ImageRenderer::new(RowsCount(2), ColumnsCount(1), &options).unwrap();
        let palette = options.palette;

        renderer.draw_path_segment(gc(0, 0), gc(1, 0), false);
        assert_eq!(renderer.geometry().centre(gc(0, 0)), (10, 10));
        assert_eq!(*renderer.image().get_pixel(10, 15), palette.forward_path);

        renderer.draw_path_segment(gc(0, 0), gc(1, 0), true);
        assert_eq!(*renderer.image().get_pixel(10, 15), palette.undo_path);
        assert_eq!(*renderer.image().get_pixel(10, 20), palette.undo_path);

        // nothing outside the grid is drawn
        renderer.draw_path_segment(gc(1, 0), gc(2, 0), false);
        renderer.draw_walls(gc(2, 0), Walls::all());
        assert_eq!(*renderer.image().get_pixel(10, 25), palette.background);
        assert_eq!(*renderer.image().get_pixel(10, 30), palette.background);
    }

    #[test]
    fn text_frame_mirrors_drawn_walls_and_marks() {
        let options = small_options();
        let mut renderer = TextRenderer::new(Vec::new(), RowsCount(1), ColumnsCount(2), &options);
        assert_eq!(renderer.frame(), "┌───┬───┐\n│   │   │\n└───┴───┘\n");

        let mut left = Walls::all();
        left.right = false;
        left.top = false;
        let mut right = Walls::all();
        right.left = false;
        renderer.draw_walls(gc(0, 0), left);
        renderer.draw_walls(gc(0, 1), right);
        renderer.draw_walls(gc(3, 3), Walls::none());
        renderer.draw_path_segment(gc(0, 0), gc(0, 1), false);
        renderer.draw_path_segment(gc(0, 0), gc(0, 1), true);

        assert_eq!(renderer.frame(), "╷   ╶───┐\n│ .   x │\n└───────┘\n");
        // not animating, so only the final frame is written
        renderer.tick();
        assert_eq!(renderer.frames_written(), 0);
        let out = renderer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "╷   ╶───┐\n│ .   x │\n└───────┘\n");
    }

    #[test]
    fn animated_text_writes_a_frame_per_tick() {
        let options = RenderOptionsBuilder::new().animate(true).build();
        let mut renderer = TextRenderer::new(Vec::new(), RowsCount(1), ColumnsCount(1), &options);
        renderer.tick();
        renderer.tick();
        assert_eq!(renderer.frames_written(), 2);

        let out = String::from_utf8(renderer.finish().unwrap()).unwrap();
        assert_eq!(out.matches(CLEAR_SCREEN).count(), 2);
        assert!(out.ends_with("┌───┐\n│   │\n└───┘\n"));
    }

    #[test]
    fn full_run_renders_to_text_and_image() {
        let mut grid = Grid::new(RowsCount(4), ColumnsCount(5)).unwrap();
        let options = small_options();
        let mut text = TextRenderer::new(Vec::new(), grid.rows(), grid.columns(), &options);
        let mut image = ImageRenderer::new(grid.rows(), grid.columns(), &options).unwrap();
        {
            let mut sinks = Broadcast::new();
            sinks.add(&mut text);
            sinks.add(&mut image);
            render_sink::draw_grid(&grid, &mut sinks);
            Generator::from_seed(6).generate(&mut grid, &mut sinks).unwrap();
            assert!(pathing::solve(&mut grid, &mut sinks).is_some());
        }

        // after generation the mirrored walls match the grid exactly
        let unmarked = text.frame()
                           .replace(grid_displays::PATH_BODY, grid_displays::EMPTY_BODY)
                           .replace(grid_displays::BACKTRACKED_BODY, grid_displays::EMPTY_BODY);
        assert_eq!(unmarked, format!("{}", grid));

        let palette = options.palette;
        let (ex, ey) = image.geometry().centre(grid.exit());
        assert_eq!(*image.image().get_pixel(ex, ey), palette.forward_path);
    }
}
