use docopt::Docopt;
use serde_derive::Deserialize;
use maze_solver::{
    generators::Generator,
    grid::Grid,
    pathing::{self, Path},
    render_sink::{self, RenderSink},
    renderers::{ImageRenderer, RenderOptions, RenderOptionsBuilder, TextRenderer},
    units::{ColumnsCount, RowsCount},
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Maze solver

Carves a random perfect maze, then finds the way from the top left entrance to the
bottom right exit, drawing every step.

Usage:
    maze_solver_driver -h | --help
    maze_solver_driver [options]
    maze_solver_driver (text|image|window) [options]

Options:
    -h --help            Show this screen.
    --rows=<n>           Number of rows of cells [default: 12].
    --columns=<n>        Number of columns of cells [default: 16].
    --seed=<n>           Seed for the maze generator. A random seed is chosen and logged if not given.
    --animate            Redraw the text maze in the terminal on every step of carving and solving.
    --delay-ms=<n>       Pause in milliseconds after every animation step [default: 0].
    --text-out=<path>    Output file path for the text rendering instead of the terminal.
    --image-out=<path>   Output file path for an image rendering of the maze. Always PNG format.
                         The image command writes maze.png if not given.
    --cell-pixels=<n>    Pixel length of one cell side in image and window renderings [default: 40].
    --margin=<n>         Pixel width of the blank border around the maze [default: 20].

Log output goes to stderr and is filtered with the RUST_LOG environment variable.
";
const DEFAULT_IMAGE_PATH: &str = "maze.png";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_text: bool,
    cmd_image: bool,
    cmd_window: bool,
    flag_rows: usize,
    flag_columns: usize,
    flag_seed: Option<u64>,
    flag_animate: bool,
    flag_delay_ms: u64,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u32,
    flag_margin: u32,
}

mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            ImageError(::image::ImageError);
            GridError(::maze_solver::grid::GridError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logging();

    let mut grid = Grid::new(RowsCount(args.flag_rows), ColumnsCount(args.flag_columns))?;
    let mut generator = Generator::with_seed(args.flag_seed);
    info!(seed = generator.seed(), rows = args.flag_rows, columns = args.flag_columns, "maze setup");

    let render_options = RenderOptionsBuilder::new()
        .cell_side_pixels_length(args.flag_cell_pixels)
        .margin(args.flag_margin)
        .delay(Duration::from_millis(args.flag_delay_ms))
        .animate(args.flag_animate)
        .build();

    // Text is the default when no command is given
    let text_requested = args.cmd_text || !(args.cmd_image || args.cmd_window);

    if !text_requested {
        if args.cmd_image {
            render_image(&mut grid, &mut generator, &args, &render_options)
        } else {
            render_window(&mut grid, &mut generator, &args, &render_options)
        }
    } else if args.flag_text_out.is_empty() {
        // Only the terminal is worth animating
        let stdout = io::stdout();
        render_text(&mut grid, &mut generator, stdout.lock(), &render_options)
    } else {
        let file = File::create(&args.flag_text_out)
            .chain_err(|| format!("Failed to create text file {}", args.flag_text_out))?;
        let options = RenderOptionsBuilder::new().build();
        render_text(&mut grid, &mut generator, BufWriter::new(file), &options)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Draw the blank grid, carve the maze and solve it, all through the one sink.
fn carve_and_solve<S>(grid: &mut Grid, generator: &mut Generator, sink: &mut S) -> Result<Option<Path>>
    where S: RenderSink + ?Sized
{
    render_sink::draw_grid(grid, sink);
    generator.generate(grid, sink)?;
    let path = pathing::solve(grid, sink);

    match path {
        Some(ref p) => info!(steps = p.len() - 1, "found a path from entrance to exit"),
        None => warn!(seed = generator.seed(), "no path from entrance to exit"),
    }
    Ok(path)
}

fn render_text<W: Write>(grid: &mut Grid,
                         generator: &mut Generator,
                         out: W,
                         options: &RenderOptions)
                         -> Result<()> {
    let mut renderer = TextRenderer::new(out, grid.rows(), grid.columns(), options);
    let _ = carve_and_solve(grid, generator, &mut renderer)?;
    let _ = renderer.finish()?;
    Ok(())
}

fn render_image(grid: &mut Grid,
                generator: &mut Generator,
                args: &MazeArgs,
                options: &RenderOptions)
                -> Result<()> {
    let mut renderer = ImageRenderer::new(grid.rows(), grid.columns(), options)
        .ok_or("The maze is too large to render as an image.")?;
    let _ = carve_and_solve(grid, generator, &mut renderer)?;

    let out_path = if args.flag_image_out.is_empty() {
        DEFAULT_IMAGE_PATH
    } else {
        args.flag_image_out.as_str()
    };
    renderer.save(out_path)
        .chain_err(|| format!("Failed to save maze image {}", out_path))?;
    info!(path = out_path, "saved maze image");
    Ok(())
}

#[cfg(feature = "sdl")]
fn render_window(grid: &mut Grid,
                 generator: &mut Generator,
                 args: &MazeArgs,
                 options: &RenderOptions)
                 -> Result<()> {
    use maze_solver::sdl::SdlRenderer;

    let mut window = SdlRenderer::new(grid.rows(), grid.columns(), options)?;
    let _ = carve_and_solve(grid, generator, &mut window)?;

    if !args.flag_image_out.is_empty() {
        window.image()
              .save(&args.flag_image_out)
              .chain_err(|| format!("Failed to save maze image {}", args.flag_image_out))?;
    }
    window.wait_for_close()?;
    Ok(())
}

#[cfg(not(feature = "sdl"))]
fn render_window(_: &mut Grid, _: &mut Generator, _: &MazeArgs, _: &RenderOptions) -> Result<()> {
    error_chain::bail!("The window display is not available: rebuild with `--features sdl`.")
}
