//! A window that shows the maze being carved and solved.
//!
//! Drawing happens in software on the `ImageRenderer` buffer; each tick uploads the buffer to a
//! streaming texture and presents it.

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::EventPump;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cells::{Coordinate, Walls};
use crate::render_sink::RenderSink;
use crate::renderers::{ImageRenderer, RenderOptions};
use crate::units::{ColumnsCount, RowsCount};

pub struct SdlSetup {
    pub sdl_context: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
}

pub fn init() -> Result<SdlSetup, String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    Ok(SdlSetup {
        sdl_context,
        video_subsystem,
    })
}

pub struct SdlRenderer {
    image: ImageRenderer,
    canvas: Canvas<Window>,
    events: EventPump,
    delay: Duration,
    closed: bool,
    _setup: SdlSetup,
}

impl SdlRenderer {
    /// Open a window sized to fit the whole maze.
    pub fn new(rows: RowsCount, columns: ColumnsCount, options: &RenderOptions) -> Result<SdlRenderer, String> {
        let image = ImageRenderer::new(rows, columns, options)
            .ok_or_else(|| "maze is too large to show in a window".to_string())?;
        let (width, height) = image.image().dimensions();

        let setup = init()?;
        let window = setup.video_subsystem
            .window("Maze solver", width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;
        let events = setup.sdl_context.event_pump()?;

        Ok(SdlRenderer {
            image,
            canvas,
            events,
            delay: options.delay(),
            closed: false,
            _setup: setup,
        })
    }

    pub fn image(&self) -> &ImageRenderer {
        &self.image
    }

    /// Has the user closed the window? Events still update the image once it is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Keep showing the final image until the window is closed or Escape/Q is pressed.
    pub fn wait_for_close(&mut self) -> Result<(), String> {
        if self.closed {
            return Ok(());
        }
        self.present()?;

        loop {
            match self.events.wait_event() {
                Event::Quit { .. } |
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } |
                Event::KeyDown { keycode: Some(Keycode::Q), .. } => break,
                Event::Window { win_event: WindowEvent::Exposed, .. } => self.present()?,
                _ => {}
            }
        }
        self.closed = true;
        Ok(())
    }

    fn present(&mut self) -> Result<(), String> {
        let (width, height) = self.image.image().dimensions();
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(|e| e.to_string())?;
        texture.update(None, self.image.image().as_raw(), width as usize * 3)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Drain pending window events, noting a request to close.
    fn pump_events(&mut self) {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } |
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    debug!("window closed");
                    self.closed = true;
                }
                _ => {}
            }
        }
    }
}

impl RenderSink for SdlRenderer {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        self.image.draw_walls(coord, walls);
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        self.image.draw_path_segment(from, to, is_undo);
    }

    fn tick(&mut self) {
        self.pump_events();
        if self.closed {
            return;
        }
        if let Err(e) = self.present() {
            warn!(error = %e, "failed to present frame, window updates stopped");
            self.closed = true;
            return;
        }
        if self.delay > Duration::from_millis(0) {
            thread::sleep(self.delay);
        }
    }
}
