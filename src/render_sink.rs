//! The interface maze algorithms report their progress through.
//!
//! Generators and solvers call a `RenderSink` synchronously, in exactly the order events happen,
//! so that a display can replay the carving and the search step by step.

use crate::cells::{Coordinate, Walls};
use crate::grid::Grid;

pub trait RenderSink {
    /// Render the current wall configuration of a cell.
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls);

    /// Render a path edge between two adjacent cells. `is_undo` marks a backtrack out of `to`.
    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool);

    /// Animation pulse sent after each significant mutation.
    fn tick(&mut self) {}
}

impl<'a, S: RenderSink + ?Sized> RenderSink for &'a mut S {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        (**self).draw_walls(coord, walls)
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        (**self).draw_path_segment(from, to, is_undo)
    }

    fn tick(&mut self) {
        (**self).tick()
    }
}

/// Draw every cell of the grid as it currently stands, row by row, with a tick after each cell.
pub fn draw_grid<S: RenderSink + ?Sized>(grid: &Grid, sink: &mut S) {
    for coord in grid.iter() {
        if let Some(walls) = grid.walls(coord) {
            sink.draw_walls(coord, walls);
            sink.tick();
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw_walls(&mut self, _: Coordinate, _: Walls) {}
    fn draw_path_segment(&mut self, _: Coordinate, _: Coordinate, _: bool) {}
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RenderEvent {
    Walls(Coordinate, Walls),
    PathSegment { from: Coordinate, to: Coordinate, is_undo: bool },
    Tick,
}

/// Records every event in the order it was received.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<RenderEvent>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog { events: vec![] }
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn ticks_count(&self) -> usize {
        self.events.iter().filter(|e| **e == RenderEvent::Tick).count()
    }

    pub fn path_segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate, bool)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            RenderEvent::PathSegment { from, to, is_undo } => Some((from, to, is_undo)),
            _ => None,
        })
    }

    pub fn drawn_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.events.iter().filter_map(|e| match *e {
            RenderEvent::Walls(coord, _) => Some(coord),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Send the recorded events, in order, to another sink.
    pub fn replay<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for event in &self.events {
            match *event {
                RenderEvent::Walls(coord, walls) => sink.draw_walls(coord, walls),
                RenderEvent::PathSegment { from, to, is_undo } => sink.draw_path_segment(from, to, is_undo),
                RenderEvent::Tick => sink.tick(),
            }
        }
    }
}

impl RenderSink for EventLog {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        self.events.push(RenderEvent::Walls(coord, walls));
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        self.events.push(RenderEvent::PathSegment { from, to, is_undo });
    }

    fn tick(&mut self) {
        self.events.push(RenderEvent::Tick);
    }
}

/// Forwards every event to each of its sinks in turn.
#[derive(Default)]
pub struct Broadcast<'a> {
    sinks: Vec<&'a mut dyn RenderSink>,
}

impl<'a> Broadcast<'a> {
    pub fn new() -> Broadcast<'a> {
        Broadcast { sinks: vec![] }
    }

    pub fn add(&mut self, sink: &'a mut dyn RenderSink) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<'a> RenderSink for Broadcast<'a> {
    fn draw_walls(&mut self, coord: Coordinate, walls: Walls) {
        for sink in self.sinks.iter_mut() {
            sink.draw_walls(coord, walls);
        }
    }

    fn draw_path_segment(&mut self, from: Coordinate, to: Coordinate, is_undo: bool) {
        for sink in self.sinks.iter_mut() {
            sink.draw_path_segment(from, to, is_undo);
        }
    }

    fn tick(&mut self) {
        for sink in self.sinks.iter_mut() {
            sink.tick();
        }
    }
}
