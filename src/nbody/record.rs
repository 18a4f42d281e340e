use std::io::{self, Write};

use super::body::Body;

/// Writes body positions as CSV rows of `frame, x, y, z`, one frame every tenth of
/// the run.
pub struct PositionRecorder<W: Write> {
    writer: W,
    every: usize,
}

impl<W: Write> PositionRecorder<W> {
    pub fn new(writer: W, iterations: usize) -> Self {
        Self {
            writer,
            every: (iterations / 10).max(1),
        }
    }

    /// Records `bodies` if `iteration` falls on a frame boundary.
    pub fn observe(&mut self, iteration: usize, bodies: &[Body]) -> io::Result<()> {
        if iteration % self.every != 0 {
            return Ok(());
        }
        let frame = iteration / self.every;
        for body in bodies {
            let [x, y, z] = body.position;
            writeln!(self.writer, "{frame}, {x:e}, {y:e}, {z:e}")?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
