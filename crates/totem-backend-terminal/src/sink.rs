//! Terminal frame sink
//!
//! Emulates the LED panel in a true color terminal. Vsync is emulated with a
//! fixed refresh quantum: `swap_on_vsync(n)` returns no sooner than `n`
//! quanta after the previous present.

use crate::font;
use crate::output::{OutputError, PanelOutput};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use totem_core::{Brightness, FontFace, FrameSink, ImageFrame, Rgb, SinkError, VSYNC_QUANTUM};
use tracing::trace;

/// Panel emulator writing half-block frames
pub struct TerminalSink<W: Write + Send = io::Stdout> {
    back: ImageFrame,
    output: PanelOutput<W>,
    quantum: Duration,
    last_present: Option<Instant>,
    brightness: Brightness,
}

impl TerminalSink<io::Stdout> {
    /// Take over the terminal
    pub fn stdout(width: u32, height: u32) -> Result<Self, OutputError> {
        Ok(Self::with_output(PanelOutput::stdout()?, width, height))
    }
}

impl<W: Write + Send> TerminalSink<W> {
    /// Create a sink drawing through `output`
    pub fn with_output(output: PanelOutput<W>, width: u32, height: u32) -> Self {
        Self {
            back: ImageFrame::new(width, height),
            output,
            quantum: VSYNC_QUANTUM,
            last_present: None,
            brightness: Brightness::FULL,
        }
    }

    /// Override the refresh quantum
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.quantum = quantum;
        self
    }

    /// The output the sink draws through
    pub fn output(&self) -> &PanelOutput<W> {
        &self.output
    }
}

impl<W: Write + Send> FrameSink for TerminalSink<W> {
    fn width(&self) -> u32 {
        self.back.width
    }

    fn height(&self) -> u32 {
        self.back.height
    }

    fn clear(&mut self) {
        self.back.clear();
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.back.plot(x, y, self.brightness.apply(color));
    }

    fn draw_text(&mut self, font: FontFace, x: i32, y: i32, color: Rgb, text: &str) -> i32 {
        let color = self.brightness.apply(color);
        font::draw_text(&mut self.back, font, x, y, color, text)
    }

    fn set_image(&mut self, image: &ImageFrame) {
        self.back.clear();
        self.back.blit(image, 0, 0);
        self.back.dim(self.brightness);
    }

    fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
    }

    fn brightness(&self) -> Brightness {
        self.brightness
    }

    fn swap_on_vsync(&mut self, framerate_fraction: u32) -> Result<(), SinkError> {
        let hold = self.quantum * framerate_fraction.max(1);
        if let Some(last) = self.last_present {
            let due = last + hold;
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }

        let written = self.output.render(&self.back).map_err(|e| match e {
            OutputError::Io(io) => SinkError::Io(io),
            OutputError::NotAvailable => SinkError::Disconnected,
        })?;
        trace!(cells = written, "Presented frame");
        self.last_present = Some(Instant::now());
        Ok(())
    }
}
