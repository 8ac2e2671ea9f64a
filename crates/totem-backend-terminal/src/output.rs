//! Terminal output handling
//!
//! Writes panel frames to the terminal using crossterm. Each character cell
//! shows two pixel rows: the upper half block takes the top pixel as its
//! foreground and the bottom pixel as its background.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, IsTerminal, Write};
use thiserror::Error;
use totem_core::{ImageFrame, Rgb};

const UPPER_HALF: char = '▀';

/// Terminal output errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Terminal not available")]
    NotAvailable,
}

/// One terminal cell: top and bottom pixel
type Cell = (Rgb, Rgb);

/// Half-block frame writer
pub struct PanelOutput<W: Write> {
    out: W,
    /// Whether we're in alternate screen mode
    alternate_screen: bool,
    /// Cells of the last frame written, for diff rendering
    last: Option<(u32, Vec<Cell>)>,
}

impl PanelOutput<io::Stdout> {
    /// Take over stdout: alternate screen, hidden cursor
    pub fn stdout() -> Result<Self, OutputError> {
        let mut out = io::stdout();
        if !out.is_terminal() {
            return Err(OutputError::NotAvailable);
        }

        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self {
            out,
            alternate_screen: true,
            last: None,
        })
    }
}

impl<W: Write> PanelOutput<W> {
    /// Write to any sink without touching terminal modes
    pub fn new(out: W) -> Self {
        Self {
            out,
            alternate_screen: false,
            last: None,
        }
    }

    /// The underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Forget the previous frame so the next render repaints everything
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Render a frame, only rewriting cells that changed
    ///
    /// Returns the number of cells written.
    pub fn render(&mut self, frame: &ImageFrame) -> Result<usize, OutputError> {
        let cells = to_cells(frame);
        let previous = match &self.last {
            Some((width, last)) if *width == frame.width && last.len() == cells.len() => {
                Some(last.as_slice())
            }
            _ => None,
        };

        let mut written = 0;
        let mut cursor: Option<(u32, u32)> = None;
        let mut colors: Option<Cell> = None;

        for (i, &cell) in cells.iter().enumerate() {
            if previous.is_some_and(|p| p[i] == cell) {
                continue;
            }

            let col = i as u32 % frame.width;
            let row = i as u32 / frame.width;
            if cursor != Some((col, row)) {
                queue!(self.out, MoveTo(col as u16, row as u16))?;
            }
            if colors != Some(cell) {
                let (top, bottom) = cell;
                queue!(
                    self.out,
                    SetForegroundColor(rgb(top)),
                    SetBackgroundColor(rgb(bottom))
                )?;
                colors = Some(cell);
            }
            queue!(self.out, Print(UPPER_HALF))?;

            cursor = Some((col + 1, row));
            written += 1;
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        self.last = Some((frame.width, cells));
        Ok(written)
    }

    /// Restore the terminal
    pub fn cleanup(&mut self) -> Result<(), OutputError> {
        if self.alternate_screen {
            execute!(self.out, ResetColor, Show, LeaveAlternateScreen)?;
            self.alternate_screen = false;
        }
        Ok(())
    }
}

impl<W: Write> Drop for PanelOutput<W> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Pair up pixel rows; an odd last row gets a black bottom half
fn to_cells(frame: &ImageFrame) -> Vec<Cell> {
    let rows = frame.height.div_ceil(2);
    let mut cells = Vec::with_capacity((rows * frame.width) as usize);
    for row in 0..rows {
        for x in 0..frame.width {
            let top = frame.get_pixel(x, row * 2).unwrap_or_default();
            let bottom = frame.get_pixel(x, row * 2 + 1).unwrap_or_default();
            cells.push((top, bottom));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_then_diff_render() {
        let mut output = PanelOutput::new(Vec::new());
        let mut frame = ImageFrame::new(4, 4);

        assert_eq!(output.render(&frame).unwrap(), 8);
        assert!(String::from_utf8_lossy(output.writer()).contains(UPPER_HALF));

        assert_eq!(output.render(&frame).unwrap(), 0);

        frame.set_pixel(2, 3, [255, 0, 0]);
        assert_eq!(output.render(&frame).unwrap(), 1);

        output.invalidate();
        assert_eq!(output.render(&frame).unwrap(), 8);
    }

    #[test]
    fn test_true_color_escape() {
        let mut output = PanelOutput::new(Vec::new());
        let mut frame = ImageFrame::new(1, 2);
        frame.set_pixel(0, 0, [12, 34, 56]);
        output.render(&frame).unwrap();

        let text = String::from_utf8_lossy(output.writer()).to_string();
        assert!(text.contains("38;2;12;34;56"));
        assert!(text.contains("48;2;0;0;0"));
    }

    #[test]
    fn test_odd_height_cells() {
        let frame = ImageFrame::new(3, 5);
        assert_eq!(to_cells(&frame).len(), 9);
    }
}
