//! Character heat map of a field for the terminal

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use cubefield_core::Field;
use std::io::Write;

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Renders a unit-range field as ramp characters
pub struct FieldRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl FieldRenderer {
    /// Sample `field` nearest-neighbour onto `width` columns, keeping its
    /// aspect ratio. Values outside `[0, 1]` are clamped.
    pub fn new(field: &Field, width: usize) -> Self {
        let (rows, cols) = field.dim();
        let width = width.clamp(1, cols.max(1));
        let height = ((rows * width) as f64 / cols as f64 / CELL_ASPECT)
            .round()
            .max(1.0) as usize;

        let mut char_buffer = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = (y * rows / height).min(rows - 1);
            for x in 0..width {
                let col = (x * cols / width).min(cols - 1);
                let value = field.get(row, col).unwrap_or(0.0);
                char_buffer.push(ramp_char(value));
            }
        }

        Self {
            width,
            height,
            char_buffer,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in self.char_buffer.chunks(self.width) {
            for &c in line {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        writer.flush()
    }

    /// Rows of plain characters, without colour
    pub fn lines(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width)
            .map(|line| line.iter().collect())
            .collect()
    }
}

fn ramp_char(value: f64) -> char {
    let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    let index = (value * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}
