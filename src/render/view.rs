//! Model to screen composition.

use crate::model::Model;
use crate::reader::Line;
use crate::render::screen::ScreenState;
use crate::render::style::Style;
use std::time::{Duration, Instant};

/// Everything besides the model that shows up on screen.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub name: &'a str,
    /// Open prompt as (label, typed input).
    pub prompt: Option<(&'a str, &'a str)>,
    pub now: Instant,
    pub linger: Duration,
    pub tab_width: usize,
    pub cycle: u64,
}

type Cell = (u8, Style);

/// Compose the screen for `model`. `None` until the terminal size is known.
pub fn compose(model: &Model, frame: &Frame<'_>) -> Option<ScreenState> {
    let (rows, cols) = (model.rows?, model.cols?);
    let mut screen = ScreenState::new(rows, cols);
    if rows == 0 || cols == 0 {
        return Some(screen);
    }

    let page = rows - 1;
    let mut row = 0u16;
    let mut bottom = model.anchor_offset();
    'lines: for line in model.after() {
        let cells = line_cells(model, line, frame.tab_width);
        for segment in visible_segments(&cells, model, cols) {
            if row >= page {
                break 'lines;
            }
            for (col, &(byte, style)) in segment.iter().enumerate() {
                screen.put(row, col as u16, byte, style);
            }
            row += 1;
        }
        bottom = line.end();
    }

    if model.after_at_end() {
        for filler in row..page {
            screen.put(filler, 0, b'~', Style::DEFAULT);
        }
    }

    draw_status(&mut screen, model, frame, bottom);
    if model.debug_overlay {
        draw_debug_overlay(&mut screen, model, frame.cycle);
    }
    Some(screen)
}

/// Display cells for one line: tabs expanded, unprintable bytes shown as `?`,
/// pattern matches styled.
fn line_cells(model: &Model, line: &Line, tab_width: usize) -> Vec<Cell> {
    let text = line.text();
    let mut styles = vec![Style::DEFAULT; text.len()];
    for highlight in model.patterns.paint_order() {
        for (start, end) in highlight.pattern.find_ranges(text) {
            styles[start..end].fill(highlight.style);
        }
    }

    let tab_width = tab_width.max(1);
    let mut cells = Vec::with_capacity(text.len());
    for (&byte, &style) in text.iter().zip(&styles) {
        match byte {
            b'\t' => {
                let stop = (cells.len() / tab_width + 1) * tab_width;
                cells.resize(stop, (b' ', style));
            }
            0x20..=0x7e => cells.push((byte, style)),
            _ => cells.push((b'?', style)),
        }
    }
    cells
}

/// Split a line's cells into screen rows: wrapped to the width, or a single row
/// shifted by the horizontal offset.
fn visible_segments<'c>(cells: &'c [Cell], model: &Model, cols: u16) -> Vec<&'c [Cell]> {
    let cols = cols as usize;
    if model.wrap {
        if cells.is_empty() {
            return vec![cells];
        }
        return cells.chunks(cols).collect();
    }
    let start = model.horizontal_offset.min(cells.len());
    let end = (start + cols).min(cells.len());
    vec![&cells[start..end]]
}

fn draw_status(screen: &mut ScreenState, model: &Model, frame: &Frame<'_>, bottom: u64) {
    let row = screen.rows() - 1;
    if let Some((label, input)) = frame.prompt {
        let col = screen.put_str(row, 0, label.as_bytes(), Style::DEFAULT);
        let end = screen.put_str(row, col, &printable(input.as_bytes()), Style::DEFAULT);
        screen.set_cursor_col(end);
        return;
    }

    if let Some(message) = model.status(frame.now, frame.linger) {
        screen.put_str(row, 0, &printable(message.as_bytes()), Style::INVERTED);
        return;
    }

    let percent = if model.file_size == 0 {
        100
    } else {
        (bottom.min(model.file_size) * 100 / model.file_size) as u32
    };
    let mut text = format!(
        "{}  {}/{}  {}%",
        frame.name,
        model.anchor_offset(),
        model.file_size,
        percent
    );
    if model.after_at_end() && bottom >= model.file_size {
        text.push_str("  (END)");
    }
    let end = screen.put_str(row, 0, &printable(text.as_bytes()), Style::DEFAULT);
    screen.set_cursor_col(end);
}

fn draw_debug_overlay(screen: &mut ScreenState, model: &Model, cycle: u64) {
    let lines = [
        format!("cycle {}", cycle),
        format!("anchor {}", model.anchor_offset()),
        format!("before {} after {}", model.before().len(), model.after().len()),
        format!("long ops {}", model.long_operations()),
    ];
    let inner = lines.iter().map(String::len).max().unwrap_or(0);
    let width = inner as u16 + 4;
    let height = lines.len() as u16 + 2;
    if screen.cols() < width || screen.rows() <= height {
        return;
    }

    let left = screen.cols() - width;
    let border = format!("+{}+", "-".repeat(inner + 2));
    screen.put_str(0, left, border.as_bytes(), Style::INVERTED);
    for (i, line) in lines.iter().enumerate() {
        let text = format!("| {:<width$} |", line, width = inner);
        screen.put_str(i as u16 + 1, left, text.as_bytes(), Style::INVERTED);
    }
    screen.put_str(height - 1, left, border.as_bytes(), Style::INVERTED);
}

fn printable(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::Colour;
    use crate::search::Pattern;

    fn frame() -> Frame<'static> {
        Frame {
            name: "test.log",
            prompt: None,
            now: Instant::now(),
            linger: Duration::from_secs(2),
            tab_width: 4,
            cycle: 7,
        }
    }

    fn model_with(text: &str, rows: u16, cols: u16) -> Model {
        let mut model = Model::new();
        model.rows = Some(rows);
        model.cols = Some(cols);
        model.file_size = text.len() as u64;
        let mut offset = 0;
        let lines: Vec<Line> = text
            .split_inclusive('\n')
            .map(|chunk| {
                let line = Line::new(offset, chunk.as_bytes());
                offset += chunk.len() as u64;
                line
            })
            .collect();
        model.extend_after(0, lines, true);
        model
    }

    fn row_text(screen: &ScreenState, row: u16) -> String {
        String::from_utf8_lossy(screen.row_chars(row))
            .trim_end()
            .to_string()
    }

    #[test]
    fn unknown_dimensions_render_nothing() {
        assert!(compose(&Model::new(), &frame()).is_none());
    }

    #[test]
    fn lines_status_and_end_marker() {
        let model = model_with("alpha\nbeta\n", 4, 40);
        let screen = compose(&model, &frame()).unwrap();
        assert_eq!(row_text(&screen, 0), "alpha");
        assert_eq!(row_text(&screen, 1), "beta");
        assert_eq!(row_text(&screen, 2), "~");
        assert_eq!(row_text(&screen, 3), "test.log  0/11  100%  (END)");
        assert_eq!(screen.cursor_col(), 27);
    }

    #[test]
    fn tabs_and_unprintable_bytes() {
        let model = model_with("a\tb\x01c\r\n", 2, 20);
        let screen = compose(&model, &frame()).unwrap();
        assert_eq!(row_text(&screen, 0), "a   b?c");
    }

    #[test]
    fn wrap_splits_long_lines() {
        let mut model = model_with("abcdefgh\nxy\n", 5, 3);
        model.wrap = true;
        let screen = compose(&model, &frame()).unwrap();
        assert_eq!(row_text(&screen, 0), "abc");
        assert_eq!(row_text(&screen, 1), "def");
        assert_eq!(row_text(&screen, 2), "gh");
        assert_eq!(row_text(&screen, 3), "xy");
    }

    #[test]
    fn horizontal_offset_skips_columns() {
        let mut model = model_with("abcdefgh\nxy\n", 3, 4);
        model.horizontal_offset = 3;
        let screen = compose(&model, &frame()).unwrap();
        assert_eq!(row_text(&screen, 0), "defg");
        assert_eq!(row_text(&screen, 1), "");
    }

    #[test]
    fn later_patterns_paint_over_earlier_ones() {
        let mut model = model_with("error here\n", 2, 20);
        let style = model
            .patterns
            .add(Pattern::compile("error").unwrap(), Some(Colour::Red));
        model.patterns.set_search(Pattern::compile("ror").unwrap());
        let screen = compose(&model, &frame()).unwrap();

        assert_eq!(screen.cell(0, 0).1, style);
        assert_eq!(screen.cell(0, 2).1, Style::INVERTED);
        assert_eq!(screen.cell(0, 5).1, Style::DEFAULT);
    }

    #[test]
    fn prompt_owns_the_status_line() {
        let mut model = model_with("x\n", 3, 20);
        model.set_status("Pattern not found");
        let mut frame = frame();
        frame.prompt = Some(("/", "err"));
        let screen = compose(&model, &frame).unwrap();
        assert_eq!(row_text(&screen, 2), "/err");
        assert_eq!(screen.cursor_col(), 4);

        frame.prompt = None;
        let screen = compose(&model, &frame).unwrap();
        assert_eq!(row_text(&screen, 2), "Pattern not found");
    }

    #[test]
    fn debug_overlay_sits_top_right() {
        let mut model = model_with("x\n", 10, 40);
        model.debug_overlay = true;
        let screen = compose(&model, &frame()).unwrap();
        let top = row_text(&screen, 0);
        assert!(top.ends_with('+'));
        assert!(row_text(&screen, 1).contains("cycle 7"));
        assert_eq!(screen.cell(1, 39).0, b'|');
    }
}
