//! Screen grid and the diff that turns one grid into another.

use crate::render::style::Style;

/// A rows×cols grid of display bytes with a parallel grid of styles.
///
/// The cursor always sits on the last row; only its column is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenState {
    rows: u16,
    cols: u16,
    chars: Vec<u8>,
    styles: Vec<Style>,
    cursor_col: u16,
}

impl ScreenState {
    /// A blank grid in the default style.
    pub fn new(rows: u16, cols: u16) -> Self {
        let cells = rows as usize * cols as usize;
        Self {
            rows,
            cols,
            chars: vec![b' '; cells],
            styles: vec![Style::DEFAULT; cells],
            cursor_col: 0,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn cursor_col(&self) -> u16 {
        self.cursor_col
    }

    pub fn set_cursor_col(&mut self, col: u16) {
        self.cursor_col = col.min(self.cols.saturating_sub(1));
    }

    /// Set one cell. Writes outside the grid are ignored.
    pub fn put(&mut self, row: u16, col: u16, byte: u8, style: Style) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.chars[index] = byte;
        self.styles[index] = style;
    }

    /// Write `text` from `col` onwards, clipped at the right edge. Returns the column
    /// after the last byte written.
    pub fn put_str(&mut self, row: u16, col: u16, text: &[u8], style: Style) -> u16 {
        let mut col = col;
        for &byte in text {
            if col >= self.cols {
                break;
            }
            self.put(row, col, byte, style);
            col += 1;
        }
        col
    }

    pub fn cell(&self, row: u16, col: u16) -> (u8, Style) {
        let index = row as usize * self.cols as usize + col as usize;
        (self.chars[index], self.styles[index])
    }

    pub fn row_chars(&self, row: u16) -> &[u8] {
        let start = row as usize * self.cols as usize;
        &self.chars[start..start + self.cols as usize]
    }

    pub fn row_styles(&self, row: u16) -> &[Style] {
        let start = row as usize * self.cols as usize;
        &self.styles[start..start + self.cols as usize]
    }

    fn same_dimensions(&self, other: &ScreenState) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Rightmost column of `row` that differs from `other`.
    fn rightmost_change(&self, other: &ScreenState, row: u16) -> Option<u16> {
        let chars = self.row_chars(row).iter().zip(other.row_chars(row));
        let styles = self.row_styles(row).iter().zip(other.row_styles(row));
        chars
            .zip(styles)
            .rposition(|((a, b), (x, y))| a != b || x != y)
            .map(|col| col as u16)
    }
}

fn push_cursor(out: &mut Vec<u8>, row: u16, col: u16) {
    out.extend_from_slice(format!("\x1b[{};{}H", row as u32 + 1, col as u32 + 1).as_bytes());
}

/// Bytes that turn a terminal showing `from` into one showing `to`.
///
/// With no baseline, or a baseline of different dimensions, every row is repainted.
/// Otherwise only rows with a change are written, from column 0 up to the rightmost
/// changed cell. Style sequences are emitted only where the style changes.
///
/// # Panics
///
/// Panics if a cell of `to` holds a byte outside printable ASCII.
pub fn diff(from: Option<&ScreenState>, to: &ScreenState) -> Vec<u8> {
    let baseline = from.filter(|from| from.same_dimensions(to));
    let mut out = Vec::new();
    let mut current_style: Option<Style> = None;

    for row in 0..to.rows {
        let rightmost = match baseline {
            Some(from) => match to.rightmost_change(from, row) {
                Some(col) => col,
                None => continue,
            },
            None if to.cols == 0 => continue,
            None => to.cols - 1,
        };

        push_cursor(&mut out, row, 0);
        let chars = &to.row_chars(row)[..=rightmost as usize];
        let styles = &to.row_styles(row)[..=rightmost as usize];
        for (&byte, &style) in chars.iter().zip(styles) {
            assert!(
                (0x20..=0x7e).contains(&byte),
                "non-printable byte {:#04x} in screen cell",
                byte
            );
            if current_style != Some(style) {
                style.write_sgr(&mut out);
                current_style = Some(style);
            }
            out.push(byte);
        }
    }

    let cursor_moved = baseline.map_or(true, |from| from.cursor_col != to.cursor_col);
    if to.rows > 0 && (!out.is_empty() || cursor_moved) {
        push_cursor(&mut out, to.rows - 1, to.cursor_col);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::Colour;

    fn screen_with(lines: &[&str], cols: u16) -> ScreenState {
        let mut screen = ScreenState::new(lines.len() as u16, cols);
        for (row, line) in lines.iter().enumerate() {
            screen.put_str(row as u16, 0, line.as_bytes(), Style::DEFAULT);
        }
        screen
    }

    #[test]
    fn identical_states_produce_nothing() {
        let screen = screen_with(&["hello", "world"], 8);
        assert!(diff(Some(&screen), &screen).is_empty());
    }

    #[test]
    fn cursor_only_change_moves_cursor() {
        let before = screen_with(&["hello", "world"], 8);
        let mut after = before.clone();
        after.set_cursor_col(3);
        assert_eq!(diff(Some(&before), &after), b"\x1b[2;4H");
    }

    #[test]
    fn changed_row_is_written_up_to_rightmost_change() {
        let before = screen_with(&["hello", "world"], 8);
        let after = screen_with(&["hello", "wxrld"], 8);
        assert_eq!(
            diff(Some(&before), &after),
            b"\x1b[2;1H\x1b[0;39;49mwx\x1b[2;1H".to_vec()
        );
    }

    #[test]
    fn style_change_alone_dirties_a_row() {
        let before = screen_with(&["abc"], 4);
        let mut after = before.clone();
        let red = Style::with_colours(Colour::Red, Colour::Default);
        after.put(0, 1, b'b', red);

        let mut expected = b"\x1b[1;1H".to_vec();
        expected.extend(Style::DEFAULT.sgr());
        expected.push(b'a');
        expected.extend(red.sgr());
        expected.push(b'b');
        expected.extend_from_slice(b"\x1b[1;1H");
        assert_eq!(diff(Some(&before), &after), expected);
    }

    #[test]
    fn style_runs_share_one_sequence() {
        let mut screen = ScreenState::new(1, 6);
        let yellow = Style::with_colours(Colour::Black, Colour::Yellow);
        screen.put_str(0, 0, b"aaa", yellow);
        screen.put_str(0, 3, b"bbb", Style::DEFAULT);

        let out = diff(None, &screen);
        let sgr_count = out.windows(2).filter(|w| w == b"\x1b[").count();
        // One cursor move per row, two style changes, the final cursor move.
        assert_eq!(sgr_count, 4);
    }

    #[test]
    fn dimension_change_repaints_everything() {
        let before = screen_with(&["same", "same"], 4);
        let after = screen_with(&["same", "same"], 5);
        let out = diff(Some(&before), &after);
        assert!(out.starts_with(b"\x1b[1;1H"));
        assert_eq!(out.iter().filter(|&&b| b == b's').count(), 2);
        assert!(out.ends_with(b"\x1b[2;1H"));
    }

    #[test]
    fn missing_baseline_repaints_everything() {
        let screen = screen_with(&["ab"], 2);
        assert_eq!(diff(None, &screen), b"\x1b[1;1H\x1b[0;39;49mab\x1b[1;1H".to_vec());
    }

    #[test]
    #[should_panic(expected = "non-printable")]
    fn non_printable_cell_is_rejected() {
        let mut screen = ScreenState::new(1, 2);
        screen.put(0, 0, 0x07, Style::DEFAULT);
        diff(None, &screen);
    }

    #[test]
    fn writes_outside_grid_are_ignored() {
        let mut screen = ScreenState::new(1, 2);
        assert_eq!(screen.put_str(0, 1, b"xyz", Style::DEFAULT), 2);
        screen.put(5, 0, b'q', Style::DEFAULT);
        assert_eq!(screen.row_chars(0), b" x");
    }
}
