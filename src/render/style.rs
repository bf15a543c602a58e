//! One-byte cell style and its SGR encoding.
//!
//! Low nibble is the foreground code, high nibble the background code. Each nibble
//! is XORed with [`NIBBLE_XOR`] before being added to 30 (foreground) or 40
//! (background), which makes the all-zero byte the terminal's default colours.
//! A nibble equal to [`INVERT`] selects reverse video instead of explicit colours.
//! This arithmetic is the wire format sent to the terminal and must stay exact.

use ratatui::style::Color;

pub const NIBBLE_XOR: u8 = 9;
pub const INVERT: u8 = 1;

const REVERSE_VIDEO: &[u8] = b"\x1b[0;7m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style(pub u8);

impl Style {
    pub const DEFAULT: Style = Style(0);
    pub const INVERTED: Style = Style::new(INVERT, 0);

    pub const fn new(fg: u8, bg: u8) -> Self {
        Style((fg & 0x0f) | ((bg & 0x0f) << 4))
    }

    pub fn with_colours(fg: Colour, bg: Colour) -> Self {
        Style::new(fg.nibble(), bg.nibble())
    }

    pub const fn fg(self) -> u8 {
        self.0 & 0x0f
    }

    pub const fn bg(self) -> u8 {
        self.0 >> 4
    }

    pub const fn is_inverted(self) -> bool {
        self.fg() == INVERT || self.bg() == INVERT
    }

    /// Append the SGR sequence selecting this style.
    pub fn write_sgr(self, out: &mut Vec<u8>) {
        if self.is_inverted() {
            out.extend_from_slice(REVERSE_VIDEO);
            return;
        }
        let fg = 30 + (self.fg() ^ NIBBLE_XOR) as u32;
        let bg = 40 + (self.bg() ^ NIBBLE_XOR) as u32;
        out.extend_from_slice(format!("\x1b[0;{};{}m", fg, bg).as_bytes());
    }

    pub fn sgr(self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_sgr(&mut out);
        out
    }
}

/// Recover the nibble pair from a sequence produced by [`Style::write_sgr`].
///
/// Reverse video decodes to [`Style::INVERTED`].
pub fn decode_sgr(seq: &[u8]) -> Option<Style> {
    if seq == REVERSE_VIDEO {
        return Some(Style::INVERTED);
    }
    let body = seq.strip_prefix(b"\x1b[0;")?.strip_suffix(b"m")?;
    let body = std::str::from_utf8(body).ok()?;
    let (fg, bg) = body.split_once(';')?;
    let fg: u8 = fg.parse::<u8>().ok()?.checked_sub(30)?;
    let bg: u8 = bg.parse::<u8>().ok()?.checked_sub(40)?;
    if fg > 0x0f || bg > 0x0f {
        return None;
    }
    Some(Style::new(fg ^ NIBBLE_XOR, bg ^ NIBBLE_XOR))
}

/// The eight basic ANSI colours plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Default,
}

impl Colour {
    /// Background colours handed out to saved patterns in turn.
    pub const PALETTE: [Colour; 6] = [
        Colour::Yellow,
        Colour::Cyan,
        Colour::Green,
        Colour::Magenta,
        Colour::Red,
        Colour::Blue,
    ];

    fn ansi_index(self) -> u8 {
        match self {
            Colour::Black => 0,
            Colour::Red => 1,
            Colour::Green => 2,
            Colour::Yellow => 3,
            Colour::Blue => 4,
            Colour::Magenta => 5,
            Colour::Cyan => 6,
            Colour::White => 7,
            Colour::Default => 9,
        }
    }

    pub fn nibble(self) -> u8 {
        self.ansi_index() ^ NIBBLE_XOR
    }

    /// Parse a colour name such as `red` or `lightblue`.
    pub fn parse(name: &str) -> Option<Colour> {
        let colour: Color = name.parse().ok()?;
        Colour::from_color(colour)
    }

    /// Fold a ratatui colour onto the basic set; light variants map to their base.
    pub fn from_color(colour: Color) -> Option<Colour> {
        Some(match colour {
            Color::Reset => Colour::Default,
            Color::Black | Color::DarkGray => Colour::Black,
            Color::Red | Color::LightRed => Colour::Red,
            Color::Green | Color::LightGreen => Colour::Green,
            Color::Yellow | Color::LightYellow => Colour::Yellow,
            Color::Blue | Color::LightBlue => Colour::Blue,
            Color::Magenta | Color::LightMagenta => Colour::Magenta,
            Color::Cyan | Color::LightCyan => Colour::Cyan,
            Color::Gray | Color::White => Colour::White,
            Color::Rgb(..) | Color::Indexed(_) => return None,
        })
    }
}
