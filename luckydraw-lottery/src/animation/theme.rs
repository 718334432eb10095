//! Process-wide tile theme, installed once on first use.

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TILE_COLORS: [u32; 6] = [0xffc857, 0xff6b6b, 0x6c63ff, 0x2ec4b6, 0xffa8b4, 0xff9f1c];

static INSTALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
pub struct TileTheme {
    pub palette: &'static [u32],
    pub glyphs: Vec<char>,
}

impl TileTheme {
    fn install() -> Self {
        INSTALLS.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Installing tile theme");

        Self {
            palette: &TILE_COLORS,
            // printable ASCII; other glyphs fall back to the terminal font
            glyphs: (' '..='~').collect(),
        }
    }

    /// Palette entry for the tile at `(row, col)`.
    pub fn color_at(&self, row: usize, col: usize) -> u32 {
        self.palette[(row + col) % self.palette.len()]
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyphs.binary_search(&c).is_ok()
    }
}

lazy_static! {
    static ref THEME: TileTheme = TileTheme::install();
}

/// The shared theme. Safe to call from anywhere, any number of times.
pub fn tile_theme() -> &'static TileTheme {
    &THEME
}
