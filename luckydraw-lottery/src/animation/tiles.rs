//! Cosmetic tile board: a grid of name tiles that swap labels at random
//! moments with a fade-out/fade-in. Nothing here touches the real winners.

use super::theme::tile_theme;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PLACEHOLDER_LABEL: &str = "Stay tuned";

const SWAP_DELAY_MS: (u64, u64) = (150, 1600);
const FADE_OUT_MS: (u64, u64) = (120, 220);
const FADE_IN_MS: (u64, u64) = (260, 420);
const RESTING_ALPHA: f32 = 0.85;
const MIN_SCALE: f32 = 0.92;

pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn ease_out_back(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub columns: usize,
    pub rows: usize,
}

impl TileGrid {
    /// At least 4 columns and 3 rows, otherwise as many `tile_size` cells as fit.
    pub fn derive(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1) as f64;
        let columns = ((width as f64 / tile_size).round() as usize).max(4);
        let rows = ((height as f64 / tile_size).round() as usize).max(3);
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Random names, never the same index twice in a row.
pub struct NamePicker {
    names: Vec<String>,
    last: Option<usize>,
}

impl NamePicker {
    pub fn new(names: Vec<String>) -> Self {
        Self { names, last: None }
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        if self.names.is_empty() {
            return PLACEHOLDER_LABEL.to_string();
        }

        let mut index = rng.gen_range(0..self.names.len());
        if Some(index) == self.last {
            index = (index + 1) % self.names.len();
        }
        self.last = Some(index);
        self.names[index].clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileView {
    pub row: usize,
    pub col: usize,
    pub label: String,
    pub color: u32,
    pub alpha: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    started: Duration,
    out: Duration,
    fade_in: Duration,
    swapped: bool,
}

#[derive(Debug, Clone)]
struct Tile {
    label: String,
    alpha: f32,
    scale: f32,
    next_swap: Duration,
    fade: Option<Fade>,
}

pub struct TileBoard {
    grid: TileGrid,
    tiles: Vec<Tile>,
    picker: NamePicker,
    rng: StdRng,
}

impl TileBoard {
    pub fn new(grid: TileGrid, names: Vec<String>) -> Self {
        Self::with_rng(grid, names, StdRng::from_entropy())
    }

    pub fn with_rng(grid: TileGrid, names: Vec<String>, mut rng: StdRng) -> Self {
        let mut picker = NamePicker::new(names);
        let tiles = (0..grid.len())
            .map(|_| Tile {
                label: picker.next(&mut rng),
                alpha: RESTING_ALPHA,
                scale: 1.0,
                next_swap: random_ms(&mut rng, SWAP_DELAY_MS),
                fade: None,
            })
            .collect();

        Self {
            grid,
            tiles,
            picker,
            rng,
        }
    }

    /// Advance every tile to `elapsed` since the board started and return the views.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TileView> {
        for tile in &mut self.tiles {
            if tile.fade.is_none() && elapsed >= tile.next_swap {
                tile.fade = Some(Fade {
                    started: elapsed,
                    out: random_ms(&mut self.rng, FADE_OUT_MS),
                    fade_in: random_ms(&mut self.rng, FADE_IN_MS),
                    swapped: false,
                });
                tile.next_swap = elapsed + random_ms(&mut self.rng, SWAP_DELAY_MS);
            }

            let Some(mut fade) = tile.fade else {
                continue;
            };

            let since = elapsed.saturating_sub(fade.started);
            if since < fade.out {
                let eased = ease_in_out_quad(1.0 - progress(since, fade.out));
                tile.alpha = eased;
                tile.scale = MIN_SCALE + (1.0 - MIN_SCALE) * eased;
                tile.fade = Some(fade);
                continue;
            }

            if !fade.swapped {
                tile.label = self.picker.next(&mut self.rng);
                fade.swapped = true;
            }

            let t = progress(since - fade.out, fade.fade_in);
            let eased = ease_out_back(t);
            tile.alpha = eased.clamp(0.0, 1.0);
            tile.scale = MIN_SCALE + (1.0 - MIN_SCALE) * eased;
            tile.fade = if t >= 1.0 { None } else { Some(fade) };
        }

        self.views()
    }

    pub fn views(&self) -> Vec<TileView> {
        let theme = tile_theme();
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| {
                let row = i / self.grid.columns;
                let col = i % self.grid.columns;
                TileView {
                    row,
                    col,
                    label: tile.label.clone(),
                    color: theme.color_at(row, col),
                    alpha: tile.alpha,
                    scale: tile.scale,
                }
            })
            .collect()
    }
}

fn random_ms<R: Rng + ?Sized>(rng: &mut R, (min, max): (u64, u64)) -> Duration {
    Duration::from_millis(rng.gen_range(min..max))
}

fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_grid_has_minimum_size() {
        assert_eq!(TileGrid::derive(100, 100, 140), TileGrid { columns: 4, rows: 3 });
        assert_eq!(TileGrid::derive(1400, 700, 140), TileGrid { columns: 10, rows: 5 });
    }

    #[test]
    fn test_picker_never_repeats_previous_name() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut picker = NamePicker::new(names(&["A", "B"]));
        let mut previous = picker.next(&mut rng);
        for _ in 0..200 {
            let current = picker.next(&mut rng);
            assert_ne!(current, previous);
            previous = current;
        }
    }

    #[test]
    fn test_picker_without_names_uses_placeholder() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut picker = NamePicker::new(Vec::new());
        assert_eq!(picker.next(&mut rng), PLACEHOLDER_LABEL);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert!((ease_in_out_quad(1.0) - 1.0).abs() < 1e-6);
        assert!(ease_out_back(0.0).abs() < 1e-6);
        assert!((ease_out_back(1.0) - 1.0).abs() < 1e-6);
        // overshoots before settling
        assert!(ease_out_back(0.7) > 1.0);
    }

    #[test]
    fn test_tiles_swap_labels_over_time() {
        let grid = TileGrid::derive(560, 420, 140);
        let pool = names(&["A", "B", "C", "D", "E"]);
        let mut board = TileBoard::with_rng(grid, pool.clone(), StdRng::seed_from_u64(11));
        let before: Vec<String> = board.views().into_iter().map(|v| v.label).collect();

        let mut elapsed = Duration::ZERO;
        while elapsed < Duration::from_secs(3) {
            elapsed += Duration::from_millis(40);
            let views = board.advance(elapsed);
            assert_eq!(views.len(), grid.len());
            assert!(views.iter().all(|v| (0.0..=1.0).contains(&v.alpha)));
            assert!(views.iter().all(|v| pool.contains(&v.label)));
        }

        let after: Vec<String> = board.views().into_iter().map(|v| v.label).collect();
        assert_ne!(before, after);
    }
}
