//! Terminal rendering: notices, tables and the tile animation.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use luckydraw_core::{HistoryEntry, Notice, NoticeLevel, Notifier, Participant};
use luckydraw_lottery::animation::tile_theme;
use luckydraw_lottery::{AnimationFrame, AnimationPhase, Particle, WinnerSet};
use std::io::Write;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Prints notices to stderr so they never mix with table output.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!("notice: {:?}", notice);
        let prefix = match notice.level {
            NoticeLevel::Info => "i",
            NoticeLevel::Success => "✔",
            NoticeLevel::Error => "✘",
        };
        eprintln!("{} {}", prefix, notice.message);
    }
}

pub fn participants_table(participants: &[Participant]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Student ID", "Added", "ID"]);

    for participant in participants {
        table.add_row(vec![
            participant.name.clone(),
            participant.student_id.clone(),
            participant.created_at.format("%Y-%m-%d %H:%M").to_string(),
            participant.id.clone(),
        ]);
    }

    table
}

pub fn winners_table(winners: &WinnerSet) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Winner", "Student ID"]);

    for (rank, winner) in winners.ranked() {
        table.add_row(vec![
            Cell::new(rank).add_attribute(Attribute::Bold),
            Cell::new(&winner.name).fg(Color::Yellow),
            Cell::new(&winner.student_id),
        ]);
    }

    table
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["When", "Winner", "Student ID"]);

    for entry in entries {
        table.add_row(vec![
            entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.winner_name.clone(),
            entry.winner_student_id.clone(),
        ]);
    }

    table
}

fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: ((hex >> 16) & 0xff) as u8,
        g: ((hex >> 8) & 0xff) as u8,
        b: (hex & 0xff) as u8,
    }
}

/// Keep labels inside the theme's glyph set; anything else becomes '?'.
fn printable(label: &str) -> String {
    let theme = tile_theme();
    label
        .chars()
        .map(|c| if theme.has_glyph(c) || !c.is_ascii() { c } else { '?' })
        .collect()
}

pub fn frame_table(frame: &AnimationFrame) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    for row in 0..frame.grid.rows {
        let cells: Vec<Cell> = frame
            .tiles
            .iter()
            .filter(|tile| tile.row == row)
            .map(|tile| {
                let mut cell = Cell::new(printable(&tile.label)).fg(rgb(tile.color));
                if tile.alpha < 0.5 {
                    cell = cell.add_attribute(Attribute::Dim);
                }
                cell
            })
            .collect();
        table.add_row(cells);
    }

    table
}

/// Redraw the whole animation screen for one frame.
pub fn render_frame(frame: &AnimationFrame) {
    let status = match frame.phase {
        AnimationPhase::Completing => "And the winner is...",
        _ => "Drawing...",
    };

    let mut out = std::io::stdout().lock();
    // a broken stdout only loses the animation
    let _ = write!(
        out,
        "{}{}  {:.1}s\n{}\n(Ctrl-C to cancel)\n",
        CLEAR_SCREEN,
        status,
        frame.elapsed.as_secs_f32(),
        frame_table(frame)
    );
    let _ = out.flush();
}

pub fn clear_screen() {
    print!("{}", CLEAR_SCREEN);
    let _ = std::io::stdout().flush();
}

/// One line of celebration emoji, ordered by where they would appear.
pub fn particle_line(particles: &[Particle]) -> String {
    let mut sorted: Vec<&Particle> = particles.iter().collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted
        .iter()
        .map(|p| p.emoji)
        .collect::<Vec<_>>()
        .join(" ")
}
