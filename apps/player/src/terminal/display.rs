//! Terminal rendering.

use crate::commands::LessonSummary;
use crossterm::{
    cursor, execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use lesson_core::{BoardView, CardStatus, CardTarget, CardView, HistoryEntry, TILE_COUNT};
use std::io::{stdout, Result, Stdout, Write};

/// First screen row of the card board.
pub const BOARD_TOP: u16 = 3;
/// Screen rows per board row.
pub const ROW_HEIGHT: u16 = 2;
/// Left edge of the left column.
pub const LEFT_X: u16 = 2;
/// Width of one card.
pub const CARD_WIDTH: u16 = 30;
/// Gap between the columns.
pub const COLUMN_GAP: u16 = 4;

const LIST_TOP: u16 = 5;

/// Glyphs the home-screen tiles rotate through.
pub const TILE_IMAGES: [&str; 8] = ["✿", "☀", "☂", "♞", "✈", "☕", "♫", "⚓"];

/// Card under terminal cell `(column, row)`, if any.
pub fn hit_test(board: &BoardView, column: u16, row: u16) -> Option<CardTarget> {
    if row < BOARD_TOP || (row - BOARD_TOP) % ROW_HEIGHT != 0 {
        return None;
    }
    let index = usize::from((row - BOARD_TOP) / ROW_HEIGHT);
    let board_row = board.rows.get(index)?;

    let right_x = LEFT_X + CARD_WIDTH + COLUMN_GAP;
    if (LEFT_X..LEFT_X + CARD_WIDTH).contains(&column) {
        Some(board_row.left.target)
    } else if (right_x..right_x + CARD_WIDTH).contains(&column) {
        Some(board_row.right.target)
    } else {
        None
    }
}

/// Card text fitted to the card width.
pub fn card_text(card: &CardView) -> String {
    let key = card.shortcut.map(|k| format!("[{k}] ")).unwrap_or_default();
    let mut text = format!("{key}{}", card.label);
    let width = usize::from(CARD_WIDTH);
    if text.chars().count() > width {
        text = text.chars().take(width - 1).collect();
        text.push('…');
    }
    format!("{text:<width$}")
}

fn status_color(status: CardStatus) -> Color {
    match status {
        CardStatus::None => Color::White,
        CardStatus::Selected => Color::Yellow,
        CardStatus::Correct => Color::DarkGreen,
        CardStatus::Incorrect => Color::Red,
    }
}

/// Terminal display manager
pub struct Display {
    out: Stdout,
}

impl Display {
    pub fn new() -> Self {
        Self { out: stdout() }
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    fn header(&mut self, title: &str, detail: &str) -> Result<()> {
        execute!(
            self.out,
            cursor::MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Cyan),
            Print(title),
            ResetColor,
            SetAttribute(Attribute::Reset),
            Print("  "),
            Print(detail)
        )
    }

    fn footer(&mut self, row: u16, help: &str) -> Result<()> {
        execute!(
            self.out,
            cursor::MoveTo(0, row),
            SetForegroundColor(Color::DarkGrey),
            Print(help),
            ResetColor
        )
    }

    fn notice(&mut self, row: u16, notice: Option<&str>) -> Result<()> {
        if let Some(text) = notice {
            execute!(
                self.out,
                cursor::MoveTo(0, row),
                SetForegroundColor(Color::Magenta),
                Print(text),
                ResetColor
            )?;
        }
        Ok(())
    }

    /// Lesson picker with the rotating tiles on top.
    pub fn home(
        &mut self,
        lessons: &[LessonSummary],
        cursor_at: usize,
        tiles: [usize; TILE_COUNT],
        notice: Option<&str>,
    ) -> Result<()> {
        self.clear()?;
        self.header("Vocabulary", "pick a lesson")?;

        let strip: Vec<String> = tiles
            .iter()
            .map(|&image| format!("[ {} ]", TILE_IMAGES[image % TILE_IMAGES.len()]))
            .collect();
        execute!(self.out, cursor::MoveTo(LEFT_X, 2), Print(strip.join(" ")))?;

        let mut row = LIST_TOP;
        let mut section = None;
        for (i, lesson) in lessons.iter().enumerate() {
            if section != Some(lesson.section_index) {
                section = Some(lesson.section_index);
                execute!(
                    self.out,
                    cursor::MoveTo(0, row),
                    SetAttribute(Attribute::Bold),
                    Print(&lesson.section_title),
                    SetAttribute(Attribute::Reset)
                )?;
                row += 1;
            }
            let marker = if i == cursor_at { ">" } else { " " };
            let color = if i == cursor_at { Color::Yellow } else { Color::White };
            execute!(
                self.out,
                cursor::MoveTo(0, row),
                SetForegroundColor(color),
                Print(format!(
                    "{marker} {}. {} ({} words) {}",
                    lesson.lesson_index + 1,
                    lesson.title,
                    lesson.word_count,
                    lesson.desc
                )),
                ResetColor
            )?;
            row += 1;
        }
        if lessons.is_empty() {
            execute!(self.out, cursor::MoveTo(0, row), Print("The catalog has no lessons."))?;
            row += 1;
        }

        self.notice(row + 1, notice)?;
        self.footer(row + 3, "↑/↓ choose  Enter play  h history  Ctrl+C quit")?;
        self.out.flush()
    }

    /// The matching board.
    pub fn board(&mut self, title: &str, stage: usize, stage_count: usize, board: &BoardView) -> Result<()> {
        self.clear()?;
        self.header(
            title,
            &format!(
                "round {}/{}  stage {}/{}",
                board.round + 1,
                board.round_count,
                stage + 1,
                stage_count
            ),
        )?;

        let right_x = LEFT_X + CARD_WIDTH + COLUMN_GAP;
        let mut last_row = BOARD_TOP;
        for (i, row) in board.rows.iter().enumerate() {
            let y = BOARD_TOP + ROW_HEIGHT * i as u16;
            for (x, card) in [(LEFT_X, &row.left), (right_x, &row.right)] {
                execute!(
                    self.out,
                    cursor::MoveTo(x, y),
                    SetForegroundColor(status_color(card.status)),
                    Print(card_text(card)),
                    ResetColor
                )?;
            }
            last_row = y;
        }

        self.footer(last_row + 2, "press a card's key or click it  Esc leave")?;
        self.out.flush()
    }

    /// A stage without a board of its own.
    pub fn stage(&mut self, title: &str, stage: usize, stage_count: usize, kind: &str) -> Result<()> {
        self.clear()?;
        self.header(title, &format!("stage {}/{}", stage + 1, stage_count))?;
        execute!(self.out, cursor::MoveTo(LEFT_X, BOARD_TOP), Print(format!("{kind} in progress")))?;
        self.footer(BOARD_TOP + 2, "Esc leave")?;
        self.out.flush()
    }

    pub fn completed(&mut self, entry: &HistoryEntry, notice: Option<&str>) -> Result<()> {
        self.clear()?;
        self.header("Lesson complete", &entry.lesson_title)?;
        execute!(
            self.out,
            cursor::MoveTo(LEFT_X, 2),
            SetForegroundColor(Color::Green),
            Print(format!("Well done! {} is finished.", entry.lesson_title)),
            ResetColor,
            cursor::MoveTo(LEFT_X, 3),
            Print(&entry.lesson_desc)
        )?;
        self.notice(5, notice)?;
        self.footer(7, "Enter back to lessons")?;
        self.out.flush()
    }

    pub fn not_found(&mut self, section: usize, lesson: usize) -> Result<()> {
        self.clear()?;
        self.header("Not found", "")?;
        execute!(
            self.out,
            cursor::MoveTo(LEFT_X, 2),
            Print(format!("There is no lesson {lesson} in section {section}."))
        )?;
        self.footer(4, "Enter back to lessons")?;
        self.out.flush()
    }

    pub fn history(&mut self, entries: &[HistoryEntry], notice: Option<&str>) -> Result<()> {
        self.clear()?;
        self.header("History", &format!("{} completed", entries.len()))?;

        let mut row = 2;
        for entry in entries.iter().rev() {
            execute!(
                self.out,
                cursor::MoveTo(LEFT_X, row),
                Print(format!(
                    "{}  {} ({}.{})",
                    entry.completed_date_utc.format("%Y-%m-%d %H:%M"),
                    entry.lesson_title,
                    entry.section_index + 1,
                    entry.lesson_index + 1
                ))
            )?;
            row += 1;
        }
        if entries.is_empty() {
            execute!(self.out, cursor::MoveTo(LEFT_X, row), Print("No lessons completed yet."))?;
            row += 1;
        }

        self.notice(row + 1, notice)?;
        self.footer(row + 3, "x export  r reset  Esc back")?;
        self.out.flush()
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<()> {
        self.clear()?;
        self.header("Confirm", "")?;
        execute!(
            self.out,
            cursor::MoveTo(LEFT_X, 2),
            SetForegroundColor(Color::Red),
            Print(prompt),
            ResetColor
        )?;
        self.footer(4, "y yes  any other key no")?;
        self.out.flush()
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::BoardRow;
    use pretty_assertions::assert_eq;

    fn view(label: &str, target: CardTarget, shortcut: Option<char>) -> CardView {
        CardView {
            target,
            label: label.to_string(),
            shortcut,
            status: CardStatus::None,
        }
    }

    fn board() -> BoardView {
        BoardView {
            round: 0,
            round_count: 1,
            generation: 1,
            rows: (0..3)
                .map(|i| BoardRow {
                    left: view("w", CardTarget::left(i), None),
                    right: view("d", CardTarget::right(i), None),
                })
                .collect(),
        }
    }

    #[test]
    fn test_hit_test_maps_cells_to_cards() {
        let board = board();
        let right_x = LEFT_X + CARD_WIDTH + COLUMN_GAP;

        assert_eq!(hit_test(&board, LEFT_X, BOARD_TOP), Some(CardTarget::left(0)));
        assert_eq!(
            hit_test(&board, right_x + 3, BOARD_TOP + ROW_HEIGHT * 2),
            Some(CardTarget::right(2))
        );
    }

    #[test]
    fn test_hit_test_misses_outside_cards() {
        let board = board();
        assert_eq!(hit_test(&board, LEFT_X, BOARD_TOP + 1), None);
        assert_eq!(hit_test(&board, LEFT_X + CARD_WIDTH + 1, BOARD_TOP), None);
        assert_eq!(hit_test(&board, LEFT_X, BOARD_TOP + ROW_HEIGHT * 3), None);
        assert_eq!(hit_test(&board, LEFT_X, 0), None);
    }

    #[test]
    fn test_card_text_shows_shortcut_and_fits_width() {
        let short = card_text(&view("Hallo", CardTarget::left(0), Some('q')));
        assert!(short.starts_with("[q] Hallo"));
        assert_eq!(short.chars().count(), usize::from(CARD_WIDTH));

        let long = card_text(&view(&"x".repeat(80), CardTarget::left(0), None));
        assert_eq!(long.chars().count(), usize::from(CARD_WIDTH));
        assert!(long.ends_with('…'));
    }
}
