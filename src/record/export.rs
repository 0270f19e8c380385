//! Archival JSON and human-readable transcripts of recorded games.

use serde::Serialize;

use crate::error::ReplayError;
use crate::game::Outcome;
use crate::record::GameRecord;
use crate::replay::state_at_move;

#[derive(Serialize)]
struct ExportedRecord<'a> {
    #[serde(flatten)]
    record: &'a GameRecord,
    total_moves: usize,
}

impl<'a> From<&'a GameRecord> for ExportedRecord<'a> {
    fn from(record: &'a GameRecord) -> Self {
        ExportedRecord {
            record,
            total_moves: record.total_moves(),
        }
    }
}

/// Pretty JSON for one record, with a `total_moves` convenience field.
pub fn export_json(record: &GameRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExportedRecord::from(record))
}

/// Pretty JSON array of records, in the order given.
pub fn export_all_json(records: &[GameRecord]) -> serde_json::Result<String> {
    let exported: Vec<ExportedRecord<'_>> = records.iter().map(ExportedRecord::from).collect();
    serde_json::to_string_pretty(&exported)
}

/// Plain-text account of a game: a header, one line per move, and the final
/// board rebuilt from the move log.
pub fn transcript(record: &GameRecord) -> Result<String, ReplayError> {
    let size = record.board_size();
    let result = match record.outcome() {
        Some(Outcome::Won(player)) => player.name(),
        Some(Outcome::Draw) => "Draw",
        Some(Outcome::InProgress) | None => "In progress",
    };

    let mut lines = vec![
        format!("Game {}", record.id()),
        format!("Date: {}", record.started_at().to_rfc3339()),
        format!("Board: {}", size),
        format!("Winner: {}", result),
        format!("Total moves: {}", record.total_moves()),
        String::new(),
    ];

    for mv in record.moves() {
        let target = if size.is_planar() {
            format!("column {}", mv.position.x)
        } else {
            mv.position.column().to_string()
        };
        lines.push(format!(
            "Move {}: {} plays {} -> level {}",
            mv.move_number, mv.player, target, mv.position.y
        ));
    }

    let final_state = state_at_move(record, record.total_moves() as isize - 1)?;
    lines.push(String::new());
    lines.push("Final board:".to_string());
    lines.push(final_state.board().to_string().trim_end().to_string());

    if !final_state.winning_line().is_empty() {
        let cells: Vec<String> = final_state
            .winning_line()
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(format!("Winning line: {}", cells.join(" ")));
    }

    Ok(lines.join("\n"))
}
