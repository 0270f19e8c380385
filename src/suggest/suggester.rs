use crate::game::{Board, Column, Player};

/// Something that proposes the next column to play.
///
/// Suggestions carry no authority: whatever comes back is submitted as an
/// ordinary move and rejected the same way a human's illegal move would be.
pub trait MoveSuggester {
    /// Pick a column for `player` on `board`, or `None` if no suggestion
    /// can be made (for example when the board is full).
    fn suggest(&mut self, board: &Board, player: Player) -> Option<Column>;

    /// Return the suggester's display name.
    fn name(&self) -> &str;
}
