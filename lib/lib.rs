/// Backgammon domain types.
pub mod backgammon;
/// Move tree expansion.
pub mod search;
