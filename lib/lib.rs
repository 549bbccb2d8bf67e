/// Chess domain types and the rules of the game.
pub mod chess;
/// A game session on top of the rules.
pub mod game;
