mod attacks;
mod board;
mod castles;
mod color;
mod file;
mod loyalty;
mod morale;
mod r#move;
mod movegen;
mod outcome;
mod piece;
mod position;
mod rank;
mod resurrection;
mod role;
mod snapshot;
mod square;

pub use attacks::*;
pub use board::*;
pub use castles::*;
pub use color::*;
pub use file::*;
pub use loyalty::*;
pub use morale::*;
pub use r#move::*;
pub use movegen::*;
pub use outcome::*;
pub use piece::*;
pub use position::*;
pub use rank::*;
pub use resurrection::*;
pub use role::*;
pub use snapshot::*;
pub use square::*;
