//! Player implementations.

mod human;
mod random;

pub use human::HumanPlayer;
pub use random::{RandomPlayer, ThinkTime};
