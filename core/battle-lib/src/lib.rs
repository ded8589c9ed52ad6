use serde::{Deserialize, Serialize};

mod action;
mod application;
mod config;
mod creature;
mod error;
mod game;
mod grid;
mod hand;
mod roster;
mod turn;

pub use action::*;
pub use application::*;
pub use config::*;
pub use creature::*;
pub use error::*;
pub use game::*;
pub use grid::*;
pub use hand::*;
pub use roster::*;
pub use turn::*;

pub use jobs_lib::{Job, JobGetter, JobID, RangeShape, Reach, SkillCategory};

pub type CreatureID = String;
pub type TurnNumber = u32;
pub type PlacementOrder = u32;
pub type LifePoints = i32;
pub type ActionPoints = u32;

pub const MAX_NUMBER_OF_PLAYERS_HAND: usize = 5;
pub const DEFAULT_PLACEMENT_ORDER: PlacementOrder = 0;

/// 棋盤座標，x 為行、y 為列；排序為 row-major（先比 y 再比 x）
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Pos {
    pub y: usize,
    pub x: usize,
}

impl Pos {
    pub fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }
}
