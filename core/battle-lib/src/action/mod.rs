//! action/mod.rs：
//! - 作為 action 子模組的入口，統一 re-export targeting、combat。
//! - 不放具體邏輯或資料結構實作。
mod combat;
mod targeting;

pub use combat::*;
pub use targeting::*;
