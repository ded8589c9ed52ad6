//! grid.rs：
//! - 棋盤格（Square）與棋盤（Grid）的資料結構與查詢。
//! - 以 row-major 的一維陣列儲存，用 (y, x) 取索引。
//! - 所有變更都回傳新的 Grid，不修改原本的值。
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Square {
    pub pos: Pos,
    pub creature_id: Option<CreatureID>,
    // 預約出現、尚未實體化的生物
    pub reserved_creature_id: Option<CreatureID>,
}

impl Square {
    pub fn is_empty(&self) -> bool {
        self.creature_id.is_none() && self.reserved_creature_id.is_none()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    squares: Vec<Square>,
}

/// 曼哈頓距離
pub fn measure_distance(from: Pos, to: Pos) -> usize {
    from.y.abs_diff(to.y) + from.x.abs_diff(to.x)
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        let squares = (0..rows)
            .flat_map(|y| (0..columns).map(move |x| Pos { y, x }))
            .map(|pos| Square {
                pos,
                creature_id: None,
                reserved_creature_id: None,
            })
            .collect();
        Grid {
            rows,
            columns,
            squares,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.y < self.rows && pos.x < self.columns {
            Some(pos.y * self.columns + pos.x)
        } else {
            None
        }
    }

    pub fn get_square(&self, pos: Pos) -> Option<&Square> {
        self.index(pos).map(|i| &self.squares[i])
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    pub fn find_square_by_creature_id(&self, creature_id: &str) -> Result<&Square, Error> {
        let func = "Grid::find_square_by_creature_id";

        self.squares
            .iter()
            .find(|s| s.creature_id.as_deref() == Some(creature_id))
            .ok_or_else(|| Error::CreatureNotOnGrid {
                func,
                creature_id: creature_id.to_string(),
            })
    }

    pub fn is_on_grid(&self, creature_id: &str) -> bool {
        self.find_square_by_creature_id(creature_id).is_ok()
    }

    /// 與 origin 曼哈頓距離在 distance 以內的所有格子（含 origin）
    pub fn squares_within_distance(&self, origin: Pos, distance: usize) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|s| measure_distance(origin, s.pos) <= distance)
            .collect()
    }

    /// 距離落在射程 [min_reach, max_reach] 內的格子
    pub fn squares_within_reach(&self, origin: Pos, reach: Reach) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|s| reach.contains(measure_distance(origin, s.pos)))
            .collect()
    }

    /// 有生物佔據的格子，row-major 順序
    pub fn squares_with_occupant(&self) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|s| s.creature_id.is_some())
            .collect()
    }

    /// 既無佔據者也無預約的格子
    pub fn empty_squares(&self) -> Vec<&Square> {
        self.squares.iter().filter(|s| s.is_empty()).collect()
    }

    pub fn reserved_squares(&self) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|s| s.reserved_creature_id.is_some())
            .collect()
    }

    fn updated(
        &self,
        func: &'static str,
        pos: Pos,
        update: impl FnOnce(&mut Square) -> Result<(), Error>,
    ) -> Result<Grid, Error> {
        let i = self.index(pos).ok_or(Error::NoSquareAtPos { func, pos })?;
        let mut grid = self.clone();
        update(&mut grid.squares[i])?;
        Ok(grid)
    }

    /// 放置生物，格子已有佔據者時失敗
    pub fn with_occupant(&self, pos: Pos, creature_id: &str) -> Result<Grid, Error> {
        let func = "Grid::with_occupant";

        if self.is_on_grid(creature_id) {
            return Err(Error::InvalidState {
                func,
                detail: format!("creature {creature_id} is already on the grid"),
            });
        }
        self.updated(func, pos, |square| {
            if square.creature_id.is_some() {
                return Err(Error::SquareOccupied { func, pos });
            }
            square.creature_id = Some(creature_id.to_string());
            Ok(())
        })
    }

    pub fn without_occupant(&self, pos: Pos) -> Result<Grid, Error> {
        self.updated("Grid::without_occupant", pos, |square| {
            square.creature_id = None;
            Ok(())
        })
    }

    /// 預約出現位置，格子必須是空的
    pub fn with_reservation(&self, pos: Pos, creature_id: &str) -> Result<Grid, Error> {
        let func = "Grid::with_reservation";

        self.updated(func, pos, |square| {
            if !square.is_empty() {
                return Err(Error::SquareOccupied { func, pos });
            }
            square.reserved_creature_id = Some(creature_id.to_string());
            Ok(())
        })
    }

    /// 將預約轉為佔據
    pub fn resolve_reservation(&self, pos: Pos) -> Result<Grid, Error> {
        let func = "Grid::resolve_reservation";

        self.updated(func, pos, |square| {
            let creature_id = square
                .reserved_creature_id
                .take()
                .ok_or_else(|| Error::InvalidState {
                    func,
                    detail: format!("no reservation at {pos:?}"),
                })?;
            if square.creature_id.is_some() {
                return Err(Error::SquareOccupied { func, pos });
            }
            square.creature_id = Some(creature_id);
            Ok(())
        })
    }
}
