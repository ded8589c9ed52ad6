// 戰鬥引擎錯誤型別，攜帶 function name 與 context，支援來源錯誤巢狀
use crate::*;
use thiserror::Error;

/// 戰鬥核心錯誤型別
///
/// 全部都是呼叫端違反約定的錯誤，引擎不重試也不部分套用。
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: 生物 {creature_id} 不存在")]
    CreatureNotFound {
        func: &'static str,
        creature_id: CreatureID,
    },

    #[error("`{func}`: 生物 {creature_id} 不屬於任何陣營")]
    PartyNotFound {
        func: &'static str,
        creature_id: CreatureID,
    },

    #[error("`{func}`: 職業 {job_id} 不存在")]
    JobNotFound { func: &'static str, job_id: JobID },

    #[error("`{func}`: 生物 {creature_id} 不在棋盤上")]
    CreatureNotOnGrid {
        func: &'static str,
        creature_id: CreatureID,
    },

    #[error("`{func}`: 位置 {pos:?} 不存在")]
    NoSquareAtPos { func: &'static str, pos: Pos },

    #[error("`{func}`: 位置 {pos:?} 已被佔用")]
    SquareOccupied { func: &'static str, pos: Pos },

    #[error("`{func}`: 生物 {creature_id} 的卡片不在手牌中")]
    CardNotInHand {
        func: &'static str,
        creature_id: CreatureID,
    },

    #[error("`{func}`: 空格不足，需要 {required} 格，只有 {available} 格")]
    InsufficientSpace {
        func: &'static str,
        required: usize,
        available: usize,
    },

    #[error("`{func}`: 手牌 {hand_size} 張超過上限 {max}")]
    HandOverflow {
        func: &'static str,
        hand_size: usize,
        max: usize,
    },

    #[error("`{func}`: 技能分類 {category} 尚未支援")]
    UnsupportedSkillCategory {
        func: &'static str,
        category: SkillCategory,
    },

    #[error("`{func}`: 狀態錯誤: {detail}")]
    InvalidState { func: &'static str, detail: String },

    #[error("`{func}`: 設定錯誤: {reason}")]
    InvalidConfig { func: &'static str, reason: String },

    #[error("`{func}`: 包裝: {source}")]
    Wrap {
        func: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// 查詢失敗類的錯誤（呼叫端傳入過期的 id 或座標）
    pub fn is_not_found(&self) -> bool {
        matches!(
            root_error(self),
            Error::CreatureNotFound { .. }
                | Error::PartyNotFound { .. }
                | Error::JobNotFound { .. }
                | Error::CreatureNotOnGrid { .. }
                | Error::NoSquareAtPos { .. }
        )
    }

    pub fn wrap(self, func: &'static str) -> Error {
        Error::Wrap {
            func,
            source: Box::new(self),
        }
    }
}

pub fn root_error(err: &Error) -> &Error {
    let mut err = err;
    while let Error::Wrap { source, .. } = err {
        err = source.as_ref();
    }
    err
}
