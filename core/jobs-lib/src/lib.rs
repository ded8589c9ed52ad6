//! jobs-lib：
//! - 職業（Job）、射程（Reach）、技能分類（SkillCategory）等靜態資料定義。
//! - 只負責資料與載入，不含任何戰鬥邏輯。
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

pub type JobID = String;

/// 職業資料結構，生物的攻擊力、生命上限、突襲能力皆由職業衍生
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Job {
    pub id: JobID,
    #[serde(default = "default_attack_power")]
    pub attack_power: i32,
    #[serde(default = "default_max_life_points")]
    pub max_life_points: i32,
    // 0 代表每回合都會突襲
    #[serde(default)]
    pub raid_interval: u32,
    #[serde(default = "default_raid_power")]
    pub raid_power: i32,
    #[serde(default)]
    pub auto_attack_range: Reach,
    #[serde(default = "default_auto_attack_targets")]
    pub auto_attack_targets: usize,
}

#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Default,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RangeShape {
    /// 曼哈頓距離的菱形範圍
    #[default]
    Circle,
}

/// 射程設定，距離落在 [min_reach, max_reach] 之內才算可及
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Reach {
    #[serde(default)]
    pub shape: RangeShape,
    #[serde(default = "default_reach")]
    pub min_reach: usize,
    #[serde(default = "default_reach")]
    pub max_reach: usize,
}

#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillCategory {
    Attack,
    Defense,
    Support,
}

/// 職業查詢介面
pub trait JobGetter {
    fn get_job(&self, id: &str) -> Option<&Job>;
}

impl JobGetter for BTreeMap<JobID, Job> {
    fn get_job(&self, id: &str) -> Option<&Job> {
        self.get(id)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: TOML 解析失敗: {reason}")]
    Parse { func: &'static str, reason: String },

    #[error("`{func}`: 職業 {job_id} 重複定義")]
    DuplicateJob { func: &'static str, job_id: JobID },

    #[error("`{func}`: 職業 {job_id} 射程設定錯誤 ({min_reach} > {max_reach})")]
    InvalidReach {
        func: &'static str,
        job_id: JobID,
        min_reach: usize,
        max_reach: usize,
    },

    #[error("`{func}`: 職業 {job_id} 的 {field} 不可為負數 ({value})")]
    NegativeValue {
        func: &'static str,
        job_id: JobID,
        field: &'static str,
        value: i32,
    },
}

impl Reach {
    pub const fn new(min_reach: usize, max_reach: usize) -> Self {
        Self {
            shape: RangeShape::Circle,
            min_reach,
            max_reach,
        }
    }

    /// 判斷曼哈頓距離是否在射程內
    pub fn contains(&self, distance: usize) -> bool {
        match self.shape {
            RangeShape::Circle => self.min_reach <= distance && distance <= self.max_reach,
        }
    }
}

impl Default for Reach {
    fn default() -> Self {
        Reach::new(default_reach(), default_reach())
    }
}

impl Job {
    /// 最低限度的職業，方便測試與預設值使用
    pub fn new(id: &str) -> Self {
        Job {
            id: id.to_string(),
            attack_power: default_attack_power(),
            max_life_points: default_max_life_points(),
            raid_interval: 0,
            raid_power: default_raid_power(),
            auto_attack_range: Reach::default(),
            auto_attack_targets: default_auto_attack_targets(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JobsFile {
    #[serde(default)]
    jobs: Vec<Job>,
}

/// 從 TOML 載入職業表，`[[jobs]]` 陣列
pub fn parse_jobs_toml(data: &str) -> Result<BTreeMap<JobID, Job>, Error> {
    let func = "parse_jobs_toml";

    let file: JobsFile = toml::from_str(data).map_err(|e| Error::Parse {
        func,
        reason: e.to_string(),
    })?;
    jobs_to_map(file.jobs)
}

/// 檢查並轉成以 id 為 key 的職業表
pub fn jobs_to_map(jobs: Vec<Job>) -> Result<BTreeMap<JobID, Job>, Error> {
    let func = "jobs_to_map";

    let mut map = BTreeMap::new();
    for job in jobs {
        let range = job.auto_attack_range;
        if range.min_reach > range.max_reach {
            return Err(Error::InvalidReach {
                func,
                job_id: job.id,
                min_reach: range.min_reach,
                max_reach: range.max_reach,
            });
        }
        for (field, value) in [
            ("attack_power", job.attack_power),
            ("max_life_points", job.max_life_points),
        ] {
            if value < 0 {
                return Err(Error::NegativeValue {
                    func,
                    job_id: job.id,
                    field,
                    value,
                });
            }
        }
        if map.contains_key(&job.id) {
            return Err(Error::DuplicateJob {
                func,
                job_id: job.id,
            });
        }
        map.insert(job.id.clone(), job);
    }
    Ok(map)
}

fn default_attack_power() -> i32 {
    1
}

fn default_max_life_points() -> i32 {
    1
}

fn default_raid_power() -> i32 {
    1
}

fn default_reach() -> usize {
    1
}

fn default_auto_attack_targets() -> usize {
    1
}
