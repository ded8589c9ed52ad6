//! creature.rs：
//! - 定義生物（Creature）資料結構，以及由職業衍生的屬性（攻擊力、突襲等）。
//! - 生命值的增減一律經過 apply_damage / apply_healing，保證落在 [0, max]。
//! - 不負責戰鬥流程與目標選擇。
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Creature {
    pub id: CreatureID,
    pub job_id: JobID,
    pub life_points: LifePoints,
    pub max_life_points: LifePoints,
    #[serde(default)]
    pub raid_charge: u32,
    #[serde(default)]
    pub auto_attack_invoked: bool,
    #[serde(default)]
    pub placement_order: PlacementOrder,
}

impl Creature {
    /// 依職業建立生物，生命值為職業上限
    pub fn from_job(id: &str, job: &Job) -> Self {
        Creature {
            id: id.to_string(),
            job_id: job.id.clone(),
            life_points: job.max_life_points,
            max_life_points: job.max_life_points,
            raid_charge: 0,
            auto_attack_invoked: false,
            placement_order: DEFAULT_PLACEMENT_ORDER,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life_points == 0
    }

    pub fn can_act(&self) -> bool {
        !self.is_dead()
    }

    /// 生命值增減，結果限制在 [0, max_life_points]
    pub fn update_life_points(&self, points: LifePoints) -> Creature {
        let life_points = self
            .life_points
            .saturating_add(points)
            .clamp(0, self.max_life_points.max(0));
        Creature {
            life_points,
            ..self.clone()
        }
    }

    /// 卡片回到牌庫時使用：生命值回滿，回合狀態與配置順序歸零
    pub fn restored(&self) -> Creature {
        Creature {
            life_points: self.max_life_points.max(0),
            raid_charge: 0,
            auto_attack_invoked: false,
            placement_order: DEFAULT_PLACEMENT_ORDER,
            ..self.clone()
        }
    }

    pub fn apply_damage(&self, amount: LifePoints) -> Creature {
        self.update_life_points(amount.saturating_neg())
    }

    pub fn apply_healing(&self, amount: LifePoints) -> Creature {
        self.update_life_points(amount)
    }

    pub fn job<'a>(&self, jobs: &'a impl JobGetter) -> Result<&'a Job, Error> {
        let func = "Creature::job";

        jobs.get_job(&self.job_id).ok_or_else(|| Error::JobNotFound {
            func,
            job_id: self.job_id.clone(),
        })
    }

    pub fn attack_power(&self, jobs: &impl JobGetter) -> Result<LifePoints, Error> {
        Ok(self.job(jobs)?.attack_power)
    }

    /// 距離下次突襲還剩幾回合
    pub fn turns_until_raid(&self, jobs: &impl JobGetter) -> Result<u32, Error> {
        let job = self.job(jobs)?;
        Ok(job.raid_interval.saturating_sub(self.raid_charge))
    }
}
