//! combat.rs：
//! - 負責通常攻擊、自動攻擊、技能與突襲的效果套用。
//! - 目標選擇交給 targeting.rs，本檔案只處理「對目標造成什麼影響」。
//! - 所有函式回傳新的 Roster，不修改輸入。
use crate::*;
use tracing::debug;

pub const NORMAL_ATTACK_REACH: Reach = Reach::new(0, 1);
pub const NORMAL_ATTACK_MAX_TARGETS: usize = 1;

pub const ATTACK_SKILL_REACH: Reach = Reach::new(0, 2);
pub const ATTACK_SKILL_MAX_TARGETS: usize = 99;
pub const ATTACK_SKILL_DAMAGE: LifePoints = 3;

/// 依序對每個目標造成傷害
///
/// 同一批次中已經歸零的目標仍會承受後續傷害，不中途排除。
pub fn resolve_attack(
    roster: &Roster,
    targets: &[CreatureID],
    damage: LifePoints,
) -> Result<Roster, Error> {
    let func = "resolve_attack";

    let mut roster = roster.clone();
    for target_id in targets {
        let target = roster.find_creature(target_id).map_err(|e| e.wrap(func))?;
        let damaged = target.apply_damage(damage);
        debug!(
            creature = %target_id,
            damage,
            before = target.life_points,
            after = damaged.life_points,
            "damage applied"
        );
        roster = roster.with_creature(damaged)?;
    }
    Ok(roster)
}

/// 通常攻擊：射程 1、目標 1，傷害為職業攻擊力
pub fn invoke_normal_attack(
    jobs: &impl JobGetter,
    roster: &Roster,
    grid: &Grid,
    attacker_id: &str,
) -> Result<Roster, Error> {
    let func = "invoke_normal_attack";

    let attacker = roster.find_creature(attacker_id)?;
    let damage = attacker.attack_power(jobs)?;
    let targeting = resolve_targets(
        roster,
        grid,
        attacker_id,
        NORMAL_ATTACK_REACH,
        NORMAL_ATTACK_MAX_TARGETS,
    )
    .map_err(|e| e.wrap(func))?;
    resolve_attack(roster, &targeting.targets, damage)
}

/// 自動攻擊：射程與目標數由職業決定
///
/// 有攻擊到目標時才設定 auto_attack_invoked，沒打到的生物會在突襲階段累積充能。
pub fn invoke_auto_attack(
    jobs: &impl JobGetter,
    roster: &Roster,
    grid: &Grid,
    attacker_id: &str,
) -> Result<Roster, Error> {
    let func = "invoke_auto_attack";

    let attacker = roster.find_creature(attacker_id)?;
    let job = attacker.job(jobs)?;
    let targeting = resolve_targets(
        roster,
        grid,
        attacker_id,
        job.auto_attack_range,
        job.auto_attack_targets,
    )
    .map_err(|e| e.wrap(func))?;
    if targeting.targets.is_empty() {
        debug!(attacker = %attacker_id, "no target for auto attack");
        return Ok(roster.clone());
    }

    debug!(attacker = %attacker_id, targets = ?targeting.targets, "auto attack");
    let roster = resolve_attack(roster, &targeting.targets, job.attack_power)?;
    let mut attacker = roster.find_creature(attacker_id)?.clone();
    attacker.auto_attack_invoked = true;
    roster.with_creature(attacker)
}

/// 技能施放，依分類分派
pub fn invoke_skill(
    roster: &Roster,
    grid: &Grid,
    invoker_id: &str,
    category: SkillCategory,
) -> Result<Roster, Error> {
    let func = "invoke_skill";

    match category {
        SkillCategory::Attack => invoke_attack_skill(roster, grid, invoker_id),
        SkillCategory::Defense | SkillCategory::Support => {
            Err(Error::UnsupportedSkillCategory { func, category })
        }
    }
}

/// 突襲本部，本部生命值不會低於 0，並重置突襲充能
pub fn invoke_raid(
    jobs: &impl JobGetter,
    roster: &Roster,
    raider_id: &str,
    headquarters_life_points: LifePoints,
) -> Result<(Roster, LifePoints), Error> {
    let raider = roster.find_creature(raider_id)?;
    let raid_power = raider.job(jobs)?.raid_power;
    let remaining = headquarters_life_points.saturating_sub(raid_power.max(0)).max(0);

    let mut raider = raider.clone();
    raider.raid_charge = 0;
    debug!(
        raider = %raider_id,
        raid_power,
        before = headquarters_life_points,
        after = remaining,
        "raid"
    );
    Ok((roster.with_creature(raider)?, remaining))
}

use inner::*;
mod inner {
    use super::*;

    pub fn invoke_attack_skill(
        roster: &Roster,
        grid: &Grid,
        invoker_id: &str,
    ) -> Result<Roster, Error> {
        let func = "invoke_attack_skill";

        let targeting = resolve_targets(
            roster,
            grid,
            invoker_id,
            ATTACK_SKILL_REACH,
            ATTACK_SKILL_MAX_TARGETS,
        )
        .map_err(|e| e.wrap(func))?;
        resolve_attack(roster, &targeting.targets, ATTACK_SKILL_DAMAGE)
    }
}
