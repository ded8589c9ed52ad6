//! targeting.rs：
//! - 從行動者位置與射程找出可及格子，篩出敵對生物，依優先順序排序後截斷。
//! - 純查詢，不修改任何狀態。
use crate::*;

/// 目標解析結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    /// 射程內所有格子，row-major，供呈現層顯示範圍
    pub reachable: Vec<Pos>,
    /// 依優先順序排列的目標
    pub targets: Vec<CreatureID>,
}

/// 解析行動者的攻擊目標
/// - reach: 射程
/// - max_targets: 最多目標數
///
/// 優先順序為 placement_order 由小到大，相同時保留 row-major 順序
pub fn resolve_targets(
    roster: &Roster,
    grid: &Grid,
    actor_id: &str,
    reach: Reach,
    max_targets: usize,
) -> Result<Targeting, Error> {
    let func = "resolve_targets";

    let origin = grid
        .find_square_by_creature_id(actor_id)
        .map_err(|e| e.wrap(func))?
        .pos;
    let actor_faction = roster.faction_of(actor_id).map_err(|e| e.wrap(func))?;

    let reachable_squares = grid.squares_within_reach(origin, reach);

    let mut candidates = Vec::new();
    for square in &reachable_squares {
        let Some(occupant_id) = &square.creature_id else {
            continue;
        };
        let (occupant, party) = roster
            .find_creature_with_party(occupant_id)
            .map_err(|e| e.wrap(func))?;
        if determine_relationship(actor_faction, party.faction) == FactionRelationship::Enemy {
            candidates.push(occupant);
        }
    }

    // sort_by_key 為穩定排序
    candidates.sort_by_key(|c| c.placement_order);

    Ok(Targeting {
        reachable: reachable_squares.iter().map(|s| s.pos).collect(),
        targets: candidates
            .into_iter()
            .take(max_targets)
            .map(|c| c.id.clone())
            .collect(),
    })
}

/// 選取中生物的自動攻擊範圍與目標，供呈現層標示
pub fn calculate_range_and_targets_of_auto_attack(
    game: &Game,
    creature_id: &str,
) -> Result<Targeting, Error> {
    let creature = game.roster.find_creature(creature_id)?;
    let job = creature.job(&game.jobs)?;
    resolve_targets(
        &game.roster,
        &game.grid,
        creature_id,
        job.auto_attack_range,
        job.auto_attack_targets,
    )
}
