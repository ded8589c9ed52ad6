//! turn.rs：
//! - 負責回合流程：出現 → 自動攻擊 → 清除陣亡 → 突襲 → 勝負判定 → 補牌 → 下一回合。
//! - 每個階段都是 &Game -> Result<Game>，失敗時輸入不變。
//! - 出現位置的選擇交給 SpawnSquareChooser，方便測試時固定結果。
use crate::*;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeSet;
use strum_macros::{Display, EnumIter};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Display, EnumIter, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    AwaitingAutoAttack,
    AutoAttackResolved,
    /// 只存在於 proceed_turn 執行中
    TurnAdvancing,
    Victory,
    Defeat,
}

/// 出現位置的選擇策略
pub trait SpawnSquareChooser {
    /// 從 row-major 的空格中選出 count 個位置
    fn choose(&mut self, empty: &[Pos], count: usize) -> Vec<Pos>;
}

/// 依 row-major 取前 N 個空格
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEmptySquares;

impl SpawnSquareChooser for FirstEmptySquares {
    fn choose(&mut self, empty: &[Pos], count: usize) -> Vec<Pos> {
        empty.iter().take(count).copied().collect()
    }
}

/// 隨機選取空格
#[derive(Debug, Clone)]
pub struct RandomSquares<R: Rng> {
    pub rng: R,
}

impl<R: Rng> RandomSquares<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SpawnSquareChooser for RandomSquares<R> {
    fn choose(&mut self, empty: &[Pos], count: usize) -> Vec<Pos> {
        empty.choose_multiple(&mut self.rng, count).copied().collect()
    }
}

/// 為本回合預定出現的生物預約格子
pub fn reserve_creatures(
    game: &Game,
    chooser: &mut impl SpawnSquareChooser,
) -> Result<Game, Error> {
    let func = "reserve_creatures";

    let creature_ids = game.appearance_of(game.turn_number);
    if creature_ids.is_empty() {
        return Ok(game.clone());
    }
    for creature_id in &creature_ids {
        game.roster.find_creature(creature_id)?;
        let reserved = game
            .grid
            .reserved_squares()
            .iter()
            .any(|s| s.reserved_creature_id.as_deref() == Some(creature_id.as_str()));
        if reserved || game.grid.is_on_grid(creature_id) {
            return Err(Error::InvalidState {
                func,
                detail: format!("creature {creature_id} has already appeared"),
            });
        }
    }

    let empty: Vec<Pos> = game.grid.empty_squares().iter().map(|s| s.pos).collect();
    if empty.len() < creature_ids.len() {
        return Err(Error::InsufficientSpace {
            func,
            required: creature_ids.len(),
            available: empty.len(),
        });
    }

    let chosen = chooser.choose(&empty, creature_ids.len());
    let distinct: BTreeSet<&Pos> = chosen.iter().collect();
    if chosen.len() != creature_ids.len() || distinct.len() != chosen.len() {
        return Err(Error::InvalidState {
            func,
            detail: format!(
                "chooser returned {} distinct squares of {} for {} creatures",
                distinct.len(),
                chosen.len(),
                creature_ids.len()
            ),
        });
    }

    let mut grid = game.grid.clone();
    for (creature_id, pos) in creature_ids.iter().zip(chosen) {
        // 選出的格子若不是空格，with_reservation 會回報錯誤
        grid = grid
            .with_reservation(pos, creature_id)
            .map_err(|e| e.wrap(func))?;
        debug!(creature = %creature_id, ?pos, "reserve square");
    }
    Ok(Game {
        grid,
        ..game.clone()
    })
}

/// 預約轉為佔據，依 row-major 順序取得新的配置順序
pub fn spawn_reserved_creatures(game: &Game) -> Result<Game, Error> {
    let func = "spawn_reserved_creatures";

    let reservations: Vec<(Pos, CreatureID)> = game
        .grid
        .reserved_squares()
        .iter()
        .filter_map(|s| Some((s.pos, s.reserved_creature_id.clone()?)))
        .collect();

    let mut grid = game.grid.clone();
    let mut roster = game.roster.clone();
    for (pos, creature_id) in reservations {
        grid = grid.resolve_reservation(pos).map_err(|e| e.wrap(func))?;
        let mut creature = roster.find_creature(&creature_id)?.clone();
        creature.placement_order = roster.next_placement_order();
        debug!(
            creature = %creature_id,
            ?pos,
            placement_order = creature.placement_order,
            "spawn creature"
        );
        roster = roster.with_creature(creature)?;
    }
    Ok(Game {
        grid,
        roster,
        ..game.clone()
    })
}

pub fn spawn_phase(game: &Game, chooser: &mut impl SpawnSquareChooser) -> Result<Game, Error> {
    let func = "spawn_phase";

    let game = reserve_creatures(game, chooser).map_err(|e| e.wrap(func))?;
    spawn_reserved_creatures(&game).map_err(|e| e.wrap(func))
}

/// 第一回合開始，執行出現階段
pub fn start_battle(game: &Game, chooser: &mut impl SpawnSquareChooser) -> Result<Game, Error> {
    let func = "start_battle";

    game.ensure_pending(func)?;
    info!(turn = game.turn_number, "start battle");
    spawn_phase(game, chooser)
}

/// 自動攻擊順序：玩家方在前，電腦方在後，各自依配置順序由小到大
pub fn sort_auto_attackers_order(
    roster: &Roster,
    creature_ids: &[CreatureID],
) -> Result<Vec<CreatureID>, Error> {
    let mut keyed = Vec::with_capacity(creature_ids.len());
    for creature_id in creature_ids {
        let (creature, party) = roster.find_creature_with_party(creature_id)?;
        let faction_rank = match party.faction {
            Faction::Player => 0,
            Faction::Computer => 1,
        };
        keyed.push(((faction_rank, creature.placement_order), creature_id.clone()));
    }
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, id)| id).collect())
}

/// 棋盤上所有存活且本回合尚未自動攻擊的生物依序攻擊
pub fn run_auto_attack_phase(game: &Game) -> Result<Game, Error> {
    let func = "run_auto_attack_phase";

    game.ensure_pending(func)?;
    if game.completed_auto_attack_phase {
        return Err(Error::InvalidState {
            func,
            detail: "auto attack phase is already completed".to_string(),
        });
    }

    let mut candidates = Vec::new();
    for square in game.grid.squares_with_occupant() {
        let Some(creature_id) = &square.creature_id else {
            continue;
        };
        let creature = game.roster.find_creature(creature_id)?;
        if creature.can_act() && !creature.auto_attack_invoked {
            candidates.push(creature_id.clone());
        }
    }
    let attackers = sort_auto_attackers_order(&game.roster, &candidates)?;
    debug!(turn = game.turn_number, ?attackers, "auto attack phase");

    let mut roster = game.roster.clone();
    for attacker_id in &attackers {
        // 被先攻擊者打倒的生物不再行動
        if !roster.find_creature(attacker_id)?.can_act() {
            continue;
        }
        roster = invoke_auto_attack(&game.jobs, &roster, &game.grid, attacker_id)
            .map_err(|e| e.wrap(func))?;
    }
    Ok(Game {
        roster,
        completed_auto_attack_phase: true,
        ..game.clone()
    })
}

/// 陣亡生物離開棋盤，玩家方的卡片回到牌庫尾端，生物回滿生命值
pub fn remove_dead_creatures(game: &Game) -> Result<Game, Error> {
    let func = "remove_dead_creatures";

    let mut grid = game.grid.clone();
    let mut cards_in_deck = game.cards_in_deck.clone();
    let mut restored = Vec::new();
    for square in game.grid.squares_with_occupant() {
        let Some(creature_id) = &square.creature_id else {
            continue;
        };
        let (creature, party) = game.roster.find_creature_with_party(creature_id)?;
        if !creature.is_dead() {
            continue;
        }
        grid = grid.without_occupant(square.pos)?;
        if party.faction == Faction::Player {
            cards_in_deck =
                return_card_to_deck(&cards_in_deck, &game.cards_on_players_hand, creature_id)
                    .map_err(|e| e.wrap(func))?;
            // 回到牌庫的卡片可再次配置
            restored.push(creature.restored());
        }
        debug!(creature = %creature_id, faction = %party.faction, "remove dead creature");
    }
    Ok(Game {
        grid,
        cards_in_deck,
        roster: game.roster.with_creatures(restored)?,
        ..game.clone()
    })
}

/// 棋盤上本回合沒有自動攻擊的電腦方生物累積突襲充能
pub fn increase_raid_charge_for_each_computer_creatures(game: &Game) -> Result<Game, Error> {
    let mut updated = Vec::new();
    for creature_id in raid_candidates(game)? {
        let mut creature = game.roster.find_creature(&creature_id)?.clone();
        creature.raid_charge += 1;
        updated.push(creature);
    }
    Ok(Game {
        roster: game.roster.with_creatures(updated)?,
        ..game.clone()
    })
}

/// 充能達到職業的突襲間隔就突襲本部
pub fn invoke_raids(game: &Game) -> Result<Game, Error> {
    let func = "invoke_raids";

    let mut roster = game.roster.clone();
    let mut headquarters_life_points = game.headquarters_life_points;
    for creature_id in raid_candidates(game)? {
        let creature = roster.find_creature(&creature_id)?;
        if creature.turns_until_raid(&game.jobs)? > 0 {
            continue;
        }
        (roster, headquarters_life_points) =
            invoke_raid(&game.jobs, &roster, &creature_id, headquarters_life_points)
                .map_err(|e| e.wrap(func))?;
        info!(
            creature = %creature_id,
            headquarters_life_points,
            "raid on headquarters"
        );
    }
    Ok(Game {
        roster,
        headquarters_life_points,
        ..game.clone()
    })
}

pub fn raid_phase(game: &Game) -> Result<Game, Error> {
    let game = increase_raid_charge_for_each_computer_creatures(game)?;
    invoke_raids(&game)
}

/// 之後沒有出現排程，且棋盤上沒有電腦方生物（含預約）
pub fn does_player_have_victory(game: &Game) -> Result<bool, Error> {
    if game
        .creature_appearances
        .iter()
        .any(|a| a.turn_number > game.turn_number)
    {
        return Ok(false);
    }
    for square in game.grid.squares() {
        for creature_id in [&square.creature_id, &square.reserved_creature_id]
            .into_iter()
            .flatten()
        {
            if game.roster.faction_of(creature_id)? == Faction::Computer {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

pub fn does_player_have_defeat(game: &Game) -> bool {
    game.headquarters_life_points == 0
}

/// 勝利優先於敗北
pub fn determine_victory_or_defeat(game: &Game) -> Result<BattleResult, Error> {
    if does_player_have_victory(game)? {
        Ok(BattleResult::Victory)
    } else if does_player_have_defeat(game) {
        Ok(BattleResult::Defeat)
    } else {
        Ok(BattleResult::Pending)
    }
}

/// 回合數 +1，重置自動攻擊旗標並回復行動點
pub fn advance_turn(game: &Game) -> Result<Game, Error> {
    let updated: Vec<Creature> = game
        .roster
        .creatures
        .iter()
        .filter(|c| c.auto_attack_invoked)
        .map(|c| Creature {
            auto_attack_invoked: false,
            ..c.clone()
        })
        .collect();
    let action_points = game
        .action_points
        .saturating_add(game.action_points_recovery)
        .min(game.max_action_points);
    Ok(Game {
        roster: game.roster.with_creatures(updated)?,
        turn_number: game.turn_number + 1,
        action_points,
        completed_auto_attack_phase: false,
        ..game.clone()
    })
}

/// 自動攻擊之後推進到下一回合
///
/// 勝負在判定階段確定時，停在該狀態，不補牌也不進入下一回合
pub fn proceed_turn(game: &Game, chooser: &mut impl SpawnSquareChooser) -> Result<Game, Error> {
    let func = "proceed_turn";

    game.ensure_pending(func)?;
    if !game.completed_auto_attack_phase {
        return Err(Error::InvalidState {
            func,
            detail: "auto attack phase is not completed".to_string(),
        });
    }
    debug!(turn = game.turn_number, phase = %TurnPhase::TurnAdvancing, "proceed turn");

    let game = remove_dead_creatures(game).map_err(|e| e.wrap(func))?;
    let game = raid_phase(&game).map_err(|e| e.wrap(func))?;

    let battle_result = determine_victory_or_defeat(&game).map_err(|e| e.wrap(func))?;
    if battle_result != BattleResult::Pending {
        info!(turn = game.turn_number, %battle_result, "battle decided");
        return Ok(Game {
            battle_result,
            ..game
        });
    }

    let (cards_in_deck, cards_on_players_hand) = refill_cards_on_players_hand(
        &game.cards_in_deck,
        &game.cards_on_players_hand,
        game.max_number_of_players_hand,
    )
    .map_err(|e| e.wrap(func))?;
    let game = Game {
        cards_in_deck,
        cards_on_players_hand,
        ..game
    };

    let game = advance_turn(&game).map_err(|e| e.wrap(func))?;
    spawn_phase(&game, chooser).map_err(|e| e.wrap(func))
}

fn raid_candidates(game: &Game) -> Result<Vec<CreatureID>, Error> {
    let mut candidates = Vec::new();
    for square in game.grid.squares_with_occupant() {
        let Some(creature_id) = &square.creature_id else {
            continue;
        };
        let (creature, party) = game.roster.find_creature_with_party(creature_id)?;
        if party.faction == Faction::Computer && creature.can_act() && !creature.auto_attack_invoked
        {
            candidates.push(creature_id.clone());
        }
    }
    sort_auto_attackers_order(&game.roster, &candidates)
}
