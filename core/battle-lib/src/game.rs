//! game.rs：
//! - 定義戰鬥快照 Game，集中保存名冊、棋盤、牌庫／手牌與回合資訊。
//! - 玩家指令（選取格子、選取手牌、配置生物）都是 &Game -> Result<Game>。
//! - 回合流程（自動攻擊、突襲、出現）放在 turn.rs。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

pub const DEFAULT_GRID_SIZE: usize = 7;
pub const DEFAULT_ACTION_POINTS: ActionPoints = 2;
pub const DEFAULT_ACTION_POINTS_RECOVERY: ActionPoints = 3;
pub const DEFAULT_MAX_ACTION_POINTS: ActionPoints = 10;
pub const DEFAULT_HEADQUARTERS_LIFE_POINTS: LifePoints = 10;

/// 指定回合出現的電腦方生物
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatureAppearance {
    pub turn_number: TurnNumber,
    pub creature_ids: Vec<CreatureID>,
}

/// 游標，指向棋盤格子或手牌
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Square(Pos),
    Card(CreatureID),
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
pub enum BattleResult {
    #[default]
    Pending,
    Victory,
    Defeat,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Game {
    pub jobs: BTreeMap<JobID, Job>,
    pub roster: Roster,
    pub grid: Grid,
    pub cards: Vec<Card>,
    pub cards_in_deck: Vec<CreatureID>,
    pub cards_on_players_hand: Vec<CreatureID>,
    pub max_number_of_players_hand: usize,
    pub creature_appearances: Vec<CreatureAppearance>,
    pub turn_number: TurnNumber,
    pub action_points: ActionPoints,
    pub action_points_recovery: ActionPoints,
    pub max_action_points: ActionPoints,
    pub headquarters_life_points: LifePoints,
    pub cursor: Option<Cursor>,
    pub battle_result: BattleResult,
    pub completed_auto_attack_phase: bool,
}

impl Game {
    /// 空手牌、無出現排程的戰鬥，其餘欄位取預設值
    pub fn new(jobs: BTreeMap<JobID, Job>, roster: Roster, grid: Grid) -> Self {
        Game {
            jobs,
            roster,
            grid,
            cards: Vec::new(),
            cards_in_deck: Vec::new(),
            cards_on_players_hand: Vec::new(),
            max_number_of_players_hand: MAX_NUMBER_OF_PLAYERS_HAND,
            creature_appearances: Vec::new(),
            turn_number: 1,
            action_points: DEFAULT_ACTION_POINTS,
            action_points_recovery: DEFAULT_ACTION_POINTS_RECOVERY,
            max_action_points: DEFAULT_MAX_ACTION_POINTS,
            headquarters_life_points: DEFAULT_HEADQUARTERS_LIFE_POINTS,
            cursor: None,
            battle_result: BattleResult::Pending,
            completed_auto_attack_phase: false,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        match self.battle_result {
            BattleResult::Victory => TurnPhase::Victory,
            BattleResult::Defeat => TurnPhase::Defeat,
            BattleResult::Pending if self.completed_auto_attack_phase => {
                TurnPhase::AutoAttackResolved
            }
            BattleResult::Pending => TurnPhase::AwaitingAutoAttack,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.battle_result != BattleResult::Pending
    }

    /// 本回合預定出現的生物
    pub fn appearance_of(&self, turn_number: TurnNumber) -> Vec<CreatureID> {
        self.creature_appearances
            .iter()
            .filter(|a| a.turn_number == turn_number)
            .flat_map(|a| a.creature_ids.iter().cloned())
            .collect()
    }

    /// 勝負已分時拒絕指令
    pub(crate) fn ensure_pending(&self, func: &'static str) -> Result<(), Error> {
        if self.is_decided() {
            return Err(Error::InvalidState {
                func,
                detail: format!("battle is already decided: {}", self.battle_result),
            });
        }
        Ok(())
    }
}

/// 選取格子，再次選取同一格則取消
pub fn select_square(game: &Game, y: usize, x: usize) -> Result<Game, Error> {
    let func = "select_square";

    let pos = Pos::new(y, x);
    if game.grid.get_square(pos).is_none() {
        return Err(Error::NoSquareAtPos { func, pos });
    }
    let cursor = match &game.cursor {
        Some(Cursor::Square(selected)) if *selected == pos => None,
        _ => Some(Cursor::Square(pos)),
    };
    Ok(Game {
        cursor,
        ..game.clone()
    })
}

/// 選取手牌，再次選取同一張則取消
pub fn select_card_on_players_hand(game: &Game, creature_id: &str) -> Result<Game, Error> {
    let func = "select_card_on_players_hand";

    if !game.cards_on_players_hand.iter().any(|id| id == creature_id) {
        return Err(Error::CardNotInHand {
            func,
            creature_id: creature_id.to_string(),
        });
    }
    let cursor = match &game.cursor {
        Some(Cursor::Card(selected)) if selected == creature_id => None,
        _ => Some(Cursor::Card(creature_id.to_string())),
    };
    Ok(Game {
        cursor,
        ..game.clone()
    })
}

/// 從手牌配置玩家方生物
/// - 卡片離開手牌
/// - 生物取得比現有所有生物都大的配置順序
/// - 游標清除
pub fn place_creature(game: &Game, creature_id: &str, pos: Pos) -> Result<Game, Error> {
    let func = "place_creature";

    game.ensure_pending(func)?;
    let hand = remove_card_from_hand(&game.cards_on_players_hand, creature_id)
        .map_err(|e| e.wrap(func))?;

    let square = game
        .grid
        .get_square(pos)
        .ok_or(Error::NoSquareAtPos { func, pos })?;
    // 預約中的格子也不可配置
    if !square.is_empty() {
        return Err(Error::SquareOccupied { func, pos });
    }
    let grid = game
        .grid
        .with_occupant(pos, creature_id)
        .map_err(|e| e.wrap(func))?;

    let mut creature = game.roster.find_creature(creature_id)?.clone();
    creature.placement_order = game.roster.next_placement_order();
    debug!(
        creature = %creature_id,
        ?pos,
        placement_order = creature.placement_order,
        "place creature"
    );
    let roster = game.roster.with_creature(creature)?;

    Ok(Game {
        roster,
        grid,
        cards_on_players_hand: hand,
        cursor: None,
        ..game.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 玩家方 a, b 在手牌，電腦方 e 在 (0,0)
    fn game() -> Game {
        let job = Job::new("dummy");
        let jobs = BTreeMap::from([(job.id.clone(), job.clone())]);
        let creatures = ["a", "b", "e"]
            .iter()
            .map(|id| Creature::from_job(id, &job))
            .collect();
        let roster = Roster::new(
            creatures,
            vec![
                Party {
                    faction: Faction::Player,
                    creature_ids: vec!["a".to_string(), "b".to_string()],
                },
                Party {
                    faction: Faction::Computer,
                    creature_ids: vec!["e".to_string()],
                },
            ],
        );
        let grid = Grid::new(2, 3).with_occupant(Pos::new(0, 0), "e").unwrap();
        let mut game = Game::new(jobs, roster, grid);
        game.cards_on_players_hand = vec!["a".to_string(), "b".to_string()];
        game
    }

    #[test]
    fn test_select_square_toggle() {
        let game = game();
        let selected = select_square(&game, 1, 2).unwrap();
        assert_eq!(selected.cursor, Some(Cursor::Square(Pos::new(1, 2))));
        let unselected = select_square(&selected, 1, 2).unwrap();
        assert_eq!(unselected.cursor, None);
        assert_eq!(unselected, game);

        let moved = select_square(&selected, 0, 1).unwrap();
        assert_eq!(moved.cursor, Some(Cursor::Square(Pos::new(0, 1))));

        match select_square(&game, 2, 0) {
            Err(Error::NoSquareAtPos { pos, .. }) => assert_eq!(pos, Pos::new(2, 0)),
            _ => panic!("Should return Error::NoSquareAtPos"),
        }
    }

    #[test]
    fn test_select_card_toggle() {
        let game = game();
        let selected = select_card_on_players_hand(&game, "a").unwrap();
        assert_eq!(selected.cursor, Some(Cursor::Card("a".to_string())));
        assert_eq!(select_card_on_players_hand(&selected, "a").unwrap(), game);

        // 格子游標與手牌游標互相取代
        let square = select_square(&selected, 0, 0).unwrap();
        assert_eq!(square.cursor, Some(Cursor::Square(Pos::new(0, 0))));

        assert!(matches!(
            select_card_on_players_hand(&game, "e"),
            Err(Error::CardNotInHand { .. })
        ));
    }

    #[test]
    fn test_place_creature() {
        let game = select_card_on_players_hand(&game(), "a").unwrap();
        let placed = place_creature(&game, "a", Pos::new(1, 1)).unwrap();

        assert_eq!(placed.cards_on_players_hand, vec!["b".to_string()]);
        assert_eq!(
            placed.grid.find_square_by_creature_id("a").unwrap().pos,
            Pos::new(1, 1)
        );
        assert_eq!(placed.roster.find_creature("a").unwrap().placement_order, 1);
        assert_eq!(placed.cursor, None);
        // 輸入不變
        assert!(!game.grid.is_on_grid("a"));

        let placed = place_creature(&placed, "b", Pos::new(1, 2)).unwrap();
        assert_eq!(placed.roster.find_creature("b").unwrap().placement_order, 2);
        assert!(placed.cards_on_players_hand.is_empty());
    }

    #[test]
    fn test_place_creature_errors() {
        let game = game();
        assert!(matches!(
            place_creature(&game, "a", Pos::new(0, 0)),
            Err(Error::SquareOccupied { .. })
        ));
        assert!(matches!(
            place_creature(&game, "e", Pos::new(1, 1)),
            Err(Error::Wrap { .. })
        ));
        let err = place_creature(&game, "e", Pos::new(1, 1)).unwrap_err();
        assert!(matches!(root_error(&err), Error::CardNotInHand { .. }));

        let reserved = Game {
            grid: game.grid.with_reservation(Pos::new(1, 0), "e").unwrap(),
            ..game.clone()
        };
        assert!(matches!(
            place_creature(&reserved, "a", Pos::new(1, 0)),
            Err(Error::SquareOccupied { .. })
        ));

        let decided = Game {
            battle_result: BattleResult::Defeat,
            ..game.clone()
        };
        assert!(matches!(
            place_creature(&decided, "a", Pos::new(1, 1)),
            Err(Error::InvalidState { .. })
        ));
    }

    #[test]
    fn test_phase() {
        let mut game = game();
        assert_eq!(game.phase(), TurnPhase::AwaitingAutoAttack);
        game.completed_auto_attack_phase = true;
        assert_eq!(game.phase(), TurnPhase::AutoAttackResolved);
        game.battle_result = BattleResult::Victory;
        assert_eq!(game.phase(), TurnPhase::Victory);
        assert!(game.is_decided());
    }

    #[test]
    fn test_appearance_of() {
        let mut game = game();
        game.creature_appearances = vec![
            CreatureAppearance {
                turn_number: 1,
                creature_ids: vec!["e".to_string()],
            },
            CreatureAppearance {
                turn_number: 3,
                creature_ids: vec!["x".to_string(), "y".to_string()],
            },
        ];
        assert_eq!(game.appearance_of(1), vec!["e".to_string()]);
        assert!(game.appearance_of(2).is_empty());
        assert_eq!(game.appearance_of(3).len(), 2);
    }
}
