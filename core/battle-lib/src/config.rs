//! config.rs：
//! - 戰鬥場景設定（BattleConfig），從 TOML 載入後轉成初始 Game。
//! - 只做讀取與檢查，引擎不會寫出任何狀態。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 場景中的生物宣告
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatureConfig {
    pub id: CreatureID,
    pub job_id: JobID,
    pub faction: Faction,
    /// 玩家方卡片的技能分類
    #[serde(default = "default_skill_category")]
    pub skill_category: SkillCategory,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BattleConfig {
    #[serde(default = "default_grid_size")]
    pub rows: usize,
    #[serde(default = "default_grid_size")]
    pub columns: usize,
    #[serde(default = "default_max_number_of_players_hand")]
    pub max_number_of_players_hand: usize,
    #[serde(default = "default_headquarters_life_points")]
    pub headquarters_life_points: LifePoints,
    #[serde(default = "default_action_points")]
    pub action_points: ActionPoints,
    #[serde(default = "default_action_points_recovery")]
    pub action_points_recovery: ActionPoints,
    #[serde(default = "default_max_action_points")]
    pub max_action_points: ActionPoints,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub creatures: Vec<CreatureConfig>,
    #[serde(default)]
    pub creature_appearances: Vec<CreatureAppearance>,
}

impl BattleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let func = "BattleConfig::from_file";

        let content = fs::read_to_string(path.as_ref()).map_err(|err| Error::InvalidConfig {
            func,
            reason: format!("讀取 {} 失敗: {}", path.as_ref().display(), err),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let func = "BattleConfig::from_toml_str";

        toml::from_str(content).map_err(|err| Error::InvalidConfig {
            func,
            reason: format!("解析 TOML 失敗: {}", err),
        })
    }
}

impl Game {
    /// 由場景設定建立第一回合開始前的 Game
    /// - 玩家方生物依宣告順序成為卡片，前 N 張在手牌，其餘在牌庫
    /// - 出現排程只能指定電腦方生物
    pub fn from_config(config: &BattleConfig) -> Result<Game, Error> {
        let func = "Game::from_config";
        let invalid = |reason: String| Error::InvalidConfig { func, reason };

        if config.rows == 0 || config.columns == 0 {
            return Err(invalid(format!(
                "棋盤大小 {}x{} 不可為 0",
                config.rows, config.columns
            )));
        }
        if config.headquarters_life_points < 0 {
            return Err(invalid(format!(
                "本部生命值 {} 不可為負數",
                config.headquarters_life_points
            )));
        }
        let jobs = jobs_lib::jobs_to_map(config.jobs.clone()).map_err(|e| invalid(e.to_string()))?;

        let mut seen = BTreeSet::new();
        let mut creatures = Vec::new();
        let mut parties = vec![
            Party {
                faction: Faction::Player,
                creature_ids: vec![],
            },
            Party {
                faction: Faction::Computer,
                creature_ids: vec![],
            },
        ];
        let mut cards = Vec::new();
        for entry in &config.creatures {
            if !seen.insert(entry.id.as_str()) {
                return Err(invalid(format!("生物 {} 重複定義", entry.id)));
            }
            let job = jobs
                .get_job(&entry.job_id)
                .ok_or_else(|| invalid(format!("生物 {} 的職業 {} 不存在", entry.id, entry.job_id)))?;
            creatures.push(Creature::from_job(&entry.id, job));

            if let Some(party) = parties.iter_mut().find(|p| p.faction == entry.faction) {
                party.creature_ids.push(entry.id.clone());
            }
            if entry.faction == Faction::Player {
                cards.push(Card {
                    creature_id: entry.id.clone(),
                    skill_category: entry.skill_category,
                });
            }
        }
        let roster = Roster::new(creatures, parties);

        let mut scheduled = BTreeSet::new();
        for appearance in &config.creature_appearances {
            if appearance.turn_number == 0 {
                return Err(invalid("出現回合從 1 開始".to_string()));
            }
            for creature_id in &appearance.creature_ids {
                let faction = roster
                    .faction_of(creature_id)
                    .map_err(|_| invalid(format!("出現排程的生物 {creature_id} 不存在")))?;
                if faction != Faction::Computer {
                    return Err(invalid(format!("出現排程的生物 {creature_id} 不是電腦方")));
                }
                if !scheduled.insert(creature_id.as_str()) {
                    return Err(invalid(format!("生物 {creature_id} 重複排程出現")));
                }
            }
        }

        let card_ids: Vec<CreatureID> = cards.iter().map(|c| c.creature_id.clone()).collect();
        let (cards_in_deck, cards_on_players_hand) =
            refill_cards_on_players_hand(&card_ids, &[], config.max_number_of_players_hand)?;
        debug!(
            creatures = roster.creatures.len(),
            hand = cards_on_players_hand.len(),
            deck = cards_in_deck.len(),
            "load battle config"
        );

        let mut game = Game::new(jobs, roster, Grid::new(config.rows, config.columns));
        game.cards = cards;
        game.cards_in_deck = cards_in_deck;
        game.cards_on_players_hand = cards_on_players_hand;
        game.max_number_of_players_hand = config.max_number_of_players_hand;
        game.creature_appearances = config.creature_appearances.clone();
        game.headquarters_life_points = config.headquarters_life_points;
        game.action_points = config.action_points.min(config.max_action_points);
        game.action_points_recovery = config.action_points_recovery;
        game.max_action_points = config.max_action_points;
        Ok(game)
    }
}

fn default_skill_category() -> SkillCategory {
    SkillCategory::Attack
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_max_number_of_players_hand() -> usize {
    MAX_NUMBER_OF_PLAYERS_HAND
}

fn default_headquarters_life_points() -> LifePoints {
    DEFAULT_HEADQUARTERS_LIFE_POINTS
}

fn default_action_points() -> ActionPoints {
    DEFAULT_ACTION_POINTS
}

fn default_action_points_recovery() -> ActionPoints {
    DEFAULT_ACTION_POINTS_RECOVERY
}

fn default_max_action_points() -> ActionPoints {
    DEFAULT_MAX_ACTION_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        rows = 3
        columns = 4
        max_number_of_players_hand = 2
        headquarters_life_points = 7

        [[jobs]]
        id = "fighter"
        attack_power = 4
        max_life_points = 12

        [[jobs]]
        id = "goblin"
        max_life_points = 5
        raid_interval = 2

        [[creatures]]
        id = "ally-1"
        job_id = "fighter"
        faction = "player"

        [[creatures]]
        id = "ally-2"
        job_id = "fighter"
        faction = "player"
        skill_category = "defense"

        [[creatures]]
        id = "ally-3"
        job_id = "fighter"
        faction = "player"

        [[creatures]]
        id = "enemy-1"
        job_id = "goblin"
        faction = "computer"

        [[creature_appearances]]
        turn_number = 1
        creature_ids = ["enemy-1"]
    "#;

    #[test]
    fn test_from_config() {
        let config = BattleConfig::from_toml_str(CONFIG).unwrap();
        let game = Game::from_config(&config).unwrap();

        assert_eq!(game.grid.rows(), 3);
        assert_eq!(game.grid.columns(), 4);
        assert_eq!(game.headquarters_life_points, 7);
        assert_eq!(game.action_points, DEFAULT_ACTION_POINTS);
        assert_eq!(game.turn_number, 1);
        assert_eq!(game.cards_on_players_hand, vec!["ally-1", "ally-2"]);
        assert_eq!(game.cards_in_deck, vec!["ally-3"]);
        assert_eq!(game.cards.len(), 3);
        assert_eq!(
            find_card(&game.cards, "ally-2").unwrap().skill_category,
            SkillCategory::Defense
        );
        assert_eq!(game.roster.faction_of("enemy-1").unwrap(), Faction::Computer);
        assert_eq!(game.roster.find_creature("enemy-1").unwrap().life_points, 5);
        assert_eq!(game.appearance_of(1), vec!["enemy-1".to_string()]);
    }

    #[test]
    fn test_default_config() {
        let config = BattleConfig::from_toml_str("").unwrap();
        assert_eq!(config.rows, DEFAULT_GRID_SIZE);
        assert_eq!(config.columns, DEFAULT_GRID_SIZE);
        assert_eq!(config.max_number_of_players_hand, MAX_NUMBER_OF_PLAYERS_HAND);
        let game = Game::from_config(&config).unwrap();
        assert_eq!(game.headquarters_life_points, DEFAULT_HEADQUARTERS_LIFE_POINTS);
        assert_eq!(game.max_action_points, DEFAULT_MAX_ACTION_POINTS);
    }

    #[test]
    fn test_invalid_config() {
        let test_data = [
            "rows = 0",
            "[[creatures]]\nid = \"a\"\njob_id = \"nobody\"\nfaction = \"player\"",
            "[[jobs]]\nid = \"j\"\n[[creatures]]\nid = \"a\"\njob_id = \"j\"\nfaction = \"player\"\n[[creatures]]\nid = \"a\"\njob_id = \"j\"\nfaction = \"computer\"",
            "[[jobs]]\nid = \"j\"\n[[creatures]]\nid = \"a\"\njob_id = \"j\"\nfaction = \"player\"\n[[creature_appearances]]\nturn_number = 1\ncreature_ids = [\"a\"]",
            "[[creature_appearances]]\nturn_number = 1\ncreature_ids = [\"ghost\"]",
            "[[jobs]]\nid = \"j\"\n[[jobs]]\nid = \"j\"",
            "headquarters_life_points = -4",
            "[[jobs]]\nid = \"j\"\nmax_life_points = -3",
            "[[jobs]]\nid = \"j\"\nattack_power = -2",
        ];
        for data in test_data {
            let config = BattleConfig::from_toml_str(data).unwrap();
            match Game::from_config(&config) {
                Err(Error::InvalidConfig { .. }) => {}
                other => panic!("Should return Error::InvalidConfig: {data} {other:?}"),
            }
        }

        assert!(matches!(
            BattleConfig::from_toml_str("rows = \"seven\""),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            BattleConfig::from_file("/nonexistent/battle.toml"),
            Err(Error::InvalidConfig { .. })
        ));
    }
}
