//! application.rs：
//! - 應用程式狀態，目前只有戰鬥頁面。
//! - 所有指令都先取得戰鬥頁面，不存在時回傳 InvalidState。
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BattlePage {
    pub game: Game,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Pages {
    pub battle: Option<BattlePage>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ApplicationState {
    pub pages: Pages,
}

impl ApplicationState {
    pub fn with_battle(game: Game) -> Self {
        ApplicationState {
            pages: Pages {
                battle: Some(BattlePage { game }),
            },
        }
    }

    pub fn game(&self) -> Option<&Game> {
        self.pages.battle.as_ref().map(|page| &page.game)
    }

    fn update_battle_page(
        &self,
        func: &'static str,
        updater: impl FnOnce(&Game) -> Result<Game, Error>,
    ) -> Result<ApplicationState, Error> {
        let page = self.pages.battle.as_ref().ok_or_else(|| Error::InvalidState {
            func,
            detail: "battle page does not exist".to_string(),
        })?;
        let game = updater(&page.game).map_err(|e| e.wrap(func))?;
        Ok(ApplicationState {
            pages: Pages {
                battle: Some(BattlePage { game }),
            },
        })
    }

    pub fn select_square(&self, y: usize, x: usize) -> Result<ApplicationState, Error> {
        self.update_battle_page("ApplicationState::select_square", |game| {
            select_square(game, y, x)
        })
    }

    pub fn select_card_on_players_hand(
        &self,
        creature_id: &str,
    ) -> Result<ApplicationState, Error> {
        self.update_battle_page("ApplicationState::select_card_on_players_hand", |game| {
            select_card_on_players_hand(game, creature_id)
        })
    }

    pub fn place_creature(&self, creature_id: &str, pos: Pos) -> Result<ApplicationState, Error> {
        self.update_battle_page("ApplicationState::place_creature", |game| {
            place_creature(game, creature_id, pos)
        })
    }

    pub fn run_auto_attack_phase(&self) -> Result<ApplicationState, Error> {
        self.update_battle_page(
            "ApplicationState::run_auto_attack_phase",
            run_auto_attack_phase,
        )
    }

    /// 開戰，產生第 1 回合的電腦方生物
    pub fn start_battle(
        &self,
        chooser: &mut impl SpawnSquareChooser,
    ) -> Result<ApplicationState, Error> {
        self.update_battle_page("ApplicationState::start_battle", |game| {
            start_battle(game, chooser)
        })
    }

    pub fn proceed_turn(
        &self,
        chooser: &mut impl SpawnSquareChooser,
    ) -> Result<ApplicationState, Error> {
        self.update_battle_page("ApplicationState::proceed_turn", |game| {
            proceed_turn(game, chooser)
        })
    }
}
