//! hand.rs：
//! - 玩家的牌庫（deck）與手牌（hand），兩者都只存放生物 id，順序即抽牌順序。
//! - 同一張卡片只會出現在牌庫或手牌其中一處。
use crate::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 卡片，每張對應一隻玩家方生物
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Card {
    pub creature_id: CreatureID,
    pub skill_category: SkillCategory,
}

pub fn find_card<'a>(cards: &'a [Card], creature_id: &str) -> Option<&'a Card> {
    cards.iter().find(|c| c.creature_id == creature_id)
}

/// 從牌庫前端補滿手牌
///
/// 回傳 (牌庫, 手牌)；手牌 = 原手牌 ++ 牌庫前 n 張，n 受牌庫張數限制
pub fn refill_cards_on_players_hand(
    cards_in_deck: &[CreatureID],
    cards_on_players_hand: &[CreatureID],
    max_number_of_players_hand: usize,
) -> Result<(Vec<CreatureID>, Vec<CreatureID>), Error> {
    let func = "refill_cards_on_players_hand";

    let hand_size = cards_on_players_hand.len();
    if hand_size > max_number_of_players_hand {
        return Err(Error::HandOverflow {
            func,
            hand_size,
            max: max_number_of_players_hand,
        });
    }

    let delta = (max_number_of_players_hand - hand_size).min(cards_in_deck.len());
    let (drawn, rest) = cards_in_deck.split_at(delta);
    let hand: Vec<CreatureID> = cards_on_players_hand
        .iter()
        .chain(drawn.iter())
        .cloned()
        .collect();
    debug!(drawn = delta, hand = hand.len(), deck = rest.len(), "refill hand");
    Ok((rest.to_vec(), hand))
}

/// 出牌後從手牌移除
pub fn remove_card_from_hand(
    cards_on_players_hand: &[CreatureID],
    creature_id: &str,
) -> Result<Vec<CreatureID>, Error> {
    let func = "remove_card_from_hand";

    if !cards_on_players_hand.iter().any(|id| id == creature_id) {
        return Err(Error::CardNotInHand {
            func,
            creature_id: creature_id.to_string(),
        });
    }
    Ok(cards_on_players_hand
        .iter()
        .filter(|id| *id != creature_id)
        .cloned()
        .collect())
}

/// 陣亡生物的卡片放回牌庫尾端
pub fn return_card_to_deck(
    cards_in_deck: &[CreatureID],
    cards_on_players_hand: &[CreatureID],
    creature_id: &str,
) -> Result<Vec<CreatureID>, Error> {
    let func = "return_card_to_deck";

    let exists = cards_in_deck
        .iter()
        .chain(cards_on_players_hand.iter())
        .any(|id| id == creature_id);
    if exists {
        return Err(Error::InvalidState {
            func,
            detail: format!("card {creature_id} is already in the deck or hand"),
        });
    }
    let mut deck = cards_in_deck.to_vec();
    deck.push(creature_id.to_string());
    Ok(deck)
}
