//! roster.rs：
//! - 生物名冊（Roster）與陣營（Party）。
//! - 負責 id 查詢與陣營關係判定，生物死亡後仍保留在名冊中。
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

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
pub enum Faction {
    Player,
    Computer,
}

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum FactionRelationship {
    Ally,
    Enemy,
}

pub fn determine_relationship(a: Faction, b: Faction) -> FactionRelationship {
    if a == b {
        FactionRelationship::Ally
    } else {
        FactionRelationship::Enemy
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Party {
    pub faction: Faction,
    pub creature_ids: Vec<CreatureID>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Roster {
    pub creatures: Vec<Creature>,
    pub parties: Vec<Party>,
}

impl Roster {
    pub fn new(creatures: Vec<Creature>, parties: Vec<Party>) -> Self {
        Self { creatures, parties }
    }

    pub fn find_creature(&self, creature_id: &str) -> Result<&Creature, Error> {
        let func = "Roster::find_creature";

        self.creatures
            .iter()
            .find(|c| c.id == creature_id)
            .ok_or_else(|| Error::CreatureNotFound {
                func,
                creature_id: creature_id.to_string(),
            })
    }

    pub fn find_party_by_creature_id(&self, creature_id: &str) -> Result<&Party, Error> {
        let func = "Roster::find_party_by_creature_id";

        self.parties
            .iter()
            .find(|p| p.creature_ids.iter().any(|id| id == creature_id))
            .ok_or_else(|| Error::PartyNotFound {
                func,
                creature_id: creature_id.to_string(),
            })
    }

    pub fn faction_of(&self, creature_id: &str) -> Result<Faction, Error> {
        Ok(self.find_party_by_creature_id(creature_id)?.faction)
    }

    /// 同時取得生物與所屬陣營
    pub fn find_creature_with_party(
        &self,
        creature_id: &str,
    ) -> Result<(&Creature, &Party), Error> {
        let party = self.find_party_by_creature_id(creature_id)?;
        let creature = self.find_creature(creature_id)?;
        Ok((creature, party))
    }

    /// 指定陣營的所有生物，依名冊順序
    pub fn creatures_of(&self, faction: Faction) -> Vec<&Creature> {
        self.creatures
            .iter()
            .filter(|c| self.faction_of(&c.id).ok() == Some(faction))
            .collect()
    }

    /// 以新值取代同 id 的生物
    pub fn with_creature(&self, creature: Creature) -> Result<Roster, Error> {
        self.with_creatures(vec![creature])
    }

    pub fn with_creatures(&self, updated: Vec<Creature>) -> Result<Roster, Error> {
        let func = "Roster::with_creatures";

        let mut roster = self.clone();
        for creature in updated {
            let slot = roster
                .creatures
                .iter_mut()
                .find(|c| c.id == creature.id)
                .ok_or_else(|| Error::CreatureNotFound {
                    func,
                    creature_id: creature.id.clone(),
                })?;
            *slot = creature;
        }
        Ok(roster)
    }

    /// 下一個配置順序，比目前所有生物都大
    pub fn next_placement_order(&self) -> PlacementOrder {
        self.creatures
            .iter()
            .map(|c| c.placement_order)
            .max()
            .unwrap_or(DEFAULT_PLACEMENT_ORDER)
            + 1
    }
}
