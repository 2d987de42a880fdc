use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    Driftwood,
    Coral,
    Shrimp,
    Kelp,
    Pearl,
}

impl Resource {
    /// Protocol order; freqdeck values follow it too.
    pub const ALL: [Resource; 5] = [
        Resource::Driftwood,
        Resource::Coral,
        Resource::Shrimp,
        Resource::Kelp,
        Resource::Pearl,
    ];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentCard {
    LobsterGuard,
    BountifulHarvest,
    TidalMonopoly,
    CurrentBuilding,
    TreasureChest,
}

impl DevelopmentCard {
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::LobsterGuard,
        DevelopmentCard::BountifulHarvest,
        DevelopmentCard::TidalMonopoly,
        DevelopmentCard::CurrentBuilding,
        DevelopmentCard::TreasureChest,
    ];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingKind {
    TidePools,
    Reefs,
    Currents,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 3] = [
        BuildingKind::TidePools,
        BuildingKind::Reefs,
        BuildingKind::Currents,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPrompt {
    BuildInitialTidePool,
    BuildInitialCurrent,
    PlayTide,
    Discard,
    ReleaseCatch,
    MoveTheKraken,
    DecideTrade,
    DecideAcceptees,
}

impl ActionPrompt {
    /// Prompts that pause the turn owner while other players act.
    pub fn is_interrupt(tag: &str) -> bool {
        matches!(
            tag.parse::<ActionPrompt>(),
            Ok(ActionPrompt::ReleaseCatch | ActionPrompt::MoveTheKraken | ActionPrompt::Discard)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    RollTheShells,
    MoveTheKraken,
    ReleaseCatch,
    BuildCurrent,
    BuildTidePool,
    BuildReef,
    BuyTreasureMap,
    SummonLobsterGuard,
    PlayBountifulHarvest,
    PlayTidalMonopoly,
    PlayCurrentBuilding,
    OceanTrade,
    OfferTrade,
    AcceptTrade,
    RejectTrade,
    ConfirmTrade,
    CancelTrade,
    EndTide,
}

impl ActionType {
    pub fn matches(self, tag: &str) -> bool {
        tag.parse::<ActionType>().is_ok_and(|parsed| parsed == self)
    }
}
