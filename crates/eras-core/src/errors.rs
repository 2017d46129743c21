//! Rejected intents.
//!
//! Every variant's `Display` text is the status line shown to the player.
//! Rejections are never fatal and leave the world untouched.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Not enough resources.")]
    InsufficientResources,
    #[error("Supply cap reached. Build more towers/barracks.")]
    SupplyCapReached,
    #[error("Build a barracks to train soldiers.")]
    MissingBarracks,
    #[error("Placement blocked.")]
    PlacementBlocked,
    #[error("No hero available.")]
    NoHero,
    #[error("Hero ability recharging.")]
    AbilityOnCooldown,
    #[error("Tech tree fully researched.")]
    FullyResearched,
    #[error("Your nation has fallen.")]
    NationFallen,
}
