//! Player actions and the state checks that gate them.
//!
//! [`Pet`] itself never refuses an action apart from its cooldowns. The
//! session layer calls [`check_action`] first and reports the [`Refusal`].

use serde::{Deserialize, Serialize};

use crate::pet::Pet;

/// Something the player can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    GoToBed,
    Feed,
    GiveGift,
    Vet,
    Play,
    Exercise,
    ViewInventory,
    MiniGame,
    Save,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 9] = [
        PlayerAction::GoToBed,
        PlayerAction::Feed,
        PlayerAction::GiveGift,
        PlayerAction::Vet,
        PlayerAction::Play,
        PlayerAction::Exercise,
        PlayerAction::ViewInventory,
        PlayerAction::MiniGame,
        PlayerAction::Save,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlayerAction::GoToBed => "go to bed",
            PlayerAction::Feed => "feed",
            PlayerAction::GiveGift => "give gift",
            PlayerAction::Vet => "take to vet",
            PlayerAction::Play => "play",
            PlayerAction::Exercise => "exercise",
            PlayerAction::ViewInventory => "view inventory",
            PlayerAction::MiniGame => "mini-game",
            PlayerAction::Save => "save",
        }
    }
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Refusal {
    #[error("your pet has died")]
    Dead,
    #[error("your pet is sleeping")]
    Sleeping,
    #[error("your pet is already sleeping")]
    AlreadySleeping,
    #[error("your pet is too angry")]
    Angry,
}

/// Returns the reason `action` is not allowed right now, if any.
///
/// | Action | Refused when |
/// |--------|--------------|
/// | every action | dead |
/// | go to bed | already sleeping, or angry |
/// | feed, exercise, vet | sleeping or angry |
/// | play, give gift | sleeping |
/// | view inventory, mini-game, save | never |
pub fn check_action(pet: &Pet, action: PlayerAction) -> Option<Refusal> {
    if pet.is_dead() {
        return Some(Refusal::Dead);
    }
    let sleeping = pet.is_sleeping();
    let angry = pet.is_angry();
    match action {
        PlayerAction::GoToBed if sleeping => Some(Refusal::AlreadySleeping),
        PlayerAction::GoToBed if angry => Some(Refusal::Angry),
        PlayerAction::Feed | PlayerAction::Exercise | PlayerAction::Vet if sleeping => {
            Some(Refusal::Sleeping)
        }
        PlayerAction::Feed | PlayerAction::Exercise | PlayerAction::Vet if angry => {
            Some(Refusal::Angry)
        }
        PlayerAction::Play | PlayerAction::GiveGift if sleeping => Some(Refusal::Sleeping),
        _ => None,
    }
}
