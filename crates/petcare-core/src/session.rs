//! Play session - owns one pet and drives it from injected time.
//!
//! A [`Session`] is the single mutator of its pet. Ticks arrive through
//! [`Session::advance`]; player actions go through the `feed`, `play`, ...
//! methods, which run the advisory [`check_action`] gate before touching the
//! pet. Both paths queue [`PetEvent`]s for the front end to drain.

use std::collections::VecDeque;

use petcare_logic::actions::{check_action, PlayerAction, Refusal};
use petcare_logic::constants::{CARE_SCORE, EXERCISE_VALUES, PLAY_VALUE, QUIZ_SCORE};
use petcare_logic::decay::{decay_tick, recovery_tick, transition_events, PetEvent};
use petcare_logic::items::{find_item, random_item, InventoryError, ItemKind};
use petcare_logic::minigame::MathQuestion;
use petcare_logic::pet::{ActionOutcome, Pet};
use petcare_logic::state::PetStates;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::scheduler::{TickKind, TickScheduler};

/// An action the session would not perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0}")]
    Refused(#[from] Refusal),
    #[error("you don't have any {0} left")]
    OutOfItem(String),
    #[error("{0} is not a known {1}")]
    UnknownItem(String, &'static str),
    #[error("no question has been asked")]
    NoQuestion,
}

/// Result of answering the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// The reward item, if the catalog had one to give.
    Correct { reward: Option<String> },
    Incorrect { expected: i32 },
}

/// Main session engine
pub struct Session<C: Clock> {
    pet: Pet,
    clock: C,
    scheduler: TickScheduler,
    recovery_step: u32,
    score: u32,
    events: VecDeque<PetEvent>,
    question: Option<MathQuestion>,
    rng: StdRng,
}

impl<C: Clock> Session<C> {
    pub fn new(pet: Pet, clock: C, config: &GameConfig) -> Self {
        Self::with_rng(pet, clock, config, StdRng::from_entropy())
    }

    /// Session with a fixed random source, for reproducible quizzes.
    pub fn with_rng(pet: Pet, clock: C, config: &GameConfig, rng: StdRng) -> Self {
        let mut scheduler =
            TickScheduler::new(config.decay_interval_ms, config.recovery_interval_ms);
        if pet.is_dead() {
            scheduler.stop();
        } else if pet.is_sleeping() {
            scheduler.start_recovery();
        }
        log::info!(
            "session started for {} the {} ({})",
            pet.name(),
            pet.pet_type().type_name(),
            pet.mood()
        );
        Self {
            pet,
            clock,
            scheduler,
            recovery_step: config.recovery_step,
            score: 0,
            events: VecDeque::new(),
            question: None,
            rng,
        }
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// True until the pet dies.
    pub fn is_running(&self) -> bool {
        !self.scheduler.is_stopped()
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    pub fn is_recovering(&self) -> bool {
        self.scheduler.is_recovering()
    }

    pub fn pause(&mut self) {
        log::debug!("session paused");
        self.scheduler.pause();
    }

    pub fn resume(&mut self) {
        log::debug!("session resumed");
        self.scheduler.resume();
    }

    /// Let `elapsed_ms` of play time pass. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        let pet = &mut self.pet;
        let events = &mut self.events;
        let step = self.recovery_step;
        self.scheduler.advance(elapsed_ms, |kind| {
            let report = match kind {
                TickKind::Decay => decay_tick(pet),
                TickKind::Recovery => recovery_tick(pet, step),
            };
            for event in &report.events {
                match event {
                    PetEvent::Died => log::warn!("{} has died", pet.name()),
                    other => log::info!("{}: {:?}", pet.name(), other),
                }
            }
            events.extend(report.events.iter().copied());
            report
        })
    }

    /// Events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PetEvent> {
        self.events.drain(..).collect()
    }

    /// Stop both timers and hand the pet back.
    pub fn end(mut self) -> Pet {
        self.scheduler.stop();
        log::info!("session ended for {} with score {}", self.pet.name(), self.score);
        self.pet
    }

    // ---- actions ----

    pub fn feed(&mut self, item: &str) -> Result<ActionOutcome, ActionError> {
        self.use_item(PlayerAction::Feed, ItemKind::Food, item)
    }

    pub fn give_gift(&mut self, item: &str) -> Result<ActionOutcome, ActionError> {
        self.use_item(PlayerAction::GiveGift, ItemKind::Gift, item)
    }

    pub fn go_to_bed(&mut self) -> Result<ActionOutcome, ActionError> {
        self.act(PlayerAction::GoToBed, |pet, _| {
            pet.go_to_bed();
            ActionOutcome::Performed(format!("{} is well rested.", pet.name()))
        })
    }

    pub fn exercise(&mut self) -> Result<ActionOutcome, ActionError> {
        self.act(PlayerAction::Exercise, |pet, _| {
            let (health, sleep, fullness) = EXERCISE_VALUES;
            pet.exercise(health, sleep, fullness);
            ActionOutcome::Performed(format!("{} had a good workout!", pet.name()))
        })
    }

    pub fn play(&mut self) -> Result<ActionOutcome, ActionError> {
        self.act(PlayerAction::Play, |pet, now| pet.play(now, PLAY_VALUE))
    }

    pub fn take_to_vet(&mut self) -> Result<ActionOutcome, ActionError> {
        self.act(PlayerAction::Vet, |pet, now| pet.take_to_vet(now))
    }

    /// Pose a new quiz question, replacing any unanswered one.
    pub fn ask_question(&mut self) -> Result<MathQuestion, ActionError> {
        self.ensure_allowed(PlayerAction::MiniGame)?;
        let question = MathQuestion::random(&mut self.rng);
        self.question = Some(question);
        Ok(question)
    }

    pub fn answer(&mut self, answer: i32) -> Result<QuizOutcome, ActionError> {
        self.ensure_allowed(PlayerAction::MiniGame)?;
        let question = self.question.take().ok_or(ActionError::NoQuestion)?;
        if !question.check(answer) {
            return Ok(QuizOutcome::Incorrect {
                expected: question.answer(),
            });
        }
        self.score += QUIZ_SCORE;
        let reward = match random_item(&mut self.rng) {
            Some(item) => {
                self.pet
                    .inventory_mut(item.kind)
                    .add(&item.name, 1)
                    .map_err(|e| ActionError::UnknownItem(e.to_string(), "item"))?;
                log::debug!("quiz reward: {}", item.name);
                Some(item.name)
            }
            None => None,
        };
        Ok(QuizOutcome::Correct { reward })
    }

    fn ensure_allowed(&self, action: PlayerAction) -> Result<(), ActionError> {
        match check_action(&self.pet, action) {
            Some(refusal) => {
                log::debug!("{} refused: {refusal}", action.label());
                Err(refusal.into())
            }
            None => Ok(()),
        }
    }

    fn act<F>(&mut self, action: PlayerAction, f: F) -> Result<ActionOutcome, ActionError>
    where
        F: FnOnce(&mut Pet, i64) -> ActionOutcome,
    {
        self.ensure_allowed(action)?;
        let before = self.pet.raw_states();
        let outcome = f(&mut self.pet, self.clock.now_ms());
        self.after_action(before);
        Ok(outcome)
    }

    fn use_item(
        &mut self,
        action: PlayerAction,
        kind: ItemKind,
        name: &str,
    ) -> Result<ActionOutcome, ActionError> {
        self.ensure_allowed(action)?;
        let kind_label = match kind {
            ItemKind::Food => "food",
            ItemKind::Gift => "gift",
        };
        let item = find_item(name)
            .filter(|i| i.kind == kind)
            .ok_or_else(|| ActionError::UnknownItem(name.to_string(), kind_label))?;
        self.pet
            .inventory_mut(kind)
            .take_one(&item.name)
            .map_err(|e| match e {
                InventoryError::OutOfItem(n) | InventoryError::InvalidName(n) => {
                    ActionError::OutOfItem(n)
                }
                InventoryError::Catalog(_) => {
                    ActionError::UnknownItem(item.name.clone(), kind_label)
                }
            })?;

        let before = self.pet.raw_states();
        let message = match kind {
            ItemKind::Food => {
                self.pet.feed(item.value);
                format!("You fed {} the {}!", self.pet.name(), item.name)
            }
            ItemKind::Gift => {
                self.pet.give_gift(item.value);
                format!("You gave {} the {}!", self.pet.name(), item.name)
            }
        };
        self.score += CARE_SCORE;
        self.after_action(before);
        Ok(ActionOutcome::Performed(message))
    }

    fn after_action(&mut self, before: PetStates) {
        let events = transition_events(before, self.pet.raw_states());
        self.events.extend(events);
        if self.pet.is_dead() {
            self.scheduler.stop();
        } else if self.pet.is_sleeping() {
            self.scheduler.start_recovery();
        }
    }
}
