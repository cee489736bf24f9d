// system-tests/src/story.rs
// ============================================================================
// Module: Story Domain
// Description: A toy adventure domain used to exercise the kernel end to
//              end: state, actions, a reducer, and the four Story Laws.
// Purpose: Ground the governance and orchestrator scenarios in a concrete,
//          human-readable domain rather than synthetic fixtures.
// Dependencies: gov_kernel::{Action, AnyLaw, CorrelationId, LawDecision,
//               LawId, LawVerdict, Reducer, ReducerResult, State}
// ============================================================================

//! ## Overview
//! None of this is part of the kernel itself — a domain supplies its own
//! reducer and Laws, and this is one such domain. `AdventureState` tracks
//! health, location, inventory, and gold; `AdventureAction` is the tagged
//! set of moves a player (or an agent standing in for one) can propose.

use gov_kernel::{
    Action, AnyLaw, CorrelationId, Law, LawDecision, LawId, LawVerdict, Reducer, ReducerResult,
};
use serde::{Deserialize, Serialize};

/// Above this amount, `GoldBudgetLaw` denies a single `findGold` action.
pub const GOLD_FIND_CAP: i64 = 100;

/// At or above this many items, `InventoryLaw` denies further acquisition.
pub const MAX_INVENTORY: usize = 10;

/// Locations `SafeLocationLaw` refuses to allow actions in.
pub const UNSAFE_LOCATIONS: &[&str] = &["volcano", "dragon's lair"];

// ============================================================================
// SECTION: AdventureState
// ============================================================================

/// The player's current situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureState {
    pub health: i64,
    pub location: String,
    pub inventory: Vec<String>,
    pub gold: i64,
}

impl AdventureState {
    #[must_use]
    pub fn new(health: i64, location: impl Into<String>, inventory: Vec<String>, gold: i64) -> Self {
        Self { health, location: location.into(), inventory, gold }
    }
}

// ============================================================================
// SECTION: AdventureAction
// ============================================================================

/// What a player can propose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdventureActionKind {
    FindGold(i64),
    MoveTo(String),
    FindItem(String),
    TakeDamage(i64),
    Rest(i64),
}

/// A proposed adventure transition, carrying its own stable correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureAction {
    pub kind: AdventureActionKind,
    pub correlation_id: CorrelationId,
}

impl AdventureAction {
    #[must_use]
    pub fn find_gold(amount: i64, correlation_id: impl Into<String>) -> Self {
        Self { kind: AdventureActionKind::FindGold(amount), correlation_id: CorrelationId::new(correlation_id) }
    }

    #[must_use]
    pub fn move_to(location: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            kind: AdventureActionKind::MoveTo(location.into()),
            correlation_id: CorrelationId::new(correlation_id),
        }
    }

    #[must_use]
    pub fn find_item(item: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            kind: AdventureActionKind::FindItem(item.into()),
            correlation_id: CorrelationId::new(correlation_id),
        }
    }

    #[must_use]
    pub fn take_damage(amount: i64, correlation_id: impl Into<String>) -> Self {
        Self { kind: AdventureActionKind::TakeDamage(amount), correlation_id: CorrelationId::new(correlation_id) }
    }

    #[must_use]
    pub fn rest(amount: i64, correlation_id: impl Into<String>) -> Self {
        Self { kind: AdventureActionKind::Rest(amount), correlation_id: CorrelationId::new(correlation_id) }
    }
}

impl Action for AdventureAction {
    fn description(&self) -> String {
        match &self.kind {
            AdventureActionKind::FindGold(amount) => format!("find {amount} gold"),
            AdventureActionKind::MoveTo(location) => format!("move to {location}"),
            AdventureActionKind::FindItem(item) => format!("find {item}"),
            AdventureActionKind::TakeDamage(amount) => format!("take {amount} damage"),
            AdventureActionKind::Rest(amount) => format!("rest for {amount}"),
        }
    }

    fn correlation_id(&self) -> CorrelationId {
        self.correlation_id.clone()
    }
}

// ============================================================================
// SECTION: AdventureReducer
// ============================================================================

/// Applies an `AdventureAction` to an `AdventureState`. Never rejects: every
/// proposal that reaches the reducer is a legal move in this toy domain,
/// since the Story Laws are where rejection semantics live. `TakeDamage`
/// clamps health at zero rather than letting it go negative.
pub struct AdventureReducer;

impl Reducer<AdventureState, AdventureAction> for AdventureReducer {
    fn reduce(&self, state: &AdventureState, action: &AdventureAction) -> ReducerResult<AdventureState> {
        let mut next = state.clone();
        match &action.kind {
            AdventureActionKind::FindGold(amount) => next.gold += amount,
            AdventureActionKind::MoveTo(location) => next.location = location.clone(),
            AdventureActionKind::FindItem(item) => next.inventory.push(item.clone()),
            AdventureActionKind::TakeDamage(amount) => next.health = (next.health - amount).max(0),
            AdventureActionKind::Rest(amount) => next.health += amount,
        }
        ReducerResult::accepted(next, action.description())
    }
}

// ============================================================================
// SECTION: Story Laws
// ============================================================================

/// Denies any action once health has reached zero.
pub struct GameOverLaw;

impl Law<AdventureState, AdventureAction> for GameOverLaw {
    fn law_id(&self) -> LawId {
        LawId::new("GameOverLaw")
    }

    fn evaluate(&self, state: &AdventureState, _action: &AdventureAction) -> LawVerdict {
        if state.health <= 0 {
            LawVerdict::new(self.law_id(), LawDecision::Deny, "game is already over")
        } else {
            LawVerdict::new(self.law_id(), LawDecision::Allow, "player is alive")
        }
    }
}

/// Denies a single `findGold` action that would exceed [`GOLD_FIND_CAP`].
pub struct GoldBudgetLaw;

impl Law<AdventureState, AdventureAction> for GoldBudgetLaw {
    fn law_id(&self) -> LawId {
        LawId::new("GoldBudgetLaw")
    }

    fn evaluate(&self, _state: &AdventureState, action: &AdventureAction) -> LawVerdict {
        match &action.kind {
            AdventureActionKind::FindGold(amount) if *amount > GOLD_FIND_CAP => {
                LawVerdict::new(self.law_id(), LawDecision::Deny, "exceeds the per-find gold budget")
            }
            _ => LawVerdict::new(self.law_id(), LawDecision::Allow, "within the per-find gold budget"),
        }
    }
}

/// Denies actions proposed from a location in [`UNSAFE_LOCATIONS`].
pub struct SafeLocationLaw;

impl Law<AdventureState, AdventureAction> for SafeLocationLaw {
    fn law_id(&self) -> LawId {
        LawId::new("SafeLocationLaw")
    }

    fn evaluate(&self, state: &AdventureState, _action: &AdventureAction) -> LawVerdict {
        if UNSAFE_LOCATIONS.contains(&state.location.as_str()) {
            LawVerdict::new(self.law_id(), LawDecision::Deny, "current location is unsafe")
        } else {
            LawVerdict::new(self.law_id(), LawDecision::Allow, "current location is safe")
        }
    }
}

/// Denies acquiring another item once inventory has reached
/// [`MAX_INVENTORY`].
pub struct InventoryLaw;

impl Law<AdventureState, AdventureAction> for InventoryLaw {
    fn law_id(&self) -> LawId {
        LawId::new("InventoryLaw")
    }

    fn evaluate(&self, state: &AdventureState, action: &AdventureAction) -> LawVerdict {
        match &action.kind {
            AdventureActionKind::FindItem(_) if state.inventory.len() >= MAX_INVENTORY => {
                LawVerdict::new(self.law_id(), LawDecision::Deny, "inventory is full")
            }
            _ => LawVerdict::new(self.law_id(), LawDecision::Allow, "inventory has room"),
        }
    }
}

/// Builds the four Story Laws in the canonical evaluation order used
/// throughout the scenarios.
#[must_use]
pub fn story_laws() -> Vec<AnyLaw<AdventureState, AdventureAction>> {
    vec![
        AnyLaw::new(GameOverLaw),
        AnyLaw::new(GoldBudgetLaw),
        AnyLaw::new(SafeLocationLaw),
        AnyLaw::new(InventoryLaw),
    ]
}
