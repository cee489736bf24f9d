// system-tests/tests/scenarios.rs
// ============================================================================
// Module: Governance Kernel End-to-End Scenarios
// Description: Drives the orchestrator through the concrete scenarios.
// Purpose: Exercise governance denial visibility, deterministic replay, and
//          governance-allow-but-reducer-reject against the toy domains.
// Dependencies: gov_kernel, system_tests::{counter, story}
// ============================================================================

use std::sync::Arc;

use gov_kernel::{
    AgentId, Clock, CompositionRule, GovernancePolicy, IdentifierGenerator, JurisdictionId, LawDecision, Orchestrator,
    ScriptedClock, ScriptedIdentifierGenerator, State,
};
use system_tests::counter::{AlwaysAllowLaw, CounterAction, CounterReducer, CounterState};
use system_tests::story::{story_laws, AdventureAction, AdventureReducer, AdventureState};

fn scripted_sources() -> (Arc<dyn Clock>, Arc<dyn IdentifierGenerator>) {
    (Arc::new(ScriptedClock::at_epoch()), Arc::new(ScriptedIdentifierGenerator::monotonic("evt")))
}

/// Scenario S1: a denied action surfaces every contributing verdict, not
/// just the first one found.
#[tokio::test]
async fn multi_rejection_visibility_surfaces_every_denying_law() {
    let (clock, identifiers) = scripted_sources();
    let initial_state = AdventureState::new(0, "dark cave", vec!["rusty sword".to_string()], 0);
    let jurisdiction_id = JurisdictionId::new("story");
    let policy = GovernancePolicy::new(story_laws(), CompositionRule::DenyWins, jurisdiction_id.clone());

    let orchestrator =
        Orchestrator::new(initial_state.clone(), AdventureReducer, clock, identifiers, jurisdiction_id, Some(policy))
            .expect("orchestrator construction");

    let action = AdventureAction::find_gold(500, "c1");
    let result = orchestrator.apply(action, AgentId::new("agent-1")).await;

    assert!(!result.applied);
    assert_eq!(orchestrator.current_state().await, initial_state);

    let log = orchestrator.audit_log().await;
    let denied = log.governance_denied_actions();
    assert_eq!(denied.len(), 1);

    let trace = denied[0].2.expect("governance trace must be attached");
    assert_eq!(trace.composed_decision, LawDecision::Deny);

    let deny_law_ids: Vec<String> = trace
        .verdicts
        .iter()
        .filter(|verdict| verdict.decision == LawDecision::Deny)
        .map(|verdict| verdict.law_id.to_string())
        .collect();
    assert_eq!(deny_law_ids.len(), 2);
    assert!(deny_law_ids.contains(&"GameOverLaw".to_string()));
    assert!(deny_law_ids.contains(&"GoldBudgetLaw".to_string()));

    let allow_law_ids: Vec<String> = trace
        .verdicts
        .iter()
        .filter(|verdict| verdict.decision == LawDecision::Allow)
        .map(|verdict| verdict.law_id.to_string())
        .collect();
    assert_eq!(allow_law_ids.len(), 2);
    assert!(allow_law_ids.contains(&"SafeLocationLaw".to_string()));
    assert!(allow_law_ids.contains(&"InventoryLaw".to_string()));
}

async fn run_story_sequence() -> Orchestrator<AdventureState, AdventureAction, AdventureReducer> {
    let (clock, identifiers) = scripted_sources();
    let initial_state = AdventureState::new(100, "sunlit meadow", Vec::new(), 0);
    let jurisdiction_id = JurisdictionId::new("story");
    let policy = GovernancePolicy::new(story_laws(), CompositionRule::DenyWins, jurisdiction_id.clone());

    let orchestrator =
        Orchestrator::new(initial_state, AdventureReducer, clock, identifiers, jurisdiction_id, Some(policy))
            .expect("orchestrator construction");

    let actions = vec![
        AdventureAction::find_gold(20, "c1"),
        AdventureAction::move_to("dark cave", "c2"),
        AdventureAction::find_item("rusty sword", "c3"),
        AdventureAction::take_damage(15, "c4"),
        AdventureAction::find_gold(500, "c5"),
        AdventureAction::rest(25, "c6"),
        AdventureAction::move_to("sunlit meadow", "c7"),
        AdventureAction::rest(25, "c8"),
    ];

    for (index, action) in actions.into_iter().enumerate() {
        orchestrator.apply(action, AgentId::new(format!("agent-{index}"))).await;
    }

    orchestrator
}

/// Scenario S3: two orchestrators driven by identical scripted determinism
/// sources and the identical action sequence produce bitwise-identical
/// final state hashes and entry hashes.
#[tokio::test]
async fn deterministic_replay_produces_identical_logs() {
    let first = run_story_sequence().await;
    let second = run_story_sequence().await;

    assert_eq!(first.current_state().await.state_hash(), second.current_state().await.state_hash());

    let first_log = first.audit_log().await;
    let second_log = second.audit_log().await;
    assert_eq!(first_log.len(), second_log.len());

    let first_hashes: Vec<String> = first_log.entries().iter().map(gov_kernel::AuditEvent::entry_hash).collect();
    let second_hashes: Vec<String> = second_log.entries().iter().map(gov_kernel::AuditEvent::entry_hash).collect();
    assert_eq!(first_hashes, second_hashes);
}

/// Scenario S6: governance allows an action the reducer then rejects; the
/// audit event still carries the allowing trace, with state unchanged.
#[tokio::test]
async fn governance_allow_with_reducer_reject_preserves_state_and_trace() {
    let (clock, identifiers) = scripted_sources();
    let initial_state = CounterState { value: 0 };
    let jurisdiction_id = JurisdictionId::new("counter");
    let policy = GovernancePolicy::new(
        vec![gov_kernel::AnyLaw::new(AlwaysAllowLaw)],
        CompositionRule::UnanimousAllow,
        jurisdiction_id.clone(),
    );

    let orchestrator =
        Orchestrator::new(initial_state.clone(), CounterReducer, clock, identifiers, jurisdiction_id, Some(policy))
            .expect("orchestrator construction");

    let result = orchestrator.apply(CounterAction::decrement("c1"), AgentId::new("agent-1")).await;
    assert!(!result.applied);
    assert_eq!(orchestrator.current_state().await, initial_state);

    let log = orchestrator.audit_log().await;
    let rejected = log.rejected_actions();
    assert_eq!(rejected.len(), 1);

    let entry = log.entries().last().expect("at least one entry");
    let trace = entry.governance_trace.as_ref().expect("governance trace must be attached");
    assert_eq!(trace.composed_decision, LawDecision::Allow);
    assert_eq!(entry.state_hash_before, entry.state_hash_after);
}
