//! End-to-end scenarios: parse a contract specification, evaluate it at a
//! call site against a fact-tracking memory state, and inspect the branches.
//!
//! Tests cover:
//! - The two-clause nullity scenario with an unconstrained first argument
//! - Unconditional `fail` contracts
//! - Arity errors in malformed specifications
//! - Known-null arguments against `null` / `!null` clauses
//! - Exhaustive clause pairs that leave no default branch
//! - Absorption by trivial contracts and the database round trip

use mcontract_check::{
    evaluate, lint_contracts, parse_contracts, BranchOrigin, BranchOutcome, ContractDatabase,
    ContractDiagnostic, ContractEvaluator, EvalPhase, EvaluatorConfig, ParseError, Signature,
    ValueKind,
};
use mcontract_core::{CallSite, ExitKind, FactState, InternedValueFactory, MemoryState, ValueFactory, ValueId};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn traced_evaluator() -> ContractEvaluator {
    ContractEvaluator::new(EvaluatorConfig {
        trace_enabled: true,
        ..EvaluatorConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn nullity_scenario_forks_two_branches() {
    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let null = factory.const_null();
    let contracts = parse_contracts("_,null->true;!null,_->false", 2).unwrap();

    let eval = traced_evaluator()
        .evaluate(&contracts, &CallSite::static_call([x, null]), &FactState::new(), &mut factory)
        .unwrap();

    let origins: Vec<_> = eval.branches.iter().map(|b| b.origin).collect();
    // Clause 1 always applies because the second argument is null, so no
    // "no contract matched" branch is left.
    assert_eq!(origins, vec![BranchOrigin::Contract(0), BranchOrigin::Contract(1)]);

    // Clause 1 binds TRUE and says nothing about x.
    let first = &eval.branches[0];
    assert_eq!(first.outcome, BranchOutcome::Returns(ValueId::TRUE));
    assert_eq!(first.state.return_value(), Some(ValueId::TRUE));
    assert!(!first.state.is_known_distinct(x, ValueId::NULL));

    // Clause 2 requires x non-null, independent of clause 1.
    let second = &eval.branches[1];
    assert!(second.state.is_known_distinct(x, ValueId::NULL));
    match second.outcome {
        BranchOutcome::Returns(v) => assert!(second.state.is_known_distinct(v, ValueId::TRUE)),
        BranchOutcome::Throws => panic!("clause 2 returns false"),
    }

    assert!(eval.diagnostics.is_empty());
    assert_eq!(eval.absorbed_by, None);

    let phases: Vec<_> = eval.trace.unwrap().into_iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            EvalPhase::Pending,
            EvalPhase::Testing(0),
            EvalPhase::Split(0),
            EvalPhase::Testing(1),
            EvalPhase::Split(1),
            EvalPhase::Exhausted,
        ]
    );
}

#[test]
fn unconditional_fail_yields_single_throws_branch() {
    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let contracts = parse_contracts("_->fail", 1).unwrap();

    let states = evaluate(&contracts, &CallSite::static_call([x]), &FactState::new(), &mut factory)
        .unwrap();

    assert_eq!(states.len(), 1);
    assert_eq!(states[0].exit(), ExitKind::Throws);
    assert_eq!(states[0].return_value(), None);
}

#[test]
fn malformed_spec_reports_arity() {
    assert_eq!(
        parse_contracts("true->true", 0),
        Err(ParseError::ArityMismatch {
            clause: 0,
            expected: 0,
            actual: 1,
        })
    );
}

#[test]
fn empty_contract_list_has_single_unconstrained_branch() {
    let mut factory = InternedValueFactory::new();
    let states = evaluate(&[], &CallSite::static_call([]), &FactState::new(), &mut factory).unwrap();

    assert_eq!(states.len(), 1);
    assert!(states[0].imposed().is_empty());
    let value = states[0].return_value().unwrap();
    assert!(!value.is_constant());
}

#[test]
fn known_null_argument_selects_null_clause() {
    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let mut state = FactState::new();
    assert!(state.impose(&factory.equivalence(x, ValueId::NULL, false)));

    let contracts = parse_contracts("!null -> false; null -> true", 1).unwrap();
    let eval = ContractEvaluator::default()
        .evaluate(&contracts, &CallSite::static_call([x]), &state, &mut factory)
        .unwrap();

    let origins: Vec<_> = eval.branches.iter().map(|b| b.origin).collect();
    assert_eq!(origins, vec![BranchOrigin::Contract(1)]);
    assert_eq!(eval.diagnostics, vec![ContractDiagnostic::NeverSatisfied { index: 0 }]);
}

#[test]
fn exhaustive_nullity_contracts_keep_non_null_guarantee() {
    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let contracts = parse_contracts("null -> null; !null -> !null", 1).unwrap();

    // With x known to be null, only the first clause is live.
    let mut null_state = FactState::new();
    assert!(null_state.impose(&factory.equivalence(x, ValueId::NULL, false)));
    let states = evaluate(&contracts, &CallSite::static_call([x]), &null_state, &mut factory)
        .unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].return_value(), Some(ValueId::NULL));

    // With x known non-null, every surviving branch returns a non-null value.
    let mut non_null_state = FactState::new();
    assert!(non_null_state.impose(&factory.equivalence(x, ValueId::NULL, true)));
    let states = evaluate(&contracts, &CallSite::static_call([x]), &non_null_state, &mut factory)
        .unwrap();
    assert_eq!(states.len(), 1);
    for state in &states {
        let ret = state.return_value().unwrap();
        assert!(state.is_known_distinct(ret, ValueId::NULL));
    }
}

#[test]
fn receiver_does_not_affect_standard_contracts() {
    let mut factory = InternedValueFactory::new();
    let receiver = factory.fresh_value();
    let x = factory.fresh_value();
    let contracts = parse_contracts("null -> true", 1).unwrap();

    let with_receiver = evaluate(
        &contracts,
        &CallSite::new(Some(receiver), [x]),
        &FactState::new(),
        &mut factory,
    )
    .unwrap();
    assert_eq!(with_receiver.len(), 2);
}

#[test]
fn database_summary_drives_evaluation() {
    let mut db = ContractDatabase::new();
    db.register("Objects.requireNonNull", "null -> fail; _ -> !null", 1)
        .unwrap();
    db.register("broken", "null, _ -> true", 1).unwrap_err();

    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let site = CallSite::static_call([x]);

    let summary = db.get("Objects.requireNonNull").unwrap();
    let eval = ContractEvaluator::default()
        .evaluate(&summary.contracts, &site, &FactState::new(), &mut factory)
        .unwrap();
    assert_eq!(eval.branches.len(), 2);
    assert_eq!(eval.branches[0].outcome, BranchOutcome::Throws);
    assert!(eval.branches[0].state.known_constant(x) == Some(ValueId::NULL));
    assert_eq!(eval.absorbed_by, Some(1));

    // A contract-free callable behaves like an empty list.
    let broken = db.get("broken").unwrap();
    let states = evaluate(&broken.contracts, &site, &FactState::new(), &mut factory).unwrap();
    assert_eq!(states.len(), 1);
}

#[test]
fn redundant_clause_still_forks_its_own_branch() {
    let contracts = parse_contracts("null, _ -> fail; null, !null -> true", 2).unwrap();
    let signature = Signature::new(
        [ValueKind::Reference, ValueKind::Reference],
        ValueKind::Boolean,
    );
    assert_eq!(
        lint_contracts(&contracts, &signature),
        vec![ContractDiagnostic::Redundant {
            index: 1,
            covered_by: 0,
        }]
    );

    let mut factory = InternedValueFactory::new();
    let x = factory.fresh_value();
    let y = factory.fresh_value();
    let eval = ContractEvaluator::default()
        .evaluate(&contracts, &CallSite::static_call([x, y]), &FactState::new(), &mut factory)
        .unwrap();

    let origins: Vec<_> = eval.branches.iter().map(|b| b.origin).collect();
    assert_eq!(
        origins,
        vec![
            BranchOrigin::Contract(0),
            BranchOrigin::Contract(1),
            BranchOrigin::Default,
        ]
    );
    assert!(!eval
        .diagnostics
        .iter()
        .any(|d| matches!(d, ContractDiagnostic::Unreachable { .. })));
}
