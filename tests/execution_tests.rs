//! Deferred execution, live capture, and the two execution targets.

use std::cell::Cell;
use std::rc::Rc;

use lazyseq::prelude::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

#[test]
fn test_query_runs_at_enumeration_not_construction() {
    let numbers = Shared::new(vec![1]);
    let query = Sequence::from_shared(&numbers).select(|x| x * 10);
    numbers.push(2);
    assert_eq!(numbers.len(), 2);
    assert_eq!(query.to_vec().unwrap(), vec![10, 20]);
}

#[test]
fn test_captured_state_is_read_at_pull_time() {
    let factor = Shared::new(10);
    let f = factor.clone();
    let query = Sequence::from_vec(vec![1, 2]).select(move |x| x * f.get());
    factor.set(20);
    assert_eq!(query.to_vec().unwrap(), vec![20, 40]);

    factor.set(3);
    assert_eq!(query.to_vec().unwrap(), vec![3, 6]);
}

#[test]
fn test_construction_invokes_no_closures() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let query = Sequence::range(1, 100)
        .filter(move |x| {
            seen.set(seen.get() + 1);
            x % 2 == 0
        })
        .order_by(|x| -x)
        .into_sequence()
        .take(3);
    assert_eq!(calls.get(), 0);

    assert_eq!(query.to_vec().unwrap(), vec![100, 98, 96]);
    assert_eq!(calls.get(), 100);
}

#[test]
fn test_early_termination_pulls_only_what_it_needs() {
    let pulled = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulled);
    let naturals = Sequence::iterate(1u64, |x| x + 1).select(move |x| {
        counter.set(counter.get() + 1);
        x
    });
    assert_eq!(naturals.first_where(|x| x % 7 == 0).unwrap(), 7);
    assert_eq!(pulled.get(), 7);
    assert_eq!(naturals.take_while(|x| *x < 4).to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_reenumeration_is_idempotent() {
    let query = Sequence::from_vec(vec!["b", "a", "c", "a"])
        .distinct()
        .order_by(|s| *s)
        .into_sequence();
    let first = query.to_vec().unwrap();
    let second = query.to_vec().unwrap();
    assert_eq!(first, vec!["a", "b", "c"]);
    assert_eq!(first, second);
}

#[test]
fn test_single_pass_source_fails_on_reenumeration() {
    let once = Sequence::single_pass(vec![1, 2, 3]);
    assert_eq!(once.select(|x| x + 1).to_vec().unwrap(), vec![2, 3, 4]);
    assert!(matches!(once.to_vec(), Err(Error::ExhaustedSequence)));
}

#[test]
fn test_local_and_remote_targets_agree_on_the_chain() {
    // Stand-in for a database table: local evaluation reads the rows,
    // translation only names the source.
    let names = Sequence::remote("people", vec!["Tom", "Dick", "Harry", "Mary", "Jay"]);
    let query = names.filter(|n| n.len() > 4).describe("len(name) > 4");

    let engine = engine();
    assert_eq!(engine.local().execute(&query).unwrap(), vec!["Harry"]);

    let translated = engine.remote().execute(&query).unwrap();
    assert_eq!(translated.source, "people");
    assert_eq!(translated.operators(), vec!["where"]);
    assert_eq!(translated.dialect, "lazyseq-plan-v1");
    assert_eq!(translated.manifest.target, RunTarget::Remote);
    assert_eq!(translated.manifest.rows_out, None);

    // Client-side alternative: realize the source, then filter in process.
    let realized = Sequence::from_vec(engine.local().execute(&names).unwrap());
    assert_eq!(realized.filter(|n| n.len() > 4).to_vec().unwrap(), vec!["Harry"]);
}

#[test]
fn test_translation_never_invokes_closures() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let query = Sequence::remote("orders", vec![5, 12, 40])
        .filter(move |x| {
            seen.set(seen.get() + 1);
            *x > 10
        })
        .order_by_descending(|x| *x)
        .then_by(|x| x % 3)
        .into_sequence()
        .skip(1)
        .take(5);

    let translated = engine().translate_for_remote(&query).unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(translated.operators(), vec!["where", "order_by", "skip", "take"]);

    let json = translated.to_json().unwrap();
    assert!(json.contains("\"orders\""));
    assert!(json.contains("\"descending\""));
}

#[test]
fn test_translation_is_deterministic() {
    let build = || {
        Sequence::remote("items", vec![1, 2, 3])
            .select(|x| x * 2)
            .join(
                &Sequence::from_vec(vec![(2, "two")]),
                |x| *x,
                |(k, _)| *k,
                |x, (_, name)| (*x, *name),
            )
    };
    let engine = engine();
    let first = engine.translate_for_remote(&build()).unwrap();
    let second = engine.translate_for_remote(&build()).unwrap();
    assert_eq!(first.plan_hash, second.plan_hash);
    assert_eq!(first.program, second.program);
    assert_eq!(first.operators(), vec!["select", "join"]);
    assert_eq!(first.program.sources.len(), 2);
    assert_eq!(first.program.remote_sources(), vec!["items"]);

    let different = engine
        .translate_for_remote(&Sequence::remote("items", vec![1]).take(1))
        .unwrap();
    assert_ne!(first.plan_hash, different.plan_hash);
}

#[test]
fn test_translated_query_serializes() {
    let query = Sequence::remote("events", vec![1, 2, 3]).chunk(2);
    let translated = engine().translate_for_remote(&query).unwrap();
    let json = translated.to_json().unwrap();
    let decoded: TranslatedQuery = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.program, translated.program);
    assert_eq!(decoded.plan_hash, translated.plan_hash);
    assert_eq!(decoded.source, "events");
}

#[test]
fn test_local_only_chain_is_refused_for_translation() {
    let local = Sequence::from_vec(vec![1, 2, 3]).select(|x| x + 1);
    assert!(matches!(
        engine().remote().execute(&local),
        Err(ExecError::NotRemote)
    ));
    assert_eq!(engine().local().execute(&local).unwrap(), vec![2, 3, 4]);
}

#[test]
fn test_result_limit_stops_runaway_evaluation() {
    let engine = Engine::new(EngineConfig::default().with_result_limit(10)).unwrap();
    let unbounded = Sequence::iterate(0i64, |x| x + 1);
    assert!(matches!(
        engine.local().execute(&unbounded),
        Err(ExecError::ResultLimit { limit: 10 })
    ));
    let (rows, manifest) = engine.run_local(&unbounded.take(4)).unwrap();
    assert_eq!(rows, vec![0, 1, 2, 3]);
    assert_eq!(manifest.rows_out, Some(4));
}

#[test]
fn test_query_errors_surface_through_targets() {
    let query = Sequence::from_vec(vec![1, 2]).chunk(0);
    assert!(matches!(
        engine().local().execute(&query),
        Err(ExecError::Query(Error::InvalidArgument(_)))
    ));
}
