//! Shrinking correctness properties
//!
//! The shrink search must only ever offer smaller values from the domain and
//! must converge on the minimal failure.

use crate::{arbitrary_seed, arbitrary_size, fast_config};
use falsify::*;

/// Property: every candidate is in the domain and differs from the value it came from
pub fn test_candidates_are_contained() {
    let gen = vector(4, choose(-50, 50).unwrap());
    let result = for_all((arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(size, seed)| {
            let mut seed = seed;
            let value = gen.sample(size, &mut seed);
            let distance = |v: &Vec<i64>| v.iter().map(|n| n.abs()).sum::<i64>();
            gen.shrink_candidates(&value).unwrap().into_iter().all(|candidate| {
                gen.contains(&candidate)
                    && candidate != value
                    && distance(candidate.output()) < distance(value.output())
            })
        });

    match result {
        Ok(TestResult::Pass { .. }) => println!("✓ Candidates are contained property passed"),
        other => panic!("Candidates are contained property failed: {other:?}"),
    }
}

/// Property: a vector that always fails shrinks to all zeros
pub fn test_vector_shrinking_converges() {
    let result = for_all((choose(0, 6).unwrap(), arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(count, size, seed)| {
            let gen = vector(usize::try_from(count).unwrap(), nat());
            let mut seed = seed;
            let failing = gen.sample(size, &mut seed);
            let minimal = minimize(&gen, failing, |_| true).unwrap();
            minimal.output().iter().all(|&n| n == 0)
        });

    match result {
        Ok(TestResult::Pass { .. }) => println!("✓ Vector shrinking convergence property passed"),
        other => panic!("Vector shrinking convergence property failed: {other:?}"),
    }
}

/// Property: a sequence that always fails shrinks to the empty sequence
pub fn test_seq_shrinking_converges() {
    let gen = seq(int());
    let result = for_all((arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(size, seed)| {
            let mut seed = seed;
            let failing = gen.sample(size, &mut seed);
            let mut search = ShrinkSearch::new(&gen, failing);
            while search.is_searching() {
                search.step(|_| true).unwrap();
            }
            search.current().output().is_empty()
        });

    match result {
        Ok(TestResult::Pass { .. }) => println!("✓ Seq shrinking convergence property passed"),
        other => panic!("Seq shrinking convergence property failed: {other:?}"),
    }
}

/// Property: the driver reports exactly the smallest natural at or above a threshold
pub fn test_driver_finds_threshold() {
    let result = for_all((choose(0, 40).unwrap(), choose(0, 10000).unwrap()))
        .with_config(Config::default().with_tests(20).with_seed(99))
        .run(|&(threshold, seed)| {
            let inner = for_all(nat())
                .with_config(Config::default().with_seed(seed.unsigned_abs()))
                .run(|&n| n < threshold);
            matches!(
                inner,
                Ok(TestResult::Fail(ref failure)) if failure.counterexample == threshold
            )
        });

    match result {
        Ok(TestResult::Pass { .. }) => println!("✓ Driver finds threshold property passed"),
        other => panic!("Driver finds threshold property failed: {other:?}"),
    }
}
