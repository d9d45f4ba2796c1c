//! Generator contract properties
//!
//! Every generator must keep its samples inside its own domain, and shrinking
//! must never leave it.

use crate::{arbitrary_seed, arbitrary_size, fast_config};
use falsify::*;

fn expect_pass<T: std::fmt::Debug>(name: &str, result: Result<TestResult<T>>) {
    match result {
        Ok(TestResult::Pass { .. }) => println!("✓ {name} property passed"),
        other => panic!("{name} property failed: {other:?}"),
    }
}

/// Property: choose samples lie between its bounds, whichever order they come in
pub fn test_choose_samples_stay_in_range() {
    let result = for_all((int(), int(), arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(x, y, size, seed)| {
            let gen = choose(x, y).unwrap();
            let mut seed = seed;
            let value = gen.sample(size, &mut seed);
            gen.contains(&value) && (x.min(y)..=x.max(y)).contains(value.output())
        });
    expect_pass("choose stays in range", result);
}

/// Property: the widest range is usable and contains its samples
pub fn test_full_range_choose() {
    let gen = choose(INT_MIN, INT_MAX).unwrap();
    let result = for_all((arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(size, seed)| {
            let mut seed = seed;
            let value = gen.sample(size, &mut seed);
            gen.contains(&value)
        });
    expect_pass("full range choose", result);
}

/// Property: repeated shrinking stays in range and ends on the shrink target
pub fn test_choose_shrinks_to_target() {
    let result = for_all((int(), int(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(x, y, seed)| {
            let gen = choose(x, y).unwrap();
            let mut seed = seed;
            let mut current = gen.sample(Size::new(100), &mut seed);
            loop {
                let next = gen.shrink(&current).unwrap();
                if !gen.contains(&next) {
                    return false;
                }
                if next == current {
                    break;
                }
                current = next;
            }
            *current.output() == gen.shrink_target()
        });
    expect_pass("choose shrinks to target", result);
}

/// Property: mapped output is always the function applied to the provenance
pub fn test_map_output_follows_input() {
    let gen = nat().map(|n| n * 3 + 1);
    let result = for_all((arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(size, seed)| {
            let mut seed = seed;
            let mut value = gen.sample(size, &mut seed);
            loop {
                if *value.output() != value.input().output() * 3 + 1 {
                    return false;
                }
                let next = gen.shrink(&value).unwrap();
                if next == value {
                    return true;
                }
                value = next;
            }
        });
    expect_pass("map output follows input", result);
}

/// Property: vectors always have the requested length, before and after shrinking
pub fn test_vector_has_fixed_length() {
    let result = for_all((choose(0, 8).unwrap(), arbitrary_size(), arbitrary_seed()))
        .with_config(fast_config())
        .run(|&(count, size, seed)| {
            let count = usize::try_from(count).unwrap();
            let gen = vector(count, nat());
            let mut seed = seed;
            let value = gen.sample(size, &mut seed);
            let shrunk = gen.shrink(&value).unwrap();
            value.output().len() == count && shrunk.output().len() == count && gen.contains(&shrunk)
        });
    expect_pass("vector has fixed length", result);
}
