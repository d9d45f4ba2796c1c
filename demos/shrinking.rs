//! Example showing how failures shrink through combinators.

use falsify::*;

fn main() -> std::result::Result<(), FalsifyError> {
    println!("Testing shrinking through combinators");
    println!();

    // Mapped values shrink in the pre-image and stay even
    println!("Doubled naturals stay below 100 (should fail)");
    let doubled = for_all(nat().map(|n| n * 2)).named("doubled_below_100");
    println!("{}", doubled.run(|&n| n <= 100)?);
    println!();

    // Vectors shrink one position at a time, leftmost first
    println!("Triples of doubled naturals sum below 100 (should fail)");
    let triples = for_all(vector(3, map(|n| n * 2, nat()))).named("triple_sum");
    println!("{}", triples.run(|xs| xs.iter().sum::<i64>() <= 100)?);
    println!();

    // Sequences drop elements before shrinking them
    println!("Sequences never hold more than two elements (should fail)");
    let sequences = for_all(seq(choose(0, 9)?)).named("short_sequences");
    println!("{}", sequences.run(|xs| xs.len() <= 2)?);

    Ok(())
}
