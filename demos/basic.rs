//! Basic example of declaring and running properties.

use falsify::*;

fn main() -> std::result::Result<(), FalsifyError> {
    println!("Falsify Property-Based Testing Examples");
    println!();

    // Example 1: A property that holds
    println!("Testing integer property: x + 0 = x");
    let addition_prop = for_all(choose(-100, 100)?);
    match addition_prop.run(|&x| x + 0 == x)? {
        result @ TestResult::Pass { .. } => println!("{result}"),
        result => println!("Addition identity property failed: {result:?}"),
    }
    println!();

    // Example 2: A property that fails, to show shrinking
    println!("Testing property that should fail: all integers are below 50");
    let below_prop = for_all(choose(1, 100)?).named("below_fifty");
    match below_prop.run(|&n| n < 50)? {
        TestResult::Fail(failure) => {
            println!("Property failed as expected:");
            println!("  Original: {}", failure.original);
            println!("  Counterexample: {}", failure.counterexample);
            println!("  Found at iteration: {}", failure.iteration);
            println!("  Shrinks performed: {}", failure.shrinks_performed);
        }
        result => println!("Unexpected result: {result:?}"),
    }
    println!();

    // Example 3: Several generators at once
    println!("Testing tuple property: addition commutes");
    let pair_prop = for_all((int(), int()));
    println!("{}", pair_prop.run(|&(a, b)| a + b == b + a)?);

    Ok(())
}
