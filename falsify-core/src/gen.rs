//! The generator contract and the primitive generators.

use std::cmp::Ordering;
use std::fmt;

use crate::combinator::Map;
use crate::{data::*, error::*, value::*};

/// Smallest integer a generator bound may take.
pub const INT_MIN: i64 = i64::MIN;

/// Largest integer a generator bound may take.
pub const INT_MAX: i64 = i64::MAX;

/// The value type produced by generator `G`.
pub type Sample<G> = GeneratedValue<<G as Generator>::Output, <G as Generator>::Input>;

/// A source of test data that also knows how to simplify what it produced.
///
/// Generators are explicit, first-class values composed with combinators.
/// Every generator must keep its samples inside its own domain:
/// `contains(&sample(size, source))` holds for any size. `shrink` must be a
/// strictly decreasing step under an order with a well-founded minimum so
/// that repeated shrinking always reaches a fixed point.
pub trait Generator {
    /// What the predicate sees.
    type Output: Clone + fmt::Debug;
    /// What shrinking works on.
    type Input: Clone + fmt::Debug + PartialEq;

    /// Produce a value. Larger sizes bias towards larger values where the
    /// generator is size-aware.
    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self>;

    /// Return a strictly simpler value, or `value` unchanged when it is
    /// already minimal. Fails with [`FalsifyError::Domain`] when `value` is
    /// outside this generator's domain.
    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>>;

    /// Whether `value` belongs to this generator's domain.
    fn contains(&self, value: &Sample<Self>) -> bool;

    /// Every simpler value worth trying next, most preferred first.
    ///
    /// Defaults to the single result of [`Generator::shrink`]; empty at a
    /// fixed point. Composite generators offer one candidate per position.
    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        let candidate = self.shrink(value)?;
        if candidate == *value {
            Ok(Vec::new())
        } else {
            Ok(vec![candidate])
        }
    }

    /// Transform outputs with `f` while shrinking in this generator's domain.
    fn map<B, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> B,
        B: Clone + fmt::Debug,
    {
        Map::new(self, f)
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    type Output = G::Output;
    type Input = G::Input;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        (**self).sample(size, source)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        (**self).shrink(value)
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        (**self).contains(value)
    }

    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        (**self).shrink_candidates(value)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    type Output = G::Output;
    type Input = G::Input;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        (**self).sample(size, source)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        (**self).shrink(value)
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        (**self).contains(value)
    }

    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        (**self).shrink_candidates(value)
    }
}

/// Integers in a closed range, shrinking one unit at a time towards the
/// value of the range closest to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choose {
    lower_limit: i64,
    upper_limit: i64,
    shrink_target: i64,
}

impl Choose {
    /// Build a range from two bounds given in either order.
    ///
    /// Bounds are accepted from any integer type and must lie within
    /// [`INT_MIN`]`..=`[`INT_MAX`].
    pub fn new(x: impl Into<i128>, y: impl Into<i128>) -> Result<Self> {
        let (x, y) = (x.into(), y.into());
        let (Some(x), Some(y)) = (checked_limit(x), checked_limit(y)) else {
            return Err(FalsifyError::invalid_argument(format!(
                "lower limit ({x}) and upper limit ({y}) should be integers between {INT_MIN} and {INT_MAX}"
            )));
        };

        let lower_limit = x.min(y);
        let upper_limit = x.max(y);
        Ok(Choose {
            lower_limit,
            upper_limit,
            shrink_target: 0_i64.clamp(lower_limit, upper_limit),
        })
    }

    pub fn lower_limit(&self) -> i64 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> i64 {
        self.upper_limit
    }

    /// The fixed point of shrinking.
    pub fn shrink_target(&self) -> i64 {
        self.shrink_target
    }

    fn check_value_to_shrink(&self, value: &Sample<Self>) -> Result<()> {
        if self.contains(value) {
            return Ok(());
        }
        Err(FalsifyError::domain(format!(
            "Cannot shrink {} because it does not belong to the domain of integers between {} and {}",
            value.input(),
            self.lower_limit,
            self.upper_limit
        )))
    }
}

fn checked_limit(limit: i128) -> Option<i64> {
    if (i128::from(INT_MIN)..=i128::from(INT_MAX)).contains(&limit) {
        i64::try_from(limit).ok()
    } else {
        None
    }
}

impl Generator for Choose {
    type Output = i64;
    type Input = i64;

    fn sample(&self, _size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        let value = source.between(self.lower_limit, self.upper_limit);
        GeneratedValue::from_value(value, GeneratorTag::Choose)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        self.check_value_to_shrink(value)?;

        let current = *value.input();
        let next = match current.cmp(&self.shrink_target) {
            Ordering::Greater => current - 1,
            Ordering::Less => current + 1,
            Ordering::Equal => return Ok(value.clone()),
        };
        Ok(GeneratedValue::from_value(next, GeneratorTag::Choose))
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        (self.lower_limit..=self.upper_limit).contains(value.input())
    }
}

/// Natural numbers up to the current size, shrinking towards zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nat;

impl Generator for Nat {
    type Output = i64;
    type Input = i64;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        let value = source.between(0, size.as_bound());
        GeneratedValue::from_value(value, GeneratorTag::Nat)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        if !self.contains(value) {
            return Err(FalsifyError::domain(format!(
                "Cannot shrink {} because it is not a natural number",
                value.input()
            )));
        }

        match *value.input() {
            0 => Ok(value.clone()),
            n => Ok(GeneratedValue::from_value(n - 1, GeneratorTag::Nat)),
        }
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        *value.input() >= 0
    }
}

/// Integers within plus or minus the current size, shrinking towards zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int;

impl Generator for Int {
    type Output = i64;
    type Input = i64;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        let bound = size.as_bound();
        let value = source.between(-bound, bound);
        GeneratedValue::from_value(value, GeneratorTag::Int)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        let next = match value.input().cmp(&0) {
            Ordering::Greater => value.input() - 1,
            Ordering::Less => value.input() + 1,
            Ordering::Equal => return Ok(value.clone()),
        };
        Ok(GeneratedValue::from_value(next, GeneratorTag::Int))
    }

    fn contains(&self, _value: &Sample<Self>) -> bool {
        true
    }
}

/// Always the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant<T> {
    value: T,
}

impl<T> Generator for Constant<T>
where
    T: Clone + fmt::Debug + PartialEq,
{
    type Output = T;
    type Input = T;

    fn sample(&self, _size: Size, _source: &mut dyn RandomSource) -> Sample<Self> {
        GeneratedValue::from_value(self.value.clone(), GeneratorTag::Constant)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        if self.contains(value) {
            Ok(value.clone())
        } else {
            Err(FalsifyError::domain(format!(
                "Cannot shrink {:?} because the only value in the domain is {:?}",
                value.input(),
                self.value
            )))
        }
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        *value.input() == self.value
    }
}

/// Integers between `x` and `y` inclusive, in either order.
pub fn choose(x: impl Into<i128>, y: impl Into<i128>) -> Result<Choose> {
    Choose::new(x, y)
}

/// Natural numbers bounded by the size.
pub fn nat() -> Nat {
    Nat
}

/// Integers bounded by the size in both directions.
pub fn int() -> Int {
    Int
}

/// A generator that always produces `value`.
pub fn constant<T>(value: T) -> Constant<T>
where
    T: Clone + fmt::Debug + PartialEq,
{
    Constant { value }
}
