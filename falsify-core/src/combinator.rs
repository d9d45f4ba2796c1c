//! Generator combinators.
//!
//! Each combinator keeps the full value of what it wraps as its provenance,
//! so shrinking always happens in the innermost domain and the outer layers
//! are rebuilt on top of the shrunk value.

use std::fmt;

use crate::gen::{Generator, Sample};
use crate::{data::*, error::*, value::*};

/// Applies a pure function to the values of an inner generator.
///
/// The provenance of a mapped value is the inner generator's whole value, so
/// shrinking delegates to the inner generator and then re-applies the
/// function to its result.
#[derive(Clone)]
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<G, F> Map<G, F> {
    pub fn new(inner: G, f: F) -> Self {
        Map { inner, f }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: fmt::Debug, F> fmt::Debug for Map<G, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").field("inner", &self.inner).finish()
    }
}

impl<G, F, B> Map<G, F>
where
    G: Generator,
    F: Fn(G::Output) -> B,
    B: Clone + fmt::Debug,
{
    fn wrap(&self, inner: Sample<G>) -> GeneratedValue<B, Sample<G>> {
        let output = (self.f)(inner.output().clone());
        GeneratedValue::new(output, inner, GeneratorTag::Map)
    }
}

impl<G, F, B> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Output) -> B,
    B: Clone + fmt::Debug,
{
    type Output = B;
    type Input = Sample<G>;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        self.wrap(self.inner.sample(size, source))
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        let shrunk = self.inner.shrink(value.input())?;
        Ok(self.wrap(shrunk))
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        self.inner.contains(value.input())
    }

    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        Ok(self
            .inner
            .shrink_candidates(value.input())?
            .into_iter()
            .map(|candidate| self.wrap(candidate))
            .collect())
    }
}

/// A fixed number of independent values from one element generator.
///
/// Shrinking works on one position at a time, leftmost first: the first
/// position that is not at its own fixed point is shrunk and every other
/// position is left as it was.
#[derive(Debug, Clone)]
pub struct Vector<G> {
    count: usize,
    element: G,
}

impl<G> Vector<G> {
    pub fn new(count: usize, element: G) -> Self {
        Vector { count, element }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<G: Generator> Vector<G> {
    fn check_value_to_shrink(&self, value: &Sample<Self>) -> Result<()> {
        if self.contains(value) {
            return Ok(());
        }
        Err(FalsifyError::domain(format!(
            "Cannot shrink {:?} because it is not a vector of {} valid elements",
            value.output(),
            self.count
        )))
    }
}

impl<G: Generator> Generator for Vector<G> {
    type Output = Vec<G::Output>;
    type Input = Vec<Sample<G>>;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        let elements = (0..self.count)
            .map(|_| self.element.sample(size, source))
            .collect();
        assemble(elements, GeneratorTag::Vector)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        self.check_value_to_shrink(value)?;

        for (position, element) in value.input().iter().enumerate() {
            let shrunk = self.element.shrink(element)?;
            if shrunk != *element {
                return Ok(replace_at(value, position, shrunk, GeneratorTag::Vector));
            }
        }
        Ok(value.clone())
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        value.input().len() == self.count
            && value
                .input()
                .iter()
                .all(|element| self.element.contains(element))
    }

    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        self.check_value_to_shrink(value)?;

        let mut candidates = Vec::new();
        for (position, element) in value.input().iter().enumerate() {
            for shrunk in self.element.shrink_candidates(element)? {
                candidates.push(replace_at(value, position, shrunk, GeneratorTag::Vector));
            }
        }
        Ok(candidates)
    }
}

/// A sequence whose length is bounded by the size.
///
/// Shrinks first by dropping an element, leftmost first, then by shrinking
/// elements in place, leftmost first.
#[derive(Debug, Clone)]
pub struct Seq<G> {
    element: G,
}

impl<G> Seq<G> {
    pub fn new(element: G) -> Self {
        Seq { element }
    }
}

impl<G: Generator> Generator for Seq<G> {
    type Output = Vec<G::Output>;
    type Input = Vec<Sample<G>>;

    fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
        let length = source.between(0, size.as_bound());
        let elements = (0..length)
            .map(|_| self.element.sample(size, source))
            .collect();
        assemble(elements, GeneratorTag::Seq)
    }

    fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
        Ok(self
            .shrink_candidates(value)?
            .into_iter()
            .next()
            .unwrap_or_else(|| value.clone()))
    }

    fn contains(&self, value: &Sample<Self>) -> bool {
        value
            .input()
            .iter()
            .all(|element| self.element.contains(element))
    }

    fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
        if !self.contains(value) {
            return Err(FalsifyError::domain(format!(
                "Cannot shrink {:?} because one of its elements is outside the element domain",
                value.output()
            )));
        }

        let elements = value.input();
        let mut candidates = Vec::with_capacity(elements.len());
        for position in 0..elements.len() {
            let mut shorter = elements.clone();
            shorter.remove(position);
            candidates.push(assemble(shorter, GeneratorTag::Seq));
        }
        for (position, element) in elements.iter().enumerate() {
            for shrunk in self.element.shrink_candidates(element)? {
                candidates.push(replace_at(value, position, shrunk, GeneratorTag::Seq));
            }
        }
        Ok(candidates)
    }
}

fn assemble<T: Clone, I>(
    elements: Vec<GeneratedValue<T, I>>,
    origin: GeneratorTag,
) -> GeneratedValue<Vec<T>, Vec<GeneratedValue<T, I>>> {
    let output = elements
        .iter()
        .map(|element| element.output().clone())
        .collect();
    GeneratedValue::new(output, elements, origin)
}

fn replace_at<T: Clone, I: Clone>(
    value: &GeneratedValue<Vec<T>, Vec<GeneratedValue<T, I>>>,
    position: usize,
    element: GeneratedValue<T, I>,
    origin: GeneratorTag,
) -> GeneratedValue<Vec<T>, Vec<GeneratedValue<T, I>>> {
    let mut elements = value.input().clone();
    elements[position] = element;
    assemble(elements, origin)
}

/// Tuples of generators shrink jointly: one component at a time, leftmost
/// first, holding the others fixed.
macro_rules! tuple_generator {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Generator),+> Generator for ($($name,)+) {
            type Output = ($($name::Output,)+);
            type Input = ($(Sample<$name>,)+);

            fn sample(&self, size: Size, source: &mut dyn RandomSource) -> Sample<Self> {
                let input = ($(self.$idx.sample(size, source),)+);
                let output = ($(input.$idx.output().clone(),)+);
                GeneratedValue::new(output, input, GeneratorTag::Tuple)
            }

            fn shrink(&self, value: &Sample<Self>) -> Result<Sample<Self>> {
                Ok(self
                    .shrink_candidates(value)?
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| value.clone()))
            }

            fn contains(&self, value: &Sample<Self>) -> bool {
                $(self.$idx.contains(&value.input().$idx))&&+
            }

            fn shrink_candidates(&self, value: &Sample<Self>) -> Result<Vec<Sample<Self>>> {
                let mut candidates = Vec::new();
                $(
                    for shrunk in self.$idx.shrink_candidates(&value.input().$idx)? {
                        let (mut output, mut input) = value.clone().into_parts();
                        output.$idx = shrunk.output().clone();
                        input.$idx = shrunk;
                        candidates.push(GeneratedValue::new(output, input, GeneratorTag::Tuple));
                    }
                )+
                Ok(candidates)
            }
        }
    };
}

tuple_generator!(A 0, B 1);
tuple_generator!(A 0, B 1, C 2);
tuple_generator!(A 0, B 1, C 2, D 3);

/// Apply `f` to every value of `inner`.
pub fn map<G, F, B>(f: F, inner: G) -> Map<G, F>
where
    G: Generator,
    F: Fn(G::Output) -> B,
    B: Clone + fmt::Debug,
{
    Map::new(inner, f)
}

/// Exactly `count` values of `element`.
pub fn vector<G: Generator>(count: usize, element: G) -> Vector<G> {
    Vector::new(count, element)
}

/// Between zero and size values of `element`.
pub fn seq<G: Generator>(element: G) -> Seq<G> {
    Seq::new(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::{choose, nat};

    fn double(n: i64) -> i64 {
        n * 2
    }

    #[test]
    fn test_map_keeps_pre_image() {
        let gen = nat().map(double);
        let mut seed = Seed::from_u64(12);
        for size in 0..60 {
            let value = gen.sample(Size::new(size), &mut seed);
            assert_eq!(*value.output(), double(*value.input().output()));
            assert_eq!(value.origin(), GeneratorTag::Map);
            assert!(gen.contains(&value));
        }
    }

    #[test]
    fn test_map_shrinks_in_inner_domain() {
        let gen = nat().map(double);
        let mut value = GeneratedValue::new(
            20,
            GeneratedValue::from_value(10, GeneratorTag::Nat),
            GeneratorTag::Map,
        );
        loop {
            let next = gen.shrink(&value).unwrap();
            assert_eq!(*next.output() % 2, 0);
            assert_eq!(*next.output(), double(*next.input().output()));
            if next == value {
                break;
            }
            value = next;
        }
        assert_eq!(*value.output(), 0);
    }

    #[test]
    fn test_map_over_map_keeps_every_layer() {
        let gen = choose(0, 10).unwrap().map(double).map(|n| format!("#{n}"));
        let value = GeneratedValue::new(
            "#8".to_string(),
            GeneratedValue::new(
                8,
                GeneratedValue::from_value(4, GeneratorTag::Choose),
                GeneratorTag::Map,
            ),
            GeneratorTag::Map,
        );
        let shrunk = gen.shrink(&value).unwrap();
        assert_eq!(shrunk.output(), "#6");
        assert_eq!(*shrunk.input().output(), 6);
        assert_eq!(*shrunk.input().input().output(), 3);
    }

    #[test]
    fn test_map_rejects_foreign_values() {
        let gen = choose(0, 10).unwrap().map(double);
        let value = GeneratedValue::new(
            40,
            GeneratedValue::from_value(20, GeneratorTag::Choose),
            GeneratorTag::Map,
        );
        assert!(!gen.contains(&value));
        assert!(matches!(
            gen.shrink(&value),
            Err(FalsifyError::Domain { .. })
        ));
    }

    #[test]
    fn test_vector_has_fixed_length() {
        let gen = vector(3, choose(0, 100).unwrap());
        let mut seed = Seed::from_u64(21);
        for size in 0..30 {
            let value = gen.sample(Size::new(size), &mut seed);
            assert_eq!(value.output().len(), 3);
            assert_eq!(value.input().len(), 3);
            assert!(gen.contains(&value));
        }
    }

    #[test]
    fn test_vector_shrinks_leftmost_position_first() {
        let element = choose(0, 100).unwrap();
        let gen = vector(3, &element);
        let elements = vec![
            GeneratedValue::from_value(0, GeneratorTag::Choose),
            GeneratedValue::from_value(5, GeneratorTag::Choose),
            GeneratedValue::from_value(9, GeneratorTag::Choose),
        ];
        let value = assemble(elements, GeneratorTag::Vector);
        let shrunk = gen.shrink(&value).unwrap();
        assert_eq!(shrunk.output(), &vec![0, 4, 9]);

        let candidates = gen.shrink_candidates(&value).unwrap();
        let outputs: Vec<_> = candidates.iter().map(|c| c.output().clone()).collect();
        assert_eq!(outputs, vec![vec![0, 4, 9], vec![0, 5, 8]]);
    }

    #[test]
    fn test_vector_shrink_converges_to_all_minimal() {
        let gen = vector(3, choose(0, 100).unwrap());
        let mut seed = Seed::from_u64(33);
        let mut value = gen.sample(Size::new(10), &mut seed);
        let mut steps = 0;
        loop {
            let next = gen.shrink(&value).unwrap();
            assert!(gen.contains(&next));
            if next == value {
                break;
            }
            value = next;
            steps += 1;
            assert!(steps <= 300);
        }
        assert_eq!(value.output(), &vec![0, 0, 0]);
    }

    #[test]
    fn test_vector_of_mapped_naturals() {
        let gen = vector(3, nat().map(double));
        let mut seed = Seed::from_u64(44);
        let mut value = gen.sample(Size::new(50), &mut seed);
        assert!(value.output().iter().all(|n| n % 2 == 0));
        loop {
            let next = gen.shrink(&value).unwrap();
            assert!(next.output().iter().all(|n| n % 2 == 0));
            for element in next.input() {
                assert_eq!(*element.output(), double(*element.input().output()));
            }
            if next == value {
                break;
            }
            value = next;
        }
        assert_eq!(value.output(), &vec![0, 0, 0]);
    }

    #[test]
    fn test_vector_rejects_wrong_length() {
        let gen = vector(2, choose(0, 5).unwrap());
        let value = assemble(
            vec![GeneratedValue::from_value(1, GeneratorTag::Choose)],
            GeneratorTag::Vector,
        );
        assert!(!gen.contains(&value));
        assert!(gen.shrink(&value).is_err());
        assert!(gen.shrink_candidates(&value).is_err());
    }

    #[test]
    fn test_empty_vector_is_minimal() {
        let gen = vector(0, choose(0, 5).unwrap());
        let mut seed = Seed::from_u64(1);
        let value = gen.sample(Size::new(10), &mut seed);
        assert!(value.output().is_empty());
        assert_eq!(gen.shrink(&value).unwrap(), value);
    }

    #[test]
    fn test_seq_is_bounded_by_size_and_shrinks_by_removal() {
        let gen = seq(choose(0, 9).unwrap());
        let mut seed = Seed::from_u64(55);
        for size in 0..20 {
            let value = gen.sample(Size::new(size), &mut seed);
            assert!(value.output().len() <= size);
            assert!(gen.contains(&value));
        }

        let value = assemble(
            vec![
                GeneratedValue::from_value(3, GeneratorTag::Choose),
                GeneratedValue::from_value(4, GeneratorTag::Choose),
            ],
            GeneratorTag::Seq,
        );
        let outputs: Vec<_> = gen
            .shrink_candidates(&value)
            .unwrap()
            .into_iter()
            .map(|c| c.into_output())
            .collect();
        assert_eq!(outputs, vec![vec![4], vec![3], vec![2, 4], vec![3, 3]]);
        assert_eq!(gen.shrink(&value).unwrap().output(), &vec![4]);
    }

    #[test]
    fn test_tuple_shrinks_one_component_at_a_time() {
        let gen = (choose(0, 10).unwrap(), nat().map(double));
        let value = GeneratedValue::new(
            (3, 8),
            (
                GeneratedValue::from_value(3, GeneratorTag::Choose),
                GeneratedValue::new(
                    8,
                    GeneratedValue::from_value(4, GeneratorTag::Nat),
                    GeneratorTag::Map,
                ),
            ),
            GeneratorTag::Tuple,
        );
        assert!(gen.contains(&value));
        let outputs: Vec<_> = gen
            .shrink_candidates(&value)
            .unwrap()
            .into_iter()
            .map(|c| *c.output())
            .collect();
        assert_eq!(outputs, vec![(2, 8), (3, 6)]);
        assert_eq!(*gen.shrink(&value).unwrap().output(), (2, 8));
    }

    #[test]
    fn test_triple_samples_every_component() {
        let gen = (nat(), choose(5, 6).unwrap(), vector(2, nat()));
        let mut seed = Seed::from_u64(66);
        let value = gen.sample(Size::new(4), &mut seed);
        let (a, b, c) = value.output();
        assert!((0..=4).contains(a));
        assert!((5..=6).contains(b));
        assert_eq!(c.len(), 2);
        assert!(gen.contains(&value));
    }
}
