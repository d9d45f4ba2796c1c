//! Generated values and their provenance.

use std::fmt;

/// Identifies which generator or combinator produced a value.
///
/// Purely diagnostic: shrinking never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorTag {
    Choose,
    Nat,
    Int,
    Constant,
    Map,
    Vector,
    Seq,
    Tuple,
}

impl fmt::Display for GeneratorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorTag::Choose => "choose",
            GeneratorTag::Nat => "nat",
            GeneratorTag::Int => "int",
            GeneratorTag::Constant => "constant",
            GeneratorTag::Map => "map",
            GeneratorTag::Vector => "vector",
            GeneratorTag::Seq => "seq",
            GeneratorTag::Tuple => "tuple",
        };
        f.write_str(name)
    }
}

/// A value handed to the predicate, together with what it was derived from.
///
/// `output` is what the predicate sees. `input` is the provenance a generator
/// needs to propose a simpler value: the value itself for primitive
/// generators, the inner generator's whole value for `map`, and one value per
/// position for `vector`. Shrinking works on `input` only and always builds a
/// new value.
///
/// Equality compares `input` alone, so two values with equal outputs but
/// different provenance are distinct.
#[derive(Clone)]
pub struct GeneratedValue<T, I = T> {
    output: T,
    input: I,
    origin: GeneratorTag,
}

impl<T, I> GeneratedValue<T, I> {
    pub fn new(output: T, input: I, origin: GeneratorTag) -> Self {
        GeneratedValue {
            output,
            input,
            origin,
        }
    }

    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn origin(&self) -> GeneratorTag {
        self.origin
    }

    pub fn into_output(self) -> T {
        self.output
    }

    /// Split into `(output, input)`.
    pub fn into_parts(self) -> (T, I) {
        (self.output, self.input)
    }
}

impl<T: Clone> GeneratedValue<T, T> {
    /// A value that is its own provenance, as produced by primitive generators.
    pub fn from_value(value: T, origin: GeneratorTag) -> Self {
        GeneratedValue {
            output: value.clone(),
            input: value,
            origin,
        }
    }
}

impl<T, I: PartialEq> PartialEq for GeneratedValue<T, I> {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input
    }
}

impl<T: fmt::Debug, I: fmt::Debug> fmt::Debug for GeneratedValue<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedValue")
            .field("output", &self.output)
            .field("input", &self.input)
            .field("origin", &self.origin)
            .finish()
    }
}
