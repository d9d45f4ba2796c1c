//! Greedy shrink search over a failing value.
//!
//! The search starts from a value known to fail and repeatedly asks its
//! generator for simpler candidates. The first candidate that still fails
//! replaces the current value; when no candidate fails, or the generator has
//! none left, the current value is locally minimal. Each accepted candidate is
//! strictly smaller under the generator's well-founded order, so the search
//! always terminates.

use tracing::debug;

use crate::error::Result;
use crate::gen::{Generator, Sample};

/// Where a shrink search is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkState {
    Searching,
    Minimal,
}

/// What a single step of the search did.
#[derive(Debug)]
pub enum ShrinkEvent<T> {
    /// A smaller failing value was accepted. Holds the value it replaced.
    Shrunk { previous: T },
    /// No candidate failed; the current value is minimal.
    Minimal,
}

/// State of one shrink search.
///
/// The current value is always the best known failure: it only ever changes
/// to a candidate that has just been observed to fail.
pub struct ShrinkSearch<'g, G: Generator> {
    generator: &'g G,
    current: Sample<G>,
    state: ShrinkState,
    shrinks: usize,
}

impl<'g, G: Generator> ShrinkSearch<'g, G> {
    /// Start a search from a value that is known to fail.
    pub fn new(generator: &'g G, failing: Sample<G>) -> Self {
        ShrinkSearch {
            generator,
            current: failing,
            state: ShrinkState::Searching,
            shrinks: 0,
        }
    }

    pub fn state(&self) -> ShrinkState {
        self.state
    }

    pub fn is_searching(&self) -> bool {
        self.state == ShrinkState::Searching
    }

    /// The smallest failing value found so far.
    pub fn current(&self) -> &Sample<G> {
        &self.current
    }

    /// Number of accepted shrinks.
    pub fn shrinks(&self) -> usize {
        self.shrinks
    }

    /// Try the generator's candidates in order and keep the first one for
    /// which `fails` returns true.
    ///
    /// A domain error from the generator is returned as is and leaves the
    /// search untouched.
    pub fn step<F>(&mut self, mut fails: F) -> Result<ShrinkEvent<Sample<G>>>
    where
        F: FnMut(&G::Output) -> bool,
    {
        if self.state == ShrinkState::Minimal {
            return Ok(ShrinkEvent::Minimal);
        }

        for candidate in self.generator.shrink_candidates(&self.current)? {
            if candidate == self.current {
                continue;
            }
            if fails(candidate.output()) {
                debug!(
                    from = ?self.current.output(),
                    to = ?candidate.output(),
                    "accepted shrink"
                );
                let previous = std::mem::replace(&mut self.current, candidate);
                self.shrinks += 1;
                return Ok(ShrinkEvent::Shrunk { previous });
            }
        }

        self.state = ShrinkState::Minimal;
        Ok(ShrinkEvent::Minimal)
    }

    pub fn into_current(self) -> Sample<G> {
        self.current
    }
}

/// Shrink `failing` until it is locally minimal under `fails`.
pub fn minimize<G, F>(generator: &G, failing: Sample<G>, mut fails: F) -> Result<Sample<G>>
where
    G: Generator,
    F: FnMut(&G::Output) -> bool,
{
    let mut search = ShrinkSearch::new(generator, failing);
    while search.is_searching() {
        search.step(&mut fails)?;
    }
    Ok(search.into_current())
}
