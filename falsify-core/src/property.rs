//! The property driver: sampling iterations, failure detection and shrinking.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{Failure, ShrinkStep};
use crate::observer::Observer;
use crate::shrink::{ShrinkEvent, ShrinkSearch};
use crate::{data::*, error::*, gen::*};

/// Verdict of a single predicate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// The predicate rejected the value, with a description of why.
    Fail(String),
}

/// Anything a predicate may return.
///
/// `bool`, `()` and `Result<(), E>` are supported out of the box. A predicate
/// that panics, for instance through `assert!`, fails the same way one that
/// returns `false` does.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Outcome {
        if self {
            Outcome::Pass
        } else {
            Outcome::Fail("Boolean Condition".to_string())
        }
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Pass
    }
}

impl<E: fmt::Display> IntoOutcome for std::result::Result<(), E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(()) => Outcome::Pass,
            Err(error) => Outcome::Fail(error.to_string()),
        }
    }
}

/// Shared flag that asks a running property to stop.
///
/// Checked before every iteration and every shrink step. A run stopped before
/// finding a failure reports [`TestResult::Stopped`]; one stopped while
/// shrinking reports the smallest failure found so far.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type BoxedObserver<T> = Box<dyn Observer<T>>;

/// A property over the values of one generator, ready to run.
///
/// Several generators are combined by passing a tuple of them.
pub struct Property<G: Generator> {
    generator: G,
    config: Config,
    observers: Vec<BoxedObserver<G::Output>>,
    source: Option<Box<dyn RandomSource>>,
    stop: StopHandle,
    name: Option<String>,
}

impl<G: Generator> Property<G> {
    /// Create a property with the default configuration.
    pub fn new(generator: G) -> Self {
        Property {
            generator,
            config: Config::default(),
            observers: Vec::new(),
            source: None,
            stop: StopHandle::new(),
            name: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Name used when reporting results.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Attach an observer. Observers are notified in the order they were added.
    pub fn hook<O>(mut self, observer: O) -> Self
    where
        O: Observer<G::Output> + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Draw from `source` instead of a seeded stream.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: RandomSource + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Share an existing stop flag with this property.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// A handle that stops this property's run when triggered.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run the property against `predicate`.
    ///
    /// Returns an error only when the engine itself cannot go on: a generator
    /// was handed a value outside its domain, or an observer failed while the
    /// configuration asks for observer errors to propagate.
    pub fn run<P, R>(self, predicate: P) -> Result<TestResult<G::Output>>
    where
        P: Fn(&G::Output) -> R,
        R: IntoOutcome,
    {
        let Property {
            generator,
            config,
            observers,
            source,
            stop,
            name,
        } = self;

        let (mut source, seed): (Box<dyn RandomSource>, Option<u64>) = match source {
            Some(source) => (source, None),
            None => {
                let seed = config.seed.unwrap_or_else(Seed::random_value);
                let stream: Box<dyn RandomSource> = Box::new(Seed::from_u64(seed));
                (stream, Some(seed))
            }
        };

        let mut run = Run {
            config: &config,
            observers,
            stop: &stop,
            started: Instant::now(),
        };

        for index in 1..=config.test_limit {
            if run.should_stop() {
                info!(tests_run = index - 1, "property stopped before finding a failure");
                return Ok(TestResult::Stopped {
                    tests_run: index - 1,
                    property_name: name,
                });
            }

            let size = config.size_for(index);
            let value = generator.sample(size, &mut *source);
            run.notify(|observer| observer.on_iteration_start(index, size))?;

            match evaluate(&predicate, value.output()) {
                Outcome::Pass => {
                    run.notify(|observer| observer.on_iteration_result(index, true, value.output()))?;
                }
                Outcome::Fail(reason) => {
                    debug!(iteration = index, value = ?value.output(), %reason, "property falsified");
                    run.notify(|observer| {
                        observer.on_iteration_result(index, false, value.output())
                    })?;
                    let failure = run.shrink(&generator, &predicate, value, reason, index)?;
                    info!(
                        iteration = index,
                        shrinks = failure.shrinks_performed,
                        counterexample = ?failure.counterexample,
                        "property failed"
                    );
                    return Ok(TestResult::Fail(Failure {
                        seed,
                        property_name: name,
                        ..failure
                    }));
                }
            }
        }

        info!(tests_run = config.test_limit, "property passed");
        Ok(TestResult::Pass {
            tests_run: config.test_limit,
            property_name: name,
        })
    }
}

/// Start a property over the values of `generator`.
pub fn for_all<G: Generator>(generator: G) -> Property<G> {
    Property::new(generator)
}

/// Per-run state shared by the iteration loop and the shrink phase.
struct Run<'a, T> {
    config: &'a Config,
    observers: Vec<BoxedObserver<T>>,
    stop: &'a StopHandle,
    started: Instant,
}

impl<T> Run<'_, T> {
    fn should_stop(&self) -> bool {
        self.stop.is_stopped()
            || self
                .config
                .time_limit
                .is_some_and(|limit| self.started.elapsed() >= limit)
    }

    fn notify<F>(&mut self, mut event: F) -> Result<()>
    where
        F: FnMut(&mut BoxedObserver<T>) -> Result<()>,
    {
        for observer in &mut self.observers {
            if let Err(error) = event(observer) {
                if self.config.propagate_observer_errors {
                    return Err(error);
                }
                warn!(%error, "observer failed, continuing run");
            }
        }
        Ok(())
    }

    /// Shrink a failing value until it is minimal, the shrink limit is hit or
    /// the run is stopped.
    fn shrink<G, P, R>(
        &mut self,
        generator: &G,
        predicate: &P,
        failing: Sample<G>,
        reason: String,
        iteration: usize,
    ) -> Result<Failure<T>>
    where
        T: Clone + fmt::Debug,
        G: Generator<Output = T>,
        P: Fn(&T) -> R,
        R: IntoOutcome,
    {
        let original = failing.output().clone();
        let mut shrink_steps = vec![ShrinkStep {
            counterexample: format!("{original:?}"),
            step: 0,
        }];
        let mut reason = reason;
        let mut search = ShrinkSearch::new(generator, failing);
        let mut shrink_limit_reached = false;
        let mut shrink_stopped = false;

        while search.is_searching() {
            if search.shrinks() >= self.config.shrink_limit {
                debug!(limit = self.config.shrink_limit, "shrink limit reached");
                shrink_limit_reached = true;
                break;
            }
            if self.should_stop() {
                debug!("stopped while shrinking, reporting best known failure");
                shrink_stopped = true;
                break;
            }

            let event = search.step(|candidate| match evaluate(predicate, candidate) {
                Outcome::Pass => false,
                Outcome::Fail(why) => {
                    reason = why;
                    true
                }
            })?;

            if let ShrinkEvent::Shrunk { previous } = event {
                let current = search.current().output();
                shrink_steps.push(ShrinkStep {
                    counterexample: format!("{current:?}"),
                    step: search.shrinks(),
                });
                self.notify(|observer| observer.on_shrink_step(previous.output(), current))?;
            }
        }

        let shrinks_performed = search.shrinks();
        Ok(Failure {
            counterexample: search.into_current().into_output(),
            original,
            iteration,
            shrinks_performed,
            reason,
            seed: None,
            shrink_steps,
            property_name: None,
            shrink_limit_reached,
            shrink_stopped,
        })
    }
}

thread_local! {
    /// Set while this thread evaluates a predicate.
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the current panic hook so that panics caught from predicates stay off
/// stderr. Panics on other threads, or outside a predicate, still reach the
/// previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_PANICS.with(Cell::get) {
                debug!(location = ?info.location(), "predicate panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// Evaluate the predicate, turning a panic into a failure.
fn evaluate<T, P, R>(predicate: &P, value: &T) -> Outcome
where
    P: Fn(&T) -> R,
    R: IntoOutcome,
{
    install_quiet_hook();
    let outer = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let caught = panic::catch_unwind(AssertUnwindSafe(|| predicate(value)));
    QUIET_PANICS.with(|quiet| quiet.set(outer));

    match caught {
        Ok(result) => result.into_outcome(),
        Err(payload) => Outcome::Fail(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
