//! Error and outcome types for falsify.

use std::fmt;
use thiserror::Error;

/// Errors that terminate a property run or a generator construction.
///
/// A failing predicate is not an error: it is reported through
/// [`TestResult::Fail`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FalsifyError {
    /// A generator was constructed with arguments outside its accepted domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A value was handed to a generator that could not have produced it.
    #[error("Domain error: {message}")]
    Domain { message: String },

    /// An observer could not record an event.
    #[error("Observer failed: {message}")]
    Observer { message: String },
}

impl FalsifyError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        FalsifyError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        FalsifyError::Domain {
            message: message.into(),
        }
    }

    pub fn observer(message: impl fmt::Display) -> Self {
        FalsifyError::Observer {
            message: message.to_string(),
        }
    }
}

/// Steps shown at the start and at the end of a long shrinking progression.
const SHOWN_STEPS: usize = 5;

/// Result type for falsify operations.
pub type Result<T> = std::result::Result<T, FalsifyError>;

/// A shrinking step in the failure progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkStep {
    /// The counterexample value at this step.
    pub counterexample: String,
    /// The step number (0 = original, 1+ = accepted shrinks).
    pub step: usize,
}

/// Report for a property that was falsified.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<T> {
    /// The locally minimal counterexample.
    pub counterexample: T,
    /// The value that first failed, before shrinking.
    pub original: T,
    /// 1-based iteration at which the failure was first found.
    pub iteration: usize,
    /// Number of accepted shrinks.
    pub shrinks_performed: usize,
    /// Why the predicate rejected the minimal counterexample.
    pub reason: String,
    /// Seed of the run's random stream, when it was drawn from a seed.
    pub seed: Option<u64>,
    /// The shrinking progression showing how we reached the minimal counterexample.
    pub shrink_steps: Vec<ShrinkStep>,
    /// Name given with `Property::named`, used as the report heading.
    pub property_name: Option<String>,
    /// Shrinking ended on `Config::shrink_limit` before reaching a minimal value.
    pub shrink_limit_reached: bool,
    /// Shrinking ended on a stop request before reaching a minimal value.
    pub shrink_stopped: bool,
}

impl<T> Failure<T> {
    /// Whether shrinking ran until no smaller failing value was left.
    pub fn is_minimal(&self) -> bool {
        !self.shrink_limit_reached && !self.shrink_stopped
    }
}

/// Outcome of a property run.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult<T> {
    /// Every iteration passed.
    Pass {
        tests_run: usize,
        property_name: Option<String>,
    },

    /// A counterexample was found and shrunk.
    Fail(Failure<T>),

    /// The run was stopped before any failure was found.
    Stopped {
        tests_run: usize,
        property_name: Option<String>,
    },
}

impl<T> TestResult<T> {
    /// True when every iteration ran and passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    /// The failure report, if the property was falsified.
    pub fn failure(&self) -> Option<&Failure<T>> {
        match self {
            TestResult::Fail(failure) => Some(failure),
            _ => None,
        }
    }

    /// The minimal counterexample, if the property was falsified.
    pub fn counterexample(&self) -> Option<&T> {
        self.failure().map(|failure| &failure.counterexample)
    }

    /// Number of iterations that were executed.
    pub fn tests_run(&self) -> usize {
        match self {
            TestResult::Pass { tests_run, .. } | TestResult::Stopped { tests_run, .. } => {
                *tests_run
            }
            TestResult::Fail(failure) => failure.iteration,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for TestResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                tests_run,
                property_name,
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)
            }
            TestResult::Stopped {
                tests_run,
                property_name,
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(
                    f,
                    "  ⚐ {} stopped after {} tests with no failure found.",
                    prop_name, tests_run
                )
            }
            TestResult::Fail(failure) => {
                let prop_name = failure.property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ✗ {} failed after {} tests and {} shrinks.",
                    prop_name, failure.iteration, failure.shrinks_performed
                )?;

                if !failure.shrink_steps.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "    Shrinking progression:")?;
                    let steps = &failure.shrink_steps;
                    if steps.len() > 2 * SHOWN_STEPS {
                        write_steps(f, &steps[..SHOWN_STEPS])?;
                        writeln!(
                            f,
                            "      │ … {} steps omitted",
                            steps.len() - 2 * SHOWN_STEPS
                        )?;
                        write_steps(f, &steps[steps.len() - SHOWN_STEPS..])?;
                    } else {
                        write_steps(f, steps)?;
                    }
                    writeln!(f)?;
                }

                writeln!(f, "    === {} ===", failure.reason)?;
                if let Some(seed) = failure.seed {
                    writeln!(f, "    Replay with seed {}", seed)?;
                }
                if failure.shrink_limit_reached {
                    write!(
                        f,
                        "    Shrink limit reached; counterexample may not be minimal: {:?}",
                        failure.counterexample
                    )
                } else if failure.shrink_stopped {
                    write!(
                        f,
                        "    Stopped while shrinking; counterexample may not be minimal: {:?}",
                        failure.counterexample
                    )
                } else {
                    write!(f, "    Minimal counterexample: {:?}", failure.counterexample)
                }
            }
        }
    }
}

fn write_steps(f: &mut fmt::Formatter<'_>, steps: &[ShrinkStep]) -> fmt::Result {
    for step in steps {
        if step.step == 0 {
            writeln!(f, "      │ Original: {}", step.counterexample)?;
        } else {
            writeln!(f, "      │ Step {}: {}", step.step, step.counterexample)?;
        }
    }
    Ok(())
}
