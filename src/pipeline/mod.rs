//! Pipeline engine
//!
//! A [`Pipeline`] carries one traveler through an ordered list of stages.
//! Each stage receives the traveler and a [`Next`] handle to the rest of the
//! chain; the last stage hands off to the destination passed to
//! [`Pipeline::then`].
//!
//! The chain is composed back to front: the destination is wrapped first,
//! then every stage wraps the continuation built before it. Every boundary
//! (each stage and the destination) routes an `Err` to the failure handler
//! when one is set, with the traveler as that boundary received it. The
//! handler's value is returned to the enclosing stage and the rest of the
//! chain below the failing boundary never runs.
//!
//! # Usage
//!
//! ```
//! use pipehub::{Pipeline, Stage};
//!
//! let result = Pipeline::new()
//!     .send(5)
//!     .through(vec![
//!         Stage::func(|x, next| next.run(x * 2)),
//!         Stage::func(|x, next| next.run(x + 1)),
//!     ])
//!     .then_return()
//!     .unwrap();
//!
//! assert_eq!(result, 11);
//! ```

pub mod stage;

use log::{debug, trace};
pub use stage::{DEFAULT_METHOD, IntoStages, Next, Pipe, Stage, StageFn};

use crate::{config::PipelineConfig, error::Result};

/// Signature of a failure handler: `(traveler at the failing boundary, error)`.
pub type FailureHandler<T, R> = dyn Fn(T, anyhow::Error) -> Result<R>;

type Continuation<'a, T, R> = Box<dyn Fn(T) -> Result<R> + 'a>;

/// Builder and executor for a single chain of stages.
///
/// Configuration calls take and return `self`. Terminal calls
/// ([`then`](Pipeline::then), [`then_return`](Pipeline::then_return)) borrow
/// the pipeline, so running it again rebuilds the same chain over the same
/// traveler.
pub struct Pipeline<T, R> {
    /// The traveler; `None` until `send` is called
    traveler: Option<T>,
    pipes: Vec<Stage<T, R>>,
    /// Method used to invoke object stages
    method: String,
    failure_handler: Option<Box<FailureHandler<T, R>>>,
}

impl<T, R> Default for Pipeline<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Pipeline<T, R> {
    pub fn new() -> Self {
        Self::with_config(&PipelineConfig::default())
    }

    pub fn with_config(config: &PipelineConfig) -> Self {
        Self {
            traveler: None,
            pipes: Vec::new(),
            method: config.method.clone(),
            failure_handler: None,
        }
    }

    /// Set the traveler.
    pub fn send(mut self, traveler: T) -> Self {
        self.traveler = Some(traveler);
        self
    }

    /// Replace the stage list. Stages set by earlier calls are discarded.
    pub fn through(mut self, stages: impl IntoStages<T, R>) -> Self {
        self.pipes = stages.into_stages();
        self
    }

    /// Append `stage` to the current list if `condition` holds.
    pub fn when(mut self, condition: bool, stage: Stage<T, R>) -> Self {
        if condition {
            self.pipes.push(stage);
        }
        self
    }

    /// Select the method used to invoke object stages.
    pub fn via(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the failure handler, replacing any previous one.
    ///
    /// With a handler set, every boundary clones the traveler before running
    /// so the handler can receive it, even when nothing fails. Large
    /// travelers are better sent behind an `Rc` or `Arc`.
    pub fn on_failure<H>(mut self, handler: H) -> Self
    where
        H: Fn(T, anyhow::Error) -> Result<R> + 'static,
    {
        self.failure_handler = Some(Box::new(handler));
        self
    }

    pub fn traveler(&self) -> Option<&T> {
        self.traveler.as_ref()
    }

    pub fn pipes(&self) -> &[Stage<T, R>] {
        &self.pipes
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn has_failure_handler(&self) -> bool {
        self.failure_handler.is_some()
    }
}

impl<T, R> Pipeline<T, R>
where
    T: Clone + Default,
{
    /// Run the chain and hand the final traveler to `destination`.
    ///
    /// Without a prior `send` the traveler is `T::default()`.
    pub fn then<D>(&self, destination: D) -> Result<R>
    where
        D: Fn(T) -> Result<R>,
    {
        let traveler = self.traveler.clone().unwrap_or_default();

        debug!(
            "Running pipeline with {} stage(s) via '{}'",
            self.pipes.len(),
            self.method
        );

        let pipeline = self.compose(destination);
        pipeline(traveler)
    }

    fn compose<'a, D>(&'a self, destination: D) -> Continuation<'a, T, R>
    where
        D: Fn(T) -> Result<R> + 'a,
    {
        let mut stack = self.prepare_destination(destination);
        for (idx, stage) in self.pipes.iter().enumerate().rev() {
            stack = self.carry(idx, stage, stack);
        }
        stack
    }

    fn prepare_destination<'a, D>(&'a self, destination: D) -> Continuation<'a, T, R>
    where
        D: Fn(T) -> Result<R> + 'a,
    {
        Box::new(move |traveler| {
            let snapshot = self.snapshot(&traveler);
            destination(traveler).or_else(|err| self.handle_failure(snapshot, err))
        })
    }

    fn carry<'a>(
        &'a self,
        idx: usize,
        stage: &'a Stage<T, R>,
        next: Continuation<'a, T, R>,
    ) -> Continuation<'a, T, R> {
        let invocation = stage.resolve(&self.method);
        Box::new(move |traveler| {
            trace!("Stage {} ({}) entered", idx + 1, stage.name());
            let snapshot = self.snapshot(&traveler);
            invocation
                .invoke(traveler, Next::new(next.as_ref()))
                .or_else(|err| self.handle_failure(snapshot, err))
        })
    }

    /// Copy of the traveler for the failure handler, taken only when one is set.
    fn snapshot(&self, traveler: &T) -> Option<T> {
        self.failure_handler.as_ref().map(|_| traveler.clone())
    }

    fn handle_failure(&self, snapshot: Option<T>, err: anyhow::Error) -> Result<R> {
        match (&self.failure_handler, snapshot) {
            (Some(handler), Some(traveler)) => handler(traveler, err),
            _ => Err(err),
        }
    }
}

impl<T> Pipeline<T, T>
where
    T: Clone + Default,
{
    /// Run the chain and return the final traveler.
    pub fn then_return(&self) -> Result<T> {
        self.then(Ok)
    }
}
