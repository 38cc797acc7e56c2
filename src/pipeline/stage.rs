//! Stage model for the pipeline
//!
//! A stage is one of three shapes:
//! - a plain function taking `(traveler, next)`
//! - an object exposing methods by name, selected with [`Pipeline::via`](super::Pipeline::via)
//! - an object used as a callable through [`Pipe::call`]
//!
//! The shape is resolved once per stage when the chain is composed.

use std::{any::type_name, fmt};

use crate::error::{PipelineError, Result};

/// Method name used to invoke object stages unless `via` selects another.
pub const DEFAULT_METHOD: &str = "handle";

/// Signature of a plain function stage.
pub type StageFn<T, R> = dyn Fn(T, Next<'_, T, R>) -> Result<R>;

/// Handle to the remainder of the chain, passed to every stage.
///
/// Calling [`run`](Next::run) hands the traveler to the next stage (or the
/// destination after the last stage). Not calling it ends the chain early
/// with whatever the stage returns.
pub struct Next<'a, T, R> {
    inner: &'a dyn Fn(T) -> Result<R>,
}

impl<'a, T, R> Next<'a, T, R> {
    pub(crate) fn new(inner: &'a dyn Fn(T) -> Result<R>) -> Self {
        Self { inner }
    }

    /// Continue the chain with `traveler`.
    pub fn run(&self, traveler: T) -> Result<R> {
        (self.inner)(traveler)
    }
}

impl<T, R> Clone for Next<'_, T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, R> Copy for Next<'_, T, R> {}

impl<T, R> fmt::Debug for Next<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Trait for object stages
///
/// Object stages expose methods by name. The pipeline asks
/// [`responds_to`](Pipe::responds_to) whether the active method exists and
/// then invokes it through [`dispatch`](Pipe::dispatch); when it does not,
/// the pipe is invoked directly through [`call`](Pipe::call).
///
/// Most pipes only implement [`handle`](Pipe::handle). A pipe answering to
/// another method overrides `responds_to` and `dispatch`:
///
/// ```
/// use pipehub::{Next, Pipe, Result};
///
/// struct Uppercase;
///
/// impl<R> Pipe<String, R> for Uppercase {
///     fn responds_to(&self, method: &str) -> bool {
///         method == "process"
///     }
///
///     fn dispatch(&self, _method: &str, text: String, next: Next<'_, String, R>) -> Result<R> {
///         next.run(text.to_uppercase())
///     }
/// }
/// ```
pub trait Pipe<T, R> {
    /// The `handle` method. Pipes that do not implement it are invoked
    /// through [`call`](Pipe::call) instead.
    fn handle(&self, traveler: T, next: Next<'_, T, R>) -> Result<R> {
        self.call(traveler, next)
    }

    /// Whether this pipe exposes a method called `method`.
    fn responds_to(&self, method: &str) -> bool {
        method == DEFAULT_METHOD
    }

    /// Invoke the method called `method`.
    fn dispatch(&self, method: &str, traveler: T, next: Next<'_, T, R>) -> Result<R> {
        if method == DEFAULT_METHOD {
            self.handle(traveler, next)
        } else {
            Err(PipelineError::missing_method(self.name(), method).into())
        }
    }

    /// Direct invocation, used for callable stages and as the fallback when
    /// the pipe does not respond to the active method.
    fn call(&self, _traveler: T, _next: Next<'_, T, R>) -> Result<R> {
        Err(PipelineError::not_callable(self.name()).into())
    }

    /// Name used in logs and errors
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// One processing unit of a pipeline.
///
/// Stages own their functions and pipes (`'static`), so a stage cannot
/// borrow from the caller's stack. Share state through `Rc`/`Arc` instead.
pub enum Stage<T, R> {
    /// Plain function, invoked as `f(traveler, next)`.
    Func(Box<StageFn<T, R>>),
    /// Method-bearing object, invoked through the active method.
    Object(Box<dyn Pipe<T, R>>),
    /// Object invoked directly through [`Pipe::call`].
    Callable(Box<dyn Pipe<T, R>>),
}

impl<T, R> Stage<T, R> {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(T, Next<'_, T, R>) -> Result<R> + 'static,
    {
        Self::Func(Box::new(f))
    }

    pub fn object<P>(pipe: P) -> Self
    where
        P: Pipe<T, R> + 'static,
    {
        Self::Object(Box::new(pipe))
    }

    pub fn callable<P>(pipe: P) -> Self
    where
        P: Pipe<T, R> + 'static,
    {
        Self::Callable(Box::new(pipe))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Func(_) => "fn",
            Self::Object(pipe) | Self::Callable(pipe) => pipe.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Func(_) => "func",
            Self::Object(_) => "object",
            Self::Callable(_) => "callable",
        }
    }

    /// Pick how this stage is invoked under `method`.
    pub(crate) fn resolve<'a>(&'a self, method: &'a str) -> Invocation<'a, T, R> {
        match self {
            Self::Func(f) => Invocation::Func(f.as_ref()),
            Self::Callable(pipe) => Invocation::Direct(pipe.as_ref()),
            Self::Object(pipe) if pipe.responds_to(method) => Invocation::Method {
                pipe: pipe.as_ref(),
                method,
            },
            Self::Object(pipe) => Invocation::Direct(pipe.as_ref()),
        }
    }
}

impl<T, R> fmt::Debug for Stage<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

/// A stage resolved against the active method.
pub(crate) enum Invocation<'a, T, R> {
    Func(&'a StageFn<T, R>),
    Method { pipe: &'a dyn Pipe<T, R>, method: &'a str },
    Direct(&'a dyn Pipe<T, R>),
}

impl<T, R> Invocation<'_, T, R> {
    pub(crate) fn invoke(&self, traveler: T, next: Next<'_, T, R>) -> Result<R> {
        match self {
            Self::Func(f) => f(traveler, next),
            Self::Method { pipe, method } => pipe.dispatch(method, traveler, next),
            Self::Direct(pipe) => pipe.call(traveler, next),
        }
    }
}

/// Conversion into a stage list, accepted by [`Pipeline::through`](super::Pipeline::through).
///
/// A single stage becomes a one-element list.
pub trait IntoStages<T, R> {
    fn into_stages(self) -> Vec<Stage<T, R>>;
}

impl<T, R> IntoStages<T, R> for Stage<T, R> {
    fn into_stages(self) -> Vec<Stage<T, R>> {
        vec![self]
    }
}

impl<T, R> IntoStages<T, R> for Vec<Stage<T, R>> {
    fn into_stages(self) -> Vec<Stage<T, R>> {
        self
    }
}

impl<T, R, const N: usize> IntoStages<T, R> for [Stage<T, R>; N] {
    fn into_stages(self) -> Vec<Stage<T, R>> {
        Vec::from(self)
    }
}
