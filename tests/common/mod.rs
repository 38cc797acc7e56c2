// Stages shared by the integration tests
#![allow(dead_code)]

use anyhow::bail;
use pipehub::{Next, Pipe, Result};

/// Doubles a number through `handle`.
pub struct NumberMultiplier;

impl<R> Pipe<i64, R> for NumberMultiplier {
    fn handle(&self, number: i64, next: Next<'_, i64, R>) -> Result<R> {
        next.run(number * 2)
    }
}

/// Applies an operation through `handle`.
pub struct DataProcessor<T> {
    operation: fn(T) -> T,
}

impl<T> DataProcessor<T> {
    pub fn new(operation: fn(T) -> T) -> Self {
        Self { operation }
    }
}

impl<T, R> Pipe<T, R> for DataProcessor<T> {
    fn handle(&self, data: T, next: Next<'_, T, R>) -> Result<R> {
        next.run((self.operation)(data))
    }
}

/// Callable object that prefixes every item.
pub struct ListFormatter;

impl<R> Pipe<Vec<String>, R> for ListFormatter {
    fn call(&self, items: Vec<String>, next: Next<'_, Vec<String>, R>) -> Result<R> {
        let formatted = items.iter().map(|item| format!("Item: {}", item)).collect();
        next.run(formatted)
    }
}

/// Uppercases through `process` only.
pub struct StringManipulator;

impl<R> Pipe<String, R> for StringManipulator {
    fn responds_to(&self, method: &str) -> bool {
        method == "process"
    }

    fn dispatch(&self, _method: &str, text: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(text.to_uppercase())
    }
}

/// Fails from `handle`.
pub struct ExceptionRaiser;

impl<T, R> Pipe<T, R> for ExceptionRaiser {
    fn handle(&self, _data: T, _next: Next<'_, T, R>) -> Result<R> {
        bail!("Intentional error for testing")
    }
}

/// Exposes both `handle` and `process`, tagging which one ran.
pub struct TwoFaced;

impl<R> Pipe<String, R> for TwoFaced {
    fn handle(&self, text: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(format!("{}:handle", text))
    }

    fn responds_to(&self, method: &str) -> bool {
        matches!(method, "handle" | "process")
    }

    fn dispatch(&self, method: &str, text: String, next: Next<'_, String, R>) -> Result<R> {
        match method {
            "process" => next.run(format!("{}:process", text)),
            _ => Pipe::<String, R>::handle(self, text, next),
        }
    }

    fn call(&self, text: String, next: Next<'_, String, R>) -> Result<R> {
        next.run(format!("{}:call", text))
    }
}

pub fn square(x: i64) -> i64 {
    x * x
}
