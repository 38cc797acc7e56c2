//! Registry of named pipelines.

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::{
    config::HubConfig,
    error::{PipelineError, Result},
    pipeline::Pipeline,
};

/// Signature of a pipeline construction callback.
///
/// The callback receives a fresh [`Pipeline`] and the dispatched value, and
/// is expected to configure the pipeline and return its terminal result.
pub type PipelineCallback<T, R> = dyn Fn(Pipeline<T, R>, T) -> Result<R> + Send + Sync;

/// Registry that maps pipeline names to construction callbacks.
///
/// Cloning a hub shares its registrations. Registration and dispatch may
/// run concurrently from several threads.
pub struct Hub<T, R> {
    pipelines: Arc<DashMap<String, Arc<PipelineCallback<T, R>>>>,
    config: HubConfig,
}

impl<T, R> Clone for Hub<T, R> {
    fn clone(&self) -> Self {
        Self {
            pipelines: Arc::clone(&self.pipelines),
            config: self.config.clone(),
        }
    }
}

impl<T, R> Default for Hub<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Hub<T, R> {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self {
            pipelines: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Register a pipeline under `name`. An existing registration is replaced.
    pub fn register<F>(&self, name: impl Into<String>, callback: F)
    where
        F: Fn(Pipeline<T, R>, T) -> Result<R> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.pipelines.insert(name.clone(), Arc::new(callback)).is_some() {
            debug!("Replaced pipeline '{}'", name);
        } else {
            debug!("Registered pipeline '{}'", name);
        }
    }

    /// Register the pipeline used when a dispatch names none.
    pub fn register_default<F>(&self, callback: F)
    where
        F: Fn(Pipeline<T, R>, T) -> Result<R> + Send + Sync + 'static,
    {
        self.register(self.config.default_pipeline.clone(), callback);
    }

    /// Run `value` through the pipeline called `name`, or the default one.
    ///
    /// Fails with [`PipelineError::NotFound`] when nothing is registered
    /// under the name. Errors from the pipeline itself are returned as is.
    pub fn dispatch(&self, value: T, name: Option<&str>) -> Result<R> {
        let name = name.unwrap_or(&self.config.default_pipeline);

        // Clone the callback out so the map is not locked while it runs.
        let callback = self
            .pipelines
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| PipelineError::not_found(name))?;

        debug!("Dispatching to pipeline '{}'", name);
        (*callback)(Pipeline::with_config(&self.config.pipeline), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }

    /// Registered pipeline names, sorted.
    pub fn pipeline_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pipelines
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}
