//! Template function adapter.
//!
//! [`HitCounter`] ties a [`HitCounterConfig`] to a [`CounterStore`] and
//! exposes the `hitCounter` template function: given a key, it increments
//! the key's count and returns the rendered digits.
//!
//! Template engines register functions by name, so
//! [`HitCounter::template_functions`] returns a [`FuncMap`] that can be
//! merged into the engine's own function namespace.
//!
//! ```rust,no_run
//! use hitcounter::config::HitCounterConfig;
//! use hitcounter::function::HitCounter;
//!
//! let config: HitCounterConfig = "hitCounter {\n  style odometer\n  pad_digits 6\n}".parse()?;
//! let counter = HitCounter::provision(config);
//!
//! let functions = counter.template_functions();
//! let html = functions["hitCounter"]("index")?;
//! println!("{html}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::config::HitCounterConfig;
use crate::error::Result;
use crate::render::render;
use crate::store::CounterStore;

/// Name under which the template function is registered.
pub const FUNCTION_NAME: &str = "hitCounter";

/// Snapshot file used when no path is given.
pub const DEFAULT_PERSISTENCE_PATH: &str = "hitcounters.json";

/// A template function taking a key and returning markup.
pub type TemplateFn = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Template functions by name.
pub type FuncMap = HashMap<&'static str, TemplateFn>;

/// A provisioned hit counter.
///
/// Cloning is cheap and clones share the same counts.
#[derive(Debug, Clone)]
pub struct HitCounter {
    config: HitCounterConfig,
    store: CounterStore,
}

impl HitCounter {
    /// Provisions a counter persisted to [`DEFAULT_PERSISTENCE_PATH`].
    pub fn provision(config: HitCounterConfig) -> Self {
        Self::provision_at(config, DEFAULT_PERSISTENCE_PATH)
    }

    /// Provisions a counter persisted to `path` and loads its snapshot.
    ///
    /// Counters provisioned on the same path share their counts.
    pub fn provision_at(config: HitCounterConfig, path: impl Into<PathBuf>) -> Self {
        let store = CounterStore::new(path, config.initial_seed);
        store.load();
        Self { config, store }
    }

    /// Increments `key` and renders its new count.
    ///
    /// # Errors
    ///
    /// Fails if the new count could not be persisted. The count itself is
    /// kept in memory and can be read from the error.
    pub fn hit(&self, key: &str) -> Result<String> {
        let count = self.store.increment_and_get(key)?;
        Ok(self.render(count))
    }

    /// Like [`hit`](Self::hit), but renders the in-memory count when it
    /// could not be persisted. The failure is logged.
    pub fn hit_lossy(&self, key: &str) -> String {
        let count = match self.store.increment_and_get(key) {
            Ok(count) => count,
            Err(err) => {
                warn!(key, error = %err, "rendering unpersisted hit count");
                err.count
            }
        };
        self.render(count)
    }

    /// Renders `count` with this counter's style and pad width.
    pub fn render(&self, count: u64) -> String {
        render(count, self.config.pad_digits, &self.config.style)
    }

    /// Returns the function namespace to register with a template engine.
    pub fn template_functions(&self) -> FuncMap {
        let counter = self.clone();
        let hit: TemplateFn = Arc::new(move |key: &str| counter.hit(key));
        FuncMap::from([(FUNCTION_NAME, hit)])
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HitCounterConfig {
        &self.config
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &CounterStore {
        &self.store
    }
}
