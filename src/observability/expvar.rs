//! Registry of named process variables, dumped by `/debug/vars`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use serde_json::Value;
use thiserror::Error;

/// A variable is a closure rendering its current value.
pub type Var = Arc<dyn Fn() -> Value + Send + Sync>;

#[derive(Debug, Error)]
pub enum VarError {
    #[error("variable {0:?} is already registered")]
    Duplicate(String),
}

/// Name-ordered set of published variables.
///
/// Publishing swaps in a new map so that a dump in progress keeps iterating
/// the set it started with.
pub struct VarRegistry {
    vars: ArcSwap<BTreeMap<String, Var>>,
}

impl VarRegistry {
    pub fn new() -> Self {
        Self {
            vars: ArcSwap::from_pointee(BTreeMap::new()),
        }
    }

    /// Registry preloaded with `cmdline`, `Goroutines` and `uptime_sec`.
    pub fn with_process_vars() -> Self {
        let registry = Self::new();
        let started = Instant::now();
        let defaults: [(&str, Var); 3] = [
            (
                "cmdline",
                Arc::new(|| Value::from(std::env::args().collect::<Vec<_>>())),
            ),
            ("Goroutines", Arc::new(|| Value::from(live_tasks()))),
            (
                "uptime_sec",
                Arc::new(move || Value::from(started.elapsed().as_secs_f64())),
            ),
        ];
        for (name, var) in defaults {
            // Fresh registry, names are distinct.
            let _ = registry.publish_var(name, var);
        }
        registry
    }

    /// Register `f` under `name`. Names are unique for the process lifetime.
    pub fn publish<F>(&self, name: &str, f: F) -> Result<(), VarError>
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.publish_var(name, Arc::new(f))
    }

    fn publish_var(&self, name: &str, var: Var) -> Result<(), VarError> {
        let mut duplicate = false;
        self.vars.rcu(|current| {
            duplicate = current.contains_key(name);
            if duplicate {
                return Arc::clone(current);
            }
            let mut next = BTreeMap::clone(current);
            next.insert(name.to_string(), Arc::clone(&var));
            Arc::new(next)
        });

        if duplicate {
            return Err(VarError::Duplicate(name.to_string()));
        }
        Ok(())
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.vars.load().get(name).map(|var| var())
    }

    pub fn names(&self) -> Vec<String> {
        self.vars.load().keys().cloned().collect()
    }

    /// The dump as a sequence of text chunks forming one JSON object.
    ///
    /// Each value is rendered only when its chunk is pulled, so the whole
    /// object never sits in memory at once.
    pub fn chunks(&self) -> impl Iterator<Item = String> + Send + 'static {
        let vars = self.vars.load_full();
        let names: Vec<String> = vars.keys().cloned().collect();

        let entries = names.into_iter().enumerate().map(move |(i, name)| {
            let value = vars.get(&name).map(|var| var()).unwrap_or(Value::Null);
            let separator = if i == 0 { "" } else { ",\n" };
            format!("{separator}{}: {value}", Value::String(name))
        });

        std::iter::once("{\n".to_string())
            .chain(entries)
            .chain(std::iter::once("\n}\n".to_string()))
    }
}

impl Default for VarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VarRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Number of live tasks on the current Tokio runtime, 0 outside one.
fn live_tasks() -> usize {
    tokio::runtime::Handle::try_current()
        .map(|handle| handle.metrics().num_alive_tasks())
        .unwrap_or(0)
}
