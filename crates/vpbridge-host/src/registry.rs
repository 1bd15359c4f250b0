use std::collections::BTreeMap;
use std::rc::Rc;

use vpbridge_protocol::{CallbackArgument, FunctionName};

use crate::error::Result;

/// A host function players may invoke by name.
pub type Callback = Rc<dyn Fn(&CallbackArgument)>;

/// Allow-list of host callbacks keyed by name.
///
/// Names follow the same alphanumeric rule as inbound `functionName`, so any
/// registered callback is reachable and nothing else is.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: BTreeMap<FunctionName, Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(&CallbackArgument) + 'static,
    {
        let name = FunctionName::parse(name)?;
        self.callbacks.insert(name, Rc::new(callback));
        Ok(())
    }

    /// Remove a callback. Returns true if one was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        match FunctionName::parse(name) {
            Ok(name) => self.callbacks.remove(&name).is_some(),
            Err(_) => false,
        }
    }

    /// Handle to the callback registered as `name`.
    pub fn get(&self, name: &FunctionName) -> Option<Callback> {
        self.callbacks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        FunctionName::parse(name)
            .map(|name| self.callbacks.contains_key(&name))
            .unwrap_or(false)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.callbacks.keys().map(FunctionName::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("names", &self.names())
            .finish()
    }
}
