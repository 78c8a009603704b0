//! Component registry: default and variant factory storage.
//!
//! The registry accumulates, per component name, one default-value factory
//! and zero or more named variant factories. It is deliberately dumb
//! storage: ordering rules (default-before-variant) are enforced at merge
//! time, not registration time, so component modules may register variants
//! before the module providing the default has loaded.
//!
//! Re-registering the same component or (component, variant) pair replaces
//! the prior factory: last write wins, which is what development-mode hot
//! reload relies on.

use std::collections::HashMap;

use crate::value::StyleFactory;

/// A registered component: its default factory plus named variant overrides.
#[derive(Clone, Default)]
pub(crate) struct ComponentEntry {
    /// Factory producing the component's base property mapping.
    pub(crate) default: Option<StyleFactory>,
    /// Named partial overrides, merged onto the default at compile time.
    pub(crate) variants: HashMap<String, StyleFactory>,
}

impl std::fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("has_default", &self.default.is_some())
            .field("variants", &self.variants.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Per-theme accumulator of component entries.
///
/// Component and variant names are opaque strings; uniqueness holds within
/// one registry only. The registry never reads factories itself; all
/// evaluation is deferred to compile time, which makes inter-module
/// registration order irrelevant to the final resolved result.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    entries: HashMap<String, ComponentEntry>,
}

impl Registry {
    /// Inserts or replaces the default factory for a component.
    pub(crate) fn set_default(&mut self, component: &str, factory: StyleFactory) {
        let entry = self.entries.entry(component.to_string()).or_default();
        entry.default = Some(factory);
    }

    /// Inserts or replaces a named variant factory for a component.
    ///
    /// The entry is created on demand; the component may not have a default
    /// factory yet.
    pub(crate) fn set_variant(&mut self, component: &str, variant: &str, factory: StyleFactory) {
        let entry = self.entries.entry(component.to_string()).or_default();
        entry.variants.insert(variant.to_string(), factory);
    }

    /// Looks up a component entry by name.
    pub(crate) fn get(&self, component: &str) -> Option<&ComponentEntry> {
        self.entries.get(component)
    }

    /// Iterates all entries in unspecified order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &ComponentEntry)> {
        self.entries.iter()
    }

    /// Number of registered components.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
