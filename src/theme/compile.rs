//! Compile lifecycle and the resolved lookup table.
//!
//! Compilation is the single point where factories run: the registry's
//! entries are resolved against the theme's value tree into a
//! [`CompiledTheme`], an immutable table covering every (component, variant)
//! pair known at that moment.
//!
//! # Lifecycle
//!
//! `Open` → `Compiling` → `Compiled`. In production mode `Compiled` is
//! terminal: repeated compiles return the identical cached `Arc` and further
//! registrations are rejected. In development mode a registration flips the
//! theme back to `Open`, so the lifecycle loops between `Compiled` and
//! `Compiling` as the registry changes under hot reload.
//!
//! Resolution is pure: identical registry and value-tree state always
//! yields a deeply-equal compiled theme, regardless of registration order.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ThemeError;
use crate::value::{resolve, FlatMapping, Value};

use super::Theme;

/// Variant key under which a component's default mapping is stored.
pub const DEFAULT_VARIANT: &str = "default";

/// Lifecycle state of a theme's compile cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// Registrations accepted; no current compiled result.
    Open,
    /// Resolution in flight; re-entrant compiles observe the last result.
    Compiling,
    /// Current compiled result cached; registrations rejected in production.
    Compiled,
}

/// Immutable, fully resolved (component × variant) → property lookup table.
///
/// Produced by [`Theme::compile`] and handed out as `Arc<CompiledTheme>`;
/// production memoization is observable through `Arc::ptr_eq`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledTheme {
    namespace: String,
    resolved: HashMap<String, HashMap<String, FlatMapping>>,
}

impl CompiledTheme {
    /// Namespace of the theme this table was compiled from.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The resolved flat mapping for a component and variant.
    ///
    /// `None` selects the component's default mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownComponent`] when the component, or the
    /// named variant for it, did not exist in the registry at compile time.
    pub fn mapping(
        &self,
        component: &str,
        variant: Option<&str>,
    ) -> Result<&FlatMapping, ThemeError> {
        let variants = self
            .resolved
            .get(component)
            .ok_or_else(|| ThemeError::UnknownComponent {
                component: component.to_string(),
                variant: None,
            })?;
        let key = variant.unwrap_or(DEFAULT_VARIANT);
        variants
            .get(key)
            .ok_or_else(|| ThemeError::UnknownComponent {
                component: component.to_string(),
                variant: Some(key.to_string()),
            })
    }

    /// A single resolved property value.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownComponent`] for a missing component or
    /// variant, and [`ThemeError::UnknownProperty`] for a missing property
    /// key, meaning a style references a property its defaults never declared.
    pub fn value(
        &self,
        component: &str,
        variant: Option<&str>,
        property: &str,
    ) -> Result<&Value, ThemeError> {
        let mapping = self.mapping(component, variant)?;
        mapping
            .get(property)
            .ok_or_else(|| ThemeError::UnknownProperty {
                component: component.to_string(),
                variant: variant.unwrap_or(DEFAULT_VARIANT).to_string(),
                property: property.to_string(),
            })
    }

    /// Iterates the compiled component names.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.resolved.keys().map(|s| s.as_str())
    }

    /// Iterates the variant keys compiled for a component, including
    /// `"default"`. Empty for unknown components.
    pub fn variants(&self, component: &str) -> impl Iterator<Item = &str> {
        self.resolved
            .get(component)
            .into_iter()
            .flat_map(|table| table.keys().map(|s| s.as_str()))
    }

    /// Number of compiled components.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// True when no components were registered at compile time.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl Theme {
    /// Resolves the registry against the value tree into a [`CompiledTheme`].
    ///
    /// Once compiled, repeated calls return the cached result unchanged,
    /// referentially stable, so render loops can call this freely. In
    /// development mode a registration change reopens the theme and the next
    /// call recomputes.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownComponent`] if any component carries
    /// variants without a default factory. A failed compile leaves the theme
    /// `Open` so the mistake can be corrected and compilation retried.
    pub fn compile(&self) -> Result<Arc<CompiledTheme>, ThemeError> {
        {
            let state = self.inner.state.read().unwrap();
            if matches!(*state, Lifecycle::Compiled | Lifecycle::Compiling) {
                if let Some(cached) = self.inner.cache.read().unwrap().as_ref() {
                    return Ok(cached.clone());
                }
            }
        }

        *self.inner.state.write().unwrap() = Lifecycle::Compiling;
        match self.resolve_all() {
            Ok(compiled) => {
                let compiled = Arc::new(compiled);
                *self.inner.cache.write().unwrap() = Some(compiled.clone());
                *self.inner.state.write().unwrap() = Lifecycle::Compiled;
                self.inner.compiled_once.store(true, Ordering::Relaxed);
                tracing::debug!(
                    namespace = %self.namespace(),
                    components = compiled.len(),
                    "theme compiled"
                );
                Ok(compiled)
            }
            Err(err) => {
                *self.inner.state.write().unwrap() = Lifecycle::Open;
                Err(err)
            }
        }
    }

    /// Pure resolution pass over the effective registry.
    fn resolve_all(&self) -> Result<CompiledTheme, ThemeError> {
        let entries = self.union_entries();
        let globals = &self.inner.values;

        let mut resolved = HashMap::with_capacity(entries.len());
        for (component, entry) in entries {
            let default = entry
                .default
                .as_ref()
                .ok_or_else(|| ThemeError::UnknownComponent {
                    component: component.clone(),
                    variant: None,
                })?;

            let mut table = HashMap::with_capacity(entry.variants.len() + 1);
            table.insert(
                DEFAULT_VARIANT.to_string(),
                resolve(default, None, globals),
            );
            for (variant, factory) in &entry.variants {
                table.insert(variant.clone(), resolve(default, Some(factory), globals));
            }
            resolved.insert(component, table);
        }

        Ok(CompiledTheme {
            namespace: self.namespace().to_string(),
            resolved,
        })
    }
}
