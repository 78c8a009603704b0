//! Selector factory: small bound lookups into a compiled theme.
//!
//! Selectors are created ahead of time (typically at module scope,
//! alongside the component registration they describe) and only touch a
//! compiled theme when invoked. Creation never reads the registry, so a
//! selector may exist before its theme compiles, and the same selector
//! reads correctly from whichever compiled theme is active at render.

use crate::error::ThemeError;
use crate::theme::CompiledTheme;
use crate::value::Value;

/// Lookup factory bound to one component name.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use themery::{Mode, Selector, Theme};
///
/// let theme = Theme::builder("base").mode(Mode::Production).build();
/// theme
///     .register("Badge", |_| json!({"color": "gray"}))
///     .unwrap()
///     .add_variant("alert", |_| json!({"color": "red"}))
///     .unwrap();
///
/// // Created before compile; reads after.
/// let badge = Selector::new("Badge");
/// let color = badge.property("color");
/// let alert_color = badge.property_for("color", "alert");
///
/// let compiled = theme.compile().unwrap();
/// assert_eq!(color.read(&compiled).unwrap(), &json!("gray"));
/// assert_eq!(alert_color.read(&compiled).unwrap(), &json!("red"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    component: String,
}

impl Selector {
    /// Binds a selector factory to a component name.
    ///
    /// No validation happens here; an unknown component surfaces as
    /// [`ThemeError::UnknownComponent`] when a bound selector is read.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// The bound component name.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Binds a property key against the component's default variant.
    pub fn property(&self, property: impl Into<String>) -> BoundSelector {
        BoundSelector {
            component: self.component.clone(),
            variant: None,
            property: property.into(),
        }
    }

    /// Binds a property key against a named variant.
    pub fn property_for(
        &self,
        property: impl Into<String>,
        variant: impl Into<String>,
    ) -> BoundSelector {
        BoundSelector {
            component: self.component.clone(),
            variant: Some(variant.into()),
            property: property.into(),
        }
    }
}

/// A (component, variant, property) triple awaiting a compiled theme.
///
/// Pure function of the compiled theme it is handed; holds no state of its
/// own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSelector {
    component: String,
    variant: Option<String>,
    property: String,
}

impl BoundSelector {
    /// Reads the bound property from the active compiled theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownComponent`] when the component or
    /// variant is absent, and [`ThemeError::UnknownProperty`] when the
    /// property key is missing from the resolved mapping, meaning a style
    /// referencing a property its defaults never declared.
    pub fn read<'a>(&self, compiled: &'a CompiledTheme) -> Result<&'a Value, ThemeError> {
        compiled.value(&self.component, self.variant.as_deref(), &self.property)
    }
}
