//! Composable component theming with variants, extension, and compile-time
//! resolution.
//!
//! A component-library author declares, per component, a set of named style
//! values with defaults, registers alternate "variant" overrides, and lets
//! downstream consumers extend both component variants and shared global
//! values. Everything resolves at one well-defined point, [`Theme::compile`],
//! into an immutable, namespaced lookup table that style-producing code
//! queries by component name, property key, and active variant.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use themery::{Mode, Theme, ThemeProvider, connect};
//!
//! // Library author: declare globals and register components.
//! let theme = Theme::builder("acme")
//!     .values(json!({"colors": {"primary": "#0af", "danger": "#f33"}}))
//!     .mode(Mode::Production)
//!     .build();
//!
//! theme
//!     .register("Button", |globals| json!({
//!         "background": globals["colors"]["primary"],
//!         "padding": {"x": 12, "y": 6},
//!     }))
//!     .unwrap()
//!     .add_variant("danger", |globals| json!({
//!         "background": globals["colors"]["danger"],
//!     }))
//!     .unwrap();
//!
//! // Consumer: extend the theme with overridden globals.
//! let branded = theme.extend("acme-dark", json!({"colors": {"primary": "#08c"}}));
//!
//! // Application: mount once, read resolved values at render.
//! let provider = ThemeProvider::mount(branded).unwrap();
//! let button = connect("Button", |values| values["background"].clone());
//!
//! assert_eq!(button.render_in(&provider).unwrap(), json!("#08c"));
//! assert_eq!(
//!     button.variant("danger").render_in(&provider).unwrap(),
//!     json!("#f33")
//! );
//! ```
//!
//! # Architecture
//!
//! - **Value model** ([`merge`], [`ValueTree`], [`FlatMapping`]): JSON-shaped
//!   data with a right-biased recursive merge: a variant overrides one
//!   nested value without restating the structure around it.
//! - **Registry**: per-theme accumulator of default and variant factories,
//!   populated as component modules load. Factories are functions of the
//!   global value tree, so definitions share values without importing them.
//! - **Compiler** ([`Theme::compile`], [`CompiledTheme`]): resolves every
//!   registered (component, variant) pair at mount. Production themes freeze
//!   on first compile and memoize; development themes reopen on every
//!   registration change and notify subscribers (hot reload).
//! - **Selectors** ([`Selector`]): pure lookup functions bound to a
//!   component and property, created ahead of time, evaluated against
//!   whichever compiled theme is active.
//! - **Provider boundary** ([`ThemeProvider`], [`connect`]): thin adapter
//!   feeding compiled themes to a host rendering layer.
//!
//! # Modes
//!
//! The lifecycle after the first compile depends on [`Mode`]: `Production`
//! freezes the registry so the theme cannot change shape after initial
//! render; `Development` keeps it open and recompiles on change. The default
//! follows the build profile and can be overridden process-wide with
//! [`set_mode_detector`] or per theme with [`ThemeBuilder::mode`].

mod error;
mod mode;
mod provider;
mod registry;
mod selector;
mod theme;
mod value;

pub use error::ThemeError;
pub use mode::{set_mode_detector, Mode};
pub use provider::{connect, set_redraw_callback, ConnectedComponent, ThemeProvider};
pub use selector::{BoundSelector, Selector};
pub use theme::{CompiledTheme, ComponentHandle, Theme, ThemeBuilder, DEFAULT_VARIANT};
pub use value::{merge, FlatMapping, StyleFactory, Value, ValueTree};
