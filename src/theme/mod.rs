//! Theme containers: registration, extension, and change notification.
//!
//! This module provides:
//!
//! - [`Theme`]: a namespaced container of global values plus a component
//!   registry, with a two-mode compile lifecycle
//! - [`ThemeBuilder`]: fluent construction with explicit mode override
//! - [`ComponentHandle`]: chainable builder returned from registration
//!
//! A theme is created by the library author at module scope; component
//! modules populate its registry as they load; it compiles exactly once per
//! mount in production, or after every registration change in development;
//! consumers may extend it any number of times, each extension being a
//! sibling theme with independent compile state.

mod compile;

pub use compile::{CompiledTheme, DEFAULT_VARIANT};
pub(crate) use compile::Lifecycle;

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::ThemeError;
use crate::mode::{detect_mode, Mode};
use crate::registry::{ComponentEntry, Registry};
use crate::selector::Selector;
use crate::value::{merge, FlatMapping, ValueTree};

type ChangeListener = Arc<dyn Fn(&Theme) + Send + Sync>;

/// A namespaced theme: global values plus a registry of component styles.
///
/// `Theme` is a cheap handle (clones share the same underlying state).
/// Registration goes through shared references, matching how component
/// modules accumulate entries at load time; all evaluation is deferred to
/// [`Theme::compile`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use themery::{Mode, Theme};
///
/// let theme = Theme::builder("base")
///     .values(json!({"colors": {"primary": "#0af"}}))
///     .mode(Mode::Production)
///     .build();
///
/// theme
///     .register("Button", |globals| json!({
///         "background": globals["colors"]["primary"],
///         "padding": 8,
///     }))
///     .unwrap()
///     .add_variant("quiet", |_| json!({"background": "transparent"}))
///     .unwrap();
///
/// let compiled = theme.compile().unwrap();
/// assert_eq!(
///     compiled.value("Button", None, "padding").unwrap(),
///     &json!(8)
/// );
/// assert_eq!(
///     compiled.value("Button", Some("quiet"), "background").unwrap(),
///     &json!("transparent")
/// );
/// ```
#[derive(Clone)]
pub struct Theme {
    inner: Arc<ThemeInner>,
}

pub(crate) struct ThemeInner {
    pub(crate) namespace: String,
    /// Global value tree. Immutable for the lifetime of this theme;
    /// extension produces a new merged tree on a new theme.
    pub(crate) values: ValueTree,
    pub(crate) mode: Mode,
    /// Parent theme when this instance was produced by [`Theme::extend`].
    /// Parent entries are read at compile time, never copied or mutated.
    pub(crate) parent: Option<Theme>,
    pub(crate) registry: RwLock<Registry>,
    pub(crate) state: RwLock<Lifecycle>,
    pub(crate) cache: RwLock<Option<Arc<CompiledTheme>>>,
    /// Whether this theme has compiled at least once. Change notifications
    /// only fire for registrations after the first compile.
    pub(crate) compiled_once: AtomicBool,
    pub(crate) listeners: Mutex<Vec<ChangeListener>>,
}

impl Theme {
    /// Creates a theme with the detected mode (see [`crate::set_mode_detector`]).
    pub fn new(namespace: impl Into<String>, values: ValueTree) -> Self {
        Self::builder(namespace).values(values).build()
    }

    /// Starts building a theme with an explicit configuration.
    pub fn builder(namespace: impl Into<String>) -> ThemeBuilder {
        ThemeBuilder {
            namespace: namespace.into(),
            values: ValueTree::Object(Default::default()),
            mode: None,
        }
    }

    /// The theme's namespace.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// The theme's compile mode.
    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    /// The theme's global value tree.
    pub fn values(&self) -> &ValueTree {
        &self.inner.values
    }

    /// Registers (or replaces) the default style factory for a component.
    ///
    /// Returns a [`ComponentHandle`] for chaining variant registrations and
    /// selector creation.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::AlreadyCompiled`] if this theme has compiled in
    /// production mode. In development mode the theme reopens and the change
    /// is picked up by the next compile.
    pub fn register<F>(
        &self,
        component: impl Into<String>,
        default: F,
    ) -> Result<ComponentHandle<'_>, ThemeError>
    where
        F: Fn(&ValueTree) -> FlatMapping + Send + Sync + 'static,
    {
        let component = component.into();
        self.ensure_open()?;
        self.inner
            .registry
            .write()
            .unwrap()
            .set_default(&component, Arc::new(default));
        self.notify_changed();
        Ok(ComponentHandle {
            theme: self,
            component,
        })
    }

    /// Registers (or replaces) a named variant factory for a component.
    ///
    /// The component's default factory does not have to exist yet; ordering
    /// is enforced at compile time, not here. Re-registering the same
    /// (component, variant) pair replaces the prior factory.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::AlreadyCompiled`] if this theme has compiled in
    /// production mode.
    pub fn register_variant<F>(
        &self,
        component: &str,
        variant: &str,
        factory: F,
    ) -> Result<(), ThemeError>
    where
        F: Fn(&ValueTree) -> FlatMapping + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.inner
            .registry
            .write()
            .unwrap()
            .set_variant(component, variant, Arc::new(factory));
        self.notify_changed();
        Ok(())
    }

    /// Subscribes to registration changes occurring after the first compile.
    ///
    /// This is the development-mode hot reload channel: the provider layer
    /// subscribes, recompiles on each notification, and propagates the new
    /// compiled theme to the host rendering layer.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&Theme) + Send + Sync + 'static,
    {
        self.inner.listeners.lock().unwrap().push(Arc::new(listener));
    }

    /// Derives a new theme inheriting this theme's registry and values.
    ///
    /// The child's value tree is `merge(parent_values, overrides)`; its
    /// registry starts empty but compilation reads the parent's entries
    /// (child registrations shadow or add). The parent is never mutated and
    /// remains independently compilable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use themery::{Mode, Theme};
    ///
    /// let parent = Theme::builder("base")
    ///     .values(json!({"colors": {"primary": "#000"}}))
    ///     .mode(Mode::Production)
    ///     .build();
    /// parent
    ///     .register("Link", |g| json!({"color": g["colors"]["primary"]}))
    ///     .unwrap();
    ///
    /// let child = parent.extend("brand", json!({"colors": {"primary": "#fff"}}));
    ///
    /// let child_compiled = child.compile().unwrap();
    /// assert_eq!(
    ///     child_compiled.value("Link", None, "color").unwrap(),
    ///     &json!("#fff")
    /// );
    ///
    /// // The parent still resolves against its own values.
    /// let parent_compiled = parent.compile().unwrap();
    /// assert_eq!(
    ///     parent_compiled.value("Link", None, "color").unwrap(),
    ///     &json!("#000")
    /// );
    /// ```
    pub fn extend(&self, namespace: impl Into<String>, overrides: ValueTree) -> Theme {
        Theme {
            inner: Arc::new(ThemeInner {
                namespace: namespace.into(),
                values: merge(&self.inner.values, &overrides),
                mode: self.inner.mode,
                parent: Some(self.clone()),
                registry: RwLock::new(Registry::default()),
                state: RwLock::new(Lifecycle::Open),
                cache: RwLock::new(None),
                compiled_once: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Validates that every component carrying variants also has a default.
    ///
    /// [`Theme::compile`] performs the same check; calling this explicitly
    /// allows early error detection before mount.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (component, entry) in self.union_entries() {
            if entry.default.is_none() {
                return Err(ThemeError::UnknownComponent {
                    component,
                    variant: None,
                });
            }
        }
        Ok(())
    }

    /// True once this theme holds a current compiled result.
    pub fn is_compiled(&self) -> bool {
        *self.inner.state.read().unwrap() == Lifecycle::Compiled
    }

    /// Collects the effective registry: parent chain entries unioned with
    /// this theme's own, nearer themes winning per component and variant.
    ///
    /// Returns a sorted map so resolution order is independent of both
    /// registration order and hash state.
    pub(crate) fn union_entries(&self) -> BTreeMap<String, ComponentEntry> {
        let mut chain: Vec<&Theme> = Vec::new();
        let mut cursor = Some(self);
        while let Some(theme) = cursor {
            chain.push(theme);
            cursor = theme.inner.parent.as_ref();
        }

        let mut union: BTreeMap<String, ComponentEntry> = BTreeMap::new();
        for theme in chain.into_iter().rev() {
            let registry = theme.inner.registry.read().unwrap();
            for (component, entry) in registry.entries() {
                let slot = union.entry(component.clone()).or_default();
                if let Some(default) = &entry.default {
                    slot.default = Some(default.clone());
                }
                for (variant, factory) in &entry.variants {
                    slot.variants.insert(variant.clone(), factory.clone());
                }
            }
        }
        union
    }

    /// Rejects or reopens registration depending on lifecycle and mode.
    fn ensure_open(&self) -> Result<(), ThemeError> {
        let mut state = self.inner.state.write().unwrap();
        if *state == Lifecycle::Compiled {
            match self.inner.mode {
                Mode::Production => {
                    return Err(ThemeError::AlreadyCompiled {
                        namespace: self.inner.namespace.clone(),
                    });
                }
                Mode::Development => {
                    tracing::debug!(
                        namespace = %self.inner.namespace,
                        "registration after compile; reopening theme"
                    );
                    *state = Lifecycle::Open;
                }
            }
        }
        Ok(())
    }

    /// Fires change listeners, but only once the theme has compiled.
    fn notify_changed(&self) {
        if !self
            .inner
            .compiled_once
            .load(std::sync::atomic::Ordering::Relaxed)
        {
            return;
        }
        let listeners: Vec<ChangeListener> = self.inner.listeners.lock().unwrap().clone();
        for listener in &listeners {
            listener(self);
        }
    }
}

impl std::fmt::Debug for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Theme")
            .field("namespace", &self.inner.namespace)
            .field("mode", &self.inner.mode)
            .field("state", &*self.inner.state.read().unwrap())
            .field("components", &self.inner.registry.read().unwrap().len())
            .field("extended", &self.inner.parent.is_some())
            .finish()
    }
}

/// Fluent builder for [`Theme`].
#[derive(Debug)]
pub struct ThemeBuilder {
    namespace: String,
    values: ValueTree,
    mode: Option<Mode>,
}

impl ThemeBuilder {
    /// Sets the global value tree (a JSON object).
    pub fn values(mut self, values: ValueTree) -> Self {
        self.values = values;
        self
    }

    /// Overrides the detected mode for this theme.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builds the theme in the `Open` lifecycle state.
    pub fn build(self) -> Theme {
        Theme {
            inner: Arc::new(ThemeInner {
                namespace: self.namespace,
                values: self.values,
                mode: self.mode.unwrap_or_else(detect_mode),
                parent: None,
                registry: RwLock::new(Registry::default()),
                state: RwLock::new(Lifecycle::Open),
                cache: RwLock::new(None),
                compiled_once: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }
}

/// Chainable handle returned by [`Theme::register`].
///
/// Holds a reference to the entry being built, so variant registrations and
/// selector creation can be chained off the initial registration.
#[derive(Debug)]
pub struct ComponentHandle<'a> {
    theme: &'a Theme,
    component: String,
}

impl ComponentHandle<'_> {
    /// Registers a variant for this component and returns the handle.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::AlreadyCompiled`] under the same rules as
    /// [`Theme::register_variant`].
    pub fn add_variant<F>(self, variant: &str, factory: F) -> Result<Self, ThemeError>
    where
        F: Fn(&ValueTree) -> FlatMapping + Send + Sync + 'static,
    {
        self.theme
            .register_variant(&self.component, variant, factory)?;
        Ok(self)
    }

    /// Creates a selector bound to this component's name.
    pub fn create_selector(&self) -> Selector {
        Selector::new(self.component.clone())
    }

    /// The component name this handle builds.
    pub fn component(&self) -> &str {
        &self.component
    }
}
