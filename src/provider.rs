//! Provider boundary: feeding compiled themes to a host rendering layer.
//!
//! Everything here is a thin adapter over the core. A host UI framework
//! mounts a [`ThemeProvider`] once per render tree; style-producing code is
//! wrapped with [`connect`] so it reads resolved values from whichever
//! compiled theme the provider currently holds. The host's own styling
//! machinery (the "style sink") only ever receives a flat property mapping.
//!
//! In development mode the provider subscribes to the theme's change
//! notification, recompiles on every registration change, and invokes the
//! registered redraw callback so the host can re-render. In production it
//! compiles once at mount and the result never changes.

use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::error::ThemeError;
use crate::mode::Mode;
use crate::theme::{CompiledTheme, Theme};
use crate::value::FlatMapping;

/// Global redraw callback - set by the host layer to trigger re-renders
/// when a development-mode theme recompiles.
static REDRAW_CALLBACK: Mutex<Option<fn()>> = Mutex::new(None);

/// Registers the host redraw hook.
///
/// Called by the adapter embedding this library into a rendering framework.
/// The callback fires after each successful development-mode recompile.
pub fn set_redraw_callback(callback: fn()) {
    *REDRAW_CALLBACK.lock().unwrap() = Some(callback);
}

fn trigger_redraw() {
    if let Some(callback) = *REDRAW_CALLBACK.lock().unwrap() {
        callback();
    }
}

/// Owns a theme's active compiled result for a mounted render tree.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use themery::{connect, Mode, Theme, ThemeProvider};
///
/// let theme = Theme::builder("app").mode(Mode::Production).build();
/// theme
///     .register("Button", |_| json!({"label": "Ok", "padding": 8}))
///     .unwrap();
///
/// let provider = ThemeProvider::mount(theme).unwrap();
///
/// let button = connect("Button", |values| {
///     format!("[{}]", values["label"].as_str().unwrap_or(""))
/// });
/// assert_eq!(button.render_in(&provider).unwrap(), "[Ok]");
/// ```
pub struct ThemeProvider {
    theme: Theme,
    current: Arc<RwLock<Arc<CompiledTheme>>>,
}

impl ThemeProvider {
    /// Compiles the theme and, in development mode, wires up hot reload.
    ///
    /// # Errors
    ///
    /// Returns the compile error when the theme's registry is inconsistent
    /// (a component with variants but no default).
    pub fn mount(theme: Theme) -> Result<Self, ThemeError> {
        let compiled = theme.compile()?;
        let current = Arc::new(RwLock::new(compiled));

        if theme.mode() == Mode::Development {
            // The listener outlives this provider (it lives on the theme),
            // so it holds a weak reference and goes quiet once the provider
            // is dropped.
            let active: Weak<RwLock<Arc<CompiledTheme>>> = Arc::downgrade(&current);
            theme.on_change(move |changed| {
                let Some(active) = active.upgrade() else {
                    return;
                };
                match changed.compile() {
                    Ok(compiled) => {
                        *active.write().unwrap() = compiled;
                        trigger_redraw();
                    }
                    Err(err) => tracing::warn!(
                        namespace = %changed.namespace(),
                        %err,
                        "recompile after registration change failed; keeping previous theme"
                    ),
                }
            });
        }

        Ok(Self { theme, current })
    }

    /// The currently active compiled theme.
    ///
    /// Referentially stable in production; replaced on each hot reload in
    /// development.
    pub fn current(&self) -> Arc<CompiledTheme> {
        self.current.read().unwrap().clone()
    }

    /// The mounted theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl std::fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("theme", &self.theme)
            .finish()
    }
}

/// Wraps a style-producing function so it reads from the active compiled
/// theme.
///
/// The wrapped closure is the style sink boundary: it receives the resolved
/// flat mapping for the bound (component, variant) pair and produces
/// whatever the host framework renders.
pub fn connect<T, F>(component: impl Into<String>, render: F) -> ConnectedComponent<T>
where
    F: Fn(&FlatMapping) -> T + Send + Sync + 'static,
{
    ConnectedComponent {
        component: component.into(),
        variant: None,
        render: Arc::new(render),
    }
}

/// A style-producing component bound to a component name and optional
/// variant.
pub struct ConnectedComponent<T> {
    component: String,
    variant: Option<String>,
    render: Arc<dyn Fn(&FlatMapping) -> T + Send + Sync>,
}

impl<T> ConnectedComponent<T> {
    /// Binds a variant, producing a new component resolving against it.
    ///
    /// The original stays bound to the default variant, mirroring how a
    /// base component and its variants coexist in a component library.
    pub fn variant(&self, variant: impl Into<String>) -> Self {
        Self {
            component: self.component.clone(),
            variant: Some(variant.into()),
            render: self.render.clone(),
        }
    }

    /// Renders against an explicit compiled theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownComponent`] when the bound component or
    /// variant was not registered at compile time.
    pub fn render(&self, compiled: &CompiledTheme) -> Result<T, ThemeError> {
        let mapping = compiled.mapping(&self.component, self.variant.as_deref())?;
        Ok((self.render)(mapping))
    }

    /// Renders against a provider's currently active compiled theme.
    pub fn render_in(&self, provider: &ThemeProvider) -> Result<T, ThemeError> {
        self.render(&provider.current())
    }

    /// The bound component name.
    pub fn component(&self) -> &str {
        &self.component
    }
}

impl<T> Clone for ConnectedComponent<T> {
    fn clone(&self) -> Self {
        Self {
            component: self.component.clone(),
            variant: self.variant.clone(),
            render: self.render.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ConnectedComponent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedComponent")
            .field("component", &self.component)
            .field("variant", &self.variant)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app_theme(mode: Mode) -> Theme {
        let theme = Theme::builder("app")
            .values(json!({"colors": {"bg": "#111"}}))
            .mode(mode)
            .build();
        theme
            .register("Panel", |g| json!({"background": g["colors"]["bg"], "pad": 2}))
            .unwrap()
            .add_variant("inset", |_| json!({"pad": 0}))
            .unwrap();
        theme
    }

    #[test]
    fn test_mount_compiles_once_in_production() {
        let provider = ThemeProvider::mount(app_theme(Mode::Production)).unwrap();
        let a = provider.current();
        let b = provider.current();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_connected_component_reads_default() {
        let provider = ThemeProvider::mount(app_theme(Mode::Production)).unwrap();
        let panel = connect("Panel", |values| values["pad"].clone());
        assert_eq!(panel.render_in(&provider).unwrap(), json!(2));
    }

    #[test]
    fn test_variant_binding_produces_new_component() {
        let provider = ThemeProvider::mount(app_theme(Mode::Production)).unwrap();
        let panel = connect("Panel", |values| values["pad"].clone());
        let inset = panel.variant("inset");

        assert_eq!(inset.render_in(&provider).unwrap(), json!(0));
        // The base component is unaffected by the binding.
        assert_eq!(panel.render_in(&provider).unwrap(), json!(2));
    }

    #[test]
    fn test_unbound_variant_fails() {
        let provider = ThemeProvider::mount(app_theme(Mode::Production)).unwrap();
        let ghost = connect("Panel", |_| ()).variant("ghost");
        assert!(matches!(
            ghost.render_in(&provider),
            Err(ThemeError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_mount_fails_on_inconsistent_registry() {
        let theme = Theme::builder("bad").mode(Mode::Production).build();
        theme
            .register_variant("Orphan", "loud", |_| json!({}))
            .unwrap();
        assert!(ThemeProvider::mount(theme).is_err());
    }

    #[test]
    fn test_development_hot_reload_updates_provider() {
        let theme = app_theme(Mode::Development);
        let provider = ThemeProvider::mount(theme.clone()).unwrap();
        let before = provider.current();

        theme
            .register_variant("Panel", "wide", |_| json!({"pad": 8}))
            .unwrap();

        let after = provider.current();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(
            after.value("Panel", Some("wide"), "pad").unwrap(),
            &json!(8)
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_redraw_callback_fires_on_hot_reload() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn redraw() {
            FIRED.fetch_add(1, Ordering::SeqCst);
        }
        set_redraw_callback(redraw);

        let theme = app_theme(Mode::Development);
        let _provider = ThemeProvider::mount(theme.clone()).unwrap();

        let before = FIRED.load(Ordering::SeqCst);
        theme
            .register_variant("Panel", "loud", |_| json!({"pad": 4}))
            .unwrap();
        assert!(FIRED.load(Ordering::SeqCst) >= before + 1);
    }

    #[test]
    fn test_dropped_provider_stops_listening() {
        let theme = app_theme(Mode::Development);
        let provider = ThemeProvider::mount(theme.clone()).unwrap();
        drop(provider);

        // The stale listener must not panic or recompile into the void.
        theme
            .register_variant("Panel", "wide", |_| json!({"pad": 8}))
            .unwrap();
    }
}
