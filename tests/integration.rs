//! End-to-end scenarios: a component library author, a consumer extending
//! the library's theme, and an application mounting the result.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use themery::{connect, Mode, Selector, Theme, ThemeError, ThemeProvider};

/// Builds the kind of theme a component library ships: globals plus a few
/// components registered across "modules".
fn library_theme(mode: Mode) -> Theme {
    let theme = Theme::builder("ui-kit")
        .values(json!({
            "colors": {"primary": "#000", "surface": "#fff", "danger": "#c00"},
            "spacing": {"sm": 4, "md": 8, "lg": 16},
        }))
        .mode(mode)
        .build();

    theme
        .register("Button", |g| json!({
            "background": g["colors"]["primary"],
            "color": g["colors"]["surface"],
            "padding": {"x": g["spacing"]["md"], "y": g["spacing"]["sm"]},
        }))
        .unwrap()
        .add_variant("danger", |g| json!({"background": g["colors"]["danger"]}))
        .unwrap()
        .add_variant("large", |g| json!({"padding": {"x": g["spacing"]["lg"]}}))
        .unwrap();

    theme
        .register("Card", |g| json!({
            "background": g["colors"]["surface"],
            "margin": g["spacing"]["md"],
        }))
        .unwrap();

    theme
}

#[test]
fn full_author_consumer_application_flow() {
    let base = library_theme(Mode::Production);

    // Consumer overrides one nested global and adds a variant of their own.
    let branded = base.extend("acme", json!({"colors": {"primary": "#0a5"}}));
    branded
        .register_variant("Card", "raised", |_| json!({"shadow": "0 2px 4px"}))
        .unwrap();

    let provider = ThemeProvider::mount(branded).unwrap();
    let compiled = provider.current();

    // The overridden global flows into the component default.
    assert_eq!(
        compiled.value("Button", None, "background").unwrap(),
        &json!("#0a5")
    );
    // Untouched globals still resolve.
    assert_eq!(
        compiled.value("Button", Some("danger"), "background").unwrap(),
        &json!("#c00")
    );
    // The variant overrides one nested key, preserving its siblings.
    assert_eq!(
        compiled.mapping("Button", Some("large")).unwrap()["padding"],
        json!({"x": 16, "y": 4})
    );
    // The consumer's variant merges onto the library's default.
    assert_eq!(
        compiled.mapping("Card", Some("raised")).unwrap(),
        &json!({"background": "#fff", "margin": 8, "shadow": "0 2px 4px"})
    );
}

#[test]
fn extension_isolation_both_directions() {
    let parent = library_theme(Mode::Production);
    let child = parent.extend("child", json!({"colors": {"primary": "#fff"}}));

    let child_compiled = child.compile().unwrap();
    let parent_compiled = parent.compile().unwrap();

    assert_eq!(
        child_compiled.value("Button", None, "background").unwrap(),
        &json!("#fff")
    );
    assert_eq!(
        parent_compiled.value("Button", None, "background").unwrap(),
        &json!("#000")
    );

    // The parent stays registrable and compilable on its own schedule:
    // compiling the child did not freeze or recompile it.
    assert!(std::sync::Arc::ptr_eq(
        &parent_compiled,
        &parent.compile().unwrap()
    ));
}

#[test]
fn selectors_created_before_compile() {
    let theme = library_theme(Mode::Production);
    let background = Selector::new("Button").property("background");
    let danger_background = Selector::new("Button").property_for("background", "danger");

    let compiled = theme.compile().unwrap();
    assert_eq!(background.read(&compiled).unwrap(), &json!("#000"));
    assert_eq!(danger_background.read(&compiled).unwrap(), &json!("#c00"));
}

#[test]
fn production_freeze_rejects_late_registration() {
    let theme = library_theme(Mode::Production);
    let compiled = theme.compile().unwrap();

    let err = theme.register("Late", |_| json!({})).unwrap_err();
    assert_eq!(
        err,
        ThemeError::AlreadyCompiled {
            namespace: "ui-kit".to_string()
        }
    );
    let err = theme
        .register_variant("Button", "late", |_| json!({}))
        .unwrap_err();
    assert!(matches!(err, ThemeError::AlreadyCompiled { .. }));

    // The frozen table is untouched.
    assert!(Arc::ptr_eq(&compiled, &theme.compile().unwrap()));
    assert!(compiled.mapping("Button", Some("late")).is_err());
}

#[test]
fn development_hot_reload_through_provider() {
    let theme = library_theme(Mode::Development);
    let provider = ThemeProvider::mount(theme.clone()).unwrap();
    let before = provider.current();

    // A "file change" swaps a variant factory.
    theme
        .register_variant("Button", "danger", |_| json!({"background": "#f00"}))
        .unwrap();
    let after = provider.current();

    assert_eq!(
        after.value("Button", Some("danger"), "background").unwrap(),
        &json!("#f00")
    );
    // Entries the change did not touch are deeply equal across the reload.
    assert_eq!(
        before.mapping("Card", None).unwrap(),
        after.mapping("Card", None).unwrap()
    );
    assert_eq!(
        before.mapping("Button", None).unwrap(),
        after.mapping("Button", None).unwrap()
    );
}

#[test]
fn memoization_skips_factory_reevaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let theme = Theme::builder("spy").mode(Mode::Production).build();
    theme
        .register("Button", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            json!({"a": 1})
        })
        .unwrap();

    let first = theme.compile().unwrap();
    let evaluations = calls.load(Ordering::SeqCst);
    let second = theme.compile().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), evaluations);
}

#[test]
fn connected_components_track_the_active_theme() {
    let theme = library_theme(Mode::Development);
    let provider = ThemeProvider::mount(theme.clone()).unwrap();

    let button = connect("Button", |values| values["background"].clone());
    assert_eq!(button.render_in(&provider).unwrap(), json!("#000"));

    theme
        .register("Button", |_| json!({"background": "#123"}))
        .unwrap();
    assert_eq!(button.render_in(&provider).unwrap(), json!("#123"));
}

#[test]
fn variant_without_default_fails_at_compile() {
    let theme = Theme::builder("bad").mode(Mode::Production).build();
    theme
        .register_variant("Phantom", "solid", |_| json!({"x": 1}))
        .unwrap();

    assert_eq!(
        theme.compile(),
        Err(ThemeError::UnknownComponent {
            component: "Phantom".to_string(),
            variant: None,
        })
    );
}

#[test]
fn grandchild_extension_chains_values_and_registrations() {
    let base = library_theme(Mode::Production);
    let child = base.extend("child", json!({"colors": {"primary": "#111"}}));
    child
        .register("Chip", |g| json!({"tint": g["colors"]["primary"]}))
        .unwrap();
    let grandchild = child.extend("grandchild", json!({"colors": {"primary": "#222"}}));

    let compiled = grandchild.compile().unwrap();
    // Registrations flow down the whole chain.
    assert_eq!(compiled.value("Chip", None, "tint").unwrap(), &json!("#222"));
    assert_eq!(
        compiled.value("Button", None, "background").unwrap(),
        &json!("#222")
    );
    // Intermediate themes are untouched.
    assert_eq!(
        child.compile().unwrap().value("Chip", None, "tint").unwrap(),
        &json!("#111")
    );
}
