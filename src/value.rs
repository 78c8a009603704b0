//! Value model and the recursive merge engine.
//!
//! Themes traffic in plain JSON-shaped data: global value trees (colors,
//! fonts, spacing) and the flat property mappings produced by component
//! factories. Both are [`serde_json::Value`] objects, which gives free
//! nesting, literal syntax via `serde_json::json!`, and serialization of
//! compiled output.
//!
//! # Merge Rules
//!
//! [`merge`] is right-biased and non-destructive:
//!
//! - If both sides hold objects under a key, they merge recursively.
//! - Otherwise the right side replaces the left wholesale (scalars and
//!   arrays are replaced, never spliced).
//! - Keys present only on the left are preserved; keys present only on the
//!   right are added.
//! - Neither input is mutated; a new value is produced.
//!
//! Recursive merge is what lets a variant override a single nested value
//! (one color inside a palette) without restating the whole structure.

use std::sync::Arc;

pub use serde_json::Value;

/// Nested tree of shared global values, owned by one theme.
///
/// Always a JSON object at the top level. Immutable once assigned to a
/// theme; overriding happens only by producing a new merged tree on
/// extension.
pub type ValueTree = Value;

/// Flat property-to-value mapping resolved for one (component, variant).
///
/// Always a JSON object at the top level. Nesting below that is allowed
/// when a default factory introduces it; variants override at matching
/// depth.
pub type FlatMapping = Value;

/// A component style factory: a function of the theme's global values.
///
/// Factories are functions rather than static data so component definitions
/// can share global values without importing them, and so the same factory
/// resolves differently under different value trees (extension).
pub type StyleFactory = Arc<dyn Fn(&ValueTree) -> FlatMapping + Send + Sync>;

/// Recursively merges `overlay` onto `base`, producing a new value.
///
/// Pure and deterministic: identical inputs always yield a deeply-equal
/// result, and neither input is touched.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use themery::merge;
///
/// let base = json!({"color": "red", "size": {"w": 1, "h": 2}});
/// let overlay = json!({"size": {"h": 9}});
///
/// assert_eq!(
///     merge(&base, &overlay),
///     json!({"color": "red", "size": {"w": 1, "h": 9}})
/// );
/// ```
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                match merged.get(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        let nested = merge(base_value, overlay_value);
                        merged.insert(key.clone(), nested);
                    }
                    _ => {
                        merged.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

/// Resolves a (default, variant) factory pair against a value tree.
///
/// Evaluates the default factory, then merges the variant's output onto it
/// when a variant factory is supplied. The default is always the base;
/// variants never stand alone.
pub(crate) fn resolve(
    default: &StyleFactory,
    variant: Option<&StyleFactory>,
    globals: &ValueTree,
) -> FlatMapping {
    let base = default(globals);
    match variant {
        Some(factory) => merge(&base, &factory(globals)),
        None => base,
    }
}
