//! Theming errors.
//!
//! Every error in this crate signals a programmer or ordering mistake, not a
//! recoverable runtime condition. Nothing here is retried: registration order
//! and property names are fixed at build time, so a failure means a style
//! definition and its registered defaults have drifted apart.

/// Error type for theme registration and lookup operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// A registration call targeted a theme already frozen in production mode.
    ///
    /// Once a production theme compiles, its registry cannot change shape.
    /// Register all components and variants before the first compile.
    AlreadyCompiled {
        /// Namespace of the frozen theme
        namespace: String,
    },

    /// A component or variant did not exist in the registry at compile time.
    ///
    /// Raised when a variant is resolved for a component that never got a
    /// default (variants merge onto defaults, never stand alone), when a
    /// lookup names a component absent from the compiled theme, or when a
    /// bound variant was never registered for its component.
    UnknownComponent {
        /// The component name that was requested
        component: String,
        /// The variant that was bound, when the component itself exists
        variant: Option<String>,
    },

    /// A selector requested a property absent from a resolved mapping.
    ///
    /// Also raised when the variant itself was never registered for the
    /// component, which is the same class of mistake.
    UnknownProperty {
        /// The component whose mapping was queried
        component: String,
        /// The variant that was active ("default" when none was named)
        variant: String,
        /// The property key that was missing
        property: String,
    },
}

impl std::fmt::Display for ThemeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeError::AlreadyCompiled { namespace } => {
                write!(
                    f,
                    "theme '{}' is already compiled; registrations are frozen in production mode",
                    namespace
                )
            }
            ThemeError::UnknownComponent { component, variant } => match variant {
                Some(variant) => write!(
                    f,
                    "variant '{}' of component '{}' was not registered at compile time",
                    variant, component
                ),
                None => write!(
                    f,
                    "component '{}' has no registered default factory",
                    component
                ),
            },
            ThemeError::UnknownProperty {
                component,
                variant,
                property,
            } => {
                write!(
                    f,
                    "property '{}' not found for component '{}' (variant '{}')",
                    property, component, variant
                )
            }
        }
    }
}

impl std::error::Error for ThemeError {}
