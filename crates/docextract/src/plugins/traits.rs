//! Base plugin trait definition.

use crate::Result;

/// Identity and lifecycle shared by every plugin.
///
/// # Thread Safety
///
/// Plugins must be `Send + Sync`: a single client serves concurrent
/// extraction calls, all of which share the registered plugins.
///
/// # Example
///
/// ```rust
/// use docextract::plugins::Plugin;
///
/// struct Uppercase;
///
/// impl Plugin for Uppercase {
///     fn name(&self) -> &str {
///         "uppercase"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique, kebab-case identifier, e.g. `pdf` or `image-metadata`.
    ///
    /// Must be non-empty and contain no whitespace.
    fn name(&self) -> &str;

    /// Semantic version of this plugin.
    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    ///
    /// Takes `&self` so it works behind `Arc<dyn Plugin>`; use interior
    /// mutability for state set up here.
    ///
    /// # Errors
    ///
    /// The plugin is not registered if this returns an error.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the plugin is replaced, removed or the registry shuts down.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Optional description for logging.
    fn description(&self) -> &str {
        ""
    }
}
