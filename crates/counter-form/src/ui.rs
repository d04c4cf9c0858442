//! # UI Seams
//!
//! The controller never renders anything itself. Navigation and blocking
//! alerts go through these traits so a desktop shell, a web bridge or a
//! test recorder can sit behind them.

/// Route navigation.
pub trait Navigator: Send + Sync {
    /// Opens `route` with query parameters.
    fn go_to(&self, route: &str, params: &[(String, String)]);
}

/// User-facing blocking messages.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Swallows navigation and alerts.
///
/// Used when the form is driven without a user interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUi;

impl Navigator for NoOpUi {
    fn go_to(&self, _route: &str, _params: &[(String, String)]) {}
}

impl Notifier for NoOpUi {
    fn alert(&self, _message: &str) {}
}
