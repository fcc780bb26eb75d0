//! Application-level services and side-effect helpers.

pub mod notify;
pub mod side_effects;

pub use notify::StoredNotificationService;
pub use side_effects::log_non_critical;
