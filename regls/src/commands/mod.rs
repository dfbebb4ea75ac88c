/// List command handlers and logic
pub mod list;

/// Version command handlers
pub mod version;
