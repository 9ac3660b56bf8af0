// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{apply_serve_overrides, format_status, resolve_output_path, resolve_webhook};
