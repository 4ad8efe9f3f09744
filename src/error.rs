//! Structured error types for paneview.

/// All errors the overlay engine can report.
///
/// Transient geometry problems (a detached surface, a zero-sized workspace) are
/// not errors: the engine skips positioning for them.
#[derive(Debug, thiserror::Error)]
pub enum PaneError {
    /// The render range for an axis is unusable while the axis has items.
    #[error("Configuration fault: {0}")]
    Configuration(String),

    /// A setting failed validation.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Settings JSON could not be parsed or a snapshot could not be serialized.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PaneError>;

#[cfg(target_arch = "wasm32")]
impl From<PaneError> for wasm_bindgen::JsValue {
    fn from(e: PaneError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
