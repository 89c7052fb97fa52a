//! Dashboard layout defaults and input rules.
//!
//! A layout config is an opaque, ordered list of widget placements. Only the
//! outer shape (a JSON array) is checked; the records themselves are stored
//! and returned untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Field name used in validation errors and request/response bodies.
pub const LAYOUT_CONFIG_FIELD: &str = "layout_config";

/// A single widget placement on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPlacement {
    /// Widget identifier.
    pub i: String,
    pub x: u32,
    pub y: u32,
    /// Width in grid columns.
    pub w: u32,
    /// Height in grid rows.
    pub h: u32,
}

impl WidgetPlacement {
    pub fn new(i: &str, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: i.to_string(),
            x,
            y,
            w,
            h,
        }
    }
}

/// Layout served to users who never saved one.
pub fn default_widgets() -> Vec<WidgetPlacement> {
    vec![
        WidgetPlacement::new("stats", 0, 0, 12, 4),
        WidgetPlacement::new("quick-actions", 0, 4, 12, 5),
        WidgetPlacement::new("recent-activity", 0, 9, 12, 8),
    ]
}

/// [`default_widgets`] as the JSON value stored in `layout_config`.
pub fn default_layout() -> Value {
    serde_json::to_value(default_widgets()).unwrap_or_else(|_| Value::Array(Vec::new()))
}

/// Check a submitted `layout_config`.
///
/// `None` and JSON `null` count as missing. Anything other than an array is
/// rejected. The value is returned unchanged on success.
pub fn validate_layout_config(value: Option<Value>) -> Result<Value, CoreError> {
    match value {
        None | Some(Value::Null) => Err(CoreError::field(
            LAYOUT_CONFIG_FIELD,
            "The layout config field is required.",
        )),
        Some(Value::Array(items)) => Ok(Value::Array(items)),
        Some(_) => Err(CoreError::field(
            LAYOUT_CONFIG_FIELD,
            "The layout config field must be an array.",
        )),
    }
}
