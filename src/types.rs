use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback image reference used when a product entry carries none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Fallback purchase link used when a product entry carries none.
pub const PLACEHOLDER_URL: &str = "#";

/// Inputs for one generation attempt. Immutable once submitted.
///
/// Only the first image is uploaded to the designer service; additional
/// images are kept for the caller's own use (e.g. gallery display).
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Raw image blobs, at least one required at submit time.
    pub images: Vec<Vec<u8>>,

    /// Budget for the redesign, expected positive.
    pub budget: f64,

    /// Interior-design style identifier (e.g. "scandinavian").
    pub style: String,

    /// Free-text notes forwarded to the designer service.
    pub notes: Option<String>,

    /// Selected product-category identifiers, possibly empty.
    pub selected_products: Vec<String>,
}

impl GenerationRequest {
    pub fn new(budget: f64, style: impl Into<String>) -> Self {
        Self {
            images: Vec::new(),
            budget,
            style: style.into(),
            notes: None,
            selected_products: Vec::new(),
        }
    }

    /// Append one image blob (builder pattern).
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.images.push(bytes);
        self
    }

    /// Replace the image sequence wholesale.
    pub fn with_images(mut self, images: Vec<Vec<u8>>) -> Self {
        self.images = images;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_selected_products(mut self, products: Vec<String>) -> Self {
        self.selected_products = products;
        self
    }

    /// The preferences object sent alongside the image in the multipart body.
    pub fn preferences_json(&self) -> Value {
        serde_json::json!({
            "budget": self.budget,
            "style": self.style,
            "notes": self.notes.as_deref().unwrap_or(""),
            "selectedProducts": self.selected_products,
        })
    }
}

/// One decoded server update. Superseded by the next event; only the most
/// recent one is retained by [`DesignSession`](crate::session::DesignSession).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingProgressEvent {
    /// Free-form status tag ("starting", "processing", ...).
    pub status: String,

    /// Human-readable message for display.
    pub message: String,

    /// Optional pipeline step number.
    pub step: Option<u32>,

    /// Opaque payload attached to this update, if any.
    pub data: Option<Value>,
}

/// A recommended product mapped from the terminal payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Sequential 1-based display id, assigned client-side.
    pub id: usize,
    pub title: String,
    pub vendor: String,
    /// Defaults to 0.0 when absent or non-numeric in the payload.
    pub price: f64,
    pub image: String,
    pub buy_url: String,
    pub thumbnail: Option<String>,
}

/// The terminal artifact of a successful generation. Immutable once created;
/// prepended to the session's result history and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignResult {
    /// Server-supplied request id, or a client-generated token.
    pub id: String,

    /// Rendered-room reference: a `data:` URI when the payload carried inline
    /// image data, else a placeholder.
    pub render_url: String,

    pub products: Vec<Product>,

    /// Echoed from the request, not the payload.
    pub style: String,

    /// Echoed from the request, not the payload.
    pub budget: f64,

    pub created_at: DateTime<Utc>,

    /// Wall-clock seconds between submission and transformation.
    pub latency_seconds: f64,

    // Opaque sub-payloads retained for display; never interpreted here.
    pub designer_data: Option<Value>,
    pub room_analysis: Option<Value>,
    pub design_critique: Option<Value>,
    pub user_preferences: Option<Value>,
}
