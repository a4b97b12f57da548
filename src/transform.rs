//! Maps the terminal success payload into the stable [`DesignResult`] shape.

use std::time::Instant;

use chrono::Utc;
use serde_json::Value;

use crate::types::{
    DesignResult, GenerationRequest, Product, PLACEHOLDER_IMAGE, PLACEHOLDER_URL,
};

/// Build a [`DesignResult`] from a captured terminal payload.
///
/// The request is authoritative for `style` and `budget`; the payload only
/// contributes the render, the product list, and the opaque designer
/// sub-payloads. Missing fields get documented fallbacks so the UI never sees
/// a half-formed result.
pub fn build_design_result(
    payload: &Value,
    request: &GenerationRequest,
    submitted_at: Instant,
) -> DesignResult {
    let id = payload
        .get("request_id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let render_url = payload
        .pointer("/generated_image/data")
        .and_then(|v| v.as_str())
        .map(|data| format!("data:image/png;base64,{}", data))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let designer_data = payload.get("designer_data");

    let products = designer_data
        .and_then(|d| d.get("product_recommendations"))
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| product_from_entry(idx, entry))
                .collect()
        })
        .unwrap_or_default();

    DesignResult {
        id,
        render_url,
        products,
        style: request.style.clone(),
        budget: request.budget,
        created_at: Utc::now(),
        latency_seconds: submitted_at.elapsed().as_secs_f64(),
        designer_data: designer_data.cloned(),
        room_analysis: designer_data.and_then(|d| d.get("room_analysis")).cloned(),
        design_critique: designer_data
            .and_then(|d| d.get("design_critique"))
            .cloned(),
        user_preferences: designer_data
            .and_then(|d| d.get("user_preferences"))
            .cloned(),
    }
}

/// Map one payload product entry, assigning the 1-based display id.
fn product_from_entry(idx: usize, entry: &Value) -> Product {
    let text = |keys: &[&str], fallback: &str| -> String {
        keys.iter()
            .find_map(|k| entry.get(*k).and_then(|v| v.as_str()))
            .unwrap_or(fallback)
            .to_string()
    };

    let thumbnail = entry
        .get("thumbnail")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Product {
        id: idx + 1,
        title: text(&["title"], "Recommended item"),
        vendor: text(&["vendor", "source"], "Unknown"),
        price: parse_price(entry.get("price")),
        image: entry
            .get("image")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .or_else(|| thumbnail.clone())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        buy_url: text(&["link", "url"], PLACEHOLDER_URL),
        thumbnail,
    }
}

/// Prices arrive as numbers or strings like "$49.99"; anything else is 0.
fn parse_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
