//! Generate one room design from a photo and print the result.
//!
//! Requires a running Interior Designer service at http://127.0.0.1:8009
//! and a room photo path as the first argument.
//!
//! ```sh
//! cargo run --example basic_generation -- room.jpg
//! ```

use roomdesigner_rs::{DesignClient, GenerationRequest};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "room.jpg".to_string());
    let image = std::fs::read(&path)?;

    let client = DesignClient::new("http://127.0.0.1:8009");

    // Check connection
    if !client.health().await? {
        eprintln!("Designer service is not responding");
        return Ok(());
    }
    println!("Designer service is online");

    let request = GenerationRequest::new(800.0, "scandinavian")
        .with_image(image)
        .with_notes("keep the plants, warmer lighting");

    let result = client
        .generate_design(&request, |ev| println!("  [{}] {}", ev.status, ev.message))
        .await?;

    println!("Design {} ready in {:.1}s", result.id, result.latency_seconds);
    for product in &result.products {
        println!(
            "  {}. {} — {} (${:.2})",
            product.id, product.title, product.vendor, product.price
        );
    }

    Ok(())
}
