//! Drive a generation attempt through a DesignSession, the way a UI
//! controller would: submit, watch the progress snapshot, inspect history.
//!
//! ```sh
//! cargo run --example progress_tracking -- room.jpg
//! ```

use roomdesigner_rs::{DesignClient, DesignSession, GenerationRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "room.jpg".to_string());
    let image = std::fs::read(&path)?;

    let client =
        DesignClient::new("http://127.0.0.1:8009").with_idle_timeout(Duration::from_secs(120));
    let mut session = DesignSession::new();

    let request = GenerationRequest::new(1500.0, "industrial")
        .with_image(image)
        .with_selected_products(vec!["sofa".into(), "floor lamp".into()]);

    let outcome = session
        .run(&client, &request, |ev| {
            match ev.step {
                Some(step) => println!("  step {}: {}", step, ev.message),
                None => println!("  {}", ev.message),
            };
        })
        .await;

    if let Err(e) = outcome {
        eprintln!("Attempt failed: {}", e);
        eprintln!("Session error: {:?}", session.last_error());
        return Ok(());
    }

    let result = session.current_result().expect("committed result");
    println!(
        "Done: {} products, render at {} chars of URI",
        result.products.len(),
        result.render_url.len()
    );
    println!("History size: {}", session.history().len());

    Ok(())
}
