//! # roomdesigner-rs
//!
//! Async Rust client for the Interior Designer API — streaming generation,
//! progress callbacks, and result history.
//!
//! This library covers the streaming half of an AI interior-design service:
//! it submits a room photo plus preferences as one multipart request, then
//! consumes the long-lived response body incrementally. Each `data: `-prefixed
//! frame is decoded as it arrives (tolerating frames and multi-byte characters
//! split across chunk boundaries), progress frames are forwarded to a callback
//! in arrival order, and the terminal frame is transformed into a stable
//! [`DesignResult`] with documented fallbacks for every optional field.
//!
//! ## Features
//!
//! - **Streaming decode** — newline-framed `data: ` events reassembled from
//!   arbitrary chunk boundaries
//! - **Progress callbacks** — synchronous, ordered, never coalesced
//! - **Tagged frame classification** — progress / completed / failed / skip
//!   as explicit variants, so one malformed frame never aborts the stream
//! - **Stable results** — request-authoritative style and budget, 1-based
//!   product display ids, placeholder fallbacks
//! - **Session state machine** — [`DesignSession`] tracks the in-flight
//!   attempt, latest progress, last error, and result history
//! - **Idle timeout** — a stalled stream fails instead of hanging forever
//!
//! ## Quick Start
//!
//! ```no_run
//! use roomdesigner_rs::{DesignClient, DesignSession, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DesignClient::new("http://127.0.0.1:8009");
//!     let mut session = DesignSession::new();
//!
//!     let request = GenerationRequest::new(800.0, "scandinavian")
//!         .with_image(std::fs::read("room.jpg")?)
//!         .with_notes("keep the plants");
//!
//!     session
//!         .run(&client, &request, |ev| println!("[{}] {}", ev.status, ev.message))
//!         .await?;
//!
//!     let result = session.current_result().unwrap();
//!     println!("Design {} with {} products", result.id, result.products.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod session;
pub mod stream;
pub mod transform;
pub mod types;

pub use client::DesignClient;
pub use error::{DesignError, Result};
pub use session::{DesignSession, Phase};
pub use stream::{classify_line, consume_stream, FrameOutcome, LineBuffer};
pub use types::{
    DesignResult, GenerationRequest, Product, StreamingProgressEvent, PLACEHOLDER_IMAGE,
    PLACEHOLDER_URL,
};
