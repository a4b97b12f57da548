use roomdesigner_rs::*;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Replay fixed byte chunks through the client's stream-consumption loop,
/// collecting dispatched progress events alongside the terminal outcome.
async fn run_stream(chunks: &[&[u8]]) -> (Vec<StreamingProgressEvent>, Result<Value>) {
    let mut events = Vec::new();
    let chunks: Vec<Result<Vec<u8>>> = chunks.iter().map(|c| Ok(c.to_vec())).collect();
    let outcome = consume_stream(
        futures::stream::iter(chunks),
        Duration::from_secs(5),
        |ev| events.push(ev),
    )
    .await;
    (events, outcome)
}

fn request() -> GenerationRequest {
    GenerationRequest::new(800.0, "scandinavian").with_image(vec![0u8; 16])
}

// --- Stream consumption ---

#[tokio::test]
async fn test_progress_then_completed_scenario() {
    // Worked example: one progress dispatch, then a resolved result.
    let chunks: &[&[u8]] = &[
        b"data: {\"status\":\"processing\",\"message\":\"Analyzing...\"}\n",
        b"data: {\"status\":\"completed\",\"success\":true,\"request_id\":\"abc123\",",
        b"\"designer_data\":{\"product_recommendations\":[{\"title\":\"Lamp\",\"vendor\":\"IKEA\",\"price\":49.99}]}}\n",
    ];

    let (events, outcome) = run_stream(chunks).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message, "Analyzing...");

    let req = request();
    let result = transform::build_design_result(&outcome.unwrap(), &req, Instant::now());
    assert_eq!(result.id, "abc123");
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].title, "Lamp");
    assert_eq!(result.products[0].vendor, "IKEA");
    assert_eq!(result.products[0].price, 49.99);
    assert_eq!(result.style, "scandinavian");
    assert_eq!(result.budget, 800.0);
}

#[tokio::test]
async fn test_error_frame_scenario() {
    // Worked example: the attempt fails with the server's message verbatim.
    let chunks: &[&[u8]] = &[b"data: {\"error\":\"upstream timeout\"}\n"];
    let (events, outcome) = run_stream(chunks).await;

    assert!(events.is_empty());
    match outcome {
        Err(DesignError::Remote(msg)) => assert_eq!(msg, "upstream timeout"),
        other => panic!("expected Remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_after_progress_still_fails() {
    let chunks: &[&[u8]] = &[
        b"data: {\"status\":\"starting\",\"message\":\"Uploading\"}\n",
        b"data: {\"status\":\"processing\",\"message\":\"Analyzing\"}\n",
        b"data: {\"error\":\"model unavailable\"}\n",
    ];
    let (events, outcome) = run_stream(chunks).await;

    assert_eq!(events.len(), 2);
    match outcome {
        Err(DesignError::Remote(msg)) => assert_eq!(msg, "model unavailable"),
        other => panic!("expected Remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ordered_progress_dispatch() {
    let chunks: &[&[u8]] = &[
        b"data: {\"status\":\"starting\",\"message\":\"one\"}\n\n",
        b"data: {\"status\":\"processing\",\"message\":\"two\"}\n",
        b"data: {\"status\":\"processing\",\"message\":\"three\"}\n",
        b"data: {\"status\":\"completed\",\"success\":true}\n",
    ];

    let (events, outcome) = run_stream(chunks).await;
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["one", "two", "three"]);
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_chunk_boundary_independence_end_to_end() {
    let stream = "data: {\"status\":\"processing\",\"message\":\"Analyser la pièce…\"}\n\
                  data: {\"status\":\"completed\",\"success\":true,\"request_id\":\"xyz\"}\n";
    let bytes = stream.as_bytes();

    let (whole_events, whole_outcome) = run_stream(&[bytes]).await;
    let whole_payload = whole_outcome.unwrap();

    for split in 1..bytes.len() {
        let (events, outcome) = run_stream(&[&bytes[..split], &bytes[split..]]).await;
        assert_eq!(events.len(), whole_events.len(), "split at byte {}", split);
        assert_eq!(events[0].message, whole_events[0].message);
        assert_eq!(outcome.unwrap(), whole_payload, "split at byte {}", split);
    }
}

#[tokio::test]
async fn test_no_terminal_frame_is_missing_result() {
    let chunks: &[&[u8]] = &[
        b"data: {\"status\":\"processing\",\"message\":\"still going\"}\n",
        // Stream just closes; an unterminated tail is not a frame.
        b"data: {\"status\":\"comp",
    ];
    let (events, outcome) = run_stream(chunks).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(outcome, Err(DesignError::MissingResult)));
}

#[tokio::test]
async fn test_malformed_frames_are_dropped_not_fatal() {
    let chunks: &[&[u8]] = &[
        b"data: {broken\n",
        b"data: {\"status\":\"processing\",\"message\":\"ok\"}\n",
        b"data: also broken\n",
        b"data: {\"status\":\"completed\",\"success\":true}\n",
    ];
    let (events, outcome) = run_stream(chunks).await;

    assert_eq!(events.len(), 1);
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_first_completed_frame_wins() {
    let chunks: &[&[u8]] = &[
        b"data: {\"status\":\"completed\",\"success\":true,\"request_id\":\"first\"}\n",
        b"data: {\"status\":\"completed\",\"success\":true,\"request_id\":\"second\"}\n",
    ];
    let (_, outcome) = run_stream(chunks).await;
    assert_eq!(outcome.unwrap()["request_id"], "first");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_stream_times_out() {
    // No chunk ever arrives: the attempt must fail instead of hanging.
    let pending = futures::stream::pending::<Result<Vec<u8>>>();
    let result = consume_stream(pending, Duration::from_secs(60), |_| {}).await;
    assert!(matches!(result, Err(DesignError::Timeout)));
}

// --- Result transformation ---

#[test]
fn test_product_list_round_trip() {
    let payload = serde_json::json!({
        "status": "completed", "success": true,
        "budget": 1.0, "style": "wrong",
        "designer_data": {
            "product_recommendations": [
                {"title": "A"}, {"title": "B"}, {"title": "C"}, {"title": "D"}
            ]
        }
    });
    let req = request();
    let result = transform::build_design_result(&payload, &req, Instant::now());

    assert_eq!(result.products.len(), 4);
    for (i, product) in result.products.iter().enumerate() {
        assert_eq!(product.id, i + 1);
    }
    assert_eq!(result.budget, 800.0);
    assert_eq!(result.style, "scandinavian");
}

// --- Session state machine ---

#[test]
fn test_zero_images_rejected_without_network() {
    let mut session = DesignSession::new();
    let empty = GenerationRequest::new(800.0, "modern");

    let result = session.begin(&empty);
    assert!(matches!(result, Err(DesignError::Validation(_))));
    assert!(!session.is_generating());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_session_run_rejects_empty_request() {
    // Unroutable endpoint; validation short-circuits before any connection.
    let client = DesignClient::new("http://192.0.2.1:1");
    let mut session = DesignSession::new();
    let empty = GenerationRequest::new(800.0, "modern");

    let result = session.run(&client, &empty, |_| {}).await;
    assert!(matches!(result, Err(DesignError::Validation(_))));
    assert!(!session.is_generating());
}

#[tokio::test]
async fn test_full_attempt_through_session() {
    let chunks: Vec<Result<Vec<u8>>> = vec![
        Ok(b"data: {\"status\":\"processing\",\"message\":\"Analyzing...\"}\n".to_vec()),
        Ok(b"data: {\"status\":\"completed\",\"success\":true,\"request_id\":\"abc123\"}\n".to_vec()),
    ];
    let req = request();

    let mut session = DesignSession::new();
    session.begin(&req).unwrap();

    let payload = consume_stream(
        futures::stream::iter(chunks),
        Duration::from_secs(5),
        |ev| session.record_progress(ev),
    )
    .await
    .unwrap();
    assert_eq!(session.progress().unwrap().message, "Analyzing...");

    let result = transform::build_design_result(&payload, &req, Instant::now());
    session.commit_result(result);

    assert!(!session.is_generating());
    assert!(session.progress().is_none());
    assert_eq!(session.current_result().unwrap().id, "abc123");
    assert_eq!(session.history().len(), 1);
}
