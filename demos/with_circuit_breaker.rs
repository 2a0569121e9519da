//! Circuit breaker example demonstrating both retry windows.
//!
//! This example shows how to:
//! - Wrap a flaky payload with a circuit breaker
//! - Watch it break, fail fast, and recover after the cooldown
//! - Compare the extending and fixed retry windows
//! - Get notified when the circuit breaks
//!
//! Run with: cargo run --example with_circuit_breaker

use simple_circuit::payload::{MockPayload, MockResponse};
use simple_circuit::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn flaky_payload(name: &str) -> MockPayload {
    let outage = ServiceError::unavailable(name, "503 Service Unavailable");
    MockPayload::new()
        .with_name(name)
        .with_latency(Duration::from_millis(20))
        .with_script(std::iter::repeat(MockResponse::Fail(outage)).take(4))
}

async fn send_requests<C: Clock>(
    breaker: &CircuitBreaker<MockPayload, ServiceError, C>,
    count: usize,
) {
    for i in 1..=count {
        let state = breaker.state().name();
        match breaker
            .call_async(|p| p.request_async("GET /inventory"))
            .await
        {
            Ok(body) => println!("  #{i} [{state}] ok: {body}"),
            Err(e) => println!("  #{i} [{state}] failed: {e}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    println!("=== Extending window ===\n");

    let config = CircuitBreakerConfig::default()
        .with_name("inventory")
        .with_max_failures(1)
        .with_retry_after(Duration::from_millis(500))
        .extending();
    let breaker = CircuitBreaker::new(flaky_payload("inventory"), config);

    send_requests(&breaker, 4).await;
    println!("\nWaiting out the cooldown...");
    tokio::time::sleep(Duration::from_millis(600)).await;
    // The trial fails and restarts the cooldown.
    send_requests(&breaker, 2).await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    send_requests(&breaker, 2).await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    send_requests(&breaker, 2).await;

    println!(
        "\nPayload saw {} of the calls",
        breaker.inner().call_count()
    );
    println!("Metrics: {}", serde_json::to_string(&breaker.metrics())?);

    println!("\n=== Fixed window with observer ===\n");

    let config = CircuitBreakerConfig::default()
        .with_name("pricing")
        .with_max_failures(1)
        .with_retry_after(Duration::from_millis(500))
        .with_observer(FnObserver::new(|message: &str| {
            println!("  >> observer: {message}");
        }));
    let breaker = CircuitBreaker::new(flaky_payload("pricing"), config);

    send_requests(&breaker, 3).await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    // Failed trials leave the deadline alone, so both of these reach the payload.
    send_requests(&breaker, 2).await;
    send_requests(&breaker, 1).await;

    println!("\nFinal state: {}", breaker.state().name());
    println!("Final metrics: {:?}", breaker.metrics());

    println!("\n=== Example Complete ===");
    Ok(())
}
