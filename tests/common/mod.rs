//! Shared helpers for the integration tests.

use std::time::Duration;

/// Poll `condition` every 10 ms until it holds, or fail after `secs` seconds.
pub async fn wait_for(secs: u64, condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(secs), async {
        loop {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

/// Build an SSE body from (event name, json data) pairs.
pub fn sse_body(events: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, data) in events {
        body.push_str(&format!("event: {name}\ndata: {data}\n\n"));
    }
    body
}
