use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const BASE_URL: &str = "http://localhost:8000";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() {
    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", BASE_URL);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .unwrap();

    if client.get(format!("{}/health", BASE_URL)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable at localhost:8000. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let csrf_token = setup_organizer(&client).await;
    let event_id = setup_private_event(&client, &csrf_token).await;
    let invite_token = setup_invitee(&client, &csrf_token, &event_id, "guest@bench.local").await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Event ID:     {}", event_id);
    println!("   Invite Token: {}", invite_token);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", BASE_URL),
            body: None,
        },
        Target {
            name: "Verify Access (Direct Invitee, Tracking Write)",
            method: "POST",
            url: format!("{}/api/v1/events/{}/verify-access", BASE_URL, event_id),
            body: Some(json!({ "email": "guest@bench.local" })),
        },
        Target {
            name: "Verify Access (Shared Link)",
            method: "POST",
            url: format!("{}/api/v1/events/{}/verify-access", BASE_URL, event_id),
            body: Some(json!({ "email": "friend@bench.local", "inviteToken": invite_token })),
        },
        Target {
            name: "Private Event Read (Token Query)",
            method: "GET",
            url: format!("{}/api/v1/events/{}/private?inviteToken={}", BASE_URL, event_id, invite_token),
            body: None,
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

/// Signs up a throwaway organizer and logs in; the session cookie stays in the client.
async fn setup_organizer(client: &Client) -> String {
    let username = format!("bench-{}", Uuid::new_v4().simple());
    let password = format!("pw-{}", Uuid::new_v4().simple());

    let res = client.post(format!("{}/api/v1/organizers", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send signup request");

    if !res.status().is_success() {
        panic!("Failed to create organizer: status {}", res.status());
    }

    let login_res = client.post(format!("{}/api/v1/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed during setup");

    if !login_res.status().is_success() {
        panic!("Login failed. Status: {}", login_res.status());
    }

    let auth_body: Value = login_res.json().await.expect("Failed to parse login response");
    auth_body["csrfToken"].as_str().expect("No csrfToken").to_string()
}

async fn setup_private_event(client: &Client, csrf_token: &str) -> String {
    let event_payload = json!({
        "title": "Benchmark Launch Party",
        "date": (Utc::now() + ChronoDuration::days(30)).format("%Y-%m-%d").to_string(),
        "time": "19:00",
        "location": "Server Room",
        "bio": "Load testing",
        "status": "private"
    });

    let res = client.post(format!("{}/api/v1/events", BASE_URL))
        .header("X-CSRF-Token", csrf_token)
        .json(&event_payload)
        .send()
        .await
        .expect("Failed to create event");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create event data. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse event response");
    body["id"].as_str().expect("No event id").to_string()
}

async fn setup_invitee(client: &Client, csrf_token: &str, event_id: &str, email: &str) -> String {
    let res = client.post(format!("{}/api/v1/events/{}/invitees", BASE_URL, event_id))
        .header("X-CSRF-Token", csrf_token)
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to create invitee");

    if !res.status().is_success() {
        panic!("Failed to create invitee. Status: {}", res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse invitee response");
    body["inviteToken"].as_str().expect("No inviteToken").to_string()
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = match method {
                    "GET" => client.get(&url).send().await,
                    "POST" => {
                        let mut req = client.post(&url);
                        if let Some(b) = body {
                            req = req.json(&b);
                        }
                        req.send().await
                    },
                    _ => client.get(&url).send().await,
                };
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}