use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::routes::{self, users::ServerState};
use server::startup::build_cors;
use service::registration::repository::memory::InMemoryUserRepository;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let state = ServerState::new(Arc::new(InMemoryUserRepository::default()));
    let app: Router = routes::build_router(state, build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_banner() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, routes::HOME_STATUS);
    Ok(())
}

#[tokio::test]
async fn e2e_signup_duplicate_and_cors() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let email = format!("user_{}@example.com", Uuid::new_v4());

    let res = c.post(format!("{}/api/users/signup", app.base_url))
        .header("Origin", "https://app.example.org")
        .json(&json!({"name": "Tester", "email": email}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("https://app.example.org")
    );
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);

    let res = c.post(format!("{}/api/users/signup", app.base_url))
        .json(&json!({"name": "Tester Again", "email": email}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Email already exists");
    Ok(())
}

#[tokio::test]
async fn e2e_parallel_signups_single_winner() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let email = format!("race_{}@example.com", Uuid::new_v4());

    let mut handles = Vec::new();
    for i in 0..8 {
        let c = c.clone();
        let url = format!("{}/api/users/signup", app.base_url);
        let body = json!({"name": format!("Racer {i}"), "email": email});
        handles.push(tokio::spawn(async move { c.post(url).json(&body).send().await }));
    }
    let mut ok = 0;
    for h in handles {
        let res = h.await??;
        match res.status() {
            HttpStatusCode::OK => ok += 1,
            HttpStatusCode::BAD_REQUEST => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    Ok(())
}
