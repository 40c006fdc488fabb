use std::net::SocketAddr;
use std::sync::Arc;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};
use service::alumni::repo::SeaOrmAlumniRepository;
use service::AlumniService;

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    if std::env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let repo = Arc::new(SeaOrmAlumniRepository::new(db));
    let state = ServerState { alumni: Arc::new(AlumniService::new(repo)) };
    let app = routes::build_router(state, cors(), 1024 * 1024);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()) })
}

#[tokio::test]
async fn e2e_alumni_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let client = reqwest::Client::new();
    let email = format!("e2e_{}@example.com", Uuid::new_v4());

    let res = client
        .post(format!("{}/alumni", app.base_url))
        .json(&json!({"nama": "E2E", "email": email, "password": "rahasia123", "tahun_mulai": 2016, "tahun_lulus": 2020}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    assert!(body["data"].get("password").is_none());
    let id = body["data"]["id"].as_str().unwrap_or_default().to_string();

    let body: Value = client
        .get(format!("{}/alumni/check-email", app.base_url))
        .query(&[("email", email.as_str())])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"], true);

    let res = client
        .put(format!("{}/alumni/{}", app.base_url, id))
        .json(&json!({"tempat_kerja": "PT E2E"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let body: Value = client.get(format!("{}/alumni/{}", app.base_url, id)).send().await?.json().await?;
    assert_eq!(body["data"]["tempat_kerja"], "PT E2E");
    assert!(body["data"]["jurusan"].is_null());

    let res = client.delete(format!("{}/alumni", app.base_url)).query(&[("alumni_id", id.as_str())]).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client.get(format!("{}/alumni/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
