use chrono::{Duration as ChronoDuration, Utc};
use courselib_api::{AdminSeed, ApiConfig};
use courselib_auth::{Hs256Jwt, JwtClaims, Role, RoleSet};
use courselib_core::UserId;
use reqwest::StatusCode;
use serde_json::{Value, json};

const JWT_SECRET: &str = "test-secret";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with in-memory storage, bound to an ephemeral port.
        let mut config = ApiConfig::with_secret(JWT_SECRET);
        config.password_hash_iterations = 16;
        config.admin = Some(AdminSeed {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        });

        let app = courselib_api::app::build_app(&config).await.expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn sign_up(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/accounts/sign-up"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn sign_in(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/accounts/sign-in"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn token(&self, email: &str, password: &str) -> String {
        let res = self.sign_in(email, password).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn user_token(&self, email: &str) -> String {
        let res = self.sign_up(email, "password-123").await;
        assert_eq!(res.status(), StatusCode::CREATED);
        self.token(email, "password-123").await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn course_body(title: &str) -> Value {
    json!({ "title": title, "description": "Ownership and borrowing", "author": "Ferris" })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whoami_requires_a_valid_token() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/whoami"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn expired_token_is_rejected_even_on_public_routes() {
    let srv = TestServer::spawn().await;

    let now = Utc::now();
    let claims = JwtClaims {
        sub: UserId::new(),
        roles: RoleSet::single(Role::Admin),
        issued_at: now - ChronoDuration::hours(2),
        expires_at: now - ChronoDuration::hours(1),
    };
    let token = Hs256Jwt::new(JWT_SECRET.as_bytes(), ChronoDuration::minutes(10))
        .encode(&claims)
        .unwrap();

    let res = srv.client.get(srv.url("/courses")).bearer_auth(token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_up_sign_in_and_read_profile() {
    let srv = TestServer::spawn().await;

    let res = srv.sign_up("Alice@Example.com", "password-123").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()["location"].to_str().unwrap().to_string();
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(location, format!("/accounts/{id}"));

    let token = srv.token("alice@example.com", "password-123").await;

    let res = srv.client.get(srv.url("/whoami")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["user_id"], id.as_str());
    assert_eq!(me["roles"], json!(["user"]));

    let res = srv.client.get(srv.url(&location)).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let user: Value = res.json().await.unwrap();
    assert_eq!(user["email"], "alice@example.com");
    assert!(user.get("password_hash").is_none());

    // Anonymous callers may not read accounts.
    let res = srv.client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.client.get(srv.url("/accounts")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await.unwrap();
    // Seeded administrator plus Alice.
    assert_eq!(list["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn sign_up_rejects_duplicates_and_weak_passwords() {
    let srv = TestServer::spawn().await;

    assert_eq!(srv.sign_up("bob@example.com", "password-123").await.status(), StatusCode::CREATED);

    let res = srv.sign_up("BOB@example.com", "password-456").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = srv.sign_up("carol@example.com", "short").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn wrong_credentials_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    srv.sign_up("dave@example.com", "password-123").await;

    let wrong_password = srv.sign_in("dave@example.com", "password-999").await;
    let unknown_user = srv.sign_in("nobody@example.com", "password-123").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn change_password_requires_the_current_password() {
    let srv = TestServer::spawn().await;
    let token = srv.user_token("erin@example.com").await;

    let res = srv
        .client
        .patch(srv.url("/accounts/me/change-password"))
        .json(&json!({ "current_password": "password-123", "new_password": "password-456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .patch(srv.url("/accounts/me/change-password"))
        .bearer_auth(&token)
        .json(&json!({ "current_password": "wrong-password", "new_password": "password-456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(srv.sign_in("erin@example.com", "password-123").await.status(), StatusCode::OK);

    let res = srv
        .client
        .patch(srv.url("/accounts/me/change-password"))
        .bearer_auth(&token)
        .json(&json!({ "current_password": "password-123", "new_password": "password-456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_eq!(srv.sign_in("erin@example.com", "password-123").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(srv.sign_in("erin@example.com", "password-456").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn course_catalogue_is_public_but_admin_curated() {
    let srv = TestServer::spawn().await;
    let user_token = srv.user_token("frank@example.com").await;
    let admin_token = srv.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = srv.client.get(srv.url("/courses")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"], json!([]));

    let res = srv.client.post(srv.url("/courses")).json(&course_body("Rust")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/courses"))
        .bearer_auth(&user_token)
        .json(&course_body("Rust"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    let res = srv
        .client
        .post(srv.url("/courses"))
        .bearer_auth(&admin_token)
        .json(&course_body("Rust"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()["location"].to_str().unwrap().to_string();

    let res = srv.client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let course: Value = res.json().await.unwrap();
    assert_eq!(course["title"], "Rust");

    let res = srv
        .client
        .put(srv.url(&location))
        .bearer_auth(&admin_token)
        .json(&course_body("Advanced Rust"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let course: Value = srv.client.get(srv.url(&location)).send().await.unwrap().json().await.unwrap();
    assert_eq!(course["title"], "Advanced Rust");

    let res = srv
        .client
        .delete(srv.url(&location))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .delete(srv.url(&location))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_course_payload_and_ids_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let admin_token = srv.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = srv
        .client
        .post(srv.url("/courses"))
        .bearer_auth(&admin_token)
        .json(&json!({ "title": "   ", "author": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let res = srv.client.get(srv.url("/courses/not-a-uuid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
