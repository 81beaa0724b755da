//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test database setup (skipped when `DATABASE_URL` is unset)
//! - A region lookup stub, so tests never reach the network
//! - Registered test users with bearer tokens
//! - Request helpers that return the decoded JSON envelope

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use okefin_api::{
    app::{build_router, AppState},
    config::Config,
};
use okefin_shared::{
    auth::jwt::{create_token, Claims},
    db::migrations::run_migrations,
    models::{category::Category, user::User},
    region::{City, Province, RegionError, RegionLookup},
    services::{
        self,
        auth::Registration,
        products::{NewProduct, ProductView},
    },
};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const PASSWORD: &str = "rahasia123";

/// Region names derived from the id; id `"0"` fails like an unreachable service
pub struct StubRegion;

#[async_trait]
impl RegionLookup for StubRegion {
    async fn province(&self, id: &str) -> Result<Province, RegionError> {
        if id == "0" {
            return Err(RegionError::NotFound(id.to_string()));
        }
        Ok(Province {
            id: id.to_string(),
            name: format!("Provinsi {}", id),
        })
    }

    async fn city(&self, id: &str) -> Result<City, RegionError> {
        if id == "0" {
            return Err(RegionError::NotFound(id.to_string()));
        }
        Ok(City {
            id: id.to_string(),
            province_id: id.chars().take(2).collect(),
            name: format!("Kota {}", id),
        })
    }
}

/// A registered user with a bearer token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub user: TestUser,
    upload_dir: TempDir,
}

impl TestContext {
    /// Creates a test context, or `None` when no test database is configured
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return Ok(None);
        };

        let upload_dir = tempfile::tempdir()?;
        let upload_path = upload_dir.path().to_string_lossy().to_string();

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(database_url.clone()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            "UPLOAD_DIR" => Some(upload_path.clone()),
            _ => None,
        })?;

        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let user = register_user(&db).await?;

        let state = AppState::new(db.clone(), config.clone(), Arc::new(StubRegion));
        let app = build_router(state);

        Ok(Some(Self {
            db,
            app,
            config,
            user,
            upload_dir,
        }))
    }

    pub fn upload_path(&self) -> &std::path::Path {
        self.upload_dir.path()
    }

    /// Registers another user
    pub async fn new_user(&self) -> anyhow::Result<TestUser> {
        register_user(&self.db).await
    }

    /// Registers another user and grants admin rights
    pub async fn new_admin(&self) -> anyhow::Result<TestUser> {
        let mut admin = register_user(&self.db).await?;
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
            .bind(admin.user.id)
            .execute(&self.db)
            .await?;
        admin.user.is_admin = true;
        Ok(admin)
    }

    pub async fn create_category(&self) -> anyhow::Result<Category> {
        let name = format!("Kategori {}", Uuid::new_v4().simple());
        Ok(services::categories::create_category(&self.db, &name).await?)
    }

    /// Creates a product in `owner`'s store
    pub async fn create_product(&self, owner: &TestUser, price: f64, stock: i32) -> anyhow::Result<ProductView> {
        let category = self.create_category().await?;
        let view = services::products::create_product(
            &self.db,
            owner.user.id,
            NewProduct {
                category_id: category.id,
                name: format!("Produk {}", Uuid::new_v4().simple()),
                price,
                stock,
                description: "Produk uji".to_string(),
                photo_urls: vec!["/uploads/a.png".to_string()],
            },
        )
        .await?;
        Ok(view)
    }

    /// Creates an address for `owner` through the API and returns its id
    pub async fn create_address(&self, owner: &TestUser) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/alamat",
                Some(owner),
                Some(serde_json::json!({
                    "judul_alamat": "Rumah",
                    "nama_penerima": "Penerima",
                    "no_telp": "0800",
                    "detail_alamat": "Jl. Uji 1"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    /// Sends a request and decodes the JSON response body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&TestUser>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, user.auth_header());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        send_request(&self.app, request).await
    }

    /// Stock of a product straight from the database
    pub async fn stock_of(&self, product_id: i64) -> i32 {
        sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.db)
            .await
            .unwrap()
    }
}

/// Runs a request against `app` and decodes the body as JSON
///
/// A non-JSON body is returned as a JSON string.
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Unique registration input
pub fn registration() -> Registration {
    let unique = Uuid::new_v4().simple().to_string();
    Registration {
        name: format!("Pengguna {}", &unique[..8]),
        password: PASSWORD.to_string(),
        phone: format!("08{}", &unique[..12]),
        birth_date: "2000-01-31".to_string(),
        occupation: "Penguji".to_string(),
        email: format!("user-{}@example.com", unique),
        province_id: "11".to_string(),
        city_id: "1101".to_string(),
    }
}

async fn register_user(db: &PgPool) -> anyhow::Result<TestUser> {
    let profile = services::auth::register(db, &StubRegion, registration()).await?;
    let user = profile.user;
    let token = create_token(&Claims::new(user.id, user.email.clone()), JWT_SECRET)?;
    Ok(TestUser { user, token })
}
