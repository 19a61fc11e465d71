//! Integration tests for the lesson shop.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory storefront, no external services
//! cargo test -p lesson-shop-integration-tests
//!
//! # Postgres-backed tests (migrated database required)
//! STOREFRONT_DATABASE_URL=postgres://... cargo test -p lesson-shop-integration-tests -- --ignored
//! ```
//!
//! [`TestServer`] runs the real storefront router on an ephemeral port so
//! tests drive it through [`HttpShopClient`], exactly as the UI does.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use lesson_shop_client::{ClientConfig, HttpShopClient};
use lesson_shop_core::{Lesson, NewLesson, Price};
use lesson_shop_storefront::config::StorefrontConfig;
use lesson_shop_storefront::db::{LessonStore, MemoryStore};
use lesson_shop_storefront::routes;
use lesson_shop_storefront::state::AppState;

/// A storefront served from an in-memory store.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    server: JoinHandle<()>,
    shutdown: Option<oneshot::Sender<()>>,
    _images: tempfile::TempDir,
}

impl TestServer {
    /// Start a storefront holding `lessons`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(lessons: impl IntoIterator<Item = NewLesson>) -> Self {
        let images = tempfile::tempdir().expect("Failed to create image dir");
        std::fs::write(images.path().join("math.svg"), "<svg/>").expect("Failed to write image");

        let store = MemoryStore::with_lessons(lessons).await;
        let state = AppState::in_memory(StorefrontConfig::in_memory(images.path()), store.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = routes::app(state);
        let (shutdown, signal) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    signal.await.ok();
                })
                .await
                .ok();
        });

        Self {
            addr,
            store,
            server,
            shutdown: Some(shutdown),
            _images: images,
        }
    }

    /// Stop accepting requests and close open connections.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
            (&mut self.server).await.ok();
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A new API client pointed at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse.
    #[must_use]
    pub fn client(&self) -> HttpShopClient {
        let config = ClientConfig::new(&self.base_url()).expect("Invalid test base URL");
        HttpShopClient::new(&config)
    }

    /// Current state of every lesson, straight from the store.
    ///
    /// # Panics
    ///
    /// Panics if the store fails.
    pub async fn lessons(&self) -> Vec<Lesson> {
        self.store.find_all().await.expect("Store read failed")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A lesson for seeding test servers.
#[must_use]
pub fn new_lesson(subject: &str, location: &str, price: u32, spaces: u32) -> NewLesson {
    NewLesson {
        subject: subject.to_owned(),
        location: location.to_owned(),
        price: Price::from_units(price),
        spaces,
        image: "math.svg".to_owned(),
    }
}

/// The catalog most tests start from.
#[must_use]
pub fn starter_catalog() -> Vec<NewLesson> {
    vec![
        new_lesson("Mathematics", "Hendon", 100, 5),
        new_lesson("English", "Colindale", 90, 5),
        new_lesson("Music", "Brent Cross", 115, 1),
        new_lesson("Art", "Hendon", 70, 0),
    ]
}
