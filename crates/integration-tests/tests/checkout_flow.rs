//! End-to-end checkout through the HTTP API.
//!
//! Each test starts its own in-memory storefront; no external services.

#![allow(clippy::indexing_slicing)]

use lesson_shop_client::{CheckoutError, CheckoutPhase, ShopSession, View};
use lesson_shop_core::{Lesson, LessonId};
use lesson_shop_integration_tests::{TestServer, new_lesson, starter_catalog};

fn id_of(lessons: &[Lesson], subject: &str) -> LessonId {
    lessons
        .iter()
        .find(|l| l.subject == subject)
        .map(|l| l.id)
        .expect("lesson missing from catalog")
}

fn spaces_of(lessons: &[Lesson], id: LessonId) -> u32 {
    lessons
        .iter()
        .find(|l| l.id == id)
        .map(|l| l.spaces)
        .expect("lesson missing from catalog")
}

#[tokio::test]
async fn test_checkout_places_order_and_writes_spaces() {
    let server = TestServer::start(starter_catalog()).await;
    let mut session = ShopSession::new(server.client());
    session.load_catalog().await.expect("Failed to load catalog");

    let lessons = server.lessons().await;
    let math = id_of(&lessons, "Mathematics");
    let english = id_of(&lessons, "English");

    assert!(session.add_to_cart(math));
    assert!(session.add_to_cart(english));
    assert!(session.add_to_cart(math));
    assert_eq!(session.toggle_view(), View::Checkout);

    session.set_name("Ada Lovelace");
    session.set_phone("07700900123");
    assert!(session.can_checkout());

    let receipt = session.submit_order().await.expect("Checkout failed");

    // Server holds the final counts
    let lessons = server.lessons().await;
    assert_eq!(spaces_of(&lessons, math), 3);
    assert_eq!(spaces_of(&lessons, english), 4);

    // One order, one id per unit
    let orders = server.store.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, receipt.order_id);
    assert_eq!(orders[0].lesson_ids, vec![math, english, math]);
    assert_eq!(orders[0].phone.as_str(), "07700900123");

    // Session is back on the catalog, empty
    assert!(session.cart().is_empty());
    assert_eq!(session.form().name, "");
    assert_eq!(session.view(), View::Catalog);
    assert_eq!(session.phase(), CheckoutPhase::Completed);
    assert_eq!(session.lesson(math).map(|l| l.spaces), Some(3));
}

#[tokio::test]
async fn test_search_reload_keeps_reservations() {
    let server = TestServer::start(starter_catalog()).await;
    let mut session = ShopSession::new(server.client());
    session.load_catalog().await.expect("Failed to load catalog");
    let math = id_of(&server.lessons().await, "Mathematics");

    session.add_to_cart(math);
    session.add_to_cart(math);

    session.set_search("hen").await.expect("Search failed");
    assert_eq!(session.visible_lessons().len(), 2);
    assert_eq!(session.lesson(math).map(|l| l.spaces), Some(3));

    session.set_search("").await.expect("Reload failed");
    assert_eq!(session.visible_lessons().len(), 4);
    assert_eq!(session.lesson(math).map(|l| l.spaces), Some(3));

    // Nothing was written yet
    assert_eq!(spaces_of(&server.lessons().await, math), 5);
}

#[tokio::test]
async fn test_sold_out_lesson_cannot_be_added() {
    let server = TestServer::start(starter_catalog()).await;
    let mut session = ShopSession::new(server.client());
    session.load_catalog().await.expect("Failed to load catalog");
    let lessons = server.lessons().await;

    assert!(!session.add_to_cart(id_of(&lessons, "Art")));

    let music = id_of(&lessons, "Music");
    assert!(session.add_to_cart(music));
    assert!(!session.add_to_cart(music));
    assert_eq!(session.cart().len(), 1);
}

#[tokio::test]
async fn test_concurrent_checkouts_last_write_wins() {
    let server = TestServer::start([new_lesson("Mathematics", "Hendon", 100, 5)]).await;
    let math = server.lessons().await[0].id;

    let mut first = ShopSession::new(server.client());
    let mut second = ShopSession::new(server.client());
    first.load_catalog().await.expect("Failed to load catalog");
    second.load_catalog().await.expect("Failed to load catalog");

    first.add_to_cart(math);
    first.add_to_cart(math);
    second.add_to_cart(math);

    for session in [&mut first, &mut second] {
        session.set_name("Grace Hopper");
        session.set_phone("0123456789");
    }

    first.submit_order().await.expect("First checkout failed");
    second.submit_order().await.expect("Second checkout failed");

    // Both orders exist, but the second absolute write overwrote the first:
    // three units sold, only one space taken off
    assert_eq!(server.store.orders().await.len(), 2);
    assert_eq!(spaces_of(&server.lessons().await, math), 4);
}

#[tokio::test]
async fn test_concurrent_checkouts_can_oversell() {
    let server = TestServer::start([new_lesson("Music", "Brent Cross", 115, 2)]).await;
    let music = server.lessons().await[0].id;

    let mut first = ShopSession::new(server.client());
    let mut second = ShopSession::new(server.client());
    for session in [&mut first, &mut second] {
        session.load_catalog().await.expect("Failed to load catalog");
        assert!(session.add_to_cart(music));
        assert!(session.add_to_cart(music));
        session.set_name("Grace Hopper");
        session.set_phone("0123456789");
    }

    first.submit_order().await.expect("First checkout failed");
    second.submit_order().await.expect("Second checkout failed");

    // Four units sold against two spaces; the count bottoms out at zero
    let orders = server.store.orders().await;
    assert_eq!(orders.len(), 2);
    let sold: usize = orders
        .iter()
        .map(|o| o.lesson_ids.iter().filter(|&&id| id == music).count())
        .sum();
    assert_eq!(sold, 4);
    assert_eq!(spaces_of(&server.lessons().await, music), 0);
}

#[tokio::test]
async fn test_unreachable_server_keeps_cart_and_form() {
    let mut server = TestServer::start(starter_catalog()).await;
    let mut session = ShopSession::new(server.client());
    session.load_catalog().await.expect("Failed to load catalog");
    let math = id_of(&server.lessons().await, "Mathematics");

    session.add_to_cart(math);
    session.set_name("Ada");
    session.set_phone("123");

    server.stop().await;

    let err = session
        .submit_order()
        .await
        .expect_err("Checkout should fail without a server");
    assert!(matches!(err, CheckoutError::OrderFailed(_)));
    assert!(err.user_message().contains("try again"));

    assert_eq!(session.phase(), CheckoutPhase::Failed);
    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.form().name, "Ada");
    assert_eq!(session.lesson(math).map(|l| l.spaces), Some(4));
}
