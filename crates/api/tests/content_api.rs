//! Public read endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, spawn_app};
use kitchen_core::store::DocumentStore;
use serde_json::json;

#[tokio::test]
async fn empty_store_serves_defaults() {
    let app = spawn_app();

    let json = body_json(get(app.router.clone(), "/api/home").await).await;
    let home = &json["data"];
    assert!(home["hero"]["imageUrl"].as_str().unwrap().starts_with("https://"));
    assert_eq!(home["navbar"]["logo"], "/logo.png");
    assert_eq!(home["navbar"]["links"].as_array().unwrap().len(), 5);
    assert_eq!(home["navbar"]["links"][2]["href"], "/rasoi");
    assert_eq!(home["services"], json!([]));
    assert_eq!(home["social"]["instagram"], "");

    // The built-in catalog stands in until a menu is saved.
    let json = body_json(get(app.router, "/api/menu").await).await;
    assert!(!json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn hero_reads_legacy_keys() {
    let app = spawn_app();
    app.store
        .set("Home", "hero-section", json!({ "hero-text": "Ghar ka khana", "hero-img": "https://img/thali.jpg" }))
        .await
        .unwrap();

    let json = body_json(get(app.router, "/api/home").await).await;
    assert_eq!(json["data"]["hero"]["text"], "Ghar ka khana");
    assert_eq!(json["data"]["hero"]["imageUrl"], "https://img/thali.jpg");
}

#[tokio::test]
async fn navbar_and_about_drop_empty_entries() {
    let app = spawn_app();
    app.store
        .set("Home", "navbar", json!({ "logo": "/mona.png", "item1": "Home", "item2": "", "item3": "Rasoi", "item4": "Trending", "item5": "Contact" }))
        .await
        .unwrap();
    app.store
        .set("Home", "about-section", json!({ "abt-text": "Cooking since 1998", "feature-1": "Pure veg", "feature-2": "" }))
        .await
        .unwrap();

    let json = body_json(get(app.router, "/api/home").await).await;
    let links = json["data"]["navbar"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 4);
    assert_eq!(links[1]["name"], "Rasoi");
    assert_eq!(links[1]["href"], "/rasoi");
    assert_eq!(json["data"]["about"]["features"], json!(["Pure veg"]));
}

#[tokio::test]
async fn services_fall_back_to_legacy_image_key() {
    let app = spawn_app();
    app.store
        .set("Services", "s1", json!({ "title": "Catering", "description": "Weddings", "img": "https://img/old.jpg" }))
        .await
        .unwrap();
    app.store
        .set("Services", "s2", json!({ "title": "Tiffin", "description": "Daily meals" }))
        .await
        .unwrap();

    let json = body_json(get(app.router, "/api/home").await).await;
    let services = json["data"]["services"].as_array().unwrap();
    assert_eq!(services[0]["imageUrl"], "https://img/old.jpg");
    assert_eq!(services[1]["imageUrl"], "/default-service.jpg");
}

#[tokio::test]
async fn tiffin_week_is_ordered() {
    let app = spawn_app();
    for (id, day, order) in [("d3", "Wednesday", 3), ("d1", "Today", 1), ("d2", "Tomorrow", 2)] {
        app.store
            .set("TiffinMenu", id, json!({ "day": day, "order": order }))
            .await
            .unwrap();
    }

    let json = body_json(get(app.router, "/api/tiffin").await).await;
    let days: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["day"].as_str().unwrap())
        .collect();
    assert_eq!(days, vec!["Today", "Tomorrow", "Wednesday"]);
}

#[tokio::test]
async fn trending_cards_carry_price_and_badge() {
    let app = spawn_app();
    app.store
        .set("Trending", "t1", json!({ "name": "Modak", "price": "30", "discount": 10 }))
        .await
        .unwrap();

    let json = body_json(get(app.router, "/api/trending").await).await;
    let card = &json["data"][0];
    assert_eq!(card["price"], "₹30");
    assert_eq!(card["discountBadge"], "10% OFF");
    assert!(card["image"].as_str().unwrap().starts_with("/placeholder.svg"));
}

#[tokio::test]
async fn products_are_pinned_first_and_searchable() {
    let app = spawn_app();
    let products = [
        ("p1", "Kanda Poha", "Flattened rice with onion", "no"),
        ("p2", "Besan Ladoo", "Roasted gram flour sweets", "yes"),
        ("p3", "Sabudana Khichdi", "Sago with peanuts", "no"),
    ];
    for (id, title, description, pinned) in products {
        app.store
            .set("products", id, json!({ "title": title, "description": description, "photolink": "https://img/x.jpg", "price": "60", "pinned": pinned }))
            .await
            .unwrap();
    }

    let json = body_json(get(app.router.clone(), "/api/products").await).await;
    let titles: Vec<&str> = json["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Besan Ladoo", "Kanda Poha", "Sabudana Khichdi"]);

    let json = body_json(get(app.router, "/api/products?q=RICE").await).await;
    assert_eq!(json["data"]["terms"], json!(["rice"]));
    let products = json["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["title"], "Kanda Poha");
}

#[tokio::test]
async fn popups_come_with_defaults_and_schedule() {
    let app = spawn_app();
    app.store
        .set("Ads", "a1", json!({ "title": "", "desc": "Diwali faral", "price": "$10.00", "theme": "teal" }))
        .await
        .unwrap();

    let json = body_json(get(app.router, "/api/popups").await).await;
    let feed = &json["data"];
    assert_eq!(feed["rotates"], false);
    assert_eq!(feed["schedule"]["show_after_secs"], 2);
    let offer = &feed["offers"][0];
    assert_eq!(offer["title"], "Special Offer");
    assert_eq!(offer["img"], "🛒");
    assert_eq!(offer["theme"], "orange");
    assert_eq!(offer["originalPrice"], "$13.00");
}

#[tokio::test]
async fn store_outage_is_a_fetch_failure() {
    let app = spawn_app();
    app.store.fail_reads(true);
    let response = get(app.router, "/api/menu").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "FETCH_FAILED");
}
