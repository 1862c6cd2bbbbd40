use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use menuboard_api::app::{build_app, AppServices};
use menuboard_core::EstablishmentId;
use menuboard_infra::workers::SubscriptionSweeper;
use menuboard_notifications::MessageStyle;
use menuboard_subscriptions::{CheckoutProvider, CheckoutRequest, UpstreamError, sign_webhook_payload};

const PHONE: &str = "+55 (11) 99999-0000";
const WEBHOOK_SECRET: &str = "whsec-test";

struct StubCheckout;

#[async_trait]
impl CheckoutProvider for StubCheckout {
    async fn create_checkout_link(&self, request: &CheckoutRequest) -> Result<String, UpstreamError> {
        Ok(format!(
            "https://checkout.test/{}/{}",
            request.plan, request.establishment_id
        ))
    }
}

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_secret(Some(WEBHOOK_SECRET)).await
    }

    async fn spawn_with_secret(webhook_secret: Option<&str>) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = Arc::new(
            AppServices::in_memory(Arc::new(StubCheckout), MessageStyle::default())
                .with_webhook_secret(webhook_secret.map(str::to_string)),
        );
        let app = build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        read(res).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        read(res).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        read(res).await
    }

    async fn delete(&self, path: &str) -> StatusCode {
        self.client.delete(self.url(path)).send().await.unwrap().status()
    }

    async fn register(&self, phone: Option<&str>) -> String {
        let (status, body) = self
            .post(
                "/api/establishments",
                json!({ "name": "Pizzaria Bella", "contact_phone": phone }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    /// POST a payment callback signed with `secret`, or unsigned when `None`.
    async fn callback(&self, body: Value, secret: Option<&str>) -> (StatusCode, Value) {
        let raw = serde_json::to_vec(&body).unwrap();
        let mut req = self
            .client
            .post(self.url("/api/subscriptions/webhook"))
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            req = req.header("x-signature", sign_webhook_payload(&raw, secret, Utc::now()).unwrap());
        }
        read(req.body(raw).send().await.unwrap()).await
    }

    async fn webhook(&self, body: Value) -> (StatusCode, Value) {
        self.callback(body, Some(WEBHOOK_SECRET)).await
    }

    async fn activate(&self, est: &str) {
        let (status, _) = self
            .webhook(json!({ "establishment_id": est, "status": "approved", "plan": "monthly" }))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    async fn create_category(&self, est: &str, name: &str, sort_order: i32) -> String {
        let (status, body) = self
            .post(
                &format!("/api/establishments/{est}/categories"),
                json!({ "name": name, "sort_order": sort_order }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_pizza(&self, est: &str, category: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/establishments/{est}/products"),
                json!({
                    "category_id": category,
                    "name": "Pizza Margherita",
                    "base_price": 2500,
                    "option_groups": [
                        {
                            "name": "Size",
                            "kind": "single_select",
                            "items": [
                                { "label": "Medium" },
                                { "label": "Large", "extra_price": 300 }
                            ]
                        },
                        { "name": "Slices", "kind": "quantity", "items": [] }
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn order_count(&self, est: &str) -> usize {
        let (status, body) = self.get(&format!("/api/establishments/{est}/orders")).await;
        assert_eq!(status, StatusCode::OK);
        body["items"].as_array().unwrap().len()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    let text = res.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}

/// Registered, subscribed establishment with one category and one product.
async fn seeded_menu(srv: &TestServer) -> (String, String, String) {
    let est = srv.register(Some(PHONE)).await;
    srv.activate(&est).await;
    let category = srv.create_category(&est, "Pizzas", 1).await;
    let product = srv.create_pizza(&est, &category).await;
    (est, category, product)
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn order_is_priced_persisted_and_linked() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;

    let (status, body) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777", "address": "Rua A, 10" },
                "items": [{
                    "product_id": product,
                    "quantity": 2,
                    "notes": "no onions",
                    "selected_options": [
                        { "group_name": "Size", "selection": "Large" },
                        { "group_name": "Slices", "selection": "8" },
                        { "group_name": "Crust", "selection": "Thin" }
                    ]
                }],
                "notes": "ring the bell"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let order = &body["order"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], 5600);
    assert_eq!(order["lines"][0]["unit_price"], 2800);
    assert_eq!(order["lines"][0]["product_name"], "Pizza Margherita");

    let selected = order["lines"][0]["selected_options"].as_array().unwrap();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[1]["group_name"], "Slices");
    assert_eq!(selected[1]["extra_price"], 0);

    let url = body["whatsapp_url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/5511999990000?text="), "{url}");
    assert!(url.contains("%2ATotal%3A%2A%20R%24%2056.00"), "{url}");

    assert_eq!(srv.order_count(&est).await, 1);
}

#[tokio::test]
async fn invalid_quantity_rejects_the_whole_order() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;

    let (status, body) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [
                    { "product_id": product, "quantity": 1 },
                    { "product_id": product, "quantity": 0 }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(srv.order_count(&est).await, 0);
}

#[tokio::test]
async fn unknown_product_is_not_found_and_nothing_is_stored() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;

    let (status, _) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [
                    { "product_id": product, "quantity": 1 },
                    { "product_id": EstablishmentId::new().to_string(), "quantity": 1 }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(srv.order_count(&est).await, 0);
}

#[tokio::test]
async fn establishment_without_contact_channel_cannot_take_orders() {
    let srv = TestServer::spawn().await;
    let est = srv.register(None).await;
    srv.activate(&est).await;
    let category = srv.create_category(&est, "Pizzas", 1).await;
    let product = srv.create_pizza(&est, &category).await;

    let (status, body) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("WhatsApp"));
    assert_eq!(srv.order_count(&est).await, 0);
}

#[tokio::test]
async fn ordering_does_not_require_a_subscription() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;

    srv.webhook(json!({ "establishment_id": est, "status": "refunded", "plan": "monthly" }))
        .await;

    let (status, _) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn management_routes_require_an_active_subscription() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;

    let (status, body) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "subscription_required");

    let (status, _) = srv
        .post(
            &format!("/api/establishments/{est}/products"),
            json!({ "name": "Soda", "base_price": 500 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = srv
        .get(&format!("/api/establishments/{}/orders", EstablishmentId::new()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = srv.get("/api/establishments/not-a-uuid/categories").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");

    // Profile routes stay open.
    let (status, body) = srv
        .put(
            &format!("/api/establishments/{est}"),
            json!({ "welcome_message": "Bem-vindo!" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presentation"]["welcome_message"], "Bem-vindo!");
    assert_eq!(body["subscription"]["active"], false);
}

#[tokio::test]
async fn expired_subscription_is_denied_until_the_sweeper_flips_it() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;
    let id: EstablishmentId = est.parse().unwrap();

    let store = srv.services.establishment_store();
    store
        .update(id, &mut |e| {
            e.subscription.active = true;
            e.subscription.expires_at = Some(Utc::now() - ChronoDuration::days(1));
            Ok(())
        })
        .unwrap();

    let (status, _) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = srv.get(&format!("/api/public-menu/{est}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The gate itself does not write.
    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], true);

    let sweeper = SubscriptionSweeper::new(store, std::time::Duration::from_secs(60));
    assert_eq!(sweeper.sweep(Utc::now()), vec![id]);

    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], false);
}

#[tokio::test]
async fn public_menu_lists_visible_categories_and_available_products() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;

    let (status, _) = srv.get(&format!("/api/public-menu/{est}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    srv.activate(&est).await;
    let drinks = srv.create_category(&est, "Drinks", 2).await;
    let pizzas = srv.create_category(&est, "Pizzas", 1).await;
    let hidden = srv.create_category(&est, "Seasonal", 0).await;
    srv.put(
        &format!("/api/establishments/{est}/categories/{hidden}"),
        json!({ "active": false }),
    )
    .await;
    srv.create_pizza(&est, &pizzas).await;
    let (_, soda) = srv
        .post(
            &format!("/api/establishments/{est}/products"),
            json!({ "category_id": drinks, "name": "Soda", "base_price": 500, "available": false }),
        )
        .await;
    assert_eq!(soda["available"], false);

    let (status, body) = srv.get(&format!("/api/public-menu/{est}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pizzaria Bella");

    let (_, body) = srv.get(&format!("/api/public-menu/{est}/categories")).await;
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pizzas", "Drinks"]);

    let (_, body) = srv.get(&format!("/api/public-menu/{est}/products")).await;
    let products = body["items"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Pizza Margherita");
}

#[tokio::test]
async fn deleting_a_category_deletes_its_products() {
    let srv = TestServer::spawn().await;
    let (est, category, product) = seeded_menu(&srv).await;
    let other = srv.create_category(&est, "Drinks", 2).await;
    srv.post(
        &format!("/api/establishments/{est}/products"),
        json!({ "category_id": other, "name": "Soda", "base_price": 500 }),
    )
    .await;

    let (_, body) = srv
        .get(&format!("/api/establishments/{est}/categories/{category}/products"))
        .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let status = srv
        .delete(&format!("/api/establishments/{est}/categories/{category}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = srv.get(&format!("/api/establishments/{est}/products")).await;
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Soda"]);

    let (status, _) = srv
        .put(
            &format!("/api/establishments/{est}/products/{product}"),
            json!({ "name": "Gone" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_status_follows_the_lifecycle() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;

    let (_, body) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;
    let order = body["order"]["id"].as_str().unwrap().to_string();
    let path = format!("/api/establishments/{est}/orders/{order}");

    let (status, body) = srv.put(&path, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, body) = srv.put(&path, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = srv.put(&path, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = srv.put(&path, json!({ "status": "delivered" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2500);

    assert_eq!(srv.delete(&path).await, StatusCode::NO_CONTENT);
    assert_eq!(srv.order_count(&est).await, 0);
}

#[tokio::test]
async fn orders_are_scoped_to_their_establishment() {
    let srv = TestServer::spawn().await;
    let (est, _, product) = seeded_menu(&srv).await;
    let other = srv.register(Some(PHONE)).await;
    srv.activate(&other).await;

    let (_, body) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": est,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;
    let order = body["order"]["id"].as_str().unwrap().to_string();

    assert_eq!(srv.order_count(&other).await, 0);
    let (status, _) = srv
        .put(
            &format!("/api/establishments/{other}/orders/{order}"),
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A product of one establishment cannot be ordered through another.
    let (status, _) = srv
        .post(
            "/api/orders",
            json!({
                "establishment_id": other,
                "customer": { "name": "Ana", "phone": "11988887777" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_returns_provider_link() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;

    let (status, body) = srv
        .post(
            "/api/subscriptions/checkout",
            json!({ "plan": "annual", "establishment_id": est }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["checkout_url"],
        format!("https://checkout.test/annual/{est}")
    );

    let (status, body) = srv
        .post(
            "/api/subscriptions/checkout",
            json!({ "plan": "weekly", "establishment_id": est }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn payment_webhook_drives_subscription_state() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;

    srv.webhook(json!({ "establishment_id": est, "status": "pending", "plan": "monthly" }))
        .await;
    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], false);

    srv.activate(&est).await;
    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], true);
    assert!(body["subscription"]["expires_at"].is_string());
    let (status, _) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = srv
        .webhook(json!({ "establishment_id": est, "status": "charged_back", "plan": "monthly" }))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = srv
        .webhook(json!({ "establishment_id": EstablishmentId::new(), "status": "approved", "plan": "monthly" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsigned_or_forged_payment_callbacks_change_nothing() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;
    let approve = json!({ "establishment_id": est, "status": "approved", "plan": "annual" });

    let (status, body) = srv.callback(approve.clone(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_signature");

    let (status, _) = srv.callback(approve.clone(), Some("guessed-secret")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], false);
    let (status, _) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = srv.webhook(approve).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = srv.get(&format!("/api/establishments/{est}/categories")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn payment_callbacks_are_refused_without_a_configured_secret() {
    let srv = TestServer::spawn_with_secret(None).await;
    let est = srv.register(Some(PHONE)).await;

    let (status, body) = srv
        .callback(
            json!({ "establishment_id": est, "status": "approved", "plan": "monthly" }),
            Some(WEBHOOK_SECRET),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "webhook_not_configured");

    let (_, body) = srv.get(&format!("/api/establishments/{est}")).await;
    assert_eq!(body["subscription"]["active"], false);
}

#[tokio::test]
async fn public_menu_listings_stay_open_without_a_subscription() {
    let srv = TestServer::spawn().await;
    let est = srv.register(Some(PHONE)).await;

    let (status, _) = srv.get(&format!("/api/public-menu/{est}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = srv.get(&format!("/api/public-menu/{est}/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));

    let (status, body) = srv.get(&format!("/api/public-menu/{est}/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));

    // Catalog built while subscribed stays visible after the subscription ends.
    srv.activate(&est).await;
    let pizzas = srv.create_category(&est, "Pizzas", 1).await;
    srv.create_pizza(&est, &pizzas).await;
    srv.webhook(json!({ "establishment_id": est, "status": "cancelled", "plan": "monthly" }))
        .await;

    let (status, body) = srv.get(&format!("/api/public-menu/{est}/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Pizza Margherita");

    let (status, _) = srv
        .get(&format!("/api/public-menu/{}/categories", EstablishmentId::new()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
