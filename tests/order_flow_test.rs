mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{decimal, response_json, TestApp};

#[tokio::test]
async fn order_lifecycle_from_table_to_receipt() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T1").await;
    let paneer = app.seed_menu_item("Paneer Tikka", dec!(250.00)).await;
    let lassi = app.seed_menu_item("Sweet Lassi", dec!(120.00)).await;

    let order = app.place_order(table_id, &[(paneer, 2), (lassi, 1)]).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    assert_eq!(order["status"], "pending");
    assert_eq!(order["table_name"], "T1");
    assert_eq!(decimal(&order["subtotal"]), dec!(620.00));
    assert_eq!(decimal(&order["tax_amount"]), dec!(49.60));
    assert_eq!(decimal(&order["total"]), dec!(669.60));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    // the table is now taken
    let table = app
        .request_authenticated(Method::GET, &format!("/api/v1/tables/{table_id}"), None)
        .await;
    let table = response_json(table).await;
    assert_eq!(table["data"]["status"], "occupied");
    assert_eq!(table["data"]["current_order_id"], order_id.as_str());

    let queue = app
        .request_authenticated(Method::GET, "/api/v1/kitchen/queue", None)
        .await;
    assert_eq!(queue.status(), StatusCode::OK);
    let queue = response_json(queue).await;
    let tickets = queue["data"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["id"], order_id.as_str());
    assert!(tickets[0]["elapsed_minutes"].as_i64().unwrap() >= 0);

    for status in ["preparing", "ready", "served"] {
        let response = app
            .request_authenticated(
                Method::PUT,
                &format!("/api/v1/orders/{order_id}/status"),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "moving to {status}");
        let body = response_json(response).await;
        assert_eq!(body["data"]["status"], status);
        for item in body["data"]["items"].as_array().unwrap() {
            assert_eq!(item["status"], status);
        }
    }

    let bill = app
        .request_authenticated(Method::GET, &format!("/api/v1/orders/{order_id}/bill"), None)
        .await;
    assert_eq!(bill.status(), StatusCode::OK);
    let bill = response_json(bill).await;
    assert_eq!(bill["data"]["currency"], "INR");
    assert_eq!(decimal(&bill["data"]["total"]), dec!(669.60));
    assert_eq!(bill["data"]["lines"].as_array().unwrap().len(), 2);

    let short = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/payments"),
            Some(json!({ "payment_method": "cash", "amount_tendered": "500.00" })),
        )
        .await;
    assert_eq!(short.status(), StatusCode::PAYMENT_REQUIRED);

    let paid = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/payments"),
            Some(json!({ "payment_method": "cash", "amount_tendered": "700.00" })),
        )
        .await;
    assert_eq!(paid.status(), StatusCode::CREATED);
    let paid = response_json(paid).await;
    assert_eq!(decimal(&paid["data"]["payment"]["amount"]), dec!(669.60));
    assert_eq!(decimal(&paid["data"]["receipt"]["change_due"]), dec!(30.40));
    assert_eq!(paid["data"]["receipt"]["payment_method"], "cash");

    let order = app
        .request_authenticated(Method::GET, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    let order = response_json(order).await;
    assert_eq!(order["data"]["status"], "paid");
    for item in order["data"]["items"].as_array().unwrap() {
        assert_eq!(item["status"], "paid");
    }

    let table = app
        .request_authenticated(Method::GET, &format!("/api/v1/tables/{table_id}"), None)
        .await;
    let table = response_json(table).await;
    assert_eq!(table["data"]["status"], "available");
    assert!(table["data"]["current_order_id"].is_null());

    let again = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/payments"),
            Some(json!({ "payment_method": "card" })),
        )
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let payments = app
        .request_authenticated(Method::GET, "/api/v1/payments", None)
        .await;
    assert_eq!(payments.status(), StatusCode::OK);
    let payments = response_json(payments).await;
    assert_eq!(payments["data"]["total"], 1);
    assert_eq!(payments["data"]["items"][0]["order_id"], order_id.as_str());

    // a paid order drops off the kitchen screen
    let queue = app
        .request_authenticated(Method::GET, "/api/v1/kitchen/queue", None)
        .await;
    let queue = response_json(queue).await;
    assert!(queue["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn table_with_open_order_rejects_a_second_one() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T2").await;
    let dosa = app.seed_menu_item("Masala Dosa", dec!(90.00)).await;

    app.place_order(table_id, &[(dosa, 1)]).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "table_id": table_id, "items": [{ "menu_item_id": dosa, "quantity": 1 }] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn simultaneous_orders_claim_a_table_once() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T7").await;
    let pav = app.seed_menu_item("Pav Bhaji", dec!(140.00)).await;
    let body = json!({ "table_id": table_id, "items": [{ "menu_item_id": pav, "quantity": 1 }] });

    let (first, second) = tokio::join!(
        app.request_authenticated(Method::POST, "/api/v1/orders", Some(body.clone())),
        app.request_authenticated(Method::POST, "/api/v1/orders", Some(body.clone())),
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let orders = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders?table_id={table_id}"),
            None,
        )
        .await;
    let orders = response_json(orders).await;
    assert_eq!(orders["data"]["total"], 1);
}

#[tokio::test]
async fn simultaneous_payments_settle_an_order_once() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T8").await;
    let kulfi = app.seed_menu_item("Kulfi", dec!(80.00)).await;
    let order = app.place_order(table_id, &[(kulfi, 2)]).await;
    let path = format!("/api/v1/orders/{}/payments", order["id"].as_str().unwrap());

    let (first, second) = tokio::join!(
        app.request_authenticated(Method::POST, &path, Some(json!({ "payment_method": "card" }))),
        app.request_authenticated(Method::POST, &path, Some(json!({ "payment_method": "upi" }))),
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let payments = app
        .request_authenticated(Method::GET, "/api/v1/payments", None)
        .await;
    let payments = response_json(payments).await;
    assert_eq!(payments["data"]["total"], 1);
}

#[tokio::test]
async fn pages_past_the_end_are_empty() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T9").await;
    let jalebi = app.seed_menu_item("Jalebi", dec!(60.00)).await;
    let order = app.place_order(table_id, &[(jalebi, 1)]).await;
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/orders/{}/payments", order["id"].as_str().unwrap()),
        Some(json!({ "payment_method": "cash" })),
    )
    .await;

    for path in [
        "/api/v1/orders?page=18446744073709551615",
        "/api/v1/orders?page=3&limit=100",
        "/api/v1/payments?page=1000000000000000000&limit=100",
        "/api/v1/payments?page=18446744073709551615",
    ] {
        let response = app.request_authenticated(Method::GET, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = response_json(response).await;
        assert!(body["data"]["items"].as_array().unwrap().is_empty(), "{path}");
        assert_eq!(body["data"]["total"], 1, "{path}");
    }

    let first = app
        .request_authenticated(Method::GET, "/api/v1/payments?page=1", None)
        .await;
    let first = response_json(first).await;
    assert_eq!(first["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_table_is_not_found() {
    let app = TestApp::new().await;
    let dosa = app.seed_menu_item("Masala Dosa", dec!(90.00)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "table_id": uuid::Uuid::new_v4(),
                "items": [{ "menu_item_id": dosa, "quantity": 1 }]
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unavailable_item_cannot_be_ordered() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T3").await;
    let biryani = app.seed_menu_item("Chicken Biryani", dec!(320.00)).await;

    let toggled = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/menu/items/{biryani}/availability"),
            None,
        )
        .await;
    assert_eq!(toggled.status(), StatusCode::OK);
    let toggled = response_json(toggled).await;
    assert_eq!(toggled["data"]["is_available"], false);

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "table_id": table_id, "items": [{ "menu_item_id": biryani, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // nothing was written, so the table stays free
    let table = app
        .request_authenticated(Method::GET, &format!("/api/v1/tables/{table_id}"), None)
        .await;
    let table = response_json(table).await;
    assert_eq!(table["data"]["status"], "available");
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T4").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "table_id": table_id, "items": [] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_must_follow_the_kitchen_workflow() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T5").await;
    let chai = app.seed_menu_item("Masala Chai", dec!(40.00)).await;
    let order = app.place_order(table_id, &[(chai, 2)]).await;
    let order_id = order["id"].as_str().unwrap();

    let skip = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "served" })),
        )
        .await;
    assert_eq!(skip.status(), StatusCode::BAD_REQUEST);

    let paid = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "paid" })),
        )
        .await;
    assert_eq!(paid.status(), StatusCode::BAD_REQUEST);

    let stale = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "preparing", "expected_version": 7 })),
        )
        .await;
    assert_eq!(stale.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn replacing_items_recomputes_totals() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T6").await;
    let idli = app.seed_menu_item("Idli", dec!(60.00)).await;
    let vada = app.seed_menu_item("Medu Vada", dec!(70.00)).await;
    let order = app.place_order(table_id, &[(idli, 1)]).await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/items"),
            Some(json!({ "items": [
                { "menu_item_id": idli, "quantity": 2 },
                { "menu_item_id": vada, "quantity": 1 }
            ] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(decimal(&body["data"]["subtotal"]), dec!(190.00));
    assert_eq!(decimal(&body["data"]["tax_amount"]), dec!(15.20));
    assert_eq!(decimal(&body["data"]["total"]), dec!(205.20));
    assert_eq!(body["data"]["version"], 2);
}

#[tokio::test]
async fn cancelling_frees_the_table() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("Patio").await;
    let samosa = app.seed_menu_item("Samosa", dec!(30.00)).await;
    let order = app.place_order(table_id, &[(samosa, 4)]).await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let table = app
        .request_authenticated(Method::GET, &format!("/api/v1/tables/{table_id}"), None)
        .await;
    let table = response_json(table).await;
    assert_eq!(table["data"]["status"], "available");

    // the freed table takes a new order
    app.place_order(table_id, &[(samosa, 1)]).await;

    let cancelled = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/payments"),
            Some(json!({ "payment_method": "upi" })),
        )
        .await;
    assert_eq!(cancelled.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn orders_can_be_filtered_by_status() {
    let app = TestApp::new().await;
    let first = app.seed_table("A1").await;
    let second = app.seed_table("A2").await;
    let roti = app.seed_menu_item("Butter Roti", dec!(25.00)).await;

    let order = app.place_order(first, &[(roti, 3)]).await;
    app.place_order(second, &[(roti, 2)]).await;
    let order_id = order["id"].as_str().unwrap();
    app.request_authenticated(
        Method::PUT,
        &format!("/api/v1/orders/{order_id}/status"),
        Some(json!({ "status": "preparing" })),
    )
    .await;

    let all = app
        .request_authenticated(Method::GET, "/api/v1/orders", None)
        .await;
    let all = response_json(all).await;
    assert_eq!(all["data"]["total"], 2);

    let preparing = app
        .request_authenticated(Method::GET, "/api/v1/orders?status=preparing", None)
        .await;
    let preparing = response_json(preparing).await;
    assert_eq!(preparing["data"]["total"], 1);
    assert_eq!(preparing["data"]["items"][0]["id"], order_id);
}

#[tokio::test]
async fn duplicate_table_name_conflicts() {
    let app = TestApp::new().await;
    app.seed_table("Window").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/tables",
            Some(json!({ "name": "Window", "seats": 2 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
