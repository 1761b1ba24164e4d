mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{json, Value};

use common::{response_json, TestApp};
use restaurant_pos_api::entities::{restaurant_table, TableStatus};

async fn set_table_status(app: &TestApp, table_id: &str, status: &str) -> axum::response::Response {
    app.request_authenticated(
        Method::PUT,
        &format!("/api/v1/tables/{table_id}/status"),
        Some(json!({ "status": status })),
    )
    .await
}

async fn create_category(app: &TestApp, name: &str, display_order: i32) -> String {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/menu/categories",
            Some(json!({ "name": name, "display_order": display_order })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_item(app: &TestApp, body: Value) -> Value {
    let response = app
        .request_authenticated(Method::POST, "/api/v1/menu/items", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["data"].clone()
}

async fn item_names(app: &TestApp, path: &str) -> Vec<String> {
    let response = app.request_authenticated(Method::GET, path, None).await;
    assert_eq!(response.status(), StatusCode::OK, "{path}");
    response_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn table_status_can_be_set_by_hand() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("Booth").await.to_string();

    for status in ["reserved", "occupied", "available"] {
        let response = set_table_status(&app, &table_id, status).await;
        assert_eq!(response.status(), StatusCode::OK, "setting {status}");
        let body = response_json(response).await;
        assert_eq!(body["data"]["status"], status);
    }

    let unknown = set_table_status(&app, &uuid::Uuid::new_v4().to_string(), "reserved").await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn table_with_unpaid_order_cannot_be_freed() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T1").await;
    let chaat = app.seed_menu_item("Papdi Chaat", dec!(110.00)).await;
    let order = app.place_order(table_id, &[(chaat, 1)]).await;
    let order_id = order["id"].as_str().unwrap();

    let blocked = set_table_status(&app, &table_id.to_string(), "available").await;
    assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);

    let table = app
        .request_authenticated(Method::GET, &format!("/api/v1/tables/{table_id}"), None)
        .await;
    let table = response_json(table).await;
    assert_eq!(table["data"]["status"], "occupied");
    assert_eq!(table["data"]["current_order_id"], order_id);
}

#[tokio::test]
async fn freeing_a_table_unlinks_its_closed_order() {
    let app = TestApp::new().await;
    let table_id = app.seed_table("T2").await;
    let chaat = app.seed_menu_item("Bhel Puri", dec!(70.00)).await;
    let order = app.place_order(table_id, &[(chaat, 2)]).await;
    let order_id = order["id"].as_str().unwrap();

    let cancelled = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(cancelled.status(), StatusCode::OK);

    // a reserved table still pointing at the closed order
    restaurant_table::Entity::update_many()
        .col_expr(restaurant_table::Column::Status, Expr::value(TableStatus::Reserved))
        .col_expr(
            restaurant_table::Column::CurrentOrderId,
            Expr::value(Some(uuid::Uuid::parse_str(order_id).unwrap())),
        )
        .filter(restaurant_table::Column::Id.eq(table_id))
        .exec(&*app.state.db)
        .await
        .unwrap();

    let freed = set_table_status(&app, &table_id.to_string(), "available").await;
    assert_eq!(freed.status(), StatusCode::OK);
    let freed = response_json(freed).await;
    assert_eq!(freed["data"]["status"], "available");
    assert!(freed["data"]["current_order_id"].is_null());
}

#[tokio::test]
async fn categories_follow_display_order() {
    let app = TestApp::new().await;
    create_category(&app, "Desserts", 3).await;
    create_category(&app, "Starters", 1).await;
    create_category(&app, "Mains", 2).await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/menu/categories", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|category| category["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Starters", "Mains", "Desserts"]);
}

#[tokio::test]
async fn menu_items_filter_by_category_and_availability() {
    let app = TestApp::new().await;
    let starters = create_category(&app, "Starters", 1).await;
    let drinks = create_category(&app, "Drinks", 2).await;

    let tikka = create_item(
        &app,
        json!({ "name": "Hara Bhara Kebab", "price": "180.00", "category_id": starters }),
    )
    .await;
    assert_eq!(tikka["category_name"], "Starters");
    create_item(
        &app,
        json!({ "name": "Aloo Tikki", "price": "90.00", "category_id": starters, "is_available": false }),
    )
    .await;
    create_item(
        &app,
        json!({ "name": "Nimbu Pani", "price": "60.00", "category_id": drinks }),
    )
    .await;
    create_item(&app, json!({ "name": "Papad", "price": "20.00" })).await;

    assert_eq!(
        item_names(&app, "/api/v1/menu/items").await,
        ["Aloo Tikki", "Hara Bhara Kebab", "Nimbu Pani", "Papad"]
    );
    assert_eq!(
        item_names(&app, &format!("/api/v1/menu/items?category_id={starters}")).await,
        ["Aloo Tikki", "Hara Bhara Kebab"]
    );
    assert_eq!(
        item_names(&app, "/api/v1/menu/items?available_only=true").await,
        ["Hara Bhara Kebab", "Nimbu Pani", "Papad"]
    );
    assert_eq!(
        item_names(
            &app,
            &format!("/api/v1/menu/items?category_id={starters}&available_only=true")
        )
        .await,
        ["Hara Bhara Kebab"]
    );

    let response = app
        .request_authenticated(Method::GET, "/api/v1/menu/items", None)
        .await;
    let body = response_json(response).await;
    let category_of = |name: &str| {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["name"] == name)
            .map(|item| item["category_name"].clone())
            .unwrap()
    };
    assert_eq!(category_of("Nimbu Pani"), "Drinks");
    assert!(category_of("Papad").is_null());
}
