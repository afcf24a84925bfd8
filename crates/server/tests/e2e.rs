use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::{Datelike, Days, Utc};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;
use store::{MemoryStore, TableStore};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
    store: Arc<MemoryStore>,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store = Arc::new(MemoryStore::new());
    let state = ServerState::new(store.clone());
    let app: Router = routes::build_router(cors(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, store })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn unique_code(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn product_body(code: &str, quantity: i64) -> Value {
    json!({
        "name": "Engine oil",
        "price": 24.5,
        "code": code,
        "quantity": quantity,
        "discount": 0.0
    })
}

fn bill_body(items: Value) -> Value {
    json!({
        "date": Utc::now().to_rfc3339(),
        "customer": {
            "name": "Asha",
            "mobile": "0771234567",
            "vehicleNumber": "WP-1234",
            "company": "Acme"
        },
        "discount": 0.0,
        "items": items,
        "paymentMethod": "cash",
        "subTotal": 55.0,
        "total": 55.0
    })
}

#[tokio::test]
async fn health_reports_status_and_timestamp() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "healthy check is success");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn product_crud_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let code = unique_code("P");

    let res = c
        .post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&code, 12))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    assert_eq!(created["code"].as_str(), Some(code.as_str()));
    assert_eq!(created["edited_by"], json!("no"));

    let res = c.get(format!("{}/api/get_products", app.base_url)).send().await?;
    let products = res.json::<Vec<Value>>().await?;
    assert!(products.iter().any(|p| p["code"].as_str() == Some(code.as_str())));

    let res = c
        .post(format!("{}/api/edit_products", app.base_url))
        .json(&json!({"code": code.clone(), "price": 30.0, "user_type": "admin"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["price"], json!(30.0));
    assert_eq!(updated["edited_by"], json!("admin"));
    assert!(updated["edited_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn edit_product_with_only_code_returns_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let code = unique_code("P");
    c.post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&code, 5))
        .send()
        .await?;

    let res = c
        .post(format!("{}/api/edit_products", app.base_url))
        .json(&json!({"code": code}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "No valid update data provided");
    Ok(())
}

#[tokio::test]
async fn edit_unknown_product_returns_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/edit_products", app.base_url))
        .json(&json!({"code": unique_code("missing"), "price": 1.0}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Product not found");
    Ok(())
}

#[tokio::test]
async fn duplicate_product_code_returns_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let code = unique_code("P");
    c.post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&code, 5))
        .send()
        .await?;

    let res = c
        .post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&code, 5))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Product code already exists");
    Ok(())
}

#[tokio::test]
async fn service_crud_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let code = unique_code("S");

    let res = c
        .post(format!("{}/api/add_service", app.base_url))
        .json(&json!({"name": "Full wash", "price": 15.0, "code": code.clone()}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    assert!(created["created_at"].is_string());

    let res = c
        .post(format!("{}/api/edit_services", app.base_url))
        .json(&json!({"code": code.clone(), "price": 18.0, "user_type": "staff"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["price"], json!(18.0));
    assert_eq!(updated["edited_by"], json!("staff"));

    let res = c.get(format!("{}/api/get_all_data", app.base_url)).send().await?;
    let all = res.json::<Value>().await?;
    assert!(all["services"].as_array().unwrap().iter().any(|s| s["code"].as_str() == Some(code.as_str())));
    Ok(())
}

#[tokio::test]
async fn submit_bill_decrements_stock_and_skips_services() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let code = unique_code("P");

    let created = c
        .post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&code, 5))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let product_id = created["id"].as_i64().unwrap();

    let res = c
        .post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([
            {"id": product_id, "type": "product", "name": "Oil", "code": code.clone(),
             "price": 20.0, "quantity": 2, "discount": 0, "total": 40.0},
            {"id": 9999, "type": "service", "name": "Wash", "code": "S-1",
             "price": 15.0, "quantity": 1, "discount": 0, "total": 15.0}
        ])))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let receipt = res.json::<Value>().await?;
    assert!(receipt["customer_id"].is_number());
    assert!(receipt["billing_id"].is_number());

    let products = c
        .get(format!("{}/api/get_products", app.base_url))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    let product = products.iter().find(|p| p["code"].as_str() == Some(code.as_str())).unwrap();
    assert_eq!(product["quantity"], json!(3));
    Ok(())
}

#[tokio::test]
async fn submit_bill_with_missing_product_still_succeeds() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([
            {"id": 123456, "type": "product", "name": "Ghost", "code": "P-X",
             "price": 10.0, "quantity": 1, "discount": 0, "total": 10.0}
        ])))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let receipt = res.json::<Value>().await?;
    assert!(receipt["customer_id"].is_number());
    Ok(())
}

#[tokio::test]
async fn customers_endpoint_lists_bill_customers() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    c.post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([])))
        .send()
        .await?;

    let res = c.get(format!("{}/api/get_customers", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let customers = res.json::<Vec<Value>>().await?;
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["name"], "Asha");
    assert_eq!(customers[0]["vehicel_no"], "WP-1234");
    Ok(())
}

#[tokio::test]
async fn daily_report_sums_todays_bills() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // One bill through the API plus one stale row straight in the store.
    c.post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([
            {"id": 0, "type": "product", "code": "CUSTOM", "quantity": 1, "total": 40.0},
            {"id": 0, "type": "service", "code": "CUSTOM", "quantity": 1, "total": 15.0}
        ])))
        .send()
        .await?;
    app.store
        .insert(
            "billing",
            json!({"payment_date": "2020-01-01T09:00:00+00:00", "total": 99.0, "items": []}),
        )
        .await?;

    let res = c.get(format!("{}/api/get_daily_report", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let report = res.json::<Value>().await?;
    assert_eq!(report["totalBills"], json!(1));
    assert_eq!(report["totalSales"], json!(55.0));
    assert_eq!(report["bills"][0]["product_sales"], json!(40.0));
    assert_eq!(report["bills"][0]["service_sales"], json!(15.0));
    assert!(report.get("dateRange").is_none());
    Ok(())
}

#[tokio::test]
async fn weekly_report_starts_on_monday_and_includes_today() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    c.post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([])))
        .send()
        .await?;

    let res = c
        .get(format!("{}/api/get_report?report_type=weekly", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let report = res.json::<Value>().await?;

    let today = Utc::now().date_naive();
    let monday = today
        .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
        .unwrap();
    assert_eq!(report["dateRange"]["start"], json!(monday.to_string()));
    assert_eq!(report["dateRange"]["end"], json!(today.to_string()));
    assert_eq!(report["dateRange"]["type"], json!("weekly"));
    assert_eq!(report["totalBills"], json!(1));
    Ok(())
}

#[tokio::test]
async fn custom_date_range_filters_bills_and_ends_today() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.store
        .insert(
            "billing",
            json!({"payment_date": "2026-08-10T12:00:00+00:00", "total": 25.0, "items": []}),
        )
        .await?;

    let res = client()
        .get(format!(
            "{}/api/get_report?report_type=daily&start_date=2026-08-01&end_date=2026-08-15",
            app.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let report = res.json::<Value>().await?;
    assert_eq!(report["totalBills"], json!(1));
    assert_eq!(report["dateRange"]["start"], json!("2026-08-01"));
    // The echoed end is always today, even when the queried range is not.
    assert_eq!(report["dateRange"]["end"], json!(Utc::now().date_naive().to_string()));
    Ok(())
}

#[tokio::test]
async fn invalid_report_type_returns_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/api/get_report?report_type=yearly", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Invalid report type");
    Ok(())
}

#[tokio::test]
async fn summary_counts_catalog_bills_and_low_stock() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    c.post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&unique_code("P"), 3))
        .send()
        .await?;
    c.post(format!("{}/api/add_products", app.base_url))
        .json(&product_body(&unique_code("P"), 50))
        .send()
        .await?;
    c.post(format!("{}/api/add_service", app.base_url))
        .json(&json!({"name": "Wash", "price": 10.0, "code": unique_code("S")}))
        .send()
        .await?;
    c.post(format!("{}/api/submit_bill", app.base_url))
        .json(&bill_body(json!([])))
        .send()
        .await?;

    let res = c.get(format!("{}/api/get_summary_data", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let summary = res.json::<Value>().await?;
    assert_eq!(summary["total_products"], json!(2));
    assert_eq!(summary["total_services"], json!(1));
    assert_eq!(summary["total_bills"], json!(1));
    assert_eq!(summary["low_stock_count"], json!(1));
    Ok(())
}
