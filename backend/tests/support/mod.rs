//! Shared helpers for the HTTP integration suites.
//!
//! Apps are assembled by the same `build_app` the binary uses, over the
//! in-memory [`TestHarness`].

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use chrono::NaiveDate;
use pharmly_backend::domain::ports::ResourceRepository;
use pharmly_backend::domain::{
    Category, CategoryDraft, Product, ProductDraft, Supplier, SupplierDraft,
};
use pharmly_backend::inbound::http::health::HealthState;
use pharmly_backend::test_support::TestHarness;
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[expect(
    dead_code,
    reason = "server include exposes startup members unused by HTTP suites"
)]
#[path = "../../src/server/mod.rs"]
mod server;

/// Build the production app over the harness state.
pub fn app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    server::build_app(
        web::Data::new(HealthState::new()),
        web::Data::new(harness.state.clone()),
    )
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// A registration body that passes every rule.
pub fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "full_name": "Alice Example",
        "email": format!("{username}@example.com"),
        "password": "Str0ng!Pass",
    })
}

/// A product body that passes every rule.
pub fn product_body(category_id: i64, supplier_id: i64) -> Value {
    json!({
        "name": "Panadol",
        "category_id": category_id,
        "generic_name": "Paracetamol",
        "price": 19.99,
        "stock": 40,
        "unit": "box",
        "expiration_date": "2027-06-30",
        "barcode": "8991234567890",
        "supplier_id": supplier_id,
        "min_stock": 5,
    })
}

/// Store one category and one supplier for products to reference.
pub async fn seed_references(harness: &TestHarness) -> (Category, Supplier) {
    let category = harness
        .categories
        .create(&CategoryDraft {
            name: "Analgesics".to_owned(),
            description: "Pain relief".to_owned(),
            parent_category_id: None,
        })
        .await
        .expect("category stored");
    let supplier = harness
        .suppliers
        .create(&SupplierDraft {
            name: "Acme Pharma".to_owned(),
            ..SupplierDraft::default()
        })
        .await
        .expect("supplier stored");
    (category, supplier)
}

/// Store a product directly in the harness repository.
pub async fn seed_product(
    harness: &TestHarness,
    name: &str,
    category: &Category,
    supplier: &Supplier,
) -> Product {
    harness
        .products
        .create(&ProductDraft {
            name: name.to_owned(),
            category_id: category.id,
            generic_name: "Paracetamol".to_owned(),
            description: None,
            price: Decimal::new(1999, 2),
            stock: 10,
            unit: "box".to_owned(),
            expiration_date: NaiveDate::from_ymd_opt(2027, 6, 30).expect("valid date"),
            barcode: format!("barcode-{name}"),
            supplier_id: supplier.id,
            min_stock: 1,
            is_active: true,
        })
        .await
        .expect("product stored")
}
