//! Integration tests for the Diesel repositories against embedded PostgreSQL.
//!
//! Each test gets its own database cloned from a migrated template, so the
//! partial unique indexes, foreign keys, and `NUMERIC` price column are the
//! real ones. Rows are stamped by a clock that advances one second per call,
//! which keeps `updated_at` ordering deterministic.
//!
//! Opt in with `RUN_PG_EMBEDDED=1 cargo test -- --ignored`.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use mockable::{Clock, MockClock};
use pagination::PageRequest;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pharmly_backend::domain::ports::{
    ResourcePersistenceError, ResourceRepository, UserRepository,
};
use pharmly_backend::domain::{
    Category, CategoryDraft, NewUser, ProductDraft, Role, Supplier, SupplierDraft, UserStatus,
};
use pharmly_backend::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselProductRepository, DieselSupplierRepository,
    DieselUserRepository, PoolConfig,
};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

struct TestContext {
    runtime: Runtime,
    users: DieselUserRepository,
    categories: DieselCategoryRepository,
    suppliers: DieselSupplierRepository,
    products: DieselProductRepository,
    _database: TemporaryDatabase,
}

fn stepping_clock() -> Arc<dyn Clock> {
    let start = Utc
        .with_ymd_and_hms(2026, 1, 1, 8, 0, 0)
        .single()
        .expect("valid instant");
    let ticks = Arc::new(AtomicI64::new(0));
    let mut clock = MockClock::new();
    clock
        .expect_utc()
        .returning(move || start + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst)));
    Arc::new(clock)
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = pg_embed::shared_cluster()?;
    let database = embedded_postgres::provision_database(cluster)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;
    let clock = stepping_clock();

    Ok(TestContext {
        runtime,
        users: DieselUserRepository::new(pool.clone(), clock.clone()),
        categories: DieselCategoryRepository::new(pool.clone(), clock.clone()),
        suppliers: DieselSupplierRepository::new(pool.clone(), clock.clone()),
        products: DieselProductRepository::new(pool, clock),
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    if !pg_embed::embedded_postgres_enabled() {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return None;
    }
    Some(setup_context().unwrap_or_else(|reason| panic!("test cluster setup failed: {reason}")))
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        full_name: "Diesel Test User".to_owned(),
        email: email.to_owned(),
        password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_owned(),
        role: Role::Pharmacist,
        status: UserStatus::Active,
    }
}

fn category_draft(name: &str) -> CategoryDraft {
    CategoryDraft {
        name: name.to_owned(),
        description: String::new(),
        parent_category_id: None,
    }
}

fn product_draft(category: &Category, supplier: &Supplier) -> ProductDraft {
    ProductDraft {
        name: "Panadol".to_owned(),
        category_id: category.id,
        generic_name: "Paracetamol".to_owned(),
        description: None,
        price: Decimal::new(1999, 2),
        stock: 40,
        unit: "box".to_owned(),
        expiration_date: NaiveDate::from_ymd_opt(2027, 6, 30).expect("valid date"),
        barcode: "8991234567890".to_owned(),
        supplier_id: supplier.id,
        min_stock: 5,
        is_active: true,
    }
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn user_create_and_lookup(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else { return };

    let created = ctx
        .runtime
        .block_on(ctx.users.create(&new_user("alice123", "alice@example.com")))
        .expect("user stored");
    assert!(created.id > 0);
    assert_eq!(created.role, Role::Pharmacist);
    assert_eq!(created.created_at, created.updated_at);

    let by_email = ctx
        .runtime
        .block_on(ctx.users.find_by_email("alice@example.com"))
        .expect("lookup succeeds");
    assert_eq!(by_email, Some(created.clone()));

    let by_id = ctx
        .runtime
        .block_on(ctx.users.find_by_id(created.id))
        .expect("lookup succeeds");
    assert_eq!(by_id, Some(created));
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
#[case(new_user("bob12345", "alice@example.com"), "email already registered")]
#[case(new_user("alice123", "bob@example.com"), "username already taken")]
fn duplicate_live_users_conflict(
    repo_context: Option<TestContext>,
    #[case] clash: NewUser,
    #[case] message: &str,
) {
    let Some(ctx) = repo_context else { return };

    ctx.runtime
        .block_on(ctx.users.create(&new_user("alice123", "alice@example.com")))
        .expect("first user stored");
    let err = ctx
        .runtime
        .block_on(ctx.users.create(&clash))
        .expect_err("duplicate rejected");

    assert_eq!(err, ResourcePersistenceError::conflict(message));
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn soft_delete_hides_the_row_and_frees_the_email(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else { return };

    let first = ctx
        .runtime
        .block_on(ctx.users.create(&new_user("alice123", "alice@example.com")))
        .expect("user stored");
    ctx.runtime
        .block_on(ctx.users.delete(first.id))
        .expect("user deleted");

    let hidden = ctx
        .runtime
        .block_on(ctx.users.find_by_id(first.id))
        .expect("lookup succeeds");
    assert_eq!(hidden, None);
    let again = ctx
        .runtime
        .block_on(ctx.users.delete(first.id))
        .expect_err("already deleted");
    assert_eq!(again, ResourcePersistenceError::not_found(first.id));

    let reused = ctx
        .runtime
        .block_on(ctx.users.create(&new_user("alice123", "alice@example.com")))
        .expect("email and username are free again");
    assert_ne!(reused.id, first.id);
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn listing_orders_by_recent_update_and_counts_live_rows(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else { return };

    let mut stored = Vec::new();
    for name in ["Analgesics", "Antibiotics", "Vitamins", "Antacids"] {
        let category = ctx
            .runtime
            .block_on(ctx.categories.create(&category_draft(name)))
            .expect("category stored");
        stored.push(category);
    }
    ctx.runtime
        .block_on(ctx.categories.update(stored[0].id, &category_draft("Pain relief")))
        .expect("category updated");
    ctx.runtime
        .block_on(ctx.categories.delete(stored[2].id))
        .expect("category deleted");

    let page = ctx
        .runtime
        .block_on(ctx.categories.list(PageRequest::new(1, 2).expect("valid page")))
        .expect("listing succeeds");
    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Pain relief", "Antacids"]);
    assert_eq!(page.total, 3);

    let tail = ctx
        .runtime
        .block_on(ctx.categories.list(PageRequest::new(2, 2).expect("valid page")))
        .expect("listing succeeds");
    let names: Vec<&str> = tail.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Antibiotics"]);
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn product_price_survives_the_numeric_column(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else { return };

    let category = ctx
        .runtime
        .block_on(ctx.categories.create(&category_draft("Analgesics")))
        .expect("category stored");
    let supplier = ctx
        .runtime
        .block_on(ctx.suppliers.create(&SupplierDraft {
            name: "Acme Pharma".to_owned(),
            ..SupplierDraft::default()
        }))
        .expect("supplier stored");

    let created = ctx
        .runtime
        .block_on(ctx.products.create(&product_draft(&category, &supplier)))
        .expect("product stored");
    let fetched = ctx
        .runtime
        .block_on(ctx.products.find_by_id(created.id))
        .expect("lookup succeeds")
        .expect("product present");

    assert_eq!(fetched.price, Decimal::new(1999, 2));
    assert_eq!(fetched.price.to_string(), "19.99");
    assert_eq!(fetched, created);
}

#[rstest]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn unknown_references_are_rejected(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else { return };

    let supplier = ctx
        .runtime
        .block_on(ctx.suppliers.create(&SupplierDraft {
            name: "Acme Pharma".to_owned(),
            ..SupplierDraft::default()
        }))
        .expect("supplier stored");
    let missing = Category {
        id: 9_999,
        name: "Missing".to_owned(),
        description: String::new(),
        parent_category_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let err = ctx
        .runtime
        .block_on(ctx.products.create(&product_draft(&missing, &supplier)))
        .expect_err("unknown category");

    assert!(
        matches!(err, ResourcePersistenceError::InvalidReference { .. }),
        "unexpected error: {err:?}"
    );
}
