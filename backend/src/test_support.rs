//! In-memory adapters for unit and integration tests.
//!
//! Compiled for this crate's tests and, through the `test-support` feature,
//! for the suites under `tests/`. Nothing here touches a database.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use pagination::PageRequest;
use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHasher, ResourcePage, ResourcePersistenceError, ResourceRepository, TokenService,
    UserRepository,
};
use crate::domain::{
    AccountService, Category, CategoryDraft, NewUser, Product, ProductDraft, Resource,
    ResourceService, Role, Supplier, SupplierDraft, User, UserStatus,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService, TokenSettings};

/// Signing secret used by [`TestHarness`].
pub const TEST_JWT_SECRET: &str = "test-signing-secret-with-enough-entropy";

/// Password accepted by every validation rule, used for seeded accounts.
pub const TEST_PASSWORD: &str = "Str0ng!Pass";

/// Construction and mutation hooks the in-memory repository needs.
pub trait InMemoryResource: Resource {
    /// Build a stored value from a draft.
    fn materialize(id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self;

    /// Overwrite mutable attributes from a draft.
    fn apply(&mut self, draft: &Self::Draft, now: DateTime<Utc>);

    /// Values that must be unique among live rows, paired with the conflict
    /// message reported on collision.
    fn unique_keys(_draft: &Self::Draft) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

struct StoredRow<R> {
    value: R,
    keys: Vec<(&'static str, String)>,
    touched: u64,
    deleted: bool,
}

struct RepositoryState<R> {
    rows: Vec<StoredRow<R>>,
    next_id: i64,
    clock: u64,
    failure: Option<ResourcePersistenceError>,
}

/// Thread-safe in-memory [`ResourceRepository`].
///
/// Rows are soft-deleted, listed most recently touched first, and checked
/// against [`InMemoryResource::unique_keys`]. [`Self::fail_with`] makes every
/// subsequent call return the given error.
pub struct InMemoryRepository<R> {
    state: Mutex<RepositoryState<R>>,
}

impl<R> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self {
            state: Mutex::new(RepositoryState {
                rows: Vec::new(),
                next_id: 1,
                clock: 0,
                failure: None,
            }),
        }
    }
}

impl<R: InMemoryResource> InMemoryRepository<R> {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail with `error`.
    pub fn fail_with(&self, error: ResourcePersistenceError) {
        self.lock().failure = Some(error);
    }

    /// Number of live rows.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().rows.iter().filter(|row| !row.deleted).count()
    }

    fn lock(&self) -> MutexGuard<'_, RepositoryState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard(&self) -> Result<MutexGuard<'_, RepositoryState<R>>, ResourcePersistenceError> {
        let state = self.lock();
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }

    fn check_unique(
        state: &RepositoryState<R>,
        keys: &[(&'static str, String)],
        skip_id: Option<i64>,
    ) -> Result<(), ResourcePersistenceError> {
        let clash = state
            .rows
            .iter()
            .filter(|row| !row.deleted && Some(row.value.id()) != skip_id)
            .flat_map(|row| row.keys.iter())
            .find(|existing| keys.contains(existing));
        match clash {
            Some((message, _)) => Err(ResourcePersistenceError::conflict(*message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: InMemoryResource> ResourceRepository<R> for InMemoryRepository<R> {
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourcePersistenceError> {
        let mut state = self.guard()?;
        let keys = R::unique_keys(draft);
        Self::check_unique(&state, &keys, None)?;
        let id = state.next_id;
        state.next_id += 1;
        state.clock += 1;
        let value = R::materialize(id, draft, Utc::now());
        let touched = state.clock;
        state.rows.push(StoredRow {
            value: value.clone(),
            keys,
            touched,
            deleted: false,
        });
        Ok(value)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<R>, ResourcePersistenceError> {
        let state = self.guard()?;
        Ok(state
            .rows
            .iter()
            .find(|row| !row.deleted && row.value.id() == id)
            .map(|row| row.value.clone()))
    }

    async fn list(&self, page: PageRequest) -> Result<ResourcePage<R>, ResourcePersistenceError> {
        let state = self.guard()?;
        let mut live: Vec<&StoredRow<R>> = state.rows.iter().filter(|row| !row.deleted).collect();
        live.sort_by(|a, b| b.touched.cmp(&a.touched));
        let total = u64::try_from(live.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = live
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| row.value.clone())
            .collect();
        Ok(ResourcePage { items, total })
    }

    async fn update(&self, id: i64, draft: &R::Draft) -> Result<R, ResourcePersistenceError> {
        let mut state = self.guard()?;
        let keys = R::unique_keys(draft);
        Self::check_unique(&state, &keys, Some(id))?;
        state.clock += 1;
        let touched = state.clock;
        let row = state
            .rows
            .iter_mut()
            .find(|row| !row.deleted && row.value.id() == id)
            .ok_or_else(|| ResourcePersistenceError::not_found(id))?;
        row.value.apply(draft, Utc::now());
        row.keys = keys;
        row.touched = touched;
        Ok(row.value.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ResourcePersistenceError> {
        let mut state = self.guard()?;
        let row = state
            .rows
            .iter_mut()
            .find(|row| !row.deleted && row.value.id() == id)
            .ok_or_else(|| ResourcePersistenceError::not_found(id))?;
        row.deleted = true;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ResourcePersistenceError> {
        let state = self.guard()?;
        Ok(state
            .rows
            .iter()
            .find(|row| !row.deleted && row.value.email == email)
            .map(|row| row.value.clone()))
    }
}

impl InMemoryResource for User {
    fn materialize(id: i64, draft: &NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: draft.username.clone(),
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            password_hash: draft.password_hash.clone(),
            role: draft.role,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: &NewUser, now: DateTime<Utc>) {
        self.username.clone_from(&draft.username);
        self.full_name.clone_from(&draft.full_name);
        self.email.clone_from(&draft.email);
        self.password_hash.clone_from(&draft.password_hash);
        self.role = draft.role;
        self.status = draft.status;
        self.updated_at = now;
    }

    fn unique_keys(draft: &NewUser) -> Vec<(&'static str, String)> {
        vec![
            ("email already registered", draft.email.clone()),
            ("username already taken", draft.username.clone()),
        ]
    }
}

impl InMemoryResource for Category {
    fn materialize(id: i64, draft: &CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            parent_category_id: draft.parent_category_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: &CategoryDraft, now: DateTime<Utc>) {
        self.name.clone_from(&draft.name);
        self.description.clone_from(&draft.description);
        self.parent_category_id = draft.parent_category_id;
        self.updated_at = now;
    }
}

impl InMemoryResource for Supplier {
    fn materialize(id: i64, draft: &SupplierDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            contact_person: draft.contact_person.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            email: draft.email.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: &SupplierDraft, now: DateTime<Utc>) {
        self.name.clone_from(&draft.name);
        self.contact_person.clone_from(&draft.contact_person);
        self.phone.clone_from(&draft.phone);
        self.address.clone_from(&draft.address);
        self.email.clone_from(&draft.email);
        self.updated_at = now;
    }
}

impl InMemoryResource for Product {
    fn materialize(id: i64, draft: &ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            category_id: draft.category_id,
            generic_name: draft.generic_name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            stock: draft.stock,
            unit: draft.unit.clone(),
            expiration_date: draft.expiration_date,
            barcode: draft.barcode.clone(),
            supplier_id: draft.supplier_id,
            min_stock: draft.min_stock,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: &ProductDraft, now: DateTime<Utc>) {
        let created_at = self.created_at;
        *self = Self::materialize(self.id, draft, now);
        self.created_at = created_at;
    }
}

/// Argon2id with minimal cost parameters so suites stay fast.
///
/// # Panics
/// Panics if the fixed parameters are rejected, which only happens when the
/// argon2 crate tightens its bounds.
#[must_use]
pub fn light_hasher() -> Argon2PasswordHasher {
    let params = Params::new(8 * 1024, 1, 1, None).expect("light argon2 params are valid");
    Argon2PasswordHasher::with_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Fully wired HTTP state over in-memory repositories.
///
/// Uses a real Argon2 hasher and JWT signer so handler tests exercise the
/// same credential path as production.
pub struct TestHarness {
    /// State to register on an Actix test app.
    pub state: HttpState,
    /// Backing user store.
    pub users: Arc<InMemoryRepository<User>>,
    /// Backing category store.
    pub categories: Arc<InMemoryRepository<Category>>,
    /// Backing product store.
    pub products: Arc<InMemoryRepository<Product>>,
    /// Backing supplier store.
    pub suppliers: Arc<InMemoryRepository<Supplier>>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenService>,
}

impl TestHarness {
    /// Build a harness with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryRepository::<User>::new());
        let categories = Arc::new(InMemoryRepository::<Category>::new());
        let products = Arc::new(InMemoryRepository::<Product>::new());
        let suppliers = Arc::new(InMemoryRepository::<Supplier>::new());
        let hasher = Arc::new(light_hasher());
        let tokens = Arc::new(JwtTokenService::new(
            TokenSettings::new(Zeroizing::new(TEST_JWT_SECRET.to_owned()), "pharmly-test", 60),
            Arc::new(DefaultClock),
        ));

        let category_service = Arc::new(ResourceService::<Category>::new(categories.clone()));
        let product_service = Arc::new(ResourceService::<Product>::new(products.clone()));
        let supplier_service = Arc::new(ResourceService::<Supplier>::new(suppliers.clone()));
        let state = HttpState {
            auth: Arc::new(AccountService::new(
                users.clone(),
                hasher.clone(),
                tokens.clone(),
            )),
            users: Arc::new(ResourceService::<User>::new(users.clone())),
            categories: category_service.clone(),
            category_commands: category_service,
            products: product_service.clone(),
            product_commands: product_service,
            suppliers: supplier_service.clone(),
            supplier_commands: supplier_service,
        };

        Self {
            state,
            users,
            categories,
            products,
            suppliers,
            hasher,
            tokens,
        }
    }

    /// Store an active account with [`TEST_PASSWORD`] and return it with a
    /// valid bearer token.
    ///
    /// # Panics
    /// Panics when any step of seeding fails.
    pub async fn seed_user(&self, username: &str, role: Role) -> (User, String) {
        let password_hash = self
            .hasher
            .hash(TEST_PASSWORD)
            .expect("test password hashes");
        let user = self
            .users
            .create(&NewUser {
                username: username.to_owned(),
                full_name: format!("{username} tester"),
                email: format!("{username}@example.com"),
                password_hash,
                role,
                status: UserStatus::Active,
            })
            .await
            .expect("seed user stored");
        let token = self.tokens.issue(&user).expect("token signs").token;
        (user, token)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
