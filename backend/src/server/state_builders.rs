//! Builders wiring Diesel repositories and credential adapters into the
//! HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use pharmly_backend::domain::ports::{
    AuthService, PasswordHasher, ResourceCommand, ResourceQuery, ResourceRepository,
    TokenService, UserRepository,
};
use pharmly_backend::domain::{
    AccountService, Category, Product, Resource, ResourceService, Supplier, User,
};
use pharmly_backend::inbound::http::state::HttpState;
use pharmly_backend::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselProductRepository, DieselSupplierRepository,
    DieselUserRepository,
};
use pharmly_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService, TokenSettings};

/// Query and command ports served by one [`ResourceService`].
type ServicePair<R> = (Arc<dyn ResourceQuery<R>>, Arc<dyn ResourceCommand<R>>);

fn build_service_pair<R: Resource>(repository: Arc<dyn ResourceRepository<R>>) -> ServicePair<R> {
    let service = Arc::new(ResourceService::new(repository));
    (
        service.clone() as Arc<dyn ResourceQuery<R>>,
        service as Arc<dyn ResourceCommand<R>>,
    )
}

fn build_auth_service(
    users: Arc<dyn UserRepository>,
    tokens: TokenSettings,
    clock: Arc<dyn Clock>,
) -> Arc<dyn AuthService> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::default());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(tokens, clock));
    Arc::new(AccountService::new(users, hasher, tokens))
}

/// Build the shared HTTP state over PostgreSQL-backed repositories.
pub(super) fn build_http_state(pool: &DbPool, tokens: TokenSettings) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone(), clock.clone()));
    let (categories, category_commands) = build_service_pair::<Category>(Arc::new(
        DieselCategoryRepository::new(pool.clone(), clock.clone()),
    ));
    let (products, product_commands) = build_service_pair::<Product>(Arc::new(
        DieselProductRepository::new(pool.clone(), clock.clone()),
    ));
    let (suppliers, supplier_commands) = build_service_pair::<Supplier>(Arc::new(
        DieselSupplierRepository::new(pool.clone(), clock.clone()),
    ));

    web::Data::new(HttpState {
        auth: build_auth_service(users.clone(), tokens, clock),
        users: Arc::new(ResourceService::<User>::new(users)),
        categories,
        category_commands,
        products,
        product_commands,
        suppliers,
        supplier_commands,
    })
}
