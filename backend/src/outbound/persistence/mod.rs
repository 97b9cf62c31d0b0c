//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each entity gets a repository generated from one template
//! (`impl_resource_repository!`) over `diesel-async` and a `bb8` pool.
//! Diesel row structs and table definitions stay private to this module;
//! only repositories, the pool, and the migration runner are exported.
//!
//! ```ignore
//! use pharmly_backend::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pharmly")).await?;
//! let products = DieselProductRepository::new(pool, Arc::new(DefaultClock));
//! ```

mod diesel_catalogue_repositories;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod resource_repository_macro;
mod schema;

pub use diesel_catalogue_repositories::{
    DieselCategoryRepository, DieselProductRepository, DieselSupplierRepository,
};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
