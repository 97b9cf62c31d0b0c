//! Diesel-backed repositories for categories, suppliers, and products.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use mockable::Clock;
use pagination::PageRequest;

use crate::domain::ports::{ResourcePage, ResourcePersistenceError, ResourceRepository};
use crate::domain::{Category, Product, Resource, Supplier};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CategoryChangeset, CategoryRow, NewCategoryRow, NewProductRow, NewSupplierRow,
    ProductChangeset, ProductRow, SupplierChangeset, SupplierRow,
};
use super::pool::DbPool;
use super::resource_repository_macro::impl_resource_repository;
use super::schema::{categories, products, suppliers};

impl_resource_repository! {
    /// PostgreSQL repository for [`Category`] rows.
    pub struct DieselCategoryRepository for Category {
        table: categories,
        row: CategoryRow,
        insert: NewCategoryRow,
        changeset: CategoryChangeset,
    }
}

impl_resource_repository! {
    /// PostgreSQL repository for [`Supplier`] rows.
    pub struct DieselSupplierRepository for Supplier {
        table: suppliers,
        row: SupplierRow,
        insert: NewSupplierRow,
        changeset: SupplierChangeset,
    }
}

impl_resource_repository! {
    /// PostgreSQL repository for [`Product`] rows.
    ///
    /// `category_id` and `supplier_id` are foreign keys; writes naming a
    /// missing row fail with `InvalidReference`.
    pub struct DieselProductRepository for Product {
        table: products,
        row: ProductRow,
        insert: NewProductRow,
        changeset: ProductChangeset,
    }
}
