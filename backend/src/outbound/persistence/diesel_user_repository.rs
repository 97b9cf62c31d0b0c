//! PostgreSQL-backed [`UserRepository`] implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use mockable::Clock;
use pagination::PageRequest;

use crate::domain::ports::{
    ResourcePage, ResourcePersistenceError, ResourceRepository, UserRepository,
};
use crate::domain::{Resource, User};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::resource_repository_macro::impl_resource_repository;
use super::schema::users;

impl_resource_repository! {
    /// PostgreSQL repository for staff accounts.
    ///
    /// Partial unique indexes on `email` and `username` cover live rows
    /// only, so a soft-deleted account frees its address for reuse.
    pub struct DieselUserRepository for User {
        table: users,
        row: UserRow,
        insert: NewUserRow,
        changeset: UserChangeset,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ResourcePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email = email.to_owned();
        let found: Option<UserRow> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    users::table
                        .filter(users::email.eq(email))
                        .filter(users::deleted_at.is_null())
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, User::NAME))?;
        found.map(User::try_from).transpose()
    }
}
