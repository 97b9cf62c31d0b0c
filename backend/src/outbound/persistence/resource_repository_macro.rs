//! Template that generates a Diesel [`ResourceRepository`] implementation.
//!
//! Every entity table shares the same shape (`id`, `updated_at`,
//! `deleted_at`) and the same access rules, so the repository bodies differ
//! only in the table and row types. The generated methods:
//! - check a connection out of the pool
//! - run their statements inside a single transaction
//! - ignore soft-deleted rows and soft-delete instead of removing
//! - convert rows to domain values via `TryFrom`
//!
//! The invoking module must have `DbPool`, `Clock`, the port types, and
//! Diesel's query traits in scope.
//!
//! [`ResourceRepository`]: crate::domain::ports::ResourceRepository

macro_rules! impl_resource_repository {
    (
        $(#[$meta:meta])*
        pub struct $repo:ident for $resource:ty {
            table: $table:ident,
            row: $row:ty,
            insert: $insert:ident,
            changeset: $changeset:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
            clock: Arc<dyn Clock>,
        }

        impl $repo {
            /// Create a repository over the given pool, stamping rows with `clock`.
            pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
                Self { pool, clock }
            }
        }

        #[async_trait]
        impl ResourceRepository<$resource> for $repo {
            async fn create(
                &self,
                draft: &<$resource as Resource>::Draft,
            ) -> Result<$resource, ResourcePersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = $insert::from_draft(draft, self.clock.utc());
                let stored: $row = conn
                    .transaction::<_, diesel::result::Error, _>(|conn| {
                        async move {
                            diesel::insert_into($table::table)
                                .values(&row)
                                .returning(<$row>::as_returning())
                                .get_result(conn)
                                .await
                        }
                        .scope_boxed()
                    })
                    .await
                    .map_err(|err| map_diesel_error(err, <$resource as Resource>::NAME))?;
                <$resource>::try_from(stored)
            }

            async fn find_by_id(
                &self,
                id: i64,
            ) -> Result<Option<$resource>, ResourcePersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let found: Option<$row> = conn
                    .transaction::<_, diesel::result::Error, _>(|conn| {
                        async move {
                            $table::table
                                .filter($table::id.eq(id))
                                .filter($table::deleted_at.is_null())
                                .select(<$row>::as_select())
                                .first(conn)
                                .await
                                .optional()
                        }
                        .scope_boxed()
                    })
                    .await
                    .map_err(|err| map_diesel_error(err, <$resource as Resource>::NAME))?;
                found.map(<$resource>::try_from).transpose()
            }

            async fn list(
                &self,
                page: PageRequest,
            ) -> Result<ResourcePage<$resource>, ResourcePersistenceError> {
                let limit = i64::try_from(page.limit())
                    .map_err(|_| ResourcePersistenceError::query("page size out of range"))?;
                let offset = i64::try_from(page.offset())
                    .map_err(|_| ResourcePersistenceError::query("page offset out of range"))?;
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let (rows, total): (Vec<$row>, i64) = conn
                    .transaction::<_, diesel::result::Error, _>(|conn| {
                        async move {
                            let total: i64 = $table::table
                                .filter($table::deleted_at.is_null())
                                .count()
                                .get_result(conn)
                                .await?;
                            let rows = $table::table
                                .filter($table::deleted_at.is_null())
                                .order(($table::updated_at.desc(), $table::id.desc()))
                                .limit(limit)
                                .offset(offset)
                                .select(<$row>::as_select())
                                .load(conn)
                                .await?;
                            Ok((rows, total))
                        }
                        .scope_boxed()
                    })
                    .await
                    .map_err(|err| map_diesel_error(err, <$resource as Resource>::NAME))?;
                let items = rows
                    .into_iter()
                    .map(<$resource>::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                let total = u64::try_from(total)
                    .map_err(|_| ResourcePersistenceError::query("negative row count"))?;
                Ok(ResourcePage { items, total })
            }

            async fn update(
                &self,
                id: i64,
                draft: &<$resource as Resource>::Draft,
            ) -> Result<$resource, ResourcePersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let changes = $changeset::from_draft(draft, self.clock.utc());
                let updated: Option<$row> = conn
                    .transaction::<_, diesel::result::Error, _>(|conn| {
                        async move {
                            diesel::update(
                                $table::table
                                    .filter($table::id.eq(id))
                                    .filter($table::deleted_at.is_null()),
                            )
                            .set(&changes)
                            .returning(<$row>::as_returning())
                            .get_result(conn)
                            .await
                            .optional()
                        }
                        .scope_boxed()
                    })
                    .await
                    .map_err(|err| map_diesel_error(err, <$resource as Resource>::NAME))?;
                updated
                    .ok_or_else(|| ResourcePersistenceError::not_found(id))
                    .and_then(<$resource>::try_from)
            }

            async fn delete(&self, id: i64) -> Result<(), ResourcePersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let now = self.clock.utc();
                let affected = conn
                    .transaction::<_, diesel::result::Error, _>(|conn| {
                        async move {
                            diesel::update(
                                $table::table
                                    .filter($table::id.eq(id))
                                    .filter($table::deleted_at.is_null()),
                            )
                            .set((
                                $table::deleted_at.eq(Some(now)),
                                $table::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .await
                        }
                        .scope_boxed()
                    })
                    .await
                    .map_err(|err| map_diesel_error(err, <$resource as Resource>::NAME))?;
                if affected == 0 {
                    return Err(ResourcePersistenceError::not_found(id));
                }
                Ok(())
            }
        }
    };
}

pub(crate) use impl_resource_repository;
