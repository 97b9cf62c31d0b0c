//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Every table
//! carries a nullable `deleted_at`; rows with a value there are treated as
//! removed by all repositories.

diesel::table! {
    /// Staff accounts. Email and username are unique among live rows.
    users (id) {
        id -> Int8,
        username -> Varchar,
        full_name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        /// One of `admin`, `pharmacist`, `cashier`.
        role -> Varchar,
        /// One of `active`, `inactive`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Product categories, optionally nested.
    categories (id) {
        id -> Int8,
        name -> Varchar,
        description -> Text,
        parent_category_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Stock suppliers.
    suppliers (id) {
        id -> Int8,
        name -> Varchar,
        contact_person -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        address -> Nullable<Text>,
        email -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Stocked products.
    products (id) {
        id -> Int8,
        name -> Varchar,
        category_id -> Int8,
        generic_name -> Varchar,
        description -> Nullable<Text>,
        /// `NUMERIC(12, 2)`.
        price -> Numeric,
        stock -> Int4,
        unit -> Varchar,
        expiration_date -> Date,
        barcode -> Varchar,
        supplier_id -> Int8,
        min_stock -> Int4,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(products -> suppliers (supplier_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, suppliers, products);
