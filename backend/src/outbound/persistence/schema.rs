//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users and their accumulated experience.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Written only by experience accrual, always as `total_exp + delta`.
        total_exp -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published projects. `user_id` is the owner and seller.
    projects (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        /// `free` or `paid`.
        project_type -> Varchar,
        price -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Purchase transactions.
    ///
    /// A partial unique index on `(project_id, buyer_id) WHERE status =
    /// 'success'` keeps at most one successful purchase per buyer.
    transactions (id) {
        id -> Uuid,
        project_id -> Uuid,
        buyer_id -> Uuid,
        seller_id -> Uuid,
        amount -> Int8,
        /// `pending`, `success` or `failed`.
        status -> Varchar,
        external_order_id -> Varchar,
        external_transaction_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(projects -> users (user_id));
diesel::joinable!(transactions -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(projects, transactions, users);
