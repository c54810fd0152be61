//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update this file by hand or regenerate it with
//! `diesel print-schema`.

diesel::table! {
    /// Registered accounts.
    ///
    /// `verification_code` and `verification_sent_at` are both set while the
    /// account is pending and both null once it is active; check constraints
    /// enforce the pairing.
    users (id) {
        id -> Int8,
        display_name -> Varchar,
        birth_date -> Date,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `pending_verification` or `active`.
        status -> Varchar,
        verification_code -> Nullable<Varchar>,
        verification_sent_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Daily check-ins, unique per `(user_id, checked_on)`.
    check_ins (id) {
        id -> Int8,
        user_id -> Int8,
        /// UTC calendar day the check-in describes.
        checked_on -> Date,
        energy -> Int2,
        focus -> Int2,
        emotional_balance -> Int2,
        sleep_quality -> Int2,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(check_ins -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(check_ins, users);
