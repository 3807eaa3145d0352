//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after changing them.

diesel::table! {
    /// Feed schedules.
    schedules (id) {
        /// Primary key, store-assigned.
        id -> Int4,
        /// `HH:mm` time of day; lexicographic order is chronological.
        time -> Varchar,
        /// Whether this row is pushed to the device.
        enabled -> Bool,
        /// Optional day selector, uninterpreted.
        days -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Append-only feed history.
    feed_logs (id) {
        /// Primary key, store-assigned.
        id -> Int4,
        /// Insertion timestamp, defaulted by the database.
        triggered_at -> Timestamptz,
        /// `SUCCESS` | `FAILED` | `PENDING`.
        status -> Varchar,
        /// `SCHEDULE` | `MANUAL`.
        feed_type -> Varchar,
        /// Optional free-text diagnostic.
        message -> Nullable<Text>,
    }
}
