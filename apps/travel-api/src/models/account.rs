use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::schema::account;

/// Full account row from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = account)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating a new account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
}
