use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::profile;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub verified: bool,
    pub join_date: NaiveDate,
    pub home: Option<String>,
    pub work: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profile)]
pub struct NewProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub join_date: NaiveDate,
}

/// Settings update. `None` leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profile)]
pub struct ProfileChanges {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub home: Option<String>,
    pub work: Option<String>,
}

impl Profile {
    pub fn apply(&mut self, changes: ProfileChanges) {
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
        if let Some(home) = changes.home {
            self.home = Some(home);
        }
        if let Some(work) = changes.work {
            self.work = Some(work);
        }
    }
}
