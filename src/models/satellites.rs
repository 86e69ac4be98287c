//! One-to-one satellite records keyed by user id.
//!
//! Each satellite is independently insertable and patchable; absence of a
//! row means the user never provided the data, not that it is empty.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Mailing address
// ============================================================================

#[derive(Debug, Queryable, Selectable, Serialize, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::mailing_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MailingAddressRow {
    pub user_id: i32,
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address_lines: Vec<String>,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::mailing_addresses)]
pub struct NewMailingAddressRow {
    pub user_id: i32,
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address_lines: Vec<String>,
}

/// Sparse mailing-address update; `None` fields are left untouched.
#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::mailing_addresses)]
pub struct MailingAddressPatch {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub address_lines: Option<Vec<String>>,
}

impl MailingAddressPatch {
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.address_lines.is_none()
    }
}

// ============================================================================
// MLH consent terms
// ============================================================================

#[derive(Debug, Queryable, Selectable, Serialize, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::schema::mlh_terms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MlhTermsRow {
    pub user_id: i32,
    pub send_messages: bool,
    pub share_info: bool,
    pub code_of_conduct: bool,
}

#[derive(Debug, Insertable, Deserialize, Clone, Copy)]
#[diesel(table_name = crate::schema::mlh_terms)]
pub struct NewMlhTermsRow {
    pub user_id: i32,
    pub send_messages: bool,
    pub share_info: bool,
    pub code_of_conduct: bool,
}

#[derive(Debug, AsChangeset, Deserialize, Clone, Copy, Default)]
#[diesel(table_name = crate::schema::mlh_terms)]
pub struct MlhTermsPatch {
    pub send_messages: Option<bool>,
    pub share_info: Option<bool>,
    pub code_of_conduct: Option<bool>,
}

impl MlhTermsPatch {
    pub fn is_empty(&self) -> bool {
        self.send_messages.is_none()
            && self.share_info.is_none()
            && self.code_of_conduct.is_none()
    }
}

// ============================================================================
// Education info
// ============================================================================

#[derive(Debug, Queryable, Selectable, Serialize, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::education_info)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EducationInfoRow {
    pub user_id: i32,
    pub name: String,
    pub major: String,
    pub graduation_date: NaiveDateTime,
    pub level: Option<String>,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::education_info)]
pub struct NewEducationInfoRow {
    pub user_id: i32,
    pub name: String,
    pub major: String,
    pub graduation_date: NaiveDateTime,
    pub level: Option<String>,
}

#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::education_info)]
pub struct EducationInfoPatch {
    pub name: Option<String>,
    pub major: Option<String>,
    pub graduation_date: Option<NaiveDateTime>,
    pub level: Option<String>,
}

impl EducationInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.major.is_none()
            && self.graduation_date.is_none()
            && self.level.is_none()
    }
}

// ============================================================================
// API key
// ============================================================================

#[derive(Debug, Queryable, Selectable, Serialize, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::api_keys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiKeyRow {
    pub user_id: i32,
    pub key: String,
    pub created: NaiveDateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::api_keys)]
pub struct NewApiKeyRow {
    pub user_id: i32,
    pub key: String,
    pub created: NaiveDateTime,
}
