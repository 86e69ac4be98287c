use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::enums::{Provider, Race, Role, ShirtSize};
use crate::models::pronouns::Pronouns;
use crate::models::satellites::{
    EducationInfoPatch, MailingAddressPatch, MailingAddressRow, MlhTermsPatch, MlhTermsRow,
    NewEducationInfoRow, NewMailingAddressRow, NewMlhTermsRow,
};

/// Base user projection, without the pronoun pair or oauth identity.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: Option<i32>,
    pub role: Role,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronoun_id: Option<i32>,
    pub oauth_provider: Provider,
    pub oauth_uid: String,
}

/// Insert model for a new user row.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: Option<i32>,
    pub role: Role,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronoun_id: Option<i32>,
    pub oauth_provider: Provider,
    pub oauth_uid: String,
}

/// Sparse update of the base user columns; `None` fields are left untouched.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronoun_id: Option<i32>,
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.race.is_none()
            && self.years_of_experience.is_none()
            && self.shirt_size.is_none()
            && self.pronoun_id.is_none()
    }
}

/// Which third-party account a user authenticated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthIdentity {
    pub provider: Provider,
    pub uid: String,
}

/// Fully assembled user as served to callers. The pronoun pair is resolved
/// from its surrogate id before the user leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: Option<i32>,
    pub role: Role,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronouns: Option<Pronouns>,
    pub oauth: OAuthIdentity,
}

impl User {
    pub fn from_row(row: UserRow, pronouns: Option<Pronouns>) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            age: row.age,
            role: row.role,
            gender: row.gender,
            race: row.race,
            years_of_experience: row.years_of_experience,
            shirt_size: row.shirt_size,
            pronouns,
            oauth: OAuthIdentity {
                provider: row.oauth_provider,
                uid: row.oauth_uid,
            },
        }
    }
}

/// Everything a new registration supplies, before surrogate ids exist.
#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronouns: Option<Pronouns>,
    pub mailing_address: Option<NewMailingAddress>,
    pub mlh_terms: Option<NewMlhTerms>,
    pub education_info: Option<NewEducationInfo>,
}

#[derive(Debug, Clone)]
pub struct NewMailingAddress {
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address_lines: Vec<String>,
}

impl NewMailingAddress {
    pub fn into_row(self, user_id: i32) -> NewMailingAddressRow {
        NewMailingAddressRow {
            user_id,
            country: self.country,
            state: self.state,
            city: self.city,
            postal_code: self.postal_code,
            address_lines: self.address_lines,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewMlhTerms {
    pub send_messages: bool,
    pub share_info: bool,
    pub code_of_conduct: bool,
}

impl NewMlhTerms {
    pub fn into_row(self, user_id: i32) -> NewMlhTermsRow {
        NewMlhTermsRow {
            user_id,
            send_messages: self.send_messages,
            share_info: self.share_info,
            code_of_conduct: self.code_of_conduct,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEducationInfo {
    pub name: String,
    pub major: String,
    pub graduation_date: chrono::NaiveDateTime,
    pub level: Option<String>,
}

impl NewEducationInfo {
    pub fn into_row(self, user_id: i32) -> NewEducationInfoRow {
        NewEducationInfoRow {
            user_id,
            name: self.name,
            major: self.major,
            graduation_date: self.graduation_date,
            level: self.level,
        }
    }
}

/// One partial update across the user row and its satellites, applied as a
/// single transaction. `pronouns` replaces the pronoun pair wholesale; the
/// pair is resolved to an id (creating it if new) inside the same
/// transaction.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronouns: Option<Pronouns>,
    pub mailing_address: Option<MailingAddressPatch>,
    pub mlh_terms: Option<MlhTermsPatch>,
    pub education_info: Option<EducationInfoPatch>,
}

impl UserPatch {
    /// True when the patch would touch nothing. Empty patches are rejected
    /// before any transaction starts.
    pub fn is_empty(&self) -> bool {
        self.base_changeset().is_empty()
            && self.pronouns.is_none()
            && self.mailing_address.as_ref().is_none_or(|p| p.is_empty())
            && self.mlh_terms.as_ref().is_none_or(|p| p.is_empty())
            && self.education_info.as_ref().is_none_or(|p| p.is_empty())
    }

    /// The base-column part of the patch. `pronoun_id` is filled in later,
    /// once the pair has been resolved against the pronoun store.
    pub fn base_changeset(&self) -> UserChangeset {
        UserChangeset {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            age: self.age,
            gender: self.gender.clone(),
            race: self.race.clone(),
            years_of_experience: self.years_of_experience,
            shirt_size: self.shirt_size,
            pronoun_id: None,
        }
    }
}

/// Assembled mailing address as served to callers.
pub type MailingAddress = MailingAddressRow;

/// Assembled MLH terms as served to callers.
pub type MlhTerms = MlhTermsRow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn patch_with_only_empty_satellites_is_empty() {
        let patch = UserPatch {
            mailing_address: Some(MailingAddressPatch::default()),
            mlh_terms: Some(MlhTermsPatch::default()),
            ..Default::default()
        };
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_with_pronouns_is_not_empty() {
        let patch = UserPatch {
            pronouns: Some(Pronouns::new("she", "her")),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn base_changeset_never_carries_pronoun_id() {
        let patch = UserPatch {
            first_name: Some("Ada".into()),
            pronouns: Some(Pronouns::new("she", "her")),
            ..Default::default()
        };
        let changeset = patch.base_changeset();
        assert_eq!(changeset.first_name.as_deref(), Some("Ada"));
        assert!(changeset.pronoun_id.is_none());
    }

    #[test]
    fn from_row_assembles_oauth_identity() {
        let row = UserRow {
            id: 7,
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            phone_number: "555-0100".into(),
            age: Some(35),
            role: Role::Normal,
            gender: None,
            race: None,
            years_of_experience: Some(10.0),
            shirt_size: Some(ShirtSize::M),
            pronoun_id: Some(3),
            oauth_provider: Provider::Github,
            oauth_uid: "gh-42".into(),
        };
        let user = User::from_row(row, Some(Pronouns::new("she", "her")));
        assert_eq!(user.oauth.provider, Provider::Github);
        assert_eq!(user.oauth.uid, "gh-42");
        assert_eq!(user.pronouns, Some(Pronouns::new("she", "her")));
    }
}
