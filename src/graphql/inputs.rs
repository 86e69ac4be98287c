//! GraphQL input objects and their conversions into domain types.

use async_graphql::InputObject;
use chrono::NaiveDateTime;

use crate::models::{
    self, EducationInfoPatch, MailingAddressPatch, MlhTermsPatch, NewEducationInfo,
    NewMailingAddress, NewMlhTerms, NewUserProfile, Race, ShirtSize, UserPatch,
};

#[derive(InputObject, Clone)]
pub struct PronounsInput {
    pub subjective: String,
    pub objective: String,
}

impl From<PronounsInput> for models::Pronouns {
    fn from(input: PronounsInput) -> Self {
        models::Pronouns::new(input.subjective, input.objective)
    }
}

#[derive(InputObject, Clone)]
pub struct MailingAddressInput {
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address_lines: Vec<String>,
}

impl From<MailingAddressInput> for NewMailingAddress {
    fn from(input: MailingAddressInput) -> Self {
        NewMailingAddress {
            country: input.country,
            state: input.state,
            city: input.city,
            postal_code: input.postal_code,
            address_lines: input.address_lines,
        }
    }
}

#[derive(InputObject, Clone, Copy)]
pub struct MlhTermsInput {
    pub send_messages: bool,
    pub share_info: bool,
    pub code_of_conduct: bool,
}

impl From<MlhTermsInput> for NewMlhTerms {
    fn from(input: MlhTermsInput) -> Self {
        NewMlhTerms {
            send_messages: input.send_messages,
            share_info: input.share_info,
            code_of_conduct: input.code_of_conduct,
        }
    }
}

#[derive(InputObject, Clone)]
pub struct EducationInfoInput {
    pub name: String,
    pub major: String,
    pub graduation_date: NaiveDateTime,
    pub level: Option<String>,
}

impl From<EducationInfoInput> for NewEducationInfo {
    fn from(input: EducationInfoInput) -> Self {
        NewEducationInfo {
            name: input.name,
            major: input.major,
            graduation_date: input.graduation_date,
            level: input.level,
        }
    }
}

/// Everything `register` collects about the new account.
#[derive(InputObject, Clone)]
pub struct NewUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronouns: Option<PronounsInput>,
    pub mailing_address: Option<MailingAddressInput>,
    pub mlh_terms: Option<MlhTermsInput>,
    pub education_info: Option<EducationInfoInput>,
}

impl From<NewUserInput> for NewUserProfile {
    fn from(input: NewUserInput) -> Self {
        NewUserProfile {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            age: input.age,
            gender: input.gender,
            race: input.race,
            years_of_experience: input.years_of_experience,
            shirt_size: input.shirt_size,
            pronouns: input.pronouns.map(Into::into),
            mailing_address: input.mailing_address.map(Into::into),
            mlh_terms: input.mlh_terms.map(Into::into),
            education_info: input.education_info.map(Into::into),
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct MailingAddressPatchInput {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub address_lines: Option<Vec<String>>,
}

impl From<MailingAddressPatchInput> for MailingAddressPatch {
    fn from(input: MailingAddressPatchInput) -> Self {
        MailingAddressPatch {
            country: input.country,
            state: input.state,
            city: input.city,
            postal_code: input.postal_code,
            address_lines: input.address_lines,
        }
    }
}

#[derive(InputObject, Clone, Copy, Default)]
pub struct MlhTermsPatchInput {
    pub send_messages: Option<bool>,
    pub share_info: Option<bool>,
    pub code_of_conduct: Option<bool>,
}

impl From<MlhTermsPatchInput> for MlhTermsPatch {
    fn from(input: MlhTermsPatchInput) -> Self {
        MlhTermsPatch {
            send_messages: input.send_messages,
            share_info: input.share_info,
            code_of_conduct: input.code_of_conduct,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct EducationInfoPatchInput {
    pub name: Option<String>,
    pub major: Option<String>,
    pub graduation_date: Option<NaiveDateTime>,
    pub level: Option<String>,
}

impl From<EducationInfoPatchInput> for EducationInfoPatch {
    fn from(input: EducationInfoPatchInput) -> Self {
        EducationInfoPatch {
            name: input.name,
            major: input.major,
            graduation_date: input.graduation_date,
            level: input.level,
        }
    }
}

/// Sparse update input; omitted fields are left untouched. An input with
/// nothing present is rejected before any transaction starts.
#[derive(InputObject, Clone, Default)]
pub struct UserPatchInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub race: Option<Vec<Race>>,
    pub years_of_experience: Option<f64>,
    pub shirt_size: Option<ShirtSize>,
    pub pronouns: Option<PronounsInput>,
    pub mailing_address: Option<MailingAddressPatchInput>,
    pub mlh_terms: Option<MlhTermsPatchInput>,
    pub education_info: Option<EducationInfoPatchInput>,
}

impl From<UserPatchInput> for UserPatch {
    fn from(input: UserPatchInput) -> Self {
        UserPatch {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            age: input.age,
            gender: input.gender,
            race: input.race,
            years_of_experience: input.years_of_experience,
            shirt_size: input.shirt_size,
            pronouns: input.pronouns.map(Into::into),
            mailing_address: input.mailing_address.map(Into::into),
            mlh_terms: input.mlh_terms.map(Into::into),
            education_info: input.education_info.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_input_converts_to_empty_patch() {
        let patch: UserPatch = UserPatchInput::default().into();
        assert!(patch.is_empty());
    }

    #[test]
    fn pronoun_input_maps_to_pair() {
        let pair: models::Pronouns = PronounsInput {
            subjective: "they".to_string(),
            objective: "them".to_string(),
        }
        .into();
        assert_eq!(pair, models::Pronouns::new("they", "them"));
    }
}
