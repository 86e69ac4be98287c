mod enums;
mod pronouns;
mod satellites;
mod user;

pub use enums::{Provider, Race, Role, ShirtSize};
pub use pronouns::{NewPronounRow, PronounRow, Pronouns};
pub use satellites::{
    ApiKeyRow, EducationInfoPatch, EducationInfoRow, MailingAddressPatch, MailingAddressRow,
    MlhTermsPatch, MlhTermsRow, NewApiKeyRow, NewEducationInfoRow, NewMailingAddressRow,
    NewMlhTermsRow,
};
pub use user::{
    MailingAddress, MlhTerms, NewEducationInfo, NewMailingAddress, NewMlhTerms, NewUserProfile,
    NewUserRow, OAuthIdentity, User, UserChangeset, UserPatch, UserRow,
};
