//! Enumerated column types stored as text.
//!
//! All enums are persisted as their SCREAMING_SNAKE GraphQL names so rows
//! stay readable in psql and stable across re-orderings of the Rust enum.

use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Account role. Every self-registered account is `Normal`; elevation to
/// `Admin` happens out of band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    async_graphql::Enum,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Normal,
    Admin,
}

impl diesel::query_builder::QueryId for Role {
    type QueryId = Role;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for Role {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            Role::Normal => "NORMAL",
            Role::Admin => "ADMIN",
        };
        out.write_all(s.as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for Role {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "NORMAL" => Ok(Role::Normal),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unrecognized role: {}", s).into()),
        }
    }
}

/// Supported third-party login providers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    async_graphql::Enum,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Github,
    Gmail,
}

impl diesel::query_builder::QueryId for Provider {
    type QueryId = Provider;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "GITHUB",
            Provider::Gmail => "GMAIL",
        }
    }
}

impl ToSql<Text, Pg> for Provider {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for Provider {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "GITHUB" => Ok(Provider::Github),
            "GMAIL" => Ok(Provider::Gmail),
            _ => Err(format!("Unrecognized oauth_provider: {}", s).into()),
        }
    }
}

/// Shirt size selected during registration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    async_graphql::Enum,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShirtSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl diesel::query_builder::QueryId for ShirtSize {
    type QueryId = ShirtSize;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for ShirtSize {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            ShirtSize::Xs => "XS",
            ShirtSize::S => "S",
            ShirtSize::M => "M",
            ShirtSize::L => "L",
            ShirtSize::Xl => "XL",
            ShirtSize::Xxl => "XXL",
        };
        out.write_all(s.as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for ShirtSize {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "XS" => Ok(ShirtSize::Xs),
            "S" => Ok(ShirtSize::S),
            "M" => Ok(ShirtSize::M),
            "L" => Ok(ShirtSize::L),
            "XL" => Ok(ShirtSize::Xl),
            "XXL" => Ok(ShirtSize::Xxl),
            _ => Err(format!("Unrecognized shirt_size: {}", s).into()),
        }
    }
}

/// Self-reported race, stored as a text array on the user row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    async_graphql::Enum,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    AmericanIndianOrAlaskaNative,
    Asian,
    BlackOrAfricanAmerican,
    HispanicOrLatino,
    NativeHawaiianOrPacificIslander,
    White,
    Other,
}

impl diesel::query_builder::QueryId for Race {
    type QueryId = Race;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for Race {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            Race::AmericanIndianOrAlaskaNative => "AMERICAN_INDIAN_OR_ALASKA_NATIVE",
            Race::Asian => "ASIAN",
            Race::BlackOrAfricanAmerican => "BLACK_OR_AFRICAN_AMERICAN",
            Race::HispanicOrLatino => "HISPANIC_OR_LATINO",
            Race::NativeHawaiianOrPacificIslander => "NATIVE_HAWAIIAN_OR_PACIFIC_ISLANDER",
            Race::White => "WHITE",
            Race::Other => "OTHER",
        };
        out.write_all(s.as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for Race {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "AMERICAN_INDIAN_OR_ALASKA_NATIVE" => Ok(Race::AmericanIndianOrAlaskaNative),
            "ASIAN" => Ok(Race::Asian),
            "BLACK_OR_AFRICAN_AMERICAN" => Ok(Race::BlackOrAfricanAmerican),
            "HISPANIC_OR_LATINO" => Ok(Race::HispanicOrLatino),
            "NATIVE_HAWAIIAN_OR_PACIFIC_ISLANDER" => Ok(Race::NativeHawaiianOrPacificIslander),
            "WHITE" => Ok(Race::White),
            "OTHER" => Ok(Race::Other),
            _ => Err(format!("Unrecognized race: {}", s).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_as_str_matches_graphql_names() {
        assert_eq!(Provider::Github.as_str(), "GITHUB");
        assert_eq!(Provider::Gmail.as_str(), "GMAIL");
    }

    #[test]
    fn role_serde_uses_uppercase() {
        let json = serde_json::to_string(&Role::Normal).unwrap();
        assert_eq!(json, "\"NORMAL\"");
        let back: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(back, Role::Admin);
    }
}
