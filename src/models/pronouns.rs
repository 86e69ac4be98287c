use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Pronoun pair, e.g. subjective "he" / objective "him".
///
/// The pair is the natural key; the integer row id is a surrogate with no
/// meaning outside the database. Pairs are shared between users and never
/// mutated in place, so the value is `Hash + Eq` and doubles as the reverse
/// cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pronouns {
    pub subjective: String,
    pub objective: String,
}

impl Pronouns {
    pub fn new(subjective: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            subjective: subjective.into(),
            objective: objective.into(),
        }
    }
}

/// Pronoun row as stored.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::pronouns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PronounRow {
    pub id: i32,
    pub subjective: String,
    pub objective: String,
}

impl From<PronounRow> for Pronouns {
    fn from(row: PronounRow) -> Self {
        Pronouns {
            subjective: row.subjective,
            objective: row.objective,
        }
    }
}

/// Insert model for a new pronoun pair.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::pronouns)]
pub struct NewPronounRow {
    pub subjective: String,
    pub objective: String,
}

impl From<Pronouns> for NewPronounRow {
    fn from(value: Pronouns) -> Self {
        NewPronounRow {
            subjective: value.subjective,
            objective: value.objective,
        }
    }
}
