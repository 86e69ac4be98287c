use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Constraint names are resolved against the known table list, so composite
/// names such as `users_oauth_provider_oauth_uid_key` split cleanly into
/// table and field parts.
pub struct ConstraintParser;

/// Tables this schema owns, longest name first so prefix matching is
/// unambiguous.
const TABLES: &[&str] = &[
    "hackathon_applications",
    "mailing_addresses",
    "event_attendance",
    "hackathon_checkin",
    "education_info",
    "api_keys",
    "mlh_terms",
    "pronouns",
    "meals",
    "users",
];

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // Matches column names in quotes
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // Matches table names in quotes
            table_name: Regex::new(r#"table "([^"]+)""#).unwrap(),
        }
    }
}

/// Global regex patterns cache
static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation message to extract structured
    /// information.
    ///
    /// # Returns
    /// Optional tuple of (entity, field, value) if parsing succeeds
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        // Prefer the constraint name, e.g. "users_oauth_provider_oauth_uid_key"
        if let Some(constraint) = constraint_name
            && let Some((entity, field)) = Self::parse_constraint_name(constraint)
        {
            if let Some(value) = Self::extract_value_from_message(message) {
                return Some((entity, field, value));
            }
            return Some((entity, field, "duplicate_value".to_string()));
        }

        // Fallback: parse from the error message directly
        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a not null constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (entity, field) if parsing succeeds
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(field) = Self::extract_column_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .or_else(|| {
                    constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e))
                })
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a foreign key constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (entity, field, referenced_value) if parsing succeeds
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        // Constraint names look like "mailing_addresses_user_id_fkey"
        if let Some(constraint) = constraint_name
            && let Some((entity, field)) = Self::parse_constraint_name(constraint)
        {
            if let Some(value) = Self::extract_value_from_message(message) {
                return Some((entity, field, value));
            }
            return Some((entity, field, "invalid_reference".to_string()));
        }

        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a check constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (entity, field) if parsing succeeds
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(constraint) = constraint_name
            && let Some((entity, field)) = Self::parse_constraint_name(constraint)
        {
            return Some((entity, field));
        }

        if let Some(field) = Self::extract_column_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Splits a constraint name into table and field parts.
    ///
    /// The table prefix is matched against the known table list and a
    /// trailing `_key`, `_idx`, `_check`, `_fkey` or `_pkey` suffix is
    /// stripped, so composite field names survive intact:
    /// - "users_oauth_provider_oauth_uid_key" -> ("users", "oauth_provider_oauth_uid")
    /// - "pronouns_subjective_objective_key" -> ("pronouns", "subjective_objective")
    /// - "mailing_addresses_user_id_fkey" -> ("mailing_addresses", "user_id")
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = constraint_name
            .strip_suffix("_fkey")
            .or_else(|| constraint_name.strip_suffix("_pkey"))
            .or_else(|| constraint_name.strip_suffix("_key"))
            .or_else(|| constraint_name.strip_suffix("_idx"))
            .or_else(|| constraint_name.strip_suffix("_check"))
            .unwrap_or(constraint_name);

        for table in TABLES {
            if let Some(rest) = stem.strip_prefix(table)
                && let Some(field) = rest.strip_prefix('_')
                && !field.is_empty()
            {
                return Some(((*table).to_string(), field.to_string()));
            }
        }
        None
    }

    /// Extracts a column name from patterns like `column "field_name"`.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        patterns
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts a table name from patterns like `table "table_name"`.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        patterns
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts field and value from patterns like `Key (field)=(value)`.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let patterns = Self::patterns();
        patterns.key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    /// Extracts a value from a database error message.
    pub fn extract_value_from_message(message: &str) -> Option<String> {
        if let Some((_, value)) = Self::extract_key_value_from_message(message) {
            return Some(value);
        }

        // Fallback: first quoted string in the message
        if let Some(start) = message.find('"')
            && let Some(end) = message[start + 1..].find('"')
        {
            return Some(message[start + 1..start + 1 + end].to_string());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unique_violation_with_composite_constraint_name() {
        let message = "duplicate key value violates unique constraint \"users_oauth_provider_oauth_uid_key\"\nDETAIL: Key (oauth_provider, oauth_uid)=(GITHUB, gh-42) already exists.";
        let result = ConstraintParser::parse_unique_violation(
            message,
            Some("users_oauth_provider_oauth_uid_key"),
        );
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "oauth_provider_oauth_uid".to_string(),
                "GITHUB, gh-42".to_string()
            ))
        );
    }

    #[test]
    fn parse_unique_violation_for_pronoun_pair() {
        let message = "duplicate key value violates unique constraint \"pronouns_subjective_objective_key\"\nDETAIL: Key (subjective, objective)=(she, her) already exists.";
        let result = ConstraintParser::parse_unique_violation(
            message,
            Some("pronouns_subjective_objective_key"),
        );
        assert_eq!(
            result,
            Some((
                "pronouns".to_string(),
                "subjective_objective".to_string(),
                "she, her".to_string()
            ))
        );
    }

    #[test]
    fn parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint\nDETAIL: Key (email)=(test@example.com) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "email".to_string(),
                "test@example.com".to_string()
            ))
        );
    }

    #[test]
    fn parse_not_null_violation() {
        let message = "null value in column \"email\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(result, Some(("resource".to_string(), "email".to_string())));
    }

    #[test]
    fn parse_foreign_key_violation() {
        let message = "insert or update on table \"mailing_addresses\" violates foreign key constraint \"mailing_addresses_user_id_fkey\"\nDETAIL: Key (user_id)=(999) is not present in table \"users\".";
        let result = ConstraintParser::parse_foreign_key_violation(
            message,
            Some("mailing_addresses_user_id_fkey"),
        );
        assert_eq!(
            result,
            Some((
                "mailing_addresses".to_string(),
                "user_id".to_string(),
                "999".to_string()
            ))
        );
    }

    #[test]
    fn parse_constraint_name_strips_suffixes() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("api_keys_user_id_fkey"),
            Some(("api_keys".to_string(), "user_id".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("users_pkey"), None);
        assert_eq!(
            ConstraintParser::parse_constraint_name("unknown_table_email_key"),
            None
        );
    }

    #[test]
    fn extract_key_value_from_message() {
        let message = "Key (user_id)=(123) is not present in table";
        let result = ConstraintParser::extract_key_value_from_message(message);
        assert_eq!(result, Some(("user_id".to_string(), "123".to_string())));
    }

    #[test]
    fn extract_value_falls_back_to_quoted_string() {
        let message = "some error with \"quoted_value\" in it";
        let result = ConstraintParser::extract_value_from_message(message);
        assert_eq!(result, Some("quoted_value".to_string()));
    }

    #[test]
    fn graceful_parsing_failures() {
        let message = "completely unrelated error message";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None), None);
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message, None),
            None
        );
        assert_eq!(
            ConstraintParser::parse_foreign_key_violation(message, None),
            None
        );
        assert_eq!(ConstraintParser::parse_check_violation(message, None), None);
    }
}
