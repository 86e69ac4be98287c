//! Repository tests against a live PostgreSQL instance.
//!
//! These cover the properties only a real database can demonstrate:
//! duplicate-identity conflicts, all-or-nothing partial updates, and the
//! satellite cascade on delete. Each test keys its rows with a UUID so
//! concurrent runs do not collide, and cleans up what it created.
//!
//! The tests are skipped silently when `DATABASE_URL` is not set.

use chrono::NaiveDate;
use tokio::sync::OnceCell;
use uuid::Uuid;

use gatehouse::config::DatabaseConfig;
use gatehouse::db::{establish_async_connection_pool, run_pending_migrations};
use gatehouse::error::AppError;
use gatehouse::models::{
    MailingAddressPatch, NewEducationInfo, NewMailingAddress, NewMlhTerms, NewUserProfile,
    OAuthIdentity, Pronouns, Provider, UserPatch,
};
use gatehouse::repositories::Repositories;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects to the database named by `DATABASE_URL`, applying pending
/// migrations once per test binary. `None` means no database is configured.
async fn live_repositories() -> Option<Repositories> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        url,
        ..Default::default()
    };

    MIGRATED
        .get_or_init(|| async {
            run_pending_migrations(&config)
                .await
                .expect("migrations should apply cleanly");
        })
        .await;

    let pool = establish_async_connection_pool(&config)
        .await
        .expect("pool should connect");
    Some(Repositories::new(pool))
}

fn profile(first_name: &str, tag: &str) -> NewUserProfile {
    NewUserProfile {
        first_name: first_name.to_string(),
        last_name: format!("Tester-{tag}"),
        email: format!("{first_name}.{tag}@example.com").to_lowercase(),
        phone_number: "555-0100".to_string(),
        age: Some(21),
        gender: None,
        race: None,
        years_of_experience: Some(2.0),
        shirt_size: None,
        pronouns: Some(Pronouns::new("they", "them")),
        mailing_address: Some(NewMailingAddress {
            country: "US".to_string(),
            state: "OH".to_string(),
            city: "Akron".to_string(),
            postal_code: "44325".to_string(),
            address_lines: vec!["302 E Buchtel Ave".to_string()],
        }),
        mlh_terms: Some(NewMlhTerms {
            send_messages: true,
            share_info: false,
            code_of_conduct: true,
        }),
        education_info: Some(NewEducationInfo {
            name: "State University".to_string(),
            major: "Computer Science".to_string(),
            graduation_date: NaiveDate::from_ymd_opt(2027, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            level: None,
        }),
    }
}

#[tokio::test]
async fn duplicate_oauth_identity_is_rejected_as_conflict() {
    let Some(repos) = live_repositories().await else {
        return;
    };
    let tag = Uuid::new_v4().to_string();
    let oauth = OAuthIdentity {
        provider: Provider::Github,
        uid: format!("gh-{tag}"),
    };

    let user = repos
        .user_writer
        .create(profile("First", &tag), oauth.clone())
        .await
        .expect("first create should succeed");

    let err = repos
        .user_writer
        .create(profile("Second", &tag), oauth.clone())
        .await
        .expect_err("second create for the same identity must fail");
    assert!(matches!(err, AppError::Duplicate { .. }));

    // The surviving account is untouched by the rejected create.
    let fetched = repos.users.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.first_name, "First");
    assert_eq!(fetched.oauth.uid, oauth.uid);

    repos.user_writer.delete(user.id).await.unwrap();
}

#[tokio::test]
async fn failed_satellite_update_rolls_back_base_row_changes() {
    let Some(repos) = live_repositories().await else {
        return;
    };
    let tag = Uuid::new_v4().to_string();

    // No mailing address, so a patch touching it must fail.
    let mut input = profile("Rollback", &tag);
    input.mailing_address = None;
    let user = repos
        .user_writer
        .create(
            input,
            OAuthIdentity {
                provider: Provider::Gmail,
                uid: format!("gm-{tag}"),
            },
        )
        .await
        .unwrap();

    let patch = UserPatch {
        first_name: Some("Renamed".to_string()),
        mailing_address: Some(MailingAddressPatch {
            city: Some("Columbus".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let err = repos
        .user_writer
        .update(user.id, patch)
        .await
        .expect_err("patching a missing satellite must fail");
    assert!(matches!(err, AppError::NotFound { .. }));

    // The name change rode the same transaction and must be gone too.
    let fetched = repos.users.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.first_name, "Rollback");

    repos.user_writer.delete(user.id).await.unwrap();
}

#[tokio::test]
async fn delete_removes_user_and_all_satellite_rows() {
    let Some(repos) = live_repositories().await else {
        return;
    };
    let tag = Uuid::new_v4().to_string();

    let user = repos
        .user_writer
        .create(
            profile("Cascade", &tag),
            OAuthIdentity {
                provider: Provider::Github,
                uid: format!("gh-{tag}"),
            },
        )
        .await
        .unwrap();
    repos
        .user_writer
        .set_api_key(user.id, format!("key-{tag}"))
        .await
        .unwrap();

    repos.user_writer.delete(user.id).await.unwrap();

    let err = repos.users.get_by_id(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    assert!(repos.users.mailing_address(user.id).await.unwrap().is_none());
    assert!(repos.users.mlh_terms(user.id).await.unwrap().is_none());
    assert!(repos.users.education_info(user.id).await.unwrap().is_none());
    assert!(repos.users.api_key(user.id).await.unwrap().is_none());

    // A second delete finds nothing left to remove.
    let err = repos.user_writer.delete(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
