//! Integration tests for the application repository.

use std::time::Duration;

use confluence_core::error::ConfluenceError;
use confluence_core::models::application::{
    ApplicantProfile, ApplicationDraft, ApplicationStatus, CreateApplication, EntrepreneurProfile,
    InvestorProfile, StartupStage, YesNo,
};
use confluence_core::repository::ApplicationRepository;
use confluence_db::repository::SurrealApplicationRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> SurrealApplicationRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    confluence_db::run_migrations(&db).await.unwrap();
    SurrealApplicationRepository::new(db)
}

fn entrepreneur_draft(name: &str, startup: &str) -> ApplicationDraft {
    ApplicationDraft {
        name: name.into(),
        phone: "+91 98765 43210".into(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        linkedin: format!("https://linkedin.com/in/{}", name.to_lowercase()),
        location: Some("Bengaluru".into()),
        bio: None,
        profile: ApplicantProfile::Entrepreneur(EntrepreneurProfile {
            startup_name: startup.into(),
            startup_stage: Some(StartupStage::Mvp),
            ..Default::default()
        }),
    }
}

fn investor_draft(name: &str) -> ApplicationDraft {
    ApplicationDraft {
        name: name.into(),
        phone: "+91 91234 56789".into(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        linkedin: format!("https://linkedin.com/in/{}", name.to_lowercase()),
        location: Some("Delhi".into()),
        bio: None,
        profile: ApplicantProfile::Investor(InvestorProfile {
            is_iit_alumnus: Some(YesNo::Yes),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn create_forces_pending_and_timestamps() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    let app = repo
        .create(CreateApplication {
            user_id,
            draft: entrepreneur_draft("Asha Rao", "Acme Robotics"),
        })
        .await
        .unwrap();

    assert_eq!(app.status, ApplicationStatus::Pending);
    assert_eq!(app.user_id, user_id);
    assert!(app.updated_at.is_none());
    assert_eq!(app.profile.startup_name(), Some("Acme Robotics"));

    // created_at comes back from the store on read as well.
    let fetched = repo.get_by_id(app.id).await.unwrap();
    assert_eq!(fetched.created_at, app.created_at);
}

#[tokio::test]
async fn decision_sets_status_and_updated_at() {
    let repo = setup().await;

    let app = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: investor_draft("Vikram Shah"),
        })
        .await
        .unwrap();

    let approved = repo
        .set_status(app.id, ApplicationStatus::Approved)
        .await
        .unwrap();

    assert_eq!(approved.status, ApplicationStatus::Approved);
    assert!(approved.updated_at.is_some());
    assert_eq!(approved.created_at, app.created_at);
}

#[tokio::test]
async fn decision_on_unknown_id_mutates_nothing() {
    let repo = setup().await;

    let app = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: investor_draft("Vikram Shah"),
        })
        .await
        .unwrap();

    let err = repo
        .set_status(Uuid::new_v4(), ApplicationStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::NotFound { .. }));

    // The existing document is untouched.
    let fetched = repo.get_by_id(app.id).await.unwrap();
    assert_eq!(fetched.status, ApplicationStatus::Pending);
    assert!(fetched.updated_at.is_none());
}

#[tokio::test]
async fn decided_application_cannot_transition_again() {
    let repo = setup().await;

    let app = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: investor_draft("Vikram Shah"),
        })
        .await
        .unwrap();

    repo.set_status(app.id, ApplicationStatus::Rejected)
        .await
        .unwrap();

    let err = repo
        .set_status(app.id, ApplicationStatus::Approved)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ConfluenceError::InvalidTransition { .. }),
        "expected InvalidTransition, got: {err:?}"
    );
}

#[tokio::test]
async fn pending_is_not_a_decision_target() {
    let repo = setup().await;

    let app = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: investor_draft("Vikram Shah"),
        })
        .await
        .unwrap();

    let err = repo
        .set_status(app.id, ApplicationStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn get_by_user_returns_none_without_application() {
    let repo = setup().await;
    let found = repo.get_by_user(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn get_by_user_prefers_most_recent_duplicate() {
    let repo = setup().await;
    let user_id = Uuid::new_v4();

    repo.create(CreateApplication {
        user_id,
        draft: entrepreneur_draft("Asha Rao", "First Venture"),
    })
    .await
    .unwrap();

    // Ensure a strictly later creation timestamp.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = repo
        .create(CreateApplication {
            user_id,
            draft: entrepreneur_draft("Asha Rao", "Second Venture"),
        })
        .await
        .unwrap();

    let found = repo.get_by_user(user_id).await.unwrap().unwrap();
    assert_eq!(found.id, second.id);
    assert_eq!(found.profile.startup_name(), Some("Second Venture"));
}

#[tokio::test]
async fn list_all_orders_by_creation_desc() {
    let repo = setup().await;

    let first = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: investor_draft("Early Bird"),
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = repo
        .create(CreateApplication {
            user_id: Uuid::new_v4(),
            draft: entrepreneur_draft("Late Comer", "Night Owl Labs"),
        })
        .await
        .unwrap();

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}
