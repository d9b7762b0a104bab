//! Tests for `src/store.rs` against in-memory and on-disk SQLite.

use sitesmith::generation::Section;
use sitesmith::store::{IdeaStatus, IdeaStore, IdeaUpdate, NewIdea, StoreError, ANONYMOUS_USER};

fn section(name: &str, order: u32) -> Section {
    Section {
        name: name.to_owned(),
        description: format!("{name} description"),
        content: format!("<section>{name}</section>"),
        order,
    }
}

fn new_idea(idea: &str) -> NewIdea {
    NewIdea {
        idea: idea.to_owned(),
        user_id: None,
        sections: vec![section("Hero", 1), section("Pricing", 2)],
        status: IdeaStatus::Completed,
    }
}

async fn store() -> IdeaStore {
    IdeaStore::in_memory()
        .await
        .expect("in-memory store should open")
}

#[tokio::test]
async fn create_assigns_identity_and_defaults() {
    let store = store().await;
    let created = store
        .create(new_idea("Bike repair shop downtown"))
        .await
        .expect("create should succeed");

    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    assert_eq!(created.user_id, ANONYMOUS_USER);
    assert_eq!(created.status, IdeaStatus::Completed);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn get_round_trips_sections_in_order() {
    let store = store().await;
    let created = store
        .create(new_idea("Bike repair shop downtown"))
        .await
        .expect("create should succeed");

    let fetched = store.get(&created.id).await.expect("get should succeed");
    assert_eq!(fetched.sections, created.sections);
    assert_eq!(fetched.sections[0].name, "Hero");
    assert_eq!(fetched.idea, "Bike repair shop downtown");
}

#[tokio::test]
async fn list_is_newest_first() {
    let store = store().await;
    let first = store
        .create(new_idea("First idea for a site"))
        .await
        .expect("create first");
    let second = store
        .create(new_idea("Second idea for a site"))
        .await
        .expect("create second");

    let ids: Vec<String> = store
        .list()
        .await
        .expect("list should succeed")
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let store = store().await;
    let mut new = new_idea("Pottery studio classes");
    new.status = IdeaStatus::Pending;
    new.user_id = Some("user-7".to_owned());
    let created = store.create(new).await.expect("create");

    let updated = store
        .update(
            &created.id,
            IdeaUpdate {
                status: Some(IdeaStatus::Completed),
                ..IdeaUpdate::default()
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.status, IdeaStatus::Completed);
    assert_eq!(updated.idea, "Pottery studio classes");
    assert_eq!(updated.user_id, "user-7");
    assert_eq!(updated.sections, created.sections);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = store.get(&created.id).await.expect("get");
    assert_eq!(fetched.status, IdeaStatus::Completed);
}

#[tokio::test]
async fn missing_ids_report_not_found() {
    let store = store().await;
    assert!(matches!(store.get("nope").await, Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.update("nope", IdeaUpdate::default()).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_record() {
    let store = store().await;
    let created = store
        .create(new_idea("Vintage record store"))
        .await
        .expect("create");

    store.delete(&created.id).await.expect("delete should succeed");
    assert!(store.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn open_creates_database_file_and_persists() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("nested").join("sitesmith.db");

    let id = {
        let store = IdeaStore::open(&path).await.expect("open should succeed");
        store
            .create(new_idea("Mountain cabin rentals"))
            .await
            .expect("create")
            .id
    };
    assert!(path.exists());

    let reopened = IdeaStore::open(&path).await.expect("reopen should succeed");
    let fetched = reopened.get(&id).await.expect("record should persist");
    assert_eq!(fetched.idea, "Mountain cabin rentals");
}

#[test]
fn status_parse_rejects_unknown_values() {
    assert_eq!(
        IdeaStatus::parse("completed").expect("known status"),
        IdeaStatus::Completed
    );
    assert!(matches!(
        IdeaStatus::parse("archived"),
        Err(StoreError::InvalidValue { field: "status", .. })
    ));
}

#[tokio::test]
async fn concurrent_updates_on_disk_keep_both_changes() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let store = IdeaStore::open(&tmp.path().join("sitesmith.db"))
        .await
        .expect("open should succeed");
    let mut new = new_idea("Harbor kayak tours");
    new.status = IdeaStatus::Pending;
    let created = store.create(new).await.expect("create");

    for round in 0..10 {
        let rename = IdeaUpdate {
            idea: Some(format!("Harbor kayak tours, season {round}")),
            ..IdeaUpdate::default()
        };
        let resection = IdeaUpdate {
            sections: Some(vec![section(&format!("Hero {round}"), 1)]),
            ..IdeaUpdate::default()
        };
        let (a, b) = tokio::join!(
            store.update(&created.id, rename),
            store.update(&created.id, resection)
        );
        a.expect("rename should succeed");
        b.expect("section swap should succeed");

        let fetched = store.get(&created.id).await.expect("get");
        assert_eq!(fetched.idea, format!("Harbor kayak tours, season {round}"));
        assert_eq!(fetched.sections[0].name, format!("Hero {round}"));
        assert_eq!(fetched.status, IdeaStatus::Pending);
    }
}

#[tokio::test]
async fn update_leaves_record_untouched_when_missing() {
    let store = store().await;
    let created = store
        .create(new_idea("Rooftop cinema nights"))
        .await
        .expect("create");

    let result = store
        .update(
            "missing",
            IdeaUpdate {
                idea: Some("Changed idea text".to_owned()),
                ..IdeaUpdate::default()
            },
        )
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(
        store.get(&created.id).await.expect("get").idea,
        "Rooftop cinema nights"
    );
}
