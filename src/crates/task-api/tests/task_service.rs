//! Task service integration tests
//!
//! Drives `TaskService` over the in-memory repository.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use task_api::db::{InMemoryTaskRepository, TaskRepository};
use task_api::model::{Priority, TaskStatus};
use task_api::service::{
    CreateTaskRequest, TaskListQuery, TaskService, TaskServiceError, UpdateTaskRequest,
};

fn setup() -> (TaskService, Arc<InMemoryTaskRepository>) {
    let repo = Arc::new(InMemoryTaskRepository::new());
    let service = TaskService::new(repo.clone());
    (service, repo)
}

fn request(title: &str, status: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        status: Some(status.to_string()),
        ..CreateTaskRequest::titled(title)
    }
}

#[tokio::test]
async fn test_create_assigns_fresh_ids() {
    let (service, _) = setup();

    let first = service.create(CreateTaskRequest::titled("One")).await.unwrap();
    let second = service.create(CreateTaskRequest::titled("Two")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.created_at, first.updated_at);
    assert_eq!(second.created_at, second.updated_at);
}

#[tokio::test]
async fn test_get_after_create_matches() {
    let (service, _) = setup();
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let created = service
        .create(CreateTaskRequest {
            description: Some("Quarterly numbers".to_string()),
            priority: Some("high".to_string()),
            assignee_email: Some("alice@example.com".to_string()),
            tags: Some(vec!["finance".to_string(), " q2 ".to_string()]),
            due_date: Some(due),
            ..CreateTaskRequest::titled("Prepare report")
        })
        .await
        .unwrap();

    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.priority, Priority::High);
    assert!(fetched.tags.contains("q2"));
    assert_eq!(fetched.due_date, Some(due));
}

#[tokio::test]
async fn test_write_spec_example() {
    let (service, _) = setup();

    let created = service.create(request("Write spec", "TODO")).await.unwrap();
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(created.priority, Priority::Medium);

    let updated = service
        .update(
            created.id,
            UpdateTaskRequest {
                status: Some("DONE".to_string()),
                ..UpdateTaskRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TaskStatus::Done);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.assignee_email, created.assignee_email);
    assert_eq!(updated.tags, created.tags);
    assert_eq!(updated.due_date, created.due_date);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_empty_update_only_touches_updated_at() {
    let (service, _) = setup();
    let created = service
        .create(CreateTaskRequest::titled("Idle"))
        .await
        .unwrap();

    let first = service
        .update(created.id, UpdateTaskRequest::default())
        .await
        .unwrap();
    let second = service
        .update(created.id, UpdateTaskRequest::default())
        .await
        .unwrap();

    assert!(first.updated_at > created.updated_at);
    assert!(second.updated_at > first.updated_at);

    let mut expected = created.clone();
    expected.updated_at = second.updated_at;
    assert_eq!(second, expected);
}

#[tokio::test]
async fn test_invalid_update_leaves_task_untouched() {
    let (service, _) = setup();
    let created = service
        .create(CreateTaskRequest::titled("Stable"))
        .await
        .unwrap();

    let err = service
        .update(
            created.id,
            UpdateTaskRequest {
                title: Some("Renamed".to_string()),
                status: Some("FINISHED".to_string()),
                ..UpdateTaskRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_validates_before_existence() {
    let (service, _) = setup();

    let err = service
        .update(
            404,
            UpdateTaskRequest {
                title: Some("   ".to_string()),
                ..UpdateTaskRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = service
        .update(404, UpdateTaskRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::NotFound(404)));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (service, repo) = setup();
    let created = service
        .create(CreateTaskRequest::titled("Short lived"))
        .await
        .unwrap();

    service.delete(created.id).await.unwrap();

    assert!(service.get_by_id(created.id).await.unwrap_err().is_not_found());
    assert!(service.delete(created.id).await.unwrap_err().is_not_found());
    assert!(!repo.exists_by_id(created.id).await.unwrap());
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let (service, _) = setup();
    let first = service.create(CreateTaskRequest::titled("a")).await.unwrap();
    service.delete(first.id).await.unwrap();

    let second = service.create(CreateTaskRequest::titled("b")).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_unknown_enum_on_create_stores_nothing() {
    let (service, repo) = setup();

    let err = service
        .create(request("Bad status", "ARCHIVED"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = service
        .create(CreateTaskRequest {
            priority: Some("CRITICAL".to_string()),
            ..CreateTaskRequest::titled("Bad priority")
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let (service, repo) = setup();

    let cases = vec![
        CreateTaskRequest::titled(""),
        CreateTaskRequest::titled("x".repeat(256)),
        CreateTaskRequest {
            description: Some("d".repeat(2001)),
            ..CreateTaskRequest::titled("Long description")
        },
        CreateTaskRequest {
            assignee_email: Some("not-an-email".to_string()),
            ..CreateTaskRequest::titled("Bad email")
        },
        CreateTaskRequest {
            tags: Some(vec!["  ".to_string()]),
            ..CreateTaskRequest::titled("Blank tag")
        },
    ];

    for req in cases {
        let err = service.create(req).await.unwrap_err();
        assert!(err.is_validation(), "expected validation error, got {err}");
    }
    assert_eq!(repo.count().await.unwrap(), 0);
}

fn utc(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

#[tokio::test]
async fn test_due_date_outside_four_digit_years_is_rejected() {
    let (service, repo) = setup();

    for due in [utc(10000, 1, 1), utc(-1, 12, 31)] {
        let err = service
            .create(CreateTaskRequest {
                due_date: Some(due),
                ..CreateTaskRequest::titled("Far off")
            })
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{due}");
    }
    assert_eq!(repo.count().await.unwrap(), 0);

    let created = service
        .create(CreateTaskRequest {
            due_date: Some(utc(9999, 12, 31)),
            ..CreateTaskRequest::titled("Last representable year")
        })
        .await
        .unwrap();

    let err = service
        .update(
            created.id,
            UpdateTaskRequest {
                due_date: Some(utc(10000, 1, 1)),
                ..UpdateTaskRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(service.get_by_id(created.id).await.unwrap(), created);

    let err = service
        .list_due_between(utc(2025, 1, 1), utc(10000, 1, 1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_list_by_status_for_every_status() {
    let (service, _) = setup();
    service.create(request("a", "TODO")).await.unwrap();
    service.create(request("b", "in_progress")).await.unwrap();
    service.create(request("c", "TODO")).await.unwrap();
    service.create(request("d", "DONE")).await.unwrap();

    for status in TaskStatus::ALL {
        let tasks = service.list_by_status(status.as_str()).await.unwrap();
        let expected = match status {
            TaskStatus::Todo => 2,
            TaskStatus::InProgress | TaskStatus::Done => 1,
            TaskStatus::Review | TaskStatus::Blocked => 0,
        };
        assert_eq!(tasks.len(), expected, "status {status}");
        assert!(tasks.iter().all(|t| t.status == status));
    }

    assert!(service.list_by_status("SHIPPED").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_list_by_priority_and_assignee() {
    let (service, _) = setup();
    service
        .create(CreateTaskRequest {
            priority: Some("URGENT".to_string()),
            assignee_email: Some("bob@example.com".to_string()),
            ..CreateTaskRequest::titled("Hotfix")
        })
        .await
        .unwrap();
    service
        .create(CreateTaskRequest::titled("Routine"))
        .await
        .unwrap();

    let urgent = service.list_by_priority("urgent").await.unwrap();
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].title, "Hotfix");

    let bobs = service.list_by_assignee("bob@example.com").await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(service.count_by_assignee("bob@example.com").await.unwrap(), 1);
    assert!(service.list_by_assignee("carol@example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_by_keyword() {
    let (service, _) = setup();
    service
        .create(CreateTaskRequest::titled("Fix LOGIN page"))
        .await
        .unwrap();
    service
        .create(CreateTaskRequest {
            description: Some("users cannot login".to_string()),
            ..CreateTaskRequest::titled("Support ticket")
        })
        .await
        .unwrap();
    service
        .create(CreateTaskRequest::titled("Unrelated"))
        .await
        .unwrap();

    let hits = service.search_by_keyword("Login").await.unwrap();
    assert_eq!(hits.len(), 2);

    assert!(service.search_by_keyword("  ").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_list_due_between_is_inclusive() {
    let (service, _) = setup();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    for (title, offset) in [("early", 0), ("middle", 5), ("late", 10)] {
        service
            .create(CreateTaskRequest {
                due_date: Some(base + Duration::days(offset)),
                ..CreateTaskRequest::titled(title)
            })
            .await
            .unwrap();
    }
    service
        .create(CreateTaskRequest::titled("undated"))
        .await
        .unwrap();

    let due = service
        .list_due_between(base, base + Duration::days(5))
        .await
        .unwrap();
    let titles: Vec<_> = due.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["early", "middle"]);

    let err = service
        .list_due_between(base + Duration::days(1), base)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_stats_include_every_status() {
    let (service, _) = setup();
    service.create(request("a", "BLOCKED")).await.unwrap();
    service.create(request("b", "BLOCKED")).await.unwrap();
    service.create(request("c", "REVIEW")).await.unwrap();

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_status.len(), TaskStatus::ALL.len());
    assert_eq!(stats.by_status[&TaskStatus::Blocked], 2);
    assert_eq!(stats.by_status[&TaskStatus::Review], 1);
    assert_eq!(stats.by_status[&TaskStatus::Todo], 0);
}

#[tokio::test]
async fn test_list_pages_with_filters() {
    let (service, _) = setup();
    for i in 0..5 {
        let priority = if i % 2 == 0 { "HIGH" } else { "LOW" };
        service
            .create(CreateTaskRequest {
                priority: Some(priority.to_string()),
                ..CreateTaskRequest::titled(format!("task {i}"))
            })
            .await
            .unwrap();
    }

    let page = service
        .list(TaskListQuery {
            page: Some(1),
            size: Some(2),
            priority: Some("HIGH".to_string()),
            ..TaskListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "task 4");

    let sorted = service
        .list(TaskListQuery {
            sort: Some("title,desc".to_string()),
            ..TaskListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(sorted.items[0].title, "task 4");

    for bad in [
        TaskListQuery {
            size: Some(0),
            ..TaskListQuery::default()
        },
        TaskListQuery {
            sort: Some("colour".to_string()),
            ..TaskListQuery::default()
        },
        TaskListQuery {
            status: Some("NOPE".to_string()),
            ..TaskListQuery::default()
        },
    ] {
        assert!(service.list(bad).await.unwrap_err().is_validation());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_updated_at_strictly_increases(updates in 1usize..6) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let (service, _) = setup();
            let created = service
                .create(CreateTaskRequest::titled("churn"))
                .await
                .unwrap();

            let mut previous = created.updated_at;
            for _ in 0..updates {
                let updated = service
                    .update(created.id, UpdateTaskRequest::default())
                    .await
                    .unwrap();
                prop_assert!(updated.updated_at > previous);
                prop_assert!(updated.updated_at >= updated.created_at);
                previous = updated.updated_at;
            }
            Ok(())
        })?;
    }
}
