use super::*;
use crate::domain::models::crawl_task::CANCELLED_MESSAGE;
use crate::domain::services::dispatch_service::DispatchReceipt;
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::*;
use std::collections::BTreeMap;

mock! {
    pub TaskRepo {}
    #[async_trait]
    impl CrawlTaskRepository for TaskRepo {
        async fn create(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlTask>, RepositoryError>;
        async fn update(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
        async fn query(&self, query: &CrawlTaskQuery) -> Result<(Vec<CrawlTask>, u64), RepositoryError>;
        async fn count_by_status(&self) -> Result<BTreeMap<TaskStatus, u64>, RepositoryError>;
    }
}

mock! {
    pub Dispatcher {}
    #[async_trait]
    impl CrawlDispatcher for Dispatcher {
        async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
    }
}

fn pending_task() -> CrawlTask {
    CrawlTask::new("咖啡".to_string(), "手冲咖啡".to_string(), 100, 1)
}

fn repo_returning(task: CrawlTask) -> MockTaskRepo {
    let mut repo = MockTaskRepo::new();
    repo.expect_find_by_id()
        .with(eq(task.id))
        .returning(move |_| Ok(Some(task.clone())));
    repo
}

#[tokio::test]
async fn test_cancel_pending_task_marks_failed() {
    let task = pending_task();
    let id = task.id;
    let mut repo = repo_returning(task);
    repo.expect_update()
        .withf(|t| t.status == TaskStatus::Failed)
        .returning(|t| Ok(t.clone()));

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(MockDispatcher::new()), None);
    let cancelled = use_case.cancel(id).await.unwrap();

    assert_eq!(cancelled.status, TaskStatus::Failed);
    assert_eq!(cancelled.error_message.as_deref(), Some(CANCELLED_MESSAGE));
}

#[tokio::test]
async fn test_cancel_completed_task_conflicts() {
    let mut task = pending_task();
    task.complete().unwrap();
    let id = task.id;
    let mut repo = repo_returning(task);
    repo.expect_update().never();

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(MockDispatcher::new()), None);
    let err = use_case.cancel(id).await.unwrap_err();

    assert!(matches!(err, TaskUseCaseError::Conflict(_)));
}

#[tokio::test]
async fn test_trigger_success_marks_running() {
    let mut task = pending_task();
    task.webhook_url = Some("https://hooks.example.com/api/webhook/xhs-result".to_string());
    let id = task.id;
    let mut repo = repo_returning(task);
    repo.expect_update()
        .withf(|t| t.status == TaskStatus::Running && t.started_at.is_some())
        .times(1)
        .returning(|t| Ok(t.clone()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(move |r| r.task_id == id && r.query == "手冲咖啡" && r.num == 100)
        .returning(|_| {
            Ok(DispatchReceipt {
                run_url: "https://github.com/o/r/actions".to_string(),
            })
        });

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(dispatcher), None);
    let response = use_case.trigger(id).await.unwrap();

    assert!(response.success);
    assert_eq!(response.task_id, Some(id.to_string()));
    assert_eq!(
        response.github_run_url.as_deref(),
        Some("https://github.com/o/r/actions")
    );
}

#[tokio::test]
async fn test_trigger_uses_default_webhook_url() {
    let task = pending_task();
    let id = task.id;
    let mut repo = repo_returning(task);
    repo.expect_update().returning(|t| Ok(t.clone()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|r| r.webhook_url == "https://public.example.com/api/webhook/xhs-result")
        .returning(|_| {
            Ok(DispatchReceipt {
                run_url: String::new(),
            })
        });

    let use_case = TaskUseCase::new(
        Arc::new(repo),
        Arc::new(dispatcher),
        Some("https://public.example.com/api/webhook/xhs-result".to_string()),
    );
    assert!(use_case.trigger(id).await.is_ok());
}

#[tokio::test]
async fn test_trigger_failure_records_error() {
    let mut task = pending_task();
    task.webhook_url = Some("https://hooks.example.com/cb".to_string());
    let id = task.id;
    let mut repo = repo_returning(task);
    repo.expect_update()
        .withf(|t| {
            t.status == TaskStatus::Failed
                && t.error_message.as_deref().unwrap_or("").contains("401")
        })
        .times(1)
        .returning(|t| Ok(t.clone()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_dispatch().returning(|_| {
        Err(DispatchError::Rejected {
            status: 401,
            body: "Bad credentials".to_string(),
        })
    });

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(dispatcher), None);
    let err = use_case.trigger(id).await.unwrap_err();

    assert!(matches!(
        err,
        TaskUseCaseError::Dispatch(DispatchError::Rejected { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_trigger_running_task_conflicts() {
    let mut task = pending_task();
    task.start(None).unwrap();
    let id = task.id;
    let repo = repo_returning(task);

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_dispatch().never();

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(dispatcher), None);
    let err = use_case.trigger(id).await.unwrap_err();

    assert!(matches!(err, TaskUseCaseError::Conflict(_)));
}

#[tokio::test]
async fn test_trigger_crawl_validates_target_count() {
    let mut repo = MockTaskRepo::new();
    repo.expect_create().never();

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(MockDispatcher::new()), None);
    let err = use_case
        .trigger_crawl(TriggerCrawlDto {
            task_name: "t".to_string(),
            keyword: "k".to_string(),
            target_count: 501,
            sort_type: 1,
            cookies: None,
            webhook_url: "https://example.com/cb".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TaskUseCaseError::ValidationError(_)));
}

#[tokio::test]
async fn test_list_pages_and_stats() {
    let mut repo = MockTaskRepo::new();
    repo.expect_query()
        .withf(|q| q.limit == 5 && q.offset == 10 && q.status == Some(TaskStatus::Running))
        .returning(|_| Ok((vec![pending_task()], 11)));
    repo.expect_count_by_status().returning(|| {
        Ok(BTreeMap::from([
            (TaskStatus::Pending, 2),
            (TaskStatus::Running, 1),
            (TaskStatus::Completed, 4),
            (TaskStatus::Failed, 0),
        ]))
    });

    let use_case = TaskUseCase::new(Arc::new(repo), Arc::new(MockDispatcher::new()), None);
    let page = use_case
        .list(TaskListParams {
            page: Some(3),
            size: Some(5),
            status: Some(TaskStatus::Running),
            keyword: None,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 11);
    assert_eq!(page.page, 3);

    let stats = use_case.stats().await.unwrap();
    assert_eq!(stats.total_tasks, 7);
    assert_eq!(stats.completed_tasks, 4);
}
