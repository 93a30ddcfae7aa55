use super::*;
use crate::domain::repositories::keyword_repository::KeywordStats;
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::*;
use std::collections::BTreeMap;

mock! {
    pub KeywordRepo {}
    #[async_trait]
    impl KeywordRepository for KeywordRepo {
        async fn create(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Keyword>, RepositoryError>;
        async fn find_by_text(&self, text: &str) -> Result<Option<Keyword>, RepositoryError>;
        async fn update(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError>;
        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
        async fn list(&self, query: &KeywordQuery) -> Result<(Vec<Keyword>, u64), RepositoryError>;
        async fn categories(&self) -> Result<Vec<String>, RepositoryError>;
        async fn find_active(&self) -> Result<Vec<Keyword>, RepositoryError>;
        async fn stats(&self) -> Result<KeywordStats, RepositoryError>;
    }
}

fn create_dto(text: &str, weight: i32) -> KeywordCreateDto {
    KeywordCreateDto {
        keyword: text.to_string(),
        category: Some("价格".to_string()),
        weight,
        is_active: true,
        description: None,
    }
}

#[tokio::test]
async fn test_create_rejects_out_of_range_weight() {
    let mut repo = MockKeywordRepo::new();
    repo.expect_create().never();

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let err = use_case.create(create_dto("多少钱", 11)).await.unwrap_err();

    assert!(matches!(err, KeywordUseCaseError::ValidationError(_)));
}

#[tokio::test]
async fn test_create_maps_duplicate() {
    let mut repo = MockKeywordRepo::new();
    repo.expect_create()
        .returning(|_| Err(RepositoryError::AlreadyExists("Keyword".to_string())));

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let err = use_case.create(create_dto("多少钱", 3)).await.unwrap_err();

    assert!(matches!(err, KeywordUseCaseError::Duplicate(text) if text == "多少钱"));
}

#[tokio::test]
async fn test_toggle_flips_active_flag() {
    let keyword = Keyword::new("链接".to_string(), None, 2, None);
    let id = keyword.id;

    let mut repo = MockKeywordRepo::new();
    let stored = keyword.clone();
    repo.expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update()
        .withf(|k| !k.is_active)
        .returning(|k| Ok(k.clone()));

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let toggled = use_case.toggle(id).await.unwrap();

    assert!(!toggled.is_active);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let keyword = Keyword::new("链接".to_string(), Some("购买".to_string()), 2, None);
    let id = keyword.id;

    let mut repo = MockKeywordRepo::new();
    let stored = keyword.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update().returning(|k| Ok(k.clone()));

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let updated = use_case
        .update(
            id,
            KeywordUpdateDto {
                weight: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.weight, 7);
    assert_eq!(updated.keyword, "链接");
    assert_eq!(updated.category.as_deref(), Some("购买"));
}

#[tokio::test]
async fn test_update_missing_keyword_is_not_found() {
    let mut repo = MockKeywordRepo::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let err = use_case
        .update(Uuid::new_v4(), KeywordUpdateDto::default())
        .await
        .unwrap_err();

    assert!(matches!(err, KeywordUseCaseError::NotFound));
}

#[tokio::test]
async fn test_stats_reports_inactive() {
    let mut repo = MockKeywordRepo::new();
    repo.expect_stats().returning(|| {
        Ok(KeywordStats {
            total: 5,
            active: 3,
            category_stats: BTreeMap::new(),
            weight_stats: BTreeMap::from([(3, 5)]),
        })
    });

    let use_case = KeywordUseCase::new(Arc::new(repo));
    let stats = use_case.stats().await.unwrap();

    assert_eq!(stats.inactive, 2);
    assert_eq!(stats.weight_stats.get(&3), Some(&5));
}
