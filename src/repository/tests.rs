use std::time::Duration;

use super::*;
use crate::log::Log;

const TIMEOUT: Duration = Duration::from_secs(2);

fn spawn_sample(latency: Latency) -> Repository {
    Repository::spawn(Catalog::sample().unwrap(), latency, Log::mock())
}

#[tokio::test]
async fn test_actual_remote_sources_start_absent_then_emit() {
    let repository = spawn_sample(Latency::from_millis(20, 40));

    let mut article = repository.get_article(ArcStr::from("0")).await;
    let mut content = repository.load_article_content(ArcStr::from("0")).await;
    assert!(article.borrow().is_none());
    assert!(content.borrow().is_none());

    tokio::time::timeout(TIMEOUT, article.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        article.borrow().clone().map(|a| a.title),
        Some("CoordinatorLayout Basic".to_string())
    );

    tokio::time::timeout(TIMEOUT, content.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(content.borrow().clone().map(|c| c.len()), Some(5));
}

#[tokio::test]
async fn test_actual_later_subscribers_get_loaded_value() {
    let repository = spawn_sample(Latency::default());
    let mut first = repository.get_article(ArcStr::from("1")).await;
    tokio::time::timeout(TIMEOUT, first.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();

    let second = repository.get_article(ArcStr::from("1")).await;
    assert!(second.borrow().is_some());
}

#[tokio::test]
async fn test_actual_unknown_article_stays_absent() {
    let log = Log::mock();
    let repository = Repository::spawn(Catalog::sample().unwrap(), Latency::default(), log.clone());

    let article = repository.get_article(ArcStr::from("missing")).await;
    let info = repository
        .load_article_personal_info(ArcStr::from("missing"))
        .await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(article.borrow().is_none());
    assert!(info.borrow().is_none());
    let messages = log.get_messages().await.unwrap();
    assert!(messages.iter().any(|m| m.message.contains("missing")));
}

#[tokio::test]
async fn test_actual_personal_info_defaults_and_updates() {
    let repository = spawn_sample(Latency::default());
    let mut info = repository.load_article_personal_info(ArcStr::from("0")).await;
    assert_eq!(*info.borrow(), Some(ArticlePersonalInfo::default()));

    let liked = ArticlePersonalInfo {
        is_like: true,
        is_bookmark: false,
    };
    repository
        .update_article_personal_info(ArcStr::from("0"), liked)
        .await
        .unwrap();

    assert!(info.has_changed().unwrap());
    assert_eq!(*info.borrow_and_update(), Some(liked));
}

#[tokio::test]
async fn test_actual_update_unknown_article_fails() {
    let repository = spawn_sample(Latency::default());
    let err = repository
        .update_article_personal_info(ArcStr::from("nope"), ArticlePersonalInfo::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::UnknownArticle("nope".into()))
    );
}

#[tokio::test]
async fn test_actual_settings_shared_between_subscribers() {
    let repository = spawn_sample(Latency::default());
    let mut first = repository.get_app_settings().await;
    let mut second = repository.clone().get_app_settings().await;
    assert_eq!(*first.borrow(), Some(AppSettings::default()));

    let dark = AppSettings {
        is_dark_mode: true,
        is_big_text: false,
    };
    repository.update_settings(dark).await.unwrap();

    assert_eq!(*first.borrow_and_update(), Some(dark));
    assert_eq!(*second.borrow_and_update(), Some(dark));
}

#[tokio::test]
async fn test_actual_articles_sorted() {
    let repository = spawn_sample(Latency::default());
    let ids: Vec<String> = repository
        .articles()
        .await
        .into_iter()
        .map(|article| article.id)
        .collect();
    assert_eq!(ids, vec!["0".to_string(), "1".to_string()]);
}

#[tokio::test]
async fn test_mock_records_updates_and_fails_on_demand() {
    let repository = Repository::mock(MockData::default());
    let mock = repository.as_mock().unwrap();

    let info = ArticlePersonalInfo {
        is_like: false,
        is_bookmark: true,
    };
    repository
        .update_article_personal_info(ArcStr::from("a"), info)
        .await
        .unwrap();

    mock.set_fail_updates(true).await;
    let err = repository
        .update_settings(AppSettings::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RepositoryError>(),
        Some(&RepositoryError::Unavailable)
    );

    let data = mock.get_data().await;
    assert_eq!(data.personal_info_updates, vec![("a".to_string(), info)]);
    assert!(data.settings_updates.is_empty());
}

#[tokio::test]
async fn test_mock_emissions_reach_subscribers() {
    let repository = Repository::mock(MockData::default());
    let mut content = repository.load_article_content(ArcStr::from("a")).await;
    assert!(content.borrow().is_none());

    let blocks = vec![ContentBlock::Paragraph { text: "a".into() }];
    repository
        .as_mock()
        .unwrap()
        .emit_content(ArcStr::from("a"), Some(blocks.clone()))
        .await;
    assert_eq!(*content.borrow_and_update(), Some(blocks));
}
