use std::{collections::HashMap, time::Duration};

use chrono::{TimeZone, Utc};
use tokio::{
    sync::{broadcast::error::TryRecvError, watch},
    time::timeout,
};

use super::*;
use crate::fs::Fs;
use crate::log::LogLevel;
use crate::arc_path;
use crate::repository::{
    AppSettings, ArticleData, ArticlePersonalInfo, Catalog, ContentBlock, Latency,
    MockData as RepositoryData,
};

const TIMEOUT: Duration = Duration::from_secs(2);

fn article(id: &str) -> ArticleData {
    ArticleData {
        id: id.to_string(),
        title: "Borrowing".to_string(),
        share_link: format!("https://example.org/{id}"),
        category: "Rust".to_string(),
        category_icon: Some("logo_rust".to_string()),
        date: Utc.with_ymd_and_hms(2020, 1, 15, 18, 30, 0).unwrap(),
        author: Some("Author".to_string()),
        poster: None,
    }
}

fn paragraph(text: &str) -> ContentBlock {
    ContentBlock::Paragraph {
        text: text.to_string(),
    }
}

fn seeded() -> RepositoryData {
    RepositoryData {
        articles: HashMap::from([("0".to_string(), article("0"))]),
        contents: HashMap::from([(
            "0".to_string(),
            vec![paragraph("Rust is fast"), paragraph("rust is safe")],
        )]),
        ..Default::default()
    }
}

async fn open(repository: &Repository) -> (ArticleScreen, watch::Receiver<ArticleState>) {
    let screen = ArticleScreen::spawn(ArcStr::from("0"), repository.clone(), Log::mock()).await;
    let state = screen.state().await;
    (screen, state)
}

async fn wait_for<F>(state: &mut watch::Receiver<ArticleState>, f: F) -> ArticleState
where
    F: FnMut(&ArticleState) -> bool,
{
    timeout(TIMEOUT, state.wait_for(f))
        .await
        .expect("State did not reach the expected value")
        .unwrap()
        .clone()
}

#[tokio::test]
async fn test_initial_state_from_seeded_sources() {
    let repository = Repository::mock(seeded());
    let (_screen, mut state) = open(&repository).await;

    let state = wait_for(&mut state, |s| !s.is_loading_content && s.title.is_some()).await;
    assert_eq!(state.title.as_deref(), Some("Borrowing"));
    assert_eq!(state.share_link.as_deref(), Some("https://example.org/0"));
    assert_eq!(state.category_icon.as_deref(), Some("logo_rust"));
    assert_eq!(state.date.as_deref(), Some("18:30:00 15.01.20"));
    assert_eq!(state.content.len(), 2);
    assert!(state.is_loading_reviewers);
    // Author and poster are not taken from the metadata
    assert_eq!(state.author, None);
}

#[tokio::test]
async fn test_sources_overlay_without_resetting() {
    let repository = Repository::mock(RepositoryData::default());
    let mock = repository.as_mock().unwrap().clone();
    let (screen, mut state) = open(&repository).await;
    assert_eq!(screen.current().await, ArticleState::default());

    mock.emit_content(ArcStr::from("0"), Some(vec![paragraph("text")]))
        .await;
    let after_content = wait_for(&mut state, |s| !s.is_loading_content).await;
    assert_eq!(after_content.title, None);

    mock.emit_article(ArcStr::from("0"), Some(article("0"))).await;
    let after_article = wait_for(&mut state, |s| s.title.is_some()).await;
    assert_eq!(after_article.content, vec![paragraph("text")]);
    assert!(!after_article.is_loading_content);

    mock.emit_personal_info(
        ArcStr::from("0"),
        Some(ArticlePersonalInfo {
            is_like: true,
            is_bookmark: true,
        }),
    )
    .await;
    let after_info = wait_for(&mut state, |s| s.is_like).await;
    assert!(after_info.is_bookmark);
    assert_eq!(after_info.title, after_article.title);

    // Absent emissions leave the state alone
    mock.emit_article(ArcStr::from("0"), None).await;
    mock.emit_content(ArcStr::from("0"), None).await;
    mock.emit_settings(Some(AppSettings {
        is_dark_mode: true,
        is_big_text: false,
    }))
    .await;
    let after_settings = wait_for(&mut state, |s| s.is_dark_mode).await;
    assert_eq!(after_settings.title.as_deref(), Some("Borrowing"));
    assert_eq!(after_settings.content, vec![paragraph("text")]);
    assert!(after_settings.is_like);
}

#[tokio::test]
async fn test_like_then_undo() {
    let repository = Repository::mock(seeded());
    let (screen, _state) = open(&repository).await;
    let mut notifications = screen.notifications().await;

    screen.handle_like().await;
    assert!(screen.current().await.is_like);
    assert_eq!(
        notifications.try_recv().unwrap(),
        Notify::Text {
            message: "Mark is liked".to_string()
        }
    );

    screen.handle_like().await;
    assert!(!screen.current().await.is_like);
    let notify = notifications.try_recv().unwrap();
    let Notify::Action {
        message,
        label,
        action,
    } = notify
    else {
        panic!("Expected an action notification, got {notify:?}");
    };
    assert_eq!(message, "Don't like it anymore");
    assert_eq!(label, "No, still like it");

    screen.perform(action).await;
    assert!(screen.current().await.is_like);
    assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));

    let updates = repository.as_mock().unwrap().get_data().await.personal_info_updates;
    let likes: Vec<bool> = updates.iter().map(|(_, info)| info.is_like).collect();
    assert_eq!(likes, vec![true, false, true]);
    assert!(updates.iter().all(|(id, _)| id == "0"));
}

#[tokio::test]
async fn test_bookmark_is_silent() {
    let repository = Repository::mock(seeded());
    let (screen, mut state) = open(&repository).await;
    let before = wait_for(&mut state, |s| !s.is_loading_content).await;
    let mut notifications = screen.notifications().await;

    screen.handle_bookmark().await;
    let after = screen.current().await;
    assert!(after.is_bookmark);
    assert_eq!(
        after,
        ArticleState {
            is_bookmark: true,
            ..before
        }
    );
    assert_eq!(notifications.try_recv(), Err(TryRecvError::Empty));

    screen.handle_bookmark().await;
    assert!(!screen.current().await.is_bookmark);
}

#[tokio::test]
async fn test_share_is_not_implemented() {
    let repository = Repository::mock(seeded());
    let (screen, mut state) = open(&repository).await;
    let before = wait_for(&mut state, |s| !s.is_loading_content).await;
    let mut notifications = screen.notifications().await;

    screen.handle_share().await;
    assert_eq!(
        notifications.try_recv().unwrap(),
        Notify::Error {
            message: "Share is not implemented".to_string(),
            label: "OK".to_string(),
            retry: None,
        }
    );
    assert_eq!(screen.current().await, before);
}

#[tokio::test]
async fn test_toggle_menu() {
    let repository = Repository::mock(seeded());
    let (screen, _state) = open(&repository).await;

    screen.handle_toggle_menu().await;
    assert!(screen.current().await.is_show_menu);
    screen.handle_toggle_menu().await;
    assert!(!screen.current().await.is_show_menu);
}

#[tokio::test]
async fn test_night_mode_reaches_every_screen() {
    let repository = Repository::mock(seeded());
    let (first, _) = open(&repository).await;
    let (_second, mut second_state) = open(&repository).await;

    first.handle_night_mode().await;
    assert!(first.current().await.is_dark_mode);
    wait_for(&mut second_state, |s| s.is_dark_mode).await;

    first.handle_night_mode().await;
    wait_for(&mut second_state, |s| !s.is_dark_mode).await;

    let updates = repository.as_mock().unwrap().get_data().await.settings_updates;
    assert_eq!(updates.len(), 2);
}

#[tokio::test]
async fn test_text_size_is_idempotent() {
    let repository = Repository::mock(seeded());
    let (screen, _state) = open(&repository).await;

    screen.handle_up_text().await;
    screen.handle_up_text().await;
    assert!(screen.current().await.is_big_text);

    screen.handle_down_text().await;
    assert!(!screen.current().await.is_big_text);
    screen.handle_down_text().await;
    assert!(!screen.current().await.is_big_text);

    let updates = repository.as_mock().unwrap().get_data().await.settings_updates;
    let sizes: Vec<bool> = updates.iter().map(|s| s.is_big_text).collect();
    assert_eq!(sizes, vec![true, true, false, false]);
    assert!(updates.iter().all(|s| !s.is_dark_mode));
}

#[tokio::test]
async fn test_failed_update_offers_retry() {
    let repository = Repository::mock(seeded());
    let mock = repository.as_mock().unwrap().clone();
    let log = Log::mock();
    let screen = ArticleScreen::spawn(ArcStr::from("0"), repository.clone(), log.clone()).await;
    let mut notifications = screen.notifications().await;
    mock.set_fail_updates(true).await;

    screen.handle_like().await;
    assert!(!screen.current().await.is_like);
    let notify = notifications.try_recv().unwrap();
    let Notify::Error { retry, label, .. } = notify else {
        panic!("Expected an error notification, got {notify:?}");
    };
    assert_eq!(label, "OK");
    assert_eq!(retry, Some(Intent::Like));

    screen.handle_night_mode().await;
    assert!(!screen.current().await.is_dark_mode);
    assert!(matches!(
        notifications.try_recv().unwrap(),
        Notify::Error {
            retry: Some(Intent::NightMode),
            ..
        }
    ));

    let messages = log.get_messages().await.unwrap();
    assert!(
        messages
            .iter()
            .any(|m| m.level == LogLevel::Warning && m.message.contains("Like"))
    );

    mock.set_fail_updates(false).await;
    screen.perform(retry.unwrap()).await;
    assert!(screen.current().await.is_like);
}

#[tokio::test]
async fn test_search_through_screen() {
    let repository = Repository::mock(seeded());
    let mock = repository.as_mock().unwrap().clone();
    let (screen, mut state) = open(&repository).await;
    wait_for(&mut state, |s| !s.is_loading_content).await;

    screen.handle_search(Some("rust".to_string())).await;
    assert_eq!(screen.current().await.search_query, None);

    screen.handle_search_mode(true).await;
    let current = screen.current().await;
    assert!(current.is_search);
    assert_eq!(current.search_query.as_deref(), Some(""));

    screen.handle_search(Some("RUST".to_string())).await;
    let current = screen.current().await;
    assert_eq!(current.search_results, vec![(0, 4), (13, 17)]);
    assert_eq!(current.search_position, 0);

    screen.handle_search_next().await;
    assert_eq!(screen.current().await.search_position, 1);
    screen.handle_search_next().await;
    assert_eq!(screen.current().await.search_position, 1);
    screen.handle_search_prev().await;
    assert_eq!(screen.current().await.search_position, 0);

    screen.handle_search(None).await;
    let cleared = screen.current().await;
    assert!(cleared.is_search);
    assert_eq!(cleared.search_query.as_deref(), Some(""));
    assert!(cleared.search_results.is_empty());
    screen.handle_search(Some("RUST".to_string())).await;

    mock.emit_content(ArcStr::from("0"), Some(vec![paragraph("no match")]))
        .await;
    let refreshed = wait_for(&mut state, |s| s.content.len() == 1).await;
    assert!(refreshed.search_results.is_empty());

    screen.handle_search_mode(false).await;
    let current = screen.current().await;
    assert!(!current.is_search);
    assert_eq!(current.search_query, None);
    assert!(current.search_results.is_empty());
    assert_eq!(current.search_position, 0);
}

#[tokio::test]
async fn test_close_stops_the_screen() {
    let repository = Repository::mock(seeded());
    let (screen, mut state) = open(&repository).await;

    screen.close().await;
    let changed = timeout(TIMEOUT, state.changed()).await.unwrap();
    assert!(changed.is_err());

    // Closing twice is harmless
    screen.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_close_then_flush_keeps_closing_record() {
    for round in 0..100 {
        let fs = Fs::mock();
        let log_dir = arc_path("/logs");
        let log = Log::spawn(fs.clone(), LogLevel::Error, 0, log_dir.clone())
            .await
            .unwrap();
        let repository = Repository::mock(seeded());

        let (screen, handle) =
            core::Core::build(ArcStr::from("0"), repository, log.clone())
                .await
                .spawn();
        screen.close().await;
        log.flush().await;

        timeout(TIMEOUT, handle)
            .await
            .unwrap()
            .unwrap_or_else(|err| panic!("Screen task failed in round {round}: {err}"));
        let latest = fs
            .read_to_string(arc_path(log_dir.join("latest.log")))
            .await
            .unwrap();
        assert!(
            latest.contains("Closed screen of article '0'"),
            "Missing closing record in round {round}"
        );
    }
}

#[tokio::test]
async fn test_actual_repository_end_to_end() {
    let repository = Repository::spawn(
        Catalog::sample().unwrap(),
        Latency::from_millis(5, 10),
        Log::mock(),
    );
    let (screen, mut state) = open(&repository).await;
    assert!(screen.current().await.title.is_none());

    let loaded = wait_for(&mut state, |s| s.title.is_some() && !s.is_loading_content).await;
    assert_eq!(loaded.title.as_deref(), Some("CoordinatorLayout Basic"));
    assert_eq!(loaded.date.as_deref(), Some("18:30:00 15.01.20"));
    assert_eq!(loaded.content.len(), 5);

    screen.handle_like().await;
    screen.handle_night_mode().await;
    screen.close().await;

    let (reopened, mut state) = open(&repository).await;
    let state = wait_for(&mut state, |s| s.is_like && s.is_dark_mode).await;
    assert!(!state.is_bookmark);
    reopened.close().await;
}

#[tokio::test]
async fn test_actual_repository_unknown_article() {
    let repository = Repository::spawn(Catalog::sample().unwrap(), Latency::default(), Log::mock());
    let screen =
        ArticleScreen::spawn(ArcStr::from("missing"), repository, Log::mock()).await;
    let mut notifications = screen.notifications().await;

    screen.handle_like().await;
    assert!(!screen.current().await.is_like);
    assert!(matches!(
        notifications.try_recv().unwrap(),
        Notify::Error {
            retry: Some(Intent::Like),
            ..
        }
    ));
}

#[tokio::test]
async fn test_mock_records_intents() {
    let screen = ArticleScreen::mock(MockData::default());
    let mock = screen.as_mock().unwrap().clone();
    let mut state = screen.state().await;

    screen.handle_like().await;
    screen.handle_search(Some("query".to_string())).await;
    assert_eq!(
        mock.get_data().await.intents,
        vec![Intent::Like, Intent::Search(Some("query".to_string()))]
    );

    mock.set_state(ArticleState {
        is_like: true,
        ..Default::default()
    })
    .await;
    wait_for(&mut state, |s| s.is_like).await;

    screen.close().await;
    assert!(mock.get_data().await.closed);
}
