use chrono::{DateTime, Utc};

use crate::ArcStr;
use crate::repository::{AppSettings, ArticleData, ArticlePersonalInfo, ContentBlock};

use super::search;

/// Everything the article screen renders.
///
/// The state is an immutable value: every change produces a new state that
/// replaces the previous one. Sources only ever overlay the fields they own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleState {
    pub is_auth: bool,
    pub is_loading_content: bool,
    pub is_loading_reviewers: bool,
    pub is_like: bool,
    pub is_bookmark: bool,
    pub is_show_menu: bool,
    pub is_big_text: bool,
    pub is_dark_mode: bool,
    pub is_search: bool,
    pub search_query: Option<String>,
    /// Character ranges `[start, end)` of every match, in reading order
    pub search_results: Vec<(usize, usize)>,
    /// Index into `search_results` of the highlighted match
    pub search_position: usize,
    pub share_link: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub category_icon: Option<String>,
    /// Publication date, already formatted for display
    pub date: Option<String>,
    pub author: Option<String>,
    pub poster: Option<String>,
    pub content: Vec<ContentBlock>,
    pub reviewers: Vec<ArcStr>,
}

impl Default for ArticleState {
    fn default() -> Self {
        Self {
            is_auth: false,
            is_loading_content: true,
            is_loading_reviewers: true,
            is_like: false,
            is_bookmark: false,
            is_show_menu: false,
            is_big_text: false,
            is_dark_mode: false,
            is_search: false,
            search_query: None,
            search_results: Vec::new(),
            search_position: 0,
            share_link: None,
            title: None,
            category: None,
            category_icon: None,
            date: None,
            author: None,
            poster: None,
            content: Vec::new(),
            reviewers: Vec::new(),
        }
    }
}

impl ArticleState {
    /// Projection sent back to the personal info store.
    pub fn personal_info(&self) -> ArticlePersonalInfo {
        ArticlePersonalInfo {
            is_like: self.is_like,
            is_bookmark: self.is_bookmark,
        }
    }

    /// Projection sent back to the settings store.
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            is_dark_mode: self.is_dark_mode,
            is_big_text: self.is_big_text,
        }
    }
}

/// A user intent. Also used as the callback carried by notifications, which
/// the view hands back to [`super::ArticleScreen::perform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Like,
    /// Flips the like back without notifying again
    UndoLike,
    Bookmark,
    Share,
    ToggleMenu,
    NightMode,
    UpText,
    DownText,
    SearchMode(bool),
    Search(Option<String>),
    SearchNext,
    SearchPrev,
}

/// One-shot message for the view. Never stored in [`ArticleState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notify {
    /// Informational message
    Text { message: String },
    /// Message with a button that performs `action`
    Action {
        message: String,
        label: String,
        action: Intent,
    },
    /// Failure with an acknowledgement button and, when the operation can be
    /// attempted again, the intent to retry
    Error {
        message: String,
        label: String,
        retry: Option<Intent>,
    },
}

impl Notify {
    pub fn message(&self) -> &str {
        match self {
            Self::Text { message } | Self::Action { message, .. } | Self::Error { message, .. } => {
                message
            }
        }
    }
}

/// Formats a publication date the way the screen displays it.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%H:%M:%S %d.%m.%y").to_string()
}

pub fn merge_article(
    article: Option<&ArticleData>,
    state: &ArticleState,
) -> Option<ArticleState> {
    let article = article?;
    Some(ArticleState {
        share_link: Some(article.share_link.clone()),
        title: Some(article.title.clone()),
        category: Some(article.category.clone()),
        category_icon: article.category_icon.clone(),
        date: Some(format_date(&article.date)),
        ..state.clone()
    })
}

/// Also refreshes the search results, since they are offsets into the content.
pub fn merge_content(
    content: Option<&Vec<ContentBlock>>,
    state: &ArticleState,
) -> Option<ArticleState> {
    let content = content?;
    let next = ArticleState {
        is_loading_content: false,
        content: content.clone(),
        ..state.clone()
    };
    Some(search::refresh(next))
}

pub fn merge_personal_info(
    info: Option<&ArticlePersonalInfo>,
    state: &ArticleState,
) -> Option<ArticleState> {
    let info = info?;
    Some(ArticleState {
        is_bookmark: info.is_bookmark,
        is_like: info.is_like,
        ..state.clone()
    })
}

pub fn merge_settings(
    settings: Option<&AppSettings>,
    state: &ArticleState,
) -> Option<ArticleState> {
    let settings = settings?;
    Some(ArticleState {
        is_dark_mode: settings.is_dark_mode,
        is_big_text: settings.is_big_text,
        ..state.clone()
    })
}
