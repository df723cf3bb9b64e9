//! Transient in-app notices ("toasts").
//!
//! Notices are short messages shown over the pane strip and dropped after a
//! fixed lifetime. A notice carrying a key replaces any earlier notice with
//! the same key, so repeated title notices never stack up.

use chrono::{DateTime, Duration, Utc};

/// How long a notice stays visible.
pub const NOTICE_TTL_SECS: i64 = 4;

/// Upper bound on simultaneously queued notices.
const MAX_NOTICES: usize = 8;

/// Visual flavour of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Something could not be done
    Issue,
    /// An operation completed
    Success,
    /// The focused conversation changed; shows its number and title
    Title,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Replacement key, `None` for notices that may stack
    pub key: Option<String>,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn issue(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
            kind: NoticeKind::Issue,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn title(message: impl Into<String>) -> Self {
        Self {
            key: Some(FOCUSED_TITLE_KEY.to_string()),
            message: message.into(),
            kind: NoticeKind::Title,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Key shared by all title notices.
pub const FOCUSED_TITLE_KEY: &str = "focused-title";

#[derive(Debug, Clone)]
struct Posted {
    notice: Notice,
    posted_at: DateTime<Utc>,
}

/// Queue of visible notices, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    posted: Vec<Posted>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notice now.
    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Utc::now());
    }

    pub fn push_at(&mut self, notice: Notice, now: DateTime<Utc>) {
        if let Some(ref key) = notice.key {
            self.posted
                .retain(|posted| posted.notice.key.as_deref() != Some(key.as_str()));
        }
        tracing::debug!("Notice ({:?}): {}", notice.kind, notice.message);
        self.posted.push(Posted {
            notice,
            posted_at: now,
        });
        if self.posted.len() > MAX_NOTICES {
            self.posted.remove(0);
        }
    }

    /// Drop notices older than [`NOTICE_TTL_SECS`].
    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = Duration::seconds(NOTICE_TTL_SECS);
        self.posted.retain(|posted| now - posted.posted_at < ttl);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.posted.last().map(|posted| &posted.notice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.posted.iter().map(|posted| &posted.notice)
    }

    pub fn len(&self) -> usize {
        self.posted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posted.is_empty()
    }

    pub fn clear(&mut self) {
        self.posted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_notice_replaces_previous() {
        let mut board = NoticeBoard::new();
        board.push(Notice::title("#1 · First"));
        board.push(Notice::issue("No persona selected."));
        board.push(Notice::title("#2 · Second"));

        assert_eq!(board.len(), 2);
        assert_eq!(board.latest().unwrap().message, "#2 · Second");
        let titles: Vec<_> = board.iter().filter(|n| n.kind == NoticeKind::Title).collect();
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn test_unkeyed_notices_stack() {
        let mut board = NoticeBoard::new();
        board.push(Notice::issue("one"));
        board.push(Notice::issue("one"));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_expire_drops_old_notices() {
        let mut board = NoticeBoard::new();
        let start = Utc::now();
        board.push_at(Notice::success("File saved."), start);
        board.push_at(Notice::issue("late"), start + Duration::seconds(3));

        board.expire(start + Duration::seconds(NOTICE_TTL_SECS));
        assert_eq!(board.len(), 1);
        assert_eq!(board.latest().unwrap().message, "late");
    }

    #[test]
    fn test_board_is_bounded() {
        let mut board = NoticeBoard::new();
        for i in 0..20 {
            board.push(Notice::issue(format!("n{}", i)));
        }
        assert_eq!(board.len(), MAX_NOTICES);
        assert_eq!(board.latest().unwrap().message, "n19");
    }
}
