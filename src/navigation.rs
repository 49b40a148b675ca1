//! Single-page navigation detection.
//!
//! The host site swaps pages without reloading, so the watcher compares each
//! observed URL with the last one and reports what changed.

use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Same URL as last time.
    Unchanged,
    /// Moved to a watch page for `video_id`.
    Watch { video_id: String },
    /// Moved somewhere that is not a watch page.
    Other,
}

#[derive(Debug, Default)]
pub struct NavigationWatcher {
    last_url: Option<String>,
}

impl NavigationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    pub fn observe(&mut self, url: &str) -> Navigation {
        if self.last_url.as_deref() == Some(url) {
            return Navigation::Unchanged;
        }
        debug!(url, "navigation detected");
        self.last_url = Some(url.to_string());

        match watch_video_id(url) {
            Some(video_id) => Navigation::Watch { video_id },
            None => Navigation::Other,
        }
    }

    /// Forget the last URL so the next observation always counts as a change.
    pub fn reset(&mut self) {
        self.last_url = None;
    }
}

/// The `v` parameter of a `/watch` URL, if present and non-empty.
pub fn watch_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.path().trim_end_matches('/') != "/watch" {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
}

/// Canonical watch URL for a video.
pub fn watch_url(video_id: &str) -> String {
    format!(
        "https://www.youtube.com/watch?v={}",
        urlencoding::encode(video_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_video_id() {
        assert_eq!(
            watch_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(watch_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(watch_video_id("https://www.youtube.com/results?search_query=rust"), None);
        assert_eq!(watch_video_id("not a url"), None);
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let mut watcher = NavigationWatcher::new();
        let a = "https://www.youtube.com/watch?v=aaa";
        let b = "https://www.youtube.com/watch?v=bbb";

        assert_eq!(watcher.observe(a), Navigation::Watch { video_id: "aaa".into() });
        assert_eq!(watcher.observe(a), Navigation::Unchanged);
        assert_eq!(watcher.observe(b), Navigation::Watch { video_id: "bbb".into() });
        assert_eq!(watcher.observe("https://www.youtube.com/"), Navigation::Other);
        assert_eq!(watcher.observe(a), Navigation::Watch { video_id: "aaa".into() });
    }

    #[test]
    fn test_reset_forgets_last_url() {
        let mut watcher = NavigationWatcher::new();
        let a = "https://www.youtube.com/watch?v=aaa";
        watcher.observe(a);
        watcher.reset();
        assert_eq!(watcher.observe(a), Navigation::Watch { video_id: "aaa".into() });
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("abc"), "https://www.youtube.com/watch?v=abc");
        assert_eq!(watch_video_id(&watch_url("a&b")).as_deref(), Some("a&b"));
    }
}
