//! Shared HTML components: navigation bar, notices, base page template and
//! the text helpers every page uses.

use crate::models::{Notice, NoticeKind};
use pulldown_cmark::Parser;

use super::styles::STYLE;

// ============================================================================
// Text Helpers
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Markdown to sanitized HTML.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new(content);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    ammonia::clean(&html_output)
}

// ============================================================================
// Navigation Bar
// ============================================================================

pub fn nav_bar(backend_online: Option<bool>) -> String {
    let status = match backend_online {
        Some(true) => r#"<span class="status-ok">&#10003; Server is running</span>"#,
        Some(false) => r#"<span class="status-down">&#10007; Server is offline</span>"#,
        None => "",
    };

    format!(
        r#"<nav class="nav-bar">
            <a href="/">Status</a>
            <a href="/watch">Watch</a>
            <a href="/notes">My Notes</a>
            <a href="/mind-map">Mind Map</a>
            <span class="spacer"></span>
            {}
        </nav>"#,
        status
    )
}

// ============================================================================
// Notices
// ============================================================================

pub fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Alert => "notice-alert",
        NoticeKind::Error => "notice-error",
        NoticeKind::Success => "notice-success",
    };
    format!(
        r#"<div class="notice {}" role="alert">{}</div>"#,
        class,
        html_escape(&notice.message)
    )
}

pub fn render_notices(notices: &[Notice]) -> String {
    notices.iter().map(render_notice).collect()
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str, backend_online: Option<bool>, dark: bool) -> String {
    let body_class = if dark { "dark" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body class="{body_class}">
    {nav}
    <div class="container">
        {content}
    </div>
    <script>
    // Clicking a key point seeks the embedded player.
    document.addEventListener('click', (event) => {{
        const stamp = event.target.closest('.yt-summary-timestamp');
        if (!stamp) return;
        const player = document.getElementById('player');
        if (!player) return;
        event.preventDefault();
        const url = new URL(player.src);
        url.searchParams.set('start', stamp.dataset.seconds);
        url.searchParams.set('autoplay', '1');
        player.src = url.toString();
    }});
    </script>
</body>
</html>"#,
        title = html_escape(title),
        STYLE = STYLE,
        body_class = body_class,
        nav = nav_bar(backend_online),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_markdown_strips_scripts() {
        let html = render_markdown("# Title\n<script>alert(1)</script>");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_notice_is_escaped() {
        let html = render_notice(&Notice::alert("<b>no</b>"));
        assert!(html.contains("notice-alert"));
        assert!(html.contains("&lt;b&gt;no&lt;/b&gt;"));
    }

    #[test]
    fn test_base_html_dark_mode() {
        let page = base_html("Notes", "<p>x</p>", Some(true), true);
        assert!(page.contains(r#"<body class="dark">"#));
        assert!(page.contains("Server is running"));
    }
}
