//! CSS styles for the companion pages and the summary panel.
//!
//! Light values are the defaults; `.dark` on `<body>` or on the panel swaps
//! in the dark palette.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
:root {
    --bg: #ffffff;
    --fg: #0f0f0f;
    --muted: #606060;
    --border: #e5e5e5;
    --link: #065fd4;

    --panel-bg: #f9f9f9;
    --panel-fg: #0f0f0f;
    --panel-border: #065fd4;
    --point-bg: #ffffff;
    --point-border: #efefef;
    --point-fg: #606060;
    --timestamp: #065fd4;
    --error-bg: #ffebee;
    --error-fg: #cc0000;
    --success-bg: #e8f5e8;
    --success-fg: #2e7d32;
    --raw-bg: #f5f5f5;
    --note-bg: #f9f9f9;
    --note-border: #dddddd;
}

.dark {
    --bg: #0f0f0f;
    --fg: #f1f1f1;
    --muted: #aaaaaa;
    --border: #383838;
    --link: #3ea6ff;

    --panel-bg: #1a1a1a;
    --panel-fg: #ffffff;
    --panel-border: #3ea6ff;
    --point-bg: #2d2d2d;
    --point-border: #383838;
    --point-fg: #aaaaaa;
    --timestamp: #3ea6ff;
    --error-bg: rgba(255, 0, 0, 0.1);
    --error-fg: #ff6e6e;
    --raw-bg: #2d2d2d;
    --note-bg: #2b2b2b;
    --note-border: #444444;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: Roboto, Arial, sans-serif;
    line-height: 1.5;
    color: var(--fg);
    background: var(--bg);
}

.container { max-width: 1280px; margin: 0 auto; padding: 1rem; }

a { color: var(--link); text-decoration: none; }
a:hover { text-decoration: underline; }

h1, h2, h3 { font-weight: 500; margin: 1em 0 0.5em; }

.nav-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 1rem;
    align-items: center;
    z-index: 100;
}
.nav-bar .spacer { flex: 1; }
.nav-bar .status-ok { color: var(--success-fg); }
.nav-bar .status-down { color: var(--error-fg); }

.notice {
    position: fixed;
    top: 10px;
    right: 10px;
    padding: 10px;
    border-radius: 4px;
    z-index: 99999;
    box-shadow: 0 2px 10px rgba(0,0,0,0.2);
    max-width: 360px;
    animation: notice-fade 10s forwards;
}
.notice + .notice { top: 60px; }
.notice-error, .notice-alert { background: var(--error-bg); color: var(--error-fg); }
.notice-alert { border: 1px solid var(--error-fg); font-weight: 500; }
.notice-success { background: var(--success-bg); color: var(--success-fg); }
@keyframes notice-fade { 0%, 90% { opacity: 1; } 100% { opacity: 0; visibility: hidden; } }

/* Watch page layout */
.watch { display: flex; gap: 24px; align-items: flex-start; }
#primary { flex: 1; min-width: 0; }
#secondary { width: 402px; flex-shrink: 0; }
.player { position: relative; width: 100%; padding-top: 56.25%; background: #000; border-radius: 12px; overflow: hidden; }
.player iframe { position: absolute; inset: 0; width: 100%; height: 100%; border: 0; }
.related-placeholder { color: var(--muted); font-size: 13px; }

/* Summary panel */
.yt-summary-container {
    background: var(--panel-bg);
    color: var(--panel-fg);
    border: 2px solid var(--panel-border);
    border-radius: 12px;
    padding: 16px;
    margin-bottom: 16px;
    font-size: 14px;
}
.yt-summary-container.overlay {
    position: fixed;
    top: 80px;
    right: 20px;
    width: 400px;
    max-height: 80vh;
    overflow-y: auto;
    z-index: 9999;
}
.yt-summary-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding-bottom: 10px;
    margin-bottom: 12px;
    border-bottom: 1px solid var(--point-border);
    font-size: 16px;
    font-weight: 500;
}
.yt-summary-loading { color: var(--point-fg); font-style: italic; }
.yt-summary-point {
    margin-bottom: 10px;
    padding: 10px;
    background: var(--point-bg);
    border: 1px solid var(--point-border);
    border-radius: 4px;
    color: var(--point-fg);
}
.yt-summary-timestamp {
    color: var(--timestamp);
    font-weight: 500;
    cursor: pointer;
    display: inline-block;
    margin-bottom: 6px;
}
.yt-summary-error {
    color: var(--error-fg);
    background: var(--error-bg);
    padding: 12px;
    border-radius: 4px;
    margin-bottom: 10px;
}
.yt-summary-error ol { margin: 8px 0 12px 20px; }
.yt-summary-raw {
    white-space: pre-wrap;
    background: var(--raw-bg);
    color: var(--point-fg);
    padding: 10px;
    font-family: monospace;
    font-size: 12px;
}
.btn {
    background: var(--panel-border);
    color: #ffffff;
    border: none;
    padding: 8px 16px;
    border-radius: 4px;
    cursor: pointer;
    font-family: inherit;
}

/* Notes */
.yt-notes-section { margin-top: 20px; padding-top: 15px; border-top: 1px solid var(--point-border); }
.yt-notes-section h3 { font-size: 15px; margin: 0 0 10px; }
.yt-notes-section textarea {
    width: 100%;
    min-height: 70px;
    margin-bottom: 8px;
    padding: 8px;
    border: 1px solid var(--note-border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-family: inherit;
}
#video-notes-display { margin-top: 15px; }
.yt-individual-note {
    padding: 8px;
    border: 1px solid var(--note-border);
    margin-bottom: 8px;
    border-radius: 4px;
    background: var(--note-bg);
    white-space: pre-wrap;
}
.muted { font-style: italic; color: #888888; }
.error-text { color: var(--error-fg); }

/* All notes */
.note-item { padding: 12px 0; border-bottom: 1px solid var(--border); }
.note-content { white-space: pre-wrap; }
.note-video, .note-timestamps { font-size: 13px; color: var(--muted); }

/* Mind map */
#mindmap-container ul { margin-left: 1.5rem; }
#mindmap-container h1 { font-size: 1.4rem; }
#mindmap-container h2 { font-size: 1.1rem; }
#mindmap-container h3 { font-size: 0.95rem; color: var(--muted); font-weight: 400; margin-top: 0.2em; }
.message-overlay { padding: 16px; border: 1px solid var(--border); border-radius: 8px; }
.message-overlay.error { color: var(--error-fg); border-color: var(--error-fg); }

/* Popup */
.status { padding: 12px; border-radius: 4px; margin: 12px 0; }
.status.success { background: var(--success-bg); color: var(--success-fg); }
.status.error { background: var(--error-bg); color: var(--error-fg); }
"#;
