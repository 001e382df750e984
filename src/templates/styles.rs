//! CSS styles for rendered answers and the source preview page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --orange: #cb4b16;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

/* Answer body */
.answer-content p { margin-bottom: 0.5rem; }
.answer-content p.blank { margin-bottom: 1rem; min-height: 0.5rem; }

.citation { white-space: nowrap; }
.citation a {
    font-size: 0.85em;
    background: var(--base2);
    border-radius: 3px;
    padding: 0 0.25em;
}
.citation .unlinked { color: var(--base01); font-size: 0.85em; }

/* Sources list */
.sources-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; }
.source-card {
    display: block;
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 0.6rem 0.8rem;
    color: var(--fg);
}
.source-card.static { cursor: default; }
.source-header { display: flex; gap: 0.5rem; font-size: 0.8rem; color: var(--muted); }
.source-score { margin-left: auto; color: var(--green); }
.source-title { font-weight: 600; }
.source-location span { margin-right: 0.6rem; font-size: 0.8rem; color: var(--base01); }

/* Preview page */
.pdf-viewer-page { display: flex; flex-direction: column; height: 100vh; }
.pdf-viewer-toolbar {
    display: flex;
    align-items: center;
    gap: 1rem;
    padding: 0.5rem 1rem;
    border-bottom: 1px solid var(--border);
    background: var(--base2);
}
.pdf-viewer-toolbar .spacer { flex: 1; }
.page-status { font-size: 0.85rem; color: var(--base01); }
.page-status.located { color: var(--green); }
.page-status.hint { color: var(--orange); }
.pdf-viewer-body { flex: 1; }
.pdf-viewer-body iframe { width: 100%; height: 100%; border: none; }
.pdf-preview-empty { padding: 2rem; color: var(--muted); }
.snippet { font-style: italic; font-size: 0.85rem; color: var(--base01); padding: 0.5rem 1rem; }
"#;
