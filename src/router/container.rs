use crate::dom::{by_id, escape_html, on_click, reload_page};

pub(crate) const VIEW_CONTAINER_ID: &str = "view-container";

/// The single page region the router owns.
pub(crate) trait ViewContainer {
    fn show_loading(&self);
    fn show_fragment(&self, markup: &str);
    fn show_placeholder(&self, title: &str, view: &str);
    fn show_error(&self, message: &str);
}

pub(crate) fn loading_markup() -> String {
    r#"<p class="view-loading" role="status">Loading...</p>"#.to_string()
}

pub(crate) fn placeholder_markup(title: &str, view: &str) -> String {
    format!(
        r#"<div class="view-placeholder">
    <h2>{}</h2>
    <p>This view is coming soon!</p>
    <p>The {} feature is currently under development.</p>
</div>"#,
        escape_html(title),
        escape_html(view)
    )
}

pub(crate) fn error_markup(message: &str) -> String {
    format!(
        r#"<div class="view-error">
    <h2>Error Loading View</h2>
    <p>{}</p>
    <button type="button" data-action="reload">Reload Page</button>
</div>"#,
        escape_html(message)
    )
}

/// Writes into `#view-container`, looked up on every call so the router can be
/// built before the shell mounts.
#[derive(Clone)]
pub(crate) struct DomContainer {
    element_id: &'static str,
}

impl DomContainer {
    pub fn new() -> Self {
        Self {
            element_id: VIEW_CONTAINER_ID,
        }
    }

    fn write(&self, html: &str) -> Option<web_sys::Element> {
        let el = by_id(self.element_id)?;
        el.set_inner_html(html);
        Some(el)
    }
}

impl Default for DomContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewContainer for DomContainer {
    fn show_loading(&self) {
        self.write(&loading_markup());
    }

    fn show_fragment(&self, markup: &str) {
        self.write(markup);
    }

    fn show_placeholder(&self, title: &str, view: &str) {
        self.write(&placeholder_markup(title, view));
    }

    fn show_error(&self, message: &str) {
        let Some(el) = self.write(&error_markup(message)) else {
            return;
        };
        if let Ok(Some(button)) = el.query_selector(r#"[data-action="reload"]"#) {
            on_click(&button, |_| reload_page());
        }
    }
}
