use super::route::{Route, ViewName};
use serde::{Deserialize, Serialize};

/// State object stored in `history.state`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct HistoryEntry {
    pub view: ViewName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl HistoryEntry {
    pub fn from_route(route: &Route) -> Self {
        Self {
            view: route.view.clone(),
            id: route.id.clone(),
        }
    }

    pub fn into_route(self) -> Route {
        Route {
            view: self.view,
            id: self.id,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"view":"{}"}}"#, self.view))
    }

    /// Parses a popstate payload. States without a usable `view` are ignored.
    pub fn from_state_json(json: &str) -> Option<Self> {
        let entry: Self = serde_json::from_str(json).ok()?;
        if entry.view.as_str().trim().is_empty() {
            return None;
        }
        Some(entry)
    }
}

pub(crate) trait HistoryStack {
    fn push(&self, entry: &HistoryEntry);
    fn replace(&self, entry: &HistoryEntry);
}

/// `window.history`, keeping the current URL.
#[derive(Clone, Default)]
pub(crate) struct BrowserHistory;

impl BrowserHistory {
    fn write(&self, entry: &HistoryEntry, replace: bool) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let Ok(state) = js_sys::JSON::parse(&entry.to_json()) else {
            return;
        };

        let _ = if replace {
            history.replace_state(&state, "")
        } else {
            history.push_state(&state, "")
        };
    }
}

impl HistoryStack for BrowserHistory {
    fn push(&self, entry: &HistoryEntry) {
        self.write(entry, false);
    }

    fn replace(&self, entry: &HistoryEntry) {
        self.write(entry, true);
    }
}

/// JSON form of a popstate event's state, if it carries one.
pub(crate) fn popstate_json(ev: &web_sys::PopStateEvent) -> Option<String> {
    let state = ev.state();
    if state.is_null() || state.is_undefined() {
        return None;
    }
    js_sys::JSON::stringify(&state).ok().and_then(|s| s.as_string())
}
