use super::route::Route;

/// Session key holding the last requested route.
pub(crate) const CURRENT_VIEW_KEY: &str = "currentView";

/// Route used when nothing was persisted for this session.
pub(crate) const DEFAULT_VIEW: &str = "dashboard";

/// Session-scoped key/value storage (browser `sessionStorage` in production).
pub(crate) trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NavigationState {
    current: Option<Route>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the most recently *requested* route. No registry validation.
    pub fn set_current(&mut self, route: Route) {
        self.current = Some(route);
    }

    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn persist(&self, store: &dyn SessionStore) {
        if let Some(route) = &self.current {
            store.set(CURRENT_VIEW_KEY, &route.key());
        }
    }

    pub fn restore(store: &dyn SessionStore) -> Route {
        store
            .get(CURRENT_VIEW_KEY)
            .as_deref()
            .and_then(Route::parse)
            .unwrap_or_else(|| Route::view(DEFAULT_VIEW))
    }
}
