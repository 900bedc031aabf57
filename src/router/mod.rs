//! Client-side view router: fetches a view's HTML fragment into the view
//! container, runs the view's initializer and keeps session storage and browser
//! history in step with what the user asked for.
//!
//! Every navigation takes a fresh request token. Effects of a request (container
//! writes, events, initializer) are applied only while its token is the latest,
//! so a slow response for an earlier click can never overwrite a newer view.

mod container;
mod dispatch;
mod history;
mod loader;
mod registry;
mod route;
mod state;

pub(crate) use container::{DomContainer, ViewContainer, VIEW_CONTAINER_ID};
pub(crate) use dispatch::{DispatchOutcome, InitError, ViewScope};
pub(crate) use history::{popstate_json, BrowserHistory, HistoryEntry, HistoryStack};
pub(crate) use loader::{FragmentResult, FragmentSource, HttpFragmentSource, LoadError};
pub(crate) use registry::{Crumb, ViewRegistry, ViewSpec};
pub(crate) use route::{Route, ViewName};
pub(crate) use state::{NavigationState, SessionStore, CURRENT_VIEW_KEY, DEFAULT_VIEW};

use leptos::logging::{error, log};
use leptos::task::spawn_local;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NavTrigger {
    /// First navigation after page load (restored from the session).
    Initial,
    /// Sidebar click or a view asking to navigate.
    User,
    /// Browser back/forward.
    PopState,
    /// Re-render of the current route, e.g. after logging an activity.
    Reload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RouterEvent {
    Navigating(Route),
    Loaded(Route),
    Placeholder(Route),
    Failed { route: Route, message: String },
}

/// How an event changes the highlighted sidebar item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NavHighlight {
    Keep,
    Set(ViewName),
    Clear,
}

impl RouterEvent {
    pub fn route(&self) -> &Route {
        match self {
            Self::Navigating(r) | Self::Loaded(r) | Self::Placeholder(r) => r,
            Self::Failed { route, .. } => route,
        }
    }

    /// Hard failures un-highlight the nav; placeholders count as arrived.
    pub fn highlight(&self) -> NavHighlight {
        match self {
            Self::Navigating(_) => NavHighlight::Keep,
            Self::Loaded(r) | Self::Placeholder(r) => NavHighlight::Set(r.view.clone()),
            Self::Failed { .. } => NavHighlight::Clear,
        }
    }
}

/// Result of applying a fetch to a navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NavOutcome {
    Loaded(DispatchOutcome),
    Placeholder,
    Failed(String),
    /// A newer navigation started first; nothing was applied.
    Superseded,
}

/// An in-flight navigation request.
#[derive(Clone, Debug)]
pub(crate) struct NavTicket {
    pub token: u64,
    pub route: Route,
    pub path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Subscription(u64);

type Listener = Rc<dyn Fn(&RouterEvent)>;

pub(crate) struct RouterParts {
    pub registry: ViewRegistry,
    pub store: Box<dyn SessionStore>,
    pub history: Box<dyn HistoryStack>,
    pub container: Box<dyn ViewContainer>,
    pub source: Rc<dyn FragmentSource>,
}

struct RouterInner {
    registry: ViewRegistry,
    state: RefCell<NavigationState>,
    store: Box<dyn SessionStore>,
    history: Box<dyn HistoryStack>,
    container: Box<dyn ViewContainer>,
    source: Rc<dyn FragmentSource>,
    latest: Rc<Cell<u64>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

#[derive(Clone)]
pub(crate) struct ViewRouter {
    inner: Rc<RouterInner>,
}

impl ViewRouter {
    pub fn new(parts: RouterParts) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                registry: parts.registry,
                state: RefCell::new(NavigationState::new()),
                store: parts.store,
                history: parts.history,
                container: parts.container,
                source: parts.source,
                latest: Rc::new(Cell::new(0)),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(1),
            }),
        }
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.inner.registry
    }

    pub fn current(&self) -> Option<Route> {
        self.inner.state.borrow().current().cloned()
    }

    pub fn navigator(&self) -> Navigator {
        Navigator {
            router: Rc::downgrade(&self.inner),
        }
    }

    pub fn subscribe(&self, f: impl Fn(&RouterEvent) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(f)));
        Subscription(id)
    }

    pub fn unsubscribe(&self, sub: Subscription) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != sub.0);
    }

    fn emit(&self, event: &RouterEvent) {
        // Snapshot so listeners may (un)subscribe or navigate.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for l in listeners {
            l(event);
        }
    }

    /// IDLE -> LOADING. Records and persists the route, issues a new token and
    /// shows the loading indicator before any fetch begins.
    pub fn begin(&self, route: Route, trigger: NavTrigger) -> NavTicket {
        let inner = &self.inner;
        log!("Loading view {route} ({trigger:?})");

        {
            let mut state = inner.state.borrow_mut();
            state.set_current(route.clone());
            state.persist(inner.store.as_ref());
        }

        let token = inner.latest.get().saturating_add(1);
        inner.latest.set(token);

        inner.container.show_loading();

        let entry = HistoryEntry::from_route(&route);
        match trigger {
            NavTrigger::User => inner.history.push(&entry),
            NavTrigger::Initial => inner.history.replace(&entry),
            NavTrigger::PopState | NavTrigger::Reload => {}
        }

        self.emit(&RouterEvent::Navigating(route.clone()));

        NavTicket {
            token,
            path: inner.registry.fragment_path(&route.view),
            route,
        }
    }

    /// LOADING -> LOADED_OK | LOADED_PLACEHOLDER | FAILED, or nothing at all if
    /// the ticket has been superseded.
    pub fn complete(
        &self,
        ticket: NavTicket,
        result: Result<FragmentResult, LoadError>,
    ) -> NavOutcome {
        let inner = &self.inner;
        if ticket.token != inner.latest.get() {
            log!("Discarding stale response for {}", ticket.route);
            return NavOutcome::Superseded;
        }

        match result {
            Ok(FragmentResult::Markup(markup)) => {
                inner.container.show_fragment(&markup);
                self.emit(&RouterEvent::Loaded(ticket.route.clone()));

                let scope = ViewScope::new(
                    ticket.route,
                    ticket.token,
                    inner.latest.clone(),
                    self.navigator(),
                );
                // A listener may have started another navigation.
                if !scope.is_current() {
                    return NavOutcome::Superseded;
                }
                NavOutcome::Loaded(dispatch::dispatch(&inner.registry, scope))
            }
            Ok(FragmentResult::Placeholder) => {
                let view = &ticket.route.view;
                inner
                    .container
                    .show_placeholder(&inner.registry.title(view), view.as_str());
                self.emit(&RouterEvent::Placeholder(ticket.route));
                NavOutcome::Placeholder
            }
            Err(e) => {
                error!("Error loading view {}: {e}", ticket.route);
                let message = e.to_string();
                inner.container.show_error(&message);
                self.emit(&RouterEvent::Failed {
                    route: ticket.route,
                    message: message.clone(),
                });
                NavOutcome::Failed(message)
            }
        }
    }

    pub async fn navigate(&self, route: Route, trigger: NavTrigger) -> NavOutcome {
        let ticket = self.begin(route, trigger);
        let source = self.inner.source.clone();
        let result = source.fetch(&ticket.path).await;
        self.complete(ticket, result)
    }

    /// Fire-and-forget navigation for event handlers.
    pub fn go(&self, route: Route, trigger: NavTrigger) {
        let router = self.clone();
        spawn_local(async move {
            router.navigate(route, trigger).await;
        });
    }

    pub fn start(&self) {
        let route = NavigationState::restore(self.inner.store.as_ref());
        self.go(route, NavTrigger::Initial);
    }

    pub fn reload(&self) {
        if let Some(route) = self.current() {
            self.go(route, NavTrigger::Reload);
        }
    }

    /// Replays a back/forward entry through the normal navigation path.
    pub fn handle_popstate(&self, state_json: Option<&str>) -> bool {
        let Some(route) = popstate_route(state_json) else {
            return false;
        };
        self.go(route, NavTrigger::PopState);
        true
    }
}

pub(crate) fn popstate_route(state_json: Option<&str>) -> Option<Route> {
    state_json
        .and_then(HistoryEntry::from_state_json)
        .map(HistoryEntry::into_route)
}

/// Narrow handle views use to trigger navigation without owning the router.
#[derive(Clone)]
pub(crate) struct Navigator {
    router: Weak<RouterInner>,
}

impl Navigator {
    pub fn go(&self, route: Route) {
        if let Some(inner) = self.router.upgrade() {
            ViewRouter { inner }.go(route, NavTrigger::User);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::container::{error_markup, loading_markup, placeholder_markup};
    use super::state::tests::MemoryStore;
    use super::*;
    use async_trait::async_trait;
    use futures_util::FutureExt;
    use std::collections::HashMap;

    #[derive(Clone, Default)]
    struct RecordingHistory {
        ops: Rc<RefCell<Vec<(&'static str, HistoryEntry)>>>,
    }

    impl HistoryStack for RecordingHistory {
        fn push(&self, entry: &HistoryEntry) {
            self.ops.borrow_mut().push(("push", entry.clone()));
        }

        fn replace(&self, entry: &HistoryEntry) {
            self.ops.borrow_mut().push(("replace", entry.clone()));
        }
    }

    #[derive(Clone, Default)]
    struct RecordingContainer {
        html: Rc<RefCell<String>>,
    }

    impl RecordingContainer {
        fn contents(&self) -> String {
            self.html.borrow().clone()
        }
    }

    impl ViewContainer for RecordingContainer {
        fn show_loading(&self) {
            *self.html.borrow_mut() = loading_markup();
        }

        fn show_fragment(&self, markup: &str) {
            *self.html.borrow_mut() = markup.to_string();
        }

        fn show_placeholder(&self, title: &str, view: &str) {
            *self.html.borrow_mut() = placeholder_markup(title, view);
        }

        fn show_error(&self, message: &str) {
            *self.html.borrow_mut() = error_markup(message);
        }
    }

    /// Serves fixed markup per path. Unknown paths behave like a 404.
    #[derive(Clone, Default)]
    struct FixtureSource {
        pages: HashMap<String, String>,
    }

    impl FixtureSource {
        fn with_page(mut self, path: &str, markup: &str) -> Self {
            self.pages.insert(path.to_string(), markup.to_string());
            self
        }
    }

    #[async_trait(?Send)]
    impl FragmentSource for FixtureSource {
        async fn fetch(&self, path: &str) -> Result<FragmentResult, LoadError> {
            Ok(match self.pages.get(path) {
                Some(markup) => FragmentResult::Markup(markup.clone()),
                None => FragmentResult::Placeholder,
            })
        }
    }

    struct Harness {
        router: ViewRouter,
        store: MemoryStore,
        history: RecordingHistory,
        container: RecordingContainer,
        calls: Rc<RefCell<Vec<String>>>,
    }

    fn harness() -> Harness {
        let calls: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let recorder = |calls: &Rc<RefCell<Vec<String>>>| {
            let calls = calls.clone();
            move |scope: ViewScope| {
                calls.borrow_mut().push(scope.route().key());
                Ok::<(), InitError>(())
            }
        };

        let registry = ViewRegistry::new("/views")
            .register("dashboard", ViewSpec::new("Dashboard").nav().init(recorder(&calls)))
            .register("inventory", ViewSpec::new("Inventory").nav().init(recorder(&calls)))
            .register(
                "plant-detail",
                ViewSpec::new("Plant")
                    .fragment("inventory/plant-detail")
                    .init(recorder(&calls)),
            )
            .register("reports", ViewSpec::new("Reports").nav())
            .register(
                "settings",
                ViewSpec::new("Settings")
                    .nav()
                    .init(|_| Err(InitError::MissingElement("run-status".to_string()))),
            );

        let store = MemoryStore::default();
        let history = RecordingHistory::default();
        let container = RecordingContainer::default();

        let router = ViewRouter::new(RouterParts {
            registry,
            store: Box::new(store.clone()),
            history: Box::new(history.clone()),
            container: Box::new(container.clone()),
            source: Rc::new(
                FixtureSource::default()
                    .with_page("/views/inventory.html", "<ul id=\"inventory-list\"></ul>")
                    .with_page("/views/inventory/plant-detail.html", "<dl id=\"plant-fields\"></dl>"),
            ),
        });

        Harness {
            router,
            store,
            history,
            container,
            calls,
        }
    }

    fn markup(s: &str) -> Result<FragmentResult, LoadError> {
        Ok(FragmentResult::Markup(s.to_string()))
    }

    fn navigate_now(router: &ViewRouter, route: Route, trigger: NavTrigger) -> NavOutcome {
        router
            .navigate(route, trigger)
            .now_or_never()
            .expect("fixture source resolves immediately")
    }

    #[test]
    fn test_navigate_fetches_renders_and_initializes() {
        let h = harness();

        let outcome = navigate_now(&h.router, Route::view("inventory"), NavTrigger::User);

        assert_eq!(outcome, NavOutcome::Loaded(DispatchOutcome::Initialized));
        assert_eq!(h.container.contents(), "<ul id=\"inventory-list\"></ul>");
        assert_eq!(*h.calls.borrow(), vec!["inventory".to_string()]);
        assert_eq!(h.store.value(CURRENT_VIEW_KEY).as_deref(), Some("inventory"));
        assert_eq!(h.history.ops.borrow()[0].0, "push");
    }

    #[test]
    fn test_navigate_detail_uses_fragment_override() {
        let h = harness();

        let outcome = navigate_now(&h.router, Route::detail("plant-detail", "3"), NavTrigger::Initial);

        assert_eq!(outcome, NavOutcome::Loaded(DispatchOutcome::Initialized));
        assert_eq!(h.container.contents(), "<dl id=\"plant-fields\"></dl>");
        assert_eq!(*h.calls.borrow(), vec!["plant-detail/3".to_string()]);
        assert_eq!(h.history.ops.borrow()[0].0, "replace");
    }

    #[test]
    fn test_navigate_missing_fragment_is_placeholder() {
        let h = harness();

        let outcome = navigate_now(&h.router, Route::view("reports"), NavTrigger::User);

        assert_eq!(outcome, NavOutcome::Placeholder);
        assert!(h.container.contents().contains("coming soon"));
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn test_begin_shows_loading_before_fetch() {
        let h = harness();
        h.container.show_fragment("<p>old view</p>");

        let ticket = h.router.begin(Route::view("inventory"), NavTrigger::User);

        assert_eq!(h.container.contents(), loading_markup());
        assert_eq!(ticket.path, "/views/inventory.html");
    }

    #[test]
    fn test_registered_view_dispatches_its_initializer_once() {
        let h = harness();

        let ticket = h.router.begin(Route::view("inventory"), NavTrigger::User);
        let outcome = h.router.complete(ticket, markup("<div id=\"inv\"></div>"));

        assert_eq!(outcome, NavOutcome::Loaded(DispatchOutcome::Initialized));
        assert_eq!(h.container.contents(), "<div id=\"inv\"></div>");
        assert_eq!(*h.calls.borrow(), vec!["inventory".to_string()]);
    }

    #[test]
    fn test_view_without_initializer_is_a_noop() {
        let h = harness();

        let ticket = h.router.begin(Route::view("reports"), NavTrigger::User);
        let outcome = h.router.complete(ticket, markup("<h1>Reports</h1>"));

        assert_eq!(outcome, NavOutcome::Loaded(DispatchOutcome::NoInitializer));
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn test_initializer_failure_keeps_fragment_visible() {
        let h = harness();

        let ticket = h.router.begin(Route::view("settings"), NavTrigger::User);
        let outcome = h.router.complete(ticket, markup("<section>settings</section>"));

        assert_eq!(
            outcome,
            NavOutcome::Loaded(DispatchOutcome::Failed(InitError::MissingElement(
                "run-status".to_string()
            )))
        );
        assert_eq!(h.container.contents(), "<section>settings</section>");
        assert_eq!(h.router.current(), Some(Route::view("settings")));
    }

    #[test]
    fn test_unregistered_view_renders_placeholder_and_records_state() {
        let h = harness();

        let ticket = h.router.begin(Route::view("greenhouse"), NavTrigger::User);
        assert_eq!(ticket.path, "/views/greenhouse.html");
        let outcome = h.router.complete(ticket, Ok(FragmentResult::Placeholder));

        assert_eq!(outcome, NavOutcome::Placeholder);
        assert!(h.container.contents().contains("Greenhouse"));
        assert!(h.container.contents().contains("coming soon"));
        assert_eq!(h.router.current(), Some(Route::view("greenhouse")));
        assert_eq!(h.store.value(CURRENT_VIEW_KEY).as_deref(), Some("greenhouse"));
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let h = harness();

        let a = h.router.begin(Route::view("dashboard"), NavTrigger::User);
        let b = h.router.begin(Route::view("inventory"), NavTrigger::User);

        // B resolves first, then A arrives late.
        let b_outcome = h.router.complete(b, markup("<p>inventory</p>"));
        let a_outcome = h.router.complete(a, markup("<p>dashboard</p>"));

        assert_eq!(b_outcome, NavOutcome::Loaded(DispatchOutcome::Initialized));
        assert_eq!(a_outcome, NavOutcome::Superseded);
        assert_eq!(h.container.contents(), "<p>inventory</p>");
        assert_eq!(*h.calls.borrow(), vec!["inventory".to_string()]);
        assert_eq!(h.router.current(), Some(Route::view("inventory")));
    }

    #[test]
    fn test_stale_failure_does_not_replace_newer_view() {
        let h = harness();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        h.router.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let a = h.router.begin(Route::view("dashboard"), NavTrigger::User);
        let b = h.router.begin(Route::view("inventory"), NavTrigger::User);
        h.router.complete(b, markup("<p>inventory</p>"));
        let outcome = h.router.complete(
            a,
            Err(LoadError::Http {
                status: 500,
                reason: "Internal Server Error".to_string(),
            }),
        );

        assert_eq!(outcome, NavOutcome::Superseded);
        assert_eq!(h.container.contents(), "<p>inventory</p>");
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e, RouterEvent::Failed { .. })));
    }

    #[test]
    fn test_scope_goes_stale_after_newer_navigation() {
        let h = harness();
        let scopes: Rc<RefCell<Vec<ViewScope>>> = Rc::new(RefCell::new(Vec::new()));
        let kept = scopes.clone();

        let registry = ViewRegistry::new("/views").register(
            "dashboard",
            ViewSpec::new("Dashboard").init(move |scope| {
                kept.borrow_mut().push(scope);
                Ok(())
            }),
        );
        let router = ViewRouter::new(RouterParts {
            registry,
            store: Box::new(h.store.clone()),
            history: Box::new(h.history.clone()),
            container: Box::new(h.container.clone()),
            source: Rc::new(FixtureSource::default()),
        });

        let t = router.begin(Route::view("dashboard"), NavTrigger::User);
        router.complete(t, markup("<p>dash</p>"));
        let scope = scopes.borrow()[0].clone();
        assert!(scope.is_current());

        router.begin(Route::view("inventory"), NavTrigger::User);
        assert!(!scope.is_current());
    }

    #[test]
    fn test_popstate_renders_like_click_without_pushing_history() {
        let clicked = harness();
        let t = clicked.router.begin(Route::view("inventory"), NavTrigger::User);
        clicked.router.complete(t, markup("<p>inventory</p>"));

        let popped = harness();
        let route = popstate_route(Some(r#"{"view":"inventory"}"#)).expect("entry has a view");
        let t = popped.router.begin(route, NavTrigger::PopState);
        popped.router.complete(t, markup("<p>inventory</p>"));

        assert_eq!(clicked.container.contents(), popped.container.contents());
        assert_eq!(*clicked.calls.borrow(), *popped.calls.borrow());
        assert_eq!(clicked.history.ops.borrow().len(), 1);
        assert!(popped.history.ops.borrow().is_empty());
    }

    #[test]
    fn test_popstate_without_view_is_ignored() {
        assert!(popstate_route(None).is_none());
        assert!(popstate_route(Some(r#"{"other":1}"#)).is_none());
    }

    #[test]
    fn test_history_policy_per_trigger() {
        let h = harness();

        h.router.begin(Route::view("dashboard"), NavTrigger::Initial);
        h.router.begin(Route::view("inventory"), NavTrigger::User);
        h.router.begin(Route::view("dashboard"), NavTrigger::PopState);
        h.router.begin(Route::view("dashboard"), NavTrigger::Reload);

        let ops: Vec<(&str, String)> = h
            .history
            .ops
            .borrow()
            .iter()
            .map(|(op, e)| (*op, e.view.to_string()))
            .collect();
        assert_eq!(
            ops,
            vec![
                ("replace", "dashboard".to_string()),
                ("push", "inventory".to_string())
            ]
        );
    }

    #[test]
    fn test_reload_restores_last_requested_view() {
        let h = harness();
        let t = h.router.begin(Route::view("reports"), NavTrigger::User);
        h.router.complete(t, markup("<p>reports</p>"));

        assert_eq!(NavigationState::restore(&h.store), Route::view("reports"));
    }

    #[test]
    fn test_404_highlights_nav_and_500_clears_it() {
        let h = harness();
        let highlights = Rc::new(RefCell::new(Vec::new()));
        let sink = highlights.clone();
        h.router.subscribe(move |e| sink.borrow_mut().push(e.highlight()));

        let t = h.router.begin(Route::view("reports"), NavTrigger::User);
        h.router.complete(t, Ok(FragmentResult::Placeholder));
        assert!(h.container.contents().contains("<h2>Reports</h2>"));

        let t = h.router.begin(Route::view("inventory"), NavTrigger::User);
        let outcome = h.router.complete(
            t,
            Err(LoadError::Http {
                status: 500,
                reason: "Internal Server Error".to_string(),
            }),
        );
        assert_eq!(
            outcome,
            NavOutcome::Failed("Failed to load view: 500 Internal Server Error".to_string())
        );
        assert!(h.container.contents().contains("Reload Page"));
        // Failure does not roll back the requested view.
        assert_eq!(h.router.current(), Some(Route::view("inventory")));

        assert_eq!(
            *highlights.borrow(),
            vec![
                NavHighlight::Keep,
                NavHighlight::Set(ViewName::from("reports")),
                NavHighlight::Keep,
                NavHighlight::Clear,
            ]
        );
    }

    #[test]
    fn test_detail_route_passes_id_to_initializer() {
        let h = harness();

        let t = h.router.begin(Route::detail("plant-detail", "12"), NavTrigger::User);
        assert_eq!(t.path, "/views/inventory/plant-detail.html");
        h.router.complete(t, markup("<div></div>"));

        assert_eq!(*h.calls.borrow(), vec!["plant-detail/12".to_string()]);
        assert_eq!(h.store.value(CURRENT_VIEW_KEY).as_deref(), Some("plant-detail/12"));
        let (op, entry) = h.history.ops.borrow()[0].clone();
        assert_eq!(op, "push");
        assert_eq!(entry.id.as_deref(), Some("12"));
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let h = harness();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = h.router.subscribe(move |_| c.set(c.get() + 1));

        h.router.begin(Route::view("dashboard"), NavTrigger::User);
        assert_eq!(count.get(), 1);

        h.router.unsubscribe(sub);
        h.router.begin(Route::view("inventory"), NavTrigger::User);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_navigator_outlives_router_safely() {
        let navigator = harness().router.navigator();
        // Router dropped: navigating through a dangling handle is a no-op.
        navigator.go(Route::view("dashboard"));
    }
}
