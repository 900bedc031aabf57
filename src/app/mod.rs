use crate::config::AppConfig;
use crate::pages::{LoginPage, RootAuthed};
use crate::router::{
    BrowserHistory, DomContainer, HttpFragmentSource, RouterParts, ViewRouter,
};
use crate::state::{AppContext, AppState};
use crate::storage::WebSessionStore;
use crate::views::{self, ViewDeps};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use std::rc::Rc;

fn build_router(config: &AppConfig, state: &AppState) -> ViewRouter {
    let deps = ViewDeps {
        session: state.session(),
        activity: state.activity_client,
    };

    let router = ViewRouter::new(RouterParts {
        registry: views::registry(&config.views_base, deps),
        store: Box::new(WebSessionStore),
        history: Box::new(BrowserHistory),
        container: Box::new(DomContainer::new()),
        source: Rc::new(HttpFragmentSource),
    });

    let state = state.clone();
    router.subscribe(move |event| state.apply_router_event(event));
    router
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_window();
    let state = AppState::new(config.clone());
    let router = StoredValue::new_local(build_router(&config, &state));
    provide_context(AppContext(state));

    // `view-container` lives under the authed shell; the router is started by
    // the shell once it has mounted.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("") view=move || view! { <RootAuthed router=router /> } />
            </Routes>
        </Router>
    }
}
