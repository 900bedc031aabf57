use super::registry::ViewRegistry;
use super::route::{Route, ViewName};
use super::Navigator;
use leptos::logging::{error, log};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum InitError {
    #[error("element #{0} not found in fragment")]
    MissingElement(String),

    #[error("view {0} needs a record id")]
    MissingId(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DispatchOutcome {
    Initialized,
    NoInitializer,
    Failed(InitError),
}

/// What an initializer gets: its route and a way to tell whether it still owns
/// the view container.
#[derive(Clone)]
pub(crate) struct ViewScope {
    route: Route,
    token: u64,
    latest: Rc<Cell<u64>>,
    navigator: Navigator,
}

impl ViewScope {
    pub(crate) fn new(route: Route, token: u64, latest: Rc<Cell<u64>>, navigator: Navigator) -> Self {
        Self {
            route,
            token,
            latest,
            navigator,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> &ViewName {
        &self.route.view
    }

    pub fn id(&self) -> Option<&str> {
        self.route.id.as_deref()
    }

    pub fn require_id(&self) -> Result<&str, InitError> {
        self.id()
            .ok_or_else(|| InitError::MissingId(self.route.view.to_string()))
    }

    /// False once a newer navigation has started. Check after every await.
    pub fn is_current(&self) -> bool {
        self.latest.get() == self.token
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

pub(crate) fn dispatch(registry: &ViewRegistry, scope: ViewScope) -> DispatchOutcome {
    let view = scope.view().clone();
    let Some(init) = registry.initializer(&view) else {
        log!("No initialization function for {view}");
        return DispatchOutcome::NoInitializer;
    };

    match init(scope) {
        Ok(()) => DispatchOutcome::Initialized,
        Err(e) => {
            error!("Initializer for {view} failed: {e}");
            DispatchOutcome::Failed(e)
        }
    }
}
