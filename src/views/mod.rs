//! Per-view initializers. Each one wires its freshly inserted fragment and starts
//! its own data loads; nothing here writes to the DOM once its scope is stale.

mod configuration;
mod dashboard;
mod inventory;
mod plant_detail;
mod settings;

use crate::api::activity::ActivityClient;
use crate::dom;
use crate::models::DataMetrics;
use crate::router::{InitError, ViewRegistry, ViewSpec};
use crate::state::Session;
use leptos::prelude::*;

/// Collaborators the initializers load data through.
#[derive(Clone, Copy)]
pub(crate) struct ViewDeps {
    pub session: Session,
    pub activity: StoredValue<ActivityClient>,
}

pub(crate) fn registry(views_base: &str, deps: ViewDeps) -> ViewRegistry {
    ViewRegistry::new(views_base)
        .register(
            "dashboard",
            ViewSpec::new("Dashboard")
                .tagline("Your plant care overview")
                .nav()
                .init(move |scope| dashboard::init(scope, deps.session)),
        )
        .register(
            "reports",
            ViewSpec::new("Reports").tagline("Analytics and insights").nav(),
        )
        .register(
            "inventory",
            ViewSpec::new("Inventory")
                .tagline("Manage all your plants")
                .nav()
                .init(move |scope| inventory::init(scope, deps.session)),
        )
        .register(
            "plant-detail",
            ViewSpec::new("Plant")
                .tagline("Plant details")
                .fragment("inventory/plant-detail")
                .parent("inventory")
                .init(move |scope| plant_detail::init(scope, deps.session)),
        )
        .register(
            "configuration",
            ViewSpec::new("Configuration")
                .tagline("Manage habitat and environmental settings for your plants")
                .nav()
                .init(move |scope| configuration::init(scope, deps.session)),
        )
        .register(
            "settings",
            ViewSpec::new("Settings")
                .tagline("Configure your Plant Hub preferences")
                .nav()
                .init(move |scope| settings::init(scope, deps.activity.get_value())),
        )
}

pub(crate) fn require(id: &str) -> Result<web_sys::Element, InitError> {
    dom::by_id(id).ok_or_else(|| InitError::MissingElement(id.to_string()))
}

pub(crate) fn error_state_markup(message: &str) -> String {
    format!(
        r#"<div class="error-state">{}</div>"#,
        dom::escape_html(message)
    )
}

pub(crate) fn empty_state_markup(message: &str) -> String {
    format!(
        r#"<div class="empty-state">{}</div>"#,
        dom::escape_html(message)
    )
}

pub(crate) fn healthy_percentage(metrics: &DataMetrics) -> String {
    format!("{}%", metrics.plant_healthy_percentage)
}

/// Fills whichever KPI cards the fragment has.
pub(crate) fn render_kpis(metrics: &DataMetrics) {
    dom::set_text("kpi-plant-count", &metrics.plant_active_total_count.to_string());
    dom::set_text("kpi-plant-healthy-perc", &healthy_percentage(metrics));
    dom::set_text("kpi-alerts-count", &metrics.alert_total_count.to_string());
}
