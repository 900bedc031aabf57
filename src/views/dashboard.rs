use super::{empty_state_markup, error_state_markup, render_kpis, require};
use crate::dom::{self, escape_html};
use crate::models::ActiveAlert;
use crate::router::{InitError, ViewScope};
use crate::state::Session;
use crate::util::format_date;
use futures_util::future::join;
use leptos::logging::{error, log};
use leptos::task::spawn_local;

const ALERTS_LIST_ID: &str = "dashboard-alerts-list";

pub(crate) fn alerts_markup(alerts: &[ActiveAlert]) -> String {
    if alerts.is_empty() {
        return empty_state_markup("NO ALERTS");
    }

    alerts
        .iter()
        .map(|a| {
            let severity = escape_html(a.alert_severity.as_deref().unwrap_or("unknown"));
            let label = escape_html(a.alert_label.as_deref().unwrap_or(""));
            format!(
                r#"<div data-alert-id="{id}" class="dash-alert-item"><div class="dash-alert-plant"><div class="dash-alert-plant-icon" severity="{severity}"></div><div class="dash-alert-plant-info"><div class="name">{name}</div><div class="date">{date}</div></div></div><div class="dash-alert-badge" alert-label="{label}">{label}</div></div>"#,
                id = a.alert_id,
                name = escape_html(a.plant_name.as_deref().unwrap_or("Unnamed Plant")),
                date = escape_html(&format_date(a.target_date.as_deref())),
            )
        })
        .collect()
}

pub(super) fn init(scope: ViewScope, session: Session) -> Result<(), InitError> {
    require(ALERTS_LIST_ID)?;
    let api = session.client();

    spawn_local(async move {
        let (metrics, alerts) = join(api.get_data_metrics(), api.get_alerts_active()).await;
        if !scope.is_current() {
            return;
        }
        if let Some(e) = alerts.as_ref().err().or(metrics.as_ref().err()) {
            if session.handle_error(e) {
                return;
            }
        }

        match metrics {
            Ok(m) => render_kpis(&m),
            Err(e) => error!("[dashboard] metrics failed: {}", e),
        }

        let html = match alerts {
            Ok(alerts) => alerts_markup(&alerts),
            Err(e) => {
                error!("[dashboard] alerts failed: {}", e);
                error_state_markup(&format!("Could not load alerts: {e}"))
            }
        };
        dom::set_html(ALERTS_LIST_ID, &html);
        log!("Dashboard view initialized");
    });

    Ok(())
}
