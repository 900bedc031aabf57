use super::require;
use crate::api::activity::ActivityClient;
use crate::dom;
use crate::router::{InitError, ViewScope};
use leptos::logging::{error, log};
use leptos::task::spawn_local;

const RUN_STATUS_ID: &str = "run-status";
const STATUS_OUTPUT_ID: &str = "status-output";

pub(crate) fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub(super) fn init(scope: ViewScope, activity: ActivityClient) -> Result<(), InitError> {
    let button = require(RUN_STATUS_ID)?;

    dom::on_click(&button, move |_| {
        let scope = scope.clone();
        let activity = activity.clone();
        dom::set_text(STATUS_OUTPUT_ID, "Checking...");
        spawn_local(async move {
            let result = activity.status().await;
            if !scope.is_current() {
                return;
            }
            match result {
                Ok(data) => {
                    log!("[settings] status: {}", data);
                    dom::set_text(STATUS_OUTPUT_ID, &pretty(&data));
                }
                Err(e) => {
                    error!("[settings] status check failed: {}", e);
                    dom::set_text(STATUS_OUTPUT_ID, &format!("Error calling backend: {e}"));
                }
            }
        });
    });

    log!("Settings view initialized");
    Ok(())
}
