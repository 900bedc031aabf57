use super::{ApiError, ApiErrorKind, ApiResult, SupabaseClient};
use crate::models::NewActivity;
use leptos::logging::{log, warn};

/// Client for the activity-processing service (alerts and schedules).
#[derive(Clone, Debug)]
pub(crate) struct ActivityClient {
    base_url: String,
}

/// FastAPI-style `{"detail": ...}` body; anything else gets the generic message.
pub(crate) fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Failed to process activity".to_string())
}

impl ActivityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn new_activity_url(&self) -> String {
        format!("{}/api/new-activity", self.base_url)
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", self.base_url)
    }

    pub async fn new_activity(&self, activity: &NewActivity) -> ApiResult<serde_json::Value> {
        let res = reqwest::Client::new()
            .post(self.new_activity_url())
            .json(activity)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::with_message(ApiErrorKind::Http, detail_message(&body)))
        }
    }

    pub async fn status(&self) -> ApiResult<serde_json::Value> {
        let res = reqwest::Client::new()
            .get(self.status_url())
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        if status.is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Status check failed"))
        }
    }
}

/// Saves the activity, then hands it to the processing service.
///
/// The row is the source of truth; a processing failure after a successful
/// save is reported but does not undo it.
pub(crate) async fn record_activity(
    api: &SupabaseClient,
    service: &ActivityClient,
    activity: &NewActivity,
) -> ApiResult<()> {
    api.add_plant_activity(activity).await?;

    match service.new_activity(activity).await {
        Ok(result) => {
            log!("[activity] processed: {}", result);
            Ok(())
        }
        Err(e) => {
            warn!("[activity] processing failed: {}", e);
            Err(ApiError::with_message(
                e.kind,
                format!("Activity saved, but processing failed: {}", e.message),
            ))
        }
    }
}
