pub(crate) mod activity;

use crate::config::AppConfig;
use crate::models::{
    ActivePlant, ActivityType, ActiveAlert, Address, AuthSession, AuthUser, DataMetrics, Habitat,
    HabitatLights, HumidityLevel, LightArtificial, LightOutdoor, LightWindow, NewActivity,
    NewPlant, PlantActivityInsert, PlantDetail, PlantInsert, PlantInventoryRow, PlantType,
};
use crate::storage::{
    clear_cached_user, clear_session_token, load_cached_user, load_session_token,
    save_cached_user, save_session_token,
};
use futures_util::future::try_join3;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    /// The backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    pub(crate) fn with_message(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// PostgREST query against one table or view.
#[derive(Clone, Debug)]
pub(crate) struct Query {
    table: String,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), column.to_string()));
        self
    }

    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}/rest/v1/{}", base_url, self.table);
        for (i, (k, v)) in self.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(k));
            url.push('=');
            url.push_str(&urlencoding::encode(v));
        }
        url
    }
}

/// Pulls a readable message out of a GoTrue error body.
pub(crate) fn auth_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| "Sign in failed".to_string())
}

/// Authenticated access to the hosted Supabase project (GoTrue + PostgREST).
#[derive(Clone, Debug)]
pub(crate) struct SupabaseClient {
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) token: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url,
            anon_key,
            token: None,
        }
    }

    pub fn load_from_storage(config: &AppConfig) -> Self {
        let mut client = Self::new(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
        );
        client.token = load_session_token();
        client
    }

    pub fn clear_storage() {
        clear_session_token();
        clear_cached_user();
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets the session locally without telling the server.
    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    /// Bearer token: the session's when signed in, otherwise the anon key.
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.anon_key))
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        reqwest::Client::new()
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", self.auth_header())
    }

    async fn read_json<T: DeserializeOwned>(res: reqwest::Response, ctx: &str) -> ApiResult<T> {
        let status = res.status();
        if status.is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if status.as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, query: Query, ctx: &str) -> ApiResult<Vec<T>> {
        let res = self
            .request(reqwest::Method::GET, query.url(&self.base_url))
            .send()
            .await
            .map_err(ApiError::network)?;
        Self::read_json(res, ctx).await
    }

    async fn fetch_single<T: DeserializeOwned>(&self, query: Query, ctx: &str) -> ApiResult<T> {
        let res = self
            .request(reqwest::Method::GET, query.url(&self.base_url))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(ApiError::network)?;
        Self::read_json(res, ctx).await
    }

    async fn insert<T: Serialize>(
        &self,
        table: &str,
        row: &T,
        ctx: &str,
    ) -> ApiResult<Vec<serde_json::Value>> {
        let res = self
            .request(reqwest::Method::POST, Query::table(table).url(&self.base_url))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(ApiError::network)?;
        Self::read_json(res, ctx).await
    }

    // ---- auth ----

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let res = reqwest::Client::new()
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::with_message(
                ApiErrorKind::Unauthorized,
                auth_error_message(&body),
            ))
        }
    }

    /// Stores the session locally so page reloads stay signed in.
    pub fn save_session(&mut self, session: &AuthSession) {
        self.set_token(session.access_token.clone());
        save_session_token(&session.access_token);
        save_cached_user(&session.user);
    }

    pub async fn sign_out(&mut self) -> ApiResult<()> {
        let result = if self.token.is_some() {
            self.request(
                reqwest::Method::POST,
                format!("{}/auth/v1/logout", self.base_url),
            )
            .send()
            .await
            .map_err(ApiError::network)
            .map(|_| ())
        } else {
            Ok(())
        };

        self.logout();
        result
    }

    /// Cached for the tab in sessionStorage; fetched once otherwise.
    pub async fn current_user(&self) -> ApiResult<Option<AuthUser>> {
        if self.token.is_none() {
            return Ok(None);
        }
        if let Some(user) = load_cached_user() {
            return Ok(Some(user));
        }

        let res = self
            .request(reqwest::Method::GET, format!("{}/auth/v1/user", self.base_url))
            .send()
            .await
            .map_err(ApiError::network)?;
        let user: AuthUser = Self::read_json(res, "Failed to get user").await?;
        save_cached_user(&user);
        Ok(Some(user))
    }

    async fn current_user_id(&self) -> ApiResult<Option<String>> {
        Ok(self.current_user().await?.map(|u| u.id))
    }

    // ---- reads ----

    pub async fn get_habitats(&self) -> ApiResult<Vec<Habitat>> {
        let q = Query::table("habitat")
            .select("*")
            .eq("is_active", true)
            .order("habitat_name");
        self.fetch_rows(q, "Failed to get habitats").await
    }

    pub async fn get_habitat(&self, habitat_id: i64) -> ApiResult<Habitat> {
        let q = Query::table("habitat")
            .select("*")
            .eq("habitat_id", habitat_id)
            .eq("is_active", true);
        self.fetch_single(q, "Failed to get habitat").await
    }

    pub async fn get_humidity_level(
        &self,
        humidity_level_id: Option<i64>,
    ) -> ApiResult<Option<HumidityLevel>> {
        let Some(id) = humidity_level_id else {
            return Ok(None);
        };
        let q = Query::table("habitat_humidity_level_lookup")
            .select("humidity_level,humidity_level_desc")
            .eq("humidity_level_id", id)
            .eq("is_active", true);
        self.fetch_single(q, "Failed to get humidity level").await.map(Some)
    }

    pub async fn get_habitat_light_artificial(
        &self,
        habitat_id: i64,
    ) -> ApiResult<Vec<LightArtificial>> {
        let q = Query::table("habitat_light_artificial")
            .select(
                "*,light_artificial_strength:habitat_light_artificial_strength_lookup(light_artificial_strength),\
                 start_type:habitat_light_schedule_start_type_lookup(light_schedule_start_type),\
                 end_type:habitat_light_schedule_end_type_lookup(light_schedule_end_type)",
            )
            .eq("habitat_id", habitat_id)
            .eq("is_active", true);
        self.fetch_rows(q, "Failed to get artificial lights").await
    }

    pub async fn get_habitat_light_window(&self, habitat_id: i64) -> ApiResult<Vec<LightWindow>> {
        let q = Query::table("habitat_light_window")
            .select(
                "*,window_size:habitat_light_window_size_lookup(window_size,window_size_desc),\
                 direction:compass_direction_lookup(full_name),address:address(address_name)",
            )
            .eq("habitat_id", habitat_id)
            .eq("is_active", true);
        self.fetch_rows(q, "Failed to get window lights").await
    }

    pub async fn get_habitat_light_outdoor(&self, habitat_id: i64) -> ApiResult<Vec<LightOutdoor>> {
        let q = Query::table("habitat_light_outdoor")
            .select("*")
            .eq("habitat_id", habitat_id)
            .eq("is_active", true);
        self.fetch_rows(q, "Failed to get outdoor lights").await
    }

    pub async fn get_habitat_lights(&self, habitat_id: i64) -> ApiResult<HabitatLights> {
        let (artificial, window, outdoor) = try_join3(
            self.get_habitat_light_artificial(habitat_id),
            self.get_habitat_light_window(habitat_id),
            self.get_habitat_light_outdoor(habitat_id),
        )
        .await?;
        Ok(HabitatLights {
            artificial,
            window,
            outdoor,
        })
    }

    pub async fn get_addresses(&self) -> ApiResult<Vec<Address>> {
        let q = Query::table("address")
            .select("*")
            .eq("is_active", true)
            .order("address_name");
        self.fetch_rows(q, "Failed to get addresses").await
    }

    pub async fn get_plant_inventory(&self) -> ApiResult<Vec<PlantInventoryRow>> {
        let q = Query::table("plant_inventory_view").select("*");
        self.fetch_rows(q, "Failed to get plant inventory").await
    }

    pub async fn get_active_plants(&self) -> ApiResult<Vec<ActivePlant>> {
        let q = Query::table("plant_inventory_view")
            .select("plant_id,plant_name,species")
            .order("plant_name");
        self.fetch_rows(q, "Failed to get plants").await
    }

    pub async fn get_plant_types(&self) -> ApiResult<Vec<PlantType>> {
        let q = Query::table("plant_type_lookup")
            .select("*")
            .eq("is_active", true)
            .order("species");
        self.fetch_rows(q, "Failed to get plant types").await
    }

    pub async fn get_plant_details(&self, plant_id: &str) -> ApiResult<PlantDetail> {
        let q = Query::table("plant_detail_view")
            .select("*")
            .eq("plant_id", plant_id);
        self.fetch_single(q, "Failed to get plant details").await
    }

    pub async fn get_activity_types(&self) -> ApiResult<Vec<ActivityType>> {
        let q = Query::table("plant_activity_type_lookup")
            .select("activity_type_code,activity_label,activity_category")
            .eq("is_active", true)
            .order("activity_label");
        self.fetch_rows(q, "Failed to get activity types").await
    }

    pub async fn get_alerts_active(&self) -> ApiResult<Vec<ActiveAlert>> {
        let q = Query::table("alerts_active_view").select("*");
        self.fetch_rows(q, "Failed to get alerts").await
    }

    pub async fn get_data_metrics(&self) -> ApiResult<DataMetrics> {
        let res = self
            .request(
                reqwest::Method::POST,
                format!("{}/rest/v1/rpc/getDataMetrics", self.base_url),
            )
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(ApiError::network)?;
        let data: serde_json::Value = Self::read_json(res, "Failed to get metrics").await?;
        parse_metrics(data)
    }

    // ---- writes ----

    pub async fn add_plant_activity(
        &self,
        activity: &NewActivity,
    ) -> ApiResult<Vec<serde_json::Value>> {
        let user_id = self.current_user_id().await?;
        let row = PlantActivityInsert::new(activity, user_id);
        self.insert("plant_activity_history", &row, "Failed to save activity")
            .await
    }

    pub async fn add_plant(&self, plant: &NewPlant) -> ApiResult<Vec<serde_json::Value>> {
        let user_id = self.current_user_id().await?;
        let row = PlantInsert {
            plant: plant.clone(),
            user_id,
        };
        self.insert("plant", &row, "Failed to create plant").await
    }
}

/// The RPC returns either the metrics object or a one-row set.
pub(crate) fn parse_metrics(data: serde_json::Value) -> ApiResult<DataMetrics> {
    let obj = match data {
        serde_json::Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
        serde_json::Value::Array(_) | serde_json::Value::Null => return Ok(DataMetrics::default()),
        other => other,
    };
    serde_json::from_value(obj).map_err(ApiError::parse)
}
