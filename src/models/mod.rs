use serde::{Deserialize, Serialize};

/// Supabase auth user. Only the fields the UI reads are typed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// `full_name` metadata, else the email's local part, else "User".
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
        {
            return name.to_string();
        }

        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

pub(crate) fn display_name_or_guest(user: Option<&AuthUser>) -> String {
    user.map(AuthUser::display_name)
        .unwrap_or_else(|| "Guest".to_string())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Habitat {
    pub habitat_id: i64,
    pub habitat_name: String,
    #[serde(default)]
    pub address_id: Option<i64>,
    #[serde(default)]
    pub humidity_level_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Address {
    pub address_id: i64,
    pub address_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct HumidityLevel {
    #[serde(default)]
    pub humidity_level: Option<String>,
    #[serde(default)]
    pub humidity_level_desc: Option<String>,
}

/// Embedded `habitat_light_artificial_strength_lookup` row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct LightStrength {
    #[serde(default)]
    pub light_artificial_strength: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct LightArtificial {
    pub light_artificial_id: i64,
    #[serde(default)]
    pub light_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub light_artificial_strength: Option<LightStrength>,
}

/// Embedded `habitat_light_window_size_lookup` row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct WindowSize {
    #[serde(default)]
    pub window_size: Option<String>,
    #[serde(default)]
    pub window_size_desc: Option<String>,
}

/// Embedded `address` row; only the name is selected.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AddressName {
    #[serde(default)]
    pub address_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct LightWindow {
    pub light_window_id: i64,
    #[serde(default)]
    pub light_name: Option<String>,
    #[serde(default)]
    pub direction_code: Option<String>,
    #[serde(default)]
    pub window_size: Option<WindowSize>,
    #[serde(default)]
    pub address: Option<AddressName>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct LightOutdoor {
    pub light_outdoor_id: i64,
    #[serde(default)]
    pub light_name: Option<String>,
    /// Compass exposures; older rows store something other than a list.
    #[serde(default)]
    pub direction: serde_json::Value,
}

impl LightOutdoor {
    pub fn exposure(&self) -> String {
        match self.direction.as_array() {
            Some(dirs) => dirs
                .iter()
                .filter_map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => "Unknown".to_string(),
        }
    }
}

/// Every light source attached to one habitat.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HabitatLights {
    pub artificial: Vec<LightArtificial>,
    pub window: Vec<LightWindow>,
    pub outdoor: Vec<LightOutdoor>,
}

impl HabitatLights {
    pub fn is_empty(&self) -> bool {
        self.artificial.is_empty() && self.window.is_empty() && self.outdoor.is_empty()
    }

    /// One-line list of the kinds of light a habitat gets.
    pub fn summary(&self) -> String {
        let kinds: Vec<&str> = [
            (!self.artificial.is_empty()).then_some("Artificial light"),
            (!self.window.is_empty()).then_some("Window"),
            (!self.outdoor.is_empty()).then_some("Outdoor"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if kinds.is_empty() {
            "No light sources configured".to_string()
        } else {
            kinds.join(" • ")
        }
    }
}

/// Row of `plant_inventory_view`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct PlantInventoryRow {
    pub plant_id: i64,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub plant_icon: Option<String>,
    #[serde(default)]
    pub status_icon: Option<String>,
    #[serde(default)]
    pub status_label: Option<String>,
    #[serde(default)]
    pub last_activity_date: Option<String>,
    #[serde(default)]
    pub last_activity_label: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ActivePlant {
    pub plant_id: i64,
    pub plant_name: String,
    #[serde(default)]
    pub species: Option<String>,
}

impl ActivePlant {
    pub fn full_plant_name(&self) -> String {
        format!(
            "{} . . . ({})",
            self.plant_name,
            self.species.as_deref().unwrap_or("unknown")
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct PlantType {
    pub plant_type_id: i64,
    pub species: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl PlantType {
    pub fn label(&self) -> String {
        match self.category.as_deref() {
            Some(c) => format!("{}  ({})", self.species, c),
            None => self.species.clone(),
        }
    }
}

/// Single row of `plant_detail_view`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct PlantDetail {
    pub plant_id: i64,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub plant_category: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ActivityType {
    pub activity_type_code: String,
    pub activity_label: String,
    #[serde(default)]
    pub activity_category: Option<String>,
}

/// Row of `alerts_active_view`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ActiveAlert {
    pub alert_id: i64,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub alert_severity: Option<String>,
    #[serde(default)]
    pub alert_label: Option<String>,
}

/// Result of the `getDataMetrics` RPC.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct DataMetrics {
    #[serde(default)]
    pub plant_active_total_count: i64,
    #[serde(default)]
    pub plant_healthy_percentage: f64,
    #[serde(default)]
    pub alert_total_count: i64,
}

/// Activity payload, shared by the table insert and the activity service.
///
/// The service contract is exactly these five fields; absent values are sent as `null`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NewActivity {
    pub plant_id: i64,
    pub activity_type_code: String,
    pub activity_date: String,
    pub notes: Option<String>,
    pub quantifier: Option<f64>,
}

/// Insert body for `plant_activity_history`.
#[derive(Serialize, Clone, Debug)]
pub(crate) struct PlantActivityInsert {
    pub plant_id: i64,
    pub activity_type_code: String,
    pub activity_date: String,
    pub quantifier: Option<f64>,
    pub unit: Option<String>,
    pub details: Option<String>,
    pub user_id: Option<String>,
}

impl PlantActivityInsert {
    pub fn new(activity: &NewActivity, user_id: Option<String>) -> Self {
        Self {
            plant_id: activity.plant_id,
            activity_type_code: activity.activity_type_code.clone(),
            activity_date: activity.activity_date.clone(),
            quantifier: activity.quantifier,
            unit: None,
            details: activity.notes.clone(),
            user_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NewPlant {
    pub plant_name: String,
    pub plant_type_id: i64,
    pub habitat_id: i64,
    pub acquisition_date: String,
    #[serde(rename = "source")]
    pub source_name: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct PlantInsert {
    #[serde(flatten)]
    pub plant: NewPlant,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: Option<&str>, meta: serde_json::Value) -> AuthUser {
        AuthUser {
            id: "u-1".to_string(),
            email: email.map(str::to_string),
            user_metadata: meta,
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let u = user(Some("ana@example.com"), serde_json::json!({"full_name": "Ana Ruiz"}));
        assert_eq!(u.display_name(), "Ana Ruiz");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let u = user(Some("ana@example.com"), serde_json::Value::Null);
        assert_eq!(u.display_name(), "ana");
    }

    #[test]
    fn test_display_name_defaults() {
        assert_eq!(user(None, serde_json::json!({})).display_name(), "User");
        assert_eq!(display_name_or_guest(None), "Guest");
    }

    #[test]
    fn test_auth_session_contract_deserialize() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "abc", "email": "a@b.c", "user_metadata": {}}
        }"#;
        let s: AuthSession = serde_json::from_str(json).expect("session should parse");
        assert_eq!(s.access_token, "jwt");
        assert_eq!(s.user.id, "abc");
    }

    #[test]
    fn test_new_activity_serializes_nulls() {
        let a = NewActivity {
            plant_id: 3,
            activity_type_code: "watering".to_string(),
            activity_date: "2025-05-01".to_string(),
            notes: None,
            quantifier: Some(250.0),
        };
        let v = serde_json::to_value(&a).expect("should serialize");
        assert_eq!(
            v,
            serde_json::json!({
                "plant_id": 3,
                "activity_type_code": "watering",
                "activity_date": "2025-05-01",
                "notes": null,
                "quantifier": 250.0
            })
        );
    }

    #[test]
    fn test_activity_insert_maps_notes_to_details() {
        let a = NewActivity {
            plant_id: 3,
            activity_type_code: "fertilizing".to_string(),
            activity_date: "2025-05-01".to_string(),
            notes: Some("half dose".to_string()),
            quantifier: None,
        };
        let v = serde_json::to_value(PlantActivityInsert::new(&a, Some("u-1".to_string())))
            .expect("should serialize");
        assert_eq!(v["details"], "half dose");
        assert_eq!(v["user_id"], "u-1");
        assert!(v["unit"].is_null());
    }

    #[test]
    fn test_plant_insert_renames_source() {
        let p = PlantInsert {
            plant: NewPlant {
                plant_name: "Monstera".to_string(),
                plant_type_id: 1,
                habitat_id: 2,
                acquisition_date: "2025-01-10".to_string(),
                source_name: Some("Market".to_string()),
            },
            user_id: None,
        };
        let v = serde_json::to_value(p).expect("should serialize");
        assert_eq!(v["source"], "Market");
        assert!(v.get("source_name").is_none());
    }

    #[test]
    fn test_labels() {
        let t = PlantType {
            plant_type_id: 1,
            species: "Ficus lyrata".to_string(),
            category: Some("tree".to_string()),
        };
        assert_eq!(t.label(), "Ficus lyrata  (tree)");

        let p = ActivePlant {
            plant_id: 1,
            plant_name: "Fig".to_string(),
            species: Some("Ficus lyrata".to_string()),
        };
        assert_eq!(p.full_plant_name(), "Fig . . . (Ficus lyrata)");
    }

    #[test]
    fn test_light_summary() {
        let mut lights = HabitatLights::default();
        assert!(lights.is_empty());
        assert_eq!(lights.summary(), "No light sources configured");

        lights.outdoor.push(LightOutdoor {
            light_outdoor_id: 1,
            light_name: None,
            direction: serde_json::json!(["S", "W"]),
        });
        assert_eq!(lights.summary(), "Outdoor");

        lights.artificial.push(
            serde_json::from_str(r#"{"light_artificial_id": 4}"#).expect("sparse light should parse"),
        );
        assert_eq!(lights.summary(), "Artificial light • Outdoor");
    }

    #[test]
    fn test_outdoor_exposure() {
        let light = |direction: serde_json::Value| LightOutdoor {
            light_outdoor_id: 1,
            light_name: None,
            direction,
        };
        assert_eq!(light(serde_json::json!(["N", "E"])).exposure(), "N, E");
        assert_eq!(light(serde_json::json!("N")).exposure(), "Unknown");
        assert_eq!(light(serde_json::Value::Null).exposure(), "Unknown");
    }

    #[test]
    fn test_window_light_reads_embedded_rows() {
        let json = r#"{
            "light_window_id": 2,
            "light_name": "Bay window",
            "direction_code": "SW",
            "window_size": {"window_size": "large", "window_size_desc": "floor to ceiling"},
            "direction": {"full_name": "South-West"},
            "address": {"address_name": "Home"}
        }"#;
        let w: LightWindow = serde_json::from_str(json).expect("window light should parse");
        assert_eq!(w.direction_code.as_deref(), Some("SW"));
        assert_eq!(w.window_size.and_then(|s| s.window_size).as_deref(), Some("large"));
        assert_eq!(w.address.and_then(|a| a.address_name).as_deref(), Some("Home"));
    }

    #[test]
    fn test_inventory_row_tolerates_missing_columns() {
        let row: PlantInventoryRow =
            serde_json::from_str(r#"{"plant_id": 9}"#).expect("sparse row should parse");
        assert_eq!(row.plant_id, 9);
        assert!(row.plant_name.is_none());
    }
}
