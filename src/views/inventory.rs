use super::{error_state_markup, render_kpis, require};
use crate::dom::{self, escape_html, options_markup};
use crate::models::{NewPlant, PlantInventoryRow};
use crate::router::{InitError, Route, ViewScope};
use crate::state::Session;
use crate::util::{format_date, today_iso_local};
use futures_util::future::join;
use leptos::logging::{error, log, warn};
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

const ROWS_ID: &str = "plant-inventory-rows";
const NEW_PLANT_BTN_ID: &str = "new-plant-btn";
const NEW_PLANT_FORM_ID: &str = "new-plant-form";
const NEW_PLANT_SAVE_ID: &str = "new-plant-save";
const NEW_PLANT_STATUS_ID: &str = "new-plant-status";

pub(crate) fn rows_markup(plants: &[PlantInventoryRow]) -> String {
    if plants.is_empty() {
        return r#"<li class="empty-state">No plants.</li>"#.to_string();
    }

    plants
        .iter()
        .map(|p| {
            let icon = escape_html(p.plant_icon.as_deref().unwrap_or("default"));
            let last_activity = match p.last_activity_date.as_deref() {
                Some(d) if !d.is_empty() => format_date(Some(d)),
                _ => "no activity".to_string(),
            };
            format!(
                r#"<div class="table-row" data-plant-id="{id}"><div class="plant-name-cell"><div class="plant-name-icon"><img src="assets/images/icons/plants/{icon}.svg" alt="{icon}" class="plant-icon-svg"/></div><div class="plant-name-text"><div class="name">{name}</div><div class="species">{species}</div></div></div><div>{habitat}</div><div><span class="status-icon">{status_icon}</span><div class="tooltip-text">{status_label}</div></div><div class="plant-name-cell"><div class="plant-name-text"><div class="name">{last_activity}</div><div class="species">{last_label}</div></div></div><button type="button" class="plant-detail-btn" aria-label="Plant details"><img src="assets/images/icons/nav-detail.svg" alt="detail"></button></div>"#,
                id = p.plant_id,
                name = escape_html(p.plant_name.as_deref().unwrap_or("Unnamed Plant")),
                species = escape_html(p.species.as_deref().unwrap_or("Unknown Species")),
                habitat = escape_html(p.habitat.as_deref().unwrap_or("Habitat unknown")),
                status_icon = escape_html(p.status_icon.as_deref().unwrap_or("?")),
                status_label = escape_html(p.status_label.as_deref().unwrap_or("unknown")),
                last_activity = escape_html(&last_activity),
                last_label = escape_html(p.last_activity_label.as_deref().unwrap_or("-")),
            )
        })
        .collect()
}

/// Validates the inline new-plant form.
pub(crate) fn parse_new_plant(
    name: &str,
    plant_type_id: &str,
    habitat_id: &str,
    acquisition_date: &str,
    source: &str,
) -> Result<NewPlant, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Plant name is required".to_string());
    }
    let plant_type_id = plant_type_id
        .trim()
        .parse()
        .map_err(|_| "Select a plant type".to_string())?;
    let habitat_id = habitat_id
        .trim()
        .parse()
        .map_err(|_| "Select a habitat".to_string())?;
    let acquisition_date = match acquisition_date.trim() {
        "" => today_iso_local(),
        d => d.to_string(),
    };
    let source = source.trim();

    Ok(NewPlant {
        plant_name: name.to_string(),
        plant_type_id,
        habitat_id,
        acquisition_date,
        source_name: (!source.is_empty()).then(|| source.to_string()),
    })
}

async fn load_rows(scope: ViewScope, session: Session) {
    let api = session.client();
    let (plants, metrics) = join(api.get_plant_inventory(), api.get_data_metrics()).await;
    if !scope.is_current() {
        return;
    }
    if let Some(e) = plants.as_ref().err().or(metrics.as_ref().err()) {
        if session.handle_error(e) {
            return;
        }
    }

    match metrics {
        Ok(m) => render_kpis(&m),
        Err(e) => warn!("[inventory] metrics failed: {}", e),
    }

    match plants {
        Ok(plants) => {
            dom::set_html(ROWS_ID, &rows_markup(&plants));
            wire_detail_buttons(&scope);
        }
        Err(e) => {
            error!("[inventory] load failed: {}", e);
            dom::set_html(ROWS_ID, &error_state_markup(&format!("Could not load plants: {e}")));
        }
    }
}

fn wire_detail_buttons(scope: &ViewScope) {
    let Some(rows) = dom::by_id(ROWS_ID) else {
        return;
    };
    let navigator = scope.navigator().clone();
    dom::on_click_all(&rows, ".plant-detail-btn", move |btn| {
        let plant_id = btn
            .closest(".table-row")
            .ok()
            .flatten()
            .and_then(|row| row.get_attribute("data-plant-id"));
        if let Some(id) = plant_id {
            log!("Navigating to plant detail: {}", id);
            navigator.go(Route::detail("plant-detail", id));
        }
    });
}

fn wire_new_plant_form(scope: &ViewScope, session: Session) {
    let (Some(btn), Some(form)) = (dom::by_id(NEW_PLANT_BTN_ID), dom::by_id(NEW_PLANT_FORM_ID))
    else {
        return;
    };

    {
        let scope = scope.clone();
        let form = form.clone();
        dom::on_click(&btn, move |_| {
            let opening = form.has_attribute("hidden");
            let _ = form.toggle_attribute("hidden");
            if opening {
                populate_form(scope.clone(), session);
            }
        });
    }

    if let Some(save) = dom::by_id(NEW_PLANT_SAVE_ID) {
        let scope = scope.clone();
        dom::on_click(&save, move |ev| {
            ev.prevent_default();
            let plant = match parse_new_plant(
                &dom::input_value("plant-name"),
                &dom::input_value("plant-type"),
                &dom::input_value("habitat-select"),
                &dom::input_value("acquisition-date"),
                &dom::input_value("plant-source"),
            ) {
                Ok(p) => p,
                Err(msg) => {
                    dom::set_text(NEW_PLANT_STATUS_ID, &msg);
                    return;
                }
            };

            let scope = scope.clone();
            let form = form.clone();
            dom::set_text(NEW_PLANT_STATUS_ID, "Saving...");
            spawn_local(async move {
                let result = session.client().add_plant(&plant).await;
                if !scope.is_current() {
                    return;
                }
                match result {
                    Ok(_) => {
                        log!("[inventory] created plant {}", plant.plant_name);
                        dom::set_text(NEW_PLANT_STATUS_ID, "Plant created successfully!");
                        let _ = form.set_attribute("hidden", "");
                        load_rows(scope, session).await;
                    }
                    Err(e) if session.handle_error(&e) => {}
                    Err(e) => {
                        error!("[inventory] create failed: {}", e);
                        dom::set_text(NEW_PLANT_STATUS_ID, &format!("Failed to create plant: {e}"));
                    }
                }
            });
        });
    }
}

fn populate_form(scope: ViewScope, session: Session) {
    spawn_local(async move {
        let api = session.client();
        let (types, habitats) = join(api.get_plant_types(), api.get_habitats()).await;
        if !scope.is_current() {
            return;
        }

        match (types, habitats) {
            (Ok(types), Ok(habitats)) => {
                let labels: Vec<(String, String)> = types
                    .iter()
                    .map(|t| (t.plant_type_id.to_string(), t.label()))
                    .collect();
                dom::set_html(
                    "plant-type",
                    &options_markup(
                        "Select a plant type",
                        labels.iter().map(|(v, l)| (v.clone(), l.as_str())),
                    ),
                );
                dom::set_html(
                    "habitat-select",
                    &options_markup(
                        "Select a habitat",
                        habitats
                            .iter()
                            .map(|h| (h.habitat_id.to_string(), h.habitat_name.as_str())),
                    ),
                );
                if let Some(date) = dom::by_id("acquisition-date")
                    .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
                {
                    if date.value().is_empty() {
                        date.set_value(&today_iso_local());
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                if session.handle_error(&e) {
                    return;
                }
                error!("[inventory] form data failed: {}", e);
                dom::set_text(NEW_PLANT_STATUS_ID, "Error loading form data");
            }
        }
    });
}

pub(super) fn init(scope: ViewScope, session: Session) -> Result<(), InitError> {
    require(ROWS_ID)?;
    wire_new_plant_form(&scope, session);
    spawn_local(load_rows(scope, session));
    Ok(())
}
