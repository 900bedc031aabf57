use super::{empty_state_markup, error_state_markup, require};
use crate::dom::{self, escape_html};
use crate::models::{Address, Habitat, HabitatLights, HumidityLevel};
use crate::router::{InitError, ViewScope};
use crate::state::Session;
use futures_util::future::join;
use leptos::logging::{error, log, warn};
use leptos::task::spawn_local;
use std::str::FromStr;
use strum::{AsRefStr, EnumString};
use wasm_bindgen::JsCast;

const TAB_CONTENT_ID: &str = "config-tab-content";
const HABITAT_DETAIL_ID: &str = "habitat-detail";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ConfigTab {
    #[default]
    Habitat,
    Address,
}

pub(crate) fn habitats_markup(habitats: &[Habitat]) -> String {
    if habitats.is_empty() {
        return empty_state_markup("No habitats configured.");
    }
    let items: String = habitats
        .iter()
        .enumerate()
        .map(|(i, h)| {
            format!(
                r#"<li class="config-item{active}" data-habitat-id="{id}"><span class="name">{name}</span><span class="habitat-info">Loading details...</span></li>"#,
                active = if i == 0 { " active" } else { "" },
                id = h.habitat_id,
                name = escape_html(&h.habitat_name),
            )
        })
        .collect();
    format!(r#"<ul class="config-list">{items}</ul>"#)
}

pub(crate) fn humidity_text(level: Option<&HumidityLevel>) -> String {
    let Some(level) = level else {
        return "Not set".to_string();
    };
    match (level.humidity_level.as_deref(), level.humidity_level_desc.as_deref()) {
        (Some(l), Some(d)) if !d.is_empty() => format!("{l} ({d})"),
        (Some(l), _) => l.to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => "Not set".to_string(),
    }
}

fn light_item(title: &str, kind: &str, details: &[(&str, String)]) -> String {
    let details: Vec<String> = details
        .iter()
        .map(|(label, value)| format!("{label}: {}", escape_html(value)))
        .collect();
    format!(
        r#"<div class="habitat-light-item"><div class="habitat-light-item-header"><span class="habitat-light-item-title">{}</span><span class="habitat-light-item-kind">({kind})</span></div><div class="habitat-light-item-details">{}</div></div>"#,
        escape_html(title),
        details.join("<br>"),
    )
}

pub(crate) fn light_sources_markup(lights: &HabitatLights) -> String {
    if lights.is_empty() {
        return empty_state_markup("No light sources configured yet.");
    }

    let or = |v: &Option<String>, fallback: &str| v.clone().unwrap_or_else(|| fallback.to_string());
    let mut html = String::new();
    for l in &lights.artificial {
        let strength = l
            .light_artificial_strength
            .as_ref()
            .and_then(|s| s.light_artificial_strength.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let schedule = format!("{} - {}", or(&l.start_time, "Not set"), or(&l.end_time, "Not set"));
        html.push_str(&light_item(
            &or(&l.light_name, "Unnamed Light"),
            "Artificial Light",
            &[("Strength", strength), ("Schedule", schedule)],
        ));
    }
    for l in &lights.window {
        let size = l
            .window_size
            .as_ref()
            .and_then(|s| s.window_size.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let location = l
            .address
            .as_ref()
            .and_then(|a| a.address_name.clone())
            .unwrap_or_else(|| "Location not set".to_string());
        html.push_str(&light_item(
            &or(&l.light_name, "Unnamed Window"),
            "Window",
            &[
                ("Direction", or(&l.direction_code, "Unknown")),
                ("Size", size),
                ("Location", location),
            ],
        ));
    }
    for l in &lights.outdoor {
        html.push_str(&light_item(
            &or(&l.light_name, "Unnamed Outdoor Area"),
            "Outdoor",
            &[("Exposure", l.exposure())],
        ));
    }
    html
}

pub(crate) fn habitat_detail_markup(
    h: &Habitat,
    humidity: Option<&HumidityLevel>,
    lights: &HabitatLights,
) -> String {
    format!(
        r#"<h3>{}</h3><p class="notes">{}</p><p class="humidity">Humidity: {}</p><div id="all-lights-list">{}</div>"#,
        escape_html(&h.habitat_name),
        escape_html(h.notes.as_deref().unwrap_or("No notes.")),
        escape_html(&humidity_text(humidity)),
        light_sources_markup(lights),
    )
}

pub(crate) fn addresses_markup(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return empty_state_markup("No addresses configured.");
    }
    let items: String = addresses
        .iter()
        .map(|a| {
            let place: Vec<&str> = [a.city.as_deref(), a.country.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect();
            format!(
                r#"<li class="config-item" data-address-id="{}"><span class="name">{}</span><span class="place">{}</span></li>"#,
                a.address_id,
                escape_html(&a.address_name),
                escape_html(&place.join(", ")),
            )
        })
        .collect();
    format!(r#"<ul class="config-list">{items}</ul>"#)
}

fn mark_active(root: &web_sys::Element, tab: ConfigTab) {
    let Ok(tabs) = root.query_selector_all(".config-tab") else {
        return;
    };
    for i in 0..tabs.length() {
        let Some(el) = tabs.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let active = el.get_attribute("data-tab").as_deref() == Some(tab.as_ref());
        let _ = el.class_list().toggle_with_force("active", active);
    }
}

fn mark_selected_habitat(list: &web_sys::Element, habitat_id: i64) {
    let Ok(items) = list.query_selector_all("[data-habitat-id]") else {
        return;
    };
    let id = habitat_id.to_string();
    for i in 0..items.length() {
        let Some(el) = items.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let selected = el.get_attribute("data-habitat-id").as_deref() == Some(id.as_str());
        let _ = el.class_list().toggle_with_force("active", selected);
    }
}

fn set_habitat_info(habitat_id: i64, text: &str) {
    let Some(list) = dom::by_id(TAB_CONTENT_ID) else {
        return;
    };
    let selector = format!(r#"[data-habitat-id="{habitat_id}"] .habitat-info"#);
    if let Ok(Some(info)) = list.query_selector(&selector) {
        info.set_text_content(Some(text));
    }
}

fn load_tab(scope: ViewScope, session: Session, tab: ConfigTab) {
    dom::set_html(
        TAB_CONTENT_ID,
        &format!(r#"<p class="view-loading">Loading {}...</p>"#, tab.as_ref()),
    );

    spawn_local(async move {
        let api = session.client();
        let loaded = match tab {
            ConfigTab::Habitat => api
                .get_habitats()
                .await
                .map(|h| (habitats_markup(&h), h.first().map(|h| h.habitat_id))),
            ConfigTab::Address => api.get_addresses().await.map(|a| (addresses_markup(&a), None)),
        };
        if !scope.is_current() {
            return;
        }
        let (html, first_habitat) = match loaded {
            Ok(loaded) => loaded,
            Err(e) if session.handle_error(&e) => return,
            Err(e) => {
                error!("[configuration] {} tab failed: {}", tab.as_ref(), e);
                let html = error_state_markup(&format!("Failed to load {} content. {e}", tab.as_ref()));
                (html, None)
            }
        };
        dom::set_html(TAB_CONTENT_ID, &html);
        if tab == ConfigTab::Habitat {
            wire_habitat_items(&scope, session);
            if let Some(id) = first_habitat {
                load_habitat(scope, session, id);
            }
        }
    });
}

/// Loads one habitat with its humidity level and light sources into the detail pane.
fn load_habitat(scope: ViewScope, session: Session, habitat_id: i64) {
    if let Some(list) = dom::by_id(TAB_CONTENT_ID) {
        mark_selected_habitat(&list, habitat_id);
    }

    spawn_local(async move {
        let api = session.client();
        let (habitat, lights) = join(api.get_habitat(habitat_id), api.get_habitat_lights(habitat_id)).await;
        let detail = match (habitat, lights) {
            (Ok(h), Ok(lights)) => api
                .get_humidity_level(h.humidity_level_id)
                .await
                .map(|level| (h, level, lights)),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        if !scope.is_current() {
            return;
        }
        match detail {
            Ok((h, level, lights)) => {
                set_habitat_info(habitat_id, &lights.summary());
                dom::set_html(
                    HABITAT_DETAIL_ID,
                    &habitat_detail_markup(&h, level.as_ref(), &lights),
                );
                log!("[configuration] habitat {} loaded", habitat_id);
            }
            Err(e) if session.handle_error(&e) => {}
            Err(e) => {
                warn!("[configuration] habitat {} failed: {}", habitat_id, e);
                dom::set_html(
                    HABITAT_DETAIL_ID,
                    &error_state_markup("Error loading habitat details"),
                );
            }
        }
    });
}

fn wire_habitat_items(scope: &ViewScope, session: Session) {
    let Some(list) = dom::by_id(TAB_CONTENT_ID) else {
        return;
    };
    let scope = scope.clone();
    dom::on_click_all(&list, "[data-habitat-id]", move |el| {
        let Some(id) = el
            .get_attribute("data-habitat-id")
            .and_then(|v| v.parse::<i64>().ok())
        else {
            return;
        };
        load_habitat(scope.clone(), session, id);
    });
}

pub(super) fn init(scope: ViewScope, session: Session) -> Result<(), InitError> {
    require(TAB_CONTENT_ID)?;
    let root = dom::by_id(crate::router::VIEW_CONTAINER_ID)
        .ok_or_else(|| InitError::MissingElement(crate::router::VIEW_CONTAINER_ID.to_string()))?;

    {
        let scope = scope.clone();
        let tabs_root = root.clone();
        dom::on_click_all(&root, ".config-tab", move |el| {
            let name = el.get_attribute("data-tab").unwrap_or_default();
            match ConfigTab::from_str(&name) {
                Ok(tab) => {
                    mark_active(&tabs_root, tab);
                    load_tab(scope.clone(), session, tab);
                }
                Err(_) => warn!("[configuration] unknown tab {:?}", name),
            }
        });
    }

    mark_active(&root, ConfigTab::default());
    load_tab(scope, session, ConfigTab::default());
    Ok(())
}
