use super::require;
use crate::dom;
use crate::models::PlantDetail;
use crate::router::{InitError, Route, ViewScope};
use crate::state::Session;
use crate::util::capitalize;
use leptos::logging::{error, log};
use leptos::task::spawn_local;

const NAME_ID: &str = "plant-detail-name";

/// `(element id, text)` pairs for the detail card.
pub(crate) fn detail_fields(detail: &PlantDetail) -> [(&'static str, String); 4] {
    let text = |v: &Option<String>| capitalize(v.as_deref().unwrap_or(""));
    [
        (NAME_ID, text(&detail.plant_name)),
        ("plant-detail-category", text(&detail.plant_category)),
        ("plant-detail-species", text(&detail.species)),
        ("plant-detail-habitat", text(&detail.habitat)),
    ]
}

pub(super) fn init(scope: ViewScope, session: Session) -> Result<(), InitError> {
    let plant_id = scope.require_id()?.to_string();
    require(NAME_ID)?;
    let api = session.client();

    if let Some(back) = dom::by_id("plant-detail-back") {
        let navigator = scope.navigator().clone();
        dom::on_click(&back, move |_| navigator.go(Route::view("inventory")));
    }

    spawn_local(async move {
        let result = api.get_plant_details(&plant_id).await;
        if !scope.is_current() {
            return;
        }
        match result {
            Ok(detail) => {
                for (id, text) in detail_fields(&detail) {
                    dom::set_text(id, &text);
                }
                log!("Plant details view initialized for {}", plant_id);
            }
            Err(e) if session.handle_error(&e) => {}
            Err(e) => {
                error!("[plant-detail] load failed for {}: {}", plant_id, e);
                dom::set_text(NAME_ID, "Plant not found");
            }
        }
    });

    Ok(())
}
