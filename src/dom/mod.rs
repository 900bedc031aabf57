//! Thin helpers over `web_sys` for stamping data into fetched fragments.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn by_id(id: &str) -> Option<web_sys::Element> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
}

pub(crate) fn set_text(id: &str, text: &str) -> bool {
    match by_id(id) {
        Some(el) => {
            el.set_text_content(Some(text));
            true
        }
        None => false,
    }
}

pub(crate) fn set_html(id: &str, html: &str) -> bool {
    match by_id(id) {
        Some(el) => {
            el.set_inner_html(html);
            true
        }
        None => false,
    }
}

/// Attaches a click listener for the lifetime of the element.
pub(crate) fn on_click(el: &web_sys::Element, f: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(f);
    let _ = el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
    // Fragments are replaced wholesale on navigation; the listener dies with its node.
    cb.forget();
}

pub(crate) fn on_click_all(
    root: &web_sys::Element,
    selector: &str,
    f: impl Fn(web_sys::Element) + Clone + 'static,
) {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let target = el.clone();
        let f = f.clone();
        on_click(&el, move |_| f(target.clone()));
    }
}

pub(crate) fn input_value(id: &str) -> String {
    let Some(el) = by_id(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        return input.value();
    }
    if let Some(select) = el.dyn_ref::<web_sys::HtmlSelectElement>() {
        return select.value();
    }
    if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return area.value();
    }
    String::new()
}

pub(crate) fn reload_page() {
    if let Some(w) = web_sys::window() {
        let _ = w.location().reload();
    }
}

/// `<option>` list for a select, with a leading empty choice.
pub(crate) fn options_markup<'a>(
    placeholder: &str,
    items: impl IntoIterator<Item = (String, &'a str)>,
) -> String {
    let mut out = format!(r#"<option value="">{}</option>"#, escape_html(placeholder));
    for (value, label) in items {
        out.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            escape_html(&value),
            escape_html(label)
        ));
    }
    out
}
