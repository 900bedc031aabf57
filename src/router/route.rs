use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a navigable view ("dashboard", "inventory", ...).
///
/// The set of *registered* names is fixed by the registry, but any string is a
/// valid `ViewName`: unknown names navigate to the "coming soon" placeholder.
/// Names are percent-encoded wherever they become part of a path, so a `/`
/// inside one never reads as a separator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub(crate) struct ViewName(String);

impl ViewName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single path segment form.
    pub fn segment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }

    fn from_segment(segment: &str) -> Option<Self> {
        let name = urlencoding::decode(segment).ok()?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name))
    }
}

impl From<&str> for ViewName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ViewName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A navigation target: a view plus an optional record id for detail sub-views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Route {
    pub view: ViewName,
    pub id: Option<String>,
}

impl Route {
    pub fn view(view: impl Into<ViewName>) -> Self {
        Self {
            view: view.into(),
            id: None,
        }
    }

    pub fn detail(view: impl Into<ViewName>, id: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            id: Some(id.into()),
        }
    }

    /// Storage form: `view` or `view/id`.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{}", self.view.segment(), id),
            None => self.view.segment().into_owned(),
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        match key.split_once('/') {
            Some((view, id)) => {
                let view = ViewName::from_segment(view)?;
                let id = id.trim();
                if id.is_empty() {
                    Some(Self::view(view))
                } else {
                    Some(Self::detail(view, id))
                }
            }
            None => ViewName::from_segment(key).map(Self::view),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_key_roundtrip_for_detail() {
        let route = Route::detail("plant-detail", "42");
        assert_eq!(route.key(), "plant-detail/42");
        assert_eq!(Route::parse(&route.key()), Some(route));
    }

    #[test]
    fn test_route_parse_plain_view() {
        let route = Route::parse("inventory").expect("plain view should parse");
        assert_eq!(route.view.as_str(), "inventory");
        assert!(route.id.is_none());
    }

    #[test]
    fn test_route_parse_rejects_blank() {
        assert!(Route::parse("").is_none());
        assert!(Route::parse("   ").is_none());
        assert!(Route::parse("/42").is_none());
    }

    #[test]
    fn test_route_parse_trailing_slash_drops_empty_id() {
        assert_eq!(Route::parse("inventory/"), Some(Route::view("inventory")));
    }

    #[test]
    fn test_slash_in_view_name_survives_key_roundtrip() {
        let route = Route::view("a/b");
        assert_eq!(route.key(), "a%2Fb");
        assert_eq!(Route::parse(&route.key()), Some(route));

        let detail = Route::detail("a/b", "7");
        assert_eq!(Route::parse(&detail.key()), Some(detail));
        assert_eq!(ViewName::from("../admin").segment(), "..%2Fadmin");
    }

    #[test]
    fn test_view_name_serializes_as_plain_string() {
        let v = serde_json::to_value(ViewName::from("reports")).expect("should serialize");
        assert_eq!(v, serde_json::json!("reports"));
    }
}
