use super::dispatch::{InitError, ViewScope};
use super::route::ViewName;
use super::state::DEFAULT_VIEW;
use crate::util::capitalize;
use std::collections::HashMap;
use std::rc::Rc;

/// View-specific setup routine, run after the view's fragment is in the DOM.
pub(crate) type Initializer = Rc<dyn Fn(ViewScope) -> Result<(), InitError>>;

#[derive(Clone, Default)]
pub(crate) struct ViewSpec {
    title: String,
    tagline: String,
    /// Fragment path relative to the views base, without the `.html` suffix.
    fragment: Option<String>,
    initializer: Option<Initializer>,
    in_nav: bool,
    parent: Option<ViewName>,
}

impl ViewSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = tagline.into();
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn init(mut self, f: impl Fn(ViewScope) -> Result<(), InitError> + 'static) -> Self {
        self.initializer = Some(Rc::new(f));
        self
    }

    /// Show this view as a sidebar item.
    pub fn nav(mut self) -> Self {
        self.in_nav = true;
        self
    }

    /// Nests this view under another in the breadcrumb.
    pub fn parent(mut self, view: impl Into<ViewName>) -> Self {
        self.parent = Some(view.into());
        self
    }
}

/// One breadcrumb level. Only the last one is `current`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Crumb {
    pub view: ViewName,
    pub label: String,
    pub current: bool,
}

/// Static mapping from view name to fragment source and initializer.
pub(crate) struct ViewRegistry {
    fragment_base: String,
    views: HashMap<ViewName, ViewSpec>,
    order: Vec<ViewName>,
}

impl ViewRegistry {
    pub fn new(fragment_base: impl Into<String>) -> Self {
        let base: String = fragment_base.into();
        Self {
            fragment_base: base.trim_end_matches('/').to_string(),
            views: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(mut self, name: impl Into<ViewName>, spec: ViewSpec) -> Self {
        let name = name.into();
        if self.views.insert(name.clone(), spec).is_none() {
            self.order.push(name);
        }
        self
    }

    pub fn is_registered(&self, view: &ViewName) -> bool {
        self.views.contains_key(view)
    }

    /// Where to fetch the view's markup. Never fails, even for unknown views.
    pub fn fragment_path(&self, view: &ViewName) -> String {
        match self.views.get(view).and_then(|s| s.fragment.as_deref()) {
            Some(fragment) => format!("{}/{}.html", self.fragment_base, fragment),
            None => format!("{}/{}.html", self.fragment_base, view.segment()),
        }
    }

    pub fn initializer(&self, view: &ViewName) -> Option<Initializer> {
        self.views.get(view).and_then(|s| s.initializer.clone())
    }

    pub fn title(&self, view: &ViewName) -> String {
        match self.views.get(view) {
            Some(spec) if !spec.title.is_empty() => spec.title.clone(),
            _ => capitalize(view.as_str()),
        }
    }

    pub fn tagline(&self, view: &ViewName) -> String {
        match self.views.get(view) {
            Some(spec) if !spec.tagline.is_empty() => spec.tagline.clone(),
            _ => capitalize(view.as_str()),
        }
    }

    /// Home, then any parent views, then `view` itself.
    pub fn breadcrumb(&self, view: &ViewName) -> Vec<Crumb> {
        let home = ViewName::from(DEFAULT_VIEW);
        let mut trail = vec![view.clone()];
        let mut next = self.views.get(view).and_then(|s| s.parent.clone());
        while let Some(parent) = next {
            if parent == home || trail.contains(&parent) {
                break;
            }
            next = self.views.get(&parent).and_then(|s| s.parent.clone());
            trail.push(parent);
        }
        if *view != home {
            trail.push(home);
        }

        trail
            .into_iter()
            .rev()
            .map(|v| Crumb {
                label: self.title(&v),
                current: v == *view,
                view: v,
            })
            .collect()
    }

    /// Sidebar entries in registration order.
    pub fn nav_items(&self) -> Vec<(ViewName, String)> {
        self.order
            .iter()
            .filter(|name| self.views.get(*name).is_some_and(|s| s.in_nav))
            .map(|name| (name.clone(), self.title(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ViewRegistry {
        ViewRegistry::new("https://plants.test/views/")
            .register(
                "dashboard",
                ViewSpec::new("Dashboard")
                    .tagline("Your plant care overview")
                    .nav()
                    .init(|_| Ok(())),
            )
            .register("plant-detail", ViewSpec::new("Plant").fragment("inventory/plant-detail"))
            .register("inventory", ViewSpec::new("Inventory").nav())
    }

    #[test]
    fn test_fragment_path_defaults_to_view_name() {
        let r = registry();
        assert_eq!(
            r.fragment_path(&ViewName::from("dashboard")),
            "https://plants.test/views/dashboard.html"
        );
    }

    #[test]
    fn test_fragment_path_uses_override() {
        let r = registry();
        assert_eq!(
            r.fragment_path(&ViewName::from("plant-detail")),
            "https://plants.test/views/inventory/plant-detail.html"
        );
    }

    #[test]
    fn test_unknown_view_still_has_a_path_and_title() {
        let r = registry();
        let unknown = ViewName::from("greenhouse");
        assert!(!r.is_registered(&unknown));
        assert_eq!(r.fragment_path(&unknown), "https://plants.test/views/greenhouse.html");
        assert_eq!(r.title(&unknown), "Greenhouse");
        assert_eq!(r.tagline(&unknown), "Greenhouse");
        assert!(r.initializer(&unknown).is_none());
    }

    #[test]
    fn test_unknown_view_path_stays_under_base() {
        let r = registry();
        assert_eq!(
            r.fragment_path(&ViewName::from("../secrets")),
            "https://plants.test/views/..%2Fsecrets.html"
        );
    }

    fn labels(crumbs: &[Crumb]) -> Vec<(&str, bool)> {
        crumbs.iter().map(|c| (c.label.as_str(), c.current)).collect()
    }

    #[test]
    fn test_breadcrumb_levels() {
        let r = registry().register(
            "plant-detail",
            ViewSpec::new("Plant").fragment("inventory/plant-detail").parent("inventory"),
        );

        assert_eq!(
            labels(&r.breadcrumb(&ViewName::from("dashboard"))),
            vec![("Dashboard", true)]
        );
        assert_eq!(
            labels(&r.breadcrumb(&ViewName::from("inventory"))),
            vec![("Dashboard", false), ("Inventory", true)]
        );
        let detail = r.breadcrumb(&ViewName::from("plant-detail"));
        assert_eq!(
            labels(&detail),
            vec![("Dashboard", false), ("Inventory", false), ("Plant", true)]
        );
        assert_eq!(detail[1].view, ViewName::from("inventory"));
        assert_eq!(
            labels(&r.breadcrumb(&ViewName::from("greenhouse"))),
            vec![("Dashboard", false), ("Greenhouse", true)]
        );
    }

    #[test]
    fn test_breadcrumb_stops_on_parent_cycle() {
        let r = registry()
            .register("a", ViewSpec::new("A").parent("b"))
            .register("b", ViewSpec::new("B").parent("a"));
        assert_eq!(
            labels(&r.breadcrumb(&ViewName::from("a"))),
            vec![("Dashboard", false), ("B", false), ("A", true)]
        );
    }

    #[test]
    fn test_nav_items_keep_registration_order_and_skip_hidden() {
        let r = registry();
        let items: Vec<String> = r
            .nav_items()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(items, vec!["dashboard", "inventory"]);
    }

    #[test]
    fn test_reregistering_does_not_duplicate_nav_item() {
        let r = registry().register("dashboard", ViewSpec::new("Home").nav());
        assert_eq!(r.nav_items().len(), 2);
        assert_eq!(r.title(&ViewName::from("dashboard")), "Home");
    }
}
