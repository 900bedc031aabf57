use leptos::logging::warn;
use serde::{Deserialize, Serialize};

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";
const LOCAL_ACTIVITY_API_URL: &str = "http://localhost:10000";
const HOSTED_ACTIVITY_API_URL: &str = "https://plant-dashboard-github-io.onrender.com";

/// Runtime configuration, read from `window.ENV` set by the hosting page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub activity_api_url: String,
    pub views_base: String,
}

impl AppConfig {
    pub fn from_window() -> Self {
        let window = web_sys::window();
        let env = window
            .as_ref()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let lookup = |key: &str| {
            let env = env.as_ref()?;
            js_sys::Reflect::get(env, &key.into()).ok()?.as_string()
        };

        let (origin, hostname) = window
            .as_ref()
            .map(|w| {
                let location = w.location();
                (
                    location.origin().unwrap_or_default(),
                    location.hostname().unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        let config = Self::resolve(lookup, &origin, &hostname);
        if config.supabase_anon_key.is_empty() {
            warn!("SUPABASE_ANON_KEY is not set; backend requests will be rejected");
        }
        config
    }

    /// We support BOTH `SUPABASE_URL` and `supabase_url` style keys; upper case wins.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>, origin: &str, hostname: &str) -> Self {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&key.to_ascii_lowercase()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let is_local = hostname == "localhost" || hostname == "127.0.0.1";
        let default_activity = if is_local {
            LOCAL_ACTIVITY_API_URL
        } else {
            HOSTED_ACTIVITY_API_URL
        };

        Self {
            supabase_url: trim_slash(get("SUPABASE_URL").as_deref().unwrap_or(DEFAULT_SUPABASE_URL)),
            supabase_anon_key: get("SUPABASE_ANON_KEY").unwrap_or_default(),
            activity_api_url: trim_slash(get("ACTIVITY_API_URL").as_deref().unwrap_or(default_activity)),
            views_base: absolute_base(get("VIEWS_BASE").as_deref().unwrap_or("views"), origin),
        }
    }
}

fn trim_slash(s: &str) -> String {
    s.trim_end_matches('/').to_string()
}

/// Fragments are fetched with reqwest, which only takes absolute URLs, so a
/// relative base is resolved against the page origin.
fn absolute_base(base: &str, origin: &str) -> String {
    if reqwest::Url::parse(base).is_ok() {
        return trim_slash(base);
    }
    match reqwest::Url::parse(origin).and_then(|o| o.join(base)) {
        Ok(url) => trim_slash(url.as_str()),
        Err(_) => {
            warn!("VIEWS_BASE {:?} could not be resolved against {:?}", base, origin);
            trim_slash(base)
        }
    }
}
