use crate::api::activity::record_activity;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner, Textarea,
};
use crate::models::{display_name_or_guest, ActivePlant, ActivityType, NewActivity};
use crate::router::{popstate_json, NavTrigger, Route, ViewRouter, VIEW_CONTAINER_ID};
use crate::state::AppContext;
use crate::util::today_iso_local;
use futures_util::future::join;
use leptos::ev;
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.sign_in(&email_val, &password_val).await {
                Ok(session) => {
                    api_client.save_session(&session);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(session.user));
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    warn!("[login] sign in failed: {}", e);
                    error.set(Some(e.message));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <span class="text-sm font-medium text-foreground">"Plant Hub"</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Sign in"</CardTitle>
                        <CardDescription class="text-xs">"Use your email and password to see your plants."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert class="border-destructive/30">
                                                <AlertDescription class="text-destructive text-xs">
                                                    {e}
                                                </AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub(crate) fn RootAuthed(router: StoredValue<ViewRouter, LocalStorage>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <Shell router=router />
        </Show>
    }
}

/// Hands each back/forward entry's state to `on_state` while the calling
/// owner is alive.
fn forward_popstate(on_state: impl Fn(Option<String>) + 'static) {
    let handle = window_event_listener(ev::popstate, move |ev: web_sys::PopStateEvent| {
        on_state(popstate_json(&ev));
    });
    on_cleanup(move || handle.remove());
}

#[component]
pub(crate) fn Shell(router: StoredValue<ViewRouter, LocalStorage>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let active_view = app_state.0.active_view;
    let current_view = app_state.0.current_view;
    let current_user = app_state.0.current_user;
    let activity_open = app_state.0.activity_open;

    let nav_items = router.with_value(|r| r.registry().nav_items());

    let title = move || {
        current_view
            .get()
            .map(|v| router.with_value(|r| r.registry().title(&v)))
            .unwrap_or_default()
    };
    let tagline = move || {
        current_view
            .get()
            .map(|v| router.with_value(|r| r.registry().tagline(&v)))
            .unwrap_or_default()
    };

    let breadcrumb = move || {
        current_view
            .get()
            .map(|v| router.with_value(|r| r.registry().breadcrumb(&v)))
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, crumb)| {
                let separator = (i > 0).then(|| view! { <span class="breadcrumb-separator">"/"</span> });
                let item = if crumb.current {
                    view! { <span class="breadcrumb-item current" aria-current="page">{crumb.label}</span> }
                        .into_any()
                } else {
                    let target = crumb.view;
                    view! {
                        <button
                            type="button"
                            class="breadcrumb-item hover:text-foreground"
                            on:click=move |_| {
                                let route = Route::view(target.clone());
                                router.with_value(|r| r.navigator().go(route));
                            }
                        >
                            {crumb.label}
                        </button>
                    }
                    .into_any()
                };
                view! { {separator} {item} }
            })
            .collect_view()
    };

    // The session may predate the cached user (e.g. a new tab).
    if current_user.get_untracked().is_none() {
        let session = app_state.0.session();
        spawn_local(async move {
            match session.client().current_user().await {
                Ok(user) => current_user.set(user),
                Err(e) if session.handle_error(&e) => {}
                Err(e) => warn!("[shell] could not load user: {}", e),
            }
        });
    }

    forward_popstate(move |state| {
        router.with_value(|r| {
            if !r.handle_popstate(state.as_deref()) {
                log!("Ignoring history entry without a view");
            }
        });
    });

    // Runs once, after `#view-container` is in the DOM.
    Effect::new(move |_| router.with_value(|r| r.start()));

    let on_sign_out = move |_: web_sys::MouseEvent| {
        let confirmed = window()
            .confirm_with_message("Are you sure you want to sign out?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let mut api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = api.sign_out().await {
                warn!("[shell] sign out request failed: {}", e);
            }
            app_state.0.api_client.set(api);
            current_user.set(None);
            let _ = window().location().set_href("/login");
        });
    };

    let nav = nav_items
        .into_iter()
        .map(|(name, label)| {
            let target = name.clone();
            let is_active = Memo::new(move |_| active_view.get().as_ref() == Some(&name));
            view! {
                <li>
                    <button
                        type="button"
                        class=move || {
                            if is_active.get() {
                                "nav-item active w-full rounded-md px-3 py-2 text-left text-sm bg-accent text-accent-foreground"
                            } else {
                                "nav-item w-full rounded-md px-3 py-2 text-left text-sm text-muted-foreground hover:bg-accent/50"
                            }
                        }
                        aria-current=move || is_active.get().then_some("page")
                        on:click=move |_| {
                            let route = Route::view(target.clone());
                            router.with_value(|r| r.go(route, NavTrigger::User));
                        }
                    >
                        {label}
                    </button>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="flex min-h-screen bg-background text-foreground">
            <aside class="w-56 shrink-0 border-r border-border p-3">
                <div class="mb-4 px-3 text-sm font-semibold">"Plant Hub"</div>
                <nav>
                    <ul class="flex flex-col gap-1">{nav}</ul>
                </nav>
            </aside>

            <main class="flex min-w-0 flex-1 flex-col">
                <header class="flex items-center justify-between gap-4 border-b border-border px-6 py-3">
                    <div class="min-w-0">
                        <nav class="breadcrumb flex items-center gap-1.5 text-xs text-muted-foreground" aria-label="Breadcrumb">
                            {breadcrumb}
                        </nav>
                        <h1 class="truncate text-lg font-semibold">{title}</h1>
                        <p class="truncate text-xs text-muted-foreground">{tagline}</p>
                    </div>

                    <div class="flex items-center gap-3">
                        <Button size=ButtonSize::Sm on:click=move |_| activity_open.set(true)>
                            "New activity"
                        </Button>

                        <div class="flex flex-col items-end text-xs">
                            <span class="font-medium">
                                {move || current_user.with(|u| display_name_or_guest(u.as_ref()))}
                            </span>
                            <span class="text-muted-foreground">
                                {move || current_user.with(|u| u.as_ref().and_then(|u| u.email.clone()).unwrap_or_default())}
                            </span>
                        </div>

                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_sign_out>
                            "Sign out"
                        </Button>
                    </div>
                </header>

                <div id=VIEW_CONTAINER_ID class="flex-1 overflow-auto p-6"></div>
            </main>

            <Show when=move || activity_open.get() fallback=|| ().into_view()>
                <NewActivityModal router=router />
            </Show>
        </div>
    }
}

/// Validates the new-activity form.
pub(crate) fn parse_activity_form(
    plant_id: &str,
    activity_type_code: &str,
    activity_date: &str,
    quantifier: &str,
    notes: &str,
) -> Result<NewActivity, String> {
    let plant_id = plant_id
        .trim()
        .parse()
        .map_err(|_| "Select a plant".to_string())?;
    let activity_type_code = activity_type_code.trim();
    if activity_type_code.is_empty() {
        return Err("Select an activity type".to_string());
    }
    let activity_date = activity_date.trim();
    if activity_date.is_empty() {
        return Err("Pick a date".to_string());
    }
    let quantifier = match quantifier.trim() {
        "" => None,
        q => Some(
            q.parse::<f64>()
                .map_err(|_| "Quantity must be a number".to_string())?,
        ),
    };
    let notes = notes.trim();

    Ok(NewActivity {
        plant_id,
        activity_type_code: activity_type_code.to_string(),
        activity_date: activity_date.to_string(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        quantifier,
    })
}

const SELECT_CLASS: &str = "border-input flex h-8 w-full rounded-md border bg-transparent px-3 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50";

#[component]
fn NewActivityModal(router: StoredValue<ViewRouter, LocalStorage>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let open = app_state.0.activity_open;

    let plants: RwSignal<Vec<ActivePlant>> = RwSignal::new(vec![]);
    let activity_types: RwSignal<Vec<ActivityType>> = RwSignal::new(vec![]);

    let plant_id: RwSignal<String> = RwSignal::new(String::new());
    let activity_type: RwSignal<String> = RwSignal::new(String::new());
    let activity_date: RwSignal<String> = RwSignal::new(today_iso_local());
    let quantifier: RwSignal<String> = RwSignal::new(String::new());
    let notes: RwSignal<String> = RwSignal::new(String::new());

    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let session = app_state.0.session();

    {
        let api = session.client();
        spawn_local(async move {
            match join(api.get_active_plants(), api.get_activity_types()).await {
                (Ok(p), Ok(t)) => {
                    plants.set(p);
                    activity_types.set(t);
                }
                (Err(e), _) | (_, Err(e)) => {
                    if session.handle_error(&e) {
                        return;
                    }
                    error!("[activity] form data failed: {}", e);
                    error.set(Some("Error loading form data".to_string()));
                }
            }
        });
    }

    let on_submit = move |_: web_sys::MouseEvent| {
        if loading.get_untracked() {
            return;
        }

        let activity = match parse_activity_form(
            &plant_id.get_untracked(),
            &activity_type.get_untracked(),
            &activity_date.get_untracked(),
            &quantifier.get_untracked(),
            &notes.get_untracked(),
        ) {
            Ok(a) => a,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };

        let api = session.client();
        let service = app_state.0.activity_client.get_value();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match record_activity(&api, &service, &activity).await {
                Ok(()) => {
                    open.set(false);
                    router.with_value(|r| r.reload());
                }
                Err(e) if session.handle_error(&e) => {}
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    let select_value = |sig: RwSignal<String>| {
        move |ev: web_sys::Event| sig.set(event_target_value(&ev))
    };

    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
            <div class="w-full max-w-md rounded-md border border-border bg-background p-4 shadow-lg">
                <div class="mb-3 space-y-1">
                    <div class="text-sm font-medium">"New activity"</div>
                    <div class="text-xs text-muted-foreground">"Log care for one of your plants."</div>
                </div>

                <div class="space-y-3">
                    <div class="space-y-1">
                        <Label html_for="activity-plant" class="text-xs">"Plant"</Label>
                        <select id="activity-plant" class=SELECT_CLASS prop:value=move || plant_id.get() on:change=select_value(plant_id)>
                            <option value="">"Select a plant"</option>
                            {move || plants.get().into_iter().map(|p| view! {
                                <option value=p.plant_id.to_string()>{p.full_plant_name()}</option>
                            }).collect_view()}
                        </select>
                    </div>

                    <div class="space-y-1">
                        <Label html_for="activity-type" class="text-xs">"Activity"</Label>
                        <select id="activity-type" class=SELECT_CLASS prop:value=move || activity_type.get() on:change=select_value(activity_type)>
                            <option value="">"Select an activity"</option>
                            {move || activity_types.get().into_iter().map(|t| view! {
                                <option value=t.activity_type_code>{t.activity_label}</option>
                            }).collect_view()}
                        </select>
                    </div>

                    <div class="grid grid-cols-2 gap-3">
                        <div class="space-y-1">
                            <Label html_for="activity-date" class="text-xs">"Date"</Label>
                            <Input id="activity-date" r#type="date" bind_value=activity_date required=true class="h-8 text-sm" />
                        </div>
                        <div class="space-y-1">
                            <Label html_for="activity-quantifier" class="text-xs">"Quantity"</Label>
                            <Input id="activity-quantifier" r#type="number" bind_value=quantifier class="h-8 text-sm" />
                        </div>
                    </div>

                    <div class="space-y-1">
                        <Label html_for="activity-notes" class="text-xs">"Notes"</Label>
                        <Textarea id="activity-notes" bind_value=notes class="text-sm" />
                    </div>

                    <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                        {move || error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                            </Alert>
                        })}
                    </Show>

                    <div class="flex items-center justify-end gap-2 pt-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                            on:click=move |_| open.set(false)
                        >
                            "Cancel"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                            on:click=on_submit
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Saving..." } else { "Save" }}
                            </span>
                        </Button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_activity_form() {
        let a = parse_activity_form("3", "watering", "2025-05-01", "250", " misted too ")
            .expect("valid form");
        assert_eq!(a.plant_id, 3);
        assert_eq!(a.activity_type_code, "watering");
        assert_eq!(a.quantifier, Some(250.0));
        assert_eq!(a.notes.as_deref(), Some("misted too"));
    }

    #[test]
    fn test_parse_activity_form_optional_fields() {
        let a = parse_activity_form("3", "pruning", "2025-05-01", "", "").expect("valid form");
        assert!(a.quantifier.is_none());
        assert!(a.notes.is_none());
    }

    #[test]
    fn test_parse_activity_form_errors() {
        assert_eq!(
            parse_activity_form("", "watering", "2025-05-01", "", "").unwrap_err(),
            "Select a plant"
        );
        assert_eq!(
            parse_activity_form("3", "", "2025-05-01", "", "").unwrap_err(),
            "Select an activity type"
        );
        assert_eq!(
            parse_activity_form("3", "watering", "", "", "").unwrap_err(),
            "Pick a date"
        );
        assert_eq!(
            parse_activity_form("3", "watering", "2025-05-01", "lots", "").unwrap_err(),
            "Quantity must be a number"
        );
    }
}
