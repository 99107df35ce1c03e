/// Side panel: the window/group/tab tree with drag and drop

use std::cell::RefCell;
use std::rc::Rc;

use patternfly_yew::prelude::{Alert, AlertType};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::chrome::{
    ChangeSubscription, ChromeHost, current_window_id, extension_id, fetch_snapshot,
    load_settings, save_settings,
};
use crate::error::{HostError, TreeError};
use crate::session::Session;
use crate::settings::Settings;
use crate::tree::TreeItem;
use crate::ui::components::{DragSignal, TreeNode};
use crate::ui::controls::Toolbar;

type SharedSession = Rc<RefCell<Session<ChromeHost>>>;

#[function_component(SidePanel)]
pub fn side_panel() -> Html {
    let error = use_state(|| None::<String>);
    let query = use_state(String::new);
    let window_id = use_state(|| None::<i32>);
    let ext_id = use_state(|| AttrValue::from(extension_id()));
    let trigger = use_force_update();

    let session: SharedSession = {
        let error = error.setter();
        use_mut_ref(move || {
            let host = ChromeHost::new(move |e: HostError| error.set(Some(e.to_string())));
            Session::new(host, Settings::default())
        })
    };

    // Subscribe to browser changes on mount, unsubscribe on unmount
    {
        let session = session.clone();
        let trigger = trigger.clone();
        let error = error.setter();
        let window_id = window_id.setter();

        use_effect_with((), move |_| {
            session.borrow_mut().init();

            let subscription = {
                let session = session.clone();
                let trigger = trigger.clone();
                let error = error.clone();
                ChangeSubscription::subscribe(move |event| {
                    let stale = session.borrow_mut().on_change(event);
                    if stale {
                        refresh(session.clone(), trigger.clone(), error.clone());
                    }
                })
            };

            refresh(session.clone(), trigger.clone(), error.clone());

            {
                let session = session.clone();
                let trigger = trigger.clone();
                spawn_local(async move {
                    match load_settings().await {
                        Ok(settings) => {
                            session.borrow_mut().set_settings(settings);
                            trigger.force_update();
                        }
                        Err(e) => log::warn!("using default settings: {}", e),
                    }
                    match current_window_id().await {
                        Ok(id) => window_id.set(Some(id)),
                        Err(e) => error.set(Some(e.to_string())),
                    }
                });
            }

            move || {
                drop(subscription);
                session.borrow_mut().teardown();
            }
        });
    }

    let on_drag = {
        let session = session.clone();
        let trigger = trigger.clone();
        let error = error.setter();

        Callback::from(move |signal: DragSignal| {
            if let DragSignal::Start(_) = signal {
                error.set(None);
            }
            let changed = {
                let mut session = session.borrow_mut();
                match signal {
                    DragSignal::Start(id) => session.drag_start(id),
                    DragSignal::Over(id) => session.drag_over(id),
                    DragSignal::Drop(over) => {
                        let sent = session.drop_on(over);
                        log::debug!("drop sent {} commands", sent);
                        true
                    }
                    DragSignal::End => {
                        // Drops outside any row only produce dragend
                        let dragging = session.is_dragging();
                        session.cancel_drag();
                        dragging
                    }
                }
            };
            if changed {
                trigger.force_update();
            }
        })
    };

    let on_search = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };

    let on_sort = window_action(
        session.clone(),
        *window_id,
        error.setter(),
        Session::<ChromeHost>::sort_window,
    );
    let on_ungroup = window_action(
        session.clone(),
        *window_id,
        error.setter(),
        Session::<ChromeHost>::ungroup_window,
    );

    let on_dedupe = {
        let session = session.clone();
        let error = error.setter();
        Callback::from(move |_| {
            error.set(None);
            let sent = session.borrow().deduplicate();
            log::info!("closing duplicates: {} commands", sent);
        })
    };

    let on_toggle_incognito = {
        let session = session.clone();
        let trigger = trigger.clone();
        let error = error.setter();

        Callback::from(move |_| {
            let settings = {
                let mut session = session.borrow_mut();
                let mut settings = session.settings().clone();
                settings.toggle_incognito_windows();
                session.set_settings(settings.clone());
                settings
            };
            trigger.force_update();

            let error = error.clone();
            spawn_local(async move {
                if let Err(e) = save_settings(&settings).await {
                    log::error!("{}", e);
                    error.set(Some(format!("Failed to save settings: {}", e)));
                }
            });
        })
    };

    let current = session.borrow();
    let matches = Rc::new(current.matching_tabs(&query));
    let windows: Vec<TreeItem> = current
        .visible_windows()
        .into_iter()
        .map(|window| TreeItem::Window(window.clone()))
        .collect();
    let dragged = current.dragged();
    let show_incognito = current.settings().show_incognito_windows;
    drop(current);

    html! {
        <div class="side-panel">
            <Toolbar
                query={AttrValue::from((*query).clone())}
                {on_search}
                {on_sort}
                {on_dedupe}
                {on_ungroup}
                {show_incognito}
                {on_toggle_incognito}
                disabled={window_id.is_none()}
            />

            if let Some(err) = (*error).clone() {
                <div class="message-top-margin">
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err}
                    </Alert>
                </div>
            }

            if windows.is_empty() {
                <div class="empty-state">
                    <p>{"No windows to show."}</p>
                </div>
            } else {
                <ul class={classes!("tree", dragged.is_some().then_some("tree-dragging"))}>
                    {for windows.iter().map(|item| html! {
                        <TreeNode
                            key={item.id().to_string()}
                            item={item.clone()}
                            extension_id={(*ext_id).clone()}
                            matches={matches.clone()}
                            {dragged}
                            on_drag={on_drag.clone()}
                        />
                    })}
                </ul>
            }
        </div>
    }
}

/// Re-fetch the browser state and re-render
fn refresh(
    session: SharedSession,
    trigger: UseForceUpdateHandle,
    error: UseStateSetter<Option<String>>,
) {
    spawn_local(async move {
        match fetch_snapshot().await {
            Ok(snapshot) => {
                session.borrow_mut().apply_snapshot(&snapshot);
                trigger.force_update();
            }
            Err(e) => {
                log::error!("{}", e);
                error.set(Some(format!("Failed to load tabs: {}", e)));
            }
        }
    });
}

fn window_action(
    session: SharedSession,
    window_id: Option<i32>,
    error: UseStateSetter<Option<String>>,
    action: fn(&Session<ChromeHost>, i32) -> Result<usize, TreeError>,
) -> Callback<()> {
    Callback::from(move |_| {
        let Some(window_id) = window_id else {
            return;
        };
        error.set(None);
        let result = action(&session.borrow(), window_id);
        match result {
            Ok(sent) => log::info!("window {}: {} commands", window_id, sent),
            Err(e) => error.set(Some(e.to_string())),
        }
    })
}
