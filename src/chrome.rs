/// Bridge to the chrome.* extension APIs through tabby.js

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::error::HostError;
use crate::host::{ChangeEvent, Host, HostCommand};
use crate::settings::{Settings, SETTINGS_KEY};
use crate::tab_data::HostSnapshot;

// Import JS bridge functions
#[wasm_bindgen(module = "/tabby.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getSnapshot() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn runCommand(command: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowId() -> Result<JsValue, JsValue>;

    fn extensionId() -> String;

    fn addChangeListener(callback: &js_sys::Function);

    fn removeChangeListener(callback: &js_sys::Function);
}

/// Fetch all windows (with tabs) and all tab groups
pub async fn fetch_snapshot() -> Result<HostSnapshot, HostError> {
    let snapshot_js = getSnapshot()
        .await
        .map_err(|e| HostError::Decode(format!("Failed to get snapshot: {:?}", e)))?;

    serde_wasm_bindgen::from_value(snapshot_js)
        .map_err(|e| HostError::Decode(format!("Failed to parse snapshot: {:?}", e)))
}

pub async fn run_command(command: &HostCommand) -> Result<(), HostError> {
    let command_js =
        serde_wasm_bindgen::to_value(command).map_err(|e| HostError::CommandFailure {
            command: command.name().to_string(),
            message: format!("Failed to serialize: {:?}", e),
        })?;

    runCommand(command_js).await.map_err(|e| HostError::CommandFailure {
        command: command.name().to_string(),
        message: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
    })
}

pub async fn current_window_id() -> Result<i32, HostError> {
    let id_js = getCurrentWindowId()
        .await
        .map_err(|e| HostError::Decode(format!("Failed to get current window: {:?}", e)))?;

    id_js
        .as_f64()
        .map(|id| id as i32)
        .ok_or_else(|| HostError::Decode("current window id is not a number".to_string()))
}

pub fn extension_id() -> String {
    extensionId()
}

pub async fn load_settings() -> Result<Settings, HostError> {
    let settings_js = getStorage(SETTINGS_KEY)
        .await
        .map_err(|e| HostError::Decode(format!("Failed to get storage: {:?}", e)))?;

    if settings_js.is_null() || settings_js.is_undefined() {
        return Ok(Settings::new());
    }
    serde_wasm_bindgen::from_value(settings_js)
        .map_err(|e| HostError::Decode(format!("Failed to parse settings: {:?}", e)))
}

pub async fn save_settings(settings: &Settings) -> Result<(), HostError> {
    let settings_js = serde_wasm_bindgen::to_value(settings)
        .map_err(|e| HostError::Decode(format!("Failed to serialize settings: {:?}", e)))?;

    setStorage(SETTINGS_KEY, settings_js)
        .await
        .map_err(|e| HostError::CommandFailure {
            command: "setStorage".to_string(),
            message: format!("{:?}", e),
        })
}

/// Registered change listener; unregisters itself when dropped
pub struct ChangeSubscription {
    callback: Closure<dyn Fn(String)>,
}

impl ChangeSubscription {
    pub fn subscribe(on_event: impl Fn(ChangeEvent) + 'static) -> ChangeSubscription {
        let callback = Closure::wrap(Box::new(move |name: String| {
            match ChangeEvent::from_name(&name) {
                Some(event) => on_event(event),
                None => log::debug!("ignoring unknown browser event {}", name),
            }
        }) as Box<dyn Fn(String)>);

        addChangeListener(callback.as_ref().unchecked_ref());
        ChangeSubscription { callback }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        removeChangeListener(self.callback.as_ref().unchecked_ref());
    }
}

/// `Host` backed by the real browser. Failures are logged and handed to
/// `on_failure`; they are never retried.
#[derive(Clone)]
pub struct ChromeHost {
    on_failure: Rc<dyn Fn(HostError)>,
}

impl ChromeHost {
    pub fn new(on_failure: impl Fn(HostError) + 'static) -> Self {
        ChromeHost {
            on_failure: Rc::new(on_failure),
        }
    }
}

impl Host for ChromeHost {
    fn dispatch(&self, command: HostCommand) {
        let on_failure = self.on_failure.clone();
        spawn_local(async move {
            if let Err(e) = run_command(&command).await {
                log::error!("{}", e);
                on_failure(e);
            }
        });
    }
}
