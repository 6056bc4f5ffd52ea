//! Carries out controller effects against the browser: network fetches,
//! history entries and redraws.

use gloo_net::http::Request;
use log::{debug, info, warn};
use pipeline_visualizer::controller::{Controller, Effect, Event};
use pipeline_visualizer::error::VisualizerError;
use pipeline_visualizer::history::{HistoryEntry, HistorySnapshot};
use pipeline_visualizer::utils::now_ms;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Routes events into one controller and runs the effects it returns.
#[derive(Clone)]
pub struct Dispatcher {
    controller: Rc<RefCell<Controller>>,
    redraw: UseForceUpdateHandle,
    endpoint: Rc<str>,
}

impl Dispatcher {
    pub fn new(controller: Rc<RefCell<Controller>>, redraw: UseForceUpdateHandle, endpoint: &str) -> Self {
        Self {
            controller,
            redraw,
            endpoint: Rc::from(endpoint),
        }
    }

    pub fn dispatch(&self, event: Event) {
        // release the borrow before effects run; a redraw reads the controller
        let outcome = self.controller.borrow_mut().dispatch(event);
        match outcome {
            Ok(effects) => self.run(effects),
            Err(e) => {
                warn!("{}", e);
                self.redraw.force_update();
            }
        }
    }

    pub fn callback(&self) -> Callback<Event> {
        let this = self.clone();
        Callback::from(move |event: Event| this.dispatch(event))
    }

    /// Restore the page's previous state if the browser has one, otherwise
    /// show the pre-rendered recommendations.
    pub fn start(&self, preloaded: Option<serde_json::Value>) {
        if let Some(snapshot) = stored_snapshot() {
            info!("Restoring visualizer state from the current URL");
            self.dispatch(Event::HistoryNavigated(snapshot));
            return;
        }

        let has_history = has_history_state();
        let started = self
            .controller
            .borrow_mut()
            .start_with_value(preloaded, has_history);
        match started {
            Ok(effects) => self.run(effects),
            Err(e) => warn!("Ignoring pre-rendered recommendations: {}", e),
        }
    }

    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch { epoch, query } => self.fetch(epoch, query),
                Effect::PushHistory(entry) => {
                    if let Err(e) = write_history(&entry, false) {
                        warn!("{}", e);
                    }
                }
                Effect::ReplaceHistory(entry) => {
                    if let Err(e) = write_history(&entry, true) {
                        warn!("{}", e);
                    }
                }
                Effect::Render => self.redraw.force_update(),
            }
        }
    }

    fn fetch(&self, epoch: u64, query: String) {
        let this = self.clone();
        let url = format!("{}{}", self.endpoint, query);

        wasm_bindgen_futures::spawn_local(async move {
            let started = now_ms();
            let event = match fetch_text(&url).await {
                Ok(body) => {
                    debug!(
                        "Request #{} answered in {:.0} ms ({} bytes)",
                        epoch,
                        now_ms() - started,
                        body.len()
                    );
                    Event::FetchSucceeded { epoch, body }
                }
                Err(e) => Event::FetchFailed {
                    epoch,
                    message: e.to_string(),
                },
            };
            this.dispatch(event);
        });
    }
}

async fn fetch_text(url: &str) -> Result<String, VisualizerError> {
    let response = Request::get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| VisualizerError::Fetch(e.to_string()))?;

    if !response.ok() {
        return Err(VisualizerError::Fetch(format!(
            "HTTP {} {}",
            response.status(),
            response.status_text()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| VisualizerError::Fetch(e.to_string()))
}

fn write_history(entry: &HistoryEntry, replace: bool) -> Result<(), VisualizerError> {
    let state = serde_wasm_bindgen::to_value(&entry.snapshot)
        .map_err(|e| VisualizerError::History(e.to_string()))?;
    let history = gloo_utils::history();

    let written = if replace {
        history.replace_state_with_url(&state, "", Some(&entry.url))
    } else {
        history.push_state_with_url(&state, "", Some(&entry.url))
    };
    written.map_err(|e| VisualizerError::History(format!("{:?}", e)))
}

/// Whether the current history entry carries any state, readable or not.
fn has_history_state() -> bool {
    gloo_utils::history()
        .state()
        .map(|state| !state.is_null() && !state.is_undefined())
        .unwrap_or(false)
}

/// The snapshot stored with the current history entry, or failing that one
/// parsed from the query string.
fn stored_snapshot() -> Option<HistorySnapshot> {
    match gloo_utils::history().state() {
        Ok(state) if !state.is_null() && !state.is_undefined() => {
            match serde_wasm_bindgen::from_value::<HistorySnapshot>(state) {
                Ok(snapshot) => return Some(snapshot),
                Err(e) => warn!("Ignoring unreadable history state: {}", e),
            }
        }
        _ => {}
    }

    let search = gloo_utils::window().location().search().unwrap_or_default();
    if search.trim_start_matches('?').is_empty() {
        return None;
    }
    HistorySnapshot::from_query(&search)
        .map_err(|e| warn!("Ignoring query string: {}", e))
        .ok()
}
