use gloo_timers::callback::Timeout;
use log::warn;
use pipeline_visualizer::controller::Event;
use pipeline_visualizer::history::HistorySnapshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, PopStateEvent};
use yew::prelude::*;

/// Wrap a callback so it only fires once `delay_ms` pass without another
/// call. Each call cancels the pending one.
#[hook]
pub fn use_debounced<T: 'static>(callback: Callback<T>, delay_ms: u32) -> Callback<T> {
    let pending = use_mut_ref(|| None::<Timeout>);

    Callback::from(move |value: T| {
        let callback = callback.clone();
        // Dropping a Timeout cancels it
        let handle = Timeout::new(delay_ms, move || callback.emit(value));
        *pending.borrow_mut() = Some(handle);
    })
}

/// Feed back/forward navigation into the controller as
/// [`Event::HistoryNavigated`]. Entries without a readable snapshot are
/// skipped.
#[hook]
pub fn use_popstate(on_event: Callback<Event>) {
    use_effect_with((), move |_| {
        let listener = Closure::<dyn Fn(PopStateEvent)>::new(move |e: PopStateEvent| {
            let state = e.state();
            if state.is_null() || state.is_undefined() {
                return;
            }
            match serde_wasm_bindgen::from_value::<HistorySnapshot>(state) {
                Ok(snapshot) => on_event.emit(Event::HistoryNavigated(snapshot)),
                Err(err) => warn!("Ignoring unreadable history entry: {}", err),
            }
        });

        let window = gloo_utils::window();
        if let Err(err) =
            window.add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
        {
            warn!("Could not listen for history navigation: {:?}", err);
        }

        move || {
            if let Err(err) = window
                .remove_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
            {
                warn!("Could not stop listening for history navigation: {:?}", err);
            }
            drop(listener);
        }
    });
}

/// Call `on_escape` whenever Escape is released anywhere in the document.
#[hook]
pub fn use_escape(on_escape: Callback<()>) {
    use_effect_with((), move |_| {
        let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                on_escape.emit(());
            }
        });

        let document = gloo_utils::document();
        if let Err(err) =
            document.add_event_listener_with_callback("keyup", listener.as_ref().unchecked_ref())
        {
            warn!("Could not listen for Escape: {:?}", err);
        }

        move || {
            if let Err(err) = document
                .remove_event_listener_with_callback("keyup", listener.as_ref().unchecked_ref())
            {
                warn!("Could not stop listening for Escape: {:?}", err);
            }
            drop(listener);
        }
    });
}
