//! Main module for the pipeline visualizer using Yew.
//! Wires the controller, browser effects and views together.

use pipeline_visualizer::config::{ControllerConfig, BOOTSTRAP, DEBOUNCE_MS};
use pipeline_visualizer::controller::{Controller, Event};
use pipeline_visualizer::form::PageLayout;
use std::rc::Rc;
use yew::prelude::*;

mod browser;
mod components;
mod hooks;
mod templates;

use browser::Dispatcher;
use components::{FilterForm, PipelineForm};
use hooks::{use_debounced, use_escape, use_popstate};
use templates::{Handlers, ImagePreview, TemplateRenderer, ViewContext};

#[derive(Properties, PartialEq)]
struct VisualizerProps {
    layout: Rc<PageLayout>,
}

/// One visualizer: its own controller, renderer and history wiring.
#[function_component(Visualizer)]
fn visualizer(props: &VisualizerProps) -> Html {
    let controller = {
        let layout = props.layout.clone();
        use_mut_ref(move || Controller::from_layout(ControllerConfig::default(), &layout))
    };
    let redraw = use_force_update();
    let preview = use_state_eq(|| None::<ImagePreview>);

    let dispatcher = Dispatcher::new(controller.clone(), redraw, &props.layout.endpoint);
    let on_event = dispatcher.callback();

    let on_cutoff = {
        let on_event = on_event.clone();
        use_debounced(
            Callback::from(move |value: String| on_event.emit(Event::CutoffChanged { value })),
            DEBOUNCE_MS,
        )
    };
    use_popstate(on_event.clone());
    {
        let preview = preview.clone();
        use_escape(Callback::from(move |_| preview.set(None)));
    }

    // Restore from history or show pre-rendered data once, after mount
    {
        let dispatcher = dispatcher.clone();
        let preloaded = props.layout.recommendations.clone();
        use_effect_with((), move |_| {
            dispatcher.start(preloaded);
            || ()
        });
    }

    let renderer = {
        let handlers = Handlers {
            on_event: on_event.clone(),
            on_preview: {
                let preview = preview.clone();
                Callback::from(move |next: Option<ImagePreview>| preview.set(next))
            },
        };
        use_memo((), move |_| TemplateRenderer::new(handlers))
    };

    let c = controller.borrow();
    html! {
        <div class={classes!("pipeline", c.is_loading().then_some("is-loading"))}>
            <PipelineForm form={c.form().clone()} loading={c.is_loading()} on_event={on_event.clone()} />
            <FilterForm form={c.filter_form().clone()} on_event={on_event} {on_cutoff} />

            if let Some(err) = c.error() {
                <div class="current-error">{ err.to_string() }</div>
            }

            <div class="pipeline-data">
                if let Some(display) = c.display() {
                    { renderer.render(ViewContext::Basics { display, controller: &c }) }
                } else if !c.is_loading() {
                    <div class="no-results-message">
                        <p>{ "Submit the form to generate recommendations." }</p>
                    </div>
                }
            </div>

            if let Some(image) = (*preview).clone() {
                { renderer.render(ViewContext::AffiliateImage { preview: &image }) }
            }
        </div>
    }
}

/// Reads the page layout and mounts the visualizer.
#[function_component]
pub fn App() -> Html {
    match PageLayout::from_json(BOOTSTRAP) {
        Ok(layout) => html! { <Visualizer layout={Rc::new(layout)} /> },
        Err(e) => html! {
            <div class="current-error">{ format!("Invalid page layout: {}", e) }</div>
        },
    }
}

/// Entry point: installs the panic hook and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
