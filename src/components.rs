//! Yew views for the visualizer.
//!
//! The `*_view` functions are resolved by name through
//! [`TemplateRenderer`](crate::templates::TemplateRenderer); the form
//! components render the pipeline and filter forms from the controller's
//! form surfaces.

use crate::templates::{ImagePreview, TemplateRenderer, ViewContext};
use pipeline_visualizer::config::{BASIC_FIELD, CUTOFF_FIELD};
use pipeline_visualizer::controller::{Controller, Event, GarmentKey};
use pipeline_visualizer::form::{Control, FormSurface, SelectOption};
use pipeline_visualizer::projector::GarmentView;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

// DOM event; `Event` here is the controller's
type DomEvent = yew::events::Event;

/// Every included basic with its garment cards, then the debug panel.
pub fn basics_view(r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::Basics {
        display,
        controller,
    } = ctx
    else {
        return Html::default();
    };

    // Early return for empty results
    if display.context.basics.is_empty() {
        return html! {
            <div class="pipeline-basics">
                <p class="no-results-message">{ "No basics selected" }</p>
            </div>
        };
    }

    html! {
        <div class="pipeline-basics">
            { for display.context.basics.iter().map(|basic| html! {
                <section class="pipeline-basic" data-slug={basic.identifier.clone()}>
                    <h2 class="pipeline-basic-name">
                        { basic.display_name.clone() }
                        <span class="pipeline-basic-count">
                            { format!("{} of {}", basic.garments.len(), basic.total_garments) }
                        </span>
                    </h2>
                    if basic.price_groups.is_empty() {
                        { garment_list(r, controller, &basic.identifier, &basic.garments) }
                    } else {
                        <div class="pipeline-price-groups">
                            { for basic.price_groups.iter().map(|group| html! {
                                <div class="pipeline-price-group" data-price={group.name.clone()}>
                                    <h3 class="pipeline-price-group-name">{ group.name.clone() }</h3>
                                    { garment_list(r, controller, &basic.identifier, &group.garments) }
                                </div>
                            }) }
                        </div>
                    }
                </section>
            }) }
            if let Some(debug) = &display.debug {
                { r.render(ViewContext::Debug { debug }) }
            }
        </div>
    }
}

fn garment_list(r: &TemplateRenderer, controller: &Controller, basic: &str, garments: &[GarmentView]) -> Html {
    html! {
        <ol class="pipeline-garments">
            { for garments.iter().map(|garment| {
                let key = GarmentKey::new(basic, garment.identifier.as_str());
                r.render(ViewContext::Garment {
                    basic,
                    garment,
                    detail: controller.detail(&key),
                })
            }) }
        </ol>
    }
}

/// A garment card; clicking its summary expands or collapses the details.
pub fn garment_view(r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::Garment {
        basic,
        garment,
        detail,
    } = ctx
    else {
        return Html::default();
    };

    let onclick = {
        let on_event = r.handlers().on_event.clone();
        let key = GarmentKey::new(*basic, garment.identifier.as_str());
        Callback::from(move |_: MouseEvent| on_event.emit(Event::GarmentExpandToggled(key.clone())))
    };

    html! {
        <li class={classes!("pipeline-garment", detail.is_some().then_some("is-expanded"))}
            data-id={garment.identifier.clone()}>
            <div class="pipeline-garment-meta" {onclick}>
                <span class="pipeline-garment-weight">{ garment.weight.clone() }</span>
                <span class="pipeline-garment-name">{ garment.display_name.clone() }</span>
                <span class="pipeline-garment-brand">{ garment.brand.clone() }</span>
            </div>
            if let Some(url) = garment.edit_url.clone() {
                <a class="pipeline-garment-edit" href={url}>{ "Edit" }</a>
            }
            if let Some(detail) = *detail {
                { r.render(ViewContext::GarmentDetails { detail }) }
                <div class="pipeline-garment-affiliates">
                    { for detail.purchase_options.iter().map(|option| {
                        r.render(ViewContext::Affiliate { option })
                    }) }
                </div>
            }
        </li>
    }
}

/// The explanation table, in the row order the expander produced.
pub fn garment_details_view(_r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::GarmentDetails { detail } = ctx else {
        return Html::default();
    };

    if detail.rows.is_empty() {
        return html! {
            <div class="pipeline-garment-details">
                <p class="pipeline-garment-details-empty">{ "No explanation recorded" }</p>
            </div>
        };
    }

    html! {
        <div class="pipeline-garment-details">
            <table class="pipeline-weights">
                <thead>
                    <tr>
                        <th>{ "Weight" }</th>
                        <th>{ "Value" }</th>
                        <th>{ "Reason" }</th>
                    </tr>
                </thead>
                <tbody>
                    { for detail.rows.iter().map(|row| html! {
                        <tr class={classes!(row.is_normalization.then_some("is-normalization"))}>
                            <td>{ row.weight_name.clone() }</td>
                            <td>{ row.display_value() }</td>
                            <td>{ row.message.clone() }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

/// One place to buy a garment.
pub fn affiliate_view(r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::Affiliate { option } = ctx else {
        return Html::default();
    };

    let thumbnail = match (&option.thumbnail, &option.image) {
        (Some(thumbnail), Some(full)) => {
            let on_preview = r.handlers().on_preview.clone();
            let preview = ImagePreview {
                name: option.garment_name.clone(),
                url: full.clone(),
            };
            let onclick = Callback::from(move |_: MouseEvent| on_preview.emit(Some(preview.clone())));
            html! {
                <img class="pipeline-affiliate-image"
                    src={thumbnail.clone()}
                    title={option.garment_name.clone()}
                    {onclick} />
            }
        }
        _ => html! {},
    };

    html! {
        <div class="pipeline-affiliate">
            { thumbnail }
            <a class="pipeline-affiliate-retailer" href={option.url.clone()} target="_blank">
                { option.retailer.clone() }
            </a>
            if let Some(price) = option.price.clone() {
                <span class="pipeline-affiliate-price">{ format!("${}", price) }</span>
            }
            if !option.admin_links.is_empty() {
                <ul class="pipeline-affiliate-admin">
                    { for option.admin_links.iter().map(|link| html! {
                        <li><a href={link.url.clone()}>{ link.name.clone() }</a></li>
                    }) }
                </ul>
            }
        </div>
    }
}

/// Server timings for the last response.
pub fn debug_view(_r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::Debug { debug } = ctx else {
        return Html::default();
    };

    html! {
        <div class="pipeline-debug">
            <div class="pipeline-debug-summary">
                { format!("{} queries in {} ms", debug.query_count, debug.total_ms) }
            </div>
            <table class="pipeline-debug-queries">
                <tbody>
                    { for debug.queries.iter().map(|query| html! {
                        <tr>
                            <td>{ query.ms.map(|ms| format!("{} ms", ms)).unwrap_or_else(|| "?".to_string()) }</td>
                            <td><code>{ query.sql.clone() }</code></td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

/// Modal with a full-size product image. Escape is handled at the page
/// level by [`use_escape`](crate::hooks::use_escape).
pub fn affiliate_image_view(r: &TemplateRenderer, ctx: &ViewContext<'_>) -> Html {
    let ViewContext::AffiliateImage { preview } = ctx else {
        return Html::default();
    };

    let on_close = {
        let on_preview = r.handlers().on_preview.clone();
        Callback::from(move |_: MouseEvent| on_preview.emit(None))
    };

    html! {
        <div class="pipeline-modal">
            <button class="pipeline-modal-close" onclick={on_close}>{ "×" }</button>
            <img src={preview.url.clone()} alt={preview.name.clone()} />
        </div>
    }
}

fn field_input(
    name: &str,
    label: &str,
    value: &str,
    options: &[SelectOption],
    on_event: &Callback<Event>,
) -> Html {
    let field_name = name.to_string();
    let on_event = on_event.clone();

    let control = if options.is_empty() {
        let onchange = Callback::from(move |e: DomEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_event.emit(Event::FieldChanged {
                name: field_name.clone(),
                value: input.value(),
            });
        });
        html! { <input type="text" name={name.to_string()} value={value.to_string()} {onchange} /> }
    } else {
        let onchange = Callback::from(move |e: DomEvent| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_event.emit(Event::FieldChanged {
                name: field_name.clone(),
                value: select.value(),
            });
        });
        html! {
            <select name={name.to_string()} {onchange}>
                { for options.iter().map(|option| html! {
                    <option value={option.value.clone()} selected={option.value == value}>
                        { option.label.clone() }
                    </option>
                }) }
            </select>
        }
    };

    html! {
        <label class="form-group">
            <span>{ label.to_string() }</span>
            { control }
        </label>
    }
}

fn choice_input(name: &str, label: &str, value: &str, checked: bool, on_event: &Callback<Event>) -> Html {
    let onchange = {
        let on_event = on_event.clone();
        let choice_name = name.to_string();
        let choice_value = value.to_string();
        Callback::from(move |e: DomEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_event.emit(Event::ChoiceToggled {
                name: choice_name.clone(),
                value: choice_value.clone(),
                checked: input.checked(),
            });
        })
    };

    html! {
        <label class="form-choice">
            <input type="checkbox" name={name.to_string()} value={value.to_string()} {checked} {onchange} />
            { label.to_string() }
        </label>
    }
}

/// Choices sharing a batch group, with "All" / "None" buttons.
fn choice_group(form: &FormSurface, group: &str, on_event: &Callback<Event>) -> Html {
    let batch = |checked: bool| {
        let on_event = on_event.clone();
        let group = group.to_string();
        Callback::from(move |_: MouseEvent| {
            on_event.emit(Event::BatchSelect {
                group: group.clone(),
                checked,
            })
        })
    };

    html! {
        <fieldset class="pipeline-form-fields">
            <legend>{ group.replace('_', " ") }</legend>
            <button type="button" class="btn-secondary small" onclick={batch(true)}>{ "All" }</button>
            <button type="button" class="btn-secondary small" onclick={batch(false)}>{ "None" }</button>
            { for form.controls().iter().filter_map(|control| match control {
                Control::Choice { name, label, value, checked, group: Some(g) } if g == group => {
                    Some(choice_input(name, label, value, *checked, on_event))
                }
                _ => None,
            }) }
        </fieldset>
    }
}

#[derive(Properties, PartialEq)]
pub struct PipelineFormProps {
    pub form: FormSurface,
    pub loading: bool,
    pub on_event: Callback<Event>,
}

/// The form whose fields produce the recommendations.
#[function_component(PipelineForm)]
pub fn pipeline_form(props: &PipelineFormProps) -> Html {
    let onsubmit = {
        let on_event = props.on_event.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_event.emit(Event::Submit);
        })
    };
    let on_snapshot = {
        let on_event = props.on_event.clone();
        Callback::from(move |_: MouseEvent| on_event.emit(Event::SnapshotRequested))
    };

    let mut seen_groups: Vec<&str> = Vec::new();
    let controls = props
        .form
        .controls()
        .iter()
        .filter_map(|control| match control {
            Control::Field {
                name,
                label,
                value,
                options,
            } => Some(field_input(name, label, value, options, &props.on_event)),
            Control::Choice {
                group: Some(group), ..
            } => {
                if seen_groups.contains(&group.as_str()) {
                    None
                } else {
                    seen_groups.push(group.as_str());
                    Some(choice_group(&props.form, group, &props.on_event))
                }
            }
            Control::Choice {
                name,
                label,
                value,
                checked,
                group: None,
            } => Some(choice_input(name, label, value, *checked, &props.on_event)),
        })
        .collect::<Html>();

    html! {
        <form class="pipeline-form" {onsubmit}>
            { controls }
            <div class="pipeline-form-actions">
                <button type="submit" class="btn-primary" disabled={props.loading}>
                    { if props.loading { "Calculating..." } else { "Recommend" } }
                </button>
                <button type="button" class="btn-secondary" onclick={on_snapshot}>
                    { "Take snapshot" }
                </button>
            </div>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterFormProps {
    pub form: FormSurface,
    pub on_event: Callback<Event>,
    /// Receives raw cutoff text as it is typed
    pub on_cutoff: Callback<String>,
}

/// Cutoff field and basic checkboxes; changes only re-project.
#[function_component(FilterForm)]
pub fn filter_form(props: &FilterFormProps) -> Html {
    let cutoff = props.form.field(CUTOFF_FIELD).unwrap_or_default().to_string();
    let on_cutoff_input = {
        let on_cutoff = props.on_cutoff.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_cutoff.emit(input.value());
        })
    };
    let select_all = |enabled: bool| {
        let on_event = props.on_event.clone();
        Callback::from(move |_: MouseEvent| on_event.emit(Event::AllFiltersChanged { enabled }))
    };
    let onsubmit = Callback::from(|e: SubmitEvent| e.prevent_default());

    html! {
        <form class="pipeline-basics-filter" {onsubmit}>
            <label class="form-group">
                <span>{ "Garments per basic" }</span>
                <input type="text" name={CUTOFF_FIELD} value={cutoff} oninput={on_cutoff_input} />
            </label>
            <button type="button" class="btn-secondary small" onclick={select_all(true)}>{ "Select all" }</button>
            <button type="button" class="btn-secondary small" onclick={select_all(false)}>{ "Clear selection" }</button>
            { for props.form.controls().iter().filter_map(|control| match control {
                Control::Choice { name, label, value, checked, .. } if name == BASIC_FIELD => {
                    let on_event = props.on_event.clone();
                    let identifier = value.clone();
                    let onchange = Callback::from(move |e: DomEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        on_event.emit(Event::FilterChanged {
                            identifier: identifier.clone(),
                            enabled: input.checked(),
                        });
                    });
                    Some(html! {
                        <label class="form-choice">
                            <input type="checkbox" name={BASIC_FIELD} value={value.clone()} checked={*checked} {onchange} />
                            { label.clone() }
                        </label>
                    })
                }
                _ => None,
            }) }
        </form>
    }
}
