//! Named views and the renderer that resolves them.
//!
//! Each view is resolved the first time its name is rendered and the
//! resolved view function is kept for every later render. The lookup table
//! belongs to one renderer; nothing is shared between visualizers.

use crate::components;
use pipeline_visualizer::controller::{Controller, Display, Event};
use pipeline_visualizer::details::{GarmentDetail, PurchaseOptionView};
use pipeline_visualizer::projector::{DebugView, GarmentView};
use std::cell::RefCell;
use std::collections::HashMap;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    Basics,
    Garment,
    GarmentDetails,
    Affiliate,
    Debug,
    AffiliateImage,
}

/// Full-size product image shown over the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    pub name: String,
    pub url: String,
}

/// Callbacks views attach to the markup they produce.
#[derive(Clone, PartialEq)]
pub struct Handlers {
    pub on_event: Callback<Event>,
    pub on_preview: Callback<Option<ImagePreview>>,
}

pub enum ViewContext<'a> {
    Basics {
        display: &'a Display,
        controller: &'a Controller,
    },
    Garment {
        basic: &'a str,
        garment: &'a GarmentView,
        detail: Option<&'a GarmentDetail>,
    },
    GarmentDetails {
        detail: &'a GarmentDetail,
    },
    Affiliate {
        option: &'a PurchaseOptionView,
    },
    Debug {
        debug: &'a DebugView,
    },
    AffiliateImage {
        preview: &'a ImagePreview,
    },
}

impl ViewContext<'_> {
    pub fn view_name(&self) -> ViewName {
        match self {
            ViewContext::Basics { .. } => ViewName::Basics,
            ViewContext::Garment { .. } => ViewName::Garment,
            ViewContext::GarmentDetails { .. } => ViewName::GarmentDetails,
            ViewContext::Affiliate { .. } => ViewName::Affiliate,
            ViewContext::Debug { .. } => ViewName::Debug,
            ViewContext::AffiliateImage { .. } => ViewName::AffiliateImage,
        }
    }
}

pub type ViewFn = fn(&TemplateRenderer, &ViewContext<'_>) -> Html;

fn resolve(name: ViewName) -> ViewFn {
    match name {
        ViewName::Basics => components::basics_view,
        ViewName::Garment => components::garment_view,
        ViewName::GarmentDetails => components::garment_details_view,
        ViewName::Affiliate => components::affiliate_view,
        ViewName::Debug => components::debug_view,
        ViewName::AffiliateImage => components::affiliate_image_view,
    }
}

pub struct TemplateRenderer {
    compiled: RefCell<HashMap<ViewName, ViewFn>>,
    handlers: Handlers,
}

impl TemplateRenderer {
    pub fn new(handlers: Handlers) -> Self {
        Self {
            compiled: RefCell::new(HashMap::with_capacity(6)),
            handlers,
        }
    }

    pub fn render(&self, context: ViewContext<'_>) -> Html {
        let name = context.view_name();
        // the borrow ends before the view runs; views render nested views
        let view = *self
            .compiled
            .borrow_mut()
            .entry(name)
            .or_insert_with(|| resolve(name));
        view(self, &context)
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn compiled_count(&self) -> usize {
        self.compiled.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_visualizer::projector::QueryView;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(Handlers {
            on_event: Callback::noop(),
            on_preview: Callback::noop(),
        })
    }

    #[test]
    fn views_are_resolved_once_per_name() {
        let renderer = renderer();
        let debug = DebugView {
            total_ms: 12,
            query_count: 1,
            queries: vec![QueryView {
                ms: Some(3),
                sql: "SELECT 1".into(),
            }],
        };

        renderer.render(ViewContext::Debug { debug: &debug });
        renderer.render(ViewContext::Debug { debug: &debug });
        assert_eq!(renderer.compiled_count(), 1);

        let preview = ImagePreview {
            name: "Tee".into(),
            url: "https://img.example/tee.jpg".into(),
        };
        renderer.render(ViewContext::AffiliateImage { preview: &preview });
        assert_eq!(renderer.compiled_count(), 2);
    }

    #[test]
    fn nested_views_share_the_table() {
        let renderer = renderer();
        let detail = GarmentDetail {
            rows: vec![],
            purchase_options: vec![],
        };
        let garment = GarmentView {
            identifier: "1".into(),
            brand: "Acme".into(),
            display_name: "Tee".into(),
            weight: "3.5".into(),
            edit_url: None,
        };

        renderer.render(ViewContext::Garment {
            basic: "tops",
            garment: &garment,
            detail: Some(&detail),
        });
        assert_eq!(renderer.compiled_count(), 2);
    }
}
