//! The visualizer's state machine.
//!
//! UI triggers arrive as [`Event`]s; the controller updates its state and
//! answers with the [`Effect`]s the host must carry out (issue a fetch,
//! write a history entry, redraw). It performs no I/O itself.

use crate::config::{ControllerConfig, FetchSequencing, BASIC_FIELD, CUTOFF_FIELD};
use crate::details::GarmentDetail;
use crate::error::{Result, VisualizerError};
use crate::form::{FormSurface, PageLayout};
use crate::history::{decode, encode, HistoryEntry, HistorySnapshot};
use crate::model::{parse_payload, payload_from_value, Payload};
use crate::projector::{project, project_debug, DebugView, RenderContext};
use crate::state::{Cutoff, VisualizationState};
use log::{debug, info, warn};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the fetch issued with this epoch
    Loading { epoch: u64 },
}

/// Identifies one garment card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GarmentKey {
    pub basic: String,
    pub garment: String,
}

impl GarmentKey {
    pub fn new(basic: impl Into<String>, garment: impl Into<String>) -> Self {
        Self {
            basic: basic.into(),
            garment: garment.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submit,
    FetchSucceeded { epoch: u64, body: String },
    FetchFailed { epoch: u64, message: String },
    FilterChanged { identifier: String, enabled: bool },
    AllFiltersChanged { enabled: bool },
    CutoffChanged { value: String },
    FieldChanged { name: String, value: String },
    ChoiceToggled { name: String, value: String, checked: bool },
    BatchSelect { group: String, checked: bool },
    SnapshotRequested,
    HistoryNavigated(HistorySnapshot),
    GarmentExpandToggled(GarmentKey),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// GET the endpoint with this query string
    Fetch { epoch: u64, query: String },
    PushHistory(HistoryEntry),
    ReplaceHistory(HistoryEntry),
    Render,
}

/// What the results region currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Display {
    pub context: RenderContext,
    pub debug: Option<DebugView>,
}

pub struct Controller {
    config: ControllerConfig,
    state: VisualizationState,
    /// The pipeline form whose fields are sent with every fetch
    form: FormSurface,
    /// Cutoff field and basic choices
    filter_form: FormSurface,
    phase: Phase,
    epoch: u64,
    debug: Option<DebugView>,
    display: Option<Display>,
    expanded: HashMap<GarmentKey, GarmentDetail>,
    /// Last fetch or payload failure; cleared by the next submit
    error: Option<String>,
    /// Rejected cutoff text; cleared once a cutoff parses
    cutoff_error: Option<String>,
}

impl Controller {
    /// Build a controller and read its initial state from the forms.
    pub fn new(config: ControllerConfig, form: FormSurface, filter_form: FormSurface) -> Self {
        let mut controller = Self {
            config,
            state: VisualizationState::default(),
            form,
            filter_form,
            phase: Phase::Idle,
            epoch: 0,
            debug: None,
            display: None,
            expanded: HashMap::new(),
            error: None,
            cutoff_error: None,
        };
        controller.read_state();
        controller
    }

    pub fn from_layout(config: ControllerConfig, layout: &PageLayout) -> Self {
        Self::new(config, layout.fields.clone(), layout.filter_form())
    }

    /// Show pre-rendered recommendations without a fetch. On a first load
    /// (no history entry yet) the current state is recorded in place.
    pub fn start(&mut self, preloaded: Option<Payload>, has_history: bool) -> Vec<Effect> {
        let Some(payload) = preloaded.filter(|p| !p.recommendations.is_empty()) else {
            debug!("No pre-rendered recommendations to show");
            return Vec::new();
        };

        info!(
            "Showing {} pre-rendered basics",
            payload.recommendations.len()
        );
        self.accept(payload);
        let mut effects = self.refresh();
        if !has_history {
            effects.push(Effect::ReplaceHistory(self.snapshot()));
        }
        effects
    }

    /// [`Controller::start`] with the raw pre-rendered JSON from a page layout.
    pub fn start_with_value(
        &mut self,
        preloaded: Option<serde_json::Value>,
        has_history: bool,
    ) -> Result<Vec<Effect>> {
        let payload = preloaded.map(payload_from_value).transpose()?;
        Ok(self.start(payload, has_history))
    }

    /// Feed one event through the state machine.
    ///
    /// Only a malformed payload is reported as an error; the previous
    /// recommendations stay in place and the controller returns to idle.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>> {
        match event {
            Event::Submit => Ok(self.submit()),
            Event::FetchSucceeded { epoch, body } => self.fetch_succeeded(epoch, &body),
            Event::FetchFailed { epoch, message } => Ok(self.fetch_failed(epoch, message)),
            Event::FilterChanged {
                identifier,
                enabled,
            } => {
                self.filter_form.set_checked(BASIC_FIELD, &identifier, enabled);
                self.state.set_filter(&identifier, enabled);
                Ok(self.refresh())
            }
            Event::AllFiltersChanged { enabled } => {
                self.filter_form.set_all_checked(BASIC_FIELD, enabled);
                self.state.set_all_filters(enabled);
                Ok(self.refresh())
            }
            Event::CutoffChanged { value } => Ok(self.cutoff_changed(&value)),
            Event::FieldChanged { name, value } => {
                if !self.form.set_field(&name, &value) {
                    debug!("Ignoring change to unknown field {}", name);
                }
                Ok(Vec::new())
            }
            Event::ChoiceToggled {
                name,
                value,
                checked,
            } => {
                self.form.set_checked(&name, &value, checked);
                Ok(Vec::new())
            }
            Event::BatchSelect { group, checked } => {
                self.form.set_group(&group, checked);
                Ok(vec![Effect::Render])
            }
            Event::SnapshotRequested => {
                let entry = self.snapshot();
                info!("Pushing history entry {}", entry.url);
                Ok(vec![Effect::PushHistory(entry)])
            }
            Event::HistoryNavigated(snapshot) => Ok(self.restore(&snapshot)),
            Event::GarmentExpandToggled(key) => self.toggle_garment(key),
        }
    }

    /// Populate filters and cutoff from the filter form.
    fn read_state(&mut self) {
        let filters: Vec<(String, bool)> = self
            .filter_form
            .choices(BASIC_FIELD)
            .map(|(id, checked)| (id.to_string(), checked))
            .collect();
        self.state
            .init_filters(filters.iter().map(|(id, checked)| (id.as_str(), *checked)));

        let raw = self.filter_form.field(CUTOFF_FIELD).unwrap_or_default();
        match raw.parse::<Cutoff>() {
            Ok(cutoff) => {
                self.state.set_cutoff(cutoff);
                self.cutoff_error = None;
            }
            Err(e) => {
                warn!("{}; keeping cutoff {}", e, self.state.cutoff());
                self.cutoff_error = Some(e.to_string());
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        self.epoch += 1;
        self.phase = Phase::Loading { epoch: self.epoch };
        self.error = None;

        let query = HistorySnapshot::from_pairs(self.form.serialize()).query_string();
        info!("Fetching recommendations (request #{}) {}", self.epoch, query);
        vec![
            Effect::Fetch {
                epoch: self.epoch,
                query,
            },
            Effect::Render,
        ]
    }

    /// Whether a response for `epoch` should be applied.
    fn is_current(&self, epoch: u64) -> bool {
        match self.config.sequencing {
            FetchSequencing::LatestOnly => epoch == self.epoch,
            FetchSequencing::LastArrivalWins => true,
        }
    }

    fn fetch_succeeded(&mut self, epoch: u64, body: &str) -> Result<Vec<Effect>> {
        if !self.is_current(epoch) {
            debug!(
                "Discarding response #{} while waiting on #{}",
                epoch, self.epoch
            );
            return Ok(Vec::new());
        }
        if epoch == self.epoch {
            self.phase = Phase::Idle;
        }

        match parse_payload(body) {
            Ok(payload) => {
                info!(
                    "Received recommendations for {} basics (request #{})",
                    payload.recommendations.len(),
                    epoch
                );
                self.accept(payload);
                Ok(self.refresh())
            }
            Err(e) => {
                warn!("Rejecting response #{}: {}", epoch, e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn fetch_failed(&mut self, epoch: u64, message: String) -> Vec<Effect> {
        if !self.is_current(epoch) {
            debug!("Ignoring failure of superseded request #{}", epoch);
            return Vec::new();
        }
        warn!("Request #{} failed: {}", epoch, message);
        if epoch == self.epoch {
            self.phase = Phase::Idle;
        }
        self.error = Some(VisualizerError::Fetch(message).to_string());
        vec![Effect::Render]
    }

    fn accept(&mut self, payload: Payload) {
        self.state.replace_recommendations(payload.recommendations);
        self.debug = payload.debug.as_ref().map(project_debug);
        self.error = None;
    }

    fn cutoff_changed(&mut self, raw: &str) -> Vec<Effect> {
        self.filter_form.set_field(CUTOFF_FIELD, raw);
        match raw.parse::<Cutoff>() {
            Ok(cutoff) => {
                self.state.set_cutoff(cutoff);
                let had_error = self.cutoff_error.take().is_some();
                let mut effects = self.refresh();
                if had_error && effects.is_empty() {
                    effects.push(Effect::Render);
                }
                effects
            }
            Err(e) => {
                warn!("{}", e);
                self.cutoff_error = Some(e.to_string());
                vec![Effect::Render]
            }
        }
    }

    /// Re-project the current recommendations. A no-op before any arrive.
    fn refresh(&mut self) -> Vec<Effect> {
        let Some(recommendations) = self.state.current_recommendations() else {
            debug!("Nothing to project yet");
            return Vec::new();
        };

        let context = project(&recommendations, self.state.filters(), self.state.cutoff());
        debug!(
            "Projected {} basics with cutoff {}",
            context.basics.len(),
            self.state.cutoff()
        );
        self.expanded.clear();
        self.display = Some(Display {
            context,
            debug: self.debug.clone(),
        });
        vec![Effect::Render]
    }

    fn snapshot(&self) -> HistoryEntry {
        encode(&self.state, &self.form.serialize())
    }

    /// Put the forms back the way the entry recorded them and fetch again;
    /// recommendation data itself is never stored in history.
    fn restore(&mut self, snapshot: &HistorySnapshot) -> Vec<Effect> {
        let decoded = decode(snapshot);
        info!("Restoring {} fields from history", decoded.len());
        self.form.apply(&decoded);
        self.filter_form.apply(&decoded);
        self.read_state();
        self.submit()
    }

    fn toggle_garment(&mut self, key: GarmentKey) -> Result<Vec<Effect>> {
        if self.expanded.remove(&key).is_some() {
            return Ok(vec![Effect::Render]);
        }

        let garment = self
            .state
            .current_recommendations()
            .and_then(|recs| recs.get(&key.basic)?.garment(&key.garment).cloned())
            .ok_or_else(|| VisualizerError::UnknownGarment {
                basic: key.basic.clone(),
                garment: key.garment.clone(),
            })?;

        let detail = GarmentDetail::new(&garment, self.config.normalization);
        self.expanded.insert(key, detail);
        Ok(vec![Effect::Render])
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    pub fn form(&self) -> &FormSurface {
        &self.form
    }

    pub fn filter_form(&self) -> &FormSurface {
        &self.filter_form
    }

    pub fn display(&self) -> Option<&Display> {
        self.display.as_ref()
    }

    pub fn detail(&self, key: &GarmentKey) -> Option<&GarmentDetail> {
        self.expanded.get(key)
    }

    /// The message to show, rejected cutoff input first.
    pub fn error(&self) -> Option<&str> {
        self.cutoff_error.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Control;
    use crate::model::tests::{basic_json, garment_json};
    use serde_json::json;

    fn filter_form(cutoff: &str, basics: &[(&str, bool)]) -> FormSurface {
        let mut controls = vec![Control::Field {
            name: CUTOFF_FIELD.into(),
            label: String::new(),
            value: cutoff.into(),
            options: vec![],
        }];
        controls.extend(basics.iter().map(|(slug, checked)| Control::Choice {
            name: BASIC_FIELD.into(),
            label: slug.to_string(),
            value: slug.to_string(),
            checked: *checked,
            group: None,
        }));
        FormSurface::new(controls)
    }

    fn pipeline_form() -> FormSurface {
        FormSurface::new(vec![Control::Field {
            name: "age".into(),
            label: "Age".into(),
            value: "30".into(),
            options: vec![],
        }])
    }

    fn controller(config: ControllerConfig) -> Controller {
        Controller::new(
            config,
            pipeline_form(),
            filter_form("2", &[("tops", true), ("shoes", true)]),
        )
    }

    fn body() -> String {
        json!({
            "basics": [
                basic_json("tops", "Tops", vec![
                    garment_json(1, "Tee", 0.9),
                    garment_json(2, "Blouse", 0.6),
                    garment_json(3, "Tank", 0.3),
                ]),
                basic_json("shoes", "Shoes", vec![garment_json(4, "Boot", 0.5)]),
            ],
            "debug": { "time": 0.1, "queries": [] }
        })
        .to_string()
    }

    fn fetch_epoch(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Fetch { epoch, .. } => Some(*epoch),
                _ => None,
            })
            .expect("submit issues a fetch")
    }

    fn loaded() -> Controller {
        let mut c = controller(ControllerConfig::default());
        let epoch = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        c.dispatch(Event::FetchSucceeded { epoch, body: body() })
            .unwrap();
        c
    }

    fn shown(c: &Controller) -> Vec<(String, usize)> {
        c.display()
            .map(|d| {
                d.context
                    .basics
                    .iter()
                    .map(|b| (b.identifier.clone(), b.garments.len()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn construction_reads_forms() {
        let c = controller(ControllerConfig::default());
        assert_eq!(c.state().cutoff(), Cutoff::Limit(2));
        assert_eq!(c.state().filters().get("shoes"), Some(true));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.display().is_none());
    }

    #[test]
    fn submit_then_success_renders() {
        let mut c = controller(ControllerConfig::default());
        let effects = c.dispatch(Event::Submit).unwrap();
        assert_eq!(
            effects[0],
            Effect::Fetch {
                epoch: 1,
                query: "?age=30".into()
            }
        );
        assert!(c.is_loading());
        assert!(c.display().is_none());

        let effects = c
            .dispatch(Event::FetchSucceeded { epoch: 1, body: body() })
            .unwrap();
        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(
            shown(&c),
            vec![("shoes".to_string(), 1), ("tops".to_string(), 2)]
        );
        assert_eq!(c.display().unwrap().debug.as_ref().unwrap().total_ms, 100);
    }

    #[test]
    fn filter_and_cutoff_changes_reproject_without_fetching() {
        let mut c = loaded();

        let effects = c
            .dispatch(Event::FilterChanged {
                identifier: "shoes".into(),
                enabled: false,
            })
            .unwrap();
        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(shown(&c), vec![("tops".to_string(), 2)]);
        assert_eq!(
            c.filter_form().choices(BASIC_FIELD).collect::<Vec<_>>(),
            vec![("tops", true), ("shoes", false)]
        );

        c.dispatch(Event::CutoffChanged { value: "all".into() })
            .unwrap();
        assert_eq!(shown(&c), vec![("tops".to_string(), 3)]);

        c.dispatch(Event::AllFiltersChanged { enabled: false })
            .unwrap();
        assert!(shown(&c).is_empty());
        c.dispatch(Event::AllFiltersChanged { enabled: true })
            .unwrap();
        assert_eq!(shown(&c).len(), 2);
    }

    #[test]
    fn changes_before_any_data_are_no_ops() {
        let mut c = controller(ControllerConfig::default());
        let effects = c
            .dispatch(Event::FilterChanged {
                identifier: "tops".into(),
                enabled: false,
            })
            .unwrap();
        assert!(effects.is_empty());
        assert!(c
            .dispatch(Event::CutoffChanged { value: "5".into() })
            .unwrap()
            .is_empty());
        assert_eq!(c.state().cutoff(), Cutoff::Limit(5));
        assert!(c.display().is_none());
    }

    #[test]
    fn invalid_cutoff_keeps_previous_value() {
        let mut c = loaded();
        c.dispatch(Event::CutoffChanged { value: "lots".into() })
            .unwrap();
        assert_eq!(c.state().cutoff(), Cutoff::Limit(2));
        assert!(c.error().unwrap().contains("lots"));
    }

    #[test]
    fn corrected_cutoff_clears_the_error() {
        let mut c = loaded();
        c.dispatch(Event::CutoffChanged { value: "lots".into() })
            .unwrap();
        assert!(c.error().is_some());

        c.dispatch(Event::CutoffChanged { value: "3".into() })
            .unwrap();
        assert_eq!(c.state().cutoff(), Cutoff::Limit(3));
        assert!(c.error().is_none());
    }

    #[test]
    fn corrected_cutoff_redraws_before_any_data() {
        let mut c = controller(ControllerConfig::default());
        c.dispatch(Event::CutoffChanged { value: "-1".into() })
            .unwrap();
        let effects = c
            .dispatch(Event::CutoffChanged { value: "4".into() })
            .unwrap();
        assert_eq!(effects, vec![Effect::Render]);
        assert!(c.error().is_none());
    }

    #[test]
    fn restored_invalid_cutoff_is_reported_after_refetch() {
        let mut c = loaded();
        let snapshot = HistorySnapshot::from_query("?age=30&cutoff=lots&basic=tops").unwrap();
        let effects = c.dispatch(Event::HistoryNavigated(snapshot)).unwrap();

        assert!(matches!(effects[0], Effect::Fetch { .. }));
        assert_eq!(c.state().cutoff(), Cutoff::Limit(2));
        assert!(c.error().unwrap().contains("lots"));
    }

    #[test]
    fn stale_responses_are_discarded_under_latest_only() {
        let mut c = controller(ControllerConfig::default());
        let first = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        let second = fetch_epoch(&c.dispatch(Event::Submit).unwrap());

        let stale = json!({ "basics": [basic_json("tops", "Tops", vec![])] }).to_string();
        c.dispatch(Event::FetchSucceeded { epoch: second, body: body() })
            .unwrap();
        let effects = c
            .dispatch(Event::FetchSucceeded { epoch: first, body: stale })
            .unwrap();

        assert!(effects.is_empty());
        assert_eq!(shown(&c).len(), 2);
    }

    #[test]
    fn last_arrival_wins_when_configured() {
        let mut c = controller(ControllerConfig {
            sequencing: FetchSequencing::LastArrivalWins,
            ..ControllerConfig::default()
        });
        let first = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        let second = fetch_epoch(&c.dispatch(Event::Submit).unwrap());

        let stale = json!({ "basics": [basic_json("tops", "Tops", vec![])] }).to_string();
        c.dispatch(Event::FetchSucceeded { epoch: second, body: body() })
            .unwrap();
        c.dispatch(Event::FetchSucceeded { epoch: first, body: stale })
            .unwrap();

        assert_eq!(shown(&c), vec![("tops".to_string(), 0)]);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn failed_fetch_returns_to_idle_with_error() {
        let mut c = loaded();
        let epoch = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        let effects = c
            .dispatch(Event::FetchFailed {
                epoch,
                message: "HTTP 500".into(),
            })
            .unwrap();

        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.error().unwrap().contains("HTTP 500"));
        assert_eq!(shown(&c).len(), 2);
    }

    fn last_arrival_controller() -> (Controller, u64, u64) {
        let mut c = controller(ControllerConfig {
            sequencing: FetchSequencing::LastArrivalWins,
            ..ControllerConfig::default()
        });
        let first = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        let second = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        (c, first, second)
    }

    #[test]
    fn superseded_failure_keeps_waiting_on_latest() {
        let (mut c, first, second) = last_arrival_controller();
        c.dispatch(Event::FetchFailed {
            epoch: first,
            message: "HTTP 502".into(),
        })
        .unwrap();

        assert_eq!(c.phase(), Phase::Loading { epoch: second });
        assert!(c.error().is_some());
    }

    #[test]
    fn superseded_malformed_response_keeps_waiting_on_latest() {
        let (mut c, first, second) = last_arrival_controller();
        c.dispatch(Event::FetchSucceeded {
            epoch: first,
            body: "[]".into(),
        })
        .unwrap_err();
        assert_eq!(c.phase(), Phase::Loading { epoch: second });

        c.dispatch(Event::FetchSucceeded { epoch: second, body: body() })
            .unwrap();
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.error().is_none());
    }

    #[test]
    fn malformed_payload_keeps_previous_display() {
        let mut c = loaded();
        let epoch = fetch_epoch(&c.dispatch(Event::Submit).unwrap());
        let err = c
            .dispatch(Event::FetchSucceeded {
                epoch,
                body: r#"{"basics": [{"garments": []}]}"#.into(),
            })
            .unwrap_err();

        assert!(matches!(err, VisualizerError::MalformedPayload(_)));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.error().is_some());
        assert_eq!(shown(&c).len(), 2);
    }

    #[test]
    fn expansions_are_independent_and_toggle() {
        let mut c = loaded();
        let a = GarmentKey::new("tops", "1");
        let b = GarmentKey::new("shoes", "4");

        c.dispatch(Event::GarmentExpandToggled(a.clone())).unwrap();
        c.dispatch(Event::GarmentExpandToggled(b.clone())).unwrap();
        assert!(c.detail(&a).is_some());
        assert!(c.detail(&b).is_some());

        c.dispatch(Event::GarmentExpandToggled(a.clone())).unwrap();
        assert!(c.detail(&a).is_none());
        assert!(c.detail(&b).is_some());

        c.dispatch(Event::GarmentExpandToggled(a.clone())).unwrap();
        assert!(c.detail(&a).is_some());
    }

    #[test]
    fn expanding_an_unknown_garment_is_an_error() {
        let mut c = loaded();
        let err = c
            .dispatch(Event::GarmentExpandToggled(GarmentKey::new("tops", "99")))
            .unwrap_err();
        assert!(matches!(err, VisualizerError::UnknownGarment { .. }));
    }

    #[test]
    fn snapshot_pushes_without_rendering() {
        let mut c = loaded();
        let effects = c.dispatch(Event::SnapshotRequested).unwrap();
        match &effects[..] {
            [Effect::PushHistory(entry)] => {
                assert_eq!(entry.url, "?age=30&cutoff=2&basic=tops&basic=shoes")
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn history_navigation_restores_forms_and_refetches() {
        let mut c = loaded();
        let snapshot = HistorySnapshot::from_query("?age=41&cutoff=1&basic=shoes").unwrap();
        let effects = c.dispatch(Event::HistoryNavigated(snapshot)).unwrap();

        assert_eq!(
            effects[0],
            Effect::Fetch {
                epoch: 2,
                query: "?age=41".into()
            }
        );
        assert_eq!(c.state().cutoff(), Cutoff::Limit(1));
        assert_eq!(c.state().filters().get("tops"), Some(false));
        assert_eq!(c.state().filters().get("shoes"), Some(true));
    }

    #[test]
    fn start_renders_preloaded_data_and_records_first_entry() {
        let mut c = controller(ControllerConfig::default());
        let payload = parse_payload(&body()).unwrap();
        let effects = c.start(Some(payload.clone()), false);

        assert_eq!(effects[0], Effect::Render);
        assert!(matches!(effects[1], Effect::ReplaceHistory(_)));
        assert_eq!(shown(&c).len(), 2);

        let mut revisited = controller(ControllerConfig::default());
        assert_eq!(revisited.start(Some(payload), true), vec![Effect::Render]);
        assert!(controller(ControllerConfig::default())
            .start(Some(Payload::default()), false)
            .is_empty());
    }
}
