//! Named form controls the visualizer reads and writes.
//!
//! Controls are addressed only by name (and, for choices, by value), so the
//! same surface backs the pipeline form, the filter form and any restored
//! history entry regardless of how the controls are drawn.

use crate::config::{BASIC_FIELD, CUTOFF_FIELD};
use crate::history::{DecodedFields, FieldPair};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    /// Free text, or a single-choice select when `options` is non-empty.
    Field {
        name: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    /// A checkbox; submitted only when checked.
    Choice {
        name: String,
        #[serde(default)]
        label: String,
        value: String,
        #[serde(default)]
        checked: bool,
        /// Batch buttons toggle every choice sharing a group
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
    },
}

impl Control {
    pub fn name(&self) -> &str {
        match self {
            Control::Field { name, .. } | Control::Choice { name, .. } => name,
        }
    }
}

/// An ordered set of controls, serialized in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSurface {
    controls: Vec<Control>,
}

impl FormSurface {
    pub fn new(controls: Vec<Control>) -> Self {
        Self { controls }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// The pairs a browser would submit for this form.
    pub fn serialize(&self) -> Vec<FieldPair> {
        self.controls
            .iter()
            .filter_map(|control| match control {
                Control::Field { name, value, .. } => Some(FieldPair::new(name, value)),
                Control::Choice {
                    name,
                    value,
                    checked: true,
                    ..
                } => Some(FieldPair::new(name, value)),
                Control::Choice { .. } => None,
            })
            .collect()
    }

    /// Value of the first field with this name.
    pub fn field(&self, field_name: &str) -> Option<&str> {
        self.controls.iter().find_map(|control| match control {
            Control::Field { name, value, .. } if name == field_name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns whether a field with that name exists.
    pub fn set_field(&mut self, field_name: &str, new_value: &str) -> bool {
        let mut found = false;
        for control in self.controls.iter_mut() {
            if let Control::Field { name, value, .. } = control {
                if name == field_name {
                    *value = new_value.to_string();
                    found = true;
                }
            }
        }
        found
    }

    /// `(value, checked)` for every choice with this name, in order.
    pub fn choices<'a>(&'a self, choice_name: &'a str) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        self.controls.iter().filter_map(move |control| match control {
            Control::Choice {
                name,
                value,
                checked,
                ..
            } if name == choice_name => Some((value.as_str(), *checked)),
            _ => None,
        })
    }

    /// Returns whether a matching choice exists.
    pub fn set_checked(&mut self, choice_name: &str, choice_value: &str, is_checked: bool) -> bool {
        let mut found = false;
        for control in self.controls.iter_mut() {
            if let Control::Choice {
                name,
                value,
                checked,
                ..
            } = control
            {
                if name == choice_name && value == choice_value {
                    *checked = is_checked;
                    found = true;
                }
            }
        }
        found
    }

    pub fn set_all_checked(&mut self, choice_name: &str, is_checked: bool) {
        for control in self.controls.iter_mut() {
            if let Control::Choice { name, checked, .. } = control {
                if name == choice_name {
                    *checked = is_checked;
                }
            }
        }
    }

    /// Check or uncheck every choice in a batch group.
    pub fn set_group(&mut self, group_name: &str, is_checked: bool) {
        for control in self.controls.iter_mut() {
            if let Control::Choice { group, checked, .. } = control {
                if group.as_deref() == Some(group_name) {
                    *checked = is_checked;
                }
            }
        }
    }

    /// Write decoded history values back onto the controls.
    ///
    /// A field takes its decoded value (the first one if several were
    /// recorded) and is left alone when its name is absent. A choice is
    /// checked exactly when its value was recorded under its name, so a
    /// name missing from the entry leaves all of its choices unchecked.
    /// Names without a control are ignored.
    pub fn apply(&mut self, decoded: &DecodedFields) {
        for control in self.controls.iter_mut() {
            match control {
                Control::Field { name, value, .. } => {
                    if let Some(first) = decoded.get(name).and_then(|v| v.first()) {
                        *value = first.to_string();
                    }
                }
                Control::Choice {
                    name,
                    value,
                    checked,
                    ..
                } => {
                    *checked = decoded.get(name).is_some_and(|v| v.contains(value));
                }
            }
        }
    }
}

/// One basic filter checkbox as declared by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicFilter {
    pub slug: String,
    pub name: String,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool {
    true
}

/// Everything a page declares up front: the fetch endpoint, the pipeline
/// form, the basic filters, the initial cutoff and any pre-rendered data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageLayout {
    pub endpoint: String,
    #[serde(default)]
    pub fields: FormSurface,
    #[serde(default)]
    pub basics: Vec<BasicFilter>,
    #[serde(default)]
    pub cutoff: String,
    #[serde(default)]
    pub recommendations: Option<serde_json::Value>,
}

impl PageLayout {
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The filter form: the cutoff field followed by one choice per basic.
    pub fn filter_form(&self) -> FormSurface {
        let mut controls = vec![Control::Field {
            name: CUTOFF_FIELD.to_string(),
            label: "Garments per basic".to_string(),
            value: self.cutoff.clone(),
            options: Vec::new(),
        }];
        controls.extend(self.basics.iter().map(|basic| Control::Choice {
            name: BASIC_FIELD.to_string(),
            label: basic.name.clone(),
            value: basic.slug.clone(),
            checked: basic.checked,
            group: None,
        }));
        FormSurface::new(controls)
    }
}
