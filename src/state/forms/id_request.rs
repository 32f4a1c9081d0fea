//! Employee ID request: a three-step form posted to the ID request endpoint

use super::field::{FieldDescriptor, FieldKind};
use super::form_state::FormFields;
use super::step::{StepController, StepGroup};
use super::validation::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRequestStep {
    EmployeeInformation,
    GovernmentIds,
    EmergencyContact,
}

impl StepGroup for IdRequestStep {
    const ALL: &'static [Self] = &[
        IdRequestStep::EmployeeInformation,
        IdRequestStep::GovernmentIds,
        IdRequestStep::EmergencyContact,
    ];

    fn title(self) -> &'static str {
        match self {
            IdRequestStep::EmployeeInformation => "Employee Information",
            IdRequestStep::GovernmentIds => "Government-issued IDs",
            IdRequestStep::EmergencyContact => "Emergency Contact",
        }
    }

    fn field_ids(self) -> &'static [&'static str] {
        match self {
            IdRequestStep::EmployeeInformation => &[
                "fullName", "address", "position", "cname", "company", "photo", "esign",
            ],
            IdRequestStep::GovernmentIds => &["sss", "tin", "philhealt", "pagibig"],
            IdRequestStep::EmergencyContact => &["emergency", "emergencynum"],
        }
    }
}

const fn text(id: &'static str, label: &'static str, rules: &'static [Rule]) -> FieldDescriptor {
    FieldDescriptor {
        id,
        label,
        kind: FieldKind::Text,
        rules,
    }
}

const fn file(id: &'static str, label: &'static str, rules: &'static [Rule]) -> FieldDescriptor {
    FieldDescriptor {
        id,
        label,
        kind: FieldKind::File,
        rules,
    }
}

pub static ID_REQUEST_FIELDS: [FieldDescriptor; 13] = [
    text("fullName", "Full Name", &[Rule::Required("Full Name is required")]),
    text("address", "Address", &[Rule::Required("Address is required")]),
    text("position", "Job Position", &[Rule::Required("Job Position is required")]),
    text("cname", "Company Name", &[Rule::Required("Company Name is required")]),
    text(
        "company",
        "Company ID Number",
        &[Rule::Required("Company ID Number is required")],
    ),
    file("photo", "Photo Upload", &[Rule::FileSelected("Photo is required")]),
    file(
        "esign",
        "E-Signature Upload",
        &[Rule::FileSelected("E-signature is required")],
    ),
    text("sss", "SSS Number", &[Rule::Required("SSS Number is required")]),
    text("tin", "TIN Number", &[Rule::Required("TIN Number is required")]),
    text(
        "philhealt",
        "PhilHealth Number",
        &[Rule::Required("PhilHealth Number is required")],
    ),
    text(
        "pagibig",
        "Pag-IBIG Number",
        &[Rule::Required("Pag-IBIG Number is required")],
    ),
    text(
        "emergency",
        "Emergency Contact Name",
        &[Rule::Required("Emergency Contact Name is required")],
    ),
    text(
        "emergencynum",
        "Emergency Contact Number",
        &[Rule::Required("Emergency Contact Number is required")],
    ),
];

/// State of the ID request view
#[derive(Debug, Clone)]
pub struct IdRequestForm {
    pub fields: FormFields,
    pub steps: StepController<IdRequestStep>,
}

impl Default for IdRequestForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRequestForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(&ID_REQUEST_FIELDS),
            steps: StepController::new(),
        }
    }

    /// Indices into `fields` of the current step's fields
    pub fn step_indices(&self) -> Vec<usize> {
        self.steps
            .current_group()
            .field_ids()
            .iter()
            .filter_map(|id| self.fields.index_of(id))
            .collect()
    }

    /// Move focus to the first field of the current step
    pub fn focus_step_start(&mut self) {
        if let Some(first) = self.step_indices().first() {
            self.fields.active_field_index = *first;
        }
    }

    /// Cycle focus within the current step
    pub fn focus_next(&mut self, forward: bool) {
        let indices = self.step_indices();
        if indices.is_empty() {
            return;
        }
        let position = indices
            .iter()
            .position(|i| *i == self.fields.active_field_index)
            .unwrap_or(0);
        let next = if forward {
            (position + 1) % indices.len()
        } else {
            (position + indices.len() - 1) % indices.len()
        };
        self.fields.active_field_index = indices[next];
    }

    /// Advance to the next step, focusing its first field on success
    pub fn next_step(&mut self) -> bool {
        let moved = self.steps.advance(&mut self.fields);
        if moved {
            self.focus_step_start();
        }
        moved
    }

    pub fn previous_step(&mut self) {
        self.steps.retreat();
        self.focus_step_start();
    }
}
