//! Support ticket: a single-page form whose sections unlock in order

use super::field::{ChoiceOption, FieldDescriptor, FieldKind, FieldValue};
use super::form_state::FormFields;
use super::section_gate::SectionGate;
use super::step::StepGroup;
use super::validation::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSection {
    Requester,
    Issue,
    Priority,
}

impl StepGroup for TicketSection {
    const ALL: &'static [Self] = &[
        TicketSection::Requester,
        TicketSection::Issue,
        TicketSection::Priority,
    ];

    fn title(self) -> &'static str {
        match self {
            TicketSection::Requester => "Requester",
            TicketSection::Issue => "Issue",
            TicketSection::Priority => "Priority",
        }
    }

    fn field_ids(self) -> &'static [&'static str] {
        match self {
            TicketSection::Requester => &["name", "email", "company"],
            TicketSection::Issue => &["subject", "issueType", "description"],
            TicketSection::Priority => &["priority"],
        }
    }
}

pub const COMPANIES: &[ChoiceOption] = &[
    ChoiceOption::new("CITIMAX", "Citimax Group Inc."),
    ChoiceOption::new("DND ORE", "Dean and Deluca Ore"),
    ChoiceOption::new("DND ETON", "Dean and Deluca Eton"),
    ChoiceOption::new("DND Rallos", "Dean and Deluca Scout Rallos"),
    ChoiceOption::new("DND Vertis", "Dean and Deluca Vertis North"),
    ChoiceOption::new("DND Cebu", "Dean and Deluca Cebu"),
    ChoiceOption::new("DND Tanay", "Dean and Deluca Tanay"),
    ChoiceOption::new("DND Commissary", "Dean and Deluca Commissary"),
    ChoiceOption::new("Monte", "Monte De Tesoro"),
    ChoiceOption::new("Compounding", "Lifecore Compounding"),
    ChoiceOption::new("Laboratory", "Lifecore Laboratory"),
    ChoiceOption::new("Oriental", "Oriental Energy"),
    ChoiceOption::new("Hardrock", "Hardrock"),
    ChoiceOption::new("Alishan", "Alishan"),
    ChoiceOption::new("Citinickel", "Citinickel Mines"),
];

pub const ISSUE_TYPES: &[ChoiceOption] = &[
    ChoiceOption::new("Desktop", "Desktop"),
    ChoiceOption::new("Laptop", "Laptop"),
    ChoiceOption::new("Printer", "Printer"),
    ChoiceOption::new("Wi-fi", "Internet Connection"),
];

pub const PRIORITIES: &[ChoiceOption] = &[
    ChoiceOption::new("low", "Low"),
    ChoiceOption::new("medium", "Medium"),
    ChoiceOption::new("high", "High"),
    ChoiceOption::new("critical", "Critical"),
];

pub static TICKET_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor {
        id: "name",
        label: "Name",
        kind: FieldKind::Text,
        rules: &[Rule::MinLength(2, "Name must be at least 2 characters")],
    },
    FieldDescriptor {
        id: "email",
        label: "Email",
        kind: FieldKind::Text,
        rules: &[Rule::Email("Please enter a valid email address")],
    },
    FieldDescriptor {
        id: "company",
        label: "Company",
        kind: FieldKind::Choice {
            options: COMPANIES,
            allow_other: false,
        },
        rules: &[Rule::OneOf("Company name is required")],
    },
    FieldDescriptor {
        id: "subject",
        label: "Subject",
        kind: FieldKind::Text,
        rules: &[Rule::MinLength(5, "Subject must be at least 5 characters")],
    },
    FieldDescriptor {
        id: "issueType",
        label: "Issue Type",
        kind: FieldKind::Choice {
            options: ISSUE_TYPES,
            allow_other: true,
        },
        rules: &[Rule::OneOf("Please select the issue type")],
    },
    FieldDescriptor {
        id: "description",
        label: "Description",
        kind: FieldKind::Multiline,
        rules: &[Rule::MinLength(
            10,
            "Description must be at least 10 characters",
        )],
    },
    FieldDescriptor {
        id: "priority",
        label: "Priority Level",
        kind: FieldKind::Choice {
            options: PRIORITIES,
            allow_other: false,
        },
        rules: &[Rule::OneOf("Please select a priority level")],
    },
];

/// Resolution window shown after a priority is picked
pub fn priority_notice(priority: &str) -> Option<&'static str> {
    match priority {
        "low" => Some("Low priority tickets will be resolved within 7 days."),
        "medium" => Some("Medium priority tickets will be resolved within 3–5 days."),
        "high" => Some("High priority tickets will be resolved within 1 day."),
        "critical" => Some("Critical issues will be addressed as soon as possible (ASAP)."),
        _ => None,
    }
}

/// State of the support ticket view
#[derive(Debug, Clone)]
pub struct TicketForm {
    pub fields: FormFields,
    pub sections: SectionGate<TicketSection>,
    /// Priority whose notice is waiting to be acknowledged
    pub priority_notice: Option<String>,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketForm {
    pub fn new() -> Self {
        let fields = FormFields::new(&TICKET_FIELDS);
        let sections = SectionGate::new(&fields);
        Self {
            fields,
            sections,
            priority_notice: None,
        }
    }

    /// Fill the email field from the signed-in user unless already typed
    pub fn prefill_email(&mut self, email: &str) {
        if self.fields.text("email").is_empty() {
            self.fields
                .set_value("email", FieldValue::Text(email.to_string()));
            self.refresh();
        }
    }

    /// Re-derive section readiness after any edit
    pub fn refresh(&mut self) {
        self.sections.recompute(&self.fields);
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .nth(self.fields.active_field_index)
            .map(|f| f.id())
    }

    /// Whether the focused field currently accepts input
    pub fn active_is_interactive(&self) -> bool {
        self.active_id()
            .is_some_and(|id| self.sections.is_field_interactive(id))
    }

    /// Move focus to the next interactive field, skipping locked sections
    pub fn focus_next(&mut self, forward: bool) {
        let count = self.fields.iter().count();
        if count == 0 {
            return;
        }
        let ids: Vec<&'static str> = self.fields.iter().map(|f| f.id()).collect();
        let mut index = self.fields.active_field_index;
        for _ in 0..count {
            index = if forward {
                (index + 1) % count
            } else {
                (index + count - 1) % count
            };
            if self.sections.is_field_interactive(ids[index]) {
                self.fields.active_field_index = index;
                return;
            }
        }
    }

    /// Cycle the focused choice; a new priority raises its notice
    pub fn cycle_active_choice(&mut self, step: isize) {
        if !self.active_is_interactive() {
            return;
        }
        let Some(id) = self.active_id() else {
            return;
        };
        if let Some(field) = self.fields.get_mut(id) {
            field.cycle_choice(step);
            field.touched = true;
        }
        if id == "priority" {
            let selected = self.fields.text("priority").to_string();
            self.priority_notice = priority_notice(&selected).map(|_| selected);
        }
        self.refresh();
    }

    /// Whether the whole ticket may be submitted
    pub fn can_submit(&self) -> bool {
        self.sections.all_ready()
    }

    /// Clear values after a successful submission, keeping the user's email
    pub fn reset_after_submit(&mut self, email: Option<&str>) {
        self.fields.reset();
        self.priority_notice = None;
        if let Some(email) = email {
            self.prefill_email(email);
        }
        self.refresh();
    }
}
