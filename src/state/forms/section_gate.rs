//! Single-page form sections that unlock in order

use super::form_state::FormFields;
use super::step::StepGroup;
use std::marker::PhantomData;

/// Readiness of each section of a single-page form.
///
/// All sections are shown at once; section `i` accepts input only when
/// section `i - 1` is ready. The first section is always interactive.
#[derive(Debug, Clone)]
pub struct SectionGate<S: StepGroup> {
    ready: Vec<bool>,
    _sections: PhantomData<S>,
}

impl<S: StepGroup> SectionGate<S> {
    pub fn new(form: &FormFields) -> Self {
        let mut gate = Self {
            ready: vec![false; S::ALL.len()],
            _sections: PhantomData,
        };
        gate.recompute(form);
        gate
    }

    /// Re-derive every section's readiness; call after any field change
    pub fn recompute(&mut self, form: &FormFields) {
        for (ready, section) in self.ready.iter_mut().zip(S::ALL) {
            *ready = form.all_valid(section.field_ids());
        }
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.ready.get(index).copied().unwrap_or(false)
    }

    pub fn is_interactive(&self, index: usize) -> bool {
        index == 0 || self.is_ready(index - 1)
    }

    /// Section index of the given field
    pub fn section_of(&self, field_id: &str) -> Option<usize> {
        S::ALL
            .iter()
            .position(|section| section.field_ids().contains(&field_id))
    }

    /// Fields outside every section are always interactive
    pub fn is_field_interactive(&self, field_id: &str) -> bool {
        self.section_of(field_id)
            .map(|index| self.is_interactive(index))
            .unwrap_or(true)
    }

    pub fn all_ready(&self) -> bool {
        self.ready.iter().all(|r| *r)
    }

    /// First section that is not ready yet
    pub fn first_blocking(&self) -> Option<S> {
        self.ready
            .iter()
            .position(|r| !r)
            .map(|index| S::ALL[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::{FieldDescriptor, FieldKind};
    use crate::state::forms::validation::Rule;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Section {
        Who,
        What,
        When,
    }

    impl StepGroup for Section {
        const ALL: &'static [Self] = &[Section::Who, Section::What, Section::When];

        fn title(self) -> &'static str {
            match self {
                Section::Who => "Who",
                Section::What => "What",
                Section::When => "When",
            }
        }

        fn field_ids(self) -> &'static [&'static str] {
            match self {
                Section::Who => &["name"],
                Section::What => &["subject", "detail"],
                Section::When => &["date"],
            }
        }
    }

    const REQUIRED: &[Rule] = &[Rule::Required("required")];

    static FIELDS: [FieldDescriptor; 5] = [
        FieldDescriptor {
            id: "name",
            label: "Name",
            kind: FieldKind::Text,
            rules: REQUIRED,
        },
        FieldDescriptor {
            id: "subject",
            label: "Subject",
            kind: FieldKind::Text,
            rules: REQUIRED,
        },
        FieldDescriptor {
            id: "detail",
            label: "Detail",
            kind: FieldKind::Multiline,
            rules: REQUIRED,
        },
        FieldDescriptor {
            id: "date",
            label: "Date",
            kind: FieldKind::Text,
            rules: REQUIRED,
        },
        FieldDescriptor {
            id: "notes",
            label: "Notes",
            kind: FieldKind::Multiline,
            rules: &[],
        },
    ];

    fn set(form: &mut FormFields, id: &str, value: &str) {
        form.get_mut(id).unwrap().set_text(value);
    }

    #[test]
    fn test_only_first_section_interactive_initially() {
        let form = FormFields::new(&FIELDS);
        let gate = SectionGate::<Section>::new(&form);
        assert!(gate.is_interactive(0));
        assert!(!gate.is_interactive(1));
        assert!(!gate.is_interactive(2));
        assert!(gate.is_field_interactive("name"));
        assert!(!gate.is_field_interactive("subject"));
    }

    #[test]
    fn test_sections_unlock_in_order() {
        let mut form = FormFields::new(&FIELDS);
        let mut gate = SectionGate::<Section>::new(&form);

        set(&mut form, "name", "Jane");
        gate.recompute(&form);
        assert!(gate.is_interactive(1));
        assert!(!gate.is_interactive(2));

        set(&mut form, "subject", "Printer jam");
        gate.recompute(&form);
        assert!(!gate.is_interactive(2), "half-filled section must not unlock the next");

        set(&mut form, "detail", "Paper stuck in tray 2");
        gate.recompute(&form);
        assert!(gate.is_interactive(2));
        assert!(!gate.all_ready());
    }

    #[test]
    fn test_later_section_relocks_when_earlier_becomes_invalid() {
        let mut form = FormFields::new(&FIELDS);
        set(&mut form, "name", "Jane");
        let mut gate = SectionGate::<Section>::new(&form);
        assert!(gate.is_interactive(1));

        set(&mut form, "name", "");
        gate.recompute(&form);
        assert!(!gate.is_interactive(1));
    }

    #[test]
    fn test_never_interactive_while_previous_not_ready() {
        let mut form = FormFields::new(&FIELDS);
        let mut gate = SectionGate::<Section>::new(&form);
        let inputs = [("date", "today"), ("detail", "x"), ("name", "Jane"), ("subject", "y")];
        for (id, value) in inputs {
            set(&mut form, id, value);
            gate.recompute(&form);
            for i in 1..Section::ALL.len() {
                if !gate.is_ready(i - 1) {
                    assert!(!gate.is_interactive(i));
                }
            }
        }
        assert!(gate.all_ready());
        assert_eq!(gate.first_blocking(), None);
    }

    #[test]
    fn test_first_blocking_section() {
        let mut form = FormFields::new(&FIELDS);
        set(&mut form, "name", "Jane");
        let gate = SectionGate::<Section>::new(&form);
        assert_eq!(gate.first_blocking(), Some(Section::What));
    }

    #[test]
    fn test_field_outside_sections_is_interactive() {
        let form = FormFields::new(&FIELDS);
        let gate = SectionGate::<Section>::new(&form);
        assert_eq!(gate.section_of("notes"), None);
        assert!(gate.is_field_interactive("notes"));
    }
}
