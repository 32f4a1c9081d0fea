//! Form state: an ordered set of fields with a focus cursor

use super::field::{FieldDescriptor, FieldValue, FormField};

/// Trait for common form focus operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField>;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Field values of one form instance, in definition order
#[derive(Debug, Clone)]
pub struct FormFields {
    fields: Vec<FormField>,
    pub active_field_index: usize,
}

impl FormFields {
    pub fn new(descriptors: &'static [FieldDescriptor]) -> Self {
        Self {
            fields: descriptors.iter().map(FormField::new).collect(),
            active_field_index: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }

    pub fn get(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.id() == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id() == id)
    }

    /// Text value of a field, empty if the id is unknown
    pub fn text(&self, id: &str) -> &str {
        self.get(id).map(|f| f.as_text()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: &str, value: FieldValue) {
        if let Some(field) = self.get_mut(id) {
            field.value = value;
        }
    }

    /// Whether every listed field currently validates
    pub fn all_valid(&self, ids: &[&str]) -> bool {
        ids.iter()
            .all(|id| self.get(id).is_some_and(|f| f.validate().valid))
    }

    /// Whether every field of the form validates
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.validate().valid)
    }

    /// Mark fields as touched so their validation messages become visible
    pub fn reveal(&mut self, ids: &[&str]) {
        for field in self.fields.iter_mut().filter(|f| ids.contains(&f.id())) {
            field.touched = true;
        }
    }

    pub fn reveal_all(&mut self) {
        for field in &mut self.fields {
            field.touched = true;
        }
    }

    /// Snapshot of `(id, value)` pairs in definition order
    pub fn values(&self) -> Vec<(&'static str, FieldValue)> {
        self.fields
            .iter()
            .map(|f| (f.id(), f.value.clone()))
            .collect()
    }

    /// Restore every field to its default and move focus to the top
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.active_field_index = 0;
    }
}

impl Form for FormFields {
    fn field_count(&self) -> usize {
        self.fields.len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.fields.len().saturating_sub(1));
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.active_field_index)
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::FieldKind;
    use crate::state::forms::validation::Rule;

    static FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor {
            id: "name",
            label: "Name",
            kind: FieldKind::Text,
            rules: &[Rule::Required("Please enter your name.")],
        },
        FieldDescriptor {
            id: "email",
            label: "Email",
            kind: FieldKind::Text,
            rules: &[Rule::Email("Enter a valid email address.")],
        },
        FieldDescriptor {
            id: "message",
            label: "Message",
            kind: FieldKind::Multiline,
            rules: &[Rule::Required("Please enter your message.")],
        },
    ];

    fn filled() -> FormFields {
        let mut form = FormFields::new(&FIELDS);
        form.get_mut("name").unwrap().set_text("Jane");
        form.get_mut("email").unwrap().set_text("jane@acme.com");
        form.get_mut("message").unwrap().set_text("Hello");
        form
    }

    #[test]
    fn test_new_has_defaults() {
        let form = FormFields::new(&FIELDS);
        assert_eq!(form.field_count(), 3);
        assert_eq!(form.active_field(), 0);
        assert_eq!(form.text("name"), "");
        assert!(form.iter().all(|f| !f.touched));
    }

    #[test]
    fn test_next_field_cycles() {
        let mut form = FormFields::new(&FIELDS);
        for _ in 0..3 {
            form.next_field();
        }
        assert_eq!(form.active_field(), 0);
    }

    #[test]
    fn test_prev_field_cycles() {
        let mut form = FormFields::new(&FIELDS);
        form.prev_field();
        assert_eq!(form.active_field(), 2);
    }

    #[test]
    fn test_set_active_field_clamps() {
        let mut form = FormFields::new(&FIELDS);
        form.set_active_field(100);
        assert_eq!(form.active_field(), 2);
    }

    #[test]
    fn test_get_field_returns_correct_fields() {
        let form = FormFields::new(&FIELDS);
        assert_eq!(form.get_field(0).unwrap().id(), "name");
        assert_eq!(form.get_field(1).unwrap().id(), "email");
        assert_eq!(form.get_field(2).unwrap().id(), "message");
        assert!(form.get_field(3).is_none());
    }

    #[test]
    fn test_all_valid_subset() {
        let mut form = FormFields::new(&FIELDS);
        form.get_mut("name").unwrap().set_text("Jane");
        assert!(form.all_valid(&["name"]));
        assert!(!form.all_valid(&["name", "email"]));
        assert!(!form.is_valid());
    }

    #[test]
    fn test_unknown_id_is_not_valid() {
        let form = filled();
        assert!(!form.all_valid(&["missing"]));
    }

    #[test]
    fn test_reveal_marks_only_listed_fields() {
        let mut form = FormFields::new(&FIELDS);
        form.reveal(&["email"]);
        assert!(!form.get("name").unwrap().touched);
        assert!(form.get("email").unwrap().touched);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = filled();
        form.active_field_index = 2;
        form.reveal_all();
        form.reset();
        assert!(form.iter().all(|f| f.as_text().is_empty() && !f.touched));
        assert_eq!(form.active_field(), 0);
    }

    #[test]
    fn test_values_in_definition_order() {
        let form = filled();
        let ids: Vec<_> = form.values().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["name", "email", "message"]);
    }
}
