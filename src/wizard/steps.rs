//! Editable state for each wizard step.
//!
//! A step form is seeded from the draft when its screen is shown, edited
//! locally and validated on submit. Nothing reaches the store until the
//! resulting payload is handed to [`Wizard::advance`](super::Wizard::advance).

use chrono::NaiveDate;

use crate::domain::Choice;
use crate::wizard::machine::StepPayload;
use crate::wizard::store::CustomerDraft;
use crate::wizard::validation::{
    validate_address, validate_contacts, validate_identity_proofs, validate_personal,
    AddressFields, ContactEntry, FieldErrors, IdentityEntry, PersonalFields,
};

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn choice_text<C: Choice>(choice: Option<C>) -> String {
    choice
        .map(|value| value.wire_value().to_string())
        .unwrap_or_default()
}

/// Common surface of the four data-entry steps.
pub trait StepForm {
    fn title(&self) -> &'static str;

    /// Errors from the most recent submit attempt.
    fn errors(&self) -> &FieldErrors;

    /// Validates the local values. On failure the errors are kept on the form
    /// and `None` is returned.
    fn submit(&mut self) -> Option<StepPayload>;
}

fn settle<T>(
    errors: &mut FieldErrors,
    outcome: Result<T, FieldErrors>,
    wrap: impl FnOnce(T) -> StepPayload,
) -> Option<StepPayload> {
    match outcome {
        Ok(valid) => {
            *errors = FieldErrors::new();
            Some(wrap(valid))
        }
        Err(found) => {
            tracing::debug!(keys = ?found.keys().collect::<Vec<_>>(), "step validation failed");
            *errors = found;
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonalForm {
    pub fields: PersonalFields,
    errors: FieldErrors,
}

impl PersonalForm {
    pub fn from_draft(draft: &CustomerDraft) -> Self {
        let name = draft.name.clone().unwrap_or_default();
        Self {
            fields: PersonalFields {
                first_name: name.first_name,
                middle_name: name.middle_name.unwrap_or_default(),
                last_name: name.last_name,
                date_of_birth: date_text(draft.date_of_birth),
                gender: choice_text(draft.gender),
                language: choice_text(draft.language),
            },
            errors: FieldErrors::new(),
        }
    }
}

impl StepForm for PersonalForm {
    fn title(&self) -> &'static str {
        "Personal Details"
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn submit(&mut self) -> Option<StepPayload> {
        let outcome = validate_personal(&self.fields);
        settle(&mut self.errors, outcome, StepPayload::Personal)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddressForm {
    pub fields: AddressFields,
    errors: FieldErrors,
}

impl AddressForm {
    pub fn from_draft(draft: &CustomerDraft) -> Self {
        let fields = match &draft.address {
            Some(address) => AddressFields {
                address_line1: address.address_line1.clone(),
                address_line2: address.address_line2.clone().unwrap_or_default(),
                city: address.city.clone(),
                state: address.state.clone(),
                country: address.country.wire_value().to_string(),
                zip_code: address.zip_code.clone(),
            },
            None => AddressFields::default(),
        };
        Self {
            fields,
            errors: FieldErrors::new(),
        }
    }
}

impl StepForm for AddressForm {
    fn title(&self) -> &'static str {
        "Address"
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn submit(&mut self) -> Option<StepPayload> {
        let outcome = validate_address(&self.fields);
        settle(&mut self.errors, outcome, StepPayload::Address)
    }
}

/// Contact methods step. Always holds at least one entry.
#[derive(Debug, Clone)]
pub struct ContactForm {
    entries: Vec<ContactEntry>,
    errors: FieldErrors,
}

impl ContactForm {
    pub fn from_draft(draft: &CustomerDraft) -> Self {
        let mut entries: Vec<ContactEntry> = draft
            .contact_details
            .iter()
            .map(|contact| ContactEntry {
                kind: contact.kind.wire_value().to_string(),
                value: contact.value.clone(),
                dial_code: contact.dial_code.clone().unwrap_or_default(),
            })
            .collect();
        if entries.is_empty() {
            entries.push(ContactEntry::default());
        }
        Self {
            entries,
            errors: FieldErrors::new(),
        }
    }

    pub fn entries(&self) -> &[ContactEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut ContactEntry> {
        self.entries.get_mut(index)
    }

    /// Appends a blank email entry and returns its index.
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(ContactEntry::default());
        self.entries.len() - 1
    }

    pub fn can_remove(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn remove_entry(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }
}

impl StepForm for ContactForm {
    fn title(&self) -> &'static str {
        "Contact Details"
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn submit(&mut self) -> Option<StepPayload> {
        let outcome = validate_contacts(&self.entries);
        settle(&mut self.errors, outcome, StepPayload::Contact)
    }
}

/// Identity proofs step. Always holds at least one entry.
#[derive(Debug, Clone)]
pub struct IdentityForm {
    entries: Vec<IdentityEntry>,
    errors: FieldErrors,
}

impl IdentityForm {
    pub fn from_draft(draft: &CustomerDraft) -> Self {
        let mut entries: Vec<IdentityEntry> = draft
            .identity_proofs
            .iter()
            .map(|proof| IdentityEntry {
                kind: proof.kind.wire_value().to_string(),
                value: proof.value.clone(),
                issued_date: date_text(Some(proof.issued_date)),
                expiry_date: date_text(Some(proof.expiry_date)),
            })
            .collect();
        if entries.is_empty() {
            entries.push(IdentityEntry::default());
        }
        Self {
            entries,
            errors: FieldErrors::new(),
        }
    }

    pub fn entries(&self) -> &[IdentityEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut IdentityEntry> {
        self.entries.get_mut(index)
    }

    pub fn add_entry(&mut self) -> usize {
        self.entries.push(IdentityEntry::default());
        self.entries.len() - 1
    }

    pub fn can_remove(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn remove_entry(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }
}

impl StepForm for IdentityForm {
    fn title(&self) -> &'static str {
        "Identity Proofs"
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn submit(&mut self) -> Option<StepPayload> {
        let outcome = validate_identity_proofs(&self.entries);
        settle(&mut self.errors, outcome, StepPayload::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactDetail, ContactType, CustomerName};

    #[test]
    fn contact_form_seeds_one_blank_email_entry() {
        let form = ContactForm::from_draft(&CustomerDraft::default());
        assert_eq!(form.entries().len(), 1);
        assert_eq!(form.entries()[0].kind, "email");
        assert!(form.entries()[0].value.is_empty());
        assert!(!form.can_remove());
    }

    #[test]
    fn identity_form_seeds_one_blank_entry() {
        let form = IdentityForm::from_draft(&CustomerDraft::default());
        assert_eq!(form.entries(), &[IdentityEntry::default()]);
    }

    #[test]
    fn remove_is_refused_for_last_entry() {
        let mut form = ContactForm::from_draft(&CustomerDraft::default());
        assert!(!form.remove_entry(0));
        let added = form.add_entry();
        assert_eq!(added, 1);
        assert!(form.remove_entry(0));
        assert_eq!(form.entries().len(), 1);
        assert!(!form.remove_entry(0));
    }

    #[test]
    fn personal_form_seeds_from_draft() {
        let draft = CustomerDraft {
            name: Some(CustomerName {
                first_name: "Ada".into(),
                middle_name: None,
                last_name: "Lovelace".into(),
            }),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10),
            gender: Some(crate::domain::Gender::Female),
            ..Default::default()
        };
        let form = PersonalForm::from_draft(&draft);
        assert_eq!(form.fields.first_name, "Ada");
        assert_eq!(form.fields.date_of_birth, "1815-12-10");
        assert_eq!(form.fields.gender, "female");
        assert!(form.fields.language.is_empty());
    }

    #[test]
    fn contact_form_seeds_stored_entries() {
        let draft = CustomerDraft {
            contact_details: vec![ContactDetail {
                kind: ContactType::Phone,
                value: "1234567890".into(),
                dial_code: Some("91".into()),
            }],
            ..Default::default()
        };
        let form = ContactForm::from_draft(&draft);
        assert_eq!(form.entries().len(), 1);
        assert_eq!(form.entries()[0].kind, "phone");
        assert_eq!(form.entries()[0].dial_code, "91");
    }

    #[test]
    fn failed_submit_keeps_errors_and_next_submit_replaces_them() {
        let mut form = AddressForm::from_draft(&CustomerDraft::default());
        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), 5);

        form.fields.address_line1 = "1 Main St".into();
        form.fields.city = "Toronto".into();
        form.fields.state = "ON".into();
        form.fields.country = "Canada".into();
        assert!(form.submit().is_none());
        let keys: Vec<&str> = form.errors().keys().collect();
        assert_eq!(keys, vec!["zipCode"]);

        form.fields.zip_code = "M5V".into();
        assert!(matches!(form.submit(), Some(StepPayload::Address(_))));
        assert!(form.errors().is_empty());
    }
}
