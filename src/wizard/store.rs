use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    Address, ContactDetail, Customer, CustomerName, Gender, IdentityProof, Language,
};
use crate::errors::WizardError;

/// Partial customer record accumulated across wizard steps.
///
/// Absent keys stand for the empty value; the sequences start empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<CustomerName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub contact_details: Vec<ContactDetail>,
    pub identity_proofs: Vec<IdentityProof>,
}

impl CustomerDraft {
    /// Builds the full record for submission. Fails on the first missing key.
    pub fn to_customer(&self) -> Result<Customer, WizardError> {
        Ok(Customer {
            id: None,
            name: self
                .name
                .clone()
                .ok_or(WizardError::IncompleteRecord("name"))?,
            date_of_birth: self
                .date_of_birth
                .ok_or(WizardError::IncompleteRecord("dateOfBirth"))?,
            gender: self.gender.ok_or(WizardError::IncompleteRecord("gender"))?,
            language: self
                .language
                .ok_or(WizardError::IncompleteRecord("language"))?,
            address: self
                .address
                .clone()
                .ok_or(WizardError::IncompleteRecord("address"))?,
            contact_details: self.contact_details.clone(),
            identity_proofs: self.identity_proofs.clone(),
        })
    }
}

/// Top-level keys to overwrite in the draft. `None` leaves a key untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<CustomerName>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub language: Option<Language>,
    pub address: Option<Address>,
    pub contact_details: Option<Vec<ContactDetail>>,
    pub identity_proofs: Option<Vec<IdentityProof>>,
}

impl CustomerPatch {
    fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.name.is_some() {
            keys.push("name");
        }
        if self.date_of_birth.is_some() {
            keys.push("dateOfBirth");
        }
        if self.gender.is_some() {
            keys.push("gender");
        }
        if self.language.is_some() {
            keys.push("language");
        }
        if self.address.is_some() {
            keys.push("address");
        }
        if self.contact_details.is_some() {
            keys.push("contactDetails");
        }
        if self.identity_proofs.is_some() {
            keys.push("identityProofs");
        }
        keys
    }
}

/// Session-scoped storage for the record under construction. No validation
/// happens here.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    draft: CustomerDraft,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &CustomerDraft {
        &self.draft
    }

    /// Shallow merge: each present key replaces the stored value wholesale.
    pub fn merge(&mut self, patch: CustomerPatch) {
        tracing::debug!(keys = ?patch.keys(), "merging into customer draft");
        let CustomerPatch {
            name,
            date_of_birth,
            gender,
            language,
            address,
            contact_details,
            identity_proofs,
        } = patch;
        if let Some(name) = name {
            self.draft.name = Some(name);
        }
        if let Some(date) = date_of_birth {
            self.draft.date_of_birth = Some(date);
        }
        if let Some(gender) = gender {
            self.draft.gender = Some(gender);
        }
        if let Some(language) = language {
            self.draft.language = Some(language);
        }
        if let Some(address) = address {
            self.draft.address = Some(address);
        }
        if let Some(contacts) = contact_details {
            self.draft.contact_details = contacts;
        }
        if let Some(proofs) = identity_proofs {
            self.draft.identity_proofs = proofs;
        }
    }

    pub fn reset(&mut self) {
        tracing::debug!("customer draft reset");
        self.draft = CustomerDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Country;

    fn name(first: &str, last: &str) -> CustomerName {
        CustomerName {
            first_name: first.into(),
            middle_name: None,
            last_name: last.into(),
        }
    }

    fn address(line1: &str, line2: Option<&str>, city: &str) -> Address {
        Address {
            address_line1: line1.into(),
            address_line2: line2.map(str::to_string),
            city: city.into(),
            state: "CA".into(),
            country: Country::UnitedStates,
            zip_code: "94000".into(),
        }
    }

    #[test]
    fn merge_replaces_nested_objects_wholesale() {
        let mut store = FormStore::new();
        store.merge(CustomerPatch {
            name: Some(name("Grace", "Hopper")),
            address: Some(address("1 Main St", Some("Apt 4"), "Springfield")),
            ..Default::default()
        });

        store.merge(CustomerPatch {
            address: Some(address("9 Elm Rd", None, "Shelbyville")),
            ..Default::default()
        });

        let draft = store.draft();
        assert_eq!(draft.name, Some(name("Grace", "Hopper")));
        let stored = draft.address.as_ref().unwrap();
        assert_eq!(stored.address_line1, "9 Elm Rd");
        assert_eq!(stored.address_line2, None);
        assert_eq!(stored.city, "Shelbyville");
    }

    #[test]
    fn merge_replaces_sequences_instead_of_appending() {
        let mut store = FormStore::new();
        let email = ContactDetail {
            kind: crate::domain::ContactType::Email,
            value: "a@b.co".into(),
            dial_code: None,
        };
        let phone = ContactDetail {
            kind: crate::domain::ContactType::Phone,
            value: "1234567890".into(),
            dial_code: Some("1".into()),
        };
        store.merge(CustomerPatch {
            contact_details: Some(vec![email.clone(), phone.clone()]),
            ..Default::default()
        });
        store.merge(CustomerPatch {
            contact_details: Some(vec![phone.clone()]),
            ..Default::default()
        });
        assert_eq!(store.draft().contact_details, vec![phone]);
    }

    #[test]
    fn reset_restores_empty_shape() {
        let mut store = FormStore::new();
        store.merge(CustomerPatch {
            name: Some(name("Alan", "Turing")),
            gender: Some(Gender::Male),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.draft(), &CustomerDraft::default());

        let json = serde_json::to_value(store.draft()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "contactDetails": [], "identityProofs": [] })
        );
    }

    #[test]
    fn to_customer_reports_first_missing_key() {
        let mut store = FormStore::new();
        store.merge(CustomerPatch {
            name: Some(name("Alan", "Turing")),
            ..Default::default()
        });
        let err = store.draft().to_customer().unwrap_err();
        assert!(matches!(err, WizardError::IncompleteRecord("dateOfBirth")));
    }
}
