//! Per-step validation rules.
//!
//! Each step validates the raw values typed by the user and, when every rule
//! passes, produces a typed payload wrapped in [`Validated`]. That wrapper can
//! only be created here, so the wizard cannot be advanced with unchecked data.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{
    Address, Choice, ContactDetail, ContactType, Country, CustomerName, Gender, IdentityProof,
    IdentityProofType, Language,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email pattern"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,}$").expect("valid phone pattern"));

/// Field key to error message, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, message)| (key.as_str(), message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<Validated<T>, FieldErrors> {
        if self.is_empty() {
            Ok(Validated(value()))
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(key, message)| format!("{key}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// Key for a field of the `index`-th entry of a repeated group.
pub fn entry_key(field: &str, index: usize) -> String {
    format!("{field}-{index}")
}

/// A payload that passed its step's validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Raw values of the personal details step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalFields {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalDetails {
    pub name: CustomerName,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub language: Language,
}

/// Raw values of the address step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// Raw values of one contact entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub kind: String,
    pub value: String,
    pub dial_code: String,
}

impl Default for ContactEntry {
    fn default() -> Self {
        Self {
            kind: ContactType::Email.wire_value().to_string(),
            value: String::new(),
            dial_code: String::new(),
        }
    }
}

/// Raw values of one identity proof entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityEntry {
    pub kind: String,
    pub value: String,
    pub issued_date: String,
    pub expiry_date: String,
}

fn required<'a>(
    value: &'a str,
    key: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(key, message);
        None
    } else {
        Some(trimmed)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required_date(
    value: &str,
    key: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let raw = required(value, key, message, errors)?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(key, "Use YYYY-MM-DD format");
            None
        }
    }
}

fn required_choice<C: Choice>(
    value: &str,
    key: &str,
    missing: &str,
    field_label: &str,
    errors: &mut FieldErrors,
) -> Option<C> {
    let raw = required(value, key, missing, errors)?;
    match C::parse(raw) {
        Some(choice) => Some(choice),
        None => {
            errors.insert(key, format!("Select a valid {field_label}"));
            None
        }
    }
}

pub fn validate_personal(
    fields: &PersonalFields,
) -> Result<Validated<PersonalDetails>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let first_name = required(
        &fields.first_name,
        "firstName",
        "First name is required",
        &mut errors,
    );
    let last_name = required(&fields.last_name, "lastName", "Last name is required", &mut errors);
    let date_of_birth = required_date(
        &fields.date_of_birth,
        "dateOfBirth",
        "Date of birth is required",
        &mut errors,
    );
    let gender: Option<Gender> =
        required_choice(&fields.gender, "gender", "Gender is required", "gender", &mut errors);
    let language: Option<Language> = required_choice(
        &fields.language,
        "language",
        "Language is required",
        "language",
        &mut errors,
    );

    match (first_name, last_name, date_of_birth, gender, language) {
        (Some(first), Some(last), Some(date_of_birth), Some(gender), Some(language)) => {
            errors.into_result(|| PersonalDetails {
                name: CustomerName {
                    first_name: first.to_string(),
                    middle_name: optional(&fields.middle_name),
                    last_name: last.to_string(),
                },
                date_of_birth,
                gender,
                language,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_address(fields: &AddressFields) -> Result<Validated<Address>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let line1 = required(
        &fields.address_line1,
        "addressLine1",
        "Address line 1 is required",
        &mut errors,
    );
    let city = required(&fields.city, "city", "City is required", &mut errors);
    let state = required(&fields.state, "state", "State is required", &mut errors);
    let country: Option<Country> =
        required_choice(&fields.country, "country", "Country is required", "country", &mut errors);
    let zip_code = required(&fields.zip_code, "zipCode", "Zip code is required", &mut errors);

    match (line1, city, state, country, zip_code) {
        (Some(line1), Some(city), Some(state), Some(country), Some(zip_code)) => {
            errors.into_result(|| Address {
                address_line1: line1.to_string(),
                address_line2: optional(&fields.address_line2),
                city: city.to_string(),
                state: state.to_string(),
                country,
                zip_code: zip_code.to_string(),
            })
        }
        _ => Err(errors),
    }
}

fn validate_contact(
    entry: &ContactEntry,
    index: usize,
    errors: &mut FieldErrors,
) -> Option<ContactDetail> {
    let type_key = entry_key("type", index);
    let value_key = entry_key("value", index);
    let kind: Option<ContactType> = required_choice(
        &entry.kind,
        &type_key,
        "Contact type is required",
        "contact type",
        errors,
    );
    let value = required(&entry.value, &value_key, "Contact value is required", errors);

    let value = value?;
    // Patterns see the value as typed; surrounding whitespace is invalid.
    match kind {
        Some(ContactType::Email) if !EMAIL_PATTERN.is_match(&entry.value) => {
            errors.insert(value_key, "Please enter a valid email address");
            None
        }
        Some(ContactType::Phone) if !PHONE_PATTERN.is_match(&entry.value) => {
            errors.insert(value_key, "Please enter a valid phone number");
            None
        }
        Some(kind) => Some(ContactDetail {
            kind,
            value: value.to_string(),
            dial_code: match kind {
                ContactType::Phone => optional(&entry.dial_code),
                ContactType::Email => None,
            },
        }),
        None => None,
    }
}

pub fn validate_contacts(
    entries: &[ContactEntry],
) -> Result<Validated<Vec<ContactDetail>>, FieldErrors> {
    let mut errors = FieldErrors::new();
    if entries.is_empty() {
        errors.insert("contactDetails", "At least one contact is required");
        return Err(errors);
    }
    let contacts: Vec<Option<ContactDetail>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_contact(entry, index, &mut errors))
        .collect();
    errors.into_result(|| contacts.into_iter().flatten().collect())
}

fn validate_identity(
    entry: &IdentityEntry,
    index: usize,
    errors: &mut FieldErrors,
) -> Option<IdentityProof> {
    let kind: Option<IdentityProofType> = required_choice(
        &entry.kind,
        &entry_key("type", index),
        "ID type is required",
        "ID type",
        errors,
    );
    let value = required(&entry.value, &entry_key("value", index), "ID number is required", errors);
    let issued_date = required_date(
        &entry.issued_date,
        &entry_key("issuedDate", index),
        "Issue date is required",
        errors,
    );
    let expiry_key = entry_key("expiryDate", index);
    let expiry_date = required_date(
        &entry.expiry_date,
        &expiry_key,
        "Expiry date is required",
        errors,
    );

    if let (Some(issued), Some(expiry)) = (issued_date, expiry_date) {
        if expiry <= issued {
            errors.insert(expiry_key, "Expiry date must be after issue date");
            return None;
        }
    }

    Some(IdentityProof {
        kind: kind?,
        value: value?.to_string(),
        issued_date: issued_date?,
        expiry_date: expiry_date?,
    })
}

pub fn validate_identity_proofs(
    entries: &[IdentityEntry],
) -> Result<Validated<Vec<IdentityProof>>, FieldErrors> {
    let mut errors = FieldErrors::new();
    if entries.is_empty() {
        errors.insert("identityProofs", "At least one ID proof is required");
        return Err(errors);
    }
    let proofs: Vec<Option<IdentityProof>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_identity(entry, index, &mut errors))
        .collect();
    errors.into_result(|| proofs.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal() -> PersonalFields {
        PersonalFields {
            first_name: "Ada".into(),
            middle_name: String::new(),
            last_name: "Lovelace".into(),
            date_of_birth: "1990-12-10".into(),
            gender: "female".into(),
            language: "english".into(),
        }
    }

    fn contact(kind: &str, value: &str) -> ContactEntry {
        ContactEntry {
            kind: kind.into(),
            value: value.into(),
            dial_code: String::new(),
        }
    }

    fn proof(issued: &str, expiry: &str) -> IdentityEntry {
        IdentityEntry {
            kind: "passport".into(),
            value: "X123".into(),
            issued_date: issued.into(),
            expiry_date: expiry.into(),
        }
    }

    #[test]
    fn empty_personal_fields_report_every_required_key() {
        let errors = validate_personal(&PersonalFields::default()).unwrap_err();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(
            keys,
            vec!["dateOfBirth", "firstName", "gender", "language", "lastName"]
        );
        assert_eq!(errors.get("firstName"), Some("First name is required"));
    }

    #[test]
    fn only_missing_fields_are_reported() {
        let mut fields = personal();
        fields.last_name = "   ".into();
        fields.language.clear();
        let errors = validate_personal(&fields).unwrap_err();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["language", "lastName"]);
    }

    #[test]
    fn valid_personal_fields_produce_typed_payload() {
        let mut fields = personal();
        fields.middle_name = " King ".into();
        let details = validate_personal(&fields).unwrap().into_inner();
        assert_eq!(details.name.middle_name.as_deref(), Some("King"));
        assert_eq!(details.gender, Gender::Female);
        assert_eq!(
            details.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 12, 10).unwrap()
        );
    }

    #[test]
    fn malformed_date_and_unknown_choice_are_flagged() {
        let mut fields = personal();
        fields.date_of_birth = "10/12/1990".into();
        fields.gender = "robot".into();
        let errors = validate_personal(&fields).unwrap_err();
        assert_eq!(errors.get("dateOfBirth"), Some("Use YYYY-MM-DD format"));
        assert_eq!(errors.get("gender"), Some("Select a valid gender"));
    }

    #[test]
    fn empty_address_reports_required_keys_but_not_line_two() {
        let errors = validate_address(&AddressFields::default()).unwrap_err();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["addressLine1", "city", "country", "state", "zipCode"]);
    }

    #[test]
    fn email_format_rule() {
        let errors = validate_contacts(&[contact("email", "a@b")]).unwrap_err();
        assert_eq!(errors.get("value-0"), Some("Please enter a valid email address"));
        assert!(validate_contacts(&[contact("email", "a@b.co")]).is_ok());
    }

    #[test]
    fn phone_format_rule() {
        let errors = validate_contacts(&[contact("phone", "12345")]).unwrap_err();
        assert_eq!(errors.get("value-0"), Some("Please enter a valid phone number"));
        assert!(validate_contacts(&[contact("phone", "1234567890")]).is_ok());
        assert!(validate_contacts(&[contact("phone", "123-456-7890")]).is_err());
    }

    #[test]
    fn padded_contact_values_fail_format_rules() {
        let errors = validate_contacts(&[contact("email", " a@b.co ")]).unwrap_err();
        assert_eq!(errors.get("value-0"), Some("Please enter a valid email address"));
        let errors = validate_contacts(&[contact("phone", "1234567890 ")]).unwrap_err();
        assert_eq!(errors.get("value-0"), Some("Please enter a valid phone number"));
    }

    #[test]
    fn contact_errors_are_keyed_by_entry_index() {
        let errors = validate_contacts(&[
            contact("email", "ok@example.com"),
            contact("", ""),
            contact("phone", "12"),
        ])
        .unwrap_err();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["type-1", "value-1", "value-2"]);
    }

    #[test]
    fn dial_code_is_kept_only_for_phones() {
        let mut phone = contact("phone", "1234567890");
        phone.dial_code = "44".into();
        let mut email = contact("email", "a@b.co");
        email.dial_code = "44".into();
        let contacts = validate_contacts(&[phone, email]).unwrap().into_inner();
        assert_eq!(contacts[0].dial_code.as_deref(), Some("44"));
        assert_eq!(contacts[1].dial_code, None);
    }

    #[test]
    fn empty_sequences_are_rejected() {
        assert!(validate_contacts(&[]).unwrap_err().contains("contactDetails"));
        assert!(validate_identity_proofs(&[])
            .unwrap_err()
            .contains("identityProofs"));
    }

    #[test]
    fn expiry_must_follow_issue_date() {
        let errors = validate_identity_proofs(&[proof("2024-01-01", "2024-01-01")]).unwrap_err();
        assert_eq!(
            errors.get("expiryDate-0"),
            Some("Expiry date must be after issue date")
        );
        let proofs = validate_identity_proofs(&[proof("2024-01-01", "2024-01-02")])
            .unwrap()
            .into_inner();
        assert_eq!(proofs[0].kind, IdentityProofType::Passport);
    }

    #[test]
    fn blank_identity_entry_reports_all_four_keys() {
        let errors = validate_identity_proofs(&[IdentityEntry::default()]).unwrap_err();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["expiryDate-0", "issuedDate-0", "type-0", "value-0"]);
        assert_eq!(errors.get("type-0"), Some("ID type is required"));
    }
}
