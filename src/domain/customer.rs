use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A customer record as exchanged with the backend.
///
/// `id` is assigned by the backend and is never sent on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: CustomerName,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub language: Language,
    pub address: Address,
    #[serde(default)]
    pub contact_details: Vec<ContactDetail>,
    #[serde(default)]
    pub identity_proofs: Vec<IdentityProof>,
}

impl Customer {
    /// Name shown on cards and the success screen: first and last name only.
    pub fn short_name(&self) -> String {
        format!("{} {}", self.name.first_name, self.name.last_name)
    }
}

impl Displayable for Customer {
    fn display_label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} [{}]", self.short_name(), id),
            None => self.short_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerName {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
}

impl CustomerName {
    /// First, middle (when present) and last name joined by single spaces.
    pub fn full(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: Country,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dial_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProof {
    #[serde(rename = "type")]
    pub kind: IdentityProofType,
    pub value: String,
    pub issued_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Customer {
        Customer {
            id: None,
            name: CustomerName {
                first_name: "Ada".into(),
                middle_name: None,
                last_name: "Lovelace".into(),
            },
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            gender: Gender::Female,
            language: Language::English,
            address: Address {
                address_line1: "1 Analytical Way".into(),
                address_line2: None,
                city: "London".into(),
                state: "Greater London".into(),
                country: Country::UnitedKingdom,
                zip_code: "N1 7AA".into(),
            },
            contact_details: vec![ContactDetail {
                kind: ContactType::Phone,
                value: "2071234567".into(),
                dial_code: Some("44".into()),
            }],
            identity_proofs: vec![IdentityProof {
                kind: IdentityProofType::NationalId,
                value: "AB123".into(),
                issued_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            }],
        }
    }

    #[test]
    fn serializes_with_wire_names_and_without_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["name"]["firstName"], "Ada");
        assert!(value["name"].get("middleName").is_none());
        assert_eq!(value["dateOfBirth"], "1990-12-10");
        assert_eq!(value["address"]["addressLine1"], "1 Analytical Way");
        assert_eq!(value["address"]["country"], "United Kingdom");
        assert_eq!(value["contactDetails"][0]["type"], "phone");
        assert_eq!(value["contactDetails"][0]["dialCode"], "44");
        assert_eq!(value["identityProofs"][0]["type"], "nationalId");
        assert_eq!(value["identityProofs"][0]["expiryDate"], "2030-01-01");
    }

    #[test]
    fn deserializes_backend_record_with_id() {
        let payload = json!({
            "id": "c-42",
            "name": { "firstName": "Ada", "middleName": "King", "lastName": "Lovelace" },
            "dateOfBirth": "1990-12-10",
            "gender": "female",
            "language": "english",
            "address": {
                "addressLine1": "1 Analytical Way",
                "city": "London",
                "state": "Greater London",
                "country": "United Kingdom",
                "zipCode": "N1 7AA"
            },
            "contactDetails": [],
            "identityProofs": []
        });
        let customer: Customer = serde_json::from_value(payload).unwrap();
        assert_eq!(customer.id.as_deref(), Some("c-42"));
        assert_eq!(customer.name.full(), "Ada King Lovelace");
        assert_eq!(customer.short_name(), "Ada Lovelace");
        assert_eq!(customer.display_label(), "Ada Lovelace [c-42]");
    }
}
