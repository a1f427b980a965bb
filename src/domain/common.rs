use serde::{Deserialize, Serialize};

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A closed set of values offered to the user as a selection.
///
/// `wire_value` is the exact string exchanged with the backend; `label` is
/// what the terminal shows. Parsing accepts either form, case-insensitively.
pub trait Choice: Sized + Copy + 'static {
    fn all() -> &'static [Self];

    fn wire_value(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        if needle.is_empty() {
            return None;
        }
        Self::all().iter().copied().find(|candidate| {
            candidate.wire_value().eq_ignore_ascii_case(needle)
                || candidate.label().eq_ignore_ascii_case(needle)
        })
    }

    fn labels() -> Vec<String> {
        Self::all()
            .iter()
            .map(|choice| choice.label().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Choice for Gender {
    fn all() -> &'static [Self] {
        &[Gender::Male, Gender::Female, Gender::Other]
    }

    fn wire_value(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Chinese,
    Hindi,
}

impl Choice for Language {
    fn all() -> &'static [Self] {
        &[
            Language::English,
            Language::Spanish,
            Language::French,
            Language::German,
            Language::Chinese,
            Language::Hindi,
        ]
    }

    fn wire_value(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Chinese => "chinese",
            Language::Hindi => "hindi",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Hindi => "Hindi",
        }
    }
}

/// Countries accepted for an address. The backend stores the display name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Country {
    #[serde(rename = "United States")]
    UnitedStates,
    #[serde(rename = "Canada")]
    Canada,
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    #[serde(rename = "Australia")]
    Australia,
    #[serde(rename = "India")]
    India,
    #[serde(rename = "Germany")]
    Germany,
    #[serde(rename = "France")]
    France,
}

impl Choice for Country {
    fn all() -> &'static [Self] {
        &[
            Country::UnitedStates,
            Country::Canada,
            Country::UnitedKingdom,
            Country::Australia,
            Country::India,
            Country::Germany,
            Country::France,
        ]
    }

    fn wire_value(&self) -> &'static str {
        self.label()
    }

    fn label(&self) -> &'static str {
        match self {
            Country::UnitedStates => "United States",
            Country::Canada => "Canada",
            Country::UnitedKingdom => "United Kingdom",
            Country::Australia => "Australia",
            Country::India => "India",
            Country::Germany => "Germany",
            Country::France => "France",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Email,
    Phone,
}

impl Choice for ContactType {
    fn all() -> &'static [Self] {
        &[ContactType::Email, ContactType::Phone]
    }

    fn wire_value(&self) -> &'static str {
        match self {
            ContactType::Email => "email",
            ContactType::Phone => "phone",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ContactType::Email => "Email",
            ContactType::Phone => "Phone",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IdentityProofType {
    Passport,
    NationalId,
    DrivingLicense,
    VoterCard,
}

impl Choice for IdentityProofType {
    fn all() -> &'static [Self] {
        &[
            IdentityProofType::Passport,
            IdentityProofType::NationalId,
            IdentityProofType::DrivingLicense,
            IdentityProofType::VoterCard,
        ]
    }

    fn wire_value(&self) -> &'static str {
        match self {
            IdentityProofType::Passport => "passport",
            IdentityProofType::NationalId => "nationalId",
            IdentityProofType::DrivingLicense => "drivingLicense",
            IdentityProofType::VoterCard => "voterCard",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IdentityProofType::Passport => "Passport",
            IdentityProofType::NationalId => "National ID",
            IdentityProofType::DrivingLicense => "Driving License",
            IdentityProofType::VoterCard => "Voter Card",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_value_and_label() {
        assert_eq!(
            IdentityProofType::parse("nationalId"),
            Some(IdentityProofType::NationalId)
        );
        assert_eq!(
            IdentityProofType::parse("national id"),
            Some(IdentityProofType::NationalId)
        );
        assert_eq!(Country::parse("united kingdom"), Some(Country::UnitedKingdom));
        assert_eq!(Gender::parse("  "), None);
        assert_eq!(Language::parse("klingon"), None);
    }

    #[test]
    fn wire_values_match_serde_names() {
        for proof in IdentityProofType::all() {
            let json = serde_json::to_string(proof).unwrap();
            assert_eq!(json, format!("\"{}\"", proof.wire_value()));
        }
        for country in Country::all() {
            let json = serde_json::to_string(country).unwrap();
            assert_eq!(json, format!("\"{}\"", country.wire_value()));
        }
    }
}
