//! Customer detail screen.
//!
//! [`render_customer`] is the only renderer. It is fed either by
//! [`DetailScreen::load`], which fetches a stored record, or by
//! [`DetailScreen::preview`], which shows the wizard's record as given.

use chrono::NaiveDate;

use crate::api::CustomerApi;
use crate::domain::{Choice, Customer, Displayable};
use crate::screens::guard::ViewEpoch;

pub const DETAIL_LOADING_MESSAGE: &str = "Loading customer details...";
pub const DETAIL_LOAD_ERROR: &str = "Failed to load customer details. Please try again later.";
pub const NO_CONTACTS_MESSAGE: &str = "No contact details provided.";
pub const NO_PROOFS_MESSAGE: &str = "No identity proofs provided.";
pub const BACK_TO_LIST_HINT: &str = "Back to List: run `list`";

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// A record loaded from the backend.
    Persisted,
    /// The unsaved record on the wizard's summary step.
    Preview,
}

impl DisplayMode {
    pub fn title(self) -> &'static str {
        match self {
            DisplayMode::Persisted => "Customer Details",
            DisplayMode::Preview => "Customer Summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Field { label: String, value: String },
    Text(String),
}

impl Row {
    fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Row::Field {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub rows: Vec<Row>,
}

/// Rendered customer, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSheet {
    pub title: &'static str,
    pub sections: Vec<Section>,
    pub footer: Option<&'static str>,
}

impl CustomerSheet {
    pub fn render(&self) -> String {
        let rule = "─".repeat(RULE_WIDTH);
        let mut lines = vec![self.title.to_string(), rule.clone()];
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                lines.push(String::new());
            }
            lines.push(section.heading.to_string());
            lines.extend(render_rows(&section.rows));
        }
        lines.push(rule);
        if let Some(footer) = self.footer {
            lines.push(footer.to_string());
        }
        lines.join("\n")
    }
}

fn render_rows(rows: &[Row]) -> Vec<String> {
    let width = rows
        .iter()
        .filter_map(|row| match row {
            Row::Field { label, .. } => Some(label.chars().count() + 1),
            Row::Text(_) => None,
        })
        .max()
        .unwrap_or(0);
    rows.iter()
        .map(|row| match row {
            Row::Field { label, value } => {
                let label = format!("{label}:");
                format!("  {label:<width$}  {value}").trim_end().to_string()
            }
            Row::Text(text) if text.is_empty() => String::new(),
            Row::Text(text) => format!("  {text}"),
        })
        .collect()
}

fn date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Builds the detail sheet for `customer`. Pure: the same input always gives
/// the same output.
pub fn render_customer(customer: &Customer, mode: DisplayMode) -> CustomerSheet {
    let personal = Section {
        heading: "Personal Information",
        rows: vec![
            Row::field("Full Name", customer.name.full()),
            Row::field("Date of Birth", date(customer.date_of_birth)),
            Row::field("Gender", customer.gender.label()),
            Row::field("Preferred Language", customer.language.label()),
        ],
    };

    let address = &customer.address;
    let mut address_rows = vec![Row::Text(address.address_line1.clone())];
    if let Some(line2) = address.address_line2.as_deref().filter(|line| !line.is_empty()) {
        address_rows.push(Row::Text(line2.to_string()));
    }
    address_rows.push(Row::Text(format!(
        "{}, {} {}",
        address.city, address.state, address.zip_code
    )));
    address_rows.push(Row::Text(address.country.label().to_string()));

    let contact_rows = if customer.contact_details.is_empty() {
        vec![Row::Text(NO_CONTACTS_MESSAGE.to_string())]
    } else {
        customer
            .contact_details
            .iter()
            .map(|contact| {
                let prefix = contact
                    .dial_code
                    .as_deref()
                    .filter(|code| !code.is_empty())
                    .map(|code| format!("+{code} "))
                    .unwrap_or_default();
                Row::field(contact.kind.label(), format!("{prefix}{}", contact.value))
            })
            .collect()
    };

    let proof_rows = if customer.identity_proofs.is_empty() {
        vec![Row::Text(NO_PROOFS_MESSAGE.to_string())]
    } else {
        let mut rows = Vec::new();
        for (idx, proof) in customer.identity_proofs.iter().enumerate() {
            if idx > 0 {
                rows.push(Row::Text(String::new()));
            }
            rows.push(Row::field("Type", proof.kind.label()));
            rows.push(Row::field("Number", proof.value.clone()));
            rows.push(Row::field("Issued Date", date(proof.issued_date)));
            rows.push(Row::field("Expiry Date", date(proof.expiry_date)));
        }
        rows
    };

    CustomerSheet {
        title: mode.title(),
        sections: vec![
            personal,
            Section {
                heading: "Address",
                rows: address_rows,
            },
            Section {
                heading: "Contact Details",
                rows: contact_rows,
            },
            Section {
                heading: "Identity Proofs",
                rows: proof_rows,
            },
        ],
        footer: match mode {
            DisplayMode::Persisted => Some(BACK_TO_LIST_HINT),
            DisplayMode::Preview => None,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Customer),
    Failed(String),
}

impl DetailState {
    /// Status line for the states that have no sheet.
    pub fn message(&self) -> Option<&str> {
        match self {
            DetailState::Loading => Some(DETAIL_LOADING_MESSAGE),
            DetailState::Failed(message) => Some(message.as_str()),
            DetailState::Loaded(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailScreen {
    mode: DisplayMode,
    state: DetailState,
}

impl DetailScreen {
    /// Screen for a stored record whose fetch has not completed yet.
    pub fn loading() -> Self {
        Self {
            mode: DisplayMode::Persisted,
            state: DetailState::Loading,
        }
    }

    /// Shows `record` unchanged without contacting the backend.
    pub fn preview(record: Customer) -> Self {
        Self {
            mode: DisplayMode::Preview,
            state: DetailState::Loaded(record),
        }
    }

    /// Fetches `id` and resolves the screen. Returns `None` when the result
    /// arrived after the user navigated away.
    pub async fn load(api: &dyn CustomerApi, id: &str, epoch: &ViewEpoch) -> Option<Self> {
        let ticket = epoch.ticket();
        let state = match api.get(id).await {
            Ok(customer) => {
                tracing::debug!(customer = %customer.display_label(), "customer detail fetched");
                DetailState::Loaded(customer)
            }
            Err(_) => DetailState::Failed(DETAIL_LOAD_ERROR.to_string()),
        };
        epoch.accept(
            ticket,
            Self {
                mode: DisplayMode::Persisted,
                state,
            },
            "customer detail",
        )
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn sheet(&self) -> Option<CustomerSheet> {
        match &self.state {
            DetailState::Loaded(customer) => Some(render_customer(customer, self.mode)),
            _ => None,
        }
    }
}
