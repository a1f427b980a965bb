use crate::api::CustomerApi;
use crate::domain::Customer;
use crate::errors::ApiError;
use crate::screens::guard::ViewEpoch;

pub const LIST_LOAD_ERROR: &str = "Failed to load customers. Please try again later.";
pub const LIST_EMPTY_MESSAGE: &str = "No customers found.";

/// The customer list screen is in exactly one of these states.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<Customer>),
}

impl ListState {
    pub fn from_result(result: Result<Vec<Customer>, ApiError>) -> Self {
        match result {
            Ok(customers) if customers.is_empty() => ListState::Empty,
            Ok(customers) => ListState::Loaded(customers),
            Err(_) => ListState::Failed(LIST_LOAD_ERROR.to_string()),
        }
    }

    /// Status line for the non-loaded states.
    pub fn message(&self) -> Option<&str> {
        match self {
            ListState::Loading => Some("Loading customers..."),
            ListState::Failed(message) => Some(message.as_str()),
            ListState::Empty => Some(LIST_EMPTY_MESSAGE),
            ListState::Loaded(_) => None,
        }
    }

    pub fn cards(&self) -> Vec<CustomerCard> {
        match self {
            ListState::Loaded(customers) => customers.iter().map(CustomerCard::from).collect(),
            _ => Vec::new(),
        }
    }
}

/// Summary of one customer as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerCard {
    pub id: Option<String>,
    pub name: String,
    pub date_of_birth: String,
}

impl From<&Customer> for CustomerCard {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.short_name(),
            date_of_birth: customer.date_of_birth.format("%Y-%m-%d").to_string(),
        }
    }
}

impl CustomerCard {
    pub fn lines(&self) -> [String; 3] {
        [
            self.name.clone(),
            format!("ID: {}", self.id.as_deref().unwrap_or("")),
            format!("DOB: {}", self.date_of_birth),
        ]
    }
}

/// Fetches the list once. Returns `None` when the user navigated away while
/// the request was in flight.
pub async fn load_list(api: &dyn CustomerApi, epoch: &ViewEpoch) -> Option<ListState> {
    let ticket = epoch.ticket();
    let result = api.list().await;
    epoch.accept(ticket, ListState::from_result(result), "customer list")
}
