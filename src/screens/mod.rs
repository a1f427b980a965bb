//! Read-only customer screens and the stale-response guard they share.

pub mod detail;
pub mod guard;
pub mod list;

pub use detail::{render_customer, CustomerSheet, DetailScreen, DetailState, DisplayMode};
pub use guard::{ViewEpoch, ViewTicket};
pub use list::{load_list, CustomerCard, ListState};

#[cfg(test)]
pub(crate) mod fake {
    use async_trait::async_trait;

    use crate::api::CustomerApi;
    use crate::domain::Customer;
    use crate::errors::ApiError;

    use super::ViewEpoch;

    /// Backend that can simulate the user navigating away while a request
    /// is in flight.
    pub(crate) struct NavigatingApi {
        pub(crate) customers: Vec<Customer>,
        pub(crate) navigate: Option<ViewEpoch>,
    }

    impl NavigatingApi {
        fn navigate(&self) {
            if let Some(epoch) = &self.navigate {
                epoch.bump();
            }
        }
    }

    #[async_trait]
    impl CustomerApi for NavigatingApi {
        async fn list(&self) -> Result<Vec<Customer>, ApiError> {
            self.navigate();
            Ok(self.customers.clone())
        }

        async fn get(&self, id: &str) -> Result<Customer, ApiError> {
            self.navigate();
            self.customers
                .iter()
                .find(|customer| customer.id.as_deref() == Some(id))
                .cloned()
                .ok_or(ApiError::FetchFailed { id: id.to_string() })
        }

        async fn create(&self, _customer: &Customer) -> Result<Customer, ApiError> {
            Err(ApiError::CreateFailed {
                status_text: "Method Not Allowed".into(),
            })
        }
    }
}
