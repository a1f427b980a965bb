use crate::api::CustomerApi;
use crate::domain::{Address, ContactDetail, Customer, IdentityProof};
use crate::errors::WizardError;
use crate::notify::{NotificationKind, Notifier};
use crate::wizard::store::{CustomerPatch, FormStore};
use crate::wizard::validation::{PersonalDetails, Validated};

pub const CREATE_SUCCESS_MESSAGE: &str = "Customer created successfully!";
pub const CREATE_FAILURE_MESSAGE: &str = "Failed to create customer. Please try again.";

/// Data carried by the success screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub customer_id: Option<String>,
    pub customer_name: String,
}

/// Where the wizard currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Personal,
    Address,
    Contact,
    Identity,
    /// Review screen. Holds the record that will be submitted.
    Summary { preview: Customer },
    Success(SubmissionReceipt),
    /// The flow was left; the draft is kept.
    Landing,
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Personal => "personal",
            WizardStep::Address => "address",
            WizardStep::Contact => "contact",
            WizardStep::Identity => "identity",
            WizardStep::Summary { .. } => "summary",
            WizardStep::Success(_) => "success",
            WizardStep::Landing => "landing",
        }
    }

    /// 1-based position among the five data screens, if this is one of them.
    pub fn position(&self) -> Option<usize> {
        match self {
            WizardStep::Personal => Some(1),
            WizardStep::Address => Some(2),
            WizardStep::Contact => Some(3),
            WizardStep::Identity => Some(4),
            WizardStep::Summary { .. } => Some(5),
            _ => None,
        }
    }
}

/// A validated submission for one data-entry step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    Personal(Validated<PersonalDetails>),
    Address(Validated<Address>),
    Contact(Validated<Vec<ContactDetail>>),
    Identity(Validated<Vec<IdentityProof>>),
}

impl StepPayload {
    fn step_name(&self) -> &'static str {
        match self {
            StepPayload::Personal(_) => "personal",
            StepPayload::Address(_) => "address",
            StepPayload::Contact(_) => "contact",
            StepPayload::Identity(_) => "identity",
        }
    }

    fn into_patch(self) -> CustomerPatch {
        match self {
            StepPayload::Personal(details) => {
                let details = details.into_inner();
                CustomerPatch {
                    name: Some(details.name),
                    date_of_birth: Some(details.date_of_birth),
                    gender: Some(details.gender),
                    language: Some(details.language),
                    ..Default::default()
                }
            }
            StepPayload::Address(address) => CustomerPatch {
                address: Some(address.into_inner()),
                ..Default::default()
            },
            StepPayload::Contact(contacts) => CustomerPatch {
                contact_details: Some(contacts.into_inner()),
                ..Default::default()
            },
            StepPayload::Identity(proofs) => CustomerPatch {
                identity_proofs: Some(proofs.into_inner()),
                ..Default::default()
            },
        }
    }
}

/// The customer creation flow: one draft plus the current step.
#[derive(Debug)]
pub struct Wizard {
    store: FormStore,
    step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            store: FormStore::new(),
            step: WizardStep::Landing,
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    /// Enters the flow at the first step. The draft is left as it is.
    pub fn begin(&mut self) {
        self.transition(WizardStep::Personal);
    }

    /// Merges a validated payload for the current step and moves forward.
    pub fn advance(&mut self, payload: StepPayload) -> Result<&WizardStep, WizardError> {
        match (&self.step, &payload) {
            (WizardStep::Personal, StepPayload::Personal(_))
            | (WizardStep::Address, StepPayload::Address(_))
            | (WizardStep::Contact, StepPayload::Contact(_))
            | (WizardStep::Identity, StepPayload::Identity(_)) => {}
            _ => {
                return Err(WizardError::UnexpectedStep {
                    action: payload.step_name(),
                    step: self.step.name(),
                })
            }
        }
        // Staged so a failed preview leaves the store untouched.
        let mut staged = self.store.clone();
        staged.merge(payload.into_patch());
        let next = match self.step {
            WizardStep::Personal => WizardStep::Address,
            WizardStep::Address => WizardStep::Contact,
            WizardStep::Contact => WizardStep::Identity,
            _ => WizardStep::Summary {
                preview: staged.draft().to_customer()?,
            },
        };
        self.store = staged;
        self.transition(next);
        Ok(&self.step)
    }

    /// Returns to the previous step without validating or saving.
    pub fn back(&mut self) -> Result<&WizardStep, WizardError> {
        let previous = match self.step {
            WizardStep::Address => WizardStep::Personal,
            WizardStep::Contact => WizardStep::Address,
            WizardStep::Identity => WizardStep::Contact,
            WizardStep::Summary { .. } => WizardStep::Identity,
            _ => {
                return Err(WizardError::UnexpectedStep {
                    action: "back",
                    step: self.step.name(),
                })
            }
        };
        self.transition(previous);
        Ok(&self.step)
    }

    pub fn cancel(&mut self) {
        self.transition(WizardStep::Landing);
    }

    /// Sends the previewed record to the backend.
    ///
    /// On success the draft is cleared and the wizard moves to the success
    /// screen. On failure it stays on the summary with the draft intact.
    pub async fn submit(
        &mut self,
        api: &dyn CustomerApi,
        notifier: &dyn Notifier,
    ) -> Result<SubmissionReceipt, WizardError> {
        let record = match &self.step {
            WizardStep::Summary { .. } => self.store.draft().to_customer()?,
            other => {
                return Err(WizardError::UnexpectedStep {
                    action: "submit",
                    step: other.name(),
                })
            }
        };

        tracing::info!(customer = %record.short_name(), "submitting new customer");
        match api.create(&record).await {
            Ok(created) => {
                notifier.notify(CREATE_SUCCESS_MESSAGE, NotificationKind::Success);
                self.store.reset();
                let receipt = SubmissionReceipt {
                    customer_id: created.id.clone(),
                    customer_name: created.short_name(),
                };
                self.transition(WizardStep::Success(receipt.clone()));
                Ok(receipt)
            }
            Err(err) => {
                tracing::error!(error = %err, "customer submission failed");
                notifier.notify(CREATE_FAILURE_MESSAGE, NotificationKind::Error);
                Err(err.into())
            }
        }
    }

    fn transition(&mut self, next: WizardStep) {
        tracing::debug!(from = self.step.name(), to = next.name(), "wizard transition");
        self.step = next;
    }
}
