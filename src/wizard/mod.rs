//! Multi-step customer creation: draft store, step forms, validation and the
//! state machine tying them together.

pub mod machine;
pub mod steps;
pub mod store;
pub mod validation;

pub use machine::{
    StepPayload, SubmissionReceipt, Wizard, WizardStep, CREATE_FAILURE_MESSAGE,
    CREATE_SUCCESS_MESSAGE,
};
pub use steps::{AddressForm, ContactForm, IdentityForm, PersonalForm, StepForm};
pub use store::{CustomerDraft, CustomerPatch, FormStore};
pub use validation::{FieldErrors, Validated};
