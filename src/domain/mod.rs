pub mod common;
pub mod customer;

pub use common::{Choice, ContactType, Country, Displayable, Gender, IdentityProofType, Language};
pub use customer::{Address, ContactDetail, Customer, CustomerName, IdentityProof};
