//! Organizational signing identities and endorsement signature collection.

mod collector;
mod errors;
mod identity;
mod provider;

pub use collector::SignatureCollector;
pub use errors::IdentityError;
pub use identity::{verify_signature, SigningIdentity};
pub use provider::{FileIdentityProvider, IdentityProvider, OrgCredentials};
