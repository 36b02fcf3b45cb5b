//! Top-level views and the service-request wizard.

pub mod assets;
pub mod locations;
pub mod request_wizard;
pub mod requests;
