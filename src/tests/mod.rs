//! Crate-internal test suites that span modules.

mod property;
