//! Domain logic independent of the terminal UI: location projection,
//! category helpers, wizard draft state, image attachment lifecycle,
//! and logging setup.

pub mod categories;
pub mod images;
pub mod locations;
pub mod logging;
pub mod wizard;
