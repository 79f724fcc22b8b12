//! Session layer
//!
//! Binds one signed-in user to the document store and holds the snapshot a
//! front end renders from.

pub mod state;
pub mod user_data;

pub use state::SessionState;
pub use user_data::{ExpensePage, UserData};
