//! Common library exports shared between connectors and host applications.

extern crate serde;


pub mod search_state;
pub mod search_parameters;
pub mod search_results;
pub mod state_url;
