//! minv: plain-text meat inventory toolkit
//!
//! Products live as YAML files under version control; stock movements and
//! user actions are appended to JSON-lines journals next to them.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
pub mod yaml;
