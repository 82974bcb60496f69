// Query Processing Module
//
// This module contains the SQL front end: tokenizing and parsing.

pub mod parser;

// Export key public interfaces
pub use parser::{Parser, Query};
