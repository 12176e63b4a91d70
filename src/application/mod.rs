//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Content: Menus, trivia and fixed reply texts
//! - Errors: Domain-specific errors
//! - Messaging: Event parsing and dispatching

pub mod content;
pub mod errors;
pub mod messaging;
