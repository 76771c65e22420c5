//! Business logic between the HTTP handlers and the repositories
//!
//! Services validate input, enforce ownership and existence rules, and
//! assemble response bodies including their HATEOAS links.

pub mod anime;
pub mod anime_lists;
pub mod auth;
pub mod pagination;
pub mod users;
pub mod webhooks;
