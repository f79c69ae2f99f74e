//! Linkboard: a link-sharing GraphQL API
//!
//! Accounts sign up and log in with bearer tokens, post and vote on links,
//! and read a filterable, sortable, paginated listing. The whole API is a
//! single GraphQL endpoint; persistence sits behind the store ports in
//! [`db`], so the SQLite backend and the in-memory test backend are
//! interchangeable.

pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
