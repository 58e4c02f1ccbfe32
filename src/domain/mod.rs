//! Expense domain objects and request dispatch
//!
//! Provides the expense record, the request/response descriptors and the
//! dispatcher that maps method tokens to table operations.

pub mod dispatcher;
pub mod expense;
pub mod response;
