//! Postings board view state: model, reducer, and render-side declarations.
//!
//! The split mirrors an Elm architecture: [`model`] owns state, [`update`]
//! is the only place state transitions happen, [`pipeline`] holds the pure
//! filter/sort/paginate transforms, and [`session`] wires the reducer to a
//! data source and the activity log.

pub mod columns;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod update;

#[cfg(test)]
mod test_properties;

pub use model::{
    BoardCmd, BoardModel, BoardMsg, DEPARTMENT_OPTIONS, DepartmentOption, SortDirection,
    SortField, ViewDefaults,
};
pub use session::BoardSession;
pub use update::update;
