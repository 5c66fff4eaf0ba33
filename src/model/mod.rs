//! Record types received from the backend.

pub mod posting;

pub use posting::{JobPosting, parse_open_date};
