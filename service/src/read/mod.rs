//! Read models computed from domain data.

pub mod salary_advance;
pub mod vacation;
