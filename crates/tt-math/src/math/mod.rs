//! Core math modules.

pub mod decision;
pub mod grid;
pub mod ranking;
pub mod stable;
