//! Database access for stk-import
//!
//! One module per table, free async functions over a shared pool. Schema
//! creation lives in `stk_common::db::init`.

pub mod assets;
pub mod assignments;
pub mod catalog;
pub mod employees;
pub mod sites;
