//! Command implementations for the PairPack CLI.

pub mod create;
pub mod extract;
pub mod list;

pub use create::cmd_create;
pub use extract::cmd_extract;
pub use list::cmd_list;
pub use test::cmd_test;
