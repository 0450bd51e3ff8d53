pub mod add;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod list;
pub mod shell;
