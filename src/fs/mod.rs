pub mod clipboard;
pub mod index;
pub mod listing;
pub mod operations;
pub mod shell;
pub mod tree;
