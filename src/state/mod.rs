pub mod errors;
pub mod form;
pub mod subscribers;
