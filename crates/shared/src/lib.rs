pub mod domain;
pub mod error;
pub mod mood;
pub mod protocol;
