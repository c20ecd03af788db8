pub mod rest;
pub mod types;

pub use rest::{ClientError, RestClient};
pub use types::*;
