pub mod errors;
pub mod minter;
pub mod models;
pub mod ports;
