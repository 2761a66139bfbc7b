pub mod errors;
pub mod generator;

pub use errors::SecretError;
pub use generator::SecretGenerator;
