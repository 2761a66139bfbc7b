pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresContactDirectory;
pub use postgres::PostgresNonceStore;
pub use postgres::PostgresRefreshTokenStore;
pub use postgres::PostgresUserStore;
