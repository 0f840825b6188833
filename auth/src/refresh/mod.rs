pub mod errors;
pub mod record;

pub use errors::RefreshTokenError;
pub use record::generate_token;
pub use record::RefreshTokenRecord;
