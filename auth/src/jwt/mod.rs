pub mod claims;
pub mod errors;
pub mod handler;
pub mod signer;

pub use claims::AccessClaims;
pub use claims::AccountStatus;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use signer::IssuedToken;
pub use signer::TokenConfig;
pub use signer::TokenSigner;
