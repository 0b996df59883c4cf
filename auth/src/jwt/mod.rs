use jsonwebtoken::Algorithm;

pub mod claims;
pub mod errors;
pub mod issuer;
pub mod validator;

pub use claims::Claims;
pub use claims::TOKEN_ISSUER;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use validator::TokenValidator;

/// The single algorithm tokens are signed and accepted with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Header `alg` value of [`SIGNING_ALGORITHM`].
pub const SIGNING_ALGORITHM_NAME: &str = "HS256";
