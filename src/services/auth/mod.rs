pub mod credential;
pub mod decode;
pub mod error;
pub mod exempt;
pub mod validator;

pub use credential::Credential;
pub use decode::TokenDecoder;
pub use error::AuthError;
pub use exempt::ExemptPaths;
pub use validator::{Authentication, SubjectSource, TokenValidator, ValidatedToken};
