//! Credential caching and the login/resume lifecycle.
//!
//! A session starts from the token triple stored in the credential file when
//! it is usable and from the interactive login otherwise.

mod credentials;
mod lifecycle;

pub use credentials::*;
pub use lifecycle::*;

#[cfg(test)]
mod tests;
