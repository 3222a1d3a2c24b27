//! Token authentication for devbox operations.

mod jwt;

#[cfg(test)]
mod tests;

pub use jwt::{AuthError, Claims, TokenAuthenticator};
