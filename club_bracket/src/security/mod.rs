//! Shared-secret gates.
//!
//! Neither gate is an authentication system. A tournament's access code is
//! handed to whoever runs the mat, and the optional club edit code guards
//! data entry. Both are compared in constant time and nothing more.

pub mod access_code;

pub use access_code::{ACCESS_CODE_LEN, AccessCode, secrets_match};
