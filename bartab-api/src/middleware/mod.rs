/// HTTP middleware for the API server
///
/// - `security`: response security headers (OWASP set)

pub mod security;
