/// Trim surrounding whitespace and lower-case the domain part of an address,
/// leaving the local part alone. Input without an `@` comes back unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
