use once_cell::sync::Lazy;
use regex::Regex;

static NIM_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{9}").expect("valid NIM regex"));

/// Pulls the student number out of an institutional email.
///
/// The NIM is the first run of nine digits in the local part, e.g.
/// `budi.122140001@student.itera.ac.id` yields `122140001`.
pub fn extract_nim(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default().trim();
    NIM_PATTERN.find(local).map(|m| m.as_str().to_owned())
}
