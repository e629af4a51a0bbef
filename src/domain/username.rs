#[derive(Debug, Clone)]
pub struct Username(String);

impl Username {
    /// Surrounding whitespace is dropped, so `"alice "` names the same
    /// account as `"alice"`. Anything else that is not blank is accepted.
    pub fn parse(s: String) -> Result<Username, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err("A username cannot be empty.".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
