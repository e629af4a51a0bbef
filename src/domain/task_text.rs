/// The text of a single to-do item, trimmed and known to be non-empty.
#[derive(Debug, Clone)]
pub struct TaskText(String);

impl TaskText {
    pub fn parse(s: String) -> Result<TaskText, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("A task cannot be empty.".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for TaskText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
