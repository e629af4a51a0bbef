mod credentials;
mod task_text;
mod username;

pub use credentials::Credentials;
pub use task_text::TaskText;
pub use username::Username;
