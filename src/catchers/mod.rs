mod service_unavailable;
mod unauthorized;
mod unprocessable_entity;

pub use service_unavailable::*;
pub use unauthorized::*;
pub use unprocessable_entity::*;
