use crate::setup::SetupInstructions;

/// Reached when the database is unreachable, or when the
/// session guard finds the schema missing.
#[catch(503)]
pub fn service_unavailable_setup_instructions() -> SetupInstructions {
    SetupInstructions::new(None)
}
