//! Live adapter for the `IdGenerator` port.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Live ID generator producing random UUIDs.
pub struct LiveIdGenerator;

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
