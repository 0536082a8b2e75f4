//! Match ids and player secrets.

use uuid::Uuid;

/// Prefix on every match id, naming the snapshot format.
pub const MATCH_ID_PREFIX: &str = "v3:";

/// Source of opaque identifiers.
pub trait IdGenerator {
    fn match_id(&mut self) -> String;
    fn secret(&mut self) -> String;
}

/// Random ids from uuid v4.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn match_id(&mut self) -> String {
        format!("{MATCH_ID_PREFIX}{}", Uuid::new_v4().simple())
    }

    fn secret(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids for tests and replays.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl IdGenerator for SequentialIds {
    fn match_id(&mut self) -> String {
        format!("{MATCH_ID_PREFIX}{}", self.bump())
    }

    fn secret(&mut self) -> String {
        format!("secret-{}", self.bump())
    }
}
