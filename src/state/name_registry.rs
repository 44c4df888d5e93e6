//! Process-wide display-name reservation set. §2.3/§9: a small in-memory
//! set with `reserve`/`release`; human-name collisions are soft (logged,
//! never rejected).

use dashmap::DashSet;
use tracing::warn;

#[derive(Default)]
pub struct NameRegistry {
    reserved: DashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `name`, logging (not rejecting) a collision with an
    /// existing reservation.
    pub fn reserve(&self, name: &str) {
        if !self.reserved.insert(name.to_string()) {
            warn!(name, "display name already reserved; continuing anyway");
        }
    }

    pub fn release(&self, name: &str) {
        self.reserved.remove(name);
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collisions_are_soft() {
        let registry = NameRegistry::new();
        registry.reserve("Alice");
        registry.reserve("Alice");
        assert!(registry.is_reserved("Alice"));
    }

    #[test]
    fn release_frees_the_name() {
        let registry = NameRegistry::new();
        registry.reserve("Bob");
        registry.release("Bob");
        assert!(!registry.is_reserved("Bob"));
    }
}
