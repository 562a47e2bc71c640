/// Monotonic counter behind synthesized building identities.
///
/// Snapshot loading recreates buildings with fresh identities, so the only
/// guarantee needed is uniqueness within one faction's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// `farm_3`-style identity for a building of the given type.
    pub fn building_id(&mut self, building_type: &str) -> String {
        format!("{}_{}", building_type.to_lowercase(), self.next_id())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_id(), 1);
        assert_eq!(id_gen.next_id(), 2);
    }

    #[test]
    fn building_ids_are_typed_and_unique() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.building_id("Farm"), "farm_1");
        assert_eq!(id_gen.building_id("Quarry"), "quarry_2");
    }
}
