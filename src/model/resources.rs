use std::collections::BTreeMap;

/// The resource kinds every faction starts with. Other names are accepted
/// (the ledger is an open map) but these three always appear in snapshots.
pub const BASE_RESOURCES: [&str; 3] = ["food", "wood", "stone"];

/// Named-quantity store, floor-clamped at zero.
///
/// `subtract` silently floors rather than failing; callers that need to
/// reject a shortfall must pre-check with [`Resources::has`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    amounts: BTreeMap<String, i64>,
}

impl Resources {
    pub fn new() -> Self {
        let mut amounts = BTreeMap::new();
        for name in BASE_RESOURCES {
            amounts.insert(name.to_string(), 0);
        }
        Self { amounts }
    }

    pub fn get(&self, resource: &str) -> i64 {
        self.amounts.get(resource).copied().unwrap_or(0)
    }

    /// Sets a balance, clamping negative amounts to zero.
    pub fn set(&mut self, resource: &str, amount: i64) {
        self.amounts.insert(resource.to_string(), amount.max(0));
    }

    pub fn add(&mut self, resource: &str, amount: i64) {
        self.set(resource, self.get(resource) + amount);
    }

    /// Floor-clamped subtraction: the balance never goes negative.
    pub fn subtract(&mut self, resource: &str, amount: i64) {
        self.set(resource, self.get(resource) - amount);
    }

    pub fn has(&self, resource: &str, amount: i64) -> bool {
        self.get(resource) >= amount
    }

    pub fn food(&self) -> i64 {
        self.get("food")
    }

    pub fn set_food(&mut self, amount: i64) {
        self.set("food", amount);
    }

    /// All balances in sorted name order (snapshot rendering relies on this
    /// being deterministic).
    pub fn amounts(&self) -> impl Iterator<Item = (&str, i64)> {
        self.amounts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_base_resources_at_zero() {
        let r = Resources::new();
        assert_eq!(r.get("food"), 0);
        assert_eq!(r.get("wood"), 0);
        assert_eq!(r.get("stone"), 0);
    }

    #[test]
    fn unknown_resource_reads_zero() {
        let r = Resources::new();
        assert_eq!(r.get("mithril"), 0);
    }

    #[test]
    fn subtract_floors_at_zero() {
        let mut r = Resources::new();
        r.set("wood", 10);
        r.subtract("wood", 9999);
        assert_eq!(r.get("wood"), 0);
    }

    #[test]
    fn set_clamps_negative() {
        let mut r = Resources::new();
        r.set("stone", -5);
        assert_eq!(r.get("stone"), 0);
    }

    #[test]
    fn has_checks_threshold() {
        let mut r = Resources::new();
        r.set("food", 50);
        assert!(r.has("food", 50));
        assert!(!r.has("food", 51));
    }

    #[test]
    fn add_accumulates() {
        let mut r = Resources::new();
        r.add("wood", 30);
        r.add("wood", 12);
        assert_eq!(r.get("wood"), 42);
    }
}
