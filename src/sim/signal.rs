/// Emitted when an attacking army finishes its travel and combat should be
/// resolved against the target faction.
///
/// The pipeline only signals the meeting; combat math itself is the
/// caller's extension point. Only the target's identity is read — no
/// cross-faction mutation happens during a faction's own resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatSignal {
    pub attacker_faction: String,
    pub army_id: String,
    pub target_faction: String,
}
