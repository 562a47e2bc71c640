use std::fmt;

/// Where an army is in its travel/combat cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmyState {
    Defending,
    Attacking,
    Retreating,
    Idle,
}

impl fmt::Display for ArmyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArmyState::Defending => "DEFENDING",
            ArmyState::Attacking => "ATTACKING",
            ArmyState::Retreating => "RETREATING",
            ArmyState::Idle => "IDLE",
        };
        f.write_str(s)
    }
}

/// One army. Population 0 means destroyed, but the record is retained.
///
/// Might is population plus a modifier fixed at creation time from the
/// owning faction's `armyMightBonus` trait; later trait changes do not
/// reach armies already in the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Army {
    id: String,
    name: String,
    population: i64,
    might: i64,
    might_modifier: i64,
    state: ArmyState,
    target_faction: Option<String>,
    travel_weeks_remaining: u32,
}

impl Army {
    pub fn new(name: &str, population: i64) -> Self {
        let mut army = Self {
            id: name.to_lowercase().replace(' ', "_"),
            name: name.to_string(),
            population,
            might: 0,
            might_modifier: 0,
            state: ArmyState::Defending,
            target_faction: None,
            travel_weeks_remaining: 0,
        };
        army.update_might();
        army
    }

    pub fn reinforce(&mut self, amount: i64) {
        self.population += amount;
        self.update_might();
    }

    pub fn take_casualties(&mut self, amount: i64) {
        self.population = (self.population - amount).max(0);
        self.update_might();
    }

    pub fn set_might_modifier(&mut self, modifier: i64) {
        self.might_modifier = modifier;
        self.update_might();
    }

    fn update_might(&mut self) {
        self.might = self.population + self.might_modifier;
    }

    /// Sends the army at a faction: state becomes Attacking and the travel
    /// clock starts from the registry distance. Callers validate the army
    /// is alive and the distance is known.
    pub fn set_target(&mut self, faction: &str, travel_weeks: u32) {
        self.target_faction = Some(faction.to_string());
        self.state = ArmyState::Attacking;
        self.travel_weeks_remaining = travel_weeks;
    }

    pub fn set_state(&mut self, state: ArmyState) {
        self.state = state;
    }

    pub fn retreat(&mut self) {
        self.state = ArmyState::Retreating;
    }

    /// Decrements the travel clock, floored at zero.
    pub fn advance_travel(&mut self) {
        self.travel_weeks_remaining = self.travel_weeks_remaining.saturating_sub(1);
    }

    /// True only while Attacking with no travel left: the one-week window
    /// in which combat resolution fires.
    pub fn has_reached_target(&self) -> bool {
        self.travel_weeks_remaining == 0 && self.state == ArmyState::Attacking
    }

    pub fn carrying_capacity(&self) -> i64 {
        self.population / 2
    }

    pub fn is_alive(&self) -> bool {
        self.population > 0
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn population(&self) -> i64 {
        self.population
    }

    pub fn might(&self) -> i64 {
        self.might
    }

    pub fn state(&self) -> ArmyState {
        self.state
    }

    pub fn target_faction(&self) -> Option<&str> {
        self.target_faction.as_deref()
    }

    pub fn travel_weeks_remaining(&self) -> u32 {
        self.travel_weeks_remaining
    }
}
