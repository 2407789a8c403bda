use super::category::Category;
use serde::Serialize;

/// Per-category tallies for a single day, as shown in the two display slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub water: u64,
    pub urinate: u64,
}

impl DayCounts {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Water => self.water,
            Category::Urinate => self.urinate,
        }
    }

    pub fn set(&mut self, category: Category, count: u64) {
        match category {
            Category::Water => self.water = count,
            Category::Urinate => self.urinate = count,
        }
    }
}
