use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

pub type StaffId = i64;

/// Staff reference as it travels on the wire: `{ "id": 3 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct StaffRef {
    pub id: StaffId,
}

/// Set of staff ids. Serialized as a list of `StaffRef` in ascending id order;
/// duplicates in the input collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StaffRef>", into = "Vec<StaffRef>")]
pub struct StaffIdSet(BTreeSet<StaffId>);

impl StaffIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: StaffId) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: StaffId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: StaffId) -> bool {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StaffId> + '_ {
        self.0.iter().copied()
    }

    /// Lowest id present in both sets
    pub fn first_shared(&self, other: &StaffIdSet) -> Option<StaffId> {
        self.0.intersection(&other.0).next().copied()
    }
}

impl FromIterator<StaffId> for StaffIdSet {
    fn from_iter<I: IntoIterator<Item = StaffId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<StaffRef>> for StaffIdSet {
    fn from(refs: Vec<StaffRef>) -> Self {
        refs.into_iter().map(|r| r.id).collect()
    }
}

impl From<StaffIdSet> for Vec<StaffRef> {
    fn from(set: StaffIdSet) -> Self {
        set.0.into_iter().map(|id| StaffRef { id }).collect()
    }
}

fn working_by_default() -> bool {
    true
}

/// Staffing configuration of one day of a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayConfig {
    pub day: u32,
    #[serde(default = "working_by_default")]
    pub is_working_day: bool,
    pub num_shifts: u32,
    pub num_consultations: u32,
    #[serde(default)]
    #[schema(value_type = Vec<StaffRef>)]
    pub wanted_shifts: StaffIdSet,
    #[serde(default)]
    #[schema(value_type = Vec<StaffRef>)]
    pub unwanted_shifts: StaffIdSet,
}

impl DayConfig {
    /// A staff id listed as both wanted and unwanted, if any
    pub fn conflicting_staff(&self) -> Option<StaffId> {
        self.wanted_shifts.first_shared(&self.unwanted_shifts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_day_config_wire_format() {
        let day = DayConfig {
            day: 15,
            is_working_day: false,
            num_shifts: 2,
            num_consultations: 1,
            wanted_shifts: [7, 3].into_iter().collect(),
            unwanted_shifts: [9].into_iter().collect(),
        };

        assert_eq!(
            serde_json::to_value(&day).unwrap(),
            json!({
                "day": 15,
                "isWorkingDay": false,
                "numShifts": 2,
                "numConsultations": 1,
                "wantedShifts": [{"id": 3}, {"id": 7}],
                "unwantedShifts": [{"id": 9}]
            })
        );
    }

    #[test]
    fn test_duplicate_staff_collapse() {
        let set: StaffIdSet = serde_json::from_value(json!([{"id": 4}, {"id": 2}, {"id": 4}])).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_missing_optional_fields() {
        let day: DayConfig =
            serde_json::from_value(json!({"day": 1, "numShifts": 3, "numConsultations": 0})).unwrap();
        assert!(day.is_working_day);
        assert!(day.wanted_shifts.is_empty());
        assert!(day.unwanted_shifts.is_empty());
    }

    #[test]
    fn test_conflicting_staff() {
        let mut day = DayConfig {
            day: 1,
            is_working_day: true,
            num_shifts: 2,
            num_consultations: 1,
            wanted_shifts: [1, 5, 8].into_iter().collect(),
            unwanted_shifts: [2, 8].into_iter().collect(),
        };
        assert_eq!(day.conflicting_staff(), Some(8));

        day.unwanted_shifts.remove(8);
        assert_eq!(day.conflicting_staff(), None);
    }
}
