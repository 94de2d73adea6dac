use crate::model::grid::GridModel;
use crate::model::storage::StorageModel;
use crate::solve::VarId;

const MINUTES_PER_DAY: u32 = 1440;

/// Derives the display label of a period.
///
/// Horizons longer than one day prefix the day number: `D1_00:00` is the
/// first period of the second day. Within a day the label is the wall
/// time of the period start. Labels are deterministic and unique within
/// a horizon.
pub fn period_label(index: usize, count: usize, period_minutes: u32) -> String {
    let mut index = index as u32;
    let mut label = String::new();

    if count as u32 * period_minutes > MINUTES_PER_DAY {
        let periods_per_day = (MINUTES_PER_DAY / period_minutes).max(1);
        let day = index / periods_per_day;
        label.push_str(&format!("D{day}_"));
        index -= day * periods_per_day;
    }

    let minute = index * period_minutes;
    label.push_str(&format!("{:02}:{:02}", minute / 60, minute % 60));
    label
}

/// One discrete interval of the planning horizon with its sub-models.
///
/// All variables are bound during horizon construction; after the solve
/// the period is only read to extract resolved values.
#[derive(Debug, PartialEq)]
pub struct Period {
    pub index: usize,
    pub label: String,
    /// Curtailable renewable production in W, bounded by the forecast cap.
    pub production: VarId,
    /// Household consumption in W, pinned to the profile value.
    pub consumption: VarId,
    pub storage: StorageModel,
    pub grid: GridModel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_day_labels_are_wall_times() {
        assert_eq!(period_label(0, 24, 60), "00:00");
        assert_eq!(period_label(23, 24, 60), "23:00");
        assert_eq!(period_label(3, 96, 15), "00:45");
    }

    #[test]
    fn multi_day_labels_carry_the_day_prefix() {
        assert_eq!(period_label(24, 48, 60), "D1_00:00");
        assert_eq!(period_label(0, 48, 60), "D0_00:00");
        assert_eq!(period_label(47, 48, 60), "D1_23:00");
    }

    #[test]
    fn labels_are_unique_per_horizon() {
        let labels: Vec<String> = (0..96).map(|i| period_label(i, 96, 30)).collect();
        let mut deduped = labels.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), labels.len());
    }
}
