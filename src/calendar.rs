use crate::store::TaskStore;
use crate::task::Task;
use chrono::{Datelike, Duration, NaiveDate};

/// One cell of a month grid; leading and trailing cells outside the month
/// are blank, matching a paper calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum MonthCell {
    Blank,
    Day(NaiveDate, Vec<Task>),
}

pub fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// The Monday-start week containing `day`: always exactly 7 entries.
pub fn week_grid(store: &TaskStore, day: NaiveDate) -> Vec<(NaiveDate, Vec<Task>)> {
    let monday = monday_of(day);
    (0..7)
        .map(|i| {
            let date = monday + Duration::days(i);
            (date, store.list(date).to_vec())
        })
        .collect()
}

/// Monday-aligned weeks covering the month; rows always hold 7 cells.
/// An invalid year/month yields no rows.
pub fn month_grid(store: &TaskStore, year: i32, month: u32) -> Vec<Vec<MonthCell>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_first) = next_month else {
        return Vec::new();
    };
    let days_in_month = (next_first - first).num_days();

    let mut cells = Vec::new();
    for _ in 0..first.weekday().num_days_from_monday() {
        cells.push(MonthCell::Blank);
    }
    for day in 0..days_in_month {
        let date = first + Duration::days(day);
        cells.push(MonthCell::Day(date, store.list(date).to_vec()));
    }
    while cells.len() % 7 != 0 {
        cells.push(MonthCell::Blank);
    }

    cells
        .chunks(7)
        .map(|week| week.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{parse_date, TaskDraft};
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn week_grid_starts_monday_for_any_input_day() {
        let store = TaskStore::new();
        for day in ["2024-03-04", "2024-03-06", "2024-03-10"] {
            let week = week_grid(&store, date(day));
            assert_eq!(week.len(), 7);
            assert_eq!(week[0].0, date("2024-03-04"));
            assert_eq!(week[0].0.weekday(), Weekday::Mon);
            assert_eq!(week[6].0, date("2024-03-10"));
        }
    }

    #[test]
    fn week_grid_carries_tasks_in_display_order() {
        let mut store = TaskStore::new();
        store.add("2024-03-06", TaskDraft::titled("first")).unwrap();
        store.add("2024-03-06", TaskDraft::titled("second")).unwrap();
        let week = week_grid(&store, date("2024-03-04"));
        let (day, tasks) = &week[2];
        assert_eq!(*day, date("2024-03-06"));
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn march_2024_pads_four_leading_blanks() {
        // March 2024 starts on a Friday and has 31 days: 4 + 31 = 35 cells.
        let store = TaskStore::new();
        let grid = month_grid(&store, 2024, 3);
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|week| week.len() == 7));
        assert!(grid[0][..4].iter().all(|c| *c == MonthCell::Blank));
        assert_eq!(grid[0][4], MonthCell::Day(date("2024-03-01"), Vec::new()));
        assert_eq!(grid[4][6], MonthCell::Day(date("2024-03-31"), Vec::new()));
    }

    #[test]
    fn month_grid_places_tasks_in_their_cell() {
        let mut store = TaskStore::new();
        store.add("2024-03-06", TaskDraft::titled("Gym")).unwrap();
        let grid = month_grid(&store, 2024, 3);
        // 03-06 is the Wednesday of the second row.
        match &grid[1][2] {
            MonthCell::Day(day, tasks) => {
                assert_eq!(*day, date("2024-03-06"));
                assert_eq!(tasks[0].title, "Gym");
            }
            MonthCell::Blank => panic!("expected a day cell"),
        }
    }

    #[test]
    fn december_rolls_into_next_year() {
        let store = TaskStore::new();
        let grid = month_grid(&store, 2024, 12);
        // December 2024 starts on a Sunday: 6 leading blanks, 31 days.
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0][6], MonthCell::Day(date("2024-12-01"), Vec::new()));
    }

    #[test]
    fn invalid_month_yields_no_rows() {
        let store = TaskStore::new();
        assert!(month_grid(&store, 2024, 13).is_empty());
    }
}
