use crate::store::TaskStore;
use crate::task::{parse_date, TaskDraft};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

/// Best-effort, lossy import of a plain-text schedule blob: each line is
/// expected to read `<date> <rest-of-line-as-title>`. Lines whose first
/// token is not a valid date, or with nothing after it, are skipped.
pub fn import_text(store: &mut TaskStore, blob: &str) -> ImportReport {
    let mut report = ImportReport::default();
    for line in blob.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((first, rest)) = line.split_once(char::is_whitespace) else {
            debug!(line, "import: no title after date token, skipping");
            report.skipped += 1;
            continue;
        };
        let title = rest.trim();
        match parse_date(first) {
            Ok(date) if !title.is_empty() => {
                store.add_on(date, TaskDraft::titled(title));
                report.added += 1;
            }
            _ => {
                debug!(line, "import: unparsable line, skipping");
                report.skipped += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_date_prefixed_lines_and_skips_the_rest() {
        let mut store = TaskStore::new();
        let blob = "\
2024-03-04 Team standup
not a date at all
2024-03-05 Lunch with Sam

2024-99-99 bogus month
2024-03-04
";
        let report = import_text(&mut store, blob);
        assert_eq!(report, ImportReport { added: 2, skipped: 3 });
        let day = store.list(parse_date("2024-03-04").unwrap());
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].title, "Team standup");
    }

    #[test]
    fn title_keeps_interior_whitespace() {
        let mut store = TaskStore::new();
        import_text(&mut store, "2024-03-05   Lunch  with   Sam  ");
        let day = store.list(parse_date("2024-03-05").unwrap());
        assert_eq!(day[0].title, "Lunch  with   Sam");
    }

    #[test]
    fn empty_blob_is_a_no_op() {
        let mut store = TaskStore::new();
        assert_eq!(import_text(&mut store, ""), ImportReport::default());
        assert!(store.is_empty());
    }
}
