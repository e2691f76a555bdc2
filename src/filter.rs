// src/filter.rs

use tracing::{debug, info};

use crate::data::{BoroughGroup, Record, RecordSet};

/// Records whose borough contains `needle` (case-sensitive). Null boroughs never match.
pub fn by_borough_substring(records: &RecordSet, needle: &str) -> RecordSet {
    let out = records.filtered(|r| borough_contains(r, needle));
    info!(needle, kept = out.len(), of = records.len(), "borough filter");
    out
}

fn borough_contains(r: &Record, needle: &str) -> bool {
    r.borough.as_deref().is_some_and(|b| b.contains(needle))
}

/// One group per name, in the order given, each holding the records whose
/// borough equals that name exactly. Records matching no name fall in no group.
/// A name listed twice yields its group once.
pub fn partition_by_borough<S: AsRef<str>>(records: &RecordSet, names: &[S]) -> Vec<BoroughGroup> {
    let mut groups: Vec<BoroughGroup> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if groups.iter().any(|g| g.name == name) {
            continue;
        }
        let members = records.filtered(|r| r.borough.as_deref() == Some(name));
        debug!(group = name, records = members.len(), "borough group");
        groups.push(BoroughGroup { name: s!(name), records: members });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pc: &str, borough: Option<&str>) -> Record {
        Record {
            postal_code: s!(pc),
            borough: borough.map(String::from),
            neighborhood: Some(s!("n")),
            latitude: Some(43.0),
            longitude: Some(-79.0),
        }
    }

    fn sample() -> RecordSet {
        RecordSet::new(vec![
            rec("M5A", Some("Downtown Toronto")),
            rec("M4E", Some("East Toronto")),
            rec("M3A", Some("North York")),
            rec("M4N", Some("Central Toronto")),
            rec("M1B", None),
            rec("M5B", Some("Downtown Toronto")),
            rec("M7A", Some("Queen's Park")),
            rec("M9X", Some("toronto lowercase")),
        ])
    }

    #[test]
    fn substring_filter_is_exact_about_membership() {
        let all = sample();
        let kept = by_borough_substring(&all, "Toronto");
        let codes: Vec<_> = kept.iter().map(|r| r.postal_code.as_str()).collect();
        assert_eq!(codes, ["M5A", "M4E", "M4N", "M5B"]);

        for r in &all {
            let inside = kept.get(&r.postal_code).is_some();
            let matches = r.borough.as_deref().is_some_and(|b| b.contains("Toronto"));
            assert_eq!(inside, matches, "{}", r.postal_code);
        }
    }

    #[test]
    fn groups_are_disjoint_and_exact() {
        let kept = by_borough_substring(&sample(), "Toronto");
        let groups = partition_by_borough(
            &kept,
            &["Downtown Toronto", "Central Toronto", "West Toronto", "East Toronto"],
        );
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
        assert!(groups[2].is_empty());
        assert_eq!(groups[3].records.records()[0].postal_code, "M4E");

        for (i, a) in groups.iter().enumerate() {
            for b in &groups[i + 1..] {
                assert!(a.records.iter().all(|r| b.records.get(&r.postal_code).is_none()));
            }
            assert!(a.records.iter().all(|r| r.borough.as_deref() == Some(a.name.as_str())));
        }
    }

    #[test]
    fn unnamed_boroughs_stay_out_of_groups() {
        let kept = by_borough_substring(&sample(), "Toronto");
        let groups = partition_by_borough(&kept, &["Downtown Toronto"]);
        let grouped: usize = groups.iter().map(BoroughGroup::len).sum();
        assert_eq!(grouped, 2);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn repeated_names_give_one_group() {
        let groups = partition_by_borough(&sample(), &[s!("East Toronto"), s!("East Toronto")]);
        assert_eq!(groups.len(), 1);
    }
}
