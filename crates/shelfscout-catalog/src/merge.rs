use std::collections::HashSet;

use shelfscout_core::MAX_CANDIDATES;

use crate::types::RemoteDocument;

/// Combines author-query and general-query results into one list.
///
/// Author results come first, each source keeps its own order, the first
/// occurrence of a `catalog_key` wins, and the output holds at most
/// [`MAX_CANDIDATES`] documents. Either input may be empty.
pub fn merge_remote(
    author_results: Vec<RemoteDocument>,
    general_results: Vec<RemoteDocument>,
) -> Vec<RemoteDocument> {
    let mut seen: HashSet<String> = HashSet::new();
    author_results
        .into_iter()
        .chain(general_results)
        .filter(|doc| seen.insert(doc.catalog_key.clone()))
        .take(MAX_CANDIDATES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(key: &str) -> RemoteDocument {
        RemoteDocument {
            catalog_key: key.to_string(),
            title: format!("Title {key}"),
            author_names: vec![],
            cover_id: None,
            page_count_median: None,
        }
    }

    fn docs(prefix: &str, n: usize) -> Vec<RemoteDocument> {
        (0..n).map(|i| doc(&format!("{prefix}{i}"))).collect()
    }

    fn keys(docs: &[RemoteDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.catalog_key.as_str()).collect()
    }

    #[test]
    fn author_results_come_first_and_duplicates_drop() {
        let merged = merge_remote(
            vec![doc("A")],
            vec![doc("B"), doc("A"), doc("C")],
        );
        assert_eq!(keys(&merged), vec!["A", "B", "C"]);
    }

    #[test]
    fn first_occurrence_wins_over_later_duplicate() {
        let mut general_a = doc("A");
        general_a.title = "General copy".to_string();
        let merged = merge_remote(vec![doc("A")], vec![general_a]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Title A");
    }

    #[test]
    fn duplicates_within_one_source_collapse() {
        let merged = merge_remote(vec![doc("A"), doc("A")], vec![doc("B"), doc("B")]);
        assert_eq!(keys(&merged), vec!["A", "B"]);
    }

    #[test]
    fn full_author_results_fill_the_bound() {
        let author = docs("a", 10);
        let merged = merge_remote(author.clone(), docs("g", 10));
        assert_eq!(merged, author);
    }

    #[test]
    fn output_is_bounded_after_dedup() {
        let merged = merge_remote(docs("a", 6), docs("g", 8));
        assert_eq!(merged.len(), 10);
        assert_eq!(
            keys(&merged),
            vec!["a0", "a1", "a2", "a3", "a4", "a5", "g0", "g1", "g2", "g3"]
        );

        let mut general = docs("a", 6);
        general.extend(docs("g", 2));
        assert_eq!(merge_remote(docs("a", 6), general).len(), 8);
    }

    #[test]
    fn empty_inputs_degrade_gracefully() {
        assert_eq!(keys(&merge_remote(vec![], vec![doc("B")])), vec!["B"]);
        assert_eq!(keys(&merge_remote(vec![doc("A")], vec![])), vec!["A"]);
        assert!(merge_remote(vec![], vec![]).is_empty());
    }

    #[test]
    fn author_entries_precede_new_general_entries() {
        let merged = merge_remote(
            vec![doc("x"), doc("y")],
            vec![doc("y"), doc("z"), doc("x"), doc("w")],
        );
        let author_keys = ["x", "y"];
        let last_author = merged
            .iter()
            .rposition(|d| author_keys.contains(&d.catalog_key.as_str()))
            .unwrap();
        let first_general = merged
            .iter()
            .position(|d| !author_keys.contains(&d.catalog_key.as_str()))
            .unwrap();
        assert!(last_author < first_general);
        assert_eq!(keys(&merged), vec!["x", "y", "z", "w"]);
    }
}
