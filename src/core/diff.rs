//! Env diff type.
//!
//! Compares the local plaintext env against a decrypted remote version.
//! Orientation follows the remote: keys present only remotely are
//! `added` (you would gain them by pulling), keys present only locally
//! are `removed`, keys in both with differing values are `changed`.

use std::collections::HashMap;

/// The comparison between a local env file and a remote version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDiff {
    added: Vec<String>,
    removed: Vec<String>,
    changed: Vec<String>,
    unchanged: usize,
}

impl EnvDiff {
    /// Compute the diff between local and remote key-value pairs.
    ///
    /// Entries are sorted by key name for stable output.
    pub fn compute(local: &[(String, String)], remote: &[(String, String)]) -> Self {
        let local_map: HashMap<&str, &str> = local
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let remote_map: HashMap<&str, &str> = remote
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut changed = Vec::new();
        let mut unchanged = 0;

        for (key, remote_value) in &remote_map {
            match local_map.get(key) {
                None => added.push((*key).to_string()),
                Some(local_value) if local_value != remote_value => {
                    changed.push((*key).to_string());
                }
                Some(_) => unchanged += 1,
            }
        }

        for key in local_map.keys() {
            if !remote_map.contains_key(key) {
                removed.push((*key).to_string());
            }
        }

        added.sort();
        removed.sort();
        changed.sort();

        Self {
            added,
            removed,
            changed,
            unchanged,
        }
    }

    /// Keys present only in the remote version.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Keys present only locally.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Keys present in both with differing values.
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    /// Number of keys identical on both sides.
    pub fn unchanged_count(&self) -> usize {
        self.unchanged
    }

    /// Whether local and remote are identical key-for-key.
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_added_removed_changed() {
        let local = pairs(&[("A", "1"), ("B", "2")]);
        let remote = pairs(&[("A", "1"), ("B", "3"), ("C", "4")]);

        let diff = EnvDiff::compute(&local, &remote);

        assert_eq!(diff.added(), ["C".to_string()]);
        assert!(diff.removed().is_empty());
        assert_eq!(diff.changed(), ["B".to_string()]);
        assert_eq!(diff.unchanged_count(), 1);
        assert!(!diff.is_clean());
    }

    #[test]
    fn test_diff_local_only_keys_are_removed() {
        let local = pairs(&[("A", "1"), ("LOCAL_ONLY", "x")]);
        let remote = pairs(&[("A", "1")]);

        let diff = EnvDiff::compute(&local, &remote);

        assert_eq!(diff.removed(), ["LOCAL_ONLY".to_string()]);
        assert!(diff.added().is_empty());
        assert_eq!(diff.unchanged_count(), 1);
    }

    #[test]
    fn test_diff_identical_is_clean() {
        let local = pairs(&[("A", "1"), ("B", "2")]);

        let diff = EnvDiff::compute(&local, &local.clone());

        assert!(diff.is_clean());
        assert_eq!(diff.unchanged_count(), 2);
    }

    #[test]
    fn test_diff_empty_both_sides() {
        let diff = EnvDiff::compute(&[], &[]);

        assert!(diff.is_clean());
        assert_eq!(diff.unchanged_count(), 0);
    }

    #[test]
    fn test_diff_output_is_sorted() {
        let local = pairs(&[]);
        let remote = pairs(&[("ZETA", "1"), ("ALPHA", "2"), ("MIDDLE", "3")]);

        let diff = EnvDiff::compute(&local, &remote);

        assert_eq!(
            diff.added(),
            ["ALPHA".to_string(), "MIDDLE".to_string(), "ZETA".to_string()]
        );
    }
}
