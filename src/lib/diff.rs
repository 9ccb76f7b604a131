use crate::parse::EnvMap;

/// The difference between two environment snapshots.
///
/// Computed by [`EnvDiff::between`]; both key lists come out in sorted order
/// because [`EnvMap`] iterates its keys sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvDiff {
  /// Keys present in the new snapshot whose value differs from the old
  /// snapshot, or which the old snapshot does not contain at all.
  pub changed_keys: Vec<String>,
  /// Keys present in the old snapshot but absent from the new one.
  pub removed_keys: Vec<String>,
}

impl EnvDiff {
  /// Compares an old snapshot against a new one.
  pub fn between(old: &EnvMap, new: &EnvMap) -> Self {
    let mut changed_keys = Vec::new();
    for (key, value) in new {
      if old.get(key) != Some(value) {
        changed_keys.push(key.clone());
      }
    }

    let mut removed_keys = Vec::new();
    for key in old.keys() {
      if !new.contains_key(key) {
        removed_keys.push(key.clone());
      }
    }

    Self {
      changed_keys,
      removed_keys,
    }
  }

  /// True when the two snapshots are identical.
  pub fn is_empty(&self) -> bool {
    self.changed_keys.is_empty() && self.removed_keys.is_empty()
  }
}
