use std::future::Future;

use crate::parse::EnvMap;

/// Applies an asynchronous per-value transform across all entries of a map.
///
/// The transform receives `(key, value)` for each entry — the key is passed
/// along so a capability can bind the ciphertext to the variable name — and
/// entries are visited in sorted key order. The first failure aborts the
/// whole operation; no partial map is returned.
pub async fn map_values<F, Fut, E>(values: &EnvMap, transform: F) -> Result<EnvMap, E>
where
  F: Fn(String, String) -> Fut,
  Fut: Future<Output = Result<String, E>>,
{
  let mut mapped = EnvMap::new();
  for (key, value) in values {
    let mapped_value = transform(key.clone(), value.clone()).await?;
    mapped.insert(key.clone(), mapped_value);
  }
  Ok(mapped)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  fn env_map(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[tokio::test]
  async fn test_maps_all_entries() {
    let values = env_map(&[("B", "2"), ("A", "1")]);

    let mapped: EnvMap = map_values(&values, |_key, value| async move {
      Ok::<_, ()>(format!("mapped-{}", value))
    })
    .await
    .unwrap();

    assert_eq!(mapped, env_map(&[("A", "mapped-1"), ("B", "mapped-2")]));
  }

  #[tokio::test]
  async fn test_visits_keys_in_sorted_order() {
    let values = env_map(&[("ZULU", "1"), ("ALPHA", "2"), ("MIKE", "3")]);
    let visited = RefCell::new(Vec::new());

    map_values(&values, |key, value| {
      visited.borrow_mut().push(key);
      async move { Ok::<_, ()>(value) }
    })
    .await
    .unwrap();

    assert_eq!(visited.into_inner(), vec!["ALPHA", "MIKE", "ZULU"]);
  }

  #[tokio::test]
  async fn test_transform_receives_key() {
    let values = env_map(&[("KEY", "VALUE")]);

    let mapped = map_values(&values, |key, value| async move {
      Ok::<_, ()>(format!("{}:{}", key, value))
    })
    .await
    .unwrap();

    assert_eq!(mapped["KEY"], "KEY:VALUE");
  }

  #[tokio::test]
  async fn test_failure_aborts_without_partial_result() {
    let values = env_map(&[("A", "ok"), ("B", "boom"), ("C", "ok")]);
    let calls = RefCell::new(0usize);

    let result = map_values(&values, |_key, value| {
      *calls.borrow_mut() += 1;
      async move {
        if value == "boom" {
          Err("transform failed")
        } else {
          Ok(value)
        }
      }
    })
    .await;

    assert_eq!(result.unwrap_err(), "transform failed");
    // A and B were attempted, C never was.
    assert_eq!(calls.into_inner(), 2);
  }

  #[tokio::test]
  async fn test_empty_map() {
    let mapped = map_values(&EnvMap::new(), |_key, value| async move {
      Ok::<_, ()>(value)
    })
    .await
    .unwrap();

    assert!(mapped.is_empty());
  }
}
