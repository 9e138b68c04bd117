//! Order-preserving edits on string lists (group members, export lists).

use tracing::debug;

/// Return `list` without any occurrence of `remove`.
pub fn remove_element(list: &[String], remove: &str) -> Vec<String> {
    list.iter()
        .filter(|item| {
            if item.as_str() == remove {
                debug!("Removing element from list: {}", remove);
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

/// Return `list` with `add` appended unless already present.
pub fn add_unique_element(list: &[String], add: &str) -> Vec<String> {
    let mut ret = list.to_vec();
    if !ret.iter().any(|item| item == add) {
        ret.push(add.to_string());
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_remove_element_keeps_order() {
        let list = strings(&["n1", "n2", "n1", "n3"]);
        assert_eq!(remove_element(&list, "n1"), strings(&["n2", "n3"]));
        assert_eq!(remove_element(&list, "n9"), list);
    }

    #[test]
    fn test_add_unique_element() {
        let list = strings(&["n1", "n2"]);
        assert_eq!(add_unique_element(&list, "n3"), strings(&["n1", "n2", "n3"]));
        assert_eq!(add_unique_element(&list, "n1"), list);
        assert_eq!(add_unique_element(&[], "n1"), strings(&["n1"]));
    }
}
