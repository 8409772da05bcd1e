use crate::types::ParameterMap;

/// A parameter whose value differs between two updates. `None` means the key
/// was absent on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Change {
    pub key: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Keys whose values differ between `previous` and `current`, in key order.
pub(crate) fn diff_parameters(previous: &ParameterMap, current: &ParameterMap) -> Vec<Change> {
    let mut changes = Vec::new();

    for (key, new) in current.iter() {
        let old = previous.get(key);
        if old != Some(new) {
            changes.push(Change {
                key: key.to_string(),
                old: old.map(str::to_string),
                new: Some(new.to_string()),
            });
        }
    }

    for (key, old) in previous.iter() {
        if !current.contains_key(key) {
            changes.push(Change {
                key: key.to_string(),
                old: Some(old.to_string()),
                new: None,
            });
        }
    }

    changes.sort_by(|a, b| a.key.cmp(&b.key));
    changes
}
