//! Reconciliation of default and persisted todos
//!
//! Persisted records override default records with the same id in place;
//! persisted records with new ids are appended. The result is ordered by
//! descending id. Later persisted duplicates of an id replace earlier ones,
//! so the result is always id-unique as long as the defaults are.

use tracing::debug;

use crate::models::Todo;
use crate::working_set::WorkingSet;

/// Merge persisted records over a copy of the defaults
pub fn reconcile(defaults: &[Todo], persisted: Vec<Todo>) -> WorkingSet {
    let mut merged = defaults.to_vec();
    let mut overridden = 0usize;

    for todo in persisted {
        match merged.iter().position(|t| t.id == todo.id) {
            Some(index) => {
                merged[index] = todo;
                overridden += 1;
            }
            None => merged.push(todo),
        }
    }

    merged.sort_by(|a, b| b.id.cmp(&a.id));

    debug!(
        "Reconciled {} defaults into {} todos ({} overridden)",
        defaults.len(),
        merged.len(),
        overridden
    );

    WorkingSet::from(merged)
}
