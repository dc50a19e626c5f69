use std::sync::Arc;

use crate::registry::{ClassBody, ClassRecord};

/// Orders the wrapper set by `(Reverse(order), name)` — higher order first —
/// then filters by `matches`/`mismatches`, in that order. The sort-before-filter
/// order is preserved deliberately: flipping it would silently change which
/// wrappers see which inner instance whenever a wrapper that would have been
/// filtered out still occupied a sort position.
pub fn eligible_wrappers<T: ?Sized>(wrappers: &[Arc<ClassRecord<T>>], name: &str) -> Vec<Arc<ClassRecord<T>>> {
    let mut sorted = wrappers.to_vec();
    sorted.sort_by(|a, b| b.order.cmp(&a.order).then_with(|| a.primary_name().cmp(b.primary_name())));

    sorted
        .into_iter()
        .filter(|record| match &record.body {
            ClassBody::Wrapper(body) => body.eligible_for(name),
            _ => false,
        })
        .collect()
}
