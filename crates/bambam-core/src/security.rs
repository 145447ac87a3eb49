use std::collections::HashSet;

use crate::domain::UserId;

// ============== Authorization ==============

/// True iff `user_id` is one of the configured administrators.
pub fn is_admin(user_id: UserId, admin_ids: &HashSet<i64>) -> bool {
    admin_ids.contains(&user_id.0)
}
