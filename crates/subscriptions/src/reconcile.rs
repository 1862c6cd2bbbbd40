use chrono::{DateTime, Utc};

use menuboard_catalog::Subscription;

/// Flip a lapsed subscription to inactive. Returns whether it changed.
///
/// This is the only place expiry is written back; the gate itself stays pure.
pub fn reconcile_expired(subscription: &mut Subscription, now: DateTime<Utc>) -> bool {
    if subscription.is_lapsed_at(now) {
        subscription.active = false;
        true
    } else {
        false
    }
}
