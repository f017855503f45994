//! Draw candidate selection.
//!
//! Pure logic of the assignment engine: given the active roster and the
//! set of participants already chosen as receivers, compute the pool a
//! giver may draw from and pick one uniformly. Persistence and the
//! race-retry loop live with the caller; the database's unique
//! constraints remain the authoritative guard.

use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::models::Participant;

/// Upper bound on insert attempts when concurrent draws collide on a
/// receiver.
pub const MAX_DRAW_ATTEMPTS: u32 = 3;

/// Computes the candidate pool for a giver: every active participant
/// except the giver themself and anyone already taken as a receiver.
///
/// Participants who have already given stay in the pool: everyone
/// receives exactly once, no matter when they draw.
pub fn candidate_pool<'a>(
    active: &'a [Participant],
    taken_receivers: &HashSet<Uuid>,
    giver_id: Uuid,
) -> Vec<&'a Participant> {
    active
        .iter()
        .filter(|p| p.id != giver_id && !taken_receivers.contains(&p.id))
        .collect()
}

/// Picks one candidate uniformly at random, or `None` on an empty pool.
pub fn pick_uniform<'a, R: Rng>(rng: &mut R, pool: &[&'a Participant]) -> Option<&'a Participant> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}
