//! Minefield math: sweeping, entry strikes and damage.
//!
//! Sweeps take from the largest hostile fields first. Strikes take from the
//! oldest fields first. Both use [`consume`] over an already-ordered list.

use crate::model::{CorpId, Minefield, PlayerId};

/// Hostile mines removed by one sweep.
pub const SWEEP_CAPACITY: u32 = 10;
/// Most mines that can detonate on a single entry.
pub const TRIGGER_CAP: u32 = 5;
/// Credits of damage per detonated mine.
pub const DAMAGE_PER_MINE: i64 = 50;
/// Largest deployment accepted per command.
pub const MAX_DEPLOY_PER_COMMAND: u32 = 1_000;

/// Mines that detonate when a ship enters a sector holding `total_hostile`.
pub fn trigger_count(total_hostile: u32) -> u32 {
    total_hostile.min(TRIGGER_CAP)
}

/// Repair bill for `triggered` detonations, capped at the player's `credits`.
pub fn strike_damage(triggered: u32, credits: i64) -> i64 {
    (i64::from(triggered) * DAMAGE_PER_MINE).min(credits.max(0))
}

/// Change to one minefield after consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    Shrink { id: u64, qty: u32 },
    Remove { id: u64 },
}

/// Take up to `amount` mines from `fields` in the given order.
///
/// Returns the number consumed and the per-field changes to persist.
pub fn consume(fields: &[Minefield], amount: u32) -> (u32, Vec<FieldChange>) {
    let mut remaining = amount;
    let mut taken = 0;
    let mut changes = Vec::new();
    for field in fields {
        if remaining == 0 {
            break;
        }
        if field.qty == 0 {
            continue;
        }
        let take = field.qty.min(remaining);
        remaining -= take;
        taken += take;
        let left = field.qty - take;
        changes.push(if left == 0 {
            FieldChange::Remove { id: field.id }
        } else {
            FieldChange::Shrink {
                id: field.id,
                qty: left,
            }
        });
    }
    (taken, changes)
}

/// Hostile fields with mines left, largest first (sweep order).
pub fn sweep_order(fields: &[Minefield], player: PlayerId, corp: Option<CorpId>) -> Vec<Minefield> {
    let mut hostile = hostile_fields(fields, player, corp);
    hostile.sort_by(|a, b| b.qty.cmp(&a.qty).then(a.id.cmp(&b.id)));
    hostile
}

/// Hostile fields with mines left, oldest first (strike order).
pub fn strike_order(
    fields: &[Minefield],
    player: PlayerId,
    corp: Option<CorpId>,
) -> Vec<Minefield> {
    let mut hostile = hostile_fields(fields, player, corp);
    hostile.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    hostile
}

fn hostile_fields(fields: &[Minefield], player: PlayerId, corp: Option<CorpId>) -> Vec<Minefield> {
    fields
        .iter()
        .filter(|f| f.qty > 0 && f.is_hostile_to(player, corp))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Owner;

    fn field(id: u64, owner: PlayerId, qty: u32, created_at: i64) -> Minefield {
        Minefield {
            id,
            sector_id: 9,
            owner: Owner::Player(owner),
            qty,
            created_at,
        }
    }

    #[test]
    fn trigger_is_capped() {
        assert_eq!(trigger_count(0), 0);
        assert_eq!(trigger_count(3), 3);
        assert_eq!(trigger_count(12), 5);
    }

    #[test]
    fn damage_capped_at_credits() {
        assert_eq!(strike_damage(5, 10_000), 250);
        assert_eq!(strike_damage(5, 120), 120);
        assert_eq!(strike_damage(0, 500), 0);
        assert_eq!(strike_damage(2, -5), 0);
    }

    #[test]
    fn consume_partial_and_full() {
        let fields = [field(1, 2, 7, 0), field(2, 3, 5, 0)];
        let (taken, changes) = consume(&fields, 10);
        assert_eq!(taken, 10);
        assert_eq!(
            changes,
            vec![
                FieldChange::Remove { id: 1 },
                FieldChange::Shrink { id: 2, qty: 2 }
            ]
        );
    }

    #[test]
    fn consume_less_than_available() {
        let fields = [field(1, 2, 3, 0)];
        let (taken, changes) = consume(&fields, 10);
        assert_eq!(taken, 3);
        assert_eq!(changes, vec![FieldChange::Remove { id: 1 }]);
    }

    #[test]
    fn orders_differ() {
        let fields = [
            field(1, 2, 2, 100),
            field(2, 3, 9, 200),
            field(3, 1, 50, 50),
        ];
        let sweep: Vec<u64> = sweep_order(&fields, 1, None).iter().map(|f| f.id).collect();
        let strike: Vec<u64> = strike_order(&fields, 1, None).iter().map(|f| f.id).collect();
        assert_eq!(sweep, vec![2, 1]);
        assert_eq!(strike, vec![1, 2]);
    }
}
