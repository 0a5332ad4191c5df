//! Time-based turn regeneration.

use crate::model::Player;

/// Regen intervals below this are raised to it.
pub const MIN_REGEN_SECONDS: i64 = 10;

/// Grant one turn per whole `regen_seconds` elapsed since the last regen.
///
/// Turns are capped at `turns_max`, and the regen stamp advances only by the
/// intervals consumed so partial progress carries over. The first call on a
/// player without a stamp only sets it. Returns the number of intervals
/// consumed (turns lost to the cap still count).
pub fn regen_turns(player: &mut Player, regen_seconds: i64, now: i64) -> u32 {
    let interval = regen_seconds.max(MIN_REGEN_SECONDS);
    let Some(last) = player.last_turn_regen else {
        player.last_turn_regen = Some(now);
        return 0;
    };
    let delta = now - last;
    if delta <= 0 {
        return 0;
    }
    let added = delta / interval;
    if added <= 0 {
        return 0;
    }
    let gained = u32::try_from(added).unwrap_or(u32::MAX);
    player.turns = player.turns.saturating_add(gained).min(player.turns_max);
    player.last_turn_regen = Some(last + added * interval);
    gained
}
