//! Experience, levels and rank titles.
//!
//! Reaching level `L` takes `50 * (L - 1) * L / 2` total XP, so each level
//! costs 50 XP more than the one before. Level is always derived from total
//! XP and never goes down.

use crate::model::Player;

/// Highest attainable level; also the length of [`RANK_NAMES`].
pub const MAX_LEVEL: u32 = 200;

/// XP slope: level `L` needs `XP_PER_LEVEL_STEP * (L-1) * L / 2` total XP.
pub const XP_PER_LEVEL_STEP: i64 = 50;

/// Rank title for each level; level 1 is index 0.
pub const RANK_NAMES: [&str; MAX_LEVEL as usize] = [
    "Recruit",
    "Space Recruit",
    "Orbital Initiate",
    "Stellar Initiate",
    "Cadet",
    "Junior Cadet",
    "Senior Cadet",
    "Crewman Apprentice",
    "Crewman",
    "Senior Crewman",
    "Specialist Fourth Class",
    "Specialist Third Class",
    "Specialist Second Class",
    "Specialist First Class",
    "Technical Specialist",
    "Advanced Technical Specialist",
    "Flight Corporal",
    "Corporal",
    "Senior Corporal",
    "Tactical Corporal",
    "Sergeant",
    "Tactical Sergeant",
    "Orbital Sergeant",
    "Stellar Sergeant",
    "Gunnery Sergeant",
    "Master Sergeant",
    "First Sergeant",
    "Senior First Sergeant",
    "Command Sergeant",
    "Command Sergeant Major",
    "Fleet Sergeant Major",
    "Sector Sergeant Major",
    "Stellar Sergeant Major",
    "High Command Sergeant Major",
    "Enlisted Command Chief",
    "Enlisted High Chief",
    "Enlisted Fleet Chief",
    "Enlisted Stellar Chief",
    "Senior Enlisted Advisor",
    "Supreme Enlisted Advisor",
    "Warrant Officer Candidate",
    "Warrant Officer One",
    "Warrant Officer Two",
    "Warrant Officer Three",
    "Warrant Officer Four",
    "Warrant Officer Five",
    "Senior Warrant Officer",
    "Chief Warrant Officer",
    "Master Warrant Officer",
    "Fleet Warrant Officer",
    "Sector Warrant Officer",
    "Stellar Warrant Officer",
    "High Warrant Officer",
    "Grand Warrant Officer",
    "Supreme Warrant Officer",
    "Ensign",
    "Sub-Lieutenant",
    "Lieutenant Junior Grade",
    "Lieutenant",
    "Senior Lieutenant",
    "Flight Lieutenant",
    "Orbital Lieutenant",
    "Stellar Lieutenant",
    "Captain",
    "Senior Captain",
    "Fleet Captain",
    "Wing Captain",
    "Group Captain",
    "Squadron Captain",
    "Major",
    "Wing Major",
    "Group Major",
    "Sector Major",
    "Fleet Major",
    "Lieutenant Colonel",
    "Senior Lieutenant Colonel",
    "Fleet Lieutenant Colonel",
    "Sector Lieutenant Colonel",
    "Stellar Lieutenant Colonel",
    "Colonel",
    "Senior Colonel",
    "Fleet Colonel",
    "Sector Colonel",
    "Stellar Colonel",
    "Command Colonel",
    "High Colonel",
    "Grand Colonel",
    "Supreme Colonel",
    "Brigadier",
    "Brigadier General",
    "Senior Brigadier General",
    "Fleet Brigadier General",
    "Sector Brigadier General",
    "Major General",
    "Senior Major General",
    "Fleet Major General",
    "Sector Major General",
    "Stellar Major General",
    "Lieutenant General",
    "Senior Lieutenant General",
    "Fleet Lieutenant General",
    "Sector Lieutenant General",
    "Stellar Lieutenant General",
    "General",
    "Senior General",
    "Fleet General",
    "Sector General",
    "Stellar General",
    "High General",
    "Grand General",
    "Supreme General",
    "Commodore",
    "Senior Commodore",
    "Fleet Commodore",
    "Sector Commodore",
    "Stellar Commodore",
    "Rear Admiral",
    "Upper Rear Admiral",
    "Fleet Rear Admiral",
    "Sector Rear Admiral",
    "Vice Admiral",
    "Senior Vice Admiral",
    "Fleet Vice Admiral",
    "Sector Vice Admiral",
    "Stellar Vice Admiral",
    "Admiral",
    "Senior Admiral",
    "Fleet Admiral",
    "Sector Admiral",
    "Stellar Admiral",
    "High Admiral",
    "Grand Admiral",
    "Supreme Admiral",
    "Marshal",
    "Fleet Marshal",
    "Sector Marshal",
    "Stellar Marshal",
    "High Marshal",
    "Grand Marshal",
    "Supreme Marshal",
    "Star Marshal",
    "Grand Star Marshal",
    "Supreme Star Marshal",
    "High Commander",
    "Fleet Commander",
    "Sector Commander",
    "Stellar Commander",
    "Grand Commander",
    "Supreme Commander",
    "High Strategic Commander",
    "Fleet Strategic Commander",
    "Sector Strategic Commander",
    "Stellar Strategic Commander",
    "Grand Strategic Commander",
    "Supreme Strategic Commander",
    "Overmarshal",
    "Fleet Overmarshal",
    "Sector Overmarshal",
    "Stellar Overmarshal",
    "High Overmarshal",
    "Grand Overmarshal",
    "Supreme Overmarshal",
    "Lord Commander",
    "High Lord Commander",
    "Grand Lord Commander",
    "Stellar Lord Commander",
    "Sector Lord Commander",
    "Fleet Lord Commander",
    "Supreme Lord Commander",
    "Star Lord",
    "High Star Lord",
    "Grand Star Lord",
    "Stellar Star Lord",
    "Sector Star Lord",
    "Fleet Star Lord",
    "Supreme Star Lord",
    "Arch Commander",
    "High Arch Commander",
    "Grand Arch Commander",
    "Supreme Arch Commander",
    "Arch Marshal",
    "High Arch Marshal",
    "Grand Arch Marshal",
    "Supreme Arch Marshal",
    "Prime Commander",
    "High Prime Commander",
    "Grand Prime Commander",
    "Supreme Prime Commander",
    "Prime Marshal",
    "High Prime Marshal",
    "Grand Prime Marshal",
    "Supreme Prime Marshal",
    "Celestial Commander",
    "High Celestial Commander",
    "Grand Celestial Commander",
    "Supreme Celestial Commander",
    "Celestial Marshal",
    "High Celestial Marshal",
    "Grand Celestial Marshal",
    "Supreme Celestial Marshal",
];

/// Rank title for a level, clamped into `1..=MAX_LEVEL`.
pub fn rank_name(level: u32) -> &'static str {
    let idx = level.clamp(1, MAX_LEVEL) as usize - 1;
    RANK_NAMES[idx]
}

/// Total XP required to reach `level`. Level 1 (and below) needs none.
pub fn xp_for_level(level: u32) -> i64 {
    if level <= 1 {
        return 0;
    }
    let l = i64::from(level.min(MAX_LEVEL));
    XP_PER_LEVEL_STEP * (l - 1) * l / 2
}

/// Highest level whose threshold `xp` meets, clamped to [`MAX_LEVEL`].
pub fn level_for_xp(xp: i64) -> u32 {
    let xp = xp.max(0);
    let (mut lo, mut hi) = (1_u32, MAX_LEVEL);
    let mut best = 1;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        if xp_for_level(mid) <= xp {
            best = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    best
}

/// XP awarded for a successful command, keyed by normalized type and action.
///
/// Command types without an entry earn `max(1, cost * 5)`.
pub fn xp_gain(command_type: &str, action: &str, cost: u32) -> i64 {
    match (command_type, action) {
        ("SCAN", _) | ("MOVE", _) => 10,
        ("TRADE", _) => 15,
        ("PLANET", "COLONIZE") => 120,
        ("PLANET", "UPGRADE_CITADEL") => 60,
        ("PLANET", "LOAD" | "UNLOAD") => 12,
        ("PLANET", _) => 4,
        ("CORP", "CREATE") => 50,
        ("CORP", "JOIN") => 25,
        ("CORP", "LEAVE") => 10,
        ("CORP", "DEPOSIT" | "WITHDRAW") => 5,
        ("CORP", _) => 2,
        ("MINE", "DEPLOY") => 25,
        ("MINE", "SWEEP") => 20,
        ("MINE", _) => 2,
        ("MARKET" | "ROUTE" | "EVENTS", _) => 3,
        ("RANKINGS" | "SEASON" | "HELP", _) => 1,
        ("SHIPYARD", "BUY") => 30,
        ("SHIPYARD", "SELL") => 10,
        ("SHIPYARD", "UPGRADE") => 12,
        ("SHIPYARD", _) => 2,
        _ if cost == 0 => 1,
        _ => i64::from(cost) * 5,
    }
}

/// A level gained by an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankUp {
    pub from: u32,
    pub to: u32,
}

impl RankUp {
    pub fn announcement(&self) -> String {
        format!("Rank up! Level {} ({}).", self.to, rank_name(self.to))
    }
}

/// Add XP and recompute the level. Returns the rank-up, if any.
pub fn award_xp(player: &mut Player, delta: i64) -> Option<RankUp> {
    if delta <= 0 {
        return None;
    }
    let from = level_for_xp(player.xp);
    player.xp = player.xp.saturating_add(delta).max(0);
    let to = level_for_xp(player.xp);
    player.level = to;
    (to > from).then_some(RankUp { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_player;

    #[test]
    fn table_has_one_title_per_level() {
        assert_eq!(RANK_NAMES.len(), MAX_LEVEL as usize);
        assert_eq!(rank_name(1), "Recruit");
        assert_eq!(rank_name(MAX_LEVEL), "Supreme Celestial Marshal");
    }

    #[test]
    fn rank_name_clamps() {
        assert_eq!(rank_name(0), "Recruit");
        assert_eq!(rank_name(5_000), "Supreme Celestial Marshal");
    }

    #[test]
    fn thresholds() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 50);
        assert_eq!(xp_for_level(3), 150);
        assert_eq!(xp_for_level(10), 2_250);
        assert_eq!(xp_for_level(500), xp_for_level(MAX_LEVEL));
    }

    #[test]
    fn level_round_trip() {
        for level in 1..=MAX_LEVEL {
            assert_eq!(level_for_xp(xp_for_level(level)), level);
            if level > 1 {
                assert_eq!(level_for_xp(xp_for_level(level) - 1), level - 1);
            }
        }
    }

    #[test]
    fn negative_and_huge_xp() {
        assert_eq!(level_for_xp(-10), 1);
        assert_eq!(level_for_xp(i64::MAX), MAX_LEVEL);
    }

    #[test]
    fn xp_table_samples() {
        assert_eq!(xp_gain("SCAN", "", 1), 10);
        assert_eq!(xp_gain("PLANET", "COLONIZE", 5), 120);
        assert_eq!(xp_gain("PLANET", "INFO", 0), 4);
        assert_eq!(xp_gain("CORP", "SAY", 0), 2);
        assert_eq!(xp_gain("SHIPYARD", "UPGRADE", 0), 12);
        assert_eq!(xp_gain("HELP", "", 0), 1);
    }

    #[test]
    fn unknown_types_fall_back_to_cost() {
        assert_eq!(xp_gain("WARP_DRIVE", "", 0), 1);
        assert_eq!(xp_gain("WARP_DRIVE", "", 3), 15);
    }

    #[test]
    fn award_detects_rank_up() {
        let mut p = sample_player();
        p.xp = 40;
        p.level = 1;
        let up = award_xp(&mut p, 10);
        assert_eq!(up, Some(RankUp { from: 1, to: 2 }));
        assert_eq!(p.level, 2);
        assert_eq!(
            up.map(|u| u.announcement()),
            Some("Rank up! Level 2 (Space Recruit).".to_string())
        );

        assert_eq!(award_xp(&mut p, 10), None);
        assert_eq!(p.xp, 60);
        assert_eq!(award_xp(&mut p, 0), None);
    }
}
