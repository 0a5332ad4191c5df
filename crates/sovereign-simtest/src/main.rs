//! Sovereign Conquest Headless Harness
//!
//! Loads the shared universe document into the in-memory store and drives
//! scripted command sessions and tickers through the same engine the
//! SpacetimeDB module runs. No DB, no networking.
//!
//! Usage:
//!   cargo run -p sovereign-simtest
//!   cargo run -p sovereign-simtest -- --verbose

use rand::rngs::StdRng;
use rand::SeedableRng;

use sovereign_logic::command::CommandRequest;
use sovereign_logic::config::GameConfig;
use sovereign_logic::events::MAX_ACTIVE_EVENTS;
use sovereign_logic::memory::MemoryStore;
use sovereign_logic::route::WarpGraph;
use sovereign_logic::store::GameStore;
use sovereign_logic::ticks::{PROTECTORATE_MAX_FIGHTERS, PROTECTORATE_MIN_FIGHTERS};
use sovereign_logic::universe::Universe;
use sovereign_logic::view::CommandResponse;

// ── Universe document (same JSON the import reducer takes) ──────────────
const UNIVERSE_JSON: &str = include_str!("../../../data/universe.json");

const START: i64 = 1_000_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

/// One store with the universe loaded, plus the config and a clock.
struct Session {
    store: MemoryStore,
    config: GameConfig,
    now: i64,
}

impl Session {
    fn new(universe: &Universe) -> Self {
        let mut store = MemoryStore::new();
        store.load_universe(universe);
        Self {
            store,
            config: GameConfig::default(),
            now: START,
        }
    }

    fn join(&mut self, id: u64, name: &str) -> bool {
        self.store
            .join_player(id, name, &self.config, self.now)
            .is_ok()
    }

    fn run(&mut self, player: u64, req: CommandRequest) -> Option<CommandResponse> {
        match self.store.execute(player, &req, &self.config, self.now) {
            Ok(resp) => Some(resp),
            Err(e) => {
                log::error!("{} failed for player {player}: {e}", req.command_type);
                None
            }
        }
    }

    fn run_ok(&mut self, player: u64, req: CommandRequest) -> Option<CommandResponse> {
        self.run(player, req).filter(|r| r.ok)
    }
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Sovereign Conquest Harness ===\n");

    let universe = match Universe::from_json(UNIVERSE_JSON) {
        Ok(u) => u,
        Err(e) => {
            println!("  ✗ universe_parse: {e}");
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Universe document
    results.extend(validate_universe(&universe, verbose));

    // 2. Trade loop
    results.extend(validate_trade_loop(&universe));

    // 3. Turn regeneration and rejections
    results.extend(validate_turns(&universe));

    // 4. Planets and corporations
    results.extend(validate_planets_and_corps(&universe));

    // 5. Background tickers
    results.extend(validate_tickers(&universe, verbose));

    // 6. Transaction rollback
    results.extend(validate_rollback(&universe));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Universe ─────────────────────────────────────────────────────────

fn validate_universe(universe: &Universe, verbose: bool) -> Vec<TestResult> {
    println!("--- Universe ---");
    let mut results = Vec::new();

    results.push(TestResult::check(
        "universe_not_empty",
        universe.sectors.len() >= 5 && !universe.ports.is_empty(),
        format!(
            "{} sectors, {} warp links, {} ports",
            universe.sectors.len(),
            universe.warps.len(),
            universe.ports.len()
        ),
    ));

    let ids: Vec<u32> = universe.sectors.iter().map(|s| s.id).collect();
    let edges = universe.edges();
    let graph = WarpGraph::from_discovered(&ids, &edges);
    let start = ids.iter().copied().min().unwrap_or(0);
    let reach = graph.distances_from(start);
    let unreachable: Vec<u32> = ids.iter().copied().filter(|id| !reach.contains_key(id)).collect();
    results.push(TestResult::check(
        "universe_connected",
        unreachable.is_empty(),
        if unreachable.is_empty() {
            format!("every sector reachable from {start}")
        } else {
            format!("unreachable from {start}: {unreachable:?}")
        },
    ));

    let protectorates = universe.sectors.iter().filter(|s| s.is_protectorate).count();
    results.push(TestResult::check(
        "universe_has_protectorate",
        protectorates > 0,
        format!("{protectorates} protectorate sectors"),
    ));

    if verbose {
        let mut hops: Vec<(u32, u32)> = reach.into_iter().collect();
        hops.sort_unstable();
        println!("  Hops from sector {start}:");
        for (sector, d) in hops {
            println!("    {sector:>3}: {d}");
        }
    }

    results
}

// ── 2. Trade loop ───────────────────────────────────────────────────────

fn validate_trade_loop(universe: &Universe) -> Vec<TestResult> {
    println!("--- Trade Loop ---");
    let mut results = Vec::new();
    let mut s = Session::new(universe);
    let joined = s.join(1, "trader");
    results.push(TestResult::check("trade_join", joined, "player created in sector 1"));

    let moved = s.run_ok(1, CommandRequest::new("MOVE").with_to(2));
    results.push(TestResult::check(
        "trade_move_to_port",
        moved.as_ref().is_some_and(|r| r.state.sector_id == 2 && r.sector.port.is_some()),
        "moved into Vega, port visible",
    ));

    let bought = s.run_ok(
        1,
        CommandRequest::new("TRADE")
            .with_action("BUY")
            .with_commodity("ORE")
            .with_quantity(20),
    );
    let after_buy = bought.as_ref().map(|r| r.state.credits).unwrap_or_default();
    results.push(TestResult::check(
        "trade_buy",
        bought
            .as_ref()
            .is_some_and(|r| r.state.cargo_ore == 20 && r.state.credits < 1_000),
        format!("credits after buy: {after_buy}"),
    ));

    s.run_ok(1, CommandRequest::new("MOVE").with_to(3));
    let sold = s.run_ok(
        1,
        CommandRequest::new("TRADE")
            .with_action("SELL")
            .with_commodity("ORE")
            .with_quantity(20),
    );
    results.push(TestResult::check(
        "trade_sell",
        sold.as_ref()
            .is_some_and(|r| r.state.cargo_ore == 0 && r.state.credits > after_buy),
        format!(
            "credits after sell: {}",
            sold.as_ref().map(|r| r.state.credits).unwrap_or_default()
        ),
    ));

    let turns = sold.as_ref().map(|r| r.state.turns).unwrap_or_default();
    results.push(TestResult::check(
        "trade_turns_charged",
        turns == 96,
        format!("{turns} turns left after 4 one-turn commands"),
    ));

    let wire = sold
        .as_ref()
        .and_then(|r| serde_json::to_value(r).ok())
        .is_some_and(|v| v["ok"] == true && v["state"]["sector_id"] == 3);
    results.push(TestResult::check(
        "trade_response_json",
        wire,
        "response serializes with ok/state/sector",
    ));

    results
}

// ── 3. Turns ────────────────────────────────────────────────────────────

fn validate_turns(universe: &Universe) -> Vec<TestResult> {
    println!("--- Turns ---");
    let mut results = Vec::new();
    let mut s = Session::new(universe);
    s.join(1, "pilot");

    if let Some(p) = s.store.player_row_mut(1) {
        p.turns = 0;
        p.last_turn_regen = Some(START);
    }
    let starved = s.run(1, CommandRequest::new("SCAN"));
    results.push(TestResult::check(
        "turns_exhausted_rejected",
        starved
            .as_ref()
            .is_some_and(|r| r.error.as_deref() == Some("NOT_ENOUGH_TURNS")),
        "SCAN with zero turns",
    ));

    s.now += 10 * s.config.regen_seconds();
    let scanned = s.run_ok(1, CommandRequest::new("SCAN"));
    let turns = scanned.as_ref().map(|r| r.state.turns).unwrap_or_default();
    results.push(TestResult::check(
        "turns_regenerate",
        turns == 9,
        format!("{turns} turns after 10 regen periods and one SCAN"),
    ));

    let bad_move = s.run(1, CommandRequest::new("MOVE").with_to(7));
    results.push(TestResult::check(
        "move_without_warp_rejected",
        bad_move.as_ref().is_some_and(|r| {
            r.error.as_deref() == Some("INVALID_MOVE")
                && r.state.sector_id == 1
                && r.state.turns == 9
        }),
        "no warp 1 -> 7; turns unchanged",
    ));

    let unknown = s.run(1, CommandRequest::new("WARPDRIVE"));
    results.push(TestResult::check(
        "unknown_command_rejected",
        unknown
            .as_ref()
            .is_some_and(|r| r.error.as_deref() == Some("UNKNOWN_COMMAND")),
        "WARPDRIVE",
    ));

    results
}

// ── 4. Planets and corporations ─────────────────────────────────────────

fn validate_planets_and_corps(universe: &Universe) -> Vec<TestResult> {
    println!("--- Planets & Corps ---");
    let mut results = Vec::new();
    let mut s = Session::new(universe);
    s.join(1, "founder");
    s.join(2, "recruit");
    if let Some(p) = s.store.player_row_mut(1) {
        p.credits = 50_000;
    }

    let created = s.run_ok(
        1,
        CommandRequest::new("CORP")
            .with_action("CREATE")
            .with_name("Frontier Guild"),
    );
    results.push(TestResult::check(
        "corp_create",
        created
            .as_ref()
            .is_some_and(|r| r.state.corp_role.as_deref() == Some("LEADER")),
        "founder leads Frontier Guild",
    ));

    let joined = s.run_ok(
        2,
        CommandRequest::new("CORP")
            .with_action("JOIN")
            .with_name("frontier guild"),
    );
    results.push(TestResult::check(
        "corp_join_case_insensitive",
        joined
            .as_ref()
            .is_some_and(|r| r.state.corp_name.as_deref() == Some("Frontier Guild")),
        "recruit joined by lower-case name",
    ));

    s.run_ok(1, CommandRequest::new("MOVE").with_to(2));
    s.run_ok(1, CommandRequest::new("MOVE").with_to(4));
    let colonized = s.run_ok(
        1,
        CommandRequest::new("PLANET")
            .with_action("COLONIZE")
            .with_name("Haven"),
    );
    results.push(TestResult::check(
        "planet_colonize",
        colonized.is_some() && s.store.planets().count() == 1,
        "Haven established in Altair",
    ));

    let corp_owned = s.store.planets().all(|p| p.owner.corp().is_some());
    results.push(TestResult::check(
        "planet_owned_by_corp",
        corp_owned,
        "colonizing while in a corp attributes the planet to the corp",
    ));

    let produced = s.store.run_planet_tick();
    let stored: u32 = s.store.planets().map(|p| p.storage.total()).sum();
    results.push(TestResult::check(
        "planet_production",
        produced == 1 && stored > 0,
        format!("{produced} planet produced, {stored} units stored"),
    ));

    // The recruit reaches Haven and may use it through the corp.
    s.run_ok(2, CommandRequest::new("MOVE").with_to(2));
    s.run_ok(2, CommandRequest::new("MOVE").with_to(4));
    let loaded = s.run_ok(
        2,
        CommandRequest::new("PLANET")
            .with_action("LOAD")
            .with_commodity("ORE")
            .with_quantity(5),
    );
    results.push(TestResult::check(
        "planet_corp_access",
        loaded.as_ref().is_some_and(|r| r.state.cargo_ore == 5),
        "corp member loaded 5 ore from Haven",
    ));

    results
}

// ── 5. Tickers ──────────────────────────────────────────────────────────

fn validate_tickers(universe: &Universe, verbose: bool) -> Vec<TestResult> {
    println!("--- Tickers ---");
    let mut results = Vec::new();
    let mut s = Session::new(universe);
    let mut rng = StdRng::seed_from_u64(7);

    // Drain Vega's ore, then let the port recover.
    if let Some(port) = s.store.port_row_mut(2) {
        port.ore.qty = 0;
    }
    let mut rounds = 0;
    while rounds < 100 {
        s.store.run_port_tick();
        rounds += 1;
        let full = s
            .store
            .port(2)
            .ok()
            .flatten()
            .is_some_and(|p| p.ore.qty == p.ore.base_qty);
        if full {
            break;
        }
    }
    let vega = s.store.port(2).ok().flatten();
    results.push(TestResult::check(
        "port_regen_caps_at_base",
        vega.as_ref().is_some_and(|p| p.ore.qty == p.ore.base_qty) && rounds == 40,
        format!("ore restocked in {rounds} ticks"),
    ));

    let mut in_range = true;
    for _ in 0..50 {
        s.store.run_protectorate_tick(&mut rng);
        for id in [1u32, 6] {
            let fighters = s
                .store
                .sector(id)
                .ok()
                .flatten()
                .map(|sec| sec.protectorate_fighters)
                .unwrap_or_default();
            if !(PROTECTORATE_MIN_FIGHTERS..=PROTECTORATE_MAX_FIGHTERS).contains(&fighters) {
                in_range = false;
            }
        }
    }
    results.push(TestResult::check(
        "protectorate_fighters_in_range",
        in_range,
        format!("50 re-rolls within {PROTECTORATE_MIN_FIGHTERS}..={PROTECTORATE_MAX_FIGHTERS}"),
    ));

    let port_sectors: Vec<u32> = universe.ports.iter().map(|p| p.sector_id).collect();
    let mut max_active = 0;
    let mut spawned = 0;
    let mut misplaced = 0;
    for _ in 0..500 {
        s.now += 60;
        let tick = s.store.run_event_tick(&mut rng, s.now);
        if let Some(event) = tick.spawned {
            spawned += 1;
            if event.kind.affects_prices() && !port_sectors.contains(&event.sector_id) {
                misplaced += 1;
            }
        }
        let active = s.store.active_events(s.now).map(|e| e.len()).unwrap_or(0);
        max_active = max_active.max(active);
    }
    results.push(TestResult::check(
        "events_bounded",
        spawned > 0 && max_active <= MAX_ACTIVE_EVENTS,
        format!("{spawned} spawned, at most {max_active} active at once"),
    ));
    results.push(TestResult::check(
        "price_events_need_ports",
        misplaced == 0,
        format!("{misplaced} price events outside port sectors"),
    ));

    if verbose {
        println!("  Events live at the end of the run:");
        for e in s.store.active_events(s.now).unwrap_or_default() {
            println!(
                "    [{}] sector {} {} | {}",
                e.kind.as_str(),
                e.sector_id,
                e.title,
                e.effect_summary()
            );
        }
    }

    results
}

// ── 6. Rollback ─────────────────────────────────────────────────────────

fn validate_rollback(universe: &Universe) -> Vec<TestResult> {
    println!("--- Rollback ---");
    let mut results = Vec::new();
    let mut s = Session::new(universe);
    s.join(1, "unlucky");

    s.store.fail_after_writes(1);
    let failed = s
        .store
        .execute(
            1,
            &CommandRequest::new("MOVE").with_to(2),
            &s.config,
            s.now,
        )
        .is_err();
    let row = s.store.player_row(1);
    results.push(TestResult::check(
        "failed_command_rolls_back",
        failed && row.is_some_and(|p| p.sector_id == 1 && p.turns == 100),
        "injected store failure leaves the player untouched",
    ));
    results.push(TestResult::check(
        "failed_command_no_discovery",
        !s.store.is_discovered(1, 2),
        "discovery write discarded",
    ));

    let retried = s.run_ok(1, CommandRequest::new("MOVE").with_to(2));
    results.push(TestResult::check(
        "retry_after_failure",
        retried.is_some(),
        "same command succeeds once the store recovers",
    ));

    results
}
