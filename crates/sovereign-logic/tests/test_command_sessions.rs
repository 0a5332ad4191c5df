//! Integration tests for full command sessions.
//!
//! Each test seeds a small galaxy in a `MemoryStore` and drives it through
//! `MemoryStore::execute`, the same path the server reducer takes.
//!
//! All tests are pure logic, no SpacetimeDB.

use sovereign_logic::command::CommandRequest;
use sovereign_logic::commodity::{Commodity, Holds};
use sovereign_logic::config::{GameConfig, MAX_RECENT_LOGS};
use sovereign_logic::engine::EngineError;
use sovereign_logic::events::{ActiveEvent, EventKind};
use sovereign_logic::memory::MemoryStore;
use sovereign_logic::model::{CorpRole, LogKind, Minefield, Owner, Port, PortStock, TradeMode};
use sovereign_logic::store::{GameStore, StoreError};
use sovereign_logic::view::CommandResponse;

// ── Helpers ────────────────────────────────────────────────────────────

const ALICE: u64 = 1;
const BOB: u64 = 2;
const CAROL: u64 = 3;

fn stock(mode: TradeMode, qty: u32, base_price: u32) -> PortStock {
    PortStock {
        mode,
        qty,
        base_qty: 1_000,
        base_price,
        regen: 25,
    }
}

/// Sol (protectorate, 1) <-> Vega (port, 2) <-> Rigel (3).
fn galaxy() -> (MemoryStore, GameConfig) {
    let config = GameConfig::default();
    let mut store = MemoryStore::new();
    store.add_sector(1, "Sol");
    store.add_sector(2, "Vega");
    store.add_sector(3, "Rigel");
    store.set_protectorate(1, 80);
    store.link(1, 2);
    store.link(2, 3);
    store.add_port(Port {
        sector_id: 2,
        ore: stock(TradeMode::Sell, 1_000, 10),
        organics: stock(TradeMode::Buy, 500, 16),
        equipment: stock(TradeMode::Sell, 1_000, 30),
    });
    store.join_player(ALICE, "alice", &config, 0).unwrap();
    (store, config)
}

fn run(
    store: &mut MemoryStore,
    config: &GameConfig,
    player: u64,
    req: CommandRequest,
) -> CommandResponse {
    store.execute(player, &req, config, 0).unwrap()
}

fn move_to(store: &mut MemoryStore, config: &GameConfig, player: u64, to: i64) -> CommandResponse {
    run(store, config, player, CommandRequest::new("MOVE").with_to(to))
}

fn rich(store: &mut MemoryStore, player: u64, credits: i64) {
    store.player_row_mut(player).unwrap().credits = credits;
}

fn trade(side: &str, commodity: &str, qty: i64) -> CommandRequest {
    CommandRequest::new("TRADE")
        .with_action(side)
        .with_commodity(commodity)
        .with_quantity(qty)
}

/// Alice in Vega with a fresh planet named Terra.
fn colonized(credits: i64) -> (MemoryStore, GameConfig) {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, credits);
    move_to(&mut store, &config, ALICE, 2);
    let founded = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET").with_action("COLONIZE").with_name("Terra"),
    );
    assert!(founded.ok, "{}", founded.message);
    (store, config)
}

// ── Navigation and trade ───────────────────────────────────────────────

#[test]
fn move_then_buy() {
    let (mut store, config) = galaxy();
    let moved = move_to(&mut store, &config, ALICE, 2);
    assert!(moved.ok, "{}", moved.message);
    assert!(moved.message.starts_with("Moved to sector 2."));
    assert_eq!(moved.state.sector_id, 2);
    assert_eq!(moved.state.turns, 99);
    assert_eq!(moved.sector.warps, vec![1, 3]);
    assert!(store.is_discovered(ALICE, 2));

    let bought = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("trade")
            .with_action("buy")
            .with_commodity("ore")
            .with_quantity(10),
    );
    assert!(bought.ok, "{}", bought.message);
    assert!(bought
        .message
        .starts_with("You bought 10 ore at 10 credits each (100 total)."));
    assert_eq!(bought.state.credits, 900);
    assert_eq!(bought.state.cargo_ore, 10);
    assert_eq!(bought.sector.port.map(|p| p.ore.qty), Some(990));
}

#[test]
fn trade_rejections_keep_state() {
    let (mut store, config) = galaxy();
    move_to(&mut store, &config, ALICE, 2);

    let refused = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("TRADE")
            .with_action("BUY")
            .with_commodity("ORGANICS")
            .with_quantity(1),
    );
    assert!(!refused.ok);
    assert_eq!(refused.error.as_deref(), Some("TRADE_ERROR"));
    assert_eq!(refused.message, "This port is not selling ORGANICS.");
    assert_eq!(refused.state.turns, 99);

    let too_much = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("TRADE")
            .with_action("BUY")
            .with_commodity("ORE")
            .with_quantity(31),
    );
    assert_eq!(too_much.message, "Not enough cargo space.");
}

#[test]
fn quantity_outside_range_names_the_limits() {
    let (mut store, config) = galaxy();
    move_to(&mut store, &config, ALICE, 2);
    for qty in [0, 1_000_001] {
        let resp = run(&mut store, &config, ALICE, trade("BUY", "ORE", qty));
        assert_eq!(resp.error.as_deref(), Some("TRADE_ERROR"));
        assert_eq!(resp.message, "Quantity must be between 1 and 1000000.");
    }
}

#[test]
fn selling_into_saturated_demand() {
    let (mut store, config) = galaxy();
    move_to(&mut store, &config, ALICE, 2);
    store.port_row_mut(2).unwrap().organics.qty = 995;
    store.player_row_mut(ALICE).unwrap().cargo = Holds::new(0, 10, 0);

    let refused = run(&mut store, &config, ALICE, trade("SELL", "ORGANICS", 6));
    assert_eq!(refused.error.as_deref(), Some("TRADE_ERROR"));
    assert_eq!(refused.message, "Port demand is saturated right now.");
    assert_eq!(refused.state.cargo_organics, 10);

    let sold = run(&mut store, &config, ALICE, trade("SELL", "ORGANICS", 5));
    assert!(sold.ok, "{}", sold.message);
    assert!(sold
        .message
        .starts_with("You sold 5 organics at 16 credits each (80 total)."));
    assert_eq!(sold.state.credits, 1_080);
    assert_eq!(sold.sector.port.map(|p| p.organics.qty), Some(1_000));
}

#[test]
fn anomaly_discounts_only_its_commodity() {
    let (mut store, config) = galaxy();
    store.add_event(ActiveEvent {
        id: 0,
        kind: EventKind::Anomaly,
        sector_id: 2,
        scope: Some(Commodity::Ore),
        price_percent: 80,
        severity: 1,
        title: "Ore Glut".into(),
        description: String::new(),
        started_at: 0,
        ends_at: 3_600,
    });
    move_to(&mut store, &config, ALICE, 2);

    let ore = run(&mut store, &config, ALICE, trade("BUY", "ORE", 1));
    assert!(ore.ok, "{}", ore.message);
    assert!(ore
        .message
        .starts_with("You bought 1 ore at 8 credits each (8 total)."));
    assert_eq!(ore.state.credits, 992);

    let equipment = run(&mut store, &config, ALICE, trade("BUY", "EQUIPMENT", 1));
    assert!(equipment
        .message
        .starts_with("You bought 1 equipment at 30 credits each (30 total)."));
}

#[test]
fn move_without_warp_is_rejected() {
    let (mut store, config) = galaxy();
    let resp = move_to(&mut store, &config, ALICE, 3);
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some("INVALID_MOVE"));
    assert_eq!(resp.message, "No warp to that sector.");
    assert_eq!(resp.state.sector_id, 1);
    assert_eq!(resp.state.turns, 100);

    let bad = move_to(&mut store, &config, ALICE, 0);
    assert_eq!(bad.message, "Invalid destination sector.");
}

#[test]
fn admin_jumps_anywhere_for_free() {
    let (mut store, config) = galaxy();
    store.player_row_mut(ALICE).unwrap().is_admin = true;
    let resp = move_to(&mut store, &config, ALICE, 3);
    assert!(resp.ok, "{}", resp.message);
    assert_eq!(resp.state.sector_id, 3);
    assert_eq!(resp.state.turns, 100);

    let missing = move_to(&mut store, &config, ALICE, 99);
    assert_eq!(missing.message, "Invalid destination sector.");
}

#[test]
fn invasion_and_mines_on_entry() {
    let (mut store, config) = galaxy();
    store.add_event(ActiveEvent {
        id: 0,
        kind: EventKind::Invasion,
        sector_id: 2,
        scope: None,
        price_percent: 100,
        severity: 2,
        title: "Raider Fleet".into(),
        description: String::new(),
        started_at: 0,
        ends_at: 10_000,
    });
    store.add_minefield(Minefield {
        id: 0,
        sector_id: 2,
        owner: Owner::Player(99),
        qty: 3,
        created_at: 0,
    });

    let resp = move_to(&mut store, &config, ALICE, 2);
    assert!(resp.ok, "{}", resp.message);
    assert!(resp.message.contains("Raiders seize 400 credits."));
    assert!(resp
        .message
        .contains("Mine strike! 3 mines detonated. Repairs cost 150 credits."));
    assert_eq!(resp.state.credits, 450);
    assert_eq!(resp.sector.mines, 0);
    assert_eq!(store.minefields().count(), 0);

    let combat = resp
        .logs
        .iter()
        .filter(|l| l.kind == LogKind::Combat)
        .count();
    assert_eq!(combat, 2);
}

// ── Turns and gates ────────────────────────────────────────────────────

#[test]
fn regen_survives_a_rejection() {
    let (mut store, config) = galaxy();
    store.player_row_mut(ALICE).unwrap().turns = 0;

    let early = store
        .execute(ALICE, &CommandRequest::new("SCAN"), &config, 60)
        .unwrap();
    assert_eq!(early.error.as_deref(), Some("NOT_ENOUGH_TURNS"));
    assert_eq!(early.state.turns, 0);

    // Two full regen intervals give two turns, still short of COLONIZE.
    let later = store
        .execute(
            ALICE,
            &CommandRequest::new("PLANET").with_action("COLONIZE"),
            &config,
            2 * config.regen_seconds(),
        )
        .unwrap();
    assert_eq!(later.error.as_deref(), Some("NOT_ENOUGH_TURNS"));
    assert_eq!(later.state.turns, 2);
    assert_eq!(store.player_row(ALICE).map(|p| p.turns), Some(2));
}

#[test]
fn password_change_blocks_play() {
    let (mut store, config) = galaxy();
    store.player_row_mut(ALICE).unwrap().must_change_password = true;
    let resp = run(&mut store, &config, ALICE, CommandRequest::new("HELP"));
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some("PASSWORD_CHANGE_REQUIRED"));
}

#[test]
fn unknown_command() {
    let (mut store, config) = galaxy();
    let resp = run(&mut store, &config, ALICE, CommandRequest::new("WARP_DRIVE"));
    assert_eq!(resp.error.as_deref(), Some("UNKNOWN_COMMAND"));
    assert_eq!(resp.message, "Unknown command.");
}

#[test]
fn store_failure_rolls_back_everything() {
    let (mut store, config) = galaxy();
    store.fail_after_writes(1);
    let result = store.execute(ALICE, &CommandRequest::new("MOVE").with_to(2), &config, 0);
    assert!(matches!(
        result,
        Err(EngineError::Store(StoreError::Unavailable(_)))
    ));
    assert_eq!(store.player_row(ALICE).map(|p| p.sector_id), Some(1));
    assert!(!store.is_discovered(ALICE, 2));
    assert!(store.logs_for(ALICE).is_empty());

    let retry = move_to(&mut store, &config, ALICE, 2);
    assert!(retry.ok);
}

// ── Planets ────────────────────────────────────────────────────────────

#[test]
fn colonize_and_move_goods() {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, 10_000);
    move_to(&mut store, &config, ALICE, 2);
    store.player_row_mut(ALICE).unwrap().cargo = Holds::new(10, 0, 0);

    let founded = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET")
            .with_action("COLONIZE")
            .with_name("  New   Eden "),
    );
    assert!(founded.ok, "{}", founded.message);
    assert!(founded
        .message
        .starts_with("Established new planet 'New Eden' for 1500 credits."));
    assert_eq!(founded.state.credits, 8_500);
    assert_eq!(founded.state.turns, 94);
    let planet = founded.sector.planet.expect("planet view");
    assert_eq!(planet.owner_type.as_deref(), Some("PLAYER"));
    assert_eq!(planet.owner.as_deref(), Some("alice"));

    let unloaded = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET")
            .with_action("UNLOAD")
            .with_commodity("ORE")
            .with_quantity(10),
    );
    assert!(unloaded.message.starts_with("Unloaded 10 ore to New Eden."));
    assert_eq!(unloaded.state.cargo_ore, 0);

    assert_eq!(store.run_planet_tick(), 1);

    let loaded = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET")
            .with_action("LOAD")
            .with_commodity("ORE")
            .with_quantity(15),
    );
    assert!(loaded.message.starts_with("Loaded 15 ore from New Eden."));
    assert_eq!(loaded.sector.planet.map(|p| p.storage.ore), Some(5));
}

#[test]
fn strangers_cannot_touch_a_planet() {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, 10_000);
    move_to(&mut store, &config, ALICE, 2);
    run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET").with_action("COLONIZE").with_name("Hold"),
    );

    store.join_player(BOB, "bob", &config, 0).unwrap();
    rich(&mut store, BOB, 10_000);
    move_to(&mut store, &config, BOB, 2);
    let claim = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("PLANET").with_action("COLONIZE").with_name("Mine"),
    );
    assert_eq!(claim.error.as_deref(), Some("ALREADY_OWNED"));
    assert_eq!(claim.message, "This planet is already controlled.");

    let citadel = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("PLANET").with_action("UPGRADE_CITADEL"),
    );
    assert_eq!(citadel.error.as_deref(), Some("NO_ACCESS"));
}

#[test]
fn unloading_into_full_storage() {
    let (mut store, config) = colonized(10_000);
    let mut planet = store.planet_in_sector(2).unwrap().unwrap();
    planet.storage.ore = planet.storage_max - 5;
    store.save_planet(&planet).unwrap();
    store.player_row_mut(ALICE).unwrap().cargo = Holds::new(10, 0, 0);

    let unload = |qty| {
        CommandRequest::new("PLANET")
            .with_action("UNLOAD")
            .with_commodity("ORE")
            .with_quantity(qty)
    };
    let full = run(&mut store, &config, ALICE, unload(6));
    assert_eq!(full.error.as_deref(), Some("STORAGE_FULL"));
    assert_eq!(full.message, "Planet ore storage is full.");
    assert_eq!(full.state.cargo_ore, 10);

    let fits = run(&mut store, &config, ALICE, unload(5));
    assert!(fits.ok, "{}", fits.message);
    assert_eq!(fits.sector.planet.map(|p| p.storage.ore), Some(2_000));

    let zero = run(&mut store, &config, ALICE, unload(0));
    assert_eq!(zero.error.as_deref(), Some("INVALID_QTY"));
    assert_eq!(zero.message, "Quantity must be between 1 and 1000000.");
}

#[test]
fn citadel_climbs_to_max_level() {
    let (mut store, config) = colonized(1_000_000);
    let upgrade = || CommandRequest::new("PLANET").with_action("UPGRADE_CITADEL");

    for level in 1..=10 {
        let resp = run(&mut store, &config, ALICE, upgrade());
        assert!(resp.ok, "{}", resp.message);
        let expected = format!(
            "Citadel upgraded to level {level} for {} credits.",
            5_000 * level
        );
        assert!(resp.message.starts_with(&expected), "{}", resp.message);
    }

    let capped = run(&mut store, &config, ALICE, upgrade());
    assert_eq!(capped.error.as_deref(), Some("MAX_LEVEL"));
    assert_eq!(capped.message, "Citadel is already at max level.");
    assert_eq!(capped.state.credits, 1_000_000 - 1_500 - 5_000 * 55);
    assert_eq!(capped.sector.planet.map(|p| p.citadel_level), Some(10));
}

#[test]
fn owner_cannot_colonize_twice() {
    let (mut store, config) = colonized(10_000);
    let again = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("PLANET").with_action("COLONIZE").with_name("Terra"),
    );
    assert_eq!(again.error.as_deref(), Some("ALREADY_OWNED"));
    assert_eq!(again.message, "You already control this planet.");
    assert_eq!(again.state.credits, 8_500);
}

// ── Corporations ───────────────────────────────────────────────────────

#[test]
fn corp_lifecycle_and_succession() {
    let (mut store, config) = galaxy();
    store.join_player(BOB, "bob", &config, 0).unwrap();

    let created = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("CORP").with_action("CREATE").with_name("Iron Hand"),
    );
    assert!(created.message.starts_with("Created corporation 'Iron Hand'."));
    assert_eq!(created.state.corp_role.as_deref(), Some("LEADER"));

    let joined = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("CORP").with_action("JOIN").with_name("iron hand"),
    );
    assert!(joined.message.starts_with("Joined corporation 'Iron Hand'."));

    let deposit = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("CORP").with_action("DEPOSIT").with_quantity(100),
    );
    assert_eq!(deposit.state.corp_credits, Some(100));
    assert_eq!(deposit.state.credits, 900);

    let forbidden = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("CORP").with_action("WITHDRAW").with_quantity(50),
    );
    assert_eq!(forbidden.error.as_deref(), Some("FORBIDDEN"));

    let left = run(&mut store, &config, ALICE, CommandRequest::new("CORP").with_action("LEAVE"));
    assert!(left.ok);
    assert_eq!(left.state.corp_id, None);

    let withdraw = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("CORP").with_action("WITHDRAW").with_quantity(50),
    );
    assert!(withdraw.ok, "{}", withdraw.message);
    assert_eq!(withdraw.state.corp_role.as_deref(), Some("LEADER"));
    assert_eq!(withdraw.state.corp_credits, Some(50));

    let said = run(
        &mut store,
        &config,
        BOB,
        CommandRequest::new("CORP").with_action("SAY").with_text("hold the line"),
    );
    assert!(said.message.starts_with("Corp message sent."));
    assert_eq!(store.corp_messages().len(), 1);
    assert!(store
        .logs_for(BOB)
        .iter()
        .any(|l| l.kind == LogKind::Corp && l.message == "[Iron Hand] bob: hold the line"));
    assert!(!store.logs_for(ALICE).iter().any(|l| l.kind == LogKind::Corp));

    run(&mut store, &config, BOB, CommandRequest::new("CORP").with_action("LEAVE"));
    assert_eq!(store.corps().count(), 0);
}

#[test]
fn earliest_remaining_member_inherits_leadership() {
    let (mut store, config) = galaxy();
    store.join_player(BOB, "bob", &config, 0).unwrap();
    store.join_player(CAROL, "carol", &config, 0).unwrap();
    run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("CORP").with_action("CREATE").with_name("Iron Hand"),
    );

    // Bob's request lands first but carries the later join time.
    let join = CommandRequest::new("CORP").with_action("JOIN").with_name("Iron Hand");
    assert!(store.execute(BOB, &join, &config, 30).unwrap().ok);
    assert!(store.execute(CAROL, &join, &config, 20).unwrap().ok);

    let leave = CommandRequest::new("CORP").with_action("LEAVE");
    assert!(store.execute(ALICE, &leave, &config, 40).unwrap().ok);

    let corp = store.corps().next().map(|c| c.id).unwrap();
    let roles: Vec<(u64, CorpRole)> = store
        .corp_members(corp)
        .unwrap()
        .iter()
        .map(|m| (m.player_id, m.role))
        .collect();
    assert_eq!(roles, vec![(CAROL, CorpRole::Leader), (BOB, CorpRole::Member)]);
}

#[test]
fn corp_chatter_is_capped_per_player() {
    let (mut store, config) = galaxy();
    run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("CORP").with_action("CREATE").with_name("Iron Hand"),
    );
    for i in 0..MAX_RECENT_LOGS + 5 {
        let text = format!("ping {i}");
        run(
            &mut store,
            &config,
            ALICE,
            CommandRequest::new("CORP").with_action("SAY").with_text(&text),
        );
    }

    let logs = store.logs_for(ALICE);
    assert_eq!(logs.len(), MAX_RECENT_LOGS);
    assert!(!logs.iter().any(|l| l.message == "[Iron Hand] alice: ping 0"));
    assert_eq!(
        logs.last().map(|l| l.message.clone()),
        Some(format!("[Iron Hand] alice: ping {}", MAX_RECENT_LOGS + 4))
    );
}

// ── Mines ──────────────────────────────────────────────────────────────

#[test]
fn deploy_strike_and_sweep() {
    let (mut store, config) = galaxy();
    store.join_player(BOB, "bob", &config, 0).unwrap();

    let peace = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("MINE").with_action("DEPLOY").with_quantity(1),
    );
    assert_eq!(peace.error.as_deref(), Some("PROTECTORATE_PEACE"));

    move_to(&mut store, &config, ALICE, 2);
    store.player_row_mut(ALICE).unwrap().cargo = Holds::new(0, 0, 20);
    let deployed = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("MINE").with_action("DEPLOY").with_quantity(15),
    );
    assert!(deployed.ok, "{}", deployed.message);
    assert_eq!(deployed.sector.mines, 15);
    assert_eq!(deployed.state.cargo_equipment, 5);

    let entered = move_to(&mut store, &config, BOB, 2);
    assert!(entered.message.contains("Mine strike! 5 mines detonated."));
    assert_eq!(entered.state.credits, 750);
    assert_eq!(entered.sector.mines, 10);

    let swept = run(&mut store, &config, BOB, CommandRequest::new("MINE").with_action("SWEEP"));
    assert!(swept.message.starts_with("Swept 10 hostile mines in sector 2."));
    assert_eq!(swept.sector.mines, 0);

    let nothing = run(&mut store, &config, ALICE, CommandRequest::new("MINE").with_action("SWEEP"));
    assert!(nothing.message.starts_with("No hostile mines detected."));
}

// ── Shipyard ───────────────────────────────────────────────────────────

#[test]
fn buy_upgrade_and_sell_a_ship() {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, 30_000);

    let bought = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("SHIPYARD").with_action("BUY").with_name("trader"),
    );
    assert!(bought
        .message
        .starts_with("Purchased TRADER for 25000 credits. CargoMax=60, TurnsMax=110."));
    assert_eq!(bought.state.ship_type, "TRADER");

    let upgraded = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("SHIPYARD").with_action("UPGRADE").with_name("cargo"),
    );
    assert!(upgraded
        .message
        .starts_with("Cargo upgraded (+5). New CargoMax=65. Cost=2000."));
    assert_eq!(upgraded.state.credits, 3_000);

    let sold = run(&mut store, &config, ALICE, CommandRequest::new("SHIPYARD").with_action("SELL"));
    assert!(sold
        .message
        .starts_with("Sold TRADER for 17500 credits. You are now flying a SCOUT."));
    assert_eq!(sold.state.credits, 20_500);
    assert_eq!(sold.state.cargo_max, 30);
    assert_eq!(sold.state.cargo_upgrades, 0);
}

#[test]
fn shipyard_only_in_protectorates() {
    let (mut store, config) = galaxy();
    move_to(&mut store, &config, ALICE, 2);
    let resp = run(&mut store, &config, ALICE, CommandRequest::new("SHIPYARD"));
    assert_eq!(resp.error.as_deref(), Some("NO_SHIPYARD"));
}

#[test]
fn cargo_must_fit_the_new_hull() {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, 100_000);
    run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("SHIPYARD").with_action("BUY").with_name("TRADER"),
    );
    store.player_row_mut(ALICE).unwrap().cargo = Holds::new(30, 15, 0);

    let buy = run(
        &mut store,
        &config,
        ALICE,
        CommandRequest::new("SHIPYARD").with_action("BUY").with_name("INTERCEPTOR"),
    );
    assert_eq!(buy.error.as_deref(), Some("CARGO_TOO_LARGE"));
    assert_eq!(
        buy.message,
        "Your current cargo exceeds the capacity of that ship. Reduce cargo before buying."
    );

    let sell = run(&mut store, &config, ALICE, CommandRequest::new("SHIPYARD").with_action("SELL"));
    assert_eq!(sell.error.as_deref(), Some("CARGO_TOO_LARGE"));
    assert_eq!(sell.message, "Your cargo exceeds SCOUT capacity. Reduce cargo before selling.");
    assert_eq!(sell.state.ship_type, "TRADER");
    assert_eq!(sell.state.credits, 75_000);
}

#[test]
fn upgrades_stop_at_their_caps() {
    let (mut store, config) = galaxy();
    rich(&mut store, ALICE, 1_000_000);
    let upgrade = |target: &str| {
        CommandRequest::new("SHIPYARD")
            .with_action("UPGRADE")
            .with_name(target)
    };

    for _ in 0..10 {
        let resp = run(&mut store, &config, ALICE, upgrade("TURNS"));
        assert!(resp.ok, "{}", resp.message);
    }
    let turns = run(&mut store, &config, ALICE, upgrade("TURNS"));
    assert_eq!(turns.error.as_deref(), Some("MAX_UPGRADES"));
    assert_eq!(turns.message, "Turns upgrades are already at maximum.");
    assert_eq!(turns.state.turns_max, 200);
    assert_eq!(turns.state.credits, 1_000_000 - 1_500 * 55);

    store.player_row_mut(ALICE).unwrap().cargo_upgrades = 20;
    let cargo = run(&mut store, &config, ALICE, upgrade("CARGO"));
    assert_eq!(cargo.error.as_deref(), Some("MAX_UPGRADES"));
    assert_eq!(cargo.message, "Cargo upgrades are already at maximum.");
}

// ── Information ────────────────────────────────────────────────────────

#[test]
fn events_only_list_known_sectors() {
    let (mut store, config) = galaxy();
    store.add_event(ActiveEvent {
        id: 0,
        kind: EventKind::Anomaly,
        sector_id: 3,
        scope: None,
        price_percent: 150,
        severity: 1,
        title: "Price Spike".into(),
        description: "Traders swarm the station.".into(),
        started_at: 0,
        ends_at: 3_600,
    });

    let none = run(&mut store, &config, ALICE, CommandRequest::new("EVENTS"));
    assert!(none.message.starts_with("No known active events right now."));

    store.player_row_mut(ALICE).unwrap().is_admin = true;
    move_to(&mut store, &config, ALICE, 3);
    let listed = run(&mut store, &config, ALICE, CommandRequest::new("EVENTS"));
    let lines: Vec<&str> = listed.message.lines().collect();
    assert_eq!(lines[0], "Active events (known sectors):");
    assert_eq!(
        lines[1],
        "- [ANOMALY] Sector 3 (Rigel): Price Spike (ends in 1h) | prices 150% (ALL)"
    );
    assert_eq!(lines[2], "  Traders swarm the station.");
}

#[test]
fn rankings_and_season() {
    let (mut store, config) = galaxy();
    store.join_player(BOB, "bob", &config, 0).unwrap();
    rich(&mut store, BOB, 5_000);

    let rankings = run(&mut store, &config, ALICE, CommandRequest::new("RANKINGS"));
    let lines: Vec<&str> = rankings.message.lines().collect();
    assert_eq!(lines, vec!["Rankings (Season 1)", "1. bob - 5000", "2. alice - 1000"]);

    let season = run(&mut store, &config, ALICE, CommandRequest::new("SEASON"));
    assert_eq!(
        season.message,
        "Current season: Season 1 (ID 1)\nStarted: 1970-01-01T00:00:00Z"
    );
    assert_eq!(season.logs[0].kind, LogKind::System);
}

#[test]
fn market_after_scan() {
    let (mut store, config) = galaxy();
    move_to(&mut store, &config, ALICE, 2);
    let scan = run(&mut store, &config, ALICE, CommandRequest::new("SCAN"));
    assert!(scan.message.starts_with("Scan complete for sector 2."));
    assert_eq!(store.intel_for_player(ALICE).unwrap().len(), 1);

    let market = run(&mut store, &config, ALICE, CommandRequest::new("MARKET"));
    assert!(market.ok);
    assert!(market.message.starts_with("Market intel: 1 scanned ports."));
}
