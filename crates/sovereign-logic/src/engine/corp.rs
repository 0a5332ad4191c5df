//! CORP INFO, CREATE, JOIN, LEAVE, SAY, DEPOSIT and WITHDRAW.

use super::{EngineResult, ErrorCode, Outcome};
use crate::command::CorpCommand;
use crate::config::MAX_RECENT_LOGS;
use crate::model::{CorpMember, CorpMembership, CorpRole, LogKind, Player};
use crate::rules::{sanitize_corp_message, validate_corp_name, CORP_SAY_MAX_LEN};
use crate::store::{GameStore, StoreError};

pub(super) fn run<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    command: &CorpCommand,
    now: i64,
) -> EngineResult<Outcome> {
    match command {
        CorpCommand::Info => info(store, player),
        CorpCommand::Create { name } => create(store, player, name, now),
        CorpCommand::Join { name } => join(store, player, name, now),
        CorpCommand::Leave => leave(store, player),
        CorpCommand::Say { text } => say(store, player, text, now),
        CorpCommand::Deposit { amount } => deposit(store, player, *amount),
        CorpCommand::Withdraw { amount } => withdraw(store, player, *amount),
        CorpCommand::Unknown => Ok(Outcome::reject(
            ErrorCode::UnknownSubcommand,
            "Unknown CORP subcommand.",
        )),
    }
}

fn not_in_corp() -> Outcome {
    Outcome::reject(ErrorCode::NotInCorp, "You are not in a corporation.")
}

fn already_in_corp() -> Outcome {
    Outcome::reject(ErrorCode::AlreadyInCorp, "You are already in a corporation.")
}

fn info<S: GameStore + ?Sized>(store: &mut S, player: &Player) -> EngineResult<Outcome> {
    let Some(membership) = &player.corp else {
        return Ok(Outcome::logged(
            LogKind::System,
            "You are not in a corporation. Use CORP CREATE {name} or CORP JOIN {name}.",
        ));
    };
    let corp = store
        .corp(membership.corp_id)?
        .ok_or_else(|| StoreError::not_found("corporation", membership.corp_id))?;
    let members = store.corp_members(corp.id)?.len();
    let planets = store.count_corp_planets(corp.id)?;
    let text = [
        format!("Corporation: {}", corp.name),
        format!("Role: {}", membership.role.as_str()),
        format!("Members: {members}"),
        format!("Bank credits: {}", corp.bank),
        format!("Planets controlled: {planets}"),
    ]
    .join("\n");
    Ok(Outcome::logged(LogKind::System, text))
}

fn create<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    raw_name: &str,
    now: i64,
) -> EngineResult<Outcome> {
    if player.corp.is_some() {
        return Ok(already_in_corp());
    }
    let name = match validate_corp_name(raw_name) {
        Ok(name) => name,
        Err(e) => return Ok(Outcome::reject(ErrorCode::InvalidName, e.to_string())),
    };
    if store.find_corp_by_name(&name)?.is_some() {
        return Ok(Outcome::reject(
            ErrorCode::NameUnavailable,
            "Corporation name unavailable.",
        ));
    }

    let corp_id = store.insert_corp(&name, now)?;
    store.insert_corp_member(CorpMember {
        corp_id,
        player_id: player.id,
        role: CorpRole::Leader,
        joined_at: now,
    })?;
    player.corp = Some(CorpMembership {
        corp_id,
        name: name.clone(),
        role: CorpRole::Leader,
        bank: 0,
    });
    log::info!("player {} founded corporation {corp_id} ({name})", player.id);
    Ok(Outcome::logged(
        LogKind::Action,
        format!("Created corporation '{name}'."),
    ))
}

fn join<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    name: &str,
    now: i64,
) -> EngineResult<Outcome> {
    if player.corp.is_some() {
        return Ok(already_in_corp());
    }
    let name = name.trim();
    if name.is_empty() {
        return Ok(Outcome::reject(ErrorCode::InvalidArgs, "Usage: CORP JOIN {name}"));
    }
    let Some(corp) = store.find_corp_by_name(name)? else {
        return Ok(Outcome::reject(ErrorCode::NotFound, "Corporation not found."));
    };

    store.insert_corp_member(CorpMember {
        corp_id: corp.id,
        player_id: player.id,
        role: CorpRole::Member,
        joined_at: now,
    })?;
    let message = format!("Joined corporation '{}'.", corp.name);
    player.corp = Some(CorpMembership {
        corp_id: corp.id,
        name: corp.name,
        role: CorpRole::Member,
        bank: corp.bank,
    });
    Ok(Outcome::logged(LogKind::Action, message))
}

fn leave<S: GameStore + ?Sized>(store: &mut S, player: &mut Player) -> EngineResult<Outcome> {
    let Some(membership) = player.corp.clone() else {
        return Ok(not_in_corp());
    };
    let corp_id = membership.corp_id;
    let members = store.corp_members(corp_id)?;

    if membership.role == CorpRole::Leader && members.len() > 1 {
        if let Some(successor) = members.iter().find(|m| m.player_id != player.id) {
            store.set_corp_role(corp_id, successor.player_id, CorpRole::Leader)?;
            log::info!(
                "corporation {corp_id}: leadership passed to player {}",
                successor.player_id
            );
        }
    }
    store.delete_corp_member(corp_id, player.id)?;
    if members.len() <= 1 {
        store.delete_corp(corp_id)?;
        log::info!("corporation {corp_id} dissolved");
    }

    player.corp = None;
    Ok(Outcome::logged(
        LogKind::Action,
        format!("Left corporation '{}'.", membership.name),
    ))
}

fn say<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
    raw_text: &str,
    now: i64,
) -> EngineResult<Outcome> {
    let Some(membership) = &player.corp else {
        return Ok(not_in_corp());
    };
    let text = sanitize_corp_message(raw_text);
    if text.is_empty() {
        return Ok(Outcome::reject(ErrorCode::InvalidArgs, "Message cannot be empty."));
    }
    if text.chars().count() > CORP_SAY_MAX_LEN {
        return Ok(Outcome::reject(
            ErrorCode::InvalidArgs,
            format!("Message too long (max {CORP_SAY_MAX_LEN})."),
        ));
    }

    store.insert_corp_message(membership.corp_id, player.id, &text, now)?;
    let line = format!("[{}] {}: {text}", membership.name, player.username);
    for member in store.corp_members(membership.corp_id)? {
        store.insert_log(member.player_id, LogKind::Corp, &line, now)?;
        store.prune_logs(member.player_id, MAX_RECENT_LOGS)?;
    }
    Ok(Outcome::silent("Corp message sent."))
}

fn deposit<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    amount: i64,
) -> EngineResult<Outcome> {
    let Some(corp_id) = player.corp_id() else {
        return Ok(not_in_corp());
    };
    if amount < 1 {
        return Ok(Outcome::reject(
            ErrorCode::InvalidArgs,
            "Deposit amount must be at least 1.",
        ));
    }
    if player.credits < amount {
        return Ok(Outcome::reject(
            ErrorCode::InsufficientCredits,
            "Not enough credits.",
        ));
    }
    let mut corp = store
        .load_corp_for_update(corp_id)?
        .ok_or_else(|| StoreError::not_found("corporation", corp_id))?;

    corp.bank += amount;
    store.save_corp(&corp)?;
    player.credits -= amount;
    if let Some(m) = player.corp.as_mut() {
        m.bank = corp.bank;
    }
    Ok(Outcome::logged(
        LogKind::Action,
        format!(
            "Deposited {amount} credits to corp bank. New bank balance: {}.",
            corp.bank
        ),
    ))
}

fn withdraw<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    amount: i64,
) -> EngineResult<Outcome> {
    let Some(membership) = &player.corp else {
        return Ok(not_in_corp());
    };
    if !membership.role.can_withdraw() {
        return Ok(Outcome::reject(
            ErrorCode::Forbidden,
            "Only corp leadership can withdraw.",
        ));
    }
    if amount < 1 {
        return Ok(Outcome::reject(
            ErrorCode::InvalidArgs,
            "Withdraw amount must be at least 1.",
        ));
    }
    let corp_id = membership.corp_id;
    let mut corp = store
        .load_corp_for_update(corp_id)?
        .ok_or_else(|| StoreError::not_found("corporation", corp_id))?;
    if corp.bank < amount {
        return Ok(Outcome::reject(
            ErrorCode::InsufficientFunds,
            "Corp bank does not have enough credits.",
        ));
    }

    corp.bank -= amount;
    store.save_corp(&corp)?;
    player.credits += amount;
    if let Some(m) = player.corp.as_mut() {
        m.bank = corp.bank;
    }
    Ok(Outcome::logged(
        LogKind::Action,
        format!(
            "Withdrew {amount} credits from corp bank. New bank balance: {}.",
            corp.bank
        ),
    ))
}
