//! TRADE BUY/SELL against the port in the player's sector.

use super::{EngineResult, ErrorCode, Outcome};
use crate::command::TradeSide;
use crate::commodity::Commodity;
use crate::model::{LogKind, Player, TradeMode};
use crate::pricing::stock_price;
use crate::rules::MAX_TRANSFER_QTY;
use crate::store::GameStore;

fn refuse(message: impl Into<String>) -> EngineResult<Outcome> {
    Ok(Outcome::reject(ErrorCode::TradeError, message))
}

pub(super) fn trade<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    side: Option<TradeSide>,
    commodity: Option<Commodity>,
    quantity: i64,
    now: i64,
) -> EngineResult<Outcome> {
    let Some(side) = side else {
        return refuse("Trade action must be BUY or SELL.");
    };
    let Some(commodity) = commodity else {
        return refuse("Commodity must be ORE, ORGANICS, or EQUIPMENT.");
    };
    if !(1..=MAX_TRANSFER_QTY).contains(&quantity) {
        return refuse(format!("Quantity must be between 1 and {MAX_TRANSFER_QTY}."));
    }
    let qty = u32::try_from(quantity).unwrap_or(u32::MAX);

    let Some(mut port) = store.load_port_for_update(player.sector_id)? else {
        return refuse("No port in this sector.");
    };
    let event = store.active_event(player.sector_id, now)?;
    let price = stock_price(port.stock(commodity), commodity, event.as_ref());
    let total = price * i64::from(qty);
    let stock = port.stock_mut(commodity);

    match side {
        TradeSide::Buy => {
            if stock.mode != TradeMode::Sell {
                return refuse(format!("This port is not selling {commodity}."));
            }
            if qty > stock.qty {
                return refuse("Port does not have enough inventory.");
            }
            if qty > player.free_cargo() {
                return refuse("Not enough cargo space.");
            }
            if player.credits < total {
                return refuse("Not enough credits.");
            }
            player.credits -= total;
            *player.cargo.get_mut(commodity) += qty;
            stock.qty -= qty;
        }
        TradeSide::Sell => {
            if stock.mode != TradeMode::Buy {
                return refuse(format!("This port is not buying {commodity}."));
            }
            if player.cargo.get(commodity) < qty {
                return refuse(format!(
                    "You do not have that {} {}.",
                    commodity.quantifier(),
                    commodity.noun()
                ));
            }
            if u64::from(stock.qty) + u64::from(qty) > u64::from(stock.base_qty) {
                return refuse("Port demand is saturated right now.");
            }
            player.credits += total;
            *player.cargo.get_mut(commodity) -= qty;
            stock.qty += qty;
        }
    }

    store.save_port(&port)?;
    Ok(Outcome::logged(
        LogKind::Action,
        format!(
            "You {} {qty} {} at {price} credits each ({total} total).",
            side.verb_past(),
            commodity.noun()
        ),
    ))
}
