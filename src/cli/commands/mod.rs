pub mod backup;
pub mod clear;
pub mod config;
pub mod export;
pub mod init;
pub mod listen;
pub mod log;
pub mod react;
pub mod setup;
pub mod status;

use crate::collab::LocalBoard;
use crate::config::Config;
use crate::core::{Coordinator, IgnoreReason, Outcome, Rejection};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::ids::MessageId;
use crate::store::RosterStore;
use crate::ui::messages::{info, success, warning};

/// Coordinator over the persisted roster and the local board.
pub(crate) fn open(cfg: &Config) -> AppResult<Coordinator<LocalBoard>> {
    let model = cfg.model()?;
    let store = RosterStore::restore(cfg.snapshot_path());
    let board = LocalBoard::load(&cfg.board_path())?.with_echo(true);

    Ok(Coordinator::new(
        model,
        cfg.event.clone(),
        cfg.schedule.clone(),
        store,
        board,
    )
    .with_activity_log(cfg.activity_path()))
}

/// Save the board and flush whatever the store still holds.
pub(crate) fn close(coord: Coordinator<LocalBoard>, cfg: &Config) -> AppResult<()> {
    let (mut store, board) = coord.into_parts();
    board.save(&cfg.board_path())?;
    store.flush()
}

pub(crate) fn bound_message(coord: &Coordinator<LocalBoard>) -> AppResult<MessageId> {
    coord.store().snapshot().message_id.ok_or(AppError::NotBound)
}

/// Print one reconciliation outcome for the operator.
pub(crate) fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Accepted {
            category,
            weight,
            total,
        } => success(format!(
            "{category}: accepted ({}), total {total}",
            Category::level_label(*weight)
        )),
        Outcome::Unchanged { category } => info(format!("{category}: already signed up")),
        Outcome::Removed {
            category,
            weight: 0,
            total,
        } => success(format!("{category}: removed, total {total}")),
        Outcome::Removed {
            category,
            weight,
            total,
        } => success(format!(
            "{category}: now {}, total {total}",
            Category::level_label(*weight)
        )),
        Outcome::Rejected(Rejection::CapacityExceeded {
            category,
            requested,
            available,
        }) => warning(format!(
            "{category}: rejected, requested {requested} with {available} left"
        )),
        Outcome::Rejected(Rejection::SlotTaken { category, holder }) => {
            warning(format!("{category}: rejected, slot held by {holder}"))
        }
        Outcome::Decorated { token } => info(format!("{token}: message sent")),
        Outcome::Ignored(reason) => warning(match reason {
            IgnoreReason::NotBound => "Ignored: no signup message is bound",
            IgnoreReason::OtherMessage => "Ignored: reaction is on another message",
            IgnoreReason::UnknownToken => "Ignored: token is not part of the signup",
            IgnoreReason::DecorationRemoved => "Ignored: decoration removed",
        }),
    }
}
