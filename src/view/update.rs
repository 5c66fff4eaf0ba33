//! Pure update function for the Elm-style postings board.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing any side-effects the runtime should execute.
//! Every arm ends with an explicit [`BoardModel::recompute`] when it touches
//! state the derived views depend on.

use super::model::{BoardCmd, BoardModel, BoardMsg};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut BoardModel, msg: BoardMsg) -> BoardCmd {
    match msg {
        BoardMsg::DepartmentChanged(department) => {
            model.selected_department = department;
            model.reset_reveal();
            model.recompute();
            BoardCmd::None
        }

        BoardMsg::SortChanged { field, direction } => {
            model.sort_field = field;
            model.sort_direction = direction;
            model.reset_reveal();
            model.recompute();
            BoardCmd::None
        }

        BoardMsg::ShowMore => {
            model.reveal_count = model.reveal_count.saturating_add(model.page_size);
            model.recompute();
            BoardCmd::None
        }

        BoardMsg::DataLoaded(records) => {
            // Refetch keeps the user's filter, sort, and reveal count.
            model.all_records = records;
            model.last_error = None;
            model.loads += 1;
            model.recompute();
            BoardCmd::None
        }

        BoardMsg::DataLoadFailed(error) => {
            // Last-good records stay in place (empty before the first load).
            model.last_error = Some(error.clone());
            model.load_failures += 1;
            BoardCmd::ReportFetchFailure(error)
        }
    }
}

// ──────────────────── tests ────────────────────
