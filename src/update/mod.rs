//! Update functions for the Elm-style architecture
//!
//! All controller state transformations flow through these functions.

mod outline;

use crate::commands::Cmd;
use crate::messages::OutlineMsg;
use crate::model::OutlineModel;

pub use outline::update_outline;

/// Main update function
///
/// In debug builds, state transitions are traced.
#[inline]
pub fn update(model: &mut OutlineModel, msg: OutlineMsg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        let before = model.state();
        let result = update_outline(model, msg);
        if model.state() != before {
            tracing::trace!("sync state: {:?} → {:?}", before, model.state());
        }
        result
    }
    #[cfg(not(debug_assertions))]
    {
        update_outline(model, msg)
    }
}
