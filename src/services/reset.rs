//! Trip reset

use crate::state::{slots, TripSession};
use crate::utils::errors::Result;

/// Clear every trip slot and reapply the defaults a fresh session starts with.
///
/// Safe from any stage, idle included. The traveller's `user_id` is kept.
pub fn reset(session: &mut TripSession) -> Result<()> {
    for key in slots::TRIP_SLOTS {
        session.remove_data(key);
    }
    for (key, value) in slots::trip_defaults() {
        session.set_data(key, value)?;
    }
    Ok(())
}
