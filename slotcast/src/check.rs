use std::sync::Arc;

use slotcast_core::error::Error;
use slotcast_core::*;

/// Validates the schedules of all channels.
pub fn main(config: Arc<config::Config>) -> Result<(), Error> {
    let mut errors = 0;
    for channel in config.channels.iter() {
        let result = channel
            .load_schedule()
            .and_then(|schedule| schedule.validate());
        match result {
            Ok(schedule) => {
                tracing::info!(
                    channel.number = channel.number,
                    channel.name = %channel.name,
                    schedule.slots = schedule.slots.len(),
                    "OK"
                );
            }
            Err(err) => {
                tracing::error!(
                    channel.number = channel.number,
                    channel.name = %channel.name,
                    %err,
                    "Invalid schedule"
                );
                errors += 1;
            }
        }
    }
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
