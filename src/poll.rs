use std::time::Duration;

use gloo_timers::callback::Interval;
use leptos::prelude::*;

/// Call `tick` every `period` while the calling component is mounted. The
/// timer is cancelled when the owner is cleaned up.
pub fn poll_every(period: Duration, tick: impl FnMut() + 'static) {
    let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
    let timer = StoredValue::new_local(Some(Interval::new(millis, tick)));
    on_cleanup(move || {
        timer.try_update_value(|t| t.take());
    });
}
