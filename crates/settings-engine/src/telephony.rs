//! Telephony counters: call time and SMS count since the last reset.

use std::{cell::RefCell, rc::Rc};

use settings_store::{SettingStore, Subscription, Value, handler, subscribe};
use tracing::{debug, info};

use crate::binder::BindContext;

/// Accumulated call time in milliseconds.
pub const CALLTIME_KEY: &str = "calltime";
/// Sent SMS count.
pub const SMSCOUNT_KEY: &str = "smscount";
/// Time of the last counter reset, in milliseconds since the epoch.
pub const LASTRESET_KEY: &str = "lastreset";

/// What the telephony counters show.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelephonyState {
    /// Call time in whole minutes, rounded up.
    pub call_minutes: u64,
    /// SMS count.
    pub sms_count: u64,
    /// Last reset in milliseconds since the epoch; `None` when never reset.
    pub last_reset: Option<f64>,
}

/// Shared handle to the counters' state.
pub type TelephonyHandle = Rc<RefCell<TelephonyState>>;

/// Whole minutes for a millisecond duration, rounded up. Absent or negative is zero.
pub fn to_minutes(milliseconds: f64) -> u64 {
    (milliseconds / 60_000.0).ceil().max(0.0) as u64
}

/// Non-negative whole count for a stored value.
fn count(value: &Value) -> u64 {
    value.as_number().unwrap_or(0.0).max(0.0) as u64
}

/// Re-read every counter from the store.
fn refresh(ctx: &BindContext, state: &TelephonyHandle) {
    let next = TelephonyState {
        call_minutes: to_minutes(ctx.read(CALLTIME_KEY).as_number().unwrap_or(0.0)),
        sms_count: count(&ctx.read(SMSCOUNT_KEY)),
        last_reset: ctx.read(LASTRESET_KEY).as_number(),
    };
    debug!(state = ?next, "telephony_render");
    *state.borrow_mut() = next;
}

/// Keep `state` in sync with the call time and SMS counters.
pub(crate) fn install(
    store: &Rc<dyn SettingStore>,
    ctx: &Rc<BindContext>,
    state: &TelephonyHandle,
) -> Vec<Subscription> {
    [CALLTIME_KEY, SMSCOUNT_KEY]
        .into_iter()
        .map(|key| {
            let (ctx, state) = (Rc::clone(ctx), Rc::clone(state));
            subscribe(store, key, handler(move |_: &Value| refresh(&ctx, &state)))
        })
        .collect()
}

/// Zero both counters and stamp the reset time.
pub fn reset_counters(store: &dyn SettingStore, now_ms: f64) {
    info!(now_ms, "telephony_reset");
    store.set(LASTRESET_KEY, Value::Number(now_ms));
    store.set(CALLTIME_KEY, Value::from(0));
    store.set(SMSCOUNT_KEY, Value::from(0));
}

#[cfg(test)]
mod tests {
    use settings_store::MemoryStore;

    use super::*;
    use crate::{Catalog, DefaultTable};

    #[test]
    fn minutes_round_up() {
        assert_eq!(to_minutes(0.0), 0);
        assert_eq!(to_minutes(1.0), 1);
        assert_eq!(to_minutes(60_000.0), 1);
        assert_eq!(to_minutes(60_001.0), 2);
        assert_eq!(to_minutes(-5.0), 0);
        assert_eq!(to_minutes(f64::NAN), 0);
    }

    #[test]
    fn counters_follow_store_and_reset() {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        let ctx = Rc::new(BindContext {
            store: Rc::downgrade(&store),
            defaults: Rc::new(DefaultTable::default()),
            catalog: Rc::new(RefCell::new(Catalog::default())),
        });
        let state = TelephonyHandle::default();
        let subs = install(&store, &ctx, &state);
        assert_eq!(subs.len(), 2);
        assert_eq!(*state.borrow(), TelephonyState::default());

        store.set(CALLTIME_KEY, Value::from(90_000.0));
        store.set(SMSCOUNT_KEY, Value::from(3));
        assert_eq!(state.borrow().call_minutes, 2);
        assert_eq!(state.borrow().sms_count, 3);

        reset_counters(&*store, 1_700_000_000_000.0);
        assert_eq!(
            *state.borrow(),
            TelephonyState {
                call_minutes: 0,
                sms_count: 0,
                last_reset: Some(1_700_000_000_000.0),
            }
        );
    }
}
