//! Dependency Evaluator: drive a boolean callback from another setting's value.

use std::rc::Rc;

use settings_store::{SettingStore, Subscription, Value, handler, subscribe};
use tracing::trace;

use crate::{Result, expr::Expr};

/// Parse `expression` and install it. See [`install_expr`].
pub fn install_dependency(
    store: &Rc<dyn SettingStore>,
    expression: &str,
    callback: impl FnMut(bool) + 'static,
) -> Result<Subscription> {
    let expr = Expr::parse(expression)?;
    Ok(install_expr(store, expr, callback))
}

/// Subscribe to the referent of `expr` and call `callback` with whether the clause holds.
///
/// The callback runs synchronously, once immediately with the referent's current value and
/// again on every change, for as long as the returned subscription lives.
pub fn install_expr(
    store: &Rc<dyn SettingStore>,
    expr: Expr,
    mut callback: impl FnMut(bool) + 'static,
) -> Subscription {
    let key = expr.key.clone();
    subscribe(
        store,
        &key,
        handler(move |value: &Value| {
            let holds = expr.holds(value);
            trace!(expr = %expr, value = %value, holds, "dependency_eval");
            callback(holds);
        }),
    )
}
