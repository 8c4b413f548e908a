//! Effective field view across the cause chain.
//!
//! Layers, lowest to highest precedence:
//! 1. the error's ambient context snapshot
//! 2. the error's own fields
//! 3. the structured cause's effective view, computed the same way
//!
//! A cause is closer to what actually went wrong than anything its wrappers
//! add, so its fields win even over an explicit `with` on the wrapper. The one
//! exception is [`keys::OP`]: the closest error that set an operation names it.
//! Opaque causes contribute nothing.

use super::keys;
use super::types::{Cause, Error};
use ctxerr_context::Map;
use std::sync::PoisonError;

fn overlay(target: &mut Map, layer: &Map) {
    for (key, value) in layer {
        target.insert(key.clone(), value.clone());
    }
}

impl Error {
    /// Overlay this error's effective fields onto `target` and return it
    pub fn fill<'a>(&self, target: &'a mut Map) -> &'a mut Map {
        overlay(target, &self.inner.context);
        let own_op = {
            let data = self.inner.data.read().unwrap_or_else(PoisonError::into_inner);
            overlay(target, &data);
            data.get(keys::OP).cloned()
        };
        if let Some(Cause::Tracked(cause)) = &self.inner.cause {
            cause.fill(target);
            if let Some(op) = own_op {
                target.insert(keys::OP.to_string(), op);
            }
        }
        target
    }

    /// Effective fields as a fresh map
    #[must_use]
    pub fn data(&self) -> Map {
        let mut data = Map::new();
        self.fill(&mut data);
        data
    }

    /// Effective operation label, inherited from the cause chain
    #[must_use]
    pub fn operation(&self) -> Option<String> {
        self.data()
            .get(keys::OP)
            .and_then(|op| op.as_str())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::CallStack;
    use serde_json::json;

    fn error_in_context(message: &str, cause: Option<Cause>, context: &[(&str, i64)]) -> Error {
        let mut ctx = ctxerr_context::enter();
        for (key, value) in context {
            ctx = ctx.put(*key, *value);
        }
        let error = Error::from_parts(
            message.to_string(),
            cause,
            keys::NEW_ERROR_TYPE,
            CallStack::from_frames(Vec::new()),
        );
        ctx.exit();
        error
    }

    #[test]
    fn own_fields_beat_context() {
        let e = error_in_context("e", None, &[("k", 1), ("only_ctx", 5)]).with("k", 2);
        let data = e.data();
        assert_eq!(data["k"], 2);
        assert_eq!(data["only_ctx"], 5);
    }

    #[test]
    fn cause_beats_wrapper_fields_and_context() {
        let cause =
            error_in_context("cause", None, &[("ctx_key", 100)]).with("shared", "from cause");
        let outer =
            error_in_context("outer", Some(Cause::Tracked(cause.clone())), &[("ctx_key", 200)])
                .with("shared", "from outer");

        let data = outer.data();
        assert_eq!(data["shared"], "from cause");
        assert_eq!(data["ctx_key"], 100);
        assert_eq!(data[keys::MESSAGE], "cause");
    }

    #[test]
    fn opaque_cause_contributes_nothing() {
        let opaque: std::sync::Arc<dyn std::error::Error + Send + Sync> =
            std::sync::Arc::new(std::io::Error::other("disk"));
        let outer = error_in_context("outer", Some(Cause::Opaque(opaque)), &[]).with("k", 1);
        let data = outer.data();
        assert_eq!(data["k"], 1);
        assert_eq!(data[keys::MESSAGE], "outer");
    }

    #[test]
    fn fill_keeps_unrelated_target_entries_and_overwrites_collisions() {
        let e = error_in_context("e", None, &[]).with("k", "mine");
        let mut target = Map::new();
        target.insert("preexisting".into(), json!(true));
        target.insert("k".into(), json!("theirs"));

        let filled = e.fill(&mut target);
        assert_eq!(filled["preexisting"], true);
        assert_eq!(filled["k"], "mine");
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let cause = error_in_context("cause", None, &[]).with("x", 1);
        let outer = error_in_context("outer", Some(Cause::Tracked(cause.clone())), &[("c", 1)])
            .with("x", 2);

        let before_cause = cause.own_data();
        let before_outer = outer.own_data();
        let _ = outer.data();

        assert_eq!(cause.own_data(), before_cause);
        assert_eq!(outer.own_data(), before_outer);
        assert_eq!(outer.context()["c"], 1);
        assert_eq!(outer.get("x"), Some(json!(2)));
    }

    #[test]
    fn operation_is_inherited_from_cause() {
        let cause = error_in_context("cause", None, &[]).op("load config");
        let outer = error_in_context("outer", Some(Cause::Tracked(cause)), &[]);
        assert_eq!(outer.operation().as_deref(), Some("load config"));
        assert!(outer.get(keys::OP).is_none());
    }

    #[test]
    fn closest_explicit_operation_wins() {
        let root = error_in_context("root", None, &[]).op("dial").with("port", 5432);
        let middle = error_in_context("middle", Some(Cause::Tracked(root)), &[]).op("query");
        let outer = error_in_context("outer", Some(Cause::Tracked(middle.clone())), &[]);

        assert_eq!(middle.operation().as_deref(), Some("query"));
        assert_eq!(middle.data()["port"], 5432);
        assert_eq!(outer.operation().as_deref(), Some("query"));
        assert_eq!(outer.data()[keys::MESSAGE], "root");
    }
}
