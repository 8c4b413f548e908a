//! End-to-end chain: ambient context, fields, text-based cause recovery and
//! registry eviction across more errors than the registry holds.
//!
//! Kept alone in its own test binary so no other test competes for registry
//! slots while it runs.

use ctxerr::context::{self, Map};
use ctxerr::{Error, registry};
use serde_json::json;

#[test]
fn wrapping_text_recovers_cause_until_evicted() {
    let mut first: Option<Error> = None;

    for i in 0..registry::capacity() * 2 {
        let ctx = context::enter().put("ca", 100);
        let e = Error::new(format!("Hello {}", "There"))
            .op("My Op")
            .with("DaTa_1", i);
        ctx.exit();
        if first.is_none() {
            first = Some(e.clone());
        }
        assert!(e.to_string().starts_with("Hello There"));
        assert_eq!(e.message(), "Hello There");

        let ctx = context::enter().put("ca", 200).put("cb", 200).put("cc", 200);
        let e3 = Error::wrap(format!("I'm wrapping your text: {e}"))
            .with("dATA+1", 3)
            .with("cb", 300);
        ctx.exit();

        assert_eq!(
            e3.cause(),
            Some(&e),
            "wrapping a plain error should have recovered the contained Error"
        );
        assert_eq!(e3.message(), "I'm wrapping your text: Hello There");

        let mut m = Map::new();
        e3.fill(&mut m);
        assert_eq!(m["data_1"], i, "cause's data should dominate all");
        assert_eq!(m["ca"], 100, "cause's context should dominate error");
        assert_eq!(m["cb"], 300, "error's data should dominate its context");
        assert_eq!(m["cc"], 200, "error's context should come through");
        assert_eq!(m["error_op"], "My Op", "op should be inherited from cause");
        assert_eq!(e.get("error_op"), Some(json!("My Op")));
        assert!(e3.get("error_op").is_none());
    }

    let first = first.expect("loop ran at least once");
    assert!(!registry::is_tracked(&first));
    let e3 = Error::wrap(format!("I'm wrapping your text: {first}")).with("a", 2);
    assert!(
        e3.cause().is_none(),
        "wrapping an Error that is no longer tracked should yield no structured cause"
    );
    assert!(e3.cause_link().is_some());
    assert_eq!(e3.data()["a"], 2);
}
