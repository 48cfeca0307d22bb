use kagemusha_core::{Augmentation, Callable};
use kagemusha_harness::macros::test_case;
use kagemusha_harness::spy::Spy;
use kagemusha_harness::{
    active_double_count, assert_called, assert_error_contains, init, stubs, unique_label,
    ScopedDouble,
};

type SaveResult = Result<String, String>;

/// A shared callable whose `save` behavior would normally hit real storage.
fn shared_operation() -> Callable<(), String, SaveResult> {
    Callable::builder(|_, payload: String| Ok(format!("saved:{payload}")))
        .meta("name", "operation".to_string())
        .behavior("save", |_, payload| Ok(format!("saved:{payload}")))
        .build()
}

#[test]
fn a_double_can_stub_save_without_touching_the_original() {
    init();

    let operation = shared_operation();
    let spy = Spy::new();
    let double = operation.isolate_with(Augmentation::new().set_behavior(
        "save",
        spy.wrap(stubs::failing("storage offline".to_string())),
    ));

    let result = double
        .invoke_behavior("save", &mut (), "record".to_string())
        .unwrap();
    assert_eq!(result, Err("storage offline".to_string()));
    assert_called!(spy, 1);
    assert_eq!(spy.calls(), vec!["record".to_string()]);

    // The shared callable still saves for everyone else.
    let untouched = operation
        .invoke_behavior("save", &mut (), "record".to_string())
        .unwrap();
    assert_eq!(untouched, Ok("saved:record".to_string()));
}

#[test]
fn sequenced_stubs_model_recovery() {
    let operation = shared_operation();
    let double = operation.isolate_with(Augmentation::new().set_behavior(
        "save",
        stubs::sequence([
            Err("storage offline".to_string()),
            Ok("saved:late".to_string()),
        ]),
    ));

    let first = double
        .invoke_behavior("save", &mut (), "late".to_string())
        .unwrap();
    let second = double
        .invoke_behavior("save", &mut (), "late".to_string())
        .unwrap();
    assert!(first.is_err());
    assert_eq!(second, Ok("saved:late".to_string()));
}

#[test]
fn canned_returns_replace_the_main_invocation_result() {
    let operation = shared_operation();
    let stub = stubs::returning::<(), String, SaveResult>(Ok("stubbed".to_string()));

    // Install as a behavior override; direct invocation is untouched.
    let double = operation.isolate_with(Augmentation::new().set_behavior("save", stub));
    assert_eq!(
        double.call(&mut (), "direct".to_string()),
        Ok("saved:direct".to_string())
    );
    assert_eq!(
        double
            .invoke_behavior("save", &mut (), "direct".to_string())
            .unwrap(),
        Ok("stubbed".to_string())
    );
}

#[test]
fn one_spy_can_watch_several_doubles() {
    let operation = shared_operation();
    let spy = Spy::new();

    let first = operation.isolate_with(Augmentation::new().set_behavior(
        "save",
        spy.wrap(stubs::succeeding("one".to_string())),
    ));
    let second = operation.isolate_with(Augmentation::new().set_behavior(
        "save",
        spy.wrap(stubs::succeeding("two".to_string())),
    ));

    first
        .invoke_behavior("save", &mut (), "a".to_string())
        .unwrap()
        .unwrap();
    second
        .invoke_behavior("save", &mut (), "b".to_string())
        .unwrap()
        .unwrap();

    spy.verify_called(2);
    assert_eq!(spy.calls(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn missing_behaviors_surface_a_readable_error() {
    let operation = shared_operation();
    let double = operation.isolate();

    let result = double.invoke_behavior("archive", &mut (), String::new());
    assert_error_contains!(result, "unknown behavior: archive");
}

#[test]
fn labels_stay_unique_across_doubles() {
    let first = unique_label();
    let second = unique_label();
    assert_ne!(first, second);
}

#[test]
fn scoped_doubles_deregister_on_drop() {
    let operation = shared_operation();
    let before = active_double_count();

    {
        let double = ScopedDouble::isolate_with(
            &operation,
            Augmentation::new().set_behavior("save", stubs::succeeding("done".to_string())),
        );
        assert_eq!(active_double_count(), before + 1);
        assert_eq!(
            double
                .invoke_behavior("save", &mut (), "x".to_string())
                .unwrap(),
            Ok("done".to_string())
        );
        assert!(double.label().starts_with("double_"));
    }

    assert_eq!(active_double_count(), before);
}

#[test_case("alpha" ; "short payload")]
#[test_case("a much longer payload body" ; "long payload")]
fn doubles_save_whatever_the_caller_sends(payload: &str) {
    let operation = shared_operation();
    let double = operation.isolate();

    assert_eq!(
        double.call(&mut (), payload.to_string()),
        Ok(format!("saved:{payload}"))
    );
}
