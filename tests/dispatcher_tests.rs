//! Behavioral tests for the remap dispatcher.
//!
//! Every collaborator is replaced by a small fake so each property can be
//! checked against exactly the injected key events.

use std::cell::{Cell, RefCell};

use proptest::prelude::*;
use sidekey::{
    DispatchResult, ExtraButton, FocusOracle, InjectorError, KeyInjector, KeyPhase, Keybind,
    KeybindSource, Modifiers, MouseButtonId, RemapDispatcher, RemapError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Injected {
    Press(u32),
    Release(u32),
}

/// Records every injected key; optionally fails the next N calls.
#[derive(Default)]
struct RecordingInjector {
    events: RefCell<Vec<Injected>>,
    failures_left: Cell<u32>,
}

impl RecordingInjector {
    fn failing(times: u32) -> Self {
        Self {
            failures_left: Cell::new(times),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), InjectorError> {
        let left = self.failures_left.get();
        if left > 0 {
            self.failures_left.set(left - 1);
            return Err(InjectorError::new("synthetic input denied"));
        }
        Ok(())
    }

    fn events(&self) -> Vec<Injected> {
        self.events.borrow().clone()
    }
}

impl KeyInjector for RecordingInjector {
    fn press_key(&self, key_code: u32) -> Result<(), InjectorError> {
        self.check()?;
        self.events.borrow_mut().push(Injected::Press(key_code));
        Ok(())
    }

    fn release_key(&self, key_code: u32) -> Result<(), InjectorError> {
        self.check()?;
        self.events.borrow_mut().push(Injected::Release(key_code));
        Ok(())
    }
}

/// Focus oracle that counts how often it was asked.
struct FixedFocus {
    focused: bool,
    queries: Cell<u32>,
}

impl FixedFocus {
    fn new(focused: bool) -> Self {
        Self {
            focused,
            queries: Cell::new(0),
        }
    }
}

impl FocusOracle for FixedFocus {
    fn is_chat_focused(&self) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.focused
    }
}

struct FixedBinds {
    mouse4: Keybind,
    mouse5: Keybind,
}

impl KeybindSource for FixedBinds {
    fn keybind_for(&self, button: ExtraButton) -> Keybind {
        match button {
            ExtraButton::Mouse4 => self.mouse4,
            ExtraButton::Mouse5 => self.mouse5,
        }
    }
}

type TestDispatcher = RemapDispatcher<FixedFocus, FixedBinds, RecordingInjector>;

fn dispatcher(focused: bool, mouse4: Keybind, mouse5: Keybind) -> TestDispatcher {
    RemapDispatcher::new(
        FixedFocus::new(focused),
        FixedBinds { mouse4, mouse5 },
        RecordingInjector::default(),
    )
}

const ENTER: u32 = 0x0D;
const TAB: u32 = 0x09;

#[test]
fn test_no_consume_when_chat_not_focused() {
    let d = dispatcher(false, Keybind::key(ENTER), Keybind::key(TAB));

    assert_eq!(
        d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap(),
        DispatchResult::NotHandled
    );
    assert_eq!(
        d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_2).unwrap(),
        DispatchResult::NotHandled
    );
    assert!(d.injector().events().is_empty());
}

#[test]
fn test_mouse4_consumes_when_keybind_set() {
    let d = dispatcher(true, Keybind::key(0x10), Keybind::NOT_SET);

    let result = d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap();

    assert!(result.is_handled());
    assert_eq!(
        d.injector().events(),
        vec![Injected::Press(0x10), Injected::Release(0x10)]
    );
}

#[test]
fn test_mouse5_consumes_when_keybind_set() {
    let d = dispatcher(true, Keybind::NOT_SET, Keybind::key(0x10));

    let result = d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_2).unwrap();

    assert!(result.is_handled());
    assert_eq!(
        d.injector().events(),
        vec![Injected::Press(0x10), Injected::Release(0x10)]
    );
}

#[test]
fn test_no_consume_when_keybind_not_set() {
    let d = dispatcher(true, Keybind::NOT_SET, Keybind::NOT_SET);

    assert_eq!(
        d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap(),
        DispatchResult::NotHandled
    );
    assert!(d.injector().events().is_empty());
}

#[test]
fn test_bindings_are_independent() {
    let d = dispatcher(true, Keybind::key(ENTER), Keybind::NOT_SET);

    assert!(!d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_2).unwrap().is_handled());
    assert!(d.injector().events().is_empty());

    assert!(d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap().is_handled());
    assert_eq!(
        d.injector().events(),
        vec![Injected::Press(ENTER), Injected::Release(ENTER)]
    );
}

#[test]
fn test_each_button_sends_its_own_key() {
    let d = dispatcher(true, Keybind::key(ENTER), Keybind::key(TAB));

    d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_2).unwrap();
    d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap();

    assert_eq!(
        d.injector().events(),
        vec![
            Injected::Press(TAB),
            Injected::Release(TAB),
            Injected::Press(ENTER),
            Injected::Release(ENTER),
        ]
    );
}

#[test]
fn test_repeated_presses_are_not_coalesced() {
    let d = dispatcher(true, Keybind::key(TAB), Keybind::NOT_SET);

    for _ in 0..5 {
        assert!(d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap().is_handled());
    }

    let expected: Vec<Injected> = (0..5)
        .flat_map(|_| [Injected::Press(TAB), Injected::Release(TAB)])
        .collect();
    assert_eq!(d.injector().events(), expected);
}

#[test]
fn test_only_base_key_is_synthesized() {
    let d = dispatcher(
        true,
        Keybind::new(TAB, Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT | Modifiers::META),
        Keybind::NOT_SET,
    );

    d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap();

    assert_eq!(
        d.injector().events(),
        vec![Injected::Press(TAB), Injected::Release(TAB)]
    );
}

#[test]
fn test_other_buttons_skip_focus_query() {
    let d = dispatcher(true, Keybind::key(ENTER), Keybind::key(TAB));

    for button in [MouseButtonId::LEFT, MouseButtonId::RIGHT, MouseButtonId::MIDDLE] {
        assert!(!d.on_mouse_press(button).unwrap().is_handled());
    }

    assert_eq!(d.focus().queries.get(), 0);
    assert!(d.injector().events().is_empty());
}

#[test]
fn test_injection_failure_is_recoverable() {
    let d = RemapDispatcher::new(
        FixedFocus::new(true),
        FixedBinds {
            mouse4: Keybind::key(ENTER),
            mouse5: Keybind::NOT_SET,
        },
        RecordingInjector::failing(1),
    );

    let err = d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap_err();
    assert!(matches!(
        err,
        RemapError::Injection {
            key_code: ENTER,
            phase: KeyPhase::Press,
            ..
        }
    ));
    assert!(d.injector().events().is_empty());

    // The next press goes through normally
    assert!(d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_1).unwrap().is_handled());
    assert_eq!(
        d.injector().events(),
        vec![Injected::Press(ENTER), Injected::Release(ENTER)]
    );
}

proptest! {
    #[test]
    fn prop_other_buttons_never_handled(
        id in any::<i32>().prop_filter("not a side button", |id| *id != 4 && *id != 5),
        focused in any::<bool>(),
        bind4 in any::<bool>(),
        bind5 in any::<bool>(),
    ) {
        let pick = |set: bool| if set { Keybind::key(ENTER) } else { Keybind::NOT_SET };
        let d = dispatcher(focused, pick(bind4), pick(bind5));

        let result = d.on_mouse_press(MouseButtonId(id)).unwrap();

        prop_assert_eq!(result, DispatchResult::NotHandled);
        prop_assert!(d.injector().events().is_empty());
    }

    #[test]
    fn prop_unfocused_never_handled(button in 4i32..=5, key in 0x41u32..=0x5A) {
        let d = dispatcher(false, Keybind::key(key), Keybind::key(key));

        prop_assert!(!d.on_mouse_press(MouseButtonId(button)).unwrap().is_handled());
        prop_assert!(d.injector().events().is_empty());
    }

    #[test]
    fn prop_n_presses_emit_n_pairs(presses in 1usize..20, key in 0x41u32..=0x5A) {
        let d = dispatcher(true, Keybind::NOT_SET, Keybind::key(key));

        for _ in 0..presses {
            prop_assert!(d.on_mouse_press(MouseButtonId::EXTRA_BUTTON_2).unwrap().is_handled());
        }

        let events = d.injector().events();
        prop_assert_eq!(events.len(), presses * 2);
        for pair in events.chunks(2) {
            prop_assert_eq!(pair, &[Injected::Press(key), Injected::Release(key)][..]);
        }
    }
}
