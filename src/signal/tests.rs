use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn emit_reaches_every_subscriber_in_order() {
    let listeners: Listeners<u32> = Listeners::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let a = seen.clone();
    let _s1 = listeners.subscribe(move |v| a.borrow_mut().push(("a", *v)));
    let b = seen.clone();
    let _s2 = listeners.subscribe(move |v| b.borrow_mut().push(("b", *v)));

    listeners.emit(&7);
    assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
}

#[test]
fn dropping_subscription_unregisters() {
    let listeners: Listeners<u32> = Listeners::new();
    let hits = Rc::new(Cell::new(0));

    let h = hits.clone();
    let sub = listeners.subscribe(move |_| h.set(h.get() + 1));
    listeners.emit(&1);
    assert_eq!(listeners.len(), 1);

    drop(sub);
    assert!(listeners.is_empty());
    listeners.emit(&2);
    assert_eq!(hits.get(), 1);
}

#[test]
fn subscription_outliving_registry_is_harmless() {
    let sub = {
        let listeners: Listeners<u32> = Listeners::new();
        listeners.subscribe(|_| {})
    };
    drop(sub);
}

#[test]
fn listener_removed_during_emit_is_skipped() {
    let listeners: Listeners<u32> = Listeners::new();
    let second_hits = Rc::new(Cell::new(0));
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let v = victim.clone();
    let _first = listeners.subscribe(move |_| {
        v.borrow_mut().take();
    });
    let h = second_hits.clone();
    *victim.borrow_mut() = Some(listeners.subscribe(move |_| h.set(h.get() + 1)));

    listeners.emit(&1);
    assert_eq!(second_hits.get(), 0);
    assert_eq!(listeners.len(), 1);
}
