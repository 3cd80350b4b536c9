//! End-to-end composition scenarios against the in-memory host.
//!
//! Run with: cargo test --test pipe

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use spark_pipe::*;

fn setup() -> (Rc<MemoryHost>, ElementId, Root) {
    reset_runtime();
    let host = MemoryHost::install();
    let container = host.create_element("div");
    let root = create_root(container);
    (host, container, root)
}

type Spy = Rc<RefCell<Vec<String>>>;

fn spy() -> Spy {
    Rc::new(RefCell::new(Vec::new()))
}

fn counter(_: (), _cleanup: CleanupSignal, _ctx: Context) -> Result<Node> {
    let clicks = Subject::<()>::new();
    let count = clicks
        .as_source()
        .scan(0, |n: &i32, _| n + 1)
        .map(|n: &i32| n.to_string());

    create_element(
        "button",
        Props::new()
            .with("onclick", Value::callback(move || clicks.next(())))
            .with("textContent", count),
        (),
    )
}

#[test]
fn renders_an_element_in_a_component() {
    let (host, container, root) = setup();

    root.render(create_component(counter, (), ()).unwrap()).unwrap();

    let button = host.first_child(container).unwrap();
    assert_eq!(host.tag(button).as_deref(), Some("button"));
    assert_eq!(host.text_content(button), "");

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(button), "1");

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(button), "2");

    root.unmount();
    assert_eq!(host.first_child(container), None);
}

#[test]
fn renders_a_component_returned_by_a_component() {
    let (host, container, root) = setup();

    let wrapper = |_: (), _cleanup, _ctx| create_component(counter, (), ());
    root.render(create_component(wrapper, (), ()).unwrap()).unwrap();

    let button = host.first_child(container).unwrap();
    host.dispatch(button, "onclick");
    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(button), "2");

    root.unmount();
    assert!(host.children(container).is_empty());
}

#[test]
fn renders_multiple_times() {
    let (host, container, root) = setup();

    let paragraph = |text: &'static str| {
        create_component(
            move |_: (), _cleanup, _ctx| {
                create_element("p", Props::new().with("textContent", Source::of([text])), ())
            },
            (),
            (),
        )
        .unwrap()
    };

    root.render(paragraph("Hello World!")).unwrap();
    let hello = host.first_child(container).unwrap();
    assert_eq!(host.text_content(hello), "Hello World!");

    root.render(paragraph("Goodbye!")).unwrap();
    let goodbye = host.first_child(container).unwrap();
    assert_ne!(hello, goodbye);
    assert_eq!(host.text_content(goodbye), "Goodbye!");
    assert_eq!(host.next_sibling(goodbye), None);
    assert!(!host.is_attached(hello));

    root.unmount();
    assert_eq!(host.first_child(container), None);
}

#[test]
fn nests_children_and_releases_them_on_unmount() {
    let (host, container, root) = setup();
    let calls = spy();

    let text = |count: Source<i32>, calls: Spy| {
        create_component(
            move |count: Source<i32>, _cleanup, _ctx| {
                let label = count
                    .map(|n: &i32| n.to_string())
                    .tap(move |s: &String| calls.borrow_mut().push(s.clone()));
                create_element("p", Props::new().with("textContent", label), ())
            },
            count,
            (),
        )
    };

    let count = Subject::<i32>::new();
    let source = count.as_source();
    let wrapper_calls = calls.clone();
    let wrapper = create_component(
        move |count: Source<i32>, _cleanup, _ctx| {
            let single = text(count.clone(), wrapper_calls.clone())?;
            let double = text(count.map(|n: &i32| n * 2), wrapper_calls)?;
            create_element("div", Props::new(), vec![single, double])
        },
        source,
        (),
    )
    .unwrap();
    root.render(wrapper).unwrap();

    let div = host.first_child(container).unwrap();
    let children = host.children(div);
    assert_eq!(children.len(), 2);
    assert_eq!(host.text_content(children[0]), "");

    count.next(1);
    assert_eq!(host.text_content(children[0]), "1");
    assert_eq!(host.text_content(children[1]), "2");
    assert_eq!(calls.borrow().len(), 2);

    count.next(2);
    assert_eq!(host.text_content(children[0]), "2");
    assert_eq!(host.text_content(children[1]), "4");
    assert_eq!(*calls.borrow(), vec!["1", "2", "2", "4"]);

    root.unmount();
    assert_eq!(host.first_child(container), None);

    count.next(3);
    assert_eq!(calls.borrow().len(), 4, "no delivery after unmount");
    assert_eq!(count.observer_count(), 0);
}

#[test]
fn const_and_reactive_props() {
    let (host, container, root) = setup();

    let text = BehaviorSubject::new("Hello World!".to_string());
    let hello = create_component(
        |text: Source<String>, _cleanup, _ctx| {
            create_element(
                "p",
                Props::new().with("title", "greeting").with("textContent", text),
                (),
            )
        },
        text.as_source(),
        (),
    )
    .unwrap();
    root.render(hello).unwrap();

    let paragraph = host.first_child(container).unwrap();
    assert_eq!(host.property(paragraph, "title"), Some(Value::from("greeting")));
    assert_eq!(host.text_content(paragraph), "Hello World!");

    text.next("Goodbye!".to_string());
    assert_eq!(host.text_content(paragraph), "Goodbye!");

    root.unmount();
    assert_eq!(text.observer_count(), 0);
}

#[test]
fn signal_props_follow_the_signal() {
    let (host, container, root) = setup();
    let label = spark_signals::signal("before".to_string());

    root.render(
        create_element("p", Props::new().with("textContent", label.clone()), ()).unwrap(),
    )
    .unwrap();
    let paragraph = host.first_child(container).unwrap();
    assert_eq!(host.text_content(paragraph), "before");

    label.set("after".to_string());
    assert_eq!(host.text_content(paragraph), "after");

    root.unmount();
    label.set("gone".to_string());
    assert_eq!(host.text_content(paragraph), "after");
}

#[test]
fn cleanup_signal_completes_streams() {
    let (_host, _container, root) = setup();
    let calls = spy();
    let finalized = Rc::new(Cell::new(0));

    let text = BehaviorSubject::new("Hello World!".to_string());
    let node = {
        let calls = calls.clone();
        let finalized = finalized.clone();
        create_component(
            move |text: Source<String>, cleanup: CleanupSignal, _ctx| {
                let stream = text
                    .take_until(&cleanup)
                    .tap(move |s: &String| calls.borrow_mut().push(s.clone()))
                    .finalize(move || finalized.set(finalized.get() + 1));
                create_element("p", Props::new().with("textContent", stream), ())
            },
            text.as_source(),
            (),
        )
        .unwrap()
    };
    root.render(node).unwrap();

    assert_eq!(*calls.borrow(), vec!["Hello World!"]);
    text.next("Next!".to_string());
    assert_eq!(*calls.borrow(), vec!["Hello World!", "Next!"]);
    assert_eq!(finalized.get(), 0);

    root.unmount();
    assert_eq!(finalized.get(), 1);

    text.next("Goodbye!".to_string());
    assert_eq!(*calls.borrow(), vec!["Hello World!", "Next!"]);
}

#[test]
fn construction_failure_leaves_nothing_behind() {
    let (host, container, root) = setup();
    let feed = Subject::<String>::new();
    let source = feed.as_source();

    let result = create_component(
        move |_: (), cleanup: CleanupSignal, _ctx| {
            let header = create_element("h1", Props::new().with("textContent", source), ())?;
            cleanup.on_destroy({
                let header = header.clone();
                move || header.destroy()
            });
            Err::<Node, _>(Error::construction("missing data"))
        },
        (),
        (),
    );

    assert!(matches!(result, Err(Error::Construction { .. })));
    assert_eq!(feed.observer_count(), 0, "property subscription was released");
    assert!(host.children(container).is_empty());
    assert!(root.mounted().is_none());
}

#[test]
fn construction_failure_releases_nodes_built_before_it() {
    let (host, container, root) = setup();
    let feed = Subject::<String>::new();
    let source = feed.as_source();

    let result = create_component(
        move |_: (), _cleanup: CleanupSignal, _ctx| {
            let title = create_element("p", Props::new().with("textContent", source), ())?;
            let _panel = create_element("div", Props::new(), vec![title])?;
            Err::<Node, _>(Error::construction("backend unavailable"))
        },
        (),
        (),
    );

    assert!(result.is_err());
    assert_eq!(feed.observer_count(), 0, "nodes built before the failure are torn down");
    assert!(host.children(container).is_empty());
    assert!(root.mounted().is_none());
}

#[test]
fn destroy_is_idempotent() {
    let (host, container, root) = setup();
    let node = create_element("p", Props::new(), ()).unwrap();
    root.render(node.clone()).unwrap();

    node.destroy();
    node.destroy();
    root.unmount();

    assert_eq!(host.removal_count(node.element()), 1);
    assert!(host.children(container).is_empty());
}
