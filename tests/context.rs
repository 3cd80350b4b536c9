//! Context propagation across component boundaries.

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

/// Clickable counter that publishes its count as `"counter"`.
fn counter_context(children: Children, _cleanup: CleanupSignal, ctx: Context) -> Result<Node> {
    let clicks = Subject::<()>::new();
    let text = clicks
        .as_source()
        .scan(0, |n: &i32, _| n + 1)
        .map(|n: &i32| n.to_string())
        .tap(move |count: &String| ctx.set("counter", count.clone()));

    create_element(
        "div",
        Props::new()
            .with("onclick", Value::callback(move || clicks.next(())))
            .with("textContent", text),
        children,
    )
}

/// Shows the in-scope `"counter"`; clicking it publishes `"4"` locally.
fn text_output(_: (), _cleanup: CleanupSignal, ctx: Context) -> Result<Node> {
    let local = ctx.clone();
    create_element(
        "div",
        Props::new()
            .with(
                "onclick",
                Value::callback(move || local.set("counter", "4".to_string())),
            )
            .with("textContent", ctx.get::<String>("counter")),
        (),
    )
}

fn intermediate(_: (), _cleanup: CleanupSignal, _ctx: Context) -> Result<Node> {
    create_component(text_output, (), ())
}

#[test]
fn context_does_not_flow_up() {
    let (host, container, root) = setup();
    let output = create_component(text_output, (), ()).unwrap();
    root.render(create_component(counter_context, Children::Static(vec![output]), ()).unwrap())
        .unwrap();

    let button = host.first_child(container).unwrap();
    let paragraph = host.first_child(button).unwrap();

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(button), "1");
    assert_eq!(host.text_content(paragraph), "1");

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(paragraph), "2");

    host.dispatch(paragraph, "onclick");
    assert_eq!(host.text_content(button), "2", "child writes never reach the parent");
    assert_eq!(host.text_content(paragraph), "4");

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(button), "3");
    assert_eq!(host.text_content(paragraph), "3", "later ancestor write wins");

    root.unmount();
    assert_eq!(host.first_child(container), None);
}

#[test]
fn context_reaches_a_descendant() {
    let (host, container, root) = setup();
    let nested = create_component(intermediate, (), ()).unwrap();
    root.render(create_component(counter_context, Children::Static(vec![nested]), ()).unwrap())
        .unwrap();

    let button = host.first_child(container).unwrap();
    let paragraph = host.first_child(button).unwrap();

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(paragraph), "1");
    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(paragraph), "2");

    root.unmount();
    assert_eq!(host.first_child(container), None);
}

#[test]
fn context_reaches_a_keyed_descendant_created_later() {
    let (host, container, root) = setup();
    let children = BehaviorSubject::<KeyedChild>::new((
        "x".to_string(),
        Some(create_component(intermediate, (), ()).unwrap()),
    ));
    root.render(
        create_component(counter_context, Children::Keyed(children.as_source()), ()).unwrap(),
    )
    .unwrap();

    let button = host.first_child(container).unwrap();
    let paragraph = host.first_child(button).unwrap();

    host.dispatch(button, "onclick");
    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(paragraph), "2");

    children.next(("x".to_string(), Some(create_component(intermediate, (), ()).unwrap())));
    let replacement = host.first_child(button).unwrap();
    assert_ne!(replacement, paragraph);
    assert_eq!(host.text_content(replacement), "2", "late reader replays current value");

    host.dispatch(button, "onclick");
    assert_eq!(host.text_content(replacement), "3");

    root.unmount();
    assert_eq!(host.first_child(container), None);
}

#[test]
fn reader_observes_completion_on_unmount() {
    let (_host, _container, root) = setup();
    let completed = Rc::new(std::cell::Cell::new(false));

    let node = {
        let completed = completed.clone();
        create_component(
            move |_: (), _cleanup, ctx: Context| {
                ctx.set("theme", "dark");
                ctx.get::<&str>("theme").subscribe_observer(
                    Observer::new(|_: &&str| {}).on_complete(move || completed.set(true)),
                );
                create_element("div", Props::new(), ())
            },
            (),
            (),
        )
        .unwrap()
    };
    root.render(node).unwrap();
    assert!(!completed.get());

    root.unmount();
    assert!(completed.get());
}

#[test]
fn peek_reads_current_value() {
    let (_host, _container, _root) = setup();
    let parent = create_element("div", Props::new(), ()).unwrap();

    assert_eq!(parent.context().peek::<i32>("depth"), None);
    parent.context().set("depth", 1);
    assert_eq!(parent.context().peek::<i32>("depth"), Some(1));
    assert_eq!(parent.context().peek::<String>("depth"), None, "type mismatch reads as absent");
}
