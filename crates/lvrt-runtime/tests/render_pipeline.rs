//! End-to-end tests of the render pipeline through the public API

use std::sync::mpsc::Receiver;

use lvrt_runtime::{HostEvent, RuntimeConfig, RuntimeError, RuntimeSession, StyleOverride};

fn running() -> (RuntimeSession, Receiver<HostEvent>) {
    let (mut session, events) = RuntimeSession::with_config(RuntimeConfig::default());
    session.initialize("#canvas").unwrap();
    drain(&events);
    (session, events)
}

fn drain(events: &Receiver<HostEvent>) -> Vec<HostEvent> {
    events.try_iter().collect()
}

fn outcomes(events: &[HostEvent]) -> Vec<&HostEvent> {
    events
        .iter()
        .filter(|event| !matches!(event, HostEvent::Log(_)))
        .collect()
}

#[test]
fn test_label_inside_object_is_addressable_by_path() {
    let (mut session, events) = running();

    session
        .render(r#"<lv_obj><lv_label text="Hi"/></lv_obj>"#, &[])
        .unwrap();

    let area = session.get_object_area("lv_obj_0/lv_label_0").unwrap().unwrap();
    assert_eq!((area.x, area.y, area.width, area.height), (0, 0, 16, 16));
    assert!(!area.layout_positioned);
    assert_eq!(area.alignment, 0);

    let received = drain(&events);
    assert_eq!(outcomes(&received), vec![&HostEvent::RenderComplete]);
}

#[test]
fn test_unknown_element_reports_one_error_and_leaves_screen_empty() {
    let (mut session, events) = running();

    let err = session.render("<unknown_widget/>", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownElement(ref name) if name == "unknown_widget"));
    assert_eq!(err.status_code(), 1);

    let received = drain(&events);
    assert_eq!(
        outcomes(&received),
        vec![&HostEvent::RenderError("Invalid or unknown element: <unknown_widget>".to_string())]
    );
    assert!(received
        .iter()
        .any(|event| matches!(event, HostEvent::Log(line) if line.contains("not a known widget"))));
    assert_eq!(session.screen_child_count(), Some(0));
}

#[test]
fn test_nested_unknown_element_discards_partial_tree() {
    let (mut session, events) = running();

    let err = session
        .render(r#"<lv_obj><lv_label/><mystery name="x"/></lv_obj>"#, &[])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownElement(ref name) if name == "mystery"));
    assert_eq!(session.screen_child_count(), Some(0));
    assert_eq!(outcomes(&drain(&events)).len(), 1);
}

#[test]
fn test_malformed_xml_is_a_registration_failure() {
    let (mut session, events) = running();
    session.render(r#"<lv_label name="kept" text="ok"/>"#, &[]).unwrap();
    drain(&events);

    let err = session.render("<lv_obj>", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::Registration { .. }));
    assert!(matches!(outcomes(&drain(&events))[..], [HostEvent::RenderError(_)]));

    let err = session.render("", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::Registration { .. }));

    let kept = session.get_object_area("kept").unwrap().unwrap();
    assert_eq!((kept.width, kept.height), (16, 16));
    assert_eq!(session.screen_child_count(), Some(1));
}

#[test]
fn test_reregistration_replaces_the_definition() {
    let (mut session, _events) = running();
    session.register_component("tag", Some(r#"<lv_label text="one"/>"#)).unwrap();
    session.register_component("tag", Some(r#"<lv_label text="three"/>"#)).unwrap();

    session.render(r#"<tag name="t"/>"#, &[]).unwrap();
    let area = session.get_object_area("t").unwrap().unwrap();
    assert_eq!(area.width, 5 * 8);

    let err = session.register_component("tag", Some("<lv_label")).unwrap_err();
    assert!(matches!(err, RuntimeError::Registration { .. }));
    session.render(r#"<tag name="t"/>"#, &[]).unwrap();
    assert_eq!(session.get_object_area("t").unwrap().unwrap().width, 5 * 8);
}

#[test]
fn test_each_render_replaces_the_screen() {
    let (mut session, _events) = running();

    session.render(r#"<lv_label name="first" text="A"/>"#, &[]).unwrap();
    let before = session.provider().object_count();
    session.render(r#"<lv_label name="second" text="B"/>"#, &[]).unwrap();

    assert!(session.get_object_area("first").unwrap().is_none());
    assert!(session.get_object_area("second").unwrap().is_some());
    assert_eq!(session.provider().object_count(), before);
    assert_eq!(session.screen_child_count(), Some(1));
}

#[test]
fn test_failed_render_after_success_still_replaces_screen() {
    let (mut session, _events) = running();
    session.render(r#"<lv_label name="old"/>"#, &[]).unwrap();

    session.render("<nope/>", &[]).unwrap_err();
    assert!(session.get_object_area("old").unwrap().is_none());
    assert_eq!(session.screen_child_count(), Some(0));
}

#[test]
fn test_registered_component_is_usable_in_documents() {
    let (mut session, _events) = running();

    session
        .register_component(
            "card",
            Some(
                r#"<component>
                       <api><prop name="caption" default="Card"/></api>
                       <view extends="lv_obj" width="120" height="content" flex_flow="column">
                           <lv_label name="caption" text="$caption"/>
                       </view>
                   </component>"#,
            ),
        )
        .unwrap();
    assert!(session.is_registered("card"));

    session
        .render(
            r#"<lv_obj width="100%" height="100%" flex_flow="column">
                   <card name="a" caption="First"/>
                   <card name="b"/>
               </lv_obj>"#,
            &[],
        )
        .unwrap();

    let a = session.get_object_area("lv_obj_0/a/caption").unwrap().unwrap();
    let b = session.get_object_area("lv_obj_0/b/caption").unwrap().unwrap();
    assert_eq!(a.width, 5 * 8);
    assert_eq!(b.width, 4 * 8);
    assert!(a.layout_positioned);

    let card_b = session.get_object_area("lv_obj_0/b").unwrap().unwrap();
    assert_eq!(card_b.y, 16);
    assert!(card_b.layout_positioned);
}

#[test]
fn test_reserved_root_name_cannot_be_registered() {
    let (mut session, _events) = running();
    let err = session
        .register_component(lvrt_runtime::ROOT_COMPONENT, Some("<lv_obj/>"))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Registration { .. }));
}

#[test]
fn test_style_overrides_apply_to_the_screen() {
    let (mut session, _events) = running();

    session
        .render(
            r#"<lv_label name="l" text="x"/>"#,
            &[StyleOverride::new("style_pad_all", "12")],
        )
        .unwrap();

    let label = session.get_object_area("l").unwrap().unwrap();
    assert_eq!((label.x, label.y), (12, 12));
}

#[test]
fn test_flat_overrides_must_pair_up() {
    let (mut session, events) = running();

    let err = session
        .render_flat(r#"<lv_obj/>"#, &["style_pad_all", "4", "style_bg_color"])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidOverrides(3)));
    assert!(matches!(outcomes(&drain(&events))[..], [HostEvent::RenderError(_)]));
}

#[test]
fn test_resize_relayouts_before_query() {
    let (mut session, _events) = running();
    session
        .render(r#"<lv_obj name="box" width="50%" height="20" align="bottom_right"/>"#, &[])
        .unwrap();

    let area = session.get_object_area("box").unwrap().unwrap();
    assert_eq!((area.x, area.y, area.width), (400, 460, 400));
    assert_eq!(area.alignment, 6);

    session.resize_canvas(200, 100).unwrap();
    assert_eq!(session.canvas_size(), Some((200, 100)));
    let area = session.get_object_area("box").unwrap().unwrap();
    assert_eq!((area.x, area.y, area.width), (100, 80, 100));

    assert!(matches!(session.resize_canvas(0, 100), Err(RuntimeError::InvalidCanvas(_))));
}

#[test]
fn test_extreme_geometry_clamps_instead_of_crashing() {
    let (mut session, events) = running();

    session.render(r#"<lv_obj width="3000000%"/>"#, &[]).unwrap();
    let area = session.get_object_area("lv_obj_0").unwrap().unwrap();
    assert_eq!(area.width, 24_000_000);

    session
        .render(r#"<lv_obj width="10" align="center" x="2147483647"/>"#, &[])
        .unwrap();
    let area = session.get_object_area("lv_obj_0").unwrap().unwrap();
    assert_eq!(area.x, i32::MAX);
    assert_eq!(area.alignment, 9);

    assert_eq!(
        outcomes(&drain(&events)),
        vec![&HostEvent::RenderComplete, &HostEvent::RenderComplete]
    );

    assert!(matches!(session.resize_canvas(u32::MAX, 480), Err(RuntimeError::InvalidCanvas(_))));
    assert_eq!(session.canvas_size(), Some((800, 480)));
}

#[test]
fn test_empty_path_is_the_screen() {
    let (mut session, _events) = running();
    session.render("<lv_obj/>", &[]).unwrap();

    let screen = session.get_object_area("").unwrap().unwrap();
    assert_eq!((screen.x, screen.y, screen.width, screen.height), (0, 0, 800, 480));
}

#[test]
fn test_snapshot_of_rendered_tree() {
    let (mut session, _events) = running();
    session.render(r#"<slider_box title="Gain"/>"#, &[]).unwrap();

    let snapshot = session.snapshot().unwrap().unwrap();
    let boxed = &snapshot.children[0];
    assert_eq!(boxed.class, "slider_box");
    assert_eq!(boxed.children[0].text.as_deref(), Some("Gain"));
}

#[test]
fn test_queries_require_a_running_session() {
    let (mut session, events) = RuntimeSession::with_config(RuntimeConfig::default());

    assert!(matches!(session.get_object_area("x"), Err(RuntimeError::NotInitialized)));
    assert!(matches!(session.resize_canvas(10, 10), Err(RuntimeError::NotInitialized)));
    assert!(matches!(session.render("<lv_obj/>", &[]), Err(RuntimeError::NotInitialized)));
    assert_eq!(session.canvas_size(), None);

    assert_eq!(
        outcomes(&drain(&events)),
        vec![&HostEvent::RenderError("runtime is not initialized".to_string())]
    );
}
