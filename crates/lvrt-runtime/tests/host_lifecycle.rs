//! Lifecycle, host surface and custom provider tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use lvrt_engine::{
    Align, Area, DisplayId, Engine, EngineError, EngineResult, GroupId, InputDeviceId, InputKind, LogHook, ObjId,
    TreeSnapshot,
};
use lvrt_runtime::{
    host, FixedCanvas, HostEvent, LifecyclePhase, LoopDriver, RuntimeConfig, RuntimeError, RuntimeSession,
    WidgetProvider, ROOT_COMPONENT, SCREEN_WIDGET,
};

/// Provider call or host outcome, in the order the session produced them
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Create { parent: Option<ObjId>, tag: String, made: Option<ObjId> },
    ScreenLoad(ObjId),
    Delete(ObjId),
    Clean(ObjId),
    RefreshNow { refreshes_before: u64, refreshes_after: u64 },
    Outcome(&'static str),
}

/// Shared record of [`Step`]s; host events are folded in as they arrive
#[derive(Clone, Default)]
struct Journal {
    steps: Rc<RefCell<Vec<Step>>>,
    events: Rc<RefCell<Option<Receiver<HostEvent>>>>,
}

impl Journal {
    fn attach(&self, events: Receiver<HostEvent>) {
        *self.events.borrow_mut() = Some(events);
    }

    fn collect_outcomes(&self) {
        if let Some(events) = self.events.borrow().as_ref() {
            for event in events.try_iter().filter(|event| !matches!(event, HostEvent::Log(_))) {
                self.steps.borrow_mut().push(Step::Outcome(event.name()));
            }
        }
    }

    fn push(&self, step: Step) {
        self.collect_outcomes();
        self.steps.borrow_mut().push(step);
    }

    fn take(&self) -> Vec<Step> {
        self.collect_outcomes();
        self.steps.take()
    }
}

/// Engine wrapper recording the calls that shape the screen
///
/// With `hide_unknown_elements` set, `create` reports unknown elements as a
/// generic error, so the only trace of the culprit is the log line.
struct RecordingEngine {
    engine: Engine,
    journal: Journal,
    hide_unknown_elements: bool,
}

impl RecordingEngine {
    fn new(journal: &Journal) -> Self {
        Self {
            engine: Engine::new(),
            journal: journal.clone(),
            hide_unknown_elements: false,
        }
    }

    fn opaque() -> Self {
        Self {
            hide_unknown_elements: true,
            ..Self::new(&Journal::default())
        }
    }

    fn refresh_count(&self) -> u64 {
        self.engine.display().map_or(0, lvrt_engine::Display::refresh_count)
    }
}

impl WidgetProvider for RecordingEngine {
    fn init(&mut self) {
        WidgetProvider::init(&mut self.engine);
    }
    fn deinit(&mut self) {
        WidgetProvider::deinit(&mut self.engine);
    }
    fn is_initialized(&self) -> bool {
        WidgetProvider::is_initialized(&self.engine)
    }
    fn set_log_hook(&mut self, hook: Option<LogHook>) {
        WidgetProvider::set_log_hook(&mut self.engine, hook);
    }
    fn create_display(&mut self, width: u32, height: u32, title: &str) -> EngineResult<DisplayId> {
        WidgetProvider::create_display(&mut self.engine, width, height, title)
    }
    fn set_resolution(&mut self, width: u32, height: u32) -> EngineResult<()> {
        WidgetProvider::set_resolution(&mut self.engine, width, height)
    }
    fn resolution(&self) -> Option<(u32, u32)> {
        WidgetProvider::resolution(&self.engine)
    }
    fn create_group(&mut self) -> EngineResult<GroupId> {
        WidgetProvider::create_group(&mut self.engine)
    }
    fn set_default_group(&mut self, group: Option<GroupId>) {
        WidgetProvider::set_default_group(&mut self.engine, group);
    }
    fn create_input(&mut self, kind: InputKind, group: GroupId) -> EngineResult<InputDeviceId> {
        WidgetProvider::create_input(&mut self.engine, kind, group)
    }
    fn register_component(&mut self, name: &str, source: &str) -> EngineResult<()> {
        WidgetProvider::register_component(&mut self.engine, name, source)
    }
    fn unregister_component(&mut self, name: &str) -> bool {
        WidgetProvider::unregister_component(&mut self.engine, name)
    }
    fn has_component(&self, name: &str) -> bool {
        WidgetProvider::has_component(&self.engine, name)
    }
    fn create(&mut self, parent: Option<ObjId>, tag: &str, attrs: &[(String, String)]) -> EngineResult<ObjId> {
        let result = WidgetProvider::create(&mut self.engine, parent, tag, attrs);
        self.journal.push(Step::Create {
            parent,
            tag: tag.to_string(),
            made: result.as_ref().ok().copied(),
        });
        result.map_err(|err| match err {
            EngineError::UnknownElement(_) if self.hide_unknown_elements => {
                EngineError::Parse("instantiation failed".to_string())
            }
            other => other,
        })
    }
    fn screen_active(&self) -> Option<ObjId> {
        WidgetProvider::screen_active(&self.engine)
    }
    fn screen_load(&mut self, screen: ObjId) -> EngineResult<()> {
        self.journal.push(Step::ScreenLoad(screen));
        WidgetProvider::screen_load(&mut self.engine, screen)
    }
    fn delete(&mut self, obj: ObjId) {
        self.journal.push(Step::Delete(obj));
        WidgetProvider::delete(&mut self.engine, obj);
    }
    fn clean(&mut self, obj: ObjId) {
        self.journal.push(Step::Clean(obj));
        WidgetProvider::clean(&mut self.engine, obj);
    }
    fn child_count(&self, obj: ObjId) -> Option<usize> {
        WidgetProvider::child_count(&self.engine, obj)
    }
    fn child_by_name(&self, parent: ObjId, path: &str) -> Option<ObjId> {
        WidgetProvider::child_by_name(&self.engine, parent, path)
    }
    fn object_area(&self, obj: ObjId) -> Option<Area> {
        WidgetProvider::object_area(&self.engine, obj)
    }
    fn is_layout_positioned(&self, obj: ObjId) -> bool {
        WidgetProvider::is_layout_positioned(&self.engine, obj)
    }
    fn style_align(&self, obj: ObjId) -> Align {
        WidgetProvider::style_align(&self.engine, obj)
    }
    fn update_layout(&mut self) {
        WidgetProvider::update_layout(&mut self.engine);
    }
    fn refresh_now(&mut self) {
        let refreshes_before = self.refresh_count();
        WidgetProvider::refresh_now(&mut self.engine);
        self.journal.push(Step::RefreshNow {
            refreshes_before,
            refreshes_after: self.refresh_count(),
        });
    }
    fn task_handler(&mut self) {
        WidgetProvider::task_handler(&mut self.engine);
    }
    fn snapshot(&self, obj: ObjId) -> Option<TreeSnapshot> {
        WidgetProvider::snapshot(&self.engine, obj)
    }
}

fn recorded_session() -> (RuntimeSession<RecordingEngine>, Journal) {
    let journal = Journal::default();
    let (mut session, events) = RuntimeSession::new(RecordingEngine::new(&journal), RuntimeConfig::default());
    journal.attach(events);
    session.initialize("#canvas").unwrap();
    journal.take();
    (session, journal)
}

fn created_screen(steps: &[Step]) -> ObjId {
    match steps.first() {
        Some(Step::Create { parent: None, made: Some(screen), .. }) => *screen,
        other => panic!("render did not start by creating a screen: {other:?}"),
    }
}

#[test]
fn test_render_loads_new_screen_before_deleting_old_and_completes_after_redraw() {
    let (mut session, journal) = recorded_session();
    let previous = session.provider().engine.screen_active().unwrap();

    session.render(r#"<lv_label text="Hi"/>"#, &[]).unwrap();

    let steps = journal.take();
    let screen = created_screen(&steps);
    assert_eq!(steps.len(), 6);
    assert_eq!(
        steps[..3],
        [
            Step::Create {
                parent: None,
                tag: SCREEN_WIDGET.to_string(),
                made: Some(screen)
            },
            Step::ScreenLoad(screen),
            Step::Delete(previous),
        ]
    );
    assert!(matches!(
        &steps[3],
        Step::Create { parent: Some(parent), tag, made: Some(_) } if *parent == screen && tag == ROOT_COMPONENT
    ));
    assert!(matches!(
        steps[4],
        Step::RefreshNow { refreshes_before, refreshes_after } if refreshes_after == refreshes_before + 1
    ));
    assert_eq!(steps[5], Step::Outcome("xml-is-rendered"));
}

#[test]
fn test_failed_render_cleans_new_screen_without_redraw() {
    let (mut session, journal) = recorded_session();
    let previous = session.provider().engine.screen_active().unwrap();

    session.render("<lv_obj><ghost/></lv_obj>", &[]).unwrap_err();

    let steps = journal.take();
    let screen = created_screen(&steps);
    assert_eq!(
        steps,
        vec![
            Step::Create {
                parent: None,
                tag: SCREEN_WIDGET.to_string(),
                made: Some(screen)
            },
            Step::ScreenLoad(screen),
            Step::Delete(previous),
            Step::Create {
                parent: Some(screen),
                tag: ROOT_COMPONENT.to_string(),
                made: None
            },
            Step::Clean(screen),
            Step::Outcome("lvgl-render-error"),
        ]
    );
    assert_eq!(session.screen_child_count(), Some(0));
}

#[test]
fn test_unknown_element_named_from_log_line() {
    let (mut session, events) = RuntimeSession::new(RecordingEngine::opaque(), RuntimeConfig::default());
    session.initialize("#canvas").unwrap();

    let err = session.render(r#"<lv_obj><fancy_knob/></lv_obj>"#, &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownElement(ref name) if name == "fancy_knob"));

    let errors: Vec<HostEvent> = events
        .try_iter()
        .filter(|event| matches!(event, HostEvent::RenderError(_)))
        .collect();
    assert_eq!(
        errors,
        vec![HostEvent::RenderError("Invalid or unknown element: <fancy_knob>".to_string())]
    );

    // the next attempt starts from a clean error state
    session.render("<lv_obj/>", &[]).unwrap();
}

/// Driver recording how often the host was asked to stop
#[derive(Clone, Default)]
struct CountingDriver {
    active: Rc<Cell<bool>>,
    cancels: Rc<Cell<u32>>,
}

impl LoopDriver for CountingDriver {
    fn start(&mut self) {
        self.active.set(true);
    }

    fn cancel(&mut self) {
        self.active.set(false);
        self.cancels.set(self.cancels.get() + 1);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }
}

#[test]
fn test_cleanup_cancels_the_loop_once() {
    let driver = CountingDriver::default();
    let (session, _events) = RuntimeSession::with_config(RuntimeConfig::default());
    let mut session = session.with_driver(Box::new(driver.clone()));

    session.initialize("#canvas").unwrap();
    assert!(driver.active.get());
    assert!(session.frame());

    session.cleanup();
    session.cleanup();
    assert_eq!(driver.cancels.get(), 1);
    assert!(!driver.active.get());
    assert!(!session.frame());
}

#[test]
fn test_lifecycle_notes_reach_the_host_in_order() {
    let (mut session, events) = RuntimeSession::with_config(RuntimeConfig::default());
    session.initialize("#canvas").unwrap();
    session.cleanup();
    let id = session.id();

    let notes: Vec<String> = events
        .try_iter()
        .filter_map(|event| match event {
            HostEvent::Log(line) if line.contains("runtime") || line.contains("screen") => Some(line),
            _ => None,
        })
        .collect();

    let position = |needle: &str| notes.iter().position(|line| line.contains(needle)).unwrap();
    assert!(position(&format!("Initializing runtime with ID: {id}")) < position("Cleaning up runtime with ID"));
    assert!(position("Cleaning up runtime with ID") < position("Active screen cleaned successfully"));
    assert!(position("Active screen cleaned successfully") < position("Cleaning up runtime is complete"));
}

#[test]
fn test_custom_canvas_and_inputs() {
    let mut config = RuntimeConfig::default();
    config.input.keyboard = true;
    config.input.wheel = true;
    config.window_title = "Editor".to_string();

    let (session, _events) = RuntimeSession::with_config(config);
    let mut session = session.with_canvas(Box::new(FixedCanvas::new(320, 200)));
    session.initialize("anything").unwrap();

    assert_eq!(session.canvas_size(), Some((320, 200)));
    assert_eq!(session.input_devices().len(), 3);
    assert_eq!(session.provider().display().unwrap().title(), "Editor");
}

#[test]
fn test_host_surface_end_to_end() {
    let (mut session, events) = RuntimeSession::with_config(RuntimeConfig::default());

    assert_eq!(host::initialize(&mut session, "#canvas"), 0);
    host::task_handler(&mut session);

    assert_eq!(
        host::load_component_data(&mut session, "badge", Some(r#"<lv_label text="!"/>"#)),
        0
    );
    assert_eq!(
        host::process_data(
            &mut session,
            r#"<lv_obj name="root" flex_flow="row"><badge/><badge name="b2"/></lv_obj>"#,
            &["style_pad_all", "2"],
        ),
        0
    );

    assert_eq!(host::get_obj_area(&mut session, "root/b2"), (true, 10, 2, 8, 16, true, 0));
    assert_eq!(host::get_obj_area(&mut session, "root/lv_label_0").1, 2);

    assert_eq!(host::process_data(&mut session, "<ghost/>", &[]), 1);
    assert!(!host::get_obj_area(&mut session, "root").0);

    host::cleanup_runtime(&mut session);
    assert_eq!(session.phase(), LifecyclePhase::Uninitialized);
    assert_eq!(host::get_obj_area(&mut session, ""), (false, 0, 0, 0, 0, false, 0));

    let rendered = events
        .try_iter()
        .filter(|event| *event == HostEvent::RenderComplete)
        .count();
    assert_eq!(rendered, 1);
}
