//! Widget provider contract
//!
//! The runtime drives its widget tree exclusively through [`WidgetProvider`].
//! [`Engine`] is the provider shipped with the workspace; tests and hosts can
//! substitute their own.

use lvrt_engine::{
    Align, Area, DisplayId, Engine, EngineResult, GroupId, InputDeviceId, InputKind, LogHook, ObjId,
    TreeSnapshot,
};

/// Operations the runtime needs from a widget-tree engine
pub trait WidgetProvider {
    /// Bring the provider up; repeated calls are harmless
    fn init(&mut self);

    /// Tear the provider down, dropping every object and registration
    fn deinit(&mut self);

    fn is_initialized(&self) -> bool;

    /// Route every provider log line through `hook`
    fn set_log_hook(&mut self, hook: Option<LogHook>);

    /// Create the display with an empty active screen
    fn create_display(&mut self, width: u32, height: u32, title: &str) -> EngineResult<DisplayId>;

    fn set_resolution(&mut self, width: u32, height: u32) -> EngineResult<()>;

    fn resolution(&self) -> Option<(u32, u32)>;

    fn create_group(&mut self) -> EngineResult<GroupId>;

    fn set_default_group(&mut self, group: Option<GroupId>);

    /// Create an input device bound to `group`
    fn create_input(&mut self, kind: InputKind, group: GroupId) -> EngineResult<InputDeviceId>;

    /// Parse and register component XML under `name`
    fn register_component(&mut self, name: &str, source: &str) -> EngineResult<()>;

    fn unregister_component(&mut self, name: &str) -> bool;

    fn has_component(&self, name: &str) -> bool;

    /// Instantiate `tag`; with no parent the result is a new screen
    fn create(&mut self, parent: Option<ObjId>, tag: &str, attrs: &[(String, String)]) -> EngineResult<ObjId>;

    fn screen_active(&self) -> Option<ObjId>;

    fn screen_load(&mut self, screen: ObjId) -> EngineResult<()>;

    fn delete(&mut self, obj: ObjId);

    /// Delete the children of `obj`
    fn clean(&mut self, obj: ObjId);

    fn child_count(&self, obj: ObjId) -> Option<usize>;

    /// Resolve a `/`-separated name path below `parent`
    fn child_by_name(&self, parent: ObjId, path: &str) -> Option<ObjId>;

    fn object_area(&self, obj: ObjId) -> Option<Area>;

    fn is_layout_positioned(&self, obj: ObjId) -> bool;

    fn style_align(&self, obj: ObjId) -> Align;

    /// Bring coordinates up to date without drawing
    fn update_layout(&mut self);

    /// Lay out and draw immediately
    fn refresh_now(&mut self);

    /// One provider tick
    fn task_handler(&mut self);

    fn snapshot(&self, obj: ObjId) -> Option<TreeSnapshot>;
}

impl WidgetProvider for Engine {
    fn init(&mut self) {
        if !Engine::is_initialized(self) {
            Engine::init(self);
        }
    }

    fn deinit(&mut self) {
        Engine::deinit(self);
    }

    fn is_initialized(&self) -> bool {
        Engine::is_initialized(self)
    }

    fn set_log_hook(&mut self, hook: Option<LogHook>) {
        Engine::set_log_hook(self, hook);
    }

    fn create_display(&mut self, width: u32, height: u32, title: &str) -> EngineResult<DisplayId> {
        let id = Engine::create_display(self, width, height)?;
        self.set_display_title(title)?;
        Ok(id)
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> EngineResult<()> {
        Engine::set_resolution(self, width, height)
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        self.display().map(lvrt_engine::Display::resolution)
    }

    fn create_group(&mut self) -> EngineResult<GroupId> {
        Engine::create_group(self)
    }

    fn set_default_group(&mut self, group: Option<GroupId>) {
        Engine::set_default_group(self, group);
    }

    fn create_input(&mut self, kind: InputKind, group: GroupId) -> EngineResult<InputDeviceId> {
        let device = self.create_input_device(kind)?;
        self.set_device_group(device, group)?;
        Ok(device)
    }

    fn register_component(&mut self, name: &str, source: &str) -> EngineResult<()> {
        self.register_component_from_data(name, source)
    }

    fn unregister_component(&mut self, name: &str) -> bool {
        Engine::unregister_component(self, name)
    }

    fn has_component(&self, name: &str) -> bool {
        Engine::has_component(self, name)
    }

    fn create(&mut self, parent: Option<ObjId>, tag: &str, attrs: &[(String, String)]) -> EngineResult<ObjId> {
        Engine::create(self, parent, tag, attrs)
    }

    fn screen_active(&self) -> Option<ObjId> {
        Engine::screen_active(self)
    }

    fn screen_load(&mut self, screen: ObjId) -> EngineResult<()> {
        Engine::screen_load(self, screen)
    }

    fn delete(&mut self, obj: ObjId) {
        Engine::delete(self, obj);
    }

    fn clean(&mut self, obj: ObjId) {
        Engine::clean(self, obj);
    }

    fn child_count(&self, obj: ObjId) -> Option<usize> {
        self.object(obj).map(|o| o.children().len())
    }

    fn child_by_name(&self, parent: ObjId, path: &str) -> Option<ObjId> {
        Engine::child_by_name(self, parent, path)
    }

    fn object_area(&self, obj: ObjId) -> Option<Area> {
        self.object(obj).map(lvrt_engine::Object::area)
    }

    fn is_layout_positioned(&self, obj: ObjId) -> bool {
        self.object(obj).is_some_and(lvrt_engine::Object::is_layout_positioned)
    }

    fn style_align(&self, obj: ObjId) -> Align {
        self.object(obj).map(lvrt_engine::Object::align).unwrap_or_default()
    }

    fn update_layout(&mut self) {
        Engine::update_layout(self);
    }

    fn refresh_now(&mut self) {
        Engine::refresh_now(self);
    }

    fn task_handler(&mut self) {
        Engine::task_handler(self);
    }

    fn snapshot(&self, obj: ObjId) -> Option<TreeSnapshot> {
        Engine::snapshot(self, obj)
    }
}
