//! The engine: object tree, components, widgets, display and input
//!
//! All state is owned by one [`Engine`] value and mutated through `&mut self`
//! from a single thread. [`Engine::init`] and [`Engine::deinit`] bracket its
//! lifetime; between them at most one display exists.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::Level;

use crate::component::{substitute, ComponentDef, ComponentRegistry};
use crate::display::{Display, DisplayId, GroupId, InputDevice, InputDeviceId, InputGroup, InputKind};
use crate::error::{EngineError, EngineResult};
use crate::layout::layout_subtree;
use crate::logging::{LogHook, LogRecord};
use crate::object::{Align, Area, Coord, FlexFlow, ObjId, Object, TreeSnapshot};
use crate::style::{StyleRegistry, StyleValue};
use crate::tree::ObjectTree;
use crate::widgets::{builtin_factories, BuildContext, WidgetFactory, OBJ};
use crate::xml::XmlNode;

/// Retained-mode widget tree engine
pub struct Engine {
    initialized: bool,
    tree: ObjectTree,
    screens: HashSet<ObjId>,
    active_screen: Option<ObjId>,
    components: ComponentRegistry,
    factories: HashMap<String, Arc<dyn WidgetFactory>>,
    styles: StyleRegistry,
    display: Option<Display>,
    groups: Vec<InputGroup>,
    default_group: Option<GroupId>,
    devices: Vec<InputDevice>,
    next_handle: u32,
    layout_dirty: bool,
    ticks: u64,
    log_hook: Option<LogHook>,
}

impl Engine {
    /// Create an engine; call [`Engine::init`] before use
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialized: false,
            tree: ObjectTree::new(),
            screens: HashSet::new(),
            active_screen: None,
            components: ComponentRegistry::new(),
            factories: HashMap::new(),
            styles: StyleRegistry::new(),
            display: None,
            groups: Vec::new(),
            default_group: None,
            devices: Vec::new(),
            next_handle: 1,
            layout_dirty: false,
            ticks: 0,
            log_hook: None,
        }
    }

    /// Register the built-in widgets and build the shared style registry
    pub fn init(&mut self) {
        if self.initialized {
            self.log(Level::Warn, "engine is already initialized".to_string());
            return;
        }

        self.styles = StyleRegistry::builtin();
        for factory in builtin_factories() {
            self.factories.insert(factory.class_name().to_string(), factory);
        }
        self.initialized = true;
        self.log(Level::Info, "engine initialized".to_string());
    }

    /// Drop every object, component, display, group and device
    ///
    /// The log hook is removed as well. Widget factories registered after
    /// `init` have to be registered again after the next `init`.
    pub fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.log(Level::Info, "engine deinitialized".to_string());

        self.tree.clear();
        self.screens.clear();
        self.active_screen = None;
        self.components.clear();
        self.factories.clear();
        self.styles = StyleRegistry::new();
        self.display = None;
        self.groups.clear();
        self.default_group = None;
        self.devices.clear();
        self.layout_dirty = false;
        self.ticks = 0;
        self.log_hook = None;
        self.initialized = false;
    }

    /// Whether [`Engine::init`] has run without a matching deinit
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Install or remove the hook receiving every engine log line
    pub fn set_log_hook(&mut self, hook: Option<LogHook>) {
        self.log_hook = hook;
    }

    fn log(&mut self, level: Level, message: String) {
        log::log!(target: "lvrt_engine", level, "{message}");
        if let Some(hook) = self.log_hook.as_mut() {
            hook(&LogRecord::new(level, message));
        }
    }

    fn ensure_initialized(&self) -> EngineResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }

    fn next_handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn invalidate(&mut self) {
        self.layout_dirty = true;
        if let Some(display) = self.display.as_mut() {
            display.invalidate();
        }
    }

    /// Register a custom widget class, replacing one with the same name
    pub fn register_widget(&mut self, factory: Arc<dyn WidgetFactory>) -> EngineResult<()> {
        self.ensure_initialized()?;
        self.factories.insert(factory.class_name().to_string(), factory);
        Ok(())
    }

    /// Whether a widget factory is registered for `class`
    #[must_use]
    pub fn has_widget(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Shared style registry
    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    // Display and input

    /// Create the display and an empty default screen, which becomes active
    pub fn create_display(&mut self, width: u32, height: u32) -> EngineResult<DisplayId> {
        self.ensure_initialized()?;
        check_resolution(width, height)?;
        if let Some(old) = self.display.take() {
            self.log(Level::Warn, format!("replacing {old}"));
        }

        let handle = self.next_handle();
        let display = Display::new(handle, width, height);
        let id = display.id();
        self.log(Level::Info, format!("created {display}"));
        self.display = Some(display);

        let screen = self.create_screen();
        self.screen_load(screen)?;
        Ok(id)
    }

    /// The display, once created
    #[must_use]
    pub fn display(&self) -> Option<&Display> {
        self.display.as_ref()
    }

    /// Set the title shown by the display window
    pub fn set_display_title(&mut self, title: &str) -> EngineResult<()> {
        self.display.as_mut().ok_or(EngineError::NoDisplay)?.set_title(title);
        Ok(())
    }

    /// Change the display resolution; the tree is laid out again on the next
    /// refresh
    pub fn set_resolution(&mut self, width: u32, height: u32) -> EngineResult<()> {
        check_resolution(width, height)?;
        self.display
            .as_mut()
            .ok_or(EngineError::NoDisplay)?
            .set_resolution(width, height);
        self.invalidate();
        self.log(Level::Info, format!("display resolution set to {width}x{height}"));
        Ok(())
    }

    /// Create an input group
    pub fn create_group(&mut self) -> EngineResult<GroupId> {
        self.ensure_initialized()?;
        let group = InputGroup::new(self.next_handle());
        let id = group.id();
        self.groups.push(group);
        Ok(id)
    }

    /// Set the group new input devices join
    pub fn set_default_group(&mut self, group: Option<GroupId>) {
        self.default_group = group;
    }

    /// Group new input devices join, if set
    #[must_use]
    pub fn default_group(&self) -> Option<GroupId> {
        self.default_group
    }

    /// Every input group created so far
    #[must_use]
    pub fn groups(&self) -> &[InputGroup] {
        &self.groups
    }

    /// Create an input device; it is bound to the default group, if any
    pub fn create_input_device(&mut self, kind: InputKind) -> EngineResult<InputDeviceId> {
        self.ensure_initialized()?;
        if self.display.is_none() {
            return Err(EngineError::NoDisplay);
        }
        let mut device = InputDevice::new(self.next_handle(), kind);
        device.set_group(self.default_group);
        let id = device.id();
        self.devices.push(device);
        Ok(id)
    }

    /// Bind an input device to a group
    pub fn set_device_group(&mut self, device: InputDeviceId, group: GroupId) -> EngineResult<()> {
        if !self.groups.iter().any(|g| g.id() == group) {
            return Err(EngineError::UnknownHandle(group.raw()));
        }
        self.devices
            .iter_mut()
            .find(|d| d.id() == device)
            .ok_or(EngineError::UnknownHandle(device.raw()))?
            .set_group(Some(group));
        Ok(())
    }

    /// Every input device created so far
    #[must_use]
    pub fn input_devices(&self) -> &[InputDevice] {
        &self.devices
    }

    // Components

    /// Parse and register a component; a failed parse keeps the previous
    /// definition under `name`
    pub fn register_component_from_data(&mut self, name: &str, source: &str) -> EngineResult<()> {
        self.ensure_initialized()?;
        if let Err(err) = self.components.register_from_data(name, source) {
            self.log(Level::Warn, format!("failed to register component '{name}': {err}"));
            return Err(err);
        }
        Ok(())
    }

    /// Remove a component definition; returns whether it existed
    pub fn unregister_component(&mut self, name: &str) -> bool {
        self.components.unregister(name)
    }

    /// Whether a component is registered under `name`
    #[must_use]
    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains(name)
    }

    /// Component definition registered under `name`
    #[must_use]
    pub fn component(&self, name: &str) -> Option<Arc<ComponentDef>> {
        self.components.get(name)
    }

    /// Names of all registered components
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.names()
    }

    // Objects

    fn create_screen(&mut self) -> ObjId {
        let id = self.tree.insert(OBJ, None, (Coord::Pct(100), Coord::Pct(100)));
        if let Some(style) = self.styles.get("screen") {
            if let Some(obj) = self.tree.get_mut(id) {
                obj.styles.push(style);
            }
        }
        self.screens.insert(id);
        id
    }

    /// Instantiate a widget or component by tag
    ///
    /// With no parent the new object is a screen. Instantiation stops at the
    /// first unknown tag: the partial object is deleted and
    /// [`EngineError::UnknownElement`] is returned.
    pub fn create(&mut self, parent: Option<ObjId>, tag: &str, attrs: &[(String, String)]) -> EngineResult<ObjId> {
        self.ensure_initialized()?;
        if let Some(parent) = parent {
            if !self.tree.contains(parent) {
                return Err(EngineError::ObjectNotFound(parent));
            }
        }

        let mut node = XmlNode::new(tag);
        node.attrs = attrs.to_vec();

        let mut stack = Vec::new();
        let id = self.instantiate(parent, &node, &HashMap::new(), &mut stack)?;
        self.invalidate();
        Ok(id)
    }

    fn instantiate(
        &mut self,
        parent: Option<ObjId>,
        node: &XmlNode,
        props: &HashMap<String, String>,
        stack: &mut Vec<String>,
    ) -> EngineResult<ObjId> {
        if let Some(factory) = self.factories.get(&node.tag).cloned() {
            let id = match parent {
                Some(parent) => self.tree.insert(factory.class_name(), Some(parent), factory.default_size()),
                None => {
                    let id = self.create_screen();
                    if let Some(obj) = self.tree.get_mut(id) {
                        obj.class = factory.class_name().to_string();
                    }
                    id
                }
            };
            factory.construct(&mut BuildContext::new(&mut self.tree, &self.styles), id);
            self.apply_attrs(id, factory.as_ref(), &node.attrs, props);
            self.instantiate_children(id, &node.children, props, stack)?;
            return Ok(id);
        }

        if let Some(def) = self.components.get(&node.tag) {
            if stack.iter().any(|name| name == def.name()) {
                self.log(Level::Warn, format!("component '{}' instantiates itself", def.name()));
                return Err(EngineError::ComponentRecursion(def.name().to_string()));
            }

            let bound = def.bind_props(&substituted(&node.attrs, props));
            let instance_attrs: Vec<(String, String)> = node
                .attrs
                .iter()
                .filter(|(key, _)| !def.has_prop(key))
                .cloned()
                .collect();

            stack.push(def.name().to_string());
            let result = self.instantiate(parent, def.view(), &bound, stack);
            stack.pop();
            let id = result?;

            let class = self.tree.get(id).map(|obj| obj.class.clone()).unwrap_or_default();
            if let Some(factory) = self.factories.get(&class).cloned() {
                self.apply_attrs(id, factory.as_ref(), &instance_attrs, props);
            }
            self.instantiate_children(id, &node.children, props, stack)?;
            return Ok(id);
        }

        self.log(
            Level::Warn,
            format!("'{}' is not a known widget, element, or component", node.tag),
        );
        Err(EngineError::UnknownElement(node.tag.clone()))
    }

    fn instantiate_children(
        &mut self,
        id: ObjId,
        children: &[XmlNode],
        props: &HashMap<String, String>,
        stack: &mut Vec<String>,
    ) -> EngineResult<()> {
        for child in children {
            if let Err(err) = self.instantiate(Some(id), child, props, stack) {
                self.delete(id);
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply_attrs(
        &mut self,
        id: ObjId,
        factory: &dyn WidgetFactory,
        attrs: &[(String, String)],
        props: &HashMap<String, String>,
    ) {
        for (key, raw) in attrs {
            let Some(value) = substitute(raw, props) else {
                self.log(Level::Warn, format!("'{raw}' refers to an unknown property"));
                continue;
            };
            let value = value.to_string();

            if self.apply_common_attr(id, key, &value) {
                continue;
            }
            if factory.apply_attr(&mut BuildContext::new(&mut self.tree, &self.styles), id, key, &value) {
                continue;
            }
            self.log(
                Level::Warn,
                format!("{}: unknown attribute {key}=\"{value}\"", factory.class_name()),
            );
        }
    }

    /// Attributes shared by every widget; returns false if `key` is not one
    fn apply_common_attr(&mut self, id: ObjId, key: &str, value: &str) -> bool {
        let Some(obj) = self.tree.get_mut(id) else {
            return false;
        };

        let valid = match key {
            "name" => {
                obj.name = Some(value.to_string());
                true
            }
            "x" => value.trim().parse().map(|v| obj.x = v).is_ok(),
            "y" => value.trim().parse().map(|v| obj.y = v).is_ok(),
            "width" => Coord::parse(value).map(|c| obj.width = Some(c)).is_some(),
            "height" => Coord::parse(value).map(|c| obj.height = Some(c)).is_some(),
            "align" => Align::parse(value).map(|a| obj.align = a).is_some(),
            "flex_flow" => FlexFlow::parse(value).map(|f| obj.flex = Some(f)).is_some(),
            "hidden" => parse_bool(value).map(|h| obj.hidden = h).is_some(),
            _ => match key.strip_prefix("style_") {
                Some("pad_all") => {
                    let parsed = StyleValue::parse(value);
                    for side in ["pad_left", "pad_right", "pad_top", "pad_bottom"] {
                        obj.local_style.set(side, parsed.clone());
                    }
                    true
                }
                Some(prop) => {
                    obj.local_style.set(prop, StyleValue::parse(value));
                    true
                }
                None => return false,
            },
        };

        if !valid {
            self.log(Level::Warn, format!("invalid value \"{value}\" for {key}"));
        }
        true
    }

    /// Currently active screen
    #[must_use]
    pub fn screen_active(&self) -> Option<ObjId> {
        self.active_screen
    }

    /// Make a screen the active one
    pub fn screen_load(&mut self, screen: ObjId) -> EngineResult<()> {
        if !self.tree.contains(screen) {
            return Err(EngineError::ObjectNotFound(screen));
        }
        if !self.screens.contains(&screen) {
            return Err(EngineError::NotAScreen(screen));
        }
        self.active_screen = Some(screen);
        self.invalidate();
        Ok(())
    }

    /// Delete an object and its subtree; deleting the active screen leaves
    /// no screen active
    pub fn delete(&mut self, id: ObjId) {
        let removed = self.tree.remove(id);
        if removed == 0 {
            return;
        }
        self.screens.retain(|screen| self.tree.contains(*screen));
        if self.active_screen == Some(id) {
            self.active_screen = None;
        }
        self.invalidate();
    }

    /// Delete all children of an object
    pub fn clean(&mut self, id: ObjId) {
        if self.tree.clear_children(id) > 0 {
            self.invalidate();
        }
    }

    /// Look up a live object
    #[must_use]
    pub fn object(&self, id: ObjId) -> Option<&Object> {
        self.tree.get(id)
    }

    /// Number of live objects, screens included
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.tree.len()
    }

    /// Resolve a `/`-separated name path below `parent`
    #[must_use]
    pub fn child_by_name(&self, parent: ObjId, path: &str) -> Option<ObjId> {
        self.tree.child_by_name(parent, path)
    }

    /// Name the object answers to in path lookups
    #[must_use]
    pub fn resolved_name(&self, id: ObjId) -> Option<String> {
        self.tree.resolved_name(id)
    }

    /// Serializable dump of the subtree rooted at `id`
    #[must_use]
    pub fn snapshot(&self, id: ObjId) -> Option<TreeSnapshot> {
        self.tree.snapshot(id)
    }

    // Rendering

    /// Recompute coordinates of the active screen if anything changed
    pub fn update_layout(&mut self) {
        if !self.layout_dirty {
            return;
        }
        let (Some(display), Some(screen)) = (self.display.as_ref(), self.active_screen) else {
            return;
        };
        let (width, height) = display.resolution();
        let extent = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        layout_subtree(&mut self.tree, screen, Area::from_size(0, 0, extent(width), extent(height)));
        self.layout_dirty = false;
    }

    /// Lay out and redraw immediately
    pub fn refresh_now(&mut self) {
        self.update_layout();
        if let Some(display) = self.display.as_mut() {
            display.mark_refreshed();
        }
    }

    /// One tick of timers and redraw
    pub fn task_handler(&mut self) {
        if !self.initialized {
            return;
        }
        self.ticks += 1;
        if self.display.as_ref().is_some_and(Display::is_dirty) {
            self.refresh_now();
        }
    }

    /// Ticks since `init`
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("initialized", &self.initialized)
            .field("objects", &self.tree.len())
            .field("components", &self.components.len())
            .field("display", &self.display)
            .field("active_screen", &self.active_screen)
            .field("has_log_hook", &self.log_hook.is_some())
            .finish_non_exhaustive()
    }
}

/// Largest display extent; coordinates are `i32`
pub const MAX_RESOLUTION: u32 = i32::MAX.unsigned_abs();

fn check_resolution(width: u32, height: u32) -> EngineResult<()> {
    if width == 0 || height == 0 || width > MAX_RESOLUTION || height > MAX_RESOLUTION {
        return Err(EngineError::InvalidResolution { width, height });
    }
    Ok(())
}

fn substituted(attrs: &[(String, String)], props: &HashMap<String, String>) -> Vec<(String, String)> {
    attrs
        .iter()
        .filter_map(|(key, raw)| substitute(raw, props).map(|v| (key.clone(), v.to_string())))
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
