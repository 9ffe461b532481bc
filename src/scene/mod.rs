
mod camera;
mod mesh;
mod model;

pub use camera::{Camera, CameraView, FirstPersonController, Motion, Projection};
pub use mesh::{Mesh, Vertex};
pub use model::Model;

use crate::error::SceneError;
use crate::input::InputState;
use crate::math::{Mat4, Vec3};
use crate::renderer::Renderer;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use tracing::debug;

/// Behaviour attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Empty,
    Camera {
        camera: Camera,
        controller: Option<FirstPersonController>,
    },
    /// Drawn through the camera visited earlier in the same frame, or the previous
    /// frame's camera when none has been visited yet.
    Model(Model),
}

/// Per-frame inputs handed down the tree during update.
pub struct UpdateContext<'a> {
    pub input: &'a InputState,
    pub delta_time: f32,
}

/// Per-frame state threaded through the tree during draw. A camera node publishes
/// its view here; model nodes visited afterwards draw through it.
pub struct DrawContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub camera: Option<CameraView>,
}

impl<'a> DrawContext<'a> {
    pub fn new(renderer: &'a mut dyn Renderer) -> Self {
        Self {
            renderer,
            camera: None,
        }
    }
}

#[derive(Debug)]
pub struct Node {
    name: String,
    local_transform: Mat4,
    global_transform: Mat4,
    children: Vec<NodeRef>,
    parent: Option<Weak<RefCell<Node>>>,
    component: Component,
}

impl Node {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    #[must_use]
    pub fn global_transform(&self) -> Mat4 {
        self.global_transform
    }

    #[must_use]
    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        for child in std::mem::take(&mut self.children) {
            if Rc::strong_count(&child.0) == 1 {
                continue;
            }
            let Ok(mut inner) = child.0.try_borrow_mut() else {
                continue;
            };
            inner.parent = None;
            drop(inner);
            child.update_transform();
        }
    }
}

/// Shared handle to a scene node. The global transform is `parent.global * local`,
/// or `local` for a root.
#[derive(Debug, Clone)]
pub struct NodeRef(Rc<RefCell<Node>>);

impl NodeRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_component(name, Component::Empty)
    }

    #[must_use]
    pub fn with_component(name: impl Into<String>, component: Component) -> Self {
        Self(Rc::new(RefCell::new(Node {
            name: name.into(),
            local_transform: Mat4::identity(),
            global_transform: Mat4::identity(),
            children: Vec::new(),
            parent: None,
            component,
        })))
    }

    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    /// Mutable access to the node. Transforms are not exposed here; use the
    /// mutators on [`NodeRef`] so the subtree stays consistent.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        self.0.borrow().local_transform
    }

    #[must_use]
    pub fn global_transform(&self) -> Mat4 {
        self.0.borrow().global_transform
    }

    /// Translation of the local transform.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.0.borrow().local_transform.translation()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Result<NodeRef, SceneError> {
        let node = self.0.borrow();
        node.children
            .get(index)
            .cloned()
            .ok_or(SceneError::ChildIndexOutOfRange {
                index,
                len: node.children.len(),
            })
    }

    /// Snapshot of the children in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    /// True when `self` appears on the parent chain of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &NodeRef) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Appends `child` to this node's children and recomputes the child's subtree.
    ///
    /// A child that already has a parent is detached from it first. Attaching a node
    /// under itself or under one of its own descendants is rejected.
    pub fn add_child(&self, child: &NodeRef) -> Result<(), SceneError> {
        if child.ptr_eq(self) || child.is_ancestor_of(self) {
            return Err(SceneError::CycleDetected {
                parent: self.name(),
                child: child.name(),
            });
        }

        if let Some(previous) = child.parent() {
            previous.unlink(child);
        }

        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
        debug!(parent = %self.name(), child = %child.name(), "attached node");

        child.update_transform();
        Ok(())
    }

    /// Detaches `child` if it is one of this node's children. The child becomes a root
    /// and its subtree is recomputed. Returns whether anything was removed.
    pub fn remove_child(&self, child: &NodeRef) -> bool {
        let removed = self.unlink(child);
        if removed {
            debug!(parent = %self.name(), child = %child.name(), "detached node");
            child.update_transform();
        }
        removed
    }

    fn unlink(&self, child: &NodeRef) -> bool {
        let position = self
            .0
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child));
        match position {
            Some(index) => {
                self.0.borrow_mut().children.remove(index);
                child.0.borrow_mut().parent = None;
                true
            }
            None => false,
        }
    }

    /// Unlinks this node from the tree. Its children are orphaned, not destroyed.
    pub fn destroy(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }

        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &children {
            child.0.borrow_mut().parent = None;
            child.update_transform();
        }
        debug!(node = %self.name(), orphaned = children.len(), "destroyed node");
    }

    /// Recomputes this node's global transform from its parent, then every
    /// descendant's.
    pub fn update_transform(&self) {
        let parent_global = self.parent().map(|p| p.global_transform());
        self.propagate(parent_global);
    }

    fn propagate(&self, parent_global: Option<Mat4>) {
        let (global, children) = {
            let mut node = self.0.borrow_mut();
            node.global_transform = match parent_global {
                Some(parent) => parent * node.local_transform,
                None => node.local_transform,
            };
            (node.global_transform, node.children.clone())
        };
        for child in &children {
            child.propagate(Some(global));
        }
    }

    fn modify_local(&self, f: impl FnOnce(&mut Mat4)) {
        f(&mut self.0.borrow_mut().local_transform);
        self.update_transform();
    }

    /// Replaces the translation of the local transform.
    pub fn set_position(&self, x: f32, y: f32, z: f32) {
        self.modify_local(|local| {
            local.set_translation(x, y, z);
        });
    }

    pub fn set_position_vec(&self, v: Vec3) {
        self.set_position(v.x, v.y, v.z);
    }

    /// Replaces the linear part of the local transform with a pure scale. Any
    /// rotation is discarded; the translation is kept.
    pub fn set_scale(&self, width: f32, height: f32, depth: f32) {
        self.modify_local(|local| {
            let translation = local.translation();
            local
                .set_scaled(width, height, depth)
                .set_translation_vec(translation);
        });
    }

    pub fn set_scale_vec(&self, v: Vec3) {
        self.set_scale(v.x, v.y, v.z);
    }

    /// Replaces the linear part of the local transform with the rotation
    /// `Z(r·axis.z) * Y(r·axis.y) * X(r·axis.x)`. Any scale is discarded; the
    /// translation is kept.
    pub fn set_rotation(&self, radians: f32, axis: Vec3) {
        self.modify_local(|local| {
            let translation = local.translation();
            local
                .set_euler(radians * axis.x, radians * axis.y, radians * axis.z)
                .set_translation_vec(translation);
        });
    }

    /// Adds to the translation of the local transform.
    pub fn translate(&self, x: f32, y: f32, z: f32) {
        self.modify_local(|local| {
            local.translate(x, y, z);
        });
    }

    pub fn translate_vec(&self, v: Vec3) {
        self.translate(v.x, v.y, v.z);
    }

    /// Post-multiplies the local transform by a scale.
    pub fn scale(&self, width: f32, height: f32, depth: f32) {
        self.modify_local(|local| {
            local.scale(width, height, depth);
        });
    }

    pub fn scale_vec(&self, v: Vec3) {
        self.scale(v.x, v.y, v.z);
    }

    /// Post-multiplies the local transform by rotations about X, Y then Z, each by
    /// `radians` weighted by the matching axis component.
    pub fn rotate(&self, radians: f32, axis: Vec3) {
        self.modify_local(|local| {
            local
                .rotate_x(radians * axis.x)
                .rotate_y(radians * axis.y)
                .rotate_z(radians * axis.z);
        });
    }

    /// Runs this node's behaviour, then updates children depth-first in insertion
    /// order.
    pub fn update(&self, ctx: &UpdateContext<'_>) {
        let motion = match &mut self.0.borrow_mut().component {
            Component::Camera {
                camera,
                controller: Some(controller),
            } => Some(controller.update(camera, ctx.input, ctx.delta_time)),
            _ => None,
        };

        if let Some(motion) = motion {
            self.rotate(-motion.yaw, Vec3::Y);
            self.rotate(-motion.pitch, Vec3::X);
            self.translate_vec(motion.translation);
        }

        for child in self.children() {
            child.update(ctx);
        }
    }

    /// Draws this node, then its children depth-first in insertion order.
    pub fn draw(&self, ctx: &mut DrawContext<'_>) {
        {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            let global = node.global_transform;
            match &mut node.component {
                Component::Empty => {}
                Component::Camera { camera, .. } => {
                    camera.observe(&global);
                    ctx.camera = Some(camera.view_state());
                }
                Component::Model(model) => {
                    model.set_model_matrix(global);
                    match &ctx.camera {
                        Some(camera) => model.draw(camera, &mut *ctx.renderer),
                        None => debug!(node = %node.name, "no active camera, skipping draw"),
                    }
                }
            }
        }

        for child in self.children() {
            child.draw(ctx);
        }
    }
}

/// A tree rooted at a single node.
pub struct Scene {
    pub root: NodeRef,
    last_camera: Cell<Option<CameraView>>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: NodeRef::new("root"),
            last_camera: Cell::new(None),
        }
    }

    pub fn add_node(&self, node: &NodeRef) -> Result<(), SceneError> {
        self.root.add_child(node)
    }

    pub fn update(&self, ctx: &UpdateContext<'_>) {
        self.root.update(ctx);
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.begin_frame();
        let mut ctx = DrawContext::new(renderer);
        ctx.camera = self.last_camera.get();
        self.root.draw(&mut ctx);
        self.last_camera.set(ctx.camera);
        renderer.end_frame();
    }

    /// Visits every node depth-first with its cached global transform. The node list
    /// is taken up front and no borrow is held during the callback, so the callback may
    /// mutate nodes; globals are read when each node is reached.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&NodeRef, &Mat4),
    {
        let mut nodes = Vec::new();
        Self::collect(&self.root, &mut nodes);
        for node in &nodes {
            let global = node.global_transform();
            callback(node, &global);
        }
    }

    fn collect(node: &NodeRef, out: &mut Vec<NodeRef>) {
        out.push(node.clone());
        for child in node.children() {
            Self::collect(&child, out);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
