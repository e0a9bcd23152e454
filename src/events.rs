//! Typed callbacks fired by the engine.
//!
//! Each event has its own registration method, so an unknown event name
//! cannot be expressed. Registering again replaces the previous callback.

use std::fmt;

use glam::DVec2;

use crate::scene::RedrawToken;
use crate::tree::{NodeClass, NodeKey};

/// What a callback learns about a node
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    pub key: NodeKey,
    pub name: Option<String>,
    pub length: Option<f64>,
    pub class: NodeClass,
    /// Levels below the root
    pub level: usize,
    /// Branch length summed from the root
    pub distance: f64,
    /// Drawing-space position before the view transform
    pub point: DVec2,
}

/// Passed to the draw-complete callback
#[derive(Clone, Debug, PartialEq)]
pub struct DrawSummary {
    pub token: RedrawToken,
    pub root: NodeInfo,
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

type Hook<T> = Option<Box<dyn FnMut(&T)>>;

#[derive(Default)]
pub(crate) struct Hooks {
    draw: Hook<DrawSummary>,
    tooltip_show: Hook<NodeInfo>,
    tooltip_hide: Hook<NodeInfo>,
    context_menu: Hook<NodeInfo>,
}

impl Hooks {
    pub(crate) fn set_draw(&mut self, f: impl FnMut(&DrawSummary) + 'static) {
        self.draw = Some(Box::new(f));
    }

    pub(crate) fn set_tooltip_show(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.tooltip_show = Some(Box::new(f));
    }

    pub(crate) fn set_tooltip_hide(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.tooltip_hide = Some(Box::new(f));
    }

    pub(crate) fn set_context_menu(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.context_menu = Some(Box::new(f));
    }

    pub(crate) fn draw(&mut self, summary: &DrawSummary) {
        fire(&mut self.draw, summary);
    }

    pub(crate) fn tooltip_show(&mut self, node: &NodeInfo) {
        fire(&mut self.tooltip_show, node);
    }

    pub(crate) fn tooltip_hide(&mut self, node: &NodeInfo) {
        fire(&mut self.tooltip_hide, node);
    }

    pub(crate) fn context_menu(&mut self, node: &NodeInfo) {
        fire(&mut self.context_menu, node);
    }
}

fn fire<T>(hook: &mut Hook<T>, arg: &T) {
    if let Some(f) = hook {
        f(arg);
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("draw", &self.draw.is_some())
            .field("tooltip_show", &self.tooltip_show.is_some())
            .field("tooltip_hide", &self.tooltip_hide.is_some())
            .field("context_menu", &self.context_menu.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn info(key: &str) -> NodeInfo {
        NodeInfo {
            key: key.into(),
            name: None,
            length: None,
            class: NodeClass::Leaf,
            level: 1,
            distance: 0.0,
            point: DVec2::ZERO,
        }
    }

    #[test]
    fn unregistered_hooks_are_silent() {
        let mut hooks = Hooks::default();
        hooks.tooltip_show(&info("a"));
        hooks.context_menu(&info("a"));
    }

    #[test]
    fn registering_again_replaces() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::default();

        let first = seen.clone();
        hooks.set_tooltip_show(move |node| first.borrow_mut().push(format!("first {}", node.key)));
        let second = seen.clone();
        hooks.set_tooltip_show(move |node| second.borrow_mut().push(format!("second {}", node.key)));

        hooks.tooltip_show(&info("a"));
        hooks.tooltip_hide(&info("a"));
        assert_eq!(*seen.borrow(), ["second a"]);
        assert!(format!("{hooks:?}").contains("tooltip_show: true"));
    }
}
