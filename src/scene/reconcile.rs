//! Keyed enter/update/exit reconciliation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::log::{debug, trace, warn};
use crate::tree::{NodeClass, NodeKey};

use super::transition::{RedrawToken, Tween};
use super::{Attr, AttrValue, Attrs, Layer, Lifecycle, Visual};

/// Desired state of one visual after a redraw
#[derive(Clone, Debug, PartialEq)]
pub struct VisualSpec {
    pub key: NodeKey,
    pub class: NodeClass,
    pub parent: Option<NodeKey>,
    pub attrs: Attrs,
}

impl VisualSpec {
    pub fn new(key: NodeKey, class: NodeClass, parent: Option<NodeKey>) -> Self {
        Self {
            key,
            class,
            parent,
            attrs: Attrs::new(),
        }
    }

    pub fn with(mut self, attr: Attr, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }
}

/// Keys entered, updated and exited in one layer
#[derive(Clone, Debug, PartialEq)]
pub struct LayerReport {
    pub layer: Layer,
    pub entered: Vec<NodeKey>,
    pub updated: Vec<NodeKey>,
    pub exited: Vec<NodeKey>,
}

impl LayerReport {
    fn new(layer: Layer) -> Self {
        Self {
            layer,
            entered: Vec::new(),
            updated: Vec::new(),
            exited: Vec::new(),
        }
    }
}

/// Outcome of one reconcile, layers in processing order
#[derive(Clone, Debug, PartialEq)]
pub struct ReconcileReport {
    pub token: RedrawToken,
    pub layers: Vec<LayerReport>,
}

impl ReconcileReport {
    pub fn layer(&self, layer: Layer) -> &LayerReport {
        &self.layers[layer.index()]
    }

    pub fn entered(&self) -> usize {
        self.layers.iter().map(|l| l.entered.len()).sum()
    }

    pub fn updated(&self) -> usize {
        self.layers.iter().map(|l| l.updated.len()).sum()
    }

    pub fn exited(&self) -> usize {
        self.layers.iter().map(|l| l.exited.len()).sum()
    }
}

/// Retained visuals plus the clock that drives their transitions
#[derive(Debug, Default)]
pub struct Scene {
    now: Duration,
    layers: [BTreeMap<NodeKey, Visual>; 4],
    /// Latest token handed out; generation 0 means nothing was drawn yet
    token: RedrawToken,
    /// When the latest redraw's transitions end. Restyles leave it alone.
    busy_until: Duration,
    /// Superseded generations as runs of consecutive tokens, oldest first
    cancelled: Vec<RangeInclusive<u64>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Token of the latest reconcile, if any
    pub fn token(&self) -> Option<RedrawToken> {
        (self.token.0 > 0).then_some(self.token)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(BTreeMap::is_empty)
    }

    /// Bring the scene to the state described by `desired`, one layer at a
    /// time in [`Layer::ORDER`]. Every layer missing from `desired` is treated
    /// as empty.
    pub fn reconcile(&mut self, desired: &BTreeMap<Layer, Vec<VisualSpec>>, duration: Duration) -> ReconcileReport {
        let token = self.token.next();
        if self.token.0 > 0 && self.now < self.busy_until {
            debug!(previous = %self.token, "superseding in-flight redraw");
            self.cancel(self.token);
        }
        self.token = token;
        self.busy_until = self.now + duration;

        let empty = Vec::new();
        let layers = Layer::ORDER
            .into_iter()
            .map(|layer| {
                let specs = desired.get(&layer).unwrap_or(&empty);
                self.reconcile_layer(layer, specs, duration, token)
            })
            .collect();

        self.prune();

        let report = ReconcileReport { token, layers };
        debug!(
            %token,
            entered = report.entered(),
            updated = report.updated(),
            exited = report.exited(),
            "reconciled scene"
        );
        report
    }

    fn reconcile_layer(
        &mut self,
        layer: Layer,
        specs: &[VisualSpec],
        duration: Duration,
        token: RedrawToken,
    ) -> LayerReport {
        let now = self.now;
        let store = &mut self.layers[layer.index()];
        let mut report = LayerReport::new(layer);

        // Where parents were before anything moved
        let previous: HashMap<NodeKey, AttrValue> = if layer.grows_from_parent() {
            store
                .iter()
                .filter(|(_, visual)| !visual.is_exiting())
                .filter_map(|(key, visual)| Some((key.clone(), visual.sample(Attr::Transform, now)?)))
                .collect()
        } else {
            HashMap::new()
        };

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.key.clone()) {
                warn!(key = %spec.key, ?layer, "duplicate visual key ignored");
                continue;
            }

            match store.get_mut(&spec.key) {
                Some(visual) => {
                    if visual.is_exiting() {
                        trace!(key = %spec.key, ?layer, "reviving exiting visual");
                    }
                    visual.class = spec.class;
                    visual.parent = spec.parent.clone();
                    visual.lifecycle = Lifecycle::Live;
                    visual.target.retain(|attr, _| spec.attrs.contains_key(attr));
                    visual.tweens.retain(|attr, _| spec.attrs.contains_key(attr));
                    for (attr, value) in &spec.attrs {
                        visual.retarget(*attr, value.clone(), now, duration, token);
                    }
                    report.updated.push(spec.key.clone());
                }
                None => {
                    let origin = spec.parent.as_ref().and_then(|parent| previous.get(parent));
                    let visual = Visual::entering(layer, spec, origin, now, duration, token);
                    store.insert(spec.key.clone(), visual);
                    report.entered.push(spec.key.clone());
                }
            }
        }

        for (key, visual) in store.iter_mut().filter(|(key, _)| !seen.contains(*key)) {
            if !visual.is_exiting() {
                report.exited.push(key.clone());
            }
            // Already exiting visuals restart their fade from where they are
            visual.freeze(now);
            visual.lifecycle = Lifecycle::Exiting { until: now + duration };
            visual.retarget(Attr::Opacity, AttrValue::Number(0.0), now, duration, token);
        }

        report
    }

    /// Move every live visual of `layer` for which `style` yields a value
    /// towards that value. Returns how many visuals changed.
    pub fn restyle(
        &mut self,
        layer: Layer,
        attr: Attr,
        duration: Duration,
        mut style: impl FnMut(&Visual) -> Option<AttrValue>,
    ) -> usize {
        let now = self.now;
        let token = self.token;
        let mut changed = 0;
        for visual in self.layers[layer.index()].values_mut() {
            if visual.is_exiting() {
                continue;
            }
            if let Some(value) = style(visual) {
                if visual.target(attr) != Some(&value) {
                    changed += 1;
                }
                visual.retarget(attr, value, now, duration, token);
            }
        }
        self.prune();
        changed
    }

    /// Advance the clock by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.advance_to(self.now + dt);
    }

    /// Move the clock to `t`; the clock never runs backwards
    pub fn advance_to(&mut self, t: Duration) {
        if t < self.now {
            warn!(now = ?self.now, requested = ?t, "ignoring clock moving backwards");
            return;
        }
        self.now = t;
        self.prune();
    }

    /// Drop finished transitions and removed visuals
    fn prune(&mut self) {
        let now = self.now;
        for store in &mut self.layers {
            store.retain(|_, visual| match visual.lifecycle {
                Lifecycle::Exiting { until } => now < until,
                _ => true,
            });
            for visual in store.values_mut() {
                visual.tweens.retain(|_, tween| !tween.is_done(now));
                if let Lifecycle::Entering { until } = visual.lifecycle {
                    if now >= until {
                        visual.lifecycle = Lifecycle::Live;
                    }
                }
            }
        }
    }

    fn cancel(&mut self, token: RedrawToken) {
        let generation = token.generation();
        match self.cancelled.last_mut() {
            Some(run) if *run.end() + 1 == generation => *run = *run.start()..=generation,
            _ => self.cancelled.push(generation..=generation),
        }
    }

    pub fn is_cancelled(&self, token: RedrawToken) -> bool {
        let generation = token.generation();
        let at = self.cancelled.partition_point(|run| *run.end() < generation);
        self.cancelled.get(at).is_some_and(|run| run.contains(&generation))
    }

    /// Whether everything `token` scheduled has run to completion
    pub fn is_settled(&self, token: RedrawToken) -> bool {
        if token > self.token || self.is_cancelled(token) {
            return false;
        }
        token < self.token || self.now >= self.busy_until
    }

    pub fn is_animating(&self) -> bool {
        self.layers.iter().flat_map(BTreeMap::values).any(|v| v.is_animating(self.now))
    }

    pub fn get(&self, layer: Layer, key: &NodeKey) -> Option<&Visual> {
        self.layers[layer.index()].get(key)
    }

    /// Current value of one attribute
    pub fn sample(&self, layer: Layer, key: &NodeKey, attr: Attr) -> Option<AttrValue> {
        self.get(layer, key)?.sample(attr, self.now)
    }

    /// Visuals of one layer, ordered by key
    pub fn visuals(&self, layer: Layer) -> impl Iterator<Item = &Visual> {
        self.layers[layer.index()].values()
    }

    pub fn len(&self, layer: Layer) -> usize {
        self.layers[layer.index()].len()
    }

    /// Current attribute values of every visual in a layer
    pub fn snapshot(&self, layer: Layer) -> Vec<(NodeKey, Attrs)> {
        self.visuals(layer)
            .map(|visual| (visual.key.clone(), visual.sample_all(self.now)))
            .collect()
    }
}

impl Visual {
    fn entering(
        layer: Layer,
        spec: &VisualSpec,
        origin: Option<&AttrValue>,
        now: Duration,
        duration: Duration,
        token: RedrawToken,
    ) -> Self {
        let mut visual = Visual {
            key: spec.key.clone(),
            layer,
            class: spec.class,
            parent: spec.parent.clone(),
            lifecycle: Lifecycle::Entering { until: now + duration },
            target: spec.attrs.clone(),
            tweens: BTreeMap::new(),
        };
        if duration.is_zero() {
            visual.lifecycle = Lifecycle::Live;
            return visual;
        }

        let opacity = spec.attrs.get(&Attr::Opacity).cloned().unwrap_or(AttrValue::Number(1.0));
        visual.target.insert(Attr::Opacity, opacity.clone());
        visual.start(Attr::Opacity, AttrValue::Number(0.0), opacity, now, duration, token);

        if let (Some(from), Some(to)) = (origin, spec.attrs.get(&Attr::Transform)) {
            visual.start(Attr::Transform, from.clone(), to.clone(), now, duration, token);
        }
        visual
    }

    /// Stop every running transition where it is
    fn freeze(&mut self, now: Duration) {
        for (attr, tween) in std::mem::take(&mut self.tweens) {
            self.target.insert(attr, tween.sample(now));
        }
    }

    /// Head towards `value`, starting from the currently sampled value.
    /// Attributes that are not tweened take `value` at once.
    fn retarget(&mut self, attr: Attr, value: AttrValue, now: Duration, duration: Duration, token: RedrawToken) {
        let current = self.sample(attr, now);
        self.tweens.remove(&attr);
        if let Some(current) = current {
            if attr.is_tweened() && !duration.is_zero() && current != value {
                self.start(attr, current, value.clone(), now, duration, token);
            }
        }
        self.target.insert(attr, value);
    }

    fn start(
        &mut self,
        attr: Attr,
        from: AttrValue,
        to: AttrValue,
        now: Duration,
        duration: Duration,
        token: RedrawToken,
    ) {
        self.tweens.insert(
            attr,
            Tween {
                from,
                to,
                start: now,
                duration,
                token,
            },
        );
    }
}
