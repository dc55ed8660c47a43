use meetgraph_core::{Node, NodeId};

use crate::graph::store::GraphStore;

/// Rendered bounding box of a graph element, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Ephemeral annotation overlay state, derived per interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationState {
    pub visible: bool,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub content: String,
}

impl AnnotationState {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            anchor_x: 0.0,
            anchor_y: 0.0,
            content: String::new(),
        }
    }
}

/// Maps pointer input onto graph element identity and annotation placement.
///
/// Anchoring is a two-step protocol: hovering yields a provisional anchor
/// centered over the element's bounds, and once the renderer reports the
/// annotation's own measured width the anchor shifts left by half of it.
/// Without the second step the popover hangs off-center to the right.
pub struct InteractionMapper {
    margin_px: f32,
    annotation: AnnotationState,
    awaiting_measure: bool,
}

impl InteractionMapper {
    pub fn new(margin_px: f32) -> Self {
        Self {
            margin_px,
            annotation: AnnotationState::hidden(),
            awaiting_measure: false,
        }
    }

    /// Click targets are always resolved against the current store
    /// snapshot, never a stale one.
    pub fn map_click<'a>(&self, store: &'a GraphStore, id: &NodeId) -> Option<&'a Node> {
        store.node(id)
    }

    /// `None` (or an id the store no longer knows) clears the annotation
    /// immediately; there is no lingering popover.
    pub fn map_hover(
        &mut self,
        store: &GraphStore,
        target: Option<(&NodeId, ElementBounds)>,
    ) -> &AnnotationState {
        self.awaiting_measure = false;
        self.annotation = match target.and_then(|(id, b)| store.node(id).map(|n| (n, b))) {
            Some((node, bounds)) => {
                self.awaiting_measure = true;
                AnnotationState {
                    visible: true,
                    anchor_x: bounds.x + bounds.width / 2.0,
                    anchor_y: bounds.y - self.margin_px,
                    content: node.content.clone(),
                }
            }
            None => AnnotationState::hidden(),
        };
        &self.annotation
    }

    /// Second phase of the anchoring protocol; applied at most once per
    /// hover, after the renderer has measured the annotation.
    pub fn apply_measured_width(&mut self, width: f32) -> &AnnotationState {
        if self.annotation.visible && self.awaiting_measure {
            self.annotation.anchor_x -= width / 2.0;
            self.awaiting_measure = false;
        }
        &self.annotation
    }

    pub fn annotation(&self) -> &AnnotationState {
        &self.annotation
    }

    pub fn clear(&mut self) {
        self.annotation = AnnotationState::hidden();
        self.awaiting_measure = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(id: &str, content: &str) -> GraphStore {
        let mut store = GraphStore::default();
        store.add_node(Node {
            id: NodeId(id.to_string()),
            label: id.to_string(),
            content: content.to_string(),
            color: "#5A5A5A".to_string(),
            priority: 0,
        });
        store
    }

    fn bounds() -> ElementBounds {
        ElementBounds {
            x: 100.0,
            y: 200.0,
            width: 40.0,
            height: 20.0,
        }
    }

    #[test]
    fn hover_anchors_centered_above_the_element() {
        let store = store_with("a", "quarterly budget");
        let mut mapper = InteractionMapper::new(65.0);

        let id = NodeId("a".to_string());
        let state = mapper.map_hover(&store, Some((&id, bounds())));

        assert!(state.visible);
        assert_eq!(state.anchor_x, 120.0);
        assert_eq!(state.anchor_y, 135.0);
        assert_eq!(state.content, "quarterly budget");
    }

    #[test]
    fn hover_none_clears_regardless_of_prior_state() {
        let store = store_with("a", "x");
        let mut mapper = InteractionMapper::new(65.0);
        let id = NodeId("a".to_string());

        mapper.map_hover(&store, Some((&id, bounds())));
        let state = mapper.map_hover(&store, None);
        assert!(!state.visible);
        assert!(state.content.is_empty());
    }

    #[test]
    fn hover_on_unknown_id_behaves_like_none() {
        let store = store_with("a", "x");
        let mut mapper = InteractionMapper::new(65.0);
        let ghost = NodeId("ghost".to_string());

        let state = mapper.map_hover(&store, Some((&ghost, bounds())));
        assert!(!state.visible);
    }

    #[test]
    fn measured_width_recenters_exactly_once() {
        let store = store_with("a", "x");
        let mut mapper = InteractionMapper::new(65.0);
        let id = NodeId("a".to_string());

        mapper.map_hover(&store, Some((&id, bounds())));
        let state = mapper.apply_measured_width(80.0);
        assert_eq!(state.anchor_x, 80.0);

        // A late second measurement must not drift the anchor further.
        let state = mapper.apply_measured_width(80.0);
        assert_eq!(state.anchor_x, 80.0);
    }

    #[test]
    fn measurement_after_clear_is_ignored() {
        let store = store_with("a", "x");
        let mut mapper = InteractionMapper::new(65.0);
        let id = NodeId("a".to_string());

        mapper.map_hover(&store, Some((&id, bounds())));
        mapper.map_hover(&store, None);
        let state = mapper.apply_measured_width(80.0);
        assert!(!state.visible);
        assert_eq!(state.anchor_x, 0.0);
    }

    #[test]
    fn click_resolves_against_current_snapshot() {
        let mut store = store_with("a", "x");
        let mapper = InteractionMapper::new(65.0);
        let id = NodeId("a".to_string());

        assert!(mapper.map_click(&store, &id).is_some());
        store.remove_node(&id);
        assert!(mapper.map_click(&store, &id).is_none());
    }
}
