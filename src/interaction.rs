//! Hover and selection state shared by a chart and its table.
//!
//! The page owns one [`InteractionState`] per linked chart/table pair and
//! feeds it [`InteractionAction`]s; views only read snapshots of it.
//! Entity hover, category hover and selection are independent of each
//! other. Selection always wins over hover when deciding what to fade.

use crate::config::ChartStyle;
use crate::{Category, EntityId};
use log::debug;
use std::collections::BTreeSet;
use std::rc::Rc;
use yew::functional::Reducible;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub hovered_entity: Option<EntityId>,
    pub selected_entities: BTreeSet<EntityId>,
    pub hovered_category: Option<Category>,
}

/// Named intents; the only way interaction state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionAction {
    HoverEntity(Option<EntityId>),
    ToggleEntity(EntityId),
    ResetSelection,
    HoverCategory(Option<Category>),
    /// Pointer left the plot surface.
    ClearHover,
    /// Drop selected or hovered ids that are no longer in the dataset.
    RetainKnown(Vec<EntityId>),
}

/// Which hover flags are set; transitions are logged by [`InteractionState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Idle,
    EntityHovered,
    CategoryHovered,
    EntityAndCategoryHovered,
}

impl InteractionState {
    pub fn hover_entity(&self, id: Option<EntityId>) -> Self {
        Self {
            hovered_entity: id,
            ..self.clone()
        }
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_entity(&self, id: &str) -> Self {
        let mut selected_entities = self.selected_entities.clone();
        if !selected_entities.remove(id) {
            selected_entities.insert(id.to_string());
        }
        Self {
            selected_entities,
            ..self.clone()
        }
    }

    pub fn reset_selection(&self) -> Self {
        Self {
            selected_entities: BTreeSet::new(),
            ..self.clone()
        }
    }

    pub fn hover_category(&self, category: Option<Category>) -> Self {
        Self {
            hovered_category: category,
            ..self.clone()
        }
    }

    pub fn clear_hover(&self) -> Self {
        Self {
            hovered_entity: None,
            hovered_category: None,
            ..self.clone()
        }
    }

    pub fn retain_known(&self, known: &[EntityId]) -> Self {
        let is_known = |id: &EntityId| known.iter().any(|k| k == id);
        Self {
            hovered_entity: self.hovered_entity.clone().filter(is_known),
            selected_entities: self
                .selected_entities
                .iter()
                .filter(|id| is_known(id))
                .cloned()
                .collect(),
            hovered_category: self.hovered_category,
        }
    }

    pub fn apply(&self, action: InteractionAction) -> Self {
        debug!("Interaction intent: {:?}", action);
        let next = match action {
            InteractionAction::HoverEntity(id) => self.hover_entity(id),
            InteractionAction::ToggleEntity(id) => self.toggle_entity(&id),
            InteractionAction::ResetSelection => self.reset_selection(),
            InteractionAction::HoverCategory(category) => self.hover_category(category),
            InteractionAction::ClearHover => self.clear_hover(),
            InteractionAction::RetainKnown(ids) => self.retain_known(&ids),
        };
        let (from, to) = (self.phase(), next.phase());
        if from != to {
            debug!("Hover phase {:?} -> {:?}", from, to);
        }
        next
    }

    pub fn phase(&self) -> HoverPhase {
        match (self.hovered_entity.is_some(), self.hovered_category.is_some()) {
            (false, false) => HoverPhase::Idle,
            (true, false) => HoverPhase::EntityHovered,
            (false, true) => HoverPhase::CategoryHovered,
            (true, true) => HoverPhase::EntityAndCategoryHovered,
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_entities.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_entities.contains(id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered_entity.as_deref() == Some(id)
    }

    /// Selected or hovered: drawn with the heavier stroke.
    pub fn is_emphasized(&self, id: &str) -> bool {
        self.is_selected(id) || self.is_hovered(id)
    }

    /// Opacity of an entity's line and row.
    ///
    /// 1. A selection exists and `id` is not in it: faded.
    /// 2. No selection, and some other entity is hovered: faded.
    /// 3. Otherwise full opacity.
    pub fn opacity_for(&self, id: &str, style: &ChartStyle) -> f64 {
        if self.has_selection() {
            if self.is_selected(id) {
                1.0
            } else {
                style.faded_opacity
            }
        } else {
            match self.hovered_entity.as_deref() {
                Some(hovered) if hovered != id => style.faded_opacity,
                _ => 1.0,
            }
        }
    }

    pub fn stroke_width_for(&self, id: &str, style: &ChartStyle) -> f64 {
        if self.is_emphasized(id) {
            style.emphasized_stroke_width
        } else {
            style.stroke_width
        }
    }

    /// Opacity of the part of a line after the hovered category.
    pub fn after_segment_opacity(&self, id: &str, style: &ChartStyle) -> f64 {
        self.opacity_for(id, style) * style.after_hover_fade
    }

    /// Axis flags other than the hovered category fade almost out.
    pub fn flag_opacity(&self, category: Category, style: &ChartStyle) -> f64 {
        match self.hovered_category {
            Some(hovered) if hovered != category => style.inactive_flag_opacity,
            _ => 1.0,
        }
    }
}

impl Reducible for InteractionState {
    type Action = InteractionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.apply(action);
        // Pointer moves repeat the same intent constantly; skip the re-render.
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn style() -> ChartStyle {
        ChartStyle::default()
    }

    #[test]
    fn idle_state_shows_everything() {
        let state = InteractionState::default();
        assert_eq!(state.phase(), HoverPhase::Idle);
        assert_eq!(state.opacity_for("a", &style()), 1.0);
        assert_eq!(state.stroke_width_for("a", &style()), style().stroke_width);
    }

    #[test]
    fn hover_fades_other_entities() {
        let state = InteractionState::default().hover_entity(Some("a".into()));
        assert_eq!(state.opacity_for("a", &style()), 1.0);
        assert_eq!(state.opacity_for("b", &style()), style().faded_opacity);
        assert_eq!(
            state.stroke_width_for("a", &style()),
            style().emphasized_stroke_width
        );
    }

    #[test]
    fn selection_wins_over_hover() {
        let state = InteractionState::default()
            .toggle_entity("a")
            .hover_entity(Some("b".into()));
        assert_eq!(state.opacity_for("b", &style()), style().faded_opacity);
        assert_eq!(state.opacity_for("a", &style()), 1.0);
        assert_eq!(state.opacity_for("c", &style()), style().faded_opacity);
    }

    #[test]
    fn hovering_a_selected_entity_keeps_others_selected_visible() {
        let state = InteractionState::default()
            .toggle_entity("a")
            .toggle_entity("b")
            .hover_entity(Some("a".into()));
        assert_eq!(state.opacity_for("b", &style()), 1.0);
    }

    #[test]
    fn reset_clears_only_the_selection() {
        let state = InteractionState::default()
            .toggle_entity("a")
            .hover_category(Some(3))
            .reset_selection();
        assert!(!state.has_selection());
        assert_eq!(state.hovered_category, Some(3));
    }

    #[test]
    fn pointer_leave_clears_both_hovers_but_not_selection() {
        let state = InteractionState::default()
            .toggle_entity("a")
            .hover_entity(Some("b".into()))
            .hover_category(Some(2))
            .apply(InteractionAction::ClearHover);
        assert_eq!(state.phase(), HoverPhase::Idle);
        assert!(state.is_selected("a"));
    }

    #[test]
    fn clear_hover_is_one_reducer_step() {
        let state = Rc::new(
            InteractionState::default()
                .hover_entity(Some("b".into()))
                .hover_category(Some(2)),
        );
        assert_eq!(state.phase(), HoverPhase::EntityAndCategoryHovered);
        let next = state.clone().reduce(InteractionAction::ClearHover);
        assert_eq!(next.phase(), HoverPhase::Idle);
        // Nothing hovered: leaving again changes nothing.
        let again = next.clone().reduce(InteractionAction::ClearHover);
        assert!(Rc::ptr_eq(&next, &again));
    }

    #[test]
    fn phase_follows_applied_intents() {
        let phases: Vec<HoverPhase> = [
            InteractionAction::HoverCategory(Some(1)),
            InteractionAction::HoverEntity(Some("a".into())),
            InteractionAction::HoverCategory(None),
            InteractionAction::ToggleEntity("a".into()),
            InteractionAction::ClearHover,
        ]
        .into_iter()
        .scan(InteractionState::default(), |state, action| {
            *state = state.apply(action);
            Some(state.phase())
        })
        .collect();
        assert_eq!(
            phases,
            [
                HoverPhase::CategoryHovered,
                HoverPhase::EntityAndCategoryHovered,
                HoverPhase::EntityHovered,
                HoverPhase::EntityHovered,
                HoverPhase::Idle,
            ]
        );
    }

    #[test]
    fn after_segment_is_further_faded() {
        let state = InteractionState::default().hover_entity(Some("a".into()));
        let s = style();
        assert_eq!(state.after_segment_opacity("a", &s), s.after_hover_fade);
        assert!((state.after_segment_opacity("b", &s) - s.faded_opacity * s.after_hover_fade).abs() < 1e-12);
    }

    #[test]
    fn flags_spotlight_the_hovered_category() {
        let s = style();
        let state = InteractionState::default().hover_category(Some(2));
        assert_eq!(state.flag_opacity(2, &s), 1.0);
        assert_eq!(state.flag_opacity(1, &s), s.inactive_flag_opacity);
        assert_eq!(InteractionState::default().flag_opacity(1, &s), 1.0);
    }

    #[test]
    fn retain_known_drops_stale_ids() {
        let state = InteractionState::default()
            .toggle_entity("a")
            .toggle_entity("gone")
            .hover_entity(Some("gone".into()));
        let next = state.apply(InteractionAction::RetainKnown(vec!["a".into(), "b".into()]));
        assert_eq!(next.selected_entities.len(), 1);
        assert!(next.is_selected("a"));
        assert_eq!(next.hovered_entity, None);
    }

    #[test]
    fn reducer_returns_same_rc_for_no_op() {
        let state = Rc::new(InteractionState::default().hover_category(Some(4)));
        let next = state.clone().reduce(InteractionAction::HoverCategory(Some(4)));
        assert!(Rc::ptr_eq(&state, &next));
        let moved = state.clone().reduce(InteractionAction::HoverCategory(Some(5)));
        assert!(!Rc::ptr_eq(&state, &moved));
    }

    #[test]
    fn phases_are_independent_flags() {
        let base = InteractionState::default();
        assert_eq!(base.hover_category(Some(1)).phase(), HoverPhase::CategoryHovered);
        assert_eq!(
            base.hover_entity(Some("a".into())).hover_category(Some(1)).phase(),
            HoverPhase::EntityAndCategoryHovered
        );
    }

    proptest! {
        #[test]
        fn toggle_is_self_inverse(
            initial in prop::collection::btree_set("[a-e]", 0..5),
            id in "[a-g]"
        ) {
            let state = InteractionState {
                selected_entities: initial.clone(),
                ..Default::default()
            };
            let twice = state.toggle_entity(&id).toggle_entity(&id);
            prop_assert_eq!(twice.selected_entities, initial);
        }
    }
}
