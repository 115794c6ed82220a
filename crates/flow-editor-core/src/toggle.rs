//! Style toggling for `format*` input events.

use crate::event::EditEvent;
use crate::handlers::HandlerOutcome;
use crate::host::EditingHost;
use crate::model::{EditorState, FlowContent, StyleKey, Theme};
use crate::operation::FlowOperation;
use crate::registry::InputHandler;
use crate::selection::map_input_to_selection;
use crate::types::FlowRange;

/// Effective value of one style key across a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleState {
    Uniform(bool),
    /// Both values occur; `dominant` covers more positions (ties go to off).
    Mixed { dominant: bool },
}

impl StyleState {
    /// The value most of the range has.
    pub fn dominant(&self) -> bool {
        match *self {
            StyleState::Uniform(value) => value,
            StyleState::Mixed { dominant } => dominant,
        }
    }
}

/// Handler flipping `key`.
pub fn toggle_style(key: StyleKey) -> InputHandler {
    InputHandler::ToggleStyle(key)
}

/// Weigh the effective value of `key` over `range`.
///
/// Text counts by overlapping characters, line breaks and images count once,
/// paragraph breaks are ignored. `None` when nothing styled is in range.
pub fn effective_style(
    content: &FlowContent,
    range: FlowRange,
    key: StyleKey,
    theme: &Theme,
) -> Option<StyleState> {
    let (mut on, mut off) = (0usize, 0usize);
    for (style, weight) in content.styled_spans(range.to_range()) {
        if style.resolve(key, theme) {
            on += weight;
        } else {
            off += weight;
        }
    }
    match (on, off) {
        (0, 0) => None,
        (_, 0) => Some(StyleState::Uniform(true)),
        (0, _) => Some(StyleState::Uniform(false)),
        (on, off) => Some(StyleState::Mixed { dominant: on > off }),
    }
}

/// Run the toggle for `key` against the event's target range.
///
/// A caret flips the key on the caret style and hands back the new state; a
/// selection sets the opposite of its dominant value everywhere in range.
pub fn toggle_style_outcome<H: EditingHost, B>(
    key: StyleKey,
    event: &EditEvent<H::Node, B>,
    host: &H,
    state: &EditorState,
) -> HandlerOutcome<H::Node> {
    let Some(selection) = map_input_to_selection(event, host) else {
        return HandlerOutcome::Noop;
    };
    let range = selection.range();

    if range.is_collapsed() {
        let value = !state.caret.resolve(key, &state.theme);
        tracing::debug!(key = key.as_str(), value, "toggling caret style");
        let caret = state.caret.clone().with(key, value);
        return HandlerOutcome::State(state.clone().with_caret(caret));
    }

    if range.end() > state.content.len() {
        tracing::warn!(end = range.end(), len = state.content.len(), "toggle range outside document");
        return HandlerOutcome::Noop;
    }

    match effective_style(&state.content, range, key, &state.theme) {
        Some(current) => {
            tracing::debug!(key = key.as_str(), ?current, "toggling range style");
            HandlerOutcome::Operation(FlowOperation::Format {
                start: range.start(),
                end: range.end(),
                key,
                value: !current.dominant(),
            })
        }
        None => HandlerOutcome::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::event::TargetRange;
    use crate::model::{FlowNode, TextStyle};
    use crate::testing::{FakeHost, ROOT, TEXT_A, TEXT_B};

    type Event = EditEvent<u32, ()>;

    fn bold() -> TextStyle {
        TextStyle::default().with(StyleKey::Bold, true)
    }

    fn format_bold(range: TargetRange<u32>) -> Event {
        Event::new("formatBold").with_range(range)
    }

    #[test]
    fn test_effective_style_weighs_spans() {
        let content = FlowContent::new(vec![
            FlowNode::text("abc", bold()),
            FlowNode::text("de", TextStyle::default()),
        ]);
        let theme = Theme::default();
        let key = StyleKey::Bold;

        assert_eq!(
            effective_style(&content, FlowRange::new(0, 3), key, &theme),
            Some(StyleState::Uniform(true))
        );
        assert_eq!(
            effective_style(&content, FlowRange::new(0, 5), key, &theme),
            Some(StyleState::Mixed { dominant: true })
        );
        assert_eq!(
            effective_style(&content, FlowRange::new(1, 5), key, &theme),
            Some(StyleState::Mixed { dominant: false })
        );
        assert_eq!(
            effective_style(&content, FlowRange::new(2, 5), key, &theme),
            Some(StyleState::Mixed { dominant: false })
        );
    }

    #[test]
    fn test_effective_style_uses_theme() {
        let content = FlowContent::new(vec![FlowNode::text("abc", TextStyle::default())]);
        let theme = Theme { text: bold() };
        assert_eq!(
            effective_style(&content, FlowRange::new(0, 3), StyleKey::Bold, &theme),
            Some(StyleState::Uniform(true))
        );
    }

    #[test]
    fn test_effective_style_ignores_paragraph_breaks() {
        let content = FlowContent::new(vec![FlowNode::ParagraphBreak {
            style: Default::default(),
        }]);
        assert_eq!(
            effective_style(&content, FlowRange::new(0, 1), StyleKey::Bold, &Theme::default()),
            None
        );
    }

    #[test]
    fn test_toggle_selection_sets_opposite_of_dominant() {
        let host = FakeHost::hello_world();
        let state = host.state();

        // "o " plain + "wor" bold: bold dominates, so clear it.
        let outcome = toggle_style_outcome(
            StyleKey::Bold,
            &format_bold(TargetRange::new(TEXT_A, 4, TEXT_B, 3)),
            &host,
            &state,
        );
        match outcome {
            HandlerOutcome::Operation(op) => assert_eq!(
                op,
                FlowOperation::Format {
                    start: 4,
                    end: 9,
                    key: StyleKey::Bold,
                    value: false,
                }
            ),
            other => panic!("expected operation, got {other:?}"),
        }

        // Plain text only: turn it on.
        let outcome = toggle_style_outcome(
            StyleKey::Bold,
            &format_bold(TargetRange::new(TEXT_A, 0, TEXT_A, 5)),
            &host,
            &state,
        );
        assert!(matches!(
            outcome,
            HandlerOutcome::Operation(FlowOperation::Format { value: true, .. })
        ));
    }

    #[test]
    fn test_toggle_caret_flips_caret_style() {
        let host = FakeHost::hello_world();
        let state = host.state();
        let event = format_bold(TargetRange::caret(TEXT_A, 2));

        let on = match toggle_style_outcome(StyleKey::Bold, &event, &host, &state) {
            HandlerOutcome::State(next) => next,
            other => panic!("expected state, got {other:?}"),
        };
        assert_eq!(on.caret, bold());
        assert_eq!(on.content, state.content);

        let off = match toggle_style_outcome(StyleKey::Bold, &event, &host, &on) {
            HandlerOutcome::State(next) => next,
            other => panic!("expected state, got {other:?}"),
        };
        assert_eq!(off.caret.get(StyleKey::Bold), Some(false));
    }

    #[test]
    fn test_toggle_only_paragraph_break_is_noop() {
        let host = FakeHost::hello_world();
        let state = host.state();
        let event = format_bold(TargetRange::new(ROOT, 2, ROOT, 3));
        assert!(matches!(
            toggle_style_outcome(StyleKey::Bold, &event, &host, &state),
            HandlerOutcome::Noop
        ));
    }
}
