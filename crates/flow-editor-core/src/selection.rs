//! Selection mapper: edit event target range to structured selection.

use crate::event::EditEvent;
use crate::host::EditingHost;
use crate::input::InputType;
use crate::operation::FlowSelection;

/// Resolve the structured selection an edit event applies to.
///
/// Requires exactly one target range. Multi-range selections are not
/// supported and map to `None`, as does any range the host cannot map.
pub fn map_input_to_selection<H: EditingHost, B>(
    event: &EditEvent<H::Node, B>,
    host: &H,
) -> Option<FlowSelection> {
    let Some(range) = event.single_target_range() else {
        tracing::debug!(
            input_type = %event.input_type,
            ranges = event.target_ranges.len(),
            "expected exactly one target range"
        );
        return None;
    };

    let backward = event.input_type == InputType::DeleteContentBackward;
    let mapped = host.map_range_to_flow(range, backward);
    tracing::trace!(
        input_type = %event.input_type,
        backward,
        mapped = ?mapped,
        "mapped target range"
    );
    mapped.map(FlowSelection::new)
}
