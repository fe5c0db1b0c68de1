//! Recentering of freshly dropped nodes once the renderer measured them.

use log::{debug, info};

use pipecanvas_core::{geometry::Point, identifier::Id};

use crate::{renderer::LiveNodes, subscription::Delivery};

/// Builds the callback that moves `node_id` so `drop_point` becomes its centre.
///
/// The callback stays pending while the node has no dimensions. It finishes
/// without moving anything if the node was removed or no longer sits at
/// `drop_point`, which happens when a layout pass or the user placed it
/// before the first measurement. Otherwise it sets the position to
/// `drop_point - size / 2` and finishes.
pub fn recenter_on_measure(
    node_id: Id,
    drop_point: Point,
) -> impl FnMut(&mut dyn LiveNodes) -> Delivery + 'static {
    move |nodes: &mut dyn LiveNodes| {
        let Some(node) = nodes.find_node(&node_id) else {
            debug!(node = node_id.to_string(); "Dropped node is gone, nothing to recenter");
            return Delivery::Done;
        };
        let Some(size) = node.dimensions() else {
            return Delivery::Pending;
        };
        if node.position() != drop_point {
            debug!(
                node = node_id.to_string();
                "Dropped node was moved before it was measured, keeping its position"
            );
            return Delivery::Done;
        }

        let centered = drop_point.sub_point(size.half());
        nodes.update_node_position(&node_id, &mut |_| centered);
        info!(
            node = node_id.to_string(),
            x = centered.x(),
            y = centered.y();
            "Recentered dropped node"
        );
        Delivery::Done
    }
}
