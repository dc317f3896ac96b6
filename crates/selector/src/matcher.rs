//! Depth-first, segment-by-segment execution of a parsed selector against
//! a document tree.
//!
//! Indexes are evaluated against the ordered subset of a concrete parent's
//! children that already satisfied the non-index part of the segment,
//! not against the raw children sequence. `Root` and `Group` nodes are
//! transparent containers: a segment that fails on them is retried against
//! their children even for single-level (`/`) descent.

use crate::ast::{Index, Segment, SegmentName, Selector};
use crate::error::SelectorError;
use trellis_dom::{Dom, NodeId, NodeKind};

/// Runs `selector` against `roots`, returning every matched node in
/// document order. Selection is read-only and deterministic: the same
/// selector against an unmodified tree yields the same node list.
pub fn select(dom: &Dom, roots: &[NodeId], selector: &Selector) -> Result<Vec<NodeId>, SelectorError> {
    if roots.is_empty() {
        return Err(SelectorError::EmptyInput);
    }
    let mut selected = Vec::new();
    for &root in roots {
        check_node(dom, selector, 0, root, &mut selected);
    }
    Ok(selected)
}

/// Convenience for the common single-starting-node case.
pub fn select_from(dom: &Dom, root: NodeId, selector: &Selector) -> Result<Vec<NodeId>, SelectorError> {
    select(dom, &[root], selector)
}

/// Returns true if this invocation added anything to `selected`.
fn check_node(
    dom: &Dom,
    selector: &Selector,
    segment_idx: usize,
    node: NodeId,
    selected: &mut Vec<NodeId>,
) -> bool {
    let segment = &selector.segments[segment_idx];

    if matches_segment(dom, segment, node) {
        return advance(dom, selector, segment_idx, node, selected);
    }
    // The node itself fails, but any-depth descent (and transparent
    // containers) retry the same segment one level down.
    if (segment.any_depth || is_transparent(dom.kind(node))) && !dom.children(node).is_empty() {
        return check_children(dom, selector, segment_idx, node, selected);
    }
    false
}

/// `node` satisfied the index-free part of segment `segment_idx`: emit it
/// if that segment was the last one, otherwise move its children on to
/// the next segment.
fn advance(
    dom: &Dom,
    selector: &Selector,
    segment_idx: usize,
    node: NodeId,
    selected: &mut Vec<NodeId>,
) -> bool {
    if segment_idx + 1 == selector.segments.len() {
        selected.push(node);
        return true;
    }
    if !dom.children(node).is_empty() {
        return check_children(dom, selector, segment_idx + 1, node, selected);
    }
    false
}

/// Applies the segment at `segment_idx` to the children of `parent`. The
/// segment's index filters only the children that satisfied the segment
/// right here; matches carried up from deeper any-depth descent pass
/// through untouched, their index already resolved at the level where
/// their own parent's children matched.
fn check_children(
    dom: &Dom,
    selector: &Selector,
    segment_idx: usize,
    parent: NodeId,
    selected: &mut Vec<NodeId>,
) -> bool {
    let segment = &selector.segments[segment_idx];

    // Per-child match lists in document order, tagged with whether the
    // child satisfied the segment directly at this level.
    let mut hits: Vec<(bool, Vec<NodeId>)> = Vec::new();
    for &child in dom.children(parent) {
        let mut child_selected = Vec::new();
        if matches_segment(dom, segment, child) {
            if advance(dom, selector, segment_idx, child, &mut child_selected) {
                hits.push((true, child_selected));
            }
        } else if (segment.any_depth || is_transparent(dom.kind(child)))
            && !dom.children(child).is_empty()
            && check_children(dom, selector, segment_idx, child, &mut child_selected)
        {
            hits.push((false, child_selected));
        }
    }

    if hits.is_empty() {
        return false;
    }

    let direct_count = hits.iter().filter(|(direct, _)| *direct).count();
    let (keep_all, keep_one) = match segment.index {
        None => (true, None),
        Some(Index::Last) => (false, direct_count.checked_sub(1)),
        // 1-based over the filtered subset.
        Some(Index::Position(position)) => (
            false,
            (position >= 1 && position <= direct_count).then(|| position - 1),
        ),
    };

    let before = selected.len();
    let mut direct_seen = 0;
    for (is_direct, child_selected) in hits {
        if is_direct {
            let keep = keep_all || keep_one == Some(direct_seen);
            direct_seen += 1;
            if !keep {
                continue;
            }
        }
        selected.extend(child_selected);
    }
    selected.len() > before
}

fn is_transparent(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Root { .. } | NodeKind::Group { .. })
}

/// The index-free part of segment matching: kind, name and attribute
/// predicates. Indexes are resolved by the parent level.
fn matches_segment(dom: &Dom, segment: &Segment, node: NodeId) -> bool {
    match &segment.name {
        SegmentName::Text => matches!(
            dom.kind(node),
            NodeKind::Text { .. } | NodeKind::Cdata { .. }
        ),
        SegmentName::Element(name) => {
            let Some(node_name) = dom.normalized_name(node) else {
                return false;
            };
            if node_name != name {
                return false;
            }
            segment.conditions.iter().all(|condition| {
                match &condition.value {
                    None => dom.has_attribute(node, &condition.name),
                    Some(expected) => {
                        dom.attribute_value(node, &condition.name) == Some(expected.as_str())
                    }
                }
            })
        }
    }
}
