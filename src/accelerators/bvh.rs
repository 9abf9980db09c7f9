// std
use std::sync::Arc;
// others
use tracing::{debug, instrument};
use typed_arena::Arena;
// lineart
use crate::core::geometry::{bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::lineart::Float;
use crate::core::shape::{Hit, Shape};

pub const DEFAULT_MAX_PRIMS_IN_NODE: usize = 4;
const N_BUCKETS: usize = 12;

#[derive(Debug, Copy, Clone)]
struct BVHPrimitiveInfo {
    primitive_number: usize,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl BVHPrimitiveInfo {
    fn new(primitive_number: usize, bounds: Bounds3f) -> Self {
        BVHPrimitiveInfo {
            primitive_number,
            bounds,
            centroid: bounds.centroid(),
        }
    }
}

#[derive(Debug)]
struct BVHBuildNode<'a> {
    bounds: Bounds3f,
    children: Option<(&'a BVHBuildNode<'a>, &'a BVHBuildNode<'a>)>,
    split_axis: XYZEnum,
    first_prim_offset: usize,
    n_primitives: usize,
}

impl<'a> BVHBuildNode<'a> {
    fn leaf(first: usize, n: usize, bounds: Bounds3f) -> Self {
        BVHBuildNode {
            bounds,
            children: None,
            split_axis: XYZEnum::X,
            first_prim_offset: first,
            n_primitives: n,
        }
    }
    fn interior(axis: XYZEnum, c0: &'a BVHBuildNode<'a>, c1: &'a BVHBuildNode<'a>) -> Self {
        BVHBuildNode {
            bounds: bnd3_union_bnd3f(&c0.bounds, &c1.bounds),
            children: Some((c0, c1)),
            split_axis: axis,
            first_prim_offset: 0,
            n_primitives: 0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct BucketInfo {
    count: usize,
    bounds: Bounds3f,
}

#[derive(Debug, Copy, Clone)]
pub struct LinearBVHNode {
    pub bounds: Bounds3f,
    /// first primitive for a leaf, second child for an interior node
    offset: usize,
    n_primitives: usize,
    axis: XYZEnum,
}

/// Bounding volume hierarchy over shapes. Rays are tested against a
/// node's bounds before descending, so a query touches only a few
/// primitives instead of all of them.
#[derive(Debug)]
pub struct BVHAccel {
    max_prims_in_node: usize,
    pub primitives: Vec<Arc<dyn Shape>>,
    pub nodes: Vec<LinearBVHNode>,
}

impl BVHAccel {
    #[instrument(skip(p), fields(primitives = p.len()))]
    pub fn new(p: Vec<Arc<dyn Shape>>, max_prims_in_node: usize) -> Self {
        let mut bvh = BVHAccel {
            max_prims_in_node: max_prims_in_node.clamp(1, 255),
            primitives: Vec::new(),
            nodes: Vec::new(),
        };
        if p.is_empty() {
            return bvh;
        }
        let mut primitive_info: Vec<BVHPrimitiveInfo> = p
            .iter()
            .enumerate()
            .map(|(i, prim)| BVHPrimitiveInfo::new(i, prim.bounding_box()))
            .collect();
        let arena: Arena<BVHBuildNode> = Arena::with_capacity(2 * p.len());
        let mut total_nodes: usize = 0;
        let mut ordered_prims: Vec<Arc<dyn Shape>> = Vec::with_capacity(p.len());
        let n = primitive_info.len();
        let root = bvh.recursive_build(
            &arena,
            &p,
            &mut primitive_info,
            0,
            n,
            &mut total_nodes,
            &mut ordered_prims,
        );
        let mut nodes: Vec<Option<LinearBVHNode>> = vec![None; total_nodes];
        let mut offset: usize = 0;
        BVHAccel::flatten_bvh_tree(root, &mut nodes, &mut offset);
        bvh.nodes = nodes.into_iter().flatten().collect();
        assert_eq!(bvh.nodes.len(), total_nodes);
        bvh.primitives = ordered_prims;
        debug!(nodes = total_nodes, "built BVH");
        bvh
    }
    #[allow(clippy::too_many_arguments)]
    fn recursive_build<'a>(
        &self,
        arena: &'a Arena<BVHBuildNode<'a>>,
        primitives: &[Arc<dyn Shape>],
        primitive_info: &mut [BVHPrimitiveInfo],
        start: usize,
        end: usize,
        total_nodes: &mut usize,
        ordered_prims: &mut Vec<Arc<dyn Shape>>,
    ) -> &'a BVHBuildNode<'a> {
        assert_ne!(start, end);
        *total_nodes += 1;
        // compute bounds of all primitives in BVH node
        let bounds: Bounds3f = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::default(), |b, pi| bnd3_union_bnd3f(&b, &pi.bounds));
        let n_primitives: usize = end - start;
        let make_leaf = |ordered_prims: &mut Vec<Arc<dyn Shape>>| {
            let first_prim_offset: usize = ordered_prims.len();
            for pi in &primitive_info[start..end] {
                ordered_prims.push(primitives[pi.primitive_number].clone());
            }
            arena.alloc(BVHBuildNode::leaf(first_prim_offset, n_primitives, bounds))
        };
        if n_primitives == 1 {
            return make_leaf(ordered_prims);
        }
        // compute bound of primitive centroids, choose split dimension _dim_
        let centroid_bounds: Bounds3f = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::default(), |b, pi| bnd3_union_pnt3f(&b, &pi.centroid));
        let dim: XYZEnum = centroid_bounds.maximum_extent();
        if centroid_bounds.p_max[dim] == centroid_bounds.p_min[dim] {
            return make_leaf(ordered_prims);
        }
        // partition primitives into two sets and build children
        let mid: usize = if n_primitives <= 2 {
            equal_counts(&mut primitive_info[start..end], dim);
            (start + end) / 2
        } else {
            let bucket_of = |pi: &BVHPrimitiveInfo| -> usize {
                let b = (N_BUCKETS as Float * centroid_bounds.offset(&pi.centroid)[dim]) as usize;
                b.min(N_BUCKETS - 1)
            };
            // initialize _BucketInfo_ for SAH partition buckets
            let mut buckets: [BucketInfo; N_BUCKETS] = [BucketInfo::default(); N_BUCKETS];
            for pi in &primitive_info[start..end] {
                let b = bucket_of(pi);
                buckets[b].count += 1;
                buckets[b].bounds = bnd3_union_bnd3f(&buckets[b].bounds, &pi.bounds);
            }
            // compute costs for splitting after each bucket
            let mut cost: [Float; N_BUCKETS - 1] = [0.0; N_BUCKETS - 1];
            for (i, c) in cost.iter_mut().enumerate() {
                let (b0, count0) = buckets[..=i]
                    .iter()
                    .fold((Bounds3f::default(), 0_usize), |(b, n), bi| {
                        (bnd3_union_bnd3f(&b, &bi.bounds), n + bi.count)
                    });
                let (b1, count1) = buckets[i + 1..]
                    .iter()
                    .fold((Bounds3f::default(), 0_usize), |(b, n), bi| {
                        (bnd3_union_bnd3f(&b, &bi.bounds), n + bi.count)
                    });
                let area0 = if count0 > 0 { b0.surface_area() } else { 0.0 };
                let area1 = if count1 > 0 { b1.surface_area() } else { 0.0 };
                *c = 1.0
                    + (count0 as Float * area0 + count1 as Float * area1) / bounds.surface_area();
            }
            // find bucket to split at that minimizes SAH metric
            let (min_cost_split_bucket, min_cost) = cost
                .iter()
                .enumerate()
                .fold((0, cost[0]), |best, (i, &c)| if c < best.1 { (i, c) } else { best });
            // either create leaf or split primitives at selected SAH bucket
            let leaf_cost: Float = n_primitives as Float;
            if n_primitives <= self.max_prims_in_node && min_cost >= leaf_cost {
                return make_leaf(ordered_prims);
            }
            let left = partition(&mut primitive_info[start..end], |pi| {
                bucket_of(pi) <= min_cost_split_bucket
            });
            if left == 0 || left == n_primitives {
                equal_counts(&mut primitive_info[start..end], dim);
                (start + end) / 2
            } else {
                start + left
            }
        };
        let c0 = self.recursive_build(
            arena,
            primitives,
            primitive_info,
            start,
            mid,
            total_nodes,
            ordered_prims,
        );
        let c1 = self.recursive_build(
            arena,
            primitives,
            primitive_info,
            mid,
            end,
            total_nodes,
            ordered_prims,
        );
        arena.alloc(BVHBuildNode::interior(dim, c0, c1))
    }
    fn flatten_bvh_tree(
        node: &BVHBuildNode,
        nodes: &mut Vec<Option<LinearBVHNode>>,
        offset: &mut usize,
    ) -> usize {
        let my_offset: usize = *offset;
        *offset += 1;
        match node.children {
            None => {
                nodes[my_offset] = Some(LinearBVHNode {
                    bounds: node.bounds,
                    offset: node.first_prim_offset,
                    n_primitives: node.n_primitives,
                    axis: XYZEnum::X,
                });
            }
            Some((child1, child2)) => {
                // first child directly follows its parent
                BVHAccel::flatten_bvh_tree(child1, nodes, offset);
                let second = BVHAccel::flatten_bvh_tree(child2, nodes, offset);
                nodes[my_offset] = Some(LinearBVHNode {
                    bounds: node.bounds,
                    offset: second,
                    n_primitives: 0,
                    axis: node.split_axis,
                });
            }
        }
        my_offset
    }
    pub fn world_bound(&self) -> Bounds3f {
        match self.nodes.first() {
            Some(root) => root.bounds,
            None => Bounds3f::default(),
        }
    }
    /// Nearest hit over all primitives.
    pub fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let mut closest: Hit = Hit::none();
        if self.nodes.is_empty() {
            return closest;
        }
        let inv_dir: Vector3f = Vector3f::new(1.0, 1.0, 1.0) / ray.d;
        let dir_is_neg: [bool; 3] = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];
        // follow ray through BVH nodes to find primitive intersections
        let mut to_visit_offset: usize = 0;
        let mut current_node_index: usize = 0;
        let mut nodes_to_visit: [usize; 64] = [0_usize; 64];
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray, &inv_dir, &dir_is_neg, closest.t) {
                if node.n_primitives > 0 {
                    // intersect ray with primitives in leaf BVH node
                    for prim in &self.primitives[node.offset..node.offset + node.n_primitives] {
                        closest = closest.min(prim.intersect(ray));
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else {
                    // put far BVH node on _nodesToVisit_ stack,
                    // advance to near node
                    if dir_is_neg[node.axis as usize] {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.offset;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.offset;
                        current_node_index += 1;
                    }
                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
        closest
    }
}

/// Move every element satisfying *pred* to the front, returning how
/// many there are.
fn partition<F>(info: &mut [BVHPrimitiveInfo], pred: F) -> usize
where
    F: Fn(&BVHPrimitiveInfo) -> bool,
{
    let mut first: usize = 0;
    for i in 0..info.len() {
        if pred(&info[i]) {
            info.swap(first, i);
            first += 1;
        }
    }
    first
}

/// Order so that the lower half by centroid comes first.
fn equal_counts(info: &mut [BVHPrimitiveInfo], dim: XYZEnum) {
    let mid = info.len() / 2;
    info.select_nth_unstable_by(mid, |a, b| a.centroid[dim].total_cmp(&b.centroid[dim]));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::cube::AxisBox;
    use approx::assert_relative_eq;

    fn row_of_boxes(n: usize) -> Vec<Arc<dyn Shape>> {
        (0..n)
            .map(|i| {
                let x = i as Float * 2.0;
                Arc::new(AxisBox::new(
                    Point3f::new(x, 0.0, 0.0),
                    Point3f::new(x + 1.0, 1.0, 1.0),
                )) as Arc<dyn Shape>
            })
            .collect()
    }

    fn brute_force<'a>(shapes: &'a [Arc<dyn Shape>], ray: &Ray) -> Hit<'a> {
        shapes
            .iter()
            .fold(Hit::none(), |best, s| best.min(s.intersect(ray)))
    }

    #[test]
    fn empty_accelerator_never_hits() {
        let bvh = BVHAccel::new(Vec::new(), DEFAULT_MAX_PRIMS_IN_NODE);
        let ray = Ray::new(Point3f::default(), Vector3f::new(1.0, 0.0, 0.0));
        assert!(!bvh.intersect(&ray).ok());
        assert!(bvh.world_bound().is_empty());
    }

    #[test]
    fn bounds_cover_all_primitives() {
        let bvh = BVHAccel::new(row_of_boxes(10), DEFAULT_MAX_PRIMS_IN_NODE);
        assert_eq!(bvh.primitives.len(), 10);
        assert_eq!(bvh.world_bound().p_min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(bvh.world_bound().p_max, Point3f::new(19.0, 1.0, 1.0));
    }

    #[test]
    fn nearest_hit_matches_brute_force() {
        let shapes = row_of_boxes(17);
        for &max_prims in &[1, 2, DEFAULT_MAX_PRIMS_IN_NODE] {
            let bvh = BVHAccel::new(shapes.clone(), max_prims);
            for &(o, d) in &[
                ((-5.0, 0.5, 0.5), (1.0, 0.0, 0.0)),
                ((40.0, 0.5, 0.5), (-1.0, 0.0, 0.0)),
                ((8.5, 5.0, 0.5), (0.0, -1.0, 0.0)),
                ((9.5, 5.0, 0.5), (0.0, -1.0, 0.0)),
                ((-3.0, -1.0, 0.2), (1.0, 0.3, 0.1)),
            ] {
                let ray = Ray::new(Point3f::new(o.0, o.1, o.2), Vector3f::new(d.0, d.1, d.2));
                let expected = brute_force(&shapes, &ray);
                let hit = bvh.intersect(&ray);
                assert_eq!(hit.ok(), expected.ok(), "{:?} with {} per leaf", ray, max_prims);
                if hit.ok() {
                    assert_relative_eq!(hit.t, expected.t);
                }
            }
        }
    }

    #[test]
    fn hit_reports_the_leaf_primitive() {
        let shapes = row_of_boxes(5);
        let bvh = BVHAccel::new(shapes, 1);
        let ray = Ray::new(Point3f::new(4.5, 0.5, -2.0), Vector3f::new(0.0, 0.0, 1.0));
        let hit = bvh.intersect(&ray);
        assert_relative_eq!(hit.t, 2.0);
        let shape = hit.shape.expect("hit without shape");
        assert_eq!(shape.bounding_box().p_min, Point3f::new(4.0, 0.0, 0.0));
    }
}
