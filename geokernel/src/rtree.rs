//! R-tree over bounding boxes, with Guttman's quadratic split.

use std::mem;

use crate::bounding_box::{BoundingBox, BoundingBoxRepresentable};

/// Maximum number of entries in a node.
pub const MAX_ENTRIES: usize = 9;
/// Minimum number of entries in a node produced by a split.
pub const MIN_ENTRIES: usize = 4;

/// Spatial index of items that have a bounding box.
///
/// Boxes are compared as is, so all the items of one tree (and the query boxes) are expected to be in the same
/// projection.
///
/// ```
/// use geokernel::{BoundingBox, Coordinate, RTree};
///
/// let tree: RTree<Coordinate> = (0..100).map(|i| Coordinate::planar(i as f64, 0.0)).collect();
/// let found = tree.search(&BoundingBox::new(9.5, -1.0, 12.0, 1.0, None));
/// assert_eq!(found.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RTree<T> {
    root: Node<T>,
    len: usize,
}

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf(Vec<LeafEntry<T>>),
    Internal(Vec<Branch<T>>),
}

#[derive(Debug, Clone)]
struct LeafEntry<T> {
    bbox: BoundingBox,
    item: T,
}

#[derive(Debug, Clone)]
struct Branch<T> {
    bbox: BoundingBox,
    node: Box<Node<T>>,
}

trait Entry {
    fn bbox(&self) -> &BoundingBox;
}

impl<T> Entry for LeafEntry<T> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl<T> Entry for Branch<T> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// One half of a split node.
struct Group<E> {
    entries: Vec<E>,
    bbox: BoundingBox,
}

impl<E: Entry> Group<E> {
    fn new(seed: E) -> Self {
        let bbox = *seed.bbox();
        Self {
            entries: vec![seed],
            bbox,
        }
    }

    fn push(&mut self, entry: E) {
        self.bbox = self.bbox.merge(entry.bbox());
        self.entries.push(entry);
    }
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: Node::Leaf(Vec::new()),
            len: 0,
        }
    }

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node levels, `1` for a tree consisting of a single leaf.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Node::Internal(branches) = node {
            let Some(branch) = branches.first() else {
                break;
            };
            node = branch.node.as_ref();
            height += 1;
        }

        height
    }

    /// Box enclosing all the items, `None` if the tree is empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.root.bounding_box()
    }

    /// All the items whose boxes intersect `bbox`. Touching boxes are included.
    pub fn search(&self, bbox: &BoundingBox) -> Vec<&T> {
        let mut found = Vec::new();
        let mut stack = vec![&self.root];

        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(entries) => found.extend(
                    entries
                        .iter()
                        .filter(|entry| entry.bbox.intersects(bbox))
                        .map(|entry| &entry.item),
                ),
                Node::Internal(branches) => stack.extend(
                    branches
                        .iter()
                        .filter(|branch| branch.bbox.intersects(bbox))
                        .map(|branch| branch.node.as_ref()),
                ),
            }
        }

        found
    }

    /// Iterates over all the items in no particular order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![&self.root],
            current: <&[LeafEntry<T>]>::default().iter(),
        }
    }
}

impl<T: BoundingBoxRepresentable> RTree<T> {
    /// Builds a tree by inserting all the items one by one.
    pub fn bulk_load(items: impl IntoIterator<Item = T>) -> Self {
        let mut tree = Self::new();
        for item in items {
            tree.insert(item);
        }

        tree
    }

    /// Inserts an item.
    ///
    /// The item goes into the leaf whose box needs the least enlargement to include it. Overflowing nodes are split in
    /// two with the quadratic algorithm, and the split propagates up to the root, growing the tree by one level.
    pub fn insert(&mut self, item: T) {
        let entry = LeafEntry {
            bbox: item.bounding_box(),
            item,
        };

        if let Some(sibling) = Self::insert_into(&mut self.root, entry) {
            let old_root = mem::replace(&mut self.root, Node::Internal(Vec::new()));
            let branches = [old_root, sibling]
                .into_iter()
                .filter_map(|node| {
                    Some(Branch {
                        bbox: node.bounding_box()?,
                        node: Box::new(node),
                    })
                })
                .collect();
            self.root = Node::Internal(branches);
        }

        self.len += 1;
    }

    /// Inserts the entry into the subtree. If the node overflows, it keeps one half of the entries and the other half
    /// is returned as a new sibling node.
    fn insert_into(node: &mut Node<T>, entry: LeafEntry<T>) -> Option<Node<T>> {
        match node {
            Node::Leaf(entries) => {
                entries.push(entry);
                if entries.len() <= MAX_ENTRIES {
                    return None;
                }

                let (keep, moved) = quadratic_split(mem::take(entries));
                *entries = keep.entries;
                Some(Node::Leaf(moved.entries))
            }
            Node::Internal(branches) => {
                let index = choose_subtree(branches, &entry.bbox);
                let branch = &mut branches[index];
                branch.bbox = branch.bbox.merge(&entry.bbox);

                let sibling = Self::insert_into(&mut branch.node, entry)?;
                if let Some(bbox) = branch.node.bounding_box() {
                    branch.bbox = bbox;
                }
                if let Some(bbox) = sibling.bounding_box() {
                    branches.push(Branch {
                        bbox,
                        node: Box::new(sibling),
                    });
                }

                if branches.len() <= MAX_ENTRIES {
                    return None;
                }

                let (keep, moved) = quadratic_split(mem::take(branches));
                *branches = keep.entries;
                Some(Node::Internal(moved.entries))
            }
        }
    }
}

impl<T> Node<T> {
    fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Node::Leaf(entries) => union(entries),
            Node::Internal(branches) => union(branches),
        }
    }
}

fn union<E: Entry>(entries: &[E]) -> Option<BoundingBox> {
    let (first, rest) = entries.split_first()?;
    Some(rest.iter().fold(*first.bbox(), |bbox, e| bbox.merge(e.bbox())))
}

/// Index of the branch that needs the least enlargement to include `bbox`. Ties are resolved by the smaller area.
fn choose_subtree<T>(branches: &[Branch<T>], bbox: &BoundingBox) -> usize {
    let mut best = 0;
    let mut best_enlargement = f64::INFINITY;
    let mut best_area = f64::INFINITY;

    for (index, branch) in branches.iter().enumerate() {
        let enlargement = branch.bbox.enlargement(bbox);
        let area = branch.bbox.area();
        if enlargement < best_enlargement || (enlargement == best_enlargement && area < best_area) {
            best = index;
            best_enlargement = enlargement;
            best_area = area;
        }
    }

    best
}

/// The pair of entries that would waste the most area if put into the same node.
fn pick_seeds<E: Entry>(entries: &[E]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;

    for i in 0..entries.len() {
        for j in i + 1..entries.len() {
            let a = entries[i].bbox();
            let b = entries[j].bbox();
            let waste = a.merge(b).area() - a.area() - b.area();
            if waste > max_waste {
                max_waste = waste;
                seeds = (i, j);
            }
        }
    }

    seeds
}

/// Splits an overflowing set of entries into two groups of at least [`MIN_ENTRIES`] each.
fn quadratic_split<E: Entry>(mut entries: Vec<E>) -> (Group<E>, Group<E>) {
    let (first_seed, second_seed) = pick_seeds(&entries);
    // first_seed < second_seed, so removing the second one first keeps the first index valid
    let second = entries.swap_remove(second_seed);
    let first = entries.swap_remove(first_seed);

    let mut groups = (Group::new(first), Group::new(second));

    while !entries.is_empty() {
        if groups.0.entries.len() + entries.len() <= MIN_ENTRIES {
            entries.drain(..).for_each(|e| groups.0.push(e));
            break;
        }
        if groups.1.entries.len() + entries.len() <= MIN_ENTRIES {
            entries.drain(..).for_each(|e| groups.1.push(e));
            break;
        }

        let Some((index, d1, d2)) = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                (
                    i,
                    groups.0.bbox.enlargement(e.bbox()),
                    groups.1.bbox.enlargement(e.bbox()),
                )
            })
            .max_by(|a, b| (a.1 - a.2).abs().total_cmp(&(b.1 - b.2).abs()))
        else {
            break;
        };

        let entry = entries.swap_remove(index);
        let to_first = if d1 != d2 {
            d1 < d2
        } else if groups.0.bbox.area() != groups.1.bbox.area() {
            groups.0.bbox.area() < groups.1.bbox.area()
        } else {
            groups.0.entries.len() <= groups.1.entries.len()
        };

        if to_first {
            groups.0.push(entry);
        } else {
            groups.1.push(entry);
        }
    }

    groups
}

impl<T: BoundingBoxRepresentable> FromIterator<T> for RTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::bulk_load(iter)
    }
}

impl<T: BoundingBoxRepresentable> Extend<T> for RTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

/// Iterator over the items of an [`RTree`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    current: std::slice::Iter<'a, LeafEntry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(&entry.item);
            }

            match self.stack.pop()? {
                Node::Leaf(entries) => self.current = entries.iter(),
                Node::Internal(branches) => self
                    .stack
                    .extend(branches.iter().map(|branch| branch.node.as_ref())),
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a RTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::projection::Projection;

    fn grid(size: usize) -> Vec<BoundingBox> {
        (0..size * size)
            .map(|i| {
                let x = (i % size) as f64;
                let y = (i / size) as f64;
                BoundingBox::new(x, y, x + 0.5, y + 0.5, None)
            })
            .collect()
    }

    fn check_node<T>(node: &Node<T>, is_root: bool) -> usize {
        match node {
            Node::Leaf(entries) => {
                assert!(entries.len() <= MAX_ENTRIES);
                assert!(is_root || entries.len() >= MIN_ENTRIES);
                1
            }
            Node::Internal(branches) => {
                assert!(branches.len() <= MAX_ENTRIES);
                assert!(is_root || branches.len() >= MIN_ENTRIES);

                let depths: Vec<usize> = branches
                    .iter()
                    .map(|branch| {
                        let child_bbox = branch.node.bounding_box().unwrap();
                        assert_eq!(branch.bbox, child_bbox);
                        check_node(&branch.node, false)
                    })
                    .collect();
                assert!(depths.windows(2).all(|d| d[0] == d[1]));
                depths[0] + 1
            }
        }
    }

    #[test]
    fn empty_tree() {
        let tree: RTree<BoundingBox> = RTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.bounding_box(), None);
        assert!(tree.search(&BoundingBox::new(0.0, 0.0, 1.0, 1.0, None)).is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn structure_after_inserts() {
        let tree: RTree<BoundingBox> = grid(20).into_iter().collect();
        assert_eq!(tree.len(), 400);
        assert!(tree.height() > 2);
        assert_eq!(check_node(&tree.root, true), tree.height());
        assert_eq!(
            tree.bounding_box(),
            Some(BoundingBox::new(0.0, 0.0, 19.5, 19.5, None))
        );
        assert_eq!(tree.iter().count(), 400);
    }

    #[test]
    fn search_matches_linear_scan() {
        let boxes = grid(15);
        let tree = RTree::bulk_load(boxes.clone());

        for query in [
            BoundingBox::new(2.2, 3.1, 5.7, 4.0, None),
            BoundingBox::new(-10.0, -10.0, 0.2, 0.2, None),
            BoundingBox::new(100.0, 100.0, 101.0, 101.0, None),
            BoundingBox::new(-1.0, -1.0, 20.0, 20.0, None),
            BoundingBox::new(7.5, 7.5, 7.5, 7.5, None),
        ] {
            let mut found: Vec<BoundingBox> = tree.search(&query).into_iter().copied().collect();
            let mut expected: Vec<BoundingBox> =
                boxes.iter().filter(|b| b.intersects(&query)).copied().collect();

            let key = |b: &BoundingBox| (b.x_min() as i64, b.y_min() as i64);
            found.sort_by_key(key);
            expected.sort_by_key(key);
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn coordinates_as_items() {
        let mut tree = RTree::new();
        tree.extend((0..50).map(|i| Coordinate::latlon(i as f64, i as f64)));

        let query = BoundingBox::new(9.5, 9.5, 12.0, 12.0, Some(Projection::Epsg4326));
        let mut found: Vec<f64> = tree.search(&query).iter().map(|c| c.y()).collect();
        found.sort_by(f64::total_cmp);
        assert_eq!(found, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn quadratic_split_respects_min_fill() {
        let entries: Vec<LeafEntry<()>> = (0..=MAX_ENTRIES)
            .map(|i| LeafEntry {
                bbox: BoundingBox::new(i as f64, 0.0, i as f64 + 1.0, 1.0, None),
                item: (),
            })
            .collect();

        let (a, b) = quadratic_split(entries);
        assert_eq!(a.entries.len() + b.entries.len(), MAX_ENTRIES + 1);
        assert!(a.entries.len() >= MIN_ENTRIES);
        assert!(b.entries.len() >= MIN_ENTRIES);
    }
}
