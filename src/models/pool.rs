use crate::models::vdev::{DeviceKind, DeviceState};
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::Serialize;

/// Index of a node inside its owning [`DeviceTree`]. Only the tree hands
/// these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

/// One line of the config section: a leaf device or a grouping vdev.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceNode {
    pub name:            String,
    pub kind:            DeviceKind,
    pub state:           DeviceState,
    pub read_errors:     u64,
    pub write_errors:    u64,
    pub checksum_errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message:         Option<String>,
    #[serde(skip)]
    pub parent:          Option<NodeId>,
    #[serde(skip)]
    pub children:        Vec<NodeId>,
}

impl DeviceNode {
    pub fn new(name: impl Into<String>, state: DeviceState) -> Self {
        let name = name.into();
        Self {
            kind: DeviceKind::classify(&name),
            name,
            state,
            read_errors:     0,
            write_errors:    0,
            checksum_errors: 0,
            message:         None,
            parent:          None,
            children:        Vec::new(),
        }
    }

    pub fn total_errors(&self) -> u64 {
        self.read_errors
            .saturating_add(self.write_errors)
            .saturating_add(self.checksum_errors)
    }
}

/// Arena holding the vdev hierarchy of one pool.
///
/// Nodes own nothing; parent and child links are [`NodeId`]s into `nodes`.
/// `roots` lists the top-level vdevs in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceTree {
    nodes: Vec<DeviceNode>,
    roots: Vec<NodeId>,
}

impl DeviceTree {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn roots(&self) -> &[NodeId] { &self.roots }

    /// Panics when `id` came from another tree and is out of range; see [`Self::get`].
    pub fn node(&self, id: NodeId) -> &DeviceNode { &self.nodes[id.0] }

    /// Non-panicking lookup.
    pub fn get(&self, id: NodeId) -> Option<&DeviceNode> { self.nodes.get(id.0) }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.node(id).parent }

    pub fn children(&self, id: NodeId) -> &[NodeId] { &self.node(id).children }

    /// Append a top-level vdev.
    pub fn push_root(&mut self, mut node: DeviceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Append `node` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, mut node: DeviceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Roots are depth 1, matching the config section's indentation levels.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count() + 1
    }

    /// Parent, grandparent, ... up to the owning root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    /// Pre-order traversal yielding `(id, depth)`.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out   = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|r| (*r, 1)).collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for child in self.children(id).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// First node in pre-order with this exact name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.walk().into_iter().map(|(id, _)| id).find(|id| self.node(*id).name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DeviceNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    fn view(&self, id: NodeId) -> NodeView<'_> { NodeView { tree: self, id } }
}

struct NodeView<'a> {
    tree: &'a DeviceTree,
    id:   NodeId,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.tree.node(self.id);
        let mut s = serializer.serialize_struct("DeviceNode", 8)?;
        s.serialize_field("name", &node.name)?;
        s.serialize_field("kind", &node.kind)?;
        s.serialize_field("state", &node.state)?;
        s.serialize_field("read_errors", &node.read_errors)?;
        s.serialize_field("write_errors", &node.write_errors)?;
        s.serialize_field("checksum_errors", &node.checksum_errors)?;
        match &node.message {
            Some(m) => s.serialize_field("message", m)?,
            None    => s.skip_field("message")?,
        }
        let children: Vec<NodeView<'_>> = node.children.iter().map(|c| self.tree.view(*c)).collect();
        s.serialize_field("children", &children)?;
        s.end()
    }
}

// Nested, tree-shaped encoding: a list of roots each carrying its children.
impl Serialize for DeviceTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.roots.len()))?;
        for root in &self.roots {
            seq.serialize_element(&self.view(*root))?;
        }
        seq.end()
    }
}

/// One parsed `zpool status` report.
///
/// The byte quantities and ratios are not part of the status text; they stay
/// `None` until [`PoolStatus::apply_summary`] copies them from a list row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolStatus {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size:                  Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated:             Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free:                  Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragmentation_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_percent:      Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_ratio:           Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health:                Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_root:              Option<String>,

    pub state:  String,
    pub status: String,
    pub action: String,
    pub see:    String,
    pub scrub:  String,
    pub errors: String,

    // Aggregate counters from the pool's own line in the config section.
    pub read_errors:     u64,
    pub write_errors:    u64,
    pub checksum_errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message:         Option<String>,

    pub devices: DeviceTree,
    pub spares:  Vec<DeviceNode>,
}

impl PoolStatus {
    pub fn state_kind(&self) -> DeviceState { DeviceState::classify(&self.state) }

    /// Overwrite the summary figures with the list row's values; the list is authoritative.
    pub fn apply_summary(&mut self, row: &ListRow) {
        self.size                  = Some(row.size);
        self.allocated             = Some(row.allocated);
        self.free                  = Some(row.free);
        self.fragmentation_percent = Some(row.fragmentation_percent);
        self.capacity_percent      = Some(row.capacity_percent);
        self.dedup_ratio           = Some(row.dedup_ratio);
        self.health                = Some(row.health.clone());
        self.alt_root              = Some(row.alt_root.clone());
    }

    /// Allocated share of the pool, when both figures are known.
    pub fn use_pct(&self) -> Option<f64> {
        match (self.size, self.allocated) {
            (Some(0), _)            => Some(0.0),
            (Some(size), Some(alloc)) => Some(alloc as f64 / size as f64 * 100.0),
            _                       => None,
        }
    }

    /// Pool counters plus every device in the tree. Spares are excluded.
    pub fn total_errors(&self) -> u64 {
        let pool = self.read_errors
            .saturating_add(self.write_errors)
            .saturating_add(self.checksum_errors);
        self.devices
            .iter()
            .fold(pool, |acc, (_, n)| acc.saturating_add(n.total_errors()))
    }

    /// Short label for the scrub/scan line, e.g. `"scrubbing 66.7%"`.
    pub fn scrub_summary(&self) -> String {
        crate::parse::status::summarize_scan(&self.scrub)
    }
}

/// One row of `zpool list -Hp -o name,size,allocated,free,fragmentation,capacity,dedupratio,health,altroot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub name:                  String,
    pub size:                  u64,
    pub allocated:             u64,
    pub free:                  u64,
    pub fragmentation_percent: f64,
    /// Aliases `dedup_ratio` unless `list.capacity_from_dedup` is off.
    pub capacity_percent:      f64,
    pub dedup_ratio:           f64,
    pub health:                String,
    pub alt_root:              String,
}

impl ListRow {
    pub fn use_pct(&self) -> f64 {
        if self.size == 0 { return 0.0; }
        self.allocated as f64 / self.size as f64 * 100.0
    }

    pub fn is_healthy(&self) -> bool { self.health == "ONLINE" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(name: &str) -> DeviceNode { DeviceNode::new(name, DeviceState::Online) }

    fn sample_tree() -> (DeviceTree, NodeId, NodeId, NodeId) {
        let mut tree = DeviceTree::new();
        let mirror = tree.push_root(dev("mirror-0"));
        tree.push_child(mirror, dev("sda"));
        let spare = tree.push_child(mirror, dev("spare-1"));
        let leaf = tree.push_child(spare, dev("sdc"));
        tree.push_root(dev("mirror-1"));
        (tree, mirror, spare, leaf)
    }

    #[test]
    fn foreign_id_lookup_is_none() {
        let (big, _, _, leaf) = sample_tree();
        let mut small = DeviceTree::new();
        small.push_root(dev("sda"));
        assert!(big.get(leaf).is_some());
        assert!(small.get(leaf).is_none());
    }

    #[test]
    fn links_and_depths() {
        let (tree, mirror, spare, leaf) = sample_tree();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.parent(leaf), Some(spare));
        assert_eq!(tree.parent(spare), Some(mirror));
        assert_eq!(tree.parent(mirror), None);
        assert_eq!(tree.depth(leaf), 3);
        assert_eq!(tree.ancestors(leaf).collect::<Vec<_>>(), vec![spare, mirror]);
    }

    #[test]
    fn walk_is_preorder() {
        let (tree, ..) = sample_tree();
        let names: Vec<(&str, usize)> = tree.walk()
            .into_iter()
            .map(|(id, d)| (tree.node(id).name.as_str(), d))
            .collect();
        assert_eq!(names, vec![
            ("mirror-0", 1), ("sda", 2), ("spare-1", 2), ("sdc", 3), ("mirror-1", 1),
        ]);
        assert_eq!(tree.find("sdc").map(|id| tree.depth(id)), Some(3));
        assert_eq!(tree.find("nope"), None);
    }

    #[test]
    fn tree_serializes_nested() {
        let (tree, ..) = sample_tree();
        let v = serde_json::to_value(&tree).unwrap();
        assert_eq!(v[0]["name"], "mirror-0");
        assert_eq!(v[0]["kind"], "mirror");
        assert_eq!(v[0]["children"][1]["kind"], "spare");
        assert_eq!(v[0]["children"][1]["children"][0]["name"], "sdc");
        assert_eq!(v[1]["children"].as_array().map(|a| a.len()), Some(0));
        assert!(v[0].get("message").is_none());
    }

    #[test]
    fn summary_overwrites_existing_values() {
        let mut status = PoolStatus { name: "tank".into(), size: Some(1), health: Some("OLD".into()), ..Default::default() };
        let row = ListRow {
            name: "tank".into(), size: 100, allocated: 25, free: 75,
            fragmentation_percent: 3.0, capacity_percent: 1.0, dedup_ratio: 1.0,
            health: "ONLINE".into(), alt_root: "-".into(),
        };
        status.apply_summary(&row);
        assert_eq!(status.size, Some(100));
        assert_eq!(status.health.as_deref(), Some("ONLINE"));
        assert_eq!(status.use_pct(), Some(25.0));
    }

    #[test]
    fn total_errors_sums_pool_and_devices() {
        let (mut tree, mirror, ..) = sample_tree();
        let mut bad = dev("sdz");
        bad.checksum_errors = 4;
        tree.push_child(mirror, bad);
        let status = PoolStatus { read_errors: 1, devices: tree, ..Default::default() };
        assert_eq!(status.total_errors(), 5);
    }
}
