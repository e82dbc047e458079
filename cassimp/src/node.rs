//! Scene node representation and hierarchy

use std::borrow::Cow;
use std::fmt;

use crate::{
    ffi::{self, PtrArray},
    metadata::Metadata,
    sys,
    types::{FromSys, Matrix4x4, ai_string_to_str, ai_string_to_string},
};

/// A node in the scene hierarchy
#[derive(Clone, Copy)]
pub struct Node<'a> {
    raw: &'a sys::aiNode,
}

impl<'a> Node<'a> {
    pub(crate) fn new(raw: &'a sys::aiNode) -> Self {
        Self { raw }
    }

    /// The underlying `aiNode`
    pub fn as_raw(&self) -> *const sys::aiNode {
        self.raw
    }

    /// Get the name of the node
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Get the name of the node without allocating (lossy UTF-8)
    pub fn name_str(&self) -> Cow<'a, str> {
        ai_string_to_str(&self.raw.mName)
    }

    /// Transformation relative to the parent node
    pub fn transformation(&self) -> Matrix4x4 {
        Matrix4x4::from_sys(self.raw.mTransformation)
    }

    /// Transformation relative to the scene root, the product of every
    /// ancestor's transformation with this one
    pub fn global_transformation(&self) -> Matrix4x4 {
        let mut matrix = self.transformation();
        let mut current = self.parent();
        while let Some(node) = current {
            matrix = node.transformation() * matrix;
            current = node.parent();
        }
        matrix
    }

    /// Get the parent node; `None` for the root
    pub fn parent(&self) -> Option<Node<'a>> {
        unsafe { ffi::deref(self.raw.mParent) }.map(Node::new)
    }

    /// Get the number of child nodes
    pub fn num_children(&self) -> usize {
        if self.raw.mChildren.is_null() {
            0
        } else {
            self.raw.mNumChildren as usize
        }
    }

    fn children_raw(&self) -> PtrArray<'a, sys::aiNode> {
        unsafe { PtrArray::new(self.raw.mChildren, self.num_children()) }
    }

    /// Get a child node by index
    pub fn child(&self, index: usize) -> Option<Node<'a>> {
        self.children_raw().get(index).map(Node::new)
    }

    /// Iterate over the direct children
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'a>> + Clone + 'a {
        self.children_raw().map(Node::new)
    }

    /// Number of meshes attached to this node
    pub fn num_meshes(&self) -> usize {
        self.mesh_indices().len()
    }

    /// Indices into [`crate::Scene::meshes`] of the meshes this node draws
    pub fn mesh_indices(&self) -> &'a [u32] {
        unsafe { ffi::slice(self.raw.mMeshes, self.raw.mNumMeshes as usize) }
    }

    /// Per-node metadata, if any
    pub fn metadata(&self) -> Option<Metadata<'a>> {
        unsafe { ffi::deref(self.raw.mMetaData) }.map(Metadata::new)
    }

    /// Depth-first search of this subtree, including this node
    pub fn find_node(&self, name: &str) -> Option<Node<'a>> {
        if self.name_str() == name {
            return Some(*self);
        }
        self.children().find_map(|child| child.find_node(name))
    }

    /// Visit this node and every descendant in depth-first pre-order
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants { stack: vec![*self] }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} (meshes: {}, children: {})",
            "",
            self.name_str(),
            self.num_meshes(),
            self.num_children(),
            indent = depth * 2
        )?;
        for child in self.children() {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Prints the subtree rooted at this node, one indented line per node.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name_str())
            .field("meshes", &self.mesh_indices())
            .field("children", &self.num_children())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.raw, other.raw)
    }
}

impl Eq for Node<'_> {}

/// Depth-first pre-order walk returned by [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let first_pushed = self.stack.len();
        self.stack.extend(node.children());
        self.stack[first_pushed..].reverse();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::{PostProcessSteps, Scene};

    // Two named groups under the root, each with its own face.
    const TWO_OBJECTS: &[u8] = b"\
v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\n\
o first\nf 1 2 3\n\
o second\nf 1 3 4\n";

    fn scene() -> Scene {
        Scene::from_memory(TWO_OBJECTS, Some("obj"), PostProcessSteps::empty()).unwrap()
    }

    #[test]
    fn hierarchy_links_parents_and_children() {
        let scene = scene();
        let root = scene.root_node().unwrap();
        assert!(root.parent().is_none());
        assert_eq!(root.num_children(), 2);
        let first = root.child(0).unwrap();
        assert_eq!(first.name(), "first");
        assert_eq!(first.parent(), Some(root));
        assert!(root.child(2).is_none());
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn find_node_searches_depth_first() {
        let scene = scene();
        let second = scene.find_node("second").unwrap();
        assert_eq!(second.num_meshes(), 1);
        assert!(scene.find_node("third").is_none());
        let meshes: Vec<_> = scene.meshes_for_node(&second).collect();
        assert_eq!(meshes.len(), 1);
    }

    #[test]
    fn display_prints_indented_tree() {
        let scene = scene();
        let text = scene.root_node().unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("(meshes: 0, children: 2)"));
        assert_eq!(lines[1], "  first (meshes: 1, children: 0)");
        assert_eq!(lines[2], "  second (meshes: 1, children: 0)");
    }

    #[test]
    fn descendants_visit_in_pre_order() {
        let scene = scene();
        let names: Vec<String> = scene
            .root_node()
            .unwrap()
            .descendants()
            .skip(1)
            .map(|n| n.name())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }
}
