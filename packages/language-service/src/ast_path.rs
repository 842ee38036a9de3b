//! AST Paths
//!
//! The chain of nodes from a root down to the innermost node containing a
//! position. Both the markup tree and the template tree are searched this
//! way; the head is outermost and the tail innermost.

use smallvec::SmallVec;

/// A node that can sit on a path. Nodes are compared by identity.
pub trait PathNode: Copy + PartialEq {
    type Kind: Copy + PartialEq;

    fn node_kind(&self) -> Self::Kind;
}

#[derive(Debug, Clone)]
pub struct AstPath<T> {
    path: SmallVec<[T; 8]>,
    pub position: usize,
}

impl<T: PathNode> AstPath<T> {
    pub fn new(position: usize) -> Self {
        AstPath {
            path: SmallVec::new(),
            position,
        }
    }

    pub fn push(&mut self, node: T) {
        self.path.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn head(&self) -> Option<T> {
        self.path.first().copied()
    }

    pub fn tail(&self) -> Option<T> {
        self.path.last().copied()
    }

    pub fn nodes(&self) -> &[T] {
        &self.path
    }

    fn index_of(&self, node: T) -> Option<usize> {
        self.path.iter().position(|candidate| *candidate == node)
    }

    /// The node directly enclosing `node`.
    pub fn parent_of(&self, node: T) -> Option<T> {
        let index = self.index_of(node)?;
        index.checked_sub(1).and_then(|i| self.path.get(i)).copied()
    }

    /// The node directly inside `node` on this path.
    pub fn child_of(&self, node: T) -> Option<T> {
        let index = self.index_of(node)?;
        self.path.get(index + 1).copied()
    }

    /// The innermost node of the given kind.
    pub fn first(&self, kind: T::Kind) -> Option<T> {
        self.path
            .iter()
            .rev()
            .find(|node| node.node_kind() == kind)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Node(u32, char);

    impl PathNode for Node {
        type Kind = char;

        fn node_kind(&self) -> char {
            self.1
        }
    }

    fn path() -> AstPath<Node> {
        let mut path = AstPath::new(7);
        for node in [Node(1, 'e'), Node(2, 't'), Node(3, 'e'), Node(4, 'a')] {
            path.push(node);
        }
        path
    }

    #[test]
    fn test_head_and_tail() {
        let path = path();
        assert_eq!(path.head(), Some(Node(1, 'e')));
        assert_eq!(path.tail(), Some(Node(4, 'a')));
        assert_eq!(path.len(), 4);
        assert_eq!(path.position, 7);
        assert!(AstPath::<Node>::new(0).tail().is_none());
    }

    #[test]
    fn test_parent_and_child() {
        let path = path();
        assert_eq!(path.parent_of(Node(3, 'e')), Some(Node(2, 't')));
        assert_eq!(path.parent_of(Node(1, 'e')), None);
        assert_eq!(path.child_of(Node(3, 'e')), Some(Node(4, 'a')));
        assert_eq!(path.child_of(Node(4, 'a')), None);
        assert_eq!(path.parent_of(Node(9, 'x')), None);
    }

    #[test]
    fn test_first_is_innermost() {
        let path = path();
        assert_eq!(path.first('e'), Some(Node(3, 'e')));
        assert_eq!(path.first('t'), Some(Node(2, 't')));
        assert_eq!(path.first('z'), None);
    }
}
