//! Selection trees built by generated projection types.
//!
//! Every generated projection wraps a [`ProjectionNode`]. Calling an accessor
//! on the projection records the field in the node. Composite accessors
//! record a fresh sub-projection for the field's object type and hand back
//! that recorded instance, so selections made through it, during the
//! configuration callback or afterwards, land in the parent's tree.
//!
//! # Example
//!
//! ```ignore
//! let mut query = QueryProjection::default();
//! let person = query.people(|person| {
//!     person.firstname();
//! });
//! person.lastname();
//!
//! assert_eq!(query.selection(), "people { firstname lastname }");
//! ```

use std::any::Any;
use std::fmt;

/// An ordered set of selected fields, each optionally carrying a nested
/// projection for object-typed fields.
#[derive(Debug, Default)]
pub struct ProjectionNode {
    fields: Vec<(String, Option<Box<dyn NestedProjection>>)>,
}

impl ProjectionNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a scalar field.
    pub fn select(&mut self, field: &str) {
        *self.slot(field) = None;
    }

    /// Select an object field, recording a new `P` as its sub-selection.
    ///
    /// Returns the recorded projection itself; anything selected on it
    /// shows up in this node's selection.
    pub fn select_nested<P>(&mut self, field: &str) -> &mut P
    where
        P: NestedProjection + Default + 'static,
    {
        let nested = self.slot(field).insert(Box::new(P::default()));
        nested
            .as_any_mut()
            .downcast_mut::<P>()
            .expect("nested projection was recorded with this type")
    }

    /// Selecting a field twice replaces the earlier entry but keeps its position.
    fn slot(&mut self, field: &str) -> &mut Option<Box<dyn NestedProjection>> {
        let index = match self.fields.iter().position(|(name, _)| name == field) {
            Some(index) => index,
            None => {
                self.fields.push((field.to_string(), None));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    /// Look up the entry recorded for `field`.
    ///
    /// `Some(None)` means the field is selected without a sub-selection.
    pub fn get(&self, field: &str) -> Option<Option<&ProjectionNode>> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, nested)| nested.as_deref().map(|n| n.node()))
    }

    /// Selected field names, in selection order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Render the GraphQL selection string for this node.
    ///
    /// Nested nodes render as `field { ... }`. A nested node with nothing
    /// selected renders as a bare field name.
    pub fn selection(&self) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(name, nested)| match nested.as_deref().map(|n| n.node()) {
                Some(node) if !node.is_empty() => format!("{} {{ {} }}", name, node.selection()),
                _ => name.clone(),
            })
            .collect();
        parts.join(" ")
    }
}

impl Clone for ProjectionNode {
    fn clone(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, nested)| (name.clone(), nested.as_ref().map(|n| n.clone_box())))
                .collect(),
        }
    }
}

impl PartialEq for ProjectionNode {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|((a, x), (b, y))| {
                    a == b && x.as_deref().map(|n| n.node()) == y.as_deref().map(|n| n.node())
                })
    }
}

impl Eq for ProjectionNode {}

/// An untyped node can stand in as its own projection.
impl Projection for ProjectionNode {
    fn node(&self) -> &ProjectionNode {
        self
    }
}

/// The abstract root every generated projection implements.
pub trait Projection {
    /// The selection recorded so far.
    fn node(&self) -> &ProjectionNode;

    /// Return the GraphQL field selection string for this projection.
    fn selection(&self) -> String {
        self.node().selection()
    }
}

/// Marker for generated projection types that act as a builder scope.
///
/// Only projections carrying this marker can start a query, so a stray
/// [`ProjectionNode`] cannot be passed where a generated root is expected.
pub trait ProjectionScope: Projection {}

/// A projection stored inside its parent's node.
///
/// Implemented for every cloneable projection; generated types get it for free.
pub trait NestedProjection: Projection + fmt::Debug {
    fn clone_box(&self) -> Box<dyn NestedProjection>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<P> NestedProjection for P
where
    P: Projection + Clone + fmt::Debug + 'static,
{
    fn clone_box(&self) -> Box<dyn NestedProjection> {
        Box::new(self.clone())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_node_renders_empty_selection() {
        let node = ProjectionNode::new();
        assert!(node.is_empty());
        assert_eq!(node.selection(), "");
    }

    #[test]
    fn flat_selection_keeps_order() {
        let mut node = ProjectionNode::new();
        node.select("firstname");
        node.select("lastname");
        assert_eq!(node.selection(), "firstname lastname");
        let names: Vec<&str> = node.field_names().collect();
        assert_eq!(names, vec!["firstname", "lastname"]);
    }

    #[test]
    fn nested_selection() {
        let mut person = ProjectionNode::new();
        person.select("firstname");
        let address = person.select_nested::<ProjectionNode>("address");
        address.select("street");
        address.select("house");

        assert_eq!(person.selection(), "firstname address { street house }");
    }

    #[test]
    fn returned_nested_projection_stays_recorded() {
        let mut person = ProjectionNode::new();
        let address = person.select_nested::<ProjectionNode>("address");
        address.select("street");
        let country = address.select_nested::<ProjectionNode>("country");
        country.select("code");

        assert_eq!(person.selection(), "address { street country { code } }");
    }

    #[test]
    fn reselecting_replaces_in_place() {
        let mut node = ProjectionNode::new();
        node.select("id");
        node.select("address");
        node.select("name");
        node.select_nested::<ProjectionNode>("address").select("street");

        assert_eq!(node.len(), 3);
        assert_eq!(node.selection(), "id address { street } name");
        assert!(node.get("address").unwrap().is_some());
        assert!(node.get("id").unwrap().is_none());
        assert!(node.get("missing").is_none());

        // A second nested selection starts from scratch.
        node.select_nested::<ProjectionNode>("address").select("city");
        assert_eq!(node.selection(), "id address { city } name");
    }

    #[test]
    fn empty_nested_node_renders_bare_field() {
        let mut node = ProjectionNode::new();
        node.select_nested::<ProjectionNode>("address");
        assert_eq!(node.selection(), "address");
    }

    #[test]
    fn clone_is_deep() {
        let mut node = ProjectionNode::new();
        node.select_nested::<ProjectionNode>("address").select("street");
        let copy = node.clone();
        assert_eq!(copy, node);

        node.select_nested::<ProjectionNode>("address").select("city");
        assert_ne!(copy, node);
        assert_eq!(copy.selection(), "address { street }");
    }

    #[derive(Debug, Clone, Default)]
    struct Fixture(ProjectionNode);

    impl Projection for Fixture {
        fn node(&self) -> &ProjectionNode {
            &self.0
        }
    }

    #[test]
    fn trait_selection_delegates_to_node() {
        let mut node = ProjectionNode::new();
        node.select("id");
        let fixture = Fixture(node);
        assert_eq!(fixture.selection(), "id");
    }

    #[test]
    fn typed_nested_projection_is_recorded() {
        let mut node = ProjectionNode::new();
        node.select_nested::<Fixture>("owner").0.select("id");
        assert_eq!(node.selection(), "owner { id }");
    }
}
