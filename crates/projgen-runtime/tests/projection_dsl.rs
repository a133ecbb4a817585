//! Exercises the runtime through projection types shaped exactly like the
//! ones `projgen` renders.

use projgen_runtime::{GraphQLQuery, Projection, ProjectionNode, ProjectionScope};

#[derive(Debug, Clone, Default)]
pub struct QueryProjection {
    node: ProjectionNode,
}

impl Projection for QueryProjection {
    fn node(&self) -> &ProjectionNode {
        &self.node
    }
}

impl ProjectionScope for QueryProjection {}

#[allow(non_snake_case)]
impl QueryProjection {
    pub fn people(&mut self, init: impl FnOnce(&mut PersonProjection)) -> &mut PersonProjection {
        let projection = self.node.select_nested::<PersonProjection>("people");
        init(&mut *projection);
        projection
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonProjection {
    node: ProjectionNode,
}

impl Projection for PersonProjection {
    fn node(&self) -> &ProjectionNode {
        &self.node
    }
}

impl ProjectionScope for PersonProjection {}

#[allow(non_snake_case)]
impl PersonProjection {
    pub fn firstname(&mut self) -> &mut Self {
        self.node.select("firstname");
        self
    }

    pub fn lastname(&mut self) -> &mut Self {
        self.node.select("lastname");
        self
    }

    pub fn address(&mut self, init: impl FnOnce(&mut AddressProjection)) -> &mut AddressProjection {
        let projection = self.node.select_nested::<AddressProjection>("address");
        init(&mut *projection);
        projection
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddressProjection {
    node: ProjectionNode,
}

impl Projection for AddressProjection {
    fn node(&self) -> &ProjectionNode {
        &self.node
    }
}

impl ProjectionScope for AddressProjection {}

#[allow(non_snake_case)]
impl AddressProjection {
    pub fn street(&mut self) -> &mut Self {
        self.node.select("street");
        self
    }

    pub fn house(&mut self) -> &mut Self {
        self.node.select("house");
        self
    }
}

#[test]
fn nested_dsl_builds_selection() {
    let mut query = QueryProjection::default();
    query.people(|person| {
        person.firstname().lastname();
        person.address(|address| {
            address.street().house();
        });
    });

    assert_eq!(
        query.selection(),
        "people { firstname lastname address { street house } }"
    );
}

#[test]
fn composite_accessor_returns_configured_instance() {
    let mut person = PersonProjection::default();
    let address = person.address(|address| {
        address.street();
    });
    assert_eq!(address.selection(), "street");
    assert_eq!(person.selection(), "address { street }");
}

#[test]
fn selections_through_returned_instance_are_recorded() {
    let mut query = QueryProjection::default();
    let person = query.people(|person| {
        person.firstname();
    });
    person.lastname();
    person
        .address(|_| {})
        .street()
        .house();

    assert_eq!(
        query.selection(),
        "people { firstname lastname address { street house } }"
    );
}

#[test]
fn anonymous_query_document() {
    let mut query = QueryProjection::default();
    query.people(|person| {
        person.firstname();
    });

    let request = GraphQLQuery::new(&query);
    assert_eq!(request.query, "query { people { firstname } }");
    assert!(request.operation_name.is_none());

    let body = request.to_body();
    assert_eq!(body["query"], "query { people { firstname } }");
    assert!(body.get("operationName").is_none());
}

#[test]
fn named_query_document() {
    let mut query = QueryProjection::default();
    query.people(|person| {
        person.lastname();
    });

    let request = GraphQLQuery::named("People", &query);
    assert_eq!(request.query, "query People { people { lastname } }");

    let body = request.to_body();
    assert_eq!(body["operationName"], "People");
}
