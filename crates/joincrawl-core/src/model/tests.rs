use crate::model::{NodePath, QueryNode};

fn orders_tree() -> QueryNode {
    QueryNode::leaf("SELECT id, region FROM customers")
        .with_child(
            "id",
            QueryNode::leaf("SELECT * FROM orders WHERE customer_id = ?")
                .with_child("order_id", QueryNode::leaf("SELECT * FROM lines WHERE order_id = ?")),
        )
        .with_child("id", QueryNode::leaf("SELECT * FROM notes WHERE customer_id = ?"))
        .with_child("region", QueryNode::leaf("SELECT * FROM regions WHERE code = ?"))
}

#[test]
fn with_child_appends_in_list_order_and_keeps_column_order() {
    let tree = orders_tree();

    let columns: Vec<_> = tree.join().keys().map(String::as_str).collect();
    assert_eq!(columns, ["id", "region"]);

    let id_children: Vec<_> = tree.children("id").iter().map(QueryNode::query).collect();
    assert_eq!(
        id_children,
        [
            Some("SELECT * FROM orders WHERE customer_id = ?"),
            Some("SELECT * FROM notes WHERE customer_id = ?"),
        ]
    );
}

#[test]
fn depth_and_node_count_cover_whole_tree() {
    let tree = orders_tree();

    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.node_count(), 5);
    assert!(!tree.is_leaf());
    assert!(tree.children("missing").is_empty());
}

#[test]
fn absent_query_and_join_do_not_panic() {
    let node = QueryNode::new(None, None);

    assert_eq!(node.query(), None);
    assert!(node.is_leaf());
    assert_eq!(node.depth(), 1);
    assert_eq!(QueryNode::group().node_count(), 1);
}

#[test]
fn json_form_accepts_cql_key_and_null_children() {
    let tree = QueryNode::from_json(
        r#"{
            "cql": "SELECT id FROM customers",
            "join": {
                "id": [
                    { "cql": "SELECT * FROM orders WHERE customer_id = ?", "join": null }
                ],
                "region": null
            }
        }"#,
    )
    .expect("tree should parse");

    assert_eq!(tree.query(), Some("SELECT id FROM customers"));
    assert_eq!(tree.children("id").len(), 1);
    assert!(tree.children("region").is_empty());
    assert!(tree.children("id")[0].is_leaf());
}

#[test]
fn json_form_accepts_query_alias() {
    let tree = QueryNode::from_json(r#"{"query": "SELECT 1"}"#).expect("tree should parse");

    assert_eq!(tree.query(), Some("SELECT 1"));
    assert!(tree.is_leaf());
}

#[test]
fn json_encoding_omits_absent_fields() {
    let json = QueryNode::leaf("SELECT 1").to_json().expect("tree encodes");
    assert_eq!(json, r#"{"cql":"SELECT 1"}"#);

    let json = QueryNode::group().to_json().expect("tree encodes");
    assert_eq!(json, "{}");
}

#[test]
fn invalid_json_is_a_config_error() {
    let err = QueryNode::from_json(r#"{"cql": 5}"#).expect_err("number is not a query");

    assert_eq!(err.class, crate::error::ErrorClass::Config);
    assert!(err.message.starts_with("invalid query tree"));
}

#[test]
fn node_path_renders_each_level() {
    let root = NodePath::root();
    let path = root.child("id", 0).child("order_id", 1);

    assert_eq!(root.to_string(), "$");
    assert!(root.is_root());
    assert_eq!(path.to_string(), "$.join.id[0].join.order_id[1]");
    assert_eq!(path.depth(), 2);
}
