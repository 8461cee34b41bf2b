use json_keypaths::{key_paths, DepthCeiling, Options, PathSet, Schema, Shape};
use serde_json::json;

fn search_hit_schema() -> Schema {
    Schema::from_value(json!({
        "type": "object",
        "properties": {
            "hits": {
                "type": "object",
                "properties": {
                    "hits": {
                        "type": "array",
                        "prefixItems": [{
                            "type": "object",
                            "properties": {
                                "_source": {
                                    "type": "object",
                                    "properties": {
                                        "name": {
                                            "type": "array",
                                            "prefixItems": [{
                                                "type": "object",
                                                "properties": {
                                                    "given": { "type": "array", "prefixItems": [{ "type": "string" }] },
                                                    "family": { "type": "string" }
                                                }
                                            }]
                                        },
                                        "birthDate": { "type": "string" }
                                    }
                                }
                            }
                        }]
                    }
                }
            }
        }
    }))
    .unwrap()
}

#[test]
fn search_hit_paths_in_production_order() {
    let paths = search_hit_schema().key_paths(Options::with_depth(6));
    insta::assert_snapshot!(paths.iter().collect::<Vec<_>>().join("\n"), @r"
    hits
    hits.hits
    hits.hits[0]
    hits.hits[0]._source
    hits.hits[0]._source.name
    hits.hits[0]._source.name[0]
    hits.hits[0]._source.name[0].given
    hits.hits[0]._source.name[0].family
    hits.hits[0]._source.birthDate
    ");
}

#[test]
fn search_hit_paths_sorted() {
    let paths = search_hit_schema().key_paths(Options::with_depth(6));
    insta::assert_snapshot!(paths.sorted().join("\n"), @r"
    hits
    hits.hits
    hits.hits[0]
    hits.hits[0]._source
    hits.hits[0]._source.birthDate
    hits.hits[0]._source.name
    hits.hits[0]._source.name[0]
    hits.hits[0]._source.name[0].family
    hits.hits[0]._source.name[0].given
    ");
}

#[test]
fn search_hit_at_depth_five() {
    let paths = search_hit_schema().key_paths(Options::with_depth(5));
    assert!(paths.contains("hits.hits[0]._source.name"));
    assert!(paths.contains("hits.hits[0]._source.birthDate"));
    assert!(!paths.contains("hits.hits[0].name"));
    assert!(!paths.contains(""));
}

#[test]
fn every_path_parses_and_admits_itself() {
    let shape = Shape::object([
        ("a", Shape::list(Shape::object([("b", Shape::tuple(vec![Shape::Leaf, Shape::Leaf]))]))),
        ("c", Shape::Leaf),
        ("x.y", Shape::object([("z", Shape::Leaf)])),
    ]);
    let paths = key_paths(&shape, Options::default());
    assert_eq!(paths.sorted(), [r#"["x.y"]"#, r#"["x.y"].z"#, "a", "a[*]", "a[*].b", "a[*].b[0]", "a[*].b[1]", "c"]);
    for p in paths.iter() {
        assert!(paths.admits(p).unwrap(), "{p} should admit itself");
    }
    assert!(paths.admits("a[12].b[1]").unwrap());
    assert!(!paths.admits("a[12].b[2]").unwrap());
}

#[test]
fn depth_ceiling_policies() {
    let schema = search_hit_schema();
    let legacy = schema.key_paths(Options::with_depth(21));
    assert_eq!(legacy, ["hits"].into_iter().collect::<PathSet>());

    let unbounded = schema.key_paths(Options { depth: 21, ceiling: DepthCeiling::Unbounded });
    assert_eq!(unbounded, schema.key_paths(Options::with_depth(20)));
    assert!(unbounded.contains("hits.hits[0]._source.name[0].given[0]"));
}

#[test]
fn paths_serialize_as_json_array() {
    let shape = Shape::object([("rgb", Shape::tuple(vec![Shape::Leaf; 2]))]);
    let paths = key_paths(&shape, Options::default());
    assert_eq!(serde_json::to_value(&paths).unwrap(), json!(["rgb", "rgb[0]", "rgb[1]"]));
}
