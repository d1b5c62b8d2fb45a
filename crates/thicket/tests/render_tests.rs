use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use thicket::*;

fn registry() -> ComponentRegistry {
    widget_registry()
}

fn render_json(template: &str, data: serde_json::Value) -> Result<Value> {
    render(template, &Scope::from_json(data), &registry())
}

fn el(tag: &str) -> Element {
    Element::new(tag, ComponentDef::shared(tag))
}

// ═══════════════════════════════════════════════════════════════════════
// Determinism and Caching
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_render_is_deterministic() {
    let template = "<Card>{items.map((x, i) => <Row key={i}><Text value={x} /></Row>)}</Card>";
    let data = json!({"items": ["a", "b", "c"]});
    let first = render_json(template, data.clone()).unwrap();
    let second = render_json(template, data).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cache_is_transparent() {
    let template = "<Box padding={n * 2}>{show && <Divider />}</Box>";
    let scope = Scope::from_json(json!({"n": 3, "show": true}));

    let cache = Arc::new(TemplateCache::new());
    let renderer = Renderer::new(registry()).with_cache(Arc::clone(&cache));

    let cold = renderer.render(template, &scope).unwrap();
    let warm = renderer.render(template, &scope).unwrap();
    cache.clear();
    let cleared = renderer.render(template, &scope).unwrap();
    let bypassed = renderer.render_uncached(template, &scope).unwrap();

    assert_eq!(cold, warm);
    assert_eq!(cold, cleared);
    assert_eq!(cold, bypassed);
}

#[test]
fn test_parallel_renders_share_global_cache() {
    let template = "<ListView>{rows.map((r, i) => <ListViewItem key={i}><Text value={r} /></ListViewItem>)}</ListView>";
    let scope = Scope::from_json(json!({"rows": ["a", "b", "c", "d"]}));
    let registry = registry();
    let expected = render(template, &scope, &registry).unwrap();

    let (scope, registry) = (&scope, &registry);
    let trees: Vec<Value> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || render(template, scope, registry).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(trees.len(), 8);
    for tree in trees {
        assert_eq!(tree, expected);
    }
}

#[test]
fn test_global_cache_shares_trees() {
    let template = "<Spacer data-test=\"global-cache\" />";
    render(template, &Scope::new(), &registry()).unwrap();
    assert!(cache::global().contains(template));
}

// ═══════════════════════════════════════════════════════════════════════
// Sandboxing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_calls_are_rejected() {
    let templates = [
        "<Text value={alert('x')} />",
        "<Text value={user.name.toUpperCase()} />",
        "<Row>{items.filter(x => x)}</Row>",
        "<Row>{items.map(render)}</Row>",
        "<Row>{items.map(function (x) { return x })}</Row>",
        "<Text value={(() => 1)()} />",
        "<Text value={window.location = 'x'} />",
        "<Text value={new Date()} />",
        "<Text value={new Intl.NumberFormat().format(n)} />",
        "<Text value={tag`x`} />",
    ];
    let data = json!({"items": [1], "user": {"name": "a"}});
    for template in templates {
        let result = render_json(template, data.clone());
        match result {
            Err(err) => assert_eq!(
                err.kind(),
                ErrorKind::UnsupportedExpression,
                "{}: {}",
                template,
                err
            ),
            Ok(tree) => panic!("{} rendered: {:?}", template, tree),
        }
    }
}

/// Largest `n` for which `build(n)` parses.
fn deepest_accepted(build: fn(usize) -> String) -> usize {
    let mut n = 1;
    while parse(&build(n + 1)).is_ok() {
        n += 1;
    }
    n
}

#[test]
fn test_parser_limit_stays_within_depth_guard() {
    let shapes: [(&str, fn(usize) -> String); 6] = [
        ("operators", |n| format!("<Text value={{1{}}} />", "+1".repeat(n))),
        ("members", |n| format!("<Text value={{a{}}} />", ".b".repeat(n))),
        ("unary", |n| format!("<Text value={{{}1}} />", "!".repeat(n))),
        ("elements", |n| format!("{}{}", "<Row>".repeat(n), "</Row>".repeat(n))),
        ("slots", |n| {
            format!("{}<Divider />{}", "<Row>{".repeat(n), "}</Row>".repeat(n))
        }),
        ("conditionals", |n| format!("<Text value={{{}0}} />", "a ? 1 : ".repeat(n))),
    ];
    let scope = Scope::from_json(json!({"a": {"b": null}}));
    let renderer = Renderer::new(registry());

    for (name, build) in shapes {
        let n = deepest_accepted(build);
        assert!(n >= 20, "{}: only {} levels accepted", name, n);

        let err = parse(&build(n + 1)).unwrap_err();
        assert_eq!(err.message, "template nested too deeply", "{}", name);

        // Whatever the parser accepts, the default depth guard evaluates
        let result = renderer.render_uncached(&build(n), &scope);
        assert!(result.is_ok(), "{}: {:?}", name, result);
    }
}

#[test]
fn test_long_flat_chain_is_a_parse_error() {
    let terms = vec!["1"; 300].join(" + ");
    let err = render_json(&format!("<Text value={{{}}} />", terms), json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("template nested too deeply"), "{}", err);
}

#[test]
fn test_map_calls_are_allowed() {
    let tree = render_json("<Row>{xs.map(x => <Col key={x} />)}</Row>", json!({"xs": [1]})).unwrap();
    assert_eq!(tree.as_element().unwrap().children.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Missing Data
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_data_tolerated() {
    let tree = render_json("<Text value={a.b.c} />", json!({})).unwrap();
    assert_eq!(tree, Value::element(el("Text").with_prop("value", Value::Undefined)));
}

#[test]
fn test_map_over_missing_list_renders_nothing() {
    let tree = render_json("<ListView>{items.map(i => <ListViewItem />)}</ListView>", json!({}))
        .unwrap();
    assert_eq!(tree, Value::element(el("ListView")));
}

// ═══════════════════════════════════════════════════════════════════════
// Iteration and Conditionals
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_iteration_yields_siblings_in_order() {
    let template =
        "<Col>{items.map((item, i) => <Row key={i}><Text value={item.title}/></Row>)}</Col>";
    let tree = render_json(template, json!({"items": [{"title": "A"}, {"title": "B"}]})).unwrap();

    let expected = el("Col")
        .with_child(
            el("Row")
                .with_prop("key", 0.0)
                .with_child(el("Text").with_prop("value", "A")),
        )
        .with_child(
            el("Row")
                .with_prop("key", 1.0)
                .with_child(el("Text").with_prop("value", "B")),
        );
    assert_eq!(tree, Value::element(expected));
}

#[test]
fn test_conditional_splicing() {
    let template = "<Row>{flag && <Badge label=\"x\"/>}</Row>";
    for falsy in [json!(false), json!(null), json!(0), json!("")] {
        let tree = render_json(template, json!({"flag": falsy})).unwrap();
        let children = &tree.as_element().unwrap().children;
        // `0` and `""` are kept as primitive children, never as a Badge
        assert!(children.iter().all(|c| !c.is_element()), "{:?}", falsy);
    }
    let tree = render_json(template, json!({})).unwrap();
    assert!(tree.as_element().unwrap().children.is_empty());

    let tree = render_json(template, json!({"flag": true})).unwrap();
    let badges: Vec<_> = tree.as_element().unwrap().child_elements().collect();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].tag, "Badge");
    assert_eq!(badges[0].prop("label"), Some(&Value::string("x")));
}

// ═══════════════════════════════════════════════════════════════════════
// Unknown Components
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_component_names_tag() {
    let err = render_json("<Card><Row><Gizmo /></Row></Card>", json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownComponent);
    match err {
        TemplateError::UnknownComponent { tag, .. } => assert_eq!(tag, "Gizmo"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unknown_component_inside_map() {
    let err = render_json("<Row>{xs.map(x => <Gizmo />)}</Row>", json!({"xs": [1]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownComponent);

    // Never reached when the list is empty
    assert!(render_json("<Row>{xs.map(x => <Gizmo />)}</Row>", json!({"xs": []})).is_ok());
}

#[test]
fn test_custom_registry_extends_tags() {
    let mut overrides = ComponentRegistry::new();
    overrides.register_named("Gizmo");
    let registry = registry().merged(&overrides);
    let tree = render("<Row><Gizmo /></Row>", &Scope::new(), &registry).unwrap();
    assert_eq!(tree, Value::element(el("Row").with_child(el("Gizmo"))));
}

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_operator_semantics() {
    fn value(src: &str) -> Value {
        let template = format!("<Text value={{{}}} />", src);
        let tree = render_json(&template, json!({"a": null})).unwrap();
        let element = tree.as_element().unwrap();
        element.prop("value").cloned().unwrap()
    }

    assert_eq!(value("\"count: \" + 3"), Value::string("count: 3"));
    assert_eq!(value("3 + 4"), Value::Number(7.0));
    assert_eq!(value("a.b"), Value::Undefined);
    assert_eq!(value("a.b || 'fallback'"), Value::string("fallback"));
}

// ═══════════════════════════════════════════════════════════════════════
// Fragments
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_fragment_flattening_matches_inlining() {
    let data = json!({"xs": ["a", "b"]});
    let with_fragment = render_json(
        "<Col><>{xs.map(x => <Text value={x} />)}<Divider /></></Col>",
        data.clone(),
    )
    .unwrap();
    let inlined = render_json(
        "<Col>{xs.map(x => <Text value={x} />)}<Divider /></Col>",
        data,
    )
    .unwrap();
    assert_eq!(with_fragment, inlined);
    assert_eq!(with_fragment.as_element().unwrap().children.len(), 3);
}

// ═══════════════════════════════════════════════════════════════════════
// Serialization
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_tree_serializes_to_json() {
    let tree = render_json(
        "<Card size=\"md\"><Text value={t} />{missing}</Card>",
        json!({"t": "hi"}),
    )
    .unwrap();
    assert_eq!(
        serde_json::to_value(&tree).unwrap(),
        json!({
            "tag": "Card",
            "props": {"size": "md"},
            "children": [
                {"tag": "Text", "props": {"value": "hi"}, "children": []}
            ]
        })
    );
}
