use pretty_assertions::assert_eq;
use serde_json::json;
use thicket::widget::{TEMPLATE_ERROR_TITLE, VALIDATION_ERROR_TITLE};
use thicket::*;
use tracing_test::traced_test;

fn data(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn panel_text(panel: &Value) -> (String, String) {
    let card = panel.as_element().expect("panel is an element");
    assert_eq!(card.tag, "Card");
    assert_eq!(card.prop("size"), Some(&Value::string("md")));
    let mut children = card.child_elements();
    let title = children.next().expect("title");
    let text = children.next().expect("text");
    assert_eq!(text.prop("color"), Some(&Value::string("secondary")));
    (
        title.prop("value").unwrap().to_js_string(),
        text.prop("value").unwrap().to_js_string(),
    )
}

// ═══════════════════════════════════════════════════════════════════════
// Diagnostic Panels
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_each_error_kind_becomes_a_panel() {
    let widget = WidgetRenderer::new();
    let cases = [
        ("<Card>", "Parse error: unterminated <Card>"),
        ("<Text value={f()} />", "Unsupported expression: function call at 1:15"),
        ("<Gizmo />", "Unknown widget component: Gizmo at 1:1"),
    ];
    for (template, message) in cases {
        let panel = widget.render(template, &data(json!({})));
        let (title, text) = panel_text(&panel);
        assert_eq!(title, TEMPLATE_ERROR_TITLE, "{}", template);
        assert!(text.starts_with(message), "{}: {}", template, text);
    }
}

#[test]
fn test_try_render_returns_error() {
    let widget = WidgetRenderer::new();
    let err = widget.try_render("<Gizmo />", &data(json!({}))).unwrap_err();
    match err {
        WidgetError::Template(inner) => assert_eq!(inner.kind(), ErrorKind::UnknownComponent),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_validation_failure_panel() {
    struct RequireTitle;

    impl DataValidator for RequireTitle {
        fn validate(&self, data: &Value) -> std::result::Result<Value, Vec<ValidationIssue>> {
            match data.as_object().and_then(|o| o.get("title")) {
                Some(Value::String(_)) => Ok(data.clone()),
                _ => Err(vec![ValidationIssue::new(["title"], "Required")]),
            }
        }
    }

    let widget = WidgetRenderer::new().with_validator(RequireTitle);
    let panel = widget.render("<Title value={title} />", &data(json!({})));
    assert_eq!(
        panel_text(&panel),
        (VALIDATION_ERROR_TITLE.to_string(), "title: Required".to_string())
    );

    let ok = widget.render("<Title value={title} />", &data(json!({"title": "Hi"})));
    assert_eq!(ok.as_element().unwrap().tag, "Title");
}

// ═══════════════════════════════════════════════════════════════════════
// Scope Shaping
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_data_alias_and_state_alias() {
    let widget = WidgetRenderer::new();

    let tree = widget
        .try_render("<Text value={data.name + name} />", &data(json!({"name": "x"})))
        .unwrap();
    assert_eq!(tree.as_element().unwrap().prop("value"), Some(&Value::string("xx")));

    let tree = widget
        .try_render(
            "<Chart series={data} total={state.total} />",
            &data(json!({"data": [1, 2], "total": 3})),
        )
        .unwrap();
    let chart = tree.as_element().unwrap();
    assert_eq!(chart.prop("series"), Some(&data(json!([1, 2]))));
    assert_eq!(chart.prop("total"), Some(&Value::Number(3.0)));
}

#[test]
fn test_non_object_data_is_value() {
    let widget = WidgetRenderer::new();
    let tree = widget
        .try_render(
            "<ListView>{value.map(v => <ListViewItem id={v} />)}</ListView>",
            &data(json!([1, 2, 3])),
        )
        .unwrap();
    assert_eq!(tree.as_element().unwrap().children.len(), 3);
}

// ═══════════════════════════════════════════════════════════════════════
// Leaf Components and Text
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_leaf_widgets_drop_children() {
    let widget = WidgetRenderer::new();
    for tag in ["Text", "Title", "Caption", "Badge", "Button", "Label", "Markdown"] {
        let template = format!("<{0} value='v'><Divider /></{0}>", tag);
        let tree = widget.try_render(&template, &data(json!({}))).unwrap();
        assert!(tree.as_element().unwrap().children.is_empty(), "{}", tag);
    }
    let tree = widget
        .try_render("<Card><Divider /></Card>", &data(json!({})))
        .unwrap();
    assert_eq!(tree.as_element().unwrap().children.len(), 1);
}

#[traced_test]
#[test]
fn test_raw_text_is_warned_and_dropped() {
    let widget = WidgetRenderer::new();
    let tree = widget
        .try_render("<Card>Hello world<Divider /></Card>", &data(json!({})))
        .unwrap();
    assert_eq!(tree.as_element().unwrap().children.len(), 1);
    assert!(logs_contain("text nodes are not allowed"));
}

#[test]
fn test_realistic_widget() {
    let template = r#"
        <Card size="md">
          <Row align="center" gap={2}>
            <Title value={title} />
            {unread > 0 && <Badge label={unread + " new"} color="info" />}
          </Row>
          <Divider />
          <ListView>
            {messages.map((m, i) => (
              <ListViewItem key={m.id}>
                <Col>
                  <Text value={m.from} weight="semibold" />
                  <Caption value={m.preview || "(no preview)"} />
                </Col>
              </ListViewItem>
            ))}
          </ListView>
          {messages.length === 0 ? <Text value="Inbox zero" /> : null}
        </Card>
    "#;
    let widget = WidgetRenderer::new();
    let tree = widget
        .try_render(
            template,
            &data(json!({
                "title": "Inbox",
                "unread": 2,
                "messages": [
                    {"id": "m1", "from": "Ada", "preview": "Hello"},
                    {"id": "m2", "from": "Bob", "preview": ""}
                ]
            })),
        )
        .unwrap();

    let card = tree.as_element().unwrap();
    let tags: Vec<_> = card.child_elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["Row", "Divider", "ListView"]);

    let row = card.child_elements().next().unwrap();
    let badge = row.child_elements().nth(1).unwrap();
    assert_eq!(badge.prop("label"), Some(&Value::string("2 new")));

    let list = card.child_elements().nth(2).unwrap();
    let items: Vec<_> = list.child_elements().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].prop("key"), Some(&Value::string("m2")));
    let caption = items[1]
        .child_elements()
        .next()
        .unwrap()
        .child_elements()
        .nth(1)
        .unwrap();
    assert_eq!(caption.prop("value"), Some(&Value::string("(no preview)")));
}
