//! Integration tests for the built-in renderers and dispatch.

use folio_common::NullSink;
use folio_css::{Property, StyleMap, StyleValue};
use folio_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};
use folio_render::{
    Pipeline, PipelineError, Primitive, RenderContext, RenderError, RenderOptions,
    RendererRegistry, SvgShape, Tag,
};

/// Helper to create element node types
fn make_element(tag: &str, attrs: &[(&str, &str)]) -> NodeType {
    let mut map = AttributesMap::new();
    for (name, value) in attrs {
        let _ = map.insert((*name).to_string(), (*value).to_string());
    }
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: map,
    })
}

fn text(value: &str) -> NodeType {
    NodeType::Text(value.to_string())
}

fn reset() -> RenderOptions {
    RenderOptions {
        reset_styles: true,
        ..RenderOptions::default()
    }
}

/// Render with reset styles and return the primitive for `root` itself.
fn render(dom: &DomTree, root: NodeId) -> Result<Primitive, PipelineError> {
    let output = Pipeline::new(reset()).render(dom, root, None, &NullSink)?;
    Ok(output.children()[0].clone())
}

fn width(style: &StyleMap, property: Property) -> Option<&StyleValue> {
    style.get(property)
}

/// `<table style=...><tr><td>..</td> x cells</tr></table>`
fn table(style: &str, cells: &[&[(&str, &str)]]) -> (DomTree, NodeId) {
    let mut dom = DomTree::new();
    let table = dom.append(NodeId::ROOT, make_element("table", &[("style", style)]));
    let tr = dom.append(table, make_element("tr", &[]));
    for (i, attrs) in cells.iter().enumerate() {
        let td = dom.append(tr, make_element("td", attrs));
        let _ = dom.append(td, text(&format!("cell {i}")));
    }
    (dom, table)
}

fn row_cells(table: &Primitive) -> Vec<Primitive> {
    table.children()[0].children().to_vec()
}

#[test]
fn test_collapsed_table_cells() {
    let (dom, root) = table(
        "border-width: 1px; border-collapse: collapse",
        &[&[], &[], &[], &[]],
    );
    let table = render(&dom, root).unwrap();

    let overrides = table.style().last().unwrap();
    assert!(width(overrides, Property::BorderLeftWidth).unwrap().is_zero());
    assert!(width(overrides, Property::BorderTopWidth).unwrap().is_zero());

    let cells = row_cells(&table);
    assert_eq!(cells.len(), 4);
    for (i, cell) in cells.iter().enumerate() {
        let base = &cell.style()[0];
        assert!(width(base, Property::BorderRightWidth).unwrap().is_zero());
        assert!(width(base, Property::BorderBottomWidth).unwrap().is_zero());
        assert_eq!(width(base, Property::BorderWidth), Some(&StyleValue::from("1px")));
        if i == 0 {
            assert_eq!(width(base, Property::BorderLeftWidth), None);
            assert_eq!(width(base, Property::BorderTopWidth), None);
        } else {
            assert_eq!(width(base, Property::BorderLeftWidth), Some(&StyleValue::from("1px")));
            assert_eq!(width(base, Property::BorderTopWidth), Some(&StyleValue::from("1px")));
        }
    }
}

#[test]
fn test_table_without_spacing_collapses() {
    let (dom, root) = table("border-width: 2px", &[&[], &[]]);
    let table = render(&dom, root).unwrap();
    let overrides = table.style().last().unwrap();
    assert!(overrides.contains(Property::BorderLeftWidth));

    let second = &row_cells(&table)[1];
    assert_eq!(
        width(&second.style()[0], Property::BorderTopWidth),
        Some(&StyleValue::from("2px"))
    );
}

#[test]
fn test_separated_table_cells() {
    let (dom, root) = table("border-width: 2px; border-spacing: 4px", &[&[], &[]]);
    let table = render(&dom, root).unwrap();
    assert!(table.style().last().unwrap().is_empty());

    for cell in row_cells(&table) {
        let base = &cell.style()[0];
        assert_eq!(width(base, Property::Width), Some(&StyleValue::from("2px")));
        assert_eq!(width(base, Property::Margin), Some(&StyleValue::from("4px")));
        assert!(!base.contains(Property::BorderRightWidth));
        assert!(!base.contains(Property::BorderLeftWidth));
    }
}

#[test]
fn test_cell_style_order_and_colspan() {
    let (dom, root) = table(
        "border-collapse: collapse",
        &[&[("colspan", "2"), ("style", "color: red")], &[("colspan", "wide")]],
    );
    let table = render(&dom, root).unwrap();
    let cells = row_cells(&table);

    let first = cells[0].style();
    assert_eq!(first.len(), 3);
    assert_eq!(first[1].get(Property::Color), Some(&StyleValue::from("red")));
    assert_eq!(first[2].get(Property::FlexBasis), Some(&StyleValue::Number(2.0)));

    assert!(cells[1].style().last().unwrap().is_empty());
}

#[test]
fn test_rows_do_not_wrap() {
    let (dom, root) = table("", &[&[]]);
    let table = render(&dom, root).unwrap();
    assert!(matches!(table.children()[0], Primitive::View { wrap: false, .. }));
    assert!(matches!(table, Primitive::View { wrap: true, .. }));
}

#[test]
fn test_cell_outside_table() {
    let mut dom = DomTree::new();
    let tr = dom.append(NodeId::ROOT, make_element("tr", &[]));
    let _ = dom.append(tr, make_element("th", &[]));

    let err = render(&dom, tr).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Render(RenderError::CellOutsideTable {
            tag: "th".to_string()
        })
    );
}

#[test]
fn test_list_item_markers() {
    let mut dom = DomTree::new();
    let body = dom.append(NodeId::ROOT, make_element("body", &[]));
    let ol = dom.append(body, make_element("ol", &[]));
    for item in ["one", "two", "three"] {
        let li = dom.append(ol, make_element("li", &[]));
        let _ = dom.append(li, text(item));
    }
    let ul = dom.append(body, make_element("ul", &[]));
    let li = dom.append(ul, make_element("li", &[]));
    let _ = dom.append(li, text("bullet"));

    let body = render(&dom, body).unwrap();
    let markers: Vec<String> = body.children()[0]
        .children()
        .iter()
        .map(|li| li.children()[0].text_content())
        .collect();
    assert_eq!(markers, vec!["1.", "2.", "3."]);

    let item = &body.children()[1].children()[0];
    assert!(matches!(item, Primitive::View { wrap: false, .. }));
    assert_eq!(item.children()[0].text_content(), "•");
    assert_eq!(item.children()[1].text_content(), "bullet");
}

#[test]
fn test_line_break() {
    let mut dom = DomTree::new();
    let p = dom.append(NodeId::ROOT, make_element("p", &[]));
    let _ = dom.append(p, text("a"));
    let _ = dom.append(p, make_element("br", &[]));
    let _ = dom.append(p, text("b"));

    let p = render(&dom, p).unwrap();
    let children = p.children();
    assert_eq!(children.len(), 3);
    assert!(matches!(children[1], Primitive::View { wrap: false, .. }));
    assert_eq!(children[1].text_content(), " ");
    assert_eq!(children[2].text_content(), "b");
}

#[test]
fn test_link_targets() {
    let mut dom = DomTree::new();
    let p = dom.append(NodeId::ROOT, make_element("p", &[]));
    let a = dom.append(p, make_element("a", &[("href", "https://x.test/")]));
    let _ = dom.append(a, text("here"));
    let _ = dom.append(p, make_element("a", &[]));

    let p = render(&dom, p).unwrap();
    let run = p.children()[0].children().to_vec();
    assert!(matches!(&run[0], Primitive::Link { src, .. } if src == "https://x.test/"));
    assert_eq!(run[0].text_content(), "here");
    assert!(matches!(&run[1], Primitive::Link { src, .. } if src.is_empty()));
}

#[test]
fn test_metadata_tags_render_nothing() {
    let mut dom = DomTree::new();
    let div = dom.append(NodeId::ROOT, make_element("div", &[]));
    let script = dom.append(div, make_element("script", &[]));
    let _ = dom.append(script, make_element("marquee", &[]));

    let div = render(&dom, div).unwrap();
    assert_eq!(div.children(), &[Primitive::Empty]);
}

#[test]
fn test_svg_is_static() {
    let mut dom = DomTree::new();
    let svg = dom.append(NodeId::ROOT, make_element("svg", &[]));
    let _ = dom.append(svg, make_element("circle", &[]));

    let Primitive::Svg { children, .. } = render(&dom, svg).unwrap() else {
        panic!("expected an svg primitive");
    };
    let [SvgShape::Group { transform, children }] = children.as_slice() else {
        panic!("expected one group");
    };
    assert_eq!(transform, "scale(1) translate(100,10)");
    assert!(matches!(&children[0], SvgShape::Polygon { fill, .. } if fill == "#f2cc99"));
}

#[test]
fn test_unknown_tag_is_fatal() {
    let mut dom = DomTree::new();
    let div = dom.append(NodeId::ROOT, make_element("div", &[]));
    let _ = dom.append(div, make_element("marquee", &[]));

    let err = render(&dom, div).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Render(RenderError::UnknownTag {
            tag: "marquee".to_string()
        })
    );
}

#[test]
fn test_custom_registry() {
    let mut dom = DomTree::new();
    let div = dom.append(NodeId::ROOT, make_element("div", &[]));
    let _ = dom.append(div, make_element("span", &[]));

    let registry = RendererRegistry::empty().with(
        Tag::Div,
        |ctx: &RenderContext<'_>| -> Result<Primitive, RenderError> {
            Ok(Primitive::view(Vec::new(), ctx.render_children()?))
        },
    );
    let err = Pipeline::new(reset())
        .with_registry(registry)
        .render(&dom, div, None, &NullSink)
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Render(RenderError::UnknownTag {
            tag: "span".to_string()
        })
    );

    let registry = RendererRegistry::default().with(
        Tag::Span,
        |_: &RenderContext<'_>| -> Result<Primitive, RenderError> {
            Ok(Primitive::literal("replaced"))
        },
    );
    let output = Pipeline::new(reset())
        .with_registry(registry)
        .render(&dom, div, None, &NullSink)
        .unwrap();
    assert_eq!(output.text_content(), "replaced");
}
