//! Built-in renderers.
//!
//! Each renderer turns one element into one [`Primitive`]. Block and inline
//! renderers are generic; the rest encode structural rules (list markers,
//! table border ownership, line breaks, links and images).

use folio_common::url::is_remote;
use folio_css::{Property, StyleMap, StyleValue};

use crate::error::RenderError;
use crate::primitive::{ImageSource, Primitive, SvgShape};
use crate::registry::RenderContext;
use crate::tag::Tag;

/// Points of the static polygon drawn for `<svg>` elements.
const SVG_POLYGON_POINTS: &str = " 69,18 82,8 99,3 118,5 135,12 149,21 156,13 165,9 177,13 183,28 \
180,50 164,91 155,107 154,114 151,121 141,127 139,136 155,206 157,251 126,342 133,357 128,376 \
83,376 75,368 67,350 61,350 53,369 4,369 2,361 5,354 12,342 16,321 4,257 4,244 7,218 9,179 26,127 \
43,93 32,77 30,70 24,67 16,49 17,35 18,23 30,12 40,7 53,7 62,12";

/// Bullet used for unordered list items.
pub const BULLET: &str = "•";

/// Renders nothing; children are never rendered.
///
/// # Errors
///
/// Never fails.
pub fn render_noop(_ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::Empty)
}

/// A container carrying the cascaded style.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_block(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::view(ctx.style_list(), ctx.render_children()?))
}

/// A text run carrying the cascaded style.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_inline(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::text(ctx.style_list(), ctx.render_children()?))
}

/// `<br>`: an unbreakable container holding a single blank text run.
///
/// # Errors
///
/// Never fails.
pub fn render_line_break(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::unbreakable(
        ctx.style_list(),
        vec![Primitive::text(Vec::new(), vec![Primitive::literal(" ")])],
    ))
}

/// `<li>`: marker and content side by side in an unbreakable container.
///
/// Items of an `ol` are numbered from 1 by their index among `li`
/// siblings; anything else gets a bullet.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_list_item(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    let ordered = ctx.parent().is_some_and(|parent| parent.tag() == Tag::Ol.name());
    let marker = if ordered {
        format!("{}.", ctx.element.index_of_type() + 1)
    } else {
        BULLET.to_string()
    };

    Ok(Primitive::unbreakable(
        ctx.style_list(),
        vec![
            Primitive::view(
                Vec::new(),
                vec![Primitive::text(Vec::new(), vec![Primitive::literal(marker)])],
            ),
            Primitive::text(Vec::new(), ctx.render_children()?),
        ],
    ))
}

/// `<a>`: a hyperlink to `href`, or to `""` without one.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_link(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::Link {
        style: ctx.style_list(),
        src: ctx.element.attribute("href").unwrap_or_default().to_string(),
        children: ctx.render_children()?,
    })
}

/// `<img>`.
///
/// Remote sources are passed through as URLs. Anything else must have been
/// acquired into [`RenderContext::images`] before rendering; a source that
/// could not be acquired renders as [`Primitive::Empty`].
///
/// # Errors
///
/// Never fails.
pub fn render_image(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    let src = ctx.element.attribute("src").unwrap_or_default();

    if is_remote(src) {
        return Ok(Primitive::Image {
            style: ctx.style_list(),
            source: ImageSource::Url(src.to_string()),
        });
    }

    Ok(ctx.images.get(src).map_or(Primitive::Empty, |bytes| Primitive::Image {
        style: ctx.style_list(),
        source: ImageSource::Data(bytes.to_vec()),
    }))
}

/// `<table>`.
///
/// Unless the table separates its cells (`border-spacing` set and
/// `border-collapse` not `collapse`), its own left and top borders are
/// suppressed: in collapsed mode the cells own the interior edges.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_table(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    let table = StyleMap::merged(ctx.element.style());

    let mut overrides = StyleMap::new();
    if !separates_cells(&table) {
        let _ = overrides.insert(Property::BorderLeftWidth, 0u32);
        let _ = overrides.insert(Property::BorderTopWidth, 0u32);
    }

    let mut style = ctx.style_list();
    style.push(overrides);
    Ok(Primitive::view(style, ctx.render_children()?))
}

/// `<tr>`: rows are never split across pages.
///
/// # Errors
///
/// Propagates child rendering errors.
pub fn render_row(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::unbreakable(ctx.style_list(), ctx.render_children()?))
}

/// `<td>` and `<th>`.
///
/// Cells inherit the table's border declarations. With separated cells each
/// one keeps all four borders and is spaced by the table's
/// `border-spacing`. Collapsed cells drop their right and bottom borders;
/// every cell but the first of its row draws the shared left and top edge.
/// A numeric `colspan` becomes a `flexBasis`.
///
/// The resulting style list is `[cell base, cascaded..., overrides]`.
///
/// # Errors
///
/// Returns [`RenderError::CellOutsideTable`] if no ancestor is a `table`.
pub fn render_cell(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    let table = ctx
        .tree
        .closest(ctx.node, Tag::Table.name())
        .and_then(|id| ctx.tree.element(id))
        .ok_or_else(|| RenderError::CellOutsideTable {
            tag: ctx.element.tag().to_string(),
        })?;
    let table = StyleMap::merged(table.style());

    let mut base = StyleMap::new();
    for property in [
        Property::Border,
        Property::BorderColor,
        Property::BorderWidth,
        Property::BorderStyle,
    ] {
        copy(&table, &mut base, property, property);
    }

    if separates_cells(&table) {
        copy(&table, &mut base, Property::BorderWidth, Property::Width);
        copy(&table, &mut base, Property::BorderSpacing, Property::Margin);
    } else {
        let _ = base.insert(Property::BorderRightWidth, 0u32);
        let _ = base.insert(Property::BorderBottomWidth, 0u32);
        if ctx.element.index_of_type() != 0 {
            copy(&table, &mut base, Property::BorderWidth, Property::BorderLeftWidth);
            copy(&table, &mut base, Property::BorderWidth, Property::BorderTopWidth);
        }
    }

    let mut overrides = StyleMap::new();
    if let Some(colspan) = ctx
        .element
        .attribute("colspan")
        .and_then(|span| span.trim().parse::<u32>().ok())
    {
        let _ = overrides.insert(Property::FlexBasis, colspan);
    }

    let mut style = Vec::with_capacity(ctx.style.len() + 2);
    style.push(base);
    style.extend_from_slice(ctx.style);
    style.push(overrides);
    Ok(Primitive::view(style, ctx.render_children()?))
}

/// `<svg>`: a fixed vector asset. The element's content is not rendered.
///
/// # Errors
///
/// Never fails.
pub fn render_svg(ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
    Ok(Primitive::Svg {
        style: ctx.style_list(),
        children: vec![SvgShape::Group {
            transform: "scale(1) translate(100,10)".to_string(),
            children: vec![SvgShape::Polygon {
                fill: "#f2cc99".to_string(),
                points: SVG_POLYGON_POINTS.to_string(),
            }],
        }],
    })
}

/// [CSS 2 § 17.6.1 The separated borders model](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
fn separates_cells(table: &StyleMap) -> bool {
    let spacing = table.get(Property::BorderSpacing).is_some_and(|v| !is_blank(v));
    let collapse = table
        .get(Property::BorderCollapse)
        .and_then(StyleValue::as_text)
        .is_some_and(|v| v == "collapse");
    spacing && !collapse
}

fn is_blank(value: &StyleValue) -> bool {
    value.as_text().is_some_and(str::is_empty)
}

fn copy(from: &StyleMap, to: &mut StyleMap, source: Property, target: Property) {
    if let Some(value) = from.get(source) {
        let _ = to.insert(target, value.clone());
    }
}
