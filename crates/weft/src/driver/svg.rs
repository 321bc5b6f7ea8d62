//! The vector markup backend.
//!
//! Styling is resolved to concrete presentation attributes so the output
//! renders correctly on its own, while class strings are carried through as
//! `class` attributes for callers who restyle the markup with their own CSS.

use std::io::Write;
use std::mem;

use log::debug;
use svg::{Document, node::element as svg_element};

use crate::{
    RenderOptions,
    diagram::{self, Diagram, PageMeta},
    driver::{Driver, GroupId},
    error::WeftError,
    geometry::Point,
    path::{self, PathData, TokenPolicy},
    props::RenderProps,
    style::{self, ClassTokens, LineCap, TextAlign, TextBaseline},
};

/// Inset of the generator link from the bottom-right corner.
const LINK_MARGIN: f32 = 4.0;
/// Font size of the generator link caption.
const LINK_TEXT_SIZE: f32 = 10.0;

/// A container the driver is currently appending nodes into.
///
/// Sections come from [`Driver::draw_group`] and close automatically when
/// the next one opens; scopes come from [`Driver::transform`] and close when
/// their body returns. Scopes nest, sections do not.
enum Container {
    Section(svg_element::Group),
    Scope(svg_element::Group),
}

/// Renders a diagram as an SVG document written to `out`.
///
/// Elements are emitted in traversal order, so later elements paint over
/// earlier ones exactly as they do on a raster surface.
pub struct SvgDriver<'d, W> {
    diagram: &'d Diagram,
    out: W,
    props: RenderProps,
    policy: TokenPolicy,
    no_link: bool,
    css: Option<String>,
    meta: PageMeta,
    root: Vec<Box<dyn svg::Node>>,
    open: Vec<Container>,
    groups_opened: usize,
}

impl<'d, W: Write> SvgDriver<'d, W> {
    pub fn new(diagram: &'d Diagram, out: W, options: &RenderOptions) -> Self {
        Self {
            diagram,
            out,
            props: RenderProps::resolve(diagram.props(), &options.props),
            policy: options.token_policy,
            no_link: options.no_link,
            css: options.css.clone(),
            meta: PageMeta::default(),
            root: Vec::new(),
            open: Vec::new(),
            groups_opened: 0,
        }
    }

    /// Appends a finished node to the innermost open container, or to the
    /// document root when none is open.
    fn append(&mut self, node: Box<dyn svg::Node>) {
        match self.open.last_mut() {
            Some(Container::Section(group)) | Some(Container::Scope(group)) => {
                let taken = mem::replace(group, svg_element::Group::new());
                *group = taken.add(node);
            }
            None => self.root.push(node),
        }
    }

    /// Closes the open section, if one is on top of the stack.
    fn close_section(&mut self) {
        match self.open.pop() {
            Some(Container::Section(group)) => self.append(group.into()),
            Some(other) => self.open.push(other),
            None => {}
        }
    }

    /// Closes containers up to and including the innermost scope. A section
    /// opened inside the scope has no following group to close it, so it
    /// closes here with the scope itself.
    fn close_scope(&mut self) {
        while let Some(container) = self.open.pop() {
            match container {
                Container::Section(group) => self.append(group.into()),
                Container::Scope(group) => {
                    self.append(group.into());
                    return;
                }
            }
        }
    }
}

impl<W: Write> Driver for SvgDriver<'_, W> {
    type Target = W;

    fn draw(mut self) -> Result<W, WeftError> {
        let width = self.diagram.width();
        let height = self.diagram.height();
        debug!(width = width, height = height; "assembling SVG document");

        diagram::traverse(self.diagram, &mut self)?;
        self.close_section();

        let mut document = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(title) = self.meta.title.as_deref() {
            document = document.add(svg_element::Title::new(title));
        }
        if let Some(css) = self.css.as_deref() {
            document = document.add(svg_element::Style::new(css));
        }

        document = document.add(
            svg_element::Rectangle::new()
                .set("x", 0.0)
                .set("y", 0.0)
                .set("width", width)
                .set("height", height)
                .set("fill", self.props.background().to_string())
                .set("fill-opacity", self.props.background().alpha()),
        );

        for node in self.root {
            document = document.add(node);
        }

        write!(self.out, "{document}")?;
        Ok(self.out)
    }

    fn meta(&mut self, meta: &PageMeta) -> Result<(), WeftError> {
        self.meta = meta.clone();
        Ok(())
    }

    fn home_link(&mut self, meta: &PageMeta) -> Result<(), WeftError> {
        if self.no_link {
            return Ok(());
        }
        let Some(home) = meta.home.as_deref() else {
            return Ok(());
        };
        let caption = meta.generator.as_deref().unwrap_or(home);

        self.close_section();
        let text = svg_element::Text::new(caption)
            .set("x", self.diagram.width() - LINK_MARGIN)
            .set("y", self.diagram.height() - LINK_MARGIN)
            .set("text-anchor", TextAlign::Right.to_svg_value())
            .set("font-family", self.props.font())
            .set("font-size", LINK_TEXT_SIZE)
            .set("fill", self.props.text_color().to_string())
            .set("fill-opacity", self.props.text_color().alpha())
            .set("class", "home");
        self.append(svg_element::Anchor::new().set("href", home).add(text).into());
        Ok(())
    }

    fn draw_group(&mut self, name: &str) -> Result<Option<GroupId>, WeftError> {
        self.close_section();
        let mut group = svg_element::Group::new();
        if !name.is_empty() {
            group = group.set("class", name);
        }
        self.open.push(Container::Section(group));

        let id = GroupId::new(self.groups_opened);
        self.groups_opened += 1;
        Ok(Some(id))
    }

    fn transform<F>(&mut self, x: f32, y: f32, theta: f32, body: F) -> Result<(), WeftError>
    where
        F: FnOnce(&mut Self) -> Result<(), WeftError>,
    {
        let mut group = svg_element::Group::new();
        if let Some(spec) = transform_attribute(x, y, theta) {
            group = group.set("transform", spec);
        }
        self.open.push(Container::Scope(group));
        let result = body(self);
        self.close_scope();
        result
    }

    fn draw_label(
        &mut self,
        at: Point,
        text: &str,
        classes: &ClassTokens,
        angle: Option<f32>,
    ) -> Result<(), WeftError> {
        if text.is_empty() {
            return Ok(());
        }

        let mut node = svg_element::Text::new(text)
            .set("font-family", self.props.font())
            .set("font-size", self.props.text_size())
            .set("fill", self.props.text_color().to_string())
            .set("fill-opacity", self.props.text_color().alpha())
            .set("text-anchor", style::label_align(classes).to_svg_value())
            .set("dominant-baseline", TextBaseline::Middle.to_svg_value());
        if !classes.is_empty() {
            node = node.set("class", classes.to_string());
        }

        let angle = angle.unwrap_or(0.0);
        if angle != 0.0 {
            // Rotation happens around the anchor, so the text itself sits at
            // the origin of a rotated local frame.
            let spec = if at.is_zero() {
                format!("rotate({angle})")
            } else {
                format!("translate({}, {}) rotate({})", at.x(), at.y(), angle)
            };
            let wrapper = svg_element::Group::new()
                .set("transform", spec)
                .add(node.set("x", 0.0).set("y", 0.0));
            self.append(wrapper.into());
        } else {
            self.append(node.set("x", at.x()).set("y", at.y()).into());
        }
        Ok(())
    }

    fn draw_path(&mut self, data: &PathData, classes: &ClassTokens) -> Result<(), WeftError> {
        if data.is_empty() {
            return Ok(());
        }
        let commands = path::decode(data, self.policy)?;
        let style = style::classify(classes, &self.props);

        // A single path element paints fill before stroke, which is the
        // order every other backend uses.
        let mut node = svg_element::Path::new().set("d", path::encode(&commands));

        match style.fill() {
            Some(color) => {
                node = node
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha());
            }
            None => node = node.set("fill", "none"),
        }

        match style.stroke() {
            Some(color) => {
                node = node
                    .set("stroke", color.to_string())
                    .set("stroke-opacity", color.alpha())
                    .set("stroke-width", style.width());
                if let Some(dash) = style.dash().to_svg_value() {
                    node = node.set("stroke-dasharray", dash);
                }
                if style.cap() != LineCap::Butt {
                    node = node.set("stroke-linecap", style.cap().to_svg_value());
                }
            }
            None => node = node.set("stroke", "none"),
        }

        if !classes.is_empty() {
            node = node.set("class", classes.to_string());
        }
        self.append(node.into());
        Ok(())
    }
}

/// Builds the `transform` attribute for a local frame, eliding zero
/// components entirely. `theta` arrives in radians; SVG rotates in degrees.
fn transform_attribute(x: f32, y: f32, theta: f32) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if x != 0.0 || y != 0.0 {
        parts.push(format!("translate({x}, {y})"));
    }
    if theta != 0.0 {
        parts.push(format!("rotate({})", theta.to_degrees()));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramBuilder;

    fn render(diagram: &Diagram) -> String {
        render_with(diagram, &RenderOptions::default())
    }

    fn render_with(diagram: &Diagram, options: &RenderOptions) -> String {
        let mut out = Vec::new();
        SvgDriver::new(diagram, &mut out, options)
            .draw()
            .expect("diagram renders");
        String::from_utf8(out).expect("svg output is utf-8")
    }

    #[test]
    fn test_document_frame() {
        let diagram = DiagramBuilder::new(300.0, 200.0).build();
        let svg = render(&diagram);

        assert!(svg.contains("<svg"), "missing svg root: {svg}");
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 300 200""#));
        assert!(svg.contains(r#"width="300""#));
        assert!(svg.contains(r#"height="200""#));
        // The background rectangle comes before any content.
        assert!(svg.contains(r#"fill="white""#));
    }

    #[test]
    fn test_output_is_deterministic() {
        let diagram = DiagramBuilder::new(120.0, 80.0)
            .title("Handshake")
            .group("lanes")
            .path("M 10 10 L 110 10", "rung")
            .label(60.0, 40.0, "hello", "center")
            .build();

        assert_eq!(render(&diagram), render(&diagram));
    }

    #[test]
    fn test_title_element_from_meta() {
        let diagram = DiagramBuilder::new(100.0, 50.0).title("Login flow").build();
        let svg = render(&diagram);
        assert!(svg.contains("<title>"));
        assert!(svg.contains("Login flow"));

        let untitled = DiagramBuilder::new(100.0, 50.0).build();
        assert!(!render(&untitled).contains("<title>"));
    }

    #[test]
    fn test_caller_css_becomes_style_element() {
        let diagram = DiagramBuilder::new(100.0, 50.0).build();
        let options = RenderOptions {
            css: Some("text { fill: red; }".to_string()),
            ..RenderOptions::default()
        };
        let svg = render_with(&diagram, &options);
        assert!(svg.contains("<style>"));
        assert!(svg.contains("text { fill: red; }"));

        assert!(!render(&diagram).contains("<style>"));
    }

    #[test]
    fn test_label_markup() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .label(40.0, 20.5, "SYN", "center")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains("\nSYN\n</text>"), "label content missing: {svg}");
        assert!(svg.contains(r#"x="40""#));
        assert!(svg.contains(r#"y="20.5""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"dominant-baseline="central""#));
        assert!(svg.contains(r#"font-family="Helvetica""#));
        assert!(svg.contains(r#"font-size="13""#));
        assert!(svg.contains(r#"class="center""#));
    }

    #[test]
    fn test_rotated_label_wrapped_in_rotated_group() {
        let diagram = DiagramBuilder::new(100.0, 100.0)
            .rotated_label(10.0, 20.0, "sideways", "", 90.0)
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"transform="translate(10, 20) rotate(90)""#));
        // The text itself sits at the origin of the rotated frame.
        assert!(svg.contains("x=\"0\" y=\"0\">\nsideways\n</text>"));
    }

    #[test]
    fn test_empty_label_and_path_emit_nothing() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .label(10.0, 10.0, "", "center")
            .path("   ", "open")
            .build();
        let svg = render(&diagram);

        assert!(!svg.contains("<text"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_path_markup() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 10 10 Z", "")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"d="M 0 0 L 10 10 Z""#), "bad path data: {svg}");
        assert!(svg.contains(r#"stroke="black""#));
        assert!(svg.contains(r#"stroke-width="1""#));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn test_unknown_tokens_normalize_out_of_path_data() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 Q 9 9 L 10 10", "")
            .build();
        let svg = render(&diagram);
        assert!(svg.contains(r#"d="M 0 0 L 10 10""#));
    }

    #[test]
    fn test_strict_policy_rejects_unknown_tokens() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 Q 9 9", "")
            .build();
        let options = RenderOptions {
            token_policy: TokenPolicy::Strict,
            ..RenderOptions::default()
        };

        let mut out = Vec::new();
        let err = SvgDriver::new(&diagram, &mut out, &options)
            .draw()
            .unwrap_err();
        assert!(matches!(err, WeftError::Element { index: 0, .. }));
    }

    #[test]
    fn test_closed_path_fills_and_strokes() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 8 4 L 0 8 Z", "closed")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"fill="black""#));
        assert!(svg.contains(r#"stroke="black""#));
        assert!(svg.contains(r#"class="closed""#));
    }

    #[test]
    fn test_block_tab_path_has_no_stroke() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 20 0 L 20 10 L 0 10 Z", "block_tab")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"stroke="none""#));
        assert!(svg.contains(r#"fill="lightgray""#));
    }

    #[test]
    fn test_dashed_path_gets_dasharray() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 50 0", "open dashed")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"stroke-dasharray="6,2""#));
        assert!(svg.contains(r#"class="open dashed""#));
    }

    #[test]
    fn test_solid_class_rounds_linecap() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 50 0", "solid")
            .build();
        let svg = render(&diagram);
        assert!(svg.contains(r#"stroke-linecap="round""#));

        let plain = DiagramBuilder::new(100.0, 50.0)
            .path("M 0 0 L 50 0", "")
            .build();
        assert!(!render(&plain).contains("stroke-linecap"));
    }

    #[test]
    fn test_group_sections_close_each_other() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .group("lanes")
            .path("M 10 0 L 10 50", "rung")
            .group("arrows")
            .path("M 10 25 L 90 25", "open")
            .build();
        let svg = render(&diagram);

        let lanes = svg.find(r#"<g class="lanes">"#).expect("lanes group");
        let arrows = svg.find(r#"<g class="arrows">"#).expect("arrows group");
        assert!(lanes < arrows);
        // The first section closes before the second opens.
        assert!(svg[lanes..arrows].contains("</g>"));
    }

    #[test]
    fn test_group_ids_count_up_in_document_order() {
        let diagram = DiagramBuilder::new(100.0, 50.0).build();
        let mut out = Vec::new();
        let mut driver = SvgDriver::new(&diagram, &mut out, &RenderOptions::default());

        let first = driver.draw_group("a").unwrap().expect("id for a");
        let second = driver.draw_group("b").unwrap().expect("id for b");
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_scoped_elements_nest_in_transformed_group() {
        let diagram = DiagramBuilder::new(100.0, 100.0)
            .scoped(10.0, 20.0, 0.0, |scope| scope.path("M 0 0 L 5 5", ""))
            .build();
        let svg = render(&diagram);

        let open = svg
            .find(r#"<g transform="translate(10, 20)">"#)
            .expect("scope group");
        let path = svg.find("<path").expect("nested path");
        assert!(open < path);
    }

    #[test]
    fn test_scope_rotation_renders_in_degrees() {
        let theta = Point::radians_from_degrees(45.0);
        let diagram = DiagramBuilder::new(100.0, 100.0)
            .scoped(0.0, 0.0, theta, |scope| scope.path("M 0 0 L 5 5", ""))
            .build();
        let svg = render(&diagram);

        // Radians go in, degrees come out. The exact digits wobble with
        // float precision, so only the leading digits are asserted.
        assert!(svg.contains("rotate(45"), "missing rotation: {svg}");
        assert!(!svg.contains("translate(0, 0)"));
    }

    #[test]
    fn test_zero_transform_elides_attribute() {
        let diagram = DiagramBuilder::new(100.0, 100.0)
            .scoped(0.0, 0.0, 0.0, |scope| scope.path("M 0 0 L 5 5", ""))
            .build();
        let svg = render(&diagram);

        assert!(svg.contains("<g>"), "expected a bare scope group: {svg}");
    }

    #[test]
    fn test_home_link_anchor() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .generator("weft", "https://example.com/weft")
            .build();
        let svg = render(&diagram);

        assert!(svg.contains(r#"href="https://example.com/weft""#));
        assert!(svg.contains("\nweft\n</text>"));
        assert!(svg.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn test_home_link_suppressed() {
        let diagram = DiagramBuilder::new(100.0, 50.0)
            .generator("weft", "https://example.com/weft")
            .build();
        let options = RenderOptions {
            no_link: true,
            ..RenderOptions::default()
        };
        assert!(!render_with(&diagram, &options).contains("<a "));

        // No home URL in the metadata means no anchor either.
        let plain = DiagramBuilder::new(100.0, 50.0).build();
        assert!(!render(&plain).contains("<a "));
    }
}
