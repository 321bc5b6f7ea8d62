//! The draw-ready diagram carrier and its traversal.
//!
//! A [`Diagram`] is the output of upstream parsing and layout: a bounding
//! size, page metadata, optional property overrides, and a flat-or-nested
//! list of draw elements. [`traverse`] walks one in document order against
//! any [`Driver`], which is the sole entry point backends render through.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    driver::Driver,
    error::WeftError,
    geometry::{Point, Size},
    path::PathData,
    props::PropsPatch,
    style::ClassTokens,
};

/// Vertical offset of the label pushed by [`DiagramBuilder::title`].
const TITLE_BASELINE: f32 = 20.0;

/// Document-level metadata: title, generating tool, and its home URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
}

impl PageMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.generator.is_none() && self.home.is_none()
    }
}

/// One draw element. `class` strings carry the style tokens resolved at
/// render time; `scoped` nests its children inside a translated and rotated
/// local frame (`theta` in radians).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Element {
    Group {
        name: String,
    },
    Label {
        x: f32,
        y: f32,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        angle: Option<f32>,
    },
    Path {
        data: PathData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    Scoped {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default)]
        theta: f32,
        children: Vec<Element>,
    },
}

/// A laid-out diagram, ready to render.
///
/// `width` and `height` are the logical bounding size computed upstream and
/// fixed for the life of the value. The rest is draw content. The whole
/// structure round-trips through serde; its JSON form is the interchange
/// format the command-line front end reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    width: f32,
    height: f32,
    #[serde(default, skip_serializing_if = "PageMeta::is_empty")]
    meta: PageMeta,
    #[serde(default, skip_serializing_if = "PropsPatch::is_empty")]
    props: PropsPatch,
    #[serde(default)]
    elements: Vec<Element>,
}

impl Diagram {
    /// Parses a diagram from its JSON interchange form.
    pub fn from_json(source: &str) -> Result<Self, WeftError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Property overrides supplied with the diagram itself.
    pub fn props(&self) -> &PropsPatch {
        &self.props
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// Fluent constructor for [`Diagram`] values.
///
/// Upstream layout normally supplies diagrams; the builder exists for
/// programmatic callers and fixtures.
///
/// ```
/// use weft::diagram::DiagramBuilder;
///
/// let diagram = DiagramBuilder::new(200.0, 100.0)
///     .title("Handshake")
///     .path("M 20 40 L 180 40", "")
///     .label(100.0, 32.0, "SYN", "center")
///     .build();
/// assert_eq!(diagram.elements().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    diagram: Diagram,
}

impl DiagramBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            diagram: Diagram {
                width,
                height,
                ..Diagram::default()
            },
        }
    }

    /// Sets the page title and pushes a centered title label near the top.
    pub fn title(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.diagram.meta.title = Some(text.clone());
        self.diagram.elements.push(Element::Label {
            x: self.diagram.width / 2.0,
            y: TITLE_BASELINE,
            text,
            class: Some("title center".to_string()),
            angle: None,
        });
        self
    }

    /// Names the generating tool and its home URL in the page metadata.
    pub fn generator(mut self, name: impl Into<String>, home: impl Into<String>) -> Self {
        self.diagram.meta.generator = Some(name.into());
        self.diagram.meta.home = Some(home.into());
        self
    }

    pub fn props(mut self, props: PropsPatch) -> Self {
        self.diagram.props = props;
        self
    }

    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.diagram.elements.push(Element::Group { name: name.into() });
        self
    }

    pub fn label(mut self, x: f32, y: f32, text: impl Into<String>, class: &str) -> Self {
        self.diagram.elements.push(Element::Label {
            x,
            y,
            text: text.into(),
            class: owned_class(class),
            angle: None,
        });
        self
    }

    /// A label rotated around its anchor point; `angle` in degrees.
    pub fn rotated_label(
        mut self,
        x: f32,
        y: f32,
        text: impl Into<String>,
        class: &str,
        angle: f32,
    ) -> Self {
        self.diagram.elements.push(Element::Label {
            x,
            y,
            text: text.into(),
            class: owned_class(class),
            angle: Some(angle),
        });
        self
    }

    pub fn path(mut self, data: impl Into<PathData>, class: &str) -> Self {
        self.diagram.elements.push(Element::Path {
            data: data.into(),
            class: owned_class(class),
        });
        self
    }

    /// Nests the elements built by `body` inside a local frame translated by
    /// `(dx, dy)` and rotated by `theta` radians.
    pub fn scoped<F>(mut self, dx: f32, dy: f32, theta: f32, body: F) -> Self
    where
        F: FnOnce(DiagramBuilder) -> DiagramBuilder,
    {
        let inner = body(DiagramBuilder::default());
        self.diagram.elements.push(Element::Scoped {
            dx,
            dy,
            theta,
            children: inner.diagram.elements,
        });
        self
    }

    pub fn build(self) -> Diagram {
        self.diagram
    }
}

fn owned_class(class: &str) -> Option<String> {
    (!class.is_empty()).then(|| class.to_string())
}

/// Walks `diagram` in document order against `driver`: `meta` first, then
/// every element depth-first, then `home_link`.
///
/// A hook failure aborts the walk; the error is tagged with the depth-first
/// ordinal of the element whose hook failed.
pub fn traverse<D: Driver>(diagram: &Diagram, driver: &mut D) -> Result<(), WeftError> {
    debug!(elements = diagram.elements.len(); "traversing diagram");
    driver.meta(&diagram.meta)?;
    let mut ordinal = 0;
    walk(&diagram.elements, driver, &mut ordinal)?;
    driver.home_link(&diagram.meta)?;
    Ok(())
}

fn walk<D: Driver>(
    elements: &[Element],
    driver: &mut D,
    ordinal: &mut usize,
) -> Result<(), WeftError> {
    for element in elements {
        let index = *ordinal;
        *ordinal += 1;
        match element {
            Element::Group { name } => {
                driver
                    .draw_group(name)
                    .map_err(|err| err.at_element(index))?;
            }
            Element::Label {
                x,
                y,
                text,
                class,
                angle,
            } => {
                let classes = ClassTokens::parse(class.as_deref().unwrap_or(""));
                driver
                    .draw_label(Point::new(*x, *y), text, &classes, *angle)
                    .map_err(|err| err.at_element(index))?;
            }
            Element::Path { data, class } => {
                let classes = ClassTokens::parse(class.as_deref().unwrap_or(""));
                driver
                    .draw_path(data, &classes)
                    .map_err(|err| err.at_element(index))?;
            }
            Element::Scoped {
                dx,
                dy,
                theta,
                children,
            } => {
                driver
                    .transform(*dx, *dy, *theta, |driver| walk(children, driver, ordinal))
                    .map_err(|err| err.at_element(index))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_title_sets_meta_and_label() {
        let diagram = DiagramBuilder::new(200.0, 100.0).title("Handshake").build();

        assert_eq!(diagram.meta().title.as_deref(), Some("Handshake"));
        assert_eq!(
            diagram.elements(),
            &[Element::Label {
                x: 100.0,
                y: TITLE_BASELINE,
                text: "Handshake".to_string(),
                class: Some("title center".to_string()),
                angle: None,
            }],
        );
    }

    #[test]
    fn test_builder_scoped_nests_children() {
        let diagram = DiagramBuilder::new(100.0, 100.0)
            .scoped(10.0, 20.0, 0.0, |inner| inner.path("M 0 0 L 5 5", "rung"))
            .build();

        match &diagram.elements()[0] {
            Element::Scoped {
                dx, dy, children, ..
            } => {
                assert_eq!((*dx, *dy), (10.0, 20.0));
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected scoped element, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_empty_class_becomes_none() {
        let diagram = DiagramBuilder::new(10.0, 10.0)
            .label(1.0, 1.0, "a", "")
            .build();

        match &diagram.elements()[0] {
            Element::Label { class, .. } => assert!(class.is_none()),
            other => panic!("expected label element, got {other:?}"),
        }
    }

    #[test]
    fn test_diagram_serde_round_trip() {
        let diagram = DiagramBuilder::new(320.0, 240.0)
            .title("Round trip")
            .group("messages")
            .path("M 0 0 L 10 10 Z", "closed dashed")
            .scoped(5.0, 5.0, 1.0, |inner| {
                inner.rotated_label(0.0, 0.0, "spin", "end", 90.0)
            })
            .build();

        let json = serde_json::to_string(&diagram).unwrap();
        let back: Diagram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diagram);
    }

    #[test]
    fn test_diagram_from_json_interchange_form() {
        let diagram = Diagram::from_json(
            r#"{
                "width": 120,
                "height": 80,
                "meta": { "title": "T" },
                "elements": [
                    { "op": "group", "name": "g" },
                    { "op": "label", "x": 60, "y": 20, "text": "T", "class": "title center" },
                    { "op": "path", "data": "M 0 0 L 1 1" },
                    { "op": "scoped", "dx": 4, "children": [
                        { "op": "path", "data": [ { "x": 0, "y": 0 }, { "x": 9, "y": 9 } ] }
                    ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(diagram.width(), 120.0);
        assert_eq!(diagram.elements().len(), 4);
        match &diagram.elements()[3] {
            Element::Scoped { dy, theta, .. } => {
                assert_eq!(*dy, 0.0);
                assert_eq!(*theta, 0.0);
            }
            other => panic!("expected scoped element, got {other:?}"),
        }
    }

    #[test]
    fn test_diagram_from_invalid_json_fails() {
        let err = Diagram::from_json("{ not json").unwrap_err();
        assert!(matches!(err, WeftError::Json(_)));
    }
}
