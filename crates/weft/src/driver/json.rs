//! The structural dump backend.
//!
//! Emits the draw sequence as a JSON document instead of painting anything:
//! a header with the resolved page properties, then one event per driver
//! hook in traversal order, with nested frames for transformed scopes. The
//! output is stable across runs, which makes it the backend of choice for
//! golden tests and for debugging what a diagram actually asks a surface
//! to do.

use std::io::Write;

use log::debug;
use serde_json::{Value, json};

use crate::{
    RenderOptions,
    diagram::{self, Diagram, PageMeta},
    driver::{Driver, GroupId},
    error::WeftError,
    geometry::Point,
    path::{self, PathData, TokenPolicy},
    props::RenderProps,
    style::ClassTokens,
};

/// Dumps a diagram's draw sequence as JSON written to `out`.
pub struct JsonDriver<'d, W> {
    diagram: &'d Diagram,
    out: W,
    props: RenderProps,
    scale: f32,
    policy: TokenPolicy,
    no_link: bool,
    meta: PageMeta,
    /// Stack of event lists. The bottom entry collects top-level events;
    /// each open transform scope pushes another on top.
    frames: Vec<Vec<Value>>,
    groups_opened: usize,
}

impl<'d, W: Write> JsonDriver<'d, W> {
    pub fn new(diagram: &'d Diagram, out: W, options: &RenderOptions) -> Self {
        Self {
            diagram,
            out,
            props: RenderProps::resolve(diagram.props(), &options.props),
            scale: options.scale,
            policy: options.token_policy,
            no_link: options.no_link,
            meta: PageMeta::default(),
            frames: vec![Vec::new()],
            groups_opened: 0,
        }
    }

    fn push_event(&mut self, event: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(event);
        }
    }

    fn resolved_props(&self) -> Value {
        json!({
            "background": self.props.background().to_string(),
            "text_color": self.props.text_color().to_string(),
            "text_size": self.props.text_size(),
            "font": self.props.font(),
            "line_color": self.props.line_color().to_string(),
            "line_width": self.props.line_width(),
            "rung_color": self.props.rung_color().to_string(),
            "rung_width": self.props.rung_width(),
            "arrow_color": self.props.arrow_color().to_string(),
            "block_stroke": self.props.block_stroke().to_string(),
            "block_tab_fill": self.props.block_tab_fill().to_string(),
        })
    }
}

impl<W: Write> Driver for JsonDriver<'_, W> {
    type Target = W;

    fn draw(mut self) -> Result<W, WeftError> {
        debug!(elements = self.diagram.elements().len(); "dumping draw events");
        diagram::traverse(self.diagram, &mut self)?;

        let events = self.frames.pop().unwrap_or_default();
        let mut document = json!({
            "width": self.diagram.width(),
            "height": self.diagram.height(),
            "scale": self.scale,
            "props": self.resolved_props(),
        });
        if !self.meta.is_empty() {
            document["meta"] = serde_json::to_value(&self.meta)?;
        }
        document["events"] = Value::Array(events);

        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
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
        let mut event = json!({"event": "home_link", "home": home});
        if let Some(generator) = meta.generator.as_deref() {
            event["generator"] = Value::String(generator.to_string());
        }
        self.push_event(event);
        Ok(())
    }

    fn draw_group(&mut self, name: &str) -> Result<Option<GroupId>, WeftError> {
        let id = GroupId::new(self.groups_opened);
        self.groups_opened += 1;
        self.push_event(json!({"event": "group", "id": id.index(), "name": name}));
        Ok(Some(id))
    }

    fn transform<F>(&mut self, x: f32, y: f32, theta: f32, body: F) -> Result<(), WeftError>
    where
        F: FnOnce(&mut Self) -> Result<(), WeftError>,
    {
        self.frames.push(Vec::new());
        let result = body(self);
        let events = self.frames.pop().unwrap_or_default();
        if result.is_ok() {
            self.push_event(json!({
                "event": "transform",
                "dx": x,
                "dy": y,
                "theta": theta,
                "events": events,
            }));
        }
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
        let mut event = json!({
            "event": "label",
            "x": at.x(),
            "y": at.y(),
            "text": text,
        });
        if !classes.is_empty() {
            event["class"] = Value::String(classes.to_string());
        }
        if let Some(angle) = angle {
            event["angle"] = json!(angle);
        }
        self.push_event(event);
        Ok(())
    }

    fn draw_path(&mut self, data: &PathData, classes: &ClassTokens) -> Result<(), WeftError> {
        if data.is_empty() {
            return Ok(());
        }
        let commands = path::decode(data, self.policy)?;
        let mut event = json!({
            "event": "path",
            "d": path::encode(&commands),
        });
        if !classes.is_empty() {
            event["class"] = Value::String(classes.to_string());
        }
        self.push_event(event);
        Ok(())
    }
}
