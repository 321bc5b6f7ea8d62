//! Example: Rendering a hand-built diagram
//!
//! This example demonstrates how to programmatically build a laid-out
//! diagram with `DiagramBuilder` and render it to SVG and PNG, without
//! going through the JSON interchange form.

use weft::{DiagramBuilder, OutputKind, RenderOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building the handshake diagram...\n");

    let diagram = DiagramBuilder::new(340.0, 260.0)
        .title("TCP Handshake")
        .generator("weft", "https://github.com/weftworks/weft")
        .group("actors")
        .scoped(40.0, 44.0, 0.0, |actor| {
            actor
                .path("M 0 0 L 80 0 L 80 30 L 0 30 Z", "block")
                .label(40.0, 15.0, "Client", "center")
        })
        .scoped(220.0, 44.0, 0.0, |actor| {
            actor
                .path("M 0 0 L 80 0 L 80 30 L 0 30 Z", "block")
                .label(40.0, 15.0, "Server", "center")
        })
        .group("lifelines")
        .path("M 80 74 L 80 240", "dashed")
        .path("M 260 74 L 260 240", "dashed")
        .group("messages")
        .path("M 80 110 L 260 110", "rung solid")
        .path("M 250 105 L 260 110 L 250 115 Z", "closed")
        .label(170.0, 102.0, "SYN", "rung_label")
        .path("M 260 150 L 80 150", "rung solid")
        .path("M 90 145 L 80 150 L 90 155 Z", "closed")
        .label(170.0, 142.0, "SYN-ACK", "rung_label")
        .path("M 80 190 L 260 190", "rung solid")
        .path("M 250 185 L 260 190 L 250 195 Z", "closed")
        .label(170.0, 182.0, "ACK", "rung_label")
        .build();

    println!("Created diagram:");
    println!("  Size: {} x {}", diagram.width(), diagram.height());
    println!("  Elements: {}", diagram.elements().len());
    println!();

    // Render the diagram to SVG
    println!("Rendering to SVG...");
    let svg = weft::render_svg_string(&diagram, &RenderOptions::default())?;
    std::fs::write("handshake.svg", &svg)?;
    println!("SVG written to: handshake.svg ({} bytes)", svg.len());

    // Render the same diagram to PNG at double pixel density
    println!("Rendering to PNG...");
    let options = RenderOptions {
        scale: 2.0,
        ..RenderOptions::default()
    };
    let mut png = Vec::new();
    weft::render(&diagram, OutputKind::Png, &options, &mut png)?;
    std::fs::write("handshake.png", &png)?;
    println!("PNG written to: handshake.png ({} bytes)", png.len());

    Ok(())
}
