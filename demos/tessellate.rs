use std::f64::consts::PI;

use pathtess::{DrawMode, Graphics, LineCap, LineJoin, Mesh, MeshGeometry, RecordingTarget, pt};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // A filled badge with a hole, a rounded stroke and an arc
    let mut g = Graphics::new();
    g.begin_fill(0xFF3300, 1.0)
        .line_style(4.0, 0xFFD900, 1.0)
        .draw_rounded_rect(0.0, 0.0, 200.0, 120.0, 15.0)
        .begin_hole()
        .draw_circle(100.0, 60.0, 30.0)
        .end_hole()
        .end_fill()
        .line_style(6.0, 0x00FF00, 1.0)
        .set_line_join(LineJoin::Round)
        .set_line_cap(LineCap::Round)
        .move_to(20.0, 160.0)
        .line_to(100.0, 200.0)
        .line_to(180.0, 160.0)
        .arc(100.0, 260.0, 40.0, 0.0, PI, false);

    let mut target = RecordingTarget::new();
    g.render(&mut target)?;

    let bounds = g.bounds();
    println!(
        "graphics: {} datums, {} vertices, bounds {:.1}x{:.1}",
        g.graphics_data().len(),
        g.geometry().vertex_count(),
        bounds.width(),
        bounds.height()
    );
    for (i, call) in target.calls.iter().enumerate() {
        println!(
            "  call {i}: {:?} {} indices, {}",
            call.mode,
            call.indices.len(),
            if call.is_batched() { "batched" } else { "direct" }
        );
    }
    println!("  hit (10, 10): {}", g.contains_point(pt(10.0, 10.0)));
    println!("  hit (100, 60): {}", g.contains_point(pt(100.0, 60.0)));

    let geometry = MeshGeometry::new(
        vec![0.0, 0.0, 64.0, 0.0, 64.0, 64.0, 0.0, 64.0],
        vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
        vec![0, 1, 2, 0, 2, 3],
    )?;
    let mut mesh = Mesh::new(geometry.into(), DrawMode::Triangles);
    let mut target = RecordingTarget::new();
    mesh.render(&mut target)?;
    println!(
        "mesh: {} calls, hit (32, 32): {}",
        target.calls.len(),
        mesh.contains_point(pt(32.0, 32.0))?
    );

    Ok(())
}
