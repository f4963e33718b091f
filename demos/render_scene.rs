use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use canvas_render::render::{
    BackgroundStyle, Color, CompositeRenderer, Layer, RasterImage, Shape, Viewport,
};
use canvas_render::RendererConfig;
use kurbo::Rect;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A light checkerboard makes the redrawn areas easy to spot in the output
    let config = RendererConfig::builder()
        .background(BackgroundStyle::Checkerboard {
            first: Color::WHITE,
            second: Color::LIGHT_GRAY,
            cell_size: 16,
        })
        .build()?;
    let mut renderer = CompositeRenderer::new(&config)?;

    let blue = Color::from_u8(66, 133, 244, 255);
    let red = Color::from_u8(219, 68, 55, 255);
    let mut shapes = Layer::new("shapes");
    shapes.push(Shape::fill(Rect::new(40.0, 40.0, 240.0, 160.0), blue));
    shapes.push(Shape::fill(Rect::new(400.0, 120.0, 560.0, 300.0), red));
    let shapes = shapes.into_handle();

    let mut overlay = Layer::new("overlay");
    overlay.push(Shape::frame(Rect::new(30.0, 30.0, 250.0, 170.0), 4.0, Color::BLACK));
    let glass = Color::from_u8(15, 157, 88, 160);
    overlay.push(Shape::fill(Rect::new(180.0, 100.0, 300.0, 220.0), glass));
    let overlay = overlay.into_handle();

    renderer.set_layers(&[shapes.clone(), overlay.clone()]);

    let mut viewport = Viewport::new(0, 0, 480, 320);
    let mut canvas = RasterImage::new(viewport.width, viewport.height);
    renderer.render(&mut canvas, 1.0, &viewport, viewport.as_rect())?;
    write_png(&canvas, Path::new("scene_initial.png"))?;

    // Scroll right: only the exposed strip is drawn
    viewport.translate(120, 0);
    renderer.render(&mut canvas, 1.0, &viewport, viewport.as_rect())?;
    write_png(&canvas, Path::new("scene_scrolled.png"))?;

    // Move the red box down and report old and new bounds
    let old = Rect::new(400.0, 120.0, 560.0, 300.0);
    let new = Rect::new(400.0, 180.0, 560.0, 360.0);
    shapes.borrow_mut().objects[1] = Box::new(Shape::fill(new, red));
    renderer.invalidate_layer_region(Some(&shapes), Some(old));
    renderer.invalidate_layer_region(Some(&shapes), Some(new));
    renderer.render(&mut canvas, 1.0, &viewport, viewport.as_rect())?;
    write_png(&canvas, Path::new("scene_edited.png"))?;

    // Zooming throws the whole cache away
    renderer.render(&mut canvas, 1.5, &viewport, viewport.as_rect())?;
    write_png(&canvas, Path::new("scene_zoomed.png"))?;

    let stats = renderer.stats();
    println!(
        "cache hits: {}, rebuilds: {}, blitted pieces: {}, drawn areas: {}",
        stats.cache_hits, stats.rebuilds, stats.blitted_pieces, stats.drawn_areas
    );
    Ok(())
}

fn write_png(image: &RasterImage, path: &Path) -> anyhow::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_bytes())?;
    log::info!("wrote {}", path.display());
    Ok(())
}
