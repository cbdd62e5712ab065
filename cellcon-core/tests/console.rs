use cellcon_core::{
    Color, Console, ConsoleConfig, FrameState, Grid, PixelImage, Quad, SpriteDraw, TexRect,
    headless::{Command, RecordingBackend},
};

fn atlas_image() -> PixelImage {
    PixelImage::from_rgba(256, 256, vec![255; 256 * 256 * 4]).unwrap()
}

fn console(backend: &mut RecordingBackend, width: u32, height: u32) -> Console {
    Console::load(ConsoleConfig::default(), backend, &atlas_image(), (width, height)).unwrap()
}

fn sprite_texture(backend: &mut RecordingBackend) -> cellcon_core::TextureHandle {
    use cellcon_core::TextureLoader;

    let image = PixelImage::from_rgba(4, 4, vec![0; 4 * 4 * 4]).unwrap();
    backend.load_texture(&image).unwrap().handle
}

#[test]
fn hello_renders_at_expected_cells() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 160, 160);
    let atlas = console.atlas().texture();
    console.write(2, 3, "Hi");

    console.render_frame(&mut backend).unwrap();

    let quads = backend.quads_for(atlas);
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[0].origin(), (48.0, 112.0));
    assert_eq!(quads[1].origin(), (64.0, 112.0));

    // 'H' is 0x48: atlas row 4, column 8
    let uv = quads[0].vertices[Quad::TOP_LEFT].uv;
    assert_eq!(uv, [0.5, 0.25]);
    let uv = quads[0].vertices[Quad::BOTTOM_RIGHT].uv;
    assert_eq!(uv, [0.5625, 0.3125]);
}

#[test]
fn text_outside_grid_is_not_drawn() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 720, 400);
    assert_eq!(console.grid(), Grid::new(45, 25));

    console.write(25, 0, "below");
    console.write(0, 45, "right");
    console.write(-1, 3, "above");

    let stats = console.render_frame(&mut backend).unwrap();
    assert_eq!(stats.draw_calls, 0);
    assert_eq!(backend.draw_calls().count(), 0);
    assert_eq!(console.text().len(), 3);
}

#[test]
fn resize_brings_text_into_view() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 320, 200);
    let atlas = console.atlas().texture();
    assert_eq!(console.grid(), Grid::new(20, 12));

    console.write(20, 30, "x");
    console.render_frame(&mut backend).unwrap();
    assert!(backend.quads_for(atlas).is_empty());

    console.on_resize(640, 400).unwrap();
    backend.take_commands();
    assert_eq!(console.grid(), Grid::new(40, 25));

    console.render_frame(&mut backend).unwrap();
    assert_eq!(backend.quads_for(atlas)[0].origin(), (480.0, 64.0));
    assert!(matches!(
        backend.commands().first(),
        Some(Command::Viewport { width: 640, height: 400 })
    ));
}

#[test]
fn frame_command_order() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 640, 400);
    let sprite = sprite_texture(&mut backend);
    console.add_sprite(sprite, 256, 256, 0, 100);
    console.write(20, 20, "Hello World !");

    console.render_frame(&mut backend).unwrap();

    let kinds: Vec<_> = backend
        .commands()
        .iter()
        .map(|cmd| match cmd {
            Command::Viewport { .. } => "viewport",
            Command::Clear(_) => "clear",
            Command::DrawQuads { .. } => "draw",
            Command::Present => "present",
        })
        .collect();
    assert_eq!(kinds, vec!["viewport", "clear", "draw", "draw", "present"]);

    let sprite_quads = backend.quads_for(sprite);
    assert_eq!(sprite_quads[0].origin(), (0.0, 100.0));
    assert_eq!(sprite_quads[0].size(), (256.0, 256.0));
    assert_eq!(sprite_quads[0].vertices[Quad::TOP_LEFT].uv, [
        TexRect::FULL.left,
        TexRect::FULL.top
    ]);
}

#[test]
fn text_colors_reach_vertices() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 640, 400);
    let atlas = console.atlas().texture();
    let fg = Color::rgb(0xff8000);
    console.write_colored(0, 0, "c", fg, Color::TRANSPARENT);

    console.render_frame(&mut backend).unwrap();

    let quad = backend.quads_for(atlas)[0];
    for vertex in quad.vertices {
        assert_eq!(vertex.fg, fg.to_f32());
        assert_eq!(vertex.bg, [0.0; 4]);
    }
}

#[test]
fn zoomed_sprite_reverts_on_next_frame() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 640, 400);
    let texture = sprite_texture(&mut backend);
    let id = console.add_sprite(texture, 32, 16, 0, 0);

    let mut frame = console.begin_frame(&mut backend).unwrap();
    frame
        .draw_sprite(id, SpriteDraw::Zoomed { y: 10, x: 20, zoom: 2.0 })
        .unwrap();
    frame.present().unwrap();
    assert!(console.sprite(id).unwrap().was_zoomed());
    assert_eq!(backend.quads_for(texture)[0].size(), (64.0, 32.0));

    backend.take_commands();
    let mut frame = console.begin_frame(&mut backend).unwrap();
    frame.draw_sprite(id, SpriteDraw::Current).unwrap();
    frame.present().unwrap();

    let quad = backend.quads_for(texture)[0];
    assert_eq!(quad.origin(), (20.0, 10.0));
    assert_eq!(quad.size(), (32.0, 16.0));
    assert!(!console.sprite(id).unwrap().was_zoomed());
}

#[test]
fn scrolling_text_between_frames() {
    let mut backend = RecordingBackend::new();
    let mut console = console(&mut backend, 640, 400);
    let atlas = console.atlas().texture();
    console.write(0, 0, "A");

    let rows = console.grid().rows;
    let mut row = 0;
    for _ in 0..rows {
        let next = (row + 1) % rows;
        assert!(console.move_text((row, 0), (next, 0)));
        row = next;
    }
    assert_eq!(row, 0);

    console.render_frame(&mut backend).unwrap();
    assert_eq!(backend.quads_for(atlas)[0].origin(), (0.0, 384.0));
}

#[test]
fn failed_present_leaves_console_usable() {
    let mut failing = RecordingBackend::failing_present();
    let mut console = console(&mut failing, 640, 400);
    console.write(0, 0, "A");

    assert!(console.render_frame(&mut failing).is_err());
    assert_eq!(console.frame_state(), FrameState::Idle);

    let mut backend = RecordingBackend::new();
    let stats = console.render_frame(&mut backend).unwrap();
    assert_eq!(stats.glyph_quads, 1);
    assert_eq!(backend.presents(), 1);
}
