use rastly::color;
use rastly::math::mat4::Mat4;
use rastly::math::vec3::Vec3;
use rastly::mesh::Mesh;
use rastly::render::{CullMode, Pipeline, Winding};
use rastly::window::{
    FpsCounter, FrameLimiter, Key, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH,
};

const MODEL_PATH: &str = "assets/model.obj";
const TEXTURE_PATH: &str = "assets/texture.jpg";

fn format_window_title(fps: f64, pipeline: &Pipeline) -> String {
    format!(
        "Rastly | FPS: {:.1} | Cull: {} | Winding: {} | C/W to toggle, ESC to quit",
        fps, pipeline.cull_mode, pipeline.winding
    )
}

fn main() -> Result<(), String> {
    let mut window = Window::new("Rastly", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut pipeline =
        Pipeline::new(window.width(), window.height()).map_err(|e| e.to_string())?;
    pipeline.set_projection();

    // A missing model yields an empty mesh and the demo shows the clear color.
    let mesh = Mesh::load(MODEL_PATH).triangulated();
    if mesh.is_empty() {
        eprintln!("no faces loaded from {MODEL_PATH}");
    }

    // A missing texture leaves the pipeline untextured (white fragments).
    if let Err(e) = pipeline.load_texture(TEXTURE_PATH) {
        eprintln!("could not load {TEXTURE_PATH}: {e}");
    }

    // camera 10 units back on +Z, looking at the origin
    pipeline.set_view(Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::ZERO,
        Vec3::UP,
    ));

    let mut frame_limiter = FrameLimiter::new(&window);
    let mut fps_counter = FpsCounter::new(&window);
    let mut angle = 0.0f32;

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                window.resize(w, h)?;
                pipeline.resize(w, h).map_err(|e| e.to_string())?;
                pipeline.set_projection();
            }
            WindowEvent::KeyPress(Key::C) => {
                pipeline.cull_mode = match pipeline.cull_mode {
                    CullMode::None => CullMode::Back,
                    _ => CullMode::None,
                };
            }
            WindowEvent::KeyPress(Key::W) => {
                pipeline.winding = match pipeline.winding {
                    Winding::Cw => Winding::Ccw,
                    Winding::Ccw => Winding::Cw,
                };
            }
            WindowEvent::None => {}
        }

        let delta_ms = frame_limiter.wait_and_get_delta(&window);
        angle += 0.001 * delta_ms as f32;

        // spin the model about the Y axis
        pipeline.set_model(Mat4::rotation_axis(angle, Vec3::UP));

        pipeline.clear(color::BACKGROUND);
        pipeline.render(&mesh);
        window.present(pipeline.framebuffer().as_bytes())?;

        if let Some(fps) = fps_counter.tick(&window) {
            window.set_title(&format_window_title(fps, &pipeline));
        }
    }

    Ok(())
}
