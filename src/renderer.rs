use std::{
    sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}},
    rc::Rc,
    cell::RefCell,
};

use three_d::*;

use crate::log; // macro import
use crate::utils::*;
use crate::display;
use crate::events;
use crate::scene;
use crate::timeline::Timeline;


const CAMERA_SLIDER_RANGE: std::ops::RangeInclusive<f32> = -5.0..=5.0;
const SCROLL_HEIGHT_RANGE: std::ops::RangeInclusive<f64> = 500.0..=10000.0;


pub async fn main() {
    let error_flag = Arc::new(AtomicBool::new(false));
    let error_msg = Arc::new(Mutex::new(String::new()));

    let window = Window::new(WindowSettings {
        title: "Canspin: scroll-driven 3D can in WASM + WebGL".to_string(),
        ..Default::default()
    })
    .unwrap();

    let context = window.gl();
    log!("main(): OpenGL version: {:?}", context.version());
    log!(
        "main(): viewport: {}x{}",
        window.viewport().width,
        window.viewport().height
    );

    let mut camera = Camera::new_perspective(
        window.viewport(),
        vec3(1.5, 1.5, 0.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(75.0),
        0.1,
        100.0,
    );

    // the one piece of shared mutable state: scroll listener writes the
    // target, the frame closure relaxes toward it
    let timeline = Rc::new(RefCell::new(Timeline::from_scroll(scroll_offset())));
    events::wire_scroll(Rc::clone(&timeline));

    // the engine resizes this canvas from the browser window; the frame loop
    // clamps its backing store to the pixel-ratio cap each frame
    let canvas = events::find_canvas();

    // set exactly once when the async loads resolve, never cleared
    let model_handle: Rc<RefCell<Option<Model<PhysicalMaterial>>>> =
        Rc::new(RefCell::new(None));
    let ambient_handle: Rc<RefCell<Option<AmbientLight>>> = Rc::new(RefCell::new(None));

    execute_future({
        let context = context.clone();
        let ambient_handle = Rc::clone(&ambient_handle);
        let error_flag = Arc::clone(&error_flag);
        let error_msg = Arc::clone(&error_msg);
        async move {
            match scene::load_environment(&context).await {
                Ok(light) => *ambient_handle.borrow_mut() = Some(light),
                Err(e) => set_error_for_egui(&error_flag, &error_msg, format!("ERROR: {}\n", e)),
            }
        }
    });

    execute_future({
        let context = context.clone();
        let model_handle = Rc::clone(&model_handle);
        let error_flag = Arc::clone(&error_flag);
        let error_msg = Arc::clone(&error_msg);
        async move {
            match scene::load_can(&context).await {
                Ok(model) => *model_handle.borrow_mut() = Some(model),
                Err(e) => set_error_for_egui(&error_flag, &error_msg, format!("ERROR: {}\n", e)),
            }
        }
    });

    let mut gui = three_d::GUI::new(&context);
    let mut cam_pos = vec3(1.5_f32, 1.5, 0.0);
    let mut prev_cam_pos = cam_pos;
    let mut fps_ma = IncrementalMA::new(100);

    window.render_loop(move |mut frame_input| {
        let mut fps = 0.0;
        if frame_input.elapsed_time > 0.0 {
            fps = fps_ma.add(1000.0 / frame_input.elapsed_time);
        }

        let viewport = match canvas.as_ref() {
            Some(canvas) => events::clamp_backing_store(
                canvas,
                frame_input.viewport,
                frame_input.device_pixel_ratio.into(),
            ),
            None => frame_input.viewport,
        };
        camera.set_viewport(viewport);

        let w = viewport.width;
        let h = viewport.height;
        let loading = model_handle.borrow().is_none();

        gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            viewport,
            display::clamped_pixel_ratio(frame_input.device_pixel_ratio.into()) as f32,
            |gui_context| {
                if error_flag.load(Ordering::Relaxed) {
                    egui::Window::new("Error")
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(gui_context, |ui| {
                            let mutex = error_msg.lock().unwrap();
                            ui.colored_label(egui::Color32::RED, &(*mutex));
                        });
                    return;
                }

                if loading {
                    egui::Window::new("Loading...")
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(gui_context, |ui| {
                            ui.label(format!("Fetching {}", scene::MODEL_PATH));
                        });
                }

                egui::Window::new("Canspin").show(gui_context, |ui| {
                    let mut tl = timeline.borrow_mut();
                    let mut scroll_height = tl.scroll_height();

                    egui::Grid::new("debug_grid")
                        .num_columns(2)
                        .spacing([40.0, 4.0])
                        .striped(true)
                        .show(ui, |ui| {
                            ui.add(egui::Label::new("FPS"));
                            ui.label(format!("{:.2}", fps));
                            ui.end_row();

                            ui.add(egui::Label::new("Timeline"));
                            ui.label(format!(
                                "{:.3} -> {:.3}",
                                tl.current(),
                                tl.target()
                            ));
                            ui.end_row();

                            ui.add(egui::Label::new("Scroll Height"));
                            ui.add(
                                egui::Slider::new(&mut scroll_height, SCROLL_HEIGHT_RANGE)
                                    .suffix("px"),
                            );
                            ui.end_row();

                            ui.add(egui::Label::new("Camera X"));
                            ui.add(
                                egui::Slider::new(&mut cam_pos.x, CAMERA_SLIDER_RANGE)
                                    .step_by(0.1),
                            );
                            ui.end_row();

                            ui.add(egui::Label::new("Camera Y"));
                            ui.add(
                                egui::Slider::new(&mut cam_pos.y, CAMERA_SLIDER_RANGE)
                                    .step_by(0.1),
                            );
                            ui.end_row();

                            ui.add(egui::Label::new("Camera Z"));
                            ui.add(
                                egui::Slider::new(&mut cam_pos.z, CAMERA_SLIDER_RANGE)
                                    .step_by(0.1),
                            );
                            ui.end_row();

                            ui.add(egui::Label::new("Window Size"));
                            ui.label(format!("{}x{}", w, h));
                            ui.end_row();

                            ui.add(egui::Label::new("Aspect"));
                            ui.label(format!("{:.3}", display::aspect_ratio(w, h)));
                            ui.end_row();
                        });

                    if !are_floats_equal(scroll_height as f32, tl.scroll_height() as f32, 0.00001) {
                        tl.set_scroll_height(scroll_height);
                    }
                });
            },
        );

        let changed = !are_floats_equal(cam_pos.x, prev_cam_pos.x, 0.00001)
            || !are_floats_equal(cam_pos.y, prev_cam_pos.y, 0.00001)
            || !are_floats_equal(cam_pos.z, prev_cam_pos.z, 0.00001);
        if changed {
            camera.set_view(cam_pos, vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
            prev_cam_pos = cam_pos;
        }

        if let Some(transformation) = scene::advance(&mut timeline.borrow_mut(), !loading) {
            if let Some(model) = model_handle.borrow_mut().as_mut() {
                model.animate(0.001 * frame_input.accumulated_time as f32);
                for part in model.iter_mut() {
                    part.set_transformation(transformation);
                }
            }
        }

        let screen = RenderTarget::screen(&context, viewport.width, viewport.height);
        screen.clear(ClearState::color_and_depth(0.0, 0.0, 0.0, 1.0, 1.0));
        {
            let model_ref = model_handle.borrow();
            let ambient_ref = ambient_handle.borrow();
            if let Some(model) = model_ref.as_ref() {
                let mut lights: Vec<&dyn Light> = Vec::new();
                if let Some(light) = ambient_ref.as_ref() {
                    lights.push(light);
                }
                screen.render(&camera, model, &lights);
            }
        }
        screen.write(|| gui.render()).unwrap();

        FrameOutput::default()
    });
}
